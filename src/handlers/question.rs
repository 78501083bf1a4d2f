use crate::actix_web::{
    web::{Bytes, Data, Json, Path},
    HttpResponse,
};
use crate::context::UserInfo;
use crate::core::{
    filter::QuestionFilter,
    models::{
        common::Pagination,
        question::{Create, Draft, Question},
    },
    ports::repository::Manager,
    services::question::{create_question, delete_question, list_questions, update_question},
};
use crate::database::sqlite::SqliteStoreManager;
use crate::error::Error;
use crate::request::ListQuestions;
use crate::validation::Validator;

fn parse_id(raw: &str) -> Result<i64, Error> {
    raw.parse().map_err(|_| Error::BadRequest("id is invalid".into()))
}

fn parse_draft(validator: &Validator, body: &[u8]) -> Result<Draft, Error> {
    let create: Create = validator.parse_question(body)?;
    Ok(Draft::try_from(create)?)
}

pub async fn list(body: Bytes, validator: Data<Validator>, manager: Data<SqliteStoreManager>) -> Result<Json<Vec<Question>>, Error> {
    let params = if body.iter().all(u8::is_ascii_whitespace) {
        ListQuestions::default()
    } else {
        validator.parse_list::<ListQuestions>(&body)?
    };
    let pagination = Pagination::new(params.page_size.unwrap_or(0), params.last_id);
    let filter = QuestionFilter { author_id: params.author_id };
    let mut store = manager.db().await?;
    let questions = list_questions(&mut store, pagination, &filter).await?;
    Ok(Json(questions))
}

pub async fn create(user: UserInfo, body: Bytes, validator: Data<Validator>, manager: Data<SqliteStoreManager>) -> Result<Json<Question>, Error> {
    let draft = parse_draft(&validator, &body)?;
    let mut store = manager.db().await?;
    let question = store.run_in_transaction(|tx| Box::pin(create_question(tx, user.id, draft))).await?;
    Ok(Json(question))
}

pub async fn update(
    user: UserInfo,
    id: Path<String>,
    body: Bytes,
    validator: Data<Validator>,
    manager: Data<SqliteStoreManager>,
) -> Result<Json<Question>, Error> {
    let id = parse_id(&id)?;
    let draft = parse_draft(&validator, &body)?;
    let mut store = manager.db().await?;
    let question = store.run_in_transaction(|tx| Box::pin(update_question(tx, user.id, id, draft))).await?;
    Ok(Json(question))
}

pub async fn delete(_: UserInfo, id: Path<String>, manager: Data<SqliteStoreManager>) -> Result<HttpResponse, Error> {
    let id = parse_id(&id)?;
    let mut store = manager.db().await?;
    delete_question(&mut store, id).await?;
    Ok(HttpResponse::Ok().finish())
}
