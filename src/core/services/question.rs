use crate::{
    core::{
        filter::{Filter, Query},
        models::{
            common::Pagination,
            question::{Draft, Insert as QuestionInsert, Question, Update as QuestionUpdate},
        },
        ports::repository::{QuestionCommon, QuestionOptionCommon, Store},
    },
    error::Error,
};

pub async fn list_questions<S, F>(storer: &mut S, pagination: Pagination, filter: &F) -> Result<Vec<Question>, Error>
where
    S: Store,
    F: Filter + ?Sized,
{
    QuestionCommon::query(storer, &Query::new(filter), pagination).await
}

/// Writes the question and its options. Callers run this inside one transaction.
pub async fn create_question<S>(storer: &mut S, author_id: i64, draft: Draft) -> Result<Question, Error>
where
    S: Store,
{
    let id = QuestionCommon::insert(
        storer,
        QuestionInsert {
            body: draft.body.clone(),
            author_id,
        },
    )
    .await?;
    let options = QuestionOptionCommon::bulk_insert(storer, id, draft.options).await?;
    log::info!("question {} created by author {} with {} options", id, author_id, options.len());
    Ok(Question {
        id,
        body: draft.body,
        author_id,
        options,
    })
}

/// Replaces body and options of a question owned by `author_id`.
pub async fn update_question<S>(storer: &mut S, author_id: i64, id: i64, draft: Draft) -> Result<Question, Error>
where
    S: Store,
{
    let existing = QuestionCommon::get(storer, id).await?;
    if existing.author_id != author_id {
        log::warn!("author {} tried to update question {} owned by {}", author_id, id, existing.author_id);
        return Err(Error::Unauthorized);
    }
    QuestionCommon::update(storer, id, QuestionUpdate { body: draft.body.clone() }).await?;
    let options = QuestionOptionCommon::bulk_replace(storer, id, draft.options).await?;
    log::info!("question {} updated, {} options", id, options.len());
    Ok(Question {
        id,
        body: draft.body,
        author_id: existing.author_id,
        options,
    })
}

/// Any authenticated caller may delete, and an unknown id is not an error.
pub async fn delete_question<S>(storer: &mut S, id: i64) -> Result<(), Error>
where
    S: Store,
{
    QuestionCommon::delete(storer, id).await?;
    log::info!("question {} deleted", id);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::filter::QuestionFilter;
    use crate::core::models::option::Insert as OptionInsert;
    use crate::database::sqlite::{test_manager, SqliteStoreManager};

    fn draft(body: &str, options: &[(&str, bool)]) -> Draft {
        Draft {
            body: body.into(),
            options: options
                .iter()
                .map(|(b, c)| OptionInsert {
                    body: (*b).into(),
                    correct: *c,
                })
                .collect(),
        }
    }

    async fn manager() -> SqliteStoreManager {
        test_manager().await
    }

    #[actix_web::test]
    async fn test_create_then_list_round_trip() {
        let manager = manager().await;
        let mut store = manager.acquire().await.unwrap();
        let created = store
            .run_in_transaction(|tx| Box::pin(create_question(tx, 7, draft("capital of France?", &[("Paris", true), ("Lyon", false)]))))
            .await
            .unwrap();
        assert_eq!(created.options.len(), 2);
        assert!(created.options.iter().all(|o| o.question_id == created.id));
        assert!(created.options[0].id < created.options[1].id);

        let listed = list_questions(&mut store, Pagination::default(), &QuestionFilter::default()).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[actix_web::test]
    async fn test_update_by_other_author_changes_nothing() {
        let manager = manager().await;
        let mut store = manager.acquire().await.unwrap();
        let created = store.run_in_transaction(|tx| Box::pin(create_question(tx, 1, draft("q", &[("A", true)])))).await.unwrap();

        let id = created.id;
        let res = store.run_in_transaction(|tx| Box::pin(update_question(tx, 2, id, draft("hijacked", &[("B", false)])))).await;
        assert!(matches!(res, Err(Error::Unauthorized)));

        let listed = list_questions(&mut store, Pagination::default(), &()).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[actix_web::test]
    async fn test_update_replaces_options() {
        let manager = manager().await;
        let mut store = manager.acquire().await.unwrap();
        let created = store.run_in_transaction(|tx| Box::pin(create_question(tx, 1, draft("q", &[("A", true), ("B", false)])))).await.unwrap();

        let id = created.id;
        let updated = store.run_in_transaction(|tx| Box::pin(update_question(tx, 1, id, draft("q2", &[("C", false)])))).await.unwrap();
        assert_eq!(updated.body, "q2");
        assert_eq!(updated.options.len(), 1);
        assert!(updated.options[0].id > created.options[1].id);

        let listed = list_questions(&mut store, Pagination::default(), &()).await.unwrap();
        assert_eq!(listed, vec![updated]);
    }

    #[actix_web::test]
    async fn test_update_unknown_question() {
        let manager = manager().await;
        let mut store = manager.acquire().await.unwrap();
        let res = store.run_in_transaction(|tx| Box::pin(update_question(tx, 1, 42, draft("q", &[])))).await;
        assert!(matches!(res, Err(Error::NotFound)));
    }

    #[actix_web::test]
    async fn test_delete_twice() {
        let manager = manager().await;
        let mut store = manager.acquire().await.unwrap();
        let created = store.run_in_transaction(|tx| Box::pin(create_question(tx, 1, draft("q", &[("A", true)])))).await.unwrap();
        delete_question(&mut store, created.id).await.unwrap();
        delete_question(&mut store, created.id).await.unwrap();
        delete_question(&mut store, 999).await.unwrap();
        assert!(list_questions(&mut store, Pagination::default(), &()).await.unwrap().is_empty());
    }
}
