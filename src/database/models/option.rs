use crate::core::models::option::QuestionOption;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Opt {
    pub id: i64,
    pub body: String,
    pub correct: bool,
    pub question_id: i64,
}

impl From<Opt> for QuestionOption {
    fn from(row: Opt) -> Self {
        QuestionOption {
            id: row.id,
            body: row.body,
            correct: row.correct,
            question_id: row.question_id,
        }
    }
}
