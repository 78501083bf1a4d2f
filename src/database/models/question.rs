use crate::core::models::question::Question as CoreQuestion;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: i64,
    pub body: String,
    pub author_id: i64,
}

impl From<Question> for CoreQuestion {
    fn from(row: Question) -> Self {
        CoreQuestion {
            id: row.id,
            body: row.body,
            author_id: row.author_id,
            options: Vec::new(),
        }
    }
}
