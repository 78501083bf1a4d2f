use crate::serde::Deserialize;

/// Body of `GET /questions`. Every field is optional and an empty body lists the first page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuestions {
    pub last_id: Option<i64>,
    pub page_size: Option<u32>,
    pub author_id: Option<i64>,
}
