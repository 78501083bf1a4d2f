use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: i64,
    pub body: String,
    pub correct: bool,
    pub question_id: i64,
}

/// Correctness as sent by a client. `Unset` covers both a missing field and `null`, so an
/// omitted flag can be told apart from an explicit `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<bool>")]
pub enum Correctness {
    #[default]
    Unset,
    True,
    False,
}

impl From<Option<bool>> for Correctness {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Correctness::Unset,
            Some(true) => Correctness::True,
            Some(false) => Correctness::False,
        }
    }
}

impl Correctness {
    pub fn resolve(self) -> Option<bool> {
        match self {
            Correctness::Unset => None,
            Correctness::True => Some(true),
            Correctness::False => Some(false),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionCreate {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub correct: Correctness,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert {
    pub body: String,
    pub correct: bool,
}
