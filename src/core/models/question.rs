use crate::core::models::option::{Insert as OptionInsert, OptionCreate, QuestionOption};
use crate::validation::ValidationErrors;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub body: String,
    pub author_id: i64,
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub body: String,
    pub author_id: i64,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub body: String,
}

/// Question body as sent by a client for both create and update. Ids and author are never read
/// from here.
#[derive(Debug, Clone, Deserialize)]
pub struct Create {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub options: Vec<OptionCreate>,
}

/// A validated [`Create`] with every correctness flag resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub body: String,
    pub options: Vec<OptionInsert>,
}

impl TryFrom<Create> for Draft {
    type Error = ValidationErrors;

    fn try_from(create: Create) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::default();
        if create.body.is_empty() {
            errors.add("body", "required");
        }
        let mut options = Vec::with_capacity(create.options.len());
        for (i, opt) in create.options.into_iter().enumerate() {
            if opt.body.is_empty() {
                errors.add(format!("options[{}].body", i), "required");
            }
            match opt.correct.resolve() {
                Some(correct) => options.push(OptionInsert { body: opt.body, correct }),
                None => errors.add(format!("options[{}].correct", i), "required"),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Draft { body: create.body, options })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::option::Correctness;

    #[test]
    fn test_draft_from_create() {
        let create = Create {
            body: "q".into(),
            options: vec![
                OptionCreate {
                    body: "A".into(),
                    correct: Correctness::True,
                },
                OptionCreate {
                    body: "B".into(),
                    correct: Correctness::False,
                },
            ],
        };
        let draft = Draft::try_from(create).unwrap();
        assert_eq!(draft.body, "q");
        assert_eq!(
            draft.options,
            vec![
                OptionInsert { body: "A".into(), correct: true },
                OptionInsert { body: "B".into(), correct: false }
            ]
        );
    }

    #[test]
    fn test_draft_rejects_unset_flag() {
        let create = Create {
            body: "q".into(),
            options: vec![OptionCreate {
                body: "A".into(),
                correct: Correctness::Unset,
            }],
        };
        let errors = Draft::try_from(create).unwrap_err();
        assert_eq!(errors.get("options[0].correct"), Some(&["required"][..]));
    }
}
