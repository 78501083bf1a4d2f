use crate::serde::Serialize;
use crate::validation::ValidationErrors;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse { error: error.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse<'a> {
    #[serde(rename = "Errors")]
    errors: &'a ValidationErrors,
}

impl<'a> ValidationErrorResponse<'a> {
    pub fn new(errors: &'a ValidationErrors) -> Self {
        ValidationErrorResponse { errors }
    }
}
