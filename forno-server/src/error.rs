//! Bridging repository and validation errors into the API error
//!
//! Handlers return [`AppError`] and propagate repository failures with `?`.
//! Database failures are logged here and reach the client as a generic
//! `DATABASE_ERROR`; not-found/duplicate/validation pass through with their
//! message.

use shared::error::{AppError, ErrorCode};
use validator::{Validate, ValidationErrors};

use crate::db::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

/// Run `validator` rules, rendering field errors into `detalhes`
pub fn validate<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut err = AppError::new(ErrorCode::ValidationFailed);
    for (field, kind) in errors.into_errors() {
        let codes: Vec<String> = match kind {
            validator::ValidationErrorsKind::Field(list) => {
                list.iter().map(|e| e.code.to_string()).collect()
            }
            validator::ValidationErrorsKind::Struct(_) | validator::ValidationErrorsKind::List(_) => {
                vec!["invalid".to_string()]
            }
        };
        err = err.with_detail(field.to_string(), codes);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ReviewCreate;

    #[test]
    fn repo_errors_map_to_codes() {
        let err: AppError = RepoError::Duplicate("email".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        let err: AppError = RepoError::Database("disk".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, ErrorCode::DatabaseError.message());
    }

    #[test]
    fn validation_details_name_the_field() {
        let err = validate(&ReviewCreate {
            rating: 9,
            comment: None,
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert!(details.contains_key("rating"));
    }
}
