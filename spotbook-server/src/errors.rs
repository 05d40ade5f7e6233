use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use spotbook_core::{
    availability::{Conflict, DateRangeError},
    guard::GuardError,
    AuthError, BookingError, DatabaseError, ReviewError, SpotError,
};

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{resource} couldn't be found")]
    NotFound { resource: &'static str },
    #[error("{resource} with {field} of value {value} already exists")]
    AlreadyExists {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{0}")]
    Forbidden(String),
    #[error("Validation error")]
    Validation { errors: Vec<String> },
    #[error("Sorry, this spot is already booked for the specified dates")]
    BookingConflict { errors: Vec<String> },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unknown internal error: {0}")]
    Unknown(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyExists { .. } => StatusCode::CONFLICT,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            // Overlaps answer with 403 and a per-field errors array
            Self::BookingConflict { .. } => StatusCode::FORBIDDEN,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn errors(&self) -> Option<&[String]> {
        match self {
            Self::Validation { errors } | Self::BookingConflict { errors } => Some(errors),
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.as_status_code();

        let mut body = json!({
            "message": self.to_string(),
            "statusCode": status.as_u16(),
        });

        if let Some(errors) = self.errors() {
            body["errors"] = json!(errors);
        }

        (status, Json(body)).into_response()
    }
}

/// Turns classified conflicts into one message per affected field. An empty
/// list means the store detected the collision without telling us which
/// boundary, so both dates are reported.
fn conflict_messages(conflicts: &[Conflict]) -> Vec<String> {
    let start = conflicts.is_empty() || conflicts.iter().any(|c| c.kind.affects_start());
    let end = conflicts.is_empty() || conflicts.iter().any(|c| c.kind.affects_end());

    let mut errors = Vec::new();

    if start {
        errors.push("Start date conflicts with an existing booking".to_string());
    }
    if end {
        errors.push("End date conflicts with an existing booking".to_string());
    }

    errors
}

impl From<DatabaseError> for ServerError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound { resource, .. } => Self::NotFound { resource },
            DatabaseError::Conflict {
                resource,
                field,
                value,
            } => Self::AlreadyExists {
                resource,
                field,
                value,
            },
            DatabaseError::BookingCollision { .. } => Self::BookingConflict {
                errors: conflict_messages(&[]),
            },
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Db(e) => e.into(),
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<GuardError> for ServerError {
    fn from(value: GuardError) -> Self {
        match value {
            GuardError::NotOwner(_) => Self::Forbidden("Forbidden".to_string()),
            GuardError::BookingStarted => {
                Self::Forbidden("Bookings that have been started can't be deleted".to_string())
            }
        }
    }
}

impl From<BookingError> for ServerError {
    fn from(value: BookingError) -> Self {
        match value {
            BookingError::Conflict { conflicts } => Self::BookingConflict {
                errors: conflict_messages(&conflicts),
            },
            BookingError::Guard(e) => e.into(),
            BookingError::Db(e) => e.into(),
        }
    }
}

impl From<SpotError> for ServerError {
    fn from(value: SpotError) -> Self {
        match value {
            SpotError::Guard(e) => e.into(),
            SpotError::Db(e) => e.into(),
        }
    }
}

impl From<ReviewError> for ServerError {
    fn from(value: ReviewError) -> Self {
        match value {
            ReviewError::Guard(e) => e.into(),
            ReviewError::Db(e) => e.into(),
        }
    }
}

impl From<DateRangeError> for ServerError {
    fn from(value: DateRangeError) -> Self {
        Self::Validation {
            errors: vec![value.to_string()],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use spotbook_core::{
        availability::{ConflictKind, DateRange},
        BookingData,
    };

    fn conflict(kind: ConflictKind) -> Conflict {
        Conflict {
            kind,
            booking: BookingData {
                id: 1,
                spot_id: 1,
                user_id: 1,
                start_date: "2024-06-01".parse().expect("valid date"),
                end_date: "2024-06-05".parse().expect("valid date"),
            },
        }
    }

    #[test]
    fn start_conflicts_report_only_the_start_field() {
        let error: ServerError = BookingError::Conflict {
            conflicts: vec![conflict(ConflictKind::Start)],
        }
        .into();

        match error {
            ServerError::BookingConflict { errors } => {
                assert_eq!(errors, vec!["Start date conflicts with an existing booking"]);
            }
            other => panic!("expected a booking conflict, got {other:?}"),
        }
    }

    #[test]
    fn containment_reports_both_fields() {
        let error: ServerError = BookingError::Conflict {
            conflicts: vec![conflict(ConflictKind::Both)],
        }
        .into();

        match error {
            ServerError::BookingConflict { errors } => {
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected a booking conflict, got {other:?}"),
        }
    }

    #[test]
    fn store_detected_collisions_report_both_fields() {
        let error: ServerError = BookingError::Conflict { conflicts: vec![] }.into();

        match error {
            ServerError::BookingConflict { errors } => assert_eq!(errors.len(), 2),
            other => panic!("expected a booking conflict, got {other:?}"),
        }
    }

    #[test]
    fn invalid_ranges_are_validation_errors() {
        let error: ServerError =
            DateRange::new(
                "2024-06-05".parse().expect("valid date"),
                "2024-06-01".parse().expect("valid date"),
            )
            .expect_err("range is inverted")
            .into();

        assert!(matches!(error, ServerError::Validation { .. }));
        assert_eq!(error.as_status_code(), StatusCode::BAD_REQUEST);
    }
}
