//! Request schemas and the extractor that validates them

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::errors::ServerError;

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterSchema {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 30))]
    pub username: String,
    #[validate(length(min = 8, max = 64))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginSchema {
    /// Email or username
    #[validate(length(min = 1, max = 128))]
    pub credential: String,
    #[validate(length(min = 1, max = 64))]
    pub password: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSpotSchema {
    #[validate(length(min = 1, max = 256))]
    pub address: String,
    #[validate(length(min = 1, max = 128))]
    pub city: String,
    #[validate(length(min = 1, max = 128))]
    pub state: String,
    #[validate(length(min = 1, max = 128))]
    pub country: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSpotSchema {
    #[validate(length(min = 1, max = 256))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub country: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpotImageSchema {
    #[validate(url)]
    pub url: String,
    #[serde(default)]
    pub preview: bool,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewReviewSchema {
    #[validate(length(min = 1))]
    pub review: String,
    #[validate(range(min = 1, max = 5))]
    pub stars: i32,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateReviewSchema {
    #[validate(length(min = 1))]
    pub review: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub stars: Option<i32>,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReviewImageSchema {
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BookingSchema {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extracted_json: Json<T> =
            Json::from_request(req, state)
                .await
                .map_err(|e| ServerError::Validation {
                    errors: vec![e.to_string()],
                })?;

        extracted_json
            .0
            .validate()
            .map_err(|e| ServerError::Validation {
                errors: flatten_errors(e),
            })?;

        Ok(Self(extracted_json.0))
    }
}

fn flatten_errors(errors: ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let reason = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());

                format!("{field}: {reason}")
            })
        })
        .collect()
}
