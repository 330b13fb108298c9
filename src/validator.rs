use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};
use welding_admin_core::AppError;

/// Joins field messages, reporting each distinct message once.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    for (field, errors) in fields {
        for error in errors {
            let message = error
                .message
                .as_ref()
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field));
            if !messages.contains(&message) {
                messages.push(message);
            }
        }
    }
    messages.join(", ")
}

/// JSON body that has passed `validator` checks.
///
/// Every rejection, malformed JSON included, is a 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::MissingJsonContentType(_) => {
                    AppError::bad_request(anyhow::anyhow!(
                        "Missing 'Content-Type: application/json' header"
                    ))
                }
                JsonRejection::JsonDataError(_) => {
                    AppError::bad_request(anyhow::anyhow!("Invalid field type in request"))
                }
                _ => AppError::bad_request(anyhow::anyhow!("Invalid request body")),
            })?;

        value
            .validate()
            .map_err(|errors| AppError::bad_request(anyhow::anyhow!("{}", format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}
