use crate::stores::StoreError;
use actix_web::HttpResponse;
use actix_web::http::header::LOCATION;

/// Everything the unauthenticated surface can report back to a visitor.
///
/// Each operation returns one of these kinds; the route layer maps every
/// kind to a rendered page with its status code. Raw internals never reach
/// the client. `InvalidInput` and `NotFound` are deliberately rendered as
/// the same page so a probe cannot tell a malformed identifier apart from
/// an absent one.
#[derive(thiserror::Error)]
pub enum PublicError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Record not found")]
    NotFound,
    #[error("Feature not available")]
    FeatureDisabled,
    #[error("Nothing left to do")]
    NoPendingAction,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl std::fmt::Debug for PublicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<StoreError> for PublicError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => PublicError::NotFound,
            StoreError::Backend(e) => PublicError::Internal(e),
        }
    }
}

/// 307, so user agents replay the method against the destination.
pub fn temporary_redirect(location: &str) -> HttpResponse {
    HttpResponse::TemporaryRedirect()
        .insert_header((LOCATION, location))
        .finish()
}

pub fn is_empty_or_whitespace(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;

    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
