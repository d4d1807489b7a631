use thiserror::Error;

use crate::classifier::Scheme;
use crate::handler::HandlerError;

/// No scheme matched the event, or the matched key has no registration.
///
/// The diagnostic concatenates whichever of `route`, `routeKey` and
/// `info.fieldName` the event carried, with absent fields contributing
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{diagnostic}\" has not been registered as a graphql, rest, or direct endpoint")]
pub struct UnregisteredRouteError {
    diagnostic: String,
}

impl UnregisteredRouteError {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
        }
    }

    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    UnregisteredRoute(#[from] UnregisteredRouteError),
    #[error("`{field}` must be a JSON object to build {scheme} arguments")]
    InvalidArguments { scheme: Scheme, field: &'static str },
    /// Raised by the handler itself and passed through untouched.
    #[error(transparent)]
    Handler(HandlerError),
}

impl DispatchError {
    pub fn is_unregistered_route(&self) -> bool {
        matches!(self, Self::UnregisteredRoute(_))
    }

    /// Unwraps the handler's own error, if that is what failed.
    pub fn into_handler_error(self) -> Result<HandlerError, Self> {
        match self {
            Self::Handler(error) => Ok(error),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_route_message_quotes_diagnostic() {
        let error = UnregisteredRouteError::new("GET /missing");
        assert_eq!(
            error.to_string(),
            "\"GET /missing\" has not been registered as a graphql, rest, or direct endpoint"
        );
    }

    #[test]
    fn handler_error_display_is_unchanged() {
        let error = DispatchError::Handler(HandlerError::from("student not found"));
        assert_eq!(error.to_string(), "student not found");
        assert!(!error.is_unregistered_route());

        let inner = error.into_handler_error().expect("handler error");
        assert_eq!(inner.to_string(), "student not found");
    }
}
