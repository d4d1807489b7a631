use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Flat argument map handed to every handler, whichever scheme matched.
pub type Arguments = Map<String, Value>;

/// Handler failures are opaque to the router and surface unmodified.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult = Result<Value, HandlerError>;

/// A business function reachable through the router.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, arguments: Arguments) -> HandlerResult;
}

/// Handlers are shared so one function can sit in several scheme tables.
pub type SharedHandler = Arc<dyn Handler>;

struct FnHandler<F> {
    function: F,
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn call(&self, arguments: Arguments) -> HandlerResult {
        (self.function)(arguments).await
    }
}

/// Wraps an async closure as a [`SharedHandler`].
pub fn handler_fn<F, Fut>(function: F) -> SharedHandler
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(FnHandler { function })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn closure_handler_receives_arguments() {
        let handler = handler_fn(|arguments: Arguments| async move {
            HandlerResult::Ok(json!({ "echo": Value::Object(arguments) }))
        });

        let mut arguments = Arguments::new();
        arguments.insert("studentId".to_string(), json!("7"));

        let result = handler.call(arguments).await.expect("handler should succeed");
        assert_eq!(result, json!({ "echo": { "studentId": "7" } }));
    }

    #[tokio::test]
    async fn closure_handler_errors_pass_through() {
        let handler = handler_fn(|_arguments: Arguments| async move {
            HandlerResult::Err(HandlerError::from("boom"))
        });

        let error = handler
            .call(Arguments::new())
            .await
            .expect_err("handler should fail");
        assert_eq!(error.to_string(), "boom");
    }
}
