//! Student business functions and their route registrations.
//!
//! Every function is reachable through all three schemes:
//!
//! | function        | direct          | rest                        | graphql                |
//! |-----------------|-----------------|-----------------------------|------------------------|
//! | `list_students` | `list_students` | `GET /students`             | `Query.listStudents`   |
//! | `get_student`   | `get_student`   | `GET /students/{studentId}` | `Query.getStudent`     |
//! | `save_student`  | `save_student`  | `PUT /students`             | `Mutation.saveStudent` |

use std::future::Future;
use std::sync::Arc;

use serde_json::{json, Value};
use serverless_router_core::{handler_fn, Arguments, HandlerError, Registry, SharedHandler};
use thiserror::Error;
use tracing::debug;

use crate::adapters::database::DatabaseError;
use crate::adapters::student_store::StudentRepository;
use crate::casing::{camelfy, CasingError};

pub const STUDENT_ID_ARGUMENT: &str = "studentId";

#[derive(Debug, Error)]
pub enum StudentHandlerError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("failed to serialize student rows: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Casing(#[from] CasingError),
    #[error("missing required argument '{0}'")]
    MissingArgument(&'static str),
    #[error("argument '{name}' must be an integer, got {value}")]
    InvalidArgument { name: &'static str, value: Value },
}

pub async fn list_students(
    repository: &dyn StudentRepository,
    _arguments: Arguments,
) -> Result<Value, StudentHandlerError> {
    let rows = repository.list_students().await?;
    Ok(camelfy(serde_json::to_value(rows)?)?)
}

pub async fn get_student(
    repository: &dyn StudentRepository,
    arguments: Arguments,
) -> Result<Value, StudentHandlerError> {
    let student_id = student_id_argument(&arguments)?;
    let row = repository.get_student(student_id).await?;
    Ok(camelfy(serde_json::to_value(row)?)?)
}

/// Acknowledges the write; persistence is not wired up yet.
pub async fn save_student(arguments: Arguments) -> Result<Value, StudentHandlerError> {
    debug!(fields = arguments.len(), "save_student accepted");
    Ok(json!({ "statusCode": 202 }))
}

/// Reads `studentId`, which arrives as a string from REST and direct calls
/// and as a number from GraphQL.
fn student_id_argument(arguments: &Arguments) -> Result<i64, StudentHandlerError> {
    let value = arguments
        .get(STUDENT_ID_ARGUMENT)
        .filter(|value| !value.is_null())
        .ok_or(StudentHandlerError::MissingArgument(STUDENT_ID_ARGUMENT))?;

    let parsed = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| StudentHandlerError::InvalidArgument {
        name: STUDENT_ID_ARGUMENT,
        value: value.clone(),
    })
}

fn repository_handler<F, Fut>(
    repository: &Arc<dyn StudentRepository>,
    function: F,
) -> SharedHandler
where
    F: Fn(Arc<dyn StudentRepository>, Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, StudentHandlerError>> + Send + 'static,
{
    let repository = repository.clone();
    handler_fn(move |arguments| {
        let call = function(repository.clone(), arguments);
        async move { call.await.map_err(HandlerError::from) }
    })
}

pub fn register_student_routes(
    registry: &mut Registry,
    repository: Arc<dyn StudentRepository>,
) {
    let list = repository_handler(&repository, |repository, arguments| async move {
        list_students(repository.as_ref(), arguments).await
    });
    registry
        .register_direct("list_students", list.clone())
        .register_rest("GET", "/students", list.clone())
        .register_graphql("Query", "listStudents", list, None);

    let get = repository_handler(&repository, |repository, arguments| async move {
        get_student(repository.as_ref(), arguments).await
    });
    registry
        .register_direct("get_student", get.clone())
        .register_rest("GET", "/students/{studentId}", get.clone())
        .register_graphql("Query", "getStudent", get, None);

    let save = handler_fn(|arguments| async move {
        save_student(arguments).await.map_err(HandlerError::from)
    });
    registry
        .register_direct("save_student", save.clone())
        .register_rest("PUT", "/students", save.clone())
        .register_graphql("Mutation", "saveStudent", save, None);
}
