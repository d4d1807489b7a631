//! Transport-agnostic request routing for serverless handlers.
//!
//! One business function can be registered under three addressing schemes
//! (direct invoke, API Gateway REST route key, AppSync GraphQL field) and is
//! handed the same flat argument map whichever transport triggered it. This
//! crate owns the registration tables, event classification, argument
//! normalization, and dispatch. It intentionally excludes AWS SDK, Lambda
//! runtime, and persistence concerns.

pub mod classifier;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod normalizer;
pub mod registry;

pub use classifier::{classify, ClassifiedEvent, Scheme};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, UnregisteredRouteError};
pub use handler::{handler_fn, Arguments, Handler, HandlerError, HandlerResult, SharedHandler};
pub use registry::{rest_route_key, DirectRoute, GraphQlRoute, Registry, RestRoute};
