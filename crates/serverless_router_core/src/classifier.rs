//! Event shape detection.
//!
//! Rules are checked in a fixed order and the first match wins:
//!
//! 1. `route` naming a registered direct route.
//! 2. `routeKey` naming a registered REST route.
//! 3. `info.fieldName` present, registered or not.
//!
//! Rule 3 does not consult the registry, so an unknown GraphQL field is only
//! rejected later, at lookup. Direct and REST events fall through to the next
//! rule when their key is unknown.

use std::fmt;

use serde_json::{Map, Value};
use tracing::info;

use crate::error::UnregisteredRouteError;
use crate::registry::Registry;

pub const ROUTE_FIELD: &str = "route";
pub const ROUTE_KEY_FIELD: &str = "routeKey";
pub const INFO_FIELD: &str = "info";
pub const FIELD_NAME_FIELD: &str = "fieldName";
pub const PARENT_TYPE_NAME_FIELD: &str = "parentTypeName";
pub const ARGUMENTS_FIELD: &str = "arguments";
pub const QUERY_STRING_PARAMETERS_FIELD: &str = "queryStringParameters";
pub const PATH_PARAMETERS_FIELD: &str = "pathParameters";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Direct,
    Rest,
    GraphQl,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::Rest => "rest",
            Self::GraphQl => "graphql",
        })
    }
}

/// An inbound event after shape detection, carrying only the material its
/// scheme needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedEvent {
    Direct {
        route: String,
        event: Map<String, Value>,
    },
    Rest {
        route_key: String,
        query_string_parameters: Option<Value>,
        path_parameters: Option<Value>,
    },
    GraphQl {
        field_name: String,
        parent_type_name: Option<String>,
        arguments: Option<Value>,
        /// Kept for the error raised when the field turns out unregistered.
        diagnostic: String,
    },
}

impl ClassifiedEvent {
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::Direct { .. } => Scheme::Direct,
            Self::Rest { .. } => Scheme::Rest,
            Self::GraphQl { .. } => Scheme::GraphQl,
        }
    }

    /// The key this event is looked up by within its scheme.
    pub fn key(&self) -> &str {
        match self {
            Self::Direct { route, .. } => route,
            Self::Rest { route_key, .. } => route_key,
            Self::GraphQl { field_name, .. } => field_name,
        }
    }
}

pub fn classify(
    registry: &Registry,
    event: Value,
) -> Result<ClassifiedEvent, UnregisteredRouteError> {
    let Value::Object(mut event) = event else {
        return Err(UnregisteredRouteError::new(""));
    };

    if let Some(route) = string_field(&event, ROUTE_FIELD) {
        if registry.find_direct(route).is_some() {
            let route = route.to_string();
            info!(route = %route, "resolved direct route");
            return Ok(ClassifiedEvent::Direct { route, event });
        }
    }

    if let Some(route_key) = string_field(&event, ROUTE_KEY_FIELD) {
        if registry.find_rest_key(route_key).is_some() {
            let route_key = route_key.to_string();
            info!(route_key = %route_key, "resolved rest route");
            return Ok(ClassifiedEvent::Rest {
                route_key,
                query_string_parameters: take_present(&mut event, QUERY_STRING_PARAMETERS_FIELD),
                path_parameters: take_present(&mut event, PATH_PARAMETERS_FIELD),
            });
        }
    }

    let graphql_info = event
        .get(INFO_FIELD)
        .and_then(Value::as_object)
        .and_then(|info| {
            let field_name = info.get(FIELD_NAME_FIELD)?.as_str()?.to_string();
            let parent_type_name = info
                .get(PARENT_TYPE_NAME_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string);
            Some((field_name, parent_type_name))
        });

    if let Some((field_name, parent_type_name)) = graphql_info {
        info!(field_name = %field_name, "resolved graphql field");
        let diagnostic = route_diagnostic(&event);
        return Ok(ClassifiedEvent::GraphQl {
            field_name,
            parent_type_name,
            arguments: take_present(&mut event, ARGUMENTS_FIELD),
            diagnostic,
        });
    }

    Err(UnregisteredRouteError::new(route_diagnostic(&event)))
}

/// Concatenates `route`, `routeKey` and `info.fieldName`, skipping absent
/// fields.
pub fn route_diagnostic(event: &Map<String, Value>) -> String {
    let field_name = event
        .get(INFO_FIELD)
        .and_then(Value::as_object)
        .and_then(|info| info.get(FIELD_NAME_FIELD));

    [
        event.get(ROUTE_FIELD),
        event.get(ROUTE_KEY_FIELD),
        field_name,
    ]
    .into_iter()
    .map(diagnostic_text)
    .collect()
}

fn diagnostic_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn string_field<'a>(event: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    event.get(field).and_then(Value::as_str)
}

/// Removes a field, treating an explicit `null` as absent. API Gateway sends
/// `null` parameter maps when a request has none.
fn take_present(event: &mut Map<String, Value>, field: &str) -> Option<Value> {
    event.remove(field).filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::handler::{handler_fn, Arguments, HandlerResult, SharedHandler};

    fn noop() -> SharedHandler {
        handler_fn(|_arguments: Arguments| async move { HandlerResult::Ok(Value::Null) })
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register_direct("list_students", noop())
            .register_rest("GET", "/students", noop())
            .register_graphql("Query", "listStudents", noop(), None);
        registry
    }

    #[test]
    fn registered_route_classifies_as_direct_with_whole_event() {
        let event = json!({ "route": "list_students", "studentId": "1" });

        let classified = classify(&registry(), event.clone()).expect("direct event");
        assert_eq!(classified.scheme(), Scheme::Direct);
        assert_eq!(classified.key(), "list_students");
        let ClassifiedEvent::Direct { event: raw, .. } = classified else {
            panic!("expected direct event");
        };
        assert_eq!(Value::Object(raw), event);
    }

    #[test]
    fn route_wins_over_route_key() {
        let event = json!({ "route": "list_students", "routeKey": "GET /students" });

        let classified = classify(&registry(), event).expect("direct event");
        assert_eq!(classified.scheme(), Scheme::Direct);
    }

    #[test]
    fn unknown_route_falls_through_to_route_key() {
        let event = json!({ "route": "nope", "routeKey": "GET /students" });

        let classified = classify(&registry(), event).expect("rest event");
        assert_eq!(classified.scheme(), Scheme::Rest);
        assert_eq!(classified.key(), "GET /students");
    }

    #[test]
    fn unknown_route_key_falls_through_to_graphql() {
        let event = json!({
            "routeKey": "GET /unknown",
            "info": { "fieldName": "listStudents", "parentTypeName": "Query" },
            "arguments": {}
        });

        let classified = classify(&registry(), event).expect("graphql event");
        let ClassifiedEvent::GraphQl {
            field_name,
            parent_type_name,
            diagnostic,
            ..
        } = classified
        else {
            panic!("expected graphql event");
        };
        assert_eq!(field_name, "listStudents");
        assert_eq!(parent_type_name.as_deref(), Some("Query"));
        assert_eq!(diagnostic, "GET /unknownlistStudents");
    }

    #[test]
    fn graphql_shape_is_accepted_without_registration() {
        let event = json!({ "info": { "fieldName": "listTerms" }, "arguments": {} });

        let classified = classify(&Registry::new(), event).expect("graphql event");
        assert_eq!(classified.scheme(), Scheme::GraphQl);
        assert_eq!(classified.key(), "listTerms");
    }

    #[test]
    fn null_parameter_maps_are_treated_as_absent() {
        let event = json!({
            "routeKey": "GET /students",
            "queryStringParameters": null,
            "pathParameters": { "studentId": "1" }
        });

        let classified = classify(&registry(), event).expect("rest event");
        let ClassifiedEvent::Rest {
            query_string_parameters,
            path_parameters,
            ..
        } = classified
        else {
            panic!("expected rest event");
        };
        assert!(query_string_parameters.is_none());
        assert_eq!(path_parameters, Some(json!({ "studentId": "1" })));
    }

    #[test]
    fn unmatched_event_reports_present_discriminators() {
        let event = json!({ "route": "nope", "routeKey": "DELETE /students" });

        let error = classify(&registry(), event).expect_err("no scheme should match");
        assert_eq!(error.diagnostic(), "nopeDELETE /students");
    }

    #[test]
    fn event_without_discriminators_has_empty_diagnostic() {
        let error = classify(&registry(), json!({ "body": "{}" })).expect_err("no scheme");
        assert_eq!(error.diagnostic(), "");
    }

    #[test]
    fn non_object_event_is_unregistered() {
        let error = classify(&registry(), json!(["list_students"])).expect_err("not an object");
        assert_eq!(error.diagnostic(), "");
    }

    #[test]
    fn info_without_field_name_is_not_graphql() {
        let event = json!({ "info": { "parentTypeName": "Query" } });

        assert!(classify(&registry(), event).is_err());
    }
}
