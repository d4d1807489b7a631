//! Registration tables for the three addressing schemes.
//!
//! Each scheme owns a disjoint key space. Registering the same key twice
//! replaces the earlier entry, which lets tests swap in their own handlers.
//! The registry is populated before serving and is then shared immutably.

use std::collections::HashMap;
use std::fmt;

use crate::handler::SharedHandler;

/// Builds the API Gateway route key, e.g. `GET /students/{studentId}`.
pub fn rest_route_key(method: &str, path: &str) -> String {
    format!("{method} {path}")
}

#[derive(Clone)]
pub struct DirectRoute {
    name: String,
    handler: SharedHandler,
}

impl DirectRoute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &SharedHandler {
        &self.handler
    }
}

impl fmt::Debug for DirectRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectRoute")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct RestRoute {
    method: String,
    path: String,
    handler: SharedHandler,
}

impl RestRoute {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route_key(&self) -> String {
        rest_route_key(&self.method, &self.path)
    }

    pub fn handler(&self) -> &SharedHandler {
        &self.handler
    }
}

impl fmt::Debug for RestRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestRoute")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct GraphQlRoute {
    parent_type: String,
    field_name: String,
    id_field: Option<String>,
    handler: SharedHandler,
}

impl GraphQlRoute {
    /// Parent type of the resolved field, e.g. `Query` or `Mutation`.
    pub fn parent_type(&self) -> &str {
        &self.parent_type
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Field on the parent object carrying the child identifier, for nested
    /// resolvers such as `Term.students` keyed by `termId`.
    pub fn id_field(&self) -> Option<&str> {
        self.id_field.as_deref()
    }

    pub fn handler(&self) -> &SharedHandler {
        &self.handler
    }
}

impl fmt::Debug for GraphQlRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQlRoute")
            .field("parent_type", &self.parent_type)
            .field("field_name", &self.field_name)
            .field("id_field", &self.id_field)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Registry {
    direct: HashMap<String, DirectRoute>,
    rest: HashMap<String, RestRoute>,
    graphql: HashMap<String, GraphQlRoute>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_direct(
        &mut self,
        name: impl Into<String>,
        handler: SharedHandler,
    ) -> &mut Self {
        let name = name.into();
        self.direct.insert(name.clone(), DirectRoute { name, handler });
        self
    }

    pub fn register_rest(
        &mut self,
        method: impl Into<String>,
        path: impl Into<String>,
        handler: SharedHandler,
    ) -> &mut Self {
        let route = RestRoute {
            method: method.into(),
            path: path.into(),
            handler,
        };
        self.rest.insert(route.route_key(), route);
        self
    }

    pub fn register_graphql(
        &mut self,
        parent_type: impl Into<String>,
        field_name: impl Into<String>,
        handler: SharedHandler,
        id_field: Option<&str>,
    ) -> &mut Self {
        let field_name = field_name.into();
        self.graphql.insert(
            field_name.clone(),
            GraphQlRoute {
                parent_type: parent_type.into(),
                field_name,
                id_field: id_field.map(str::to_string),
                handler,
            },
        );
        self
    }

    pub fn find_direct(&self, name: &str) -> Option<&DirectRoute> {
        self.direct.get(name)
    }

    pub fn find_rest(&self, method: &str, path: &str) -> Option<&RestRoute> {
        self.find_rest_key(&rest_route_key(method, path))
    }

    /// Looks up a REST route by its literal `"METHOD PATH"` key. Matching is
    /// exact: no case folding and no whitespace normalization.
    pub fn find_rest_key(&self, route_key: &str) -> Option<&RestRoute> {
        self.rest.get(route_key)
    }

    pub fn find_graphql(&self, field_name: &str) -> Option<&GraphQlRoute> {
        self.graphql.get(field_name)
    }

    pub fn direct_routes(&self) -> impl Iterator<Item = &DirectRoute> {
        self.direct.values()
    }

    pub fn rest_endpoints(&self) -> impl Iterator<Item = &RestRoute> {
        self.rest.values()
    }

    pub fn graphql_endpoints(&self) -> impl Iterator<Item = &GraphQlRoute> {
        self.graphql.values()
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.rest.is_empty() && self.graphql.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::handler::{handler_fn, Arguments, HandlerResult};

    fn fixed(value: serde_json::Value) -> SharedHandler {
        handler_fn(move |_arguments: Arguments| {
            let value = value.clone();
            async move { HandlerResult::Ok(value) }
        })
    }

    #[test]
    fn rest_route_key_joins_method_and_path_with_single_space() {
        assert_eq!(rest_route_key("GET", "/students"), "GET /students");
    }

    #[test]
    fn lookups_report_missing_keys_as_none() {
        let registry = Registry::new();

        assert!(registry.is_empty());
        assert!(registry.find_direct("list_students").is_none());
        assert!(registry.find_rest("GET", "/students").is_none());
        assert!(registry.find_graphql("listStudents").is_none());
    }

    #[test]
    fn one_handler_can_be_registered_under_every_scheme() {
        let handler = fixed(json!([]));
        let mut registry = Registry::new();
        registry
            .register_direct("list_students", handler.clone())
            .register_rest("GET", "/students", handler.clone())
            .register_graphql("Query", "listStudents", handler.clone(), None);

        let direct = registry.find_direct("list_students").expect("direct route");
        let rest = registry.find_rest("GET", "/students").expect("rest route");
        let graphql = registry.find_graphql("listStudents").expect("graphql route");

        assert!(Arc::ptr_eq(direct.handler(), &handler));
        assert!(Arc::ptr_eq(rest.handler(), &handler));
        assert!(Arc::ptr_eq(graphql.handler(), &handler));
        assert_eq!(rest.method(), "GET");
        assert_eq!(rest.path(), "/students");
        assert_eq!(graphql.parent_type(), "Query");
        assert_eq!(graphql.id_field(), None);
    }

    #[test]
    fn later_registration_replaces_earlier_entry() {
        let first = fixed(json!("first"));
        let second = fixed(json!("second"));
        let mut registry = Registry::new();
        registry.register_rest("GET", "/students", first);
        registry.register_rest("GET", "/students", second.clone());

        let route = registry.find_rest_key("GET /students").expect("rest route");
        assert!(Arc::ptr_eq(route.handler(), &second));
        assert_eq!(registry.rest_endpoints().count(), 1);
    }

    #[test]
    fn rest_keys_match_literally() {
        let mut registry = Registry::new();
        registry.register_rest("GET", "/students", fixed(json!(null)));

        assert!(registry.find_rest_key("GET /students").is_some());
        assert!(registry.find_rest_key("get /students").is_none());
        assert!(registry.find_rest_key("GET  /students").is_none());
        assert!(registry.find_rest_key("GET /students/").is_none());
    }

    #[test]
    fn graphql_entry_keeps_parent_and_id_field() {
        let mut registry = Registry::new();
        registry.register_graphql("Term", "students", fixed(json!([])), Some("termId"));

        let route = registry.find_graphql("students").expect("graphql route");
        assert_eq!(route.parent_type(), "Term");
        assert_eq!(route.field_name(), "students");
        assert_eq!(route.id_field(), Some("termId"));
    }

    #[test]
    fn scheme_key_spaces_are_disjoint() {
        let mut registry = Registry::new();
        registry.register_direct("GET /students", fixed(json!(null)));

        assert!(registry.find_rest_key("GET /students").is_none());
        assert!(registry.find_graphql("GET /students").is_none());
    }
}
