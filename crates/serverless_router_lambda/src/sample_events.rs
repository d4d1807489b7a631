//! Representative events for each scheme, used by `run_local` and the tests.

use serde_json::Value;

pub const SAMPLE_EVENTS: &[(&str, &str)] = &[
    (
        "LIST_STUDENTS_DIRECT",
        include_str!("../fixtures/events/list_students_direct.json"),
    ),
    (
        "LIST_STUDENTS_REST",
        include_str!("../fixtures/events/list_students_rest.json"),
    ),
    (
        "LIST_STUDENTS_GRAPHQL",
        include_str!("../fixtures/events/list_students_graphql.json"),
    ),
    (
        "GET_STUDENT_BY_STUDENT_ID_DIRECT",
        include_str!("../fixtures/events/get_student_direct.json"),
    ),
    (
        "GET_STUDENT_BY_STUDENT_ID_REST",
        include_str!("../fixtures/events/get_student_rest.json"),
    ),
    (
        "GET_STUDENT_BY_STUDENT_ID_GRAPHQL",
        include_str!("../fixtures/events/get_student_graphql.json"),
    ),
    (
        "SAVE_STUDENT_DIRECT",
        include_str!("../fixtures/events/save_student_direct.json"),
    ),
    (
        "SAVE_STUDENT_REST",
        include_str!("../fixtures/events/save_student_rest.json"),
    ),
    (
        "SAVE_STUDENT_GRAPHQL",
        include_str!("../fixtures/events/save_student_graphql.json"),
    ),
];

pub fn sample_event_names() -> impl Iterator<Item = &'static str> {
    SAMPLE_EVENTS.iter().map(|(name, _)| *name)
}

/// Parses the named sample event. `None` if there is no such sample.
pub fn sample_event(name: &str) -> Option<Result<Value, serde_json::Error>> {
    SAMPLE_EVENTS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, raw)| serde_json::from_str(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sample_event_is_valid_json_object() {
        for name in sample_event_names() {
            let event = sample_event(name)
                .expect("sample exists")
                .unwrap_or_else(|error| panic!("{name} should parse: {error}"));
            assert!(event.is_object(), "{name} should be an object");
        }
    }

    #[test]
    fn unknown_sample_is_none() {
        assert!(sample_event("DELETE_STUDENT_DIRECT").is_none());
    }
}
