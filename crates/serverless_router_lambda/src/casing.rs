//! Field-name casing helpers for turning snake_case database rows into the
//! camelCase payloads the API serves.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("camelfy expects an object, an array of objects, or null, got {found}")]
pub struct CasingError {
    found: &'static str,
}

/// `studentId` -> `student_id`, `HTTPResponse` -> `http_response`.
pub fn to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut snake = String::with_capacity(name.len() + 4);

    for (index, &current) in chars.iter().enumerate() {
        if current.is_uppercase() && index > 0 {
            let previous = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(|next| next.is_lowercase());
            let after_word = previous.is_lowercase() || previous.is_ascii_digit();
            let ends_acronym = previous.is_uppercase() && next_is_lower;
            if (after_word || ends_acronym) && previous != '_' {
                snake.push('_');
            }
        }
        snake.extend(current.to_lowercase());
    }

    snake
}

/// `student_id` -> `studentId`. The first component is kept as is; later
/// components are title-cased.
pub fn to_camel(name: &str) -> String {
    let mut components = name.split('_');
    let mut camel = components.next().unwrap_or_default().to_string();
    for component in components {
        camel.push_str(&title_case(component));
    }
    camel
}

fn title_case(word: &str) -> String {
    let mut titled = String::with_capacity(word.len());
    let mut at_word_start = true;
    for character in word.chars() {
        if character.is_alphabetic() {
            if at_word_start {
                titled.extend(character.to_uppercase());
            } else {
                titled.extend(character.to_lowercase());
            }
            at_word_start = false;
        } else {
            titled.push(character);
            at_word_start = true;
        }
    }
    titled
}

/// Renames the keys of an object, or of every object in an array, to
/// camelCase. Values are left untouched and `null` passes through.
pub fn camelfy(value: Value) -> Result<Value, CasingError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Object(object) => Ok(Value::Object(camelfy_object(object))),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(object) => Ok(Value::Object(camelfy_object(object))),
                other => Err(CasingError {
                    found: type_name(&other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Err(CasingError {
            found: type_name(&other),
        }),
    }
}

fn camelfy_object(object: Map<String, Value>) -> Map<String, Value> {
    object
        .into_iter()
        .map(|(key, value)| (to_camel(&key), value))
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake("studentId"), "student_id");
        assert_eq!(to_snake("StudentUuid"), "student_uuid");
        assert_eq!(to_snake("getHTTPResponseCode"), "get_http_response_code");
        assert_eq!(to_snake("program2Id"), "program2_id");
        assert_eq!(to_snake("already_snake"), "already_snake");
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(to_camel("student_id"), "studentId");
        assert_eq!(to_camel("first_name"), "firstName");
        assert_eq!(to_camel("status"), "status");
        assert_eq!(to_camel("program_ID"), "programId");
    }

    #[test]
    fn camelfy_renames_object_keys_only() {
        let value = json!({ "student_id": 1, "first_name": "Jack", "nested_value": { "keep_me": 1 } });

        assert_eq!(
            camelfy(value).expect("object"),
            json!({ "studentId": 1, "firstName": "Jack", "nestedValue": { "keep_me": 1 } })
        );
    }

    #[test]
    fn camelfy_handles_row_lists_and_null() {
        let rows = json!([{ "last_name": "Harkness" }, { "last_name": "Noble" }]);

        assert_eq!(
            camelfy(rows).expect("rows"),
            json!([{ "lastName": "Harkness" }, { "lastName": "Noble" }])
        );
        assert_eq!(camelfy(Value::Null).expect("null"), Value::Null);
    }

    #[test]
    fn camelfy_rejects_scalars() {
        let error = camelfy(json!("student_id")).expect_err("scalar");
        assert_eq!(
            error.to_string(),
            "camelfy expects an object, an array of objects, or null, got a string"
        );
        assert!(camelfy(json!([1])).is_err());
    }
}
