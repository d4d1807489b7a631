use serde_json::Value;

use crate::classifier::{
    ClassifiedEvent, Scheme, ARGUMENTS_FIELD, PATH_PARAMETERS_FIELD, QUERY_STRING_PARAMETERS_FIELD,
};
use crate::error::DispatchError;
use crate::handler::Arguments;

/// Builds the flat argument map for a classified event.
///
/// REST merges query string parameters first and path parameters second, so
/// a path parameter overrides a query parameter of the same name. Values keep
/// their JSON type.
pub fn normalize(event: ClassifiedEvent) -> Result<Arguments, DispatchError> {
    match event {
        ClassifiedEvent::Direct { event, .. } => Ok(event),
        ClassifiedEvent::Rest {
            query_string_parameters,
            path_parameters,
            ..
        } => {
            let mut arguments = Arguments::new();
            if let Some(query) = query_string_parameters {
                let query = into_object(query, Scheme::Rest, QUERY_STRING_PARAMETERS_FIELD)?;
                arguments.extend(query);
            }
            if let Some(path) = path_parameters {
                arguments.extend(into_object(path, Scheme::Rest, PATH_PARAMETERS_FIELD)?);
            }
            Ok(arguments)
        }
        ClassifiedEvent::GraphQl { arguments, .. } => match arguments {
            Some(arguments) => into_object(arguments, Scheme::GraphQl, ARGUMENTS_FIELD),
            None => Ok(Arguments::new()),
        },
    }
}

fn into_object(
    value: Value,
    scheme: Scheme,
    field: &'static str,
) -> Result<Arguments, DispatchError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DispatchError::InvalidArguments { scheme, field }),
    }
}
