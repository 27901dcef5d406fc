//! Loads a binding set from a flat JSON object such as
//! `{"className": "Main", "isViewModel": true}`.

use serde_json::Value as Json;

use crate::error::BindingsError;
use crate::eval::{Bindings, Value};

pub fn from_json(document: &str) -> Result<Bindings, BindingsError> {
    let Json::Object(entries) = serde_json::from_str::<Json>(document)? else {
        return Err(BindingsError::NotAnObject);
    };

    let bindings = entries
        .into_iter()
        .map(|(name, value)| match value {
            Json::String(s) => Ok((name, Value::Str(s))),
            Json::Bool(b) => Ok((name, Value::Bool(b))),
            _ => Err(BindingsError::UnsupportedValue { name }),
        })
        .collect::<Result<Bindings, _>>()?;

    log::debug!("loaded {} bindings", bindings.len());
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_and_booleans() {
        let bindings = from_json(r#"{"firstName": "John", "args": true, "old": false}"#).unwrap();
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings["firstName"], Value::Str("John".into()));
        assert_eq!(bindings["args"], Value::Bool(true));
        assert_eq!(bindings["old"], Value::Bool(false));
    }

    #[test]
    fn numbers_are_rejected() {
        let err = from_json(r#"{"count": 3}"#).unwrap_err();
        assert!(matches!(err, BindingsError::UnsupportedValue { ref name } if name == "count"));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(from_json("[true]"), Err(BindingsError::NotAnObject)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(from_json("{"), Err(BindingsError::Json(_))));
    }
}
