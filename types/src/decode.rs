//! Decoder combinators for loosely-typed JSON payloads.
//!
//! Domain types inspect raw [`serde_json::Value`]s only through these helpers,
//! so every failure names the member or shape that was expected. A payload
//! that doesn't match is never silently coerced.

use serde_json::Value;

/// Failure produced while decoding a JSON payload into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
    details: Option<Value>,
}

impl DecodeError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    /// Attach the raw value that carried extra context for this failure.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Fails with a message naming `what` when the value is absent.
pub fn required<T>(value: Option<T>, what: &str) -> DecodeResult<T> {
    value.ok_or_else(|| DecodeError::new(format!("{what} is missing")))
}

/// Object member access; failure names the member and echoes the object.
pub fn field<'a>(value: &'a Value, name: &str) -> DecodeResult<&'a Value> {
    value
        .get(name)
        .ok_or_else(|| DecodeError::new(format!("no `{name}` in {value}")))
}

/// Object member access for optional members; JSON `null` counts as absent.
#[must_use]
pub fn opt_field<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    value.get(name).filter(|v| !v.is_null())
}

pub fn string(value: &Value, what: &str) -> DecodeResult<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| DecodeError::new(format!("{what} should be a string, got: {value}")))
}

pub fn number(value: &Value, what: &str) -> DecodeResult<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| DecodeError::new(format!("{what} should be a number, got: {value}")))
}

pub fn boolean(value: &Value, what: &str) -> DecodeResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| DecodeError::new(format!("{what} should be a boolean, got: {value}")))
}

pub fn string_list(value: &Value, what: &str) -> DecodeResult<Vec<String>> {
    decode_all(value, |v| string(v, what))
}

/// Decodes every element of a JSON array, failing fast on the first bad
/// element with that element's message.
pub fn decode_all<T>(
    value: &Value,
    decode: impl Fn(&Value) -> DecodeResult<T>,
) -> DecodeResult<Vec<T>> {
    let items = value
        .as_array()
        .ok_or_else(|| DecodeError::new(format!("expected an array, got: {value}")))?;
    items.iter().map(decode).collect()
}

/// Returns the first succeeding alternative. When every alternative fails,
/// the combined failure lists all underlying messages.
pub fn first_ok<T>(alternatives: impl IntoIterator<Item = DecodeResult<T>>) -> DecodeResult<T> {
    let mut errors = Vec::new();
    for alternative in alternatives {
        match alternative {
            Ok(value) => return Ok(value),
            Err(e) => errors.push(e.message().to_owned()),
        }
    }
    Err(DecodeError::new(format!(
        "all alternatives failed:\n{}",
        errors.join("\n")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_present() {
        assert_eq!(required(Some(1), "x").unwrap(), 1);
    }

    #[test]
    fn test_required_absent_names_what() {
        let err = required::<u32>(None, "line number").unwrap_err();
        assert!(err.message().contains("line number"));
    }

    #[test]
    fn test_field_present() {
        let v = json!({"name": "base"});
        assert_eq!(field(&v, "name").unwrap(), &json!("base"));
    }

    #[test]
    fn test_field_missing_names_member() {
        let v = json!({"other": 1});
        let err = field(&v, "name").unwrap_err();
        assert!(err.message().contains("`name`"));
        assert!(err.message().contains("other"), "should echo the object");
    }

    #[test]
    fn test_opt_field_treats_null_as_absent() {
        let v = json!({"a": null, "b": 2});
        assert!(opt_field(&v, "a").is_none());
        assert!(opt_field(&v, "missing").is_none());
        assert_eq!(opt_field(&v, "b"), Some(&json!(2)));
    }

    #[test]
    fn test_string_rejects_non_string() {
        let err = string(&json!(42), "module name").unwrap_err();
        assert!(err.message().contains("module name"));
        assert!(err.message().contains("42"));
    }

    #[test]
    fn test_number_rejects_non_number() {
        assert!(number(&json!("12"), "line").is_err());
        assert_eq!(number(&json!(12), "line").unwrap(), 12);
    }

    #[test]
    fn test_number_rejects_out_of_range() {
        assert!(number(&json!(u64::MAX), "line").is_err());
    }

    #[test]
    fn test_boolean() {
        assert!(boolean(&json!(true), "exposed").unwrap());
        assert!(boolean(&json!("true"), "exposed").is_err());
    }

    #[test]
    fn test_decode_all_ok() {
        let v = json!(["a", "b"]);
        let decoded = decode_all(&v, |e| string(e, "item")).unwrap();
        assert_eq!(decoded, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn test_decode_all_fails_fast_with_element_message() {
        let v = json!(["a", 42, true]);
        let err = decode_all(&v, |e| string(e, "item")).unwrap_err();
        assert!(err.message().contains("42"), "first bad element wins");
        assert!(!err.message().contains("true"));
    }

    #[test]
    fn test_decode_all_rejects_non_array() {
        assert!(decode_all(&json!({}), |e| string(e, "item")).is_err());
    }

    #[test]
    fn test_first_ok_picks_first_success() {
        let result = first_ok([
            Err(DecodeError::new("first failed")),
            Ok(1),
            Ok(2),
        ]);
        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn test_first_ok_concatenates_all_messages() {
        let err = first_ok::<u32>([
            Err(DecodeError::new("no file")),
            Err(DecodeError::new("no name")),
        ])
        .unwrap_err();
        assert!(err.message().contains("no file"));
        assert!(err.message().contains("no name"));
    }

    #[test]
    fn test_details_preserved() {
        let err = DecodeError::new("boom").with_details(json!({"ghc": "9.4"}));
        assert_eq!(err.details(), Some(&json!({"ghc": "9.4"})));
        assert_eq!(err.to_string(), "boom");
    }
}
