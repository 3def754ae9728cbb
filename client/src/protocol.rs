//! Wire message shapes for the hsdev protocol.
//!
//! Outbound: one JSON object per line carrying the command's own members
//! plus `command`, `no-file` and the correlation `id` (a stringified
//! integer). Inbound: an object carrying `id` plus exactly one of `result`,
//! `notify` or `error`; extra members of an error object are its details.

use serde_json::{Map, Value, json};

/// Assemble one outbound request object.
pub(crate) fn request(command: &str, mut params: Map<String, Value>, id: u64) -> Value {
    params.insert("command".to_owned(), json!(command));
    params.insert("no-file".to_owned(), json!(true));
    params.insert("id".to_owned(), json!(id.to_string()));
    Value::Object(params)
}

/// A classified inbound message.
#[derive(Debug)]
pub(crate) enum Message {
    Result { id: String, result: Value },
    Notify { id: String, notify: Value },
    Error {
        id: String,
        message: String,
        details: Value,
    },
}

impl Message {
    /// Classify a parsed line.
    ///
    /// Returns `None` for shapes that are not part of the protocol: no `id`,
    /// or none of the three payload members.
    pub fn classify(mut value: Value) -> Option<Self> {
        let obj = value.as_object_mut()?;
        let id = match obj.remove("id")? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        if let Some(notify) = obj.remove("notify") {
            return Some(Self::Notify { id, notify });
        }
        if let Some(result) = obj.remove("result") {
            return Some(Self::Result { id, result });
        }
        if let Some(error) = obj.remove("error") {
            let message = match error {
                Value::String(s) => s,
                other => other.to_string(),
            };
            let details = Value::Object(std::mem::take(obj));
            return Some(Self::Error {
                id,
                message,
                details,
            });
        }
        None
    }
}
