//! Call correlation protocol: inbound call envelopes and outbound
//! resolve/reject scripts.
//!
//! Messages flow in both directions:
//! - **script -> host**: the runtime posts `{"id", "method", "args"}` JSON
//!   through `window.ipc.postMessage`.
//! - **host -> script**: the host evaluates `<global>._resolveCall(id, value)`
//!   or `<global>._rejectCall(id, message)` in the content view.

use serde_json::Value;
use wito_common::{BridgeError, CallId};

use crate::args::Args;

/// A decoded inbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallEnvelope {
    pub id: CallId,
    pub method: String,
    pub args: Args,
}

/// A message that could not be decoded into a [`CallEnvelope`].
///
/// When the id was still recoverable the caller can be told about the
/// failure; otherwise the failure is only logged.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeFailure {
    pub id: Option<CallId>,
    pub error: BridgeError,
}

impl DecodeFailure {
    fn new(id: Option<CallId>, detail: impl Into<String>) -> Self {
        Self {
            id,
            error: BridgeError::Decode(detail.into()),
        }
    }
}

/// Decode a raw IPC body.
pub fn decode(raw: &str) -> Result<CallEnvelope, DecodeFailure> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecodeFailure::new(None, e.to_string()))?;

    let Value::Object(mut fields) = value else {
        return Err(DecodeFailure::new(None, "envelope is not an object"));
    };

    let id = match fields.remove("id") {
        Some(raw_id) => serde_json::from_value::<CallId>(raw_id)
            .map_err(|_| DecodeFailure::new(None, "'id' must be a string or number"))?,
        None => return Err(DecodeFailure::new(None, "missing 'id'")),
    };

    let method = match fields.remove("method") {
        Some(Value::String(m)) if !m.is_empty() => m,
        Some(_) => {
            return Err(DecodeFailure::new(
                Some(id),
                "'method' must be a non-empty string",
            ))
        }
        None => return Err(DecodeFailure::new(Some(id), "missing 'method'")),
    };

    let args = Args::from_value(fields.remove("args").unwrap_or(Value::Null))
        .map_err(|error| DecodeFailure {
            id: Some(id.clone()),
            error,
        })?;

    Ok(CallEnvelope { id, method, args })
}

/// Exactly one of these is produced for every call that got past decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Resolve { id: CallId, value: Value },
    Reject { id: CallId, message: String },
}

impl Outbound {
    pub fn from_result(id: CallId, result: Result<Value, BridgeError>) -> Self {
        match result {
            Ok(value) => Self::Resolve { id, value },
            Err(e) => Self::reject(id, &e),
        }
    }

    pub fn reject(id: CallId, error: &BridgeError) -> Self {
        Self::Reject {
            id,
            message: error.to_string(),
        }
    }

    pub fn id(&self) -> &CallId {
        match self {
            Self::Resolve { id, .. } | Self::Reject { id, .. } => id,
        }
    }

    pub fn is_resolve(&self) -> bool {
        matches!(self, Self::Resolve { .. })
    }

    /// Render as a script against the runtime object named `global`.
    ///
    /// A resolve value that cannot be encoded turns into a reject carrying
    /// the serialization error.
    pub fn to_script(&self, global: &str) -> String {
        match self {
            Self::Resolve { id, value } => match serde_json::to_string(value) {
                Ok(json) => format!("{global}._resolveCall({}, {json});", id.to_script_literal()),
                Err(e) => {
                    let message = BridgeError::result_serialization(e).to_string();
                    reject_script(global, id, &message)
                }
            },
            Self::Reject { id, message } => reject_script(global, id, message),
        }
    }
}

fn reject_script(global: &str, id: &CallId, message: &str) -> String {
    format!(
        "{global}._rejectCall({}, {});",
        id.to_script_literal(),
        Value::String(message.to_string())
    )
}
