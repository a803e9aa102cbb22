//! Response envelopes returned by the control panel.
//!
//! Two shapes exist: the JSON-RPC style envelope of the `json-api` endpoint
//! (`{"cpanelresult": {"event": {"result": 1}, "data": [...], "error": ..}}`)
//! and the flat envelope of the upload endpoint (`{"status": 1, "errors": ..}`).
//! Both decode into a single [`Verdict`].

use serde::Deserialize;
use serde_json::Value;

/// Substring of a failure reason meaning the target is already there.
pub const EXISTS_MARKER: &str = "already exists";

/// Which envelope an endpoint answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    JsonRpc,
    FlatStatus,
}

/// Success flag as sent by the server: `1`, `true` and `"1"` all occur.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Flag {
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Int(n) => *n == 1,
            Flag::Text(s) => s.trim() == "1",
        }
    }
}

fn flag_set(flag: Option<&Flag>) -> bool {
    flag.is_some_and(Flag::is_set)
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcEnvelope {
    pub cpanelresult: JsonRpcResult,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResult {
    #[serde(default)]
    pub event: Option<JsonRpcEvent>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcEvent {
    #[serde(default)]
    pub result: Option<Flag>,
}

/// One per-path entry of a JSON-RPC `data` list.
#[derive(Debug, Deserialize)]
pub struct DataEntry {
    #[serde(default)]
    pub result: Option<Flag>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl JsonRpcResult {
    /// Entries of `data` that carry a result flag. Other data shapes
    /// (objects, scalars, entries without a flag) are ignored.
    fn entries(&self) -> Vec<DataEntry> {
        match &self.data {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| serde_json::from_value::<DataEntry>(item.clone()).ok())
                .filter(|entry| entry.result.is_some())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn verdict(&self) -> Verdict {
        let entries = self.entries();
        let error = self
            .error
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());
        let event_ok = flag_set(self.event.as_ref().and_then(|e| e.result.as_ref()));
        let failed: Vec<&DataEntry> = entries
            .iter()
            .filter(|e| !flag_set(e.result.as_ref()))
            .collect();

        if event_ok && error.is_none() && failed.is_empty() {
            return Verdict::Success;
        }

        if error.is_none() && failed.is_empty() {
            return Verdict::Unconfirmed;
        }

        let mut reasons: Vec<String> = failed
            .iter()
            .map(|e| {
                e.reason
                    .clone()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| "operation failed".to_string())
            })
            .collect();
        if let Some(error) = error {
            reasons.push(error.to_string());
        }
        Verdict::Failure { reasons }
    }
}

#[derive(Debug, Deserialize)]
pub struct FlatStatusEnvelope {
    #[serde(default)]
    pub status: Option<Flag>,
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
    #[serde(default)]
    pub messages: Option<Vec<Value>>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl FlatStatusEnvelope {
    pub fn verdict(&self) -> Verdict {
        if flag_set(self.status.as_ref()) {
            return Verdict::Success;
        }
        let errors: Vec<String> = self
            .errors
            .iter()
            .flatten()
            .map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        let reason = if errors.is_empty() {
            "status flag not set".to_string()
        } else {
            errors.join("; ")
        };
        Verdict::Failure {
            reasons: vec![reason],
        }
    }
}

/// The closed set of envelopes this client understands.
#[derive(Debug)]
pub enum Envelope {
    JsonRpc(JsonRpcEnvelope),
    FlatStatus(FlatStatusEnvelope),
}

impl Envelope {
    pub fn verdict(&self) -> Verdict {
        match self {
            Envelope::JsonRpc(env) => env.cpanelresult.verdict(),
            Envelope::FlatStatus(env) => env.verdict(),
        }
    }
}

/// Uniform outcome of decoding a 2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success,
    /// Neither a success indicator nor an error: an empty body, or an
    /// envelope with the event flag unset and nothing reported.
    Unconfirmed,
    Failure { reasons: Vec<String> },
}

impl Verdict {
    /// First reason, verbatim. For a single-path call this is that path's error.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Success => None,
            Verdict::Unconfirmed => Some("no success indicator in response"),
            Verdict::Failure { reasons } => reasons.first().map(String::as_str),
        }
    }

    pub fn mentions_exists(&self) -> bool {
        match self {
            Verdict::Success | Verdict::Unconfirmed => false,
            Verdict::Failure { reasons } => reasons.iter().any(|r| r.contains(EXISTS_MARKER)),
        }
    }
}

/// A decoded body: the verdict plus the raw payload kept for diagnostics.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub verdict: Verdict,
    pub payload: Value,
}

/// Decode a response body of the given shape. An empty body is
/// unconfirmed; bodies that are not JSON, or JSON that does not match the
/// shape, decode to a failure.
pub fn decode(shape: Shape, body: &str) -> Decoded {
    if body.trim().is_empty() {
        return Decoded {
            verdict: Verdict::Unconfirmed,
            payload: Value::Null,
        };
    }
    let payload: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            return Decoded {
                verdict: Verdict::Failure {
                    reasons: vec![format!("response is not JSON: {e}")],
                },
                payload: Value::String(body.to_string()),
            }
        }
    };

    let envelope = match shape {
        Shape::JsonRpc => serde_json::from_value(payload.clone()).map(Envelope::JsonRpc),
        Shape::FlatStatus => serde_json::from_value(payload.clone()).map(Envelope::FlatStatus),
    };

    let verdict = match envelope {
        Ok(envelope) => envelope.verdict(),
        Err(e) => Verdict::Failure {
            reasons: vec![format!("unexpected response shape: {e}")],
        },
    };
    Decoded { verdict, payload }
}
