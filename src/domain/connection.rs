// Connection indicator domain model
use serde_json::Value;

const NO_STATE_LABEL: &str = "DISCONNECTED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Connecting,
    Waiting,
    Live,
    Error,
    NoServer,
    /// Any other backend state, shown verbatim.
    Other(String),
}

impl ConnectionState {
    /// Map the `state` field reported by `GET /api/state`.
    pub fn from_backend(state: &str) -> Self {
        match state {
            "CONNECTED" => ConnectionState::Connected,
            "CONNECTING" => ConnectionState::Connecting,
            other => ConnectionState::Other(other.to_string()),
        }
    }

    /// Map a raw `state` value. A missing or null state reads as
    /// `DISCONNECTED`; other non-string values are shown as JSON text.
    pub fn from_backend_value(state: Option<&Value>) -> Self {
        match state {
            None | Some(Value::Null) => ConnectionState::Other(NO_STATE_LABEL.to_string()),
            Some(Value::String(state)) => Self::from_backend(state),
            Some(other) => ConnectionState::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ConnectionState::Connected => "CONNECTED",
            ConnectionState::Connecting => "CONNECTING",
            ConnectionState::Waiting => "WAITING",
            ConnectionState::Live => "LIVE",
            ConnectionState::Error => "ERROR",
            ConnectionState::NoServer => "NO SERVER",
            ConnectionState::Other(raw) => raw,
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::Live)
    }
}
