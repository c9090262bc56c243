use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

/// Failures of a single bridged call.
///
/// Everything except [`BridgeError::Decode`] happens after the correlation
/// id is known and therefore becomes a reject envelope whose message is the
/// `Display` text of the error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("malformed call envelope: {0}")]
    Decode(String),

    #[error("Method '{0}' not found")]
    OperationNotFound(String),

    #[error("{0}")]
    Application(String),

    #[error("Error serializing {what}: {detail}")]
    Serialization { what: &'static str, detail: String },

    #[error("Operation timed out")]
    Timeout(Duration),

    #[error("Property '{0}' is read-only")]
    ReadOnlyProperty(String),

    #[error("worker pool unavailable: {0}")]
    WorkerPool(String),
}

impl BridgeError {
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application(message.into())
    }

    pub fn result_serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            what: "result",
            detail: err.to_string(),
        }
    }

    pub fn payload_serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            what: "event payload",
            detail: err.to_string(),
        }
    }

    /// Whether a reject envelope can be produced for this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Decode(_))
    }
}

/// Construction-time failures while building the method registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("operation '{0}' is exposed more than once")]
    DuplicateName(String),

    #[error("invalid operation name '{0}': must be a JavaScript identifier")]
    InvalidName(String),

    #[error("operation name '{0}' is reserved by the script runtime")]
    Reserved(String),

    #[error("invalid parameter '{param}' on operation '{operation}'")]
    InvalidParameter { operation: String, param: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("script evaluation failed: {0}")]
    Evaluate(String),

    #[error("content view is closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum WitoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("webview error: {0}")]
    WebView(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("bridge.worker_threads".into());
        assert_eq!(
            err.to_string(),
            "config validation error: bridge.worker_threads"
        );
    }

    #[test]
    fn reject_messages_match_wire_texts() {
        assert_eq!(
            BridgeError::OperationNotFound("does_not_exist".into()).to_string(),
            "Method 'does_not_exist' not found"
        );
        assert_eq!(
            BridgeError::Timeout(Duration::from_secs(30)).to_string(),
            "Operation timed out"
        );
        assert_eq!(
            BridgeError::application("disk on fire").to_string(),
            "disk on fire"
        );
        assert_eq!(
            BridgeError::ReadOnlyProperty("version".into()).to_string(),
            "Property 'version' is read-only"
        );
        assert_eq!(
            BridgeError::result_serialization("key must be a string").to_string(),
            "Error serializing result: key must be a string"
        );
        assert_eq!(
            BridgeError::payload_serialization("nope").to_string(),
            "Error serializing event payload: nope"
        );
    }

    #[test]
    fn only_decode_errors_are_unrecoverable() {
        assert!(!BridgeError::Decode("eof".into()).is_recoverable());
        assert!(BridgeError::OperationNotFound("x".into()).is_recoverable());
        assert!(BridgeError::Timeout(Duration::from_millis(1)).is_recoverable());
        assert!(BridgeError::WorkerPool("stopped".into()).is_recoverable());
    }

    #[test]
    fn registry_error_display() {
        let err = RegistryError::DuplicateName("win_set_title".into());
        assert_eq!(
            err.to_string(),
            "operation 'win_set_title' is exposed more than once"
        );

        let err = RegistryError::InvalidParameter {
            operation: "notify".into(),
            param: "bad-name".into(),
        };
        assert!(err.to_string().contains("bad-name"));
    }

    #[test]
    fn wito_error_from_variants() {
        let err: WitoError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, WitoError::Config(_)));
        assert!(err.to_string().contains("bad toml"));

        let err: WitoError = RegistryError::Reserved("on".into()).into();
        assert!(matches!(err, WitoError::Registry(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: WitoError = io_err.into();
        assert!(matches!(err, WitoError::Io(_)));
        assert!(err.to_string().contains("file missing"));

        let err: WitoError = ViewError::Closed.into();
        assert_eq!(err.to_string(), "content view is closed");
    }
}
