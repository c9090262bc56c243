use std::time::Duration;

use crate::dispatcher::DEFAULT_CALL_TIMEOUT;

/// Per-bridge settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeOptions {
    /// Name of the script runtime object (`window.<global_name>`).
    pub global_name: String,
    /// Ceiling for background operations.
    pub call_timeout: Duration,
    /// Log call payloads and enable runtime console tracing.
    pub dev_mode: bool,
    /// Exposed to the page as `appDevMode`.
    pub app_dev_mode: bool,
    /// Emit method/property stubs in the init script.
    pub generate_bindings: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            global_name: "wito".into(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            dev_mode: false,
            app_dev_mode: false,
            generate_bindings: true,
        }
    }
}
