mod app;
mod cli;
mod launch;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use wito_bridge::WorkerPool;

use crate::app::{UserEvent, WitoApp};
use crate::launch::Launch;

const DEFAULT_LOG_DIRECTIVE: &str = "wito=info";

fn log_filter(directive: Option<&str>) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match directive.unwrap_or(DEFAULT_LOG_DIRECTIVE).parse() {
        Ok(d) => filter.add_directive(d),
        Err(e) => {
            eprintln!("ignoring invalid --log-level: {e}");
            match DEFAULT_LOG_DIRECTIVE.parse() {
                Ok(d) => filter.add_directive(d),
                Err(_) => filter,
            }
        }
    }
}

fn main() {
    let args = cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.log_level.as_deref()))
        .init();

    tracing::info!("Wito v{} starting...", env!("CARGO_PKG_VERSION"));

    let launch = match Launch::from_args(&args) {
        Ok(launch) => launch,
        Err(e) => {
            tracing::error!("Config load failed: {e}");
            std::process::exit(2);
        }
    };
    tracing::info!(
        content = %launch.content_dir().display(),
        entry = %launch.entry_path().display(),
        dev = launch.config.app.dev_mode,
        "Config loaded"
    );
    tracing::debug!(config = %wito_config::config_to_json(&launch.config), "effective config");

    let workers = launch.config.bridge.resolved_worker_threads();
    let pool = match WorkerPool::new(workers) {
        Ok(pool) => Arc::new(pool),
        Err(e) => {
            tracing::error!("Failed to start worker pool: {e}");
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::<UserEvent>::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let mut app = WitoApp::new(launch, pool).with_proxy(event_loop.create_proxy());

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_log_directive_falls_back() {
        let filter = log_filter(Some("wito=notalevel"));
        assert!(filter.to_string().contains("wito=info"));
    }

    #[test]
    fn explicit_log_directive_is_used() {
        let filter = log_filter(Some("wito=trace"));
        assert!(filter.to_string().contains("wito=trace"));
    }
}
