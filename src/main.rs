use haatkhata::commands::Cli;
use haatkhata::libs::messages::macros::is_debug_mode;
use haatkhata::msg_error;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    if is_debug_mode() {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "haatkhata=debug".into()))
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }

    match Cli::menu() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Errors built with msg_bail_anyhow already carry the marker
            let text = format!("{:#}", e);
            msg_error!(text.trim_start_matches("❌ "));
            ExitCode::FAILURE
        }
    }
}
