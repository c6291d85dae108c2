use cega_core::CegaConfig;
use cega_users::{run_server, telemetry};

#[tokio::main]
async fn main() {
    telemetry::init();

    let config = match CegaConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_server(config).await {
        tracing::error!(error = %err, "server terminated with error");
        std::process::exit(1);
    }
}
