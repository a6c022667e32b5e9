//! Deploy proxy - entry point
//!
//! Serves the two deploy endpoints the redeploy control polls, proxying
//! them to the platform's deployments API with server-side credentials.

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use redeployer::logs::{init_logging, LogOptions};
use redeployer::server::serve::serve;
use redeployer::server::state::{Credentials, ProxyState};
use redeployer::settings::Settings;
use redeployer::utils::version_info;

use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        println!("{}", serde_json::to_string_pretty(&version).unwrap());
        return;
    }

    // Retrieve settings: file when given, defaults otherwise
    let mut settings = match cli_args.get("settings") {
        Some(path) => match Settings::load(Path::new(path)) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Unable to read settings file: {e}");
                return;
            }
        },
        None => Settings::default(),
    };

    if let Some(host) = cli_args.get("host") {
        settings.server.host = host.clone();
    }
    if let Some(port) = cli_args.get("port") {
        match port.parse() {
            Ok(port) => settings.server.port = port,
            Err(_) => {
                eprintln!("Invalid port: {port}");
                return;
            }
        }
    }

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    // Credentials come from the environment; their absence fails deploy
    // requests with the configuration error rather than failing startup.
    let credentials = Credentials::from_env();
    if credentials.is_none() {
        warn!("DO_ACCESS_TOKEN / DO_APP_ID not set; deploy requests will fail until both are provided");
    }

    let state = match ProxyState::new(
        &settings.upstream.base_url,
        credentials,
        Duration::from_secs(settings.upstream.request_timeout_secs),
    ) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to build proxy state: {e}");
            return;
        }
    };

    info!(
        "Running deploy proxy {} against {}",
        version.version, settings.upstream.base_url
    );

    let handle = match serve(&settings.server, state, await_shutdown_signal()).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {e}");
            return;
        }
    };

    match handle.await {
        Ok(Ok(())) => info!("Server stopped"),
        Ok(Err(e)) => error!("Server error: {e}"),
        Err(e) => error!("Server task failed: {e}"),
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).unwrap();
        let mut sigint = signal(SignalKind::interrupt()).unwrap();

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("Ctrl+C received, shutting down...");
    }
}
