use clap::Parser;
use estante::api::HttpApi;
use estante::cli::Cli;
use estante::config::Config;
use estante::error::{Error, Result};
use estante::session::Session;
use estante::tui::App;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging();

    let app = match build_app(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match estante::tui::run(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_app(cli: &Cli) -> Result<App> {
    let mut config =
        Config::load(cli.config.as_deref()).map_err(|e| Error::Config(e.to_string()))?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }

    let api = Arc::new(HttpApi::new(&config.base_url));

    let mut session =
        Session::new(config.session_path()).map_err(|e| Error::Session(e.to_string()))?;
    // A broken session file means starting logged out, not failing to start.
    if let Err(err) = session.restore() {
        warn!(%err, "could not restore persisted session");
    }

    Ok(App::new(api, session, config.shelf_titles.clone()))
}

/// Initialize tracing. The TUI owns stdout, so logs go to a file when
/// `ESTANTE_LOG` is set; `RUST_LOG` gets the plain fmt subscriber for
/// non-interactive debugging.
fn init_logging() {
    if std::env::var("ESTANTE_LOG").is_ok() {
        use std::fs::File;
        use tracing_subscriber::prelude::*;
        match File::create("estante.log") {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false);
                let filter = tracing_subscriber::EnvFilter::new("estante=debug");
                let _ = tracing_subscriber::registry()
                    .with(file_layer.with_filter(filter))
                    .try_init();
            }
            Err(err) => {
                eprintln!("Failed to create log file: {err}");
            }
        }
    } else if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}
