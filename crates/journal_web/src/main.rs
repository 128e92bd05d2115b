//! Journal HTTP API server entry point.

use clap::Parser;
use journal_core::{default_log_level, init_logging, init_stderr_logging, open_storage, Journal};
use journal_web::config::ServerArgs;
use journal_web::{create_router, AppState};
use log::{error, info};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = ServerArgs::parse();

    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    let logging = match args.log_dir.as_deref() {
        Some(dir) => init_logging(level, dir),
        None => init_stderr_logging(level),
    };
    if let Err(err) = logging {
        eprintln!("Failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=web status=error error={err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: ServerArgs) -> Result<(), String> {
    let config = args.storage_config().map_err(|err| err.to_string())?;
    let storage = tokio::task::spawn_blocking(move || open_storage(&config))
        .await
        .map_err(|err| format!("storage startup task failed: {err}"))?
        .map_err(|err| format!("Failed to initialize storage: {err}"))?;

    let app = create_router(AppState::new(Journal::new(storage)));
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .map_err(|err| format!("failed to bind {}: {err}", args.bind))?;

    info!("event=server_start module=web status=ok bind={}", args.bind);
    println!("Starting server on {}", args.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| format!("server error: {err}"))?;

    info!("event=server_stop module=web status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal_wait module=web status=error error={err}");
        std::future::pending::<()>().await;
    }
}
