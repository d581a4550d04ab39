//! Process bootstrap shared by the service binaries: `.env`, logging, config,
//! panic hook, tokio runtime sized from config, then [`crate::run`].

use std::process::ExitCode;

use configs::ServiceKind;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging(kind: ServiceKind) {
    // .env first so RUST_LOG and LOG_FORMAT take effect
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = kind.name(), event = "logger_init", "tracing subscriber initialized");
}

pub fn launch(kind: ServiceKind) -> ExitCode {
    init_logging(kind);
    let service = kind.name();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service, event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let cfg = match configs::load_for(kind) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service, event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    let worker_threads = cfg.server.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service,
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "{service} starting"
    );

    rt.block_on(async move {
        match tokio::spawn(crate::run(kind, cfg)).await {
            Ok(Ok(())) => {
                info!(service, event = "stop", %service_id, pid, "{service} stopped normally");
                ExitCode::SUCCESS
            }
            Ok(Err(e)) => {
                error!(service, event = "run_failed", error = %e, "{service} exited with an error");
                ExitCode::FAILURE
            }
            Err(e) => {
                error!(service, event = "task_join_error", error = %e, "server task join error");
                ExitCode::FAILURE
            }
        }
    })
}
