use std::path::PathBuf;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use vidc_caps::{Session, SessionConfig, SessionHandle, Transport, WirePayload};

mod config;
mod script;

use script::Script;

fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .filter_module("vidc_caps", log::LevelFilter::Debug)
        .init();
}

/// Stands in for the codec engine: every property packet is logged.
#[derive(Default)]
struct LogTransport {
    sent: usize,
}

impl Transport for LogTransport {
    fn send_property(&mut self, payload: &WirePayload) -> anyhow::Result<()> {
        self.sent += 1;
        log::info!("#{} {}", self.sent, payload);
        Ok(())
    }
}

fn load_script() -> anyhow::Result<Script> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config::config().script_path().map(PathBuf::from));
    match path {
        Some(path) => Script::load(&path),
        None => {
            log::info!("no control script given, running the built-in demo");
            Ok(Script::demo())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let script = load_script()?;
    let request_batched = config::config()
        .request_batched()
        .unwrap_or(script.request_batched);
    let session_config = SessionConfig::new(script.codec).with_request_batched(request_batched);
    let session = Session::new(session_config, LogTransport::default())
        .with_context(|| format!("creating {} session", script.codec))?;
    let handle = SessionHandle::spawn(session);

    let cancel = CancellationToken::new();
    let run = script.run(&handle);
    tokio::pin!(run);

    let result = loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                break Ok(());
            },
            _ = tokio::signal::ctrl_c() => {
                log::warn!("interrupted, stopping session");
                cancel.cancel();
            },
            report = &mut run => {
                break report.map(|report| {
                    log::info!(
                        "script finished: {} payloads sent, {} diagnostics",
                        report.sent.len(),
                        report.diagnostics.len()
                    );
                });
            },
        }
    };

    handle.stop();
    result
}
