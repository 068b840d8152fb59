mod calc;
mod config;
mod ipc;
mod logging;
mod matrix;
mod report;
mod scores;
mod select;

use anyhow::Context;
use serde_json::json;
use std::io::{self, BufRead, Write};

fn main() -> anyhow::Result<()> {
    logging::init(&config::LogConfig::from_env())?;

    let options = config::ReportOptions::from_env()
        .with_context(|| format!("invalid {}", config::ENV_CLASS_FORMULA))?;
    let mut state = ipc::AppState { options };
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        class_formula = %state.options.class_formula,
        "expecting grade requests on stdin"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            Err(e) => {
                // No id to echo back.
                tracing::warn!(error = %e, "failed to parse request");
                json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                })
            }
        };

        writeln!(stdout, "{}", resp).context("failed to write response")?;
        stdout.flush().context("failed to flush stdout")?;
    }

    tracing::info!("stdin closed, exiting");
    Ok(())
}
