use crate::ipc::error::{ok, ok_serialized};
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::report::REPORT_VERSION;
use serde_json::json;

fn handle_health(_state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "reportVersion": REPORT_VERSION,
        }),
    )
}

fn handle_config_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok_serialized(&req.id, &state.options)
}

fn handle_config_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let options = match params::report_options(req, state.options) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if options != state.options {
        tracing::info!(class_formula = %options.class_formula, "session options updated");
    }
    state.options = options;
    ok_serialized(&req.id, &state.options)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "config.get" => Some(handle_config_get(state, req)),
        "config.set" => Some(handle_config_set(state, req)),
        _ => None,
    }
}
