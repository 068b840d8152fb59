use crate::config::ReportOptions;
use crate::ipc::error::err;
use crate::ipc::types::Request;
use serde::de::DeserializeOwned;
use serde_json::json;

/// First present key wins; later keys are legacy snake_case spellings.
pub fn lookup<'a>(req: &'a Request, keys: &[&str]) -> Option<&'a serde_json::Value> {
    keys.iter().find_map(|k| req.params.get(*k))
}

/// Typed decode of a required param. Numbers are never coerced from strings.
pub fn required<T: DeserializeOwned>(req: &Request, keys: &[&str]) -> Result<T, serde_json::Value> {
    let name = keys.first().copied().unwrap_or_default();
    let Some(raw) = lookup(req, keys) else {
        return Err(err(&req.id, "bad_params", format!("missing params.{}", name), None));
    };
    serde_json::from_value(raw.clone()).map_err(|e| {
        err(
            &req.id,
            "bad_params",
            format!("params.{}: {}", name, e),
            Some(json!({ "param": name })),
        )
    })
}

pub fn optional<T: DeserializeOwned>(
    req: &Request,
    keys: &[&str],
) -> Result<Option<T>, serde_json::Value> {
    match lookup(req, keys) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(_) => required(req, keys).map(Some),
    }
}

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn report_options(
    req: &Request,
    defaults: ReportOptions,
) -> Result<ReportOptions, serde_json::Value> {
    defaults
        .with_override(lookup(req, &["classFormula", "class_formula"]))
        .map_err(|message| {
            err(
                &req.id,
                "bad_params",
                message,
                Some(json!({ "param": "classFormula" })),
            )
        })
}
