use crate::config::ReportOptions;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Default)]
pub struct AppState {
    /// Session defaults; `classFormula` in a request overrides them for that request only.
    pub options: ReportOptions,
}
