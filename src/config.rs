use crate::calc::{CalcError, FormulaKind};
use serde::Serialize;

pub const ENV_LOG: &str = "SPIGD_LOG";
pub const ENV_LOG_FORMAT: &str = "SPIGD_LOG_FORMAT";
pub const ENV_CLASS_FORMULA: &str = "SPIGD_CLASS_FORMULA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOptions {
    /// Formula whose per-student value feeds the class-wide statistics.
    pub class_formula: FormulaKind,
}

impl ReportOptions {
    /// Reads `SPIGD_CLASS_FORMULA`; an unset or blank variable keeps the default.
    pub fn from_env() -> Result<Self, CalcError> {
        match std::env::var(ENV_CLASS_FORMULA) {
            Ok(raw) if !raw.trim().is_empty() => Ok(Self {
                class_formula: raw.parse()?,
            }),
            _ => Ok(Self::default()),
        }
    }

    /// Per-request override: `classFormula` in params wins over the session default.
    pub fn with_override(self, raw: Option<&serde_json::Value>) -> Result<Self, String> {
        let Some(raw) = raw else {
            return Ok(self);
        };
        if raw.is_null() {
            return Ok(self);
        }
        let Some(s) = raw.as_str() else {
            return Err("classFormula must be a string".to_string());
        };
        let class_formula = s.parse::<FormulaKind>().map_err(|e| e.to_string())?;
        Ok(Self { class_formula })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn from_env() -> Self {
        let filter = std::env::var(ENV_LOG)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());
        let format = match std::env::var(ENV_LOG_FORMAT) {
            Ok(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self { filter, format }
    }
}
