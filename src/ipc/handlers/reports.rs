use crate::ipc::error::{calc_err, ok_serialized};
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::report;
use crate::scores::{self, ScoreRow};
use serde::Deserialize;

use super::matrix::parse_matrix;

#[derive(Deserialize)]
struct StudentIds(#[serde(deserialize_with = "scores::de_ids")] Vec<String>);

fn handle_compute(state: &mut AppState, req: &Request) -> serde_json::Value {
    let options = match params::report_options(req, state.options) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let StudentIds(students) = match params::required(req, &["students"]) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let matrix = match parse_matrix(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let group_grades: Vec<Vec<f64>> = match params::required(req, &["groupGrades", "group_grades"])
    {
        Ok(v) => v,
        Err(e) => return e,
    };

    tracing::info!(students = students.len(), "computing report");
    match report::build_report(&students, &matrix, &group_grades, &options) {
        Ok(r) => ok_serialized(&req.id, &r),
        Err(e) => {
            tracing::warn!(error = %e, "report rejected");
            calc_err(&req.id, &e)
        }
    }
}

fn handle_from_scores(state: &mut AppState, req: &Request) -> serde_json::Value {
    let options = match params::report_options(req, state.options) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let StudentIds(student_ids) = match params::required(req, &["studentIds", "student_ids"]) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let rows: Vec<ScoreRow> = match params::optional(req, &["scores"]) {
        Ok(v) => v.unwrap_or_default(),
        Err(e) => return e,
    };

    tracing::info!(
        students = student_ids.len(),
        rows = rows.len(),
        "computing report from score rows"
    );
    match report::build_report_from_rows(&student_ids, &rows, &options) {
        Ok(r) => ok_serialized(&req.id, &r),
        Err(e) => {
            tracing::warn!(error = %e, "report rejected");
            calc_err(&req.id, &e)
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.compute" => Some(handle_compute(state, req)),
        "reports.fromScores" => Some(handle_from_scores(state, req)),
        _ => None,
    }
}
