use crate::calc::{self, FormulaKind};
use crate::ipc::error::{calc_err, ok, ok_serialized};
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

struct SubmissionParams {
    teacher_score: f64,
    student_scores: Vec<f64>,
    group_scores: Vec<f64>,
}

fn parse_submission(req: &Request) -> Result<SubmissionParams, serde_json::Value> {
    Ok(SubmissionParams {
        teacher_score: params::required(req, &["teacherScore", "teacher_score"])?,
        student_scores: params::optional(req, &["studentScores", "student_scores"])?
            .unwrap_or_default(),
        group_scores: params::optional(req, &["groupScores", "group_scores"])?
            .unwrap_or_default(),
    })
}

fn handle_final_grade(req: &Request) -> serde_json::Value {
    let formula = match params::required_str(req, "formula") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let sub = match parse_submission(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let grade = match calc::final_grade_formulas(
        sub.teacher_score,
        &sub.student_scores,
        &sub.group_scores,
        &formula,
    ) {
        Ok(v) => v,
        Err(e) => return calc_err(&req.id, &e),
    };
    // Echo the canonical name for whichever alias the caller used.
    let canonical = formula
        .parse::<FormulaKind>()
        .map(FormulaKind::as_str)
        .unwrap_or_default();
    ok(&req.id, json!({ "formula": canonical, "grade": grade }))
}

fn handle_final_grade_record(req: &Request) -> serde_json::Value {
    let sub = match parse_submission(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok_serialized(
        &req.id,
        &calc::final_grade_record(sub.teacher_score, &sub.student_scores, &sub.group_scores),
    )
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.finalGrade" => Some(handle_final_grade(req)),
        "grades.finalGradeRecord" => Some(handle_final_grade_record(req)),
        _ => None,
    }
}
