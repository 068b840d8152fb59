use crate::calc::CalcError;
use crate::ipc::error::{calc_err, ok_serialized};
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::matrix::GradeMatrix;
use serde::Serialize;

pub fn parse_matrix(req: &Request) -> Result<GradeMatrix, serde_json::Value> {
    let teacher: Vec<f64> = params::required(req, &["teacherGrades", "teacher_grades"])?;
    let grades: Vec<Vec<f64>> = params::required(req, &["grades"])?;
    GradeMatrix::new(teacher, grades).map_err(|e| calc_err(&req.id, &e))
}

fn handle_student(req: &Request) -> serde_json::Value {
    let matrix = match parse_matrix(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let index: usize = match params::required(req, &["studentIndex", "student_index"]) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match matrix.student_summary(index) {
        Some(summary) => ok_serialized(&req.id, &summary),
        None => calc_err(
            &req.id,
            &CalcError::IndexOutOfRange {
                index,
                len: matrix.student_count(),
            },
        ),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatrixSummary {
    class: crate::matrix::ClassMatrixSummary,
    students: Vec<crate::matrix::StudentMatrixSummary>,
}

fn handle_summary(req: &Request) -> serde_json::Value {
    let matrix = match parse_matrix(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let students = (0..matrix.student_count())
        .filter_map(|i| matrix.student_summary(i))
        .collect();
    ok_serialized(
        &req.id,
        &MatrixSummary {
            class: matrix.class_summary(),
            students,
        },
    )
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "matrix.student" => Some(handle_student(req)),
        "matrix.summary" => Some(handle_summary(req)),
        _ => None,
    }
}
