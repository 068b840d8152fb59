use crate::calc::{class_statistics, final_grade_record, CalcError, ClassReport, FinalGradeRecord};
use crate::config::ReportOptions;
use crate::matrix::GradeMatrix;
use crate::scores::{partition_rows, ScoreRow};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

pub const REPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub students: BTreeMap<String, FinalGradeRecord>,
    pub class: ClassReport,
    pub version: u32,
}

fn check_unique(ids: &[String]) -> Result<(), CalcError> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(CalcError::ShapeMismatch(format!(
                "duplicate student id: {}",
                id
            )));
        }
    }
    Ok(())
}

fn assemble<'a, I>(submissions: I, options: &ReportOptions) -> Report
where
    I: IntoIterator<Item = (&'a str, f64, Vec<f64>, &'a [f64])>,
{
    let mut students = BTreeMap::new();
    let mut class_inputs = Vec::new();

    for (id, teacher, peers, groups) in submissions {
        tracing::debug!(student = id, "calculating final grades");
        let record = final_grade_record(teacher, &peers, groups);
        class_inputs.push(record.get(options.class_formula));
        students.insert(id.to_string(), record);
    }

    tracing::debug!(
        formula = %options.class_formula,
        count = class_inputs.len(),
        "calculating class-wide report"
    );
    Report {
        students,
        class: class_statistics(&class_inputs),
        version: REPORT_VERSION,
    }
}

/// Report over a grade matrix. A student's peer scores are the column of grades they received.
pub fn build_report(
    student_ids: &[String],
    matrix: &GradeMatrix,
    group_grades: &[Vec<f64>],
    options: &ReportOptions,
) -> Result<Report, CalcError> {
    let n = matrix.student_count();
    if student_ids.len() != n || group_grades.len() != n {
        return Err(CalcError::ShapeMismatch(format!(
            "expected {} students and {} group score lists to match the {} graded students",
            student_ids.len(),
            group_grades.len(),
            n
        )));
    }
    check_unique(student_ids)?;

    let mut submissions = Vec::with_capacity(n);
    for (i, id) in student_ids.iter().enumerate() {
        let teacher = matrix
            .teacher_grade(i)
            .ok_or(CalcError::IndexOutOfRange { index: i, len: n })?;
        let peers = matrix
            .received_by(i)
            .ok_or(CalcError::IndexOutOfRange { index: i, len: n })?;
        submissions.push((id.as_str(), teacher, peers, group_grades[i].as_slice()));
    }
    Ok(assemble(submissions, options))
}

/// Report over raw score rows. A submission without a teacher score counts the teacher as 0.
pub fn build_report_from_rows(
    student_ids: &[String],
    rows: &[ScoreRow],
    options: &ReportOptions,
) -> Result<Report, CalcError> {
    check_unique(student_ids)?;
    let partitioned = partition_rows(student_ids, rows);
    Ok(assemble(
        partitioned.iter().map(|(id, s)| {
            (
                id.as_str(),
                s.teacher.unwrap_or(0.0),
                s.peers.clone(),
                s.groups.as_slice(),
            )
        }),
        options,
    ))
}
