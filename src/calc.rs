use serde::{Deserialize, Serialize};
use serde_json::json;
use statrs::statistics::Statistics;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("input list is empty")]
    EmptyInput,

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid grade calculation type: {0}")]
    InvalidFormulaKind(String),

    #[error("{0}")]
    ShapeMismatch(String),
}

impl CalcError {
    pub fn code(&self) -> &'static str {
        match self {
            CalcError::EmptyInput => "empty_input",
            CalcError::IndexOutOfRange { .. } => "index_out_of_range",
            CalcError::InvalidFormulaKind(_) => "invalid_formula_kind",
            CalcError::ShapeMismatch(_) => "bad_shape",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            CalcError::IndexOutOfRange { index, len } => {
                Some(json!({ "index": index, "len": len }))
            }
            CalcError::InvalidFormulaKind(raw) => Some(json!({
                "formula": raw,
                "accepted": FormulaKind::ALL
                    .iter()
                    .flat_map(|k| [k.as_str(), k.alias()])
                    .collect::<Vec<_>>(),
            })),
            _ => None,
        }
    }
}

/// Two-decimal rounding applied to every final grade.
///
/// Exact ties go to the even neighbour, as Python's `round(x, 2)` does in the
/// original `data.py`. Magnitudes with no representable hundredths are returned
/// unchanged so scaling by 100 cannot overflow to infinity.
pub fn round_off_2_decimals(x: f64) -> f64 {
    let scaled = x * 100.0;
    if !scaled.is_finite() || x.abs() >= 1e15 {
        return x;
    }
    scaled.round_ties_even() / 100.0
}

/// Running mean (statrs), so large finite scores do not overflow through a plain sum.
pub fn safe_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

pub fn safe_max(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub fn safe_min(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Sort-based median. Must agree with `select::median` on every non-empty input.
pub fn safe_median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[(n / 2) - 1] + sorted[n / 2]) / 2.0
    }
}

/// Population standard deviation (divides by n).
pub fn safe_population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().population_std_dev()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaKind {
    TeacherOnly,
    StudentsOnly,
    GroupsOnly,
    TotalAverage,
    #[default]
    WeightedAverage,
    Highest,
    Lowest,
    Median,
}

impl FormulaKind {
    pub const ALL: [FormulaKind; 8] = [
        FormulaKind::TeacherOnly,
        FormulaKind::StudentsOnly,
        FormulaKind::GroupsOnly,
        FormulaKind::TotalAverage,
        FormulaKind::WeightedAverage,
        FormulaKind::Highest,
        FormulaKind::Lowest,
        FormulaKind::Median,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormulaKind::TeacherOnly => "teacher_only",
            FormulaKind::StudentsOnly => "students_only",
            FormulaKind::GroupsOnly => "groups_only",
            FormulaKind::TotalAverage => "total_average",
            FormulaKind::WeightedAverage => "weighted_average",
            FormulaKind::Highest => "highest",
            FormulaKind::Lowest => "lowest",
            FormulaKind::Median => "median",
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            FormulaKind::TeacherOnly => "to",
            FormulaKind::StudentsOnly => "so",
            FormulaKind::GroupsOnly => "go",
            FormulaKind::TotalAverage => "ta",
            FormulaKind::WeightedAverage => "wa",
            FormulaKind::Highest => "h",
            FormulaKind::Lowest => "l",
            FormulaKind::Median => "m",
        }
    }
}

impl fmt::Display for FormulaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormulaKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        FormulaKind::ALL
            .into_iter()
            .find(|k| k.as_str() == t || k.alias() == t)
            .ok_or_else(|| CalcError::InvalidFormulaKind(s.to_string()))
    }
}

/// Blend one submission's teacher, peer and group scores. Result is rounded to 2 decimals.
///
/// `Highest`/`Lowest` compare the three per-source aggregates while `Median`
/// pools every raw score; the two are intentionally not unified.
pub fn final_grade(
    teacher_score: f64,
    student_scores: &[f64],
    group_scores: &[f64],
    kind: FormulaKind,
) -> f64 {
    let raw = match kind {
        FormulaKind::TeacherOnly => teacher_score,
        FormulaKind::StudentsOnly => safe_mean(student_scores),
        FormulaKind::GroupsOnly => safe_mean(group_scores),
        FormulaKind::TotalAverage => {
            (teacher_score + safe_mean(student_scores) + safe_mean(group_scores)) / 3.0
        }
        FormulaKind::WeightedAverage => {
            0.4 * teacher_score + 0.3 * safe_mean(student_scores) + 0.3 * safe_mean(group_scores)
        }
        FormulaKind::Highest => teacher_score
            .max(safe_max(student_scores))
            .max(safe_max(group_scores)),
        FormulaKind::Lowest => teacher_score
            .min(safe_min(student_scores))
            .min(safe_min(group_scores)),
        FormulaKind::Median => {
            let mut pooled = Vec::with_capacity(student_scores.len() + group_scores.len() + 1);
            pooled.extend_from_slice(student_scores);
            pooled.extend_from_slice(group_scores);
            pooled.push(teacher_score);
            safe_median(&pooled)
        }
    };
    round_off_2_decimals(raw)
}

/// String-dispatched variant of [`final_grade`]; unknown names never fall back to a default.
pub fn final_grade_formulas(
    teacher_score: f64,
    student_scores: &[f64],
    group_scores: &[f64],
    formula: &str,
) -> Result<f64, CalcError> {
    let kind: FormulaKind = formula.parse()?;
    Ok(final_grade(teacher_score, student_scores, group_scores, kind))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalGradeRecord {
    pub teacher_only: f64,
    pub students_only: f64,
    pub groups_only: f64,
    pub total_average: f64,
    pub weighted_average: f64,
    pub highest: f64,
    pub lowest: f64,
    pub median: f64,
}

impl FinalGradeRecord {
    pub fn get(&self, kind: FormulaKind) -> f64 {
        match kind {
            FormulaKind::TeacherOnly => self.teacher_only,
            FormulaKind::StudentsOnly => self.students_only,
            FormulaKind::GroupsOnly => self.groups_only,
            FormulaKind::TotalAverage => self.total_average,
            FormulaKind::WeightedAverage => self.weighted_average,
            FormulaKind::Highest => self.highest,
            FormulaKind::Lowest => self.lowest,
            FormulaKind::Median => self.median,
        }
    }
}

pub fn final_grade_record(
    teacher_score: f64,
    student_scores: &[f64],
    group_scores: &[f64],
) -> FinalGradeRecord {
    let grade = |kind| final_grade(teacher_score, student_scores, group_scores, kind);
    FinalGradeRecord {
        teacher_only: grade(FormulaKind::TeacherOnly),
        students_only: grade(FormulaKind::StudentsOnly),
        groups_only: grade(FormulaKind::GroupsOnly),
        total_average: grade(FormulaKind::TotalAverage),
        weighted_average: grade(FormulaKind::WeightedAverage),
        highest: grade(FormulaKind::Highest),
        lowest: grade(FormulaKind::Lowest),
        median: grade(FormulaKind::Median),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ClassReport {
    pub mean: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub median: f64,
}

pub fn class_statistics(final_grades: &[f64]) -> ClassReport {
    ClassReport {
        mean: safe_mean(final_grades),
        minimum: safe_min(final_grades),
        maximum: safe_max(final_grades),
        median: safe_median(final_grades),
    }
}
