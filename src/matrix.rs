//! Composite grade matrix: one teacher row stacked on an `n x n` peer matrix.
//!
//! Row 0 holds the teacher's score for each student. Row `i + 1` holds what
//! student `i` gave every student (columns), so `(i + 1, i)` is a self-grade.
//!
//! Per-student accessors return `None` for an index outside `[0, n)`; callers
//! that want the permissive zero can `unwrap_or(0.0)`. Class-wide accessors
//! return 0 on an empty matrix.

use crate::calc::{safe_mean, safe_median, safe_population_std_dev, CalcError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct GradeMatrix {
    rows: Vec<Vec<f64>>,
}

impl GradeMatrix {
    pub fn new(teacher_grades: Vec<f64>, student_grades: Vec<Vec<f64>>) -> Result<Self, CalcError> {
        let n = teacher_grades.len();
        if let Some((row_idx, row)) = student_grades
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != n)
        {
            return Err(CalcError::ShapeMismatch(format!(
                "the number of grades given by the teacher ({}) must match the number of students graded in row {} ({})",
                n,
                row_idx,
                row.len()
            )));
        }
        if student_grades.len() != n {
            return Err(CalcError::ShapeMismatch(format!(
                "peer grade matrix must be square: {} grader rows for {} students",
                student_grades.len(),
                n
            )));
        }

        let mut rows = Vec::with_capacity(n + 1);
        rows.push(teacher_grades);
        rows.extend(student_grades);
        Ok(Self { rows })
    }

    pub fn student_count(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn teacher_row(&self) -> &[f64] {
        &self.rows[0]
    }

    /// Everything student `i` assigned, self included.
    pub fn given_by(&self, student_index: usize) -> Option<&[f64]> {
        if student_index >= self.student_count() {
            return None;
        }
        Some(&self.rows[student_index + 1])
    }

    /// Everything peers assigned to student `i`, self included; the teacher row is excluded.
    pub fn received_by(&self, student_index: usize) -> Option<Vec<f64>> {
        if student_index >= self.student_count() {
            return None;
        }
        Some(self.rows[1..].iter().map(|row| row[student_index]).collect())
    }

    pub fn self_grades(&self) -> Vec<f64> {
        (0..self.student_count())
            .map(|i| self.rows[i + 1][i])
            .collect()
    }

    pub fn grade_given(&self, student_index: usize) -> Option<f64> {
        self.given_by(student_index).map(safe_mean)
    }

    pub fn grade_received(&self, student_index: usize) -> Option<f64> {
        self.received_by(student_index).map(|col| safe_mean(&col))
    }

    pub fn teacher_grade(&self, student_index: usize) -> Option<f64> {
        self.teacher_row().get(student_index).copied()
    }

    pub fn self_grade(&self, student_index: usize) -> Option<f64> {
        self.given_by(student_index).map(|row| row[student_index])
    }

    pub fn median_grade_given(&self, student_index: usize) -> Option<f64> {
        self.given_by(student_index).map(safe_median)
    }

    pub fn median_grade_received(&self, student_index: usize) -> Option<f64> {
        self.received_by(student_index).map(|col| safe_median(&col))
    }

    pub fn stddev_grade_given(&self, student_index: usize) -> Option<f64> {
        self.given_by(student_index).map(safe_population_std_dev)
    }

    pub fn stddev_grade_received(&self, student_index: usize) -> Option<f64> {
        self.received_by(student_index)
            .map(|col| safe_population_std_dev(&col))
    }

    pub fn avg_given_per_student(&self) -> Vec<f64> {
        self.rows[1..].iter().map(|row| safe_mean(row)).collect()
    }

    pub fn median_given_per_student(&self) -> Vec<f64> {
        self.rows[1..].iter().map(|row| safe_median(row)).collect()
    }

    pub fn stddev_given_per_student(&self) -> Vec<f64> {
        self.rows[1..]
            .iter()
            .map(|row| safe_population_std_dev(row))
            .collect()
    }

    pub fn avg_teacher_given(&self) -> f64 {
        safe_mean(self.teacher_row())
    }

    pub fn median_teacher_given(&self) -> f64 {
        safe_median(self.teacher_row())
    }

    pub fn stddev_teacher_given(&self) -> f64 {
        safe_population_std_dev(self.teacher_row())
    }

    pub fn avg_self_grade(&self) -> f64 {
        safe_mean(&self.self_grades())
    }

    pub fn median_self_grade(&self) -> f64 {
        safe_median(&self.self_grades())
    }

    pub fn stddev_self_grade(&self) -> f64 {
        safe_population_std_dev(&self.self_grades())
    }

    /// Mean over every peer cell.
    pub fn class_average_received(&self) -> f64 {
        let cells: Vec<f64> = self.rows[1..].iter().flatten().copied().collect();
        safe_mean(&cells)
    }

    pub fn student_summary(&self, student_index: usize) -> Option<StudentMatrixSummary> {
        Some(StudentMatrixSummary {
            student_index,
            grade_given: self.grade_given(student_index)?,
            grade_received: self.grade_received(student_index)?,
            teacher_grade: self.teacher_grade(student_index)?,
            self_grade: self.self_grade(student_index)?,
            median_grade_given: self.median_grade_given(student_index)?,
            median_grade_received: self.median_grade_received(student_index)?,
            stddev_grade_given: self.stddev_grade_given(student_index)?,
            stddev_grade_received: self.stddev_grade_received(student_index)?,
        })
    }

    pub fn class_summary(&self) -> ClassMatrixSummary {
        ClassMatrixSummary {
            student_count: self.student_count(),
            avg_given_per_student: self.avg_given_per_student(),
            median_given_per_student: self.median_given_per_student(),
            stddev_given_per_student: self.stddev_given_per_student(),
            avg_teacher_given: self.avg_teacher_given(),
            median_teacher_given: self.median_teacher_given(),
            stddev_teacher_given: self.stddev_teacher_given(),
            avg_self_grade: self.avg_self_grade(),
            median_self_grade: self.median_self_grade(),
            stddev_self_grade: self.stddev_self_grade(),
            class_average_received: self.class_average_received(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMatrixSummary {
    pub student_index: usize,
    pub grade_given: f64,
    pub grade_received: f64,
    pub teacher_grade: f64,
    pub self_grade: f64,
    pub median_grade_given: f64,
    pub median_grade_received: f64,
    pub stddev_grade_given: f64,
    pub stddev_grade_received: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMatrixSummary {
    pub student_count: usize,
    pub avg_given_per_student: Vec<f64>,
    pub median_given_per_student: Vec<f64>,
    pub stddev_given_per_student: Vec<f64>,
    pub avg_teacher_given: f64,
    pub median_teacher_given: f64,
    pub stddev_teacher_given: f64,
    pub avg_self_grade: f64,
    pub median_self_grade: f64,
    pub stddev_self_grade: f64,
    pub class_average_received: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn two_student_matrix() -> GradeMatrix {
        GradeMatrix::new(vec![90.0, 85.0], vec![vec![100.0, 80.0], vec![70.0, 95.0]])
            .expect("valid matrix")
    }

    #[test]
    fn per_student_accessors() {
        let m = two_student_matrix();
        assert_eq!(m.student_count(), 2);
        assert!(approx(m.grade_given(0).unwrap(), 90.0));
        assert!(approx(m.grade_received(0).unwrap(), 85.0));
        assert_eq!(m.teacher_grade(0), Some(90.0));
        assert_eq!(m.self_grade(0), Some(100.0));
        assert_eq!(m.self_grade(1), Some(95.0));
        assert!(approx(m.grade_given(1).unwrap(), 82.5));
        assert!(approx(m.grade_received(1).unwrap(), 87.5));
    }

    #[test]
    fn median_and_stddev_mirror_the_mean_slices() {
        let m = two_student_matrix();
        assert_eq!(m.median_grade_given(0), Some(90.0));
        assert_eq!(m.median_grade_received(0), Some(85.0));
        assert!(approx(m.stddev_grade_given(0).unwrap(), 10.0));
        assert!(approx(m.stddev_grade_received(0).unwrap(), 15.0));
    }

    #[test]
    fn class_wide_accessors() {
        let m = two_student_matrix();
        let given = m.avg_given_per_student();
        assert_eq!(given.len(), 2);
        assert!(approx(given[0], 90.0));
        assert!(approx(given[1], 82.5));
        assert!(approx(m.avg_teacher_given(), 87.5));
        assert!(approx(m.avg_self_grade(), 97.5));
        assert_eq!(m.median_self_grade(), 97.5);
        assert!(approx(m.stddev_teacher_given(), 2.5));
        assert!(approx(m.class_average_received(), 86.25));
    }

    #[test]
    fn out_of_range_index_is_distinguished_from_zero() {
        let m = GradeMatrix::new(vec![0.0], vec![vec![0.0]]).unwrap();
        assert_eq!(m.self_grade(0), Some(0.0));
        assert_eq!(m.self_grade(1), None);
        assert_eq!(m.grade_given(1), None);
        assert_eq!(m.grade_received(5), None);
        assert_eq!(m.teacher_grade(1), None);
        assert!(m.student_summary(1).is_none());
    }

    #[test]
    fn empty_matrix_defaults_class_values_to_zero() {
        let m = GradeMatrix::new(vec![], vec![]).unwrap();
        assert_eq!(m.student_count(), 0);
        assert_eq!(m.grade_given(0), None);
        assert!(m.avg_given_per_student().is_empty());
        assert_eq!(m.avg_teacher_given(), 0.0);
        assert_eq!(m.avg_self_grade(), 0.0);
        assert_eq!(m.class_average_received(), 0.0);
    }

    #[test]
    fn means_agree_with_calc_and_survive_large_scores() {
        let m = GradeMatrix::new(vec![1e308, 1e308], vec![vec![1e308, 1e308], vec![1e308, 1e308]])
            .unwrap();
        assert_eq!(m.avg_teacher_given(), 1e308);
        assert_eq!(m.grade_given(0), Some(1e308));
        assert_eq!(m.grade_received(1), Some(1e308));
        assert_eq!(m.class_average_received(), 1e308);

        let m = two_student_matrix();
        assert_eq!(m.grade_given(1), Some(safe_mean(&[70.0, 95.0])));
        assert_eq!(m.avg_teacher_given(), safe_mean(&[90.0, 85.0]));
    }

    #[test]
    fn constructor_rejects_bad_shapes() {
        let err = GradeMatrix::new(vec![90.0], vec![vec![100.0, 80.0], vec![70.0, 95.0]])
            .unwrap_err();
        assert_eq!(err.code(), "bad_shape");

        let err = GradeMatrix::new(vec![90.0, 85.0], vec![vec![100.0, 80.0]]).unwrap_err();
        assert_eq!(err.code(), "bad_shape");

        let err = GradeMatrix::new(vec![90.0, 85.0], vec![vec![100.0, 80.0], vec![70.0]])
            .unwrap_err();
        assert_eq!(err.code(), "bad_shape");
    }
}
