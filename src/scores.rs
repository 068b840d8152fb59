use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// One score as recorded against a submission. Ids may arrive as JSON strings or integers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    #[serde(deserialize_with = "de_id")]
    pub student_id: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub scorer_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub group_id: Option<String>,
    pub percentage: f64,
    #[serde(default)]
    pub is_teacher: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Str(String),
    Int(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Str(s) => s,
            RawId::Int(n) => n.to_string(),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    RawId::deserialize(d).map(String::from)
}

pub fn de_ids<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(Vec::<RawId>::deserialize(d)?
        .into_iter()
        .map(String::from)
        .collect())
}

fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?.map(String::from))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionScores {
    pub teacher: Option<f64>,
    pub peers: Vec<f64>,
    pub groups: Vec<f64>,
}

/// Group score rows by submission, keeping `student_ids` order.
///
/// The first teacher row for a submission wins; rows for unknown students are dropped.
pub fn partition_rows(student_ids: &[String], rows: &[ScoreRow]) -> Vec<(String, SubmissionScores)> {
    let index: HashMap<&str, usize> = student_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    let mut out: Vec<(String, SubmissionScores)> = student_ids
        .iter()
        .map(|id| (id.clone(), SubmissionScores::default()))
        .collect();

    for row in rows {
        let Some(&i) = index.get(row.student_id.as_str()) else {
            tracing::debug!(
                student_id = %row.student_id,
                scorer_id = ?row.scorer_id,
                "ignoring score for unknown student"
            );
            continue;
        };
        let scores = &mut out[i].1;
        if row.is_teacher {
            if scores.teacher.is_none() {
                scores.teacher = Some(row.percentage);
            }
        } else if row.group_id.is_some() {
            scores.groups.push(row.percentage);
        } else {
            scores.peers.push(row.percentage);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(v: serde_json::Value) -> Vec<ScoreRow> {
        serde_json::from_value(v).expect("rows")
    }

    #[test]
    fn rows_accept_numeric_and_string_ids() {
        let parsed = rows(json!([
            { "studentId": 7, "scorerId": "t1", "percentage": 90, "isTeacher": true },
            { "studentId": "8", "groupId": 3, "percentage": 71.5 }
        ]));
        assert_eq!(parsed[0].student_id, "7");
        assert_eq!(parsed[0].percentage, 90.0);
        assert_eq!(parsed[1].group_id.as_deref(), Some("3"));
        assert_eq!(parsed[1].scorer_id, None);
        assert!(!parsed[1].is_teacher);
    }

    #[test]
    fn non_numeric_percentage_is_rejected() {
        let res: Result<Vec<ScoreRow>, _> =
            serde_json::from_value(json!([{ "studentId": 1, "percentage": "90" }]));
        assert!(res.is_err());
    }

    #[test]
    fn partition_splits_teacher_peer_and_group_scores() {
        let ids = vec!["1".to_string(), "2".to_string()];
        let parsed = rows(json!([
            { "studentId": 1, "percentage": 90, "isTeacher": true },
            { "studentId": 1, "percentage": 10, "isTeacher": true },
            { "studentId": 1, "scorerId": 2, "percentage": 80 },
            { "studentId": 1, "scorerId": 3, "percentage": 85 },
            { "studentId": 1, "groupId": 9, "percentage": 70 },
            { "studentId": 99, "percentage": 50 }
        ]));
        let out = partition_rows(&ids, &parsed);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, "1");
        assert_eq!(out[0].1.teacher, Some(90.0));
        assert_eq!(out[0].1.peers, vec![80.0, 85.0]);
        assert_eq!(out[0].1.groups, vec![70.0]);
        assert_eq!(out[1].1, SubmissionScores::default());
    }
}
