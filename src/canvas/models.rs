//! Canvas API response shapes used for roster/section correlation.
//!
//! Only the fields the analytics need are modelled; everything else is
//! ignored on deserialization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Section {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct EnrollmentUser {
    pub id: Option<u64>,
    /// U-number
    pub sis_user_id: Option<String>,
    pub login_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Enrollment {
    pub course_section_id: Option<u64>,
    #[serde(default)]
    pub user: Option<EnrollmentUser>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SubmissionUser {
    pub name: Option<String>,
    pub login_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Submission {
    pub user_id: Option<u64>,
    #[serde(default)]
    pub user: Option<SubmissionUser>,
    pub submitted_at: Option<String>,
    pub missing: Option<bool>,
    pub workflow_state: Option<String>,
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_deserialization() {
        let json = r#"{
            "id": 991,
            "type": "StudentEnrollment",
            "course_section_id": 42,
            "user": {"id": 7, "name": "John Doe", "sis_user_id": "U12345678", "login_id": "jdoe"}
        }"#;

        let e: Enrollment = serde_json::from_str(json).unwrap();
        assert_eq!(e.course_section_id, Some(42));
        let user = e.user.unwrap();
        assert_eq!(user.id, Some(7));
        assert_eq!(user.sis_user_id.as_deref(), Some("U12345678"));
    }

    #[test]
    fn test_section_without_name() {
        let sections: Vec<Section> =
            serde_json::from_str(r#"[{"id": 1, "name": null}, {"id": 2}, {"id": 3, "name": "CS"}]"#).unwrap();
        assert_eq!(sections.len(), 3);
        assert!(sections[0].name.is_none());
        assert!(sections[1].name.is_none());
        assert_eq!(sections[2].name.as_deref(), Some("CS"));
    }

    #[test]
    fn test_submission_null_fields() {
        let json = r#"{"user_id": 7, "user": null, "submitted_at": null, "workflow_state": "unsubmitted", "score": null}"#;
        let s: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(s.user_id, Some(7));
        assert!(s.user.is_none());
        assert!(s.missing.is_none());
        assert!(s.score.is_none());
    }
}
