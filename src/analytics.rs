//! Roster/section correlation and per-section grade statistics
//!
//! Sections stand in for the student's program in the UI. Submissions
//! only carry a `user_id`, so they are joined to enrollments (for the
//! U-number and section) and then to sections (for the section name).

use crate::canvas::models::{Enrollment, Section, Submission};
use serde::Serialize;
use std::collections::HashMap;

pub const UNKNOWN_SECTION: &str = "Unknown Section";

/// What the enrollment list tells us about one student
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrolledStudent {
    pub sis_user_id: Option<String>,
    pub login_id: Option<String>,
    pub course_section_id: Option<u64>,
}

/// One row of the submissions table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRow {
    pub user_id: Option<u64>,
    pub user_name: Option<String>,
    pub login_id: Option<String>,
    pub sis_user_id: Option<String>,
    pub section_name: String,
    pub submitted: bool,
    pub missing: bool,
    pub workflow_state: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionStats {
    pub section: String,
    pub total_students: u32,
    pub graded: u32,
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStats {
    pub total_students: u32,
    pub graded: u32,
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentAnalytics {
    pub by_section: Vec<SectionStats>,
    pub class: ClassStats,
}

/// section_id -> section name; unnamed sections are left out
pub fn section_map(sections: &[Section]) -> HashMap<u64, String> {
    sections
        .iter()
        .filter_map(|s| Some((s.id, s.name.clone()?)))
        .collect()
}

/// user_id -> enrollment details; enrollments without a user are skipped
pub fn enrollment_map(enrollments: &[Enrollment]) -> HashMap<u64, EnrolledStudent> {
    enrollments
        .iter()
        .filter_map(|e| {
            let user = e.user.as_ref()?;
            let uid = user.id.filter(|&id| id != 0)?;
            Some((
                uid,
                EnrolledStudent {
                    sis_user_id: user.sis_user_id.clone(),
                    login_id: user.login_id.clone(),
                    course_section_id: e.course_section_id,
                },
            ))
        })
        .collect()
}

fn section_for(
    user_id: Option<u64>,
    roster: &HashMap<u64, EnrolledStudent>,
    sections: &HashMap<u64, String>,
) -> Option<String> {
    let enrolled = roster.get(&user_id?)?;
    sections.get(&enrolled.course_section_id?).cloned()
}

/// Merge submissions with enrollment and section data, in submission order
pub fn submission_rows(
    submissions: &[Submission],
    enrollments: &[Enrollment],
    sections: &[Section],
) -> Vec<SubmissionRow> {
    let roster = enrollment_map(enrollments);
    let sections = section_map(sections);

    submissions
        .iter()
        .map(|s| {
            let user = s.user.clone().unwrap_or_default();
            let enrolled = s.user_id.and_then(|id| roster.get(&id));

            SubmissionRow {
                user_id: s.user_id,
                user_name: user.name,
                login_id: enrolled.and_then(|e| e.login_id.clone()).or(user.login_id),
                sis_user_id: enrolled.and_then(|e| e.sis_user_id.clone()),
                section_name: section_for(s.user_id, &roster, &sections)
                    .unwrap_or_else(|| UNKNOWN_SECTION.to_string()),
                submitted: s.submitted_at.as_deref().is_some_and(|t| !t.is_empty()),
                missing: s.missing.unwrap_or(false),
                workflow_state: s.workflow_state.clone(),
                score: s.score,
            }
        })
        .collect()
}

#[derive(Default)]
struct Bucket {
    count: u32,
    graded: u32,
    sum: f64,
}

impl Bucket {
    fn add(&mut self, score: Option<f64>) {
        self.count += 1;
        if let Some(score) = score {
            self.graded += 1;
            self.sum += score;
        }
    }

    fn average(&self) -> Option<f64> {
        (self.graded > 0).then(|| self.sum / self.graded as f64)
    }
}

/// Grade statistics grouped by section, sections in first-seen order
pub fn assignment_analytics(
    submissions: &[Submission],
    enrollments: &[Enrollment],
    sections: &[Section],
) -> AssignmentAnalytics {
    let roster = enrollment_map(enrollments);
    let sections = section_map(sections);

    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Bucket> = HashMap::new();
    let mut class = Bucket::default();

    for s in submissions {
        let section = section_for(s.user_id, &roster, &sections)
            .unwrap_or_else(|| UNKNOWN_SECTION.to_string());

        if !buckets.contains_key(&section) {
            order.push(section.clone());
        }
        buckets.entry(section).or_default().add(s.score);
        class.add(s.score);
    }

    let by_section = order
        .into_iter()
        .map(|section| {
            let bucket = &buckets[&section];
            SectionStats {
                total_students: bucket.count,
                graded: bucket.graded,
                average_score: bucket.average(),
                section,
            }
        })
        .collect();

    AssignmentAnalytics {
        by_section,
        class: ClassStats {
            total_students: class.count,
            graded: class.graded,
            average_score: class.average(),
        },
    }
}
