//! Enrollment oracle and its in-memory implementation
//!
//! The oracle is the ground truth for "is this viewer enrolled in / has
//! this viewer completed this gating object". The resolver asks it about
//! courses, memberships, lessons and course tracks.

use crate::error::Result;
use crate::result::PrerequisiteKind;
use crate::{ContentId, ViewerId};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Source of enrollment and completion facts
pub trait EnrollmentOracle: Send + Sync {
    /// True if the viewer is enrolled in the course or membership
    fn is_enrolled(&self, viewer: ViewerId, gating_id: ContentId) -> bool;

    /// True if the viewer completed the course, course track or lesson
    fn is_complete(&self, viewer: ViewerId, id: u64, kind: PrerequisiteKind) -> bool;

    /// When the viewer enrolled in the course or membership
    fn enrollment_date(&self, _viewer: ViewerId, _gating_id: ContentId) -> Option<u64> {
        None
    }

    /// When the viewer completed the object
    fn completion_date(&self, _viewer: ViewerId, _id: u64, _kind: PrerequisiteKind) -> Option<u64> {
        None
    }
}

#[derive(Debug, Clone, Default)]
struct ViewerRecord {
    enrollments: BTreeMap<ContentId, u64>,
    completions: BTreeMap<(PrerequisiteKind, u64), u64>,
}

/// In-memory enrollment records keyed by viewer
///
/// ```
/// use core_restriction::{EnrollmentLedger, EnrollmentOracle, PrerequisiteKind};
///
/// let mut ledger = EnrollmentLedger::new();
/// ledger.enroll(1, 10, 1_000);
/// ledger.complete(1, PrerequisiteKind::Lesson, 11, 2_000);
///
/// assert!(ledger.is_enrolled(1, 10));
/// assert!(ledger.is_complete(1, 11, PrerequisiteKind::Lesson));
/// assert!(!ledger.is_complete(1, 11, PrerequisiteKind::Course));
/// assert_eq!(ledger.enrollment_date(1, 10), Some(1_000));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnrollmentLedger {
    viewers: BTreeMap<ViewerId, ViewerRecord>,
}

#[derive(Debug, Deserialize)]
struct LedgerRaw {
    #[serde(default)]
    viewers: Vec<ViewerRaw>,
}

#[derive(Debug, Deserialize)]
struct ViewerRaw {
    id: ViewerId,
    #[serde(default)]
    enrollments: Vec<EnrollmentRaw>,
    #[serde(default)]
    completions: Vec<CompletionRaw>,
}

#[derive(Debug, Deserialize)]
struct EnrollmentRaw {
    id: ContentId,
    #[serde(default)]
    at: u64,
}

#[derive(Debug, Deserialize)]
struct CompletionRaw {
    kind: PrerequisiteKind,
    id: u64,
    #[serde(default)]
    at: u64,
}

impl From<LedgerRaw> for EnrollmentLedger {
    fn from(raw: LedgerRaw) -> Self {
        let mut ledger = Self::new();
        for viewer in raw.viewers {
            // Viewers without records still exist as known accounts
            ledger.viewers.entry(viewer.id).or_default();
            for enrollment in viewer.enrollments {
                ledger.enroll(viewer.id, enrollment.id, enrollment.at);
            }
            for completion in viewer.completions {
                ledger.complete(viewer.id, completion.kind, completion.id, completion.at);
            }
        }
        ledger
    }
}

impl EnrollmentLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an enrollment in a course or membership
    pub fn enroll(&mut self, viewer: ViewerId, gating_id: ContentId, at: u64) {
        self.viewers
            .entry(viewer)
            .or_default()
            .enrollments
            .insert(gating_id, at);
    }

    /// Remove an enrollment
    ///
    /// Returns `true` if the viewer was enrolled
    pub fn unenroll(&mut self, viewer: ViewerId, gating_id: ContentId) -> bool {
        self.viewers
            .get_mut(&viewer)
            .is_some_and(|record| record.enrollments.remove(&gating_id).is_some())
    }

    /// Record a completion
    pub fn complete(&mut self, viewer: ViewerId, kind: PrerequisiteKind, id: u64, at: u64) {
        self.viewers
            .entry(viewer)
            .or_default()
            .completions
            .insert((kind, id), at);
    }

    /// Number of known viewers
    #[must_use]
    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    /// True if the ledger has any record for the viewer
    #[must_use]
    pub fn knows(&self, viewer: ViewerId) -> bool {
        self.viewers.contains_key(&viewer)
    }

    /// Load the `[[viewers]]` section of a site file
    ///
    /// Other top level sections are ignored, so the same file can hold the
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if TOML parsing fails
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let raw: LedgerRaw = toml::from_str(toml_str)?;
        Ok(raw.into())
    }

    /// Build a ledger from any deserializer producing the `viewers` layout
    ///
    /// # Errors
    ///
    /// Returns the deserializer's error
    pub fn deserialize_from<'de, D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        LedgerRaw::deserialize(deserializer).map(Self::from)
    }
}

impl EnrollmentOracle for EnrollmentLedger {
    fn is_enrolled(&self, viewer: ViewerId, gating_id: ContentId) -> bool {
        self.enrollment_date(viewer, gating_id).is_some()
    }

    fn is_complete(&self, viewer: ViewerId, id: u64, kind: PrerequisiteKind) -> bool {
        self.completion_date(viewer, id, kind).is_some()
    }

    fn enrollment_date(&self, viewer: ViewerId, gating_id: ContentId) -> Option<u64> {
        self.viewers
            .get(&viewer)?
            .enrollments
            .get(&gating_id)
            .copied()
    }

    fn completion_date(&self, viewer: ViewerId, id: u64, kind: PrerequisiteKind) -> Option<u64> {
        self.viewers
            .get(&viewer)?
            .completions
            .get(&(kind, id))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enroll_and_unenroll() {
        let mut ledger = EnrollmentLedger::new();
        ledger.enroll(1, 10, 5);
        assert!(ledger.is_enrolled(1, 10));
        assert!(!ledger.is_enrolled(2, 10));

        assert!(ledger.unenroll(1, 10));
        assert!(!ledger.is_enrolled(1, 10));
        assert!(!ledger.unenroll(1, 10));
        assert!(ledger.knows(1));
    }

    #[test]
    fn test_completion_is_kind_specific() {
        let mut ledger = EnrollmentLedger::new();
        ledger.complete(1, PrerequisiteKind::Course, 10, 99);

        assert!(ledger.is_complete(1, 10, PrerequisiteKind::Course));
        assert!(!ledger.is_complete(1, 10, PrerequisiteKind::Lesson));
        assert_eq!(
            ledger.completion_date(1, 10, PrerequisiteKind::Course),
            Some(99)
        );
    }

    #[test]
    fn test_from_toml_ignores_other_sections() {
        let toml = r#"
[options]
membership_required = 4

[[content]]
id = 4
title = "Gold"
kind = { type = "membership" }

[[viewers]]
id = 7
enrollments = [{ id = 4, at = 100 }]
completions = [{ kind = "course_track", id = 2, at = 300 }]

[[viewers]]
id = 8
"#;

        let ledger = EnrollmentLedger::from_toml(toml).unwrap();
        assert_eq!(ledger.viewer_count(), 2);
        assert_eq!(ledger.enrollment_date(7, 4), Some(100));
        assert!(ledger.is_complete(7, 2, PrerequisiteKind::CourseTrack));
        assert!(ledger.knows(8));
        assert!(!ledger.is_enrolled(8, 4));
    }
}
