//! Restriction results and reason codes

use crate::error::RestrictionError;
use crate::ContentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of object a prerequisite points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrerequisiteKind {
    /// A course to complete
    Course,
    /// A course track to complete
    CourseTrack,
    /// A lesson to complete
    Lesson,
}

impl PrerequisiteKind {
    /// Snake case name of the kind
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::CourseTrack => "course_track",
            Self::Lesson => "lesson",
        }
    }
}

impl fmt::Display for PrerequisiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gating object a viewer must complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrerequisiteDescriptor {
    /// What kind of object
    pub kind: PrerequisiteKind,
    /// Its identifier (a content id, or a track id for course tracks)
    pub id: u64,
}

impl PrerequisiteDescriptor {
    /// Create a descriptor
    #[must_use]
    pub const fn new(kind: PrerequisiteKind, id: u64) -> Self {
        Self { kind, id }
    }
}

/// Why a piece of content is (or is not) restricted
///
/// Serialized as its snake case code, e.g. `"lesson_drip"` or
/// `"course_track_prerequisite"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Reason {
    /// Nothing restricts the content
    Accessible,
    /// Site requires a membership the viewer lacks
    SitewideMembership,
    /// Content requires a membership the viewer lacks
    Membership,
    /// Viewer is not enrolled in the lesson's course
    EnrollmentLesson,
    /// Viewer is not enrolled in the course
    EnrollmentCourse,
    /// Viewer is not enrolled in the membership
    EnrollmentMembership,
    /// Quiz is not reachable for the viewer
    Quiz,
    /// Course is outside its open window
    CourseTimePeriod,
    /// A prerequisite is not completed
    Prerequisite(PrerequisiteKind),
    /// Lesson has not been released yet
    LessonDrip,
    /// Reason introduced by a hook
    Custom(String),
}

impl Reason {
    /// Snake case reason code
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Accessible => "accessible",
            Self::SitewideMembership => "sitewide_membership",
            Self::Membership => "membership",
            Self::EnrollmentLesson => "enrollment_lesson",
            Self::EnrollmentCourse => "enrollment_course",
            Self::EnrollmentMembership => "enrollment_membership",
            Self::Quiz => "quiz",
            Self::CourseTimePeriod => "course_time_period",
            Self::Prerequisite(PrerequisiteKind::Course) => "course_prerequisite",
            Self::Prerequisite(PrerequisiteKind::CourseTrack) => "course_track_prerequisite",
            Self::Prerequisite(PrerequisiteKind::Lesson) => "lesson_prerequisite",
            Self::LessonDrip => "lesson_drip",
            Self::Custom(code) => code.as_str(),
        }
    }

    /// Parse a reason code; unknown codes become `Custom`
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "accessible" => Self::Accessible,
            "sitewide_membership" => Self::SitewideMembership,
            "membership" => Self::Membership,
            "enrollment_lesson" => Self::EnrollmentLesson,
            "enrollment_course" => Self::EnrollmentCourse,
            "enrollment_membership" => Self::EnrollmentMembership,
            "quiz" => Self::Quiz,
            "course_time_period" => Self::CourseTimePeriod,
            "course_prerequisite" => Self::Prerequisite(PrerequisiteKind::Course),
            "course_track_prerequisite" => Self::Prerequisite(PrerequisiteKind::CourseTrack),
            "lesson_prerequisite" => Self::Prerequisite(PrerequisiteKind::Lesson),
            "lesson_drip" => Self::LessonDrip,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for Reason {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<Reason> for String {
    fn from(reason: Reason) -> Self {
        reason.code().to_string()
    }
}

/// Outcome of a restriction check
///
/// Accessible results always carry `restriction_id == 0` and
/// `Reason::Accessible`; the constructors enforce this, and deserialized
/// results pass through `TryFrom<RestrictionResultRaw>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RestrictionResultRaw")]
pub struct RestrictionResult {
    content_id: ContentId,
    restriction_id: u64,
    is_restricted: bool,
    reason: Reason,
}

/// Raw result structure for deserialization (internal use only)
#[derive(Debug, Deserialize)]
struct RestrictionResultRaw {
    content_id: ContentId,
    #[serde(default)]
    restriction_id: u64,
    is_restricted: bool,
    reason: Reason,
}

impl TryFrom<RestrictionResultRaw> for RestrictionResult {
    type Error = RestrictionError;

    fn try_from(raw: RestrictionResultRaw) -> Result<Self, Self::Error> {
        let accessible = raw.reason == Reason::Accessible;
        if raw.is_restricted == accessible || (!raw.is_restricted && raw.restriction_id != 0) {
            return Err(RestrictionError::InconsistentResult {
                content_id: raw.content_id,
                reason: raw.reason.code().to_string(),
            });
        }

        if raw.is_restricted {
            Ok(Self::restricted(raw.content_id, raw.restriction_id, raw.reason))
        } else {
            Ok(Self::accessible(raw.content_id))
        }
    }
}

impl RestrictionResult {
    /// Result for content nothing restricts
    #[must_use]
    pub const fn accessible(content_id: ContentId) -> Self {
        Self {
            content_id,
            restriction_id: 0,
            is_restricted: false,
            reason: Reason::Accessible,
        }
    }

    /// Result for restricted content
    ///
    /// `Reason::Accessible` yields an accessible result.
    #[must_use]
    pub fn restricted(content_id: ContentId, restriction_id: u64, reason: Reason) -> Self {
        if reason == Reason::Accessible {
            return Self::accessible(content_id);
        }

        Self {
            content_id,
            restriction_id,
            is_restricted: true,
            reason,
        }
    }

    /// Content the result is about
    #[must_use]
    pub const fn content_id(&self) -> ContentId {
        self.content_id
    }

    /// Object gating the content (0 when accessible)
    #[must_use]
    pub const fn restriction_id(&self) -> u64 {
        self.restriction_id
    }

    /// True when the viewer may not see the content
    #[must_use]
    pub const fn is_restricted(&self) -> bool {
        self.is_restricted
    }

    /// Reason code
    #[must_use]
    pub const fn reason(&self) -> &Reason {
        &self.reason
    }
}
