//! Content domain types
//!
//! - `ContentItem`: an identifiable unit with a title and a kind
//! - `ContentKind`: tagged variant carrying the per-kind restriction settings
//! - `MembershipRestriction`: per-item membership gate
//! - `TimePeriod` / `DripSchedule`: time based availability settings
//!
//! All timestamps are Unix seconds.

use crate::{ContentId, TrackId, SECONDS_PER_DAY};
use serde::{Deserialize, Serialize};

/// Open window of a course
///
/// A bound that is not set never closes the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    /// Course opens at this time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    /// Course closes after this time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,
}

impl TimePeriod {
    /// Create a window with both bounds
    #[must_use]
    pub const fn between(start: u64, end: u64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Create a window that opens at `start` and never closes
    #[must_use]
    pub const fn starting(start: u64) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Create a window that is open until `end`
    #[must_use]
    pub const fn ending(end: u64) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// True when `now` is inside the window (bounds inclusive)
    #[must_use]
    pub fn contains(&self, now: u64) -> bool {
        self.has_opened(now) && !self.has_ended(now)
    }

    /// True once the start bound has been reached
    #[must_use]
    pub fn has_opened(&self, now: u64) -> bool {
        self.start.map_or(true, |start| now >= start)
    }

    /// True once the end bound has passed
    #[must_use]
    pub fn has_ended(&self, now: u64) -> bool {
        self.end.is_some_and(|end| now > end)
    }
}

/// Release rule for a lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DripSchedule {
    /// Available at a fixed time
    Date {
        /// Release timestamp
        at: u64,
    },
    /// Available a number of days after the viewer enrolled in the course
    Enrollment {
        /// Delay in days
        days: u32,
    },
    /// Available a number of days after the course start date
    CourseStart {
        /// Delay in days
        days: u32,
    },
    /// Available a number of days after the viewer completed the lesson's
    /// prerequisite lesson
    Prerequisite {
        /// Delay in days
        days: u32,
    },
}

impl DripSchedule {
    /// Availability time given the base date of this rule
    ///
    /// `base` is ignored for `Date`.
    #[must_use]
    pub fn available_from(&self, base: u64) -> u64 {
        match self {
            Self::Date { at } => *at,
            Self::Enrollment { days } | Self::CourseStart { days } | Self::Prerequisite { days } => {
                base.saturating_add(u64::from(*days) * SECONDS_PER_DAY)
            }
        }
    }
}

/// Course level restriction messages (all optional)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseMessages {
    /// Shown when a viewer is not enrolled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<String>,
    /// Shown before the time period opens; supports `{{start_date}}` / `{{end_date}}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opens: Option<String>,
    /// Shown after the time period closed; supports `{{start_date}}` / `{{end_date}}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<String>,
}

/// Kind of a content item with its kind specific settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentKind {
    /// A course, gated by direct enrollment
    Course {
        /// Optional open window
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_period: Option<TimePeriod>,
        /// Course that must be completed first
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prerequisite: Option<ContentId>,
        /// Course track that must be completed first
        #[serde(default, skip_serializing_if = "Option::is_none")]
        track_prerequisite: Option<TrackId>,
        /// Base date for `course_start` drip schedules
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_date: Option<u64>,
        /// Custom restriction messages
        #[serde(default)]
        messages: CourseMessages,
    },
    /// A lesson inside a course
    Lesson {
        /// Parent course
        course: ContentId,
        /// Free lessons skip every other check
        #[serde(default)]
        free: bool,
        /// Lesson that must be completed first
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prerequisite: Option<ContentId>,
        /// Release rule
        #[serde(default, skip_serializing_if = "Option::is_none")]
        drip: Option<DripSchedule>,
    },
    /// A quiz attached to a lesson
    Quiz {
        /// Parent lesson; a quiz without one is never accessible
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lesson: Option<ContentId>,
    },
    /// A membership, gated by direct enrollment
    Membership {
        /// Page visitors are sent to when restricted; bypasses the sitewide gate
        #[serde(default, skip_serializing_if = "Option::is_none")]
        redirect_page: Option<ContentId>,
        /// Custom restriction notice
        #[serde(default, skip_serializing_if = "Option::is_none")]
        restriction_notice: Option<String>,
    },
    /// A generic page
    Page,
    /// A quiz question
    Question,
    /// A certificate template
    Certificate,
    /// A certificate earned by a student
    EarnedCertificate,
    /// Any other content type, resolved through hooks
    Other {
        /// Type name as known to the host
        post_type: String,
    },
}

impl ContentKind {
    /// Create a plain course kind
    #[must_use]
    pub fn course() -> Self {
        Self::Course {
            time_period: None,
            prerequisite: None,
            track_prerequisite: None,
            start_date: None,
            messages: CourseMessages::default(),
        }
    }

    /// Create a plain lesson kind
    #[must_use]
    pub const fn lesson(course: ContentId) -> Self {
        Self::Lesson {
            course,
            free: false,
            prerequisite: None,
            drip: None,
        }
    }

    /// Create a plain membership kind
    #[must_use]
    pub const fn membership() -> Self {
        Self::Membership {
            redirect_page: None,
            restriction_notice: None,
        }
    }

    /// Short type name used in logs and messages
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Course { .. } => "course",
            Self::Lesson { .. } => "lesson",
            Self::Quiz { .. } => "quiz",
            Self::Membership { .. } => "membership",
            Self::Page => "page",
            Self::Question => "question",
            Self::Certificate => "certificate",
            Self::EarnedCertificate => "earned_certificate",
            Self::Other { post_type } => post_type.as_str(),
        }
    }

    /// True for kinds gated by direct enrollment rather than per-item
    /// membership settings
    #[must_use]
    pub const fn uses_direct_enrollment(&self) -> bool {
        matches!(
            self,
            Self::Course { .. }
                | Self::Lesson { .. }
                | Self::Quiz { .. }
                | Self::Membership { .. }
                | Self::Question
                | Self::Certificate
                | Self::EarnedCertificate
        )
    }
}

/// Membership gate configured on a single content item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRestriction {
    /// Gate is active
    #[serde(default)]
    pub enabled: bool,
    /// Memberships granting access, in configured order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub memberships: Vec<ContentId>,
}

impl MembershipRestriction {
    /// Create an active gate for the given memberships
    #[must_use]
    pub fn to(memberships: impl IntoIterator<Item = ContentId>) -> Self {
        Self {
            enabled: true,
            memberships: memberships.into_iter().collect(),
        }
    }

    /// True when the gate is active and names at least one membership
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.memberships.is_empty()
    }
}

/// A single piece of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique identifier (never 0)
    pub id: ContentId,
    /// Display title
    pub title: String,
    /// Kind and kind specific settings
    pub kind: ContentKind,
    /// Per-item membership gate
    #[serde(default)]
    pub membership_restriction: MembershipRestriction,
}

impl ContentItem {
    /// Create a content item without a membership gate
    #[must_use]
    pub fn new(id: ContentId, title: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            membership_restriction: MembershipRestriction::default(),
        }
    }

    /// Attach a membership gate
    #[must_use]
    pub fn restricted_to(mut self, memberships: impl IntoIterator<Item = ContentId>) -> Self {
        self.membership_restriction = MembershipRestriction::to(memberships);
        self
    }

    /// Parent course of a lesson
    #[must_use]
    pub const fn parent_course(&self) -> Option<ContentId> {
        match self.kind {
            ContentKind::Lesson { course, .. } => Some(course),
            _ => None,
        }
    }

    /// Parent lesson of a quiz
    #[must_use]
    pub const fn parent_lesson(&self) -> Option<ContentId> {
        match self.kind {
            ContentKind::Quiz { lesson } => lesson,
            _ => None,
        }
    }

    /// True for lessons marked free
    #[must_use]
    pub const fn is_free_lesson(&self) -> bool {
        matches!(self.kind, ContentKind::Lesson { free: true, .. })
    }

    /// True for membership items
    #[must_use]
    pub const fn is_membership(&self) -> bool {
        matches!(self.kind, ContentKind::Membership { .. })
    }

    /// True for course items
    #[must_use]
    pub const fn is_course(&self) -> bool {
        matches!(self.kind, ContentKind::Course { .. })
    }

    /// True for lesson items
    #[must_use]
    pub const fn is_lesson(&self) -> bool {
        matches!(self.kind, ContentKind::Lesson { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_period_bounds_inclusive() {
        let period = TimePeriod::between(100, 200);
        assert!(!period.contains(99));
        assert!(period.contains(100));
        assert!(period.contains(200));
        assert!(!period.contains(201));
    }

    #[test]
    fn test_time_period_open_ended() {
        assert!(TimePeriod::default().contains(0));
        assert!(TimePeriod::starting(50).contains(u64::MAX));
        assert!(TimePeriod::ending(50).contains(0));
        assert!(TimePeriod::ending(50).has_ended(51));
    }

    #[test]
    fn test_drip_available_from() {
        assert_eq!(DripSchedule::Date { at: 42 }.available_from(1_000), 42);
        assert_eq!(
            DripSchedule::Enrollment { days: 2 }.available_from(1_000),
            1_000 + 2 * SECONDS_PER_DAY
        );
        assert_eq!(
            DripSchedule::CourseStart { days: 0 }.available_from(1_000),
            1_000
        );
    }

    #[test]
    fn test_drip_available_from_saturates() {
        let drip = DripSchedule::Prerequisite { days: u32::MAX };
        assert_eq!(drip.available_from(u64::MAX - 1), u64::MAX);
    }

    #[test]
    fn test_direct_enrollment_kinds() {
        assert!(ContentKind::course().uses_direct_enrollment());
        assert!(ContentKind::lesson(1).uses_direct_enrollment());
        assert!(ContentKind::Quiz { lesson: None }.uses_direct_enrollment());
        assert!(ContentKind::membership().uses_direct_enrollment());
        assert!(ContentKind::Question.uses_direct_enrollment());
        assert!(ContentKind::Certificate.uses_direct_enrollment());
        assert!(ContentKind::EarnedCertificate.uses_direct_enrollment());
        assert!(!ContentKind::Page.uses_direct_enrollment());
        assert!(!ContentKind::Other {
            post_type: "forum".into()
        }
        .uses_direct_enrollment());
    }

    #[test]
    fn test_membership_restriction_active() {
        assert!(!MembershipRestriction::default().is_active());
        assert!(MembershipRestriction::to([3]).is_active());
        assert!(!MembershipRestriction::to([]).is_active());

        let disabled = MembershipRestriction {
            enabled: false,
            memberships: vec![3],
        };
        assert!(!disabled.is_active());
    }

    #[test]
    fn test_parent_links() {
        let lesson = ContentItem::new(2, "Lesson", ContentKind::lesson(1));
        assert_eq!(lesson.parent_course(), Some(1));
        assert_eq!(lesson.parent_lesson(), None);

        let quiz = ContentItem::new(3, "Quiz", ContentKind::Quiz { lesson: Some(2) });
        assert_eq!(quiz.parent_lesson(), Some(2));
        assert_eq!(quiz.parent_course(), None);
    }
}
