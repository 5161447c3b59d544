//! Human readable restriction messages
//!
//! Messages are keyed by reason code and filled in with titles and dates
//! from the configuration store. Reasons without a template, and templates
//! whose data is missing, fall back to [`GENERIC_MESSAGE`]. Every message
//! passes through [`HookRegistry::filter_message`].

use crate::catalog::{ConfigurationStore, DEFAULT_DATE_FORMAT};
use crate::content::{ContentItem, ContentKind};
use crate::hooks::HookRegistry;
use crate::predicates::RestrictionChecks;
use crate::result::{PrerequisiteKind, Reason, RestrictionResult};
use crate::{ContentId, ViewerId};
use chrono::DateTime;
use std::fmt::Write;

/// Message for reasons without a dedicated template
pub const GENERIC_MESSAGE: &str = "You do not have permission to access this content.";

/// Message for quizzes outside the viewer's reach
pub const QUIZ_MESSAGE: &str = "You must be enrolled in the course to access this quiz.";

const DEFAULT_OPENS_MESSAGE: &str = "This course opens on {{start_date}}.";
const DEFAULT_CLOSED_MESSAGE: &str = "This course closed on {{end_date}}.";

/// Formats restriction results into messages
///
/// Drip dates depend on the viewer (enrollment and completion dates), so a
/// formatter is bound to the viewer the result was computed for.
#[derive(Debug, Clone, Copy)]
pub struct MessageFormatter<'a> {
    checks: RestrictionChecks<'a>,
    hooks: &'a HookRegistry,
    viewer: Option<ViewerId>,
}

impl<'a> MessageFormatter<'a> {
    /// Create a formatter for an anonymous viewer
    #[must_use]
    pub fn new(checks: RestrictionChecks<'a>, hooks: &'a HookRegistry) -> Self {
        Self {
            checks,
            hooks,
            viewer: None,
        }
    }

    /// Bind the formatter to a viewer
    #[must_use]
    pub const fn for_viewer(mut self, viewer: Option<ViewerId>) -> Self {
        self.viewer = viewer;
        self
    }

    /// Explain a restriction result
    #[must_use]
    pub fn format_message(&self, result: &RestrictionResult) -> String {
        let restriction_id = result.restriction_id();

        let message = match result.reason() {
            Reason::SitewideMembership | Reason::Membership | Reason::EnrollmentMembership => {
                self.membership_message(restriction_id)
            }
            Reason::EnrollmentLesson | Reason::EnrollmentCourse => {
                self.enrollment_message(restriction_id)
            }
            Reason::Quiz => Some(QUIZ_MESSAGE.to_string()),
            Reason::CourseTimePeriod => self.time_period_message(restriction_id),
            Reason::Prerequisite(kind) => {
                self.prerequisite_message(result.content_id(), *kind, restriction_id)
            }
            Reason::LessonDrip => self.drip_message(restriction_id),
            Reason::Accessible | Reason::Custom(_) => None,
        }
        .unwrap_or_else(|| GENERIC_MESSAGE.to_string());

        self.hooks.filter_message(result, message)
    }

    /// Format a timestamp with the site date format
    ///
    /// Falls back to the default format when the configured one is invalid,
    /// and to the raw number for timestamps chrono cannot represent.
    #[must_use]
    pub fn format_date(&self, timestamp: u64) -> String {
        let Some(date) = i64::try_from(timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        else {
            return timestamp.to_string();
        };

        let mut out = String::new();
        let format = &self.store().options().date_format;
        if write!(out, "{}", date.format(format)).is_ok() {
            return out;
        }

        out.clear();
        match write!(out, "{}", date.format(DEFAULT_DATE_FORMAT)) {
            Ok(()) => out,
            Err(_) => timestamp.to_string(),
        }
    }

    fn store(&self) -> &'a dyn ConfigurationStore {
        self.checks.store()
    }

    fn membership_message(&self, membership_id: ContentId) -> Option<String> {
        let membership = self.store().membership(membership_id)?;
        match &membership.kind {
            ContentKind::Membership {
                restriction_notice: Some(notice),
                ..
            } => Some(notice.clone()),
            _ => Some(format!(
                "You must belong to the \"{}\" membership to access this content.",
                membership.title
            )),
        }
    }

    fn enrollment_message(&self, course_id: ContentId) -> Option<String> {
        let course = self.store().course(course_id)?;
        match &course.kind {
            ContentKind::Course { messages, .. } if messages.enrollment.is_some() => {
                messages.enrollment.clone()
            }
            _ => Some(format!(
                "You must enroll in \"{}\" to access this content.",
                course.title
            )),
        }
    }

    fn time_period_message(&self, course_id: ContentId) -> Option<String> {
        let course = self.store().course(course_id)?;
        let ContentKind::Course {
            time_period: Some(period),
            messages,
            ..
        } = &course.kind
        else {
            return None;
        };

        let template = if period.has_opened(self.checks.now()) {
            messages.closed.as_deref().unwrap_or(DEFAULT_CLOSED_MESSAGE)
        } else {
            messages.opens.as_deref().unwrap_or(DEFAULT_OPENS_MESSAGE)
        };

        let start = period.start.map(|t| self.format_date(t)).unwrap_or_default();
        let end = period.end.map(|t| self.format_date(t)).unwrap_or_default();

        Some(
            template
                .replace("{{start_date}}", &start)
                .replace("{{end_date}}", &end),
        )
    }

    fn prerequisite_message(
        &self,
        content_id: ContentId,
        kind: PrerequisiteKind,
        prerequisite_id: u64,
    ) -> Option<String> {
        let content = self.store().content(content_id)?;

        let store = self.store();
        let (noun, title) = match kind {
            PrerequisiteKind::Course => ("course ", store.course(prerequisite_id)?.title.as_str()),
            PrerequisiteKind::CourseTrack => ("track ", store.track_title(prerequisite_id)?),
            PrerequisiteKind::Lesson => ("", store.lesson(prerequisite_id)?.title.as_str()),
        };

        Some(format!(
            "The {} \"{}\" cannot be accessed until the required prerequisite {}\"{}\" is completed.",
            subject_noun(content),
            content.title,
            noun,
            title
        ))
    }

    fn drip_message(&self, lesson_id: ContentId) -> Option<String> {
        let lesson = self.store().lesson(lesson_id)?;
        let available_at = self.checks.lesson_available_at(lesson, self.viewer)?;

        Some(format!(
            "The lesson \"{}\" will be available on {}.",
            lesson.title,
            self.format_date(available_at)
        ))
    }
}

// Quizzes read as the lesson they belong to
fn subject_noun(item: &ContentItem) -> &str {
    match &item.kind {
        ContentKind::Course { .. } => "course",
        _ => "lesson",
    }
}
