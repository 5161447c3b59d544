//! Time based predicates: course open window and lesson drip

use super::RestrictionChecks;
use crate::content::{ContentItem, ContentKind, DripSchedule};
use crate::result::PrerequisiteKind;
use crate::{ContentId, ViewerId};
use tracing::trace;

impl RestrictionChecks<'_> {
    /// Course whose open window excludes now
    ///
    /// Applies to lessons and quizzes (through their lesson). Courses without
    /// a time period are always open.
    #[must_use]
    pub fn course_time_period(
        &self,
        content_id: ContentId,
        _viewer: Option<ViewerId>,
    ) -> Option<ContentId> {
        let lesson = self.store.owning_lesson(content_id)?;
        let course_id = lesson.parent_course()?;
        let course = self.store.course(course_id)?;

        match &course.kind {
            ContentKind::Course {
                time_period: Some(period),
                ..
            } if !period.contains(self.now) => {
                trace!(content_id, course_id, now = self.now, "course is closed");
                Some(course_id)
            }
            _ => None,
        }
    }

    /// Lesson that has not been released yet
    ///
    /// Applies to lessons and quizzes (through their lesson).
    #[must_use]
    pub fn drip(&self, content_id: ContentId, viewer: Option<ViewerId>) -> Option<ContentId> {
        let lesson = self.store.owning_lesson(content_id)?;
        let available_at = self.lesson_available_at(lesson, viewer)?;

        if self.now < available_at {
            trace!(
                content_id,
                lesson_id = lesson.id,
                available_at,
                "lesson is not released yet"
            );
            return Some(lesson.id);
        }

        None
    }

    /// Release time of a lesson for a viewer
    ///
    /// `None` when the lesson has no drip schedule, or when the schedule's
    /// base date cannot be determined (viewer not enrolled, course without a
    /// start date, prerequisite not completed). Such lessons count as
    /// released.
    #[must_use]
    pub fn lesson_available_at(
        &self,
        lesson: &ContentItem,
        viewer: Option<ViewerId>,
    ) -> Option<u64> {
        let ContentKind::Lesson {
            course,
            prerequisite,
            drip: Some(drip),
            ..
        } = &lesson.kind
        else {
            return None;
        };

        let base = match drip {
            DripSchedule::Date { .. } => 0,
            DripSchedule::Enrollment { .. } => {
                self.oracle.enrollment_date(viewer?, *course)?
            }
            DripSchedule::CourseStart { .. } => match &self.store.course(*course)?.kind {
                ContentKind::Course { start_date, .. } => (*start_date)?,
                _ => return None,
            },
            DripSchedule::Prerequisite { .. } => {
                self.oracle
                    .completion_date(viewer?, (*prerequisite)?, PrerequisiteKind::Lesson)?
            }
        };

        Some(drip.available_from(base))
    }
}
