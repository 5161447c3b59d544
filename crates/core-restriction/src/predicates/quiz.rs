//! Quiz accessibility predicate

use super::RestrictionChecks;
use crate::content::ContentKind;
use crate::{ContentId, ViewerId};
use tracing::trace;

impl RestrictionChecks<'_> {
    /// Quiz the viewer cannot reach
    ///
    /// Fires when the quiz has no lesson, its lesson does not exist, or the
    /// viewer is not enrolled in the course that owns the lesson. Returns
    /// `None` for content that is not a quiz.
    #[must_use]
    pub fn quiz_accessibility(
        &self,
        content_id: ContentId,
        viewer: Option<ViewerId>,
    ) -> Option<ContentId> {
        let item = self.store.content(content_id)?;
        let ContentKind::Quiz { lesson } = &item.kind else {
            return None;
        };

        let course = lesson
            .and_then(|lesson| self.store.lesson(lesson))
            .and_then(|lesson| lesson.parent_course());

        match course {
            Some(course) if self.is_enrolled(viewer, course) => None,
            Some(course) => {
                trace!(content_id, course, "viewer not enrolled in quiz course");
                Some(content_id)
            }
            None => {
                trace!(content_id, "quiz has no lesson");
                Some(content_id)
            }
        }
    }
}
