//! Prerequisite predicate

use super::RestrictionChecks;
use crate::content::ContentKind;
use crate::result::{PrerequisiteDescriptor, PrerequisiteKind};
use crate::{ContentId, ViewerId};
use tracing::trace;

impl RestrictionChecks<'_> {
    /// Prerequisites of a lesson or quiz in priority order
    ///
    /// Course prerequisite, then course track prerequisite, then the
    /// lesson's own prerequisite. Ids that do not resolve (missing course,
    /// unknown track, missing lesson) are left out.
    #[must_use]
    pub fn prerequisite_candidates(&self, content_id: ContentId) -> Vec<PrerequisiteDescriptor> {
        let mut candidates = Vec::new();

        let Some(lesson) = self.store.owning_lesson(content_id) else {
            return candidates;
        };
        let ContentKind::Lesson {
            course,
            prerequisite: lesson_prerequisite,
            ..
        } = &lesson.kind
        else {
            return candidates;
        };

        if let Some(ContentKind::Course {
            prerequisite,
            track_prerequisite,
            ..
        }) = self.store.course(*course).map(|course| &course.kind)
        {
            if let Some(id) = prerequisite.filter(|id| self.store.course(*id).is_some()) {
                candidates.push(PrerequisiteDescriptor::new(PrerequisiteKind::Course, id));
            }
            if let Some(id) = track_prerequisite.filter(|id| self.store.track_title(*id).is_some())
            {
                candidates.push(PrerequisiteDescriptor::new(
                    PrerequisiteKind::CourseTrack,
                    id,
                ));
            }
        }

        if let Some(id) = lesson_prerequisite.filter(|id| self.store.lesson(*id).is_some()) {
            candidates.push(PrerequisiteDescriptor::new(PrerequisiteKind::Lesson, id));
        }

        candidates
    }

    /// First prerequisite the viewer has not completed
    ///
    /// Anonymous viewers get the first candidate unconditionally.
    #[must_use]
    pub fn prerequisite(
        &self,
        content_id: ContentId,
        viewer: Option<ViewerId>,
    ) -> Option<PrerequisiteDescriptor> {
        let candidates = self.prerequisite_candidates(content_id);

        let found = match viewer {
            None => candidates.first().copied(),
            Some(_) => candidates
                .into_iter()
                .find(|candidate| !self.is_complete(viewer, candidate.id, candidate.kind)),
        };

        if let Some(descriptor) = &found {
            trace!(
                content_id,
                kind = %descriptor.kind,
                prerequisite_id = descriptor.id,
                "prerequisite incomplete"
            );
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::CatalogBuilder;
    use crate::enrollment::EnrollmentLedger;
    use crate::predicates::RestrictionChecks;
    use crate::result::{PrerequisiteDescriptor, PrerequisiteKind};
    use crate::Catalog;

    const BASICS: u64 = 1;
    const COURSE: u64 = 2;
    const INTRO: u64 = 3;
    const LESSON: u64 = 4;
    const QUIZ: u64 = 5;
    const TRACK: u64 = 100;

    fn catalog() -> Catalog {
        CatalogBuilder::new()
            .track(TRACK, "Foundations")
            .item_with(|i| i.id(BASICS).titled("Basics").course())
            .item_with(|i| {
                i.id(COURSE)
                    .titled("Advanced")
                    .course()
                    .prerequisite(BASICS)
                    .track_prerequisite(TRACK)
            })
            .item_with(|i| i.id(INTRO).titled("Intro").lesson_of(COURSE))
            .item_with(|i| {
                i.id(LESSON)
                    .titled("Deep dive")
                    .lesson_of(COURSE)
                    .prerequisite(INTRO)
            })
            .item_with(|i| i.id(QUIZ).titled("Quiz").quiz_of(LESSON))
            .build()
            .unwrap()
    }

    #[test]
    fn test_candidate_order() {
        let catalog = catalog();
        let ledger = EnrollmentLedger::new();
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert_eq!(
            checks.prerequisite_candidates(LESSON),
            vec![
                PrerequisiteDescriptor::new(PrerequisiteKind::Course, BASICS),
                PrerequisiteDescriptor::new(PrerequisiteKind::CourseTrack, TRACK),
                PrerequisiteDescriptor::new(PrerequisiteKind::Lesson, INTRO),
            ]
        );
        assert_eq!(
            checks.prerequisite_candidates(QUIZ),
            checks.prerequisite_candidates(LESSON)
        );
    }

    #[test]
    fn test_anonymous_gets_first_candidate() {
        let catalog = catalog();
        let ledger = EnrollmentLedger::new();
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert_eq!(
            checks.prerequisite(LESSON, None),
            Some(PrerequisiteDescriptor::new(PrerequisiteKind::Course, BASICS))
        );
    }

    #[test]
    fn test_viewer_gets_first_incomplete() {
        let catalog = catalog();
        let mut ledger = EnrollmentLedger::new();
        ledger.complete(7, PrerequisiteKind::Course, BASICS, 0);
        ledger.complete(7, PrerequisiteKind::CourseTrack, TRACK, 0);
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert_eq!(
            checks.prerequisite(LESSON, Some(7)),
            Some(PrerequisiteDescriptor::new(PrerequisiteKind::Lesson, INTRO))
        );
        // Intro itself has only the course level prerequisites
        assert_eq!(checks.prerequisite(INTRO, Some(7)), None);
    }

    #[test]
    fn test_all_complete_is_unrestricted() {
        let catalog = catalog();
        let mut ledger = EnrollmentLedger::new();
        ledger.complete(7, PrerequisiteKind::Course, BASICS, 0);
        ledger.complete(7, PrerequisiteKind::CourseTrack, TRACK, 0);
        ledger.complete(7, PrerequisiteKind::Lesson, INTRO, 0);
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert_eq!(checks.prerequisite(QUIZ, Some(7)), None);
    }

    #[test]
    fn test_dangling_prerequisites_are_ignored() {
        let catalog = CatalogBuilder::new()
            .item_with(|i| {
                i.id(COURSE)
                    .titled("Advanced")
                    .course()
                    .prerequisite(99)
                    .track_prerequisite(98)
            })
            .item_with(|i| {
                i.id(LESSON)
                    .titled("Deep dive")
                    .lesson_of(COURSE)
                    .prerequisite(97)
            })
            .build()
            .unwrap();
        let ledger = EnrollmentLedger::new();
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert!(checks.prerequisite_candidates(LESSON).is_empty());
        assert_eq!(checks.prerequisite(LESSON, None), None);
    }
}
