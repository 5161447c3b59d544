//! Restriction resolution
//!
//! Runs the predicates in a fixed priority order and returns the first
//! restriction that applies:
//!
//! 1. Home listings: sitewide membership
//! 2. Search listings without a site membership requirement: accessible
//! 3. Singular views: sitewide membership, then per-content membership,
//!    then the enrollment gate of the content kind (free lessons stop here
//!    as accessible); other kinds ask the hook registry for a gate
//! 4. Gate found and viewer anonymous or not enrolled: restricted
//! 5. Singular quizzes: quiz accessibility; singular lessons and quizzes:
//!    course time period, prerequisite, drip
//! 6. Accessible
//!
//! Every result passes through [`HookRegistry::filter_result`].

use crate::catalog::ConfigurationStore;
use crate::content::ContentKind;
use crate::enrollment::EnrollmentOracle;
use crate::hooks::{Gate, HookRegistry};
use crate::message::MessageFormatter;
use crate::predicates::RestrictionChecks;
use crate::result::{Reason, RestrictionResult};
use crate::{ContentId, ViewerId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

static NO_HOOKS: HookRegistry = HookRegistry::new();

/// Kind of page the content is viewed on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewContext {
    /// A single piece of content
    #[default]
    Singular,
    /// The site's home listing
    Home,
    /// Search results
    Search,
    /// Any other listing (categories, tags, archives)
    Archive,
}

impl ViewContext {
    /// Snake case name of the context
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Singular => "singular",
            Self::Home => "home",
            Self::Search => "search",
            Self::Archive => "archive",
        }
    }
}

impl std::str::FromStr for ViewContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "singular" => Ok(Self::Singular),
            "home" => Ok(Self::Home),
            "search" => Ok(Self::Search),
            "archive" => Ok(Self::Archive),
            other => Err(format!("unknown view context: {}", other)),
        }
    }
}

/// Trait for types that can decide content restrictions
///
/// Clients depend on this abstraction rather than on [`RestrictionResolver`].
pub trait Resolver {
    /// Decide whether a viewer may see the content
    fn resolve(&self, content_id: ContentId, viewer: Option<ViewerId>) -> RestrictionResult;

    /// Convenience wrapper over [`Resolver::resolve`]
    fn is_restricted(&self, content_id: ContentId, viewer: Option<ViewerId>) -> bool {
        self.resolve(content_id, viewer).is_restricted()
    }
}

/// Decides restrictions from a configuration store and an enrollment oracle
///
/// Resolution never fails and never mutates state: identical inputs against
/// unchanged stores give identical results.
///
/// ## Example
///
/// ```
/// use core_restriction::{CatalogBuilder, EnrollmentLedger, Reason, RestrictionResolver};
///
/// let catalog = CatalogBuilder::new()
///     .item_with(|item| item.id(1).titled("Rust 101").course())
///     .item_with(|item| item.id(2).titled("Welcome").lesson_of(1).free())
///     .build()
///     .unwrap();
/// let ledger = EnrollmentLedger::new();
/// let resolver = RestrictionResolver::new(&catalog, &ledger, 0);
///
/// let course = resolver.resolve(1, None);
/// assert!(course.is_restricted());
/// assert_eq!(course.reason(), &Reason::EnrollmentCourse);
/// assert_eq!(course.restriction_id(), 1);
///
/// assert!(!resolver.is_restricted(2, None));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RestrictionResolver<'a> {
    checks: RestrictionChecks<'a>,
    hooks: &'a HookRegistry,
}

impl<'a> RestrictionResolver<'a> {
    /// Create a resolver evaluating at `now` (Unix seconds) without hooks
    #[must_use]
    pub fn new(
        store: &'a dyn ConfigurationStore,
        oracle: &'a dyn EnrollmentOracle,
        now: u64,
    ) -> Self {
        Self {
            checks: RestrictionChecks::new(store, oracle, now),
            hooks: &NO_HOOKS,
        }
    }

    /// Use a hook registry
    #[must_use]
    pub fn with_hooks(mut self, hooks: &'a HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    /// Predicates used by this resolver
    #[must_use]
    pub const fn checks(&self) -> &RestrictionChecks<'a> {
        &self.checks
    }

    /// Hook registry used by this resolver
    #[must_use]
    pub const fn hooks(&self) -> &'a HookRegistry {
        self.hooks
    }

    /// Decide whether a viewer may see the content on a singular view
    #[must_use]
    pub fn resolve(&self, content_id: ContentId, viewer: Option<ViewerId>) -> RestrictionResult {
        self.resolve_in(ViewContext::Singular, content_id, viewer)
    }

    /// Convenience wrapper over [`RestrictionResolver::resolve`]
    #[must_use]
    pub fn is_restricted(&self, content_id: ContentId, viewer: Option<ViewerId>) -> bool {
        self.resolve(content_id, viewer).is_restricted()
    }

    /// Decide whether a viewer may see the content in the given context
    #[must_use]
    pub fn resolve_in(
        &self,
        context: ViewContext,
        content_id: ContentId,
        viewer: Option<ViewerId>,
    ) -> RestrictionResult {
        let result = self.evaluate(context, content_id, viewer);

        if result.is_restricted() {
            debug!(
                content_id,
                viewer,
                context = context.as_str(),
                reason = %result.reason(),
                restriction_id = result.restriction_id(),
                "content restricted"
            );
        } else {
            trace!(content_id, viewer, context = context.as_str(), "content accessible");
        }

        self.hooks.filter_result(result, viewer)
    }

    /// Formatter for messages shown to `viewer`
    #[must_use]
    pub fn message_formatter(&self, viewer: Option<ViewerId>) -> MessageFormatter<'a> {
        MessageFormatter::new(self.checks, self.hooks).for_viewer(viewer)
    }

    /// Explain a result to the viewer it was computed for
    #[must_use]
    pub fn format_message(&self, result: &RestrictionResult, viewer: Option<ViewerId>) -> String {
        self.message_formatter(viewer).format_message(result)
    }

    fn evaluate(
        &self,
        context: ViewContext,
        content_id: ContentId,
        viewer: Option<ViewerId>,
    ) -> RestrictionResult {
        let checks = &self.checks;
        let store = checks.store();
        let item = store.content(content_id);

        let sitewide = checks.sitewide_membership(content_id, viewer);
        let singular = context == ViewContext::Singular;

        let gate = match context {
            ViewContext::Home if sitewide.is_some() => {
                sitewide.map(|id| Gate::new(id, Reason::SitewideMembership))
            }
            ViewContext::Search if store.options().membership_required.is_none() => {
                return RestrictionResult::accessible(content_id);
            }
            ViewContext::Singular => {
                if let Some(id) = sitewide {
                    Some(Gate::new(id, Reason::SitewideMembership))
                } else if let Some(id) = checks.membership(content_id, viewer) {
                    Some(Gate::new(id, Reason::Membership))
                } else {
                    match item.map(|item| &item.kind) {
                        Some(ContentKind::Lesson { free: true, .. }) => {
                            trace!(content_id, "free lesson");
                            return RestrictionResult::accessible(content_id);
                        }
                        Some(ContentKind::Lesson { course, .. }) => {
                            Some(Gate::new(*course, Reason::EnrollmentLesson))
                        }
                        Some(ContentKind::Course { .. }) => {
                            Some(Gate::new(content_id, Reason::EnrollmentCourse))
                        }
                        Some(ContentKind::Membership { .. }) => {
                            Some(Gate::new(content_id, Reason::EnrollmentMembership))
                        }
                        Some(
                            ContentKind::Quiz { .. }
                            | ContentKind::Page
                            | ContentKind::Question
                            | ContentKind::Certificate
                            | ContentKind::EarnedCertificate
                            | ContentKind::Other { .. },
                        )
                        | None => self.hooks.before_check_access(item, viewer, None),
                    }
                }
            }
            _ => self.hooks.before_check_access(item, viewer, None),
        };

        // Single enrollment test shared by every gate. A hook gate carrying
        // the accessible reason gates nothing.
        if let Some(gate) =
            gate.filter(|gate| gate.restriction_id != 0 && gate.reason != Reason::Accessible)
        {
            if !checks.is_enrolled(viewer, gate.restriction_id) {
                return RestrictionResult::restricted(content_id, gate.restriction_id, gate.reason);
            }
        }

        if !singular {
            return RestrictionResult::accessible(content_id);
        }

        let (is_quiz, is_lesson_or_quiz) = match item.map(|item| &item.kind) {
            Some(ContentKind::Quiz { .. }) => (true, true),
            Some(ContentKind::Lesson { .. }) => (false, true),
            _ => (false, false),
        };

        if is_quiz {
            if let Some(quiz_id) = checks.quiz_accessibility(content_id, viewer) {
                return RestrictionResult::restricted(content_id, quiz_id, Reason::Quiz);
            }
        }

        if is_lesson_or_quiz {
            if let Some(course_id) = checks.course_time_period(content_id, viewer) {
                return RestrictionResult::restricted(
                    content_id,
                    course_id,
                    Reason::CourseTimePeriod,
                );
            }

            if let Some(prerequisite) = checks.prerequisite(content_id, viewer) {
                return RestrictionResult::restricted(
                    content_id,
                    prerequisite.id,
                    Reason::Prerequisite(prerequisite.kind),
                );
            }

            if let Some(lesson_id) = checks.drip(content_id, viewer) {
                return RestrictionResult::restricted(content_id, lesson_id, Reason::LessonDrip);
            }
        }

        RestrictionResult::accessible(content_id)
    }
}

impl Resolver for RestrictionResolver<'_> {
    fn resolve(&self, content_id: ContentId, viewer: Option<ViewerId>) -> RestrictionResult {
        RestrictionResolver::resolve(self, content_id, viewer)
    }
}
