//! Restriction predicates
//!
//! Each predicate is a read-only query of `(content id, optional viewer)`
//! that returns `None` when it finds no restriction, or the id (or
//! descriptor) of the object gating the content.
//!
//! | Predicate | Returns |
//! |---|---|
//! | [`RestrictionChecks::sitewide_membership`] | membership id |
//! | [`RestrictionChecks::membership`] | membership id |
//! | [`RestrictionChecks::course_time_period`] | course id |
//! | [`RestrictionChecks::prerequisite`] | prerequisite descriptor |
//! | [`RestrictionChecks::drip`] | lesson id |
//! | [`RestrictionChecks::quiz_accessibility`] | quiz id |
//!
//! Dangling ids in the configuration never restrict anything.

mod membership;
mod prerequisite;
mod quiz;
mod schedule;

use crate::catalog::ConfigurationStore;
use crate::enrollment::EnrollmentOracle;
use crate::result::PrerequisiteKind;
use crate::{ContentId, ViewerId};

/// Restriction predicates bound to a configuration snapshot and a clock
///
/// ## Example
///
/// ```
/// use core_restriction::{CatalogBuilder, EnrollmentLedger, RestrictionChecks};
///
/// let catalog = CatalogBuilder::new()
///     .require_membership(1)
///     .item_with(|item| item.id(1).titled("Gold").membership())
///     .item_with(|item| item.id(2).titled("Blog").page())
///     .build()
///     .unwrap();
/// let ledger = EnrollmentLedger::new();
///
/// let checks = RestrictionChecks::new(&catalog, &ledger, 0);
/// assert_eq!(checks.sitewide_membership(2, None), Some(1));
/// assert_eq!(checks.sitewide_membership(1, None), None);
/// ```
#[derive(Clone, Copy)]
pub struct RestrictionChecks<'a> {
    store: &'a dyn ConfigurationStore,
    oracle: &'a dyn EnrollmentOracle,
    now: u64,
}

impl<'a> RestrictionChecks<'a> {
    /// Bind predicates to a store, an oracle and the current time
    #[must_use]
    pub fn new(
        store: &'a dyn ConfigurationStore,
        oracle: &'a dyn EnrollmentOracle,
        now: u64,
    ) -> Self {
        Self { store, oracle, now }
    }

    /// Configuration store in use
    #[must_use]
    pub fn store(&self) -> &'a dyn ConfigurationStore {
        self.store
    }

    /// Enrollment oracle in use
    #[must_use]
    pub fn oracle(&self) -> &'a dyn EnrollmentOracle {
        self.oracle
    }

    /// Evaluation time (Unix seconds)
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Anonymous viewers are never enrolled
    pub(crate) fn is_enrolled(&self, viewer: Option<ViewerId>, gating_id: ContentId) -> bool {
        viewer.is_some_and(|viewer| self.oracle.is_enrolled(viewer, gating_id))
    }

    /// Anonymous viewers never complete anything
    pub(crate) fn is_complete(
        &self,
        viewer: Option<ViewerId>,
        id: u64,
        kind: PrerequisiteKind,
    ) -> bool {
        viewer.is_some_and(|viewer| self.oracle.is_complete(viewer, id, kind))
    }
}

impl std::fmt::Debug for RestrictionChecks<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestrictionChecks")
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}
