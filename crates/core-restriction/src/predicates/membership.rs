//! Sitewide and per-content membership predicates

use super::RestrictionChecks;
use crate::content::ContentKind;
use crate::{ContentId, ViewerId};
use tracing::trace;

impl RestrictionChecks<'_> {
    /// Membership the whole site is gated behind, unless `content_id` is on
    /// the bypass list
    ///
    /// Fires only when the site option names an existing membership. The
    /// bypass list is matched by exact id: the membership itself, its
    /// restricted-redirect page, and the terms, privacy, memberships
    /// archive, account and checkout pages.
    ///
    /// The viewer is not consulted; enrollment in the returned membership is
    /// checked by the resolver.
    #[must_use]
    pub fn sitewide_membership(
        &self,
        content_id: ContentId,
        _viewer: Option<ViewerId>,
    ) -> Option<ContentId> {
        let options = self.store.options();
        let membership_id = options.membership_required?;
        let membership = self.store.membership(membership_id)?;

        let redirect_page = match &membership.kind {
            ContentKind::Membership { redirect_page, .. } => *redirect_page,
            _ => None,
        };

        let bypassed = content_id == membership_id
            || redirect_page == Some(content_id)
            || options.bypass_pages().any(|page| page == content_id);

        if bypassed {
            trace!(content_id, membership_id, "content bypasses sitewide membership");
            return None;
        }

        Some(membership_id)
    }

    /// Membership a single content item is gated behind
    ///
    /// Kinds gated by direct enrollment (courses, lessons, quizzes,
    /// memberships, questions, certificates) are skipped. Memberships that do
    /// not exist are dropped from the configured list.
    ///
    /// - Anonymous viewer: the first configured membership.
    /// - Known viewer: walks the list backwards, remembering each membership;
    ///   stops with no restriction at the first membership the viewer is
    ///   enrolled in. A viewer in none of them ends on the first configured
    ///   membership.
    #[must_use]
    pub fn membership(&self, content_id: ContentId, viewer: Option<ViewerId>) -> Option<ContentId> {
        let item = self.store.content(content_id)?;
        if item.kind.uses_direct_enrollment() || !item.membership_restriction.enabled {
            return None;
        }

        let memberships: Vec<ContentId> = item
            .membership_restriction
            .memberships
            .iter()
            .copied()
            .filter(|id| self.store.membership(*id).is_some())
            .collect();

        let first = *memberships.first()?;
        let Some(viewer) = viewer else {
            return Some(first);
        };

        let mut restriction_id = None;
        for membership_id in memberships.iter().rev().copied() {
            if self.oracle.is_enrolled(viewer, membership_id) {
                trace!(content_id, viewer, membership_id, "viewer holds membership");
                return None;
            }
            restriction_id = Some(membership_id);
        }

        restriction_id
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::CatalogBuilder;
    use crate::enrollment::EnrollmentLedger;
    use crate::predicates::RestrictionChecks;
    use crate::Catalog;

    const GOLD: u64 = 1;
    const SILVER: u64 = 2;
    const BRONZE: u64 = 3;
    const PAGE: u64 = 10;

    fn catalog() -> Catalog {
        CatalogBuilder::new()
            .item_with(|i| i.id(GOLD).titled("Gold").membership())
            .item_with(|i| i.id(SILVER).titled("Silver").membership())
            .item_with(|i| i.id(BRONZE).titled("Bronze").membership())
            .item_with(|i| {
                i.id(PAGE)
                    .titled("Members area")
                    .page()
                    .restricted_to([GOLD, SILVER, BRONZE])
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_anonymous_gets_first_membership() {
        let catalog = catalog();
        let ledger = EnrollmentLedger::new();
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert_eq!(checks.membership(PAGE, None), Some(GOLD));
    }

    #[test]
    fn test_enrolled_in_middle_membership_is_unrestricted() {
        let catalog = catalog();
        let mut ledger = EnrollmentLedger::new();
        ledger.enroll(5, SILVER, 0);
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert_eq!(checks.membership(PAGE, Some(5)), None);
    }

    #[test]
    fn test_enrolled_nowhere_ends_on_first_membership() {
        let catalog = catalog();
        let ledger = EnrollmentLedger::new();
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert_eq!(checks.membership(PAGE, Some(5)), Some(GOLD));
    }

    #[test]
    fn test_disabled_flag_ignores_list() {
        let mut catalog = catalog();
        let mut item = catalog.items().find(|i| i.id == PAGE).unwrap().clone();
        item.membership_restriction.enabled = false;
        item.id = 11;
        catalog.insert(item).unwrap();

        let ledger = EnrollmentLedger::new();
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);
        assert_eq!(checks.membership(11, None), None);
    }

    #[test]
    fn test_dangling_memberships_are_dropped() {
        let catalog = CatalogBuilder::new()
            .item_with(|i| i.id(GOLD).titled("Gold").membership())
            .item_with(|i| i.id(PAGE).titled("Page").page().restricted_to([99, GOLD]))
            .item_with(|i| i.id(11).titled("Page").page().restricted_to([99]))
            .build()
            .unwrap();
        let ledger = EnrollmentLedger::new();
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert_eq!(checks.membership(PAGE, None), Some(GOLD));
        assert_eq!(checks.membership(11, None), None);
    }

    #[test]
    fn test_direct_enrollment_kinds_skip_membership_gate() {
        let catalog = CatalogBuilder::new()
            .item_with(|i| i.id(GOLD).titled("Gold").membership())
            .item_with(|i| i.id(20).titled("Course").course().restricted_to([GOLD]))
            .build()
            .unwrap();
        let ledger = EnrollmentLedger::new();
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert_eq!(checks.membership(20, None), None);
    }

    #[test]
    fn test_sitewide_bypass_list() {
        let catalog = CatalogBuilder::new()
            .require_membership(GOLD)
            .terms_page(30)
            .privacy_page(31)
            .memberships_page(32)
            .account_page(33)
            .checkout_page(34)
            .item_with(|i| i.id(GOLD).titled("Gold").membership().redirect_page(35))
            .build()
            .unwrap();
        let ledger = EnrollmentLedger::new();
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        for bypassed in [GOLD, 30, 31, 32, 33, 34, 35] {
            assert_eq!(checks.sitewide_membership(bypassed, None), None);
        }
        assert_eq!(checks.sitewide_membership(36, None), Some(GOLD));
    }

    #[test]
    fn test_sitewide_requires_existing_membership() {
        let catalog = CatalogBuilder::new()
            .require_membership(GOLD)
            .item_with(|i| i.id(PAGE).titled("Page").page())
            .build()
            .unwrap();
        let ledger = EnrollmentLedger::new();
        let checks = RestrictionChecks::new(&catalog, &ledger, 0);

        assert_eq!(checks.sitewide_membership(PAGE, None), None);
    }
}
