//! Fuzz target for Catalog::from_toml
//!
//! Catalog loading must never panic on arbitrary input, and every catalog
//! it accepts must respect the size limits and resolve without panicking.

#![no_main]

use core_restriction::{
    Catalog, EnrollmentLedger, RestrictionResolver, MAX_CONTENT_ITEMS,
    MAX_MEMBERSHIPS_PER_CONTENT, MAX_TITLE_LENGTH,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(catalog) = Catalog::from_toml(data) else {
        return;
    };

    assert!(catalog.len() <= MAX_CONTENT_ITEMS, "Content count exceeds limit");

    for item in catalog.items() {
        assert_ne!(item.id, 0, "Reserved content id accepted");
        assert!(item.title.len() <= MAX_TITLE_LENGTH, "Title exceeds limit");
        assert!(
            item.membership_restriction.memberships.len() <= MAX_MEMBERSHIPS_PER_CONTENT,
            "Membership list exceeds limit"
        );
    }

    // Resolution and linting never fail on a loaded catalog
    let _ = catalog.lint();
    let ledger = EnrollmentLedger::from_toml(data).unwrap_or_default();
    let resolver = RestrictionResolver::new(&catalog, &ledger, 1_700_000_000);
    for item in catalog.items() {
        let result = resolver.resolve(item.id, None);
        let _ = resolver.format_message(&result, None);
    }
});
