//! Fuzz target for YamlParser::parse_site
//!
//! Verifies that:
//! - serde_yaml handles malformed YAML without panicking
//! - catalog limits still hold on YAML input
//! - deeply nested documents do not exhaust memory

#![no_main]

use app_utils::{SiteParser, YamlParser};
use core_restriction::{
    RestrictionResolver, MAX_CONTENT_ITEMS, MAX_MEMBERSHIPS_PER_CONTENT, MAX_TITLE_LENGTH,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(site) = YamlParser.parse_site(data) else {
        return;
    };

    assert!(site.catalog.len() <= MAX_CONTENT_ITEMS);
    for item in site.catalog.items() {
        assert_ne!(item.id, 0);
        assert!(item.title.len() <= MAX_TITLE_LENGTH);
        assert!(item.membership_restriction.memberships.len() <= MAX_MEMBERSHIPS_PER_CONTENT);
    }

    let resolver = RestrictionResolver::new(&site.catalog, &site.ledger, 0);
    for item in site.catalog.items() {
        let _ = resolver.resolve(item.id, None);
    }
});
