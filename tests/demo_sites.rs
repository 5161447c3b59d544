//! End-to-end checks against the demo site files

use coursegate::restriction::{PrerequisiteKind, SECONDS_PER_DAY};
use coursegate::utils::{parse_timestamp, SiteParser, TomlParser, YamlParser};
use coursegate::{Reason, RestrictionResolver, RestrictionResult};

const SITE_TOML: &str = include_str!("../demos/site.toml");
const SITE_YAML: &str = include_str!("../demos/site.yaml");

const MARCH_1: u64 = 1_709_251_200;

#[test]
fn test_demo_toml_site() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let site = TomlParser.parse_site(SITE_TOML).unwrap();
    assert!(site.catalog.lint().is_empty());

    let resolver = RestrictionResolver::new(&site.catalog, &site.ledger, MARCH_1);

    // Free lesson and terms page are open to everyone
    assert!(!resolver.is_restricted(20, None));
    assert!(!resolver.is_restricted(2, None));

    // Lesson prerequisite first, then the drip week
    assert_eq!(
        resolver.resolve(22, Some(7)),
        RestrictionResult::restricted(22, 21, Reason::Prerequisite(PrerequisiteKind::Lesson))
    );

    // Course not open yet for anybody a day earlier
    let early = RestrictionResolver::new(&site.catalog, &site.ledger, MARCH_1 - SECONDS_PER_DAY);
    let result = early.resolve(21, Some(7));
    assert_eq!(result.reason(), &Reason::CourseTimePeriod);
    assert_eq!(
        early.format_message(&result, Some(7)),
        "Advanced Rust opens on March 1, 2024."
    );

    // Members lounge
    assert!(!resolver.is_restricted(40, Some(8)));
    let lounge = resolver.resolve(40, Some(7));
    assert_eq!(lounge, RestrictionResult::restricted(40, 1, Reason::Membership));
    assert_eq!(
        resolver.format_message(&lounge, Some(7)),
        "Gold members can read this page."
    );
}

#[test]
fn test_demo_yaml_site() {
    let site = YamlParser.parse_site(SITE_YAML).unwrap();
    let now = parse_timestamp("2024-06-01").unwrap();
    let resolver = RestrictionResolver::new(&site.catalog, &site.ledger, now);

    assert_eq!(
        resolver.resolve(10, None),
        RestrictionResult::restricted(10, 1, Reason::SitewideMembership)
    );
    // Terms page and the membership's redirect page bypass the requirement
    assert!(!resolver.is_restricted(2, None));
    assert!(!resolver.is_restricted(3, None));

    assert_eq!(resolver.resolve(10, Some(8)).reason(), &Reason::EnrollmentCourse);
}
