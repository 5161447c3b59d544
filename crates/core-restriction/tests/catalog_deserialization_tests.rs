//! Tests for loading catalogs and ledgers from TOML

use core_restriction::{
    Catalog, CatalogWarning, ConfigurationStore, ContentKind, CourseMessages, DripSchedule,
    EnrollmentLedger, EnrollmentOracle, PrerequisiteKind, RestrictionError, TimePeriod,
    MAX_MEMBERSHIPS_PER_CONTENT, MAX_TITLE_LENGTH,
};

const SITE: &str = r#"
[options]
membership_required = 1
terms_page = 2
date_format = "%Y-%m-%d"

[[tracks]]
id = 5
title = "Foundations"

[[content]]
id = 1
title = "Gold"
kind = { type = "membership", redirect_page = 3, restriction_notice = "Gold members only" }

[[content]]
id = 2
title = "Terms"
kind = { type = "page" }

[[content]]
id = 3
title = "Join us"
kind = { type = "page" }
membership_restriction = { enabled = true, memberships = [1] }

[[content]]
id = 10
title = "Rust 101"

[content.kind]
type = "course"
track_prerequisite = 5
start_date = 1700000000
time_period = { start = 1700000000, end = 1800000000 }
messages = { enrollment = "Enroll first", opens = "Opens {{start_date}}" }

[[content]]
id = 11
title = "Ownership"
kind = { type = "lesson", course = 10, drip = { method = "course_start", days = 3 } }

[[content]]
id = 12
title = "Borrowing"
kind = { type = "lesson", course = 10, free = true }

[[content]]
id = 13
title = "Check"
kind = { type = "quiz", lesson = 11 }

[[content]]
id = 14
title = "Forum topic"
kind = { type = "other", post_type = "forum" }

[[viewers]]
id = 7
enrollments = [{ id = 1, at = 100 }, { id = 10, at = 1700000500 }]
completions = [{ kind = "course_track", id = 5, at = 1700000600 }]

[[viewers]]
id = 8
"#;

#[test]
fn test_site_file_loads() {
    let catalog = Catalog::from_toml(SITE).unwrap();

    assert_eq!(catalog.len(), 8);
    assert_eq!(catalog.options().membership_required, Some(1));
    assert_eq!(catalog.options().terms_page, Some(2));
    assert_eq!(catalog.options().date_format, "%Y-%m-%d");
    assert_eq!(catalog.track_title(5), Some("Foundations"));
    assert!(catalog.lint().is_empty());
}

#[test]
fn test_kinds_deserialize() {
    let catalog = Catalog::from_toml(SITE).unwrap();

    assert_eq!(
        catalog.content(1).unwrap().kind,
        ContentKind::Membership {
            redirect_page: Some(3),
            restriction_notice: Some("Gold members only".into()),
        }
    );
    assert_eq!(
        catalog.content(10).unwrap().kind,
        ContentKind::Course {
            time_period: Some(TimePeriod::between(1_700_000_000, 1_800_000_000)),
            prerequisite: None,
            track_prerequisite: Some(5),
            start_date: Some(1_700_000_000),
            messages: CourseMessages {
                enrollment: Some("Enroll first".into()),
                opens: Some("Opens {{start_date}}".into()),
                closed: None,
            },
        }
    );
    assert_eq!(
        catalog.content(11).unwrap().kind,
        ContentKind::Lesson {
            course: 10,
            free: false,
            prerequisite: None,
            drip: Some(DripSchedule::CourseStart { days: 3 }),
        }
    );
    assert!(catalog.content(12).unwrap().is_free_lesson());
    assert_eq!(catalog.content(13).unwrap().parent_lesson(), Some(11));
    assert_eq!(catalog.content(14).unwrap().kind.type_name(), "forum");

    let page = catalog.content(3).unwrap();
    assert!(page.membership_restriction.is_active());
    assert_eq!(page.membership_restriction.memberships, vec![1]);
}

#[test]
fn test_ledger_loads_from_same_file() {
    let ledger = EnrollmentLedger::from_toml(SITE).unwrap();

    assert_eq!(ledger.viewer_count(), 2);
    assert!(ledger.knows(8));
    assert!(ledger.is_enrolled(7, 10));
    assert_eq!(ledger.enrollment_date(7, 10), Some(1_700_000_500));
    assert!(ledger.is_complete(7, 5, PrerequisiteKind::CourseTrack));
    assert!(!ledger.is_enrolled(8, 10));
}

#[test]
fn test_empty_file_is_empty_catalog() {
    let catalog = Catalog::from_toml("").unwrap();
    assert!(catalog.is_empty());
    assert_eq!(catalog.options().membership_required, None);
}

#[test]
fn test_duplicate_id_rejected() {
    let toml = r#"
[[content]]
id = 1
title = "A"
kind = { type = "page" }

[[content]]
id = 1
title = "B"
kind = { type = "page" }
"#;
    let err = Catalog::from_toml(toml).unwrap_err();
    assert!(err.to_string().contains("Duplicate content id"), "{}", err);
}

#[test]
fn test_unknown_kind_rejected() {
    let toml = r#"
[[content]]
id = 1
title = "A"
kind = { type = "webinar" }
"#;
    assert!(matches!(
        Catalog::from_toml(toml),
        Err(RestrictionError::TomlError(_))
    ));
}

#[test]
fn test_lesson_requires_course() {
    let toml = r#"
[[content]]
id = 1
title = "A"
kind = { type = "lesson" }
"#;
    assert!(Catalog::from_toml(toml).is_err());
}

#[test]
fn test_title_limit_enforced() {
    let toml = format!(
        r#"
[[content]]
id = 1
title = "{}"
kind = {{ type = "page" }}
"#,
        "a".repeat(MAX_TITLE_LENGTH + 1)
    );
    let err = Catalog::from_toml(&toml).unwrap_err();
    assert!(err.to_string().contains("exceeds maximum 512 characters"), "{}", err);
}

#[test]
fn test_membership_limit_enforced() {
    let memberships: Vec<String> = (1..=MAX_MEMBERSHIPS_PER_CONTENT as u64 + 1)
        .map(|id| id.to_string())
        .collect();
    let toml = format!(
        r#"
[[content]]
id = 100
title = "Page"
kind = {{ type = "page" }}
membership_restriction = {{ enabled = true, memberships = [{}] }}
"#,
        memberships.join(", ")
    );
    let err = Catalog::from_toml(&toml).unwrap_err();
    assert!(err.to_string().contains("more than 64 memberships"), "{}", err);
}

#[test]
fn test_lint_on_loaded_catalog() {
    let toml = r#"
[options]
membership_required = 9

[[content]]
id = 1
title = "Course"
kind = { type = "course", track_prerequisite = 4, prerequisite = 2 }
"#;
    let catalog = Catalog::from_toml(toml).unwrap();
    let warnings = catalog.lint();

    assert_eq!(warnings.len(), 3);
    assert!(warnings.contains(&CatalogWarning::MissingSitewideMembership(9)));
    assert!(warnings.contains(&CatalogWarning::DanglingTrack {
        content_id: 1,
        track_id: 4
    }));
    assert!(warnings.contains(&CatalogWarning::DanglingPrerequisite {
        content_id: 1,
        prerequisite_id: 2
    }));
}

#[test]
fn test_catalog_roundtrip() {
    let catalog = Catalog::from_toml(SITE).unwrap();
    let back = Catalog::from_toml(&catalog.to_toml().unwrap()).unwrap();

    assert_eq!(back.len(), catalog.len());
    assert_eq!(back.options(), catalog.options());
    for item in catalog.items() {
        assert_eq!(back.content(item.id), Some(item));
    }
}
