// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 P47H Team <https://p47h.com>

//! # core-restriction
//!
//! Pure content restriction engine for course platforms.
//!
//! Given a content identifier and an optional viewer, the resolver decides
//! whether the viewer may see a course, lesson, quiz, membership or page,
//! and if not, why. It never mutates state and never fails: every read goes
//! through an injected [`ConfigurationStore`] and [`EnrollmentOracle`].
//!
//! - Restriction predicates (sitewide membership, membership, course time
//!   period, prerequisite, drip schedule, quiz accessibility)
//! - Ordered resolution with first-match-wins priority
//! - Hook registry for overriding in-progress and final decisions
//! - Human readable restriction messages
//!
//! ## Example
//!
//! ```
//! use core_restriction::{
//!     CatalogBuilder, ContentItemBuilder, EnrollmentLedger, Reason, RestrictionResolver,
//! };
//!
//! let catalog = CatalogBuilder::new()
//!     .item_with(|item| item.id(1).titled("Rust 101").course())
//!     .item_with(|item| item.id(2).titled("Ownership").lesson_of(1))
//!     .build()
//!     .unwrap();
//!
//! let mut ledger = EnrollmentLedger::new();
//! ledger.enroll(7, 1, 0);
//!
//! let resolver = RestrictionResolver::new(&catalog, &ledger, 1_700_000_000);
//!
//! assert!(!resolver.is_restricted(2, Some(7)));
//! assert_eq!(resolver.resolve(2, None).reason(), &Reason::EnrollmentLesson);
//! ```
//!
//! ## Limits
//!
//! Catalog loading enforces:
//! - MAX_CONTENT_ITEMS = 65536
//! - MAX_MEMBERSHIPS_PER_CONTENT = 64
//! - MAX_TITLE_LENGTH = 512

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod catalog;
pub mod content;
pub mod enrollment;
pub mod error;
pub mod hooks;
pub mod message;
pub mod predicates;
pub mod resolver;
pub mod result;

// Re-export commonly used types
pub use builder::{CatalogBuilder, ContentItemBuilder};
pub use catalog::{Catalog, CatalogWarning, ConfigurationStore, SiteOptions, Track};
pub use content::{
    ContentItem, ContentKind, CourseMessages, DripSchedule, MembershipRestriction, TimePeriod,
};
pub use enrollment::{EnrollmentLedger, EnrollmentOracle};
pub use error::{RestrictionError, Result};
pub use hooks::{Gate, HookRegistry, RestrictionHook};
pub use message::MessageFormatter;
pub use predicates::RestrictionChecks;
pub use resolver::{Resolver, RestrictionResolver, ViewContext};
pub use result::{PrerequisiteDescriptor, PrerequisiteKind, Reason, RestrictionResult};

/// Identifier of a content item (course, lesson, quiz, membership, page)
pub type ContentId = u64;

/// Identifier of a viewer account
pub type ViewerId = u64;

/// Identifier of a course track
pub type TrackId = u64;

/// Maximum number of content items per catalog
pub const MAX_CONTENT_ITEMS: usize = 65_536;

/// Maximum number of memberships a single item may be restricted to
pub const MAX_MEMBERSHIPS_PER_CONTENT: usize = 64;

/// Maximum length for content and track titles
pub const MAX_TITLE_LENGTH: usize = 512;

/// Seconds in one drip day
pub const SECONDS_PER_DAY: u64 = 86_400;
