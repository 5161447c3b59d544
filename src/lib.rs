// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 P47H Team <https://p47h.com>

//! # coursegate
//!
//! Content restriction engine for course and membership sites.
//!
//! This crate provides a unified API for coursegate's functionality:
//!
//! - **Restriction Engine**: decides whether a viewer may see a course,
//!   lesson, quiz, membership or page, and why not
//! - **Site Loading**: TOML and YAML site files holding the catalog and the
//!   enrollment ledger
//!
//! ## Quick Start
//!
//! ```rust
//! use coursegate::restriction::{Reason, RestrictionResolver};
//! use coursegate::utils::{SiteParser, TomlParser};
//!
//! let site = TomlParser
//!     .parse_site(
//!         r#"
//! [[content]]
//! id = 1
//! title = "Rust 101"
//! kind = { type = "course" }
//!
//! [[viewers]]
//! id = 7
//! enrollments = [{ id = 1 }]
//! "#,
//!     )
//!     .unwrap();
//!
//! let resolver = RestrictionResolver::new(&site.catalog, &site.ledger, 1_700_000_000);
//! assert!(!resolver.is_restricted(1, Some(7)));
//! assert_eq!(resolver.resolve(1, None).reason(), &Reason::EnrollmentCourse);
//! ```
//!
//! ## Architecture
//!
//! This facade crate re-exports the following modules:
//!
//! - [`restriction`] - Restriction resolver, predicates and messages (from `core-restriction`)
//! - [`utils`] - Site parsing and clocks (from `app-utils`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Restriction engine module.
///
/// Re-exports `core_restriction`.
pub mod restriction {
    pub use core_restriction::*;
}

/// Utility module.
///
/// Re-exports `app_utils` for site parsing and timestamps.
pub mod utils {
    pub use app_utils::*;
}

// Convenience re-exports at root level
pub use core_restriction::{
    Catalog, EnrollmentLedger, Reason, RestrictionResolver, RestrictionResult, ViewContext,
};
