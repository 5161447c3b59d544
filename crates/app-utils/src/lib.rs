// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 P47H Team <https://p47h.com>

//! # app-utils
//!
//! Utility modules for site file parsing and clocks.
//!
//! This crate provides non-core features:
//! - Site parsing from YAML or TOML into a catalog and an enrollment ledger
//! - Clock sources and timestamp parsing for evaluation times

#![forbid(unsafe_code)]

pub mod error;

pub mod yaml {
    //! YAML site document parsing and serialization
    use crate::error::{Error, Result};
    use crate::site::SiteParser;
    use core_restriction::{Catalog, EnrollmentLedger};
    use serde::Serialize;

    /// YAML parser implementation
    ///
    /// Uses the same layout as the TOML site file: `options`, `tracks`,
    /// `content` and `viewers` at the top level.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct YamlParser;

    impl SiteParser for YamlParser {
        fn parse_catalog(&self, input: &str) -> Result<Catalog> {
            serde_yaml::from_str(input).map_err(|e| Error::YamlParseError(e.to_string()))
        }

        fn parse_ledger(&self, input: &str) -> Result<EnrollmentLedger> {
            EnrollmentLedger::deserialize_from(serde_yaml::Deserializer::from_str(input))
                .map_err(|e| Error::YamlParseError(e.to_string()))
        }
    }

    /// Serialize a value to YAML
    pub fn to_yaml<T: Serialize>(value: &T) -> std::result::Result<String, String> {
        serde_yaml::to_string(value).map_err(|e| format!("YAML serialization error: {}", e))
    }
}

pub mod site {
    //! Site files: one document holding the catalog and the ledger
    use crate::error::{Error, Result};
    use crate::yaml::YamlParser;
    use core_restriction::{Catalog, EnrollmentLedger};
    use std::path::Path;
    use tracing::debug;

    /// Trait for site parsers (extensible to other formats)
    pub trait SiteParser {
        /// Parse the catalog part of a site document
        fn parse_catalog(&self, input: &str) -> Result<Catalog>;

        /// Parse the `viewers` part of a site document
        fn parse_ledger(&self, input: &str) -> Result<EnrollmentLedger>;

        /// Parse both parts
        fn parse_site(&self, input: &str) -> Result<Site> {
            let catalog = self.parse_catalog(input)?;
            let ledger = self.parse_ledger(input)?;
            debug!(
                items = catalog.len(),
                viewers = ledger.viewer_count(),
                "site parsed"
            );
            Ok(Site { catalog, ledger })
        }
    }

    /// TOML parser implementation
    #[derive(Debug, Default, Clone, Copy)]
    pub struct TomlParser;

    impl SiteParser for TomlParser {
        fn parse_catalog(&self, input: &str) -> Result<Catalog> {
            Ok(Catalog::from_toml(input)?)
        }

        fn parse_ledger(&self, input: &str) -> Result<EnrollmentLedger> {
            Ok(EnrollmentLedger::from_toml(input)?)
        }
    }

    /// A loaded site
    #[derive(Debug, Clone, Default)]
    pub struct Site {
        /// Content and options
        pub catalog: Catalog,
        /// Viewer enrollments and completions
        pub ledger: EnrollmentLedger,
    }

    /// Pick a parser from the file extension
    ///
    /// `.toml` selects [`TomlParser`]; `.yaml` and `.yml` select
    /// [`YamlParser`].
    pub fn parser_for_path(path: &Path) -> Result<Box<dyn SiteParser>> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(Box::new(TomlParser)),
            Some("yaml" | "yml") => Ok(Box::new(YamlParser)),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

pub mod timestamp {
    //! Evaluation time sources
    //!
    //! The resolver takes `now` as Unix seconds. Clocks produce it;
    //! [`parse_timestamp`] reads it from user input.

    use super::error::{Error, Result};
    use chrono::{DateTime, NaiveDate};
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Source of the current time
    pub trait Clock {
        /// Current Unix time in seconds
        fn now(&self) -> Result<u64>;
    }

    /// Simple clock provider (system time)
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> Result<u64> {
            Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
        }
    }

    /// Clock pinned to a single instant
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FixedClock(pub u64);

    impl Clock for FixedClock {
        fn now(&self) -> Result<u64> {
            Ok(self.0)
        }
    }

    /// Clock for an optional user supplied instant
    ///
    /// `Some` pins a [`FixedClock`] at the parsed timestamp; `None` reads the
    /// system clock.
    pub fn clock_for(at: Option<&str>) -> Result<Box<dyn Clock>> {
        match at {
            Some(at) => Ok(Box::new(FixedClock(parse_timestamp(at)?))),
            None => Ok(Box::new(SystemClock)),
        }
    }

    /// Parse a timestamp given as Unix seconds, an RFC 3339 date-time, or a
    /// `YYYY-MM-DD` date (midnight UTC)
    pub fn parse_timestamp(input: &str) -> Result<u64> {
        let input = input.trim();

        if let Ok(secs) = input.parse::<u64>() {
            return Ok(secs);
        }

        let secs = if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
            datetime.timestamp()
        } else if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            date.and_hms_opt(0, 0, 0)
                .ok_or_else(|| Error::InvalidTimestamp(input.to_string()))?
                .and_utc()
                .timestamp()
        } else {
            return Err(Error::InvalidTimestamp(input.to_string()));
        };

        u64::try_from(secs).map_err(|_| Error::InvalidTimestamp(input.to_string()))
    }
}

/// Re-export commonly used types
pub use error::{Error, Result};
pub use site::{parser_for_path, Site, SiteParser, TomlParser};
pub use timestamp::{clock_for, parse_timestamp, Clock, FixedClock, SystemClock};
pub use yaml::YamlParser;
