//! Configuration store and its in-memory implementation
//!
//! The resolver reads every site option and per-content setting through
//! [`ConfigurationStore`]. [`Catalog`] is the bundled implementation, loadable
//! from TOML and validated on load.
//!
//! ## File format
//!
//! ```toml
//! [options]
//! membership_required = 10
//! terms_page = 2
//!
//! [[tracks]]
//! id = 1
//! title = "Backend"
//!
//! [[content]]
//! id = 10
//! title = "Gold"
//! kind = { type = "membership" }
//!
//! [[content]]
//! id = 20
//! title = "Rust 101"
//! kind = { type = "course", track_prerequisite = 1 }
//! ```

use crate::content::{ContentItem, ContentKind, DripSchedule};
use crate::error::{RestrictionError, Result};
use crate::{
    ContentId, TrackId, MAX_CONTENT_ITEMS, MAX_MEMBERSHIPS_PER_CONTENT, MAX_TITLE_LENGTH,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Date format used when none is configured (strftime syntax)
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// Site level options read by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteOptions {
    /// Membership every visitor must hold to see any content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_required: Option<ContentId>,
    /// Terms and conditions page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_page: Option<ContentId>,
    /// Privacy policy page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_page: Option<ContentId>,
    /// Memberships archive page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memberships_page: Option<ContentId>,
    /// Student account page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_page: Option<ContentId>,
    /// Checkout page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_page: Option<ContentId>,
    /// strftime format for dates in messages
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            membership_required: None,
            terms_page: None,
            privacy_page: None,
            memberships_page: None,
            account_page: None,
            checkout_page: None,
            date_format: default_date_format(),
        }
    }
}

impl SiteOptions {
    /// Pages that stay reachable when a sitewide membership is required
    pub fn bypass_pages(&self) -> impl Iterator<Item = ContentId> + '_ {
        [
            self.terms_page,
            self.privacy_page,
            self.memberships_page,
            self.account_page,
            self.checkout_page,
        ]
        .into_iter()
        .flatten()
    }
}

/// Read-only access to restriction configuration
///
/// Implementations must answer from a consistent snapshot for the duration
/// of a resolution. Missing entries are answered with `None`, never errors.
pub trait ConfigurationStore: Send + Sync {
    /// Site level options
    fn options(&self) -> &SiteOptions;

    /// Look up a content item
    fn content(&self, id: ContentId) -> Option<&ContentItem>;

    /// Title of a course track
    fn track_title(&self, _id: TrackId) -> Option<&str> {
        None
    }

    /// Look up a content item only if it is a membership
    fn membership(&self, id: ContentId) -> Option<&ContentItem> {
        self.content(id).filter(|item| item.is_membership())
    }

    /// Look up a content item only if it is a course
    fn course(&self, id: ContentId) -> Option<&ContentItem> {
        self.content(id).filter(|item| item.is_course())
    }

    /// Look up a content item only if it is a lesson
    fn lesson(&self, id: ContentId) -> Option<&ContentItem> {
        self.content(id).filter(|item| item.is_lesson())
    }

    /// Lesson that owns a lesson or quiz
    ///
    /// Returns the lesson itself for lessons and the linked lesson for quizzes.
    fn owning_lesson(&self, id: ContentId) -> Option<&ContentItem> {
        let item = self.content(id)?;
        match &item.kind {
            ContentKind::Lesson { .. } => Some(item),
            ContentKind::Quiz { lesson } => lesson.and_then(|lesson| self.lesson(lesson)),
            _ => None,
        }
    }
}

/// A named course track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track identifier
    pub id: TrackId,
    /// Display title
    pub title: String,
}

/// In-memory configuration store
///
/// Items are keyed by id. All deserialized catalogs pass through
/// [`Catalog::validate`] via `TryFrom<CatalogRaw>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "CatalogRaw", into = "CatalogRaw")]
pub struct Catalog {
    options: SiteOptions,
    items: BTreeMap<ContentId, ContentItem>,
    tracks: BTreeMap<TrackId, String>,
}

/// Raw catalog structure for (de)serialization (internal use only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogRaw {
    #[serde(default)]
    options: SiteOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tracks: Vec<Track>,
    #[serde(default)]
    content: Vec<ContentItem>,
}

impl TryFrom<CatalogRaw> for Catalog {
    type Error = RestrictionError;

    fn try_from(raw: CatalogRaw) -> Result<Self> {
        if raw.content.len() > MAX_CONTENT_ITEMS {
            return Err(RestrictionError::TooManyItems {
                max: MAX_CONTENT_ITEMS,
                attempted: raw.content.len(),
            });
        }

        let mut catalog = Catalog::new(raw.options);
        for track in raw.tracks {
            catalog.add_track(track.id, track.title)?;
        }
        for item in raw.content {
            catalog.insert(item)?;
        }

        Ok(catalog)
    }
}

impl From<Catalog> for CatalogRaw {
    fn from(catalog: Catalog) -> Self {
        Self {
            options: catalog.options,
            tracks: catalog
                .tracks
                .into_iter()
                .map(|(id, title)| Track { id, title })
                .collect(),
            content: catalog.items.into_values().collect(),
        }
    }
}

impl Catalog {
    /// Create an empty catalog with the given site options
    #[must_use]
    pub fn new(options: SiteOptions) -> Self {
        Self {
            options,
            items: BTreeMap::new(),
            tracks: BTreeMap::new(),
        }
    }

    /// Add a content item
    ///
    /// # Errors
    ///
    /// - `DuplicateContent` if the id is already present
    /// - `TooManyItems` if the catalog is full
    /// - see [`Catalog::validate_item`]
    pub fn insert(&mut self, item: ContentItem) -> Result<()> {
        Self::validate_item(&item)?;

        if self.items.contains_key(&item.id) {
            return Err(RestrictionError::DuplicateContent(item.id));
        }

        if self.items.len() >= MAX_CONTENT_ITEMS {
            return Err(RestrictionError::TooManyItems {
                max: MAX_CONTENT_ITEMS,
                attempted: self.items.len() + 1,
            });
        }

        self.items.insert(item.id, item);
        Ok(())
    }

    /// Add or rename a course track
    ///
    /// # Errors
    ///
    /// Returns `TitleTooLong` if the title exceeds `MAX_TITLE_LENGTH`
    pub fn add_track(&mut self, id: TrackId, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if title.len() > MAX_TITLE_LENGTH {
            return Err(RestrictionError::TitleTooLong {
                id,
                max: MAX_TITLE_LENGTH,
                length: title.len(),
            });
        }

        self.tracks.insert(id, title);
        Ok(())
    }

    /// Check a single item against the catalog limits
    ///
    /// # Errors
    ///
    /// - `InvalidContent` for a zero id
    /// - `TitleTooLong` / `TooManyMemberships` when limits are exceeded
    pub fn validate_item(item: &ContentItem) -> Result<()> {
        if item.id == 0 {
            return Err(RestrictionError::InvalidContent(
                "Content id 0 is reserved".to_string(),
            ));
        }

        if item.title.len() > MAX_TITLE_LENGTH {
            return Err(RestrictionError::TitleTooLong {
                id: item.id,
                max: MAX_TITLE_LENGTH,
                length: item.title.len(),
            });
        }

        let memberships = item.membership_restriction.memberships.len();
        if memberships > MAX_MEMBERSHIPS_PER_CONTENT {
            return Err(RestrictionError::TooManyMemberships {
                content_id: item.id,
                max: MAX_MEMBERSHIPS_PER_CONTENT,
                length: memberships,
            });
        }

        Ok(())
    }

    /// Site options
    #[must_use]
    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    /// Replace the site options
    pub fn set_options(&mut self, options: SiteOptions) {
        self.options = options;
    }

    /// Number of content items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the catalog holds no content
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate content items in id order
    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.items.values()
    }

    /// Iterate course tracks in id order
    pub fn tracks(&self) -> impl Iterator<Item = (TrackId, &str)> {
        self.tracks.iter().map(|(id, title)| (*id, title.as_str()))
    }

    /// Report dangling references
    ///
    /// Dangling ids never fail resolution (they are treated as "no
    /// restriction"), but they usually indicate a configuration mistake.
    #[must_use]
    pub fn lint(&self) -> Vec<CatalogWarning> {
        let mut warnings = Vec::new();

        if let Some(id) = self.options.membership_required {
            if ConfigurationStore::membership(self, id).is_none() {
                warnings.push(CatalogWarning::MissingSitewideMembership(id));
            }
        }

        for item in self.items.values() {
            for membership in &item.membership_restriction.memberships {
                if ConfigurationStore::membership(self, *membership).is_none() {
                    warnings.push(CatalogWarning::DanglingMembership {
                        content_id: item.id,
                        membership_id: *membership,
                    });
                }
            }

            match &item.kind {
                ContentKind::Course {
                    prerequisite,
                    track_prerequisite,
                    ..
                } => {
                    if let Some(course) = prerequisite {
                        if ConfigurationStore::course(self, *course).is_none() {
                            warnings.push(CatalogWarning::DanglingPrerequisite {
                                content_id: item.id,
                                prerequisite_id: *course,
                            });
                        }
                    }
                    if let Some(track) = track_prerequisite {
                        if !self.tracks.contains_key(track) {
                            warnings.push(CatalogWarning::DanglingTrack {
                                content_id: item.id,
                                track_id: *track,
                            });
                        }
                    }
                }
                ContentKind::Lesson {
                    course,
                    prerequisite,
                    drip,
                    ..
                } => {
                    if ConfigurationStore::course(self, *course).is_none() {
                        warnings.push(CatalogWarning::LessonWithoutCourse {
                            lesson_id: item.id,
                            course_id: *course,
                        });
                    }
                    if let Some(lesson) = prerequisite {
                        if ConfigurationStore::lesson(self, *lesson).is_none() {
                            warnings.push(CatalogWarning::DanglingPrerequisite {
                                content_id: item.id,
                                prerequisite_id: *lesson,
                            });
                        }
                    }
                    if matches!(drip, Some(DripSchedule::Prerequisite { .. }))
                        && prerequisite.is_none()
                    {
                        warnings.push(CatalogWarning::DripWithoutPrerequisite {
                            lesson_id: item.id,
                        });
                    }
                }
                ContentKind::Quiz { lesson } => {
                    if lesson.and_then(|l| ConfigurationStore::lesson(self, l)).is_none() {
                        warnings.push(CatalogWarning::QuizWithoutLesson { quiz_id: item.id });
                    }
                }
                _ => {}
            }
        }

        warnings
    }

    /// Load a catalog from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if TOML parsing or validation fails
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(toml_str)?;
        Ok(catalog)
    }

    /// Serialize the catalog to a TOML string
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if TOML serialization fails
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| RestrictionError::SerializationError(e.to_string()))
    }
}

impl ConfigurationStore for Catalog {
    fn options(&self) -> &SiteOptions {
        &self.options
    }

    fn content(&self, id: ContentId) -> Option<&ContentItem> {
        self.items.get(&id)
    }

    fn track_title(&self, id: TrackId) -> Option<&str> {
        self.tracks.get(&id).map(String::as_str)
    }
}

/// Configuration smell reported by [`Catalog::lint`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// Sitewide membership option names no membership
    MissingSitewideMembership(ContentId),
    /// Membership gate names an id that is not a membership
    DanglingMembership {
        /// Gated item
        content_id: ContentId,
        /// Missing membership
        membership_id: ContentId,
    },
    /// Prerequisite names a missing course or lesson
    DanglingPrerequisite {
        /// Dependent item
        content_id: ContentId,
        /// Missing prerequisite
        prerequisite_id: ContentId,
    },
    /// Track prerequisite names an unknown track
    DanglingTrack {
        /// Dependent course
        content_id: ContentId,
        /// Missing track
        track_id: TrackId,
    },
    /// Lesson points at a missing course
    LessonWithoutCourse {
        /// Lesson
        lesson_id: ContentId,
        /// Missing course
        course_id: ContentId,
    },
    /// Quiz has no lesson or its lesson is missing
    QuizWithoutLesson {
        /// Quiz
        quiz_id: ContentId,
    },
    /// Lesson drips after its prerequisite but has none, so it never waits
    DripWithoutPrerequisite {
        /// Lesson
        lesson_id: ContentId,
    },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSitewideMembership(id) => {
                write!(f, "sitewide membership {} does not exist", id)
            }
            Self::DanglingMembership {
                content_id,
                membership_id,
            } => write!(
                f,
                "content {} is restricted to unknown membership {}",
                content_id, membership_id
            ),
            Self::DanglingPrerequisite {
                content_id,
                prerequisite_id,
            } => write!(
                f,
                "content {} requires unknown prerequisite {}",
                content_id, prerequisite_id
            ),
            Self::DanglingTrack {
                content_id,
                track_id,
            } => write!(
                f,
                "course {} requires unknown track {}",
                content_id, track_id
            ),
            Self::LessonWithoutCourse {
                lesson_id,
                course_id,
            } => write!(
                f,
                "lesson {} belongs to unknown course {}",
                lesson_id, course_id
            ),
            Self::QuizWithoutLesson { quiz_id } => {
                write!(f, "quiz {} is not attached to a lesson", quiz_id)
            }
            Self::DripWithoutPrerequisite { lesson_id } => write!(
                f,
                "lesson {} drips after its prerequisite but has none",
                lesson_id
            ),
        }
    }
}
