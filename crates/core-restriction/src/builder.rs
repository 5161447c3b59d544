//! Builder pattern for ergonomic catalog construction

use crate::catalog::{Catalog, SiteOptions};
use crate::content::{ContentItem, ContentKind, DripSchedule, MembershipRestriction, TimePeriod};
use crate::error::{RestrictionError, Result};
use crate::{ContentId, TrackId};

/// Builder for creating `ContentItem` instances with a fluent API
///
/// Pick the kind first, then apply kind specific settings. A setting that
/// does not belong to the chosen kind makes `build` fail.
///
/// # Examples
///
/// ```
/// use core_restriction::builder::ContentItemBuilder;
/// use core_restriction::{DripSchedule, TimePeriod};
///
/// # fn example() -> Result<(), core_restriction::RestrictionError> {
/// // Course with an open window
/// let course = ContentItemBuilder::new()
///     .id(1)
///     .titled("Rust 101")
///     .course()
///     .time_period(TimePeriod::between(1_700_000_000, 1_800_000_000))
///     .build()?;
///
/// // Lesson released a week after enrollment
/// let lesson = ContentItemBuilder::new()
///     .id(2)
///     .titled("Lifetimes")
///     .lesson_of(1)
///     .drip(DripSchedule::Enrollment { days: 7 })
///     .build()?;
///
/// // Page gated behind two memberships
/// let page = ContentItemBuilder::new()
///     .id(3)
///     .titled("Members lounge")
///     .page()
///     .restricted_to([10, 11])
///     .build()?;
///
/// // Drip on a course is rejected
/// assert!(ContentItemBuilder::new()
///     .id(4)
///     .titled("Broken")
///     .course()
///     .drip(DripSchedule::Date { at: 0 })
///     .build()
///     .is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ContentItemBuilder {
    id: Option<ContentId>,
    title: Option<String>,
    kind: Option<ContentKind>,
    membership_restriction: MembershipRestriction,
    misapplied: Option<&'static str>,
}

impl ContentItemBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content id
    #[must_use]
    pub fn id(mut self, id: ContentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the title
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the kind directly
    #[must_use]
    pub fn kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Make the item a course
    #[must_use]
    pub fn course(self) -> Self {
        self.kind(ContentKind::course())
    }

    /// Make the item a lesson of `course`
    #[must_use]
    pub fn lesson_of(self, course: ContentId) -> Self {
        self.kind(ContentKind::lesson(course))
    }

    /// Make the item a quiz attached to `lesson`
    #[must_use]
    pub fn quiz_of(self, lesson: ContentId) -> Self {
        self.kind(ContentKind::Quiz {
            lesson: Some(lesson),
        })
    }

    /// Make the item a quiz without a lesson
    #[must_use]
    pub fn orphan_quiz(self) -> Self {
        self.kind(ContentKind::Quiz { lesson: None })
    }

    /// Make the item a membership
    #[must_use]
    pub fn membership(self) -> Self {
        self.kind(ContentKind::membership())
    }

    /// Make the item a generic page
    #[must_use]
    pub fn page(self) -> Self {
        self.kind(ContentKind::Page)
    }

    /// Make the item a quiz question
    #[must_use]
    pub fn question(self) -> Self {
        self.kind(ContentKind::Question)
    }

    /// Make the item a certificate template
    #[must_use]
    pub fn certificate(self) -> Self {
        self.kind(ContentKind::Certificate)
    }

    /// Make the item an earned certificate
    #[must_use]
    pub fn earned_certificate(self) -> Self {
        self.kind(ContentKind::EarnedCertificate)
    }

    /// Make the item an extension type
    #[must_use]
    pub fn other(self, post_type: impl Into<String>) -> Self {
        self.kind(ContentKind::Other {
            post_type: post_type.into(),
        })
    }

    /// Gate the item behind memberships (enables the gate)
    #[must_use]
    pub fn restricted_to(mut self, memberships: impl IntoIterator<Item = ContentId>) -> Self {
        self.membership_restriction = MembershipRestriction::to(memberships);
        self
    }

    /// Mark a lesson as free
    #[must_use]
    pub fn free(mut self) -> Self {
        match &mut self.kind {
            Some(ContentKind::Lesson { free, .. }) => *free = true,
            _ => self.misapply("free"),
        }
        self
    }

    /// Require a course (for courses) or a lesson (for lessons) first
    #[must_use]
    pub fn prerequisite(mut self, id: ContentId) -> Self {
        match &mut self.kind {
            Some(
                ContentKind::Course { prerequisite, .. } | ContentKind::Lesson { prerequisite, .. },
            ) => *prerequisite = Some(id),
            _ => self.misapply("prerequisite"),
        }
        self
    }

    /// Require a course track first
    #[must_use]
    pub fn track_prerequisite(mut self, track: TrackId) -> Self {
        match &mut self.kind {
            Some(ContentKind::Course {
                track_prerequisite, ..
            }) => *track_prerequisite = Some(track),
            _ => self.misapply("track_prerequisite"),
        }
        self
    }

    /// Set a lesson release rule
    #[must_use]
    pub fn drip(mut self, schedule: DripSchedule) -> Self {
        match &mut self.kind {
            Some(ContentKind::Lesson { drip, .. }) => *drip = Some(schedule),
            _ => self.misapply("drip"),
        }
        self
    }

    /// Set a course open window
    #[must_use]
    pub fn time_period(mut self, period: TimePeriod) -> Self {
        match &mut self.kind {
            Some(ContentKind::Course { time_period, .. }) => *time_period = Some(period),
            _ => self.misapply("time_period"),
        }
        self
    }

    /// Set a course start date
    #[must_use]
    pub fn starts_at(mut self, timestamp: u64) -> Self {
        match &mut self.kind {
            Some(ContentKind::Course { start_date, .. }) => *start_date = Some(timestamp),
            _ => self.misapply("start_date"),
        }
        self
    }

    /// Set the course "not enrolled" message
    #[must_use]
    pub fn enrollment_message(mut self, message: impl Into<String>) -> Self {
        match &mut self.kind {
            Some(ContentKind::Course { messages, .. }) => messages.enrollment = Some(message.into()),
            _ => self.misapply("enrollment_message"),
        }
        self
    }

    /// Set the course "opens on" message
    #[must_use]
    pub fn opens_message(mut self, message: impl Into<String>) -> Self {
        match &mut self.kind {
            Some(ContentKind::Course { messages, .. }) => messages.opens = Some(message.into()),
            _ => self.misapply("opens_message"),
        }
        self
    }

    /// Set the course "closed on" message
    #[must_use]
    pub fn closed_message(mut self, message: impl Into<String>) -> Self {
        match &mut self.kind {
            Some(ContentKind::Course { messages, .. }) => messages.closed = Some(message.into()),
            _ => self.misapply("closed_message"),
        }
        self
    }

    /// Set a membership's restricted-redirect page
    #[must_use]
    pub fn redirect_page(mut self, page: ContentId) -> Self {
        match &mut self.kind {
            Some(ContentKind::Membership { redirect_page, .. }) => *redirect_page = Some(page),
            _ => self.misapply("redirect_page"),
        }
        self
    }

    /// Set a membership's restriction notice
    #[must_use]
    pub fn restriction_notice(mut self, notice: impl Into<String>) -> Self {
        match &mut self.kind {
            Some(ContentKind::Membership {
                restriction_notice, ..
            }) => *restriction_notice = Some(notice.into()),
            _ => self.misapply("restriction_notice"),
        }
        self
    }

    fn misapply(&mut self, setting: &'static str) {
        self.misapplied.get_or_insert(setting);
    }

    /// Build the `ContentItem`, returning an error if it is incomplete
    ///
    /// # Errors
    ///
    /// - `MissingField` if the id, title or kind is missing
    /// - `InvalidContent` if a setting does not apply to the kind
    /// - see [`Catalog::validate_item`]
    pub fn build(self) -> Result<ContentItem> {
        let id = self.id.ok_or(RestrictionError::MissingField("id"))?;
        let title = self.title.ok_or(RestrictionError::MissingField("title"))?;
        let kind = self.kind.ok_or(RestrictionError::MissingField("kind"))?;

        if let Some(setting) = self.misapplied {
            return Err(RestrictionError::InvalidContent(format!(
                "{} does not apply to content {} ({})",
                setting,
                id,
                kind.type_name()
            )));
        }

        let item = ContentItem {
            id,
            title,
            kind,
            membership_restriction: self.membership_restriction,
        };
        Catalog::validate_item(&item)?;

        Ok(item)
    }
}

/// Builder for creating `Catalog` instances with a fluent API
///
/// # Examples
///
/// ```
/// use core_restriction::{CatalogBuilder, ConfigurationStore};
///
/// let catalog = CatalogBuilder::new()
///     .require_membership(1)
///     .terms_page(2)
///     .item_with(|item| item.id(1).titled("Gold").membership())
///     .item_with(|item| item.id(2).titled("Terms").page())
///     .build()
///     .unwrap();
///
/// assert_eq!(catalog.options().membership_required, Some(1));
/// assert_eq!(catalog.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    options: SiteOptions,
    items: Vec<ContentItem>,
    tracks: Vec<(TrackId, String)>,
    error: Option<RestrictionError>,
}

impl CatalogBuilder {
    /// Create a builder with default site options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all site options
    #[must_use]
    pub fn options(mut self, options: SiteOptions) -> Self {
        self.options = options;
        self
    }

    /// Require a membership for the whole site
    #[must_use]
    pub fn require_membership(mut self, membership: ContentId) -> Self {
        self.options.membership_required = Some(membership);
        self
    }

    /// Set the terms page
    #[must_use]
    pub fn terms_page(mut self, page: ContentId) -> Self {
        self.options.terms_page = Some(page);
        self
    }

    /// Set the privacy policy page
    #[must_use]
    pub fn privacy_page(mut self, page: ContentId) -> Self {
        self.options.privacy_page = Some(page);
        self
    }

    /// Set the memberships archive page
    #[must_use]
    pub fn memberships_page(mut self, page: ContentId) -> Self {
        self.options.memberships_page = Some(page);
        self
    }

    /// Set the account page
    #[must_use]
    pub fn account_page(mut self, page: ContentId) -> Self {
        self.options.account_page = Some(page);
        self
    }

    /// Set the checkout page
    #[must_use]
    pub fn checkout_page(mut self, page: ContentId) -> Self {
        self.options.checkout_page = Some(page);
        self
    }

    /// Set the strftime format for message dates
    #[must_use]
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.options.date_format = format.into();
        self
    }

    /// Add a course track
    #[must_use]
    pub fn track(mut self, id: TrackId, title: impl Into<String>) -> Self {
        self.tracks.push((id, title.into()));
        self
    }

    /// Add an item using a builder function
    ///
    /// The first item that fails to build is reported by `build`.
    #[must_use]
    pub fn item_with<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ContentItemBuilder) -> ContentItemBuilder,
    {
        match f(ContentItemBuilder::new()).build() {
            Ok(item) => self.items.push(item),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Add a pre-constructed item
    #[must_use]
    pub fn item(mut self, item: ContentItem) -> Self {
        self.items.push(item);
        self
    }

    /// Build the catalog
    ///
    /// # Errors
    ///
    /// Returns the first item build error, or any catalog validation error
    /// (duplicate ids, limits)
    pub fn build(self) -> Result<Catalog> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut catalog = Catalog::new(self.options);
        for (id, title) in self.tracks {
            catalog.add_track(id, title)?;
        }
        for item in self.items {
            catalog.insert(item)?;
        }

        Ok(catalog)
    }
}
