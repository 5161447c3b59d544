//! # Restriction Hooks
//!
//! Extension points that let host code override restriction decisions
//! without touching the resolver's rule order.
//!
//! - `before_check_access`: supplies or replaces the enrollment gate for
//!   content the resolver has no built-in rule for
//! - `filter_result`: rewrites every final result
//! - `filter_message`: rewrites every formatted message
//!
//! Every method defaults to identity. Hooks run in descending priority, ties
//! broken by registration name.
//!
//! ## Usage Example
//!
//! ```rust
//! use core_restriction::hooks::{Gate, HookRegistry, RestrictionHook};
//! use core_restriction::{ContentItem, ContentKind, Reason, ViewerId};
//!
//! // 1. Gate forum topics behind the course they discuss
//! struct ForumHook;
//!
//! impl RestrictionHook for ForumHook {
//!     fn before_check_access(
//!         &self,
//!         item: Option<&ContentItem>,
//!         _viewer: Option<ViewerId>,
//!         gate: Option<Gate>,
//!     ) -> Option<Gate> {
//!         match item.map(|item| &item.kind) {
//!             Some(ContentKind::Other { post_type }) if post_type == "forum" => {
//!                 Some(Gate::new(1, Reason::Custom("forum".into())))
//!             }
//!             _ => gate,
//!         }
//!     }
//! }
//!
//! // 2. Register hook
//! let mut registry = HookRegistry::new();
//! registry.register("forum", Box::new(ForumHook));
//!
//! assert!(registry.has_hook("forum"));
//! ```

use crate::content::ContentItem;
use crate::result::{Reason, RestrictionResult};
use crate::{ContentId, ViewerId};
use std::collections::BTreeMap;

/// Enrollment gate proposed for a piece of content
///
/// The resolver restricts the content unless the viewer is enrolled in
/// `restriction_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    /// Object the viewer must be enrolled in
    pub restriction_id: ContentId,
    /// Reason reported when the viewer is not
    pub reason: Reason,
}

impl Gate {
    /// Create a gate
    #[must_use]
    pub const fn new(restriction_id: ContentId, reason: Reason) -> Self {
        Self {
            restriction_id,
            reason,
        }
    }
}

/// Trait for implementing restriction overrides
pub trait RestrictionHook: Send + Sync {
    /// Propose an enrollment gate for content without a built-in rule
    ///
    /// `item` is `None` when the content id is unknown to the store.
    fn before_check_access(
        &self,
        _item: Option<&ContentItem>,
        _viewer: Option<ViewerId>,
        gate: Option<Gate>,
    ) -> Option<Gate> {
        gate
    }

    /// Rewrite a final result
    fn filter_result(
        &self,
        result: RestrictionResult,
        _viewer: Option<ViewerId>,
    ) -> RestrictionResult {
        result
    }

    /// Rewrite a formatted restriction message
    fn filter_message(&self, _result: &RestrictionResult, message: String) -> String {
        message
    }

    /// Returns the priority of this hook (higher runs first)
    fn priority(&self) -> u32 {
        0
    }

    /// Returns the name of the hook strategy
    fn name(&self) -> &str {
        "RestrictionHook"
    }
}

/// Registry of named restriction hooks
pub struct HookRegistry {
    hooks: BTreeMap<String, Box<dyn RestrictionHook>>,
}

impl HookRegistry {
    /// Creates a new empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hooks: BTreeMap::new(),
        }
    }

    /// Registers a hook under a name
    ///
    /// # Returns
    ///
    /// `Some(old_hook)` if the name was taken, `None` if new
    pub fn register(
        &mut self,
        name: impl Into<String>,
        hook: Box<dyn RestrictionHook>,
    ) -> Option<Box<dyn RestrictionHook>> {
        self.hooks.insert(name.into(), hook)
    }

    /// Unregisters a hook
    ///
    /// # Returns
    ///
    /// `Some(hook)` if it existed, `None` if it was not registered
    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn RestrictionHook>> {
        self.hooks.remove(name)
    }

    /// Checks if a hook is registered under the name
    pub fn has_hook(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Hooks in execution order
    fn ordered(&self) -> Vec<&dyn RestrictionHook> {
        let mut hooks: Vec<(&String, &dyn RestrictionHook)> = self
            .hooks
            .iter()
            .map(|(name, hook)| (name, hook.as_ref()))
            .collect();
        // BTreeMap iteration is name ordered; stable sort keeps it for ties
        hooks.sort_by(|a, b| b.1.priority().cmp(&a.1.priority()));
        hooks.into_iter().map(|(_, hook)| hook).collect()
    }

    /// Runs every `before_check_access` hook over the proposed gate
    pub fn before_check_access(
        &self,
        item: Option<&ContentItem>,
        viewer: Option<ViewerId>,
        gate: Option<Gate>,
    ) -> Option<Gate> {
        self.ordered()
            .into_iter()
            .fold(gate, |gate, hook| hook.before_check_access(item, viewer, gate))
    }

    /// Runs every `filter_result` hook over a final result
    pub fn filter_result(
        &self,
        result: RestrictionResult,
        viewer: Option<ViewerId>,
    ) -> RestrictionResult {
        self.ordered()
            .into_iter()
            .fold(result, |result, hook| hook.filter_result(result, viewer))
    }

    /// Runs every `filter_message` hook over a message
    pub fn filter_message(&self, result: &RestrictionResult, message: String) -> String {
        self.ordered()
            .into_iter()
            .fold(message, |message, hook| hook.filter_message(result, message))
    }

    /// Lists registered hook names in execution order
    pub fn list_hooks(&self) -> Vec<String> {
        let mut names: Vec<(&String, u32)> = self
            .hooks
            .iter()
            .map(|(name, hook)| (name, hook.priority()))
            .collect();
        names.sort_by(|a, b| b.1.cmp(&a.1));
        names.into_iter().map(|(name, _)| name.clone()).collect()
    }

    /// Counts the number of registered hooks
    pub fn count(&self) -> usize {
        self.hooks.len()
    }

    /// Clears all hooks
    pub fn clear(&mut self) {
        self.hooks.clear();
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut hooks: Vec<(&String, &dyn RestrictionHook)> = self
            .hooks
            .iter()
            .map(|(name, hook)| (name, hook.as_ref()))
            .collect();
        hooks.sort_by(|a, b| b.1.priority().cmp(&a.1.priority()));

        f.debug_map()
            .entries(hooks.into_iter().map(|(name, hook)| (name, hook.name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentKind;

    // Test hook: restricts everything it sees
    struct DenyAll;
    impl RestrictionHook for DenyAll {
        fn filter_result(&self, result: RestrictionResult, _: Option<ViewerId>) -> RestrictionResult {
            RestrictionResult::restricted(result.content_id(), 1, Reason::Custom("deny".into()))
        }
    }

    // Test hook: opens everything it sees
    struct AllowAll;
    impl RestrictionHook for AllowAll {
        fn filter_result(&self, result: RestrictionResult, _: Option<ViewerId>) -> RestrictionResult {
            RestrictionResult::accessible(result.content_id())
        }

        fn priority(&self) -> u32 {
            10
        }
    }

    // Test hook: appends its tag to messages
    struct Tag(&'static str, u32);
    impl RestrictionHook for Tag {
        fn filter_message(&self, _: &RestrictionResult, message: String) -> String {
            format!("{message}{}", self.0)
        }

        fn priority(&self) -> u32 {
            self.1
        }
    }

    // Test hook: proposes a gate for "forum" content
    struct ForumGate;
    impl RestrictionHook for ForumGate {
        fn before_check_access(
            &self,
            item: Option<&ContentItem>,
            _: Option<ViewerId>,
            gate: Option<Gate>,
        ) -> Option<Gate> {
            match item.map(|item| &item.kind) {
                Some(ContentKind::Other { post_type }) if post_type == "forum" => {
                    Some(Gate::new(7, Reason::Custom("forum".into())))
                }
                _ => gate,
            }
        }
    }

    #[test]
    fn test_registry_new() {
        let registry = HookRegistry::new();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_register_duplicate_replaces() {
        let mut registry = HookRegistry::new();

        let old = registry.register("a", Box::new(DenyAll));
        assert!(old.is_none());

        let old = registry.register("a", Box::new(AllowAll));
        assert!(old.is_some());
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_unregister_hook() {
        let mut registry = HookRegistry::new();
        registry.register("a", Box::new(DenyAll));

        assert!(registry.unregister("a").is_some());
        assert!(registry.unregister("a").is_none());
        assert!(!registry.has_hook("a"));
    }

    #[test]
    fn test_empty_registry_is_identity() {
        let registry = HookRegistry::new();
        let result = RestrictionResult::restricted(3, 2, Reason::Quiz);

        assert_eq!(registry.filter_result(result.clone(), None), result);
        assert_eq!(registry.filter_message(&result, "msg".into()), "msg");
        assert_eq!(registry.before_check_access(None, None, None), None);
    }

    #[test]
    fn test_priority_order() {
        let mut registry = HookRegistry::new();
        // Allow runs first (priority 10), Deny last wins
        registry.register("z-allow", Box::new(AllowAll));
        registry.register("a-deny", Box::new(DenyAll));

        let result = registry.filter_result(RestrictionResult::accessible(3), None);
        assert!(result.is_restricted());
        assert_eq!(registry.list_hooks(), vec!["z-allow", "a-deny"]);
    }

    #[test]
    fn test_ties_run_in_name_order() {
        let mut registry = HookRegistry::new();
        registry.register("b", Box::new(Tag("-b", 0)));
        registry.register("a", Box::new(Tag("-a", 0)));
        registry.register("c", Box::new(Tag("-c", 5)));

        let result = RestrictionResult::accessible(1);
        assert_eq!(registry.filter_message(&result, "m".into()), "m-c-a-b");
    }

    #[test]
    fn test_before_check_access_passes_through() {
        let mut registry = HookRegistry::new();
        registry.register("forum", Box::new(ForumGate));

        let forum = ContentItem::new(
            1,
            "Topic",
            ContentKind::Other {
                post_type: "forum".into(),
            },
        );
        let page = ContentItem::new(2, "Page", ContentKind::Page);

        assert_eq!(
            registry.before_check_access(Some(&forum), None, None),
            Some(Gate::new(7, Reason::Custom("forum".into())))
        );
        assert_eq!(registry.before_check_access(Some(&page), None, None), None);
    }

    #[test]
    fn test_clear() {
        let mut registry = HookRegistry::new();
        registry.register("a", Box::new(DenyAll));
        registry.register("b", Box::new(AllowAll));
        assert_eq!(registry.count(), 2);

        registry.clear();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_debug_lists_strategy_names() {
        struct Named;
        impl RestrictionHook for Named {
            fn name(&self) -> &str {
                "drip_override"
            }

            fn priority(&self) -> u32 {
                5
            }
        }

        let mut registry = HookRegistry::new();
        registry.register("a", Box::new(DenyAll));
        registry.register("b", Box::new(Named));

        assert_eq!(
            format!("{:?}", registry),
            r#"{"b": "drip_override", "a": "RestrictionHook"}"#
        );
    }
}
