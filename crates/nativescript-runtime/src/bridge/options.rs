//! Load policies

/// What to do when two registration entries share a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The later entry is an error ([`BridgeError::DuplicateType`])
    ///
    /// [`BridgeError::DuplicateType`]: crate::BridgeError::DuplicateType
    #[default]
    Reject,
    /// The later entry replaces the earlier one
    Overwrite,
}

/// What to do when a type cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvePolicy {
    /// The first broken type fails the whole load
    #[default]
    Strict,
    /// Broken types are left out and their errors kept in
    /// [`ScriptCollection::skipped`](crate::ScriptCollection::skipped)
    SkipBroken,
}

/// Options for [`ScriptCollection::load`](crate::ScriptCollection::load).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// Duplicate type names
    pub duplicates: DuplicatePolicy,
    /// Unresolvable types
    pub unresolved: ResolvePolicy,
}

impl LoadOptions {
    /// Strict loading with duplicate rejection
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duplicate policy
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Set the resolution policy
    pub fn unresolved(mut self, policy: ResolvePolicy) -> Self {
        self.unresolved = policy;
        self
    }
}
