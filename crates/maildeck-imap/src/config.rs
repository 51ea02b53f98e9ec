//! Parser and renderer limits.

use maildeck_mime::DEFAULT_MAX_DEPTH;

/// Bounds applied to client-controlled input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// Longest accepted part-specifier, in bytes (`1.2.3` is 5).
    pub max_part_spec_len: usize,
    /// Mailbox names of this length or longer are rejected.
    pub max_mailbox_name_len: usize,
    /// Deepest MIME nesting the renderers will walk.
    pub max_mime_depth: usize,
}

impl Limits {
    /// Creates the default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_part_spec_len: 100,
            max_mailbox_name_len: 100,
            max_mime_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Creates a limits builder.
    #[must_use]
    pub const fn builder() -> LimitsBuilder {
        LimitsBuilder::new()
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Limits`].
#[derive(Debug, Clone)]
pub struct LimitsBuilder {
    limits: Limits,
}

impl LimitsBuilder {
    /// Creates a builder starting from the default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limits: Limits::new(),
        }
    }

    /// Sets the longest accepted part-specifier.
    #[must_use]
    pub const fn max_part_spec_len(mut self, len: usize) -> Self {
        self.limits.max_part_spec_len = len;
        self
    }

    /// Sets the mailbox name length bound.
    #[must_use]
    pub const fn max_mailbox_name_len(mut self, len: usize) -> Self {
        self.limits.max_mailbox_name_len = len;
        self
    }

    /// Sets the MIME nesting limit.
    #[must_use]
    pub const fn max_mime_depth(mut self, depth: usize) -> Self {
        self.limits.max_mime_depth = depth;
        self
    }

    /// Builds the limits.
    #[must_use]
    pub const fn build(self) -> Limits {
        self.limits
    }
}

impl Default for LimitsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
