//! Result types produced by line classification.

/// The key a single hit is counted under.
///
/// Keeps track of where the text came from instead of relying on whether a
/// capture "looks" set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKey<'a> {
    /// Text captured by the matcher's first group.
    Captured(&'a str),
    /// The matcher's own pattern text; used when it has no capturing group,
    /// or when the group did not participate or captured nothing.
    Pattern(&'a str),
    /// The whole subject; used when no matchers are configured.
    Subject(&'a str),
}

impl<'a> MatchKey<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            MatchKey::Captured(s) | MatchKey::Pattern(s) | MatchKey::Subject(s) => s,
        }
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, MatchKey::Captured(_))
    }
}

/// Outcome of classifying one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<'a> {
    /// The exclusion pattern matched; nothing else was evaluated.
    Excluded,
    /// One entry per hit, in matcher order. Empty means the line is rest.
    Hits(Vec<MatchKey<'a>>),
}

impl<'a> Classification<'a> {
    pub fn hit_count(&self) -> usize {
        match self {
            Classification::Excluded => 0,
            Classification::Hits(keys) => keys.len(),
        }
    }

    /// True when the line counts towards the rest counter.
    pub fn is_rest(&self) -> bool {
        self.hit_count() == 0
    }
}
