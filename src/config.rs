/// Nesting limit used when no [`Config`] is given.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Knobs for turning source text into an [`crate::Expr`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum height of the syntax tree. Parsing, evaluation and rendering all
    /// recurse once per level, so this also bounds their stack usage.
    ///
    /// Height counts every operator, not just parentheses: `1+1+1` has height 3,
    /// so a flat sum of more than `max_depth` terms is rejected as well.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
