// LogMixer - core/filter.rs
//
// Include/exclude substring filtering of finalised message blocks.
// Core layer: pure logic, no I/O.
//
// Decision table (matching is case-sensitive substring containment against
// the block's full text, origin tag included):
//
//   exclude   include   decision
//   -------   -------   --------------------------------------------------
//   empty     empty     keep
//   set       empty     drop iff any exclude term matches
//   empty     set       drop iff no include term matches
//   set       set       drop iff no include term matches, else iff any
//                       exclude term matches

use serde::Deserialize;

/// Substring rule set applied to every finalised block.
///
/// Loaded once at startup and shared read-only by every segmenter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Blocks containing any of these terms are dropped.
    pub exclude: Vec<String>,

    /// When non-empty, blocks must contain at least one of these terms.
    pub include: Vec<String>,
}

/// Deserialisable shape of the filter file.
///
/// `contains` is the legacy single-list key and is treated as `exclude`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawFilterConfig {
    pub exclude: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub contains: Option<Vec<String>>,
}

impl From<RawFilterConfig> for FilterConfig {
    fn from(raw: RawFilterConfig) -> Self {
        // Empty terms would match every block; ignore them.
        let clean = |terms: Vec<String>| -> Vec<String> {
            terms.into_iter().filter(|t| !t.is_empty()).collect()
        };

        let mut exclude = clean(raw.exclude.unwrap_or_default());
        for term in clean(raw.contains.unwrap_or_default()) {
            if !exclude.contains(&term) {
                exclude.push(term);
            }
        }

        Self {
            exclude,
            include: clean(raw.include.unwrap_or_default()),
        }
    }
}

impl FilterConfig {
    /// Returns true if no rules are configured (every block is kept).
    pub fn is_empty(&self) -> bool {
        self.exclude.is_empty() && self.include.is_empty()
    }

    /// Decide whether a finalised block's text is dropped.
    pub fn should_drop(&self, text: &str) -> bool {
        if !self.include.is_empty() && !contains_any(text, &self.include) {
            return true;
        }
        contains_any(text, &self.exclude)
    }
}

/// Free-function form of [`FilterConfig::should_drop`].
pub fn should_drop(text: &str, config: &FilterConfig) -> bool {
    config.should_drop(text)
}

fn contains_any(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|term| text.contains(term.as_str()))
}
