//! Connection-string matching.
//!
//! # Responsibilities
//! - Recognise the driver family's scheme segment (`:hive2:`)
//! - Recognise markers that belong to a sibling driver family
//!
//! # Design Decisions
//! - Purely syntactic; runs before any parsing
//! - Scheme matching is case-sensitive
//! - No regex to guarantee O(n) matching

use std::fmt;

/// Scheme segment of the Hive 2 driver family.
pub const HIVE2_SEGMENT: &str = ":hive2:";

/// Parameter only the Simba Hive driver understands.
pub const SIMBA_URL_PARAMETER: &str = "AuthMech=";

/// Trait for matching connection strings against conditions.
pub trait UrlMatcher: Send + Sync + fmt::Debug {
    /// Returns true if the URL matches this condition.
    fn matches(&self, url: &str) -> bool;
}

/// Matches URLs of the shape `<something><segment><anything>` on a single line.
#[derive(Debug, Clone)]
pub struct SchemeSegmentMatcher {
    segment: String,
}

impl SchemeSegmentMatcher {
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
        }
    }

    pub fn hive2() -> Self {
        Self::new(HIVE2_SEGMENT)
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

impl UrlMatcher for SchemeSegmentMatcher {
    fn matches(&self, url: &str) -> bool {
        if url.chars().any(is_line_terminator) {
            return false;
        }
        // At least one character must precede the segment.
        url.match_indices(self.segment.as_str()).any(|(idx, _)| idx > 0)
    }
}

/// Matches URLs containing a literal marker anywhere.
#[derive(Debug, Clone)]
pub struct MarkerMatcher {
    marker: String,
}

impl MarkerMatcher {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn simba() -> Self {
        Self::new(SIMBA_URL_PARAMETER)
    }
}

impl UrlMatcher for MarkerMatcher {
    fn matches(&self, url: &str) -> bool {
        url.contains(&self.marker)
    }
}
