//! Default line selection for multi-line stations.

use crate::domain::LineCode;

/// How to pick the line fetched first when a station is selected.
///
/// The user can always switch to another serving line afterwards; this only
/// decides the initial choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LinePolicy {
    /// The first line listed for the station in the catalog.
    #[default]
    FirstInCatalog,
    /// The first of these lines that serves the station, falling back to
    /// catalog order when none do.
    Prefer(Vec<LineCode>),
}

impl LinePolicy {
    /// Choose a line from the station's serving lines (catalog order).
    ///
    /// Returns `None` only when `lines` is empty.
    pub fn choose(&self, lines: &[LineCode]) -> Option<LineCode> {
        match self {
            LinePolicy::FirstInCatalog => lines.first().copied(),
            LinePolicy::Prefer(preferred) => preferred
                .iter()
                .find(|p| lines.contains(p))
                .or_else(|| lines.first())
                .copied(),
        }
    }
}
