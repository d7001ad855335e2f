// WaitCondition - Readiness states an element can be waited for
//
// The set is closed: anything finer-grained (text, value, focus) belongs to a
// step that first waits for one of these and then reads the element.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State the element located by a `Locator` must reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitCondition {
    /// Attached to the document, visible or not.
    Present,
    /// Present, with a non-empty bounding box and not hidden by style.
    Visible,
    /// Visible, enabled, and not covered by another element.
    Clickable,
}

impl WaitCondition {
    /// Human-readable name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitCondition::Present => "present",
            WaitCondition::Visible => "visible",
            WaitCondition::Clickable => "clickable",
        }
    }

    /// Whether checking this condition requires a visibility query.
    pub(crate) fn needs_visibility(&self) -> bool {
        matches!(self, WaitCondition::Visible | WaitCondition::Clickable)
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(WaitCondition::Present.to_string(), "present");
        assert_eq!(WaitCondition::Visible.to_string(), "visible");
        assert_eq!(WaitCondition::Clickable.to_string(), "clickable");
    }

    #[test]
    fn test_visibility_requirement() {
        assert!(!WaitCondition::Present.needs_visibility());
        assert!(WaitCondition::Visible.needs_visibility());
        assert!(WaitCondition::Clickable.needs_visibility());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&WaitCondition::Clickable).unwrap();
        assert_eq!(json, "\"clickable\"");
        let parsed: WaitCondition = serde_json::from_str("\"visible\"").unwrap();
        assert_eq!(parsed, WaitCondition::Visible);
    }
}
