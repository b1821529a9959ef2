//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Shared persona and output rules
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Recommendation + three follow-up choices for a topic
pub const RECOMMENDATION: &str = include_str!("../../prompts/recommendation.pmt");

/// Deep research over a whole thread
pub const SYNTHESIS: &str = include_str!("../../prompts/synthesis.pmt");

/// Enhancement of one workshop field
pub const ENHANCEMENT: &str = include_str!("../../prompts/enhancement.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "system" => Some(SYSTEM),
        "recommendation" => Some(RECOMMENDATION),
        "synthesis" => Some(SYNTHESIS),
        "enhancement" => Some(ENHANCEMENT),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_known() {
        assert!(get_embedded("system").unwrap().contains("KARA"));
        assert!(get_embedded("recommendation").unwrap().contains("exactly 3"));
        assert!(get_embedded("synthesis").unwrap().contains("nuances"));
        assert!(get_embedded("enhancement").unwrap().contains("suggestion"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
