//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Serve the AI feedback endpoints (503 when disabled)
    #[serde(default = "default_true")]
    pub enable_ai_feedback: bool,

    /// Share one model call between identical concurrent feedback requests
    #[serde(default = "default_true")]
    pub coalesce_feedback_requests: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_ai_feedback: true,
            coalesce_feedback_requests: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_flags_defaults() {
        let flags = FeatureFlags::default();
        assert!(flags.enable_ai_feedback);
        assert!(flags.coalesce_feedback_requests);
    }

    #[test]
    fn test_feature_flags_deserialization() {
        let flags: FeatureFlags =
            serde_json::from_str(r#"{"enable_ai_feedback": false}"#).unwrap();
        assert!(!flags.enable_ai_feedback);
        assert!(flags.coalesce_feedback_requests);
    }
}
