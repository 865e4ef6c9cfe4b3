//! Engine settings loaded from the environment.
//!
//! | variable | default | meaning |
//! |---|---|---|
//! | `BRIDGE_SHORTFALL_POLICY` | `shallowest` | bulk resolution when a path is too short |
//! | `BRIDGE_DEFAULT_LOCALE` | `en` | fallback locale for translation reads |
//! | `BRIDGE_SEED_PATH` | unset | JSON hierarchy imported at startup |
//!
//! Invalid values are logged and replaced by the default; a bad setting never
//! stops the engine from starting.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use bridge_domain::{Locale, ShortfallPolicy};

pub const SHORTFALL_POLICY_VAR: &str = "BRIDGE_SHORTFALL_POLICY";
pub const DEFAULT_LOCALE_VAR: &str = "BRIDGE_DEFAULT_LOCALE";
pub const SEED_PATH_VAR: &str = "BRIDGE_SEED_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Policy used by the query planner when none is passed explicitly.
    #[serde(default)]
    pub shortfall_policy: ShortfallPolicy,
    /// Locale tried after the requested one by `get_with_fallback`.
    #[serde(default)]
    pub default_locale: Locale,
    /// Hierarchy seed file, if any.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            shortfall_policy: ShortfallPolicy::default(),
            default_locale: Locale::default(),
            seed_path: None,
        }
    }
}

impl EngineSettings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = lookup(SHORTFALL_POLICY_VAR) {
            match raw.parse::<ShortfallPolicy>() {
                Ok(policy) => settings.shortfall_policy = policy,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "Invalid {}, using {}",
                    SHORTFALL_POLICY_VAR,
                    settings.shortfall_policy
                ),
            }
        }

        if let Some(raw) = lookup(DEFAULT_LOCALE_VAR) {
            match Locale::new(raw.as_str()) {
                Ok(locale) => settings.default_locale = locale,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "Invalid {}, using {}",
                    DEFAULT_LOCALE_VAR,
                    settings.default_locale
                ),
            }
        }

        settings.seed_path = lookup(SEED_PATH_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        settings
    }
}
