//! Profile rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Requirements an image must meet for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Exact format tag, e.g. `"PNG"`
    pub format: String,
    /// Exact width in pixels
    pub width: u32,
    /// Exact height in pixels
    pub height: u32,
    /// Background must be transparent
    pub transparency_required: bool,
}

impl Rule {
    /// Create a rule.
    pub fn new(format: impl Into<String>, width: u32, height: u32, transparency_required: bool) -> Self {
        Self {
            format: format.into(),
            width,
            height,
            transparency_required,
        }
    }

    /// `"WIDTHxHEIGHT"`
    pub fn size_string(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Immutable lookup table from profile name to [`Rule`].
///
/// Iteration and [`known_names`](Self::known_names) are in a stable order so
/// error messages are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRegistry {
    rules: BTreeMap<String, Rule>,
}

impl RuleRegistry {
    /// Lifestyle photo profile name
    pub const LIFESTYLE_PHOTO: &'static str = "生活照";
    /// ID photo profile name
    pub const ID_PHOTO: &'static str = "证件照";

    /// The built-in profiles.
    pub fn builtin() -> Self {
        Self::from_rules([
            (Self::LIFESTYLE_PHOTO, Rule::new("PNG", 900, 1200, true)),
            (Self::ID_PHOTO, Rule::new("PNG", 400, 400, true)),
        ])
    }

    /// Build a registry from arbitrary rules.
    pub fn from_rules<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, Rule)>,
        S: Into<String>,
    {
        Self {
            rules: rules.into_iter().map(|(name, rule)| (name.into(), rule)).collect(),
        }
    }

    /// Rule for `name`, if registered.
    pub fn lookup(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered profile names.
    pub fn known_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Profiles and their rules.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// No profiles registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
