use serde::{Deserialize, Serialize};

/// Extra title patterns appended after the built-in keyword rules.
///
/// Each entry is a regular expression matched case-insensitively against the
/// change title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default)]
    pub extra_flagship: Vec<String>,

    #[serde(default)]
    pub extra_minor: Vec<String>,

    #[serde(default)]
    pub extra_major: Vec<String>,

    /// Labels that mark a change as maintenance work, in addition to the defaults
    #[serde(default)]
    pub extra_minor_labels: Vec<String>,
}

impl PatternConfig {
    pub fn is_empty(&self) -> bool {
        self.extra_flagship.is_empty()
            && self.extra_minor.is_empty()
            && self.extra_major.is_empty()
            && self.extra_minor_labels.is_empty()
    }
}
