//! Keyword and prefix rules used by the impact classifier.
//!
//! Title keywords are kept as an ordered table of pattern → tier rules so the
//! built-in vocabulary can be extended from configuration without touching the
//! decision order in [`super::ImpactClassifier`].

use crate::config::PatternConfig;
use crate::core::{Error, ImpactTier, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

// Pre-compiled regex patterns using once_cell
static CONVENTIONAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\w+)(?:\([^)]*\))?:\s*").unwrap());
static BRACKET_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\[(\w+)\]").unwrap());

const FLAGSHIP_KEYWORDS: &[&str] = &[
    r"breaking",
    r"platform",
    r"architect",
    r"migration",
    r"redesign",
    r"overhaul",
    r"rewrite",
];

/// Anchored at the start of the title: typo fixes and dependency bumps.
const MINOR_KEYWORDS: &[&str] = &[
    r"^fix\s*typo",
    r"^typo",
    r"^update\s+deps?",
    r"^bump\s+",
    r"^\[chore\]",
    r"^update\s+dependencies",
    r"^dependency\s+update",
    r"^renovate",
    r"^dependabot",
];

const MAJOR_KEYWORDS: &[&str] = &[r"^\[feat\]", r"^add\s+", r"^implement\s+", r"^new\s+"];

const MINOR_LABELS: &[&str] = &["dependencies", "chore", "maintenance", "renovate", "dependabot"];

static DEFAULT_RULES: Lazy<PatternRules> = Lazy::new(|| {
    let mut rules = PatternRules {
        rules: Vec::new(),
        minor_labels: MINOR_LABELS.iter().map(|l| l.to_string()).collect(),
    };
    for (keywords, tier) in [
        (FLAGSHIP_KEYWORDS, ImpactTier::Flagship),
        (MINOR_KEYWORDS, ImpactTier::Minor),
        (MAJOR_KEYWORDS, ImpactTier::Major),
    ] {
        for keyword in keywords {
            rules
                .push(keyword, tier)
                .expect("built-in impact patterns are valid");
        }
    }
    rules
});

/// A single title pattern and the tier it votes for.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub pattern: Regex,
    pub tier: ImpactTier,
}

/// Ordered keyword rules plus the label vocabulary for maintenance work.
#[derive(Debug, Clone)]
pub struct PatternRules {
    rules: Vec<PatternRule>,
    minor_labels: Vec<String>,
}

impl Default for PatternRules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

impl PatternRules {
    /// Built-in rules followed by the extra patterns from configuration.
    pub fn with_extras(extras: &PatternConfig) -> Result<Self> {
        let mut rules = Self::default();
        for (patterns, tier) in [
            (&extras.extra_flagship, ImpactTier::Flagship),
            (&extras.extra_minor, ImpactTier::Minor),
            (&extras.extra_major, ImpactTier::Major),
        ] {
            for pattern in patterns {
                rules.push(pattern, tier)?;
            }
        }
        rules.minor_labels.extend(
            extras
                .extra_minor_labels
                .iter()
                .map(|label| label.to_lowercase()),
        );
        Ok(rules)
    }

    /// Append a case-insensitive rule. Later rules never outrank earlier ones;
    /// tiers are only ever asked "does any rule for this tier match".
    pub fn push(&mut self, pattern: &str, tier: ImpactTier) -> Result<()> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        self.rules.push(PatternRule {
            pattern: compiled,
            tier,
        });
        Ok(())
    }

    /// Whether any rule voting for `tier` matches the title.
    pub fn matches(&self, tier: ImpactTier, title: &str) -> bool {
        self.rules
            .iter()
            .filter(|rule| rule.tier == tier)
            .any(|rule| rule.pattern.is_match(title))
    }

    /// Whether any label marks the change as maintenance work.
    pub fn has_minor_label(&self, labels: &[String]) -> bool {
        labels.iter().any(|label| {
            let label = label.to_lowercase();
            self.minor_labels.iter().any(|minor| *minor == label)
        })
    }
}

/// Extract a conventional-commit type from a title.
///
/// Handles `type: message`, `type(scope): message` and `[type] message`.
/// The result is lowercased.
pub fn extract_conventional_type(title: &str) -> Option<String> {
    CONVENTIONAL_PREFIX
        .captures(title)
        .or_else(|| BRACKET_PREFIX.captures(title))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Base tier implied by a conventional-commit type, if it is one we know.
pub fn conventional_base_tier(commit_type: &str) -> Option<ImpactTier> {
    match commit_type {
        "chore" | "docs" | "style" | "ci" | "build" => Some(ImpactTier::Minor),
        "fix" | "test" | "perf" => Some(ImpactTier::Standard),
        "feat" | "refactor" => Some(ImpactTier::Major),
        _ => None,
    }
}
