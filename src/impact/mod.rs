//! Impact classification for code changes.
//!
//! Decision order (first match wins, later rules are never reconsidered):
//!
//! 1. flagship size or flagship keyword
//! 2. conventional prefix gives a base tier (may be absent)
//! 3. minor base tier, or minor keyword/label on a minor-sized change
//! 4. tiny change (≤10 lines, ≤2 files) is minor regardless of prefix
//! 5. major base tier, major size, or major keyword
//! 6. base tier
//! 7. standard

pub mod rules;

pub use rules::{conventional_base_tier, extract_conventional_type, PatternRule, PatternRules};

use crate::config::{ChronicleConfig, ImpactThresholds};
use crate::core::{ChangeRecord, ImpactTier, Result};
use serde::Serialize;

const TINY_MAX_LINES: u64 = 10;
const TINY_MAX_FILES: u64 = 2;

/// Classifies changes into impact tiers using size thresholds and title rules.
#[derive(Debug, Clone, Default)]
pub struct ImpactClassifier {
    thresholds: ImpactThresholds,
    rules: PatternRules,
}

impl ImpactClassifier {
    pub fn new(thresholds: ImpactThresholds, rules: PatternRules) -> Self {
        Self { thresholds, rules }
    }

    pub fn with_thresholds(thresholds: ImpactThresholds) -> Self {
        Self::new(thresholds, PatternRules::default())
    }

    /// Thresholds and extra patterns from a loaded config.
    pub fn from_config(config: &ChronicleConfig) -> Result<Self> {
        Ok(Self::new(
            config.impact_thresholds(),
            PatternRules::with_extras(&config.patterns())?,
        ))
    }

    /// Classify a change. Total: every change maps to exactly one tier.
    pub fn classify(&self, change: &ChangeRecord) -> ImpactTier {
        let total_lines = change.total_lines();
        let files = change.changed_files;
        let title = change.title.as_str();

        if self.thresholds.flagship.reached(total_lines, files)
            || self.rules.matches(ImpactTier::Flagship, title)
        {
            return ImpactTier::Flagship;
        }

        let base = extract_conventional_type(title)
            .as_deref()
            .and_then(conventional_base_tier);

        let looks_minor = self.rules.matches(ImpactTier::Minor, title)
            || self.rules.has_minor_label(&change.labels);
        if base == Some(ImpactTier::Minor)
            || (looks_minor && self.thresholds.minor.contains(total_lines, files))
        {
            return ImpactTier::Minor;
        }

        // Fires even for `feat:` titles; tiny diffs are never more than minor.
        if total_lines <= TINY_MAX_LINES && files <= TINY_MAX_FILES {
            return ImpactTier::Minor;
        }

        if base == Some(ImpactTier::Major)
            || self.thresholds.major.reached(total_lines, files)
            || self.rules.matches(ImpactTier::Major, title)
        {
            return ImpactTier::Major;
        }

        base.unwrap_or(ImpactTier::Standard)
    }

    /// The stored tier when the change was already tagged, otherwise a fresh
    /// classification.
    pub fn resolve(&self, change: &ChangeRecord) -> ImpactTier {
        change.impact.unwrap_or_else(|| self.classify(change))
    }
}

/// Classify a change with optional thresholds and the built-in keyword rules.
pub fn classify_impact(change: &ChangeRecord, thresholds: Option<&ImpactThresholds>) -> ImpactTier {
    ImpactClassifier::with_thresholds(thresholds.copied().unwrap_or_default()).classify(change)
}

/// Outcome of a tagging pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub updated: usize,
    pub unchanged: usize,
}

/// Write the classified tier into every change whose stored tier differs.
pub fn tag_changes(changes: &mut [ChangeRecord], classifier: &ImpactClassifier) -> TagSummary {
    let mut summary = TagSummary::default();
    for change in changes.iter_mut() {
        let tier = classifier.classify(change);
        if change.impact == Some(tier) {
            summary.unchanged += 1;
        } else {
            tracing::trace!(url = %change.url, %tier, "tagging change");
            change.impact = Some(tier);
            summary.updated += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::ChangeBuilder;

    fn classify(change: ChangeRecord) -> ImpactTier {
        classify_impact(&change, None)
    }

    #[test]
    fn test_flagship_by_size_without_keyword() {
        let change = ChangeBuilder::new(1, "Tidy up handlers").size(400, 100, 4).build();
        assert_eq!(classify(change), ImpactTier::Flagship);
    }

    #[test]
    fn test_flagship_by_file_count() {
        let change = ChangeBuilder::new(1, "chore: rename module").size(15, 15, 15).build();
        assert_eq!(classify(change), ImpactTier::Flagship);
    }

    #[test]
    fn test_flagship_keyword_overrides_tiny_size() {
        let change = ChangeBuilder::new(1, "rewrite auth flow").size(3, 2, 1).build();
        assert_eq!(classify(change), ImpactTier::Flagship);
    }

    #[test]
    fn test_tiny_feat_is_minor() {
        let change = ChangeBuilder::new(1, "feat: new setting").size(3, 2, 1).build();
        assert_eq!(classify(change), ImpactTier::Minor);
    }

    #[test]
    fn test_minor_prefix_wins_regardless_of_size() {
        let change = ChangeBuilder::new(1, "docs: rewrite nothing big").size(150, 50, 6);
        // "rewrite" is a flagship keyword, so drop it for this case
        let change = change.title("docs: expand the guide").build();
        assert_eq!(classify(change), ImpactTier::Minor);
    }

    #[test]
    fn test_minor_keyword_requires_minor_size() {
        let small = ChangeBuilder::new(1, "Bump tokio to 1.40").size(8, 8, 2).build();
        assert_eq!(classify(small), ImpactTier::Minor);

        let large = ChangeBuilder::new(2, "Bump tokio to 1.40").size(80, 40, 5).build();
        assert_eq!(classify(large), ImpactTier::Standard);
    }

    #[test]
    fn test_minor_label_with_minor_size() {
        let change = ChangeBuilder::new(1, "Update lockfile")
            .size(12, 6, 3)
            .labels(&["dependencies"])
            .build();
        assert_eq!(classify(change), ImpactTier::Minor);
    }

    #[test]
    fn test_major_by_prefix() {
        let change = ChangeBuilder::new(1, "refactor(api): split handlers").size(60, 30, 4).build();
        assert_eq!(classify(change), ImpactTier::Major);
    }

    #[test]
    fn test_major_by_size() {
        let change = ChangeBuilder::new(1, "Tweak caching").size(150, 60, 3).build();
        assert_eq!(classify(change), ImpactTier::Major);
    }

    #[test]
    fn test_major_by_keyword() {
        let change = ChangeBuilder::new(1, "Add export endpoint").size(40, 5, 3).build();
        assert_eq!(classify(change), ImpactTier::Major);
    }

    #[test]
    fn test_fallback_to_base_tier() {
        let change = ChangeBuilder::new(1, "fix: handle empty cart").size(30, 10, 3).build();
        assert_eq!(classify(change), ImpactTier::Standard);

        let change = ChangeBuilder::new(2, "perf: cache lookups").size(30, 10, 3).build();
        assert_eq!(classify(change), ImpactTier::Standard);
    }

    #[test]
    fn test_default_is_standard() {
        let change = ChangeBuilder::new(1, "Handle empty cart").size(30, 10, 3).build();
        assert_eq!(classify(change), ImpactTier::Standard);
    }

    #[test]
    fn test_custom_thresholds() {
        let mut thresholds = ImpactThresholds::default();
        thresholds.flagship.min_lines = 100;
        let change = ChangeBuilder::new(1, "Handle empty cart").size(80, 30, 3).build();
        assert_eq!(classify_impact(&change, Some(&thresholds)), ImpactTier::Flagship);
    }

    #[test]
    fn test_resolve_prefers_stored_impact() {
        let classifier = ImpactClassifier::default();
        let change = ChangeBuilder::new(1, "Handle empty cart")
            .size(30, 10, 3)
            .impact(ImpactTier::Flagship)
            .build();
        assert_eq!(classifier.resolve(&change), ImpactTier::Flagship);
        assert_eq!(classifier.classify(&change), ImpactTier::Standard);
    }

    #[test]
    fn test_tag_changes_counts_updates() {
        let classifier = ImpactClassifier::default();
        let mut changes = vec![
            ChangeBuilder::new(1, "Handle empty cart")
                .size(30, 10, 3)
                .impact(ImpactTier::Standard)
                .build(),
            ChangeBuilder::new(2, "Handle empty cart").size(30, 10, 3).build(),
            ChangeBuilder::new(3, "overhaul search")
                .size(30, 10, 3)
                .impact(ImpactTier::Minor)
                .build(),
        ];

        let summary = tag_changes(&mut changes, &classifier);
        assert_eq!(summary, TagSummary { updated: 2, unchanged: 1 });
        assert_eq!(changes[1].impact, Some(ImpactTier::Standard));
        assert_eq!(changes[2].impact, Some(ImpactTier::Flagship));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::testkit::ChangeBuilder;
    use proptest::prelude::*;

    proptest! {
        /// Property: classification is deterministic, and flagship exactly
        /// when the flagship floor or a flagship keyword is hit.
        #[test]
        fn classify_is_stable_with_exact_flagship(
            additions in 0u64..2_000,
            deletions in 0u64..2_000,
            files in 0u64..40,
            title in "[a-zA-Z:()\\[\\] ]{0,40}",
            minor_max in 0u64..50,
            major_min in 0u64..400,
        ) {
            let mut thresholds = ImpactThresholds::default();
            thresholds.minor.max_lines = minor_max;
            thresholds.major.min_lines = major_min;
            let change = ChangeBuilder::new(1, &title).size(additions, deletions, files).build();

            let first = classify_impact(&change, Some(&thresholds));
            let second = classify_impact(&change, Some(&thresholds));
            prop_assert_eq!(first, second);
            let flagship = thresholds.flagship.reached(additions + deletions, files)
                || PatternRules::default().matches(ImpactTier::Flagship, &title);
            prop_assert_eq!(first == ImpactTier::Flagship, flagship);
        }

        /// Property: anything at or above the flagship line floor is flagship.
        #[test]
        fn flagship_size_always_wins(
            additions in 500u64..5_000,
            files in 0u64..40,
            title in "[a-z ]{0,30}",
        ) {
            let change = ChangeBuilder::new(1, &format!("docs: {title}"))
                .size(additions, 0, files)
                .build();
            prop_assert_eq!(classify_impact(&change, None), ImpactTier::Flagship);
        }

        /// Property: a flagship keyword anywhere in the title wins at any size.
        #[test]
        fn flagship_keyword_always_wins(
            keyword in prop::sample::select(vec!["Breaking", "platform", "migration", "REWRITE", "overhaul"]),
            prefix in "(feat: |docs: |chore: |)",
            suffix in "[a-z ]{0,20}",
            additions in 0u64..300,
            files in 0u64..10,
        ) {
            let title = format!("{prefix}{keyword}{suffix}");
            let change = ChangeBuilder::new(1, &title).size(additions, 0, files).build();
            prop_assert_eq!(classify_impact(&change, None), ImpactTier::Flagship);
        }

        /// Property: tiny changes without a flagship keyword are always minor.
        #[test]
        fn tiny_change_is_minor(
            additions in 0u64..=10,
            files in 0u64..=2,
            title in "(feat: |refactor: |fix: |)[a-z ]{0,30}",
        ) {
            prop_assume!(!PatternRules::default().matches(ImpactTier::Flagship, &title));
            let deletions = 10 - additions;
            let change = ChangeBuilder::new(1, &title).size(additions, deletions, files).build();
            prop_assert_eq!(classify_impact(&change, None), ImpactTier::Minor);
        }
    }
}
