//! Domain dependency patterns and the first-match pattern matcher.
//!
//! The pattern table is a priority list. [`PatternMatcher::find_matching_pattern`]
//! walks it front to back and returns the first entry with any trigger
//! keyword in common with the input, even if a later entry would match more
//! keywords. Reordering [`DEPENDENCY_PATTERNS`] changes inference results.
//!
//! Keyword comparison is a bidirectional substring test: `endpoints` matches
//! the trigger `endpoint`, and `api` would match a keyword `apis`.

use std::collections::HashSet;

/// A category of work and the kinds of work it typically depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DependencyPattern {
    /// Category name used in reasoning text
    pub name: &'static str,

    /// Keywords that identify work in this category
    pub trigger_keywords: &'static [&'static str],

    /// Keywords of the work this category typically depends on
    pub prerequisite_keywords: &'static [&'static str],

    /// Confidence when every prerequisite keyword is present
    pub confidence: f64,
}

/// Built-in dependency patterns, in priority order.
pub const DEPENDENCY_PATTERNS: &[DependencyPattern] = &[
    DependencyPattern {
        name: "setup",
        trigger_keywords: &[
            "setup",
            "install",
            "configure",
            "initialize",
            "infrastructure",
            "environment",
            "scaffold",
            "bootstrap",
        ],
        prerequisite_keywords: &["requirements", "design", "architecture"],
        confidence: 0.7,
    },
    DependencyPattern {
        name: "database",
        trigger_keywords: &[
            "database",
            "schema",
            "migration",
            "table",
            "model",
            "sql",
            "storage",
        ],
        prerequisite_keywords: &["setup", "infrastructure", "configure"],
        confidence: 0.85,
    },
    DependencyPattern {
        name: "api",
        trigger_keywords: &[
            "api", "endpoint", "backend", "server", "route", "service", "handler",
        ],
        prerequisite_keywords: &["database", "schema", "model"],
        confidence: 0.8,
    },
    DependencyPattern {
        name: "ui",
        trigger_keywords: &[
            "frontend",
            "component",
            "interface",
            "layout",
            "screen",
            "page",
            "widget",
        ],
        prerequisite_keywords: &["api", "endpoint", "backend"],
        confidence: 0.8,
    },
    DependencyPattern {
        name: "integration",
        trigger_keywords: &["integration", "integrate", "connect", "webhook", "sync"],
        prerequisite_keywords: &["api", "service", "authentication"],
        confidence: 0.75,
    },
    DependencyPattern {
        name: "testing",
        trigger_keywords: &["test", "testing", "coverage", "e2e", "verify", "validation"],
        prerequisite_keywords: &["implement", "feature", "api", "component"],
        confidence: 0.75,
    },
    DependencyPattern {
        name: "documentation",
        trigger_keywords: &[
            "document",
            "documentation",
            "docs",
            "readme",
            "guide",
            "tutorial",
        ],
        prerequisite_keywords: &["api", "feature", "implement"],
        confidence: 0.7,
    },
    DependencyPattern {
        name: "deployment",
        trigger_keywords: &["deploy", "deployment", "release", "production", "ship", "launch"],
        prerequisite_keywords: &["test", "build", "pipeline"],
        confidence: 0.9,
    },
];

/// Outcome of checking whether one keyword set likely depends on another.
///
/// "Not likely" is an ordinary result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyLikelihood {
    /// Whether a dependency is likely
    pub likely: bool,

    /// Confidence in the dependency (0.0 when not likely)
    pub confidence: f64,

    /// Human-readable explanation
    pub reason: String,
}

impl DependencyLikelihood {
    fn unlikely(reason: impl Into<String>) -> Self {
        Self {
            likely: false,
            confidence: 0.0,
            reason: reason.into(),
        }
    }
}

/// Bidirectional substring test used for every keyword comparison.
fn keywords_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn matches_any(candidate: &str, keywords: &HashSet<String>) -> bool {
    keywords.iter().any(|k| keywords_match(k, candidate))
}

/// Matches keyword sets against an ordered pattern table.
#[derive(Debug, Clone, Copy)]
pub struct PatternMatcher {
    patterns: &'static [DependencyPattern],
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new(DEPENDENCY_PATTERNS)
    }
}

impl PatternMatcher {
    /// Create a matcher over the given table, scanned in slice order.
    pub fn new(patterns: &'static [DependencyPattern]) -> Self {
        Self { patterns }
    }

    /// The table this matcher scans.
    pub fn patterns(&self) -> &'static [DependencyPattern] {
        self.patterns
    }

    /// Return the first pattern with at least one trigger keyword in common
    /// with `keywords`.
    pub fn find_matching_pattern(
        &self,
        keywords: &HashSet<String>,
    ) -> Option<&'static DependencyPattern> {
        self.patterns.iter().find(|pattern| {
            pattern
                .trigger_keywords
                .iter()
                .any(|trigger| matches_any(trigger, keywords))
        })
    }

    /// Estimate whether work described by `keywords_b` depends on work
    /// described by `keywords_a`.
    ///
    /// The pattern is chosen from `keywords_b` (the candidate dependent).
    /// Confidence scales the pattern's confidence by the fraction of its
    /// prerequisite keywords found in `keywords_a`.
    pub fn check_dependency(
        &self,
        keywords_a: &HashSet<String>,
        keywords_b: &HashSet<String>,
    ) -> DependencyLikelihood {
        let Some(pattern) = self.find_matching_pattern(keywords_b) else {
            return DependencyLikelihood::unlikely("no dependency pattern matches the dependent");
        };

        let matched: Vec<&str> = pattern
            .prerequisite_keywords
            .iter()
            .copied()
            .filter(|prereq| matches_any(prereq, keywords_a))
            .collect();

        if matched.is_empty() {
            return DependencyLikelihood::unlikely(format!(
                "'{}' work found no prerequisite keywords in the candidate prerequisite",
                pattern.name
            ));
        }

        let total = pattern.prerequisite_keywords.len().max(1);
        #[allow(clippy::cast_precision_loss)]
        let confidence = pattern.confidence * (matched.len() as f64 / total as f64);

        DependencyLikelihood {
            likely: true,
            confidence,
            reason: format!(
                "'{}' work typically depends on {} ({} of {} prerequisite keywords matched)",
                pattern.name,
                matched.join(", "),
                matched.len(),
                total
            ),
        }
    }
}
