//! Keyword-based inference of implicit task dependencies.
//!
//! The pipeline is leaf-first:
//! - [`extract_keywords`]: free text -> keyword set
//! - [`PatternMatcher`]: keyword set -> first matching [`DependencyPattern`]
//! - [`ImplicitDependencyDetector`]: task pairs -> inferred graph edges

mod detector;
mod keywords;
mod patterns;

pub use detector::{DEFAULT_DETECTION_THRESHOLD, ImplicitDependencyDetector};
pub use keywords::extract_keywords;
pub use patterns::{DEPENDENCY_PATTERNS, DependencyLikelihood, DependencyPattern, PatternMatcher};
