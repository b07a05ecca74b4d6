//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:   green   (acyclic graph, high-confidence inferences)
//!   - Warning:   yellow  (medium-confidence inferences, skipped detection)
//!   - Error:     red     (cycles)
//!   - Reference: cyan    (task IDs, arrows)
//!   - Muted:     dimmed  (field labels, reasoning, low confidence)
//!   - Emphasis:  bold    (section headers)

use colored::Colorize;

use super::OutputConfig;

/// Confidence at or above which an inference is shown as strong.
const HIGH_CONFIDENCE: f64 = 0.8;

/// Confidence at or above which an inference is shown as moderate.
const MEDIUM_CONFIDENCE: f64 = 0.5;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Colorize a task ID (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Format a confidence as a percentage, colored by strength.
pub(crate) fn colorize_confidence(confidence: f64, config: &OutputConfig) -> String {
    let text = format!("{:.0}%", confidence * 100.0);
    if !config.use_colors {
        return text;
    }
    if confidence >= HIGH_CONFIDENCE {
        text.green().to_string()
    } else if confidence >= MEDIUM_CONFIDENCE {
        text.yellow().to_string()
    } else {
        text.dimmed().to_string()
    }
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Dependency arrow, with ASCII fallback support.
pub(crate) fn arrow(config: &OutputConfig) -> String {
    let icon = if config.use_ascii { "->" } else { "→" };
    if !config.use_colors {
        return icon.to_string();
    }
    icon.cyan().to_string()
}
