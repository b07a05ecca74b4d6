//! Output formatting for CLI commands.
//!
//! Every command renders either human-readable text or pretty JSON for
//! programmatic use. Text printers take any `Write` so they can be tested
//! against a buffer.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, arrows)

pub mod color;

use crate::analysis::AnalysisReport;
use crate::domain::{DetectedDependency, TaskId};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, success, warning};

use color::{arrow, bold, colorize_confidence, colorize_id, dimmed};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to draw ASCII arrows instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `TRELLIS_MAX_WIDTH`: Maximum content width (default: 100)
    /// - `TRELLIS_ASCII`: Set to "1" or "true" for ASCII arrows (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `TRELLIS_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build an OutputConfig from an arbitrary variable lookup.
    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_width = match lookup("TRELLIS_MAX_WIDTH") {
            Some(s) if !s.is_empty() => s.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    env_var = "TRELLIS_MAX_WIDTH",
                    value = %s,
                    default = DEFAULT_MAX_CONTENT_WIDTH,
                    "Invalid value, using default"
                );
                DEFAULT_MAX_CONTENT_WIDTH
            }),
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = lookup("TRELLIS_ASCII")
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        // https://no-color.org/
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("TRELLIS_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    fn content_width(&self) -> usize {
        get_terminal_width().min(self.max_width)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print a full analysis report in the specified format
pub fn print_report(report: &AnalysisReport, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let config = OutputConfig::from_env();
            let width = config.content_width();
            print_report_text(&mut handle, report, width, &config)
        }
        OutputMode::Json => print_json(report),
    }
}

/// Print inferred dependencies in the specified format
pub fn print_detected(detected: &[DetectedDependency], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let config = OutputConfig::from_env();
            let width = config.content_width();
            print_detected_text(&mut handle, detected, width, &config)
        }
        OutputMode::Json => print_json(&detected),
    }
}

/// Print dependency cycles in the specified format
pub fn print_cycles(cycles: &[Vec<TaskId>], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let config = OutputConfig::from_env();
            print_cycles_text(&mut handle, cycles, &config)
        }
        OutputMode::Json => print_json(&CyclesJson {
            has_cycles: !cycles.is_empty(),
            cycles,
        }),
    }
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CyclesJson<'a> {
    has_cycles: bool,
    cycles: &'a [Vec<TaskId>],
}

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

/// Print a text section with a bold title and wrapped, indented content.
fn print_text_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &str,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}:", bold(title, config))?;
    for line in wrap_text(content, width.saturating_sub(2)) {
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

/// Join task IDs into a plain `A → B → C` chain suitable for wrapping.
fn format_chain(ids: &[TaskId], config: &OutputConfig) -> String {
    let separator = if config.use_ascii { " -> " } else { " → " };
    ids.iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

fn format_list(ids: &[TaskId]) -> String {
    ids.iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_report_text<W: Write>(
    w: &mut W,
    report: &AnalysisReport,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    let analysis = &report.analysis;

    writeln!(
        w,
        "{} {}  {} {}  {} {}",
        dimmed("Tasks:", config),
        report.task_count,
        dimmed("Inferred:", config),
        report.detected.len(),
        dimmed("Critical path weight:", config),
        report.critical_path_weight
    )?;

    if report.detection_skipped {
        writeln!(
            w,
            "{}",
            warning(
                "Implicit detection skipped: too many tasks (raise detection.max-tasks)",
                config
            )
        )?;
    }

    if analysis.has_cycles() {
        writeln!(w)?;
        print_cycles_text(w, &analysis.cycles, config)?;
    } else {
        print_text_section(
            w,
            "Execution order",
            &format_chain(&analysis.execution_order, config),
            width,
            config,
        )?;
        print_text_section(
            w,
            "Critical path",
            &format_chain(&analysis.critical_path, config),
            width,
            config,
        )?;
    }

    if !analysis.parallel_groups.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Parallel groups", config))?;
        for (index, group) in analysis.parallel_groups.iter().enumerate() {
            let prefix = format!("  {}. ", index + 1);
            let indent = " ".repeat(prefix.len());
            let lines = wrap_text(&format_list(group), width.saturating_sub(prefix.len()));
            for (line_index, line) in lines.iter().enumerate() {
                let lead = if line_index == 0 { &prefix } else { &indent };
                writeln!(w, "{lead}{line}")?;
            }
        }
    }

    print_text_section(
        w,
        "Orphan tasks",
        &format_list(&analysis.orphan_tasks),
        width,
        config,
    )?;
    print_text_section(
        w,
        "Leaf tasks",
        &format_list(&analysis.leaf_tasks),
        width,
        config,
    )?;

    if !report.detected.is_empty() {
        writeln!(w)?;
        print_detected_text(w, &report.detected, width, config)?;
    }

    Ok(())
}

fn print_detected_text<W: Write>(
    w: &mut W,
    detected: &[DetectedDependency],
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if detected.is_empty() {
        writeln!(w, "No implicit dependencies detected.")?;
        return Ok(());
    }

    writeln!(
        w,
        "{}",
        bold(
            &format!("Inferred {} implicit dependency(ies):", detected.len()),
            config
        )
    )?;

    for dep in detected {
        writeln!(
            w,
            "  {} {} {}  {}",
            colorize_id(dep.from_task_id.as_str(), config),
            arrow(config),
            colorize_id(dep.to_task_id.as_str(), config),
            colorize_confidence(dep.confidence, config)
        )?;
        for line in wrap_text(&dep.reasoning, width.saturating_sub(6)) {
            writeln!(w, "      {}", dimmed(&line, config))?;
        }
    }

    Ok(())
}

fn print_cycles_text<W: Write>(
    w: &mut W,
    cycles: &[Vec<TaskId>],
    config: &OutputConfig,
) -> io::Result<()> {
    if cycles.is_empty() {
        writeln!(w, "{}", success("No dependency cycles found.", config))?;
        return Ok(());
    }

    writeln!(
        w,
        "{}",
        error(&format!("Found {} dependency cycle(s):", cycles.len()), config)
    )?;
    for (index, cycle) in cycles.iter().enumerate() {
        let members = cycle
            .iter()
            .map(|id| colorize_id(id.as_str(), config))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(w, "  {}. {members}", index + 1)?;
    }

    Ok(())
}

/// Wrap text to fit within a given width, preserving existing line breaks.
/// Uses textwrap to handle edge cases like long words (URLs, file paths).
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width.max(1))
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect()
}
