use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::tree::{Node, ScoreResult, TreeModel};

/// Width of the "path: " prefix on the path line
const PATH_PREFIX_WIDTH: usize = 6;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// One path step as shown in text output: `id (score)`, or whichever half exists
fn format_step(node: &Node) -> String {
    match (&node.id, &node.score) {
        (Some(id), Some(score)) => format!("{} ({})", id, score),
        _ => node.label().to_string(),
    }
}

fn format_path(result: &ScoreResult, max_width: Option<usize>) -> String {
    let path = result
        .nodes
        .iter()
        .map(|node| format_step(node))
        .collect::<Vec<_>>()
        .join(" -> ");
    match max_width {
        Some(width) => truncate(&path, width.saturating_sub(PATH_PREFIX_WIDTH)),
        None => path,
    }
}

fn format_result_text_with_width(
    result: &ScoreResult,
    use_colors: bool,
    max_width: Option<usize>,
) -> String {
    let path = format_path(result, max_width);
    let confidence = format!("{:.4}", result.confidence);

    match (&result.value, use_colors) {
        (Some(value), true) => format!(
            "value: {}\nconfidence: {}\npath: {}",
            value.bold().green(),
            confidence.cyan(),
            path.dimmed()
        ),
        (Some(value), false) => format!(
            "value: {}\nconfidence: {}\npath: {}",
            value, confidence, path
        ),
        (None, true) => format!(
            "value: {}\nconfidence: {}\npath: {}",
            "<none>".yellow(),
            confidence.cyan(),
            path.dimmed()
        ),
        (None, false) => format!("value: <none>\nconfidence: {}\npath: {}", confidence, path),
    }
}

/// Format a scoring result for the terminal.
///
/// The path line is cut to the terminal width when stdout is a terminal.
pub fn format_result_text(result: &ScoreResult, use_colors: bool) -> String {
    format_result_text_with_width(result, use_colors, get_terminal_width())
}

#[derive(Serialize)]
struct ResultView<'a> {
    value: Option<&'a str>,
    confidence: f64,
    path: Vec<PathEntry<'a>>,
}

#[derive(Serialize)]
struct PathEntry<'a> {
    id: Option<&'a str>,
    score: Option<&'a str>,
    record_count: Option<f64>,
}

/// Format a scoring result as a single JSON object
pub fn format_result_json(result: &ScoreResult) -> String {
    let view = ResultView {
        value: result.value.as_deref(),
        confidence: result.confidence,
        path: result
            .nodes
            .iter()
            .map(|node| PathEntry {
                id: node.id.as_deref(),
                score: node.score.as_deref(),
                record_count: node.record_count,
            })
            .collect(),
    };
    // Plain structs of strings and numbers always serialize.
    serde_json::to_string(&view).unwrap_or_default()
}

/// Format a model for `list`: name, then indented details
pub fn format_model_summary(key: &str, model: &TreeModel, use_colors: bool) -> String {
    let root = model.root();
    let strategies = model.strategies();
    let fields = model
        .mining_fields
        .iter()
        .map(|f| match f.usage_type.as_deref() {
            Some(usage) if usage != "active" => format!("{} ({})", f.name, usage),
            _ => f.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    let header = if use_colors {
        key.bold().to_string()
    } else {
        key.to_string()
    };

    format!(
        "{}\n  Function: {}\n  Split: {}\n  Missing value strategy: {}\n  No true child strategy: {}\n  Nodes: {} (depth {})\n  Fields: {}",
        header,
        model.function_name.as_deref().unwrap_or("-"),
        model.split_characteristic(),
        strategies.missing_value,
        strategies.no_true_child,
        root.node_count(),
        root.depth(),
        if fields.is_empty() { "-" } else { fields.as_str() },
    )
}
