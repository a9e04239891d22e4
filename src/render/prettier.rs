//! The PRETTIER layout: a framed fixed-width table with a centered header,
//! section dividers, greedy word wrapping and value truncation.
//!
//! Every content line between the top and bottom border has the same visible
//! width. Widths are computed in characters, not bytes, so multi-byte output
//! (the `μ` in time strings) cannot skew the frame.

use crate::record::ProfileRecord;
use crate::render::time::format_nanos;
use crate::render::value::{pretty, simple_type_name};

const BASE_WIDTH: usize = 80;
const WIDTH_LIMIT: usize = 120;
/// Continuation prefix for wrapped parameter/result/message lines.
const WRAP_PREFIX: &str = "|   ";

pub(crate) fn render_prettier(record: &ProfileRecord) -> String {
    let marker = &record.marker.marker;
    let method_name = &record.method_qualified;
    let caller_info = record.caller.to_string();

    // Grow the frame to fit the widest field, then clamp.
    let mut max_width = BASE_WIDTH;
    max_width = max_width.max(width(method_name) + 10);
    max_width = max_width.max(width(&caller_info) + 15);
    if marker.log_params {
        for argument in &record.arguments {
            let param_line = format!(
                "{} = {}",
                simple_type_name(argument.type_name),
                pretty(&argument.value)
            );
            max_width = max_width.max(width(&param_line) + 2);
        }
    }
    if marker.log_result {
        max_width = max_width.max(width(&pretty_result(record)) + 15);
    }
    max_width = max_width.min(WIDTH_LIMIT);

    let mut out = String::from("\n");
    push_divider(&mut out, max_width);
    out.push_str(&format!(
        "|{}|\n",
        center_text(" PROFILING INFO ", max_width)
    ));
    push_divider(&mut out, max_width);

    push_formatted_line(&mut out, "Method", method_name, max_width);
    push_formatted_line(&mut out, "Called from", &caller_info, max_width);

    if marker.log_params && !record.arguments.is_empty() {
        push_divider(&mut out, max_width);
        out.push_str(&format!("|{}|\n", pad_right(" Parameters:", max_width)));
        for (index, argument) in record.arguments.iter().enumerate() {
            let name = argument
                .name
                .map_or_else(|| format!("arg{index}"), str::to_string);
            let param_line = format!(
                "  [{index}] {} {name} = {}",
                simple_type_name(argument.type_name),
                pretty(&argument.value)
            );
            push_multiline_text(&mut out, &param_line, max_width, WRAP_PREFIX);
        }
    }

    if marker.log_time {
        push_divider(&mut out, max_width);
        push_formatted_line(
            &mut out,
            "Execution Time",
            &format_nanos(record.elapsed_nanos),
            max_width,
        );
    }

    push_divider(&mut out, max_width);
    if let Some(thrown) = &record.thrown {
        push_formatted_line(&mut out, "Status", " EXCEPTION", max_width);
        push_formatted_line(
            &mut out,
            "Exception LogType",
            &simple_type_name(thrown.type_name),
            max_width,
        );
        if let Some(message) = &thrown.message {
            push_multiline_text(&mut out, &format!("Message: {message}"), max_width, WRAP_PREFIX);
        }
    } else if marker.log_result {
        push_formatted_line(&mut out, "Status", " SUCCESS", max_width);
        let result = pretty_result(record);
        if width(&result) > max_width.saturating_sub(20) {
            push_multiline_text(&mut out, &format!("Result: {result}"), max_width, WRAP_PREFIX);
        } else {
            push_formatted_line(&mut out, "Result", &result, max_width);
        }
    }

    out.push_str(&format!("+{}+", "-".repeat(max_width)));
    out
}

fn pretty_result(record: &ProfileRecord) -> String {
    record
        .result
        .as_ref()
        .map_or_else(|| "null".to_string(), pretty)
}

/// Visible width in characters.
fn width(text: &str) -> usize {
    text.chars().count()
}

fn push_divider(out: &mut String, max_width: usize) {
    out.push_str(&format!("+{}+\n", "-".repeat(max_width)));
}

/// `"| <label>: <value><padding>|"`, truncating the value to fit the frame.
fn push_formatted_line(out: &mut String, label: &str, value: &str, max_width: usize) {
    let label_part = format!(" {label}: ");
    let value_budget = max_width.saturating_sub(width(&label_part) + 1);
    let value = if width(value) > value_budget {
        let head: String = value.chars().take(value_budget.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        value.to_string()
    };
    let padding = max_width.saturating_sub(width(&label_part) + width(&value));
    out.push_str(&format!("|{label_part}{value}{}|\n", " ".repeat(padding)));
}

/// Greedy word wrap: packs space-separated words so each emitted line fits the
/// frame. A single word longer than the budget is emitted on its own line
/// unchanged and overflows the box.
fn push_multiline_text(out: &mut String, text: &str, max_width: usize, prefix: &str) {
    let content_width = max_width.saturating_sub(width(prefix) + 1);

    if width(text) <= content_width {
        push_wrapped_line(out, prefix, text, max_width);
        return;
    }

    let mut line = String::new();
    for word in text.split(' ') {
        if width(&line) + width(word) + 1 <= content_width {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        } else {
            push_wrapped_line(out, prefix, &line, max_width);
            line = word.to_string();
        }
    }
    if !line.is_empty() {
        push_wrapped_line(out, prefix, &line, max_width);
    }
}

fn push_wrapped_line(out: &mut String, prefix: &str, line: &str, max_width: usize) {
    let padding = max_width.saturating_sub(width(prefix) + width(line));
    out.push_str(&format!("{prefix}{line}{} |\n", " ".repeat(padding)));
}

/// Centers `text`, biasing extra padding to the right.
fn center_text(text: &str, max_width: usize) -> String {
    let padding = max_width.saturating_sub(width(text));
    let left = padding / 2;
    let right = padding - left;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

fn pad_right(text: &str, max_width: usize) -> String {
    format!("{text}{}", " ".repeat(max_width.saturating_sub(width(text))))
}
