//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use fundflow_core::markdown::{Block, ListMarker, RichText, Span};
use fundflow_core::view::{BusyView, PageView};
use unicode_width::UnicodeWidthStr;

/// Widest horizontal rule drawn, even on wide terminals.
const MAX_RULE_WIDTH: usize = 60;

/// Print the page header.
pub fn print_header(view: &PageView) {
    println!();
    println!("  {}", view.title.cyan().bold());
    println!("  {}", view.subtitle.dimmed());
    println!();
}

/// Print the busy indicator, one line per backend stage.
pub fn print_busy(busy: &BusyView) {
    for stage in &busy.stages {
        println!("  {} {} {}", stage.icon(), stage.agent().bold(), stage.activity());
    }
    println!();
}

/// Print the outcome sections of the page.
///
/// Each section is printed on its own condition; normally at most one of
/// them is present.
pub fn print_outcome(view: &PageView) {
    if let Some(error) = &view.error {
        println!("{} {}", "✗".red().bold(), error.message.red());
    }

    if let Some(result) = &view.result {
        for line in format_rich_text(&result.rich_text, term_width()) {
            println!("{}", line);
        }
    }
}

/// Lay out rich text as terminal lines.
pub fn format_rich_text(text: &RichText, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut previous: Option<&Block> = None;

    for block in &text.blocks {
        let in_same_list = matches!(
            (previous, block),
            (Some(Block::ListItem { .. }), Block::ListItem { .. })
        );
        if previous.is_some() && !in_same_list {
            lines.push(String::new());
        }

        match block {
            Block::Heading { level, .. } => {
                let title = block.text();
                let styled = match level {
                    1 => title.cyan().bold(),
                    _ => title.bold(),
                };
                lines.push(styled.to_string());
                let underline = match level {
                    1 => Some("═"),
                    2 => Some("─"),
                    _ => None,
                };
                if let Some(ch) = underline {
                    let len = UnicodeWidthStr::width(title.as_str()).min(width);
                    lines.push(ch.repeat(len).dimmed().to_string());
                }
            }
            Block::Paragraph(spans) => {
                for line in styled_spans(spans).split('\n') {
                    lines.push(line.to_string());
                }
            }
            Block::Quote { depth, spans } => {
                let bar = "│ ".repeat(*depth).dimmed();
                for line in styled_spans(spans).split('\n') {
                    lines.push(format!("{}{}", bar, line.italic()));
                }
            }
            Block::ListItem {
                depth,
                marker,
                spans,
            } => {
                let bullet = match marker {
                    ListMarker::Bullet => "•".to_string(),
                    ListMarker::Ordered(n) => format!("{}.", n),
                };
                lines.push(format!("{}{} {}", "  ".repeat(*depth), bullet, styled_spans(spans)));
            }
            Block::CodeBlock { code, .. } => {
                for line in code.trim_end_matches('\n').lines() {
                    lines.push(format!("    {}", line).dimmed().to_string());
                }
            }
            Block::Rule => {
                lines.push("─".repeat(width.min(MAX_RULE_WIDTH)).dimmed().to_string());
            }
        }

        previous = Some(block);
    }

    lines
}

fn styled_spans(spans: &[Span]) -> String {
    spans.iter().map(|span| style_span(span).to_string()).collect()
}

fn style_span(span: &Span) -> ColoredString {
    let style = &span.style;
    let mut out: ColoredString = span.text.as_str().normal();
    if style.code {
        out = out.yellow();
    }
    if style.strong {
        out = out.bold();
    }
    if style.emphasis {
        out = out.italic();
    }
    if style.strikethrough {
        out = out.strikethrough();
    }
    if style.link.is_some() {
        out = out.underline();
    }
    out
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}
