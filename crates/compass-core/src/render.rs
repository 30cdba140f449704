//! Insight report formatting.
//!
//! Reports use a two-rule markup: `**text**` is bold and `\n` is a line
//! break. The HTML renderer applies the rules as two literal substitution
//! passes, bold first. [`insight_lines`] exposes the same result as styled
//! segments for front ends that don't speak HTML.

use std::sync::OnceLock;

use regex::Regex;

/// Non-greedy `**...**` that never crosses a line terminator.
fn bold_pattern() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| {
        Regex::new(r"\*\*([^\n\r\x{2028}\x{2029}]*?)\*\*").expect("bold pattern is valid")
    })
}

/// Apply both substitutions and return the markup.
pub fn render_insight_markup(report: &str) -> String {
    let bolded = bold_pattern().replace_all(report, "<strong>${1}</strong>");
    bolded.replace('\n', "<br>")
}

/// A run of text with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub bold: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: true,
        }
    }
}

/// Split a report into lines of styled segments.
///
/// Equivalent to [`render_insight_markup`]: the bold pattern can't span a
/// `\n`, so matching line by line finds the same spans. Empty bold spans
/// produce no segment.
pub fn insight_lines(report: &str) -> Vec<Vec<Segment>> {
    report
        .split('\n')
        .map(|line| {
            let mut segments = Vec::new();
            let mut last = 0;
            for caps in bold_pattern().captures_iter(line) {
                let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                if whole.start() > last {
                    segments.push(Segment::plain(&line[last..whole.start()]));
                }
                if !inner.as_str().is_empty() {
                    segments.push(Segment::bold(inner.as_str()));
                }
                last = whole.end();
            }
            if last < line.len() {
                segments.push(Segment::plain(&line[last..]));
            }
            segments
        })
        .collect()
}

/// Report text with the bold markers removed.
pub fn insight_plain_text(report: &str) -> String {
    insight_lines(report)
        .iter()
        .map(|line| line.iter().map(|s| s.text.as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
