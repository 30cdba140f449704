//! UI-agnostic state of the results panel.
//!
//! Front ends (the terminal UI, the one-shot console mode) render a
//! [`PanelContent`] however they like. [`PanelContent::to_markup`] gives the
//! HTML the panel holds in a browser.

use crate::api::Insight;
use crate::error::AnalyzeError;
use crate::render::{insight_plain_text, render_insight_markup};

pub const PLACEHOLDER_TEXT: &str = "Enter your query and click the button to analyze";
pub const VALIDATION_TEXT: &str = "Please enter a query to analyze.";
pub const LOADING_TEXT: &str = "Analyzing your query...";
pub const LOADING_GLYPH: &str = "⏳";
pub const FAILURE_HEADLINE: &str = "Failed to get analysis. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    /// Initial instructions, before any submission.
    Placeholder,
    /// Inline warning for an empty query.
    ValidationWarning,
    /// A request is in flight.
    Loading,
    Insight(Insight),
    /// Any non-validation error; `detail` is the error's message.
    Failure { detail: String },
}

impl PanelContent {
    /// Panel content for the end of a submission.
    pub fn from_outcome(outcome: Result<Insight, AnalyzeError>) -> Self {
        match outcome {
            Ok(insight) => PanelContent::Insight(insight),
            Err(AnalyzeError::Validation) => PanelContent::ValidationWarning,
            Err(err) => PanelContent::Failure {
                detail: err.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            PanelContent::ValidationWarning | PanelContent::Failure { .. }
        )
    }

    pub fn to_markup(&self) -> String {
        match self {
            PanelContent::Placeholder => format!("<p>{}</p>", PLACEHOLDER_TEXT),
            PanelContent::ValidationWarning => {
                format!("<p style=\"color: red;\">{}</p>", VALIDATION_TEXT)
            }
            PanelContent::Loading => format!(
                "<p>{} <span class=\"loading\">{}</span></p>",
                LOADING_TEXT, LOADING_GLYPH
            ),
            PanelContent::Insight(insight) => format!(
                "<div class=\"result-section\"><div class=\"insight-content\">{}</div></div>",
                render_insight_markup(insight.report())
            ),
            PanelContent::Failure { detail } => format!(
                "<div style=\"color: red;\"><p>{}</p><p><small>{}</small></p></div>",
                FAILURE_HEADLINE, detail
            ),
        }
    }

    /// Text-only rendering for consoles.
    pub fn to_plain_text(&self) -> String {
        match self {
            PanelContent::Placeholder => PLACEHOLDER_TEXT.to_string(),
            PanelContent::ValidationWarning => VALIDATION_TEXT.to_string(),
            PanelContent::Loading => format!("{} {}", LOADING_TEXT, LOADING_GLYPH),
            PanelContent::Insight(insight) => insight_plain_text(insight.report()),
            PanelContent::Failure { detail } => format!("{}\n{}", FAILURE_HEADLINE, detail),
        }
    }
}
