//! The submit-and-render flow.
//!
//! A submission is split into [`begin`] (validate, show loading) and
//! [`finish`] (render the outcome) so that front ends with their own event
//! loop can run the request in between on a task of their choosing.
//! [`QueryAnalyzer::submit_and_render`] runs all three steps in place.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::Insight;
use crate::error::AnalyzeError;
use crate::panel::PanelContent;
use crate::query::Query;

/// Something that can turn a query into an insight.
#[async_trait]
pub trait Analyze: Send + Sync {
    async fn analyze(&self, query: &Query) -> Result<Insight, AnalyzeError>;
}

/// The surface a submission writes to.
pub trait OutputPanel {
    fn show(&mut self, content: PanelContent);
}

/// Validate `input` and put the panel into its loading state.
///
/// Returns `None` after showing the validation warning when the trimmed
/// input is empty; no request must be made in that case.
pub fn begin<P: OutputPanel + ?Sized>(input: &str, panel: &mut P) -> Option<Query> {
    match Query::parse(input) {
        Ok(query) => {
            debug!(chars = query.as_str().chars().count(), "query accepted");
            panel.show(PanelContent::Loading);
            Some(query)
        }
        Err(_) => {
            panel.show(PanelContent::ValidationWarning);
            None
        }
    }
}

/// Render the outcome of a request.
pub fn finish<P: OutputPanel + ?Sized>(outcome: Result<Insight, AnalyzeError>, panel: &mut P) {
    if let Err(err) = &outcome {
        warn!(kind = err.kind(), error = %err, "analysis failed");
    }
    panel.show(PanelContent::from_outcome(outcome));
}

/// Owns the analyzer a front end submits through.
///
/// Cheap to clone when the analyzer is, so a front end can move a copy into
/// each request task.
#[derive(Clone)]
pub struct QueryAnalyzer<A> {
    analyzer: A,
}

impl<A: Analyze> QueryAnalyzer<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Run the request step alone, for callers that drive [`begin`] and
    /// [`finish`] themselves.
    pub async fn analyze(&self, query: &Query) -> Result<Insight, AnalyzeError> {
        self.analyzer.analyze(query).await
    }

    /// Show the initial instructions.
    pub fn initialize<P: OutputPanel + ?Sized>(&self, panel: &mut P) {
        panel.show(PanelContent::Placeholder);
    }

    pub async fn submit_and_render<P: OutputPanel + ?Sized>(&self, input: &str, panel: &mut P) {
        let Some(query) = begin(input, panel) else {
            return;
        };
        let outcome = self.analyze(&query).await;
        finish(outcome, panel);
    }
}
