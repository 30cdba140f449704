//! Wire types for the `/analyze` endpoint.

use serde::Serialize;
use serde_json::Value;

use crate::error::AnalyzeError;
use crate::query::Query;

/// Status value the backend sends on the happy path.
pub const SUCCESS_STATUS: &str = "success";

/// Detail shown when a non-success payload carries no message.
pub const NO_INSIGHT_MESSAGE: &str = "No insight was generated";

/// Request body: exactly `{"query": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub query: String,
}

impl From<&Query> for AnalysisRequest {
    fn from(query: &Query) -> Self {
        Self {
            query: query.as_str().to_string(),
        }
    }
}

/// Decoded response payload.
///
/// Fields are read from an arbitrary JSON value rather than derived, because
/// the backend is loosely typed: a field counts as present only when it is
/// "truthy" (not missing, `null`, `false`, `0` or `""`), and non-string
/// values are kept as their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResponse {
    pub status: Option<String>,
    pub conceptual_insight_report: Option<String>,
    pub message: Option<String>,
}

impl AnalysisResponse {
    pub fn from_json(payload: &Value) -> Self {
        Self {
            status: payload
                .get("status")
                .and_then(Value::as_str)
                .map(str::to_string),
            conceptual_insight_report: truthy_text(payload.get("conceptual_insight_report")),
            message: truthy_text(payload.get("message")),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }

    /// Turn the payload into an insight, or the application error it describes.
    pub fn into_insight(self) -> Result<Insight, AnalyzeError> {
        let success = self.is_success();
        match self.conceptual_insight_report {
            Some(report) if success => Ok(Insight::new(report)),
            _ => Err(AnalyzeError::Application(
                self.message
                    .unwrap_or_else(|| NO_INSIGHT_MESSAGE.to_string()),
            )),
        }
    }
}

fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// The report text returned by a successful analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    report: String,
}

impl Insight {
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
        }
    }

    pub fn report(&self) -> &str {
        &self.report
    }
}
