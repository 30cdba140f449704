pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod panel;
pub mod query;
pub mod render;

// Re-export main types for convenience
pub use api::{AnalysisRequest, AnalysisResponse, Insight};
pub use client::AnalysisClient;
pub use config::{Config, EndpointSource, DEFAULT_ENDPOINT, ENDPOINT_ENV};
pub use controller::{Analyze, OutputPanel, QueryAnalyzer};
pub use error::AnalyzeError;
pub use panel::PanelContent;
pub use query::Query;
