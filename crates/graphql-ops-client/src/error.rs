use apollo_compiler::{ast, validation::WithErrors};
use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;

/// An error while executing a GraphQL operation
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to send GraphQL request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GraphQL endpoint responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not parse GraphQL document: {0}")]
    Document(Box<WithErrors<ast::Document>>),

    #[error("invalid header value: {0}")]
    HeaderValue(#[from] InvalidHeaderValue),

    #[error("Operation completed without a result")]
    NoResult,

    #[error("{0}")]
    Other(String),
}
