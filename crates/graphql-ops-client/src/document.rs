//! GraphQL operation documents
//!
//! A document is handed to the client exactly as registered. It may be the raw
//! source text, a document already parsed with `apollo-compiler`, or the query
//! text generated by `graphql_client` for a [`GraphQLQuery`](graphql_client::GraphQLQuery).

use std::borrow::Cow;
use std::sync::Arc;

use apollo_compiler::ast::{self, Definition};
use apollo_compiler::parser::Parser;
use graphql_client::QueryBody;
use serde::Deserialize;

use crate::ClientError;

/// A GraphQL query or mutation document
#[derive(Debug, Clone)]
pub enum Document {
    /// Source text, sent as is
    Raw(String),

    /// A parsed document, serialized back to text when sent
    Parsed(Arc<ast::Document>),

    /// Query text and operation name generated for a typed query
    Body {
        query: &'static str,
        operation_name: &'static str,
    },
}

impl Document {
    /// Parse source text into a [`Document::Parsed`]
    pub fn parse(source_text: impl Into<String>) -> Result<Self, ClientError> {
        Parser::new()
            .parse_ast(source_text, "operation.graphql")
            .map(|document| Self::Parsed(Arc::new(document)))
            .map_err(|e| ClientError::Document(Box::new(e)))
    }

    /// The text sent to the server
    pub fn source(&self) -> Cow<'_, str> {
        match self {
            Document::Raw(source) => Cow::Borrowed(source),
            Document::Parsed(document) => Cow::Owned(document.to_string()),
            Document::Body { query, .. } => Cow::Borrowed(*query),
        }
    }

    /// The operation name sent alongside the document, if known.
    ///
    /// Raw text is never inspected, so it has no operation name.
    pub fn operation_name(&self) -> Option<&str> {
        match self {
            Document::Raw(_) => None,
            Document::Parsed(document) => {
                document
                    .definitions
                    .iter()
                    .find_map(|definition| match definition {
                        Definition::OperationDefinition(operation) => {
                            operation.name.as_ref().map(|name| name.as_str())
                        }
                        _ => None,
                    })
            }
            Document::Body { operation_name, .. } => Some(*operation_name),
        }
    }
}

impl From<&str> for Document {
    fn from(source: &str) -> Self {
        Self::Raw(source.to_string())
    }
}

impl From<String> for Document {
    fn from(source: String) -> Self {
        Self::Raw(source)
    }
}

impl From<ast::Document> for Document {
    fn from(document: ast::Document) -> Self {
        Self::Parsed(Arc::new(document))
    }
}

impl<V> From<QueryBody<V>> for Document {
    fn from(body: QueryBody<V>) -> Self {
        Self::Body {
            query: body.query,
            operation_name: body.operation_name,
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::Raw)
    }
}
