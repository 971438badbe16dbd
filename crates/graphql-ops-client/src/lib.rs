//! GraphQL client primitives
//!
//! This crate defines what it means to be a GraphQL client for the purpose of
//! `graphql-ops`: something with a URL that can start a query or a mutation and
//! hand back an [`OperationResultSource`]. A reqwest-backed implementation is
//! provided as [`HttpClient`].

mod client;
mod context;
mod document;
mod error;
mod http;
mod result;

pub use client::Client;
pub use context::OperationContext;
pub use document::Document;
pub use error::ClientError;
pub use http::{ClientConfig, HttpClient};
pub use result::{OperationResult, OperationResultSource, decode};

pub use graphql_client;
pub use graphql_client::{
    Error as GraphQLError, GraphQLQuery, Location, PathFragment, QueryBody, Response,
};
pub use reqwest::header;
pub use secrecy::SecretString;
pub use url::Url;
