//! Named GraphQL queries and mutations bound lazily to a client
//!
//! Operations are declared up front with [`Operations`], turned into callables
//! with [`graphql`], and executed once a [`Client`] has been supplied through
//! [`Graphql::initialize`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use graphql_ops::{ClientConfig, HttpClient, Operations, Url, graphql};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = graphql(
//!     Operations::new().query("getUser", "query GetUser($id: ID!) { user(id: $id) { name } }"),
//! );
//!
//! let client = HttpClient::new(ClientConfig::new(Url::parse("http://127.0.0.1:4000")?))?;
//! app.initialize(Arc::new(client));
//!
//! let result = app.queries().call("getUser", Some(json!({ "id": 1 })), None)?.await?;
//! println!("{:?}", result.data);
//! # Ok(())
//! # }
//! ```

mod client_cache;
pub mod errors;
mod operations;
mod registry;
mod typed;

pub use client_cache::ClientCache;
pub use errors::Error;
pub use operations::{OperationKind, Operations};
pub use registry::{Dispatch, Graphql, Namespace, OperationHandler, graphql};
pub use typed::{
    NoContext, NoVariables, QueryOperation, TypedDispatch, TypedOperation, Variables, WithContext,
};

pub use graphql_ops_client::*;
