use serde_json::Value;

use crate::{Document, OperationContext, OperationResultSource};

/// A GraphQL client able to start queries and mutations.
///
/// Both methods start the operation and return immediately; the returned
/// source yields the result(s) once they arrive. Implementations own their
/// transport, caching and retry behaviour.
pub trait Client: Send + Sync {
    /// The address this client sends operations to
    fn url(&self) -> &str;

    /// Start a query
    fn query(
        &self,
        document: &Document,
        variables: Option<Value>,
        context: Option<OperationContext>,
    ) -> OperationResultSource;

    /// Start a mutation
    fn mutation(
        &self,
        document: &Document,
        variables: Option<Value>,
        context: Option<OperationContext>,
    ) -> OperationResultSource;
}
