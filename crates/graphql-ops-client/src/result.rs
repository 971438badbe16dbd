use std::fmt::Debug;

use futures::stream::BoxStream;
use futures::{Stream, StreamExt, future, stream};
use graphql_client::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ClientError;

/// The result of a GraphQL operation
pub type OperationResult<Data = Value> = Response<Data>;

/// The results produced by one started operation.
///
/// A client may produce several results for a single operation, for example a
/// cached result followed by a network one. Only the last one is final.
pub struct OperationResultSource {
    results: BoxStream<'static, Result<OperationResult, ClientError>>,
}

impl OperationResultSource {
    pub fn from_stream<S>(results: S) -> Self
    where
        S: Stream<Item = Result<OperationResult, ClientError>> + Send + 'static,
    {
        Self {
            results: results.boxed(),
        }
    }

    /// A source producing exactly one result
    pub fn ready(result: Result<OperationResult, ClientError>) -> Self {
        Self::from_stream(stream::once(future::ready(result)))
    }

    pub fn into_stream(self) -> BoxStream<'static, Result<OperationResult, ClientError>> {
        self.results
    }

    /// Wait for the final result.
    ///
    /// The first error ends the operation and is returned as is. A source that
    /// finishes without producing anything fails with [`ClientError::NoResult`].
    pub async fn into_final(self) -> Result<OperationResult, ClientError> {
        let mut results = self.results;
        let mut last = None;
        while let Some(result) = results.next().await {
            last = Some(result?);
        }
        last.ok_or(ClientError::NoResult)
    }
}

impl Debug for OperationResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OperationResultSource(<stream>)")
    }
}

/// Deserialize the data of a result into a typed response
pub fn decode<Data>(result: OperationResult) -> Result<OperationResult<Data>, ClientError>
where
    Data: DeserializeOwned,
{
    Ok(Response {
        data: result.data.map(serde_json::from_value).transpose()?,
        errors: result.errors,
        extensions: result.extensions,
    })
}
