use crate::OperationKind;

/// An error in using the operation registry.
///
/// These are raised before anything is sent to the client. Failures of the
/// operation itself are reported by the client as a
/// [`ClientError`](graphql_ops_client::ClientError).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "GRAPHQL-OPS: You are running a {}, though there is no graphql client configured",
        .kind.description()
    )]
    NoClient { kind: OperationKind },

    #[error("GRAPHQL-OPS: There is no {kind} named \"{name}\"")]
    UnknownOperation { kind: OperationKind, name: String },

    #[error("GRAPHQL-OPS: Invalid variables for {kind} \"{name}\": {source}")]
    Variables {
        kind: OperationKind,
        name: String,
        source: serde_json::Error,
    },
}
