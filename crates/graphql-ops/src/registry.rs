//! The operation registry and dispatcher

use std::fmt::Debug;
use std::sync::Arc;

use futures::future::BoxFuture;
use graphql_ops_client::{
    Client, ClientError, Document, GraphQLQuery, OperationContext, OperationResult,
};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

use crate::typed::{QueryOperation, TypedOperation};
use crate::{ClientCache, Error, OperationKind, Operations};

/// A dispatched operation, resolving to its final result
pub type Dispatch = BoxFuture<'static, Result<OperationResult, ClientError>>;

/// Build the callables for a set of operations
pub fn graphql(operations: Operations) -> Graphql {
    Graphql::new(operations)
}

/// State shared by a registry and all of its handlers
struct Shared {
    client: RwLock<Option<Arc<dyn Client>>>,
    client_cache: ClientCache,
}

impl Shared {
    fn client(&self) -> Option<Arc<dyn Client>> {
        let client = self.client.read().clone()?;
        self.client_cache.record(&client);
        Some(client)
    }
}

/// Named queries and mutations, executed with whichever client is bound when
/// they are called
pub struct Graphql {
    queries: Namespace,
    mutations: Namespace,
    shared: Arc<Shared>,
}

impl Graphql {
    pub fn new(operations: Operations) -> Self {
        Self::with_client_cache(operations, ClientCache::default())
    }

    /// Like [`Graphql::new`], recording bound clients in the given cache
    pub fn with_client_cache(operations: Operations, client_cache: ClientCache) -> Self {
        let shared = Arc::new(Shared {
            client: RwLock::new(None),
            client_cache,
        });

        Self {
            queries: Namespace::new(OperationKind::Query, operations.queries, &shared),
            mutations: Namespace::new(OperationKind::Mutation, operations.mutations, &shared),
            shared,
        }
    }

    /// Bind the client used by every later call, replacing any previous one.
    ///
    /// Calls already dispatched keep the client they started with.
    pub fn initialize(&self, client: Arc<dyn Client>) {
        tracing::debug!("binding graphql client for {}", client.url());
        *self.shared.client.write() = Some(client);
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.client.read().is_some()
    }

    pub fn queries(&self) -> &Namespace {
        &self.queries
    }

    pub fn mutations(&self) -> &Namespace {
        &self.mutations
    }

    pub fn client_cache(&self) -> &ClientCache {
        &self.shared.client_cache
    }
}

impl Debug for Graphql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graphql")
            .field("queries", &self.queries)
            .field("mutations", &self.mutations)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// The operations of one kind, by name
#[derive(Clone)]
pub struct Namespace {
    kind: OperationKind,
    handlers: IndexMap<String, OperationHandler>,
}

impl Namespace {
    fn new(
        kind: OperationKind,
        documents: IndexMap<String, Document>,
        shared: &Arc<Shared>,
    ) -> Self {
        let handlers = documents
            .into_iter()
            .map(|(name, document)| {
                let handler = OperationHandler {
                    kind,
                    name: name.as_str().into(),
                    document: Arc::new(document),
                    shared: Arc::clone(shared),
                };
                (name, handler)
            })
            .collect();

        Self { kind, handlers }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Operation names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OperationHandler)> {
        self.handlers
            .iter()
            .map(|(name, handler)| (name.as_str(), handler))
    }

    pub fn get(&self, name: &str) -> Option<&OperationHandler> {
        self.handlers.get(name)
    }

    fn handler(&self, name: &str) -> Result<&OperationHandler, Error> {
        self.get(name).ok_or_else(|| Error::UnknownOperation {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    /// Call the operation registered under `name`
    pub fn call(
        &self,
        name: &str,
        variables: Option<Value>,
        context: Option<OperationContext>,
    ) -> Result<Dispatch, Error> {
        self.handler(name)?.call(variables, context)
    }

    /// A typed handle to the operation registered under `name`.
    ///
    /// The type parameters choose which arguments `call` takes; see
    /// [`TypedOperation`].
    pub fn typed<A, C, D>(&self, name: &str) -> Result<TypedOperation<A, C, D>, Error> {
        self.handler(name)
            .map(|handler| TypedOperation::new(handler.clone()))
    }

    /// A typed handle shaped after a [`GraphQLQuery`] implementation
    pub fn typed_query<Q>(&self, name: &str) -> Result<QueryOperation<Q>, Error>
    where
        Q: GraphQLQuery,
    {
        self.typed(name)
    }
}

impl Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("kind", &self.kind)
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// The callable for one named operation
#[derive(Clone)]
pub struct OperationHandler {
    kind: OperationKind,
    name: Arc<str>,
    document: Arc<Document>,
    shared: Arc<Shared>,
}

impl OperationHandler {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Dispatch the operation to the bound client.
    ///
    /// Fails immediately with [`Error::NoClient`] when no client is bound.
    /// Otherwise the client is called exactly once and the returned future
    /// resolves to the client's final result.
    pub fn call(
        &self,
        variables: Option<Value>,
        context: Option<OperationContext>,
    ) -> Result<Dispatch, Error> {
        let client = self
            .shared
            .client()
            .ok_or(Error::NoClient { kind: self.kind })?;

        tracing::debug!(
            "dispatching {} {} to {}",
            self.kind,
            self.name,
            client.url()
        );
        let source = match self.kind {
            OperationKind::Query => client.query(&self.document, variables, context),
            OperationKind::Mutation => client.mutation(&self.document, variables, context),
        };

        Ok(Box::pin(source.into_final()))
    }
}

impl Debug for OperationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationHandler")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("document", &self.document)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_ops_client::{OperationResultSource, Response};
    use serde_json::json;
    use tracing_test::traced_test;

    struct EchoClient;

    impl Client for EchoClient {
        fn url(&self) -> &str {
            "memory://echo"
        }

        fn query(
            &self,
            _document: &Document,
            variables: Option<Value>,
            _context: Option<OperationContext>,
        ) -> OperationResultSource {
            OperationResultSource::ready(Ok(Response {
                data: variables,
                errors: None,
                extensions: None,
            }))
        }

        fn mutation(
            &self,
            document: &Document,
            variables: Option<Value>,
            context: Option<OperationContext>,
        ) -> OperationResultSource {
            self.query(document, variables, context)
        }
    }

    fn operations() -> Operations {
        Operations::new()
            .query("getUser", "query GetUser($id: ID!) { user(id: $id) { id } }")
            .query("listUsers", "{ users { id } }")
            .mutation("addUser", "mutation AddUser($name: String!) { addUser(name: $name) { id } }")
    }

    #[test]
    fn it_builds_one_handler_per_operation() {
        let registry = graphql(operations());

        assert_eq!(registry.queries().len(), 2);
        assert_eq!(
            registry.queries().names().collect::<Vec<_>>(),
            ["getUser", "listUsers"]
        );
        assert_eq!(registry.mutations().len(), 1);
        assert!(registry.mutations().contains("addUser"));
        assert!(!registry.mutations().contains("getUser"));
        assert_eq!(
            registry.queries().get("getUser").map(OperationHandler::kind),
            Some(OperationKind::Query)
        );
    }

    #[test]
    fn empty_operations_build_empty_namespaces() {
        let registry = graphql(Operations::default());

        assert!(registry.queries().is_empty());
        assert!(registry.mutations().is_empty());
        assert!(!registry.is_initialized());
    }

    #[test]
    fn unknown_operations_fail_immediately() {
        let registry = graphql(operations());
        registry.initialize(Arc::new(EchoClient));

        let error = registry
            .queries()
            .call("addUser", None, None)
            .err()
            .unwrap();

        assert!(matches!(
            error,
            Error::UnknownOperation { kind: OperationKind::Query, ref name } if name == "addUser"
        ));
    }

    #[tokio::test]
    #[traced_test]
    async fn it_logs_dispatches() {
        let registry = graphql(operations());
        registry.initialize(Arc::new(EchoClient));

        let result = registry
            .mutations()
            .call("addUser", Some(json!({ "name": "Ada" })), None)
            .unwrap()
            .await
            .unwrap();

        assert_eq!(result.data, Some(json!({ "name": "Ada" })));
        assert!(logs_contain("binding graphql client for memory://echo"));
        assert!(logs_contain("dispatching mutation addUser to memory://echo"));
    }
}
