use std::fmt::Display;

use graphql_ops_client::Document;
use indexmap::IndexMap;
use serde::Deserialize;

/// Whether an operation is a query or a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub(crate) fn description(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation query",
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
        }
    }
}

/// Named operation documents, grouped by kind.
///
/// Names are unique within a group; a query and a mutation may share one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Operations {
    /// Query documents by name
    pub queries: IndexMap<String, Document>,

    /// Mutation documents by name
    pub mutations: IndexMap<String, Document>,
}

impl Operations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a query, replacing any query with the same name
    pub fn query(mut self, name: impl Into<String>, document: impl Into<Document>) -> Self {
        self.queries.insert(name.into(), document.into());
        self
    }

    /// Register a mutation, replacing any mutation with the same name
    pub fn mutation(mut self, name: impl Into<String>, document: impl Into<Document>) -> Self {
        self.mutations.insert(name.into(), document.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_a_minimal_config() {
        let operations = serde_json::from_str::<Operations>("{}").unwrap();

        assert!(operations.queries.is_empty());
        assert!(operations.mutations.is_empty());
    }

    #[test]
    fn it_keeps_declaration_order() {
        let operations = serde_json::from_str::<Operations>(
            r#"{
                "queries": {
                    "listUsers": "{ users { id } }",
                    "getUser": "query GetUser($id: ID!) { user(id: $id) { id } }"
                },
                "mutations": {
                    "getUser": "mutation { touch }"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            operations.queries.keys().collect::<Vec<_>>(),
            ["listUsers", "getUser"]
        );
        assert_eq!(operations.mutations.len(), 1);
    }

    #[test]
    fn later_registrations_replace_earlier_ones() {
        let operations = Operations::new()
            .query("getUser", "{ a }")
            .query("getUser", "{ b }");

        assert_eq!(operations.queries.len(), 1);
        assert_eq!(operations.queries["getUser"].source(), "{ b }");
    }
}
