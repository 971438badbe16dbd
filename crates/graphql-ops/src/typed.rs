//! Typed operation handles
//!
//! A [`TypedOperation`] wraps an [`OperationHandler`] and fixes, at compile
//! time, which arguments its `call` method takes:
//!
//! | variables       | context       | signature                     |
//! |-----------------|---------------|-------------------------------|
//! | `NoVariables`   | `NoContext`   | `call()`                      |
//! | `Variables<V>`  | `NoContext`   | `call(variables)`             |
//! | `NoVariables`   | `WithContext` | `call(context)`               |
//! | `Variables<V>`  | `WithContext` | `call(variables, context)`    |

use std::fmt::Debug;
use std::marker::PhantomData;

use futures::future::BoxFuture;
use graphql_ops_client::{ClientError, GraphQLQuery, OperationContext, OperationResult, decode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, OperationHandler};

/// The operation takes no variables
pub struct NoVariables;

/// The operation takes variables of type `V`
pub struct Variables<V>(PhantomData<fn(V)>);

/// The operation is called without a context
pub struct NoContext;

/// The operation is called with an [`OperationContext`]
pub struct WithContext;

/// A dispatched typed operation, resolving to its final result
pub type TypedDispatch<D> = BoxFuture<'static, Result<OperationResult<D>, ClientError>>;

/// A typed handle for a [`GraphQLQuery`], called with its variables
pub type QueryOperation<Q> = TypedOperation<
    Variables<<Q as GraphQLQuery>::Variables>,
    NoContext,
    <Q as GraphQLQuery>::ResponseData,
>;

/// An operation handle whose arguments and response data are known statically
pub struct TypedOperation<A, C, D> {
    handler: OperationHandler,
    shape: PhantomData<fn() -> (A, C, D)>,
}

impl<A, C, D> TypedOperation<A, C, D> {
    pub(crate) fn new(handler: OperationHandler) -> Self {
        Self {
            handler,
            shape: PhantomData,
        }
    }

    pub fn handler(&self) -> &OperationHandler {
        &self.handler
    }

    fn reshape<A2, C2>(self) -> TypedOperation<A2, C2, D> {
        TypedOperation::new(self.handler)
    }

    fn variables<V>(&self, variables: V) -> Result<Value, Error>
    where
        V: Serialize,
    {
        serde_json::to_value(variables).map_err(|source| Error::Variables {
            kind: self.handler.kind(),
            name: self.handler.name().to_string(),
            source,
        })
    }

    fn dispatch(
        &self,
        variables: Option<Value>,
        context: Option<OperationContext>,
    ) -> Result<TypedDispatch<D>, Error>
    where
        D: DeserializeOwned + Send + 'static,
    {
        let dispatch = self.handler.call(variables, context)?;
        Ok(Box::pin(async move { decode(dispatch.await?) }))
    }
}

impl<A, D> TypedOperation<A, NoContext, D> {
    /// Take an [`OperationContext`] on every call
    pub fn with_context(self) -> TypedOperation<A, WithContext, D> {
        self.reshape()
    }
}

impl<A, D> TypedOperation<A, WithContext, D> {
    pub fn without_context(self) -> TypedOperation<A, NoContext, D> {
        self.reshape()
    }
}

impl<D> TypedOperation<NoVariables, NoContext, D>
where
    D: DeserializeOwned + Send + 'static,
{
    pub fn call(&self) -> Result<TypedDispatch<D>, Error> {
        self.dispatch(None, None)
    }
}

impl<V, D> TypedOperation<Variables<V>, NoContext, D>
where
    V: Serialize,
    D: DeserializeOwned + Send + 'static,
{
    pub fn call(&self, variables: V) -> Result<TypedDispatch<D>, Error> {
        let variables = self.variables(variables)?;
        self.dispatch(Some(variables), None)
    }
}

impl<D> TypedOperation<NoVariables, WithContext, D>
where
    D: DeserializeOwned + Send + 'static,
{
    pub fn call(&self, context: OperationContext) -> Result<TypedDispatch<D>, Error> {
        self.dispatch(None, Some(context))
    }
}

impl<V, D> TypedOperation<Variables<V>, WithContext, D>
where
    V: Serialize,
    D: DeserializeOwned + Send + 'static,
{
    pub fn call(&self, variables: V, context: OperationContext) -> Result<TypedDispatch<D>, Error> {
        let variables = self.variables(variables)?;
        self.dispatch(Some(variables), Some(context))
    }
}

impl<A, C, D> Clone for TypedOperation<A, C, D> {
    fn clone(&self) -> Self {
        Self::new(self.handler.clone())
    }
}

impl<A, C, D> Debug for TypedOperation<A, C, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedOperation")
            .field("handler", &self.handler)
            .finish()
    }
}
