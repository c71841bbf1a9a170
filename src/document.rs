//! Parsed GraphQL operation documents.
//!
//! A [`DocumentNode`] is the unit the client factory binds to a transport.
//! [`TypedDocumentNode`] adds the operation's result and variables types so
//! that calls made through it stay typed end to end.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use graphql_parser::query::{Definition, Document, OperationDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::source::Export;
use crate::{GraphQLError, Result};

/// Discriminator carried by parsed documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A parsed executable document.
    Document,
}

/// Type of a bindable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// `query` (including anonymous selection sets).
    Query,
    /// `mutation`
    Mutation,
}

impl OperationType {
    /// Keyword used for this operation type in GraphQL source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one operation definition inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationInfo<'a> {
    /// Query or mutation.
    pub operation_type: OperationType,
    /// Declared operation name, if any.
    pub name: Option<&'a str>,
}

/// A parsed GraphQL document.
///
/// Cloning is cheap; the syntax tree is shared.
#[derive(Clone, PartialEq)]
pub struct DocumentNode {
    ast: Arc<Document<'static, String>>,
}

impl DocumentNode {
    /// Parse a document from GraphQL source text.
    pub fn parse(source: &str) -> Result<Self> {
        let ast = graphql_parser::parse_query::<String>(source)
            .map_err(|e| GraphQLError::Document(e.to_string()))?
            .into_static();

        Ok(Self::from_ast(ast))
    }

    /// Wrap an already parsed syntax tree.
    pub fn from_ast(ast: Document<'static, String>) -> Self {
        Self { ast: Arc::new(ast) }
    }

    /// Discriminator identifying this value as a parsed document.
    pub fn kind(&self) -> Kind {
        Kind::Document
    }

    /// The underlying syntax tree.
    pub fn ast(&self) -> &Document<'static, String> {
        &self.ast
    }

    /// Query and mutation definitions, in document order.
    ///
    /// Fragments and subscriptions are skipped.
    pub fn operations(&self) -> impl Iterator<Item = OperationInfo<'_>> {
        self.ast.definitions.iter().filter_map(|definition| match definition {
            Definition::Operation(OperationDefinition::SelectionSet(_)) => Some(OperationInfo {
                operation_type: OperationType::Query,
                name: None,
            }),
            Definition::Operation(OperationDefinition::Query(query)) => Some(OperationInfo {
                operation_type: OperationType::Query,
                name: query.name.as_deref(),
            }),
            Definition::Operation(OperationDefinition::Mutation(mutation)) => {
                Some(OperationInfo {
                    operation_type: OperationType::Mutation,
                    name: mutation.name.as_deref(),
                })
            }
            Definition::Operation(OperationDefinition::Subscription(_))
            | Definition::Fragment(_) => None,
        })
    }

    /// The first bindable operation, if the document has one.
    pub fn first_operation(&self) -> Option<OperationInfo<'_>> {
        self.operations().next()
    }

    /// Print the document in canonical GraphQL form.
    pub fn print(&self) -> String {
        self.ast.to_string()
    }
}

impl fmt::Debug for DocumentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentNode")
            .field("kind", &self.kind())
            .field("operations", &self.operations().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for DocumentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ast)
    }
}

/// An operation with statically known result and variables types.
///
/// Implemented by [`TypedDocumentNode`]; used by
/// [`GraphQLClient::call_typed`](crate::GraphQLClient::call_typed) and the
/// methods generated by [`graphql_client!`](crate::graphql_client).
pub trait Operation: Export {
    /// Shape of the `data` field of a successful response.
    type Result: DeserializeOwned + Send + 'static;
    /// Shape of the variables object.
    type Variables: Serialize + Send + 'static;

    /// The untyped document.
    fn document(&self) -> &DocumentNode;
}

/// Result type of an operation.
pub type ResultOf<O> = <O as Operation>::Result;

/// Variables type of an operation.
pub type VariablesOf<O> = <O as Operation>::Variables;

/// A document tagged with its result (`R`) and variables (`V`) types.
pub struct TypedDocumentNode<R, V> {
    document: DocumentNode,
    _types: PhantomData<fn(V) -> R>,
}

impl<R, V> TypedDocumentNode<R, V> {
    /// Parse a typed document from GraphQL source text.
    ///
    /// The types are not checked against the document; keeping them in sync
    /// is the job of whoever writes or generates the declaration.
    pub fn parse(source: &str) -> Result<Self> {
        DocumentNode::parse(source).map(Self::new)
    }

    /// Tag an untyped document.
    pub fn new(document: DocumentNode) -> Self {
        Self {
            document,
            _types: PhantomData,
        }
    }

    /// Drop the type information.
    pub fn into_untyped(self) -> DocumentNode {
        self.document
    }
}

impl<R, V> Clone for TypedDocumentNode<R, V> {
    fn clone(&self) -> Self {
        Self::new(self.document.clone())
    }
}

impl<R, V> fmt::Debug for TypedDocumentNode<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedDocumentNode")
            .field("document", &self.document)
            .field("result", &std::any::type_name::<R>())
            .field("variables", &std::any::type_name::<V>())
            .finish()
    }
}

impl<R, V> Deref for TypedDocumentNode<R, V> {
    type Target = DocumentNode;

    fn deref(&self) -> &DocumentNode {
        &self.document
    }
}

impl<R, V> Operation for TypedDocumentNode<R, V>
where
    R: DeserializeOwned + Send + 'static,
    V: Serialize + Send + 'static,
{
    type Result = R;
    type Variables = V;

    fn document(&self) -> &DocumentNode {
        &self.document
    }
}
