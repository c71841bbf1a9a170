//! # Armature GraphQL Client
//!
//! Turns a set of exported GraphQL documents into a client with one
//! callable per operation.
//!
//! ## Features
//!
//! - **Document binding**: Every document in a [`Source`] becomes a callable
//!   named after its export key (`BookByTitleDocument` is called as
//!   `bookByTitle`)
//! - **Typed operations**: [`TypedDocumentNode`] carries result and variable
//!   types through to the call site
//! - **Generated clients**: [`graphql_client!`] generates a struct with one
//!   typed async method per operation
//! - **Pluggable transport**: Swap [`DefaultFetcher`] for any [`Fetcher`]
//! - **Cookies**: A shared [`CookieStore`] is sent and updated on every call
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use armature_graphql_client::{DocumentNode, GraphQLClient, Source};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = Source::new()
//!         .export("BooksDocument", DocumentNode::parse("query Books { books { title } }")?)
//!         .export("BookByTitleDocument", DocumentNode::parse(
//!             "query BookByTitle($title: String!) { findBookByTitle(title: $title) { title author } }",
//!         )?);
//!
//!     let client = GraphQLClient::new(source, "http://localhost:4000/graphql");
//!
//!     let response = client
//!         .call("bookByTitle", json!({ "title": "The Great Gatsby" }), None)
//!         .await?;
//!
//!     println!("{:?}", response.data);
//!     Ok(())
//! }
//! ```
//!
//! ## Generated Clients
//!
//! ```rust,ignore
//! use armature_graphql_client::{graphql_client, TypedDocumentNode};
//!
//! graphql_client! {
//!     pub struct LibraryClient {
//!         BooksDocument: BooksQueryDocument = BOOKS.clone(),
//!         BookByTitleDocument: BookByTitleQueryDocument = BOOK_BY_TITLE.clone(),
//!     }
//! }
//!
//! let client = LibraryClient::new("http://localhost:4000/graphql");
//! let books = client.books(EmptyVariables {}, None).await?;
//! ```

mod client;
mod config;
mod cookie;
mod document;
mod error;
mod fetcher;
mod naming;
mod options;
mod request;
mod response;
mod source;
mod transport;

pub use client::{GraphQLClient, GraphQLClientBuilder};
pub use config::{GraphQLClientConfig, GraphQLClientConfigBuilder};
pub use cookie::CookieStore;
pub use document::{
    DocumentNode, Kind, Operation, OperationInfo, OperationType, ResultOf, TypedDocumentNode,
    VariablesOf,
};
pub use error::{GraphQLError, Result};
pub use fetcher::{Fetcher, FetcherBinding, Query, Queryable};
pub use naming::{DOCUMENT_SUFFIX, call_name};
pub use options::{Credentials, FetchOptions, FetcherOptions};
pub use request::GraphQLRequest;
pub use response::{ErrorLocation, GraphQLResponse, GraphQLResponseError, PathSegment, format_path};
pub use source::{Export, Source};
pub use transport::DefaultFetcher;

pub use armature_graphql_client_macros::graphql_client;

// Re-export common types
pub use serde_json::Value as JsonValue;
