//! Procedural macros for `armature-graphql-client`.
//!
//! These are re-exported from the client crate; depend on that instead of
//! this crate directly.

use proc_macro::TokenStream;

mod typed_client;

/// Generate a client struct with one typed async method per operation.
///
/// Each entry names an export key, the operation type, and an expression
/// producing the document. The method name is the snake case form of the
/// key's call name, so `BookByTitleDocument` becomes `book_by_title`.
///
/// ```ignore
/// use armature_graphql_client::graphql_client;
///
/// graphql_client! {
///     /// Client for the library API.
///     pub struct LibraryClient {
///         BooksDocument: BooksQueryDocument = BOOKS.clone(),
///         BookByTitleDocument: BookByTitleQueryDocument = BOOK_BY_TITLE.clone(),
///         NoopDocument: NoopMutationDocument = NOOP.clone(),
///     }
/// }
///
/// let client = LibraryClient::new("http://localhost:4000/graphql");
/// let response = client
///     .book_by_title(BookByTitleQueryVariables { title: "The Great Gatsby".into() }, None)
///     .await?;
/// ```
///
/// The generated struct derives `Clone` and `Debug`.
#[proc_macro]
pub fn graphql_client(input: TokenStream) -> TokenStream {
    typed_client::graphql_client_impl(input)
}
