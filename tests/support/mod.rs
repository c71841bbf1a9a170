//! Shared fixtures: an in-memory library API and typed documents for it.

#![allow(dead_code)]

use armature_graphql_client::{Source, TypedDocumentNode};
use async_graphql::{Context, EmptySubscription, Object, Schema, SimpleObject};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// =============================================================================
// Schema
// =============================================================================

pub const SESSION_COOKIE: &str = "session=1; Path=/; HttpOnly";

#[derive(SimpleObject, Clone)]
#[graphql(name = "Book")]
pub struct BookObject {
    title: String,
    author: String,
}

fn library() -> Vec<BookObject> {
    vec![
        BookObject {
            title: "The Great Gatsby".to_string(),
            author: "F. Scott Fitzgerald".to_string(),
        },
        BookObject {
            title: "Where the Sidewalk Ends".to_string(),
            author: "Shel Silverstein".to_string(),
        },
    ]
}

/// Present in the request data when the caller sent a session cookie.
pub struct Session;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn books(&self) -> Vec<BookObject> {
        library()
    }

    async fn authors(&self) -> Vec<String> {
        library().into_iter().map(|book| book.author).collect()
    }

    async fn find_book_by_title(&self, title: String) -> Option<BookObject> {
        library().into_iter().find(|book| book.title == title)
    }

    async fn is_logged_in(&self, ctx: &Context<'_>) -> bool {
        ctx.data_opt::<Session>().is_some()
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn noop(&self) -> bool {
        true
    }

    async fn login(&self, ctx: &Context<'_>) -> bool {
        ctx.append_http_header("set-cookie", SESSION_COOKIE);
        true
    }
}

pub type LibrarySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn schema() -> LibrarySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish()
}

/// Execute a request body against the schema, honouring the session cookie.
pub async fn execute(
    schema: &LibrarySchema,
    body: &[u8],
    cookie: Option<&str>,
) -> (serde_json::Value, Vec<(String, String)>) {
    let mut request: async_graphql::Request =
        serde_json::from_slice(body).expect("request body is a GraphQL request");
    if cookie.is_some_and(|cookie| cookie.split(';').any(|c| c.trim() == "session=1")) {
        request = request.data(Session);
    }

    let response = schema.execute(request).await;
    let headers = response
        .http_headers
        .iter()
        .filter_map(|(name, value)| {
            Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
        })
        .collect();

    let body = serde_json::to_value(&response).expect("response serializes");
    (body, headers)
}

struct LibraryResponder {
    schema: LibrarySchema,
}

impl Respond for LibraryResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let cookie = request
            .headers
            .get("cookie")
            .and_then(|value| value.to_str().ok());

        let (body, headers) =
            futures::executor::block_on(execute(&self.schema, &request.body, cookie));

        headers
            .into_iter()
            .fold(ResponseTemplate::new(200).set_body_json(body), |template, (name, value)| {
                template.insert_header(name.as_str(), value.as_str())
            })
    }
}

/// Start a server for the library API. Returns the server and its endpoint.
pub async fn start_library() -> (MockServer, String) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(LibraryResponder { schema: schema() })
        .mount(&server)
        .await;

    let endpoint = format!("{}/graphql", server.uri());
    (server, endpoint)
}

// =============================================================================
// Typed documents
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Default, Serialize)]
pub struct EmptyVariables {}

#[derive(Debug, Deserialize)]
pub struct BooksQuery {
    pub books: Vec<Book>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorsQuery {
    pub authors: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookByTitleQuery {
    pub find_book_by_title: Option<Book>,
}

#[derive(Debug, Serialize)]
pub struct BookByTitleQueryVariables {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct NoopMutation {
    pub noop: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginMutation {
    pub login: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsLoggedInQuery {
    pub is_logged_in: bool,
}

pub type BooksQueryDocument = TypedDocumentNode<BooksQuery, EmptyVariables>;
pub type AuthorsQueryDocument = TypedDocumentNode<AuthorsQuery, EmptyVariables>;
pub type BookByTitleQueryDocument = TypedDocumentNode<BookByTitleQuery, BookByTitleQueryVariables>;
pub type NoopMutationDocument = TypedDocumentNode<NoopMutation, EmptyVariables>;
pub type LoginMutationDocument = TypedDocumentNode<LoginMutation, EmptyVariables>;
pub type IsLoggedInQueryDocument = TypedDocumentNode<IsLoggedInQuery, EmptyVariables>;

fn parse<R, V>(source: &str) -> TypedDocumentNode<R, V> {
    TypedDocumentNode::parse(source).expect("fixture documents are valid")
}

pub static BOOKS: Lazy<BooksQueryDocument> =
    Lazy::new(|| parse("query Books { books { title author } }"));

pub static AUTHORS: Lazy<AuthorsQueryDocument> = Lazy::new(|| parse("query Authors { authors }"));

pub static BOOK_BY_TITLE: Lazy<BookByTitleQueryDocument> = Lazy::new(|| {
    parse("query BookByTitle($title: String!) { findBookByTitle(title: $title) { title author } }")
});

pub static NOOP: Lazy<NoopMutationDocument> = Lazy::new(|| parse("mutation Noop { noop }"));

pub static LOGIN: Lazy<LoginMutationDocument> = Lazy::new(|| parse("mutation Login { login }"));

pub static IS_LOGGED_IN: Lazy<IsLoggedInQueryDocument> =
    Lazy::new(|| parse("query IsLoggedIn { isLoggedIn }"));

/// Every library document, plus a couple of exports that are not documents.
pub fn library_source() -> Source {
    Source::new()
        .export("BooksDocument", BOOKS.clone())
        .export("AuthorsDocument", AUTHORS.clone())
        .export("BookByTitleDocument", BOOK_BY_TITLE.clone())
        .export("NoopDocument", NOOP.clone())
        .export("LoginDocument", LOGIN.clone())
        .export("IsLoggedInDocument", IS_LOGGED_IN.clone())
        .export("Book", serde_json::json!({ "title": "The Great Gatsby" }))
        .export("SchemaVersion", "1")
}
