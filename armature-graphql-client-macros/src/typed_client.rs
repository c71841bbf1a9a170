use std::collections::HashMap;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Expr, Ident, Token, Type, Visibility, braced,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
};

/// Methods every generated client has; operations may not shadow them.
const RESERVED: &[&str] = &["new", "source", "with_builder", "client"];

/// Names that cannot be used even as raw identifiers.
const UNUSABLE: &[&str] = &["_", "self", "Self", "super", "crate"];

const DOCUMENT_SUFFIX: &str = "Document";

/// Parses:
///
/// ```ignore
/// #[attrs]
/// pub struct Name {
///     #[attrs]
///     KeyDocument: OperationType = expr,
/// }
/// ```
struct TypedClientInput {
    attrs: Vec<Attribute>,
    vis: Visibility,
    name: Ident,
    entries: Punctuated<Entry, Token![,]>,
}

struct Entry {
    attrs: Vec<Attribute>,
    key: Ident,
    ty: Type,
    expr: Expr,
}

impl Parse for TypedClientInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name: Ident = input.parse()?;

        let content;
        braced!(content in input);
        let entries = content.parse_terminated(Entry::parse, Token![,])?;

        Ok(TypedClientInput {
            attrs,
            vis,
            name,
            entries,
        })
    }
}

impl Parse for Entry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let key = Ident::parse_any(input)?;
        input.parse::<Token![:]>()?;
        let ty: Type = input.parse()?;
        input.parse::<Token![=]>()?;
        let expr: Expr = input.parse()?;

        Ok(Entry {
            attrs,
            key,
            ty,
            expr,
        })
    }
}

pub fn graphql_client_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as TypedClientInput);

    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: TypedClientInput) -> syn::Result<TokenStream2> {
    let TypedClientInput {
        attrs,
        vis,
        name,
        entries,
    } = input;

    let mut seen: HashMap<String, String> = HashMap::new();
    let mut exports = Vec::new();
    let mut methods = Vec::new();

    for entry in &entries {
        let key = entry.key.unraw().to_string();
        let call = call_name(&key);
        let method_name = snake_case(&call);

        if let Some(previous) = seen.insert(method_name.clone(), key.clone()) {
            return Err(syn::Error::new(
                entry.key.span(),
                format!(
                    "`{}` and `{}` both generate the method `{}`",
                    previous, key, method_name
                ),
            ));
        }
        if RESERVED.contains(&method_name.as_str()) {
            return Err(syn::Error::new(
                entry.key.span(),
                format!("`{}` generates the reserved method name `{}`", key, method_name),
            ));
        }
        let method = method_ident(&method_name, &entry.key)?;

        let ty = &entry.ty;
        let expr = &entry.expr;
        exports.push(quote! {
            .export(#key, {
                let document: #ty = #expr;
                document
            })
        });

        let entry_attrs = &entry.attrs;
        let doc = if entry_attrs.iter().any(|attr| attr.path().is_ident("doc")) {
            quote! {}
        } else {
            let text = format!("Run the `{}` operation.", call);
            quote! { #[doc = #text] }
        };

        methods.push(quote! {
            #doc
            #(#entry_attrs)*
            pub async fn #method(
                &self,
                variables: <#ty as ::armature_graphql_client::Operation>::Variables,
                options: ::core::option::Option<::armature_graphql_client::FetcherOptions>,
            ) -> ::armature_graphql_client::Result<
                ::armature_graphql_client::GraphQLResponse<
                    <#ty as ::armature_graphql_client::Operation>::Result,
                >,
            > {
                self.client
                    .call_typed::<#ty>(#call, variables, options)
                    .await
            }
        });
    }

    Ok(quote! {
        #(#attrs)*
        #[derive(Clone, Debug)]
        #vis struct #name {
            client: ::armature_graphql_client::GraphQLClient,
        }

        impl #name {
            /// The documents this client is built from.
            pub fn source() -> ::armature_graphql_client::Source {
                ::armature_graphql_client::Source::new()
                    #(#exports)*
            }

            /// Create a client over the default transport.
            pub fn new(endpoint: impl ::core::convert::Into<::std::string::String>) -> Self {
                Self::with_builder(::armature_graphql_client::GraphQLClient::builder(endpoint))
            }

            /// Create a client from a configured builder.
            pub fn with_builder(builder: ::armature_graphql_client::GraphQLClientBuilder) -> Self {
                Self {
                    client: builder.build(Self::source()),
                }
            }

            /// The underlying untyped client.
            pub fn client(&self) -> &::armature_graphql_client::GraphQLClient {
                &self.client
            }

            #(#methods)*
        }
    })
}

/// Must agree with `armature_graphql_client::call_name`.
fn call_name(key: &str) -> String {
    let mut chars = key.chars();
    let lowered = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect::<String>(),
        None => return String::new(),
    };

    match lowered.strip_suffix(DOCUMENT_SUFFIX) {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

/// `bookByTitle` -> `book_by_title`, `findByISBN` -> `find_by_isbn`.
fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_uppercase() {
            out.push(c);
            continue;
        }

        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
            Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
            _ => false,
        };

        if boundary {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }

    out
}

fn method_ident(name: &str, key: &Ident) -> syn::Result<Ident> {
    if name.is_empty() || UNUSABLE.contains(&name) {
        return Err(syn::Error::new(
            key.span(),
            format!("`{}` does not produce a usable method name", key),
        ));
    }

    match syn::parse_str::<Ident>(name) {
        Ok(_) => Ok(Ident::new(name, key.span())),
        // Keywords such as `type` or `match`.
        Err(_) => Ok(Ident::new_raw(name, key.span())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(input: &str) -> syn::Result<String> {
        let input: TypedClientInput = syn::parse_str(input)?;
        expand(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_call_name() {
        assert_eq!(call_name("BookByTitleDocument"), "bookByTitle");
        assert_eq!(call_name("Noop"), "noop");
        assert_eq!(call_name("Document"), "document");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("bookByTitle"), "book_by_title");
        assert_eq!(snake_case("isLoggedIn"), "is_logged_in");
        assert_eq!(snake_case("findByISBN"), "find_by_isbn");
        assert_eq!(snake_case("getHTTPStatus"), "get_http_status");
        assert_eq!(snake_case("books"), "books");
        assert_eq!(snake_case("top10Books"), "top10_books");
    }

    #[test]
    fn test_expands_methods() {
        let expanded = expand_str(
            "pub struct LibraryClient {
                BooksDocument: BooksQueryDocument = BOOKS.clone(),
                BookByTitleDocument: BookByTitleQueryDocument = BOOK_BY_TITLE.clone(),
            }",
        )
        .unwrap();

        assert!(expanded.contains("pub struct LibraryClient"));
        assert!(expanded.contains("pub async fn books"));
        assert!(expanded.contains("pub async fn book_by_title"));
        assert!(expanded.contains("\"bookByTitle\""));
        assert!(expanded.contains("\"BookByTitleDocument\""));
    }

    #[test]
    fn test_keyword_becomes_raw_ident() {
        let expanded = expand_str("struct C { TypeDocument: T = t() }").unwrap();
        assert!(expanded.contains("r#type"));
    }

    #[test]
    fn test_duplicate_method_names_rejected() {
        let err = expand_str(
            "struct C {
                BooksDocument: A = a(),
                Books: B = b(),
            }",
        )
        .unwrap_err();

        assert!(err.to_string().contains("both generate the method `books`"));
    }

    #[test]
    fn test_reserved_names_rejected() {
        let err = expand_str("struct C { NewDocument: A = a() }").unwrap_err();
        assert!(err.to_string().contains("reserved"));

        let err = expand_str("struct C { SelfDocument: A = a() }").unwrap_err();
        assert!(err.to_string().contains("usable method name"));
    }
}
