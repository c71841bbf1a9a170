//! Call name derivation.

/// Suffix stripped from export keys.
pub const DOCUMENT_SUFFIX: &str = "Document";

/// Derive the call name of an exported document.
///
/// The first character is lower-cased, then a trailing `Document` is
/// stripped: `BookByTitleDocument` becomes `bookByTitle` and `Noop` becomes
/// `noop`. A key that is exactly `Document` becomes `document`.
pub fn call_name(key: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_suffix_and_lowers_first_char() {
        assert_eq!(call_name("FooBarDocument"), "fooBar");
        assert_eq!(call_name("BookByTitleDocument"), "bookByTitle");
        assert_eq!(call_name("IsLoggedInDocument"), "isLoggedIn");
    }

    #[test]
    fn test_without_suffix() {
        assert_eq!(call_name("Noop"), "noop");
        assert_eq!(call_name("books"), "books");
        assert_eq!(call_name("DocumentStore"), "documentStore");
    }

    #[test]
    fn test_edge_cases() {
        assert_eq!(call_name("Document"), "document");
        assert_eq!(call_name(""), "");
        assert_eq!(call_name("ÉtatDocument"), "état");
    }

    #[test]
    fn test_idempotent() {
        for key in ["FooBarDocument", "Noop", "Document", "AuthorsDocument"] {
            let once = call_name(key);
            assert_eq!(call_name(&once), once);
        }
    }
}
