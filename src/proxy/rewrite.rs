//! Path rewriting for forwarded requests.

/// Strip one leading `prefix` from the path of `path_and_query`.
///
/// The query string is carried over verbatim. A path that becomes empty is
/// forwarded as `/`. Paths that do not start with `prefix` are returned as-is.
pub fn rewrite_path_and_query(path_and_query: &str, prefix: &str) -> String {
    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_and_query, None),
    };

    let stripped = path.strip_prefix(prefix).unwrap_or(path);

    let mut rewritten = String::with_capacity(path_and_query.len() + 1);
    if !stripped.starts_with('/') {
        rewritten.push('/');
    }
    rewritten.push_str(stripped);
    if let Some(query) = query {
        rewritten.push('?');
        rewritten.push_str(query);
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_prefix() {
        assert_eq!(rewrite_path_and_query("/api/users/1", "/api"), "/users/1");
        assert_eq!(rewrite_path_and_query("/api/movies/5?x=1", "/api"), "/movies/5?x=1");
    }

    #[test]
    fn test_bare_prefix_becomes_root() {
        assert_eq!(rewrite_path_and_query("/api", "/api"), "/");
        assert_eq!(rewrite_path_and_query("/api/", "/api"), "/");
        assert_eq!(rewrite_path_and_query("/api?page=2", "/api"), "/?page=2");
    }

    #[test]
    fn test_only_one_occurrence_is_removed() {
        assert_eq!(rewrite_path_and_query("/api/api/x", "/api"), "/api/x");
    }

    #[test]
    fn test_query_is_untouched() {
        assert_eq!(
            rewrite_path_and_query("/api/search?q=/api/x&next=%2Fapi", "/api"),
            "/search?q=/api/x&next=%2Fapi"
        );
        assert_eq!(rewrite_path_and_query("/api/x?", "/api"), "/x?");
    }

    #[test]
    fn test_trailing_segments_are_kept() {
        assert_eq!(rewrite_path_and_query("/api/a/b/c/", "/api"), "/a/b/c/");
        assert_eq!(rewrite_path_and_query("/api/v2/items", "/api/v2"), "/items");
    }
}
