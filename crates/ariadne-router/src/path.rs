//! Path normalization.
//!
//! Every path that takes part in matching goes through [`normalize`] first:
//! request targets at dispatch time, static route paths and dynamic patterns
//! at registration time.

/// The path separator.
pub const SEPARATOR: char = '/';

/// Collapses separator runs and drops a single trailing separator.
///
/// The root path `/` and the empty string pass through unchanged. The
/// function is idempotent: `normalize(&normalize(p)) == normalize(p)`.
///
/// # Example
///
/// ```rust
/// use ariadne_router::normalize;
///
/// assert_eq!(normalize("/hoge///fuga//"), "/hoge/fuga");
/// assert_eq!(normalize("/"), "/");
/// assert_eq!(normalize(""), "");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut previous_was_separator = false;

    for ch in path.chars() {
        if ch == SEPARATOR {
            if !previous_was_separator {
                normalized.push(SEPARATOR);
            }
            previous_was_separator = true;
        } else {
            normalized.push(ch);
            previous_was_separator = false;
        }
    }

    if normalized.len() > 1 && normalized.ends_with(SEPARATOR) {
        normalized.pop();
    }

    normalized
}

/// Returns the part of a request target that precedes any query string or
/// fragment.
///
/// ```rust
/// use ariadne_router::path::strip_query;
///
/// assert_eq!(strip_query("/hoge?x=1"), "/hoge");
/// assert_eq!(strip_query("/hoge#top"), "/hoge");
/// assert_eq!(strip_query("/hoge"), "/hoge");
/// ```
#[must_use]
pub fn strip_query(target: &str) -> &str {
    target
        .find(['?', '#'])
        .map_or(target, |end| &target[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_trailing_slash() {
        assert_eq!(normalize("/hoge/"), "/hoge");
    }

    #[test]
    fn test_normalize_already_normal() {
        assert_eq!(normalize("/hoge"), "/hoge");
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_trailing_run() {
        assert_eq!(normalize("/hoge/////"), "/hoge");
    }

    #[test]
    fn test_normalize_inner_and_trailing_runs() {
        assert_eq!(normalize("/hoge///fuga//"), "/hoge/fuga");
    }

    #[test]
    fn test_normalize_root_run() {
        assert_eq!(normalize("////"), "/");
    }

    #[test]
    fn test_normalize_relative() {
        assert_eq!(normalize("hoge//fuga/"), "hoge/fuga");
    }

    #[test]
    fn test_normalize_keeps_query() {
        // The whole target is normalized, query included.
        assert_eq!(normalize("/hoge?next=/a//b"), "/hoge?next=/a/b");
    }

    #[test]
    fn test_strip_query_prefers_first_delimiter() {
        assert_eq!(strip_query("/a#frag?x"), "/a");
        assert_eq!(strip_query("/a?x#frag"), "/a");
        assert_eq!(strip_query("?x"), "");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(path in "[/a-z?#:]{0,24}") {
            let once = normalize(&path);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalize_has_no_separator_runs(path in "[/a-z]{0,24}") {
            prop_assert!(!normalize(&path).contains("//"));
        }
    }
}
