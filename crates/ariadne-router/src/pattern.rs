//! Route pattern compilation.
//!
//! A pattern is a path template made of literal segments and `:name`
//! placeholders, e.g. `/users/:id/posts/:post`. Compilation happens once at
//! registration; matching splits the candidate on `/` and walks both segment
//! lists side by side, so one call yields the decision and the bindings.

use std::fmt;

use crate::params::Params;
use crate::path::{normalize, strip_query, SEPARATOR};

/// Prefix that turns a segment into a named placeholder.
pub const PARAM_PREFIX: char = ':';

/// One segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Compared verbatim.
    Literal(String),
    /// Binds one or more non-separator characters.
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(PARAM_PREFIX) {
            Some(name) if !name.is_empty() => Self::Param(name.to_string()),
            _ => Self::Literal(raw.to_string()),
        }
    }
}

/// A compiled route pattern.
///
/// Any string compiles. Anything from the first `?` or `#` in the pattern is
/// discarded, separator runs are collapsed and a trailing separator is
/// dropped. A pattern left empty by that (such as `/`) matches the root.
///
/// # Example
///
/// ```rust
/// use ariadne_router::Pattern;
///
/// let pattern = Pattern::compile("/hoge/:id/:name");
/// let params = pattern.matches("/hoge/1/bob").unwrap();
///
/// assert_eq!(params.get("id"), Some("1"));
/// assert_eq!(params.get("name"), Some("bob"));
/// assert!(pattern.matches("/hoge/1").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
    param_names: Vec<String>,
}

impl Pattern {
    /// Compiles a pattern string.
    #[must_use]
    pub fn compile(pattern: &str) -> Self {
        let normalized = normalize(strip_query(pattern));
        let trimmed = normalized.strip_suffix(SEPARATOR).unwrap_or(&normalized);

        let segments: Vec<Segment> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split(SEPARATOR).map(Segment::parse).collect()
        };

        let mut param_names: Vec<String> = Vec::new();
        for segment in &segments {
            if let Segment::Param(name) = segment {
                if !param_names.contains(name) {
                    param_names.push(name.clone());
                }
            }
        }

        Self {
            source: pattern.to_string(),
            segments,
            param_names,
        }
    }

    /// Returns true if `path` contains at least one `:name` segment.
    ///
    /// ```rust
    /// use ariadne_router::Pattern;
    ///
    /// assert!(Pattern::has_params("/hello/:name"));
    /// assert!(!Pattern::has_params("/hello/world"));
    /// assert!(!Pattern::has_params("/odd/:"));
    /// ```
    #[must_use]
    pub fn has_params(path: &str) -> bool {
        strip_query(path)
            .split(SEPARATOR)
            .any(|raw| matches!(Segment::parse(raw), Segment::Param(_)))
    }

    /// Matches a normalized path against this pattern.
    ///
    /// The query string or fragment of `path`, if any, is ignored. Returns the
    /// bound parameters on success; a repeated parameter name keeps its last
    /// occurrence.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Params> {
        let path = strip_query(path);

        if self.segments.is_empty() {
            let root = path.is_empty() || path == "/";
            return root.then(Params::new);
        }

        let mut params = Params::with_capacity(self.param_names.len());
        let mut candidate = path.split(SEPARATOR);

        for segment in &self.segments {
            let part = candidate.next()?;
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.as_str(), part);
                }
            }
        }

        if candidate.next().is_some() {
            return None;
        }

        Some(params)
    }

    /// Returns the pattern string as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the distinct parameter names in order of first appearance.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns true if this pattern only matches the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_param() {
        let pattern = Pattern::compile("/hoge/:id");
        let params = pattern.matches("/hoge/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_trailing_slash_after_normalization() {
        let pattern = Pattern::compile("/hoge/:id");
        let params = pattern.matches(&normalize("/hoge/42/")).unwrap();
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_missing_segment_does_not_match() {
        let pattern = Pattern::compile("/hoge/:id");
        assert!(pattern.matches("/hoge").is_none());
    }

    #[test]
    fn test_extra_segment_does_not_match() {
        let pattern = Pattern::compile("/hoge/:id");
        assert!(pattern.matches("/hoge/42/43").is_none());
    }

    #[test]
    fn test_two_params() {
        let pattern = Pattern::compile("/hoge/:id/:name");
        let params = pattern.matches("/hoge/1/bob").unwrap();
        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.get("name"), Some("bob"));
        assert_eq!(pattern.param_names(), ["id", "name"]);
    }

    #[test]
    fn test_trailing_slash_in_pattern_is_ignored() {
        assert_eq!(
            Pattern::compile("/hoge/:id/").segments,
            Pattern::compile("/hoge/:id").segments
        );
    }

    #[test]
    fn test_separator_runs_in_pattern_collapse() {
        let pattern = Pattern::compile("//hoge///:id");
        assert_eq!(pattern.matches("/hoge/7").unwrap().get("id"), Some("7"));
    }

    #[test]
    fn test_literal_accepts_query_and_fragment() {
        let pattern = Pattern::compile("/hoge");
        assert!(pattern.matches("/hoge").is_some());
        assert!(pattern.matches("/hoge?x=1").is_some());
        assert!(pattern.matches("/hoge#frag").is_some());
        assert!(pattern.matches("/hoge2").is_none());
    }

    #[test]
    fn test_param_value_excludes_query() {
        let pattern = Pattern::compile("/hoge/:id");
        let params = pattern.matches("/hoge/42?x=1").unwrap();
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_empty_param_does_not_match() {
        let pattern = Pattern::compile("/hoge/:id/edit");
        assert!(pattern.matches("/hoge//edit").is_none());
    }

    #[test]
    fn test_anchored_at_start() {
        let pattern = Pattern::compile("/hoge/:id");
        assert!(pattern.matches("/prefix/hoge/42").is_none());
        assert!(pattern.matches("hoge/42").is_none());
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let pattern = Pattern::compile("/:id/:id");
        let params = pattern.matches("/first/second").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("second"));
        assert_eq!(pattern.param_names(), ["id"]);
    }

    #[test]
    fn test_bare_colon_is_literal() {
        let pattern = Pattern::compile("/odd/:");
        assert!(pattern.matches("/odd/:").is_some());
        assert!(pattern.matches("/odd/x").is_none());
        assert!(pattern.param_names().is_empty());
    }

    #[test]
    fn test_literal_is_verbatim() {
        let pattern = Pattern::compile("/file.txt");
        assert!(pattern.matches("/file.txt").is_some());
        assert!(pattern.matches("/fileXtxt").is_none());
    }

    #[test]
    fn test_root_pattern() {
        let pattern = Pattern::compile("/");
        assert!(pattern.is_root());
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/?x=1").is_some());
        assert!(pattern.matches("/hoge").is_none());
    }

    #[test]
    fn test_query_in_pattern_is_discarded() {
        let pattern = Pattern::compile("/hoge/:id/?debug=1");
        assert_eq!(pattern.matches("/hoge/9").unwrap().get("id"), Some("9"));
    }

    #[test]
    fn test_display_keeps_source() {
        let pattern = Pattern::compile("/users/:id/");
        assert_eq!(pattern.to_string(), "/users/:id/");
        assert_eq!(pattern.as_str(), "/users/:id/");
    }

    proptest! {
        #[test]
        fn prop_bound_values_round_trip(
            id in "[a-zA-Z0-9_.-]{1,12}",
            name in "[a-zA-Z0-9_.-]{1,12}",
        ) {
            let pattern = Pattern::compile("/users/:id/posts/:name");
            let path = format!("/users/{id}/posts/{name}");
            let params = pattern.matches(&path).unwrap();
            prop_assert_eq!(params.get("id"), Some(id.as_str()));
            prop_assert_eq!(params.get("name"), Some(name.as_str()));
        }

        #[test]
        fn prop_values_never_contain_separator(path in "[/a-z]{0,24}") {
            let pattern = Pattern::compile("/:a/:b");
            if let Some(params) = pattern.matches(&normalize(&path)) {
                for (_, value) in params.iter() {
                    prop_assert!(!value.contains('/'));
                }
            }
        }
    }
}
