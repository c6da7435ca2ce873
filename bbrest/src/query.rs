//! Path and query-string building.
//!
//! Path templates use positional placeholders (`/api/v1/chat/{0}/message`).
//! Every argument is percent-encoded as a single path segment before it is
//! substituted. Query parameters keep their insertion order; parameters
//! without a value are dropped from the encoded string.

use std::fmt;

use reqwest::Url;

use bbrest_core::constants::AUTH_QUERY_PARAM;
use bbrest_core::error::{BbError, BbResult};

/// Expand a path template, percent-encoding each argument.
///
/// `expand_path("/resource/{0}", &["AB CD"])` yields `/resource/AB%20CD`.
pub fn expand_path(template: &str, args: &[&str]) -> BbResult<String> {
    let args: Vec<Option<&str>> = args.iter().copied().map(Some).collect();
    expand_path_checked(template, &args)
}

/// Expand a path template whose arguments may be missing.
///
/// A `None` argument fails with [`BbError::InvalidArgument`] naming its index,
/// as does a placeholder that refers past the end of `args`.
pub fn expand_path_checked(template: &str, args: &[Option<&str>]) -> BbResult<String> {
    let mut encoded = Vec::with_capacity(args.len());
    for (index, arg) in args.iter().enumerate() {
        let arg = arg.ok_or_else(|| BbError::InvalidArgument {
            index,
            reason: "argument cannot be null".into(),
        })?;
        encoded.push(urlencoding::encode(arg));
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_placeholder_index(&after[..close]) => {
                // Overflowing indices can never match an argument.
                let index = after[..close].parse::<usize>().unwrap_or(usize::MAX);
                let value = encoded.get(index).ok_or_else(|| BbError::InvalidArgument {
                    index,
                    reason: format!("no argument supplied ({} given)", encoded.len()),
                })?;
                out.push_str(value);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn is_placeholder_index(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// A scalar query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Text(String),
    Int(i64),
    UInt(u64),
    /// Encoded as `1` / `0`.
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Text(s) => f.write_str(s),
            QueryValue::Int(n) => write!(f, "{n}"),
            QueryValue::UInt(n) => write!(f, "{n}"),
            QueryValue::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Text(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Text(v)
    }
}

impl From<&String> for QueryValue {
    fn from(v: &String) -> Self {
        QueryValue::Text(v.clone())
    }
}

impl From<i32> for QueryValue {
    fn from(v: i32) -> Self {
        QueryValue::Int(v.into())
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        QueryValue::UInt(v.into())
    }
}

impl From<u64> for QueryValue {
    fn from(v: u64) -> Self {
        QueryValue::UInt(v)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

/// Ordered set of query parameters.
///
/// Names are written as given and must already be URL-safe; values are
/// percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Option<QueryValue>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter that always has a value.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.entries.push((name.into(), Some(value.into())));
        self
    }

    /// Append a parameter that is omitted from the query string when `None`.
    pub fn opt_param<V: Into<QueryValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.entries.push((name.into(), value.map(Into::into)));
        self
    }

    /// Append a list-valued parameter, joined with commas into one value.
    pub fn list_param<I, S>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.param(name, joined)
    }

    /// Whether no parameter would be written.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_none())
    }

    /// Encode as `key=value&key2=value2`, skipping parameters without a value.
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .filter_map(|(name, value)| {
                value
                    .as_ref()
                    .map(|v| format!("{name}={}", urlencoding::encode(&v.to_string())))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Build the final request URL: the server origin, the already-expanded path,
/// and a query string that always starts with the password parameter.
pub fn authenticated_url(base: &Url, password: &str, path: &str, query: &QueryParams) -> Url {
    let mut url = base.clone();
    url.set_path(path);

    let mut query_string = format!("{AUTH_QUERY_PARAM}={}", urlencoding::encode(password));
    let extra = query.encode();
    if !extra.is_empty() {
        query_string.push('&');
        query_string.push_str(&extra);
    }
    url.set_query(Some(&query_string));
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_encodes_segment() {
        assert_eq!(
            expand_path("/resource/{0}", &["AB CD"]).unwrap(),
            "/resource/AB%20CD"
        );
    }

    #[test]
    fn test_expand_path_encodes_reserved_characters() {
        let path = expand_path("/api/v1/chat/{0}/message", &["iMessage;-;+1 555/000"]).unwrap();
        assert_eq!(path, "/api/v1/chat/iMessage%3B-%3B%2B1%20555%2F000/message");
    }

    #[test]
    fn test_expand_path_multiple_and_repeated_placeholders() {
        let path = expand_path("/{1}/{0}/{1}", &["a", "b"]).unwrap();
        assert_eq!(path, "/b/a/b");
    }

    #[test]
    fn test_expand_path_leaves_non_placeholders() {
        let path = expand_path("/x/{name}/{0}/{", &["v"]).unwrap();
        assert_eq!(path, "/x/{name}/v/{");
    }

    #[test]
    fn test_null_argument_names_index() {
        let err = expand_path_checked("/a/{0}/{1}", &[Some("ok"), None]).unwrap_err();
        match err {
            BbError::InvalidArgument { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_argument_is_invalid() {
        let err = expand_path("/a/{3}", &["only"]).unwrap_err();
        assert!(matches!(err, BbError::InvalidArgument { index: 3, .. }));
    }

    #[test]
    fn test_query_bools_encode_as_digits() {
        let query = QueryParams::new()
            .param("original", true)
            .param("force", false);
        assert_eq!(query.encode(), "original=1&force=0");
    }

    #[test]
    fn test_query_omits_absent_values() {
        let query = QueryParams::new()
            .opt_param("width", Some(100))
            .opt_param("height", None::<i32>)
            .opt_param("quality", Some("best"))
            .opt_param("original", None::<bool>);
        assert_eq!(query.encode(), "width=100&quality=best");
    }

    #[test]
    fn test_query_all_absent_is_empty() {
        let query = QueryParams::new().opt_param("after", None::<i64>);
        assert!(query.is_empty());
        assert_eq!(query.encode(), "");
    }

    #[test]
    fn test_query_values_are_escaped() {
        let query = QueryParams::new().param("sort", "a b&c=d");
        assert_eq!(query.encode(), "sort=a%20b%26c%3Dd");
    }

    #[test]
    fn test_list_param_joins_with_commas() {
        let query = QueryParams::new().list_param("with", ["participants", "lastmessage"]);
        assert_eq!(query.encode(), "with=participants%2Clastmessage");

        let empty: [&str; 0] = [];
        let query = QueryParams::new().list_param("with", empty);
        assert_eq!(query.encode(), "with=");
    }

    #[test]
    fn test_authenticated_url_puts_password_first() {
        let base = Url::parse("http://localhost:1234").unwrap();
        let query = QueryParams::new().param("limit", 5).opt_param("offset", None::<i32>);
        let url = authenticated_url(&base, "p@ss word", "/api/v1/chat/query", &query);
        assert_eq!(url.path(), "/api/v1/chat/query");
        assert_eq!(url.query(), Some("password=p%40ss%20word&limit=5"));
    }

    #[test]
    fn test_authenticated_url_replaces_base_path() {
        let base = Url::parse("https://abc.trycloudflare.com/some/prefix").unwrap();
        let url = authenticated_url(&base, "pw", "/resource/AB%20CD", &QueryParams::new());
        assert_eq!(
            url.as_str(),
            "https://abc.trycloudflare.com/resource/AB%20CD?password=pw"
        );
    }
}
