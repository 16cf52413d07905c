//! Incoming HTTP request type.
//!
//! A [`Request`] is the read-only view a handler gets: method, path, matched
//! path parameters, parsed query string, and headers. This is a GET-only API,
//! so request bodies are never read.
//!
//! Query and path components are percent-decoded here, once, on the way in.
//! `+` decodes to a space in query values only; in a path segment it is a
//! literal plus. A malformed escape passes through untouched rather than
//! failing the request.

use std::collections::HashMap;
use std::str::FromStr;

use http::{HeaderMap, Method, Uri};

/// An incoming HTTP request.
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    params: HashMap<String, String>,
    headers: HeaderMap,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        uri: &Uri,
        headers: HeaderMap,
        params: HashMap<String, String>,
    ) -> Self {
        let query = uri.query().map(parse_query).unwrap_or_default();
        let params = params
            .into_iter()
            .map(|(name, value)| (name, decode_component(&value, false)))
            .collect();
        Self {
            method,
            path: uri.path().to_owned(),
            query,
            params,
            headers,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Case-insensitive header lookup; `None` for absent or non-UTF-8 values.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Returns a named path parameter, percent-decoded.
    ///
    /// For a route `/v1/sketches/{name}`, `req.param("name")` on
    /// `/v1/sketches/Dead%20Parrot` returns `Some("Dead Parrot")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses a named path parameter. The route guarantees presence, so only
    /// an unparseable value fails.
    pub fn param_parsed<T: FromStr>(&self, name: &str) -> Result<T, BadParam> {
        let raw = self.param(name).unwrap_or("");
        raw.parse().map_err(|_| BadParam {
            name: name.to_owned(),
            value: raw.to_owned(),
        })
    }

    /// Returns a query parameter's decoded value. First occurrence wins when
    /// a name repeats.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Parses an optional query parameter: absent is `Ok(None)`, present but
    /// unparseable is a [`BadParam`].
    pub fn query_parsed<T: FromStr>(&self, name: &str) -> Result<Option<T>, BadParam> {
        match self.query(name) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| BadParam {
                name: name.to_owned(),
                value: raw.to_owned(),
            }),
        }
    }

    /// Reads a boolean flag parameter.
    ///
    /// Absent is `false`; a bare `?flag` or `true`/`1`/`yes` is `true`;
    /// `false`/`0`/`no` is `false`. Anything else is a [`BadParam`].
    pub fn query_flag(&self, name: &str) -> Result<bool, BadParam> {
        match self.query(name) {
            None => Ok(false),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "" | "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(BadParam {
                    name: name.to_owned(),
                    value: raw.to_owned(),
                }),
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn test(path_and_query: &str) -> Self {
        Self::test_with_params(path_and_query, &[])
    }

    #[cfg(test)]
    pub(crate) fn test_with_params(path_and_query: &str, params: &[(&str, &str)]) -> Self {
        let uri: Uri = path_and_query.parse().expect("test uri parses");
        let params = params
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Self::new(Method::GET, &uri, HeaderMap::new(), params)
    }
}

/// A query or path parameter whose value could not be understood.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid value `{value}` for parameter `{name}`")]
pub struct BadParam {
    pub name: String,
    pub value: String,
}

// ── Decoding ─────────────────────────────────────────────────────────────────

fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(name, true), decode_component(value, true))
        })
        .collect()
}

/// Percent-decodes one URL component. Invalid escapes stay literal; invalid
/// UTF-8 is replaced, never an error.
fn decode_component(raw: &str, plus_is_space: bool) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' if plus_is_space => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_values_are_decoded() {
        let req = Request::test("/v1/quotes/random?actor=Eric+Idle&sketch=Dead%20Parrot");
        assert_eq!(req.query("actor"), Some("Eric Idle"));
        assert_eq!(req.query("sketch"), Some("Dead Parrot"));
        assert_eq!(req.query("missing"), None);
    }

    #[test]
    fn utf8_escapes_decode() {
        let req = Request::test("/v1/quotes/random?character=Xim%C3%A9nez");
        assert_eq!(req.query("character"), Some("Ximénez"));
    }

    #[test]
    fn malformed_escapes_stay_literal() {
        let req = Request::test("/v1/quotes/random?actor=100%25&broken=%zz&tail=%2");
        assert_eq!(req.query("actor"), Some("100%"));
        assert_eq!(req.query("broken"), Some("%zz"));
        assert_eq!(req.query("tail"), Some("%2"));
    }

    #[test]
    fn first_occurrence_wins_and_bare_names_are_empty() {
        let req = Request::test("/v1/quotes/random?episode=8&episode=15&detailed");
        assert_eq!(req.query("episode"), Some("8"));
        assert_eq!(req.query("detailed"), Some(""));
    }

    #[test]
    fn query_parsed_reports_bad_values() {
        let req = Request::test("/v1/quotes/random?episode=banana&max_length=20");
        assert_eq!(req.query_parsed::<u32>("max_length"), Ok(Some(20)));
        assert_eq!(req.query_parsed::<u32>("absent"), Ok(None));
        let err = req.query_parsed::<u32>("episode").expect_err("banana is not a number");
        assert_eq!(err.name, "episode");
        assert_eq!(err.value, "banana");
        assert_eq!(
            err.to_string(),
            "invalid value `banana` for parameter `episode`"
        );
    }

    #[test]
    fn query_flag_accepts_the_usual_spellings() {
        assert!(!Request::test("/x").query_flag("detailed").expect("absent is false"));
        assert!(Request::test("/x?detailed").query_flag("detailed").expect("bare flag"));
        assert!(Request::test("/x?detailed=true").query_flag("detailed").expect("true"));
        assert!(Request::test("/x?detailed=1").query_flag("detailed").expect("one"));
        assert!(!Request::test("/x?detailed=false").query_flag("detailed").expect("false"));
        assert!(Request::test("/x?detailed=spam").query_flag("detailed").is_err());
    }

    #[test]
    fn path_params_decode_percent_but_not_plus() {
        let req = Request::test_with_params("/v1/sketches/x", &[("name", "Dead%20Parrot+Live")]);
        assert_eq!(req.param("name"), Some("Dead Parrot+Live"));
    }

    #[test]
    fn param_parsed_flags_non_numeric_episode() {
        let req = Request::test_with_params("/v1/episodes/banana", &[("episode", "banana")]);
        let err = req.param_parsed::<u32>("episode").expect_err("not a number");
        assert_eq!(err.value, "banana");
        let req = Request::test_with_params("/v1/episodes/15", &[("episode", "15")]);
        assert_eq!(req.param_parsed::<u32>("episode"), Ok(15));
    }
}
