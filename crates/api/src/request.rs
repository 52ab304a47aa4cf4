use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API call, built per request and dropped once it completes.
///
/// `path` is relative to the client's base URL. Query pairs keep the order
/// in which they were added.
#[derive(Debug, Clone)]
pub struct Request<B = ()> {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<B>,
}

impl Request<()> {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }
}

impl<B> Request<B> {
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a payload, replacing any previous one.
    pub fn body<T: Serialize>(self, body: T) -> Request<T> {
        Request {
            method: self.method,
            path: self.path,
            query: self.query,
            body: Some(body),
        }
    }
}

/// Raw outcome of a successful (2xx) call.
///
/// `decoded` stays `None` until the response is passed through
/// [`Client::decode_response`](crate::Client::decode_response).
#[derive(Debug, Clone)]
pub struct Response<T = serde_json::Value> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub decoded: Option<T>,
}

impl<T> Response<T> {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_keeps_insertion_order() {
        let request = Request::get("changesets.json")
            .query("page", 2)
            .query("per_page", 15)
            .query("order", "desc");

        let keys: Vec<&str> = request.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["page", "per_page", "order"]);
        assert_eq!(request.query[1].1, "15");
    }

    #[test]
    fn test_body_swaps_payload_type() {
        let request = Request::post("repositories.json")
            .query("dry_run", true)
            .body(serde_json::json!({"repository": {"name": "site"}}));

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.query, vec![("dry_run".to_string(), "true".to_string())]);
        assert_eq!(request.body.unwrap()["repository"]["name"], "site");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response: Response = Response {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: b"{}".to_vec(),
            decoded: None,
        };
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }
}
