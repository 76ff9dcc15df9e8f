//! Transport-neutral view of an incoming script request.

use std::collections::HashMap;
use std::fmt;

/// Query flag and value selecting raw mode (`?raw=1`).
pub const RAW_FLAG: &str = "raw";
const RAW_FLAG_ON: &str = "1";

/// HTTP method as seen by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Other(String),
}

impl RequestMethod {
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "GET" => RequestMethod::Get,
            "POST" => RequestMethod::Post,
            _ => RequestMethod::Other(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Other(m) => m,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the caller asked to see the raw script or the confirmation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    View,
    Raw,
}

impl AccessMode {
    /// Raw is opt-in: only the exact value `1` selects it.
    pub fn from_raw_flag(value: Option<&str>) -> Self {
        match value {
            Some(RAW_FLAG_ON) => AccessMode::Raw,
            _ => AccessMode::View,
        }
    }
}

/// Request headers with case-insensitive names.
///
/// Repeated headers are joined with `", "`, matching how HTTP folds them.
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders(HashMap<String, String>);

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        let key = name.trim().to_ascii_lowercase();
        self.0
            .entry(key)
            .and_modify(|v| {
                v.push_str(", ");
                v.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    /// Header value, or `""` when absent.
    pub fn get(&self, name: &str) -> &str {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for RequestHeaders {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = RequestHeaders::new();
        for (k, v) in iter {
            headers.insert(k.as_ref(), v.as_ref());
        }
        headers
    }
}

/// Everything the gate needs from one request. Immutable once built.
#[derive(Debug, Clone)]
pub struct GateRequest {
    pub method: RequestMethod,
    /// Unsanitized `name` from the query or path.
    pub raw_name: String,
    pub mode: AccessMode,
    pub headers: RequestHeaders,
    /// Secret presented in a POST form body, if any.
    pub presented_key: Option<String>,
}

impl GateRequest {
    pub fn get(raw_name: impl Into<String>, mode: AccessMode) -> Self {
        Self {
            method: RequestMethod::Get,
            raw_name: raw_name.into(),
            mode,
            headers: RequestHeaders::new(),
            presented_key: None,
        }
    }

    pub fn with_headers(mut self, headers: RequestHeaders) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.presented_key = Some(key.into());
        self
    }
}
