//! Ordered browser-detection rules.

/// How a rule tests one header value. Both sides are compared lowercased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    Equals(&'static str),
    Contains(&'static str),
    ContainsAny(&'static [&'static str]),
}

impl Match {
    /// `value` must already be lowercased.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Match::Equals(expected) => value == *expected,
            Match::Contains(needle) => value.contains(needle),
            Match::ContainsAny(needles) => needles.iter().any(|n| value.contains(n)),
        }
    }
}

/// One browser-detection rule: a header name and a test on its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserRule {
    pub header: &'static str,
    pub test: Match,
}

/// User-Agent tokens carried by mainstream browser engines.
pub const BROWSER_UA_TOKENS: &[&str] = &["mozilla", "chrome", "safari", "firefox", "edg/"];

/// Evaluated top to bottom; the first hit labels the caller browser-like.
pub const BROWSER_RULES: &[BrowserRule] = &[
    BrowserRule {
        header: "sec-fetch-mode",
        test: Match::Equals("navigate"),
    },
    BrowserRule {
        header: "sec-fetch-dest",
        test: Match::Equals("document"),
    },
    BrowserRule {
        header: "accept",
        test: Match::Contains("text/html"),
    },
    BrowserRule {
        header: "user-agent",
        test: Match::ContainsAny(BROWSER_UA_TOKENS),
    },
];
