//! Classify a request as browser-like or programmatic from its headers.
//!
//! A heuristic, not a security boundary: it decides whether a human poking at
//! the URL sees a decoy page while script clients (e.g. a game-engine HTTP
//! client with a minimal header set) get the raw payload.

mod rules;

pub use rules::{BrowserRule, Match, BROWSER_RULES, BROWSER_UA_TOKENS};

use crate::request::RequestHeaders;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientClass {
    BrowserLike,
    Programmatic,
}

impl fmt::Display for ClientClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientClass::BrowserLike => f.write_str("browser-like"),
            ClientClass::Programmatic => f.write_str("programmatic"),
        }
    }
}

/// Returns the first rule in [`BROWSER_RULES`] that matches, if any.
pub fn matching_rule(headers: &RequestHeaders) -> Option<&'static BrowserRule> {
    BROWSER_RULES.iter().find(|rule| {
        let value = headers.get(rule.header).trim().to_ascii_lowercase();
        rule.test.matches(&value)
    })
}

/// Classify a request by its headers.
pub fn classify(headers: &RequestHeaders) -> ClientClass {
    match matching_rule(headers) {
        Some(_) => ClientClass::BrowserLike,
        None => ClientClass::Programmatic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> RequestHeaders {
        pairs.iter().copied().collect()
    }

    #[test]
    fn curl_with_json_accept_is_programmatic() {
        let h = headers(&[("Accept", "application/json"), ("User-Agent", "curl/8.0")]);
        assert_eq!(classify(&h), ClientClass::Programmatic);
    }

    #[test]
    fn chrome_navigation_is_browser_like() {
        let h = headers(&[
            ("Accept", "text/html,*/*"),
            (
                "User-Agent",
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/126.0 Safari/537.36",
            ),
        ]);
        assert_eq!(classify(&h), ClientClass::BrowserLike);
    }

    #[test]
    fn no_headers_is_programmatic() {
        assert_eq!(classify(&RequestHeaders::new()), ClientClass::Programmatic);
    }

    #[test]
    fn game_client_minimal_headers_is_programmatic() {
        let h = headers(&[("User-Agent", "Roblox/WinInet"), ("Accept", "*/*")]);
        assert_eq!(classify(&h), ClientClass::Programmatic);
    }

    #[test]
    fn sec_fetch_mode_navigate_case_insensitive() {
        let h = headers(&[("Sec-Fetch-Mode", "NaviGate")]);
        assert_eq!(matching_rule(&h), Some(&BROWSER_RULES[0]));
    }

    #[test]
    fn sec_fetch_mode_other_values_do_not_match() {
        let h = headers(&[("Sec-Fetch-Mode", "cors"), ("Sec-Fetch-Dest", "empty")]);
        assert_eq!(classify(&h), ClientClass::Programmatic);
    }

    #[test]
    fn sec_fetch_dest_document() {
        let h = headers(&[("Sec-Fetch-Dest", "document")]);
        assert_eq!(matching_rule(&h), Some(&BROWSER_RULES[1]));
    }

    #[test]
    fn first_matching_rule_wins() {
        let h = headers(&[
            ("Sec-Fetch-Dest", "document"),
            ("Sec-Fetch-Mode", "navigate"),
            ("Accept", "text/html"),
        ]);
        assert_eq!(matching_rule(&h), Some(&BROWSER_RULES[0]));
    }

    #[test]
    fn accept_html_substring() {
        let h = headers(&[("Accept", "application/xhtml+xml,TEXT/HTML;q=0.9")]);
        assert_eq!(matching_rule(&h), Some(&BROWSER_RULES[2]));
    }

    #[test]
    fn every_ua_token_is_browser_like() {
        for token in BROWSER_UA_TOKENS {
            let ua = format!("Something {}", token.to_uppercase());
            let h = headers(&[("User-Agent", ua.as_str())]);
            assert_eq!(classify(&h), ClientClass::BrowserLike, "token {token}");
        }
    }

    #[test]
    fn edge_needs_slash_token() {
        let h = headers(&[("User-Agent", "hedge-fetcher")]);
        assert_eq!(classify(&h), ClientClass::Programmatic);
    }

    #[test]
    fn each_rule_fires_alone() {
        let samples: [(&str, &str); 4] = [
            ("Sec-Fetch-Mode", "navigate"),
            ("Sec-Fetch-Dest", "document"),
            ("Accept", "text/html"),
            ("User-Agent", "Firefox/128.0"),
        ];
        assert_eq!(samples.len(), BROWSER_RULES.len());
        for (i, pair) in samples.iter().enumerate() {
            let h = headers(&[*pair]);
            assert_eq!(matching_rule(&h), Some(&BROWSER_RULES[i]));
        }
    }
}
