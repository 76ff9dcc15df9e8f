//! Rendering of access decisions into status, headers and body.
//!
//! Presentation lives behind [`VariantBuilder`]; this module owns everything
//! that must hold regardless of which pages are used: status codes, content
//! types and the security/caching headers on every response.

mod pages;

pub use pages::{escape_html, CardPages};

use crate::gate::{AccessDecision, NotFoundFormat};

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

pub const MSG_BAD_REQUEST: &str = "Invalid script name";
pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const MSG_NOT_FOUND: &str = "Script not found";
pub const MSG_INTERNAL_ERROR: &str = "Internal error";

const CSP_HTML: &str = "default-src 'none'; base-uri 'none'; form-action 'none'; \
frame-ancestors 'none'; img-src data:; style-src 'unsafe-inline'";
const CSP_HTML_FORM: &str = "default-src 'none'; base-uri 'none'; form-action 'self'; \
frame-ancestors 'none'; img-src data:; style-src 'unsafe-inline'";
const VARY_CLASSIFIER: &str = "Accept, User-Agent, Sec-Fetch-Dest, Sec-Fetch-Mode";

/// Renders the presentation body for every decision except
/// [`AccessDecision::AllowRaw`], whose body is always the script bytes.
///
/// Implementations must never embed script content.
pub trait VariantBuilder {
    fn render(&self, decision: &AccessDecision) -> String;
}

/// How a decision's body is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    PlainText,
    Html,
    /// HTML that submits a form back to the endpoint.
    HtmlForm,
}

impl BodyKind {
    pub fn of(decision: &AccessDecision) -> Self {
        match decision {
            AccessDecision::ShowDecoy { .. } => BodyKind::Html,
            AccessDecision::ShowNotFound {
                format: NotFoundFormat::Html,
                ..
            } => BodyKind::Html,
            AccessDecision::AuthChallenge { .. } | AccessDecision::AuthRejected { .. } => {
                BodyKind::HtmlForm
            }
            AccessDecision::AllowRaw { .. }
            | AccessDecision::ShowNotFound {
                format: NotFoundFormat::PlainText,
                ..
            }
            | AccessDecision::BadRequest
            | AccessDecision::MethodNotAllowed { .. }
            | AccessDecision::InternalError => BodyKind::PlainText,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            BodyKind::PlainText => TEXT_PLAIN,
            BodyKind::Html | BodyKind::HtmlForm => TEXT_HTML,
        }
    }
}

/// A fully rendered response, independent of any HTTP framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl GateResponse {
    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Builds the response for `decision`.
///
/// `classified` marks responses whose body depends on client classification
/// (the raw branch), which get a `Vary` header on top of `no-store`.
pub fn respond<B: VariantBuilder + ?Sized>(
    decision: &AccessDecision,
    classified: bool,
    builder: &B,
) -> GateResponse {
    let kind = BodyKind::of(decision);
    let mut headers: Vec<(&'static str, String)> = vec![
        ("Content-Type", kind.content_type().to_string()),
        ("X-Content-Type-Options", "nosniff".to_string()),
        (
            "Referrer-Policy",
            "strict-origin-when-cross-origin".to_string(),
        ),
        ("Cache-Control", "no-store".to_string()),
    ];
    match kind {
        BodyKind::PlainText => {}
        BodyKind::Html => {
            headers.push(("X-Frame-Options", "DENY".to_string()));
            headers.push(("Content-Security-Policy", CSP_HTML.to_string()));
        }
        BodyKind::HtmlForm => {
            headers.push(("X-Frame-Options", "DENY".to_string()));
            headers.push(("Content-Security-Policy", CSP_HTML_FORM.to_string()));
        }
    }
    if classified {
        headers.push(("Vary", VARY_CLASSIFIER.to_string()));
    }
    if let AccessDecision::MethodNotAllowed { allow } = decision {
        headers.push(("Allow", allow.to_string()));
    }

    let body = match decision {
        AccessDecision::AllowRaw { content, .. } => content.clone(),
        other => builder.render(other).into_bytes(),
    };

    GateResponse {
        status: decision.status(),
        headers,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::DecoyKind;
    use crate::name::sanitize;

    fn all_decisions() -> Vec<AccessDecision> {
        let name = sanitize("demo");
        vec![
            AccessDecision::AllowRaw {
                name: name.clone(),
                content: b"print('hi')".to_vec(),
            },
            AccessDecision::ShowDecoy {
                name: name.clone(),
                kind: DecoyKind::Exists,
            },
            AccessDecision::ShowDecoy {
                name: name.clone(),
                kind: DecoyKind::RawBlocked,
            },
            AccessDecision::ShowNotFound {
                name: name.clone(),
                format: NotFoundFormat::Html,
            },
            AccessDecision::ShowNotFound {
                name: name.clone(),
                format: NotFoundFormat::PlainText,
            },
            AccessDecision::AuthChallenge { name: name.clone() },
            AccessDecision::AuthRejected { name },
            AccessDecision::BadRequest,
            AccessDecision::MethodNotAllowed { allow: "GET" },
            AccessDecision::InternalError,
        ]
    }

    #[test]
    fn every_response_is_no_store_and_nosniff() {
        for d in all_decisions() {
            for classified in [false, true] {
                let resp = respond(&d, classified, &CardPages);
                assert_eq!(resp.header("cache-control"), Some("no-store"), "{}", d.kind());
                assert_eq!(resp.header("x-content-type-options"), Some("nosniff"));
                assert!(resp.header("referrer-policy").is_some());
            }
        }
    }

    #[test]
    fn html_responses_deny_framing() {
        for d in all_decisions() {
            let resp = respond(&d, false, &CardPages);
            let is_html = resp.content_type() == Some(TEXT_HTML);
            assert_eq!(resp.header("x-frame-options").is_some(), is_html);
            assert_eq!(resp.header("content-security-policy").is_some(), is_html);
        }
    }

    #[test]
    fn challenge_csp_allows_self_form_only() {
        let d = AccessDecision::AuthChallenge {
            name: sanitize("demo"),
        };
        let resp = respond(&d, true, &CardPages);
        let csp = resp.header("content-security-policy").unwrap();
        assert!(csp.contains("form-action 'self'"));
        assert!(csp.contains("frame-ancestors 'none'"));
    }

    #[test]
    fn status_and_plain_bodies() {
        let resp = respond(&AccessDecision::BadRequest, false, &CardPages);
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body_text(), MSG_BAD_REQUEST);

        let resp = respond(&AccessDecision::InternalError, true, &CardPages);
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body_text(), MSG_INTERNAL_ERROR);
        assert_eq!(resp.content_type(), Some(TEXT_PLAIN));
    }

    #[test]
    fn method_not_allowed_lists_allow() {
        let d = AccessDecision::MethodNotAllowed { allow: "GET, POST" };
        let resp = respond(&d, false, &CardPages);
        assert_eq!(resp.status, 405);
        assert_eq!(resp.header("allow"), Some("GET, POST"));
        assert_eq!(resp.body_text(), MSG_METHOD_NOT_ALLOWED);
    }

    #[test]
    fn vary_only_when_classified() {
        let d = AccessDecision::ShowNotFound {
            name: sanitize("x"),
            format: NotFoundFormat::PlainText,
        };
        assert!(respond(&d, false, &CardPages).header("vary").is_none());
        assert!(respond(&d, true, &CardPages)
            .header("vary")
            .unwrap()
            .contains("User-Agent"));
    }

    #[test]
    fn allow_raw_body_is_verbatim() {
        let content = vec![0xEF, 0xBB, 0xBF, b'-', b'-', b'\r', b'\n', 0xC3, 0xA9];
        let d = AccessDecision::AllowRaw {
            name: sanitize("bom"),
            content: content.clone(),
        };
        let resp = respond(&d, true, &CardPages);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, content);
        assert_eq!(resp.content_type(), Some(TEXT_PLAIN));
    }
}
