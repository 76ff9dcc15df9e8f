//! The single output of the access gate.

use crate::name::ScriptName;

/// Why a decoy page is shown instead of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoyKind {
    /// View mode: confirms the script exists.
    Exists,
    /// Raw mode from a browser-like client.
    RawBlocked,
}

/// Body format of a "not found" response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundFormat {
    Html,
    PlainText,
}

/// Outcome of one request. Maps 1:1 onto status, content type and body source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Deliver the script bytes verbatim.
    AllowRaw { name: ScriptName, content: Vec<u8> },
    ShowDecoy { name: ScriptName, kind: DecoyKind },
    ShowNotFound { name: ScriptName, format: NotFoundFormat },
    /// Ask for the shared key.
    AuthChallenge { name: ScriptName },
    /// Re-ask for the shared key, flagged as a wrong key.
    AuthRejected { name: ScriptName },
    BadRequest,
    MethodNotAllowed { allow: &'static str },
    InternalError,
}

impl AccessDecision {
    pub fn status(&self) -> u16 {
        match self {
            AccessDecision::AllowRaw { .. } | AccessDecision::ShowDecoy { .. } => 200,
            AccessDecision::ShowNotFound { .. } => 404,
            AccessDecision::AuthChallenge { .. } | AccessDecision::AuthRejected { .. } => 401,
            AccessDecision::BadRequest => 400,
            AccessDecision::MethodNotAllowed { .. } => 405,
            AccessDecision::InternalError => 500,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AccessDecision::AllowRaw { .. } => "allow_raw",
            AccessDecision::ShowDecoy {
                kind: DecoyKind::Exists,
                ..
            } => "show_exists",
            AccessDecision::ShowDecoy {
                kind: DecoyKind::RawBlocked,
                ..
            } => "show_decoy",
            AccessDecision::ShowNotFound { .. } => "not_found",
            AccessDecision::AuthChallenge { .. } => "auth_challenge",
            AccessDecision::AuthRejected { .. } => "auth_rejected",
            AccessDecision::BadRequest => "bad_request",
            AccessDecision::MethodNotAllowed { .. } => "method_not_allowed",
            AccessDecision::InternalError => "internal_error",
        }
    }

    pub fn script_name(&self) -> Option<&ScriptName> {
        match self {
            AccessDecision::AllowRaw { name, .. }
            | AccessDecision::ShowDecoy { name, .. }
            | AccessDecision::ShowNotFound { name, .. }
            | AccessDecision::AuthChallenge { name }
            | AccessDecision::AuthRejected { name } => Some(name),
            AccessDecision::BadRequest
            | AccessDecision::MethodNotAllowed { .. }
            | AccessDecision::InternalError => None,
        }
    }
}
