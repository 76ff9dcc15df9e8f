//! Access gate: the decision core.
//!
//! Combines the sanitized name, the requested mode, the method, the client
//! classification, script resolution and (under the shared-key policy) the
//! presented key into exactly one [`AccessDecision`] per request.
//!
//! The gate holds no per-request state. Resolution and the final read block
//! on the filesystem; call from `spawn_blocking` if used from async code.

mod decision;
mod secret;

pub use decision::{AccessDecision, DecoyKind, NotFoundFormat};
pub use secret::Secret;

use crate::classify::{classify, ClientClass};
use crate::name::{sanitize, ScriptName};
use crate::request::{AccessMode, GateRequest, RequestMethod};
use crate::store::{ResolvedScript, ScriptStore};
use crate::variant::{self, CardPages, GateResponse, VariantBuilder};
use std::io;

/// How raw content is protected.
#[derive(Debug, Clone)]
pub enum AccessPolicy {
    /// Raw content goes to programmatic clients; browsers get a decoy.
    Classifier,
    /// Raw content requires POSTing the shared key; GET raw is challenged.
    SharedKey(Secret),
}

impl AccessPolicy {
    pub fn permits(&self, method: &RequestMethod) -> bool {
        match (self, method) {
            (_, RequestMethod::Get) => true,
            (AccessPolicy::SharedKey(_), RequestMethod::Post) => true,
            _ => false,
        }
    }

    /// Value of the `Allow` header for this policy.
    pub fn allow_header(&self) -> &'static str {
        match self {
            AccessPolicy::Classifier => "GET",
            AccessPolicy::SharedKey(_) => "GET, POST",
        }
    }
}

pub struct AccessGate<S, B = CardPages> {
    store: S,
    policy: AccessPolicy,
    builder: B,
}

impl<S: ScriptStore> AccessGate<S, CardPages> {
    pub fn new(store: S, policy: AccessPolicy) -> Self {
        Self::with_builder(store, policy, CardPages)
    }
}

impl<S: ScriptStore, B: VariantBuilder> AccessGate<S, B> {
    pub fn with_builder(store: S, policy: AccessPolicy, builder: B) -> Self {
        Self {
            store,
            policy,
            builder,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Decides and renders the response for one request.
    pub fn handle(&self, req: &GateRequest) -> GateResponse {
        let decision = self.evaluate(req);
        let classified = raw_requested(req)
            && !matches!(
                decision,
                AccessDecision::MethodNotAllowed { .. } | AccessDecision::BadRequest
            );
        variant::respond(&decision, classified, &self.builder)
    }

    /// Decides the outcome of one request.
    pub fn evaluate(&self, req: &GateRequest) -> AccessDecision {
        let decision = self.decide(req);
        tracing::debug!(
            method = %req.method,
            mode = ?req.mode,
            script = decision.script_name().map(ScriptName::as_str).unwrap_or(""),
            decision = decision.kind(),
            "access decision"
        );
        decision
    }

    fn decide(&self, req: &GateRequest) -> AccessDecision {
        if !self.policy.permits(&req.method) {
            return AccessDecision::MethodNotAllowed {
                allow: self.policy.allow_header(),
            };
        }

        let name = sanitize(&req.raw_name);
        if name.is_empty() {
            return AccessDecision::BadRequest;
        }

        match (&self.policy, &req.method) {
            (AccessPolicy::SharedKey(secret), RequestMethod::Post) => {
                self.decide_key_submission(name, secret, req.presented_key.as_deref())
            }
            (policy, _) => match req.mode {
                AccessMode::View => self.decide_view(name),
                AccessMode::Raw => match policy {
                    AccessPolicy::SharedKey(_) => AccessDecision::AuthChallenge { name },
                    AccessPolicy::Classifier => self.decide_classified_raw(name, req),
                },
            },
        }
    }

    /// View mode never exposes content, only existence.
    fn decide_view(&self, name: ScriptName) -> AccessDecision {
        match self.store.resolve(&name) {
            Some(_) => AccessDecision::ShowDecoy {
                name,
                kind: DecoyKind::Exists,
            },
            None => AccessDecision::ShowNotFound {
                name,
                format: NotFoundFormat::Html,
            },
        }
    }

    fn decide_classified_raw(&self, name: ScriptName, req: &GateRequest) -> AccessDecision {
        let Some(script) = self.store.resolve(&name) else {
            return AccessDecision::ShowNotFound {
                name,
                format: NotFoundFormat::PlainText,
            };
        };
        let class = classify(&req.headers);
        tracing::debug!(script = %name, client = %class, "raw request classified");
        match class {
            ClientClass::BrowserLike => AccessDecision::ShowDecoy {
                name,
                kind: DecoyKind::RawBlocked,
            },
            ClientClass::Programmatic => self.deliver(script),
        }
    }

    fn decide_key_submission(
        &self,
        name: ScriptName,
        secret: &Secret,
        presented: Option<&str>,
    ) -> AccessDecision {
        if !secret.is_configured() {
            tracing::warn!("shared key policy active but no key configured; refusing");
            return AccessDecision::InternalError;
        }
        if !secret.verify(presented.unwrap_or("")) {
            return AccessDecision::AuthRejected { name };
        }
        match self.store.resolve(&name) {
            Some(script) => self.deliver(script),
            None => AccessDecision::ShowNotFound {
                name,
                format: NotFoundFormat::PlainText,
            },
        }
    }

    /// Reads the resolved script. A file that vanished since resolution is
    /// reported as not found; any other failure is an internal error.
    fn deliver(&self, script: ResolvedScript) -> AccessDecision {
        match self.store.read(&script) {
            Ok(content) => AccessDecision::AllowRaw {
                name: script.name,
                content,
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => AccessDecision::ShowNotFound {
                name: script.name,
                format: NotFoundFormat::PlainText,
            },
            Err(e) => {
                tracing::warn!(script = %script.name, error = %e, "script read failed");
                AccessDecision::InternalError
            }
        }
    }
}

/// True when the request targets raw content: `?raw=1`, or a key submission.
fn raw_requested(req: &GateRequest) -> bool {
    req.mode == AccessMode::Raw || req.method == RequestMethod::Post
}
