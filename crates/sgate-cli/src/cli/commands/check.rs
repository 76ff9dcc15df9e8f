//! Check command: run one request through the gate offline and print the outcome.

use anyhow::{Context, Result};
use sgate_core::config::GateConfig;
use sgate_core::request::{AccessMode, GateRequest, RequestHeaders, RequestMethod};
use sgate_core::variant::GateResponse;

#[derive(Debug, Clone)]
pub struct CheckArgs {
    pub name: String,
    pub raw: bool,
    pub method: String,
    pub headers: Vec<String>,
    pub key: Option<String>,
}

/// Parses a `Name: value` header argument.
pub(crate) fn parse_header(arg: &str) -> Result<(String, String)> {
    let (name, value) = arg
        .split_once(':')
        .with_context(|| format!("header {arg:?} must look like \"Name: value\""))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("header {arg:?} has an empty name");
    }
    Ok((name.to_string(), value.trim().to_string()))
}

pub(crate) fn build_request(args: &CheckArgs) -> Result<GateRequest> {
    let mut headers = RequestHeaders::new();
    for h in &args.headers {
        let (name, value) = parse_header(h)?;
        headers.insert(&name, &value);
    }
    let mode = if args.raw {
        AccessMode::Raw
    } else {
        AccessMode::View
    };
    let mut req = GateRequest::get(args.name.clone(), mode)
        .with_method(RequestMethod::parse(&args.method))
        .with_headers(headers);
    if let Some(key) = &args.key {
        req = req.with_key(key.clone());
    }
    Ok(req)
}

fn print_response(resp: &GateResponse) {
    println!("status: {}", resp.status);
    for (name, value) in &resp.headers {
        println!("{name}: {value}");
    }
    println!("body: {} bytes", resp.body.len());
}

pub async fn run_check(cfg: &GateConfig, args: &CheckArgs) -> Result<()> {
    let gate = cfg.build_gate().context("invalid access configuration")?;
    let req = build_request(args)?;
    let resp = tokio::task::spawn_blocking(move || gate.handle(&req))
        .await
        .context("gate evaluation panicked")?;
    print_response(&resp);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(headers: &[&str]) -> CheckArgs {
        CheckArgs {
            name: "loader".into(),
            raw: true,
            method: "post".into(),
            headers: headers.iter().map(|s| s.to_string()).collect(),
            key: Some("k".into()),
        }
    }

    #[test]
    fn parse_header_splits_on_first_colon() {
        assert_eq!(
            parse_header("Accept: text/html; q=0.9").unwrap(),
            ("Accept".to_string(), "text/html; q=0.9".to_string())
        );
        assert_eq!(
            parse_header("X-Time:12:30").unwrap(),
            ("X-Time".to_string(), "12:30".to_string())
        );
    }

    #[test]
    fn parse_header_rejects_malformed() {
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn build_request_maps_all_fields() {
        let req = build_request(&args(&["User-Agent: curl/8.0"])).unwrap();
        assert_eq!(req.method, RequestMethod::Post);
        assert_eq!(req.mode, AccessMode::Raw);
        assert_eq!(req.headers.get("user-agent"), "curl/8.0");
        assert_eq!(req.presented_key.as_deref(), Some("k"));
    }

    #[test]
    fn build_request_propagates_bad_header() {
        assert!(build_request(&args(&["broken"])).is_err());
    }
}
