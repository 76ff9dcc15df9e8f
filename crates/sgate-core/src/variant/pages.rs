//! Card-style HTML pages for the decoy, not-found and key-challenge variants.

use super::{
    VariantBuilder, MSG_BAD_REQUEST, MSG_INTERNAL_ERROR, MSG_METHOD_NOT_ALLOWED, MSG_NOT_FOUND,
};
use crate::gate::{AccessDecision, DecoyKind, NotFoundFormat};
use crate::name::ScriptName;

const ACCENT_EXISTS: &str = "#60a5fa";
const ACCENT_NOT_FOUND: &str = "#fbbf24";
const ACCENT_BLOCKED: &str = "#fb7185";
const ACCENT_KEY: &str = "#a78bfa";

const ICON_SVG: &str = r#"<svg viewBox="0 0 24 24" aria-hidden="true" focusable="false">
  <path d="M7 3h7l3 3v15a2 2 0 0 1-2 2H7a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2z" fill="none" stroke="currentColor" stroke-width="1.6" />
  <path d="M14 3v4h4" fill="none" stroke="currentColor" stroke-width="1.6" />
  <path d="M8 12h8M8 16h8" fill="none" stroke="currentColor" stroke-width="1.6" stroke-linecap="round" />
</svg>"#;

const CARD_CSS: &str = r#"
    *{ box-sizing:border-box; }
    body{
      margin:0; min-height:100vh; display:grid; place-items:center; padding:28px 16px;
      font-family: ui-sans-serif, system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif;
      color:rgba(255,255,255,.92);
      background:
        radial-gradient(900px 560px at 20% 10%, var(--accentGlow), transparent 60%),
        linear-gradient(180deg, #060814, #0a1022);
    }
    .card{
      width:min(740px, 96vw); background:rgba(255,255,255,.055);
      border:1px solid rgba(255,255,255,.11); border-radius:16px;
      box-shadow:0 22px 70px rgba(0,0,0,.60); overflow:hidden;
    }
    .top{ display:flex; gap:14px; align-items:flex-start; padding:18px 18px 16px 18px; }
    .icon{
      width:44px; height:44px; border-radius:12px; display:grid; place-items:center;
      background:rgba(255,255,255,.06); border:1px solid rgba(255,255,255,.10);
      color:var(--accent); flex:0 0 auto;
    }
    .icon svg{ width:26px; height:26px; display:block; }
    h1{ margin:0; font-size:18px; font-weight:800; line-height:1.2; }
    .sub{ margin:6px 0 0 0; font-size:13px; color:rgba(255,255,255,.68); line-height:1.45; }
    .chips{ display:flex; flex-wrap:wrap; gap:8px; padding:0 18px 14px 18px; }
    .chip{
      padding:7px 10px; border-radius:999px; background:rgba(255,255,255,.06);
      border:1px solid rgba(255,255,255,.10); font-size:12px; white-space:nowrap;
    }
    .footer{ padding:14px 18px 18px 18px; color:rgba(255,255,255,.60); font-size:12px; line-height:1.5; }
    .footer code{
      font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace;
      padding:2px 6px; border-radius:8px; background:rgba(0,0,0,.30);
    }
    form{ display:flex; gap:8px; padding:0 18px 18px 18px; }
    input{ flex:1 1 auto; padding:9px 10px; border-radius:10px; border:1px solid rgba(255,255,255,.18);
      background:rgba(0,0,0,.30); color:inherit; }
    button{ padding:9px 14px; border-radius:10px; border:0; background:var(--accent); color:#060814; font-weight:700; }
    .error{ margin:0 18px 12px 18px; color:#fb7185; font-size:13px; }
"#;

/// Escapes `& < > " '` for interpolation into HTML text or attributes.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

struct Card<'a> {
    title: &'a str,
    subtitle: String,
    chips: &'a [&'a str],
    /// Trusted markup; never built from request data.
    hint_html: &'a str,
    accent: &'static str,
    /// Trusted markup inserted after the chips (the key form).
    extra_html: String,
}

fn build_card(card: &Card<'_>) -> String {
    let title = escape_html(card.title);
    let subtitle = escape_html(&card.subtitle);
    let chips: String = card
        .chips
        .iter()
        .map(|c| format!("<span class=\"chip\">{}</span>", escape_html(c)))
        .collect();

    let mut html = String::with_capacity(4096);
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\" />\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    html.push_str("  <meta name=\"color-scheme\" content=\"dark light\" />\n");
    html.push_str(&format!("  <title>{title}</title>\n"));
    html.push_str("  <style>\n    :root{ ");
    html.push_str(&format!(
        "--accent:{accent}; --accentGlow:{accent}33; }}",
        accent = card.accent
    ));
    html.push_str(CARD_CSS);
    html.push_str("  </style>\n</head>\n<body>\n  <main class=\"card\" role=\"main\">\n");
    html.push_str("    <div class=\"top\">\n");
    html.push_str(&format!("      <div class=\"icon\">{ICON_SVG}</div>\n"));
    html.push_str(&format!("      <div class=\"hgroup\">\n        <h1>{title}</h1>\n"));
    if !subtitle.is_empty() {
        html.push_str(&format!("        <p class=\"sub\">{subtitle}</p>\n"));
    }
    html.push_str("      </div>\n    </div>\n");
    if !chips.is_empty() {
        html.push_str(&format!("    <div class=\"chips\">{chips}</div>\n"));
    }
    html.push_str(&card.extra_html);
    if !card.hint_html.is_empty() {
        html.push_str(&format!("    <div class=\"footer\">{}</div>\n", card.hint_html));
    }
    html.push_str("  </main>\n</body>\n</html>\n");
    html
}

/// The default page set: a single dark card layout for every HTML variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardPages;

impl CardPages {
    fn exists_page(&self, name: &ScriptName) -> String {
        build_card(&Card {
            title: "At least I'm not in the files",
            subtitle: format!("Script found: {name}"),
            chips: &["Script endpoint", "View mode"],
            hint_html: "This page only confirms the script exists. Script clients fetch the raw \
                        content with <code>?raw=1</code>.",
            accent: ACCENT_EXISTS,
            extra_html: String::new(),
        })
    }

    fn not_found_page(&self, name: &ScriptName) -> String {
        build_card(&Card {
            title: "Script not found",
            subtitle: format!("No script named \"{name}\""),
            chips: &["404", "scripts/"],
            hint_html: "Check the requested name and that the file is present in \
                        <code>scripts/</code>.",
            accent: ACCENT_NOT_FOUND,
            extra_html: String::new(),
        })
    }

    fn raw_blocked_page(&self, name: &ScriptName) -> String {
        build_card(&Card {
            title: "Nice try.",
            subtitle: format!("Raw access blocked: {name}"),
            chips: &["Browser access blocked", "Raw endpoint"],
            hint_html: "This endpoint does not serve raw content to browsers.",
            accent: ACCENT_BLOCKED,
            extra_html: String::new(),
        })
    }

    fn key_page(&self, name: &ScriptName, wrong_key: bool) -> String {
        let state = if wrong_key { "wrong-key" } else { "challenge" };
        let mut form = String::new();
        if wrong_key {
            form.push_str("    <p class=\"error\" role=\"alert\">Wrong key.</p>\n");
        }
        form.push_str(&format!(
            "    <form method=\"post\" data-state=\"{state}\">\n\
             \x20     <input type=\"password\" name=\"key\" autocomplete=\"off\" \
             placeholder=\"Access key\" required />\n\
             \x20     <button type=\"submit\">Unlock</button>\n    </form>\n"
        ));
        build_card(&Card {
            title: "Key required",
            subtitle: format!("Protected script: {name}"),
            chips: &["401", "Raw endpoint"],
            hint_html: "Enter the access key to receive this script.",
            accent: ACCENT_KEY,
            extra_html: form,
        })
    }
}

impl VariantBuilder for CardPages {
    fn render(&self, decision: &AccessDecision) -> String {
        match decision {
            AccessDecision::ShowDecoy {
                name,
                kind: DecoyKind::Exists,
            } => self.exists_page(name),
            AccessDecision::ShowDecoy {
                name,
                kind: DecoyKind::RawBlocked,
            } => self.raw_blocked_page(name),
            AccessDecision::ShowNotFound {
                name,
                format: NotFoundFormat::Html,
            } => self.not_found_page(name),
            AccessDecision::ShowNotFound {
                format: NotFoundFormat::PlainText,
                ..
            } => MSG_NOT_FOUND.to_string(),
            AccessDecision::AuthChallenge { name } => self.key_page(name, false),
            AccessDecision::AuthRejected { name } => self.key_page(name, true),
            AccessDecision::BadRequest => MSG_BAD_REQUEST.to_string(),
            AccessDecision::MethodNotAllowed { .. } => MSG_METHOD_NOT_ALLOWED.to_string(),
            // Raw content never flows through presentation.
            AccessDecision::AllowRaw { .. } | AccessDecision::InternalError => {
                MSG_INTERNAL_ERROR.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::sanitize;

    #[test]
    fn escape_html_all_specials() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#039;&amp;&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn exists_page_names_script() {
        let html = CardPages.render(&AccessDecision::ShowDecoy {
            name: sanitize("loader"),
            kind: DecoyKind::Exists,
        });
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("Script found: loader"));
        assert!(html.contains("--accent:#60a5fa"));
    }

    #[test]
    fn blocked_page_differs_from_exists_page() {
        let name = sanitize("loader");
        let blocked = CardPages.render(&AccessDecision::ShowDecoy {
            name: name.clone(),
            kind: DecoyKind::RawBlocked,
        });
        assert!(blocked.contains("Nice try."));
        assert!(!blocked.contains("Script found"));
    }

    #[test]
    fn challenge_and_rejected_pages() {
        let name = sanitize("vault");
        let challenge = CardPages.render(&AccessDecision::AuthChallenge { name: name.clone() });
        assert!(challenge.contains("data-state=\"challenge\""));
        assert!(challenge.contains("name=\"key\""));
        assert!(!challenge.contains("Wrong key"));

        let rejected = CardPages.render(&AccessDecision::AuthRejected { name });
        assert!(rejected.contains("data-state=\"wrong-key\""));
        assert!(rejected.contains("Wrong key."));
    }

    #[test]
    fn plain_not_found_is_fixed_text() {
        let body = CardPages.render(&AccessDecision::ShowNotFound {
            name: sanitize("anything"),
            format: NotFoundFormat::PlainText,
        });
        assert_eq!(body, MSG_NOT_FOUND);
    }
}
