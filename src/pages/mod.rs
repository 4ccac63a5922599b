//! Server-rendered HTML. Every page is rebuilt from a freshly loaded view.

mod dashboard;
mod login;

use std::fmt::Write;

pub use dashboard::dashboard_page;
pub use login::login_page;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;display:flex;min-height:100vh}\
aside{width:16rem;background:#f3f4f6;padding:1rem}\
main{flex:1;padding:1.5rem}\
.card{border:1px solid #d1d5db;border-radius:6px;padding:1rem;margin-bottom:1rem}\
.error{background:#fee2e2;color:#991b1b;padding:.75rem;border-radius:4px}\
.warning{background:#fef3c7;padding:.75rem;border-radius:4px}\
.info{background:#e0f2fe;padding:.5rem;border-radius:4px;margin:.25rem 0}\
table{border-collapse:collapse}td,th{border:1px solid #d1d5db;padding:.25rem .5rem}\
form.inline{display:inline}";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, sidebar: Option<&str>, body: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLE}</style></head><body>",
        escape(title)
    );
    if let Some(sidebar) = sidebar {
        let _ = write!(html, "<aside>{sidebar}</aside>");
    }
    let _ = write!(html, "<main>{body}</main></body></html>");
    html
}

pub fn error_page(message: &str, guidance: Option<&str>) -> String {
    let mut body = format!(
        "<h1>Something went wrong</h1><div class=\"error\">{}</div>",
        escape(message)
    );
    if let Some(guidance) = guidance {
        let _ = write!(
            body,
            "<h2>How to fix this</h2><pre class=\"warning\">{}</pre>",
            escape(guidance)
        );
    }
    body.push_str("<p><a href=\"/dashboard\">Back to the dashboard</a></p>");
    layout("Performance Management System", None, &body)
}
