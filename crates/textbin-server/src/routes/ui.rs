//! Browser editor served at `/`.
//!
//! The page is a single HTML document with the current text in a
//! `<textarea>`. The API token and theme ride along as `data-*` attributes
//! on `<body>` so the inline script can call `/save` with the right header.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;

use crate::state::AppState;

const TITLE: &str = "textbin - a single-document pastebin";

/// Build the UI router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(editor_page))
}

async fn editor_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let content = state.document.text().await;
    Html(render_page(
        &content,
        state.api_token.as_str(),
        state.theme.as_str(),
    ))
}

/// Fill the page template. Every substituted value is HTML-escaped.
fn render_page(content: &str, token: &str, theme: &str) -> String {
    let page = EDITOR_HTML
        .replace("{{TITLE}}", TITLE)
        .replace("{{VERSION}}", env!("CARGO_PKG_VERSION"))
        .replace("{{THEME}}", &escape_html(theme))
        .replace("{{TOKEN}}", &escape_html(token));
    // Content goes in last so a document containing a placeholder string is
    // never itself substituted.
    page.replace("{{CONTENT}}", &escape_html(content))
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Editor page template. The newline after `<textarea>` is swallowed by the
/// HTML parser, which keeps a leading newline in the document intact.
const EDITOR_HTML: &str = r##"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>{{TITLE}}</title>
<style>
*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
:root{--bg:#eff1f5;--fg:#4c4f69;--muted:#8c8fa1;--accent:#1e66f5;--panel:#e6e9ef;--font:ui-monospace,SFMono-Regular,Menlo,Consolas,monospace}
body[data-theme="dark"]{--bg:#303446;--fg:#c6d0f5;--muted:#a5adce;--accent:#8caaee;--panel:#292c3c}
@media(prefers-color-scheme:dark){body[data-theme="auto"]{--bg:#303446;--fg:#c6d0f5;--muted:#a5adce;--accent:#8caaee;--panel:#292c3c}}
body{font-family:var(--font);background:var(--bg);color:var(--fg);height:100vh;display:flex;flex-direction:column}
header{display:flex;align-items:center;justify-content:space-between;padding:8px 16px;background:var(--panel);font-size:13px}
header .brand{font-weight:700;color:var(--accent)}
header .status{color:var(--muted)}
button{font-family:var(--font);font-size:13px;padding:4px 12px;border-radius:4px;border:1px solid var(--accent);background:transparent;color:var(--accent);cursor:pointer}
textarea{flex:1;width:100%;padding:16px;border:none;outline:none;resize:none;background:var(--bg);color:var(--fg);font-family:var(--font);font-size:14px;line-height:1.5}
</style></head>
<body data-theme="{{THEME}}" data-token="{{TOKEN}}">
<header>
  <span class="brand">textbin <small>v{{VERSION}}</small></span>
  <span class="status" id="status">ctrl+s to save</span>
  <button id="save" type="button">Save</button>
</header>
<textarea id="editor" spellcheck="false" autofocus>
{{CONTENT}}</textarea>
<script>
(function(){
  var token = document.body.dataset.token;
  var editor = document.getElementById("editor");
  var status = document.getElementById("status");
  function save(){
    fetch("/save", {
      method: "POST",
      headers: {"Content-Type": "application/json", "X-API-Token": token},
      body: JSON.stringify({content: editor.value})
    }).then(function(resp){
      return resp.json().then(function(body){
        if (!resp.ok) { throw new Error(body.message || resp.statusText); }
        var written = resp.headers.get("X-Bytes-Written");
        status.textContent = written ? body.status + " (" + written + " bytes)" : body.status;
      });
    }).catch(function(err){ status.textContent = "error: " + err.message; });
  }
  document.getElementById("save").addEventListener("click", save);
  document.addEventListener("keydown", function(e){
    if ((e.ctrlKey || e.metaKey) && e.key === "s") { e.preventDefault(); save(); }
  });
})();
</script>
</body></html>
"##;
