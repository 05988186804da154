//! HTML pages served by the handlers.
//!
//! Error messages passed in are fixed strings, never user input, so nothing is escaped.

use axum::response::Html;

/// Page renderer.
///
/// The stylesheet, script and service worker live under `/static`, so they are
/// only referenced when a static directory is being served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pages {
    assets: bool,
}

impl Pages {
    #[must_use]
    pub const fn new(assets: bool) -> Self {
        Self { assets }
    }

    fn page(self, title: &str, body: &str) -> Html<String> {
        let stylesheet = if self.assets {
            r#"<link rel="stylesheet" href="/static/style.css">"#
        } else {
            ""
        };

        Html(format!(
            r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>MindUWC - {title}</title>
{stylesheet}
</head><body>
{body}
</body></html>"#
        ))
    }

    #[must_use]
    pub fn home(self) -> Html<String> {
        let scripts = if self.assets {
            r#"<script src="/static/main.js" defer></script>
<script>
if ('serviceWorker' in navigator) {
  navigator.serviceWorker.register('/static/sw.js');
}
</script>"#
        } else {
            ""
        };

        let body = format!(
            r#"<header>
  <h1>MindUWC</h1>
  <nav><a href="/signin">Sign in</a> <a href="/register">Register</a></nav>
</header>
<main id="app"></main>
{scripts}"#
        );
        self.page("Home", &body)
    }

    #[must_use]
    pub fn signin(self, error: Option<&'static str>) -> Html<String> {
        let body = format!(
            r#"<div class="card">
  <h1>Sign in</h1>
  {error}
  {form}
  <div class="link">No account? <a href="/register">Register</a></div>
</div>"#,
            error = error_html(error),
            form = credentials_form("/signin", "Sign in", "current-password"),
        );
        self.page("Sign in", &body)
    }

    #[must_use]
    pub fn register(self, error: Option<&'static str>) -> Html<String> {
        let body = format!(
            r#"<div class="card">
  <h1>Register</h1>
  {error}
  {form}
  <div class="link">Already registered? <a href="/signin">Sign in</a></div>
</div>"#,
            error = error_html(error),
            form = credentials_form("/register", "Register", "new-password"),
        );
        self.page("Register", &body)
    }
}

fn error_html(error: Option<&'static str>) -> String {
    error
        .map(|e| format!(r#"<div class="error">{e}</div>"#))
        .unwrap_or_default()
}

fn credentials_form(action: &str, submit: &str, autocomplete: &str) -> String {
    format!(
        r#"<form method="POST" action="{action}">
    <div class="form-group">
      <label for="email">Email</label>
      <input type="email" id="email" name="email" required autocomplete="email">
    </div>
    <div class="form-group">
      <label for="password">Password</label>
      <input type="password" id="password" name="password" required autocomplete="{autocomplete}">
    </div>
    <button type="submit" class="btn btn-primary">{submit}</button>
  </form>"#
    )
}
