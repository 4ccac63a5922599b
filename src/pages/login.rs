use super::{escape, layout};

pub fn login_page(email: &str, error: Option<&str>) -> String {
    let error = error
        .map(|e| format!("<div class=\"error\">{}</div>", escape(e)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Performance Management System Login</h1>
{error}
<form method="post" action="/login">
  <p><label>Email <input type="email" name="email" value="{email}" required></label></p>
  <p><label>Password <input type="password" name="password" required></label></p>
  <p><button type="submit">Login</button></p>
</form>"#,
        email = escape(email),
    );

    layout("Login", None, &body)
}
