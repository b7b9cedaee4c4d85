/// Login and registration pages

use super::{
    escape,
    layout::{field_errors, non_field_errors, page},
};
use crate::forms::FormErrors;
use tasklist_shared::models::user::MAX_USERNAME_LENGTH;

/// Login form, prefilled with the submitted username after a failed attempt
pub fn login_page(username: &str, errors: &FormErrors) -> String {
    let body = format!(
        r#"{non_field}
<form method="post" action="/login/">
<label for="id_username">Username</label>
<input type="text" name="username" id="id_username" value="{username}" maxlength="{max_username}" autofocus required>
{username_errors}
<label for="id_password">Password</label>
<input type="password" name="password" id="id_password" required>
{password_errors}
<p><button type="submit">Login</button></p>
</form>
<p>Don't have an account? <a href="/register/">Register</a></p>"#,
        non_field = non_field_errors(errors),
        username = escape(username),
        max_username = MAX_USERNAME_LENGTH,
        username_errors = field_errors(errors, "username"),
        password_errors = field_errors(errors, "password"),
    );

    page("Login", None, &body)
}

/// Registration form; passwords are never echoed back
pub fn register_page(username: &str, errors: &FormErrors) -> String {
    let body = format!(
        r#"{non_field}
<form method="post" action="/register/">
<label for="id_username">Username</label>
<input type="text" name="username" id="id_username" value="{username}" maxlength="{max_username}" autofocus required>
{username_errors}
<label for="id_password">Password</label>
<input type="password" name="password" id="id_password" required>
{password_errors}
<label for="id_password_confirm">Password confirmation</label>
<input type="password" name="password_confirm" id="id_password_confirm" required>
{confirm_errors}
<p><button type="submit">Register</button></p>
</form>
<p>Already have an account? <a href="/login/">Login</a></p>"#,
        non_field = non_field_errors(errors),
        username = escape(username),
        max_username = MAX_USERNAME_LENGTH,
        username_errors = field_errors(errors, "username"),
        password_errors = field_errors(errors, "password"),
        confirm_errors = field_errors(errors, "password_confirm"),
    );

    page("Register", None, &body)
}
