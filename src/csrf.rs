use crate::error::app_error::AppError;
use rocket::http::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

pub const CSRF_COOKIE: &str = "csrf";

/// Token to embed in a rendered form. The same value sits in a private
/// cookie and both must come back together on submit.
pub fn issue_token(cookies: &CookieJar<'_>, secure: bool) -> String {
    if let Some(existing) = cookies.get_private(CSRF_COOKIE) {
        return existing.value().to_string();
    }

    let token = Uuid::new_v4().simple().to_string();
    cookies.add_private(
        Cookie::build((CSRF_COOKIE, token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(secure)
            .build(),
    );
    token
}

pub fn verify_token(cookies: &CookieJar<'_>, submitted: &str) -> Result<(), AppError> {
    let expected = cookies.get_private(CSRF_COOKIE);
    if expected.as_ref().is_some_and(|cookie| tokens_match(cookie.value(), submitted)) {
        return Ok(());
    }

    tracing::warn!(has_cookie = expected.is_some(), submitted = !submitted.is_empty(), "form token mismatch");
    Err(AppError::FormExpired)
}

fn tokens_match(expected: &str, submitted: &str) -> bool {
    !expected.is_empty()
        && expected.len() == submitted.len()
        && expected.bytes().zip(submitted.bytes()).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}
