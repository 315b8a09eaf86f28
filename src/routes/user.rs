use crate::Config;
use crate::auth::{CurrentUser, clear_session_cookie, session_cookie, session_reference};
use crate::csrf::{issue_token, verify_token};
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::{LoginForm, RegisterForm};
use crate::service::auth::AuthService;
use crate::views::{self, Banner, Page};
use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::{State, get, post, routes};
use sqlx::PgPool;

#[get("/login")]
pub fn login_page(current_user: Option<CurrentUser>, config: &State<Config>, cookies: &CookieJar<'_>, flash: Option<FlashMessage<'_>>) -> Page {
    if current_user.is_some() {
        return Page::Redirect(Redirect::to("/map"));
    }
    let banner = flash.map(Banner::from);
    let token = issue_token(cookies, config.session.cookie_secure);
    Page::Html(RawHtml(views::login_page(banner.as_ref(), &token)))
}

#[post("/login", data = "<form>")]
pub async fn login(pool: &State<PgPool>, config: &State<Config>, cookies: &CookieJar<'_>, form: Form<LoginForm>) -> Result<Flash<Redirect>, AppError> {
    if let Err(e) = verify_token(cookies, &form.csrf_token) {
        return Ok(Flash::error(Redirect::to("/login"), e.user_message()));
    }

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let auth = AuthService::new(&repo, &config.session);

    match auth.login(&form.email, &form.password).await {
        Ok(session) => {
            cookies.add_private(session_cookie(session.cookie_value(), config.session.cookie_secure));
            Ok(Flash::success(Redirect::to("/map"), "Welcome back!"))
        }
        Err(e @ AppError::InvalidCredentials) => Ok(Flash::error(Redirect::to("/login"), e.user_message())),
        Err(e) => Err(e),
    }
}

#[get("/register")]
pub fn register_page(current_user: Option<CurrentUser>, config: &State<Config>, cookies: &CookieJar<'_>, flash: Option<FlashMessage<'_>>) -> Page {
    if current_user.is_some() {
        return Page::Redirect(Redirect::to("/map"));
    }
    let banner = flash.map(Banner::from);
    let token = issue_token(cookies, config.session.cookie_secure);
    Page::Html(RawHtml(views::register_page(banner.as_ref(), &token)))
}

#[post("/register", data = "<form>")]
pub async fn register(pool: &State<PgPool>, config: &State<Config>, cookies: &CookieJar<'_>, form: Form<RegisterForm>) -> Result<Flash<Redirect>, AppError> {
    if let Err(e) = verify_token(cookies, &form.csrf_token) {
        return Ok(Flash::error(Redirect::to("/register"), e.user_message()));
    }

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let auth = AuthService::new(&repo, &config.session);

    match auth.register(&form).await {
        Ok(_) => Ok(Flash::success(Redirect::to("/login"), "Account created. You can log in now.")),
        Err(e @ (AppError::DuplicateAccount(_) | AppError::InvalidInput(_) | AppError::Validation(_))) => {
            Ok(Flash::error(Redirect::to("/register"), e.user_message()))
        }
        Err(e) => Err(e),
    }
}

/// Ends the session if one is attached. Safe to hit without one.
#[get("/logout")]
pub async fn logout(pool: &State<PgPool>, config: &State<Config>, cookies: &CookieJar<'_>) -> Result<Flash<Redirect>, AppError> {
    let session_id = session_reference(cookies).map(|(session_id, _)| session_id);
    let repo = PostgresRepository { pool: pool.inner().clone() };
    AuthService::new(&repo, &config.session).logout(session_id.as_ref()).await?;

    clear_session_cookie(cookies);
    Ok(Flash::new(Redirect::to("/"), "info", "Signed out."))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![login_page, login, register_page, register, logout]
}
