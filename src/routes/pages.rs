use crate::auth::CurrentUser;
use crate::database::boundary::BoundaryRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::database::waypoint::WaypointRepository;
use crate::error::app_error::AppError;
use crate::models::boundary::BoundaryResponse;
use crate::models::waypoint::WaypointResponse;
use crate::service::reference::{demo_properties, seasons};
use crate::views::{self, Banner, Page};
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::{State, get, routes};
use sqlx::PgPool;

#[get("/")]
pub fn index(current_user: Option<CurrentUser>, flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    let banner = flash.map(Banner::from);
    RawHtml(views::index_page(current_user.as_ref(), banner.as_ref()))
}

#[get("/map")]
pub async fn map(current_user: Option<CurrentUser>, pool: &State<PgPool>, flash: Option<FlashMessage<'_>>) -> Result<Page, AppError> {
    let Some(current_user) = current_user else {
        return Ok(Page::Flash(Flash::warning(Redirect::to("/login"), "Please log in to view the map.")));
    };

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let waypoints: Vec<WaypointResponse> = repo.list_waypoints(&current_user.id).await?.iter().map(WaypointResponse::from).collect();
    let boundaries: Vec<BoundaryResponse> = repo.list_boundaries(&current_user.id).await?.iter().map(BoundaryResponse::from).collect();

    let banner = flash.map(Banner::from);
    Ok(Page::Html(RawHtml(views::map_page(
        &current_user,
        banner.as_ref(),
        &demo_properties(),
        &waypoints,
        &boundaries,
    ))))
}

#[get("/seasons")]
pub fn seasons_table(current_user: Option<CurrentUser>, flash: Option<FlashMessage<'_>>) -> Result<RawHtml<String>, AppError> {
    let banner = flash.map(Banner::from);
    Ok(RawHtml(views::seasons_page(current_user.as_ref(), banner.as_ref(), seasons()?)))
}

#[get("/weather")]
pub fn weather(current_user: Option<CurrentUser>, flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    let banner = flash.map(Banner::from);
    RawHtml(views::weather_page(current_user.as_ref(), banner.as_ref()))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![index, map, seasons_table, weather]
}
