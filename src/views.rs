use crate::auth::CurrentUser;
use crate::models::boundary::BoundaryResponse;
use crate::models::reference::{DemoProperty, Season};
use crate::models::waypoint::WaypointResponse;
use crate::util::escape_html;
use rocket::Responder;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use serde::Serialize;

/// What a page handler sends back: the page itself or a redirect.
#[derive(Responder)]
pub enum Page {
    Html(RawHtml<String>),
    Redirect(Redirect),
    Flash(Flash<Redirect>),
}

/// Banner carried over from the previous redirect.
pub struct Banner {
    pub kind: String,
    pub message: String,
}

impl From<FlashMessage<'_>> for Banner {
    fn from(flash: FlashMessage<'_>) -> Self {
        Self {
            kind: flash.kind().to_string(),
            message: flash.message().to_string(),
        }
    }
}

fn nav(user: Option<&CurrentUser>) -> String {
    let account = match user {
        Some(user) => format!(
            r#"<span class="navbar-text me-3" title="{} &lt;{}&gt;">Hi, {}</span><a class="btn btn-outline-light btn-sm" href="/logout">Log out</a>"#,
            escape_html(&user.full_name()),
            escape_html(&user.email),
            escape_html(&user.first_name)
        ),
        None => r#"<a class="btn btn-outline-light btn-sm me-2" href="/login">Log in</a><a class="btn btn-success btn-sm" href="/register">Register</a>"#.to_string(),
    };

    format!(
        r#"<nav class="navbar navbar-dark bg-dark px-3">
  <a class="navbar-brand" href="/">BetterHunt</a>
  <div>
    <a class="nav-link d-inline text-light" href="/map">Map</a>
    <a class="nav-link d-inline text-light" href="/seasons">Seasons</a>
    <a class="nav-link d-inline text-light" href="/weather">Weather</a>
  </div>
  <div>{account}</div>
</nav>"#
    )
}

fn banner(flash: Option<&Banner>) -> String {
    flash
        .map(|b| {
            let kind = match b.kind.as_str() {
                "success" | "warning" | "danger" | "info" => b.kind.as_str(),
                "error" => "danger",
                _ => "secondary",
            };
            format!(r#"<div class="alert alert-{}" role="alert">{}</div>"#, kind, escape_html(&b.message))
        })
        .unwrap_or_default()
}

pub fn layout(title: &str, user: Option<&CurrentUser>, flash: Option<&Banner>, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title} | BetterHunt</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
  {head}
</head>
<body>
{nav}
<main class="container py-4">
{banner}
{body}
</main>
</body>
</html>"#,
        title = escape_html(title),
        nav = nav(user),
        banner = banner(flash),
    )
}

pub fn index_page(user: Option<&CurrentUser>, flash: Option<&Banner>) -> String {
    let body = r#"<h1>Hunt smarter.</h1>
<p class="lead">Property lines, waypoints, season dates and the week's weather in one place.</p>
<a class="btn btn-success" href="/map">Open the map</a>"#;
    layout("Home", user, flash, "", body)
}

fn csrf_field(token: &str) -> String {
    format!(r#"<input type="hidden" name="csrf_token" value="{}">"#, escape_html(token))
}

pub fn login_page(flash: Option<&Banner>, csrf_token: &str) -> String {
    let body = format!(
        r#"<h2>Log In</h2>
<form method="post" action="/login" class="col-md-4">
  {csrf}
  <div class="mb-3"><label class="form-label" for="email">Email</label><input class="form-control" id="email" name="email" type="email" required></div>
  <div class="mb-3"><label class="form-label" for="password">Password</label><input class="form-control" id="password" name="password" type="password" required></div>
  <button class="btn btn-success" type="submit">Log In</button>
</form>"#,
        csrf = csrf_field(csrf_token)
    );
    layout("Log In", None, flash, "", &body)
}

pub fn register_page(flash: Option<&Banner>, csrf_token: &str) -> String {
    let body = format!(
        r#"<h2>Create Account</h2>
<form method="post" action="/register" class="col-md-4">
  {csrf}
  <div class="mb-3"><label class="form-label" for="first_name">First Name</label><input class="form-control" id="first_name" name="first_name" maxlength="50" required></div>
  <div class="mb-3"><label class="form-label" for="last_name">Last Name</label><input class="form-control" id="last_name" name="last_name" maxlength="50" required></div>
  <div class="mb-3"><label class="form-label" for="email">Email</label><input class="form-control" id="email" name="email" type="email" required></div>
  <div class="mb-3"><label class="form-label" for="password">Password</label><input class="form-control" id="password" name="password" type="password" minlength="3" required></div>
  <button class="btn btn-success" type="submit">Create Account</button>
</form>"#,
        csrf = csrf_field(csrf_token)
    );
    layout("Register", None, flash, "", &body)
}

pub fn seasons_page(user: Option<&CurrentUser>, flash: Option<&Banner>, seasons: &[Season]) -> String {
    let rows: String = seasons
        .iter()
        .map(|s| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&s.species),
                escape_html(&s.season),
                escape_html(&s.weapon),
                escape_html(&s.start),
                escape_html(&s.end),
                escape_html(s.bag_limit.as_deref().unwrap_or("")),
                escape_html(s.notes.as_deref().unwrap_or("")),
            )
        })
        .collect();

    let body = format!(
        r#"<h2>Hunting Seasons</h2>
<table class="table table-striped">
<thead><tr><th>Species</th><th>Season</th><th>Weapon</th><th>Opens</th><th>Closes</th><th>Bag Limit</th><th>Notes</th></tr></thead>
<tbody>
{rows}</tbody>
</table>"#
    );
    layout("Seasons", user, flash, "", &body)
}

pub fn weather_page(user: Option<&CurrentUser>, flash: Option<&Banner>) -> String {
    let body = r#"<h2>Weather</h2>
<form id="weatherForm" class="row g-2 mb-4">
  <div class="col-md-6"><input class="form-control" id="q" name="q" placeholder="City or zip"></div>
  <div class="col-auto"><button class="btn btn-success" type="submit">Get forecast</button></div>
</form>
<div id="weatherOut"></div>
<script src="/static/js/weather.js"></script>"#;
    layout("Weather", user, flash, "", body)
}

/// JSON for embedding in a `<script>` block.
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string()).replace("</", "<\\/")
}

pub fn map_page(user: &CurrentUser, flash: Option<&Banner>, properties: &[DemoProperty], waypoints: &[WaypointResponse], boundaries: &[BoundaryResponse]) -> String {
    let head = r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
  <style>#map { height: 70vh; }</style>"#;

    let body = format!(
        r#"<div class="d-flex gap-2 mb-2">
  <select id="basemapSelect" class="form-select w-auto"><option value="sat">Satellite</option><option value="topo">Topo</option><option value="osm">Street</option></select>
  <button id="locateBtn" class="btn btn-outline-secondary">Locate me</button>
  <button id="waypointBtn" class="btn btn-outline-secondary">Drop waypoint</button>
  <button id="drawPolyBtn" class="btn btn-outline-secondary">Draw boundary</button>
  <button id="finishPolyBtn" class="btn btn-success d-none">Finish boundary</button>
</div>
<div id="map"></div>
<ul id="propertyList" class="list-unstyled mt-3"></ul>
<script>
const PROPERTIES = {properties};
const WAYPOINTS = {waypoints};
const BOUNDARIES = {boundaries};
</script>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="/static/js/map.js"></script>"#,
        properties = script_json(&properties),
        waypoints = script_json(&waypoints),
        boundaries = script_json(&boundaries),
    );
    layout("Map", Some(user), flash, head, &body)
}
