use crate::auth::CurrentUser;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::request::Request;
use rocket::{Data, Response};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-request id, echoed back in `X-Request-Id`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
struct ReceivedAt(Instant);

/// Which part of the app served the request.
fn surface(path: &str) -> &'static str {
    if path == "/api" || path.starts_with("/api/") {
        "api"
    } else if path.starts_with("/static/") {
        "asset"
    } else {
        "page"
    }
}

/// Account and session the session guard resolved, if it ran and succeeded.
fn account_fields(user: Option<&CurrentUser>) -> (String, String) {
    match user {
        Some(user) => (user.id.to_string(), user.session_id.to_string()),
        None => ("anonymous".to_string(), "-".to_string()),
    }
}

/// Tags requests with an id, logs one line per completed request with the
/// account that made it, and sets the response security headers.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request Logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        let request_id = RequestId::new();
        request.local_cache(|| Some(request_id.clone()));
        request.local_cache(|| Some(ReceivedAt(Instant::now())));

        debug!(request_id = %request_id.0, method = %request.method(), path = %request.uri().path(), "request received");
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let request_id = request
            .local_cache(|| None::<RequestId>)
            .as_ref()
            .map(|r| r.0.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let elapsed_ms = request
            .local_cache(|| None::<ReceivedAt>)
            .as_ref()
            .map(|received| received.0.elapsed().as_millis() as u64)
            .unwrap_or_default();
        let (account, session) = account_fields(request.local_cache(|| None::<CurrentUser>).as_ref());

        response.set_header(Header::new("X-Request-Id", request_id.clone()));
        response.set_header(Header::new("X-Content-Type-Options", "nosniff"));
        response.set_header(Header::new("X-Frame-Options", "DENY"));
        response.set_header(Header::new("Cache-Control", "no-store"));

        let path = request.uri().path();
        let status = response.status();
        let surface = surface(path.as_str());

        if status.class().is_server_error() || (status == Status::Unauthorized && surface == "api") {
            warn!(request_id = %request_id, surface, method = %request.method(), path = %path, status = status.code, account = %account, session = %session, elapsed_ms, "request finished");
        } else if surface == "asset" {
            debug!(request_id = %request_id, surface, path = %path, status = status.code, elapsed_ms, "request finished");
        } else {
            info!(request_id = %request_id, surface, method = %request.method(), path = %path, status = status.code, account = %account, session = %session, elapsed_ms, "request finished");
        }
    }
}
