//! HTTP response handlers.

use crate::utils::date::http_date;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tiny_http::{Header, Request, Response, StatusCode};

const XML_CONTENT_TYPE: &str = "application/xml; charset=UTF-8";
const PLAIN: &str = "text/plain; charset=UTF-8";

/// Freshness window advertised to HTTP caches, in seconds.
pub const MAX_AGE_SECS: i64 = 300;

/// Respond with the sitemap document.
///
/// The document is noindex (it points at indexable articles, it is not
/// one itself) and cacheable for [`MAX_AGE_SECS`].
pub fn respond_sitemap(
    request: Request,
    body: &[u8],
    last_modified: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<()> {
    let headers = [
        make_header("Content-Type", XML_CONTENT_TYPE),
        make_header("X-Robots-Tag", "noindex, follow"),
        make_header("Cache-Control", &format!("max-age={MAX_AGE_SECS}")),
        make_header("Last-Modified", &http_date(last_modified)),
        make_header("Expires", &http_date(now + Duration::seconds(MAX_AGE_SECS))),
    ];

    if request.method() == &tiny_http::Method::Head {
        let mut response = Response::empty(StatusCode(200));
        for header in headers {
            response = response.with_header(header);
        }
        request.respond(response)?;
        return Ok(());
    }

    let mut response = Response::from_data(body.to_vec()).with_status_code(StatusCode(200));
    for header in headers {
        response = response.with_header(header);
    }

    request.respond(response)?;
    Ok(())
}

/// Respond with 404 for any path other than the sitemap.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_plain(request, 404, b"404 Not Found")
}

/// Respond with 405 for methods other than GET/HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_data(b"405 Method Not Allowed".to_vec())
        .with_status_code(StatusCode(405))
        .with_header(make_header("Content-Type", PLAIN))
        .with_header(make_header("Allow", "GET, HEAD"));
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_plain(request, 503, b"503 Service Unavailable")
}

fn send_plain(request: Request, status: u16, body: &[u8]) -> Result<()> {
    let response = Response::from_data(body.to_vec())
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", PLAIN));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
