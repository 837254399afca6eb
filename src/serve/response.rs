//! HTTP response writers.

use anyhow::{Result, anyhow};
use chrono::Utc;
use tiny_http::{Header, Request, Response, StatusCode};

use super::Reply;
use crate::generator::SitemapDocument;
use crate::node::Timestamp;

const XML: &str = "application/xml; charset=utf-8";
const PLAIN: &str = "text/plain; charset=utf-8";

/// Write `reply` to `request`. tiny_http drops the body of `HEAD` responses.
pub fn send(request: Request, reply: Reply) -> Result<()> {
    let status = reply.status();
    match reply {
        Reply::Document { document, etag } => {
            let headers = validator_headers(&document, &etag)?;
            let mut response = Response::from_string(document.content)
                .with_status_code(StatusCode(status))
                .with_header(make_header("Content-Type", XML)?);
            for header in headers {
                response.add_header(header);
            }
            request.respond(response)?;
        }
        Reply::NotModified { document, etag } => {
            let mut response = Response::empty(StatusCode(status));
            for header in validator_headers(&document, &etag)? {
                response.add_header(header);
            }
            request.respond(response)?;
        }
        Reply::MethodNotAllowed => {
            let response = text_response(status, "405 Method Not Allowed")?
                .with_header(make_header("Allow", "GET, HEAD")?);
            request.respond(response)?;
        }
        Reply::NotFound => request.respond(text_response(status, "404 Not Found")?)?,
        Reply::BadRequest(message) => {
            request.respond(text_response(status, &format!("400 Bad Request: {message}"))?)?;
        }
        Reply::Unavailable => {
            request.respond(text_response(status, "503 Service Unavailable")?)?;
        }
        Reply::Failed(_) => {
            request.respond(text_response(status, "500 Internal Server Error")?)?;
        }
    }
    Ok(())
}

/// First value of header `name`, compared case-insensitively.
pub fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.to_string())
}

fn validator_headers(document: &SitemapDocument, etag: &str) -> Result<Vec<Header>> {
    let mut headers = vec![make_header("ETag", etag)?];
    if let Some(last_modified) = &document.last_modified {
        headers.push(make_header("Last-Modified", &http_date(last_modified))?);
    }
    Ok(headers)
}

fn text_response(status: u16, body: &str) -> Result<Response<std::io::Cursor<Vec<u8>>>> {
    Ok(Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", PLAIN)?))
}

/// RFC 7231 IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(ts: &Timestamp) -> String {
    ts.with_timezone(&Utc)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header `{key}: {value}`"))
}
