// Message API module
// The single API operation this service exposes

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::http;

/// Path of the message endpoint
pub const MESSAGE_PATH: &str = "/api/message";

/// The constant payload text, produced fresh on every request
const MESSAGE_TEXT: &str = "Hello from Server";

/// Message endpoint payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Serve `GET /api/message`
///
/// Always 200 with the constant JSON body; request headers and body never
/// influence the payload. `HEAD` keeps the headers and drops the body.
pub fn serve_message(is_head: bool) -> Response<Full<Bytes>> {
    let payload = MessageResponse {
        message: MESSAGE_TEXT.to_string(),
    };

    let mut response = http::build_json_response(StatusCode::OK, &payload);
    if is_head {
        *response.body_mut() = Full::new(Bytes::new());
    }
    response
}
