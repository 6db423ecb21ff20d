use crate::config::HttpConfig;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// The one payload this service exists to serve. Byte-identical on every
/// request; operators curl the route to confirm a deployment landed.
pub const API_BODY: &str = "<h1>API IS WORKING FINE</h1>";

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

pub fn build_api_response(http: &HttpConfig, is_head: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", &http.default_content_type)
        .header("Server", &http.server_name);

    if http.enable_cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from_static(API_BODY.as_bytes())
    };

    builder
        .body(Full::new(body))
        .expect("Failed to build response")
}

pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Not Found")))
        .expect("Failed to build 404 response")
}

pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", ALLOWED_METHODS)
        .body(Full::new(Bytes::from("Method Not Allowed")))
        .expect("Failed to build 405 response")
}

pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Request Entity Too Large")))
        .expect("Failed to build 413 response")
}

pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", ALLOWED_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS);
    }

    builder
        .body(Full::new(Bytes::new()))
        .expect("Failed to build OPTIONS response")
}
