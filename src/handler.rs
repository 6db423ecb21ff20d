use crate::config::Config;
use crate::logger;
use crate::response;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// The only functional route. Everything else 404s.
pub const API_ROUTE: &str = "/api/get";

/// Check HTTP method and return an early response if not GET/HEAD.
/// Returns Some(response) for OPTIONS/405, None to continue processing.
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(response::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(response::build_405_response())
        }
    }
}

/// Validate the declared Content-Length against the configured maximum.
/// The body itself is never read; only the header is consulted.
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let size_str = content_length.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Declared body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(response::build_413_response())
        }
        _ => None,
    }
}

/// Dispatch one request. Generic over the body type because nothing here
/// consumes a body; tests drive it with empty requests.
pub async fn handle_request<B>(
    req: Request<B>,
    remote_addr: SocketAddr,
    config: Arc<Config>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let is_head = *req.method() == Method::HEAD;

    let resp = check_http_method(req.method(), config.http.enable_cors)
        .or_else(|| check_body_size(&req, config.http.max_body_size))
        .unwrap_or_else(|| match req.uri().path() {
            API_ROUTE => response::build_api_response(&config.http, is_head),
            _ => response::build_404_response(),
        });

    if config.logging.access_log {
        let body_bytes = resp.body().size_hint().exact().unwrap_or(0);
        logger::log_access(
            &remote_addr,
            req.method(),
            req.uri(),
            req.version(),
            resp.status().as_u16(),
            body_bytes,
        );
    }

    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                workers: None,
            },
            logging: LoggingConfig { access_log: false },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig {
                default_content_type: "text/html; charset=utf-8".to_string(),
                server_name: "api-demo-server/0.1".to_string(),
                enable_cors: false,
                max_body_size: 1_048_576,
            },
        })
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:54321".parse().unwrap()
    }

    fn request(method: &str, path: &str) -> Request<()> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(())
            .unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        use http_body_util::BodyExt;
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn get_api_route_returns_fixed_body() {
        let resp = handle_request(request("GET", API_ROUTE), peer(), test_config())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        assert_eq!(body_of(resp).await, response::API_BODY.as_bytes());
    }

    #[tokio::test]
    async fn repeated_requests_are_byte_identical() {
        let first = handle_request(request("GET", API_ROUTE), peer(), test_config())
            .await
            .unwrap();
        let second = handle_request(request("GET", API_ROUTE), peer(), test_config())
            .await
            .unwrap();
        assert_eq!(body_of(first).await, body_of(second).await);
    }

    #[tokio::test]
    async fn head_on_api_route_returns_headers_only() {
        let resp = handle_request(request("HEAD", API_ROUTE), peer(), test_config())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let resp = handle_request(request("GET", "/api/home"), peer(), test_config())
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn options_returns_no_content_with_allow() {
        let resp = handle_request(request("OPTIONS", API_ROUTE), peer(), test_config())
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
        assert_eq!(resp.headers()["allow"], "GET, HEAD, OPTIONS");
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn post_is_method_not_allowed() {
        let resp = handle_request(request("POST", API_ROUTE), peer(), test_config())
            .await
            .unwrap();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["allow"], "GET, HEAD, OPTIONS");
    }

    #[tokio::test]
    async fn oversized_declared_body_is_rejected() {
        let req = Request::builder()
            .method("GET")
            .uri(API_ROUTE)
            .header("content-length", "999999999")
            .body(())
            .unwrap();
        let resp = handle_request(req, peer(), test_config()).await.unwrap();
        assert_eq!(resp.status(), 413);
    }
}
