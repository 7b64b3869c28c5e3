use std::convert::Infallible;
use std::path::Path;

use axum::{
    body::Body,
    extract::Request,
    response::Response,
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

/// Page served, with status 404, for any missing asset
pub const NOT_FOUND_PAGE: &str = "404.html";

/// Serve a file from the public directory. `/` resolves to `index.html`.
pub async fn serve(public_dir: &Path, request: Request) -> Response {
    let not_found = ServeFile::new(public_dir.join(NOT_FOUND_PAGE));
    let service = ServeDir::new(public_dir).not_found_service(not_found);

    let result: Result<_, Infallible> = service.oneshot(request).await;
    match result {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{self, StatusCode};
    use std::path::PathBuf;

    fn public_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public")
    }

    fn get(path: &str) -> Request {
        http::Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn root_serves_index() {
        let response = serve(&public_dir(), get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_file_serves_404_page() {
        let response = serve(&public_dir(), get("/no/such/file.js")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
