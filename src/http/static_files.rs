//! Static serving of the frontend build output.
//!
//! Requests no proxied route claims end up here, as does `/` once the root
//! gate lets a client through.

use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{Request, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::StaticConfig;

/// File server for the dev server's own pages.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    dir: ServeDir,
    index: ServeFile,
    index_path: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl AsRef<Path>, index_file: &str) -> Self {
        let root = root.as_ref();
        let index_path = root.join(index_file);
        Self {
            dir: ServeDir::new(root),
            index: ServeFile::new(&index_path),
            index_path,
        }
    }

    pub fn from_config(config: &StaticConfig) -> Self {
        Self::new(&config.static_dir, config.index_file())
    }

    /// Path of the file served for `/`.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Serve `request` from disk. Missing files yield 404.
    pub async fn serve(&self, request: Request<Body>) -> Response<Body> {
        let result = if request.uri().path() == "/" {
            self.index.clone().oneshot(request).await
        } else {
            self.dir.clone().oneshot(request).await
        };

        match result {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_index_for_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.html"), "<h1>app</h1>").unwrap();

        let statics = StaticFiles::new(dir.path(), "app.html");
        let res = statics.serve(get("/")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_string(res).await, "<h1>app</h1>");
    }

    #[tokio::test]
    async fn test_serves_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.js"), "console.log(1)").unwrap();

        let statics = StaticFiles::new(dir.path(), "index.html");
        let res = statics.serve(get("/main.js")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_string(res).await, "console.log(1)");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let statics = StaticFiles::new(dir.path(), "index.html");
        assert_eq!(statics.serve(get("/")).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(statics.serve(get("/nope.css")).await.status(), StatusCode::NOT_FOUND);
    }
}
