//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all dispatch handler
//! - Wire up middleware (tracing, request ID, timeout)
//! - Bind server to listener, shut down gracefully
//! - Dispatch requests: bypass hook, upstream forwarding or static serving

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{client::legacy::connect::HttpConnector, client::legacy::Client, rt::TokioExecutor};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::DevServerConfig;
use crate::cookies::{ClientIdentity, CookieStore};
use crate::http::forward::{forward, HttpClient};
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::static_files::StaticFiles;
use crate::observability::metrics;
use crate::routing::{RouteBuildError, Router as ProxyRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub client: HttpClient,
    pub statics: Arc<StaticFiles>,
}

/// The dev server: proxy routes plus static serving.
pub struct HttpServer {
    router: Router,
    config: DevServerConfig,
    store: CookieStore,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// `store` is shared by every route policy; keep a clone to inspect it.
    pub fn new(config: DevServerConfig, store: CookieStore) -> Result<Self, RouteBuildError> {
        let proxy_router = Arc::new(ProxyRouter::from_config(&config, store.clone())?);

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let statics = Arc::new(StaticFiles::from_config(&config.dev_server));
        tracing::debug!(index = %statics.index_path().display(), "Static files configured");

        let state = AppState {
            router: proxy_router,
            client,
            statics,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            store,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DevServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// The axum router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api = %self.config.upstreams.api,
            sso = %self.config.upstreams.sso,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!(identities = self.store.len(), "HTTP server stopped");
        Ok(())
    }
}

/// Main dispatch handler.
/// Looks up route, runs the bypass hook, then forwards or serves locally.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let identity = ClientIdentity::from_headers(request.headers());
    let path = request.uri().path().to_string();

    // 1. Match Route
    let Some(route) = state.router.match_request(&request) else {
        tracing::debug!(request_id = %request_id, path = %path, "No route matched, serving static");
        let response = state.statics.serve(request).await;
        metrics::record_request("static", response.status().as_u16(), start_time);
        return response;
    };

    tracing::debug!(
        request_id = %request_id,
        route = %route.name,
        method = %request.method(),
        path = %path,
        "Route matched"
    );

    // 2. Pre-proxy bypass
    if let Some(response) = route.policy.should_bypass(&request, &identity) {
        tracing::debug!(request_id = %request_id, route = %route.name, status = %response.status(), "Request bypassed");
        metrics::record_request(&route.name, response.status().as_u16(), start_time);
        return response;
    }

    // 3. Forward or serve
    let response = match &route.upstream {
        Some(upstream) => forward(&state.client, route, upstream, request, &identity).await,
        None => state.statics.serve(request).await,
    };

    metrics::record_request(&route.name, response.status().as_u16(), start_time);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::CookiePair;
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    fn get_root(user_agent: &str) -> Request<Body> {
        Request::builder()
            .uri("/")
            .header(header::USER_AGENT, user_agent)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_gate_in_process() {
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(dist.path().join("index.html"), "app").unwrap();

        let mut config = DevServerConfig::default();
        config.dev_server.static_dir = dist.path().display().to_string();
        let store = CookieStore::new();
        let server = HttpServer::new(config, store.clone()).unwrap();

        let res = server.router().oneshot(get_root("ua")).await.unwrap();
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers()[header::LOCATION], "/login");
        assert!(res.headers().contains_key(X_REQUEST_ID));

        store.merge(&ClientIdentity::new("ua"), [CookiePair::new("sid", "abc")]);
        let res = server.router().oneshot(get_root("ua")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = server.router().oneshot(get_root("other")).await.unwrap();
        assert_eq!(res.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = DevServerConfig::default();
        config.upstreams.api = format!("http://{addr}");
        let server = HttpServer::new(config, CookieStore::new()).unwrap();

        let req = Request::builder()
            .uri("/api/users")
            .body(Body::empty())
            .unwrap();
        let res = server.router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }
}
