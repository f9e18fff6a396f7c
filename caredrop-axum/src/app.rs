use std::any::Any;

use axum::handler::Handler;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::upload::upload_file;
use crate::{UploadError, UploadState};

#[derive(Clone)]
pub struct UploadApp {
    pub state: UploadState,
    pub router: Router<()>,
}

impl UploadApp {
    pub fn new(state: UploadState) -> Self {
        Self {
            state,
            router: Router::new(),
        }
    }

    /// Mount the upload handler at `path`
    pub fn upload(mut self, path: &str) -> Self {
        self.router = self
            .router
            .route(path, post(upload_file).with_state(self.state.clone()));
        self
    }

    /// Mount a plain GET handler
    pub fn service<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + 'static,
        T: 'static,
    {
        self.router = self.router.route(path, get(handler));
        self
    }

    /// Wrap every route mounted so far with request ids, tracing, CORS and
    /// panic recovery. Call after the last route.
    pub fn with_layers(mut self) -> Self {
        self.router = self.router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(handle_panic)),
        );
        self
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

/// Gateway with `POST /upload` mounted and layers applied
pub fn gateway(state: UploadState) -> UploadApp {
    UploadApp::new(state).upload("/upload").with_layers()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");

    UploadError::Internal.into_response()
}
