//! Hosting the router on hyper.
//!
//! # Shutdown
//!
//! SIGTERM or Ctrl-C stops the accept loop at once. Connections already open
//! keep running until their in-flight requests finish, then
//! [`Server::serve`] returns.
//!
//! # Client disconnects
//!
//! Each request is one future driven by hyper. If the client goes away
//! before a response is ready, hyper drops that future: any pending await on
//! a collaborator is abandoned and nothing is written for the request.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::failure::HttpError;
use crate::request::Request;
use crate::router::Router;
use crate::status::Status;

/// Listens on one socket address and feeds every request to a [`Router`].
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Parses `addr`; nothing is bound until [`serve`](Server::serve).
    ///
    /// ```rust
    /// use sluice::Server;
    /// let server = Server::bind("0.0.0.0:4000").unwrap();
    /// ```
    pub fn bind(addr: &str) -> Result<Self, Error> {
        let addr = addr
            .parse()
            .map_err(|source| Error::Addr { addr: addr.to_owned(), source })?;
        Ok(Self { addr })
    }

    pub fn from_addr(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Serves until a shutdown signal arrives and every open connection has
    /// drained.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_until(router, shutdown_signal()).await
    }

    /// Like [`serve`](Server::serve), but stops accepting when `shutdown`
    /// resolves instead of on a process signal.
    pub async fn serve_until(self, router: Router, shutdown: impl Future<Output = ()>) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let router = Arc::new(router);
        let mut connections = JoinSet::new();

        info!(addr = %self.addr, routes = router.routes().len(), "listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Shutdown wins over queued connections.
                biased;

                () = &mut shutdown => break,

                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        connections.spawn(connection(Arc::clone(&router), stream, peer));
                    }
                    Err(e) => warn!("accept failed: {e}"),
                },

                // Reap finished connections.
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        info!(open = connections.len(), "shutting down, draining connections");
        while connections.join_next().await.is_some() {}
        info!("stopped");
        Ok(())
    }
}

/// Drives one connection (HTTP/1.1 or HTTP/2) to completion.
async fn connection(router: Arc<Router>, stream: TcpStream, peer: SocketAddr) {
    let service = service_fn(move |req| handle(Arc::clone(&router), req));

    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
        .serve_connection(TokioIo::new(stream), service)
        .await
    {
        error!(%peer, "connection error: {e}");
    }
}

/// Buffers the body and hands the request to the router. Never fails: every
/// error is rendered by the router's filter chain.
async fn handle(router: Arc<Router>, req: hyper::Request<Incoming>) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let response = match body.collect().await {
        Ok(collected) => router.dispatch(Request::new(parts, collected.to_bytes())).await,
        Err(e) => {
            let error = HttpError::new(Status::BadRequest, format!("Unreadable request body: {e}"), "Server");
            router.render(error.into(), &parts.method, parts.uri.path())
        }
    };

    Ok(response.into_inner())
}

/// Resolves on the first SIGTERM or Ctrl-C. A signal that cannot be
/// installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
