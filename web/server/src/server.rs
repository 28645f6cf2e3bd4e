use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection};

use crate::codec::EncryptedSession;
use crate::config::ServerConfig;
use crate::errors::ErrorResponse;
use crate::handlers::{self, BetRequest};
use crate::middleware::with_request_logging;
use crate::ratelimit::{ClientLimiter, RateLimited, limit_game_routes};
use crate::service::{GameId, GameService};
use crate::store::MemoryStore;

/// Largest accepted request body.
const BODY_LIMIT: u64 = 16 * 1024;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub struct WebServer {
    service: Arc<GameService>,
    limiter: Arc<ClientLimiter>,
}

impl WebServer {
    /// Creates a server backed by an in-memory store.
    pub fn new(config: ServerConfig) -> Self {
        let service = GameService::new(config, Arc::new(MemoryStore::new()));
        Self::from_service(Arc::new(service))
    }

    pub fn from_service(service: Arc<GameService>) -> Self {
        let config = service.config();
        let limiter = ClientLimiter::new(config.rate_limit_requests(), config.rate_limit_window());
        Self {
            service,
            limiter: Arc::new(limiter),
        }
    }

    pub fn service(&self) -> &Arc<GameService> {
        &self.service
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let routes = self.routes();
        let Self { service, limiter } = self;
        let bind_addr = Self::bind_addr(service.config())?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(%addr, "web server listening");

        let task = tokio::spawn(server_future);
        let sweeper = tokio::spawn(Self::sweep(service, limiter));

        Ok(ServerHandle {
            addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
            sweeper,
        })
    }

    /// Periodically drops expired games and idle rate limit entries.
    async fn sweep(service: Arc<GameService>, limiter: Arc<ClientLimiter>) {
        let mut interval = tokio::time::interval(service.config().sweep_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let purged = service.purge();
            limiter.retain_recent();
            if purged > 0 {
                tracing::debug!(purged, "expired games dropped");
            }
        }
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(io_err) = err
            .source()
            .and_then(|source| source.downcast_ref::<std::io::Error>())
        {
            return ServerError::BindError(std::io::Error::new(io_err.kind(), io_err.to_string()));
        }

        ServerError::ConfigError(err.to_string())
    }

    /// Every route the server answers, wrapped in request logging. Game
    /// routes are rate limited per client.
    pub fn routes(&self) -> BoxedFilter<(Response,)> {
        let game = limit_game_routes(Arc::clone(&self.limiter))
            .and(Self::game_routes(&self.service));
        let routes = Self::health_route().or(game).unify();

        with_request_logging(routes)
            .recover(Self::handle_rejection)
            .unify()
            .boxed()
    }

    fn health_route() -> BoxedFilter<(Response,)> {
        warp::path!("health")
            .and(warp::get())
            .map(handlers::health)
            .boxed()
    }

    fn game_routes(service: &Arc<GameService>) -> BoxedFilter<(Response,)> {
        let create = warp::path!("game")
            .and(warp::post())
            .and(Self::with_service(service))
            .then(handlers::create_game);

        let restore = warp::path!("game" / "restore")
            .and(warp::post())
            .and(Self::with_service(service))
            .and(Self::json_body::<EncryptedSession>())
            .then(handlers::restore);

        let bet = warp::path!("game" / GameId / "bet")
            .and(warp::post())
            .and(Self::with_service(service))
            .and(Self::json_body::<BetRequest>())
            .then(
                |id: GameId, service: Arc<GameService>, request: BetRequest| {
                    handlers::place_bet(service, id, request)
                },
            );

        let hit = warp::path!("game" / GameId / "hit")
            .and(warp::post())
            .and(Self::with_service(service))
            .then(|id: GameId, service: Arc<GameService>| handlers::hit(service, id));

        let stand = warp::path!("game" / GameId / "stand")
            .and(warp::post())
            .and(Self::with_service(service))
            .then(|id: GameId, service: Arc<GameService>| handlers::stand(service, id));

        let surrender = warp::path!("game" / GameId / "surrender")
            .and(warp::post())
            .and(Self::with_service(service))
            .then(|id: GameId, service: Arc<GameService>| handlers::surrender(service, id));

        let status = warp::path!("game" / GameId / "status")
            .and(warp::get())
            .and(Self::with_service(service))
            .then(|id: GameId, service: Arc<GameService>| handlers::status(service, id));

        let export = warp::path!("game" / GameId / "export")
            .and(warp::get())
            .and(Self::with_service(service))
            .then(|id: GameId, service: Arc<GameService>| handlers::export(service, id));

        let flag = warp::path!("game" / GameId / "flag")
            .and(warp::get())
            .and(Self::with_service(service))
            .then(|id: GameId, service: Arc<GameService>| handlers::claim_reward(service, id));

        create
            .or(restore)
            .unify()
            .or(bet)
            .unify()
            .or(hit)
            .unify()
            .or(stand)
            .unify()
            .or(surrender)
            .unify()
            .or(status)
            .unify()
            .or(export)
            .unify()
            .or(flag)
            .unify()
            .boxed()
    }

    fn with_service(
        service: &Arc<GameService>,
    ) -> impl Filter<Extract = (Arc<GameService>,), Error = Infallible> + Clone + use<> {
        let service = Arc::clone(service);
        warp::any().map(move || Arc::clone(&service))
    }

    fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
    where
        T: serde::de::DeserializeOwned + Send,
    {
        warp::body::content_length_limit(BODY_LIMIT).and(warp::body::json())
    }

    /// Renders unmatched routes and malformed bodies as JSON errors.
    async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
        let (status, code, message) = if err.find::<RateLimited>().is_some() {
            (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "too many requests".to_owned(),
            )
        } else if err.is_not_found() {
            (StatusCode::NOT_FOUND, "not_found", "route not found".to_owned())
        } else if let Some(cause) = err.find::<warp::filters::body::BodyDeserializeError>() {
            (StatusCode::BAD_REQUEST, "invalid_request", cause.to_string())
        } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
            (
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                "method not allowed".to_owned(),
            )
        } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
            (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                "request body too large".to_owned(),
            )
        } else {
            (StatusCode::BAD_REQUEST, "invalid_request", format!("{err:?}"))
        };

        tracing::warn!(status = status.as_u16(), error = code, "{message}");
        Ok(ErrorResponse::new(code, message).into_response(status))
    }
}

pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    sweeper: JoinHandle<()>,
}

impl ServerHandle {
    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        self.sweeper.abort();

        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.await
                .map_err(|err| ServerError::ConfigError(format!("server task join error: {err}")))?;
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.sweeper.abort();

        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_accepts_ip_and_port() {
        let config = ServerConfig::new("127.0.0.1", 9000);
        let addr = WebServer::bind_addr(&config).expect("addr");
        assert_eq!(addr.port(), 9000);
    }

    #[tokio::test]
    async fn server_starts_and_stops() {
        let server = WebServer::new(ServerConfig::for_tests());
        let handle = server.start().await.expect("start");
        assert_ne!(handle.address().port(), 0);
        handle.shutdown().await.expect("shutdown");
    }
}
