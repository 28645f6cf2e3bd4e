//! Per-client request throttling for the game routes.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use warp::path::Peek;
use warp::reject::{self, Reject};
use warp::{Filter, Rejection};

/// Rejection raised once a client has used up its window.
#[derive(Debug)]
pub struct RateLimited;

impl Reject for RateLimited {}

/// Keyed limiter holding one budget per client IP.
pub struct ClientLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
}

impl ClientLimiter {
    /// Allows `requests` per client in every `window`, all usable as a burst.
    pub fn new(requests: u32, window: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Spends one request from `ip`'s budget. Returns `false` when none is left.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }

    /// Forgets clients whose budget has fully refilled.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }
}

/// Counts every request under `/game` against the caller's IP.
///
/// Other paths pass through untouched. A request without a remote address
/// shares the unspecified-address budget.
pub fn limit_game_routes(
    limiter: Arc<ClientLimiter>,
) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path::peek()
        .and(warp::addr::remote())
        .and_then(move |path: Peek, remote: Option<SocketAddr>| {
            let limiter = Arc::clone(&limiter);
            async move {
                if path.segments().next() != Some("game") {
                    return Ok(());
                }

                let ip = remote.map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |addr| addr.ip());
                if limiter.check(ip) {
                    Ok(())
                } else {
                    tracing::warn!(%ip, path = path.as_str(), "rate limit exceeded");
                    Err(reject::custom(RateLimited))
                }
            }
        })
        .untuple_one()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_per_client() {
        let limiter = ClientLimiter::new(2, Duration::from_secs(3600));
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(limiter.check(a));
        assert!(limiter.check(a));
        assert!(!limiter.check(a));
        assert!(limiter.check(b));
    }

    #[test]
    fn zero_requests_still_allows_one() {
        let limiter = ClientLimiter::new(0, Duration::from_secs(3600));
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(limiter.check(ip));
        assert!(!limiter.check(ip));
    }

    #[tokio::test]
    async fn other_paths_are_not_counted() {
        let limiter = Arc::new(ClientLimiter::new(1, Duration::from_secs(3600)));
        let filter = limit_game_routes(limiter).map(|| "ok");

        for _ in 0..3 {
            let response = warp::test::request().path("/health").reply(&filter).await;
            assert_eq!(response.status(), 200);
        }

        let first = warp::test::request().path("/game/abc/status").reply(&filter).await;
        assert_eq!(first.status(), 200);
        assert!(
            warp::test::request()
                .path("/game/abc/status")
                .filter(&filter)
                .await
                .is_err()
        );
    }
}
