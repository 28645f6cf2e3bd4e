//! Server configuration.
//!
//! Every setting can come from the command line or the environment; a `.env`
//! file in the working directory is loaded first by the binary.

use std::time::Duration;

use clap::Parser;

/// Balance a game must reach before the reward can be claimed.
pub const DEFAULT_REWARD_THRESHOLD: usize = 777_777;

/// Requests a single client may send to the game routes per window.
pub const DEFAULT_RATE_LIMIT: u32 = 256;

/// Command-line and environment arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "bjround-server", version, about = "Blackjack round engine over HTTP")]
pub struct ServerArgs {
    /// Host to bind to.
    #[arg(long, env = "BJROUND_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to.
    #[arg(long, short, env = "BJROUND_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Lifetime of a stored game after each write, in seconds.
    #[arg(long, env = "BJROUND_SESSION_TTL_SECS", default_value_t = 600)]
    pub session_ttl_secs: u64,

    /// Lifetime of a game after a surrender, in seconds.
    #[arg(long, env = "BJROUND_SURRENDER_TTL_SECS", default_value_t = 60)]
    pub surrender_ttl_secs: u64,

    /// Key used to encrypt exported sessions.
    #[arg(long, env = "AES_ENCRYPTION_KEY", hide_env_values = true)]
    pub aes_key: Option<String>,

    /// Reward handed out once the balance threshold is reached.
    #[arg(long, env = "FLAG", hide_env_values = true)]
    pub reward: Option<String>,

    /// Balance needed to claim the reward.
    #[arg(long, env = "BJROUND_REWARD_THRESHOLD", default_value_t = DEFAULT_REWARD_THRESHOLD)]
    pub reward_threshold: usize,

    /// Game route requests allowed per client and window.
    #[arg(long, env = "BJROUND_RATE_LIMIT", default_value_t = DEFAULT_RATE_LIMIT)]
    pub rate_limit: u32,

    /// Length of the rate limit window, in seconds.
    #[arg(long, env = "BJROUND_RATE_LIMIT_WINDOW_SECS", default_value_t = 60)]
    pub rate_limit_window_secs: u64,

    /// Emit logs as JSON lines.
    #[arg(long, env = "BJROUND_LOG_JSON")]
    pub log_json: bool,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    session_ttl: Duration,
    surrender_ttl: Duration,
    aes_key: Option<String>,
    reward: Option<String>,
    reward_threshold: usize,
    sweep_interval: Duration,
    rate_limit_requests: u32,
    rate_limit_window: Duration,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            session_ttl: Duration::from_secs(600),
            surrender_ttl: Duration::from_secs(60),
            aes_key: None,
            reward: None,
            reward_threshold: DEFAULT_REWARD_THRESHOLD,
            sweep_interval: Duration::from_secs(30),
            rate_limit_requests: DEFAULT_RATE_LIMIT,
            rate_limit_window: Duration::from_secs(60),
        }
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0).with_aes_key("0123456789abcdef")
    }

    #[must_use]
    pub fn with_aes_key(mut self, key: impl Into<String>) -> Self {
        self.aes_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_reward(mut self, reward: impl Into<String>) -> Self {
        self.reward = Some(reward.into());
        self
    }

    #[must_use]
    pub fn with_reward_threshold(mut self, threshold: usize) -> Self {
        self.reward_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_surrender_ttl(mut self, ttl: Duration) -> Self {
        self.surrender_ttl = ttl;
        self
    }

    /// Allows `requests` game route calls per client in every `window`.
    #[must_use]
    pub fn with_rate_limit(mut self, requests: u32, window: Duration) -> Self {
        self.rate_limit_requests = requests;
        self.rate_limit_window = window;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn surrender_ttl(&self) -> Duration {
        self.surrender_ttl
    }

    pub fn aes_key(&self) -> Option<&str> {
        self.aes_key.as_deref()
    }

    pub fn reward(&self) -> Option<&str> {
        self.reward.as_deref()
    }

    pub fn reward_threshold(&self) -> usize {
        self.reward_threshold
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    pub fn rate_limit_requests(&self) -> u32 {
        self.rate_limit_requests
    }

    pub fn rate_limit_window(&self) -> Duration {
        self.rate_limit_window
    }
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            session_ttl: Duration::from_secs(args.session_ttl_secs),
            surrender_ttl: Duration::from_secs(args.surrender_ttl_secs),
            aes_key: args.aes_key.filter(|key| !key.is_empty()),
            reward: args.reward,
            reward_threshold: args.reward_threshold,
            sweep_interval: Duration::from_secs(30),
            rate_limit_requests: args.rate_limit,
            rate_limit_window: Duration::from_secs(args.rate_limit_window_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_fill_in_defaults() {
        let args = ServerArgs::try_parse_from(["bjround-server", "--port", "9000"])
            .expect("parse args");
        let config = ServerConfig::from(args);

        assert_eq!(config.port(), 9000);
        assert_eq!(config.session_ttl(), Duration::from_secs(600));
        assert_eq!(config.surrender_ttl(), Duration::from_secs(60));
        assert_eq!(config.reward_threshold(), DEFAULT_REWARD_THRESHOLD);
        assert_eq!(config.rate_limit_requests(), 256);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
    }

    #[test]
    fn rate_limit_args_override_defaults() {
        let args = ServerArgs::try_parse_from([
            "bjround-server",
            "--rate-limit",
            "10",
            "--rate-limit-window-secs",
            "5",
        ])
        .expect("parse args");
        let config = ServerConfig::from(args);

        assert_eq!(config.rate_limit_requests(), 10);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(5));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let args = ServerArgs::try_parse_from(["bjround-server", "--aes-key", ""])
            .expect("parse args");
        assert!(ServerConfig::from(args).aes_key().is_none());
    }
}
