//! HTTP front end for the `bjround` engine.
//!
//! Games live in a TTL-bounded session store keyed by UUID. Each request
//! loads the serialized state, applies one engine operation under a per-key
//! lock and writes it back. Sessions can be exported as an AES-encrypted blob
//! and restored under a new key. Game routes are rate limited per client IP.

pub mod codec;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod ratelimit;
pub mod server;
pub mod service;
pub mod store;

pub use codec::{CodecError, EncryptedSession, SessionCodec};
pub use config::{ServerArgs, ServerConfig};
pub use errors::{ErrorResponse, ErrorSeverity, GameError, IntoErrorResponse};
pub use logging::init_logging;
pub use ratelimit::{ClientLimiter, RateLimited};
pub use server::{ServerError, ServerHandle, WebServer};
pub use service::{GameId, GameService};
pub use store::{KeyLocks, MemoryStore, SessionStore};
