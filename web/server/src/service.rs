//! Game service: one engine call per request, bracketed by a store load and save.

use std::sync::Arc;
use std::time::Duration;

use bjround::{Outcome, PlayerStatus, RoundEngine, RoundOptions, RoundState, RoundView};
use rand::Rng;
use uuid::Uuid;

use crate::codec::{EncryptedSession, SessionCodec};
use crate::config::ServerConfig;
use crate::errors::GameError;
use crate::store::{KeyLocks, SessionStore};

/// Store key of a game.
pub type GameId = String;

pub struct GameService {
    engine: RoundEngine,
    store: Arc<dyn SessionStore>,
    locks: KeyLocks,
    codec: Option<SessionCodec>,
    config: ServerConfig,
}

impl GameService {
    /// Creates a service with an engine seeded from the thread RNG.
    pub fn new(config: ServerConfig, store: Arc<dyn SessionStore>) -> Self {
        let engine = RoundEngine::new(RoundOptions::default(), rand::rng().random());
        Self::with_engine(config, store, engine)
    }

    pub fn with_engine(
        config: ServerConfig,
        store: Arc<dyn SessionStore>,
        engine: RoundEngine,
    ) -> Self {
        let codec = config.aes_key().map(SessionCodec::new);
        Self {
            engine,
            store,
            locks: KeyLocks::new(),
            codec,
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Starts a new game with the starting balance.
    pub async fn create(&self) -> Result<GameId, GameError> {
        let id = Uuid::new_v4().to_string();
        let state = self.engine.new_state();
        self.save(&id, &state, self.config.session_ttl())?;

        tracing::info!(game_id = %id, balance = state.balance, "game created");
        Ok(id)
    }

    pub async fn place_bet(&self, id: &str, amount: usize) -> Result<RoundState, GameError> {
        let _guard = self.locks.lock(id).await;
        let mut state = self.load(id)?;

        self.engine.place_bet(&mut state, amount)?;
        self.save(id, &state, self.config.session_ttl())?;

        tracing::debug!(game_id = %id, amount, balance = state.balance, "bet placed");
        Ok(state)
    }

    /// Draws a card for the player, resolving the round when it busts.
    pub async fn hit(&self, id: &str) -> Result<Option<Outcome>, GameError> {
        let _guard = self.locks.lock(id).await;
        let mut state = self.load(id)?;

        self.engine.hit(&mut state)?;
        let outcome = if state.player_status == PlayerStatus::Busted {
            Some(self.engine.resolve(&mut state)?.outcome)
        } else {
            None
        };
        self.save(id, &state, self.config.session_ttl())?;

        if let Some(outcome) = outcome {
            tracing::info!(game_id = %id, ?outcome, balance = state.balance, "player busted");
        }
        Ok(outcome)
    }

    pub async fn stand(&self, id: &str) -> Result<Outcome, GameError> {
        let _guard = self.locks.lock(id).await;
        let mut state = self.load(id)?;

        self.engine.stand(&mut state)?;
        let result = self.engine.resolve(&mut state)?;
        self.save(id, &state, self.config.session_ttl())?;

        tracing::info!(
            game_id = %id,
            outcome = ?result.outcome,
            player = result.player_value,
            dealer = result.dealer_value,
            balance = state.balance,
            "round resolved"
        );
        Ok(result.outcome)
    }

    /// Forfeits the round. The game is kept only for the surrender TTL.
    pub async fn surrender(&self, id: &str) -> Result<Outcome, GameError> {
        let _guard = self.locks.lock(id).await;
        let mut state = self.load(id)?;

        let outcome = self.engine.surrender(&mut state)?;
        self.save(id, &state, self.config.surrender_ttl())?;

        tracing::info!(game_id = %id, ?outcome, balance = state.balance, "player surrendered");
        Ok(outcome)
    }

    /// Display projection of the game. Does not extend its lifetime.
    pub async fn status(&self, id: &str) -> Result<RoundView, GameError> {
        let state = self.load(id)?;
        Ok(self.engine.view(&state))
    }

    pub async fn export(&self, id: &str) -> Result<EncryptedSession, GameError> {
        let codec = self.codec()?;
        let state = self.load(id)?;
        let payload = serde_json::to_string(&state)?;

        tracing::debug!(game_id = %id, "game exported");
        Ok(codec.encrypt(&payload))
    }

    /// Imports an exported game under a fresh key.
    pub async fn restore(&self, session: &EncryptedSession) -> Result<GameId, GameError> {
        let codec = self.codec()?;
        let payload = codec.decrypt(session)?;
        let state: RoundState = serde_json::from_str(&payload)
            .map_err(|err| GameError::ValidationFailure(err.to_string()))?;
        state.validate()?;

        let id = Uuid::new_v4().to_string();
        self.save(&id, &state, self.config.session_ttl())?;

        tracing::info!(game_id = %id, balance = state.balance, "game restored");
        Ok(id)
    }

    /// Returns the configured reward once the balance reaches the threshold.
    pub async fn claim_reward(&self, id: &str) -> Result<String, GameError> {
        let state = self.load(id)?;
        let threshold = self.config.reward_threshold();
        if state.balance < threshold {
            return Err(GameError::RewardLocked { threshold });
        }

        tracing::info!(game_id = %id, balance = state.balance, "reward claimed");
        Ok(self.config.reward().unwrap_or_default().to_owned())
    }

    /// Drops expired games and idle key locks.
    pub fn purge(&self) -> usize {
        let purged = self.store.purge_expired();
        self.locks.prune();
        purged
    }

    fn codec(&self) -> Result<&SessionCodec, GameError> {
        self.codec
            .as_ref()
            .ok_or_else(|| GameError::CodecFailure("AES_ENCRYPTION_KEY is not set".into()))
    }

    fn load(&self, id: &str) -> Result<RoundState, GameError> {
        let payload = self.store.get(id).ok_or(GameError::GameNotFound)?;
        Ok(serde_json::from_str(&payload)?)
    }

    fn save(&self, id: &str, state: &RoundState, ttl: Duration) -> Result<(), GameError> {
        let payload = serde_json::to_string(state)?;
        self.store.put(id, payload, ttl);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use bjround::ActionError;

    fn service(config: ServerConfig) -> GameService {
        let engine = RoundEngine::new(RoundOptions::default(), 7);
        GameService::with_engine(config, Arc::new(MemoryStore::new()), engine)
    }

    #[tokio::test]
    async fn bet_then_stand_settles_the_round() {
        let service = service(ServerConfig::for_tests());
        let id = service.create().await.expect("create");

        let state = service.place_bet(&id, 10_000).await.expect("bet");
        assert_eq!(state.balance, 90_000);

        service.stand(&id).await.expect("stand");
        let view = service.status(&id).await.expect("status");
        assert!(view.is_round_finished);
        assert_eq!(view.player_state.current_bet, 0);
    }

    #[tokio::test]
    async fn actions_before_a_bet_are_rejected() {
        let service = service(ServerConfig::for_tests());
        let id = service.create().await.expect("create");

        assert!(matches!(
            service.hit(&id).await,
            Err(GameError::Action(ActionError::NotStarted))
        ));
        assert!(matches!(
            service.surrender(&id).await,
            Err(GameError::Action(ActionError::NotStarted))
        ));
    }

    #[tokio::test]
    async fn unknown_game_is_not_found() {
        let service = service(ServerConfig::for_tests());
        assert!(matches!(
            service.status("missing").await,
            Err(GameError::GameNotFound)
        ));
    }

    #[tokio::test]
    async fn export_requires_a_key() {
        let service = service(ServerConfig::new("127.0.0.1", 0));
        let id = service.create().await.expect("create");
        assert!(matches!(
            service.export(&id).await,
            Err(GameError::CodecFailure(_))
        ));
    }

    #[tokio::test]
    async fn restore_assigns_a_new_key() {
        let service = service(ServerConfig::for_tests());
        let id = service.create().await.expect("create");
        service.place_bet(&id, 20_000).await.expect("bet");

        let sealed = service.export(&id).await.expect("export");
        let restored = service.restore(&sealed).await.expect("restore");
        assert_ne!(restored, id);

        let original = service.status(&id).await.expect("status");
        let copy = service.status(&restored).await.expect("status");
        assert_eq!(original, copy);
    }

    #[tokio::test]
    async fn restore_rejects_invalid_states() {
        let config = ServerConfig::for_tests();
        let service = service(config.clone());
        let codec = SessionCodec::new(config.aes_key().expect("key"));

        let mut state = RoundState::new(100_000);
        state.current_bet = 10_000;
        state.round_finished = true;
        let sealed = codec.encrypt(&serde_json::to_string(&state).expect("serialize"));

        assert!(matches!(
            service.restore(&sealed).await,
            Err(GameError::ValidationFailure(_))
        ));
    }

    #[tokio::test]
    async fn reward_unlocks_at_threshold() {
        let config = ServerConfig::for_tests()
            .with_reward("prize")
            .with_reward_threshold(100_000);
        let service = service(config);
        let id = service.create().await.expect("create");

        assert_eq!(service.claim_reward(&id).await.expect("reward"), "prize");

        service.place_bet(&id, 10_000).await.expect("bet");
        assert!(matches!(
            service.claim_reward(&id).await,
            Err(GameError::RewardLocked { threshold: 100_000 })
        ));
    }

    #[tokio::test]
    async fn surrendered_game_expires_on_short_ttl() {
        let config = ServerConfig::for_tests().with_surrender_ttl(Duration::ZERO);
        let service = service(config);
        let id = service.create().await.expect("create");
        service.place_bet(&id, 10_000).await.expect("bet");

        assert_eq!(service.surrender(&id).await.expect("surrender"), Outcome::Dealer);
        assert!(matches!(
            service.status(&id).await,
            Err(GameError::GameNotFound)
        ));
        assert_eq!(service.purge(), 0);
    }
}
