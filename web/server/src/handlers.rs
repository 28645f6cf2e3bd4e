//! Request handlers. Each one maps a [`GameService`] call to a JSON reply.

use std::sync::Arc;

use bjround::Outcome;
use serde::{Deserialize, Serialize};
use warp::Reply;
use warp::http::StatusCode;
use warp::reply::{self, Response};

use crate::codec::EncryptedSession;
use crate::errors::{GameError, IntoErrorResponse};
use crate::service::{GameId, GameService};

#[derive(Debug, Deserialize)]
pub struct BetRequest {
    /// Accepted as a JSON number or a numeric string.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
}

impl BetRequest {
    fn amount(&self) -> Result<usize, GameError> {
        let amount = match &self.amount {
            Some(serde_json::Value::Number(number)) => number.as_u64(),
            Some(serde_json::Value::String(text)) => text.trim().parse::<u64>().ok(),
            _ => None,
        };
        amount
            .and_then(|amount| usize::try_from(amount).ok())
            .ok_or(GameError::MissingAmount)
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub uuid: GameId,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub result: Option<Outcome>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub session: EncryptedSession,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoredResponse {
    pub message: &'static str,
    pub new_uuid: GameId,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

fn respond<T: Serialize>(result: Result<T, GameError>) -> Response {
    match result {
        Ok(body) => reply::with_status(reply::json(&body), StatusCode::OK).into_response(),
        Err(err) => err.into_http_response(),
    }
}

pub fn health() -> Response {
    reply::json(&HealthResponse { status: "ok" }).into_response()
}

pub async fn create_game(service: Arc<GameService>) -> Response {
    respond(service.create().await.map(|uuid| CreatedResponse {
        message: "Game created successfully.",
        uuid,
    }))
}

pub async fn place_bet(service: Arc<GameService>, id: GameId, request: BetRequest) -> Response {
    let result = async {
        let amount = request.amount()?;
        service.place_bet(&id, amount).await?;
        Ok(MessageResponse {
            message: format!("Bet placed successfully. Amount: {amount}"),
        })
    };
    respond(result.await)
}

pub async fn hit(service: Arc<GameService>, id: GameId) -> Response {
    respond(service.hit(&id).await.map(|result| ResultResponse { result }))
}

pub async fn stand(service: Arc<GameService>, id: GameId) -> Response {
    respond(
        service
            .stand(&id)
            .await
            .map(|outcome| ResultResponse { result: Some(outcome) }),
    )
}

pub async fn surrender(service: Arc<GameService>, id: GameId) -> Response {
    respond(
        service
            .surrender(&id)
            .await
            .map(|outcome| ResultResponse { result: Some(outcome) }),
    )
}

pub async fn status(service: Arc<GameService>, id: GameId) -> Response {
    respond(service.status(&id).await)
}

pub async fn export(service: Arc<GameService>, id: GameId) -> Response {
    respond(service.export(&id).await.map(|session| ExportResponse {
        message: "Game session exported successfully.",
        session,
    }))
}

pub async fn restore(service: Arc<GameService>, request: EncryptedSession) -> Response {
    respond(service.restore(&request).await.map(|new_uuid| RestoredResponse {
        message: "Game session restored successfully.",
        new_uuid,
    }))
}

pub async fn claim_reward(service: Arc<GameService>, id: GameId) -> Response {
    respond(
        service
            .claim_reward(&id)
            .await
            .map(|reward| MessageResponse {
                message: format!("Congratulations! {reward}"),
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bet(body: serde_json::Value) -> BetRequest {
        serde_json::from_value(body).expect("bet request")
    }

    #[test]
    fn amount_accepts_numbers_and_numeric_strings() {
        assert_eq!(bet(serde_json::json!({ "amount": 10_000 })).amount().ok(), Some(10_000));
        assert_eq!(bet(serde_json::json!({ "amount": " 25000 " })).amount().ok(), Some(25_000));
    }

    #[test]
    fn amount_rejects_missing_or_malformed_values() {
        for body in [
            serde_json::json!({}),
            serde_json::json!({ "amount": null }),
            serde_json::json!({ "amount": "lots" }),
            serde_json::json!({ "amount": -5 }),
            serde_json::json!({ "amount": 1.5 }),
        ] {
            assert!(matches!(bet(body).amount(), Err(GameError::MissingAmount)));
        }
    }

    #[test]
    fn export_body_is_flat() {
        let body = ExportResponse {
            message: "ok",
            session: EncryptedSession {
                encrypted_session: "abc".into(),
                iv: "def".into(),
            },
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["encryptedSession"], "abc");
        assert_eq!(json["iv"], "def");
    }
}
