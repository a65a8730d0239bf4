/// HTTP client for the game server's REST API.
///
/// The server is the single source of truth: every call returns a full
/// [`GameState`] which replaces whatever the client was showing before.
use anyhow::{Context, Result, anyhow};
use reqwest::{Response, StatusCode};
use tracing::debug;

use crate::core::state::{ApiErrorResponse, GameState, MoveDirection};

pub struct GameClient {
    http: reqwest::Client,
    base_url: String,
}

impl GameClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// POST /api/games — create a session and return its initial state.
    pub async fn new_game(&self, board_size: u32) -> Result<GameState> {
        let url = format!("{}/api/games", self.base_url);
        debug!(%url, board_size, "creating game");
        let response = self
            .http
            .post(&url)
            .query(&[("boardSize", board_size)])
            .send()
            .await
            .with_context(|| format!("failed to reach game server at {url}"))?;
        decode_game_state(response)
            .await
            .context("new game request rejected")
    }

    /// POST /api/games/{id}/move?direction=… — apply one move.
    pub async fn send_move(&self, id: u64, direction: MoveDirection) -> Result<GameState> {
        let url = format!("{}/api/games/{id}/move", self.base_url);
        debug!(%url, direction = direction.as_str(), "sending move");
        let response = self
            .http
            .post(&url)
            .query(&[("direction", direction.as_str())])
            .send()
            .await
            .with_context(|| format!("failed to reach game server at {url}"))?;
        decode_game_state(response)
            .await
            .with_context(|| format!("move {} rejected", direction.as_str()))
    }

    /// GET /api/games/{id} — fetch the authoritative state of a session.
    pub async fn fetch_game(&self, id: u64) -> Result<GameState> {
        let url = format!("{}/api/games/{id}", self.base_url);
        debug!(%url, "fetching game state");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach game server at {url}"))?;
        decode_game_state(response)
            .await
            .context("state fetch rejected")
    }
}

/// Turn a response into a `GameState`, mapping non-2xx statuses into an
/// error built from the server's structured body when one is present.
async fn decode_game_state(response: Response) -> Result<GameState> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<GameState>()
            .await
            .context("malformed game state in response body");
    }
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status, &body))
}

fn api_error(status: StatusCode, body: &str) -> anyhow::Error {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(err) => anyhow!("server returned {}: {}", err.status, err.message),
        Err(_) => anyhow!("server returned {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slashes_from_base_url() {
        let client = GameClient::new("http://localhost:8080///");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn api_error_uses_structured_body_when_present() {
        let body = r#"{
            "timestamp": "2024-05-01T12:00:00Z",
            "status": 404,
            "error": "Not Found",
            "message": "Game with ID 99 not found."
        }"#;
        let err = api_error(StatusCode::NOT_FOUND, body);
        assert_eq!(err.to_string(), "server returned 404: Game with ID 99 not found.");
    }

    #[test]
    fn api_error_falls_back_to_status_line() {
        let err = api_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.to_string(), "server returned 500 Internal Server Error");
    }
}
