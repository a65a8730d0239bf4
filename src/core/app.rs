/// The TUI event loop: keyboard in, HTTP requests out, server state back.
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::http::GameClient;
use crate::core::state::{GameState, MoveDirection, Session};
use crate::core::ui;

/// Responses coming back from spawned request tasks. Requests may overlap;
/// events are applied in arrival order, so the last response to arrive
/// determines the rendered board.
#[derive(Debug)]
pub enum ApiEvent {
    GameStarted(GameState),
    StartFailed(String),
    MoveApplied(GameState),
    Resynced(GameState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(MoveDirection),
    NewGame,
    Quit,
}

pub fn map_key(code: KeyCode) -> Option<KeyAction> {
    match code {
        KeyCode::Up => Some(KeyAction::Move(MoveDirection::Up)),
        KeyCode::Down => Some(KeyAction::Move(MoveDirection::Down)),
        KeyCode::Left => Some(KeyAction::Move(MoveDirection::Left)),
        KeyCode::Right => Some(KeyAction::Move(MoveDirection::Right)),
        KeyCode::Char('n') => Some(KeyAction::NewGame),
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        _ => None,
    }
}

pub struct App {
    client: Arc<GameClient>,
    board_size: u32,
    session: Session,
    error: Option<String>,
    events_tx: mpsc::UnboundedSender<ApiEvent>,
    events_rx: mpsc::UnboundedReceiver<ApiEvent>,
}

impl App {
    pub fn new(client: GameClient, board_size: u32) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            client: Arc::new(client),
            board_size,
            session: Session::Idle,
            error: None,
            events_tx,
            events_rx,
        }
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        // Kick off a session right away, like the web page does on load.
        self.request_new_game();

        loop {
            terminal.draw(|f| ui::render(f, &self.session, self.error.as_deref()))?;

            // INPUT (Non-blocking)
            if crossterm::event::poll(Duration::from_millis(0))? {
                if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
                    match map_key(key.code) {
                        Some(KeyAction::Quit) => break,
                        Some(KeyAction::NewGame) => self.request_new_game(),
                        Some(KeyAction::Move(direction)) => self.dispatch_move(direction),
                        None => {}
                    }
                }
            }

            // Wake the loop periodically so input keeps getting polled even
            // when no responses are arriving.
            tokio::select! {
                Some(event) = self.events_rx.recv() => {
                    self.apply_event(event);
                }
                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }
        }

        Ok(())
    }

    /// Fold one response into the session. Stale responses (from a session
    /// that is no longer active) are dropped on the floor.
    fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::GameStarted(state) => {
                info!(id = state.id, "new game started");
                self.error = None;
                self.session = Session::begin(state);
            }
            ApiEvent::StartFailed(message) => {
                self.session = Session::Idle;
                self.error = Some(message);
            }
            ApiEvent::MoveApplied(state) | ApiEvent::Resynced(state) => {
                if !self.session.apply(state) {
                    debug!("dropped response for inactive session");
                }
            }
        }
    }

    /// Ask the server for a fresh session. On failure the error is surfaced
    /// as a blocking modal and no session is left active.
    fn request_new_game(&self) {
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let board_size = self.board_size;
        tokio::spawn(async move {
            match client.new_game(board_size).await {
                Ok(state) => {
                    let _ = tx.send(ApiEvent::GameStarted(state));
                }
                Err(err) => {
                    warn!(error = %err, "could not start a new game");
                    let _ = tx.send(ApiEvent::StartFailed(format!("{err:#}")));
                }
            }
        });
    }

    /// Send one move, scoped to the active session. No-ops while idle or
    /// once the last rendered state reported game over. A failed move is
    /// logged, not surfaced, and followed by a best-effort resync so the
    /// display does not silently diverge from server truth.
    fn dispatch_move(&self, direction: MoveDirection) {
        let Some(id) = self.session.move_target() else {
            debug!(direction = direction.as_str(), "move suppressed");
            return;
        };
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match client.send_move(id, direction).await {
                Ok(state) => {
                    let _ = tx.send(ApiEvent::MoveApplied(state));
                }
                Err(err) => {
                    warn!(direction = direction.as_str(), error = %err, "move failed, resyncing");
                    match client.fetch_game(id).await {
                        Ok(state) => {
                            let _ = tx.send(ApiEvent::Resynced(state));
                        }
                        Err(err) => {
                            warn!(error = %err, "resync failed, keeping last rendered state");
                        }
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(GameClient::new("http://127.0.0.1:9"), 4)
    }

    fn state(id: u64, score: u32) -> GameState {
        GameState {
            id,
            board: vec![vec![2, 0], vec![0, 0]],
            score,
            game_over: false,
            won: false,
        }
    }

    #[test]
    fn arrow_keys_map_to_moves() {
        assert_eq!(map_key(KeyCode::Up), Some(KeyAction::Move(MoveDirection::Up)));
        assert_eq!(map_key(KeyCode::Down), Some(KeyAction::Move(MoveDirection::Down)));
        assert_eq!(map_key(KeyCode::Left), Some(KeyAction::Move(MoveDirection::Left)));
        assert_eq!(map_key(KeyCode::Right), Some(KeyAction::Move(MoveDirection::Right)));
        assert_eq!(map_key(KeyCode::Char('n')), Some(KeyAction::NewGame));
        assert_eq!(map_key(KeyCode::Char('q')), Some(KeyAction::Quit));
        assert_eq!(map_key(KeyCode::Esc), Some(KeyAction::Quit));
        assert_eq!(map_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn game_started_activates_session_and_clears_error() {
        let mut app = app();
        app.error = Some("old failure".into());
        app.apply_event(ApiEvent::GameStarted(state(1, 0)));
        assert_eq!(app.session.active_id(), Some(1));
        assert!(app.error.is_none());
    }

    #[test]
    fn start_failure_leaves_no_session_active() {
        let mut app = app();
        app.apply_event(ApiEvent::GameStarted(state(1, 0)));
        app.apply_event(ApiEvent::StartFailed("connection refused".into()));
        assert_eq!(app.session, Session::Idle);
        assert_eq!(app.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn responses_from_an_old_session_are_ignored() {
        let mut app = app();
        app.apply_event(ApiEvent::GameStarted(state(2, 0)));
        app.apply_event(ApiEvent::MoveApplied(state(1, 9000)));
        assert_eq!(app.session.latest().unwrap().score, 0);

        app.apply_event(ApiEvent::MoveApplied(state(2, 8)));
        assert_eq!(app.session.latest().unwrap().score, 8);
    }

    #[tokio::test]
    async fn moves_before_any_session_issue_no_request() {
        let mut app = app();
        app.dispatch_move(MoveDirection::Left);
        // Nothing was spawned, so nothing can ever arrive on the channel.
        assert!(app.events_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn moves_after_game_over_issue_no_request() {
        let mut app = app();
        let mut finished = state(5, 12);
        finished.game_over = true;
        app.apply_event(ApiEvent::GameStarted(finished));
        app.dispatch_move(MoveDirection::Up);
        assert!(app.events_rx.try_recv().is_err());
    }
}
