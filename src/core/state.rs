/// Wire types for the 2048 game server and the client-side session machine.
use serde::{Deserialize, Serialize};

/// A snapshot of one game as reported by the server. The server owns all
/// game logic; the client only ever replaces its copy wholesale with the
/// latest response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Opaque session identifier, assigned by the server.
    pub id: u64,
    /// Row-major board. 0 is an empty cell, anything positive is a tile.
    pub board: Vec<Vec<u32>>,
    pub score: u32,
    /// Set once no further moves are possible (or the server decides the
    /// run is finished). Moves are suppressed while this is true.
    pub game_over: bool,
    /// Set once a 2048 tile has been created. The game may keep going.
    #[serde(default)]
    pub won: bool,
}

/// Structured error body the server attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
}

/// The four move commands understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    /// Uppercase form used in the `direction` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            MoveDirection::Up => "UP",
            MoveDirection::Down => "DOWN",
            MoveDirection::Left => "LEFT",
            MoveDirection::Right => "RIGHT",
        }
    }
}

/// Client session state. Keeping this a tagged variant (rather than an
/// `Option<u64>` plus a cached state) makes move-without-session
/// unrepresentable: the dispatcher gets its target id from [`Session`],
/// which only hands one out while a movable game is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Idle,
    Active { id: u64, latest: GameState },
}

impl Session {
    /// Enter the active state from a freshly created game. A new session
    /// always re-enables input, even after a game over.
    pub fn begin(state: GameState) -> Self {
        Session::Active {
            id: state.id,
            latest: state,
        }
    }

    /// Replace the rendered state with a server response, but only when it
    /// belongs to the active session. Responses that survive from an older
    /// session (overlapping requests, no ordering guarantee) are dropped.
    pub fn apply(&mut self, state: GameState) -> bool {
        match self {
            Session::Active { id, latest } if *id == state.id => {
                *latest = state;
                true
            }
            _ => false,
        }
    }

    /// The id to scope a move request to, if a move is currently allowed.
    /// `None` while idle and once the latest state reports game over.
    pub fn move_target(&self) -> Option<u64> {
        match self {
            Session::Active { id, latest } if !latest.game_over => Some(*id),
            _ => None,
        }
    }

    /// The id of the active session regardless of game-over, used to
    /// resync state after a failed move.
    pub fn active_id(&self) -> Option<u64> {
        match self {
            Session::Active { id, .. } => Some(*id),
            Session::Idle => None,
        }
    }

    pub fn latest(&self) -> Option<&GameState> {
        match self {
            Session::Active { latest, .. } => Some(latest),
            Session::Idle => None,
        }
    }
}
