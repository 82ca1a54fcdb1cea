//! Deterministic fixed-step simulation core
//!
//! Pure data and math: no rendering, no IO. A host owns a [`GameState`],
//! calls [`tick`] once per frame with a [`TickInput`], and reads the world
//! back through [`FrameView`] and the drained [`GameEvent`]s.

pub mod collision;
pub mod difficulty;
pub(crate) mod interact;
pub(crate) mod lanes;
pub mod player;
pub mod pool;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use player::{MoveState, Player};
pub use pool::{Obstacle, ObstacleId, ObstacleKind, ObstaclePool};
pub use state::{Coin, FrameView, GameEvent, GamePhase, GameState, Row, RowKind};
pub use tick::{TickInput, tick};
