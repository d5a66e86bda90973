//! Pixel Arcade - eight tiny 2D games on one deterministic core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, boards, collision, sessions)
//! - `games`: The eight rule sets built on `sim`
//! - `renderer`: Draw lists and the surfaces they replay onto
//! - `host`: Mounts one game and drives its clock, input and frames
//! - `platform`: Browser/native platform abstraction

pub mod error;
pub mod games;
pub mod host;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ArcadeError;
pub use games::{Game, GameId, GameSpec};
pub use host::{Arcade, Hud};
pub use settings::Settings;

/// Engine timing constants
pub mod consts {
    use std::time::Duration;

    /// Tick interval for continuous-motion games
    pub const TICK_CONTINUOUS: Duration = Duration::from_millis(16);
    /// Tick interval for discrete-step games
    pub const TICK_STEP: Duration = Duration::from_millis(200);
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}
