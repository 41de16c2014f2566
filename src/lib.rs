//! Arena Blast - grid arena core for a two-player blast game
//!
//! Core modules:
//! - `sim`: Arena simulation (grid, layout, occupancy, power-up placement, timers)
//! - `scores`: Score board with JSON persistence
//! - `social`: Match summary posts behind a pluggable client
//! - `api`: Transport-free request dispatcher with JSON envelopes
//! - `settings`: Data-driven arena tuning and environment

pub mod api;
pub mod error;
pub mod scores;
pub mod settings;
pub mod sim;
pub mod social;

pub use error::{ApiError, ConfigError, ScoreError, SocialError};
pub use scores::ScoreBoard;
pub use settings::{ArenaSettings, Environment};

/// Game configuration constants
pub mod consts {
    /// Arena is a square lattice of this many cells per side
    pub const GRID_SIZE: i32 = 15;
    /// Largest accepted grid side length
    pub const MAX_GRID_SIZE: i32 = 255;
    /// World units per cell
    pub const CELL_SIZE: f32 = 1.0;

    /// Probability that an eligible cell receives a destructible obstacle
    pub const DESTRUCTIBLE_PROBABILITY: f64 = 0.4;

    /// Health items allowed on the board at once
    pub const MAX_HEALTH_ITEMS: usize = 2;
    /// Seconds between health spawn attempts (only while below cap)
    pub const HEALTH_SPAWN_INTERVAL: f32 = 20.0;
    /// Seconds between defensive item rolls
    pub const DEFENSIVE_SPAWN_INTERVAL: f32 = 10.0;
    /// Chance that a defensive roll actually spawns
    pub const DEFENSIVE_SPAWN_PROBABILITY: f64 = 0.1;

    /// Sampler draws before giving up on a spawn.
    ///
    /// Bounds the rejection loop when the board is full; it is not what makes
    /// the sampler correct.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

    /// Frame step used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Points above which a match counts as a win in player stats
    pub const WIN_POINTS_THRESHOLD: i64 = 1000;
}
