//! Per-game session state machine
//!
//! `Idle -> Playing -> {Won, Lost}`. Score and move count are only touched
//! while playing and never decrease.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Playing,
    Won,
    Lost,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Won | Status::Lost)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Playing => "playing",
            Status::Won => "won",
            Status::Lost => "lost",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    status: Status,
    score: u32,
    move_count: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.status == Status::Playing
    }

    /// Fresh counters, status Playing (from any state)
    pub fn begin(&mut self) {
        *self = Self {
            status: Status::Playing,
            ..Self::default()
        };
    }

    /// Pause a running session; terminal states are kept
    pub fn halt(&mut self) {
        if self.is_playing() {
            self.status = Status::Idle;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn win(&mut self) {
        if self.is_playing() {
            log::info!("Session won with score {}", self.score);
            self.status = Status::Won;
        }
    }

    pub fn lose(&mut self) {
        if self.is_playing() {
            log::info!("Session lost with score {}", self.score);
            self.status = Status::Lost;
        }
    }

    pub fn award(&mut self, points: u32) {
        if self.is_playing() {
            self.score = self.score.saturating_add(points);
        }
    }

    pub fn count_move(&mut self) {
        if self.is_playing() {
            self.move_count = self.move_count.saturating_add(1);
        }
    }
}
