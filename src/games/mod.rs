//! Game registry
//!
//! Every game owns its session, entities, RNG and pending delays, and is
//! driven through the [`Game`] trait by the host. Nothing is shared between
//! games.

pub mod breakout;
pub mod chain;
pub mod maze;
pub mod memory;
pub mod pong;
pub mod shooter;
pub mod snake;
pub mod tetris;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{TICK_CONTINUOUS, TICK_STEP};
use crate::error::ArcadeError;
use crate::renderer::DrawList;
use crate::sim::{Aabb, Entity, Session, TickInput};

pub use breakout::Breakout;
pub use chain::ChainShooter;
pub use maze::Maze;
pub use memory::Memory;
pub use pong::Pong;
pub use shooter::Shooter;
pub use snake::Snake;
pub use tetris::Tetris;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Pong,
    Breakout,
    Tetris,
    Snake,
    Maze,
    Chain,
    Shooter,
    Memory,
}

impl GameId {
    pub const ALL: [GameId; 8] = [
        GameId::Pong,
        GameId::Breakout,
        GameId::Tetris,
        GameId::Snake,
        GameId::Maze,
        GameId::Chain,
        GameId::Shooter,
        GameId::Memory,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameId::Pong => "pong",
            GameId::Breakout => "breakout",
            GameId::Tetris => "tetris",
            GameId::Snake => "snake",
            GameId::Maze => "maze",
            GameId::Chain => "chain",
            GameId::Shooter => "shooter",
            GameId::Memory => "memory",
        }
    }

    /// Static description of this game
    pub fn spec(self) -> &'static GameSpec {
        match self {
            GameId::Pong => &pong::SPEC,
            GameId::Breakout => &breakout::SPEC,
            GameId::Tetris => &tetris::SPEC,
            GameId::Snake => &snake::SPEC,
            GameId::Maze => &maze::SPEC,
            GameId::Chain => &chain::SPEC,
            GameId::Shooter => &shooter::SPEC,
            GameId::Memory => &memory::SPEC,
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        match id.as_str() {
            "pong" => Ok(GameId::Pong),
            "breakout" => Ok(GameId::Breakout),
            "tetris" => Ok(GameId::Tetris),
            "snake" => Ok(GameId::Snake),
            "maze" => Ok(GameId::Maze),
            "chain" | "zuma" => Ok(GameId::Chain),
            "shooter" => Ok(GameId::Shooter),
            "memory" => Ok(GameId::Memory),
            _ => Err(ArcadeError::UnknownGame(s.to_string())),
        }
    }
}

/// Compile-time configuration of one game
#[derive(Debug, Clone, PartialEq)]
pub struct GameSpec {
    pub id: GameId,
    pub name: &'static str,
    pub description: &'static str,
    /// Canvas size in pixels
    pub width: f32,
    pub height: f32,
    pub tick: Duration,
    /// Wants pointer move/click events
    pub uses_pointer: bool,
}

impl GameSpec {
    pub(crate) const fn continuous(
        id: GameId,
        name: &'static str,
        description: &'static str,
        width: f32,
        height: f32,
        uses_pointer: bool,
    ) -> Self {
        Self {
            id,
            name,
            description,
            width,
            height,
            tick: TICK_CONTINUOUS,
            uses_pointer,
        }
    }

    pub(crate) const fn stepped(mut self) -> Self {
        self.tick = TICK_STEP;
        self
    }

    pub fn canvas(&self) -> Aabb {
        Aabb::new(0.0, 0.0, self.width, self.height)
    }
}

/// A mounted game instance
pub trait Game {
    fn spec(&self) -> &'static GameSpec;

    fn session(&self) -> &Session;

    /// Re-initialise everything and enter Playing
    fn start(&mut self);

    /// Leave Playing (terminal states are kept) and cancel pending delays
    fn stop(&mut self);

    /// Back to the construction state (Idle)
    fn reset(&mut self);

    /// One simulation step; a no-op unless Playing
    fn tick(&mut self, input: &TickInput);

    /// Project the current state; identical state yields an identical list
    fn render(&self, out: &mut DrawList);

    /// Snapshot of every live entity
    fn entities(&self) -> Vec<Entity>;

    /// Region every entity position stays within while Playing, in entity units
    fn playfield(&self) -> Aabb {
        self.spec().canvas()
    }
}

/// Per-game RNG stream derived from the host seed
pub fn game_rng(id: GameId, seed: u64) -> Pcg32 {
    let salt = (id as u64 + 1).wrapping_mul(2_654_435_761);
    Pcg32::seed_from_u64(seed.wrapping_add(salt))
}

/// Construct a game in its Idle state
pub fn create(id: GameId, seed: u64) -> Box<dyn Game> {
    let rng = game_rng(id, seed);
    match id {
        GameId::Pong => Box::new(Pong::new(rng)),
        GameId::Breakout => Box::new(Breakout::new()),
        GameId::Tetris => Box::new(Tetris::new(rng)),
        GameId::Snake => Box::new(Snake::new(rng)),
        GameId::Maze => Box::new(Maze::new(rng)),
        GameId::Chain => Box::new(ChainShooter::new(rng)),
        GameId::Shooter => Box::new(Shooter::new(rng)),
        GameId::Memory => Box::new(Memory::new(rng)),
    }
}

/// Shared invariant helpers for game tests
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::sim::{Intent, Status};

    /// Every entity position lies inside the playfield (small float tolerance)
    pub fn assert_in_bounds(game: &dyn Game) {
        let field = game.playfield();
        let padded = Aabb::new(field.x - 0.01, field.y - 0.01, field.w + 0.02, field.h + 0.02);
        for entity in game.entities() {
            let pos = entity.extent().min();
            assert!(
                padded.contains(&Aabb::from_min_size(pos, glam::Vec2::ZERO)),
                "{} entity {:?} escaped {:?}",
                game.spec().id,
                entity,
                field
            );
        }
    }

    /// Render twice without ticking and compare
    pub fn assert_render_idempotent(game: &dyn Game) {
        let mut a = DrawList::new();
        let mut b = DrawList::new();
        game.render(&mut a);
        game.render(&mut b);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    pub fn run(game: &mut dyn Game, ticks: usize, intents: &[Intent]) {
        for _ in 0..ticks {
            game.tick(&TickInput::new(intents.to_vec()));
            if game.session().status() != Status::Playing {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::sim::{Direction, Intent, Status};
    use glam::Vec2;
    use proptest::prelude::*;

    #[test]
    fn test_game_id_parse() {
        for id in GameId::ALL {
            assert_eq!(id.as_str().parse::<GameId>().unwrap(), id);
            assert_eq!(id.spec().id, id);
        }
        assert_eq!("Zuma".parse::<GameId>().unwrap(), GameId::Chain);
        assert!(matches!(
            "frogger".parse::<GameId>(),
            Err(ArcadeError::UnknownGame(name)) if name == "frogger"
        ));
    }

    #[test]
    fn test_canvas_sizes_and_ticks() {
        let sizes: Vec<_> = GameId::ALL
            .iter()
            .map(|id| (id.spec().width, id.spec().height))
            .collect();
        assert_eq!(
            sizes,
            vec![
                (400.0, 300.0),
                (300.0, 250.0),
                (250.0, 500.0),
                (300.0, 250.0),
                (180.0, 180.0),
                (500.0, 400.0),
                (300.0, 250.0),
                (212.0, 212.0),
            ]
        );
        assert_eq!(GameId::Snake.spec().tick, Duration::from_millis(200));
        assert_eq!(GameId::Pong.spec().tick, Duration::from_millis(16));
    }

    #[test]
    fn test_every_game_starts_idle_and_ignores_ticks() {
        for id in GameId::ALL {
            let mut game = create(id, 7);
            assert_eq!(game.session().status(), Status::Idle);
            let before = game.entities();
            game.tick(&TickInput::new(vec![Intent::Fire]));
            assert_eq!(game.entities(), before, "{id} moved while idle");
            assert_render_idempotent(game.as_ref());
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        for id in GameId::ALL {
            let mut a = create(id, 99);
            let mut b = create(id, 99);
            a.start();
            b.start();
            run(a.as_mut(), 120, &[Intent::Move(Direction::Left)]);
            run(b.as_mut(), 120, &[Intent::Move(Direction::Left)]);
            assert_eq!(a.entities(), b.entities(), "{id} diverged");
            assert_eq!(a.session(), b.session());
        }
    }

    fn intent_strategy() -> impl Strategy<Value = Intent> {
        prop_oneof![
            Just(Intent::Move(Direction::Up)),
            Just(Intent::Move(Direction::Down)),
            Just(Intent::Move(Direction::Left)),
            Just(Intent::Move(Direction::Right)),
            Just(Intent::Fire),
            (0.0f32..500.0, 0.0f32..500.0).prop_map(|(x, y)| Intent::Point(Vec2::new(x, y))),
            (0.0f32..500.0, 0.0f32..500.0).prop_map(|(x, y)| Intent::Click(Vec2::new(x, y))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_bounds_and_score_monotonic(
            game_index in 0usize..8,
            seed in any::<u64>(),
            batches in prop::collection::vec(
                prop::collection::vec(intent_strategy(), 0..4),
                1..150,
            ),
        ) {
            let id = GameId::ALL[game_index];
            let mut game = create(id, seed);
            game.start();
            let mut last_score = 0;
            let mut last_moves = 0;
            for intents in batches {
                game.tick(&TickInput::new(intents));
                let session = game.session();
                prop_assert!(session.score() >= last_score);
                prop_assert!(session.move_count() >= last_moves);
                last_score = session.score();
                last_moves = session.move_count();
                if session.status() == Status::Playing {
                    assert_in_bounds(game.as_ref());
                } else {
                    break;
                }
            }
        }
    }
}
