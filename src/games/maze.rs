//! Randomly carved 15x15 maze
//!
//! The layout is regenerated until the goal is reachable from the start, so
//! every started session is winnable.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{Game, GameId, GameSpec};
use crate::renderer::{DrawList, palette};
use crate::sim::{
    Aabb, Board, Cell, Direction, Entity, Intent, Occupancy, Session, TickInput, is_blocked,
};

pub static SPEC: GameSpec = GameSpec::continuous(
    GameId::Maze,
    "Maze",
    "Walk from the top-left corner to the goal",
    SIZE as f32 * CELL,
    SIZE as f32 * CELL,
    false,
);

pub const SIZE: usize = 15;
const CELL: f32 = 12.0;
pub const START: Cell = Cell::new(1, 1);
pub const GOAL: Cell = Cell::new(SIZE as i32 - 2, SIZE as i32 - 2);
const RANDOM_OPENINGS: usize = 10;
const MAX_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Wall,
    Open,
}

impl Occupancy for Tile {
    fn is_occupied(&self) -> bool {
        *self == Tile::Wall
    }
}

/// Carve odd cells, link each to one random neighbour, then punch a few
/// random openings
fn carve(rng: &mut impl Rng) -> Board<Tile> {
    let size = SIZE as i32;
    let mut board = Board::new(SIZE, SIZE);
    for row in (1..size - 1).step_by(2) {
        for col in (1..size - 1).step_by(2) {
            board.set(row, col, Tile::Open);
            let dir = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
            let (dr, dc) = dir.delta();
            let (nr, nc) = (row + dr * 2, col + dc * 2);
            if nr > 0 && nr < size - 1 && nc > 0 && nc < size - 1 {
                board.set(row + dr, col + dc, Tile::Open);
                board.set(nr, nc, Tile::Open);
            }
        }
    }
    board.set(START.row, START.col, Tile::Open);
    board.set(GOAL.row, GOAL.col, Tile::Open);

    for _ in 0..RANDOM_OPENINGS {
        let row = rng.random_range(0..size);
        let col = rng.random_range(0..size);
        if row > 0 && row < size - 1 && col > 0 && col < size - 1 {
            board.set(row, col, Tile::Open);
        }
    }
    board
}

/// Generate a maze with a guaranteed start-to-goal path
pub fn generate(rng: &mut impl Rng) -> Board<Tile> {
    for attempt in 1..=MAX_ATTEMPTS {
        let board = carve(rng);
        if shortest_path(&board, START, GOAL).is_some() {
            log::debug!("Maze generated after {attempt} attempts");
            return board;
        }
    }
    // Fall back to an L-shaped corridor along the top row and right column
    let mut board = carve(rng);
    for col in START.col..=GOAL.col {
        board.set(START.row, col, Tile::Open);
    }
    for row in START.row..=GOAL.row {
        board.set(row, GOAL.col, Tile::Open);
    }
    board
}

/// Breadth-first search; returns the steps of a shortest walk
pub fn shortest_path<T: Occupancy>(
    board: &Board<T>,
    from: Cell,
    to: Cell,
) -> Option<Vec<Direction>> {
    if is_blocked(board, from.row, from.col) || is_blocked(board, to.row, to.col) {
        return None;
    }
    let mut came_from: Board<Option<Direction>> = Board::new(board.rows(), board.cols());
    let mut visited: Board<bool> = Board::new(board.rows(), board.cols());
    let mut queue = VecDeque::from([from]);
    visited.set(from.row, from.col, true);

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            let mut steps = Vec::new();
            let mut cursor = to;
            while let Some(&Some(dir)) = came_from.at(cursor) {
                steps.push(dir);
                cursor = cursor.step(dir.opposite());
            }
            steps.reverse();
            return Some(steps);
        }
        for dir in Direction::ALL {
            let next = cell.step(dir);
            if is_blocked(board, next.row, next.col) || visited.at(next) == Some(&true) {
                continue;
            }
            visited.set(next.row, next.col, true);
            came_from.set(next.row, next.col, Some(dir));
            queue.push_back(next);
        }
    }
    None
}

pub struct Maze {
    session: Session,
    rng: Pcg32,
    board: Board<Tile>,
    player: Cell,
    goal: Cell,
}

impl Maze {
    pub fn new(mut rng: Pcg32) -> Self {
        let board = generate(&mut rng);
        Self::with_board(board, rng)
    }

    /// Use a fixed layout (no regeneration until the next start)
    pub fn with_board(board: Board<Tile>, rng: Pcg32) -> Self {
        Self {
            session: Session::new(),
            rng,
            board,
            player: START,
            goal: GOAL,
        }
    }

    pub fn board(&self) -> &Board<Tile> {
        &self.board
    }

    pub fn player(&self) -> Cell {
        self.player
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Begin a session on the current layout
    pub fn start_on_current(&mut self) {
        self.player = START;
        self.session.begin();
    }

    fn try_move(&mut self, dir: Direction) {
        let next = self.player.step(dir);
        if is_blocked(&self.board, next.row, next.col) {
            log::trace!("Maze move {dir:?} blocked at {:?}", self.player);
            return;
        }
        self.player = next;
        self.session.count_move();
        if self.player == self.goal {
            self.session.win();
        }
    }
}

impl Game for Maze {
    fn spec(&self) -> &'static GameSpec {
        &SPEC
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn start(&mut self) {
        self.board = generate(&mut self.rng);
        self.goal = GOAL;
        self.start_on_current();
    }

    fn stop(&mut self) {
        self.session.halt();
    }

    fn reset(&mut self) {
        self.player = START;
        self.session.reset();
    }

    fn tick(&mut self, input: &TickInput) {
        for intent in &input.intents {
            if !self.session.is_playing() {
                return;
            }
            if let Intent::Move(dir) = *intent {
                self.try_move(dir);
            }
        }
    }

    fn render(&self, out: &mut DrawList) {
        for (cell, tile) in self.board.iter() {
            let color = if *tile == Tile::Wall {
                palette::MAZE_WALL
            } else if cell == self.player {
                palette::MAZE_PLAYER
            } else if cell == self.goal {
                palette::MAZE_GOAL
            } else {
                palette::MAZE_FLOOR
            };
            out.fill_rect(cell.col as f32 * CELL, cell.row as f32 * CELL, CELL, CELL, color);
        }
    }

    fn entities(&self) -> Vec<Entity> {
        vec![Entity::MazeActor(self.player), Entity::MazeActor(self.goal)]
    }

    fn playfield(&self) -> Aabb {
        Aabb::from_min_size(Vec2::ZERO, Vec2::splat(SIZE as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::game_rng;
    use crate::games::testing::*;
    use crate::sim::Status;

    /// Serpentine layout with a single route from start to goal
    fn serpentine() -> Board<Tile> {
        let mut board = Board::new(SIZE, SIZE);
        for row in (1..SIZE as i32 - 1).step_by(2) {
            for col in 1..SIZE as i32 - 1 {
                board.set(row, col, Tile::Open);
            }
        }
        // Alternate connectors on the right and left edges
        for (i, row) in (2..SIZE as i32 - 2).step_by(2).enumerate() {
            let col = if i % 2 == 0 { SIZE as i32 - 2 } else { 1 };
            board.set(row, col, Tile::Open);
        }
        board
    }

    #[test]
    fn test_generated_maze_is_solvable() {
        for seed in 0..20 {
            let mut rng = game_rng(GameId::Maze, seed);
            let board = generate(&mut rng);
            assert!(shortest_path(&board, START, GOAL).is_some());
            // Border stays solid
            for i in 0..SIZE as i32 {
                assert_eq!(board.get(0, i), Some(&Tile::Wall));
                assert_eq!(board.get(i, SIZE as i32 - 1), Some(&Tile::Wall));
            }
        }
    }

    #[test]
    fn test_walk_shortest_path_wins() {
        let board = serpentine();
        let path = shortest_path(&board, START, GOAL).unwrap();
        // 7 corridors of 12 steps joined by 6 connectors of 2 steps
        assert_eq!(path.len(), 7 * 12 + 6 * 2);

        let mut game = Maze::with_board(board, game_rng(GameId::Maze, 0));
        game.start_on_current();
        let intents = path.iter().copied().map(Intent::Move).collect();
        game.tick(&TickInput::new(intents));

        assert_eq!(game.player(), GOAL);
        assert_eq!(game.session().status(), Status::Won);
        assert_eq!(game.session().move_count() as usize, path.len());
    }

    #[test]
    fn test_walls_block_without_counting() {
        let mut game = Maze::with_board(serpentine(), game_rng(GameId::Maze, 0));
        game.start_on_current();
        game.tick(&TickInput::new(vec![
            Intent::Move(Direction::Up),
            Intent::Move(Direction::Left),
            Intent::Move(Direction::Down),
        ]));
        assert_eq!(game.player(), START);
        assert_eq!(game.session().move_count(), 0);

        game.tick(&TickInput::new(vec![Intent::Move(Direction::Right)]));
        assert_eq!(game.player(), Cell::new(1, 2));
        assert_eq!(game.session().move_count(), 1);
    }

    #[test]
    fn test_input_after_win_is_ignored() {
        let board = serpentine();
        let path = shortest_path(&board, START, GOAL).unwrap();
        let mut game = Maze::with_board(board, game_rng(GameId::Maze, 0));
        game.start_on_current();
        let mut intents: Vec<_> = path.iter().copied().map(Intent::Move).collect();
        intents.push(Intent::Move(Direction::Left));
        game.tick(&TickInput::new(intents));
        assert_eq!(game.player(), GOAL);
        assert_eq!(game.session().move_count() as usize, path.len());
        assert_render_idempotent(&game);
        assert_in_bounds(&game);
    }

    #[test]
    fn test_unreachable_goal_has_no_path() {
        let board: Board<Tile> = Board::new(SIZE, SIZE);
        assert!(shortest_path(&board, START, GOAL).is_none());
    }
}
