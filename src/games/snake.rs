//! Grid-chase snake on a wrapping 20x17 field

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId, GameSpec};
use crate::renderer::{DrawList, palette};
use crate::sim::{Aabb, Cell, Direction, Entity, Intent, Session, TickInput};

pub static SPEC: GameSpec = GameSpec::continuous(
    GameId::Snake,
    "Snake",
    "Eat, grow, and don't bite yourself",
    300.0,
    250.0,
    false,
)
.stepped();

pub const COLS: i32 = 20;
pub const ROWS: i32 = 17;
const CELL: f32 = 15.0;
const START: Cell = Cell::new(10, 10);
const POINTS_PER_FOOD: u32 = 10;

pub struct Snake {
    session: Session,
    rng: Pcg32,
    /// Head first
    segments: VecDeque<Cell>,
    heading: Direction,
    food: Option<Cell>,
}

impl Snake {
    pub fn new(rng: Pcg32) -> Self {
        let mut snake = Self {
            session: Session::new(),
            rng,
            segments: VecDeque::new(),
            heading: Direction::Right,
            food: None,
        };
        snake.layout();
        snake
    }

    pub fn segments(&self) -> impl Iterator<Item = Cell> + '_ {
        self.segments.iter().copied()
    }

    pub fn head(&self) -> Option<Cell> {
        self.segments.front().copied()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    fn layout(&mut self) {
        self.segments = VecDeque::from([START]);
        self.heading = Direction::Right;
        self.food = self.free_cell();
    }

    /// Random cell not covered by the snake
    fn free_cell(&mut self) -> Option<Cell> {
        let free: Vec<Cell> = (0..ROWS)
            .flat_map(|row| (0..COLS).map(move |col| Cell::new(row, col)))
            .filter(|cell| !self.segments.contains(cell))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }

    /// Last turn orthogonal to the current heading wins
    fn steer(&mut self, input: &TickInput) {
        let current = self.heading;
        for intent in &input.intents {
            if let Intent::Move(dir) = *intent {
                if dir.is_orthogonal_to(current) {
                    self.heading = dir;
                } else {
                    log::trace!("Snake ignoring turn {dir:?} while heading {current:?}");
                }
            }
        }
    }
}

impl Game for Snake {
    fn spec(&self) -> &'static GameSpec {
        &SPEC
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn start(&mut self) {
        self.layout();
        self.session.begin();
    }

    fn stop(&mut self) {
        self.session.halt();
    }

    fn reset(&mut self) {
        self.layout();
        self.session.reset();
    }

    fn tick(&mut self, input: &TickInput) {
        if !self.session.is_playing() {
            return;
        }
        let Some(head) = self.head() else {
            return;
        };
        let previous = self.heading;
        self.steer(input);

        let next = head.step(self.heading).wrapped(ROWS, COLS);
        // Includes the tail: it has not moved out of the way yet
        if self.segments.contains(&next) {
            self.heading = previous;
            self.session.lose();
            return;
        }

        self.segments.push_front(next);
        if self.food == Some(next) {
            self.session.award(POINTS_PER_FOOD);
            self.food = self.free_cell();
        } else {
            self.segments.pop_back();
        }
    }

    fn render(&self, out: &mut DrawList) {
        out.fill_rect(0.0, 0.0, SPEC.width, SPEC.height, palette::SNAKE_BG);
        for (i, cell) in self.segments.iter().enumerate() {
            let color = if i == 0 { palette::GREEN } else { palette::SNAKE_BODY };
            out.fill_rect(
                cell.col as f32 * CELL,
                cell.row as f32 * CELL,
                CELL - 1.0,
                CELL - 1.0,
                color,
            );
        }
        if let Some(food) = self.food {
            out.fill_rect(
                food.col as f32 * CELL,
                food.row as f32 * CELL,
                CELL - 1.0,
                CELL - 1.0,
                palette::RED,
            );
        }
    }

    fn entities(&self) -> Vec<Entity> {
        self.segments.iter().copied().map(Entity::SnakeSegment).collect()
    }

    fn playfield(&self) -> Aabb {
        Aabb::from_min_size(Vec2::ZERO, Vec2::new(COLS as f32, ROWS as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::game_rng;
    use crate::games::testing::*;
    use crate::sim::Status;

    fn playing() -> Snake {
        let mut game = Snake::new(game_rng(GameId::Snake, 11));
        game.start();
        game
    }

    fn step(game: &mut Snake, dir: Option<Direction>) {
        let intents = dir.map(Intent::Move).into_iter().collect();
        game.tick(&TickInput::new(intents));
    }

    #[test]
    fn test_moves_and_wraps() {
        let mut game = playing();
        game.food = None;
        step(&mut game, None);
        assert_eq!(game.head(), Some(Cell::new(10, 11)));
        for _ in 0..9 {
            step(&mut game, None);
        }
        // Col 19 -> 0
        assert_eq!(game.head(), Some(Cell::new(10, 0)));
        step(&mut game, Some(Direction::Up));
        assert_eq!(game.head(), Some(Cell::new(9, 0)));
    }

    #[test]
    fn test_reverse_turn_rejected() {
        let mut game = playing();
        game.food = None;
        step(&mut game, Some(Direction::Left));
        assert_eq!(game.heading(), Direction::Right);
        assert_eq!(game.head(), Some(Cell::new(10, 11)));

        // Both turns are judged against the heading the snake is moving in,
        // so Left cannot follow Up within one step
        game.tick(&TickInput::new(vec![
            Intent::Move(Direction::Up),
            Intent::Move(Direction::Left),
        ]));
        assert_eq!(game.heading(), Direction::Up);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut game = playing();
        game.food = Some(Cell::new(10, 11));
        step(&mut game, None);
        assert_eq!(game.session().score(), 10);
        assert_eq!(game.segments().count(), 2);
        let food = game.food().unwrap();
        assert!(game.segments().all(|s| s != food));
    }

    #[test]
    fn test_self_collision_loses_with_entities_unchanged() {
        let mut game = playing();
        game.food = None;
        // Ring: head at (5,5) heading Down into its own body
        game.segments = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(5, 6),
            Cell::new(6, 6),
            Cell::new(6, 5),
            Cell::new(7, 5),
        ]);
        game.heading = Direction::Left;
        let before = game.entities();

        step(&mut game, Some(Direction::Down));

        assert_eq!(game.session().status(), Status::Lost);
        assert_eq!(game.entities(), before);
    }

    #[test]
    fn test_tail_counts_as_body() {
        let mut game = playing();
        game.food = None;
        // 2x2 loop: next head lands on the current tail
        game.segments = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(5, 6),
            Cell::new(6, 6),
            Cell::new(6, 5),
        ]);
        game.heading = Direction::Left;
        step(&mut game, Some(Direction::Down));
        assert_eq!(game.session().status(), Status::Lost);
    }

    #[test]
    fn test_long_run_in_bounds() {
        let mut game = playing();
        let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        for i in 0..400 {
            let dir = (i % 5 == 0).then(|| turns[(i / 5) % 4]);
            step(&mut game, dir);
            if !game.session().is_playing() {
                break;
            }
            assert_in_bounds(&game);
        }
        assert_render_idempotent(&game);
    }
}
