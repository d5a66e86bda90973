//! Falling-block stacker
//!
//! 10x20 board. Gravity pulls the active piece down every 500 ms; a piece
//! that cannot fall is written into the board, full rows are cleared and the
//! next piece spawns. A blocked spawn ends the session.

use std::time::Duration;

use glam::Vec2;
use rand_pcg::Pcg32;

use super::{Game, GameId, GameSpec};
use crate::renderer::{Color, DrawList, palette};
use crate::sim::{
    Aabb, Board, Cell, Direction, Entity, Intent, Session, Tetromino, TetrominoKind, TickInput,
};

pub static SPEC: GameSpec = GameSpec::continuous(
    GameId::Tetris,
    "Tetris",
    "Stack falling pieces and clear full rows",
    COLS as f32 * CELL,
    ROWS as f32 * CELL,
    false,
);

pub const COLS: usize = 10;
pub const ROWS: usize = 20;
const CELL: f32 = 25.0;
const GRAVITY: Duration = Duration::from_millis(500);
const POINTS_PER_ROW: u32 = 100;
const SPAWN: Cell = Cell::new(0, COLS as i32 / 2 - 1);

pub struct Tetris {
    session: Session,
    rng: Pcg32,
    board: Board<Option<Color>>,
    piece: Option<Tetromino>,
    gravity: Duration,
}

impl Tetris {
    pub fn new(rng: Pcg32) -> Self {
        Self {
            session: Session::new(),
            rng,
            board: Board::new(ROWS, COLS),
            piece: None,
            gravity: Duration::ZERO,
        }
    }

    pub fn board(&self) -> &Board<Option<Color>> {
        &self.board
    }

    pub fn piece(&self) -> Option<&Tetromino> {
        self.piece.as_ref()
    }

    fn spawn(&mut self) {
        let kind = TetrominoKind::random(&mut self.rng);
        let piece = Tetromino::new(kind, SPAWN);
        if piece.fits(&self.board) {
            self.piece = Some(piece);
        } else {
            log::debug!("Spawn of {kind:?} blocked");
            self.piece = None;
            self.session.lose();
        }
    }

    /// Try to shift the active piece; returns whether it moved
    fn shift(&mut self, drow: i32, dcol: i32) -> bool {
        let Some(piece) = &self.piece else {
            return false;
        };
        let moved = piece.moved(drow, dcol);
        if moved.fits(&self.board) {
            self.piece = Some(moved);
            true
        } else {
            false
        }
    }

    fn rotate(&mut self) {
        if let Some(piece) = &self.piece {
            let rotated = piece.rotated();
            if rotated.fits(&self.board) {
                self.piece = Some(rotated);
            }
        }
    }

    /// Move down one row, locking the piece when it cannot fall
    fn drop_one(&mut self) {
        if self.shift(1, 0) {
            return;
        }
        let Some(piece) = self.piece.take() else {
            return;
        };
        piece.place_on(&mut self.board);
        let cleared = self.board.clear_full_rows();
        if cleared > 0 {
            log::debug!("Cleared {cleared} rows");
            self.session.award(cleared as u32 * POINTS_PER_ROW);
        }
        self.spawn();
    }

    fn layout(&mut self) {
        self.board.clear();
        self.piece = None;
        self.gravity = Duration::ZERO;
    }
}

impl Game for Tetris {
    fn spec(&self) -> &'static GameSpec {
        &SPEC
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn start(&mut self) {
        self.layout();
        self.session.begin();
        self.spawn();
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
        for intent in &input.intents {
            match intent {
                Intent::Move(Direction::Left) => {
                    self.shift(0, -1);
                }
                Intent::Move(Direction::Right) => {
                    self.shift(0, 1);
                }
                Intent::Move(Direction::Down) => self.drop_one(),
                Intent::Move(Direction::Up) | Intent::Fire => self.rotate(),
                _ => {}
            }
            if !self.session.is_playing() {
                return;
            }
        }

        self.gravity += SPEC.tick;
        if self.gravity >= GRAVITY {
            self.gravity -= GRAVITY;
            self.drop_one();
        }
    }

    fn render(&self, out: &mut DrawList) {
        out.fill_rect(0.0, 0.0, SPEC.width, SPEC.height, palette::TETRIS_BG);
        let mut cell = |c: Cell, color: Color| {
            let (x, y) = (c.col as f32 * CELL, c.row as f32 * CELL);
            out.fill_rect(x, y, CELL, CELL, color);
            out.stroke_rect(x, y, CELL, CELL, palette::BLACK, 1.0);
        };
        for (c, value) in self.board.iter() {
            if let Some(color) = value {
                cell(c, *color);
            }
        }
        if let Some(piece) = &self.piece {
            for c in piece.cells() {
                cell(c, piece.color());
            }
        }
    }

    fn entities(&self) -> Vec<Entity> {
        self.piece.iter().cloned().map(Entity::Piece).collect()
    }

    fn playfield(&self) -> Aabb {
        Aabb::from_min_size(Vec2::ZERO, Vec2::new(COLS as f32, ROWS as f32))
    }
}
