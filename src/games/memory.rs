//! Pair-matching memory grid
//!
//! Sixteen face-down cards hold eight symbol pairs. Turning a second card
//! counts a move and schedules the pair's resolution: a match locks both
//! cards face up after 500 ms, a mismatch turns them back after 1000 ms.
//! No other card can be turned while a pair is pending.

use std::time::Duration;

use glam::Vec2;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::{Game, GameId, GameSpec};
use crate::renderer::{DrawList, palette};
use crate::sim::{
    Aabb, Board, Cell, Delay, Direction, Entity, Intent, MemoryCard, Session, TickInput,
};

pub static SPEC: GameSpec = GameSpec::continuous(
    GameId::Memory,
    "Memory",
    "Find all eight pairs in as few moves as possible",
    EDGE,
    EDGE,
    true,
);

pub const GRID: usize = 4;
pub const SYMBOLS: [&str; 8] = ["🤡", "💩", "👹", "💀", "🤮", "🔥", "⚡", "🌈"];
const CARD: f32 = 48.0;
const GAP: f32 = 4.0;
const PITCH: f32 = CARD + GAP;
const EDGE: f32 = GAP + GRID as f32 * PITCH;
const MATCH_DELAY: Duration = Duration::from_millis(500);
const MISMATCH_DELAY: Duration = Duration::from_millis(1000);
const POINTS_PER_PAIR: u32 = 100;

/// A turned pair waiting to be resolved
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pair {
    first: Cell,
    second: Cell,
    matched: bool,
}

/// Top-left pixel of a card
fn card_origin(cell: Cell) -> Vec2 {
    Vec2::new(
        GAP + cell.col as f32 * PITCH,
        GAP + cell.row as f32 * PITCH,
    )
}

/// Card under a canvas point; the gaps between cards hit nothing
pub fn card_at(point: Vec2) -> Option<Cell> {
    let local = point - Vec2::splat(GAP);
    if local.x < 0.0 || local.y < 0.0 {
        return None;
    }
    let (col, row) = ((local.x / PITCH) as i32, (local.y / PITCH) as i32);
    let inside = local.x - col as f32 * PITCH < CARD && local.y - row as f32 * PITCH < CARD;
    let cell = Cell::new(row, col);
    (inside && row < GRID as i32 && col < GRID as i32).then_some(cell)
}

pub struct Memory {
    session: Session,
    rng: Pcg32,
    cards: Board<MemoryCard>,
    /// Card turned first in the current pair
    first: Option<Cell>,
    pending: Option<Delay<Pair>>,
    cursor: Cell,
}

impl Memory {
    pub fn new(rng: Pcg32) -> Self {
        let mut game = Self {
            session: Session::new(),
            rng,
            cards: Board::new(GRID, GRID),
            first: None,
            pending: None,
            cursor: Cell::default(),
        };
        game.deal();
        game
    }

    pub fn cards(&self) -> &Board<MemoryCard> {
        &self.cards
    }

    pub fn cursor(&self) -> Cell {
        self.cursor
    }

    pub fn is_resolving(&self) -> bool {
        self.pending.as_ref().is_some_and(Delay::is_pending)
    }

    fn deal(&mut self) {
        let mut deck: Vec<u8> = (0..SYMBOLS.len() as u8).flat_map(|s| [s, s]).collect();
        deck.shuffle(&mut self.rng);
        let cards = deck.into_iter().map(MemoryCard::new).collect();
        match Board::from_cells(GRID, GRID, cards) {
            Some(cards) => self.cards = cards,
            None => log::warn!("Memory deck does not fill a {GRID}x{GRID} grid"),
        }
        self.first = None;
        self.pending = None;
        self.cursor = Cell::default();
    }

    fn flip(&mut self, cell: Cell) {
        if self.is_resolving() {
            log::trace!("Memory flip at {cell:?} ignored while a pair resolves");
            return;
        }
        let Some(card) = self.cards.at_mut(cell) else {
            return;
        };
        if card.is_face_up() {
            return;
        }
        card.flipped = true;
        let symbol = card.symbol;

        let Some(first) = self.first.take() else {
            self.first = Some(cell);
            return;
        };
        self.session.count_move();
        let matched = self.cards.at(first).is_some_and(|c| c.symbol == symbol);
        let delay = if matched { MATCH_DELAY } else { MISMATCH_DELAY };
        self.pending = Some(Delay::new(
            delay,
            Pair {
                first,
                second: cell,
                matched,
            },
        ));
    }

    fn resolve(&mut self, pair: Pair) {
        for cell in [pair.first, pair.second] {
            if let Some(card) = self.cards.at_mut(cell) {
                if pair.matched {
                    card.matched = true;
                } else {
                    card.flipped = false;
                }
            }
        }
        log::debug!(
            "Memory pair {:?}/{:?} resolved, matched={}",
            pair.first,
            pair.second,
            pair.matched
        );
        if pair.matched {
            self.session.award(POINTS_PER_PAIR);
            if self.cards.values().all(|c| c.matched) {
                self.session.win();
            }
        }
    }

    fn move_cursor(&mut self, dir: Direction) {
        let next = self.cursor.step(dir);
        if self.cards.contains(next.row, next.col) {
            self.cursor = next;
        }
    }
}

impl Game for Memory {
    fn spec(&self) -> &'static GameSpec {
        &SPEC
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn start(&mut self) {
        self.deal();
        self.session.begin();
    }

    fn stop(&mut self) {
        self.session.halt();
        self.pending = None;
    }

    fn reset(&mut self) {
        self.deal();
        self.session.reset();
    }

    fn tick(&mut self, input: &TickInput) {
        if !self.session.is_playing() {
            return;
        }
        if let Some(pair) = self.pending.as_mut().and_then(|d| d.poll(SPEC.tick)) {
            self.pending = None;
            self.resolve(pair);
        }
        for intent in &input.intents {
            if !self.session.is_playing() {
                return;
            }
            match *intent {
                Intent::Click(p) => {
                    if let Some(cell) = card_at(p) {
                        self.cursor = cell;
                        self.flip(cell);
                    }
                }
                Intent::Move(dir) => self.move_cursor(dir),
                Intent::Fire => self.flip(self.cursor),
                Intent::Point(_) => {}
            }
        }
    }

    fn render(&self, out: &mut DrawList) {
        out.fill_rect(0.0, 0.0, EDGE, EDGE, palette::MEMORY_BG);
        for (cell, card) in self.cards.iter() {
            let origin = card_origin(cell);
            let color = if card.matched {
                palette::CARD_MATCHED
            } else if card.flipped {
                palette::CARD_FACE
            } else {
                palette::CARD_HIDDEN
            };
            out.fill_rect(origin.x, origin.y, CARD, CARD, color);
            let face = if card.is_face_up() {
                SYMBOLS.get(card.symbol as usize).copied().unwrap_or("?")
            } else {
                "❓"
            };
            out.text(face, origin.x + 12.0, origin.y + 32.0, "24px sans-serif", palette::BLACK);
        }
        let cursor = card_origin(self.cursor);
        out.stroke_rect(cursor.x, cursor.y, CARD, CARD, palette::WHITE, 2.0);
    }

    fn entities(&self) -> Vec<Entity> {
        self.cards
            .iter()
            .map(|(cell, card)| Entity::MemoryCard { cell, card: *card })
            .collect()
    }

    fn playfield(&self) -> Aabb {
        Aabb::from_min_size(Vec2::ZERO, Vec2::splat(GRID as f32))
    }
}
