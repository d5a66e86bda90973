//! Match-chain shooter
//!
//! A chain of coloured beads crawls along a sine track toward the right edge.
//! Shots that touch a bead are inserted in front of it shortly after impact;
//! three or more equal neighbours vanish, and gaps that close into new runs
//! vanish too.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId, GameSpec};
use crate::renderer::{Color, DrawList, palette};
use crate::sim::chain::{BEAD_SIZE, track_y};
use crate::sim::{Ball, Body, Chain, Delay, Entity, Intent, Session, TickInput, advance};

pub static SPEC: GameSpec = GameSpec::continuous(
    GameId::Chain,
    "Chain",
    "Shoot beads into the chain and match three before it reaches the end",
    WIDTH,
    HEIGHT,
    true,
);

const WIDTH: f32 = 500.0;
const HEIGHT: f32 = 400.0;
const SHOOTER: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT - 50.0);
const SHOOTER_SIZE: f32 = 30.0;
const SHOT_SPEED: f32 = 8.0;
const CHAIN_LENGTH: usize = 15;
const CHAIN_START: f32 = 50.0;
/// Track advance per tick
const CHAIN_SPEED: f32 = 0.5;
/// The session is lost once the last bead passes this x
const TRACK_END: f32 = WIDTH - 50.0;
const INSERT_DELAY: Duration = Duration::from_millis(48);
const COLORS: [Color; 5] = [
    palette::RED,
    palette::GREEN,
    palette::BLUE,
    palette::YELLOW,
    palette::MAGENTA,
];

/// A shot that hit the chain and is waiting to be inserted
#[derive(Debug, Clone, Copy, PartialEq)]
struct Landing {
    /// Bead the shot hit; the new bead goes in front of it
    target: u32,
    /// Index to use if the target was removed meanwhile
    fallback: usize,
    color: Color,
}

pub struct ChainShooter {
    session: Session,
    rng: Pcg32,
    chain: Chain,
    shots: Vec<Ball>,
    landings: Vec<Delay<Landing>>,
    /// Radians, screen space (y down)
    aim: f32,
    next_color: Color,
}

impl ChainShooter {
    pub fn new(rng: Pcg32) -> Self {
        let mut game = Self {
            session: Session::new(),
            rng,
            chain: Chain::default(),
            shots: Vec::new(),
            landings: Vec::new(),
            aim: -FRAC_PI_2,
            next_color: COLORS[0],
        };
        game.layout();
        game
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn shots(&self) -> &[Ball] {
        &self.shots
    }

    pub fn aim(&self) -> f32 {
        self.aim
    }

    pub fn next_color(&self) -> Color {
        self.next_color
    }

    pub fn pending_landings(&self) -> usize {
        self.landings.iter().filter(|d| d.is_pending()).count()
    }

    fn random_color(&mut self) -> Color {
        COLORS[self.rng.random_range(0..COLORS.len())]
    }

    fn layout(&mut self) {
        let colors: Vec<Color> = (0..CHAIN_LENGTH).map(|_| self.random_color()).collect();
        self.chain = Chain::new(colors, CHAIN_START);
        self.shots.clear();
        self.landings.clear();
        self.aim = -FRAC_PI_2;
        self.next_color = self.random_color();
    }

    fn aim_at(&mut self, target: Vec2) {
        let d = target - SHOOTER;
        if d != Vec2::ZERO {
            self.aim = d.y.atan2(d.x);
        }
    }

    fn fire(&mut self) {
        let vel = Vec2::from_angle(self.aim) * SHOT_SPEED;
        let mut body = Body::new(Vec2::ZERO, Vec2::splat(BEAD_SIZE)).with_velocity(vel);
        body.set_center(SHOOTER);
        self.shots.push(Ball {
            body,
            color: self.next_color,
        });
        self.next_color = self.random_color();
    }

    fn land(&mut self, landing: Landing) {
        let index = self
            .chain
            .index_of(landing.target)
            .unwrap_or(landing.fallback.min(self.chain.len()));
        self.chain.insert(index, landing.color);
        let points = self.chain.digest_match(index);
        self.session.award(points);
    }

    fn step_shots(&mut self) {
        let canvas = SPEC.canvas();
        for shot in &mut self.shots {
            advance(&mut shot.body, 1.0);
        }
        self.shots.retain(|shot| canvas.contains_point(shot.body.pos));

        let mut i = 0;
        while i < self.shots.len() {
            let center = self.shots[i].body.center();
            match self.chain.hit_test(center, BEAD_SIZE) {
                Some(index) => {
                    let shot = self.shots.remove(i);
                    let target = self.chain.beads()[index].id;
                    self.landings.push(Delay::new(
                        INSERT_DELAY,
                        Landing {
                            target,
                            fallback: index,
                            color: shot.color,
                        },
                    ));
                }
                None => i += 1,
            }
        }
    }
}

impl Game for ChainShooter {
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
        self.landings.clear();
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
            match *intent {
                Intent::Point(p) => self.aim_at(p),
                Intent::Click(p) => {
                    self.aim_at(p);
                    self.fire();
                }
                Intent::Fire => self.fire(),
                _ => {}
            }
        }

        // Landings scheduled on earlier ticks
        let due: Vec<Landing> = self
            .landings
            .iter_mut()
            .filter_map(|delay| delay.poll(SPEC.tick))
            .collect();
        self.landings.retain(Delay::is_pending);
        for landing in due {
            self.land(landing);
        }

        self.chain.advance(CHAIN_SPEED);
        self.step_shots();

        if self.chain.is_empty() && self.landings.is_empty() {
            self.session.win();
        } else if self.chain.tail_x().is_some_and(|x| x > TRACK_END) {
            self.session.lose();
        }
    }

    fn render(&self, out: &mut DrawList) {
        out.fill_rect(0.0, 0.0, WIDTH, HEIGHT, palette::CHAIN_BG);

        let track = (0..50)
            .map(|i| {
                let x = i as f32 * 10.0;
                [x, track_y(x)]
            })
            .collect();
        out.line(track, palette::RED, 40.0);

        for i in 0..self.chain.len() {
            let x = self.chain.bead_x(i);
            let y = track_y(x) - BEAD_SIZE / 2.0;
            let color = self.chain.beads()[i].color;
            out.fill_rect(x, y, BEAD_SIZE, BEAD_SIZE, color);
            out.stroke_rect(x, y, BEAD_SIZE, BEAD_SIZE, palette::BLACK, 2.0);
        }

        let half = SHOOTER_SIZE / 2.0;
        out.fill_rect(
            SHOOTER.x - half,
            SHOOTER.y - half,
            SHOOTER_SIZE,
            SHOOTER_SIZE,
            palette::MAGENTA,
        );
        let muzzle = SHOOTER + Vec2::from_angle(self.aim) * SHOOTER_SIZE;
        out.line(
            vec![SHOOTER.to_array(), muzzle.to_array()],
            self.next_color,
            BEAD_SIZE,
        );

        for shot in &self.shots {
            let b = &shot.body;
            out.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y, shot.color);
        }

        let font = "bold 20px monospace";
        out.text(format!("SCORE: {}", self.session.score()), 10.0, 30.0, font, palette::RED);
        out.text(format!("BEADS: {}", self.chain.len()), 10.0, 60.0, font, palette::RED);
    }

    fn entities(&self) -> Vec<Entity> {
        let beads = self
            .chain
            .beads()
            .iter()
            .enumerate()
            .map(|(i, bead)| Entity::ChainBead {
                bead: *bead,
                pos: self.chain.position(i),
                size: BEAD_SIZE,
            });
        let shots = self.shots.iter().map(|shot| Entity::Ball(*shot));
        beads.chain(shots).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::game_rng;
    use crate::games::testing::*;
    use crate::renderer::palette::{BLUE, GREEN, RED, YELLOW};
    use crate::sim::Status;

    fn playing_with(colors: &[Color]) -> ChainShooter {
        let mut game = ChainShooter::new(game_rng(GameId::Chain, 2));
        game.start();
        game.chain = Chain::new(colors.iter().copied(), CHAIN_START);
        game
    }

    /// Put a shot right on top of the bead at `index`
    fn shoot_at(game: &mut ChainShooter, index: usize, color: Color) {
        let target = game.chain.position(index);
        let mut body = Body::new(Vec2::ZERO, Vec2::splat(BEAD_SIZE));
        body.set_center(target + Vec2::new(CHAIN_SPEED, 0.0));
        game.shots.push(Ball { body, color });
    }

    #[test]
    fn test_aim_follows_pointer() {
        let mut game = playing_with(&[RED, GREEN]);
        game.tick(&TickInput::new(vec![Intent::Point(SHOOTER + Vec2::new(10.0, 0.0))]));
        assert!(game.aim().abs() < 1e-6);
        game.tick(&TickInput::new(vec![Intent::Point(SHOOTER + Vec2::new(0.0, -10.0))]));
        assert!((game.aim() + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_fire_launches_shot_and_rolls_color() {
        let mut game = playing_with(&[RED, GREEN]);
        let color = game.next_color();
        game.tick(&TickInput::new(vec![Intent::Fire]));
        assert_eq!(game.shots().len(), 1);
        assert_eq!(game.shots()[0].color, color);
        let shot = game.shots()[0].body;
        assert!((shot.vel - Vec2::new(0.0, -SHOT_SPEED)).length() < 1e-4);
        // Moved once this tick
        assert!((shot.center() - (SHOOTER + shot.vel)).length() < 1e-4);
    }

    #[test]
    fn test_hit_inserts_after_delay_and_removes_run() {
        let mut game = playing_with(&[BLUE, RED, RED, GREEN, YELLOW]);
        shoot_at(&mut game, 1, RED);
        game.tick(&TickInput::default());
        assert!(game.shots().is_empty());
        assert_eq!(game.pending_landings(), 1);
        assert_eq!(game.chain().len(), 5);

        // 48 ms = three ticks
        game.tick(&TickInput::default());
        game.tick(&TickInput::default());
        assert_eq!(game.chain().len(), 5);
        game.tick(&TickInput::default());

        assert_eq!(game.pending_landings(), 0);
        assert_eq!(game.session().score(), 300);
        let colors: Vec<_> = game.chain().beads().iter().map(|b| b.color).collect();
        assert_eq!(colors, vec![BLUE, GREEN, YELLOW]);
    }

    #[test]
    fn test_stop_cancels_pending_landing() {
        let mut game = playing_with(&[BLUE, RED, RED, GREEN, YELLOW]);
        shoot_at(&mut game, 1, RED);
        game.tick(&TickInput::default());
        assert_eq!(game.pending_landings(), 1);

        game.stop();
        assert_eq!(game.pending_landings(), 0);
        assert_eq!(game.session().status(), Status::Idle);
        for _ in 0..4 {
            game.tick(&TickInput::default());
        }
        assert_eq!(game.chain().len(), 5);
        assert_eq!(game.session().score(), 0);
    }

    #[test]
    fn test_reset_cancels_pending_landing() {
        let mut game = playing_with(&[BLUE, RED, RED, GREEN, YELLOW]);
        shoot_at(&mut game, 1, RED);
        game.tick(&TickInput::default());
        assert_eq!(game.pending_landings(), 1);

        game.reset();
        assert_eq!(game.pending_landings(), 0);
        assert!(game.shots().is_empty());
        assert_eq!(game.session().status(), Status::Idle);
        assert_eq!(game.chain().len(), CHAIN_LENGTH);

        game.start();
        for _ in 0..4 {
            game.tick(&TickInput::default());
        }
        assert_eq!(game.pending_landings(), 0);
        assert_eq!(game.chain().len(), CHAIN_LENGTH);
        assert_eq!(game.session().score(), 0);
    }

    #[test]
    fn test_two_beads_are_not_a_run() {
        let mut game = playing_with(&[BLUE, RED, GREEN]);
        shoot_at(&mut game, 1, RED);
        for _ in 0..4 {
            game.tick(&TickInput::default());
        }
        assert_eq!(game.chain().len(), 4);
        assert_eq!(game.session().score(), 0);
    }

    #[test]
    fn test_emptying_chain_wins() {
        let mut game = playing_with(&[RED, RED]);
        shoot_at(&mut game, 0, RED);
        for _ in 0..4 {
            game.tick(&TickInput::default());
        }
        assert!(game.chain().is_empty());
        assert_eq!(game.session().status(), Status::Won);
    }

    #[test]
    fn test_chain_reaching_end_loses() {
        let mut game = playing_with(&[RED, GREEN, BLUE]);
        let mut ticks = 0;
        while game.session().is_playing() {
            game.tick(&TickInput::default());
            assert_in_bounds(&game);
            ticks += 1;
        }
        assert_eq!(game.session().status(), Status::Lost);
        // Tail starts at 50 + 2 * 22 and must pass 450
        assert_eq!(ticks, ((TRACK_END - 94.0) / CHAIN_SPEED) as usize + 1);
    }

    #[test]
    fn test_shots_leave_canvas() {
        let mut game = playing_with(&[RED]);
        game.tick(&TickInput::new(vec![Intent::Click(SHOOTER + Vec2::new(0.0, 10.0))]));
        for _ in 0..10 {
            game.tick(&TickInput::default());
        }
        assert!(game.shots().is_empty());
    }

    #[test]
    fn test_render_idempotent() {
        let mut game = playing_with(&[RED, GREEN, BLUE]);
        game.tick(&TickInput::new(vec![Intent::Fire]));
        assert_render_idempotent(&game);
    }
}
