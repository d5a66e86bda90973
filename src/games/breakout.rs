//! Brick wall breaker
//!
//! Paddle follows the pointer (or arrow keys). Any brick hit inverts the
//! ball's vertical velocity regardless of which face was struck.

use glam::Vec2;

use super::{Game, GameId, GameSpec};
use crate::renderer::{Color, DrawList, palette};
use crate::sim::{
    Axis, Ball, Body, BoundsPolicy, Brick, Direction, Entity, Intent, Paddle, Session, TickInput,
    advance, constrain_axis, overlaps,
};

pub static SPEC: GameSpec = GameSpec::continuous(
    GameId::Breakout,
    "Breakout",
    "Clear the wall without dropping the ball",
    WIDTH,
    HEIGHT,
    true,
);

const WIDTH: f32 = 300.0;
const HEIGHT: f32 = 250.0;
const PADDLE_WIDTH: f32 = 60.0;
const PADDLE_HEIGHT: f32 = 10.0;
const PADDLE_Y: f32 = HEIGHT - 20.0;
const PADDLE_STEP: f32 = 10.0;
const BALL_SIZE: f32 = 8.0;
const BALL_START: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT - 30.0);
const BALL_VELOCITY: Vec2 = Vec2::new(3.0, -3.0);
const BRICK_WIDTH: f32 = 30.0;
const BRICK_HEIGHT: f32 = 15.0;
const BRICK_ROWS: usize = 4;
const BRICK_COLS: usize = 10;
const POINTS_PER_BRICK: u32 = 10;
const ROW_COLORS: [Color; BRICK_ROWS] =
    [palette::RED, palette::YELLOW, palette::GREEN, palette::BLUE];

pub struct Breakout {
    session: Session,
    paddle: Paddle,
    ball: Ball,
    bricks: Vec<Brick>,
}

impl Breakout {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            paddle: initial_paddle(),
            ball: initial_ball(),
            bricks: wall(),
        }
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.visible).count()
    }

    fn layout(&mut self) {
        self.paddle = initial_paddle();
        self.ball = initial_ball();
        self.bricks = wall();
    }

    fn move_paddle(&mut self, dx: f32) {
        self.paddle.body.pos.x += dx;
        self.clamp_paddle();
    }

    fn clamp_paddle(&mut self) {
        constrain_axis(&mut self.paddle.body, Axis::X, 0.0, WIDTH, BoundsPolicy::Clamp);
    }

    fn apply_intents(&mut self, input: &TickInput) {
        for intent in &input.intents {
            match *intent {
                Intent::Move(Direction::Left) => self.move_paddle(-PADDLE_STEP),
                Intent::Move(Direction::Right) => self.move_paddle(PADDLE_STEP),
                Intent::Point(p) => {
                    self.paddle.body.pos.x = p.x - PADDLE_WIDTH / 2.0;
                    self.clamp_paddle();
                }
                _ => {}
            }
        }
    }

    fn step_ball(&mut self) {
        let body = &mut self.ball.body;
        advance(body, 1.0);
        constrain_axis(body, Axis::X, 0.0, WIDTH, BoundsPolicy::Reflect);
        // Only the top wall reflects; the bottom is the baseline
        if body.pos.y < 0.0 {
            body.pos.y = 0.0;
            body.vel.y = body.vel.y.abs();
        }

        if overlaps(&body.aabb(), &self.paddle.body.aabb()) {
            body.vel.y = -body.vel.y.abs();
            body.pos.y = PADDLE_Y - BALL_SIZE;
        }

        let ball_box = body.aabb();
        let mut hits = 0;
        for brick in self.bricks.iter_mut().filter(|b| b.visible) {
            if overlaps(&ball_box, &brick.body.aabb()) {
                brick.visible = false;
                hits += 1;
            }
        }
        if hits > 0 {
            body.vel.y = -body.vel.y;
            self.session.award(hits * POINTS_PER_BRICK);
        }

        if body.pos.y + BALL_SIZE > HEIGHT {
            self.session.lose();
        } else if self.bricks_left() == 0 {
            self.session.win();
        }
    }
}

fn initial_paddle() -> Paddle {
    Paddle {
        body: Body::new(
            Vec2::new(WIDTH / 2.0 - PADDLE_WIDTH / 2.0, PADDLE_Y),
            Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
        ),
        color: palette::MAGENTA,
    }
}

fn initial_ball() -> Ball {
    Ball {
        body: Body::new(BALL_START, Vec2::splat(BALL_SIZE)).with_velocity(BALL_VELOCITY),
        color: palette::YELLOW,
    }
}

fn wall() -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for (row, color) in ROW_COLORS.iter().enumerate() {
        for col in 0..BRICK_COLS {
            let pos = Vec2::new(
                col as f32 * (BRICK_WIDTH + 2.0) + 5.0,
                row as f32 * (BRICK_HEIGHT + 2.0) + 30.0,
            );
            bricks.push(Brick {
                body: Body::new(pos, Vec2::new(BRICK_WIDTH, BRICK_HEIGHT)),
                color: *color,
                visible: true,
            });
        }
    }
    bricks
}

impl Default for Breakout {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Breakout {
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
        self.apply_intents(input);
        self.step_ball();
    }

    fn render(&self, out: &mut DrawList) {
        out.fill_rect(0.0, 0.0, WIDTH, HEIGHT, palette::BREAKOUT_BG);
        for brick in self.bricks.iter().filter(|b| b.visible) {
            let b = &brick.body;
            out.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y, brick.color);
        }
        let p = &self.paddle.body;
        out.fill_rect(p.pos.x, p.pos.y, p.size.x, p.size.y, self.paddle.color);
        let b = &self.ball.body;
        out.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y, self.ball.color);
    }

    fn entities(&self) -> Vec<Entity> {
        let mut entities = vec![Entity::Paddle(self.paddle), Entity::Ball(self.ball)];
        entities.extend(
            self.bricks
                .iter()
                .filter(|b| b.visible)
                .map(|b| Entity::Brick(*b)),
        );
        entities
    }
}
