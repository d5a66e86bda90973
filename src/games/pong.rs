//! Paddle/ball duel against a pursuit AI
//!
//! The player defends the left baseline. Getting the ball past the AI scores
//! a point and re-serves after a pause; letting it past the player ends the
//! session.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId, GameSpec};
use crate::renderer::{DrawList, palette};
use crate::sim::{
    Axis, Ball, Body, BoundsPolicy, Delay, Direction, Entity, Intent, Paddle, Session, TickInput,
    advance, bounce, constrain_axis, contact_normal, overlaps, pursue,
};

pub static SPEC: GameSpec = GameSpec::continuous(
    GameId::Pong,
    "Pong",
    "Keep the ball out of your goal; beat the AI paddle to score",
    WIDTH,
    HEIGHT,
    true,
);

const WIDTH: f32 = 400.0;
const HEIGHT: f32 = 300.0;
const PADDLE_WIDTH: f32 = 10.0;
const PADDLE_HEIGHT: f32 = 60.0;
const PLAYER_X: f32 = 10.0;
const AI_X: f32 = WIDTH - 20.0;
const BALL_SIZE: f32 = 10.0;
/// Player step per key press
const PADDLE_SPEED: f32 = 5.0;
/// AI is slightly slower than the player
const AI_SPEED: f32 = PADDLE_SPEED * 0.7;
const AI_DEAD_ZONE: f32 = 10.0;
const SERVE_DX: f32 = 3.0;
/// Ball speeds up by this fraction every tick
const ACCELERATION: f32 = 0.001;
const SERVE_DELAY: Duration = Duration::from_secs(1);

pub struct Pong {
    session: Session,
    rng: Pcg32,
    player: Paddle,
    ai: Paddle,
    ball: Ball,
    ai_points: u32,
    /// Ticks since the session started; drives ball acceleration
    elapsed_ticks: u32,
    serve: Option<Delay<()>>,
}

impl Pong {
    pub fn new(rng: Pcg32) -> Self {
        let mut pong = Self {
            session: Session::new(),
            rng,
            player: paddle(PLAYER_X, palette::GREEN),
            ai: paddle(AI_X, palette::MAGENTA),
            ball: centered_ball(Vec2::new(SERVE_DX, 2.0)),
            ai_points: 0,
            elapsed_ticks: 0,
            serve: None,
        };
        pong.reset();
        pong
    }

    pub fn player(&self) -> &Paddle {
        &self.player
    }

    pub fn ai(&self) -> &Paddle {
        &self.ai
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn ai_points(&self) -> u32 {
        self.ai_points
    }

    pub fn is_serving(&self) -> bool {
        self.serve.as_ref().is_some_and(Delay::is_pending)
    }

    fn layout(&mut self) {
        self.player = paddle(PLAYER_X, palette::GREEN);
        self.ai = paddle(AI_X, palette::MAGENTA);
        self.ai_points = 0;
        self.elapsed_ticks = 0;
        self.serve = None;
    }

    fn random_serve(&mut self) -> Vec2 {
        let dx = if self.rng.random_bool(0.5) {
            SERVE_DX
        } else {
            -SERVE_DX
        };
        Vec2::new(dx, self.rng.random_range(-2.0..2.0))
    }

    fn move_player(&mut self, dy: f32) {
        self.player.body.pos.y += dy;
        clamp_paddle(&mut self.player);
    }

    fn apply_intents(&mut self, input: &TickInput) {
        for intent in &input.intents {
            match *intent {
                Intent::Move(Direction::Up) => self.move_player(-PADDLE_SPEED),
                Intent::Move(Direction::Down) => self.move_player(PADDLE_SPEED),
                Intent::Point(p) => {
                    let center = Vec2::new(self.player.body.center().x, p.y);
                    self.player.body.set_center(center);
                    clamp_paddle(&mut self.player);
                }
                _ => {}
            }
        }
    }

    fn step_ai(&mut self) {
        let dy = pursue(
            self.ai.body.center().y,
            self.ball.body.center().y,
            AI_SPEED,
            AI_DEAD_ZONE,
        );
        self.ai.body.pos.y += dy;
        clamp_paddle(&mut self.ai);
    }

    fn step_ball(&mut self) {
        let speed = 1.0 + self.elapsed_ticks as f32 * ACCELERATION;
        self.elapsed_ticks += 1;
        advance(&mut self.ball.body, speed);
        constrain_axis(&mut self.ball.body, Axis::Y, 0.0, HEIGHT, BoundsPolicy::Reflect);

        for paddle in [&self.player, &self.ai] {
            let ball_box = self.ball.body.aabb();
            let paddle_box = paddle.body.aabb();
            if !overlaps(&ball_box, &paddle_box) {
                continue;
            }
            let normal = contact_normal(&ball_box, &paddle_box);
            self.ball.body.vel = bounce(self.ball.body.vel, normal);
            // Push out along the contact normal
            let body = &mut self.ball.body;
            if normal.x > 0.0 {
                body.pos.x = paddle_box.x + paddle_box.w;
            } else if normal.x < 0.0 {
                body.pos.x = paddle_box.x - BALL_SIZE;
            } else if normal.y > 0.0 {
                body.pos.y = paddle_box.y + paddle_box.h;
            } else {
                body.pos.y = paddle_box.y - BALL_SIZE;
            }
            constrain_axis(body, Axis::Y, 0.0, HEIGHT, BoundsPolicy::Clamp);
        }

        if self.ball.body.pos.x <= 0.0 {
            self.ai_points += 1;
            self.session.lose();
        } else if self.ball.body.pos.x + BALL_SIZE >= WIDTH {
            self.session.award(1);
            log::debug!("Pong point scored, re-serving");
            self.ball = centered_ball(Vec2::ZERO);
            self.serve = Some(Delay::new(SERVE_DELAY, ()));
        }
    }
}

fn paddle(x: f32, color: crate::renderer::Color) -> Paddle {
    Paddle {
        body: Body::new(
            Vec2::new(x, HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0),
            Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
        ),
        color,
    }
}

fn centered_ball(vel: Vec2) -> Ball {
    let mut body = Body::new(Vec2::ZERO, Vec2::splat(BALL_SIZE)).with_velocity(vel);
    body.set_center(Vec2::new(WIDTH / 2.0, HEIGHT / 2.0));
    Ball {
        body,
        color: palette::RED,
    }
}

fn clamp_paddle(paddle: &mut Paddle) {
    constrain_axis(&mut paddle.body, Axis::Y, 0.0, HEIGHT, BoundsPolicy::Clamp);
}

impl Game for Pong {
    fn spec(&self) -> &'static GameSpec {
        &SPEC
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn start(&mut self) {
        self.layout();
        let vel = self.random_serve();
        self.ball = centered_ball(vel);
        self.session.begin();
    }

    fn stop(&mut self) {
        self.session.halt();
        self.serve = None;
    }

    fn reset(&mut self) {
        self.layout();
        self.ball = centered_ball(Vec2::new(SERVE_DX, 2.0));
        self.session.reset();
    }

    fn tick(&mut self, input: &TickInput) {
        if !self.session.is_playing() {
            return;
        }
        self.apply_intents(input);

        if let Some(delay) = self.serve.as_mut() {
            if delay.poll(SPEC.tick).is_some() {
                self.serve = None;
                let vel = self.random_serve();
                self.ball.body.vel = vel;
            }
        } else {
            self.step_ball();
        }
        self.step_ai();
    }

    fn render(&self, out: &mut DrawList) {
        out.fill_rect(0.0, 0.0, WIDTH, HEIGHT, palette::PONG_BG);

        // Dashed center line
        let mut y = 0.0;
        while y < HEIGHT {
            out.line(
                vec![[WIDTH / 2.0, y], [WIDTH / 2.0, (y + 10.0).min(HEIGHT)]],
                palette::RED,
                3.0,
            );
            y += 20.0;
        }

        for paddle in [&self.player, &self.ai] {
            let b = &paddle.body;
            out.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y, paddle.color);
        }
        let b = &self.ball.body;
        out.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y, self.ball.color);

        let font = "bold 24px monospace";
        out.text(self.session.score().to_string(), WIDTH / 4.0, 30.0, font, palette::BLUE);
        out.text(self.ai_points.to_string(), WIDTH * 3.0 / 4.0, 30.0, font, palette::BLUE);
    }

    fn entities(&self) -> Vec<Entity> {
        vec![
            Entity::Paddle(self.player),
            Entity::Paddle(self.ai),
            Entity::Ball(self.ball),
        ]
    }
}
