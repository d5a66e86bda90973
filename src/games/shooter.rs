//! Vertical shooter
//!
//! Enemies drop in from above the canvas; the ship moves on both axes in the
//! lower half and fires straight up. Any enemy touching the ship ends the
//! session.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId, GameSpec};
use crate::renderer::{Color, DrawList, palette};
use crate::sim::{
    Aabb, Body, BoundsPolicy, Bullet, Enemy, Entity, Intent, Paddle, Session, TickInput, advance,
    apply_bounds, overlaps,
};

pub static SPEC: GameSpec = GameSpec::continuous(
    GameId::Shooter,
    "Shooter",
    "Shoot the falling enemies before they reach you",
    WIDTH,
    HEIGHT,
    false,
);

const WIDTH: f32 = 300.0;
const HEIGHT: f32 = 250.0;
const SHIP_SIZE: f32 = 20.0;
const SHIP_START: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT - 30.0);
const SHIP_SPEED: f32 = 5.0;
/// Highest row the ship may climb to
const SHIP_CEILING: f32 = HEIGHT / 2.0;
const SHIP_BOUNDS: Aabb = Aabb::new(0.0, SHIP_CEILING, WIDTH, HEIGHT - 10.0 - SHIP_CEILING);
const BULLET_SIZE: Vec2 = Vec2::new(5.0, 10.0);
const BULLET_SPEED: f32 = 8.0;
const ENEMY_SIZE: f32 = 20.0;
/// Enemies appear just above the visible canvas
const ENEMY_SPAWN_Y: f32 = -ENEMY_SIZE;
const SPAWN_INTERVAL: Duration = Duration::from_millis(1000);
const POINTS_PER_KILL: u32 = 10;
const ENEMY_COLORS: [Color; 3] = [palette::RED, palette::MAGENTA, palette::YELLOW];

pub struct Shooter {
    session: Session,
    rng: Pcg32,
    ship: Paddle,
    bullets: Vec<Bullet>,
    enemies: Vec<Enemy>,
    spawn_timer: Duration,
}

fn ship() -> Paddle {
    Paddle {
        body: Body::new(SHIP_START, Vec2::splat(SHIP_SIZE)),
        color: palette::GREEN,
    }
}

impl Shooter {
    pub fn new(rng: Pcg32) -> Self {
        Self {
            session: Session::new(),
            rng,
            ship: ship(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            spawn_timer: Duration::ZERO,
        }
    }

    pub fn ship(&self) -> &Paddle {
        &self.ship
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    fn layout(&mut self) {
        self.ship = ship();
        self.bullets.clear();
        self.enemies.clear();
        self.spawn_timer = Duration::ZERO;
    }

    fn fire(&mut self) {
        let ship = &self.ship.body;
        let pos = Vec2::new(
            ship.center().x - BULLET_SIZE.x / 2.0,
            ship.pos.y - BULLET_SIZE.y,
        );
        let body = Body::new(pos, BULLET_SIZE).with_velocity(Vec2::new(0.0, -BULLET_SPEED));
        self.bullets.push(Bullet { body });
    }

    fn spawn_enemy(&mut self) {
        let x = self.rng.random_range(0.0..WIDTH - ENEMY_SIZE);
        let dy = self.rng.random_range(1.0..3.0);
        let color = ENEMY_COLORS[self.rng.random_range(0..ENEMY_COLORS.len())];
        log::trace!("Enemy spawned at x={x:.1} dy={dy:.2}");
        self.enemies.push(Enemy {
            body: Body::new(Vec2::new(x, ENEMY_SPAWN_Y), Vec2::splat(ENEMY_SIZE))
                .with_velocity(Vec2::new(0.0, dy)),
            color,
        });
    }

    fn steer(&mut self, input: &TickInput) {
        let body = &mut self.ship.body;
        body.vel = Vec2::new(input.held.axis_x(), input.held.axis_y()) * SHIP_SPEED;
        advance(body, 1.0);
        body.vel = Vec2::ZERO;
        apply_bounds(body, &SHIP_BOUNDS, BoundsPolicy::Clamp);
    }

    /// Each bullet removes at most one enemy
    fn resolve_hits(&mut self) {
        let mut kills = 0;
        let enemies = &mut self.enemies;
        self.bullets.retain(|bullet| {
            let hit = enemies
                .iter()
                .position(|enemy| overlaps(&bullet.body.aabb(), &enemy.body.aabb()));
            match hit {
                Some(index) => {
                    enemies.remove(index);
                    kills += 1;
                    false
                }
                None => true,
            }
        });
        if kills > 0 {
            self.session.award(kills * POINTS_PER_KILL);
        }
    }
}

impl Game for Shooter {
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
        for intent in &input.intents {
            if matches!(intent, Intent::Fire | Intent::Click(_)) {
                self.fire();
            }
        }
        self.steer(input);

        for bullet in &mut self.bullets {
            advance(&mut bullet.body, 1.0);
        }
        self.bullets.retain(|b| b.body.pos.y > 0.0);

        self.spawn_timer += SPEC.tick;
        if self.spawn_timer >= SPAWN_INTERVAL {
            self.spawn_timer -= SPAWN_INTERVAL;
            self.spawn_enemy();
        }
        for enemy in &mut self.enemies {
            advance(&mut enemy.body, 1.0);
        }
        self.enemies.retain(|e| e.body.pos.y < HEIGHT);

        self.resolve_hits();

        let ship = self.ship.body.aabb();
        if self.enemies.iter().any(|e| overlaps(&e.body.aabb(), &ship)) {
            self.session.lose();
        }
    }

    fn render(&self, out: &mut DrawList) {
        out.fill_rect(0.0, 0.0, WIDTH, HEIGHT, palette::SHOOTER_BG);
        let ship = &self.ship.body;
        out.fill_rect(ship.pos.x, ship.pos.y, ship.size.x, ship.size.y, self.ship.color);
        for bullet in &self.bullets {
            let b = &bullet.body;
            out.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y, palette::YELLOW);
        }
        for enemy in &self.enemies {
            let b = &enemy.body;
            out.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y, enemy.color);
        }
    }

    fn entities(&self) -> Vec<Entity> {
        let mut out = vec![Entity::Paddle(self.ship)];
        out.extend(self.bullets.iter().copied().map(Entity::Bullet));
        out.extend(self.enemies.iter().copied().map(Entity::Enemy));
        out
    }

    /// Enemies enter from above the canvas
    fn playfield(&self) -> Aabb {
        Aabb::new(0.0, ENEMY_SPAWN_Y, WIDTH, HEIGHT - ENEMY_SPAWN_Y)
    }
}
