//! Single-game host
//!
//! [`Arcade`] mounts one game at a time and owns everything that drives it:
//! the fixed-step clock, the input router and the current frame. The host
//! page only feeds elapsed time and raw events in, and paints frames out.

use std::time::Duration;

use glam::Vec2;
use serde::Serialize;

use crate::error::ArcadeError;
use crate::games::{self, Game, GameId};
use crate::renderer::{DrawList, Surface, Vertex, palette, tessellate};
use crate::settings::Settings;
use crate::sim::{FixedStep, InputEvent, InputRouter, Key, Session, Status};

/// Crosshair arm length in pixels
const POINTER_ARM: f32 = 6.0;
const HUD_FONT: &str = "12px monospace";

/// Read-only session summary for the host UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub game: GameId,
    pub status: Status,
    pub score: u32,
    pub moves: u32,
}

struct Mounted {
    game: Box<dyn Game>,
    clock: FixedStep,
    input: InputRouter,
    frame: DrawList,
}

impl Mounted {
    fn id(&self) -> GameId {
        self.game.spec().id
    }

    /// Stop ticking and accepting input
    fn park(&mut self) {
        self.clock.stop();
        self.input.set_accepting(false);
    }

    fn redraw(&mut self, settings: &Settings) {
        let spec = self.game.spec();
        self.frame.clear();
        self.frame.clear_canvas(spec.width, spec.height);
        self.game.render(&mut self.frame);

        if settings.show_pointer && spec.uses_pointer {
            if let Some(p) = self.input.pointer() {
                let (h, v) = (Vec2::new(POINTER_ARM, 0.0), Vec2::new(0.0, POINTER_ARM));
                self.frame
                    .line(vec![(p - h).to_array(), (p + h).to_array()], palette::POINTER, 1.0);
                self.frame
                    .line(vec![(p - v).to_array(), (p + v).to_array()], palette::POINTER, 1.0);
            }
        }
        if settings.show_hud {
            let session = self.game.session();
            let text = format!(
                "SCORE {}  MOVES {}  {}",
                session.score(),
                session.move_count(),
                session.status().as_str()
            );
            self.frame
                .text(text, 4.0, spec.height - 6.0, HUD_FONT, palette::HUD_TEXT);
        }
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.park();
        self.game.stop();
        log::info!("Unmounted {}", self.id());
    }
}

/// Hosts at most one mounted game
pub struct Arcade {
    settings: Settings,
    mounted: Option<Mounted>,
}

impl Default for Arcade {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Arcade {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            mounted: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mount a game by its id string, replacing any mounted game
    pub fn mount(&mut self, id: &str) -> Result<GameId, ArcadeError> {
        let id: GameId = id.parse()?;
        self.mount_id(id);
        Ok(id)
    }

    pub fn mount_id(&mut self, id: GameId) {
        self.unmount();
        let spec = id.spec();
        let mut mounted = Mounted {
            game: games::create(id, self.settings.effective_seed()),
            clock: FixedStep::new(spec.tick).with_max_substeps(self.settings.max_substeps),
            input: InputRouter::new(),
            frame: DrawList::new(),
        };
        mounted.redraw(&self.settings);
        log::info!("Mounted {} ({}x{}, tick {:?})", id, spec.width, spec.height, spec.tick);
        self.mounted = Some(mounted);
    }

    /// Tear down the mounted game; returns whether one was mounted
    pub fn unmount(&mut self) -> bool {
        self.mounted.take().is_some()
    }

    pub fn mounted(&self) -> Option<GameId> {
        self.mounted.as_ref().map(Mounted::id)
    }

    fn current(&mut self) -> Result<&mut Mounted, ArcadeError> {
        self.mounted.as_mut().ok_or(ArcadeError::NotMounted)
    }

    /// (Re)start the mounted game from scratch
    pub fn start(&mut self) -> Result<(), ArcadeError> {
        let settings = self.settings.clone();
        let mounted = self.current()?;
        mounted.game.start();
        mounted.clock.start();
        mounted.input.set_accepting(true);
        mounted.redraw(&settings);
        log::info!("Started {}", mounted.id());
        Ok(())
    }

    /// Halt ticking; the last frame stays visible
    pub fn stop(&mut self) -> Result<(), ArcadeError> {
        let settings = self.settings.clone();
        let mounted = self.current()?;
        mounted.park();
        mounted.game.stop();
        mounted.redraw(&settings);
        log::info!("Stopped {}", mounted.id());
        Ok(())
    }

    /// Back to the freshly mounted state
    pub fn reset(&mut self) -> Result<(), ArcadeError> {
        let settings = self.settings.clone();
        let mounted = self.current()?;
        mounted.park();
        mounted.game.reset();
        mounted.redraw(&settings);
        Ok(())
    }

    /// Feed elapsed wall time; runs due ticks and returns how many ran
    pub fn frame(&mut self, elapsed: Duration) -> u32 {
        let Some(mounted) = self.mounted.as_mut() else {
            return 0;
        };
        let due = mounted.clock.advance(elapsed);
        let mut ran = 0;
        for _ in 0..due {
            let input = mounted.input.drain();
            mounted.game.tick(&input);
            ran += 1;

            let status = mounted.game.session().status();
            if status.is_terminal() {
                mounted.park();
                log::info!(
                    "{} ended: {} with score {}",
                    mounted.id(),
                    status.as_str(),
                    mounted.game.session().score()
                );
                break;
            }
        }
        if ran > 0 {
            mounted.redraw(&self.settings);
        }
        ran
    }

    /// Route a raw event; returns whether the frame was redrawn
    pub fn handle(&mut self, event: InputEvent) -> bool {
        let Some(mounted) = self.mounted.as_mut() else {
            return false;
        };
        let redraw = mounted.input.push(event);
        if redraw {
            mounted.redraw(&self.settings);
        }
        redraw
    }

    /// DOM key string; returns whether the key is one the arcade uses
    pub fn key_down(&mut self, code: &str) -> bool {
        match Key::from_code(code) {
            Some(key) => {
                self.handle(InputEvent::KeyDown(key));
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        match Key::from_code(code) {
            Some(key) => {
                self.handle(InputEvent::KeyUp(key));
                true
            }
            None => false,
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.handle(InputEvent::PointerMove(Vec2::new(x, y)))
    }

    pub fn click(&mut self, x: f32, y: f32) {
        self.handle(InputEvent::Click(Vec2::new(x, y)));
    }

    /// Last rendered frame
    pub fn draw_list(&self) -> Option<&DrawList> {
        self.mounted.as_ref().map(|m| &m.frame)
    }

    /// Replay the last frame; does nothing without a surface or a game
    pub fn paint(&self, surface: Option<&mut dyn Surface>) {
        if let Some(frame) = self.draw_list() {
            frame.replay(surface);
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.mounted.as_ref().map(|m| m.game.session())
    }

    pub fn status(&self) -> Option<Status> {
        self.session().map(Session::status)
    }

    pub fn score(&self) -> Option<u32> {
        self.session().map(Session::score)
    }

    pub fn move_count(&self) -> Option<u32> {
        self.session().map(Session::move_count)
    }

    pub fn hud(&self) -> Option<Hud> {
        let mounted = self.mounted.as_ref()?;
        let session = mounted.game.session();
        Some(Hud {
            game: mounted.id(),
            status: session.status(),
            score: session.score(),
            moves: session.move_count(),
        })
    }

    pub fn hud_json(&self) -> Result<String, ArcadeError> {
        let hud = self.hud().ok_or(ArcadeError::NotMounted)?;
        serde_json::to_string(&hud).map_err(ArcadeError::Encode)
    }

    /// Last frame as JSON, for hosts that paint it themselves
    pub fn frame_json(&self) -> Result<String, ArcadeError> {
        let frame = self.draw_list().ok_or(ArcadeError::NotMounted)?;
        frame.to_json().map_err(ArcadeError::Encode)
    }

    /// Last frame as clip-space triangles; text is not tessellated
    pub fn vertices(&self) -> Option<Vec<Vertex>> {
        let mounted = self.mounted.as_ref()?;
        let spec = mounted.game.spec();
        Some(tessellate(&mounted.frame, spec.width, spec.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Color, DrawCommand};

    const TICK: Duration = Duration::from_millis(16);

    fn mounted(id: &str) -> Arcade {
        let mut arcade = Arcade::default();
        arcade.mount(id).unwrap();
        arcade
    }

    fn pending_input(arcade: &Arcade) -> usize {
        arcade.mounted.as_ref().map_or(0, |m| m.input.pending())
    }

    #[derive(Default)]
    struct FillCounter {
        fills: usize,
    }

    impl Surface for FillCounter {
        fn clear_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {}
        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Color) {
            self.fills += 1;
        }
        fn stroke_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Color, _width: f32) {}
        fn line(&mut self, _points: &[[f32; 2]], _color: Color, _width: f32) {}
        fn text(&mut self, _text: &str, _x: f32, _y: f32, _font: &str, _color: Color) {}
    }

    #[test]
    fn test_mount_and_unmount() {
        let mut arcade = Arcade::default();
        assert!(matches!(arcade.mount("pacman"), Err(ArcadeError::UnknownGame(_))));
        assert!(matches!(arcade.start(), Err(ArcadeError::NotMounted)));
        assert_eq!(arcade.mount("Snake").unwrap(), GameId::Snake);
        assert_eq!(arcade.mounted(), Some(GameId::Snake));
        assert_eq!(arcade.status(), Some(Status::Idle));
        assert!(arcade.draw_list().is_some_and(|f| !f.is_empty()));

        arcade.mount("maze").unwrap();
        assert_eq!(arcade.mounted(), Some(GameId::Maze));
        assert!(arcade.unmount());
        assert!(!arcade.unmount());
        assert_eq!(arcade.score(), None);
        assert_eq!(arcade.frame(Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_ticks_only_while_playing() {
        let mut arcade = mounted("pong");
        assert_eq!(arcade.frame(Duration::from_millis(100)), 0);

        arcade.start().unwrap();
        assert_eq!(arcade.status(), Some(Status::Playing));
        assert_eq!(arcade.frame(TICK * 3), 3);
        assert_eq!(arcade.frame(Duration::from_millis(10)), 0);
        assert_eq!(arcade.frame(Duration::from_millis(6)), 1);

        arcade.stop().unwrap();
        assert_eq!(arcade.status(), Some(Status::Idle));
        assert_eq!(arcade.frame(Duration::from_millis(100)), 0);
        arcade.stop().unwrap();
    }

    #[test]
    fn test_backlog_is_capped() {
        let mut arcade = mounted("breakout");
        arcade.start().unwrap();
        assert_eq!(arcade.frame(Duration::from_secs(5)), arcade.settings().max_substeps);
        assert_eq!(arcade.frame(Duration::ZERO), 0);
    }

    #[test]
    fn test_input_dropped_outside_play() {
        let mut arcade = mounted("snake");
        assert!(arcade.key_down("ArrowUp"));
        assert_eq!(pending_input(&arcade), 0);
        assert!(!arcade.key_down("Escape"));

        arcade.start().unwrap();
        assert!(arcade.key_down("w"));
        assert_eq!(pending_input(&arcade), 1);
        arcade.frame(Duration::from_millis(200));
        assert_eq!(pending_input(&arcade), 0);
    }

    #[test]
    fn test_terminal_state_stops_clock() {
        let mut arcade = mounted("tetris");
        arcade.start().unwrap();
        // Hard-drop everything into the same columns until the stack tops out
        for _ in 0..5000 {
            arcade.key_down("ArrowDown");
            arcade.frame(TICK);
            if arcade.status() != Some(Status::Playing) {
                break;
            }
        }
        assert_eq!(arcade.status(), Some(Status::Lost));
        let frozen = arcade.draw_list().cloned();
        assert_eq!(arcade.frame(Duration::from_secs(1)), 0);
        arcade.key_down("ArrowLeft");
        assert_eq!(pending_input(&arcade), 0);
        assert_eq!(arcade.draw_list().cloned(), frozen);

        arcade.start().unwrap();
        assert_eq!(arcade.status(), Some(Status::Playing));
        assert_eq!(arcade.score(), Some(0));
    }

    #[test]
    fn test_pointer_move_redraws_with_crosshair() {
        let mut arcade = mounted("chain");
        arcade.start().unwrap();
        assert!(arcade.pointer_move(100.0, 120.0));
        let frame = arcade.draw_list().unwrap();
        let crosshair = frame
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { color, .. } if *color == palette::POINTER))
            .count();
        assert_eq!(crosshair, 2);

        // Keyboard-only games get no crosshair
        let mut arcade = mounted("snake");
        arcade.pointer_move(10.0, 10.0);
        let frame = arcade.draw_list().unwrap();
        assert!(
            !frame
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::Line { color, .. } if *color == palette::POINTER))
        );
    }

    #[test]
    fn test_frame_exports() {
        let arcade = Arcade::default();
        assert!(matches!(arcade.frame_json(), Err(ArcadeError::NotMounted)));
        assert!(arcade.vertices().is_none());

        let mut arcade = mounted("breakout");
        arcade.start().unwrap();
        assert_eq!(arcade.frame(TICK), 1);
        let json = arcade.frame_json().unwrap();
        assert!(json.starts_with(r#"[{"op":"clear""#));

        let vertices = arcade.vertices().unwrap();
        assert_eq!(vertices.len() % 3, 0);
        // Background quad spans the whole clip space
        assert_eq!(vertices[0].position, [-1.0, 1.0]);
        assert_eq!(vertices[0].color, palette::BREAKOUT_BG.to_f32());
    }

    #[test]
    fn test_hud_overlay_and_json() {
        let mut arcade = mounted("memory");
        arcade.start().unwrap();
        let frame = arcade.draw_list().unwrap();
        assert!(matches!(
            frame.commands().last(),
            Some(DrawCommand::Text { text, .. }) if text == "SCORE 0  MOVES 0  playing"
        ));
        let json = arcade.hud_json().unwrap();
        assert_eq!(
            json,
            r#"{"game":"memory","status":"playing","score":0,"moves":0}"#
        );

        let quiet = Settings {
            show_hud: false,
            ..Settings::default()
        };
        let mut arcade = Arcade::new(quiet);
        arcade.mount("snake").unwrap();
        assert!(
            !arcade
                .draw_list()
                .unwrap()
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::Text { .. }))
        );
    }

    #[test]
    fn test_paint_replays_frame() {
        let arcade = mounted("breakout");
        let mut counter = FillCounter::default();
        arcade.paint(Some(&mut counter));
        assert!(counter.fills > 40);
        arcade.paint(None);
        Arcade::default().paint(Some(&mut counter));
    }
}
