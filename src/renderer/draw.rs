//! Draw lists and the surface they replay onto

use serde::Serialize;

use super::Color;

/// One drawing primitive in canvas pixel space
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Reset the whole canvas to transparent
    Clear { width: f32, height: f32 },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
        width: f32,
    },
    /// Open polyline through `points`
    Line {
        points: Vec<[f32; 2]>,
        color: Color,
        width: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        font: &'static str,
        color: Color,
    },
}

/// 2D drawing target
pub trait Surface {
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, width: f32);
    fn line(&mut self, points: &[[f32; 2]], color: Color, width: f32);
    fn text(&mut self, text: &str, x: f32, y: f32, font: &str, color: Color);
}

/// Ordered list of primitives for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear_canvas(&mut self, width: f32, height: f32) {
        self.push(DrawCommand::Clear { width, height });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, width: f32) {
        self.push(DrawCommand::StrokeRect {
            x,
            y,
            w,
            h,
            color,
            width,
        });
    }

    pub fn line(&mut self, points: Vec<[f32; 2]>, color: Color, width: f32) {
        self.push(DrawCommand::Line {
            points,
            color,
            width,
        });
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        font: &'static str,
        color: Color,
    ) {
        self.push(DrawCommand::Text {
            text: text.into(),
            x,
            y,
            font,
            color,
        });
    }

    /// Draw every command in order; a missing surface is a no-op
    pub fn replay(&self, surface: Option<&mut dyn Surface>) {
        let Some(surface) = surface else {
            return;
        };
        for command in &self.commands {
            match command {
                DrawCommand::Clear { width, height } => {
                    surface.clear_rect(0.0, 0.0, *width, *height)
                }
                DrawCommand::FillRect { x, y, w, h, color } => {
                    surface.fill_rect(*x, *y, *w, *h, *color)
                }
                DrawCommand::StrokeRect {
                    x,
                    y,
                    w,
                    h,
                    color,
                    width,
                } => surface.stroke_rect(*x, *y, *w, *h, *color, *width),
                DrawCommand::Line {
                    points,
                    color,
                    width,
                } => surface.line(points, *color, *width),
                DrawCommand::Text {
                    text,
                    x,
                    y,
                    font,
                    color,
                } => surface.text(text, *x, *y, font, *color),
            }
        }
    }

    /// JSON array of commands, for hosts that paint themselves
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::palette;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Surface for Recorder {
        fn clear_rect(&mut self, _x: f32, _y: f32, w: f32, h: f32) {
            self.calls.push(format!("clear {w}x{h}"));
        }
        fn fill_rect(&mut self, x: f32, y: f32, _w: f32, _h: f32, _color: Color) {
            self.calls.push(format!("fill {x},{y}"));
        }
        fn stroke_rect(&mut self, x: f32, y: f32, _w: f32, _h: f32, _color: Color, _width: f32) {
            self.calls.push(format!("stroke {x},{y}"));
        }
        fn line(&mut self, points: &[[f32; 2]], _color: Color, _width: f32) {
            self.calls.push(format!("line {}", points.len()));
        }
        fn text(&mut self, text: &str, _x: f32, _y: f32, _font: &str, _color: Color) {
            self.calls.push(format!("text {text}"));
        }
    }

    fn sample() -> DrawList {
        let mut list = DrawList::new();
        list.clear_canvas(100.0, 50.0);
        list.fill_rect(1.0, 2.0, 3.0, 4.0, palette::RED);
        list.stroke_rect(5.0, 6.0, 7.0, 8.0, palette::BLACK, 2.0);
        list.line(vec![[0.0, 0.0], [10.0, 10.0]], palette::RED, 1.0);
        list.text("hi", 0.0, 0.0, "12px monospace", palette::WHITE);
        list
    }

    #[test]
    fn test_replay_preserves_order() {
        let mut recorder = Recorder::default();
        sample().replay(Some(&mut recorder));
        assert_eq!(
            recorder.calls,
            vec!["clear 100x50", "fill 1,2", "stroke 5,6", "line 2", "text hi"]
        );
    }

    #[test]
    fn test_replay_without_surface_is_noop() {
        sample().replay(None);
    }

    #[test]
    fn test_json_is_tagged() {
        let json = sample().to_json().unwrap();
        assert!(json.starts_with("[{\"op\":\"clear\""));
        assert!(json.contains("\"op\":\"fill_rect\""));
    }
}
