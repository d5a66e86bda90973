//! Pixel Arcade entry point
//!
//! Natively this runs games headless with a scripted input pattern and prints
//! how each session ended. The browser build is driven from JavaScript
//! through `WebArcade`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use pixel_arcade::renderer::shapes::as_bytes;
    use pixel_arcade::{Arcade, ArcadeError, GameId, Settings};

    const DEFAULT_TICKS: u32 = 3000;
    /// Keys cycled by the autopilot, one press every `PRESS_EVERY` ticks
    const KEYS: [&str; 5] = ["ArrowLeft", "ArrowUp", "ArrowRight", "ArrowDown", " "];
    const PRESS_EVERY: u32 = 7;

    pub struct Args {
        pub games: Vec<GameId>,
        pub ticks: u32,
        pub seed: Option<u64>,
        /// Report the tessellated size of each final frame
        pub vertices: bool,
        /// Print each final frame as JSON
        pub frame_json: bool,
    }

    /// `[--vertices] [--frame-json] [game-id|all] [ticks] [seed]`
    pub fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, ArcadeError> {
        let (flags, positional): (Vec<String>, Vec<String>) =
            args.partition(|arg| arg.starts_with("--"));
        let mut vertices = false;
        let mut frame_json = false;
        for flag in &flags {
            match flag.as_str() {
                "--vertices" => vertices = true,
                "--frame-json" => frame_json = true,
                other => log::warn!("Ignoring unknown option {other}"),
            }
        }

        let mut args = positional.into_iter();
        let games = match args.next().as_deref() {
            None | Some("all") => GameId::ALL.to_vec(),
            Some(name) => vec![name.parse()?],
        };
        let ticks = match args.next() {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring tick count {raw:?}, using {DEFAULT_TICKS}");
                DEFAULT_TICKS
            }),
            None => DEFAULT_TICKS,
        };
        let seed = args.next().and_then(|raw| raw.parse().ok());
        Ok(Args {
            games,
            ticks,
            seed,
            vertices,
            frame_json,
        })
    }

    pub fn run(args: Args) -> Result<(), ArcadeError> {
        let settings = Settings {
            seed: args.seed,
            ..Settings::default()
        };
        let mut arcade = Arcade::new(settings);
        for id in args.games {
            arcade.mount_id(id);
            arcade.start()?;
            let spec = id.spec();
            let mut ticks = 0;
            while ticks < args.ticks && arcade.status().is_some_and(|s| !s.is_terminal()) {
                if ticks % PRESS_EVERY == 0 {
                    let key = KEYS[(ticks / PRESS_EVERY) as usize % KEYS.len()];
                    arcade.key_down(key);
                    if spec.uses_pointer {
                        let x = (ticks * 37 % spec.width as u32) as f32;
                        let y = (ticks * 53 % spec.height as u32) as f32;
                        arcade.pointer_move(x, y);
                        arcade.click(x, y);
                    }
                } else if ticks % PRESS_EVERY == PRESS_EVERY / 2 {
                    arcade.key_up(KEYS[(ticks / PRESS_EVERY) as usize % KEYS.len()]);
                }
                ticks += arcade.frame(spec.tick);
            }
            let frame = arcade.draw_list().map_or(0, |f| f.len());
            println!(
                "{:<9} {:<8} score={:<6} moves={:<4} ticks={:<6} draw_cmds={}",
                id.as_str(),
                arcade.status().map_or("-", |s| s.as_str()),
                arcade.score().unwrap_or(0),
                arcade.move_count().unwrap_or(0),
                ticks,
                frame
            );
            if args.vertices {
                if let Some(vertices) = arcade.vertices() {
                    println!(
                        "{:<9} vertices={} bytes={}",
                        "",
                        vertices.len(),
                        as_bytes(&vertices).len()
                    );
                }
            }
            if args.frame_json {
                println!("{}", arcade.frame_json()?);
            }
            arcade.unmount();
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    pixel_arcade::platform::init_logging();
    log::info!("Pixel Arcade (native, headless) starting...");

    let result = headless::parse_args(std::env::args().skip(1)).and_then(headless::run);
    if let Err(err) = result {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `platform::web::boot`, this is just to satisfy the compiler
}
