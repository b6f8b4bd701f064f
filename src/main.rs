use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{BufWriter, stdout};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use skyburst::canvas::Canvas;
use skyburst::fireworks::{Density, PathLibrary, Rgb, Shape, Surface};
use skyburst::{Display, Error, Options, Result};

/// Colorful fireworks in the terminal
#[derive(Parser, Debug)]
#[command(name = "skyburst")]
#[command(version)]
#[command(after_help = "Press 'q', ESC, or Ctrl+C to exit. \
                        Click to launch a shell at the pointer.")]
struct Cli {
    /// Launches per second (1-10)
    #[arg(short, long, env = "SKYBURST_FREQUENCY", default_value_t = 5,
          value_parser = clap::value_parser!(u32).range(1..=10))]
    frequency: u32,

    /// Burst shape: normal, circle, donut, heart, rose, twinkle, star, skull,
    /// rabbit, eagle, umbrella, custom-path, random
    #[arg(short, long, env = "SKYBURST_SHAPE", default_value = "normal")]
    shape: Shape,

    /// Outline traced by the custom-path shape
    #[arg(long, env = "SKYBURST_PATH_REF", value_name = "ID")]
    path_ref: Option<String>,

    /// Define an outline from SVG path data, e.g. --define-path "tri=M 0 -40 L 35 20 L -35 20 Z"
    #[arg(long, value_name = "ID=SVG_PATH_DATA")]
    define_path: Vec<String>,

    /// Most fireworks alive at once
    #[arg(long, env = "SKYBURST_MAX_FIREWORKS", default_value_t = 10)]
    max_fireworks: usize,

    /// Heavier 360-fragment normal bursts
    #[arg(long, env = "SKYBURST_DENSE")]
    dense: bool,

    /// Seed for a reproducible show
    #[arg(long, env = "SKYBURST_SEED")]
    seed: Option<u64>,

    /// Background color as hex (e.g., 1a1b26)
    #[arg(long, env = "SKYBURST_BG_COLOR", value_name = "RRGGBB", value_parser = parse_hex_color)]
    bg_color: Option<Rgb>,
}

fn parse_hex_color(hex: &str) -> std::result::Result<Rgb, String> {
    let hex = hex.trim_start_matches('#');
    let invalid = || format!("invalid hex color '{hex}', expected RRGGBB (e.g., 1a1b26)");
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |range| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

struct Setup {
    options: Options,
    paths: PathLibrary,
    background: Rgb,
}

impl Setup {
    fn open(&self, cols: u16, rows: u16) -> Result<(Display, Canvas)> {
        let canvas = Canvas::new(cols as usize, rows as usize, self.background);
        let display = skyburst::start(
            canvas.width(),
            canvas.height(),
            self.options.clone(),
            self.paths.clone(),
        )?;
        Ok((display, canvas))
    }
}

fn run(setup: &Setup) -> Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableMouseCapture)?;

    let result = frame_loop(setup, &mut stdout);

    execute!(stdout, Show, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    result
}

fn frame_loop<W: std::io::Write>(setup: &Setup, stdout: &mut W) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let (mut display, mut canvas) = setup.open(cols, rows)?;

    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    const FIXED_DT: f32 = 1.0 / 60.0;

    loop {
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break;
                    }
                }
                Event::Resize(cols, rows) => {
                    // Extents are fixed per display, so start over at the new size
                    skyburst::stop(display);
                    (display, canvas) = setup.open(cols, rows)?;
                    execute!(stdout, Clear(ClearType::All))?;
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    display.launch_at(Canvas::cell_to_logical(mouse.column, mouse.row));
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            display.tick(now);
            accumulator -= FIXED_DT;
        }

        canvas.clear();
        display.render(&mut canvas);
        canvas.present(stdout)?;
    }

    skyburst::stop(display);
    Ok(())
}

fn main() -> Result<()> {
    // The screen belongs to the show; logs only appear when RUST_LOG asks for them
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut paths = PathLibrary::with_builtins();
    for definition in &cli.define_path {
        paths.define_spec(definition)?;
    }

    let options = Options {
        frequency: cli.frequency,
        shape: cli.shape,
        path_reference: cli.path_ref,
        max_fireworks: cli.max_fireworks,
        density: if cli.dense { Density::Dense } else { Density::Standard },
        seed: cli.seed,
    };
    options.validate()?;

    let setup = Setup {
        options,
        paths,
        background: cli.bg_color.unwrap_or((0, 0, 0)),
    };

    match run(&setup) {
        Err(Error::Io(err)) => {
            eprintln!("terminal error: {err}");
            std::process::exit(1);
        }
        other => other,
    }
}
