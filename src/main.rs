use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode,
    },
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use starfield::effects::{Effect, starfield::StarfieldEffect};
use starfield::theme::ThemeFlag;
use starfield::{Config, Result, StarfieldError};
use std::env;
use std::io::{BufWriter, Stdout, stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

fn print_usage() {
    eprintln!("starfield - Interactive starfield for the terminal");
    eprintln!();
    eprintln!("Usage: starfield [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bg-color RRGGBB  Set the dark-theme background as hex (e.g., --bg-color 1a1b26)");
    eprintln!("  --light            Start in the light theme");
    eprintln!("  --config PATH      Load settings from a TOML file (default: ./starfield.toml)");
    eprintln!("  --seed N           Fix the random seed");
    eprintln!("  --no-caption       Hide the rotating caption");
    eprintln!("  --verbose          Print a session summary on exit");
    eprintln!();
    eprintln!("Move the mouse to push stars around. Press 't' to toggle the theme.");
    eprintln!("Press 'q', ESC, or Ctrl+C to exit");
}

#[derive(Default)]
struct Args {
    bg_color: Option<(u8, u8, u8)>,
    light: bool,
    config: Option<PathBuf>,
    seed: Option<u64>,
    no_caption: bool,
    verbose: bool,
    help: bool,
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .ok_or_else(|| StarfieldError::InvalidArgument(format!("{} requires a value", flag)))
        };
        match arg.as_str() {
            "--bg-color" => {
                let hex = value("--bg-color")?;
                parsed.bg_color = Some(parse_hex_color(hex).ok_or_else(|| {
                    StarfieldError::InvalidArgument(format!(
                        "Invalid hex color: {} (expected RRGGBB, e.g. 1a1b26)",
                        hex
                    ))
                })?);
            }
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--seed" => {
                let raw = value("--seed")?;
                parsed.seed = Some(raw.parse().map_err(|_| {
                    StarfieldError::InvalidArgument(format!("Invalid seed: {}", raw))
                })?);
            }
            "--light" => parsed.light = true,
            "--no-caption" => parsed.no_caption = true,
            "--verbose" | "-v" => parsed.verbose = true,
            "help" | "--help" | "-h" => parsed.help = true,
            other => {
                return Err(StarfieldError::InvalidArgument(format!(
                    "Unknown option: {}",
                    other
                )));
            }
        }
    }

    Ok(parsed)
}

/// Raw mode, alternate screen and input capture for as long as it lives.
struct Session {
    stdout: BufWriter<Stdout>,
}

impl Session {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        // Drop undoes any partial setup below
        let mut session = Self {
            stdout: BufWriter::with_capacity(1024 * 64, stdout()),
        };
        execute!(
            session.stdout,
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All),
            EnableMouseCapture,
            EnableFocusChange
        )?;
        Ok(session)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            DisableFocusChange,
            DisableMouseCapture,
            Show,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn run_effect<E: Effect>(config: &Config, verbose: bool) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let theme = ThemeFlag::new(!config.display.start_light);

    let mut effect = match E::new(cols as usize, rows as usize, config, theme) {
        Ok(effect) => effect,
        Err(StarfieldError::NoSurface { width, height }) => {
            // Nothing to draw on; stay out of the way
            if verbose {
                eprintln!("No drawing surface ({}x{}); not starting", width, height);
            }
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut session = Session::enter()?;
    let mut last_frame = Instant::now();

    loop {
        if event::poll(Duration::from_millis(1))? {
            let event = event::read()?;
            match &event {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break;
                    }
                    // Pass non-exit key events to the effect
                    effect.handle_event(&event);
                }
                Event::Resize(cols, rows) => {
                    effect.resize(*cols as usize, *rows as usize);
                    execute!(session.stdout, Clear(ClearType::All))?;
                }
                _ => {
                    effect.handle_event(&event);
                }
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame);
        last_frame = now;

        if effect.update(elapsed) {
            effect.render(&mut session.stdout)?;
        }
    }

    effect.stop();
    drop(session);

    if verbose {
        if let Some(summary) = effect.summary() {
            eprintln!("Session: {}", summary);
        }
    }
    Ok(())
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!();
            print_usage();
            return Err(e);
        }
    };
    if args.help {
        print_usage();
        return Ok(());
    }

    let (mut config, source) = Config::load(args.config.as_deref())?;
    if args.verbose {
        match &source {
            Some(path) => eprintln!("Loaded config from {}", path.display()),
            None => eprintln!("No config file found; using compiled defaults"),
        }
    }

    if let Some(color) = args.bg_color {
        config.display.dark_background = color;
    }
    if args.light {
        config.display.start_light = true;
    }
    if args.seed.is_some() {
        config.field.seed = args.seed;
    }
    if args.no_caption {
        config.display.show_caption = false;
    }

    run_effect::<StarfieldEffect>(&config, args.verbose)
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(StarfieldError::InvalidArgument(_)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("starfield: {}", e);
            ExitCode::FAILURE
        }
    }
}
