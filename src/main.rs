//! scaletui - Generate musical scales and chords in the terminal.
//!
//! Pick a tonic, scale type and mode (or a chord root, quality and
//! extension) and the notes appear one by one, with the matching keys lit on
//! a one-octave piano strip.
//!
//! # Usage
//!
//! ```bash
//! cargo run                              # Start with the built-in defaults
//! cargo run -- --config scaletui.json    # Override defaults from a file
//! cargo run -- --log scaletui.log        # Write logs to a file
//! ```
//!
//! Set `RUST_LOG=scaletui=debug` for verbose logs.
//!
//! Press `?` for help with keyboard shortcuts.

use scaletui::engine::builtin;
use scaletui::error::EngineInitError;
use scaletui::{ui, App, Config, KeyOutcome};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Command-line options for the application.
struct CliOptions {
    /// Path to a JSON config file.
    config: Option<PathBuf>,
    /// Path to a log file. Logs go to stderr otherwise.
    log: Option<PathBuf>,
    /// Artificial delay before the engine finishes loading.
    init_delay: Option<Duration>,
    /// Make engine loading fail.
    fail_init: bool,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `--config <path>` or `-c <path>`: Load defaults from a JSON file
    /// - `--log <path>`: Write logs to a file instead of stderr
    /// - `--init-delay <ms>`: Delay engine loading
    /// - `--fail-init`: Simulate an engine load failure
    /// - `--help` or `-h`: Print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut options = Self {
            config: None,
            log: None,
            init_delay: None,
            fail_init: false,
        };
        let mut i = 1;

        let value = |i: usize, flag: &str| -> Result<String> {
            args.get(i)
                .cloned()
                .with_context(|| format!("{} requires an argument", flag))
        };

        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    i += 1;
                    options.config = Some(PathBuf::from(value(i, "--config")?));
                }
                "--log" => {
                    i += 1;
                    options.log = Some(PathBuf::from(value(i, "--log")?));
                }
                "--init-delay" => {
                    i += 1;
                    let ms: u64 = value(i, "--init-delay")?
                        .parse()
                        .context("--init-delay expects milliseconds")?;
                    options.init_delay = Some(Duration::from_millis(ms));
                }
                "--fail-init" => options.fail_init = true,
                "--help" | "-h" => {
                    eprintln!("scaletui - Terminal scale and chord generator");
                    eprintln!();
                    eprintln!(
                        "Usage: {} [OPTIONS]",
                        args.first().map(String::as_str).unwrap_or("scaletui")
                    );
                    eprintln!();
                    eprintln!("Options:");
                    eprintln!("  -c, --config PATH      Load defaults from a JSON config file");
                    eprintln!("      --log PATH         Write logs to a file instead of stderr");
                    eprintln!("      --init-delay MS    Delay engine loading by MS milliseconds");
                    eprintln!("      --fail-init        Simulate an engine load failure");
                    eprintln!("  -h, --help             Print this help message");
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown option: {}", other);
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        Ok(options)
    }
}

/// Sets up tracing, writing to `log` if given and stderr otherwise.
fn init_logging(log: Option<&PathBuf>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());

    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

/// Main entry point.
fn main() -> Result<()> {
    // Parse CLI options first (before any terminal setup)
    let cli = CliOptions::parse()?;

    init_logging(cli.log.as_ref())?;

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let mut app = App::new(config);

    let init_delay = cli.init_delay;
    let fail_init = cli.fail_init;
    app.start_engine(move || {
        if let Some(delay) = init_delay {
            std::thread::sleep(delay);
        }
        if fail_init {
            return Err(EngineInitError::Load("disabled by --fail-init".to_string()));
        }
        builtin::load()
    });

    let mut terminal = setup_terminal().context("Failed to setup terminal")?;

    // Run main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    result
}

/// Sets up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Engine readiness, note reveals and notification timeouts
        let now = Instant::now();
        app.tick(now);

        terminal.draw(|frame| ui::render(frame, app, now))?;

        // Short timeout so scheduled tasks run on time
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press
                        && app.handle_key(key, Instant::now()) == KeyOutcome::Quit
                    {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                        app.handle_click(mouse.column, mouse.row, Instant::now());
                    }
                }
                _ => {}
            }
        }
    }
}
