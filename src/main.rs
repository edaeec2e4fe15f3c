use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseEvent},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use delaunay_flow::color::{Color, parse_hex_color};
use delaunay_flow::{Application, FrameClock, Settings, TerminalRenderer};
use std::env;
use std::io::{BufWriter, Stdout, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn print_usage() {
    eprintln!("delaunay-flow - Animated Delaunay triangulation field for the terminal");
    eprintln!();
    eprintln!("Usage: delaunay-flow [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --settings PATH    Load settings from a JSON file (default: ./settings.json if present)");
    eprintln!("  --bg-color RRGGBB  Use a single flat background color (e.g., --bg-color 1a1b26)");
    eprintln!("  --fps N            Override the target frame rate");
    eprintln!("  --vsync            Do not sleep between frames");
    eprintln!();
    eprintln!("Keys: 'r' restarts the field; 'q', ESC, or Ctrl+C exits");
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn run(settings: Settings) -> std::io::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableMouseCapture)?;

    let result = frame_loop(settings, &mut stdout);

    execute!(stdout, Show, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    result
}

fn frame_loop(settings: Settings, stdout: &mut BufWriter<Stdout>) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let renderer = TerminalRenderer::for_terminal(&settings, cols, rows);
    let mut app = Application::new(settings, renderer);
    let restart = app.restart_signal();
    let mut clock = FrameClock::new();

    'frames: loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break 'frames;
                    }
                    if key_event.code == KeyCode::Char('r') {
                        restart.request();
                    }
                }
                Event::Mouse(MouseEvent { column, row, .. }) => {
                    app.set_mouse_cell(column, row);
                }
                Event::Resize(cols, rows) => {
                    let renderer = TerminalRenderer::for_terminal(app.settings(), cols, rows);
                    app.resize(renderer);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        app.frame(clock.delta());
        app.renderer_mut().present(stdout)?;

        app.pace(frame_start.elapsed());
    }

    Ok(())
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut settings_path: Option<PathBuf> = None;
    let mut bg_color: Option<(u8, u8, u8)> = None;
    let mut fps: Option<f32> = None;
    let mut vsync = false;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--settings" => {
                let Some(path) = args.get(i + 1) else {
                    fail("--settings requires a file path");
                };
                settings_path = Some(PathBuf::from(path));
                i += 2;
            }
            "--bg-color" => {
                let Some(value) = args.get(i + 1) else {
                    fail("--bg-color requires a hex color value");
                };
                match parse_hex_color(value) {
                    Some(color) => bg_color = Some(color),
                    None => fail(&format!("Invalid hex color: {}\nExpected format: RRGGBB (e.g., 1a1b26)", value)),
                }
                i += 2;
            }
            "--fps" => {
                let Some(value) = args.get(i + 1) else {
                    fail("--fps requires a number");
                };
                match value.parse::<f32>() {
                    Ok(v) => fps = Some(v),
                    Err(_) => fail(&format!("Invalid frame rate: {}", value)),
                }
                i += 2;
            }
            "--vsync" => {
                vsync = true;
                i += 1;
            }
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            arg => {
                eprintln!("Unknown option: {}", arg);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }

    let loaded = match &settings_path {
        Some(path) => Settings::load(path),
        None => Settings::load_default(),
    };
    let mut settings = match loaded {
        Ok(settings) => settings,
        Err(err) => fail(&format!("Error: {}", err)),
    };

    if let Some(color) = bg_color {
        settings.background_colors = vec![Color::from_rgb8(color)];
    }
    if let Some(fps) = fps {
        settings.target_fps = fps;
    }
    if vsync {
        settings.vsync = true;
    }
    if let Err(err) = settings.validate() {
        fail(&format!("Error: {}", err));
    }

    run(settings)
}
