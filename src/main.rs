use std::io::{self, BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, terminal,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use flappy_term::audio::{Cue, Silent, Sound, Speakers};
use flappy_term::config::{AudioConfig, Cli, Config};
use flappy_term::game::{Collaborators, Game};
use flappy_term::input::{self, Action};
use flappy_term::logging;
use flappy_term::render::{self, Canvas};
use flappy_term::storage::{self, HighScoreStore, JsonFileStore, MemoryStore};
use flappy_term::timer::{Interval, frame_dt};

// ── Terminal ────────────────────────────────────────────────────────────────

/// Raw mode and the alternate screen for as long as this lives. Every frame
/// goes through `out`, so teardown can drain it before leaving the screen.
struct Terminal<W: Write> {
    out: W,
}

impl<W: Write> Terminal<W> {
    fn enter(mut out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;
        Ok(Self { out })
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        let _ = leave(&mut self.out);
        let _ = terminal::disable_raw_mode();
    }
}

/// Push out any half-written frame, then hand the main screen back.
fn leave(out: &mut impl Write) -> io::Result<()> {
    out.flush()?;
    execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )
}

// ── Collaborators ───────────────────────────────────────────────────────────

fn open_audio(cfg: &AudioConfig) -> (Option<Speakers>, Box<dyn Sound>, Box<dyn Sound>) {
    if !cfg.enabled {
        log::info!("audio disabled");
        return (None, Box::new(Silent::default()), Box::new(Silent::default()));
    }
    let speakers = match Speakers::open() {
        Ok(speakers) => speakers,
        Err(err) => {
            log::warn!("playing without sound: {err:#}");
            return (None, Box::new(Silent::default()), Box::new(Silent::default()));
        }
    };
    let load = |cue: Cue, volume: f32| -> Box<dyn Sound> {
        match speakers.sound(cue, volume) {
            Ok(sound) => Box::new(sound),
            Err(err) => {
                log::warn!("{cue:?} unavailable: {err:#}");
                Box::new(Silent::default())
            }
        }
    };
    let music = load(Cue::Music, cfg.music_volume);
    let impact = load(Cue::Impact, cfg.impact_volume);
    (Some(speakers), music, impact)
}

fn open_store(no_save: bool) -> Box<dyn HighScoreStore> {
    if no_save {
        return Box::new(MemoryStore::default());
    }
    match JsonFileStore::in_data_dir() {
        Ok(store) => {
            log::debug!("high score file {}", store.path().display());
            Box::new(store)
        }
        Err(err) => {
            log::warn!("high score won't be kept: {err:#}");
            Box::new(MemoryStore::default())
        }
    }
}

// ── Main loop ───────────────────────────────────────────────────────────────

fn run(game: &mut Game, cfg: &Config, out: &mut impl Write) -> Result<()> {
    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let mut canvas = Canvas::new(cols as usize, rows as usize * 2);
    canvas.load_images();

    let frame_dur = cfg.frame();
    let mut spawn_timer = Interval::new(cfg.spawn_interval(), Instant::now());
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match input::map_event(&event::read()?) {
                Some(Action::Quit) => return Ok(()),
                Some(Action::ImpulseOrAdvance) => game.impulse_or_advance(),
                Some(Action::Resize(c, r)) => {
                    canvas.resize(c as usize, r as usize * 2);
                    canvas.load_images();
                }
                None => {}
            }
        }

        // Spawn timer runs on the wall clock, independent of frames.
        if spawn_timer.due(frame_start) {
            game.spawn_tick();
        }

        // Update
        let dt = frame_dt(
            frame_start - last_frame,
            frame_dur,
            cfg.timing.frame_compensation,
        );
        last_frame = frame_start;
        game.tick(dt);

        // Render
        render::present(&game.snapshot(), &mut canvas);
        canvas.flush(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = storage::data_dir().ok();
    // Last chance to use stderr before the game takes over the terminal.
    let log_file = match logging::init(data_dir.as_deref(), cli.log_level.as_deref()) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("flappy-term: logging disabled: {err:#}");
            None
        }
    };

    let default_config: Option<PathBuf> = data_dir.as_ref().map(|d| d.join("config.toml"));
    let cfg = Config::resolve(&cli, default_config.as_deref())?;
    for warning in cfg.validate() {
        log::warn!("config: {warning}");
    }
    if let Some(path) = &log_file {
        log::debug!("logging to {}", path.display());
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (_speakers, music, impact) = open_audio(&cfg.audio);
    let mut game = Game::new(
        cfg.tuning(),
        rng,
        Collaborators {
            music,
            impact,
            store: open_store(cli.no_save),
        },
    );

    let mut term =
        Terminal::enter(BufWriter::new(stdout())).context("setting up the terminal")?;
    let result = run(&mut game, &cfg, &mut term.out);
    if let Err(err) = &result {
        log::error!("exiting: {err:#}");
    }
    result
}
