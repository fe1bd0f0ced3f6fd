#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;

use flappy_term::audio::Sound;
use flappy_term::game::{Collaborators, Game};
use flappy_term::storage::HighScoreStore;
use flappy_term::types::Tuning;

/// Shared record of every collaborator call, in order.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }
}

pub struct FakeSound {
    pub name: &'static str,
    pub journal: Journal,
    pub paused: bool,
    pub reject_play: bool,
}

impl FakeSound {
    pub fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: journal.clone(),
            paused: true,
            reject_play: false,
        }
    }
}

impl Sound for FakeSound {
    fn play(&mut self) -> Result<()> {
        self.journal.push(format!("{}.play", self.name));
        if self.reject_play {
            return Err(anyhow!("playback blocked"));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.journal.push(format!("{}.pause", self.name));
        self.paused = true;
    }

    fn rewind(&mut self) -> Result<()> {
        self.journal.push(format!("{}.rewind", self.name));
        self.paused = true;
        Ok(())
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn is_paused(&self) -> bool {
        self.paused
    }
}

pub struct FakeStore {
    pub journal: Journal,
    pub stored: Option<u32>,
    pub broken: bool,
}

impl HighScoreStore for FakeStore {
    fn load(&self) -> Result<u32> {
        if self.broken {
            return Err(anyhow!("storage unavailable"));
        }
        Ok(self.stored.unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.journal.push(format!("store.save {score}"));
        if self.broken {
            return Err(anyhow!("storage unavailable"));
        }
        self.stored = Some(score);
        Ok(())
    }
}

pub struct Harness {
    pub game: Game,
    pub journal: Journal,
}

pub struct Options {
    pub tuning: Tuning,
    pub stored: Option<u32>,
    pub broken_store: bool,
    pub reject_play: bool,
    pub seed: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            stored: None,
            broken_store: false,
            reject_play: false,
            seed: 42,
        }
    }
}

pub fn harness(opts: Options) -> Harness {
    let journal = Journal::default();
    let mut music = FakeSound::new("music", &journal);
    music.reject_play = opts.reject_play;
    let mut impact = FakeSound::new("impact", &journal);
    impact.reject_play = opts.reject_play;
    let store = FakeStore {
        journal: journal.clone(),
        stored: opts.stored,
        broken: opts.broken_store,
    };
    let game = Game::new(
        opts.tuning,
        StdRng::seed_from_u64(opts.seed),
        Collaborators {
            music: Box::new(music),
            impact: Box::new(impact),
            store: Box::new(store),
        },
    );
    Harness { game, journal }
}

pub fn default_harness() -> Harness {
    harness(Options::default())
}
