use anyhow::{Context, Result};
use fundsp::hacker32::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source, buffer::SamplesBuffer};

const SAMPLE_RATE: u32 = 44_100;

// ── Sound seam ──────────────────────────────────────────────────────────────

/// A single playable clip, like an `<audio>` element: it can be started,
/// paused, rewound to its first sample and have its volume set.
pub trait Sound {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    /// Seek back to the start. Leaves the sound paused.
    fn rewind(&mut self) -> Result<()>;
    fn set_volume(&mut self, volume: f32);
    fn is_paused(&self) -> bool;
}

/// Stand-in used when no output device could be opened.
#[derive(Debug, Default)]
pub struct Silent {
    paused: bool,
}

impl Sound for Silent {
    fn play(&mut self) -> Result<()> {
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn rewind(&mut self) -> Result<()> {
        self.paused = true;
        Ok(())
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn is_paused(&self) -> bool {
        self.paused
    }
}

// ── Synthesis ───────────────────────────────────────────────────────────────

/// Which of the two built-in clips to synthesize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// Background loop.
    Music,
    /// One-shot played when the bird crashes.
    Impact,
}

impl Cue {
    fn looping(self) -> bool {
        matches!(self, Cue::Music)
    }

    fn samples(self) -> Vec<f32> {
        match self {
            Cue::Music => music_samples(),
            Cue::Impact => impact_samples(),
        }
    }
}

fn render(mut unit: Box<dyn AudioUnit>, seconds: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let count = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..count).map(|_| unit.get_mono()).collect()
}

/// Falling sawtooth: 400Hz down to 80Hz over 0.4s, fading out over 0.5s.
fn impact_samples() -> Vec<f32> {
    let freq = lfo(|t: f32| 400.0 + (80.0 - 400.0) * (t / 0.4).min(1.0));
    let gain = lfo(|t: f32| 0.15 * (1.0 - (t / 0.5).min(1.0)));
    render(Box::new((freq >> saw()) * gain), 0.5)
}

const NOTE_SECS: f32 = 0.18;

#[rustfmt::skip]
const MELODY: [(f32, f32); 16] = [
    (523.25, 130.81), (659.25, 130.81), (783.99, 130.81), (659.25, 130.81),
    (587.33, 146.83), (698.46, 146.83), (880.00, 146.83), (698.46, 146.83),
    (523.25, 174.61), (659.25, 174.61), (783.99, 174.61), (1046.5, 174.61),
    (987.77, 196.00), (783.99, 196.00), (587.33, 196.00), (493.88, 196.00),
];

/// Short chiptune loop: a plucked sine lead over a triangle bass.
fn music_samples() -> Vec<f32> {
    let mut samples = Vec::with_capacity(MELODY.len() * (SAMPLE_RATE as f32 * NOTE_SECS) as usize);
    for &(lead, bass) in &MELODY {
        let pluck = lfo(|t: f32| (1.0 - t / NOTE_SECS).max(0.0));
        let voice = (sine_hz(lead) * 0.5 + triangle_hz(bass) * 0.3) * pluck * 0.4;
        samples.extend(render(Box::new(voice), NOTE_SECS));
    }
    samples
}

// ── Rodio playback ──────────────────────────────────────────────────────────

/// The open output device. Must outlive every sound created from it.
pub struct Speakers {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl Speakers {
    pub fn open() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("no default audio output device")?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    /// Synthesize `cue` and park it, paused, on its own sink.
    pub fn sound(&self, cue: Cue, volume: f32) -> Result<RodioSound> {
        let sink = Sink::try_new(&self.handle).context("creating audio sink")?;
        let mut sound = RodioSound {
            sink,
            samples: cue.samples(),
            looping: cue.looping(),
        };
        sound.set_volume(volume);
        sound.rewind()?;
        log::debug!("{cue:?} ready, {} samples", sound.samples.len());
        Ok(sound)
    }
}

pub struct RodioSound {
    sink: Sink,
    samples: Vec<f32>,
    looping: bool,
}

impl RodioSound {
    fn queue(&self) {
        let clip = SamplesBuffer::new(1, SAMPLE_RATE, self.samples.clone());
        if self.looping {
            self.sink.append(clip.repeat_infinite());
        } else {
            self.sink.append(clip);
        }
    }
}

impl Sound for RodioSound {
    fn play(&mut self) -> Result<()> {
        // A finished one-shot leaves the sink empty.
        if self.sink.empty() {
            self.queue();
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn rewind(&mut self) -> Result<()> {
        self.sink.clear();
        self.queue();
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }
}
