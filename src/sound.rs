use fundsp::prelude32::*;
use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};
use tracing::warn;

const SAMPLE_RATE: u32 = 44_100; // fundsp default

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Crash,
    Win,
}

impl Cue {
    fn samples(self) -> Vec<f32> {
        match self {
            Cue::Crash => crash(),
            Cue::Win => win(),
        }
    }
}

fn frames(secs: f32) -> usize {
    (secs * SAMPLE_RATE as f32) as usize
}

// Saw sweep 400Hz → 80Hz over 0.4s, fading out over 0.5s.
fn crash() -> Vec<f32> {
    let freq = lfo(|t: f32| 400.0 + (80.0 - 400.0) * (t / 0.4).min(1.0));
    let gain = lfo(|t: f32| 0.15 * (1.0 - (t / 0.5).min(1.0)));
    let mut sound = (freq >> saw()) * gain;
    (0..frames(0.5)).map(|_| sound.get_mono()).collect()
}

fn win() -> Vec<f32> {
    let freq = lfo(|t: f32| if t < 0.15 { 660.0 } else { 880.0 });
    let gain = lfo(|t: f32| 0.12 * (1.0 - (t / 0.4).min(1.0)));
    let mut sound = (freq >> sine()) * gain;
    (0..frames(0.4)).map(|_| sound.get_mono()).collect()
}

pub struct Sound {
    stream: OutputStream,
}

impl Sound {
    /// `None` when there is no usable output device.
    pub fn open() -> Option<Self> {
        match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                stream.log_on_drop(false);
                Some(Sound { stream })
            }
            Err(err) => {
                warn!(%err, "no audio output, continuing without sound");
                None
            }
        }
    }

    pub fn play(&self, cue: Cue) {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, cue.samples()));
        sink.detach(); // Play in background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0, |m, s| m.max(s.abs()))
    }

    #[test]
    fn crash_fades_out() {
        let s = Cue::Crash.samples();
        assert_eq!(s.len(), 22_050);
        assert!(peak(&s) <= 0.2);
        assert!(peak(&s[..4410]) > 0.05);
        assert!(peak(&s[s.len() - 441..]) < 0.01);
    }

    #[test]
    fn win_is_shorter_and_quieter() {
        let s = Cue::Win.samples();
        assert_eq!(s.len(), 17_640);
        assert!(peak(&s) <= 0.121);
    }
}
