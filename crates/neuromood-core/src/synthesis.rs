//! Waveform synthesis
//!
//! Builds pseudo-EEG signals out of fixed sine components per frequency band,
//! uniform noise and a mains interference tone. The component tables below are
//! calibrated against the classifier; changing them shifts its output.
//!
//! Noise draws from a caller-supplied [`Rng`] so that generation is reproducible
//! under a seeded generator.

use crate::error::{CoreError, Result};
use crate::signal::{sample_count, Emotion, Signal, DURATION, SAMPLE_RATE};
use crate::spectrum::FrequencyBand;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// One sine component: (frequency Hz, amplitude, phase rad)
type Component = (f64, f64, f64);

const DELTA_COMPONENTS: &[Component] = &[(1.0, 1.0, 0.0), (2.5, 0.5, PI / 4.0)];
const THETA_COMPONENTS: &[Component] = &[(5.0, 0.6, 0.0), (7.0, 0.4, PI / 5.0)];
const ALPHA_COMPONENTS: &[Component] = &[(10.0, 0.8, 0.0), (11.0, 0.4, PI / 4.0)];
const BETA_COMPONENTS: &[Component] = &[
    (18.0, 0.5, 0.0),
    (22.0, 0.3, PI / 3.0),
    (26.0, 0.2, PI / 6.0),
];
const GAMMA_COMPONENTS: &[Component] = &[(40.0, 0.2, 0.0), (50.0, 0.1, PI / 2.0)];

/// Default mains frequency in Hz
pub const POWER_LINE_FREQ: f64 = 50.0;

/// Default mains interference amplitude
pub const POWER_LINE_AMP: f64 = 0.25;

/// Which signal to synthesize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// Alpha/beta/gamma heavy
    Happy,
    /// Balanced alpha/beta with some theta
    Neutral,
    /// Theta/delta heavy
    Sad,
    /// User-weighted mix
    Custom(CustomSignalParams),
}

/// Band weights and interference settings for a custom signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomSignalParams {
    /// Alpha band weight
    pub alpha: f64,
    /// Beta band weight
    pub beta: f64,
    /// Theta band weight
    pub theta: f64,
    /// Delta band weight
    pub delta: f64,
    /// Gamma band weight
    pub gamma: f64,
    /// Uniform noise amplitude
    pub noise: f64,
    /// Power-line frequency in Hz
    pub power_freq: f64,
    /// Power-line amplitude
    pub power_amp: f64,
}

impl Default for CustomSignalParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
            theta: 0.3,
            delta: 0.2,
            gamma: 0.3,
            noise: 0.2,
            power_freq: POWER_LINE_FREQ,
            power_amp: POWER_LINE_AMP,
        }
    }
}

impl CustomSignalParams {
    /// Emotion label implied by the weights alone.
    ///
    /// This is a generation-time tag only. The classifier scores the spectrum
    /// independently and may disagree.
    pub fn inferred_emotion(&self) -> Emotion {
        if self.alpha > 0.8 && self.gamma > 0.2 {
            Emotion::Happy
        } else if self.theta > 0.8 || self.delta > 0.6 {
            Emotion::Sad
        } else {
            Emotion::Neutral
        }
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("theta", self.theta),
            ("delta", self.delta),
            ("gamma", self.gamma),
            ("noise", self.noise),
            ("power_freq", self.power_freq),
            ("power_amp", self.power_amp),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(CoreError::signal(format!("{} must be finite", name)));
            }
        }
        if self.power_freq < 0.0 {
            return Err(CoreError::signal(format!(
                "power_freq {} Hz must not be negative",
                self.power_freq
            )));
        }
        Ok(())
    }

    fn mix(&self) -> BandMix {
        let mut weights = [0.0; 5];
        weights[FrequencyBand::Delta.index()] = self.delta;
        weights[FrequencyBand::Theta.index()] = self.theta;
        weights[FrequencyBand::Alpha.index()] = self.alpha;
        weights[FrequencyBand::Beta.index()] = self.beta;
        weights[FrequencyBand::Gamma.index()] = self.gamma;
        BandMix {
            weights,
            noise: self.noise,
            power_freq: self.power_freq,
            power_amp: self.power_amp,
        }
    }
}

/// Weighted sum of band rhythms plus noise and mains interference
#[derive(Debug, Clone, Copy)]
struct BandMix {
    /// Indexed by [`FrequencyBand::index`]
    weights: [f64; 5],
    noise: f64,
    power_freq: f64,
    power_amp: f64,
}

impl BandMix {
    fn preset(emotion: Emotion) -> Self {
        // [delta, theta, alpha, beta, gamma]
        match emotion {
            Emotion::Happy => Self {
                weights: [0.0, 0.0, 1.2, 0.6, 0.3],
                noise: 0.2,
                power_freq: POWER_LINE_FREQ,
                power_amp: 0.25,
            },
            Emotion::Neutral => Self {
                weights: [0.0, 0.3, 0.8, 0.5, 0.0],
                noise: 0.15,
                power_freq: POWER_LINE_FREQ,
                power_amp: 0.2,
            },
            Emotion::Sad => Self {
                weights: [0.8, 1.2, 0.4, 0.0, 0.0],
                noise: 0.2,
                power_freq: POWER_LINE_FREQ,
                power_amp: 0.3,
            },
        }
    }
}

/// `amplitude * sin(2π·frequency·t + phase)` sampled over `[0, duration)`.
///
/// Produces `round(duration * sample_rate)` points spaced `duration / n` apart.
pub fn sine(frequency: f64, amplitude: f64, duration: f64, sample_rate: u32, phase: f64) -> Vec<f64> {
    let n = sample_count(duration, sample_rate);
    let step = if n > 0 { duration / n as f64 } else { 0.0 };
    (0..n)
        .map(|i| {
            let t = i as f64 * step;
            amplitude * (2.0 * PI * frequency * t + phase).sin()
        })
        .collect()
}

/// `length` samples uniformly distributed in `[-amplitude, amplitude)`
pub fn noise<R: Rng + ?Sized>(rng: &mut R, length: usize, amplitude: f64) -> Vec<f64> {
    (0..length)
        .map(|_| (rng.random::<f64>() - 0.5) * 2.0 * amplitude)
        .collect()
}

/// Pure sinusoid modelling mains interference
pub fn power_line_interference(duration: f64, sample_rate: u32, freq: f64, amp: f64) -> Vec<f64> {
    sine(freq, amp, duration, sample_rate, 0.0)
}

/// Rhythm approximating one physiological band
pub fn band_wave(band: FrequencyBand, duration: f64, sample_rate: u32) -> Vec<f64> {
    let components = match band {
        FrequencyBand::Delta => DELTA_COMPONENTS,
        FrequencyBand::Theta => THETA_COMPONENTS,
        FrequencyBand::Alpha => ALPHA_COMPONENTS,
        FrequencyBand::Beta => BETA_COMPONENTS,
        FrequencyBand::Gamma => GAMMA_COMPONENTS,
    };
    let mut out = vec![0.0; sample_count(duration, sample_rate)];
    for &(freq, amp, phase) in components {
        add_scaled(&mut out, &sine(freq, amp, duration, sample_rate, phase), 1.0);
    }
    out
}

/// Delta rhythm (1 Hz, 2.5 Hz)
pub fn delta_waves(duration: f64, sample_rate: u32) -> Vec<f64> {
    band_wave(FrequencyBand::Delta, duration, sample_rate)
}

/// Theta rhythm (5 Hz, 7 Hz)
pub fn theta_waves(duration: f64, sample_rate: u32) -> Vec<f64> {
    band_wave(FrequencyBand::Theta, duration, sample_rate)
}

/// Alpha rhythm (10 Hz, 11 Hz)
pub fn alpha_waves(duration: f64, sample_rate: u32) -> Vec<f64> {
    band_wave(FrequencyBand::Alpha, duration, sample_rate)
}

/// Beta rhythm (18 Hz, 22 Hz, 26 Hz)
pub fn beta_waves(duration: f64, sample_rate: u32) -> Vec<f64> {
    band_wave(FrequencyBand::Beta, duration, sample_rate)
}

/// Gamma rhythm (40 Hz, 50 Hz)
pub fn gamma_waves(duration: f64, sample_rate: u32) -> Vec<f64> {
    band_wave(FrequencyBand::Gamma, duration, sample_rate)
}

fn add_scaled(acc: &mut [f64], src: &[f64], weight: f64) {
    for (a, s) in acc.iter_mut().zip(src) {
        *a += s * weight;
    }
}

/// Synthesizes signals of a fixed duration and sample rate
#[derive(Debug, Clone, Copy)]
pub struct SignalGenerator {
    duration: f64,
    sample_rate: u32,
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self {
            duration: DURATION,
            sample_rate: SAMPLE_RATE,
        }
    }
}

impl SignalGenerator {
    /// Create a generator, rejecting parameters that yield no samples
    pub fn new(duration: f64, sample_rate: u32) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(CoreError::signal(format!(
                "duration {} s must be positive",
                duration
            )));
        }
        if sample_rate == 0 {
            return Err(CoreError::signal("sample rate must be positive"));
        }
        if sample_count(duration, sample_rate) == 0 {
            return Err(CoreError::signal(format!(
                "{} s at {} Hz yields no samples",
                duration, sample_rate
            )));
        }
        Ok(Self {
            duration,
            sample_rate,
        })
    }

    /// Signal duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Generate a signal of the requested kind
    pub fn generate<R: Rng + ?Sized>(&self, kind: &SignalKind, rng: &mut R) -> Result<Signal> {
        match kind {
            SignalKind::Happy => Ok(self.happy(rng)),
            SignalKind::Neutral => Ok(self.neutral(rng)),
            SignalKind::Sad => Ok(self.sad(rng)),
            SignalKind::Custom(params) => self.custom(params, rng),
        }
    }

    /// Alpha, beta and gamma dominated signal
    pub fn happy<R: Rng + ?Sized>(&self, rng: &mut R) -> Signal {
        let samples = self.render(&BandMix::preset(Emotion::Happy), rng);
        self.finish(samples, Emotion::Happy, "Happy Brain Signal")
    }

    /// Alpha and beta with a little theta
    pub fn neutral<R: Rng + ?Sized>(&self, rng: &mut R) -> Signal {
        let samples = self.render(&BandMix::preset(Emotion::Neutral), rng);
        self.finish(samples, Emotion::Neutral, "Neutral Brain Signal")
    }

    /// Theta and delta dominated signal
    pub fn sad<R: Rng + ?Sized>(&self, rng: &mut R) -> Signal {
        let samples = self.render(&BandMix::preset(Emotion::Sad), rng);
        self.finish(samples, Emotion::Sad, "Sad Brain Signal")
    }

    /// Signal weighted by user parameters, tagged with [`CustomSignalParams::inferred_emotion`]
    pub fn custom<R: Rng + ?Sized>(&self, params: &CustomSignalParams, rng: &mut R) -> Result<Signal> {
        params.validate()?;
        let samples = self.render(&params.mix(), rng);
        Ok(self.finish(samples, params.inferred_emotion(), "Custom Signal"))
    }

    fn render<R: Rng + ?Sized>(&self, mix: &BandMix, rng: &mut R) -> Vec<f64> {
        let n = sample_count(self.duration, self.sample_rate);
        let mut data = vec![0.0; n];
        for band in FrequencyBand::ALL {
            let weight = mix.weights[band.index()];
            if weight != 0.0 {
                let wave = band_wave(band, self.duration, self.sample_rate);
                add_scaled(&mut data, &wave, weight);
            }
        }
        add_scaled(&mut data, &noise(rng, n, mix.noise), 1.0);
        let power = power_line_interference(
            self.duration,
            self.sample_rate,
            mix.power_freq,
            mix.power_amp,
        );
        add_scaled(&mut data, &power, 1.0);
        data
    }

    fn finish(&self, samples: Vec<f64>, emotion: Emotion, label: &str) -> Signal {
        debug!(
            "Generated '{}' ({}): {} samples at {} Hz",
            label,
            emotion,
            samples.len(),
            self.sample_rate
        );
        Signal::from_parts(samples, self.sample_rate, self.duration, emotion, label)
    }
}
