//! Spectral analysis - FFT magnitudes aggregated into EEG band powers

use crate::error::Result;
use crate::signal::check_samples;
use num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Named EEG frequency band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyBand {
    /// Delta (0.5-4Hz)
    Delta,
    /// Theta (4-8Hz)
    Theta,
    /// Alpha (8-13Hz)
    Alpha,
    /// Beta (13-30Hz)
    Beta,
    /// Gamma (30-45Hz)
    Gamma,
}

impl FrequencyBand {
    /// All bands, low to high
    pub const ALL: [FrequencyBand; 5] = [
        FrequencyBand::Delta,
        FrequencyBand::Theta,
        FrequencyBand::Alpha,
        FrequencyBand::Beta,
        FrequencyBand::Gamma,
    ];

    /// Frequency interval in Hz, lower bound inclusive, upper exclusive
    pub fn range(self) -> (f64, f64) {
        match self {
            FrequencyBand::Delta => (0.5, 4.0),
            FrequencyBand::Theta => (4.0, 8.0),
            FrequencyBand::Alpha => (8.0, 13.0),
            FrequencyBand::Beta => (13.0, 30.0),
            FrequencyBand::Gamma => (30.0, 45.0),
        }
    }

    /// Position in [`FrequencyBand::ALL`]
    pub fn index(self) -> usize {
        match self {
            FrequencyBand::Delta => 0,
            FrequencyBand::Theta => 1,
            FrequencyBand::Alpha => 2,
            FrequencyBand::Beta => 3,
            FrequencyBand::Gamma => 4,
        }
    }

    /// Lowercase band name
    pub fn as_str(self) -> &'static str {
        match self {
            FrequencyBand::Delta => "delta",
            FrequencyBand::Theta => "theta",
            FrequencyBand::Alpha => "alpha",
            FrequencyBand::Beta => "beta",
            FrequencyBand::Gamma => "gamma",
        }
    }

    /// True if `freq` falls inside this band
    pub fn contains(self, freq: f64) -> bool {
        let (low, high) = self.range();
        freq >= low && freq < high
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Power per frequency band. Every band always has a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandPowers {
    /// Delta band power
    pub delta: f64,
    /// Theta band power
    pub theta: f64,
    /// Alpha band power
    pub alpha: f64,
    /// Beta band power
    pub beta: f64,
    /// Gamma band power
    pub gamma: f64,
}

impl BandPowers {
    /// Build from an array ordered like [`FrequencyBand::ALL`]
    pub fn from_array(values: [f64; 5]) -> Self {
        Self {
            delta: values[0],
            theta: values[1],
            alpha: values[2],
            beta: values[3],
            gamma: values[4],
        }
    }

    /// Values ordered like [`FrequencyBand::ALL`]
    pub fn to_array(&self) -> [f64; 5] {
        [self.delta, self.theta, self.alpha, self.beta, self.gamma]
    }

    /// Power of a single band
    pub fn get(&self, band: FrequencyBand) -> f64 {
        self.to_array()[band.index()]
    }

    /// `(band, power)` pairs, low to high
    pub fn iter(&self) -> impl Iterator<Item = (FrequencyBand, f64)> {
        FrequencyBand::ALL.into_iter().zip(self.to_array())
    }

    /// Sum over all bands
    pub fn total(&self) -> f64 {
        self.to_array().iter().sum()
    }

    /// Each band as a fraction of the total, `epsilon` added to the denominator.
    ///
    /// When the plain sum overflows, bands are first scaled by the largest
    /// one; infinite bands then split the whole total evenly.
    pub fn fractions(&self, epsilon: f64) -> BandPowers {
        let values = self.to_array();
        let total = self.total();
        if total.is_finite() {
            return BandPowers::from_array(values.map(|v| v / (total + epsilon)));
        }

        let max = values.iter().copied().fold(0.0, f64::max);
        let scaled = if max.is_finite() {
            values.map(|v| v / max)
        } else {
            values.map(|v| if v.is_infinite() { 1.0 } else { 0.0 })
        };
        let scaled_total: f64 = scaled.iter().sum();
        BandPowers::from_array(scaled.map(|v| v / scaled_total))
    }

    /// Band holding the most power (first wins on ties)
    pub fn dominant(&self) -> FrequencyBand {
        let mut best = FrequencyBand::Delta;
        for (band, power) in self.iter() {
            if power > self.get(best) {
                best = band;
            }
        }
        best
    }
}

/// Magnitude spectrum of the non-negative frequencies
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Bin centre frequencies in Hz (`k * sample_rate / n`)
    pub frequencies: Vec<f64>,
    /// `|X[k]|` for each bin
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Number of bins
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// True if no bins were produced
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Mean squared magnitude over the bins inside `band`, 0 if none fall in range
    pub fn band_power(&self, band: FrequencyBand) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for (freq, mag) in self.frequencies.iter().zip(&self.magnitudes) {
            if band.contains(*freq) {
                sum += mag * mag;
                count += 1;
            }
        }
        if count == 0 {
            warn!("No FFT bins fall inside the {} band", band);
            return 0.0;
        }
        sum / count as f64
    }

    /// Power for every band
    pub fn band_powers(&self) -> BandPowers {
        BandPowers::from_array(FrequencyBand::ALL.map(|band| self.band_power(band)))
    }
}

/// Unnormalised DFT magnitudes of the full sequence, first `n / 2` bins
pub fn magnitude_spectrum(samples: &[f64], sample_rate: u32) -> Result<Spectrum> {
    check_samples(samples)?;
    let n = samples.len();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    let half = n / 2;
    let bin_width = sample_rate as f64 / n as f64;
    let frequencies = (0..half).map(|k| k as f64 * bin_width).collect();
    let magnitudes = buffer[..half].iter().map(|c| c.norm()).collect();

    Ok(Spectrum {
        frequencies,
        magnitudes,
    })
}

/// Band powers of a sample sequence
pub fn band_powers(samples: &[f64], sample_rate: u32) -> Result<BandPowers> {
    let spectrum = magnitude_spectrum(samples, sample_rate)?;
    let powers = spectrum.band_powers();
    debug!(
        "Band powers over {} bins: delta={:.3e} theta={:.3e} alpha={:.3e} beta={:.3e} gamma={:.3e}",
        spectrum.len(),
        powers.delta,
        powers.theta,
        powers.alpha,
        powers.beta,
        powers.gamma
    );
    Ok(powers)
}
