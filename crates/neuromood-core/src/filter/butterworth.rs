//! Digital filter design: Butterworth band-pass and second-order notch
//!
//! The band-pass follows the classic analog route: Butterworth low-pass
//! prototype, low-pass to band-pass transform at pre-warped edges, then the
//! bilinear transform. Poles are grouped into conjugate pairs so the result
//! runs as cascaded second-order sections.

use super::biquad::Biquad;
use crate::error::{CoreError, Result};
use num_complex::Complex;
use std::f64::consts::PI;
use tracing::trace;

type C64 = Complex<f64>;

const IMAG_TOLERANCE: f64 = 1e-12;

fn nyquist(sample_rate: u32) -> f64 {
    sample_rate as f64 / 2.0
}

fn check_frequency(name: &str, freq: f64, sample_rate: u32) -> Result<()> {
    let nyq = nyquist(sample_rate);
    if !freq.is_finite() || freq <= 0.0 {
        return Err(CoreError::filter(format!(
            "{} {} Hz must be positive",
            name, freq
        )));
    }
    if freq >= nyq {
        return Err(CoreError::filter(format!(
            "{} {} Hz must be below the Nyquist frequency {} Hz",
            name, freq, nyq
        )));
    }
    Ok(())
}

/// Poles of the normalised analog Butterworth low-pass of the given order
fn prototype_poles(order: usize) -> Vec<C64> {
    let n = order as f64;
    (0..order)
        .map(|k| {
            let m = -n + 1.0 + 2.0 * k as f64;
            -C64::from_polar(1.0, PI * m / (2.0 * n))
        })
        .collect()
}

/// Design an order-`order` Butterworth band-pass over `[low, high]` Hz.
///
/// Returns `order` second-order sections. Each section carries zeros at
/// z = 1 and z = -1 and is scaled to unit magnitude at the band centre, so
/// the cascade has unit gain there.
pub fn bandpass(low: f64, high: f64, order: usize, sample_rate: u32) -> Result<Vec<Biquad>> {
    if order == 0 {
        return Err(CoreError::filter("band-pass order must be at least 1"));
    }
    if sample_rate == 0 {
        return Err(CoreError::filter("sample rate must be positive"));
    }
    check_frequency("band-pass low cutoff", low, sample_rate)?;
    check_frequency("band-pass high cutoff", high, sample_rate)?;
    if low >= high {
        return Err(CoreError::filter(format!(
            "band-pass band [{}, {}] Hz is empty",
            low, high
        )));
    }

    let fs = sample_rate as f64;
    let fs2 = 2.0 * fs;
    let warp = |f: f64| fs2 * (PI * f / fs).tan();
    let (wl, wh) = (warp(low), warp(high));
    let bw = wh - wl;
    let wo = (wl * wh).sqrt();

    // Low-pass prototype -> analog band-pass -> digital
    let mut digital_poles = Vec::with_capacity(2 * order);
    for p in prototype_poles(order) {
        let p_lp = p * (bw / 2.0);
        let root = (p_lp * p_lp - C64::new(wo * wo, 0.0)).sqrt();
        for p_bp in [p_lp + root, p_lp - root] {
            digital_poles.push((C64::new(fs2, 0.0) + p_bp) / (C64::new(fs2, 0.0) - p_bp));
        }
    }

    let centre = 2.0 * (wo / fs2).atan();
    let sections: Vec<Biquad> = pair_poles(&digital_poles)
        .into_iter()
        .map(|(p1, p2)| {
            let a = [1.0, -(p1 + p2).re, (p1 * p2).re];
            let raw = Biquad::new([1.0, 0.0, -1.0], a);
            let gain = magnitude_at(&raw, centre);
            Biquad::new(raw.b.map(|v| v / gain), raw.a)
        })
        .collect();

    trace!(
        "Butterworth band-pass {}-{} Hz order {} at {} Hz: {} sections",
        low,
        high,
        order,
        sample_rate,
        sections.len()
    );
    Ok(sections)
}

/// Group poles into conjugate pairs, then remaining real poles two by two
fn pair_poles(poles: &[C64]) -> Vec<(C64, C64)> {
    let mut pairs = Vec::with_capacity(poles.len() / 2);
    let mut real: Vec<f64> = Vec::new();
    for &p in poles {
        if p.im > IMAG_TOLERANCE {
            pairs.push((p, p.conj()));
        } else if p.im.abs() <= IMAG_TOLERANCE {
            real.push(p.re);
        }
    }
    real.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    for chunk in real.chunks(2) {
        let p1 = C64::new(chunk[0], 0.0);
        let p2 = C64::new(chunk.get(1).copied().unwrap_or(0.0), 0.0);
        pairs.push((p1, p2));
    }
    pairs
}

/// `|H(e^{jω})|` of a single section
pub fn magnitude_at(section: &Biquad, omega: f64) -> f64 {
    let z1 = C64::from_polar(1.0, -omega);
    let z2 = z1 * z1;
    let num = z2 * section.b[2] + z1 * section.b[1] + section.b[0];
    let den = z2 * section.a[2] + z1 * section.a[1] + section.a[0];
    (num / den).norm()
}

/// Second-order IIR notch centred on `freq` Hz with quality factor `quality`.
///
/// The stop band is `freq / quality` wide at the -3 dB points. DC and
/// Nyquist pass with unit gain.
pub fn notch(freq: f64, quality: f64, sample_rate: u32) -> Result<Biquad> {
    if sample_rate == 0 {
        return Err(CoreError::filter("sample rate must be positive"));
    }
    check_frequency("notch frequency", freq, sample_rate)?;
    if !quality.is_finite() || quality <= 0.0 {
        return Err(CoreError::filter(format!(
            "notch quality factor {} must be positive",
            quality
        )));
    }

    let w0 = PI * freq / nyquist(sample_rate);
    let bw = w0 / quality;
    let beta = (bw / 2.0).tan();
    let gain = 1.0 / (1.0 + beta);
    let cos_w0 = w0.cos();

    Ok(Biquad::new(
        [gain, -2.0 * gain * cos_w0, gain],
        [1.0, -2.0 * gain * cos_w0, 2.0 * gain - 1.0],
    ))
}
