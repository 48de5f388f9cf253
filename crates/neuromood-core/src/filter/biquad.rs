//! Second-order IIR sections and a zero-phase (forward-backward) runner

use tracing::trace;

/// One second-order section, `a[0]` normalised to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    /// Numerator coefficients
    pub b: [f64; 3],
    /// Denominator coefficients
    pub a: [f64; 3],
}

impl Biquad {
    /// Create a section, normalising by `a[0]`
    pub fn new(b: [f64; 3], a: [f64; 3]) -> Self {
        let a0 = a[0];
        Self {
            b: b.map(|v| v / a0),
            a: a.map(|v| v / a0),
        }
    }

    /// Gain at DC (0 when the section has a zero at z = 1)
    pub fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }

    /// Transposed direct form II state that holds a unit step at steady state
    fn step_state(&self) -> [f64; 2] {
        let g = self.dc_gain();
        let z1 = self.b[2] - self.a[2] * g;
        let z0 = self.b[1] - self.a[1] * g + z1;
        [z0, z1]
    }

    /// Filter `input` starting from `state`
    fn run(&self, input: &[f64], mut state: [f64; 2]) -> Vec<f64> {
        let [b0, b1, b2] = self.b;
        let [_, a1, a2] = self.a;
        input
            .iter()
            .map(|&x| {
                let y = b0 * x + state[0];
                state[0] = b1 * x - a1 * y + state[1];
                state[1] = b2 * x - a2 * y;
                y
            })
            .collect()
    }
}

/// Per-section steady-state initial conditions for a cascade fed a unit step
fn cascade_step_state(sections: &[Biquad]) -> Vec<[f64; 2]> {
    let mut scale = 1.0;
    sections
        .iter()
        .map(|section| {
            let [z0, z1] = section.step_state();
            let zi = [z0 * scale, z1 * scale];
            scale *= section.dc_gain();
            zi
        })
        .collect()
}

/// Run the cascade once, each section primed for a constant input of `x0`
fn cascade(sections: &[Biquad], zi: &[[f64; 2]], input: &[f64]) -> Vec<f64> {
    let x0 = input.first().copied().unwrap_or(0.0);
    let mut data = input.to_vec();
    for (section, state) in sections.iter().zip(zi) {
        data = section.run(&data, [state[0] * x0, state[1] * x0]);
    }
    data
}

/// Odd extension: reflect `pad` samples about each end point
fn odd_extend(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];
    let mut out = Vec::with_capacity(n + 2 * pad);
    out.extend((1..=pad).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=pad).map(|i| 2.0 * last - x[n - 1 - i]));
    out
}

/// Edge padding length for a cascade of `sections` sections
pub fn pad_len(sections: usize, len: usize) -> usize {
    (3 * (2 * sections + 1)).min(len.saturating_sub(1))
}

/// Zero-phase filtering: forward pass, then backward pass over the reversed output.
///
/// The input is odd-extended at both ends and each pass starts from
/// steady-state conditions, which keeps edge transients small. Output length
/// equals input length.
pub fn filtfilt(sections: &[Biquad], x: &[f64]) -> Vec<f64> {
    if x.is_empty() || sections.is_empty() {
        return x.to_vec();
    }
    let pad = pad_len(sections.len(), x.len());
    let extended = odd_extend(x, pad);
    let zi = cascade_step_state(sections);
    trace!(
        "filtfilt: {} sections, {} samples, pad {}",
        sections.len(),
        x.len(),
        pad
    );

    let mut forward = cascade(sections, &zi, &extended);
    forward.reverse();
    let mut backward = cascade(sections, &zi, &forward);
    backward.reverse();

    backward[pad..pad + x.len()].to_vec()
}
