//! NeuroMood - synthetic EEG emotion estimation
//!
//! Generates a synthetic EEG trace, filters it, extracts band powers and
//! prints the estimated emotion.

mod logging_setup;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use neuromood_core::{
    AnalyzerSettings, CustomSignalParams, Pipeline, SignalGenerator, SignalKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SignalChoice {
    Happy,
    Neutral,
    Sad,
    Custom,
}

#[derive(Parser, Debug)]
#[clap(name = "neuromood", version, about = "Synthetic EEG emotion estimation")]
struct CliArgs {
    /// Signal preset to generate.
    #[clap(long, value_enum, default_value_t = SignalChoice::Happy)]
    signal: SignalChoice,

    /// Alpha band weight (custom signal).
    #[clap(long)]
    alpha: Option<f64>,

    /// Beta band weight (custom signal).
    #[clap(long)]
    beta: Option<f64>,

    /// Theta band weight (custom signal).
    #[clap(long)]
    theta: Option<f64>,

    /// Delta band weight (custom signal).
    #[clap(long)]
    delta: Option<f64>,

    /// Gamma band weight (custom signal).
    #[clap(long)]
    gamma: Option<f64>,

    /// Noise amplitude (custom signal).
    #[clap(long)]
    noise: Option<f64>,

    /// Power-line frequency in Hz (custom signal).
    #[clap(long)]
    power_freq: Option<f64>,

    /// Power-line amplitude (custom signal).
    #[clap(long)]
    power_amp: Option<f64>,

    /// Settings file (.ron or .json). CLI flags override its values.
    #[clap(long, env = "NEUROMOOD_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for reproducible noise.
    #[clap(long)]
    seed: Option<u64>,

    /// Signal duration in seconds.
    #[clap(long)]
    duration: Option<f64>,

    /// Sample rate in Hz.
    #[clap(long)]
    sample_rate: Option<u32>,

    /// Skip the band-pass stage.
    #[clap(long)]
    no_bandpass: bool,

    /// Skip the power-line notch stage.
    #[clap(long)]
    no_notch: bool,

    /// Skip artifact removal.
    #[clap(long)]
    no_artifacts: bool,

    /// Print the report as JSON.
    #[clap(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[clap(long)]
    log_level: Option<String>,
}

impl CliArgs {
    fn has_custom_weights(&self) -> bool {
        [
            self.alpha,
            self.beta,
            self.theta,
            self.delta,
            self.gamma,
            self.noise,
            self.power_freq,
            self.power_amp,
        ]
        .iter()
        .any(Option::is_some)
    }

    fn custom_params(&self) -> CustomSignalParams {
        let defaults = CustomSignalParams::default();
        CustomSignalParams {
            alpha: self.alpha.unwrap_or(defaults.alpha),
            beta: self.beta.unwrap_or(defaults.beta),
            theta: self.theta.unwrap_or(defaults.theta),
            delta: self.delta.unwrap_or(defaults.delta),
            gamma: self.gamma.unwrap_or(defaults.gamma),
            noise: self.noise.unwrap_or(defaults.noise),
            power_freq: self.power_freq.unwrap_or(defaults.power_freq),
            power_amp: self.power_amp.unwrap_or(defaults.power_amp),
        }
    }

    fn signal_kind(&self) -> SignalKind {
        match self.signal {
            SignalChoice::Happy => SignalKind::Happy,
            SignalChoice::Neutral => SignalKind::Neutral,
            SignalChoice::Sad => SignalKind::Sad,
            SignalChoice::Custom => SignalKind::Custom(self.custom_params()),
        }
    }

    /// Settings file (or defaults) with CLI overrides applied
    fn settings(&self) -> Result<AnalyzerSettings> {
        let mut settings = match &self.config {
            Some(path) => AnalyzerSettings::load(path)
                .with_context(|| format!("Failed to load settings from {:?}", path))?,
            None => AnalyzerSettings::default(),
        };

        if let Some(duration) = self.duration {
            settings.duration = duration;
        }
        if let Some(sample_rate) = self.sample_rate {
            settings.sample_rate = sample_rate;
        }
        if self.no_bandpass {
            settings.filters.bandpass = None;
        }
        if self.no_notch {
            settings.filters.notch = None;
        }
        if self.no_artifacts {
            settings.filters.artifact = None;
        }
        if let Some(level) = &self.log_level {
            settings.log.level = level.clone();
        }
        Ok(settings)
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let settings = args.settings()?;
    let _log_guard = logging_setup::init(&settings.log)?;

    if args.has_custom_weights() && args.signal != SignalChoice::Custom {
        warn!("Band weights only apply to --signal custom; ignoring them");
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let generator = SignalGenerator::new(settings.duration, settings.sample_rate)
        .context("Invalid signal settings")?;
    let signal = generator
        .generate(&args.signal_kind(), &mut rng)
        .context("Failed to generate signal")?;
    info!(
        "Generated '{}': {} samples at {} Hz",
        signal.label(),
        signal.len(),
        signal.sample_rate()
    );

    let report = Pipeline::new(settings.filters)
        .analyze(&signal)
        .context("Analysis failed")?;

    if args.json {
        let summary = output::ReportSummary::from(&report);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", output::render_text(&report));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    run(&args)
}
