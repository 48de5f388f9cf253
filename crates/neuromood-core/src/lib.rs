//! NeuroMood Core - synthetic EEG signal pipeline
//!
//! This crate contains the signal path of NeuroMood:
//! - Waveform synthesis of band rhythms, noise and mains interference
//! - Zero-phase band-pass and notch filtering plus artifact correction
//! - FFT band-power extraction (delta, theta, alpha, beta, gamma)
//! - Heuristic emotion scoring with a temperature softmax
//!
//! Data flows one way, each stage returning a new value:
//! synthesis -> filtering -> spectral analysis -> classification.

#![warn(missing_docs)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod signal;
pub mod spectrum;
pub mod synthesis;
pub mod worker;

// Signal model & synthesis
pub use signal::{check_samples, sample_count, Emotion, Signal, DURATION, SAMPLE_RATE};
pub use synthesis::{CustomSignalParams, SignalGenerator, SignalKind};

// Filtering
pub use filter::{
    bandpass_filter, notch_filter, remove_artifacts, ArtifactConfig, ArtifactCorrection,
    BandpassConfig, FilterConfig, FilterPipeline, FilteredSamples, NotchConfig,
};

// Analysis & classification
pub use classifier::{EmotionClassifier, EmotionEstimate, EmotionProbabilities, EmotionScores};
pub use spectrum::{band_powers, magnitude_spectrum, BandPowers, FrequencyBand, Spectrum};

// Orchestration
pub use pipeline::{AnalysisReport, Pipeline, ProcessedSignal};
pub use worker::AnalysisWorker;

// Settings & errors
pub use config::AnalyzerSettings;
pub use error::{CoreError, Result};
pub use logging::LogConfig;
