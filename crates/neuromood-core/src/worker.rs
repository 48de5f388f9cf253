//! Background analysis worker
//!
//! Runs [`Pipeline::analyze`] on a dedicated thread so a front end can stay
//! responsive. Jobs and results travel over bounded channels; the pipeline
//! itself stays synchronous.

use crate::error::Result;
use crate::pipeline::{AnalysisReport, Pipeline};
use crate::signal::Signal;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum queued jobs (and undelivered results)
pub const QUEUE_CAPACITY: usize = 8;

/// Owns the analysis thread and its channels
pub struct AnalysisWorker {
    job_sender: Option<Sender<Signal>>,
    result_receiver: Receiver<Result<AnalysisReport>>,
    handle: Option<JoinHandle<()>>,
}

impl AnalysisWorker {
    /// Start the worker thread
    pub fn spawn(pipeline: Pipeline) -> Result<Self> {
        let (job_tx, job_rx) = bounded::<Signal>(QUEUE_CAPACITY);
        let (result_tx, result_rx) = bounded(QUEUE_CAPACITY);

        let handle = thread::Builder::new()
            .name("neuromood-analysis".to_string())
            .spawn(move || {
                for signal in job_rx.iter() {
                    let result = pipeline.analyze(&signal);
                    if let Err(e) = &result {
                        warn!("Analysis of '{}' failed: {}", signal.label(), e);
                    }
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
                debug!("Analysis worker stopped");
            })?;

        Ok(Self {
            job_sender: Some(job_tx),
            result_receiver: result_rx,
            handle: Some(handle),
        })
    }

    /// Queue a signal for analysis. Returns `false` if the queue is full.
    pub fn submit(&self, signal: Signal) -> bool {
        let Some(sender) = &self.job_sender else {
            return false;
        };
        match sender.try_send(signal) {
            Ok(()) => true,
            Err(TrySendError::Full(signal)) => {
                warn!("Analysis queue full, dropping '{}'", signal.label());
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Next finished result, if any
    pub fn try_receive(&self) -> Option<Result<AnalysisReport>> {
        self.result_receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next result
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Result<AnalysisReport>> {
        match self.result_receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stop accepting jobs and wait for the thread to finish queued work
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.job_sender.take();
        if let Some(handle) = self.handle.take() {
            // Drain results so the worker never blocks on a full channel
            while !handle.is_finished() {
                let _ = self.result_receiver.recv_timeout(Duration::from_millis(10));
            }
            if handle.join().is_err() {
                warn!("Analysis worker panicked");
            }
        }
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
