//! # Simulated hardware for tests and the demo rig.
//!
//! Scriptable in-memory implementations of every capability trait in
//! [`hw`](crate::hw). Each device takes a queue of scripted readings and
//! falls back to an idle value when the script runs out, so an agent loop can
//! keep sampling indefinitely.
//!
//! [`ReleaseProbe`] counts device releases: every sim device that was given a
//! probe increments it exactly once in `Drop`. Shutdown tests use this to
//! assert that exclusively-owned handles are released when agents unwind.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{
    AudioCapture, AudioOutput, DigitalInput, Frame, HwError, MotionDetect, PwmOutput, Rangefinder,
    VideoCapture,
};

/// Shared counter of device releases.
///
/// Clone one probe into each sim device; after shutdown,
/// [`released`](ReleaseProbe::released) equals the number of devices dropped.
#[derive(Clone, Default)]
pub struct ReleaseProbe {
    count: Arc<AtomicUsize>,
}

impl ReleaseProbe {
    /// Creates a probe with a zero count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of devices released so far.
    pub fn released(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    fn mark(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

macro_rules! impl_probe_drop {
    ($ty:ident) => {
        impl Drop for $ty {
            fn drop(&mut self) {
                if let Some(probe) = &self.probe {
                    probe.mark();
                }
            }
        }
    };
}

/// Scripted digital input. Pops one scripted level per read, then repeats
/// the idle level.
pub struct SimDigitalInput {
    script: VecDeque<bool>,
    idle: bool,
    probe: Option<ReleaseProbe>,
}

impl SimDigitalInput {
    /// Creates an input that always reads `idle`.
    pub fn new(idle: bool) -> Self {
        Self {
            script: VecDeque::new(),
            idle,
            probe: None,
        }
    }

    /// Appends scripted levels, consumed one per read.
    pub fn with_script(mut self, levels: impl IntoIterator<Item = bool>) -> Self {
        self.script.extend(levels);
        self
    }

    /// Attaches a release probe.
    pub fn with_probe(mut self, probe: ReleaseProbe) -> Self {
        self.probe = Some(probe);
        self
    }
}

#[async_trait]
impl DigitalInput for SimDigitalInput {
    async fn read(&mut self) -> Result<bool, HwError> {
        Ok(self.script.pop_front().unwrap_or(self.idle))
    }
}

impl_probe_drop!(SimDigitalInput);

/// Recording PWM output. Stores every duty cycle it was asked to drive.
pub struct SimPwmOutput {
    duties: Arc<Mutex<Vec<f64>>>,
    probe: Option<ReleaseProbe>,
}

impl SimPwmOutput {
    pub fn new() -> Self {
        Self {
            duties: Arc::new(Mutex::new(Vec::new())),
            probe: None,
        }
    }

    /// Attaches a release probe.
    pub fn with_probe(mut self, probe: ReleaseProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Shared handle to the recorded duty cycles, valid after the device
    /// itself has been moved into an agent.
    pub fn duties(&self) -> Arc<Mutex<Vec<f64>>> {
        Arc::clone(&self.duties)
    }
}

impl Default for SimPwmOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PwmOutput for SimPwmOutput {
    async fn set_duty_cycle(&mut self, percent: f64) -> Result<(), HwError> {
        self.duties.lock().unwrap().push(percent);
        Ok(())
    }
}

impl_probe_drop!(SimPwmOutput);

/// Recording audio output. Stores the names of played sounds.
pub struct SimAudioOutput {
    played: Arc<Mutex<Vec<String>>>,
    probe: Option<ReleaseProbe>,
}

impl SimAudioOutput {
    pub fn new() -> Self {
        Self {
            played: Arc::new(Mutex::new(Vec::new())),
            probe: None,
        }
    }

    /// Attaches a release probe.
    pub fn with_probe(mut self, probe: ReleaseProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Shared handle to the list of played sound names.
    pub fn played(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.played)
    }
}

impl Default for SimAudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioOutput for SimAudioOutput {
    async fn play(&mut self, sound: &str) -> Result<(), HwError> {
        self.played.lock().unwrap().push(sound.to_string());
        Ok(())
    }
}

impl_probe_drop!(SimAudioOutput);

/// Scripted audio capture. Pops one chunk per read, then yields silence.
pub struct SimAudioCapture {
    script: VecDeque<Vec<i16>>,
    silence_len: usize,
    probe: Option<ReleaseProbe>,
}

impl SimAudioCapture {
    /// Creates a capture stream that yields silent chunks of `silence_len`
    /// samples once the script is exhausted.
    pub fn new(silence_len: usize) -> Self {
        Self {
            script: VecDeque::new(),
            silence_len,
            probe: None,
        }
    }

    /// Appends scripted chunks, consumed one per read.
    pub fn with_chunks(mut self, chunks: impl IntoIterator<Item = Vec<i16>>) -> Self {
        self.script.extend(chunks);
        self
    }

    /// Attaches a release probe.
    pub fn with_probe(mut self, probe: ReleaseProbe) -> Self {
        self.probe = Some(probe);
        self
    }
}

#[async_trait]
impl AudioCapture for SimAudioCapture {
    async fn read_chunk(&mut self) -> Result<Vec<i16>, HwError> {
        Ok(self
            .script
            .pop_front()
            .unwrap_or_else(|| vec![0; self.silence_len]))
    }
}

impl_probe_drop!(SimAudioCapture);

/// Scripted rangefinder. Pops one reading per measure, then repeats `idle`.
pub struct SimRangefinder {
    script: VecDeque<f64>,
    idle: f64,
    probe: Option<ReleaseProbe>,
}

impl SimRangefinder {
    /// Creates a rangefinder that reads `idle` centimeters when the script
    /// is exhausted.
    pub fn new(idle: f64) -> Self {
        Self {
            script: VecDeque::new(),
            idle,
            probe: None,
        }
    }

    /// Appends scripted readings, consumed one per measure.
    pub fn with_readings(mut self, readings: impl IntoIterator<Item = f64>) -> Self {
        self.script.extend(readings);
        self
    }

    /// Attaches a release probe.
    pub fn with_probe(mut self, probe: ReleaseProbe) -> Self {
        self.probe = Some(probe);
        self
    }
}

#[async_trait]
impl Rangefinder for SimRangefinder {
    async fn measure_cm(&mut self) -> Result<f64, HwError> {
        Ok(self.script.pop_front().unwrap_or(self.idle))
    }
}

impl_probe_drop!(SimRangefinder);

/// Scripted video capture. Pops one result per read (errors can be
/// scripted to exercise read-failure tolerance), then yields empty frames.
pub struct SimVideoCapture {
    script: VecDeque<Result<Frame, HwError>>,
    probe: Option<ReleaseProbe>,
}

impl SimVideoCapture {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            probe: None,
        }
    }

    /// Appends scripted capture results, consumed one per read.
    pub fn with_results(mut self, results: impl IntoIterator<Item = Result<Frame, HwError>>) -> Self {
        self.script.extend(results);
        self
    }

    /// Attaches a release probe.
    pub fn with_probe(mut self, probe: ReleaseProbe) -> Self {
        self.probe = Some(probe);
        self
    }
}

impl Default for SimVideoCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoCapture for SimVideoCapture {
    async fn read_frame(&mut self) -> Result<Frame, HwError> {
        self.script.pop_front().unwrap_or_else(|| Ok(Frame::default()))
    }
}

impl_probe_drop!(SimVideoCapture);

/// Scripted motion heuristic. Ignores frame contents; pops one verdict per
/// frame, then repeats `idle`.
pub struct SimMotionDetect {
    script: VecDeque<bool>,
    idle: bool,
}

impl SimMotionDetect {
    /// Creates a heuristic that reports `idle` once the script is exhausted.
    pub fn new(idle: bool) -> Self {
        Self {
            script: VecDeque::new(),
            idle,
        }
    }

    /// Appends scripted verdicts, consumed one per frame.
    pub fn with_verdicts(mut self, verdicts: impl IntoIterator<Item = bool>) -> Self {
        self.script.extend(verdicts);
        self
    }
}

impl MotionDetect for SimMotionDetect {
    fn detect(&mut self, _frame: &Frame) -> bool {
        self.script.pop_front().unwrap_or(self.idle)
    }
}
