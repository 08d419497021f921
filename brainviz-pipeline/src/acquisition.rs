//! Simulated acquisition device
//!
//! Stands in for the physical headset: a background thread synthesizes
//! alpha-band activity whose focus wanders slowly over the scalp, and
//! publishes each complete sample by whole-value replacement.

use brainviz_core::{AcquisitionStream, ElectrodeLayout, Error, Published, Result, Sample, Vector3f};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Parameters of the simulated headset
#[derive(Debug, Clone)]
pub struct HeadsetConfig {
    /// Samples per second
    pub sample_rate: f64,
    /// Peak amplitude of the oscillation under the focus, in microvolts
    pub amplitude: f64,
    /// Peak amplitude of uniform noise added to every channel
    pub noise: f64,
    /// Oscillation frequency in Hz
    pub rhythm_hz: f64,
    /// Seconds for the activity focus to circle the head once
    pub focus_period: f64,
    /// Seed of the noise generator
    pub seed: u64,
}

impl Default for HeadsetConfig {
    fn default() -> Self {
        Self {
            sample_rate: 128.0,
            amplitude: 40.0,
            noise: 2.0,
            rhythm_hz: 10.0,
            focus_period: 30.0,
            seed: 0x5eed,
        }
    }
}

/// Deterministic sample synthesizer, one sample per call
pub struct SignalGenerator {
    directions: Vec<Vector3f>,
    phases: Vec<f64>,
    config: HeadsetConfig,
    rng: StdRng,
    sequence: u64,
}

impl SignalGenerator {
    pub fn new(layout: &ElectrodeLayout, config: HeadsetConfig) -> Self {
        let directions = layout
            .iter()
            .map(|e| e.position.coords.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::z))
            .collect();
        let phases = (0..layout.len())
            .map(|i| i as f64 * std::f64::consts::TAU / layout.len().max(1) as f64)
            .collect();
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            directions,
            phases,
            config,
            rng,
            sequence: 0,
        }
    }

    /// Direction of strongest activity at time `t` seconds
    pub fn focus_at(&self, t: f64) -> Vector3f {
        let angle = (std::f64::consts::TAU * t / self.config.focus_period) as f32;
        Vector3f::new(angle.cos() * 0.8, angle.sin() * 0.8, 0.6)
    }

    /// Produce the next sample
    pub fn next_sample(&mut self) -> Sample {
        self.sequence += 1;
        let t = self.sequence as f64 / self.config.sample_rate;
        let focus = self.focus_at(t);
        let carrier = std::f64::consts::TAU * self.config.rhythm_hz * t;

        let values = self
            .directions
            .iter()
            .zip(&self.phases)
            .map(|(direction, phase)| {
                // 1 under the focus, 0 on the opposite side of the head
                let proximity = 0.5 * (1.0 + direction.dot(&focus) as f64);
                let signal = self.config.amplitude * proximity * proximity * (carrier + phase).sin();
                let noise = if self.config.noise > 0.0 {
                    self.rng.gen_range(-self.config.noise..self.config.noise)
                } else {
                    0.0
                };
                signal + noise
            })
            .collect();

        Sample::new(self.sequence, values)
    }
}

/// Headset simulator running on its own thread
pub struct SimulatedHeadset {
    layout: Arc<ElectrodeLayout>,
    current: Arc<Published<Sample>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SimulatedHeadset {
    /// Start producing samples at `config.sample_rate`
    pub fn start(layout: ElectrodeLayout, config: HeadsetConfig) -> Result<Self> {
        if layout.is_empty() {
            return Err(Error::Acquisition("electrode layout is empty".to_string()));
        }
        if !(config.sample_rate.is_finite() && config.sample_rate > 0.0) {
            return Err(Error::Acquisition(format!(
                "invalid sample rate {}",
                config.sample_rate
            )));
        }

        let layout = Arc::new(layout);
        let current = Arc::new(Published::new(Sample::zeros(layout.len())));
        let running = Arc::new(AtomicBool::new(true));
        let interval = Duration::from_secs_f64(1.0 / config.sample_rate);
        let mut generator = SignalGenerator::new(&layout, config);

        let worker = {
            let current = Arc::clone(&current);
            let running = Arc::clone(&running);
            std::thread::Builder::new()
                .name("headset".to_string())
                .spawn(move || {
                    let mut deadline = Instant::now();
                    while running.load(Ordering::Relaxed) {
                        current.publish(generator.next_sample());
                        deadline += interval;
                        let now = Instant::now();
                        if deadline > now {
                            std::thread::sleep(deadline - now);
                        } else {
                            // Fell behind; resynchronize instead of bursting
                            deadline = now;
                        }
                    }
                    log::debug!("Headset thread stopped");
                })?
        };

        log::info!(
            "Simulated headset started: {} channels @ {} Hz",
            layout.len(),
            1.0 / interval.as_secs_f64()
        );

        Ok(Self {
            layout,
            current,
            running,
            worker: Some(worker),
        })
    }

    /// Stop the producer thread and wait for it to exit
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Headset thread panicked");
            }
        }
    }
}

impl AcquisitionStream for SimulatedHeadset {
    fn current_sample(&self) -> Arc<Sample> {
        self.current.load()
    }

    fn electrode_layout(&self) -> Arc<ElectrodeLayout> {
        Arc::clone(&self.layout)
    }
}

impl Drop for SimulatedHeadset {
    fn drop(&mut self) {
        self.stop();
    }
}
