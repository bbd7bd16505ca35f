//! Synthesis engine — computes plausible readings and commits them through
//! the typed view of a reader.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ladsim_domain::error::{LadsError, SynthesisError};
use ladsim_domain::id::NodeId;
use ladsim_domain::view::{AbsorbanceReaderDevice, Shape, WELL_COUNT};

use crate::ports::AddressSpaceHost;

/// Default half-width of the perturbation interval.
pub const DEFAULT_AMPLITUDE: f64 = 0.5;

/// Source of the per-tick perturbation `p`.
pub trait PerturbationSource: Send + Sync {
    /// Draw a value in `[-amplitude, amplitude)`.
    fn draw(&self, amplitude: f64) -> f64;
}

/// Uniformly distributed perturbation from a [`StdRng`].
pub struct RandomPerturbation {
    rng: Mutex<StdRng>,
}

impl RandomPerturbation {
    /// Seed from the operating system's entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl PerturbationSource for RandomPerturbation {
    fn draw(&self, amplitude: f64) -> f64 {
        if !amplitude.is_finite() || amplitude <= 0.0 {
            return 0.0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(-amplitude..amplitude)
    }
}

/// Always returns the same perturbation, whatever the amplitude.
#[derive(Debug, Clone, Copy)]
pub struct FixedPerturbation(pub f64);

impl PerturbationSource for FixedPerturbation {
    fn draw(&self, _amplitude: f64) -> f64 {
        self.0
    }
}

/// What a generator is asked to compute for one device and tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisInput {
    pub device: NodeId,
    pub perturbation: f64,
    pub wells: usize,
}

/// One tick's worth of readings for a reader.
#[derive(Debug, Clone, PartialEq)]
pub struct Readings {
    pub temperature: f64,
    pub absorbance: Vec<f64>,
}

/// A pluggable value-generation model.
pub trait ValueGenerator: Send + Sync {
    /// Compute readings for `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`SynthesisError`] when the model cannot produce values.
    fn generate(&self, input: &SynthesisInput) -> Result<Readings, SynthesisError>;
}

/// Default model: `temperature = base + p`, well `i` reads `(i + p)²`.
#[derive(Debug, Clone, Copy)]
pub struct WellPlateModel {
    pub base_temperature: f64,
}

impl Default for WellPlateModel {
    fn default() -> Self {
        Self {
            base_temperature: 37.0,
        }
    }
}

impl ValueGenerator for WellPlateModel {
    #[allow(clippy::cast_precision_loss)]
    fn generate(&self, input: &SynthesisInput) -> Result<Readings, SynthesisError> {
        let p = input.perturbation;
        Ok(Readings {
            temperature: self.base_temperature + p,
            absorbance: (0..input.wells)
                .map(|i| {
                    let x = i as f64 + p;
                    x * x
                })
                .collect(),
        })
    }
}

/// Computes readings and commits them to a reader's sensor slots.
pub struct SynthesisEngine<H, G = WellPlateModel, P = RandomPerturbation> {
    host: H,
    generator: G,
    perturbation: P,
    amplitude: f64,
}

impl<H, G, P> SynthesisEngine<H, G, P>
where
    H: AddressSpaceHost,
    G: ValueGenerator,
    P: PerturbationSource,
{
    /// Create an engine writing through `host`.
    pub fn new(host: H, generator: G, perturbation: P) -> Self {
        Self {
            host,
            generator,
            perturbation,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }

    /// Replace the perturbation amplitude.
    ///
    /// Negative or non-finite amplitudes are ignored and the current one is
    /// kept.
    #[must_use]
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        if amplitude.is_finite() && amplitude >= 0.0 {
            self.amplitude = amplitude;
        } else {
            tracing::warn!(amplitude, kept = self.amplitude, "ignoring invalid amplitude");
        }
        self
    }

    /// Half-width of the perturbation interval.
    #[must_use]
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// The host this engine writes to.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Draw a perturbation, compute new readings and commit them.
    ///
    /// Nothing is written unless the generator's output is complete: the
    /// array must hold [`WELL_COUNT`] finite values. The temperature is
    /// committed before the absorbance array.
    ///
    /// # Errors
    ///
    /// Returns [`LadsError::Synthesis`] for generator failures and
    /// [`LadsError::Write`] (or a history error) when the host refuses a
    /// commit. A failed absorbance commit leaves the fresh temperature in
    /// place.
    #[tracing::instrument(skip(self, device), fields(device = %device.node_id()))]
    pub async fn tick(&self, device: &AbsorbanceReaderDevice) -> Result<Readings, LadsError> {
        let input = SynthesisInput {
            device: device.node_id(),
            perturbation: self.perturbation.draw(self.amplitude),
            wells: WELL_COUNT,
        };
        let readings = self.generator.generate(&input)?;
        if readings.absorbance.len() != WELL_COUNT {
            return Err(SynthesisError::WellCount {
                expected: WELL_COUNT,
                actual: readings.absorbance.len(),
            }
            .into());
        }
        if !readings.temperature.is_finite() || readings.absorbance.iter().any(|v| !v.is_finite())
        {
            return Err(SynthesisError::NonFinite.into());
        }

        let temperature = device.temperature();
        self.host
            .write_value(
                temperature.node_id(),
                temperature.data_value(readings.temperature),
            )
            .await?;
        let absorbance = device.absorbance();
        self.host
            .write_value(
                absorbance.node_id(),
                absorbance.data_value(readings.absorbance.clone()),
            )
            .await?;
        tracing::trace!(
            perturbation = input.perturbation,
            temperature = readings.temperature,
            "readings committed"
        );
        Ok(readings)
    }
}
