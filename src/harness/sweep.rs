//! Comparison sweep
//!
//! Runs the cartesian product of transport variants, error rates and link
//! delays over a base configuration. Each run is independent and
//! CPU-bound, so runs execute on the blocking pool with bounded
//! parallelism.

use crate::harness::config::{RunConfig, TransportVariant};
use crate::harness::error::{HarnessError, HarnessResult};
use crate::harness::harness::SimulationHarness;
use crate::harness::report::RunReport;
use futures::stream::{self, StreamExt};
use std::time::Duration;

pub struct ComparisonSweep {
    base: RunConfig,
    variants: Vec<TransportVariant>,
    error_rates: Vec<f64>,
    delays: Vec<Duration>,
    max_parallel: usize,
}

impl ComparisonSweep {
    /// Sweep every known variant over the base link settings.
    pub fn new(base: RunConfig) -> Self {
        Self {
            variants: TransportVariant::ALL.to_vec(),
            error_rates: vec![base.link.error_model.rate],
            delays: vec![base.link.delay],
            max_parallel: num_cpus::get(),
            base,
        }
    }

    pub fn with_variants(mut self, variants: Vec<TransportVariant>) -> Self {
        self.variants = variants;
        self
    }

    pub fn with_error_rates(mut self, error_rates: Vec<f64>) -> Self {
        self.error_rates = error_rates;
        self
    }

    pub fn with_delays(mut self, delays: Vec<Duration>) -> Self {
        self.delays = delays;
        self
    }

    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    pub fn total_combinations(&self) -> usize {
        self.variants.len() * self.error_rates.len() * self.delays.len()
    }

    /// Configurations in sweep order: variant-major, then error rate, then delay.
    pub fn generate_configs(&self) -> Vec<RunConfig> {
        let mut configs = Vec::with_capacity(self.total_combinations());
        for &variant in &self.variants {
            for &rate in &self.error_rates {
                for &delay in &self.delays {
                    configs.push(
                        self.base
                            .clone()
                            .with_variant(variant)
                            .with_error_rate(rate)
                            .with_delay(delay),
                    );
                }
            }
        }
        configs
    }

    /// Execute every configuration. Results come back in `generate_configs` order.
    pub async fn run(&self) -> Vec<HarnessResult<RunReport>> {
        let configs = self.generate_configs();
        tracing::info!(
            "Running sweep of {} configurations ({} in parallel)",
            configs.len(),
            self.max_parallel
        );

        stream::iter(configs)
            .map(|config| async move {
                tokio::task::spawn_blocking(move || {
                    SimulationHarness::new(config).and_then(SimulationHarness::run)
                })
                .await
                .unwrap_or_else(|e| Err(HarnessError::TaskFailed(e.to_string())))
            })
            .buffered(self.max_parallel)
            .collect()
            .await
    }
}
