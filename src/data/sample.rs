//! Synthetic observation tables in the simulator's output schema.
//!
//! Values come from closed-form queueing results (M/M/1/K throughput scaled by
//! per-method network factors, series M/M/1 delay) with multiplicative
//! Gaussian noise. The generator is seeded, so a config always yields the same
//! table. It is a fixture source, not a simulator.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Metric, NetworkType, Observation, ObservationTable};
use crate::error::AppError;

pub const DEFAULT_SEED: u64 = 42;

/// Bits per megabit, for converting packet rates to Mbit/s.
const BITS_PER_MBIT: f64 = 1.0e6;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub seed: u64,
    /// Relative standard deviation of the multiplicative noise.
    pub noise: f64,
    pub lambda_start: f64,
    pub lambda_end: f64,
    pub lambda_step: f64,
    /// Per-node service rate μ (packets/s).
    pub service_rate: f64,
    /// M/M/1/K capacity K.
    pub buffer_size: u32,
    pub packet_size_bytes: u32,
    /// Ad-Hoc nodes traversed in series.
    pub num_nodes: u32,
    pub num_groups: u32,
    pub nodes_per_group: u32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            noise: 0.02,
            lambda_start: 0.1,
            lambda_end: 2.0,
            lambda_step: 0.1,
            service_rate: 5.0,
            buffer_size: 3,
            packet_size_bytes: 1024,
            num_nodes: 9,
            num_groups: 3,
            nodes_per_group: 3,
        }
    }
}

impl SampleConfig {
    fn validate(&self) -> Result<(), AppError> {
        if !(self.noise.is_finite() && self.noise >= 0.0) {
            return Err(AppError::settings("Sample noise must be finite and >= 0."));
        }
        if !(self.lambda_start.is_finite() && self.lambda_end.is_finite() && self.lambda_start >= 0.0) {
            return Err(AppError::settings("Sample lambda range must be finite and >= 0."));
        }
        if self.lambda_end < self.lambda_start {
            return Err(AppError::settings("Sample lambda end must be >= lambda start."));
        }
        if !(self.lambda_step.is_finite() && self.lambda_step > 0.0) {
            return Err(AppError::settings("Sample lambda step must be > 0."));
        }
        if !(self.service_rate.is_finite() && self.service_rate > 0.0) {
            return Err(AppError::settings("Service rate must be > 0."));
        }
        if self.num_nodes == 0 || self.num_groups == 0 || self.nodes_per_group == 0 {
            return Err(AppError::settings("Node and group counts must be > 0."));
        }
        Ok(())
    }

    /// Load grid from `lambda_start` to `lambda_end` inclusive.
    pub fn lambdas(&self) -> Vec<f64> {
        let span = self.lambda_end - self.lambda_start;
        let steps = (span / self.lambda_step + 1e-9).floor() as usize;
        (0..=steps)
            .map(|i| round6(self.lambda_start + i as f64 * self.lambda_step))
            .collect()
    }

    fn mbit_per_packet(&self) -> f64 {
        self.packet_size_bytes as f64 * 8.0 / BITS_PER_MBIT
    }
}

/// Generate one row per (network, lambda), Ad-Hoc rows first.
pub fn generate_table(config: &SampleConfig) -> Result<ObservationTable, AppError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::settings(format!("Noise distribution error: {e}")))?;

    let lambdas = config.lambdas();
    let mut rows = Vec::with_capacity(lambdas.len() * NetworkType::ALL.len());

    for network in NetworkType::ALL {
        for &lambda in &lambdas {
            let mut values = [0.0; 5];
            for (slot, metric) in values.iter_mut().zip(Metric::ALL) {
                let exact = model_value(config, network, metric, lambda);
                let jitter = 1.0 + config.noise * normal.sample(&mut rng);
                *slot = if exact.is_finite() { (exact * jitter).max(0.0) } else { exact };
            }
            rows.push(Observation::new(network.label(), lambda, values));
        }
    }

    Ok(ObservationTable::new(rows))
}

/// Noise-free value of `metric` for `network` at offered load `lambda`.
///
/// Throughputs are in Mbit/s, delays in seconds.
pub fn model_value(config: &SampleConfig, network: NetworkType, metric: Metric, lambda: f64) -> f64 {
    let mu = config.service_rate;
    let k = config.buffer_size;
    let nodes = match network {
        NetworkType::AdHoc => config.num_nodes,
        NetworkType::Group => config.num_groups * config.nodes_per_group,
    } as f64;

    let base = mm1k_throughput(lambda, mu, k) * config.mbit_per_packet();
    match metric {
        Metric::MeanValueAnalysis => base * nodes / (nodes + 1.0),
        Metric::GlobalBalance => base,
        Metric::GordonNewell => base * (1.0 - (-nodes / 3.0).exp()),
        Metric::Buzen => base * nodes / (nodes + 2.0),
        Metric::MeanValueDelay => match network {
            NetworkType::AdHoc => series_mm1_delay(lambda, mu, config.num_nodes),
            NetworkType::Group => grouped_delay(lambda, mu, config.num_groups, config.nodes_per_group),
        },
    }
}

/// Carried load of an M/M/1/K queue: λ·(1 − p_K). `k == 0` means an
/// unbounded buffer.
pub fn mm1k_throughput(lambda: f64, mu: f64, k: u32) -> f64 {
    if lambda <= 0.0 || mu <= 0.0 {
        return 0.0;
    }
    let rho = lambda / mu;
    if k == 0 {
        return if rho < 1.0 { lambda } else { mu };
    }
    let p0 = if (rho - 1.0).abs() < 1e-9 {
        1.0 / (k as f64 + 1.0)
    } else {
        (1.0 - rho) / (1.0 - rho.powi(k as i32 + 1))
    };
    lambda * (1.0 - p0 * rho.powi(k as i32))
}

/// Sojourn time through `nodes` M/M/1 stations in series; infinite when saturated.
pub fn series_mm1_delay(lambda: f64, mu: f64, nodes: u32) -> f64 {
    if lambda < 0.0 || mu <= 0.0 || nodes == 0 {
        return 0.0;
    }
    if lambda >= mu {
        return f64::INFINITY;
    }
    nodes as f64 / (mu - lambda)
}

/// Delay of a two-level network: load is split across groups, each group is a
/// series of M/M/1 nodes, and traffic crosses `groups - 1` inter-group links
/// served at the group's effective rate.
pub fn grouped_delay(lambda: f64, mu: f64, groups: u32, nodes_per_group: u32) -> f64 {
    if lambda < 0.0 || mu <= 0.0 || groups == 0 || nodes_per_group == 0 {
        return 0.0;
    }
    let per_group = lambda / groups as f64;
    let in_group = series_mm1_delay(per_group, mu, nodes_per_group);
    if !in_group.is_finite() {
        return f64::INFINITY;
    }
    let effective_rate = 1.0 / in_group;
    if per_group >= effective_rate {
        return f64::INFINITY;
    }
    in_group + (groups - 1) as f64 / (effective_rate - per_group)
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}
