//! Request ids and cost estimates for analysis logs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::model::Usage;

/// A process-unique id for one analysis, e.g. `an-18a2f3c4d5e6f700-0003`.
pub fn generate_request_id() -> String {
    let ts = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("an-{ts:x}-{count:04x}")
}

/// USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPricing {
    const fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    pub fn estimate_cost(&self, usage: &Usage) -> f64 {
        (f64::from(usage.input_tokens) / 1_000_000.0) * self.input_per_million
            + (f64::from(usage.output_tokens) / 1_000_000.0) * self.output_per_million
    }
}

impl Default for ModelPricing {
    /// Sonnet tier.
    fn default() -> Self {
        Self::new(3.0, 15.0)
    }
}

/// Approximate list pricing for a Claude model id.
///
/// Unknown ids fall back to [`ModelPricing::default`]. Estimates are for
/// log lines, not billing.
pub fn pricing_for_model(model: &str) -> ModelPricing {
    let name = model.rsplit('/').next().unwrap_or(model).to_lowercase();

    if name.contains("opus") {
        if name.contains("opus-4-5") || name.contains("opus-4.5") {
            ModelPricing::new(5.0, 25.0)
        } else {
            ModelPricing::new(15.0, 75.0)
        }
    } else if name.contains("haiku") {
        if name.contains("3-haiku") || name.contains("3.0-haiku") {
            ModelPricing::new(0.25, 1.25)
        } else if name.contains("3-5-haiku") || name.contains("3.5-haiku") {
            ModelPricing::new(0.80, 4.0)
        } else {
            ModelPricing::new(1.0, 5.0)
        }
    } else {
        ModelPricing::default()
    }
}

/// Estimated cost in USD of one call.
pub fn estimate_cost(model: &str, usage: &Usage) -> f64 {
    pricing_for_model(model).estimate_cost(usage)
}
