//! Beta-Binomial posterior lower bound
//!
//! With a Beta(alpha, beta) prior and a Binomial likelihood, `n` samples with
//! `s` successes give a Beta(alpha + s, beta + n - s) posterior. Instead of
//! inverting the Beta CDF we take a normal approximation of the posterior
//! and report its one-sided 5th percentile: with ~95% credibility the true
//! reward rate is at or above the returned value.

/// z-score of the one-sided 5th percentile of the standard normal
pub const LOWER_BOUND_Z: f64 = -1.645;

/// Default uniform prior
pub const PRIOR_ALPHA: f64 = 1.0;
pub const PRIOR_BETA: f64 = 1.0;

/// Lower bound with the uniform Beta(1, 1) prior
pub fn lower_bound(samples: u64, successes: u64) -> f64 {
    lower_bound_with_prior(samples, successes, PRIOR_ALPHA, PRIOR_BETA)
}

/// Lower bound with an explicit Beta(alpha, beta) prior
///
/// Zero samples count as one so an arm without evidence is never reported
/// with the confidence of a settled one. Successes are capped at the sample
/// count, which keeps the posterior well formed when a success read races
/// ahead of its sample.
pub fn lower_bound_with_prior(samples: u64, successes: u64, alpha: f64, beta: f64) -> f64 {
    let n = samples.max(1) as f64;
    let s = successes.min(samples.max(1)) as f64;

    let a = alpha + s;
    let b = beta + n - s;
    let total = a + b;

    let mean = a / total;
    let variance = (a * b) / (total.powi(2) * (total + 1.0));

    mean + LOWER_BOUND_Z * variance.sqrt()
}
