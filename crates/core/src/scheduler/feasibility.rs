//! Rate-monotonic feasibility helpers
//!
//! **Liu & Layland (1973)**: under rate-monotonic priorities a set of `n`
//! independent periodic tasks is guaranteed schedulable on one CPU when
//!
//! `U = sum(C_i / T_i) <= n (2^(1/n) - 1)`
//!
//! The bound tightens from 1.0 (`n = 1`) towards `ln 2` as `n` grows. A
//! utilization between the bound and 1.0 is inconclusive.
//!
//! Here `C_i / T_i` comes from measured utilizations rather than declared
//! worst-case execution times.

/// Liu & Layland utilization bound for `n` tasks (`0.0` for an empty set)
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    nf * (libm::pow(2.0, 1.0 / nf) - 1.0)
}

/// Outcome of the utilization test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    /// Utilization within the Liu & Layland bound
    Guaranteed,
    /// Above the bound but not above 1.0; needs response-time analysis
    Inconclusive,
    /// Utilization above 1.0
    Overloaded,
}

/// Classify a total utilization for a set of `n` tasks
pub fn classify_utilization(total_utilization: f64, n: usize) -> Feasibility {
    if total_utilization > 1.0 {
        Feasibility::Overloaded
    } else if total_utilization <= liu_layland_bound(n) {
        Feasibility::Guaranteed
    } else {
        Feasibility::Inconclusive
    }
}
