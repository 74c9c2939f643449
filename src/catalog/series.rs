//! Built-in series with closed-form limits.
//!
//! Every series validates its argument at construction time, so an
//! out-of-domain binding fails the configuration before any term is
//! computed. Partial sums are indexed from term 0: `partial_sum(n)` is the
//! sum of terms `0..=n` in the series' natural ordering.

use std::sync::Arc;

use crate::domain::{Assignment, ParamValue, ReadySeries, SeriesFactory, TrialError};

fn require_x(binding: &Assignment) -> Result<f64, TrialError> {
    binding
        .get("x")
        .and_then(ParamValue::as_f64)
        .ok_or_else(|| TrialError::domain("missing numeric argument 'x'"))
}

/// Maclaurin series of `exp(x)`: terms `x^k / k!`.
pub struct ExpSeries {
    x: f64,
}

impl ExpSeries {
    pub fn new(x: f64) -> Result<Self, TrialError> {
        if !x.is_finite() {
            return Err(TrialError::domain("x is not finite"));
        }
        Ok(Self { x })
    }
}

impl ReadySeries for ExpSeries {
    fn partial_sum(&self, n: u32) -> Result<f64, TrialError> {
        let mut term = 1.0;
        let mut sum = 1.0;
        for k in 1..=n {
            term *= self.x / k as f64;
            sum += term;
        }
        Ok(sum)
    }

    fn limit(&self) -> Result<f64, TrialError> {
        Ok(self.x.exp())
    }
}

/// Geometric series without its constant term: `Σ_{k≥1} x^k = x/(1-x)`.
pub struct GeometricSeries {
    x: f64,
}

impl GeometricSeries {
    pub fn new(x: f64) -> Result<Self, TrialError> {
        if !(x.is_finite() && x.abs() < 1.0) {
            return Err(TrialError::domain("|x| must be < 1"));
        }
        Ok(Self { x })
    }
}

impl ReadySeries for GeometricSeries {
    fn partial_sum(&self, n: u32) -> Result<f64, TrialError> {
        let mut term = self.x;
        let mut sum = self.x;
        for _ in 1..=n {
            term *= self.x;
            sum += term;
        }
        Ok(sum)
    }

    fn limit(&self) -> Result<f64, TrialError> {
        Ok(self.x / (1.0 - self.x))
    }
}

/// Mercator series: `Σ_{k≥1} (-1)^{k+1} x^k / k = ln(1+x)`.
pub struct Ln1pxSeries {
    x: f64,
}

impl Ln1pxSeries {
    pub fn new(x: f64) -> Result<Self, TrialError> {
        if !(x.is_finite() && x.abs() < 1.0) {
            return Err(TrialError::domain("|x| must be < 1"));
        }
        Ok(Self { x })
    }
}

impl ReadySeries for Ln1pxSeries {
    fn partial_sum(&self, n: u32) -> Result<f64, TrialError> {
        let mut power = self.x;
        let mut sum = self.x;
        for k in 1..=n {
            power *= -self.x;
            sum += power / (k + 1) as f64;
        }
        Ok(sum)
    }

    fn limit(&self) -> Result<f64, TrialError> {
        Ok(self.x.ln_1p())
    }
}

/// Leibniz series: `Σ (-1)^k / (2k+1) = π/4`. No arguments.
pub struct LeibnizPi4Series;

impl ReadySeries for LeibnizPi4Series {
    fn partial_sum(&self, n: u32) -> Result<f64, TrialError> {
        let mut sum = 0.0;
        for k in 0..=n {
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            sum += sign / (2 * k + 1) as f64;
        }
        Ok(sum)
    }

    fn limit(&self) -> Result<f64, TrialError> {
        Ok(std::f64::consts::FRAC_PI_4)
    }
}

/// Basel series: `Σ_{k≥1} 1/k² = π²/6`. No arguments.
pub struct BaselSeries;

impl ReadySeries for BaselSeries {
    fn partial_sum(&self, n: u32) -> Result<f64, TrialError> {
        let mut sum = 0.0;
        for k in 0..=n {
            let k1 = (k + 1) as f64;
            sum += 1.0 / (k1 * k1);
        }
        Ok(sum)
    }

    fn limit(&self) -> Result<f64, TrialError> {
        Ok(std::f64::consts::PI * std::f64::consts::PI / 6.0)
    }
}

/// Array-backed series loaded from stored term data (e.g. a CSV row).
///
/// There is no closed form here; the limit is taken to be the final stored
/// partial sum, so deviations measure distance to the best available
/// estimate.
pub struct ArraySeries {
    partial_sums: Vec<f64>,
}

impl ArraySeries {
    pub fn new(terms: Vec<f64>) -> Result<Self, TrialError> {
        if terms.is_empty() {
            return Err(TrialError::domain("array series needs at least one term"));
        }
        if terms.iter().any(|t| !t.is_finite()) {
            return Err(TrialError::domain("array series terms must be finite"));
        }
        let mut partial_sums = Vec::with_capacity(terms.len());
        let mut sum = 0.0;
        for term in terms {
            sum += term;
            partial_sums.push(sum);
        }
        Ok(Self { partial_sums })
    }
}

impl ReadySeries for ArraySeries {
    fn partial_sum(&self, n: u32) -> Result<f64, TrialError> {
        self.partial_sums
            .get(n as usize)
            .copied()
            .ok_or_else(|| {
                TrialError::domain(format!(
                    "term {n} beyond stored data ({} terms)",
                    self.partial_sums.len()
                ))
            })
    }

    fn limit(&self) -> Result<f64, TrialError> {
        // Non-empty by construction.
        Ok(*self.partial_sums.last().unwrap_or(&0.0))
    }
}

pub struct ExpFactory;

impl SeriesFactory for ExpFactory {
    fn build(&self, binding: &Assignment) -> Result<Arc<dyn ReadySeries>, TrialError> {
        Ok(Arc::new(ExpSeries::new(require_x(binding)?)?))
    }
}

pub struct GeometricFactory;

impl SeriesFactory for GeometricFactory {
    fn build(&self, binding: &Assignment) -> Result<Arc<dyn ReadySeries>, TrialError> {
        Ok(Arc::new(GeometricSeries::new(require_x(binding)?)?))
    }
}

pub struct Ln1pxFactory;

impl SeriesFactory for Ln1pxFactory {
    fn build(&self, binding: &Assignment) -> Result<Arc<dyn ReadySeries>, TrialError> {
        Ok(Arc::new(Ln1pxSeries::new(require_x(binding)?)?))
    }
}

pub struct LeibnizPi4Factory;

impl SeriesFactory for LeibnizPi4Factory {
    fn build(&self, _binding: &Assignment) -> Result<Arc<dyn ReadySeries>, TrialError> {
        Ok(Arc::new(LeibnizPi4Series))
    }
}

pub struct BaselFactory;

impl SeriesFactory for BaselFactory {
    fn build(&self, _binding: &Assignment) -> Result<Arc<dyn ReadySeries>, TrialError> {
        Ok(Arc::new(BaselSeries))
    }
}

/// Factory around one pre-loaded `ArraySeries`; the binding is ignored.
pub struct ArraySeriesFactory {
    series: Arc<ArraySeries>,
}

impl ArraySeriesFactory {
    pub fn new(terms: Vec<f64>) -> Result<Self, TrialError> {
        Ok(Self {
            series: Arc::new(ArraySeries::new(terms)?),
        })
    }
}

impl SeriesFactory for ArraySeriesFactory {
    fn build(&self, _binding: &Assignment) -> Result<Arc<dyn ReadySeries>, TrialError> {
        Ok(Arc::clone(&self.series) as Arc<dyn ReadySeries>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometric_partial_sums_approach_the_limit() {
        let series = GeometricSeries::new(0.5).unwrap();
        assert!((series.limit().unwrap() - 1.0).abs() < 1e-15);
        // 0.5 + 0.25 + 0.125
        assert!((series.partial_sum(2).unwrap() - 0.875).abs() < 1e-15);
        assert!((series.partial_sum(40).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn geometric_rejects_out_of_domain_arguments() {
        assert!(GeometricSeries::new(1.0).is_err());
        assert!(GeometricSeries::new(-1.5).is_err());
        assert!(GeometricSeries::new(f64::INFINITY).is_err());
    }

    #[test]
    fn exp_partial_sums_converge_for_negative_arguments() {
        let series = ExpSeries::new(-1.0).unwrap();
        let limit = series.limit().unwrap();
        assert!((limit - (-1.0_f64).exp()).abs() < 1e-15);
        assert!((series.partial_sum(20).unwrap() - limit).abs() < 1e-12);
    }

    #[test]
    fn ln1px_matches_the_logarithm() {
        let series = Ln1pxSeries::new(0.5).unwrap();
        let limit = series.limit().unwrap();
        assert!((limit - 1.5_f64.ln()).abs() < 1e-15);
        assert!((series.partial_sum(50).unwrap() - limit).abs() < 1e-12);
    }

    #[test]
    fn argument_free_series_have_fixed_limits() {
        let leibniz = LeibnizPi4Series;
        assert!((leibniz.limit().unwrap() - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
        // Alternating series error bound: within 1/(2n+3) of the limit.
        let err = (leibniz.partial_sum(100).unwrap() - leibniz.limit().unwrap()).abs();
        assert!(err < 1.0 / 203.0);

        let basel = BaselSeries;
        assert!((basel.partial_sum(0).unwrap() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn array_series_uses_prefix_sums_and_final_value_as_limit() {
        let series = ArraySeries::new(vec![1.0, 0.5, 0.25]).unwrap();
        assert!((series.partial_sum(0).unwrap() - 1.0).abs() < 1e-15);
        assert!((series.partial_sum(2).unwrap() - 1.75).abs() < 1e-15);
        assert!((series.limit().unwrap() - 1.75).abs() < 1e-15);

        let err = series.partial_sum(3).unwrap_err();
        assert!(err.to_string().starts_with("domain error"));
    }

    #[test]
    fn factories_validate_their_bindings() {
        let binding = Assignment::from_entries(vec![(
            "x".to_string(),
            ParamValue::Float(2.0),
        )]);
        assert!(GeometricFactory.build(&binding).is_err());
        assert!(ExpFactory.build(&binding).is_ok());
        assert!(ExpFactory.build(&Assignment::empty()).is_err());
    }
}
