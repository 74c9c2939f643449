//! Built-in convergence-acceleration transforms.
//!
//! All transforms work from partial sums alone, so they accept any
//! `ReadySeries`. Numeric breakdown (a vanishing denominator, a non-finite
//! table entry) surfaces as a computation error for the configuration that
//! hit it; the sweep carries on.

use std::sync::Arc;

use crate::domain::{AccelFactory, Accelerator, Assignment, ReadySeries, TrialError};

fn reject_unknown_options(options: &Assignment, known: &[&str]) -> Result<(), TrialError> {
    for (name, _) in options.iter() {
        if !known.contains(&name) {
            return Err(TrialError::domain(format!("unknown option '{name}'")));
        }
    }
    Ok(())
}

fn gather_partial_sums(
    series: &dyn ReadySeries,
    through: u32,
) -> Result<Vec<f64>, TrialError> {
    (0..=through).map(|i| series.partial_sum(i)).collect()
}

/// Classic Shanks transform, iterated `m` times.
///
/// One application maps `S_n` to
/// `S_{n+1} - (S_{n+1} - S_n)² / (S_{n+1} - 2S_n + S_{n-1})`; each iteration
/// consumes one index on either side of `n`, so order `m` needs the sums
/// through `n + m` and requires `n >= m`.
pub struct ShanksTransform {
    series: Arc<dyn ReadySeries>,
}

impl std::fmt::Debug for ShanksTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShanksTransform").finish_non_exhaustive()
    }
}

impl Accelerator for ShanksTransform {
    fn estimate(&self, n: u32, m: u32) -> Result<f64, TrialError> {
        if m == 0 {
            return self.series.partial_sum(n);
        }
        if n < m {
            return Err(TrialError::domain(format!(
                "transform order {m} needs n >= {m}, got n={n}"
            )));
        }

        let mut table = gather_partial_sums(self.series.as_ref(), n + m)?;
        for _ in 0..m {
            let mut next = Vec::with_capacity(table.len() - 2);
            for j in 1..table.len() - 1 {
                let denom = table[j + 1] - 2.0 * table[j] + table[j - 1];
                if denom == 0.0 {
                    return Err(TrialError::computation(
                        "vanishing second difference in Shanks denominator",
                    ));
                }
                let delta = table[j + 1] - table[j];
                next.push(table[j + 1] - delta * delta / denom);
            }
            table = next;
        }

        // After m iterations the entry centered on the original n sits at
        // index n - m.
        let value = table[(n - m) as usize];
        if !value.is_finite() {
            return Err(TrialError::computation("non-finite Shanks estimate"));
        }
        Ok(value)
    }
}

/// Wynn's epsilon algorithm.
///
/// Order `m` performs `2m` sweeps of the epsilon table over the sums
/// `S_0 ..= S_{n+2m}`; even columns hold the accelerated estimates. The two
/// working rows are swapped and shifted in place rather than holding the
/// whole table.
pub struct EpsilonAlgorithm {
    series: Arc<dyn ReadySeries>,
}

impl std::fmt::Debug for EpsilonAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpsilonAlgorithm").finish_non_exhaustive()
    }
}

impl Accelerator for EpsilonAlgorithm {
    fn estimate(&self, n: u32, m: u32) -> Result<f64, TrialError> {
        if m == 0 {
            return self.series.partial_sum(n);
        }
        if n == 0 {
            return Err(TrialError::domain("epsilon algorithm needs n >= 1"));
        }

        let sweeps = 2 * m as usize;
        let n = n as usize;
        let mut top = sweeps + n;

        let mut e0 = gather_partial_sums(self.series.as_ref(), top as u32)?;
        let mut e1 = vec![0.0; top];

        for _ in 0..sweeps {
            for j in (n - 1)..top {
                // A vanishing difference drives the entry to infinity; the
                // final finiteness check rejects anything it poisons.
                e1[j] += 1.0 / (e0[j + 1] - e0[j]);
            }
            top -= 1;
            std::mem::swap(&mut e0, &mut e1);
            e1.remove(0);
        }

        let value = e0[n - 1];
        if !value.is_finite() {
            return Err(TrialError::computation(
                "division by zero in epsilon table",
            ));
        }
        Ok(value)
    }
}

/// Richardson extrapolation table over the sums `S_0 ..= S_n`.
///
/// Sweeps weight successive rows by powers of four; the transform order is
/// unused, the table depth is set by `n` alone.
pub struct RichardsonTransform {
    series: Arc<dyn ReadySeries>,
}

impl std::fmt::Debug for RichardsonTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RichardsonTransform").finish_non_exhaustive()
    }
}

impl Accelerator for RichardsonTransform {
    fn estimate(&self, n: u32, _m: u32) -> Result<f64, TrialError> {
        if n == 0 {
            return Err(TrialError::domain("richardson needs n >= 1"));
        }

        let n = n as usize;
        let mut prev = gather_partial_sums(self.series.as_ref(), n as u32)?;
        let mut next = vec![0.0; n + 1];

        let mut a = 1.0;
        for l in 1..=n {
            a *= 4.0;
            let b = a - 1.0;
            for i in l..=n {
                next[i] = (a * prev[i] - prev[i - 1]) / b;
            }
            std::mem::swap(&mut prev, &mut next);
        }

        let value = prev[n];
        if !value.is_finite() {
            return Err(TrialError::computation("non-finite Richardson estimate"));
        }
        Ok(value)
    }
}

/// Levin t-transformation of order `m` with shift parameter `beta`.
///
/// Weights the sums `S_n ..= S_{n+m}` by alternating binomial coefficients
/// and remainder estimates `1/a_{n+j}` (DLMF 3.9.13).
pub struct LevinTransform {
    series: Arc<dyn ReadySeries>,
    beta: f64,
}

impl std::fmt::Debug for LevinTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevinTransform")
            .field("beta", &self.beta)
            .finish_non_exhaustive()
    }
}

impl Accelerator for LevinTransform {
    fn estimate(&self, n: u32, m: u32) -> Result<f64, TrialError> {
        if m == 0 {
            return self.series.partial_sum(n);
        }
        if n == 0 {
            return Err(TrialError::domain("levin transform needs n >= 1"));
        }

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for j in 0..=m {
            let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
            let weight = binomial(m as u64, j as u64) as f64;
            let scale = (((n + j) as f64 + self.beta) / ((n + m) as f64 + self.beta))
                .powi(m as i32 - 1);

            let s_nj = self.series.partial_sum(n + j)?;
            let term = s_nj - self.series.partial_sum(n + j - 1)?;
            if term == 0.0 {
                return Err(TrialError::computation(
                    "vanishing term in Levin remainder estimate",
                ));
            }

            let rest = sign * weight * scale / term;
            denominator += rest;
            numerator += rest * s_nj;
        }

        let value = numerator / denominator;
        if !value.is_finite() {
            return Err(TrialError::computation("division by zero in Levin weights"));
        }
        Ok(value)
    }
}

fn binomial(n: u64, k: u64) -> u64 {
    let k = k.min(n - k);
    let mut out = 1u64;
    for i in 0..k {
        out = out * (n - i) / (i + 1);
    }
    out
}

pub struct ShanksFactory;

impl AccelFactory for ShanksFactory {
    fn build(
        &self,
        series: Arc<dyn ReadySeries>,
        options: &Assignment,
    ) -> Result<Box<dyn Accelerator>, TrialError> {
        reject_unknown_options(options, &[])?;
        Ok(Box::new(ShanksTransform { series }))
    }
}

pub struct EpsilonFactory;

impl AccelFactory for EpsilonFactory {
    fn build(
        &self,
        series: Arc<dyn ReadySeries>,
        options: &Assignment,
    ) -> Result<Box<dyn Accelerator>, TrialError> {
        reject_unknown_options(options, &[])?;
        Ok(Box::new(EpsilonAlgorithm { series }))
    }
}

pub struct RichardsonFactory;

impl AccelFactory for RichardsonFactory {
    fn build(
        &self,
        series: Arc<dyn ReadySeries>,
        options: &Assignment,
    ) -> Result<Box<dyn Accelerator>, TrialError> {
        reject_unknown_options(options, &[])?;
        Ok(Box::new(RichardsonTransform { series }))
    }
}

pub struct LevinFactory;

impl AccelFactory for LevinFactory {
    fn build(
        &self,
        series: Arc<dyn ReadySeries>,
        options: &Assignment,
    ) -> Result<Box<dyn Accelerator>, TrialError> {
        reject_unknown_options(options, &["beta"])?;
        let beta = match options.get("beta") {
            Some(value) => value
                .as_f64()
                .filter(|b| b.is_finite() && *b > 0.0)
                .ok_or_else(|| TrialError::domain("option 'beta' must be a positive number"))?,
            None => 1.0,
        };
        Ok(Box::new(LevinTransform { series, beta }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::series::{GeometricSeries, LeibnizPi4Series, Ln1pxSeries};
    use crate::domain::ParamValue;

    fn geometric(x: f64) -> Arc<dyn ReadySeries> {
        Arc::new(GeometricSeries::new(x).unwrap())
    }

    #[test]
    fn shanks_is_exact_on_geometric_series() {
        let series = geometric(0.5);
        let limit = series.limit().unwrap();
        let accel = ShanksTransform {
            series: Arc::clone(&series),
        };

        let estimate = accel.estimate(3, 1).unwrap();
        assert!((estimate - limit).abs() < 1e-12);

        // Order zero degrades to the raw partial sum.
        let raw = accel.estimate(3, 0).unwrap();
        assert!((raw - series.partial_sum(3).unwrap()).abs() < 1e-15);
    }

    #[test]
    fn shanks_rejects_orders_beyond_n() {
        let accel = ShanksTransform {
            series: geometric(0.5),
        };
        let err = accel.estimate(2, 3).unwrap_err();
        assert!(err.to_string().starts_with("domain error"));
    }

    #[test]
    fn epsilon_beats_raw_sums_on_alternating_series() {
        let series: Arc<dyn ReadySeries> = Arc::new(LeibnizPi4Series);
        let limit = series.limit().unwrap();
        let accel = EpsilonAlgorithm {
            series: Arc::clone(&series),
        };

        let raw_dev = (series.partial_sum(6).unwrap() - limit).abs();
        let accel_dev = (accel.estimate(6, 2).unwrap() - limit).abs();
        assert!(accel_dev < raw_dev / 100.0);
    }

    #[test]
    fn richardson_is_exact_on_quarter_ratio_geometric() {
        // With x = 1/4 the remainder shrinks by 4 per term, exactly the
        // weight the table eliminates.
        let series = geometric(0.25);
        let limit = series.limit().unwrap();
        let accel = RichardsonTransform {
            series: Arc::clone(&series),
        };
        let estimate = accel.estimate(3, 1).unwrap();
        assert!((estimate - limit).abs() < 1e-12);
    }

    #[test]
    fn levin_is_exact_on_geometric_series() {
        let series = geometric(0.5);
        let limit = series.limit().unwrap();
        let accel = LevinTransform {
            series: Arc::clone(&series),
            beta: 1.0,
        };
        let estimate = accel.estimate(2, 1).unwrap();
        assert!((estimate - limit).abs() < 1e-12);
    }

    #[test]
    fn levin_accelerates_ln1px() {
        let series: Arc<dyn ReadySeries> = Arc::new(Ln1pxSeries::new(0.9).unwrap());
        let limit = series.limit().unwrap();
        let accel = LevinTransform {
            series: Arc::clone(&series),
            beta: 1.0,
        };

        let raw_dev = (series.partial_sum(8).unwrap() - limit).abs();
        let accel_dev = (accel.estimate(8, 4).unwrap() - limit).abs();
        assert!(accel_dev < raw_dev / 1000.0);
    }

    #[test]
    fn levin_factory_reads_beta_and_rejects_unknown_options() {
        let options = Assignment::from_entries(vec![(
            "beta".to_string(),
            ParamValue::Float(2.0),
        )]);
        assert!(LevinFactory.build(geometric(0.5), &options).is_ok());

        let options = Assignment::from_entries(vec![(
            "gamma".to_string(),
            ParamValue::Float(2.0),
        )]);
        let err = LevinFactory.build(geometric(0.5), &options).unwrap_err();
        assert!(err.to_string().contains("unknown option 'gamma'"));

        let options = Assignment::from_entries(vec![(
            "beta".to_string(),
            ParamValue::Float(-1.0),
        )]);
        assert!(LevinFactory.build(geometric(0.5), &options).is_err());
    }
}
