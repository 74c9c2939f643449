//! Built-in series and transform capabilities.
//!
//! The trial engine only ever consumes the capability traits in `domain`;
//! this catalog is one supplier of them. Names resolve to factories here,
//! once, when descriptors are loaded, never by probing at call time.

pub mod accel;
pub mod series;

use std::sync::Arc;

use crate::domain::{AccelFactory, SeriesFactory};

/// Resolve a series name to its factory.
pub fn series_factory(name: &str) -> Option<Arc<dyn SeriesFactory>> {
    match name {
        "exp" => Some(Arc::new(series::ExpFactory)),
        "geometric" => Some(Arc::new(series::GeometricFactory)),
        "ln1px" => Some(Arc::new(series::Ln1pxFactory)),
        "leibniz_pi_4" => Some(Arc::new(series::LeibnizPi4Factory)),
        "basel" => Some(Arc::new(series::BaselFactory)),
        _ => None,
    }
}

/// Resolve an acceleration method name to its factory.
pub fn accel_factory(name: &str) -> Option<Arc<dyn AccelFactory>> {
    match name {
        "shanks" => Some(Arc::new(accel::ShanksFactory)),
        "epsilon" => Some(Arc::new(accel::EpsilonFactory)),
        "richardson" => Some(Arc::new(accel::RichardsonFactory)),
        "levin" => Some(Arc::new(accel::LevinFactory)),
        _ => None,
    }
}

/// Registry listing for terminal output: (name, summary).
pub fn list_series() -> &'static [(&'static str, &'static str)] {
    &[
        ("exp", "Maclaurin series of exp(x); any finite x"),
        ("geometric", "x + x^2 + ... = x/(1-x); |x| < 1"),
        ("ln1px", "x - x^2/2 + ... = ln(1+x); |x| < 1"),
        ("leibniz_pi_4", "1 - 1/3 + 1/5 - ... = pi/4; no arguments"),
        ("basel", "1 + 1/4 + 1/9 + ... = pi^2/6; no arguments"),
    ]
}

/// Registry listing for terminal output: (name, summary).
pub fn list_accels() -> &'static [(&'static str, &'static str)] {
    &[
        ("shanks", "classic Shanks transform, iterated m times"),
        ("epsilon", "Wynn's epsilon algorithm (order m = 2m table sweeps)"),
        ("richardson", "Richardson extrapolation table (m unused)"),
        ("levin", "Levin t-transformation; option beta (default 1)"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for (name, _) in list_series() {
            assert!(series_factory(name).is_some(), "series '{name}' missing");
        }
        for (name, _) in list_accels() {
            assert!(accel_factory(name).is_some(), "accel '{name}' missing");
        }
        assert!(series_factory("no_such_series").is_none());
        assert!(accel_factory("no_such_accel").is_none());
    }
}
