use serde::Deserialize;

use crate::{
    body::DEFAULT_DAMPING_FACTOR, distribution::Distribution, error::ConfigError,
    integrator::IntegratorKind, system::UpdateOrder,
};

/// Newton's constant in SI units.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67385e-11;

/// GM of a 1e11 kg body.
pub const DEFAULT_MASS_PARAMETER: f64 = 1e11 * GRAVITATIONAL_CONSTANT;

/// Scenario settings, loadable from YAML.
///
/// ```yaml
/// body_count: 500
/// dt: 0.001
/// integrator: euler        # or rk4
/// mass_parameter: 6.67385  # GM shared by every body
/// damping_factor: 0.01
/// update: synchronized     # or sequential
/// parallel: false
/// seed: 0
/// distribution:
///   kind: disk_clusters
///   clusters:
///     - { center: [5.0, 5.0], radius: 5.0 }
///     - { center: [-5.0, -5.0], radius: 5.0 }
/// ```
///
/// Everything except `body_count` and `dt` has a default.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SimulationConfig {
    pub body_count: usize,
    pub dt: f64,
    #[serde(default)]
    pub integrator: IntegratorKind,
    #[serde(default)]
    pub distribution: Distribution,
    #[serde(default = "default_mass_parameter")]
    pub mass_parameter: f64,
    #[serde(default = "default_damping_factor")]
    pub damping_factor: f64,
    #[serde(default)]
    pub update: UpdateOrder,
    /// Compute synchronized steps on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub seed: u64,
}

fn default_mass_parameter() -> f64 {
    DEFAULT_MASS_PARAMETER
}

fn default_damping_factor() -> f64 {
    DEFAULT_DAMPING_FACTOR
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(500, Distribution::two_clusters(), IntegratorKind::Euler, 0.001)
    }
}

impl SimulationConfig {
    pub fn new(
        body_count: usize,
        distribution: Distribution,
        integrator: IntegratorKind,
        dt: f64,
    ) -> Self {
        Self {
            body_count,
            dt,
            integrator,
            distribution,
            mass_parameter: DEFAULT_MASS_PARAMETER,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            update: UpdateOrder::default(),
            parallel: false,
            seed: 0,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.body_count == 0 {
            return Err(ConfigError::EmptySystem);
        }
        validate_dt(self.dt)?;
        validate_mass_parameter(self.mass_parameter)?;
        validate_damping(self.damping_factor)?;
        self.distribution.validate(self.body_count)
    }
}

pub(crate) fn validate_dt(dt: f64) -> Result<(), ConfigError> {
    if dt > 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidTimeStep(dt))
    }
}

pub(crate) fn validate_mass_parameter(gm: f64) -> Result<(), ConfigError> {
    if gm > 0.0 && gm.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidMassParameter(gm))
    }
}

pub(crate) fn validate_damping(damping: f64) -> Result<(), ConfigError> {
    if damping >= 0.0 && damping.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidDamping(damping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_uses_defaults() {
        let config = SimulationConfig::from_yaml_str("body_count: 10\ndt: 0.01\n").unwrap();

        assert_eq!(config.body_count, 10);
        assert_eq!(config.integrator, IntegratorKind::Euler);
        assert_eq!(config.distribution, Distribution::two_clusters());
        assert_eq!(config.mass_parameter, DEFAULT_MASS_PARAMETER);
        assert_eq!(config.damping_factor, 0.01);
        assert_eq!(config.update, UpdateOrder::Synchronized);
        assert!(!config.parallel);
    }

    #[test]
    fn full_yaml() {
        let yaml = r#"
body_count: 4
dt: 0.5
integrator: rk4
mass_parameter: 2.0
damping_factor: 0.0
update: sequential
parallel: true
seed: 42
distribution:
  kind: disk_clusters
  clusters:
    - { center: [1.0, 1.0], radius: 2.0, swirl: 0.5 }
"#;
        let config = SimulationConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.integrator, IntegratorKind::Rk4);
        assert_eq!(config.update, UpdateOrder::Sequential);
        assert_eq!(config.seed, 42);
        assert_eq!(config.damping_factor, 0.0);
        assert!(config.parallel);
    }

    #[test]
    fn rejects_invalid_values() {
        let base = SimulationConfig::default();

        let mut c = base.clone();
        c.body_count = 0;
        assert!(matches!(c.validate(), Err(ConfigError::EmptySystem)));

        let mut c = base.clone();
        c.dt = 0.0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidTimeStep(_))));

        let mut c = base.clone();
        c.dt = f64::INFINITY;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidTimeStep(_))));

        let mut c = base.clone();
        c.mass_parameter = -1.0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidMassParameter(_))));

        let mut c = base;
        c.damping_factor = -0.1;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidDamping(_))));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = SimulationConfig::from_yaml_str("body_count: [oops").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
