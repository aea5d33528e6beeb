use serde::Deserialize;
use std::f64::consts::TAU;

use crate::{body::State, error::ConfigError, vector::Vector2};

/// A disk of bodies around `center`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DiskCluster {
    pub center: [f64; 2],
    pub radius: f64,
    /// Tangential speed coefficient: a body at distance `r` moves at `sqrt(swirl / r)`.
    #[serde(default)]
    pub swirl: f64,
}

impl DiskCluster {
    pub fn new(center: [f64; 2], radius: f64) -> Self {
        Self {
            center,
            radius,
            swirl: 0.0,
        }
    }

    fn sample(&self, rng: &mut fastrand::Rng) -> State {
        let r = rng.f64() * self.radius;
        let theta = rng.f64() * TAU;
        let (sin, cos) = theta.sin_cos();

        let center = Vector2::new(self.center[0], self.center[1]);
        let position = center + Vector2::new(cos, sin) * r;

        let speed = if self.swirl > 0.0 && r > 0.0 {
            (self.swirl / r).sqrt()
        } else {
            0.0
        };
        let velocity = Vector2::new(-sin, cos) * speed;

        State::new(position, velocity)
    }
}

/// How initial positions and velocities are laid out.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// Bodies dealt evenly across disks. Radius is sampled uniformly, not by area.
    DiskClusters { clusters: Vec<DiskCluster> },
    /// Uniform in the square `[-half_width, half_width)²`, at rest.
    UniformSquare { half_width: f64 },
    /// Caller-supplied `(position, velocity)` pairs, one per body.
    Explicit { states: Vec<([f64; 2], [f64; 2])> },
}

impl Default for Distribution {
    fn default() -> Self {
        Self::two_clusters()
    }
}

impl Distribution {
    /// Two resting disks of radius 5 centred on (5, 5) and (-5, -5).
    pub fn two_clusters() -> Self {
        Self::DiskClusters {
            clusters: vec![
                DiskCluster::new([5.0, 5.0], 5.0),
                DiskCluster::new([-5.0, -5.0], 5.0),
            ],
        }
    }

    pub fn explicit(states: impl IntoIterator<Item = State>) -> Self {
        Self::Explicit {
            states: states
                .into_iter()
                .map(|s| ([s.position.x, s.position.y], [s.velocity.x, s.velocity.y]))
                .collect(),
        }
    }

    pub fn validate(&self, body_count: usize) -> Result<(), ConfigError> {
        match self {
            Self::DiskClusters { clusters } => {
                if clusters.is_empty() {
                    return Err(invalid("no disk clusters given"));
                }
                for cluster in clusters {
                    if !cluster.center.iter().all(|c| c.is_finite()) {
                        return Err(invalid("cluster center is not finite"));
                    }
                    if !(cluster.radius >= 0.0 && cluster.radius.is_finite()) {
                        return Err(invalid(format!("cluster radius {}", cluster.radius)));
                    }
                    if !(cluster.swirl >= 0.0 && cluster.swirl.is_finite()) {
                        return Err(invalid(format!("cluster swirl {}", cluster.swirl)));
                    }
                }
            }
            Self::UniformSquare { half_width } => {
                if !(*half_width >= 0.0 && half_width.is_finite()) {
                    return Err(invalid(format!("square half width {half_width}")));
                }
            }
            Self::Explicit { states } => {
                if states.len() != body_count {
                    return Err(ConfigError::CountMismatch {
                        expected: body_count,
                        actual: states.len(),
                    });
                }
                let finite = states
                    .iter()
                    .all(|(p, v)| p.iter().chain(v.iter()).all(|c| c.is_finite()));
                if !finite {
                    return Err(invalid("explicit state is not finite"));
                }
            }
        }
        Ok(())
    }

    /// Produces `body_count` initial states in body index order.
    pub fn generate(
        &self,
        body_count: usize,
        rng: &mut fastrand::Rng,
    ) -> Result<Vec<State>, ConfigError> {
        self.validate(body_count)?;

        let states = match self {
            Self::DiskClusters { clusters } => {
                let per_cluster = body_count / clusters.len();
                let extra = body_count % clusters.len();

                let mut states = Vec::with_capacity(body_count);
                for (i, cluster) in clusters.iter().enumerate() {
                    let count = per_cluster + usize::from(i < extra);
                    states.extend((0..count).map(|_| cluster.sample(rng)));
                }
                states
            }
            Self::UniformSquare { half_width } => (0..body_count)
                .map(|_| {
                    let x = (rng.f64() * 2.0 - 1.0) * half_width;
                    let y = (rng.f64() * 2.0 - 1.0) * half_width;
                    State::new(Vector2::new(x, y), Vector2::zero())
                })
                .collect(),
            Self::Explicit { states } => states
                .iter()
                .map(|(p, v)| State::new(Vector2::new(p[0], p[1]), Vector2::new(v[0], v[1])))
                .collect(),
        };

        Ok(states)
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::InvalidDistribution(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clusters_split_bodies_evenly() {
        let mut rng = fastrand::Rng::with_seed(0);
        let states = Distribution::two_clusters().generate(501, &mut rng).unwrap();
        assert_eq!(states.len(), 501);

        // First cluster gets the odd body; every sample stays inside its disk.
        let (first, second) = states.split_at(251);
        let center_a = Vector2::new(5.0, 5.0);
        let center_b = Vector2::new(-5.0, -5.0);
        assert!(first.iter().all(|s| (s.position - center_a).mag() <= 5.0 + 1e-12));
        assert!(second.iter().all(|s| (s.position - center_b).mag() <= 5.0 + 1e-12));
        assert!(states.iter().all(|s| s.velocity == Vector2::zero()));
    }

    #[test]
    fn swirl_gives_tangential_velocity() {
        let cluster = DiskCluster {
            center: [0.0, 0.0],
            radius: 2.0,
            swirl: 4.0,
        };
        let dist = Distribution::DiskClusters {
            clusters: vec![cluster],
        };
        let mut rng = fastrand::Rng::with_seed(3);

        for s in dist.generate(50, &mut rng).unwrap() {
            let r = s.position.mag();
            if r == 0.0 {
                continue;
            }
            assert!(s.position.dot(s.velocity).abs() < 1e-9);
            assert!((s.velocity.mag() - (4.0 / r).sqrt()).abs() < 1e-9);
        }
    }

    #[test]
    fn uniform_square_stays_in_bounds() {
        let mut rng = fastrand::Rng::with_seed(1);
        let states = Distribution::UniformSquare { half_width: 3.0 }
            .generate(200, &mut rng)
            .unwrap();

        assert_eq!(states.len(), 200);
        assert!(
            states
                .iter()
                .all(|s| s.position.x.abs() <= 3.0 && s.position.y.abs() <= 3.0)
        );
    }

    #[test]
    fn same_seed_same_layout() {
        let a = Distribution::two_clusters()
            .generate(40, &mut fastrand::Rng::with_seed(9))
            .unwrap();
        let b = Distribution::two_clusters()
            .generate(40, &mut fastrand::Rng::with_seed(9))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn explicit_count_must_match() {
        let dist = Distribution::explicit([State::new(Vector2::zero(), Vector2::zero())]);
        let err = dist.generate(2, &mut fastrand::Rng::with_seed(0)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn rejects_bad_shapes() {
        let no_clusters = Distribution::DiskClusters { clusters: vec![] };
        assert!(no_clusters.validate(1).is_err());

        let negative = Distribution::DiskClusters {
            clusters: vec![DiskCluster::new([0.0, 0.0], -1.0)],
        };
        assert!(negative.validate(1).is_err());

        let nan = Distribution::UniformSquare {
            half_width: f64::NAN,
        };
        assert!(nan.validate(1).is_err());
    }

    #[test]
    fn deserializes_tagged_yaml() {
        let yaml = "kind: uniform_square\nhalf_width: 2.5\n";
        let dist: Distribution = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(dist, Distribution::UniformSquare { half_width: 2.5 });

        let yaml = "kind: explicit\nstates:\n  - [[0.0, 1.0], [0.5, 0.0]]\n";
        let dist: Distribution = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            dist,
            Distribution::Explicit {
                states: vec![([0.0, 1.0], [0.5, 0.0])]
            }
        );
    }
}
