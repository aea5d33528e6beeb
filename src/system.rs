use log::{info, trace, warn};
use rayon::prelude::*;
use serde::Deserialize;

use crate::{
    body::{Body, State},
    config::{self, SimulationConfig},
    distribution::Distribution,
    error::ConfigError,
    integrator::{Integrator, IntegratorKind},
    vector::{self, Vector2},
};

/// How bodies see each other within a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOrder {
    /// Every body is advanced from the same start-of-step state; writes happen after
    /// all bodies are computed (Jacobi).
    #[default]
    Synchronized,
    /// Bodies are advanced in index order and written back immediately, so later
    /// bodies see earlier ones already moved (Gauss-Seidel).
    Sequential,
}

/// Owns every body and advances them together by a fixed `dt`.
#[derive(Clone, Debug)]
pub struct System {
    bodies: Vec<Body>,
    integrator: Integrator,
    update: UpdateOrder,
    parallel: bool,
    time: f64,
    steps: u64,
}

impl System {
    /// Builds `body_count` bodies from `distribution` with the default mass parameter,
    /// damping factor and seed.
    pub fn initialize(
        body_count: usize,
        distribution: Distribution,
        kind: IntegratorKind,
        dt: f64,
    ) -> Result<Self, ConfigError> {
        Self::from_config(&SimulationConfig::new(body_count, distribution, kind, dt))
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = fastrand::Rng::with_seed(config.seed);
        let states = config.distribution.generate(config.body_count, &mut rng)?;

        let bodies = states
            .into_iter()
            .enumerate()
            .map(|(index, s)| {
                Body::new(index, s.position, s.velocity, config.mass_parameter)
                    .with_damping(config.damping_factor)
            })
            .collect();

        Self::from_bodies(
            bodies,
            Integrator::new(config.integrator, config.dt),
            config.update,
        )
        .map(|system| system.with_parallel(config.parallel))
    }

    /// Builds a system from prepared bodies. Indices are reassigned to match slots.
    pub fn from_bodies(
        mut bodies: Vec<Body>,
        integrator: Integrator,
        update: UpdateOrder,
    ) -> Result<Self, ConfigError> {
        if bodies.is_empty() {
            return Err(ConfigError::EmptySystem);
        }
        config::validate_dt(integrator.dt)?;

        for (index, body) in bodies.iter_mut().enumerate() {
            config::validate_mass_parameter(body.mass_parameter)?;
            config::validate_damping(body.damping_factor)?;
            if !vector::is_finite(body.position) || !vector::is_finite(body.velocity) {
                return Err(ConfigError::InvalidDistribution(format!(
                    "body {index} has a non-finite state"
                )));
            }
            body.index = index;
        }

        if bodies.iter().any(|b| b.damping_factor == 0.0) {
            warn!("damping factor is 0; coincident bodies will produce non-finite accelerations");
        }

        info!(
            "system ready: {} bodies, {:?} integrator, dt = {}, {:?} update",
            bodies.len(),
            integrator.kind,
            integrator.dt,
            update
        );

        Ok(Self {
            bodies,
            integrator,
            update,
            parallel: false,
            time: 0.0,
            steps: 0,
        })
    }

    /// Enables rayon for synchronized steps. Results are identical to the serial path.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        if parallel && self.update == UpdateOrder::Sequential {
            warn!("parallel stepping ignored: sequential update is order dependent");
        }
        self.parallel = parallel;
        self
    }

    /// Advances every body by one `dt`.
    pub fn step(&mut self) {
        match self.update {
            UpdateOrder::Synchronized => self.step_synchronized(),
            UpdateOrder::Sequential => self.step_sequential(),
        }

        self.time += self.integrator.dt;
        self.steps += 1;
        trace!("step {} done, t = {}", self.steps, self.time);
    }

    /// Calls [`System::step`] `n` times.
    pub fn steps_n(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    fn step_synchronized(&mut self) {
        let integrator = self.integrator;
        let bodies = &self.bodies;

        let next: Vec<State> = if self.parallel {
            bodies
                .par_iter()
                .map(|body| integrator.integrate(body, bodies))
                .collect()
        } else {
            bodies
                .iter()
                .map(|body| integrator.integrate(body, bodies))
                .collect()
        };

        for (body, state) in self.bodies.iter_mut().zip(next) {
            body.set_state(state);
        }
    }

    fn step_sequential(&mut self) {
        for i in 0..self.bodies.len() {
            let state = self.integrator.integrate(&self.bodies[i], &self.bodies);
            self.bodies[i].set_state(state);
        }
    }

    /// Current positions in body index order.
    pub fn positions(&self) -> Vec<Vector2> {
        self.bodies.iter().map(|b| b.position).collect()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Simulated time elapsed since construction.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    pub fn update_order(&self) -> UpdateOrder {
        self.update
    }

    /// Total momentum scaled by G: Σ GMᵢ vᵢ.
    pub fn momentum(&self) -> Vector2 {
        self.bodies
            .iter()
            .fold(Vector2::zero(), |acc, b| acc + b.velocity * b.mass_parameter)
    }

    /// Total angular momentum about the origin scaled by G.
    pub fn angular_momentum(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.mass_parameter * (b.position.x * b.velocity.y - b.position.y * b.velocity.x))
            .sum()
    }

    /// Total energy scaled by G, using the same softened potential as the force law.
    pub fn energy(&self) -> f64 {
        let kinetic: f64 = self
            .bodies
            .iter()
            .map(|b| 0.5 * b.mass_parameter * b.velocity.mag_sq())
            .sum();

        let mut potential = 0.0;
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                let r = ((a.position - b.position).mag_sq() + a.damping_factor).sqrt();
                potential -= a.mass_parameter * b.mass_parameter / r;
            }
        }

        kinetic + potential
    }

    /// True if no position or velocity has gone NaN or infinite.
    ///
    /// Softening keeps a step finite only while the damping factor is positive. With a
    /// damping factor of 0, coincident bodies produce NaN that `step` carries forward,
    /// so callers using zero damping should check this between steps.
    pub fn is_finite(&self) -> bool {
        self.bodies
            .iter()
            .all(|b| vector::is_finite(b.position) && vector::is_finite(b.velocity))
    }
}
