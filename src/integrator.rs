use serde::Deserialize;

use crate::body::{Body, State};

/// Which scheme advances a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// Explicit Euler, first order.
    #[default]
    Euler,
    /// Classical fourth-order Runge-Kutta.
    Rk4,
}

/// Fixed-step scheme shared by every body in a [`crate::System`].
/// Holds no per-body state; `integrate` returns the next state and writes nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Integrator {
    /// Scheme used for every body.
    pub kind: IntegratorKind,
    /// Time step per call.
    pub dt: f64,
}

impl Integrator {
    /// Creates an integrator of the given kind and time step.
    pub fn new(kind: IntegratorKind, dt: f64) -> Self {
        Self { kind, dt }
    }

    pub fn euler(dt: f64) -> Self {
        Self::new(IntegratorKind::Euler, dt)
    }

    pub fn rk4(dt: f64) -> Self {
        Self::new(IntegratorKind::Rk4, dt)
    }

    /// Computes the next state of `body`.
    ///
    /// Every acceleration sample is taken against `bodies` as given, so neighbours
    /// stay at whatever state the caller passed in for all RK4 stages.
    pub fn integrate(&self, body: &Body, bodies: &[Body]) -> State {
        match self.kind {
            IntegratorKind::Euler => self.euler_step(body, bodies),
            IntegratorKind::Rk4 => self.rk4_step(body, bodies),
        }
    }

    fn euler_step(&self, body: &Body, bodies: &[Body]) -> State {
        let dt = self.dt;
        let x1 = body.position;
        let v1 = body.velocity;
        let a1 = body.accel(x1, v1, bodies);

        State::new(x1 + v1 * dt, v1 + a1 * dt)
    }

    fn rk4_step(&self, body: &Body, bodies: &[Body]) -> State {
        let dt = self.dt;
        let half = 0.5 * dt;

        let x1 = body.position;
        let v1 = body.velocity;
        let a1 = body.accel(x1, v1, bodies);

        let x2 = x1 + v1 * half;
        let v2 = v1 + a1 * half;
        let a2 = body.accel(x2, v2, bodies);

        let x3 = x1 + v2 * half;
        let v3 = v1 + a2 * half;
        let a3 = body.accel(x3, v3, bodies);

        let x4 = x1 + v3 * dt;
        let v4 = v1 + a3 * dt;
        let a4 = body.accel(x4, v4, bodies);

        let sixth = dt / 6.0;
        State::new(
            x1 + (v1 + v2 * 2.0 + v3 * 2.0 + v4) * sixth,
            v1 + (a1 + a2 * 2.0 + a3 * 2.0 + a4) * sixth,
        )
    }
}
