use crate::vector::Vector2;

/// Softening added under the square root of the pair distance.
pub const DEFAULT_DAMPING_FACTOR: f64 = 0.01;

/// Position and velocity of a body at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct State {
    pub position: Vector2,
    pub velocity: Vector2,
}

impl State {
    pub fn new(position: Vector2, velocity: Vector2) -> Self {
        Self { position, velocity }
    }
}

/// A point mass in the simulation.
///
/// Bodies live in the flat `Vec<Body>` owned by [`crate::System`]. A body refers to
/// its neighbours only through the slice passed into [`Body::accel`], never by
/// holding onto it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Slot of this body in the owning system. Used to skip self-interaction.
    pub index: usize,
    /// Position vector.
    pub position: Vector2,
    /// Velocity vector.
    pub velocity: Vector2,
    /// Gravitational constant times mass (GM).
    pub mass_parameter: f64,
    /// Softening term added to the squared distance before the square root.
    pub damping_factor: f64,
}

impl Body {
    /// Creates a new Body with the default damping factor.
    pub fn new(index: usize, position: Vector2, velocity: Vector2, mass_parameter: f64) -> Self {
        Self {
            index,
            position,
            velocity,
            mass_parameter,
            damping_factor: DEFAULT_DAMPING_FACTOR,
        }
    }

    /// Replaces the damping factor. Zero removes the softening entirely.
    pub fn with_damping(mut self, damping_factor: f64) -> Self {
        self.damping_factor = damping_factor;
        self
    }

    /// Current position and velocity.
    pub fn state(&self) -> State {
        State::new(self.position, self.velocity)
    }

    pub(crate) fn set_state(&mut self, state: State) {
        self.position = state.position;
        self.velocity = state.velocity;
    }

    /// Gravitational acceleration felt at `position` from every other body in `bodies`.
    ///
    /// `bodies` is read as-is; this never looks at where a neighbour will be later
    /// in the step. The distance is softened as `sqrt(dx² + dy² + damping)`.
    /// `_velocity` is unused because the force depends on position only.
    pub fn accel(&self, position: Vector2, _velocity: Vector2, bodies: &[Body]) -> Vector2 {
        let mut acc = Vector2::zero();

        for other in bodies {
            if other.index == self.index {
                continue;
            }

            let d = position - other.position;
            let r = (d.mag_sq() + self.damping_factor).sqrt();
            let factor = -other.mass_parameter / (r * r * r);

            acc += d * factor;
        }

        acc
    }
}
