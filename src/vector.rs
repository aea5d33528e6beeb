use ultraviolet::DVec2;

/// 2D double-precision vector used for positions, velocities and accelerations.
pub type Vector2 = DVec2;

/// Returns true if both components are finite.
#[inline]
pub fn is_finite(v: Vector2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
