//! Projectiles travelling between two points.

use glam::Vec2;

/// A projectile in flight. It lands once `flight_time` has elapsed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projectile {
    pub origin: Vec2,
    pub target: Vec2,
    elapsed: f32,
    flight_time: f32,
}

impl Projectile {
    /// Launches toward `target` at `speed` units per second. A non-positive
    /// speed lands on the next advance.
    pub fn launch(origin: Vec2, target: Vec2, speed: f32) -> Self {
        let distance = origin.distance(target);
        let flight_time = if speed > 0.0 { distance / speed } else { 0.0 };
        Self {
            origin,
            target,
            elapsed: 0.0,
            flight_time,
        }
    }

    /// Advances by `dt`; returns `true` once the projectile has landed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.flight_time);
        self.has_landed()
    }

    pub fn has_landed(&self) -> bool {
        self.elapsed >= self.flight_time
    }

    pub fn flight_time(&self) -> f32 {
        self.flight_time
    }

    /// Current interpolated position.
    pub fn position(&self) -> Vec2 {
        if self.flight_time <= 0.0 {
            return self.target;
        }
        self.origin
            .lerp(self.target, self.elapsed / self.flight_time)
    }
}
