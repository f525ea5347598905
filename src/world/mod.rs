pub mod food;

use crate::geometry::Vec2;
use crate::random;
use rand::Rng;

/// Circular world centered on the origin.
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    radius: f64,
}

impl Arena {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.length() <= self.radius
    }

    /// Uniformly distributed point within the world disk.
    pub fn random_position(&self, rng: &mut impl Rng) -> Vec2 {
        random::random_point_in_disk(rng, Vec2::ZERO, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let arena = Arena::new(100.0);

        assert!(arena.contains(Vec2::ZERO));
        assert!(arena.contains(Vec2::new(100.0, 0.0)));
        assert!(!arena.contains(Vec2::new(71.0, 71.0)));
    }

    #[test]
    fn test_random_position_inside_world() {
        let arena = Arena::new(350.0);
        let mut rng = rand::thread_rng();

        for _ in 0..500 {
            assert!(arena.contains(arena.random_position(&mut rng)));
        }
    }
}
