use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lower clamp for every trait. Trait values must stay strictly positive:
/// the energetics formulas exponentiate and multiply by them, and a zero
/// sense or speed would wedge the agent permanently.
pub const TRAIT_MIN: f64 = 1e-4;

/// Heritable attributes of an animal. Fixed at creation; inherited with
/// independent per-trait mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimalTraits {
    pub speed: f64,
    pub sense: f64,
    pub reproductive_buffer: f64,
    pub offspring_investment: f64,
}

impl AnimalTraits {
    /// Trait values of a founding-population animal.
    pub fn base() -> Self {
        Self {
            speed: 1.0,
            sense: 1.0,
            reproductive_buffer: 1.0,
            offspring_investment: 1.0,
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            speed: self.speed.max(TRAIT_MIN),
            sense: self.sense.max(TRAIT_MIN),
            reproductive_buffer: self.reproductive_buffer.max(TRAIT_MIN),
            offspring_investment: self.offspring_investment.max(TRAIT_MIN),
        }
    }

    /// Offspring traits: each trait independently mutates with probability
    /// `chance`, shifting by a uniform delta within `severity` times its
    /// current value, then clamps back into the valid range.
    pub fn mutated(&self, chance: f64, severity: f64, rng: &mut impl Rng) -> Self {
        Self {
            speed: mutate_value(self.speed, chance, severity, rng),
            sense: mutate_value(self.sense, chance, severity, rng),
            reproductive_buffer: mutate_value(self.reproductive_buffer, chance, severity, rng),
            offspring_investment: mutate_value(self.offspring_investment, chance, severity, rng),
        }
        .clamped()
    }

    /// Arithmetic mean per trait; `None` for an empty population.
    pub fn average<I>(traits: I) -> Option<AnimalTraits>
    where
        I: IntoIterator<Item = AnimalTraits>,
    {
        let mut count = 0usize;
        let mut sum = AnimalTraits {
            speed: 0.0,
            sense: 0.0,
            reproductive_buffer: 0.0,
            offspring_investment: 0.0,
        };

        for t in traits {
            sum.speed += t.speed;
            sum.sense += t.sense;
            sum.reproductive_buffer += t.reproductive_buffer;
            sum.offspring_investment += t.offspring_investment;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(AnimalTraits {
            speed: sum.speed / n,
            sense: sum.sense / n,
            reproductive_buffer: sum.reproductive_buffer / n,
            offspring_investment: sum.offspring_investment / n,
        })
    }
}

fn mutate_value(value: f64, chance: f64, severity: f64, rng: &mut impl Rng) -> f64 {
    let span = severity * value;
    if rng.gen::<f64>() < chance {
        value + rng.gen_range(-span..=span)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_floors_non_positive_values() {
        let traits = AnimalTraits {
            speed: -1.0,
            sense: 0.0,
            reproductive_buffer: 0.5,
            offspring_investment: 2.0,
        }
        .clamped();

        assert_eq!(traits.speed, TRAIT_MIN);
        assert_eq!(traits.sense, TRAIT_MIN);
        assert_eq!(traits.reproductive_buffer, 0.5);
        assert_eq!(traits.offspring_investment, 2.0);
    }

    #[test]
    fn test_mutation_stays_in_valid_range() {
        let mut rng = rand::thread_rng();
        let mut traits = AnimalTraits::base();

        // Long mutation chains at full chance and high severity never
        // escape the clamp floor.
        for _ in 0..2000 {
            traits = traits.mutated(1.0, 0.5, &mut rng);
            assert!(traits.speed >= TRAIT_MIN);
            assert!(traits.sense >= TRAIT_MIN);
            assert!(traits.reproductive_buffer >= TRAIT_MIN);
            assert!(traits.offspring_investment >= TRAIT_MIN);
        }
    }

    #[test]
    fn test_zero_chance_never_mutates() {
        let mut rng = rand::thread_rng();
        let traits = AnimalTraits::base();

        for _ in 0..100 {
            assert_eq!(traits.mutated(0.0, 0.5, &mut rng), traits);
        }
    }

    #[test]
    fn test_mutation_delta_is_bounded_by_severity() {
        let mut rng = rand::thread_rng();
        let traits = AnimalTraits::base();

        for _ in 0..500 {
            let mutated = traits.mutated(1.0, 0.1, &mut rng);
            assert!((mutated.speed - 1.0).abs() <= 0.1 + 1e-12);
            assert!((mutated.sense - 1.0).abs() <= 0.1 + 1e-12);
        }
    }

    #[test]
    fn test_average() {
        let a = AnimalTraits {
            speed: 1.0,
            sense: 2.0,
            reproductive_buffer: 3.0,
            offspring_investment: 4.0,
        };
        let b = AnimalTraits {
            speed: 3.0,
            sense: 4.0,
            reproductive_buffer: 5.0,
            offspring_investment: 6.0,
        };

        let mean = AnimalTraits::average([a, b]).unwrap();
        assert_eq!(mean.speed, 2.0);
        assert_eq!(mean.sense, 3.0);
        assert_eq!(mean.reproductive_buffer, 4.0);
        assert_eq!(mean.offspring_investment, 5.0);
    }

    #[test]
    fn test_average_of_empty_population() {
        assert!(AnimalTraits::average(std::iter::empty()).is_none());
    }
}
