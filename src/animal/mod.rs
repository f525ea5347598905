pub mod behavior;
pub mod names;
pub mod reproduction;
pub mod traits;

use crate::config::AnimalConfig;
use crate::geometry::Vec2;
use crate::random;
use crate::simulation::clock::SimulationTime;
use crate::world::food::Food;
use rand::Rng;
use serde::{Deserialize, Serialize};
use traits::AnimalTraits;

/// Body radius, paired with the food radius for the eating check.
pub const ANIMAL_RADIUS: f64 = 10.0;

/// Age in ticks at which a newborn stops its initial wandering and starts
/// deciding for itself.
pub const MATURITY_DELAY_TICKS: u32 = 10;

/// Behavior state. The wire encoding matches the display strings the
/// viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimalAction {
    #[serde(rename = "deciding on action")]
    Deciding,
    #[serde(rename = "searching for food")]
    SearchingForFood,
    #[serde(rename = "moving towards food")]
    MovingTowardsFood,
    #[serde(rename = "wandering")]
    Wandering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    #[serde(rename = "starvation")]
    Starvation,
    #[serde(rename = "old age")]
    OldAge,
}

/// Events fired by an animal's own age clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeEvent {
    Matured,
    MaxAgeReached,
}

/// The agent. Created by the world (founding population) or by a parent's
/// reproduce step; marked dead here and purged from the live collection by
/// the world at the end of the tick.
#[derive(Debug, Clone)]
pub struct Animal {
    pub id: u64,
    pub name: &'static str,
    pub position: Vec2,
    pub energy: f64,
    pub traits: AnimalTraits,
    /// Per-agent clock, distinct from the world clock. Driven once per
    /// `update`; carries the maturity and old-age schedules registered at
    /// birth.
    pub age: SimulationTime<AgeEvent>,
    pub alive: bool,
    pub reason_for_death: Option<DeathCause>,
    pub current_action: AnimalAction,
    pub move_target: Option<Vec2>,
    pub target_food: Option<u64>,
    pub generation: u32,
    pub offspring_count: u32,
    /// Back-references for lineage displays only, never ownership.
    pub offspring_ids: Vec<u64>,
}

impl Animal {
    pub fn new(
        id: u64,
        position: Vec2,
        starting_energy: f64,
        traits: AnimalTraits,
        generation: u32,
        config: &AnimalConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let mut age = SimulationTime::zero();
        age.schedule_once(AgeEvent::Matured, MATURITY_DELAY_TICKS);
        age.schedule_once(AgeEvent::MaxAgeReached, config.maximum_age);

        Self {
            id,
            name: random::random_element(rng, names::ANIMAL_NAMES)
                .copied()
                .unwrap_or("Unnamed"),
            position,
            energy: starting_energy,
            traits,
            age,
            alive: true,
            reason_for_death: None,
            current_action: AnimalAction::Wandering,
            move_target: None,
            target_food: None,
            generation,
            offspring_count: 0,
            offspring_ids: Vec::new(),
        }
    }

    pub fn age_ticks(&self) -> u64 {
        self.age.total_ticks()
    }

    // Energetics, all derived from traits and the configured constants.

    pub fn sight_range(&self, config: &AnimalConfig) -> f64 {
        config.trait_effects.sense * self.traits.sense
    }

    pub fn movement_energy_cost(&self, config: &AnimalConfig) -> f64 {
        config.energy_costs.speed * 1.5_f64.powf(self.traits.speed) * self.traits.speed
    }

    pub fn metabolism(&self, config: &AnimalConfig) -> f64 {
        self.traits.sense * config.energy_costs.sense
    }

    pub fn offspring_starting_energy(&self, config: &AnimalConfig) -> f64 {
        self.traits.offspring_investment * config.trait_effects.offspring_investment
    }

    pub fn reproduction_cost(&self, config: &AnimalConfig) -> f64 {
        config.energy_costs.base_reproduction_cost + self.offspring_starting_energy(config)
    }

    pub fn reproduction_buffer(&self, config: &AnimalConfig) -> f64 {
        self.traits.reproductive_buffer * config.trait_effects.reproductive_buffer
    }

    pub fn energy_required_for_reproduction(&self, config: &AnimalConfig) -> f64 {
        self.reproduction_cost(config) + self.reproduction_buffer(config)
    }

    /// Food items within sight range. Linear scan, squared distances, no
    /// occlusion.
    pub fn visible_food<'a>(&self, foods: &'a [Food], config: &AnimalConfig) -> Vec<&'a Food> {
        let range_squared = self.sight_range(config).powi(2);
        foods
            .iter()
            .filter(|food| Vec2::distance_squared(self.position, food.position) <= range_squared)
            .collect()
    }

    /// Other animals within sight range. Scans whatever collection the
    /// caller provides; the caller filters itself out if it wants to.
    pub fn visible_animals<'a>(
        &self,
        animals: &'a [Animal],
        config: &AnimalConfig,
    ) -> Vec<&'a Animal> {
        let range = self.sight_range(config);
        animals
            .iter()
            .filter(|other| Vec2::distance(self.position, other.position) <= range)
            .collect()
    }

    /// Nearest uneaten food by Euclidean distance; the first seen wins
    /// exact ties. Returns the target's id and position.
    pub fn choose_food(&self, foods: &[&Food]) -> Option<(u64, Vec2)> {
        let mut closest: Option<(u64, Vec2)> = None;
        let mut closest_distance = f64::INFINITY;

        for food in foods {
            if food.eaten {
                continue;
            }
            let distance = Vec2::distance(self.position, food.position);
            if distance < closest_distance {
                closest = Some((food.id, food.position));
                closest_distance = distance;
            }
        }

        closest
    }

    pub fn eat(&mut self, food: &mut Food) {
        food.eaten = true;
        self.energy += food.energy;
    }

    pub fn die(&mut self, cause: DeathCause) {
        self.alive = false;
        self.reason_for_death = Some(cause);
    }

    pub(crate) fn random_position_in_sight(
        &self,
        rng: &mut impl Rng,
        config: &AnimalConfig,
    ) -> Vec2 {
        random::random_point_in_disk(rng, self.position, self.sight_range(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_animal(config: &Config) -> Animal {
        let mut rng = rand::thread_rng();
        Animal::new(
            1,
            Vec2::ZERO,
            config.world.initial_animal_energy,
            AnimalTraits::base(),
            0,
            &config.animal,
            &mut rng,
        )
    }

    #[test]
    fn test_newborn_state() {
        let config = Config::default();
        let animal = test_animal(&config);

        assert!(animal.alive);
        assert_eq!(animal.current_action, AnimalAction::Wandering);
        assert_eq!(animal.reason_for_death, None);
        assert_eq!(animal.generation, 0);
        // maturity and old-age schedules registered at birth
        assert_eq!(animal.age.schedule_count(), 2);
        assert!(names::ANIMAL_NAMES.contains(&animal.name));
    }

    #[test]
    fn test_energetics_formulas() {
        let config = Config::default();
        let animal = test_animal(&config);

        assert_eq!(animal.sight_range(&config.animal), 50.0);
        assert!((animal.movement_energy_cost(&config.animal) - 0.15).abs() < 1e-12);
        assert!((animal.metabolism(&config.animal) - 0.1).abs() < 1e-12);
        assert_eq!(animal.offspring_starting_energy(&config.animal), 50.0);
        assert_eq!(animal.reproduction_cost(&config.animal), 150.0);
        assert_eq!(animal.reproduction_buffer(&config.animal), 30.0);
        assert_eq!(animal.energy_required_for_reproduction(&config.animal), 180.0);
    }

    #[test]
    fn test_visible_food_respects_sight_range() {
        // sense trait 1 with sense effect 50 gives a 50 unit sight radius
        let config = Config::default();
        let animal = test_animal(&config);

        let near = Food::new(1, Vec2::new(49.0, 0.0), 20.0);
        let far = Food::new(2, Vec2::new(51.0, 0.0), 20.0);
        let foods = vec![near, far];

        let visible = animal.visible_food(&foods, &config.animal);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn test_visible_animals_respects_sight_range() {
        let config = Config::default();
        let observer = test_animal(&config);

        let mut near = test_animal(&config);
        near.position = Vec2::new(0.0, 30.0);
        let mut far = test_animal(&config);
        far.position = Vec2::new(0.0, 80.0);
        let others = vec![near, far];

        let visible = observer.visible_animals(&others, &config.animal);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].position, Vec2::new(0.0, 30.0));
    }

    #[test]
    fn test_choose_food_picks_nearest_uneaten() {
        let config = Config::default();
        let animal = test_animal(&config);

        let mut near = Food::new(1, Vec2::new(10.0, 0.0), 20.0);
        near.eaten = true;
        let mid = Food::new(2, Vec2::new(20.0, 0.0), 20.0);
        let far = Food::new(3, Vec2::new(30.0, 0.0), 20.0);

        let foods = [&near, &mid, &far];
        let (id, position) = animal.choose_food(&foods).unwrap();
        assert_eq!(id, 2);
        assert_eq!(position, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_choose_food_first_seen_wins_ties() {
        let config = Config::default();
        let animal = test_animal(&config);

        let a = Food::new(7, Vec2::new(15.0, 0.0), 20.0);
        let b = Food::new(8, Vec2::new(0.0, 15.0), 20.0);

        let (id, _) = animal.choose_food(&[&a, &b]).unwrap();
        assert_eq!(id, 7);
    }

    #[test]
    fn test_eat_marks_food_and_transfers_energy() {
        let config = Config::default();
        let mut animal = test_animal(&config);
        let mut food = Food::new(1, Vec2::ZERO, 20.0);

        animal.eat(&mut food);
        assert!(food.eaten);
        assert_eq!(animal.energy, 120.0);
    }
}
