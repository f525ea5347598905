use super::{AgeEvent, Animal, AnimalAction, DeathCause, ANIMAL_RADIUS};
use crate::config::{AnimalConfig, Config};
use crate::error::SimError;
use crate::geometry::Vec2;
use crate::random;
use crate::world::food::{Food, FOOD_RADIUS};
use rand::Rng;

/// Chance per wandering tick of picking a fresh move target even though the
/// current one has not been reached.
pub const WANDER_RETARGET_CHANCE: f64 = 0.01;

impl Animal {
    /// One behavior step. Runs the state machine, advances the agent's age
    /// clock, attempts reproduction, pays metabolic upkeep and applies the
    /// starvation check. Returns the offspring, if one was produced, for
    /// the caller to merge into the population after its traversal.
    pub fn update(
        &mut self,
        foods: &mut [Food],
        next_id: &mut u64,
        config: &Config,
        rng: &mut impl Rng,
    ) -> Result<Option<Animal>, SimError> {
        if !self.alive {
            return Err(SimError::InvalidState(
                "tried to update a dead animal".to_string(),
            ));
        }

        if self.current_action == AnimalAction::Deciding {
            self.decide_on_action();
        }
        match self.current_action {
            AnimalAction::SearchingForFood => self.search_for_food(foods, config, rng)?,
            AnimalAction::MovingTowardsFood => self.move_towards_food(foods, &config.animal),
            AnimalAction::Wandering => self.wander(foods, config, rng)?,
            AnimalAction::Deciding => {}
        }

        for event in self.age.tick() {
            match event {
                AgeEvent::Matured => self.current_action = AnimalAction::Deciding,
                AgeEvent::MaxAgeReached => self.die(DeathCause::OldAge),
            }
        }
        // An agent that just died of old age takes no further part in the
        // tick; its reason for death stands.
        if !self.alive {
            return Ok(None);
        }

        let offspring = if self.energy >= self.energy_required_for_reproduction(&config.animal) {
            Some(self.reproduce(next_id, config, rng))
        } else {
            None
        };

        self.energy -= self.metabolism(&config.animal);
        if self.energy <= 0.0 {
            self.die(DeathCause::Starvation);
        }

        Ok(offspring)
    }

    fn decide_on_action(&mut self) {
        self.current_action = AnimalAction::SearchingForFood;
    }

    fn search_for_food(
        &mut self,
        foods: &mut [Food],
        config: &Config,
        rng: &mut impl Rng,
    ) -> Result<(), SimError> {
        let target = self.choose_food(&self.visible_food(foods, &config.animal));
        match target {
            None => {
                self.current_action = AnimalAction::Wandering;
                self.wander(foods, config, rng)?;
            }
            Some((id, position)) => {
                self.current_action = AnimalAction::MovingTowardsFood;
                self.target_food = Some(id);
                self.move_target = Some(position);
            }
        }
        Ok(())
    }

    fn move_towards_food(&mut self, foods: &mut [Food], config: &AnimalConfig) {
        let Some(target_id) = self.target_food else {
            self.current_action = AnimalAction::Deciding;
            return;
        };

        // The target may have been eaten by a competitor earlier this tick,
        // or already purged.
        let Some(food) = foods.iter_mut().find(|food| food.id == target_id) else {
            self.target_food = None;
            self.current_action = AnimalAction::Deciding;
            return;
        };
        if food.eaten {
            self.target_food = None;
            self.current_action = AnimalAction::Deciding;
            return;
        }

        if Vec2::distance(self.position, food.position) <= ANIMAL_RADIUS + FOOD_RADIUS {
            self.eat(food);
            self.target_food = None;
            self.current_action = AnimalAction::Deciding;
        }

        self.move_step(config);
    }

    fn wander(
        &mut self,
        foods: &mut [Food],
        config: &Config,
        rng: &mut impl Rng,
    ) -> Result<(), SimError> {
        // Anything edible coming into sight interrupts the stroll.
        if let Some((id, position)) = self.choose_food(&self.visible_food(foods, &config.animal)) {
            self.current_action = AnimalAction::MovingTowardsFood;
            self.target_food = Some(id);
            self.move_target = Some(position);
            return Ok(());
        }

        if random::random_chance(rng, WANDER_RETARGET_CHANCE)? || self.move_target.is_none() {
            self.move_target = Some(self.random_position_in_sight(rng, &config.animal));
        }
        self.move_step(&config.animal);

        if self.position.length() > config.world.world_radius {
            let inward = Vec2::direction(self.position, Vec2::ZERO);
            self.move_target = Some(self.position + inward * self.sight_range(&config.animal));
        }
        Ok(())
    }

    /// Advance toward the current move target. Travel is capped at the
    /// speed-derived per-tick maximum; a shorter final hop pays a
    /// proportionally smaller energy cost so the agent neither overshoots
    /// nor gets overcharged.
    pub(crate) fn move_step(&mut self, config: &AnimalConfig) {
        let Some(target) = self.move_target else {
            return;
        };

        let target_vector = target - self.position;
        let distance = target_vector.length();
        if distance == 0.0 {
            self.move_target = None;
            return;
        }

        let direction = target_vector.normalized();
        let max_distance = self.traits.speed * config.trait_effects.speed;

        if distance > max_distance {
            self.position = self.position + direction * max_distance;
            self.energy -= self.movement_energy_cost(config);
        } else {
            self.position = self.position + direction * distance;
            self.energy -= self.movement_energy_cost(config) * (distance / max_distance);
        }
    }
}
