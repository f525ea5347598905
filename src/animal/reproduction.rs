use super::Animal;
use crate::config::Config;
use rand::Rng;

impl Animal {
    /// Produce one offspring at the parent's position. The parent pays the
    /// full reproduction cost; the offspring starts with the parent's
    /// offspring-investment energy, the next generation number and
    /// independently mutated traits. The caller owns merging the newborn
    /// into the population.
    pub fn reproduce(&mut self, next_id: &mut u64, config: &Config, rng: &mut impl Rng) -> Animal {
        self.energy -= self.reproduction_cost(&config.animal);

        let traits = self.traits.mutated(
            config.world.mutation_chance,
            config.world.mutation_severity,
            rng,
        );

        let id = *next_id;
        *next_id += 1;

        let offspring = Animal::new(
            id,
            self.position,
            self.offspring_starting_energy(&config.animal),
            traits,
            self.generation + 1,
            &config.animal,
            rng,
        );

        self.offspring_ids.push(id);
        self.offspring_count += 1;

        offspring
    }
}
