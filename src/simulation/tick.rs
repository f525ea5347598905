use super::{SimulationState, WorldEvent};
use crate::animal::Animal;
use crate::error::SimError;

/// What a completed tick left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// The population reached zero; the driver must stop ticking.
    Extinct,
}

impl SimulationState {
    /// Advance the world by one tick: update every agent that was alive at
    /// the start of the tick, advance the world clock (feeding and data
    /// collection fire from here), then purge eaten food and dead agents.
    ///
    /// Agents are traversed by an index range fixed before the pass, and
    /// newborns are merged in afterwards, so mid-tick reproduction can
    /// never skip or double-visit an agent.
    pub fn tick(&mut self) -> Result<TickOutcome, SimError> {
        let mut rng = rand::thread_rng();

        let population_at_start = self.animals.len();
        let mut newborns: Vec<Animal> = Vec::new();
        {
            let Self {
                animals,
                foods,
                next_animal_id,
                config,
                ..
            } = self;

            for index in 0..population_at_start {
                if !animals[index].alive {
                    continue;
                }
                if let Some(offspring) =
                    animals[index].update(foods, next_animal_id, config, &mut rng)?
                {
                    newborns.push(offspring);
                }
            }
        }
        self.total_births += newborns.len() as u64;
        self.animals.append(&mut newborns);

        for event in self.time.tick() {
            match event {
                WorldEvent::FeedingCycle => {
                    let amount = self.config.world.food_per_feeding_cycle;
                    self.spawn_food(amount, &mut rng);
                }
                WorldEvent::CollectSample => self.collect_sample(),
            }
        }

        self.foods.retain(|food| !food.eaten);
        let before = self.animals.len();
        self.animals.retain(|animal| animal.alive);
        self.total_deaths += (before - self.animals.len()) as u64;

        if self.animals.is_empty() {
            Ok(TickOutcome::Extinct)
        } else {
            Ok(TickOutcome::Running)
        }
    }
}
