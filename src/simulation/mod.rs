pub mod clock;
pub mod tick;

use crate::animal::traits::AnimalTraits;
use crate::animal::Animal;
use crate::config::{Config, SettingsPatch};
use crate::error::SimError;
use crate::geometry::Vec2;
use crate::stats::collector::{DataCollector, SimulationSample};
use crate::stats::metrics::SimulationMetrics;
use crate::world::food::Food;
use crate::world::Arena;
use clock::{ScheduleId, SimulationTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Events fired by the world clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    FeedingCycle,
    CollectSample,
}

/// The world: owns the animal and food collections, the world clock and the
/// collected statistics. Mutated only from `tick`; external readers treat
/// it as an immutable snapshot between ticks.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub config: Config,
    pub arena: Arena,
    pub animals: Vec<Animal>,
    pub foods: Vec<Food>,
    pub time: SimulationTime<WorldEvent>,
    pub collector: DataCollector,
    pub total_births: u64,
    pub total_deaths: u64,
    next_animal_id: u64,
    next_food_id: u64,
    feeding_schedule: ScheduleId,
    sampling_schedule: Option<ScheduleId>,
}

impl SimulationState {
    pub fn new(config: &Config) -> Self {
        let mut time = SimulationTime::zero();
        let feeding_schedule =
            time.schedule_repeating(WorldEvent::FeedingCycle, config.world.feeding_cycle_length);
        let sampling_schedule = config.data.collect.then(|| {
            time.schedule_repeating(WorldEvent::CollectSample, config.data.sample_interval_ticks)
        });

        let mut state = Self {
            config: config.clone(),
            arena: Arena::new(config.world.world_radius),
            animals: Vec::new(),
            foods: Vec::new(),
            time,
            collector: DataCollector::new(),
            total_births: 0,
            total_deaths: 0,
            next_animal_id: 0,
            next_food_id: 0,
            feeding_schedule,
            sampling_schedule,
        };

        let mut rng = rand::thread_rng();
        state.spawn_animals(config.world.initial_population, &mut rng);
        state.spawn_food(config.world.food_per_feeding_cycle, &mut rng);
        state
    }

    fn spawn_animals(&mut self, amount: usize, rng: &mut impl Rng) {
        for _ in 0..amount {
            let animal = Animal::new(
                self.next_animal_id,
                self.arena.random_position(rng),
                self.config.world.initial_animal_energy,
                AnimalTraits::base(),
                0,
                &self.config.animal,
                rng,
            );
            self.next_animal_id += 1;
            self.animals.push(animal);
        }
    }

    /// Inject food at uniformly random world positions, respecting the
    /// standing cap.
    pub(crate) fn spawn_food(&mut self, amount: usize, rng: &mut impl Rng) {
        for _ in 0..amount {
            if self.foods.len() >= self.config.world.maximum_food {
                break;
            }
            let food = Food::new(
                self.next_food_id,
                self.arena.random_position(rng),
                self.config.world.food_energy_value,
            );
            self.next_food_id += 1;
            self.foods.push(food);
        }
    }

    pub(crate) fn collect_sample(&mut self) {
        let sample = SimulationSample {
            total_ticks: self.time.total_ticks(),
            ticks: self.time.ticks(),
            cycles: self.time.cycles(),
            average_traits: self.average_traits(),
            population_size: self.animals.iter().filter(|a| a.alive).count(),
            food_count: self.foods.iter().filter(|f| !f.eaten).count(),
            all_animal_traits: self.config.data.record_trait_distribution.then(|| {
                self.animals
                    .iter()
                    .filter(|a| a.alive)
                    .map(|a| a.traits)
                    .collect()
            }),
        };
        self.collector.record(sample);
    }

    pub fn metrics(&self) -> SimulationMetrics {
        SimulationMetrics::compute(
            self.time.total_ticks(),
            &self.animals,
            self.foods.iter().filter(|f| !f.eaten).count(),
            self.total_births,
            self.total_deaths,
        )
    }

    /// Arithmetic mean of every trait over the live population; `None` when
    /// the population is empty.
    pub fn average_traits(&self) -> Option<AnimalTraits> {
        AnimalTraits::average(
            self.animals
                .iter()
                .filter(|a| a.alive)
                .map(|a| a.traits),
        )
    }

    /// Synthetic agent built from population-wide averages. Display only;
    /// never participates in the simulation.
    pub fn average_animal(&self) -> Option<AverageAnimal> {
        let alive: Vec<&Animal> = self.animals.iter().filter(|a| a.alive).collect();
        if alive.is_empty() {
            return None;
        }

        let n = alive.len() as f64;
        let traits = AnimalTraits::average(alive.iter().map(|a| a.traits))?;
        let position = alive.iter().fold(Vec2::ZERO, |acc, a| acc + a.position) * (1.0 / n);

        Some(AverageAnimal {
            position,
            energy: alive.iter().map(|a| a.energy).sum::<f64>() / n,
            age_ticks: alive.iter().map(|a| a.age_ticks() as f64).sum::<f64>() / n,
            generation: alive.iter().map(|a| a.generation as f64).sum::<f64>() / n,
            offspring_count: alive.iter().map(|a| a.offspring_count as f64).sum::<f64>() / n,
            traits,
        })
    }

    /// Merge a settings patch from the UI layer. Schedule intervals that
    /// changed are re-registered rather than mutated in place; live agents
    /// are untouched (they read the constants at use time).
    pub fn apply_settings(&mut self, patch: &SettingsPatch) -> Result<(), SimError> {
        let old_feeding_length = self.config.world.feeding_cycle_length;
        self.config.apply_patch(patch)?;
        self.arena = Arena::new(self.config.world.world_radius);

        if self.config.world.feeding_cycle_length != old_feeding_length {
            self.time.cancel(self.feeding_schedule)?;
            self.feeding_schedule = self
                .time
                .schedule_repeating(WorldEvent::FeedingCycle, self.config.world.feeding_cycle_length);
        }
        Ok(())
    }

    pub fn feeding_schedule_id(&self) -> ScheduleId {
        self.feeding_schedule
    }

    pub fn sampling_schedule_id(&self) -> Option<ScheduleId> {
        self.sampling_schedule
    }
}

/// Population-wide averages shaped like a single agent, for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AverageAnimal {
    pub position: Vec2,
    pub energy: f64,
    pub age_ticks: f64,
    pub generation: f64,
    pub offspring_count: f64,
    pub traits: AnimalTraits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_creation() {
        let config = Config::default();
        let state = SimulationState::new(&config);

        assert_eq!(state.time.total_ticks(), 0);
        assert_eq!(state.animals.len(), config.world.initial_population);
        assert_eq!(state.foods.len(), config.world.food_per_feeding_cycle);
        assert!(state.animals.iter().all(|a| a.alive));
        assert!(state
            .animals
            .iter()
            .all(|a| state.arena.contains(a.position)));
    }

    #[test]
    fn test_initial_food_respects_maximum() {
        let mut config = Config::default();
        config.world.food_per_feeding_cycle = 500;
        config.world.maximum_food = 100;

        let state = SimulationState::new(&config);
        assert_eq!(state.foods.len(), 100);
    }

    #[test]
    fn test_average_traits_of_uniform_population() {
        let config = Config::default();
        let state = SimulationState::new(&config);

        let average = state.average_traits().unwrap();
        assert_eq!(average, AnimalTraits::base());
    }

    #[test]
    fn test_average_queries_guard_empty_population() {
        let config = Config::default();
        let mut state = SimulationState::new(&config);
        state.animals.clear();

        assert!(state.average_traits().is_none());
        assert!(state.average_animal().is_none());
    }

    #[test]
    fn test_average_animal() {
        let config = Config::default();
        let mut state = SimulationState::new(&config);
        state.animals.truncate(2);
        state.animals[0].position = Vec2::new(10.0, 0.0);
        state.animals[1].position = Vec2::new(-4.0, 6.0);
        state.animals[0].energy = 80.0;
        state.animals[1].energy = 120.0;

        let average = state.average_animal().unwrap();
        assert_eq!(average.position, Vec2::new(3.0, 3.0));
        assert_eq!(average.energy, 100.0);
        assert_eq!(average.traits, AnimalTraits::base());
    }

    #[test]
    fn test_apply_settings_reregisters_feeding_schedule() {
        let mut config = Config::default();
        config.world.food_per_feeding_cycle = 5;
        config.data.collect = false;
        let mut state = SimulationState::new(&config);
        let schedules_before = state.time.schedule_count();
        // an empty world still ticks its clock; that is all this test needs
        state.animals.clear();
        state.foods.clear();

        // burn part of the default 100 tick feeding interval
        for _ in 0..5 {
            state.tick().unwrap();
        }
        assert!(state.foods.is_empty());

        let patch = SettingsPatch {
            feeding_cycle_length: Some(10),
            ..SettingsPatch::default()
        };
        state.apply_settings(&patch).unwrap();
        assert_eq!(state.config.world.feeding_cycle_length, 10);
        assert_eq!(state.time.schedule_count(), schedules_before);

        // a re-registered schedule starts its interval from scratch; one
        // mutated in place would have fired 5 ticks early
        for _ in 0..9 {
            state.tick().unwrap();
            assert!(state.foods.is_empty());
        }
        state.tick().unwrap();
        assert_eq!(state.foods.len(), 5);
    }

    #[test]
    fn test_apply_settings_without_interval_change_keeps_schedule() {
        let config = Config::default();
        let mut state = SimulationState::new(&config);
        let old_id = state.feeding_schedule_id();

        let patch = SettingsPatch {
            mutation_severity: Some(0.2),
            ..SettingsPatch::default()
        };
        state.apply_settings(&patch).unwrap();

        assert_eq!(state.feeding_schedule_id(), old_id);
        assert_eq!(state.config.world.mutation_severity, 0.2);
    }

    #[test]
    fn test_rejected_settings_leave_state_untouched() {
        let config = Config::default();
        let mut state = SimulationState::new(&config);

        let patch = SettingsPatch {
            feeding_cycle_length: Some(0),
            ..SettingsPatch::default()
        };
        assert!(state.apply_settings(&patch).is_err());
        assert_eq!(
            state.config.world.feeding_cycle_length,
            config.world.feeding_cycle_length
        );
    }
}
