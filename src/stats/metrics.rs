use crate::animal::traits::AnimalTraits;
use crate::animal::Animal;
use crate::simulation::clock::TICKS_PER_CYCLE;
use serde::{Deserialize, Serialize};

/// Aggregate snapshot of the live population, for logging and the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub total_ticks: u64,
    pub cycles: u64,
    pub population: usize,
    pub total_energy: f64,
    pub avg_energy: f64,
    pub avg_age: f64,
    pub avg_generation: f64,
    pub max_generation: u32,
    pub average_traits: Option<AnimalTraits>,
    pub food_count: usize,
    pub total_births: u64,
    pub total_deaths: u64,
}

impl SimulationMetrics {
    pub fn compute(
        total_ticks: u64,
        animals: &[Animal],
        food_count: usize,
        total_births: u64,
        total_deaths: u64,
    ) -> Self {
        let population = animals.len();

        if population == 0 {
            return Self {
                total_ticks,
                cycles: total_ticks / TICKS_PER_CYCLE as u64,
                population: 0,
                total_energy: 0.0,
                avg_energy: 0.0,
                avg_age: 0.0,
                avg_generation: 0.0,
                max_generation: 0,
                average_traits: None,
                food_count,
                total_births,
                total_deaths,
            };
        }

        let n = population as f64;
        let total_energy: f64 = animals.iter().map(|a| a.energy).sum();
        let total_age: u64 = animals.iter().map(|a| a.age_ticks()).sum();
        let total_generation: u64 = animals.iter().map(|a| a.generation as u64).sum();
        let max_generation = animals.iter().map(|a| a.generation).max().unwrap_or(0);

        Self {
            total_ticks,
            cycles: total_ticks / TICKS_PER_CYCLE as u64,
            population,
            total_energy,
            avg_energy: total_energy / n,
            avg_age: total_age as f64 / n,
            avg_generation: total_generation as f64 / n,
            max_generation,
            average_traits: AnimalTraits::average(animals.iter().map(|a| a.traits)),
            food_count,
            total_births,
            total_deaths,
        }
    }
}
