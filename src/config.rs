use crate::animal::traits::AnimalTraits;
use crate::error::SimError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub animal: AnimalConfig,
    pub simulation: SimulationConfig,
    pub data: DataConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub initial_population: usize,
    pub world_radius: f64,
    pub mutation_chance: f64,
    pub mutation_severity: f64,
    pub food_per_feeding_cycle: usize,
    pub feeding_cycle_length: u32,
    pub maximum_food: usize,
    pub food_energy_value: f64,
    pub initial_animal_energy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalConfig {
    /// Multipliers turning a raw trait value into its effect (sight range,
    /// travel distance, buffer size, offspring energy).
    pub trait_effects: AnimalTraits,
    pub energy_costs: EnergyCostConfig,
    pub maximum_age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyCostConfig {
    pub speed: f64,
    pub sense: f64,
    pub base_reproduction_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub ticks_per_second: u64,
    pub log_interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub collect: bool,
    pub sample_interval_ticks: u32,
    pub record_trait_distribution: bool,
    pub export_directory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub enabled: bool,
    pub address: String,
    pub port: u16,
    pub update_rate_hz: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                initial_population: 20,
                world_radius: 350.0,
                mutation_chance: 1.0,
                mutation_severity: 0.1,
                food_per_feeding_cycle: 300,
                feeding_cycle_length: 100,
                maximum_food: 1000,
                food_energy_value: 20.0,
                initial_animal_energy: 100.0,
            },
            animal: AnimalConfig {
                trait_effects: AnimalTraits {
                    speed: 3.0,
                    sense: 50.0,
                    reproductive_buffer: 30.0,
                    offspring_investment: 50.0,
                },
                energy_costs: EnergyCostConfig {
                    speed: 0.1,
                    sense: 0.1,
                    base_reproduction_cost: 100.0,
                },
                maximum_age: 3000,
            },
            simulation: SimulationConfig {
                ticks_per_second: 60,
                log_interval_seconds: 10,
            },
            data: DataConfig {
                collect: true,
                sample_interval_ticks: 25,
                record_trait_distribution: false,
                export_directory: "data".to_string(),
            },
            server: ServerConfig {
                enabled: true,
                address: "0.0.0.0".to_string(),
                port: 8080,
                update_rate_hz: 10,
            },
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SimError> {
        fn require(ok: bool, message: &str) -> Result<(), SimError> {
            if ok {
                Ok(())
            } else {
                Err(SimError::InvalidArgument(message.to_string()))
            }
        }

        require(self.world.initial_population > 0, "initial_population must be positive")?;
        require(self.world.world_radius > 0.0, "world_radius must be positive")?;
        require(
            (0.0..=1.0).contains(&self.world.mutation_chance),
            "mutation_chance must be in the range [0,1]",
        )?;
        require(self.world.mutation_severity >= 0.0, "mutation_severity must not be negative")?;
        require(self.world.feeding_cycle_length > 0, "feeding_cycle_length must be positive")?;
        require(self.world.food_energy_value >= 0.0, "food_energy_value must not be negative")?;
        require(
            self.world.initial_animal_energy > 0.0,
            "initial_animal_energy must be positive",
        )?;

        require(self.animal.maximum_age > 0, "maximum_age must be positive")?;
        require(self.animal.trait_effects.speed > 0.0, "speed effect must be positive")?;
        require(self.animal.trait_effects.sense > 0.0, "sense effect must be positive")?;
        require(
            self.animal.trait_effects.reproductive_buffer > 0.0,
            "reproductive_buffer effect must be positive",
        )?;
        require(
            self.animal.trait_effects.offspring_investment > 0.0,
            "offspring_investment effect must be positive",
        )?;
        require(self.animal.energy_costs.speed >= 0.0, "speed cost must not be negative")?;
        require(self.animal.energy_costs.sense >= 0.0, "sense cost must not be negative")?;
        require(
            self.animal.energy_costs.base_reproduction_cost >= 0.0,
            "base_reproduction_cost must not be negative",
        )?;

        require(self.simulation.ticks_per_second > 0, "ticks_per_second must be positive")?;
        require(self.data.sample_interval_ticks > 0, "sample_interval_ticks must be positive")?;
        require(self.server.update_rate_hz > 0, "update_rate_hz must be positive")?;

        Ok(())
    }

    /// Merge a partial settings update. Every field is validated against the
    /// merged result before anything is accepted; an invalid patch leaves
    /// the configuration untouched.
    pub fn apply_patch(&mut self, patch: &SettingsPatch) -> Result<(), SimError> {
        let mut candidate = self.clone();

        if let Some(value) = patch.initial_population {
            candidate.world.initial_population = value;
        }
        if let Some(value) = patch.world_radius {
            candidate.world.world_radius = value;
        }
        if let Some(value) = patch.mutation_chance {
            candidate.world.mutation_chance = value;
        }
        if let Some(value) = patch.mutation_severity {
            candidate.world.mutation_severity = value;
        }
        if let Some(value) = patch.food_per_feeding_cycle {
            candidate.world.food_per_feeding_cycle = value;
        }
        if let Some(value) = patch.feeding_cycle_length {
            candidate.world.feeding_cycle_length = value;
        }
        if let Some(value) = patch.maximum_food {
            candidate.world.maximum_food = value;
        }
        if let Some(value) = patch.food_energy_value {
            candidate.world.food_energy_value = value;
        }
        if let Some(value) = patch.maximum_age {
            candidate.animal.maximum_age = value;
        }
        if let Some(value) = patch.speed_effect {
            candidate.animal.trait_effects.speed = value;
        }
        if let Some(value) = patch.sense_effect {
            candidate.animal.trait_effects.sense = value;
        }
        if let Some(value) = patch.reproductive_buffer_effect {
            candidate.animal.trait_effects.reproductive_buffer = value;
        }
        if let Some(value) = patch.offspring_investment_effect {
            candidate.animal.trait_effects.offspring_investment = value;
        }
        if let Some(value) = patch.speed_cost {
            candidate.animal.energy_costs.speed = value;
        }
        if let Some(value) = patch.sense_cost {
            candidate.animal.energy_costs.sense = value;
        }
        if let Some(value) = patch.base_reproduction_cost {
            candidate.animal.energy_costs.base_reproduction_cost = value;
        }

        candidate.validate()?;
        *self = candidate;
        Ok(())
    }
}

/// Partial update to the live-tunable settings, produced by the UI layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub initial_population: Option<usize>,
    pub world_radius: Option<f64>,
    pub mutation_chance: Option<f64>,
    pub mutation_severity: Option<f64>,
    pub food_per_feeding_cycle: Option<usize>,
    pub feeding_cycle_length: Option<u32>,
    pub maximum_food: Option<usize>,
    pub food_energy_value: Option<f64>,
    pub maximum_age: Option<u32>,
    pub speed_effect: Option<f64>,
    pub sense_effect: Option<f64>,
    pub reproductive_buffer_effect: Option<f64>,
    pub offspring_investment_effect: Option<f64>,
    pub speed_cost: Option<f64>,
    pub sense_cost: Option<f64>,
    pub base_reproduction_cost: Option<f64>,
}
