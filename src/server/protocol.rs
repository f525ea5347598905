use crate::animal::traits::AnimalTraits;
use crate::animal::{Animal, AnimalAction};
use crate::config::{AnimalConfig, SettingsPatch};
use crate::simulation::{AverageAnimal, SimulationState};
use crate::stats::{SimulationMetrics, SimulationSample};
use crate::world::food::Food;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "update")]
    Update {
        metrics: SimulationMetrics,
        animals: Vec<AnimalSnapshot>,
    },
    #[serde(rename = "full_state")]
    FullState {
        metrics: SimulationMetrics,
        world_radius: f64,
        paused: bool,
        ticks_per_second: u64,
        animals: Vec<AnimalSnapshot>,
        foods: Vec<FoodSnapshot>,
        average_animal: Option<AverageAnimal>,
    },
    #[serde(rename = "samples")]
    Samples { samples: Vec<SimulationSample> },
    #[serde(rename = "notice")]
    Notice { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "get_state")]
    GetState,
    #[serde(rename = "get_samples")]
    GetSamples,
    #[serde(rename = "pause")]
    Pause,
    #[serde(rename = "resume")]
    Resume,
    #[serde(rename = "reset")]
    Reset,
    #[serde(rename = "set_tick_rate")]
    SetTickRate { ticks_per_second: u64 },
    #[serde(rename = "update_settings")]
    UpdateSettings { settings: SettingsPatch },
}

/// Everything the viewer needs to draw and label one animal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalSnapshot {
    pub id: u64,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub energy: f64,
    pub age_ticks: u64,
    pub generation: u32,
    pub offspring_count: u32,
    pub action: AnimalAction,
    pub sight_range: f64,
    pub traits: AnimalTraits,
}

impl AnimalSnapshot {
    pub fn from_animal(animal: &Animal, config: &AnimalConfig) -> Self {
        Self {
            id: animal.id,
            name: animal.name.to_string(),
            x: animal.position.x,
            y: animal.position.y,
            energy: animal.energy,
            age_ticks: animal.age_ticks(),
            generation: animal.generation,
            offspring_count: animal.offspring_count,
            action: animal.current_action,
            sight_range: animal.sight_range(config),
            traits: animal.traits,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSnapshot {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub energy: f64,
}

impl From<&Food> for FoodSnapshot {
    fn from(food: &Food) -> Self {
        Self {
            id: food.id,
            x: food.position.x,
            y: food.position.y,
            energy: food.energy,
        }
    }
}

impl ServerMessage {
    pub fn update(state: &SimulationState) -> Self {
        let animals = state
            .animals
            .iter()
            .filter(|a| a.alive)
            .map(|a| AnimalSnapshot::from_animal(a, &state.config.animal))
            .collect();

        ServerMessage::Update {
            metrics: state.metrics(),
            animals,
        }
    }

    pub fn full_state(state: &SimulationState, paused: bool, ticks_per_second: u64) -> Self {
        let animals = state
            .animals
            .iter()
            .filter(|a| a.alive)
            .map(|a| AnimalSnapshot::from_animal(a, &state.config.animal))
            .collect();
        let foods = state
            .foods
            .iter()
            .filter(|f| !f.eaten)
            .map(FoodSnapshot::from)
            .collect();

        ServerMessage::FullState {
            metrics: state.metrics(),
            world_radius: state.config.world.world_radius,
            paused,
            ticks_per_second,
            animals,
            foods,
            average_animal: state.average_animal(),
        }
    }
}
