use crate::animal::traits::AnimalTraits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One periodic snapshot of aggregate statistics. The field shape must
/// round-trip exactly through serialize/deserialize: the offline charting
/// tool re-ingests the exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSample {
    pub total_ticks: u64,
    pub ticks: u32,
    pub cycles: u64,
    pub average_traits: Option<AnimalTraits>,
    pub population_size: usize,
    pub food_count: usize,
    /// Full per-agent trait list, recorded only when the histogram view is
    /// enabled in the data settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_animal_traits: Option<Vec<AnimalTraits>>,
}

/// Ever-growing, ordered series of samples, exported as a single JSON array
/// document.
#[derive(Debug, Clone, Default)]
pub struct DataCollector {
    samples: Vec<SimulationSample>,
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sample: SimulationSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[SimulationSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.samples)
    }

    /// Write the series to a timestamped file in `directory`, creating the
    /// directory if needed. Returns the path written.
    pub fn write_to_dir(&self, directory: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dir = Path::new(directory);
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }

        let now = chrono::Utc::now();
        let filename = format!("simulation_data_{}.json", now.format("%Y-%m-%d_%H-%M-%S"));
        let path = dir.join(filename);

        std::fs::write(&path, self.to_json()?)?;
        log::info!("Exported {} samples to {:?}", self.samples.len(), path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(total_ticks: u64) -> SimulationSample {
        SimulationSample {
            total_ticks,
            ticks: (total_ticks % 100) as u32,
            cycles: total_ticks / 100,
            average_traits: Some(AnimalTraits::base()),
            population_size: 20,
            food_count: 300,
            all_animal_traits: None,
        }
    }

    #[test]
    fn test_series_stays_ordered() {
        let mut collector = DataCollector::new();
        collector.record(sample(25));
        collector.record(sample(50));
        collector.record(sample(75));

        let ticks: Vec<u64> = collector.samples().iter().map(|s| s.total_ticks).collect();
        assert_eq!(ticks, vec![25, 50, 75]);
    }

    #[test]
    fn test_json_round_trip() {
        let mut collector = DataCollector::new();
        collector.record(sample(125));
        let mut with_distribution = sample(150);
        with_distribution.all_animal_traits = Some(vec![AnimalTraits::base()]);
        collector.record(with_distribution);

        let json = collector.to_json().unwrap();
        let parsed: Vec<SimulationSample> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, collector.samples());
    }

    #[test]
    fn test_empty_series_exports_as_empty_array() {
        let collector = DataCollector::new();
        assert_eq!(collector.to_json().unwrap(), "[]");
    }

    #[test]
    fn test_write_to_dir() {
        let mut collector = DataCollector::new();
        collector.record(sample(25));

        let path = collector.write_to_dir("test_data_export_temp").unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<SimulationSample> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 1);

        let _ = std::fs::remove_dir_all("test_data_export_temp");
    }
}
