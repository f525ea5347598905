use crate::error::SimError;
use crate::simulation::tick::TickOutcome;
use crate::simulation::SimulationState;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

/// Drives the world on a fixed-period timer and exposes the control
/// surface: pause, resume, reset, change tick rate.
///
/// A single `run` task is the only mutator of the shared state; the timer
/// serializes ticks and a tick that overruns its slot is skipped rather
/// than run concurrently. Changing the tick rate tears the timer down and
/// builds a new one, so two timers never run at once.
#[derive(Clone)]
pub struct SimulationRunner {
    state: Arc<RwLock<SimulationState>>,
    paused: Arc<watch::Sender<bool>>,
    tick_rate: Arc<watch::Sender<u64>>,
}

impl SimulationRunner {
    pub fn new(state: SimulationState, ticks_per_second: u64) -> Self {
        let (paused, _) = watch::channel(false);
        let (tick_rate, _) = watch::channel(ticks_per_second.max(1));

        Self {
            state: Arc::new(RwLock::new(state)),
            paused: Arc::new(paused),
            tick_rate: Arc::new(tick_rate),
        }
    }

    pub fn state(&self) -> Arc<RwLock<SimulationState>> {
        self.state.clone()
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.borrow()
    }

    pub fn tick_rate(&self) -> u64 {
        *self.tick_rate.borrow()
    }

    /// Stop ticking. Takes effect between ticks; an in-flight tick is never
    /// aborted midway.
    pub fn pause(&self) -> Result<(), SimError> {
        if *self.paused.borrow() {
            return Err(SimError::InvalidState(
                "simulation is already paused".to_string(),
            ));
        }
        self.paused.send_replace(true);
        log::info!("Simulation paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<(), SimError> {
        if !*self.paused.borrow() {
            return Err(SimError::InvalidState(
                "simulation is already running".to_string(),
            ));
        }
        self.paused.send_replace(false);
        log::info!("Simulation resumed");
        Ok(())
    }

    fn force_pause(&self) {
        self.paused.send_replace(true);
    }

    pub fn set_tick_rate(&self, ticks_per_second: u64) -> Result<(), SimError> {
        if ticks_per_second == 0 {
            return Err(SimError::InvalidArgument(
                "ticks_per_second must be positive".to_string(),
            ));
        }
        self.tick_rate.send_replace(ticks_per_second);
        log::info!("Tick rate set to {} TPS", ticks_per_second);
        Ok(())
    }

    /// Rebuild the world from its current settings: fresh clock, fresh
    /// founding population, fresh food.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        let config = state.config.clone();
        *state = SimulationState::new(&config);
        log::info!("Simulation reset");
    }

    /// The tick loop. Runs until extinction (when `exit_on_extinction` is
    /// set) and otherwise forever; on extinction the simulation auto-pauses
    /// so a connected client may still inspect or reset it.
    pub async fn run(&self, exit_on_extinction: bool) -> Result<(), SimError> {
        let mut rate_rx = self.tick_rate.subscribe();
        let log_interval = {
            let state = self.state.read().await;
            Duration::from_secs(state.config.simulation.log_interval_seconds.max(1))
        };
        let mut last_log = Instant::now();

        'rebuild: loop {
            let ticks_per_second = *rate_rx.borrow_and_update();
            let mut tick_interval =
                interval(Duration::from_secs_f64(1.0 / ticks_per_second as f64));
            tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tick_interval.tick() => {
                        if *self.paused.borrow() {
                            continue;
                        }

                        let outcome = {
                            let mut state = self.state.write().await;
                            state.tick()?
                        };

                        if last_log.elapsed() >= log_interval {
                            let state = self.state.read().await;
                            let metrics = state.metrics();
                            log::info!(
                                "Tick: {} | Population: {} | Avg Energy: {:.2} | Max Gen: {} | Food: {}",
                                metrics.total_ticks,
                                metrics.population,
                                metrics.avg_energy,
                                metrics.max_generation,
                                metrics.food_count
                            );
                            last_log = Instant::now();
                        }

                        if outcome == TickOutcome::Extinct {
                            log::warn!("Extinction: every animal has died. Pausing simulation.");
                            self.force_pause();
                            if exit_on_extinction {
                                return Ok(());
                            }
                        }
                    }
                    changed = rate_rx.changed() => {
                        if changed.is_err() {
                            return Ok(());
                        }
                        // cancel-then-restart: the old timer is dropped
                        // before the new one is built
                        continue 'rebuild;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn runner() -> SimulationRunner {
        let config = Config::default();
        SimulationRunner::new(SimulationState::new(&config), 60)
    }

    #[test]
    fn test_pause_resume_state_checks() {
        let runner = runner();
        assert!(!runner.is_paused());

        runner.pause().unwrap();
        assert!(runner.is_paused());
        assert!(matches!(runner.pause(), Err(SimError::InvalidState(_))));

        runner.resume().unwrap();
        assert!(!runner.is_paused());
        assert!(matches!(runner.resume(), Err(SimError::InvalidState(_))));
    }

    #[test]
    fn test_set_tick_rate_validation() {
        let runner = runner();

        runner.set_tick_rate(120).unwrap();
        assert_eq!(runner.tick_rate(), 120);

        assert!(matches!(
            runner.set_tick_rate(0),
            Err(SimError::InvalidArgument(_))
        ));
        assert_eq!(runner.tick_rate(), 120);
    }

    #[tokio::test]
    async fn test_reset_rebuilds_population() {
        let runner = runner();
        {
            let state = runner.state();
            let mut state = state.write().await;
            state.animals.clear();
            state.tick().unwrap();
        }

        runner.reset().await;

        let state = runner.state();
        let state = state.read().await;
        assert_eq!(state.animals.len(), state.config.world.initial_population);
        assert_eq!(state.time.total_ticks(), 0);
    }

    #[tokio::test]
    async fn test_extinction_auto_pauses_and_exits() {
        let mut config = Config::default();
        config.world.initial_population = 1;
        config.world.food_per_feeding_cycle = 0;
        config.world.maximum_food = 0;
        config.data.collect = false;
        let runner = SimulationRunner::new(SimulationState::new(&config), 500);
        {
            let state = runner.state();
            let mut state = state.write().await;
            state.animals[0].energy = 0.01;
        }

        tokio::time::timeout(Duration::from_secs(5), runner.run(true))
            .await
            .expect("run did not finish before the timeout")
            .unwrap();

        assert!(runner.is_paused());
        let state = runner.state();
        let state = state.read().await;
        assert!(state.animals.is_empty());
    }
}
