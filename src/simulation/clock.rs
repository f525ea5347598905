use crate::error::SimError;

/// Ticks per cycle. The tick index wraps at this value and increments the
/// cycle counter.
pub const TICKS_PER_CYCLE: u32 = 100;

/// Stable handle for a registered schedule. Ids stay valid until the
/// schedule is canceled or (for one-shots) expires; slots freed by
/// cancellation are reused before the registry grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId(usize);

impl ScheduleId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Schedule<E> {
    event: E,
    interval: u32,
    ticks_since_fired: u32,
    times_fired: u32,
    repeating: bool,
}

impl<E> Schedule<E> {
    fn new(event: E, interval: u32, repeating: bool) -> Self {
        Self {
            event,
            interval,
            ticks_since_fired: 0,
            times_fired: 0,
            repeating,
        }
    }
}

/// Discrete tick counter with a registry of timed events.
///
/// Each schedule carries a cloneable event payload; `tick` advances every
/// registered schedule by one unit and returns the payloads of those that
/// fired, in registration-slot order, for the owner to dispatch. One-shot
/// schedules are removed after the advancement pass, so a schedule that
/// fires on tick N is still present while N's schedules are walked and
/// gone before tick N+1.
#[derive(Debug, Clone)]
pub struct SimulationTime<E> {
    ticks: u32,
    cycles: u64,
    slots: Vec<Option<Schedule<E>>>,
    free: Vec<usize>,
}

impl<E: Clone> SimulationTime<E> {
    pub fn zero() -> Self {
        Self {
            ticks: 0,
            cycles: 0,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Construct directly from a tick index and cycle count. The tick index
    /// must be a valid in-cycle position.
    pub fn new(ticks: u32, cycles: u64) -> Result<Self, SimError> {
        if ticks >= TICKS_PER_CYCLE {
            return Err(SimError::InvalidArgument(format!(
                "ticks must be in the range [0,{}), got {ticks}",
                TICKS_PER_CYCLE
            )));
        }
        let mut time = Self::zero();
        time.ticks = ticks;
        time.cycles = cycles;
        Ok(time)
    }

    /// Construct from a total tick count, normalizing into ticks and cycles.
    pub fn from_total_ticks(total: u64) -> Self {
        let mut time = Self::zero();
        time.ticks = (total % TICKS_PER_CYCLE as u64) as u32;
        time.cycles = total / TICKS_PER_CYCLE as u64;
        time
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn total_ticks(&self) -> u64 {
        self.ticks as u64 + TICKS_PER_CYCLE as u64 * self.cycles
    }

    /// Advance time by one tick and return the events whose schedules fired.
    pub fn tick(&mut self) -> Vec<E> {
        self.ticks += 1;
        if self.ticks == TICKS_PER_CYCLE {
            self.ticks = 0;
            self.cycles += 1;
        }

        let mut fired = Vec::new();
        for slot in &mut self.slots {
            if let Some(schedule) = slot {
                schedule.ticks_since_fired += 1;
                if schedule.ticks_since_fired == schedule.interval {
                    schedule.ticks_since_fired = 0;
                    schedule.times_fired += 1;
                    fired.push(schedule.event.clone());
                }
            }
        }

        // One-shots that have fired are deregistered only now, after the
        // advancement pass over every slot.
        for index in 0..self.slots.len() {
            let expired = matches!(
                &self.slots[index],
                Some(schedule) if !schedule.repeating && schedule.times_fired >= 1
            );
            if expired {
                self.slots[index] = None;
                self.free.push(index);
            }
        }

        fired
    }

    /// Register an event fired every `interval` ticks, indefinitely.
    pub fn schedule_repeating(&mut self, event: E, interval: u32) -> ScheduleId {
        assert!(interval > 0, "schedule interval must be at least one tick");
        self.insert(Schedule::new(event, interval, true))
    }

    /// Register an event fired exactly once, `delay` ticks from now.
    pub fn schedule_once(&mut self, event: E, delay: u32) -> ScheduleId {
        assert!(delay > 0, "schedule delay must be at least one tick");
        self.insert(Schedule::new(event, delay, false))
    }

    fn insert(&mut self, schedule: Schedule<E>) -> ScheduleId {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(schedule);
            ScheduleId(index)
        } else {
            self.slots.push(Some(schedule));
            ScheduleId(self.slots.len() - 1)
        }
    }

    /// Remove a schedule. The slot is tombstoned and queued for reuse, so
    /// cancellation never disturbs the ids of other schedules.
    pub fn cancel(&mut self, id: ScheduleId) -> Result<(), SimError> {
        match self.slots.get_mut(id.0) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                self.free.push(id.0);
                Ok(())
            }
            _ => Err(SimError::ScheduleNotFound(id.0)),
        }
    }

    /// Zero the tick and cycle counters without touching the schedules.
    pub fn reset(&mut self) {
        self.ticks = 0;
        self.cycles = 0;
    }

    /// Remove every schedule.
    pub fn clear_all(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    pub fn schedule_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
