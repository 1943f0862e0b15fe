use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::thread;
use std::time::Duration;

/// Point values driving the score of a session.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Points lost on every decay tick.
    pub decay_step: f64,
    pub decay_interval_ms: u64,
    pub flag_penalty: f64,
    pub undo_penalty: f64,
}

impl ScoreConfig {
    pub const fn decay_interval(&self) -> Duration {
        Duration::from_millis(self.decay_interval_ms)
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            decay_step: 0.2,
            decay_interval_ms: 1000,
            flag_penalty: 1.0,
            undo_penalty: 5.0,
        }
    }
}

/// The only rounding rule, every change to a score goes through here.
fn remove_points(value: f64, points: f64) -> f64 {
    ((value - points).max(0.0) * 10.0).round() / 10.0
}

struct Shared {
    value: Mutex<f64>,
    config: ScoreConfig,
    _decay: Box<dyn Send + Sync>,
}

impl Shared {
    fn remove(&self, points: f64) -> f64 {
        // a poisoned lock still holds a valid number
        let mut value = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        *value = remove_points(*value, points);
        *value
    }

    fn value(&self) -> f64 {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Point counter shared by every snapshot of one game.
///
/// Cloning a `Score` yields another handle to the same counter. The decay process is armed on
/// creation and torn down when the last handle is dropped.
#[derive(Clone)]
pub struct Score {
    shared: Arc<Shared>,
}

impl Score {
    /// Creates a score decaying in real time with the default point values.
    pub fn new(initial: f64) -> Self {
        let config = ScoreConfig::default();
        Self::with_trigger(initial, config, IntervalTrigger::new(config.decay_interval()))
    }

    pub fn with_trigger<T: DecayTrigger>(initial: f64, config: ScoreConfig, trigger: T) -> Self {
        let shared = Arc::new_cyclic(|weak| {
            let ticker = Ticker {
                shared: weak.clone(),
            };
            Shared {
                value: Mutex::new(initial.max(0.0)),
                config,
                _decay: Box::new(trigger.arm(ticker)),
            }
        });
        Self { shared }
    }

    pub fn value(&self) -> f64 {
        self.shared.value()
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.shared.config
    }

    pub fn flag_used(&self) -> f64 {
        self.shared.remove(self.shared.config.flag_penalty)
    }

    pub fn canceled_shot(&self) -> f64 {
        self.shared.remove(self.shared.config.undo_penalty)
    }

    /// Whether both handles point to the same counter.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Score")
            .field("value", &self.value())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

/// Handle given to a [`DecayTrigger`], each tick removes one decay step.
///
/// Only weakly linked to the score, a trigger never keeps a score alive.
#[derive(Clone)]
pub struct Ticker {
    shared: Weak<Shared>,
}

impl Ticker {
    /// Applies one decay step, returns `false` once the score is gone.
    pub fn tick(&self) -> bool {
        match self.shared.upgrade() {
            Some(shared) => {
                let value = shared.remove(shared.config.decay_step);
                log::trace!("score decayed to {}", value);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticker")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

/// Schedules decay ticks for a score.
pub trait DecayTrigger {
    /// Owned by the score, dropping it must stop further ticks.
    type Guard: Send + Sync + 'static;

    fn arm(self, ticker: Ticker) -> Self::Guard;
}

/// Ticks from a background thread at a fixed interval.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntervalTrigger {
    interval: Duration,
}

impl IntervalTrigger {
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl DecayTrigger for IntervalTrigger {
    /// Dropping the sender disconnects the channel and wakes the thread up to exit.
    type Guard = mpsc::Sender<()>;

    fn arm(self, ticker: Ticker) -> Self::Guard {
        let (stop, stopped) = mpsc::channel::<()>();
        let interval = self.interval;

        let spawned = thread::Builder::new()
            .name("score-decay".into())
            .spawn(move || {
                loop {
                    match stopped.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            ticker.tick();
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::trace!("score decay stopped");
            });

        if let Err(err) = spawned {
            log::error!("Could not start score decay: {:?}", err);
        }
        stop
    }
}

/// Ticks only when told to, for deterministic stepping.
#[derive(Clone, Debug, Default)]
pub struct ManualTrigger {
    ticker: Arc<Mutex<Option<Ticker>>>,
}

impl ManualTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers one tick, returns `false` if no live score is attached.
    pub fn fire(&self) -> bool {
        self.ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(Ticker::tick)
    }

    pub fn fire_n(&self, ticks: usize) {
        for _ in 0..ticks {
            if !self.fire() {
                break;
            }
        }
    }
}

impl DecayTrigger for ManualTrigger {
    type Guard = ();

    fn arm(self, ticker: Ticker) -> Self::Guard {
        *self.ticker.lock().unwrap_or_else(PoisonError::into_inner) = Some(ticker);
    }
}
