//! Background ticker driving a [`Dashboard`].
//!
//! ```text
//! ┌──────────────────┐  lock, tick()   ┌──────────────────────┐
//! │ mindsync-ticker  │ ──────────────▶ │ Arc<Mutex<Dashboard>>│ ◀── snapshot()
//! │ generate sample  │                 └──────────────────────┘
//! │ every interval   │ ──TickEvent──▶ events() (bounded, lossy)
//! └──────────────────┘ ◀──stop─────── stop() / Drop
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use log::{info, trace, warn};

use super::{Dashboard, DashboardSnapshot, MonitorConfig, MonitorError, TickEvent};
use crate::generator::SampleGenerator;
use crate::report::{HealthReport, ReportComposer};

/// Tick events buffered for subscribers before new ones are dropped
const EVENT_CAPACITY: usize = 256;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a running ticker.
///
/// The ticker is stopped and joined by [`stop`](Monitor::stop). Dropping a
/// running monitor stops it too, with a warning.
pub struct Monitor {
    state: Arc<Mutex<Dashboard>>,
    composer: ReportComposer,
    stop: Option<Sender<()>>,
    events: Receiver<TickEvent>,
    handle: Option<JoinHandle<Result<u64, String>>>,
    first_error: Arc<Mutex<Option<String>>>,
}

impl Monitor {
    /// Start ticking with a generator built from `config`
    pub fn start(config: MonitorConfig) -> Result<Self, MonitorError> {
        let generator = match config.seed {
            Some(seed) => SampleGenerator::seeded(config.generator, seed),
            None => SampleGenerator::with_config(config.generator),
        };
        Self::start_with_generator(config, generator)
    }

    /// Start ticking with a caller-supplied generator
    pub fn start_with_generator(
        config: MonitorConfig,
        mut generator: SampleGenerator,
    ) -> Result<Self, MonitorError> {
        let dashboard = Dashboard::new(&config)?;
        let state = Arc::new(Mutex::new(dashboard));
        let first_error: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let (event_tx, event_rx) = bounded::<TickEvent>(EVENT_CAPACITY);

        let interval = config.tick_interval();
        let thread_state = Arc::clone(&state);
        let thread_error = Arc::clone(&first_error);

        let handle = thread::Builder::new()
            .name("mindsync-ticker".to_string())
            .spawn(move || {
                let ticker = tick(interval);
                let mut ticks = 0u64;
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            let sample = generator.generate();
                            let event = match lock(&thread_state).tick(sample) {
                                Ok(event) => event,
                                Err(e) => {
                                    let err_str = e.to_string();
                                    *lock(&thread_error) = Some(err_str.clone());
                                    return Err(err_str);
                                }
                            };
                            ticks = event.tick;
                            match event_tx.try_send(event) {
                                Ok(()) | Err(TrySendError::Disconnected(_)) => {}
                                Err(TrySendError::Full(_)) => {
                                    trace!("event queue full, dropping tick {}", event.tick)
                                }
                            }
                        }
                    }
                }
                Ok(ticks)
            })
            .map_err(|e| MonitorError::ThreadError(format!("Failed to spawn ticker: {}", e)))?;

        info!("Monitor started, ticking every {:?}", interval);
        Ok(Self {
            state,
            composer: ReportComposer::new(config.report),
            stop: Some(stop_tx),
            events: event_rx,
            handle: Some(handle),
            first_error,
        })
    }

    /// Tick events as they happen. Events are dropped when nobody keeps up.
    pub fn events(&self) -> &Receiver<TickEvent> {
        &self.events
    }

    /// True until the ticker has been stopped or has failed
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Fail fast if the ticker thread has hit an error
    pub fn check_error(&self) -> Result<(), MonitorError> {
        match lock(&self.first_error).as_ref() {
            Some(err) => Err(MonitorError::ThreadError(err.clone())),
            None => Ok(()),
        }
    }

    /// Run `f` against the live dashboard while holding the lock
    pub fn with_dashboard<T>(&self, f: impl FnOnce(&Dashboard) -> T) -> T {
        f(&lock(&self.state))
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> DashboardSnapshot {
        lock(&self.state).snapshot()
    }

    /// Compose a report from a snapshot taken now
    pub fn compose_report(&self) -> Result<HealthReport, MonitorError> {
        self.check_error()?;
        let snapshot = self.snapshot();
        Ok(snapshot.compose_report(&self.composer)?)
    }

    /// Stop the ticker and wait for it, returning the number of ticks processed
    pub fn stop(mut self) -> Result<u64, MonitorError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<u64, MonitorError> {
        if let Some(stop) = self.stop.take() {
            // a full or disconnected channel both mean the thread is on its way out
            let _ = stop.try_send(());
        }
        let handle = self.handle.take().ok_or(MonitorError::Stopped)?;
        let ticks = match handle.join() {
            Ok(Ok(ticks)) => ticks,
            Ok(Err(err_str)) => return Err(MonitorError::ThreadError(err_str)),
            Err(_panic) => return Err(MonitorError::ThreadPanicked),
        };
        info!("Monitor stopped after {} ticks", ticks);
        Ok(ticks)
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        if self.handle.is_some() {
            warn!("Monitor dropped without stop(); stopping ticker");
            if let Err(e) = self.shutdown() {
                warn!("Ticker ended with an error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorConfig;
    use std::time::Duration;

    fn quick() -> MonitorConfig {
        MonitorConfig {
            tick_interval_ms: 5,
            ..MonitorConfig::seeded(1)
        }
    }

    #[test]
    fn test_ticks_arrive_and_stop_joins() {
        let monitor = Monitor::start(quick()).unwrap();
        let mut last = 0;
        for _ in 0..5 {
            let event = monitor.events().recv_timeout(Duration::from_secs(5)).unwrap();
            assert!(event.tick > last);
            last = event.tick;
        }
        assert!(monitor.is_running());
        let ticks = monitor.stop().unwrap();
        assert!(ticks >= 5);
    }

    #[test]
    fn test_snapshot_is_consistent() {
        let monitor = Monitor::start(quick()).unwrap();
        monitor.events().recv_timeout(Duration::from_secs(5)).unwrap();
        let snapshot = monitor.snapshot();
        assert!(snapshot.ticks >= 1);
        assert!(snapshot
            .surfaces
            .iter()
            .all(|s| s.point_count() == snapshot.samples.len()));
        monitor.stop().unwrap();
    }

    #[test]
    fn test_report_while_running() {
        let monitor = Monitor::start(quick()).unwrap();
        for _ in 0..3 {
            monitor.events().recv_timeout(Duration::from_secs(5)).unwrap();
        }
        let report = monitor.compose_report().unwrap();
        assert_eq!(report.page_count, 5);
        assert!(report.summary.sample_count >= 3);
        monitor.stop().unwrap();
    }

    #[test]
    fn test_drop_stops_ticker() {
        let monitor = Monitor::start_with_generator(
            quick(),
            SampleGenerator::seeded(GeneratorConfig::default(), 2),
        )
        .unwrap();
        let events = monitor.events().clone();
        drop(monitor);
        // once the thread is gone the event channel disconnects
        while events.recv_timeout(Duration::from_secs(5)).is_ok() {}
        assert!(events.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_invalid_config_does_not_start() {
        let config = MonitorConfig {
            tick_interval_ms: 0,
            ..MonitorConfig::default()
        };
        assert!(matches!(
            Monitor::start(config),
            Err(MonitorError::InvalidConfig(_))
        ));
    }
}
