//! Live elapsed-time display for one project's timer.
//!
//! The driver owns a single "session", identified by the timer id and state. While
//! the session is running it re-renders once per second through the injected
//! [`Scheduler`] and fires an interval notification each time the elapsed minutes
//! cross a multiple of the configured interval.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use log::{debug, info};

use crate::clock::Clock;
use crate::config::{NotificationSound, PreferencesProvider};
use crate::scheduler::{CancelToken, Scheduler};
use crate::time_format::minutes_from_formatted_elapsed;
use crate::timer::{compute_elapsed, Timer, TimerState};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Receives every rendered elapsed string.
pub trait DisplaySink: Send {
    fn show(&mut self, elapsed: &str);
}

impl<F> DisplaySink for F
where
    F: FnMut(&str) + Send,
{
    fn show(&mut self, elapsed: &str) {
        self(elapsed)
    }
}

/// Plays the interval notification sound.
pub trait NotificationPlayer: Send {
    fn play(&mut self, sound: &str, volume: f64);
}

impl<F> NotificationPlayer for F
where
    F: FnMut(&str, f64) + Send,
{
    fn play(&mut self, sound: &str, volume: f64) {
        self(sound, volume)
    }
}

/// Collaborators a driver needs. Sinks must not call back into the driver.
pub struct DriverContext {
    pub clock: Arc<dyn Clock>,
    pub scheduler: Arc<dyn Scheduler>,
    pub preferences: Arc<dyn PreferencesProvider>,
    pub display: Box<dyn DisplaySink>,
    pub notifier: Box<dyn NotificationPlayer>,
}

struct DriverInner {
    clock: Arc<dyn Clock>,
    preferences: Arc<dyn PreferencesProvider>,
    display: Box<dyn DisplaySink>,
    notifier: Box<dyn NotificationPlayer>,
    timer: Timer,
    tick: Option<CancelToken>,
    generation: u64,
    notified_minutes: HashSet<u64>,
    last_display: String,
    torn_down: bool,
}

impl DriverInner {
    fn emit(&mut self) {
        let elapsed = compute_elapsed(&self.timer, self.clock.now());
        self.display.show(&elapsed);
        self.last_display = elapsed;
    }

    fn check_notification_due(&mut self) {
        let minutes = minutes_from_formatted_elapsed(&self.last_display);
        let settings = self.preferences.notification_settings();
        if minutes == 0 || minutes % settings.interval_minutes != 0 {
            return;
        }
        if !self.notified_minutes.insert(minutes) {
            return;
        }
        match settings.sound {
            NotificationSound::Silent => {
                debug!("Interval reached at {} min, notifications silenced", minutes);
            }
            NotificationSound::Named(sound) => {
                info!("Timer reached {} min, playing {}", minutes, sound);
                self.notifier.play(&sound, settings.volume);
            }
        }
    }
}

/// Drives the elapsed display of one timer until torn down.
pub struct TimerDisplayDriver {
    inner: Arc<Mutex<DriverInner>>,
    scheduler: Arc<dyn Scheduler>,
}

impl TimerDisplayDriver {
    /// Starts driving `timer`, emitting its display immediately.
    pub fn new(context: DriverContext, timer: Timer) -> Self {
        let DriverContext {
            clock,
            scheduler,
            preferences,
            display,
            notifier,
        } = context;
        let driver = Self {
            inner: Arc::new(Mutex::new(DriverInner {
                clock,
                preferences,
                display,
                notifier,
                timer: Timer::None,
                tick: None,
                generation: 0,
                notified_minutes: HashSet::new(),
                last_display: String::new(),
                torn_down: false,
            })),
            scheduler,
        };
        {
            let mut inner = driver.lock();
            driver.start_session(&mut inner, timer);
        }
        driver
    }

    /// Applies a freshly fetched timer.
    ///
    /// A different id or state starts a new session. The same id and state keeps the
    /// running tick and notification guard and only re-anchors the elapsed base.
    pub fn update(&self, timer: Timer) {
        let mut inner = self.lock();
        if inner.torn_down {
            return;
        }
        let same_session = inner.timer.id() == timer.id() && inner.timer.state() == timer.state();
        if same_session {
            inner.timer = timer.anchored_at(inner.clock.now());
            inner.emit();
        } else {
            self.start_session(&mut inner, timer);
        }
    }

    /// Stops ticking for good. Later updates are ignored.
    pub fn teardown(&self) {
        let mut inner = self.lock();
        if inner.torn_down {
            return;
        }
        inner.torn_down = true;
        inner.generation += 1;
        if let Some(token) = inner.tick.take() {
            self.scheduler.cancel(token);
        }
        debug!("Timer display torn down");
    }

    /// Last string sent to the display.
    pub fn current_display(&self) -> String {
        self.lock().last_display.clone()
    }

    pub fn timer(&self) -> Timer {
        self.lock().timer.clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.lock().tick.is_some()
    }

    fn start_session(&self, inner: &mut DriverInner, timer: Timer) {
        if let Some(token) = inner.tick.take() {
            self.scheduler.cancel(token);
        }
        inner.generation += 1;
        inner.notified_minutes.clear();
        inner.timer = timer.anchored_at(inner.clock.now());
        debug!(
            "New timer session {:?} ({:?}), generation {}",
            inner.timer.id(),
            inner.timer.state(),
            inner.generation
        );
        inner.emit();

        if inner.timer.state() == Some(TimerState::Running) {
            let weak = Arc::downgrade(&self.inner);
            let generation = inner.generation;
            let token = self
                .scheduler
                .schedule(TICK_PERIOD, Box::new(move || on_tick(&weak, generation)));
            inner.tick = Some(token);
        }
    }

    fn lock(&self) -> MutexGuard<'_, DriverInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TimerDisplayDriver {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn on_tick(inner: &Weak<Mutex<DriverInner>>, generation: u64) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
    if inner.torn_down || inner.generation != generation {
        return;
    }
    inner.emit();
    inner.check_notification_due();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::{Config, PreferenceValue};
    use crate::scheduler::ManualScheduler;
    use crate::timer::TimerSnapshot;
    use chrono::{DateTime, TimeZone, Utc};

    struct Harness {
        scheduler: ManualScheduler,
        displays: Arc<Mutex<Vec<String>>>,
        plays: Arc<Mutex<Vec<(String, f64)>>>,
    }

    impl Harness {
        fn new() -> Self {
            let start = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
            Self {
                scheduler: ManualScheduler::new(ManualClock::new(start)),
                displays: Arc::new(Mutex::new(Vec::new())),
                plays: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn now(&self) -> DateTime<Utc> {
            self.scheduler.clock().now()
        }

        fn driver(&self, config: Config, timer: Timer) -> TimerDisplayDriver {
            let displays = self.displays.clone();
            let plays = self.plays.clone();
            TimerDisplayDriver::new(
                DriverContext {
                    clock: Arc::new(self.scheduler.clock().clone()),
                    scheduler: Arc::new(self.scheduler.clone()),
                    preferences: Arc::new(config),
                    display: Box::new(move |elapsed: &str| {
                        displays.lock().unwrap().push(elapsed.to_string())
                    }),
                    notifier: Box::new(move |sound: &str, volume: f64| {
                        plays.lock().unwrap().push((sound.to_string(), volume))
                    }),
                },
                timer,
            )
        }

        fn displays(&self) -> Vec<String> {
            self.displays.lock().unwrap().clone()
        }

        fn plays(&self) -> Vec<(String, f64)> {
            self.plays.lock().unwrap().clone()
        }

        fn running(&self, id: &str, seconds: u64) -> Timer {
            Timer::Running(TimerSnapshot::new(id, seconds, self.now()))
        }

        fn paused(&self, id: &str, seconds: u64) -> Timer {
            Timer::Paused(TimerSnapshot::new(id, seconds, self.now()))
        }
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn running_timer_emits_immediately_and_every_second() {
        let h = Harness::new();
        let driver = h.driver(Config::default(), h.running("t1", 0));
        assert_eq!(h.displays(), vec!["00:00"]);

        h.scheduler.advance(secs(3));
        assert_eq!(h.displays(), vec!["00:00", "00:01", "00:02", "00:03"]);
        assert_eq!(driver.current_display(), "00:03");
        assert!(driver.is_ticking());
    }

    #[test]
    fn running_display_strictly_increases() {
        let h = Harness::new();
        let _driver = h.driver(Config::default(), h.running("t1", 3595));
        h.scheduler.advance(secs(10));

        let seconds: Vec<u64> = h
            .displays()
            .iter()
            .map(|display| {
                display
                    .split(':')
                    .fold(0, |acc, part| acc * 60 + part.parse::<u64>().unwrap())
            })
            .collect();
        assert!(seconds.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(h.displays().last().unwrap(), "01:00:05");
    }

    #[test]
    fn paused_timer_emits_once_and_never_ticks() {
        let h = Harness::new();
        let driver = h.driver(Config::default(), h.paused("t1", 3600));
        h.scheduler.advance(secs(30));

        assert_eq!(h.displays(), vec!["01:00:00"]);
        assert!(!driver.is_ticking());
        assert_eq!(h.scheduler.active_count(), 0);
    }

    #[test]
    fn idle_timer_shows_idle_display() {
        let h = Harness::new();
        let _driver = h.driver(Config::default(), Timer::None);
        h.scheduler.advance(secs(5));
        assert_eq!(h.displays(), vec!["0:00:00"]);
    }

    #[test]
    fn pausing_stops_the_tick() {
        let h = Harness::new();
        let driver = h.driver(Config::default(), h.running("t1", 0));
        h.scheduler.advance(secs(2));

        driver.update(h.paused("t1", 2));
        h.scheduler.advance(secs(5));

        assert_eq!(h.displays(), vec!["00:00", "00:01", "00:02", "00:02"]);
        assert_eq!(h.scheduler.active_count(), 0);
    }

    #[test]
    fn refetch_of_same_session_keeps_single_tick() {
        let h = Harness::new();
        let driver = h.driver(Config::default(), h.running("t1", 0));
        h.scheduler.advance(secs(2));

        driver.update(h.running("t1", 100));
        assert_eq!(driver.current_display(), "01:40");
        assert_eq!(h.scheduler.active_count(), 1);

        h.scheduler.advance(secs(1));
        assert_eq!(driver.current_display(), "01:41");
    }

    #[test]
    fn interval_notification_fires_once_per_mark() {
        let h = Harness::new();
        let config = Config {
            notification_interval_minutes: PreferenceValue::Text("1".into()),
            notification_volume: PreferenceValue::Number(0.4),
            ..Config::default()
        };
        let _driver = h.driver(config, h.running("t1", 0));

        h.scheduler.advance(secs(29));
        assert!(h.plays().is_empty());

        // 00:30 rounds to one minute.
        h.scheduler.advance(secs(1));
        assert_eq!(h.plays(), vec![("Glass".to_string(), 0.4)]);

        h.scheduler.advance(secs(59));
        assert_eq!(h.plays().len(), 1);

        h.scheduler.advance(secs(1));
        assert_eq!(h.plays().len(), 2);
    }

    #[test]
    fn default_interval_fires_at_fifteen_minutes() {
        let h = Harness::new();
        let _driver = h.driver(Config::default(), h.running("t1", 14 * 60));

        h.scheduler.advance(secs(29));
        assert!(h.plays().is_empty());
        h.scheduler.advance(secs(1));
        assert_eq!(h.plays(), vec![("Glass".to_string(), 1.0)]);
    }

    #[test]
    fn silent_sound_suppresses_playback() {
        let h = Harness::new();
        let config = Config {
            notification_sound: "none".into(),
            notification_interval_minutes: PreferenceValue::Number(1.0),
            ..Config::default()
        };
        let _driver = h.driver(config, h.running("t1", 0));
        h.scheduler.advance(secs(180));
        assert!(h.plays().is_empty());
    }

    #[test]
    fn identity_change_resets_guard_and_reemits() {
        let h = Harness::new();
        let config = Config {
            notification_interval_minutes: PreferenceValue::Number(1.0),
            ..Config::default()
        };
        let driver = h.driver(config, h.running("t1", 50));
        h.scheduler.advance(secs(10));
        assert_eq!(h.plays().len(), 1);

        let before = h.displays().len();
        driver.update(h.running("t2", 59));
        assert_eq!(h.displays().len(), before + 1);
        assert_eq!(driver.current_display(), "00:59");
        assert_eq!(h.scheduler.active_count(), 1);

        // Same minute mark fires again for the new timer.
        h.scheduler.advance(secs(1));
        assert_eq!(h.plays().len(), 2);
    }

    #[test]
    fn idle_to_running_starts_ticking() {
        let h = Harness::new();
        let config = Config {
            notification_interval_minutes: PreferenceValue::Number(1.0),
            ..Config::default()
        };
        let driver = h.driver(config, Timer::None);
        assert_eq!(h.scheduler.active_count(), 0);

        driver.update(h.running("t1", 29));
        assert_eq!(h.displays(), vec!["0:00:00", "00:29"]);
        assert_eq!(h.scheduler.active_count(), 1);

        h.scheduler.advance(secs(1));
        assert_eq!(driver.current_display(), "00:30");
        assert_eq!(h.plays().len(), 1);
        assert_eq!(h.scheduler.active_count(), 1);
    }

    #[test]
    fn resuming_same_timer_starts_fresh_session() {
        let h = Harness::new();
        let config = Config {
            notification_interval_minutes: PreferenceValue::Number(1.0),
            ..Config::default()
        };
        let driver = h.driver(config, h.running("t1", 50));
        h.scheduler.advance(secs(10));
        assert_eq!(h.plays().len(), 1);

        driver.update(h.paused("t1", 60));
        h.scheduler.advance(secs(5));
        assert_eq!(h.scheduler.active_count(), 0);
        assert_eq!(h.plays().len(), 1);

        let before = h.displays().len();
        driver.update(h.running("t1", 59));
        assert_eq!(h.displays().len(), before + 1);
        assert_eq!(driver.current_display(), "00:59");
        assert_eq!(h.scheduler.active_count(), 1);

        // The one-minute mark already fired before the pause and fires again.
        h.scheduler.advance(secs(1));
        assert_eq!(driver.current_display(), "01:00");
        assert_eq!(h.plays().len(), 2);
    }

    #[test]
    fn teardown_stops_emissions_and_ignores_updates() {
        let h = Harness::new();
        let driver = h.driver(Config::default(), h.running("t1", 0));
        h.scheduler.advance(secs(1));
        driver.teardown();

        h.scheduler.advance(secs(5));
        driver.update(h.running("t2", 0));
        assert_eq!(h.displays(), vec!["00:00", "00:01"]);
        assert_eq!(h.scheduler.active_count(), 0);
    }

    #[test]
    fn dropping_driver_cancels_tick() {
        let h = Harness::new();
        let driver = h.driver(Config::default(), h.running("t1", 0));
        drop(driver);
        h.scheduler.advance(secs(5));
        assert_eq!(h.displays(), vec!["00:00"]);
        assert_eq!(h.scheduler.active_count(), 0);
    }
}
