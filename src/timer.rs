// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The delay and sound timers, and the thread that counts them down
//!
//! Both timers live in a single cell behind one [Mutex]. The interpreter and the
//! timer thread each hold a handle to the cell, and the lock is only held for the
//! duration of a single read, write, or tick.

use crate::error::Result;
use log::{debug, error};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// Period of the 60Hz timer tick
pub const TIMER_PERIOD: Duration = Duration::from_micros(16_666);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Countdown {
    delay: u8,
    sound: u8,
}

/// Shared handle to the delay timer (DT) and sound timer (ST)
#[derive(Clone, Debug, Default)]
pub struct Timers {
    cell: Arc<Mutex<Countdown>>,
}

impl Timers {
    /// Constructs a new pair of timers, both at 0
    pub fn new() -> Self {
        Self::default()
    }

    // The guarded data is two plain bytes, which can't be left half-written
    fn lock(&self) -> MutexGuard<'_, Countdown> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gets the value in the delay timer
    pub fn delay(&self) -> u8 {
        self.lock().delay
    }

    /// Gets the value in the sound timer
    pub fn sound(&self) -> u8 {
        self.lock().sound
    }

    pub(crate) fn set_delay(&self, value: u8) {
        self.lock().delay = value;
    }

    pub(crate) fn set_sound(&self, value: u8) {
        self.lock().sound = value;
    }

    pub(crate) fn reset(&self) {
        *self.lock() = Countdown::default();
    }

    /// Counts both timers down by one, stopping at zero
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let timers = Timers::new();
    /// timers.tick();
    /// assert_eq!(0, timers.delay());
    /// ```
    pub fn tick(&self) {
        let mut countdown = self.lock();
        countdown.delay = countdown.delay.saturating_sub(1);
        countdown.sound = countdown.sound.saturating_sub(1);
    }

    /// Spawns a thread which [ticks](Timers::tick) these timers once every `period`,
    /// until the returned [TimerThread] is stopped or dropped.
    pub fn spawn(&self, period: Duration) -> Result<TimerThread> {
        let timers = self.clone();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("chirp8-timer".into())
            .spawn(move || {
                let mut next = Instant::now() + period;
                while !flag.load(Ordering::Acquire) {
                    thread::sleep(next.saturating_duration_since(Instant::now()));
                    next = next_deadline(next, Instant::now(), period);
                    if flag.load(Ordering::Acquire) {
                        break;
                    }
                    timers.tick();
                }
            })?;
        debug!("Started timer thread ({period:?} period)");
        Ok(TimerThread {
            stop,
            handle: Some(handle),
        })
    }
}

/// Picks the deadline after `next`, given that the thread woke at `now`.
///
/// Deadlines advance by exactly one `period`, unless the thread has fallen
/// more than a whole period behind. Then the schedule restarts from `now`,
/// dropping the missed ticks instead of firing them back to back.
fn next_deadline(next: Instant, now: Instant, period: Duration) -> Instant {
    if now > next + period {
        now + period
    } else {
        next + period
    }
}

/// Owns the running timer thread. Stopping or dropping it joins the thread.
#[derive(Debug)]
pub struct TimerThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TimerThread {
    /// Signals the timer thread to stop, and waits for it to finish its last tick
    pub fn stop(mut self) {
        self.shutdown()
    }

    /// Returns true while the thread is still ticking
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Timer thread panicked");
            }
            debug!("Stopped timer thread");
        }
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        self.shutdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_decays_to_zero() {
        let timers = Timers::new();
        timers.set_delay(10);
        for expected in (0..10).rev() {
            timers.tick();
            assert_eq!(expected, timers.delay());
        }
        // and stays there
        for _ in 0..5 {
            timers.tick();
            assert_eq!(0, timers.delay());
        }
    }

    #[test]
    fn timers_are_independent() {
        let timers = Timers::new();
        timers.set_delay(2);
        timers.set_sound(5);
        timers.tick();
        timers.tick();
        timers.tick();
        assert_eq!(0, timers.delay());
        assert_eq!(2, timers.sound());
    }

    #[test]
    fn clones_share_state() {
        let timers = Timers::new();
        let other = timers.clone();
        timers.set_sound(7);
        other.tick();
        assert_eq!(6, timers.sound());
        other.reset();
        assert_eq!(0, timers.sound());
    }

    #[test]
    fn deadlines_keep_pace() {
        let period = Duration::from_millis(10);
        let start = Instant::now();
        // woke a little late: the schedule doesn't drift
        let next = next_deadline(start, start + Duration::from_millis(3), period);
        assert_eq!(start + period, next);
        // woke exactly one period late: still catching up
        let next = next_deadline(start, start + period, period);
        assert_eq!(start + period, next);
    }

    #[test]
    fn stalled_deadlines_restart() {
        let period = Duration::from_millis(10);
        let start = Instant::now();
        // suspended for a second: don't fire 100 ticks back to back
        let woke = start + Duration::from_secs(1);
        let next = next_deadline(start, woke, period);
        assert_eq!(woke + period, next);
        assert!(next > woke);
    }

    #[test]
    fn thread_counts_down() {
        let timers = Timers::new();
        timers.set_delay(5);
        timers.set_sound(200);
        let thread = timers.spawn(Duration::from_millis(1)).unwrap();
        let start = Instant::now();
        while timers.delay() != 0 {
            assert!(
                start.elapsed() < Duration::from_secs(5),
                "timer thread should have ticked by now"
            );
            thread::sleep(Duration::from_millis(1));
        }
        thread.stop();
        assert!(timers.sound() < 200);
    }

    #[test]
    fn thread_stops_promptly() {
        let timers = Timers::new();
        timers.set_delay(255);
        let thread = timers.spawn(TIMER_PERIOD).unwrap();
        assert!(thread.is_running());
        let start = Instant::now();
        thread.stop();
        // bounded by roughly one tick
        assert!(start.elapsed() < Duration::from_secs(1));
        // no more ticks are delivered once stopped
        let after = timers.delay();
        thread::sleep(TIMER_PERIOD * 3);
        assert_eq!(after, timers.delay());
    }

    #[test]
    fn drop_joins_thread() {
        let timers = Timers::new();
        timers.set_delay(255);
        drop(timers.spawn(Duration::from_millis(1)).unwrap());
        let after = timers.delay();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(after, timers.delay());
    }
}
