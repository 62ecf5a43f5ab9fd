//! Host-facing scheduling: turns wall-clock time into scanlines.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::machine::SpaceInvadersMachine;

const MICROS_PER_SECOND: u128 = 1_000_000;

/// A monotonic microsecond time source.
pub trait Clock {
    fn now_micros(&mut self) -> u64;
}

/// Wall-clock time since construction.
pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for HostClock {
    fn now_micros(&mut self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Deterministic time source for tests and headless runs.
///
/// Clones share the same time, so a caller can keep a handle and advance
/// it after giving the clock to a [`Driver`].
#[derive(Clone, Default, Debug)]
pub struct ManualClock {
    micros: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn advance(&self, micros: u64) {
        self.micros.set(self.micros.get() + micros);
    }

    pub fn set(&self, micros: u64) {
        self.micros.set(micros);
    }
}

impl Clock for ManualClock {
    fn now_micros(&mut self) -> u64 {
        self.micros.get()
    }
}

/// Runs a machine in real time, one host tick at a time.
///
/// Each [`Driver::task`] converts the time since the previous tick into owed
/// scanlines. Fractions of a scanline are carried to the next tick, and
/// scanlines beyond the per-tick cap stay in the backlog instead of being
/// dropped.
pub struct Driver<C: Clock> {
    machine: SpaceInvadersMachine,
    clock: C,
    last_micros: Option<u64>,
    /// Elapsed time not yet converted, in 1/1_000_000 scanline units.
    fraction: u64,
    backlog: u64,
    running: bool,
    behind: bool,
}

impl<C: Clock> Driver<C> {
    pub fn new(machine: SpaceInvadersMachine, clock: C) -> Self {
        Self {
            machine,
            clock,
            last_micros: None,
            fraction: 0,
            backlog: 0,
            running: true,
            behind: false,
        }
    }

    /// One host tick. Returns `false` once the driver has been shut down.
    pub fn task(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let now = self.clock.now_micros();
        let last = self.last_micros.replace(now).unwrap_or(now);
        let elapsed = now.saturating_sub(last);

        // Wide enough for any gap at any valid scanline rate.
        let owed = u128::from(self.fraction)
            + u128::from(elapsed) * u128::from(self.machine.timing().scanline_rate());
        let lines = u64::try_from(owed / MICROS_PER_SECOND).unwrap_or(u64::MAX);
        self.backlog = self.backlog.saturating_add(lines);
        self.fraction = (owed % MICROS_PER_SECOND) as u64;

        let cap = u64::from(self.machine.timing().scanline_cap());
        let run = self.backlog.min(cap);
        for _ in 0..run {
            self.machine.run_scanline();
        }
        self.backlog -= run;

        if self.backlog > 0 && !self.behind {
            log::warn!(
                "Emulation is falling behind, {} scanlines carried over",
                self.backlog
            );
        }
        self.behind = self.backlog > 0;
        true
    }

    /// Forget the time since the last tick, e.g. after a pause.
    pub fn resync(&mut self) {
        self.last_micros = None;
    }

    pub fn shutdown(&mut self) {
        if self.running {
            log::info!("Driver shut down after {} frames", self.machine.frame_count());
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Scanlines owed but not yet run.
    pub fn backlog(&self) -> u64 {
        self.backlog
    }

    pub fn machine(&self) -> &SpaceInvadersMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut SpaceInvadersMachine {
        &mut self.machine
    }
}
