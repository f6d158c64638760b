//! Work/break countdown state machine.
//!
//! [`TimerState`] knows nothing about terminals or clocks. Every operation
//! mutates the state in place and hands back the [`TimerEvent`]s a
//! presentation layer needs to redraw itself. The host calls [`TimerState::tick`]
//! once per second while the timer is running.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

// ============================================================================
// Phases, Notices & Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Work => "🎯 WORK",
            Self::Break => "☕ BREAK",
        }
    }

    fn flipped(self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }
}

/// Modal announcements the user has to acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    WorkComplete,
    BreakOver,
    InvalidConfiguration,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Self::WorkComplete | Self::BreakOver => "Pomodoro Timer",
            Self::InvalidConfiguration => "Invalid Input",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::WorkComplete => "Work session complete! Take a break!",
            Self::BreakOver => "Break Over! Back to work!",
            Self::InvalidConfiguration => "Please enter valid numbers for work and break times.",
        }
    }

    fn entering(phase: Phase) -> Self {
        match phase {
            Phase::Work => Self::BreakOver,
            Phase::Break => Self::WorkComplete,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    /// Redraw the countdown. `progress` is a percentage in `[0, 100]`.
    Countdown {
        text: String,
        progress: f64,
        phase: Phase,
    },
    Sessions(u32),
    Notice(Notice),
}

// ============================================================================
// Timer State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    work_duration_secs: u32,
    break_duration_secs: u32,
    remaining_secs: u32,
    phase: Phase,
    running: bool,
    completed_sessions: u32,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            work_duration_secs: DEFAULT_WORK_MINUTES * 60,
            break_duration_secs: DEFAULT_BREAK_MINUTES * 60,
            remaining_secs: DEFAULT_WORK_MINUTES * 60,
            phase: Phase::Work,
            running: false,
            completed_sessions: 0,
        }
    }
}

impl TimerState {
    /// A stopped timer at the start of a work phase.
    pub fn new(work_minutes: u32, break_minutes: u32) -> Result<Self> {
        let (Some(work), Some(rest)) = (minutes_to_secs(work_minutes), minutes_to_secs(break_minutes)) else {
            return Err(Error::InvalidConfiguration {
                work: work_minutes.to_string(),
                brk: break_minutes.to_string(),
            });
        };

        Ok(Self {
            work_duration_secs: work,
            break_duration_secs: rest,
            remaining_secs: work,
            ..Self::default()
        })
    }

    pub fn work_duration_secs(&self) -> u32 {
        self.work_duration_secs
    }

    pub fn break_duration_secs(&self) -> u32 {
        self.break_duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn phase_duration(&self) -> u32 {
        match self.phase {
            Phase::Work => self.work_duration_secs,
            Phase::Break => self.break_duration_secs,
        }
    }

    pub fn countdown_text(&self) -> String {
        format_mmss(self.remaining_secs)
    }

    pub fn progress(&self) -> f64 {
        progress_percent(self.phase_duration(), self.remaining_secs)
    }

    /// Applies new durations typed by the user, then resets the current phase.
    ///
    /// Both inputs must be positive whole minutes. On error nothing changes.
    pub fn configure(&mut self, work_minutes: &str, break_minutes: &str) -> Result<Vec<TimerEvent>> {
        let parsed = (parse_minutes(work_minutes), parse_minutes(break_minutes));
        let (Some(work), Some(rest)) = parsed else {
            warn!(work = work_minutes, brk = break_minutes, "rejected timer settings");
            return Err(Error::InvalidConfiguration {
                work: work_minutes.trim().into(),
                brk: break_minutes.trim().into(),
            });
        };

        self.work_duration_secs = work;
        self.break_duration_secs = rest;
        info!(work_secs = work, break_secs = rest, "timer configured");
        Ok(self.reset())
    }

    /// Returns true when the caller has to arm the tick schedule.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        info!(phase = ?self.phase, remaining = self.remaining_secs, "timer started");
        true
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        info!(phase = ?self.phase, remaining = self.remaining_secs, "timer stopped");
    }

    pub fn reset(&mut self) -> Vec<TimerEvent> {
        self.running = false;
        self.remaining_secs = self.phase_duration();
        info!(phase = ?self.phase, remaining = self.remaining_secs, "timer reset");

        vec![TimerEvent::Countdown {
            text: self.countdown_text(),
            progress: 0.0,
            phase: self.phase,
        }]
    }

    /// Advances the countdown by one second.
    ///
    /// The tick that brings the countdown to zero also completes the phase,
    /// so the next phase starts at its full duration with no idle second in
    /// between. Ticks delivered while stopped do nothing.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if !self.running {
            debug!("ignoring tick while stopped");
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.remaining_secs > 0 {
            let progress = progress_percent(self.phase_duration(), self.remaining_secs);
            self.remaining_secs -= 1;
            debug!(remaining = self.remaining_secs, progress, "tick");
            events.push(TimerEvent::Countdown {
                text: self.countdown_text(),
                progress,
                phase: self.phase,
            });
            if self.remaining_secs > 0 {
                return events;
            }
        }

        self.complete_phase(&mut events);
        events
    }

    fn complete_phase(&mut self, events: &mut Vec<TimerEvent>) {
        // Only work phases count as sessions; finishing a break does not.
        if self.phase == Phase::Work {
            self.completed_sessions += 1;
            events.push(TimerEvent::Sessions(self.completed_sessions));
        }

        self.phase = self.phase.flipped();
        self.remaining_secs = self.phase_duration();
        info!(
            phase = ?self.phase,
            sessions = self.completed_sessions,
            "phase complete"
        );

        events.push(TimerEvent::Countdown {
            text: self.countdown_text(),
            progress: 0.0,
            phase: self.phase,
        });
        events.push(TimerEvent::Notice(Notice::entering(self.phase)));
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parses a minutes field into seconds. Rejects zero, negatives and overflow.
pub fn parse_minutes(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().and_then(minutes_to_secs)
}

fn minutes_to_secs(minutes: u32) -> Option<u32> {
    if minutes == 0 {
        return None;
    }
    minutes.checked_mul(60)
}

pub fn format_mmss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn progress_percent(total: u32, remaining: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(total.saturating_sub(remaining)) / f64::from(total) * 100.0
}
