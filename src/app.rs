use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::config::{Config, ThemeName};
use crate::error::Result;
use crate::timer::{Notice, Phase, TimerEvent, TimerState};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
const MAX_INPUT_LEN: usize = 4;

// ============================================================================
// Presentation
// ============================================================================

/// Surfaces a UI exposes to the timer.
pub trait Presenter {
    fn show_countdown(&mut self, text: &str);
    fn show_progress(&mut self, percent: f64);
    fn set_accent(&mut self, phase: Phase);
    fn show_sessions(&mut self, count: u32);
    fn show_notice(&mut self, notice: Notice);
}

pub fn present<P: Presenter + ?Sized>(events: Vec<TimerEvent>, presenter: &mut P) {
    for event in events {
        match event {
            TimerEvent::Countdown { text, progress, phase } => {
                presenter.show_countdown(&text);
                presenter.show_progress(progress);
                presenter.set_accent(phase);
            }
            TimerEvent::Sessions(count) => presenter.show_sessions(count),
            TimerEvent::Notice(notice) => presenter.show_notice(notice),
        }
    }
}

/// What the terminal currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub countdown: String,
    pub progress: f64,
    pub accent: Phase,
    pub sessions: u32,
    pub notice: Option<Notice>,
}

impl Screen {
    pub fn new(timer: &TimerState) -> Self {
        Self {
            countdown: timer.countdown_text(),
            progress: timer.progress(),
            accent: timer.phase(),
            sessions: timer.completed_sessions(),
            notice: None,
        }
    }
}

impl Presenter for Screen {
    fn show_countdown(&mut self, text: &str) {
        self.countdown = text.into();
    }

    fn show_progress(&mut self, percent: f64) {
        self.progress = percent.clamp(0.0, 100.0);
    }

    fn set_accent(&mut self, phase: Phase) {
        self.accent = phase;
    }

    fn show_sessions(&mut self, count: u32) {
        self.sessions = count;
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}

// ============================================================================
// Scheduling
// ============================================================================

/// A single pending one-second tick. Stopping the timer leaves it armed; the
/// tick it delivers is ignored by the stopped timer.
#[derive(Debug, Default)]
pub struct TickSchedule {
    due: Option<Instant>,
}

impl TickSchedule {
    pub fn arm(&mut self, now: Instant) {
        self.due = Some(now + TICK_INTERVAL);
    }

    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }
}

// ============================================================================
// Application State
// ============================================================================

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum InputField {
    Work,
    Break,
}

impl InputField {
    fn next(self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }
}

pub struct App {
    timer: TimerState,
    schedule: TickSchedule,
    pub screen: Screen,
    pub work_input: String,
    pub break_input: String,
    pub focus: InputField,
    pub theme: ThemeName,
    pub show_help: bool,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let timer = TimerState::new(config.work_minutes, config.break_minutes)?;
        Ok(Self {
            screen: Screen::new(&timer),
            timer,
            schedule: TickSchedule::default(),
            work_input: config.work_minutes.to_string(),
            break_input: config.break_minutes.to_string(),
            focus: InputField::Work,
            theme: config.theme,
            show_help: false,
        })
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn start(&mut self, now: Instant) {
        if self.timer.start() {
            self.schedule.arm(now);
        }
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn reset(&mut self) {
        present(self.timer.reset(), &mut self.screen);
    }

    pub fn apply_settings(&mut self) {
        match self.timer.configure(&self.work_input, &self.break_input) {
            Ok(events) => present(events, &mut self.screen),
            Err(e) => {
                warn!(error = %e, "settings not applied");
                self.screen.show_notice(Notice::InvalidConfiguration);
            }
        }
    }

    /// Delivers a due tick. An open notice holds the countdown until dismissed.
    pub fn on_tick(&mut self, now: Instant) {
        if self.screen.notice.is_some() || !self.schedule.take_due(now) {
            return;
        }

        present(self.timer.tick(), &mut self.screen);
        if self.timer.is_running() && self.screen.notice.is_none() {
            self.schedule.arm(now);
        }
    }

    pub fn dismiss_notice(&mut self, now: Instant) {
        if self.screen.notice.take().is_some() && self.timer.is_running() {
            self.schedule.arm(now);
        }
    }

    /// How long the event loop may sleep before the next tick is due.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        if self.screen.notice.is_some() {
            return None;
        }
        self.schedule.time_until(now)
    }

    fn focused_input(&mut self) -> &mut String {
        match self.focus {
            InputField::Work => &mut self.work_input,
            InputField::Break => &mut self.break_input,
        }
    }

    /// Returns true when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if self.screen.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dismiss_notice(now);
            }
            return false;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('s') => self.start(now),
            KeyCode::Char('p') | KeyCode::Char('x') => self.stop(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('u') | KeyCode::Enter => self.apply_settings(),
            KeyCode::Char('t') => self.theme = self.theme.toggled(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.next(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let input = self.focused_input();
                if input.len() < MAX_INPUT_LEN {
                    input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.focused_input().pop();
            }
            other => debug!(key = ?other, "unbound key"),
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(work: u32, rest: u32) -> App {
        App::new(&Config { work_minutes: work, break_minutes: rest, ..Config::default() }).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Presenter for Recorder {
        fn show_countdown(&mut self, text: &str) {
            self.calls.push(format!("countdown {text}"));
        }
        fn show_progress(&mut self, percent: f64) {
            self.calls.push(format!("progress {percent:.0}"));
        }
        fn set_accent(&mut self, phase: Phase) {
            self.calls.push(format!("accent {phase:?}"));
        }
        fn show_sessions(&mut self, count: u32) {
            self.calls.push(format!("sessions {count}"));
        }
        fn show_notice(&mut self, notice: Notice) {
            self.calls.push(format!("notice {}", notice.message()));
        }
    }

    #[test]
    fn test_present_routes_events() {
        let mut recorder = Recorder::default();
        present(
            vec![
                TimerEvent::Sessions(2),
                TimerEvent::Countdown { text: "05:00".into(), progress: 0.0, phase: Phase::Break },
                TimerEvent::Notice(Notice::WorkComplete),
            ],
            &mut recorder,
        );
        assert_eq!(
            recorder.calls,
            vec![
                "sessions 2",
                "countdown 05:00",
                "progress 0",
                "accent Break",
                "notice Work session complete! Take a break!",
            ]
        );
    }

    #[test]
    fn test_new_app_mirrors_config() {
        let app = app_with(25, 5);
        assert_eq!(app.screen.countdown, "25:00");
        assert_eq!(app.screen.progress, 0.0);
        assert_eq!(app.work_input, "25");
        assert_eq!(app.break_input, "5");
        assert!(app.next_wakeup(Instant::now()).is_none());
    }

    #[test]
    fn test_new_app_rejects_zero_minutes() {
        assert!(App::new(&Config { work_minutes: 0, ..Config::default() }).is_err());
    }

    #[test]
    fn test_schedule_take_due() {
        let now = Instant::now();
        let mut schedule = TickSchedule::default();
        assert!(!schedule.take_due(now));

        schedule.arm(now);
        assert!(!schedule.take_due(now));
        assert_eq!(schedule.time_until(now), Some(TICK_INTERVAL));
        assert!(schedule.take_due(now + TICK_INTERVAL));
        assert!(schedule.time_until(now).is_none());
    }

    #[test]
    fn test_tick_only_when_due() {
        let now = Instant::now();
        let mut app = app_with(25, 5);
        app.start(now);

        app.on_tick(now + Duration::from_millis(500));
        assert_eq!(app.timer().remaining_secs(), 1500);

        app.on_tick(now + TICK_INTERVAL);
        assert_eq!(app.timer().remaining_secs(), 1499);
        assert_eq!(app.screen.countdown, "24:59");
        assert!(app.schedule.time_until(now).is_some());
    }

    #[test]
    fn test_double_start_arms_once() {
        let now = Instant::now();
        let mut app = app_with(25, 5);
        app.start(now);
        app.start(now + Duration::from_millis(900));

        app.on_tick(now + TICK_INTERVAL);
        assert_eq!(app.timer().remaining_secs(), 1499);
    }

    #[test]
    fn test_stray_tick_after_stop() {
        let now = Instant::now();
        let mut app = app_with(25, 5);
        app.start(now);
        app.stop();

        // the schedule still fires once, the timer ignores it
        assert!(app.schedule.time_until(now).is_some());
        app.on_tick(now + TICK_INTERVAL);
        assert_eq!(app.timer().remaining_secs(), 1500);
        assert!(app.schedule.time_until(now).is_none());
    }

    #[test]
    fn test_completion_notice_holds_countdown() {
        let mut now = Instant::now();
        let mut app = app_with(1, 1);
        app.start(now);
        for _ in 0..60 {
            now += TICK_INTERVAL;
            app.on_tick(now);
        }

        assert_eq!(app.screen.notice, Some(Notice::WorkComplete));
        assert_eq!(app.screen.sessions, 1);
        assert_eq!(app.screen.accent, Phase::Break);
        assert_eq!(app.screen.countdown, "01:00");
        assert!(app.next_wakeup(now).is_none());

        now += TICK_INTERVAL * 5;
        app.on_tick(now);
        assert_eq!(app.timer().remaining_secs(), 60);

        // keys other than dismissal are swallowed by the notice
        assert!(!app.handle_key(key(KeyCode::Char('q')), now));
        app.handle_key(key(KeyCode::Enter), now);
        assert!(app.screen.notice.is_none());
        app.on_tick(now + TICK_INTERVAL);
        assert_eq!(app.timer().remaining_secs(), 59);
    }

    #[test]
    fn test_settings_editing_and_apply() {
        let now = Instant::now();
        let mut app = app_with(25, 5);
        app.start(now);

        app.handle_key(key(KeyCode::Backspace), now);
        app.handle_key(key(KeyCode::Backspace), now);
        app.handle_key(key(KeyCode::Char('4')), now);
        app.handle_key(key(KeyCode::Char('0')), now);
        app.handle_key(key(KeyCode::Tab), now);
        app.handle_key(key(KeyCode::Backspace), now);
        app.handle_key(key(KeyCode::Char('8')), now);
        assert_eq!(app.work_input, "40");
        assert_eq!(app.break_input, "8");

        app.handle_key(key(KeyCode::Char('u')), now);
        assert!(!app.timer().is_running());
        assert_eq!(app.timer().remaining_secs(), 2400);
        assert_eq!(app.timer().break_duration_secs(), 480);
        assert_eq!(app.screen.countdown, "40:00");
    }

    #[test]
    fn test_invalid_settings_show_notice() {
        let now = Instant::now();
        let mut app = app_with(25, 5);
        app.break_input.clear();
        let before = app.timer().clone();

        app.handle_key(key(KeyCode::Enter), now);
        assert_eq!(app.screen.notice, Some(Notice::InvalidConfiguration));
        assert_eq!(app.timer(), &before);

        app.handle_key(key(KeyCode::Esc), now);
        assert!(app.screen.notice.is_none());
    }

    #[test]
    fn test_input_length_is_capped() {
        let now = Instant::now();
        let mut app = app_with(25, 5);
        for _ in 0..6 {
            app.handle_key(key(KeyCode::Char('9')), now);
        }
        assert_eq!(app.work_input, "2599");
    }

    #[test]
    fn test_reset_key_redraws_countdown() {
        let mut now = Instant::now();
        let mut app = app_with(25, 5);
        app.handle_key(key(KeyCode::Char('s')), now);
        for _ in 0..3 {
            now += TICK_INTERVAL;
            app.on_tick(now);
        }
        assert_eq!(app.screen.countdown, "24:57");

        app.handle_key(key(KeyCode::Char('r')), now);
        assert!(!app.timer().is_running());
        assert_eq!(app.screen.countdown, "25:00");
        assert_eq!(app.screen.progress, 0.0);
    }

    #[test]
    fn test_theme_help_and_quit_keys() {
        let now = Instant::now();
        let mut app = app_with(25, 5);

        app.handle_key(key(KeyCode::Char('t')), now);
        assert_eq!(app.theme, ThemeName::Dark);

        app.handle_key(key(KeyCode::Char('?')), now);
        assert!(app.show_help);
        assert!(!app.handle_key(key(KeyCode::Char('q')), now));
        assert!(!app.show_help);

        assert!(app.handle_key(key(KeyCode::Char('q')), now));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now));
    }
}
