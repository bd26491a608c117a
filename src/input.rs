//! Turns terminal key events into the held-key state the game polls.
//!
//! Terminals that report key releases give exact down/up state. Elsewhere a
//! key counts as down for a short window after each press or auto-repeat.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::time::{Duration, Instant};

use crate::host::Keys;

#[derive(Default)]
struct Held {
    down: bool,
    /// Pressed since the last poll; a tap inside one frame still counts.
    latched: bool,
    last: Option<Instant>,
}

impl Held {
    fn press(&mut self, now: Instant) {
        self.down = true;
        self.latched = true;
        self.last = Some(now);
    }

    fn poll(&mut self, now: Instant, hold: Duration, releases: bool) -> bool {
        let down = if releases {
            self.down
        } else {
            self.last.is_some_and(|t| now.duration_since(t) < hold)
        };
        std::mem::take(&mut self.latched) || down
    }
}

pub struct KeyState {
    hold: Duration,
    releases: bool,
    start: Held,
    ascend: Held,
}

impl KeyState {
    pub fn new(hold: Duration, releases: bool) -> Self {
        Self {
            hold,
            releases,
            start: Held::default(),
            ascend: Held::default(),
        }
    }

    /// Returns true when the key asks to quit.
    pub fn handle(&mut self, key: KeyEvent, now: Instant) -> bool {
        let held = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return key.kind == KeyEventKind::Press,
            KeyCode::Char(' ') => &mut self.start,
            KeyCode::Up => &mut self.ascend,
            _ => return false,
        };
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => held.press(now),
            KeyEventKind::Release => held.down = false,
        }
        false
    }

    pub fn poll(&mut self, now: Instant) -> Keys {
        Keys {
            start: self.start.poll(now, self.hold, self.releases),
            ascend: self.ascend.poll(now, self.hold, self.releases),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    const HOLD: Duration = Duration::from_millis(150);

    #[test]
    fn hold_window_without_release_events() {
        let t0 = Instant::now();
        let mut keys = KeyState::new(HOLD, false);
        keys.handle(event(KeyCode::Up, KeyEventKind::Press), t0);

        assert!(keys.poll(t0 + Duration::from_millis(100)).ascend);
        assert!(!keys.poll(t0 + Duration::from_millis(200)).ascend);

        keys.handle(event(KeyCode::Up, KeyEventKind::Repeat), t0 + Duration::from_millis(200));
        assert!(keys.poll(t0 + Duration::from_millis(300)).ascend);
    }

    #[test]
    fn release_events_give_exact_state() {
        let t0 = Instant::now();
        let mut keys = KeyState::new(HOLD, true);
        keys.handle(event(KeyCode::Char(' '), KeyEventKind::Press), t0);
        assert!(keys.poll(t0 + Duration::from_secs(5)).start);

        keys.handle(event(KeyCode::Char(' '), KeyEventKind::Release), t0 + Duration::from_secs(5));
        assert!(!keys.poll(t0 + Duration::from_secs(5)).start);
    }

    #[test]
    fn tap_within_one_frame_is_seen_once() {
        let t0 = Instant::now();
        let mut keys = KeyState::new(HOLD, true);
        keys.handle(event(KeyCode::Char(' '), KeyEventKind::Press), t0);
        keys.handle(event(KeyCode::Char(' '), KeyEventKind::Release), t0);
        assert_eq!(keys.poll(t0), Keys { start: true, ascend: false });
        assert_eq!(keys.poll(t0), Keys::default());
    }

    #[test]
    fn quit_keys() {
        let t0 = Instant::now();
        let mut keys = KeyState::new(HOLD, false);
        assert!(keys.handle(event(KeyCode::Char('q'), KeyEventKind::Press), t0));
        assert!(keys.handle(event(KeyCode::Esc, KeyEventKind::Press), t0));
        assert!(!keys.handle(event(KeyCode::Esc, KeyEventKind::Release), t0));
        assert!(!keys.handle(event(KeyCode::Left, KeyEventKind::Press), t0));
    }
}
