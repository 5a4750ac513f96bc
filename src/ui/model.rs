use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::control::{ControlAction, StatusView, TimeInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Minutes,
    Seconds,
    SetLoop,
    UseCurrent,
    Disable,
}

const FOCUS_ORDER: [Focus; 5] = [
    Focus::Minutes,
    Focus::Seconds,
    Focus::SetLoop,
    Focus::UseCurrent,
    Focus::Disable,
];

impl Focus {
    fn step(self, forward: bool) -> Self {
        let idx = FOCUS_ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or(0);
        let len = FOCUS_ORDER.len();
        let next = if forward {
            idx.saturating_add(1).checked_rem(len).unwrap_or(0)
        } else {
            idx.checked_sub(1).unwrap_or(len.saturating_sub(1))
        };
        FOCUS_ORDER.get(next).copied().unwrap_or(Focus::Minutes)
    }

    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Minutes | Self::Seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    None,
    Quit,
    Action(ControlAction),
}

/// Everything the control screen shows, plus the input state behind it.
#[derive(Debug, Clone)]
pub struct ControlApp {
    pub minutes: TimeInput,
    pub seconds: TimeInput,
    pub focus: Focus,
    pub status: StatusView,
    pub alert: Option<String>,
    pub no_color: bool,
}

impl ControlApp {
    #[must_use]
    pub fn new(no_color: bool) -> Self {
        Self {
            minutes: TimeInput::minutes(),
            seconds: TimeInput::seconds(),
            focus: Focus::Minutes,
            status: StatusView::connecting(),
            alert: None,
            no_color,
        }
    }

    pub fn set_status(&mut self, status: StatusView) {
        self.status = status;
    }

    pub fn show_alert(&mut self, message: String) {
        self.alert = Some(message);
    }

    #[must_use]
    pub fn set_loop_action(&self) -> ControlAction {
        ControlAction::SetLoop {
            minutes: self.minutes.value(),
            seconds: self.seconds.value(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyOutcome::Quit;
        }
        // An alert blocks the screen until any key acknowledges it.
        if self.alert.take().is_some() {
            return KeyOutcome::None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyOutcome::Quit,
            KeyCode::Tab => {
                self.move_focus(true);
                KeyOutcome::None
            }
            KeyCode::BackTab => {
                self.move_focus(false);
                KeyOutcome::None
            }
            KeyCode::Char(ch) => {
                if self.status.controls_enabled
                    && let Some(input) = self.focused_input()
                {
                    input.push(ch);
                }
                KeyOutcome::None
            }
            KeyCode::Backspace => {
                if self.status.controls_enabled
                    && let Some(input) = self.focused_input()
                {
                    input.backspace();
                }
                KeyOutcome::None
            }
            KeyCode::Enter => self.press(),
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::PageUp
            | KeyCode::PageDown
            | KeyCode::Delete
            | KeyCode::Insert
            | KeyCode::F(_)
            | KeyCode::Null
            | KeyCode::CapsLock
            | KeyCode::ScrollLock
            | KeyCode::NumLock
            | KeyCode::PrintScreen
            | KeyCode::Pause
            | KeyCode::Menu
            | KeyCode::KeypadBegin
            | KeyCode::Media(_)
            | KeyCode::Modifier(_) => KeyOutcome::None,
        }
    }

    fn press(&mut self) -> KeyOutcome {
        if !self.status.controls_enabled {
            return KeyOutcome::None;
        }
        match self.focus {
            Focus::Minutes | Focus::Seconds => {
                self.seconds.blur();
                KeyOutcome::Action(self.set_loop_action())
            }
            Focus::SetLoop => KeyOutcome::Action(self.set_loop_action()),
            Focus::UseCurrent => KeyOutcome::Action(ControlAction::UseCurrent),
            Focus::Disable => KeyOutcome::Action(ControlAction::Disable),
        }
    }

    fn move_focus(&mut self, forward: bool) {
        match self.focus {
            Focus::Minutes => self.minutes.blur(),
            Focus::Seconds => self.seconds.blur(),
            Focus::SetLoop | Focus::UseCurrent | Focus::Disable => {}
        }
        self.focus = self.focus.step(forward);
    }

    fn focused_input(&mut self) -> Option<&mut TimeInput> {
        match self.focus {
            Focus::Minutes => Some(&mut self.minutes),
            Focus::Seconds => Some(&mut self.seconds),
            Focus::SetLoop | Focus::UseCurrent | Focus::Disable => None,
        }
    }
}
