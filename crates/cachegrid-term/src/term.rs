//! Terminal input and output.
//!
//! [`Terminal`] is the crossterm back end: it puts the terminal in raw mode
//! on the alternate screen, turns crossterm events into [`Input`]s and writes
//! diff [`Frame`]s. Anything implementing [`Driver`] can stand in for it.

use std::error::Error;
use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind},
    queue,
    style::{self, Attribute, Color as CtColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::screen::{AttrMask, Color, Frame, Point};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A keyboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    /// A printable character.
    Char(char),
}

/// An input delivered to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// Sent once before anything else.
    Init,
    Key { key: Key, ctrl: bool },
    /// Primary mouse button pressed at a screen position.
    Click(Point),
    /// The terminal now has this size.
    Resize { width: i32, height: i32 },
}

impl Input {
    /// A key press without modifiers.
    pub fn key(key: Key) -> Self {
        Self::Key { key, ctrl: false }
    }
}

fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

/// The [`Input`] for a crossterm event, if it is one we use.
pub fn to_input(ev: Event) -> Option<Input> {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) if kind != KeyEventKind::Release => to_key(code).map(|key| Input::Key {
            key,
            ctrl: modifiers.contains(KeyModifiers::CONTROL),
        }),
        Event::Mouse(me) => match me.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Input::Click(Point::new(
                i32::from(me.column),
                i32::from(me.row),
            ))),
            _ => None,
        },
        Event::Resize(w, h) => Some(Input::Resize {
            width: i32::from(w),
            height: i32::from(h),
        }),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// A display back end.
pub trait Driver {
    fn init(&mut self) -> Result<(), Box<dyn Error>>;

    /// Wait briefly for input and send whatever arrived through `tx`.
    fn poll(&mut self, tx: &Sender<Input>) -> Result<(), Box<dyn Error>>;

    /// Apply a frame of changed glyphs.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn Error>>;

    /// Restore the terminal. Called exactly once, also after errors.
    fn close(&mut self);
}

fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

/// The crossterm back end.
pub struct Terminal {
    mouse_enabled: bool,
    poll_timeout: Duration,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
            poll_timeout: Duration::from_millis(50),
        }
    }

    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Current terminal size as `(width, height)`.
    pub fn size() -> io::Result<(i32, i32)> {
        let (w, h) = terminal::size()?;
        Ok((i32::from(w), i32::from(h)))
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for Terminal {
    fn init(&mut self) -> Result<(), Box<dyn Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            queue!(stdout, event::EnableMouseCapture)?;
        }
        stdout.flush()?;
        log::debug!("terminal initialized, mouse capture {}", self.mouse_enabled);
        Ok(())
    }

    fn poll(&mut self, tx: &Sender<Input>) -> Result<(), Box<dyn Error>> {
        if !event::poll(self.poll_timeout)? {
            return Ok(());
        }
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            if let Event::Resize(..) = ev {
                queue!(io::stdout(), terminal::Clear(ClearType::All))?;
            }
            if let Some(input) = to_input(ev) {
                tx.send(input)?;
            }
        }
        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn Error>> {
        let mut stdout = io::stdout().lock();
        for fc in &frame.cells {
            let (p, g) = (fc.pos, fc.glyph);
            queue!(
                stdout,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(g.style.fg)),
                SetBackgroundColor(to_ct_color(g.style.bg))
            )?;
            let attrs = g.style.attrs;
            if attrs.contains(AttrMask::BOLD) {
                queue!(stdout, style::SetAttribute(Attribute::Bold))?;
            }
            if attrs.contains(AttrMask::UNDERLINE) {
                queue!(stdout, style::SetAttribute(Attribute::Underlined))?;
            }
            if attrs.contains(AttrMask::REVERSE) {
                queue!(stdout, style::SetAttribute(Attribute::Reverse))?;
            }
            if attrs.contains(AttrMask::DIM) {
                queue!(stdout, style::SetAttribute(Attribute::Dim))?;
            }
            write!(stdout, "{}", g.ch)?;
            if attrs != AttrMask::NONE {
                queue!(stdout, style::SetAttribute(Attribute::Reset))?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = queue!(stdout, event::DisableMouseCapture);
        }
        let _ = queue!(
            stdout,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = stdout.flush();
        let _ = terminal::disable_raw_mode();
        log::debug!("terminal restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key_event(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn keys_map_to_inputs() {
        let ev = key_event(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(to_input(ev), Some(Input::key(Key::ArrowUp)));
        let ev = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(
            to_input(ev),
            Some(Input::Key {
                key: Key::Char('c'),
                ctrl: true
            })
        );
        let ev = key_event(KeyCode::F(5), KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(to_input(ev), None);
    }

    #[test]
    fn key_releases_are_ignored() {
        let ev = key_event(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(to_input(ev), None);
    }

    #[test]
    fn left_clicks_and_resizes() {
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(to_input(click), Some(Input::Click(Point::new(12, 4))));
        let right = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            column: 1,
            row: 1,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(to_input(right), None);
        assert_eq!(
            to_input(Event::Resize(80, 24)),
            Some(Input::Resize {
                width: 80,
                height: 24
            })
        );
    }

    #[test]
    fn default_color_resets() {
        assert_eq!(to_ct_color(Color::DEFAULT), CtColor::Reset);
        assert_eq!(
            to_ct_color(Color::from_rgb(1, 2, 3)),
            CtColor::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
