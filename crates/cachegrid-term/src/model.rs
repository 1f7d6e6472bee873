//! The game model: key bindings, mouse interaction and screen layout.
//!
//! A terminal has no position feed, so the world stays on
//! [`Controls::Buttons`](cachegrid_core::Controls) and the player moves with
//! the arrow keys. [`World::feed_position`] is there for front ends that
//! have one.

use cachegrid_core::{Cell, Direction, World};

use crate::app::{Effect, Model};
use crate::colors::*;
use crate::render::{MapLayout, ScreenRenderer};
use crate::screen::{AttrMask, Glyph, Point, Screen, Style};
use crate::term::{Input, Key};

/// Rows under the map: position line and status line.
pub const STATUS_ROWS: i32 = 2;

const HELP_TEXT: &str = "\
Move:          arrows / hjkl
Pan the view:  w a s d
Follow player: c
Begin again:   r
Use a cache:   click it (you can reach the highlighted ones)
Help:          ?
Save and quit: q or Esc

Pick up tokens, carry them to an equal token and click to combine.
Holding a token of the goal value wins.
Press any key to go back.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Help,
}

pub struct GameModel {
    world: World<ScreenRenderer>,
    mode: Mode,
    width: i32,
    height: i32,
}

impl GameModel {
    pub fn new(world: World<ScreenRenderer>) -> Self {
        Self {
            world,
            mode: Mode::Normal,
            width: 0,
            height: 0,
        }
    }

    pub fn world(&self) -> &World<ScreenRenderer> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<ScreenRenderer> {
        &mut self.world
    }

    pub fn into_world(self) -> World<ScreenRenderer> {
        self.world
    }

    /// Map placement for the current screen size and view.
    pub fn layout(&self) -> MapLayout {
        MapLayout::new(
            Point::new(0, 0),
            self.width,
            self.height - STATUS_ROWS,
            self.world.viewport().center,
        )
    }

    fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        let (rows, cols) = self.layout().view_size();
        self.world.resize_view(rows, cols);
        log::debug!("screen {width}x{height}, view {rows}x{cols} cells");
    }

    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    fn update_normal(&mut self, input: Input) -> Option<Effect> {
        match input {
            Input::Key { key, ctrl } => self.handle_key(key, ctrl),
            Input::Click(pos) => {
                if let Some(cell) = self.layout().cell_at(pos) {
                    self.world.click(cell);
                }
                None
            }
            _ => None,
        }
    }

    fn handle_key(&mut self, key: Key, ctrl: bool) -> Option<Effect> {
        if ctrl {
            return match key {
                Key::Char('c') => Some(Effect::End),
                _ => None,
            };
        }
        let dir = match key {
            Key::ArrowUp | Key::Char('k') => Direction::Up,
            Key::ArrowDown | Key::Char('j') => Direction::Down,
            Key::ArrowLeft | Key::Char('h') => Direction::Left,
            Key::ArrowRight | Key::Char('l') => Direction::Right,
            Key::Char(c @ ('w' | 'a' | 's' | 'd')) => {
                self.world.pan(pan_delta(c));
                return None;
            }
            Key::Char('c') => {
                self.world.recenter();
                return None;
            }
            Key::Char('r') => {
                self.world.reset();
                return None;
            }
            Key::Char('?') => {
                self.mode = Mode::Help;
                return None;
            }
            Key::Char('q') | Key::Escape => return Some(Effect::End),
            _ => return None,
        };
        self.world.move_player(dir);
        None
    }

    // -------------------------------------------------------------------
    // Draw
    // -------------------------------------------------------------------

    fn draw_map(&self, screen: &mut Screen) {
        let layout = self.layout();
        self.world
            .renderer()
            .paint(screen, &layout, self.world.player().cell());
    }

    fn draw_status(&self, screen: &mut Screen) {
        let y = self.height - STATUS_ROWS;
        let player = self.world.player();
        let info = format!(
            "{} cell {}{}",
            player.position,
            player.cell(),
            if player.following { "" } else { "  (view detached, c to follow)" },
        );
        screen.print(Point::new(0, y), &info, Style::default().with_fg(FG_DIM));

        let (text, style) = if self.world.has_won() {
            (
                format!("token of value {} reached. you win !", self.world.config().goal_value),
                Style::default().with_fg(YELLOW).with_attrs(AttrMask::BOLD),
            )
        } else {
            (
                self.world.status().to_string(),
                Style::default().with_fg(FG_EMPH),
            )
        };
        let end = screen.print(Point::new(0, y + 1), &text, style);
        screen.print(Point::new(end, y + 1), "   ? for help", Style::default().with_fg(FG_DIM));
    }

    fn draw_help(&self, screen: &mut Screen) {
        for (y, line) in HELP_TEXT.lines().enumerate() {
            screen.print(Point::new(1, y as i32 + 1), line, Style::default());
        }
    }
}

/// View movement for a WASD key: `w` shows more of the north.
fn pan_delta(c: char) -> Cell {
    match c {
        'w' => Direction::Up.delta(),
        's' => Direction::Down.delta(),
        'a' => Direction::Left.delta(),
        _ => Direction::Right.delta(),
    }
}

impl Model for GameModel {
    fn update(&mut self, input: Input) -> Option<Effect> {
        match input {
            Input::Init => {
                log::info!("starting at {}", self.world.player().position);
                None
            }
            Input::Resize { width, height } => {
                self.resize(width, height);
                None
            }
            _ => match self.mode {
                Mode::Normal => self.update_normal(input),
                Mode::Help => {
                    if matches!(input, Input::Key { .. }) {
                        self.mode = Mode::Normal;
                    }
                    None
                }
            },
        }
    }

    fn draw(&self, screen: &mut Screen) {
        screen.fill(Glyph::new(' ', Style::default().with_bg(BG)));
        match self.mode {
            Mode::Help => self.draw_help(screen),
            Mode::Normal => {
                self.draw_map(screen);
                self.draw_status(screen);
            }
        }
    }
}
