//! The update loop: [`Model`], [`Effect`], [`App`].

use std::error::Error;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::screen::{compute_frame, Screen};
use crate::term::{Driver, Input};

/// What a model asks of the loop after an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Stop the loop.
    End,
}

pub trait Model {
    fn update(&mut self, input: Input) -> Option<Effect>;

    /// Render the current state into `screen`.
    fn draw(&self, screen: &mut Screen);
}

pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(model: M, driver: D, width: i32, height: i32) -> Self {
        Self {
            model,
            driver,
            width,
            height,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Give back the model, e.g. to save it after the loop ended.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Run until the model returns [`Effect::End`] or the driver fails.
    ///
    /// The model first receives [`Input::Init`] and a [`Input::Resize`] with
    /// the starting size. The driver is closed on every way out.
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.driver.init()?;
        let (tx, rx) = mpsc::channel();
        let result = self.event_loop(&tx, &rx);
        self.driver.close();
        result
    }

    fn event_loop(&mut self, tx: &Sender<Input>, rx: &Receiver<Input>) -> Result<(), Box<dyn Error>> {
        tx.send(Input::Init)?;
        tx.send(Input::Resize {
            width: self.width,
            height: self.height,
        })?;
        let mut prev = Screen::new(self.width, self.height);
        let mut curr = Screen::new(self.width, self.height);
        loop {
            if self.process_pending(rx, &mut prev, &mut curr)? {
                return Ok(());
            }
            self.driver.poll(tx)?;
        }
    }

    /// Drain queued inputs, then draw and flush once. Returns `true` when the
    /// model asked to stop.
    fn process_pending(
        &mut self,
        rx: &Receiver<Input>,
        prev: &mut Screen,
        curr: &mut Screen,
    ) -> Result<bool, Box<dyn Error>> {
        let mut needs_draw = false;
        while let Ok(input) = rx.try_recv() {
            if let Input::Resize { width, height } = input {
                self.width = width;
                self.height = height;
                *curr = Screen::new(width, height);
            }
            if let Some(Effect::End) = self.model.update(input) {
                log::debug!("model requested exit");
                return Ok(true);
            }
            needs_draw = true;
        }
        if needs_draw {
            self.model.draw(curr);
            let frame = compute_frame(prev, curr);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            prev.clone_from(curr);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{Frame, Glyph, Point, Style};
    use crate::term::Key;
    use std::collections::VecDeque;

    /// Plays back queued inputs, one batch per poll.
    #[derive(Default)]
    struct Scripted {
        batches: VecDeque<Vec<Input>>,
        frames: Vec<Frame>,
        closed: bool,
    }

    impl Driver for Scripted {
        fn init(&mut self) -> Result<(), Box<dyn Error>> {
            Ok(())
        }

        fn poll(&mut self, tx: &Sender<Input>) -> Result<(), Box<dyn Error>> {
            let batch = self.batches.pop_front().ok_or("script exhausted")?;
            for input in batch {
                tx.send(input)?;
            }
            Ok(())
        }

        fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn Error>> {
            self.frames.push(frame);
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    /// Counts key presses and prints the count.
    #[derive(Default)]
    struct Counter {
        presses: u32,
        seen: Vec<Input>,
    }

    impl Model for Counter {
        fn update(&mut self, input: Input) -> Option<Effect> {
            self.seen.push(input);
            match input {
                Input::Key { key: Key::Char('q'), .. } => Some(Effect::End),
                Input::Key { .. } => {
                    self.presses += 1;
                    None
                }
                _ => None,
            }
        }

        fn draw(&self, screen: &mut Screen) {
            screen.fill(Glyph::default());
            screen.print(Point::new(0, 0), &self.presses.to_string(), Style::default());
        }
    }

    #[test]
    fn init_and_size_come_first() {
        let driver = Scripted {
            batches: VecDeque::from([vec![Input::key(Key::Char('q'))]]),
            ..Scripted::default()
        };
        let mut app = App::new(Counter::default(), driver, 10, 2);
        app.run().unwrap();
        let seen = &app.model().seen;
        assert_eq!(seen[0], Input::Init);
        assert_eq!(seen[1], Input::Resize { width: 10, height: 2 });
        assert!(app.driver.closed);
    }

    #[test]
    fn only_changes_are_flushed() {
        let driver = Scripted {
            batches: VecDeque::from([
                vec![Input::key(Key::Enter)],
                vec![Input::Click(Point::new(0, 0))],
                vec![Input::key(Key::Char('q'))],
            ]),
            ..Scripted::default()
        };
        let mut app = App::new(Counter::default(), driver, 10, 2);
        app.run().unwrap();
        let frames = &app.driver.frames;
        // "0" on start, "1" after Enter, nothing new after the click.
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].cells.len(), 1);
        assert_eq!(frames[1].cells[0].glyph.ch, '1');
        assert_eq!(app.into_model().presses, 1);
    }

    #[test]
    fn driver_errors_close_and_propagate() {
        let mut app = App::new(Counter::default(), Scripted::default(), 4, 1);
        assert!(app.run().is_err());
        assert!(app.driver.closed);
    }
}
