use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    /// Keep going, but wait for input no longer than this before the next
    /// idle call.
    WaitAtMost(Duration),
    Quit,
}

/// The single loop that drives the deck.
///
/// It is the only place that polls the input driver. Each iteration the
/// handler is called once with `None` (time to fire timers and draw), then
/// once per queued input event. Bursts are drained in one go so fast pointer
/// drags do not fall behind the screen.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Runs until the handler returns `ControlFlow::Quit`.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            let wait = match handler(&mut self.driver, None)? {
                ControlFlow::Quit => break,
                ControlFlow::Continue => self.poll_interval,
                ControlFlow::WaitAtMost(limit) => limit.min(self.poll_interval),
            };

            if self.driver.poll(wait)? {
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
