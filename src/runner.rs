use std::io;
use std::time::{Duration, Instant};

use crate::app::Deck;
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};

/// Drives `deck` until it asks to quit: events are routed as they arrive,
/// timers fire and the screen is redrawn on every idle turn of the loop.
/// Input is awaited for at most `poll_interval`, or less when a deck timer
/// is due sooner.
pub fn run_deck<I, O>(
    input: &mut I,
    output: &mut O,
    deck: &mut Deck,
    poll_interval: Duration,
) -> io::Result<()>
where
    I: InputDriver,
    O: OutputDriver,
{
    let mut event_loop = EventLoop::new(input, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    event_loop.run(|_driver, event| {
        let now = Instant::now();
        let idle = event.is_none();
        match event {
            Some(event) => deck.handle_event(&event, now),
            None => {
                deck.tick(now);
                output.draw(|mut frame| deck.render(&mut frame))?;
            }
        }
        if deck.should_quit() {
            tracing::info!("quit requested");
            return Ok(ControlFlow::Quit);
        }
        Ok(match deck.next_deadline() {
            Some(deadline) if idle => {
                ControlFlow::WaitAtMost(deadline.saturating_duration_since(Instant::now()))
            }
            _ => ControlFlow::Continue,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DeckOptions;
    use crate::layout::Viewport;
    use crate::persistence::LayoutStore;
    use crate::ui::UiFrame;
    use crate::window::{LifecycleState, PanelKind};
    use crate::constants::{COLLAPSE_DELAY, IDLE_SWEEP_INTERVAL};
    use crossterm::event::{
        Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use std::collections::VecDeque;

    /// Replays events; a `None` entry makes one poll come back empty.
    struct Scripted(VecDeque<Option<Event>>, Vec<Duration>);

    impl InputDriver for Scripted {
        fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
            self.1.push(timeout);
            if let Some(None) = self.0.front() {
                self.0.pop_front();
                return Ok(false);
            }
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .flatten()
                .ok_or_else(|| io::Error::other("no scripted events left"))
        }
    }

    struct BufferOutput {
        buffer: Buffer,
        frames: usize,
    }

    impl OutputDriver for BufferOutput {
        fn enter(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn exit(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn draw<F>(&mut self, f: F) -> io::Result<()>
        where
            F: FnOnce(UiFrame<'_>),
        {
            self.frames += 1;
            let area = self.buffer.area;
            f(UiFrame::from_parts(area, &mut self.buffer));
            Ok(())
        }
    }

    #[test]
    fn scripted_session_opens_panel_then_quits() {
        let alt = |c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT));
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        let mut input = Scripted(VecDeque::from(vec![Some(alt('3')), Some(quit)]), Vec::new());
        let area = Rect {
            x: 0,
            y: 0,
            width: 100,
            height: 30,
        };
        let mut output = BufferOutput {
            buffer: Buffer::empty(area),
            frames: 0,
        };
        let mut deck = Deck::new(
            Viewport::from_rect(area),
            LayoutStore::in_memory(),
            DeckOptions::default(),
            Instant::now(),
        );
        run_deck(&mut input, &mut output, &mut deck, Duration::from_millis(0)).unwrap();
        assert!(deck.should_quit());
        assert_eq!(output.frames, 1);
        assert_eq!(
            deck.registry().state_of(PanelKind::CognitiveLoad),
            LifecycleState::Open
        );
    }

    #[test]
    fn pending_collapse_shortens_the_poll() {
        let mouse = |kind, column, row| {
            Some(Event::Mouse(MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            }))
        };
        let area = Rect {
            x: 0,
            y: 0,
            width: 100,
            height: 30,
        };
        let mut deck = Deck::new(
            Viewport::from_rect(area),
            LayoutStore::in_memory(),
            DeckOptions::default(),
            Instant::now(),
        );
        let header = deck.toolbar().rect();
        let (gx, gy) = (header.x + 2, header.y + 1);
        // Dock the launcher left and move away so its collapse timer is armed,
        // then let one idle turn pass before quitting.
        let mut input = Scripted(
            VecDeque::from(vec![
                mouse(MouseEventKind::Down(MouseButton::Left), gx, gy),
                mouse(MouseEventKind::Drag(MouseButton::Left), 2, gy),
                mouse(MouseEventKind::Up(MouseButton::Left), 2, gy),
                mouse(MouseEventKind::Moved, 60, 20),
                None,
                Some(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL))),
            ]),
            Vec::new(),
        );
        let mut output = BufferOutput {
            buffer: Buffer::empty(area),
            frames: 0,
        };
        run_deck(&mut input, &mut output, &mut deck, Duration::from_secs(3600)).unwrap();

        assert_eq!(output.frames, 2);
        let waits = &input.1;
        let first = waits.first().copied().unwrap();
        let last = waits.last().copied().unwrap();
        // The idle sweep is the only timer at first; then the collapse is.
        assert!(first <= IDLE_SWEEP_INTERVAL && first > COLLAPSE_DELAY, "{waits:?}");
        assert!(last <= COLLAPSE_DELAY, "{waits:?}");
    }
}
