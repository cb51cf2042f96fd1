use std::io;
use std::time::Duration;

use crossterm::event::Event;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Where terminal input comes from. The demo reads crossterm's global
/// queue; tests feed scripted events.
pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

impl<T: EventSource + ?Sized> EventSource for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermSource;

impl EventSource for CrosstermSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        crossterm::event::read()
    }
}

/// Single-threaded loop: tick, then drain whatever input is queued.
///
/// The handler gets `None` once per poll interval (time to redraw) and
/// `Some(event)` for each input event. Returning [`ControlFlow::Quit`]
/// ends the loop.
pub struct EventLoop<E> {
    source: E,
    poll_interval: Duration,
}

impl<E: EventSource> EventLoop<E> {
    pub fn new(source: E, poll_interval: Duration) -> Self {
        Self {
            source,
            poll_interval,
        }
    }

    pub fn source(&mut self) -> &mut E {
        &mut self.source
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(None)? {
                return Ok(());
            }

            if self.source.poll(self.poll_interval)? {
                // drain bursts (key repeat) before the next redraw
                loop {
                    let event = self.source.read()?;
                    if let ControlFlow::Quit = handler(Some(event))? {
                        return Ok(());
                    }
                    if !self.source.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted {
        events: VecDeque<Event>,
    }

    impl EventSource for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn drains_burst_between_ticks() {
        let source = Scripted {
            events: VecDeque::from([key('a'), key('b'), key('q')]),
        };
        let mut event_loop = EventLoop::new(source, Duration::from_millis(0));
        let mut seen = Vec::new();
        event_loop
            .run(|event| {
                let Some(Event::Key(key)) = event else {
                    seen.push('.');
                    return Ok(ControlFlow::Continue);
                };
                if key.code == KeyCode::Char('q') {
                    return Ok(ControlFlow::Quit);
                }
                if let KeyCode::Char(c) = key.code {
                    seen.push(c);
                }
                Ok(ControlFlow::Continue)
            })
            .expect("run");
        assert_eq!(seen, vec!['.', 'a', 'b']);
    }

    #[test]
    fn quits_on_tick() {
        let source = Scripted {
            events: VecDeque::from([key('a')]),
        };
        let mut event_loop = EventLoop::new(source, Duration::from_millis(0));
        let mut ticks = 0;
        event_loop
            .run(|_| {
                ticks += 1;
                Ok(ControlFlow::Quit)
            })
            .expect("run");
        assert_eq!(ticks, 1);
        assert_eq!(event_loop.source().events.len(), 1);
    }

    #[test]
    fn handler_errors_propagate() {
        let source = Scripted {
            events: VecDeque::new(),
        };
        let mut event_loop = EventLoop::new(source, Duration::from_millis(0));
        let err = event_loop
            .run(|_| Err(io::Error::other("boom")))
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
