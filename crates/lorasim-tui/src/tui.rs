//! Terminal session: raw mode, alternate screen, and the input/timer
//! events that drive the app loop.

use std::io::{Stdout, stdout};
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand, cursor,
    event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Housekeeping: toast expiry, "refreshed ago" label.
const TICK_RATE: Duration = Duration::from_millis(250);
const FRAME_RATE: Duration = Duration::from_millis(33);

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Render,
}

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input: EventStream,
    tick: Interval,
    frame: Interval,
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

impl Tui {
    /// Take over the terminal. It is handed back when the `Tui` drops.
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        stdout().execute(cursor::Hide)?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            input: EventStream::new(),
            tick: ticker(TICK_RATE),
            frame: ticker(FRAME_RATE),
        })
    }

    /// Next key press, resize or timer event. `None` once input closes.
    pub async fn next_event(&mut self) -> Option<Event> {
        loop {
            let event = tokio::select! {
                _ = self.tick.tick() => Event::Tick,
                _ = self.frame.tick() => Event::Render,
                input = self.input.next() => match input? {
                    Ok(TermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
                    Ok(TermEvent::Resize(w, h)) => Event::Resize(w, h),
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::warn!(error = %e, "terminal input failed");
                        return None;
                    }
                },
            };
            return Some(event);
        }
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        restore();
    }
}

/// Best-effort terminal restoration; errors are ignored.
fn restore() {
    let _ = stdout().execute(cursor::Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Install color-eyre hooks that restore the terminal before reporting.
///
/// Call before entering the terminal so panics during init are readable.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));
    Ok(())
}
