//! Application core: event loop, action dispatch, overlays.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lorasim_core::{Command, CommandEvent, CommandPhase, Controller};

use crate::action::{Action, ConnectionStatus, Notification};
use crate::component::Component;
use crate::create_form::{CreateForm, FormEvent};
use crate::data_bridge;
use crate::fleet_tree::FleetTree;
use crate::theme;
use crate::tui::{Event, Tui};

const TOAST_TTL: Duration = Duration::from_secs(4);

/// A destructive command waiting for y/n.
struct PendingConfirm {
    command: Command,
    prompt: String,
}

/// Top-level application state and event loop.
pub struct App {
    controller: Controller,
    tree: FleetTree,
    running: bool,
    connection: ConnectionStatus,
    refreshing: bool,
    /// Commands that have not reached `Idle`, by command id.
    in_flight: BTreeMap<u64, CommandEvent>,
    help_visible: bool,
    pending_confirm: Option<PendingConfirm>,
    form: Option<CreateForm>,
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            tree: FleetTree::new(),
            running: true,
            connection: ConnectionStatus::default(),
            refreshing: false,
            in_flight: BTreeMap::new(),
            help_visible: false,
            pending_confirm: None,
            form: None,
            notification: None,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;

        let controller = self.controller.clone();
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            data_bridge::spawn_data_bridge(controller, tx, cancel).await;
        });

        info!(backend = %self.controller.config().url, "TUI event loop started");

        while self.running {
            let Some(event) = tui.next_event().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Overlays capture input first, then
    /// global keys, then the tree.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(form) = self.form.as_mut() {
            let event = form.handle_key(key);
            return Ok(match event {
                FormEvent::Editing => None,
                FormEvent::Cancelled => {
                    self.form = None;
                    None
                }
                FormEvent::Submitted(command) => {
                    self.form = None;
                    Some(Action::Execute(command))
                }
            });
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::RequestRefresh)),
            _ => {}
        }

        self.tree.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Render | Action::Resize(..) => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > TOAST_TTL)
                {
                    self.notification = None;
                }
            }

            Action::FleetUpdated(_)
            | Action::SelectPrev
            | Action::SelectNext
            | Action::SelectFirst
            | Action::SelectLast
            | Action::ToggleSelected => {
                if let Some(follow_up) = self.tree.update(action)? {
                    self.action_tx.send(follow_up)?;
                }
            }

            Action::CommandProgress(event) => {
                debug!(id = event.id, phase = %event.phase, "{}", event.label);
                if event.phase == CommandPhase::Idle {
                    self.in_flight.remove(&event.id);
                } else {
                    self.in_flight.insert(event.id, event.clone());
                }
            }

            Action::RefreshStarted => self.refreshing = true,

            Action::RefreshFinished(status) => {
                self.refreshing = false;
                self.connection = status.clone();
            }

            Action::RequestRefresh => {
                if !self.refreshing {
                    let controller = self.controller.clone();
                    let tx = self.action_tx.clone();
                    tokio::spawn(async move {
                        data_bridge::refresh(&controller, &tx).await;
                    });
                }
            }

            Action::Execute(command) => match command.confirmation_prompt() {
                Some(prompt) => {
                    self.pending_confirm = Some(PendingConfirm {
                        command: command.clone(),
                        prompt,
                    });
                }
                None => self.execute_command(command.clone()),
            },

            Action::ConfirmYes => {
                if let Some(pending) = self.pending_confirm.take() {
                    self.execute_command(pending.command);
                }
            }

            Action::ConfirmNo => self.pending_confirm = None,

            Action::OpenForm(kind) => self.form = Some(CreateForm::new(kind.clone())),

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),
        }
        Ok(())
    }

    /// Run a command in the background; its outcome arrives as a toast,
    /// its progress through the data bridge.
    fn execute_command(&self, command: Command) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let outcome = controller.execute(command).await;
            if let Some(message) = outcome.failure_message() {
                warn!(%message, "command failed");
            }
            if let Some(toast) = Notification::for_outcome(&outcome) {
                let _ = tx.send(Action::Notify(toast));
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.tree.render(frame, content);
        self.render_status_bar(frame, status);

        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
        if let Some(ref form) = self.form {
            form.render(frame, centered(area, 64, form.height()));
        }
        if let Some(ref pending) = self.pending_confirm {
            render_confirm_dialog(frame, area, &pending.prompt);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let connection = match &self.connection {
            ConnectionStatus::Connected => {
                Span::styled("● connected", Style::default().fg(theme::OK_GREEN))
            }
            ConnectionStatus::Connecting => {
                Span::styled("◐ connecting", Style::default().fg(theme::WARN_AMBER))
            }
            ConnectionStatus::Unreachable(reason) => Span::styled(
                format!("○ {reason}"),
                Style::default().fg(theme::FAIL_RED),
            ),
        };

        let activity = if self.refreshing {
            "refreshing…".to_owned()
        } else if let Some(event) = self.in_flight.values().next_back() {
            format!("{}: {}", event.label, event.phase)
        } else {
            refreshed_ago(self.tree.snapshot().refreshed_at(), Utc::now())
        };

        let line = Line::from(vec![
            Span::raw(" "),
            connection,
            Span::styled(
                format!("  {}  ", self.controller.config().url),
                theme::text(),
            ),
            Span::styled(activity, theme::muted()),
            Span::styled("   r ", theme::key_hint_key()),
            Span::styled("refresh ", theme::key_hint()),
            Span::styled("? ", theme::key_hint_key()),
            Span::styled("help ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Status-bar age of the tree, e.g. `refreshed 12s ago`.
fn refreshed_ago(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = at else {
        return "not loaded yet".into();
    };
    let secs = (now - at).num_seconds().max(0).unsigned_abs();
    format!(
        "refreshed {} ago",
        humantime::format_duration(Duration::from_secs(secs))
    )
}

/// Centered `width` x `height` rectangle inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn overlay_block(title: &'static str, border: Style) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(Style::default().bg(theme::BG_OVERLAY))
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, prompt: &str) {
    let dialog = centered(area, 60, 6);
    frame.render_widget(Clear, dialog);

    let block = overlay_block(" Confirm ", Style::default().fg(theme::WARN_AMBER));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let text = vec![
        Line::from(Span::styled(format!(" {prompt}"), theme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" y ", theme::key_hint_key()),
            Span::styled("delete    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 70).min(area.width);
    let height = 3u16.min(area.height);
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 1);
    let toast = Rect::new(x, y, width, height);

    let (color, icon) = theme::notification(notif.level);
    frame.render_widget(Clear, toast);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_OVERLAY));
    let inner = block.inner(toast);
    frame.render_widget(block, toast);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notif.message.clone(), theme::text()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    const KEYS: &[(&str, &str)] = &[
        ("↑/↓ g/G", "Move / jump to top or bottom"),
        ("Enter", "Expand or collapse"),
        ("c", "Connect or disconnect gateway"),
        ("j", "Send join"),
        ("u", "Send uplink"),
        ("s", "Sync server with upstream"),
        ("n", "New network server"),
        ("a", "Add gateway or device to group"),
        ("d", "Delete (asks first)"),
        ("r", "Refresh"),
        ("q", "Quit"),
    ];

    let help = centered(area, 52, 16);
    frame.render_widget(Clear, help);
    let block = overlay_block(" Keys ", theme::border_focused());
    let inner = block.inner(help);
    frame.render_widget(block, help);

    let mut lines = vec![Line::from("")];
    lines.extend(KEYS.iter().map(|(key, what)| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(*what, theme::key_hint()),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Esc or ? to close",
        theme::key_hint(),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;
    use lorasim_core::ControllerConfig;

    use super::*;
    use crate::create_form::FormKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn create_form_captures_keys_until_closed() {
        let controller = Controller::new(ControllerConfig::local().unwrap()).unwrap();
        let mut app = App::new(controller);
        app.process_action(&Action::OpenForm(FormKind::Server)).unwrap();

        assert!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap().is_none());
        assert!(app.form.is_some());

        assert!(app.handle_key_event(key(KeyCode::Esc)).unwrap().is_none());
        assert!(app.form.is_none());
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('q'))).unwrap(),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn refresh_age_is_humanised() {
        let now = Utc::now();
        assert_eq!(
            refreshed_ago(Some(now - TimeDelta::seconds(75)), now),
            "refreshed 1m 15s ago"
        );
        assert_eq!(refreshed_ago(None, now), "not loaded yet");
    }

    #[test]
    fn clock_skew_never_goes_negative() {
        let now = Utc::now();
        assert_eq!(
            refreshed_ago(Some(now + TimeDelta::seconds(3)), now),
            "refreshed 0s ago"
        );
    }

    #[test]
    fn centered_rect_fits_small_terminals() {
        let rect = centered(Rect::new(0, 0, 30, 5), 60, 6);
        assert!(rect.width <= 26);
        assert!(rect.height <= 3);
    }
}
