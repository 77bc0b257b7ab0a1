//! Fleet tree: servers with collapsible gateway and device groups.
//!
//! Holds the expansion state and the cursor; everything it draws comes
//! from [`lorasim_core::render`], recomputed whenever the snapshot or the
//! expansion state changes.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
};

use lorasim_core::{
    Availability, Command, DeviceView, FleetSnapshot, FleetView, GatewayAction, GatewayView,
    PresentationState, Row, ServerView, TreeLevel, render,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::create_form::FormKind;
use crate::theme;

pub struct FleetTree {
    snapshot: Arc<FleetSnapshot>,
    presentation: PresentationState,
    view: FleetView,
    selected: usize,
}

impl FleetTree {
    pub fn new() -> Self {
        let snapshot = Arc::new(FleetSnapshot::default());
        let presentation = PresentationState::new();
        let view = render(&snapshot, &presentation);
        Self {
            snapshot,
            presentation,
            view,
            selected: 0,
        }
    }

    pub fn snapshot(&self) -> &FleetSnapshot {
        &self.snapshot
    }

    fn rebuild(&mut self) {
        self.view = render(&self.snapshot, &self.presentation);
        self.selected = clamp(self.selected, self.view.rows().len());
    }

    fn selected_row(&self) -> Option<Row<'_>> {
        self.view.rows().get(self.selected).copied()
    }

    fn move_to(&mut self, index: usize) {
        self.selected = clamp(index, self.view.rows().len());
    }

    fn toggle_selected(&mut self) {
        let Some((level, server)) = self.selected_row().and_then(toggle_target) else {
            return;
        };
        self.presentation.toggle(level, &server);
        self.rebuild();
    }
}

/// Keep `index` inside a list of `len` rows.
fn clamp(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Expansion flag that Enter on `row` flips.
fn toggle_target(row: Row<'_>) -> Option<(TreeLevel, String)> {
    match row {
        Row::Server(server) => Some((TreeLevel::Server, server.name.clone())),
        Row::Group { server, level } => Some((level, server.name.clone())),
        _ => None,
    }
}

/// Action for an operation key on the selected row.
///
/// Keys that do not apply to the row are ignored; keys for an operation
/// the entity cannot perform explain why instead.
fn command_for(row: Row<'_>, key: char) -> Option<Action> {
    let command = match (key, row) {
        ('n', _) => return Some(Action::OpenForm(FormKind::Server)),
        ('a', Row::Group {
            server,
            level: TreeLevel::Devices,
        }) => {
            return Some(Action::OpenForm(FormKind::Device {
                server: server.name.clone(),
            }));
        }
        ('a', Row::Group { server, .. }) => {
            return Some(Action::OpenForm(FormKind::Gateway {
                server: server.name.clone(),
            }));
        }
        ('a', Row::Gateway { server, .. }) => {
            return Some(Action::OpenForm(FormKind::Gateway {
                server: server.to_owned(),
            }));
        }
        ('a', Row::Device { server, .. }) => {
            return Some(Action::OpenForm(FormKind::Device {
                server: server.to_owned(),
            }));
        }
        ('a', Row::Server(_)) => {
            return Some(Action::Notify(Notification::info(
                "Select the gateways or devices group to add to",
            )));
        }
        ('d', Row::Server(server)) => Command::DeleteServer {
            name: server.name.clone(),
        },
        ('s', Row::Server(server)) if server.can_sync() => Command::SyncServer {
            name: server.name.clone(),
        },
        ('s', Row::Server(server)) => {
            return Some(Action::Notify(Notification::info(format!(
                "{} has no upstream server to sync",
                server.name
            ))));
        }
        ('c', Row::Gateway { server, gateway }) => {
            let server = server.to_owned();
            let eui = gateway.eui.clone();
            match gateway.action {
                GatewayAction::Connect => Command::ConnectGateway { server, eui },
                GatewayAction::Disconnect => Command::DisconnectGateway { server, eui },
            }
        }
        ('d', Row::Gateway { server, gateway }) => Command::DeleteGateway {
            server: server.to_owned(),
            eui: gateway.eui.clone(),
        },
        ('j', Row::Device { server, device }) => {
            if let Availability::Disabled { reason } = device.join {
                return Some(Action::Notify(Notification::warning(format!(
                    "Cannot join: {reason}"
                ))));
            }
            Command::JoinDevice {
                server: server.to_owned(),
                eui: device.deveui.clone(),
            }
        }
        ('u', Row::Device { server, device }) => {
            if let Availability::Disabled { reason } = device.uplink {
                return Some(Action::Notify(Notification::warning(format!(
                    "Cannot send uplink: {reason}"
                ))));
            }
            Command::UplinkDevice {
                server: server.to_owned(),
                eui: device.deveui.clone(),
            }
        }
        ('d', Row::Device { server, device }) => Command::DeleteDevice {
            server: server.to_owned(),
            eui: device.deveui.clone(),
        },
        _ => return None,
    };
    Some(Action::Execute(command))
}

impl Component for FleetTree {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match (key.modifiers, key.code) {
            (_, KeyCode::Up) => Some(Action::SelectPrev),
            (_, KeyCode::Down) => Some(Action::SelectNext),
            (_, KeyCode::Home | KeyCode::Char('g')) => Some(Action::SelectFirst),
            (_, KeyCode::End | KeyCode::Char('G')) => Some(Action::SelectLast),
            (_, KeyCode::Enter | KeyCode::Char(' ')) => Some(Action::ToggleSelected),
            (KeyModifiers::NONE, KeyCode::Char(c)) => {
                self.selected_row().and_then(|row| command_for(row, c))
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::FleetUpdated(snapshot) => {
                self.snapshot = Arc::clone(snapshot);
                self.rebuild();
            }
            Action::SelectPrev => self.move_to(self.selected.saturating_sub(1)),
            Action::SelectNext => self.move_to(self.selected + 1),
            Action::SelectFirst => self.move_to(0),
            Action::SelectLast => self.move_to(usize::MAX),
            Action::ToggleSelected => self.toggle_selected(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Network servers ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let items: Vec<ListItem> = self
            .view
            .rows()
            .into_iter()
            .map(|row| ListItem::new(row_line(row)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme::selected())
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

// ── Row rendering ───────────────────────────────────────────────────

fn marker(expanded: bool) -> &'static str {
    if expanded { "▾ " } else { "▸ " }
}

fn row_line(row: Row<'_>) -> Line<'static> {
    let indent = Span::raw("  ".repeat(usize::from(row.depth())));
    let mut spans = vec![indent];
    match row {
        Row::Server(server) => spans.extend(server_spans(server)),
        Row::Group { server, level } => {
            let (expanded, count, label) = match level {
                TreeLevel::Gateways => (server.gateways.expanded, server.gateways.count, "Gateways"),
                _ => (server.devices.expanded, server.devices.count, "Devices"),
            };
            spans.push(Span::styled(
                format!("{}{label} ({count})", marker(expanded)),
                theme::group_label(),
            ));
        }
        Row::Gateway { gateway, .. } => spans.extend(gateway_spans(gateway)),
        Row::Device { device, .. } => spans.extend(device_spans(device)),
        Row::Empty { text, .. } => spans.push(Span::styled(text, theme::muted())),
    }
    Line::from(spans)
}

fn server_spans(server: &ServerView) -> Vec<Span<'static>> {
    let mut spans = vec![
        Span::styled(
            format!("{}{}", marker(server.expanded), server.name),
            theme::server_name(),
        ),
        Span::styled(format!("  {}", server.kind), theme::group_label()),
        Span::styled(
            format!(
                "  {} gateways · {} devices",
                server.gateways.count, server.devices.count
            ),
            theme::muted(),
        ),
    ];
    if let Some(ref url) = server.url {
        spans.push(Span::styled(format!("  → {url}"), theme::text()));
    }
    spans
}

fn gateway_spans(gateway: &GatewayView) -> Vec<Span<'static>> {
    let action = match gateway.action {
        GatewayAction::Connect => "c connect",
        GatewayAction::Disconnect => "c disconnect",
    };
    vec![
        Span::styled(gateway.eui.clone(), theme::text()),
        Span::raw("  "),
        Span::styled(
            format!("{:<12}", gateway.status.to_string()),
            theme::gateway_status(gateway.status),
        ),
        Span::styled(action, theme::key_hint()),
    ]
}

fn availability_span(label: &'static str, availability: Availability) -> Span<'static> {
    match availability {
        Availability::Available => Span::styled(label, theme::key_hint_key()),
        Availability::Disabled { .. } => Span::styled(label, theme::muted()),
    }
}

fn device_spans(device: &DeviceView) -> Vec<Span<'static>> {
    vec![
        Span::styled(device.deveui.clone(), theme::text()),
        Span::styled(
            format!("  {:<10}", device.devaddr.as_deref().unwrap_or("-")),
            Style::default().fg(theme::MUTED),
        ),
        Span::styled(
            format!("fcnt {}/{}  ", device.fcntup, device.fcntdn),
            theme::text(),
        ),
        availability_span("j join", device.join),
        Span::raw("  "),
        availability_span("u uplink", device.uplink),
    ]
}
