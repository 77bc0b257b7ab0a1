//! Create dialogs for network servers, gateways and devices.
//!
//! A form collects raw text; the core request builders validate it.
//! Validation errors stay in the dialog so the operator can fix the
//! field instead of retyping everything.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use lorasim_core::{
    Command, CoreError, NewDevice, NewGateway, NewServer, ServerKind, parse_devnonce,
};

use crate::theme;

const SERVER_KINDS: [ServerKind; 4] = [
    ServerKind::Generic,
    ServerKind::Loriot,
    ServerKind::ChirpStack,
    ServerKind::Ttn,
];

const LABEL_WIDTH: usize = 14;

/// What the dialog creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Server,
    Gateway { server: String },
    Device { server: String },
}

/// Result of feeding one key to the form.
#[derive(Debug)]
pub enum FormEvent {
    Editing,
    Cancelled,
    Submitted(Command),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Kind,
    Name,
    Url,
    Secret,
    Eui,
    DiscoveryUri,
    DevEui,
    JoinEui,
    AppKey,
    DevNonce,
}

impl Field {
    fn label(self, kind: ServerKind) -> &'static str {
        match self {
            Self::Kind => "Type",
            Self::Name => "Name",
            Self::Url => "URL",
            Self::Secret if kind == ServerKind::Loriot => "Auth header",
            Self::Secret => "API key",
            Self::Eui => "Gateway EUI",
            Self::DiscoveryUri => "Discovery URI",
            Self::DevEui => "DevEUI",
            Self::JoinEui => "JoinEUI",
            Self::AppKey => "AppKey",
            Self::DevNonce => "DevNonce",
        }
    }

    fn placeholder(self, kind: ServerKind) -> &'static str {
        match (self, kind) {
            (Self::Name, _) => "my-server",
            (Self::Url, ServerKind::Loriot) => "https://eu1.loriot.io",
            (Self::Url, ServerKind::Ttn) => "https://eu1.cloud.thethings.network",
            (Self::Url, _) => "https://chirpstack.example.com",
            (Self::Secret, ServerKind::Loriot) => "Bearer your-token-here",
            (Self::Secret, _) => "your-api-key",
            (Self::Eui, _) => "AABBCCDDEEFF0011",
            (Self::DiscoveryUri, _) => "ws://localhost:3001",
            (Self::DevEui | Self::JoinEui, _) => "0011223344556677",
            (Self::AppKey, _) => "00112233445566770011223344556677",
            _ => "",
        }
    }
}

fn kind_label(kind: ServerKind) -> &'static str {
    match kind {
        ServerKind::Generic => "Generic",
        ServerKind::Loriot => "LORIOT",
        ServerKind::ChirpStack => "ChirpStack",
        ServerKind::Ttn => "The Things Network (TTN)",
        ServerKind::Unknown => "Unknown",
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

pub struct CreateForm {
    kind: FormKind,
    server_kind: ServerKind,
    values: BTreeMap<Field, String>,
    focus: usize,
    error: Option<String>,
}

impl CreateForm {
    pub fn new(kind: FormKind) -> Self {
        let mut values = BTreeMap::new();
        if matches!(kind, FormKind::Device { .. }) {
            values.insert(Field::DevNonce, "0".to_owned());
        }
        Self {
            kind,
            server_kind: ServerKind::Generic,
            values,
            focus: 0,
            error: None,
        }
    }

    pub fn title(&self) -> String {
        match &self.kind {
            FormKind::Server => " New network server ".to_owned(),
            FormKind::Gateway { server } => format!(" New gateway on {server} "),
            FormKind::Device { server } => format!(" New device on {server} "),
        }
    }

    /// Fields currently shown, in tab order.
    fn fields(&self) -> Vec<Field> {
        match self.kind {
            FormKind::Server if self.server_kind == ServerKind::Generic => {
                vec![Field::Kind, Field::Name]
            }
            FormKind::Server => vec![Field::Kind, Field::Name, Field::Url, Field::Secret],
            FormKind::Gateway { .. } => vec![Field::Eui, Field::DiscoveryUri],
            FormKind::Device { .. } => {
                vec![Field::DevEui, Field::JoinEui, Field::AppKey, Field::DevNonce]
            }
        }
    }

    fn focused(&self) -> Field {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    fn value(&self, field: Field) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    fn cycle_kind(&mut self, forward: bool) {
        let len = SERVER_KINDS.len();
        let current = SERVER_KINDS
            .iter()
            .position(|k| *k == self.server_kind)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.server_kind = SERVER_KINDS[next];
        self.focus = self.focus.min(self.fields().len() - 1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        let field = self.focused();
        if key.code != KeyCode::Enter {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc => return FormEvent::Cancelled,
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields().len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                let len = self.fields().len();
                self.focus = (self.focus + len - 1) % len;
            }
            KeyCode::Left if field == Field::Kind => self.cycle_kind(false),
            KeyCode::Right | KeyCode::Char(' ') if field == Field::Kind => {
                self.cycle_kind(true);
            }
            KeyCode::Backspace if field != Field::Kind => {
                self.values.entry(field).or_default().pop();
            }
            KeyCode::Char(c)
                if field != Field::Kind && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.values.entry(field).or_default().push(c);
            }
            _ => {}
        }
        FormEvent::Editing
    }

    fn submit(&mut self) -> FormEvent {
        match self.command() {
            Ok(command) => FormEvent::Submitted(command),
            Err(err) => {
                self.error = Some(err.user_message());
                FormEvent::Editing
            }
        }
    }

    /// Validate the input into the command it describes.
    fn command(&self) -> Result<Command, CoreError> {
        match &self.kind {
            FormKind::Server => {
                let secret = non_empty(self.value(Field::Secret));
                let (auth_header, api_key) = match self.server_kind {
                    ServerKind::Loriot => (secret, None),
                    ServerKind::ChirpStack | ServerKind::Ttn => (None, secret),
                    ServerKind::Generic | ServerKind::Unknown => (None, None),
                };
                let url = match self.server_kind {
                    ServerKind::Generic => None,
                    _ => non_empty(self.value(Field::Url)),
                };
                let request = NewServer {
                    name: self.value(Field::Name).to_owned(),
                    kind: self.server_kind,
                    url,
                    auth_header,
                    api_key,
                }
                .validate()?;
                Ok(Command::CreateServer(request))
            }
            FormKind::Gateway { server } => {
                let request = NewGateway {
                    eui: self.value(Field::Eui).to_owned(),
                    discovery_uri: self.value(Field::DiscoveryUri).to_owned(),
                    ..NewGateway::default()
                }
                .validate()?;
                Ok(Command::CreateGateway {
                    server: server.clone(),
                    request,
                })
            }
            FormKind::Device { server } => {
                let request = NewDevice {
                    deveui: self.value(Field::DevEui).to_owned(),
                    joineui: self.value(Field::JoinEui).to_owned(),
                    appkey: self.value(Field::AppKey).to_owned(),
                    devnonce: parse_devnonce(self.value(Field::DevNonce)),
                    ..NewDevice::default()
                }
                .validate()?;
                Ok(Command::CreateDevice {
                    server: server.clone(),
                    request,
                })
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────

    /// Rows needed to draw the dialog, borders included.
    pub fn height(&self) -> u16 {
        let fields = u16::try_from(self.fields().len()).unwrap_or(u16::MAX);
        fields.saturating_add(6)
    }

    pub fn render(&self, frame: &mut Frame, dialog: Rect) {
        frame.render_widget(Clear, dialog);
        let block = Block::default()
            .title(self.title())
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_OVERLAY));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let focused = self.focused();
        let mut lines = vec![Line::from("")];
        lines.extend(
            self.fields()
                .into_iter()
                .map(|field| self.field_line(field, field == focused)),
        );
        lines.push(Line::from(""));
        lines.push(match &self.error {
            Some(error) => Line::from(Span::styled(
                format!(" {error}"),
                Style::default().fg(theme::FAIL_RED),
            )),
            None => Line::from(""),
        });
        lines.push(Line::from(vec![
            Span::styled(" Tab ", theme::key_hint_key()),
            Span::styled("next field  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("create  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn field_line(&self, field: Field, active: bool) -> Line<'static> {
        let label_style = if active {
            Style::default().fg(theme::ACCENT)
        } else {
            theme::muted()
        };
        let label = Span::styled(
            format!(" {:<LABEL_WIDTH$}", field.label(self.server_kind)),
            label_style,
        );

        let value = if field == Field::Kind {
            let text = format!("◀ {} ▶", kind_label(self.server_kind));
            Span::styled(text, if active { theme::text() } else { theme::muted() })
        } else {
            let raw = self.value(field);
            match (raw.is_empty(), active) {
                (true, true) => Span::styled("█", theme::text()),
                (true, false) => Span::styled(field.placeholder(self.server_kind), theme::muted()),
                (false, true) => Span::styled(format!("{raw}█"), theme::text()),
                (false, false) => Span::styled(raw.to_owned(), theme::text()),
            }
        };
        Line::from(vec![label, value])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn press(form: &mut CreateForm, code: KeyCode) -> FormEvent {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(form: &mut CreateForm, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn generic_server_needs_only_a_name() {
        let mut form = CreateForm::new(FormKind::Server);
        assert_eq!(form.fields(), vec![Field::Kind, Field::Name]);

        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "s1");
        match press(&mut form, KeyCode::Enter) {
            FormEvent::Submitted(Command::CreateServer(request)) => {
                assert_eq!(request.name, "s1");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_upstream_fields_keep_the_dialog_open() {
        let mut form = CreateForm::new(FormKind::Server);
        press(&mut form, KeyCode::Right);
        press(&mut form, KeyCode::Right);
        assert_eq!(form.server_kind, ServerKind::ChirpStack);
        assert_eq!(form.fields().len(), 4);

        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "cs");
        assert!(matches!(press(&mut form, KeyCode::Enter), FormEvent::Editing));
        assert_eq!(
            form.error.as_deref(),
            Some("Please fill in all ChirpStack fields")
        );

        press(&mut form, KeyCode::Tab);
        assert_eq!(form.error, None);
    }

    #[test]
    fn switching_back_to_generic_clamps_focus() {
        let mut form = CreateForm::new(FormKind::Server);
        press(&mut form, KeyCode::Left);
        assert_eq!(form.server_kind, ServerKind::Ttn);
        press(&mut form, KeyCode::BackTab);
        assert_eq!(form.focused(), Field::Secret);

        form.cycle_kind(true);
        assert_eq!(form.server_kind, ServerKind::Generic);
        assert_eq!(form.focused(), Field::Name);
    }

    #[test]
    fn gateway_form_targets_its_server() {
        let mut form = CreateForm::new(FormKind::Gateway {
            server: "s1".into(),
        });
        type_text(&mut form, "0102030405060708");
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "ws://localhost:3001");

        match press(&mut form, KeyCode::Enter) {
            FormEvent::Submitted(Command::CreateGateway { server, request }) => {
                assert_eq!(server, "s1");
                assert_eq!(request.eui, "0102030405060708");
                assert_eq!(request.discovery_uri, "ws://localhost:3001");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn device_form_defaults_invalid_devnonce_to_zero() {
        let mut form = CreateForm::new(FormKind::Device {
            server: "s1".into(),
        });
        type_text(&mut form, "0102030405060708");
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "0000000000000001");
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "00112233445566770011223344556677");
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Backspace);
        type_text(&mut form, "-5");

        match press(&mut form, KeyCode::Enter) {
            FormEvent::Submitted(Command::CreateDevice { server, request }) => {
                assert_eq!(server, "s1");
                assert_eq!(request.devnonce, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn escape_cancels() {
        let mut form = CreateForm::new(FormKind::Server);
        assert!(matches!(press(&mut form, KeyCode::Esc), FormEvent::Cancelled));
    }
}
