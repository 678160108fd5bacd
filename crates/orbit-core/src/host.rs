//! Contract with the host process that owns menu content.
//!
//! Messages travel as one JSON object per line in both directions.

use crate::item::{MenuId, MenuItem};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct TransitionId(u64);

impl TransitionId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenMenu {
    #[serde(default)]
    pub items: Vec<MenuItem>,
    #[serde(default, alias = "sub")]
    pub is_sub_menu: bool,
    #[serde(default, alias = "option", skip_serializing_if = "Option::is_none")]
    pub focus_menu_id: Option<MenuId>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOpen {
    Flag(bool),
    Menu(OpenMenu),
}

/// Payload of an open event. `false` hides the menu; any other truthy value without items opens
/// an empty menu.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawOpen")]
pub enum OpenPayload {
    Hide,
    Show(OpenMenu),
}

impl From<RawOpen> for OpenPayload {
    fn from(raw: RawOpen) -> Self {
        match raw {
            RawOpen::Flag(false) => Self::Hide,
            RawOpen::Flag(true) => Self::Show(OpenMenu::default()),
            RawOpen::Menu(menu) => Self::Show(menu),
        }
    }
}

impl Serialize for OpenPayload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Hide => serializer.serialize_bool(false),
            Self::Show(menu) => menu.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum HostEvent {
    OpenRadialMenu(OpenPayload),
    RefreshItems(Vec<MenuItem>),
    TransitionResolved { id: TransitionId, granted: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", content = "data", rename_all = "camelCase")]
pub enum Request {
    /// Absolute index into the full item list.
    Select(usize),
    /// Must be answered with [`HostEvent::TransitionResolved`] carrying the same id.
    PageTransition(TransitionId),
    Back,
    Close,
}

/// Outbound side of the host link. Every request is fire-and-forget; the answer to a
/// page transition arrives later as an ordinary inbound event.
pub trait Host {
    fn send(&mut self, request: Request);
}

impl Host for Vec<Request> {
    fn send(&mut self, request: Request) {
        self.push(request);
    }
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Empty message")]
    Empty,
}

pub fn decode<T: for<'de> Deserialize<'de>>(line: &str) -> Result<T, ProtocolError> {
    decode_bytes(line.as_bytes())
}

/// Decodes one raw line off the wire. Invalid UTF-8 is a malformed message like any other.
pub fn decode_bytes<T: for<'de> Deserialize<'de>>(line: &[u8]) -> Result<T, ProtocolError> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }
    Ok(serde_json::from_slice(line)?)
}

pub fn encode<T: Serialize>(message: &T) -> Result<String, ProtocolError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}
