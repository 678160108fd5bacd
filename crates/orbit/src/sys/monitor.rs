use derive_more::{AsRef, Deref, Display, From, Into};
use hyprland::data::Monitors;
use hyprland::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct MonitorName(String);

orbit_core::impl_string_newtype!(MonitorName);

/// Focused monitor according to Hyprland. `None` outside a Hyprland session.
pub fn get_active_monitor() -> Option<MonitorName> {
    Monitors::get()
        .ok()?
        .into_iter()
        .find(|m| m.focused)
        .map(|m| MonitorName(m.name))
}
