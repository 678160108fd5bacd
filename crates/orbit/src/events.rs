use orbit_core::HostEvent;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Host(HostEvent),
    ConfigReload,
}
