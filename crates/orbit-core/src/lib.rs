pub mod macros;

pub mod geometry;
pub mod host;
pub mod item;
pub mod label;
pub mod navigator;
pub mod pagination;
pub mod state;

pub use geometry::{Hit, Point, SliceGeometry};
pub use host::{Host, HostEvent, OpenMenu, OpenPayload, Request, TransitionId};
pub use item::{IconName, IconSource, MenuId, MenuItem};
pub use navigator::{
    CenterAction, CenterIcon, InteractionState, Navigator, NavigatorOptions, Phase,
};
pub use pagination::{PAGE_SIZE, VisiblePage};
pub use state::{MenuState, PageStep};
