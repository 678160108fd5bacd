pub mod icon;
pub mod model;
pub mod view;

pub use model::MenuModel;
pub use view::draw;

pub const REFERENCE_HEIGHT: f64 = 1440.0;
pub const ICON_PIXELS: i32 = 128; // rasterisation size, scaled down when drawn
pub const NAMED_ICON_SIZE: f64 = 30.0;
pub const ICON_LIFT: f64 = 10.0; // icon sits above the anchor, label below
pub const LABEL_OFFSET: f64 = 10.0;
pub const CENTER_ICON_SIZE: f64 = 30.0;
pub const CENTER_HOVER_SCALE: f64 = 1.15;
