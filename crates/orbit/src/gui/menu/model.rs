use super::{ICON_PIXELS, REFERENCE_HEIGHT, icon};
use gdk_pixbuf::Pixbuf;
use orbit_core::item::MORE_ICON;
use orbit_core::{CenterIcon, IconName, IconSource, MenuItem, Navigator, NavigatorOptions, Point};
use std::collections::HashMap;
use strum::IntoEnumIterator;

pub struct MenuModel {
    pub navigator: Navigator,
    /// Menu centre in window coordinates.
    pub center: Point,
    pub scale_factor: f64,
    monitor_height: f64,
    icons: HashMap<IconSource, Option<Pixbuf>>,
}

impl MenuModel {
    pub fn new(options: NavigatorOptions, scale: f64) -> Self {
        let mut model = Self {
            navigator: Navigator::new(options),
            center: Point::default(),
            scale_factor: scale,
            monitor_height: REFERENCE_HEIGHT,
            icons: HashMap::new(),
        };
        model.cache_icon(IconSource::Named(IconName::new(MORE_ICON)));
        for icon in CenterIcon::iter() {
            model.cache_icon(center_icon_source(icon));
        }
        model
    }

    pub fn place(&mut self, monitor_height: f64, scale: f64) {
        self.monitor_height = monitor_height;
        self.scale_factor = scale * monitor_height / REFERENCE_HEIGHT;
    }

    pub fn rescale(&mut self, scale: f64) {
        self.place(self.monitor_height, scale);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.center = Point::new(width / 2.0, height / 2.0);
    }

    /// Converts a window position into view-box units relative to the menu centre.
    pub fn to_menu_offset(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.center.x) / self.scale_factor,
            (point.y - self.center.y) / self.scale_factor,
        )
    }

    /// Loads icons for the items on the current page that have not been seen before.
    /// Pages further down load when the menu turns to them.
    pub fn sync_icons(&mut self) {
        let missing: Vec<IconSource> = self
            .navigator
            .visible_page()
            .real_items()
            .filter_map(|(_, item)| item.icon.clone())
            .filter(|source| !self.icons.contains_key(source))
            .collect();

        for source in missing {
            self.cache_icon(source);
        }
    }

    fn cache_icon(&mut self, source: IconSource) {
        let pixbuf = icon::load(&source, ICON_PIXELS);
        self.icons.insert(source, pixbuf);
    }

    pub fn item_icon(&self, item: &MenuItem) -> Option<&Pixbuf> {
        item.icon
            .as_ref()
            .and_then(|source| self.icons.get(source))
            .and_then(Option::as_ref)
    }

    pub fn center_icon(&self) -> Option<&Pixbuf> {
        self.icons
            .get(&center_icon_source(self.navigator.center_icon()))
            .and_then(Option::as_ref)
    }
}

fn center_icon_source(icon: CenterIcon) -> IconSource {
    IconSource::Named(IconName::new(icon.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> MenuModel {
        let mut model = MenuModel {
            navigator: Navigator::default(),
            center: Point::default(),
            scale_factor: 1.0,
            monitor_height: REFERENCE_HEIGHT,
            icons: HashMap::new(),
        };
        model.resize(800.0, 600.0);
        model
    }

    #[test]
    fn test_offset_is_relative_to_center() {
        let mut model = model();
        model.place(2880.0, 1.0);

        assert_eq!(model.scale_factor, 2.0);
        assert_eq!(
            model.to_menu_offset(Point::new(500.0, 200.0)),
            Point::new(50.0, -50.0)
        );

        model.rescale(1.5);
        assert_eq!(model.scale_factor, 3.0);
    }

    #[test]
    fn test_sync_icons_skips_known_sources() {
        let mut model = model();
        let known = IconSource::from("https://example.org/known.png");
        model.icons.insert(known.clone(), None);
        model.navigator.open(orbit_core::OpenMenu {
            items: vec![
                MenuItem::new("a").with_icon(known),
                MenuItem::new("b").with_icon("https://example.org/new.png"),
                MenuItem::new("c"),
            ],
            ..Default::default()
        });

        model.sync_icons();

        assert_eq!(model.icons.len(), 2);
        assert!(model.item_icon(&model.navigator.state().items()[1]).is_none());
    }

    #[test]
    fn test_sync_icons_only_loads_visible_page() {
        let mut model = model();
        let items = (0..8)
            .map(|i| MenuItem::new(format!("item {i}")).with_icon(format!("https://example.org/{i}.png")))
            .collect();
        model.navigator.open(orbit_core::OpenMenu {
            items,
            ..Default::default()
        });

        model.sync_icons();

        // Five real items on page 1; the "more" tile uses the pre-cached icon.
        assert_eq!(model.icons.len(), 5);
        assert!(!model.icons.contains_key(&IconSource::from("https://example.org/5.png")));
    }
}
