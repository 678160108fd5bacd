use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{Srgb, Srgba, WithAlpha};

/// One colour the menu paints with, and where it comes from in the GTK theme.
struct Swatch {
    /// Named colour looked up on the style context (`@define-color`).
    name: Option<&'static str>,
    fallback: (f64, f64, f64, f64),
    /// Replaces the theme colour's own alpha when set.
    alpha: Option<f64>,
}

const WEDGE: Swatch = Swatch {
    name: Some("orbit_wedge_color"),
    fallback: (0.02, 0.02, 0.02, 0.85),
    alpha: None,
};

const HOVERED: Swatch = Swatch {
    name: Some("theme_selected_bg_color"),
    fallback: (0.047, 0.408, 0.882, 0.35),
    alpha: Some(0.35),
};

const TEXT: Swatch = Swatch {
    name: Some("orbit_text_color"),
    fallback: (1.0, 1.0, 1.0, 1.0),
    alpha: None,
};

const SHADOW: Swatch = Swatch {
    name: None,
    fallback: (0.0, 0.0, 0.0, 0.9),
    alpha: None,
};

/// Wedges stay dark on every theme unless the user's GTK CSS defines
/// `orbit_wedge_color` / `orbit_text_color`. Hover follows the theme accent.
pub struct ThemeColors {
    pub wedge: Srgba<f64>,
    pub hovered: Srgba<f64>,
    pub text: Srgba<f64>,
    pub shadow: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let pick = |swatch: &Swatch| resolve(swatch, |name| context.lookup_color(name));
        Self {
            wedge: pick(&WEDGE),
            hovered: pick(&HOVERED),
            text: pick(&TEXT),
            shadow: pick(&SHADOW),
        }
    }
}

fn resolve(swatch: &Swatch, lookup: impl Fn(&str) -> Option<gdk::RGBA>) -> Srgba<f64> {
    let (r, g, b, a) = swatch.fallback;
    let Some(rgba) = swatch.name.and_then(lookup) else {
        return Srgba::new(r, g, b, a);
    };

    let themed = Srgb::new(rgba.red(), rgba.green(), rgba.blue()).into_format::<f64>();
    themed.with_alpha(swatch.alpha.unwrap_or(rgba.alpha() as f64))
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(
        "
.orbit-window, .orbit-drawing-area {
    background: none;
    background-color: transparent;
}
",
    );

    let Some(display) = gdk::Display::default() else {
        log::warn!("No display available, menu background may not be transparent");
        return;
    };
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
