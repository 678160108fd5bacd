use super::model::MenuModel;
use super::{CENTER_HOVER_SCALE, CENTER_ICON_SIZE, ICON_LIFT, LABEL_OFFSET, NAMED_ICON_SIZE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use orbit_core::geometry::{CENTER_RADIUS, MENU_ROTATION, PathSegment, VIEWBOX_CENTER};
use orbit_core::label::{LINE_HEIGHT, LabelLayout};
use orbit_core::{CenterIcon, MenuItem, SliceGeometry};
use palette::Srgba;
use std::f64::consts::PI;
use std::iter::zip;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Paints `pixbuf` centred in a `width` x `height` box whose top-left corner is at (x, y).
fn paint_pixbuf(
    cr: &Context,
    pixbuf: &Pixbuf,
    (x, y): (f64, f64),
    (width, height): (f64, f64),
) -> Result<(), cairo::Error> {
    let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
    if pw <= 0.0 || ph <= 0.0 {
        return Ok(());
    }
    let scale = (width / pw).min(height / ph);

    cr.save()?;
    cr.translate(
        x + (width - pw * scale) / 2.0,
        y + (height - ph * scale) / 2.0,
    );
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}

struct SliceRenderer<'a> {
    item: &'a MenuItem,
    geometry: &'a SliceGeometry,
    hovered: bool,
    icon: Option<&'a Pixbuf>,
}

impl<'a> SliceRenderer<'a> {
    /// Runs `f` inside this slice's rotated frame, nudged outwards when hovered.
    fn in_frame<F>(&self, cr: &Context, f: F) -> Result<(), cairo::Error>
    where
        F: FnOnce(&Context) -> Result<(), cairo::Error>,
    {
        cr.save()?;
        cr.translate(VIEWBOX_CENTER, VIEWBOX_CENTER);
        cr.rotate(self.geometry.rotation.to_radians());
        cr.translate(-VIEWBOX_CENTER, -VIEWBOX_CENTER);
        if self.hovered {
            cr.translate(self.geometry.bounce.x, self.geometry.bounce.y);
        }
        f(cr)?;
        cr.restore()
    }

    fn draw_wedge(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.in_frame(cr, |cr| {
            self.wedge_path(cr);
            set_color(cr, colors.wedge);
            if self.hovered {
                cr.fill_preserve()?;
                set_color(cr, colors.hovered);
            }
            cr.fill()
        })
    }

    fn wedge_path(&self, cr: &Context) {
        cr.new_path();
        for segment in self.geometry.outline() {
            match segment {
                PathSegment::MoveTo(p) => cr.move_to(p.x, p.y),
                PathSegment::LineTo(p) => cr.line_to(p.x, p.y),
                PathSegment::Arc { radius, from, to } => {
                    let (from, to) = (from.to_radians(), to.to_radians());
                    if to > from {
                        cr.arc(VIEWBOX_CENTER, VIEWBOX_CENTER, radius, from, to);
                    } else {
                        cr.arc_negative(VIEWBOX_CENTER, VIEWBOX_CENTER, radius, from, to);
                    }
                }
                PathSegment::Close => cr.close_path(),
            }
        }
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.in_frame(cr, |cr| {
            cr.translate(self.geometry.anchor.x, self.geometry.anchor.y);
            cr.rotate(self.geometry.content_rotation().to_radians());
            self.draw_icon(cr)?;
            self.draw_label(cr, colors)
        })
    }

    fn draw_icon(&self, cr: &Context) -> Result<(), cairo::Error> {
        let Some(pixbuf) = self.icon else {
            return Ok(());
        };
        let (w, h) = match &self.item.icon {
            Some(source) if source.is_url() => self.item.icon_size(),
            _ => (NAMED_ICON_SIZE, NAMED_ICON_SIZE),
        };
        paint_pixbuf(cr, pixbuf, (-w / 2.0, -ICON_LIFT - h / 2.0), (w, h))
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let layout = LabelLayout::new(&self.item.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(layout.font_size);
        let ascent = cr.font_extents()?.ascent();

        for (i, line) in layout.lines.iter().enumerate() {
            let ext = cr.text_extents(line)?;
            let x = -ext.width() / 2.0 - ext.x_bearing();
            // lines hang from the offset, like a `hanging` baseline
            let y = LABEL_OFFSET + ascent + i as f64 * LINE_HEIGHT * layout.font_size;

            set_color(cr, colors.shadow);
            cr.move_to(x, y + 1.0);
            cr.show_text(line)?;
            set_color(cr, colors.text);
            cr.move_to(x, y);
            cr.show_text(line)?;
        }
        Ok(())
    }
}

pub fn draw(cr: &Context, model: &MenuModel, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let navigator = &model.navigator;
    if !navigator.is_visible() {
        return Ok(());
    }

    cr.save()?;
    cr.translate(model.center.x, model.center.y);
    cr.scale(model.scale_factor, model.scale_factor);
    cr.rotate(MENU_ROTATION.to_radians());
    cr.translate(-VIEWBOX_CENTER, -VIEWBOX_CENTER);

    let page = navigator.visible_page();
    let hovered = navigator.interaction().hovered_slice;
    let geometries = SliceGeometry::layout(page.len());
    let renderers: Vec<_> = zip(&page.items, &geometries)
        .map(|(item, geometry)| SliceRenderer {
            item,
            geometry,
            hovered: hovered == Some(geometry.index),
            icon: model.item_icon(item),
        })
        .collect();

    // all wedges first so the overlap never covers a neighbour's label
    for renderer in &renderers {
        renderer.draw_wedge(cr, colors)?;
    }
    for renderer in &renderers {
        renderer.draw_content(cr, colors)?;
    }

    draw_center(cr, model, colors)?;
    cr.restore()
}

fn draw_center(
    cr: &Context,
    model: &MenuModel,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let hovered = model.navigator.interaction().center_hovered;

    cr.save()?;
    cr.translate(VIEWBOX_CENTER, VIEWBOX_CENTER);
    if hovered {
        cr.scale(CENTER_HOVER_SCALE, CENTER_HOVER_SCALE);
    }

    cr.new_path();
    cr.arc(0.0, 0.0, CENTER_RADIUS, 0.0, 2.0 * PI);
    set_color(cr, colors.wedge);
    if hovered {
        cr.fill_preserve()?;
        set_color(cr, colors.hovered);
    }
    cr.fill()?;

    // undo the menu rotation so the glyph stays upright
    cr.rotate(-MENU_ROTATION.to_radians());
    let half = CENTER_ICON_SIZE / 2.0;
    match model.center_icon() {
        Some(pixbuf) => paint_pixbuf(
            cr,
            pixbuf,
            (-half, -half),
            (CENTER_ICON_SIZE, CENTER_ICON_SIZE),
        )?,
        None => draw_center_glyph(cr, model.navigator.center_icon(), half / 2.0, colors)?,
    }
    cr.restore()
}

/// Fallback when the icon theme has no close/undo icon.
fn draw_center_glyph(
    cr: &Context,
    icon: CenterIcon,
    size: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_color(cr, colors.text);
    cr.set_line_width(2.5);
    cr.new_path();
    match icon {
        CenterIcon::Close => {
            cr.move_to(-size, -size);
            cr.line_to(size, size);
            cr.move_to(size, -size);
            cr.line_to(-size, size);
        }
        CenterIcon::Back => {
            cr.move_to(size / 2.0, -size);
            cr.line_to(-size / 2.0, 0.0);
            cr.line_to(size / 2.0, size);
        }
    }
    cr.stroke()
}
