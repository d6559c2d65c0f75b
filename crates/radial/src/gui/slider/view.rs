use super::Appearance;
use crate::gui::theme::ThemeColors;
use cairo::Context;
use dial::geometry::{angle_for_fraction, to_cairo_angle};
use dial::{Layout, Point};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::{PI, TAU};

const THUMB_OUTLINE_WIDTH: f64 = 1.0;

struct SliderRenderer<'a> {
    layout: &'a Layout,
    fraction: f64,
    thumb_radius: f64,
    appearance: &'a Appearance,
    colors: &'a ThemeColors,
}

impl<'a> SliderRenderer<'a> {
    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        if let Some(image) = &self.appearance.background_image {
            self.draw_background(cr, image)?;
        }
        self.draw_track(cr)?;
        self.draw_active(cr)?;
        if let Some(image) = &self.appearance.zero_indicator_image {
            self.draw_zero_indicator(cr, image)?;
        }
        self.draw_thumb(cr)
    }

    fn widget_size(&self) -> (f64, f64) {
        (self.layout.center.x * 2.0, self.layout.center.y * 2.0)
    }

    fn draw_background(&self, cr: &Context, image: &Pixbuf) -> Result<(), cairo::Error> {
        let (w, h) = self.widget_size();
        paint_scaled(cr, image, Point::default(), w, h)
    }

    fn draw_track(&self, cr: &Context) -> Result<(), cairo::Error> {
        set_color(cr, self.colors.track);
        ring_path(cr, self.layout, 0.0, TAU);
        cr.fill()
    }

    /// Ring segment from 12 o'clock to the knob. With a circle background image
    /// the image shows through that segment, otherwise it is filled flat.
    fn draw_active(&self, cr: &Context) -> Result<(), cairo::Error> {
        if self.fraction <= 0.0 {
            return Ok(());
        }
        let end = angle_for_fraction(self.fraction);

        match &self.appearance.circle_background_image {
            Some(image) => {
                cr.save()?;
                ring_path(cr, self.layout, 0.0, end);
                cr.clip();
                let (w, h) = self.widget_size();
                paint_scaled(cr, image, Point::default(), w, h)?;
                cr.restore()
            }
            None => {
                set_color(cr, self.colors.active);
                ring_path(cr, self.layout, 0.0, end);
                cr.fill()
            }
        }
    }

    fn draw_zero_indicator(&self, cr: &Context, image: &Pixbuf) -> Result<(), cairo::Error> {
        // anchored by its top edge, centred horizontally
        let (iw, ih) = (image.width() as f64, image.height() as f64);
        let origin = Point::new(
            self.layout.zero_indicator.x - iw / 2.0,
            self.layout.zero_indicator.y,
        );
        paint_scaled(cr, image, origin, iw, ih)
    }

    fn draw_thumb(&self, cr: &Context) -> Result<(), cairo::Error> {
        let center = self.layout.thumb_center(self.fraction);

        if let Some(image) = &self.appearance.thumb_image {
            let (iw, ih) = (image.width() as f64, image.height() as f64);
            let origin = Point::new(center.x - iw / 2.0, center.y - ih / 2.0);
            return paint_scaled(cr, image, origin, iw, ih);
        }

        cr.new_path();
        cr.arc(center.x, center.y, self.thumb_radius, 0.0, 2.0 * PI);
        set_color(cr, self.colors.thumb);
        cr.fill_preserve()?;
        set_color(cr, self.colors.thumb_outline);
        cr.set_line_width(THUMB_OUTLINE_WIDTH);
        cr.stroke()
    }
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Annular sector between `start` and `end` (slider angles, clockwise from noon).
fn ring_path(cr: &Context, layout: &Layout, start: f64, end: f64) {
    let (cx, cy) = (layout.center.x, layout.center.y);
    let (from, to) = (to_cairo_angle(start), to_cairo_angle(end));

    cr.new_path();
    cr.arc(cx, cy, layout.outer_radius, from, to);
    if layout.inner_radius > 0.0 {
        cr.arc_negative(cx, cy, layout.inner_radius, to, from);
    } else {
        cr.line_to(cx, cy);
    }
    cr.close_path();
}

fn paint_scaled(
    cr: &Context,
    image: &Pixbuf,
    origin: Point,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let (iw, ih) = (image.width() as f64, image.height() as f64);
    if iw <= 0.0 || ih <= 0.0 || width <= 0.0 || height <= 0.0 {
        return Ok(());
    }

    cr.save()?;
    cr.translate(origin.x, origin.y);
    cr.scale(width / iw, height / ih);
    cr.set_source_pixbuf(image, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}

pub fn draw(
    cr: &Context,
    layout: &Layout,
    fraction: f64,
    thumb_radius: f64,
    appearance: &Appearance,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    SliderRenderer {
        layout,
        fraction,
        thumb_radius,
        appearance,
        colors,
    }
    .draw(cr)
}
