use crate::config::StyleConfig;
use dial::Metrics;
use gdk_pixbuf::Pixbuf;
use palette::Srgba;
use std::path::Path;

/// Images and colours the slider is painted with. Purely visual: nothing here
/// influences the value.
#[derive(Debug, Clone, Default)]
pub struct Appearance {
    /// Painted behind everything, scaled to the widget.
    pub background_image: Option<Pixbuf>,
    /// Masked by the ring; only the active part of the track shows it.
    pub circle_background_image: Option<Pixbuf>,
    pub thumb_image: Option<Pixbuf>,
    /// Marks the zero position at 12 o'clock.
    pub zero_indicator_image: Option<Pixbuf>,
    pub thumb_tint_color: Option<Srgba<f64>>,
    pub circle_background_color: Option<Srgba<f64>>,
    pub circle_active_color: Option<Srgba<f64>>,
}

impl Appearance {
    pub fn from_config(style: &StyleConfig) -> Self {
        Self {
            background_image: style.background_image.as_deref().and_then(load_image),
            circle_background_image: style
                .circle_background_image
                .as_deref()
                .and_then(load_image),
            thumb_image: style.thumb_image.as_deref().and_then(load_image),
            zero_indicator_image: style.zero_indicator_image.as_deref().and_then(load_image),
            thumb_tint_color: style.thumb_tint_color.map(Into::into),
            circle_background_color: style.circle_background_color.map(Into::into),
            circle_active_color: style.circle_active_color.map(Into::into),
        }
    }

    /// Grab radius of the thumb: half the image's larger side, or the ring
    /// thickness for the default disc.
    pub fn thumb_radius(&self, metrics: &Metrics) -> f64 {
        self.thumb_image
            .as_ref()
            .map(|p| p.width().max(p.height()) as f64 / 2.0)
            .unwrap_or(metrics.thickness)
    }
}

fn load_image(path: &Path) -> Option<Pixbuf> {
    Pixbuf::from_file(path)
        .inspect_err(|e| log::error!("Failed to load image {}: {}", path.display(), e))
        .ok()
}
