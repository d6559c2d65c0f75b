use derive_more::{Deref, From, Into};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{Srgb, Srgba, WithAlpha};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::gui::slider::Appearance;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid color '{0}', expected #rrggbb or #rrggbbaa")]
pub struct ColorParseError(String);

/// A colour written as `#rrggbb` or `#rrggbbaa` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, DeserializeFromStr, SerializeDisplay)]
pub struct HexColor(Srgba<f64>);

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(err());
        }

        let (rgb, alpha) = match hex.len() {
            6 => (hex, u8::MAX),
            8 => (
                &hex[..6],
                u8::from_str_radix(&hex[6..], 16).map_err(|_| err())?,
            ),
            _ => return Err(err()),
        };
        let rgb: Srgb<u8> = rgb.parse().map_err(|_| err())?;
        let rgb: Srgb<f64> = rgb.into_format();

        Ok(Self(rgb.with_alpha(f64::from(alpha) / 255.0)))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, a) = self.0.into_format::<u8, u8>().into_components();
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

pub struct ThemeColors {
    pub track: Srgba<f64>,
    pub active: Srgba<f64>,
    pub thumb: Srgba<f64>,
    pub thumb_outline: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            track: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.2, 0.2, 0.2, 0.2),
                Some(0.15),
            ),
            active: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.21, 0.52, 0.89, 1.0),
                None,
            ),
            thumb: Self::lookup_color(
                context,
                "theme_base_color",
                Srgba::new(1.0, 1.0, 1.0, 1.0),
                None,
            ),
            thumb_outline: Self::lookup_color(
                context,
                "borders",
                Srgba::new(0.0, 0.0, 0.0, 0.25),
                Some(0.4),
            ),
        }
    }

    /// Colours set explicitly on the slider win over the theme.
    pub fn with_overrides(self, appearance: &Appearance) -> Self {
        Self {
            track: appearance.circle_background_color.unwrap_or(self.track),
            active: appearance.circle_active_color.unwrap_or(self.active),
            thumb: appearance.thumb_tint_color.unwrap_or(self.thumb),
            thumb_outline: self.thumb_outline,
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.radial-value {
    font-size: 28px;
    font-weight: bold;
    font-feature-settings: \"tnum\";
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
