pub const DEFAULT_MINIMUM: f64 = 0.0;
pub const DEFAULT_MAXIMUM: f64 = 1.0;

/// Closed interval `[minimum, maximum]` the slider value lives in.
///
/// The bounds are never inverted: moving one bound past the other drags the
/// other bound along with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    minimum: f64,
    maximum: f64,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self {
            minimum: DEFAULT_MINIMUM,
            maximum: DEFAULT_MAXIMUM,
        }
    }
}

impl ValueRange {
    /// Builds a range, swapping the bounds if they arrive inverted. Non-finite
    /// bounds fall back to the defaults.
    pub fn new(minimum: f64, maximum: f64) -> Self {
        let mut range = Self::default();
        range.set_maximum(maximum);
        range.set_minimum(minimum);
        if minimum.is_finite() && maximum.is_finite() && minimum > maximum {
            range.minimum = maximum;
            range.maximum = minimum;
        }
        range
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn span(&self) -> f64 {
        self.maximum - self.minimum
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.minimum, self.maximum)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.minimum..=self.maximum).contains(&value)
    }

    /// Position of `value` inside the range as a fraction in `[0, 1]`.
    pub fn fraction_of(&self, value: f64) -> f64 {
        if self.maximum <= self.minimum {
            return 0.0;
        }
        // Halved so ranges wider than f64::MAX do not overflow.
        let offset = self.clamp(value) * 0.5 - self.minimum * 0.5;
        let half_span = self.maximum * 0.5 - self.minimum * 0.5;
        (offset / half_span).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, fraction: f64) -> f64 {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.clamp(self.minimum * (1.0 - fraction) + self.maximum * fraction)
    }

    /// Returns `false` when the bound was rejected.
    pub fn set_minimum(&mut self, minimum: f64) -> bool {
        if !minimum.is_finite() {
            log::warn!("Ignoring non-finite minimum {}", minimum);
            return false;
        }
        self.minimum = minimum;
        if self.maximum < minimum {
            self.maximum = minimum;
        }
        true
    }

    /// Returns `false` when the bound was rejected.
    pub fn set_maximum(&mut self, maximum: f64) -> bool {
        if !maximum.is_finite() {
            log::warn!("Ignoring non-finite maximum {}", maximum);
            return false;
        }
        self.maximum = maximum;
        if self.minimum > maximum {
            self.minimum = maximum;
        }
        true
    }
}
