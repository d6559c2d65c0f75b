use crate::range::ValueRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// `set_value` from application code.
    Programmatic,
    /// A bound moved and dragged the value along.
    Range,
    /// Pointer movement during a drag.
    Drag,
    /// Deferred notification delivered when a non-continuous drag ends.
    DragEnd,
}

/// A change observers must hear about. Operations that return `None` must not
/// notify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueChanged {
    pub previous: f64,
    pub value: f64,
    pub source: ChangeSource,
}

impl ValueChanged {
    pub fn new(previous: f64, value: f64, source: ChangeSource) -> Self {
        Self {
            previous,
            value,
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Tracking {
    #[default]
    Idle,
    Dragging {
        /// Value when the drag began.
        origin: f64,
        /// A suppressed drag change is waiting for the drag to end.
        pending: bool,
    },
}

/// Value model of the slider: the value, its bounds, and the drag state.
///
/// `range.minimum() <= value <= range.maximum()` holds after every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderState {
    value: f64,
    range: ValueRange,
    continuous: bool,
    tracking: Tracking,
}

impl Default for SliderState {
    fn default() -> Self {
        Self::with_range(ValueRange::default())
    }
}

impl SliderState {
    pub fn with_range(range: ValueRange) -> Self {
        Self {
            value: range.minimum(),
            range,
            continuous: true,
            tracking: Tracking::Idle,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn minimum(&self) -> f64 {
        self.range.minimum()
    }

    pub fn maximum(&self) -> f64 {
        self.range.maximum()
    }

    pub fn fraction(&self) -> f64 {
        self.range.fraction_of(self.value)
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn set_continuous(&mut self, continuous: bool) {
        self.continuous = continuous;
    }

    pub fn tracking(&self) -> Tracking {
        self.tracking
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.tracking, Tracking::Dragging { .. })
    }

    /// Clamps and stores `value`. Always notifies, even when the value does
    /// not move. NaN is ignored.
    pub fn set_value(&mut self, value: f64) -> Option<ValueChanged> {
        self.store(value)
            .map(|previous| ValueChanged::new(previous, self.value, ChangeSource::Programmatic))
    }

    pub fn set_minimum(&mut self, minimum: f64) -> Option<ValueChanged> {
        if !self.range.set_minimum(minimum) {
            return None;
        }
        self.reclamp()
    }

    pub fn set_maximum(&mut self, maximum: f64) -> Option<ValueChanged> {
        if !self.range.set_maximum(maximum) {
            return None;
        }
        self.reclamp()
    }

    pub fn set_range(&mut self, range: ValueRange) -> Option<ValueChanged> {
        self.range = range;
        self.reclamp()
    }

    pub fn begin_tracking(&mut self) {
        log::debug!("Tracking started at {}", self.value);
        self.tracking = Tracking::Dragging {
            origin: self.value,
            pending: false,
        };
    }

    /// Applies a drag-driven value. Ignored while idle.
    pub fn track(&mut self, value: f64) -> Option<ValueChanged> {
        if !self.is_tracking() {
            return None;
        }
        let previous = self.store(value)?;

        if self.continuous {
            return Some(ValueChanged::new(previous, self.value, ChangeSource::Drag));
        }
        if let Tracking::Dragging { pending, .. } = &mut self.tracking {
            *pending = true;
        }
        None
    }

    /// Ends the drag; yields the deferred notification of a non-continuous drag.
    pub fn end_tracking(&mut self) -> Option<ValueChanged> {
        match std::mem::take(&mut self.tracking) {
            Tracking::Dragging {
                origin,
                pending: true,
            } => {
                log::debug!("Tracking ended, flushing {} -> {}", origin, self.value);
                Some(ValueChanged::new(origin, self.value, ChangeSource::DragEnd))
            }
            Tracking::Dragging { .. } => {
                log::debug!("Tracking ended at {}", self.value);
                None
            }
            Tracking::Idle => None,
        }
    }

    /// Pointer cancel. The value reached so far is kept, so a pending
    /// notification is delivered just like on release.
    pub fn cancel_tracking(&mut self) -> Option<ValueChanged> {
        if self.is_tracking() {
            log::debug!("Tracking cancelled");
        }
        self.end_tracking()
    }

    fn store(&mut self, value: f64) -> Option<f64> {
        if value.is_nan() {
            log::warn!("Ignoring NaN slider value");
            return None;
        }
        let previous = self.value;
        self.value = self.range.clamp(value);
        Some(previous)
    }

    fn reclamp(&mut self) -> Option<ValueChanged> {
        let previous = self.value;
        self.value = self.range.clamp(previous);
        (self.value != previous)
            .then(|| ValueChanged::new(previous, self.value, ChangeSource::Range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_state(value: f64) -> SliderState {
        let mut state = SliderState::default();
        state.set_value(value);
        state
    }

    #[test]
    fn test_defaults() {
        let state = SliderState::default();
        assert_eq!(state.value(), 0.0);
        assert_eq!(state.minimum(), 0.0);
        assert_eq!(state.maximum(), 1.0);
        assert!(state.is_continuous());
        assert_eq!(state.tracking(), Tracking::Idle);
    }

    #[test]
    fn test_set_value_clamps_below_and_above() {
        let mut state = SliderState::default();

        state.set_value(state.minimum() - 10.0);
        assert_eq!(state.value(), state.minimum());

        state.set_value(state.maximum() + 10.0);
        assert_eq!(state.value(), state.maximum());
    }

    #[test]
    fn test_set_value_infinities_clamp() {
        let mut state = SliderState::default();
        state.set_value(f64::INFINITY);
        assert_eq!(state.value(), 1.0);
        state.set_value(f64::NEG_INFINITY);
        assert_eq!(state.value(), 0.0);
    }

    #[test]
    fn test_set_value_nan_is_ignored() {
        let mut state = unit_state(0.3);
        assert_eq!(state.set_value(f64::NAN), None);
        assert_eq!(state.value(), 0.3);
    }

    #[test]
    fn test_lowering_maximum_clamps_value_down() {
        let mut state = unit_state(0.8);
        let change = state.set_maximum(0.5);
        assert_eq!(state.value(), 0.5);
        assert_eq!(
            change,
            Some(ValueChanged::new(0.8, 0.5, ChangeSource::Range))
        );
    }

    #[test]
    fn test_raising_minimum_clamps_value_up() {
        let mut state = unit_state(0.2);
        let change = state.set_minimum(0.5);
        assert_eq!(state.value(), 0.5);
        assert_eq!(
            change,
            Some(ValueChanged::new(0.2, 0.5, ChangeSource::Range))
        );
    }

    #[test]
    fn test_bound_change_without_clamp_is_silent() {
        let mut state = unit_state(0.4);
        assert_eq!(state.set_maximum(0.9), None);
        assert_eq!(state.set_minimum(0.1), None);
        assert_eq!(state.value(), 0.4);
    }

    #[test]
    fn test_reapplying_range_keeps_value() {
        let mut state = unit_state(0.4);
        assert_eq!(state.set_range(ValueRange::new(0.0, 1.0)), None);
        assert_eq!(state.set_range(ValueRange::new(0.0, 2.0)), None);
        assert_eq!(state.value(), 0.4);
        assert!(state.set_range(ValueRange::new(0.5, 2.0)).is_some());
        assert_eq!(state.value(), 0.5);
    }

    #[test]
    fn test_inverted_minimum_repairs_range() {
        let mut state = unit_state(0.4);
        state.set_minimum(3.0);
        assert_eq!(state.minimum(), 3.0);
        assert_eq!(state.maximum(), 3.0);
        assert_eq!(state.value(), 3.0);
    }

    #[test]
    fn test_redundant_set_still_notifies() {
        let mut state = unit_state(0.25);
        for _ in 0..3 {
            let change = state.set_value(0.25);
            assert_eq!(
                change,
                Some(ValueChanged::new(0.25, 0.25, ChangeSource::Programmatic))
            );
        }
    }

    #[test]
    fn test_continuous_drag_notifies_every_move() {
        let mut state = SliderState::default();
        state.begin_tracking();
        let notified = [0.1, 0.2, 0.3]
            .into_iter()
            .filter_map(|v| state.track(v))
            .count();
        assert_eq!(notified, 3);
        assert_eq!(state.end_tracking(), None);
    }

    #[test]
    fn test_non_continuous_drag_notifies_once_at_end() {
        let mut state = SliderState::default();
        state.set_continuous(false);
        state.begin_tracking();
        let notified = [0.1, 0.2, 0.3]
            .into_iter()
            .filter_map(|v| state.track(v))
            .count();
        assert_eq!(notified, 0);

        let change = state.end_tracking();
        assert_eq!(
            change,
            Some(ValueChanged::new(0.0, 0.3, ChangeSource::DragEnd))
        );
        assert!(!state.is_tracking());
    }

    #[test]
    fn test_non_continuous_drag_without_moves_is_silent() {
        let mut state = SliderState::default();
        state.set_continuous(false);
        state.begin_tracking();
        assert_eq!(state.end_tracking(), None);
    }

    #[test]
    fn test_cancel_flushes_pending() {
        let mut state = SliderState::default();
        state.set_continuous(false);
        state.begin_tracking();
        state.track(0.6);
        let change = state.cancel_tracking().unwrap();
        assert_eq!(change.value, 0.6);
        assert_eq!(state.value(), 0.6);
    }

    #[test]
    fn test_track_while_idle_is_ignored() {
        let mut state = SliderState::default();
        assert_eq!(state.track(0.5), None);
        assert_eq!(state.value(), 0.0);
    }

    #[test]
    fn test_programmatic_set_during_non_continuous_drag_notifies() {
        let mut state = SliderState::default();
        state.set_continuous(false);
        state.begin_tracking();
        assert!(state.set_value(0.7).is_some());
    }

    proptest! {
        #[test]
        fn prop_value_stays_in_range(
            min in -1.0e6f64..1.0e6,
            span in 0.0f64..1.0e6,
            v in proptest::num::f64::ANY,
        ) {
            let mut state = SliderState::with_range(ValueRange::new(min, min + span));
            state.set_value(v);
            prop_assert!(state.minimum() <= state.value());
            prop_assert!(state.value() <= state.maximum());
        }

        #[test]
        fn prop_bound_changes_keep_value_in_range(
            start in -100.0f64..100.0,
            new_min in -100.0f64..100.0,
            new_max in -100.0f64..100.0,
        ) {
            let mut state = SliderState::with_range(ValueRange::new(-100.0, 100.0));
            state.set_value(start);
            state.set_minimum(new_min);
            prop_assert!(state.range().contains(state.value()));
            state.set_maximum(new_max);
            prop_assert!(state.range().contains(state.value()));
        }
    }
}
