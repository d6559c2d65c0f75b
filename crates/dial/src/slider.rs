use crate::geometry::{Hit, Layout, Metrics, Point};
use crate::range::ValueRange;
use crate::state::{SliderState, ValueChanged};
use crate::transition::{AnimationConfig, Animator, Transition};
use std::time::Instant;

/// Result of feeding one pointer event to the slider.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerAction {
    /// The event belongs to the slider (pointer-down hit the ring or thumb).
    pub accepted: bool,
    pub should_redraw: bool,
    pub notify: Option<ValueChanged>,
}

impl PointerAction {
    fn rejected() -> Self {
        Self::default()
    }

    fn accepted(should_redraw: bool, notify: Option<ValueChanged>) -> Self {
        Self {
            accepted: true,
            should_redraw,
            notify,
        }
    }
}

/// Toolkit-independent radial slider: the value model plus everything needed
/// to turn pointer positions into values and to animate the knob.
///
/// Every mutating call hands back the notification (if any) the host must
/// deliver to its observers.
#[derive(Debug, Clone)]
pub struct Slider {
    state: SliderState,
    animator: Animator,
    animation: AnimationConfig,
    metrics: Metrics,
    thumb_radius: f64,
}

impl Default for Slider {
    fn default() -> Self {
        Self::new(SliderState::default())
    }
}

impl Slider {
    pub fn new(state: SliderState) -> Self {
        let metrics = Metrics::default();
        Self {
            state,
            animator: Animator::default(),
            animation: AnimationConfig::default(),
            thumb_radius: metrics.thickness,
            metrics,
        }
    }

    pub fn state(&self) -> &SliderState {
        &self.state
    }

    pub fn value(&self) -> f64 {
        self.state.value()
    }

    pub fn minimum(&self) -> f64 {
        self.state.minimum()
    }

    pub fn maximum(&self) -> f64 {
        self.state.maximum()
    }

    pub fn is_continuous(&self) -> bool {
        self.state.is_continuous()
    }

    pub fn set_continuous(&mut self, continuous: bool) {
        self.state.set_continuous(continuous);
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn set_metrics(&mut self, metrics: Metrics) {
        self.metrics = metrics;
    }

    pub fn thumb_radius(&self) -> f64 {
        self.thumb_radius
    }

    pub fn set_thumb_radius(&mut self, radius: f64) {
        self.thumb_radius = radius.max(0.0);
    }

    pub fn animation(&self) -> &AnimationConfig {
        &self.animation
    }

    pub fn set_animation(&mut self, animation: AnimationConfig) {
        self.animation = animation;
    }

    pub fn layout(&self, width: f64, height: f64) -> Layout {
        Layout::new(width, height, &self.metrics)
    }

    pub fn set_value(&mut self, value: f64) -> Option<ValueChanged> {
        self.animator.cancel();
        self.state.set_value(value)
    }

    /// The model value (and the notification) change right away; `animated`
    /// only affects where the knob is drawn until the transition completes.
    pub fn set_value_animated(
        &mut self,
        value: f64,
        animated: bool,
        now: Instant,
    ) -> Option<ValueChanged> {
        if !animated {
            return self.set_value(value);
        }
        let from = self.display_value(now);
        let change = self.state.set_value(value)?;
        self.animator.start(Transition::new(
            from,
            self.state.value(),
            now,
            &self.animation,
        ));
        Some(change)
    }

    pub fn set_minimum(&mut self, minimum: f64) -> Option<ValueChanged> {
        let change = self.state.set_minimum(minimum);
        self.settle(change)
    }

    pub fn set_maximum(&mut self, maximum: f64) -> Option<ValueChanged> {
        let change = self.state.set_maximum(maximum);
        self.settle(change)
    }

    pub fn set_range(&mut self, range: ValueRange) -> Option<ValueChanged> {
        let change = self.state.set_range(range);
        self.settle(change)
    }

    // A bound that moves the value snaps the knob, no half-finished animation.
    fn settle(&mut self, change: Option<ValueChanged>) -> Option<ValueChanged> {
        if change.is_some() {
            self.animator.cancel();
        }
        change
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_active()
    }

    pub fn animation_generation(&self) -> u64 {
        self.animator.generation()
    }

    /// Where the knob should be drawn at `now`, always inside the current range.
    pub fn display_value(&self, now: Instant) -> f64 {
        self.animator
            .sample(now)
            .map(|sample| self.state.range().clamp(sample.value))
            .unwrap_or_else(|| self.state.value())
    }

    pub fn display_fraction(&self, now: Instant) -> f64 {
        self.state.range().fraction_of(self.display_value(now))
    }

    /// Advances the running transition. Returns `true` while more frames are needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.animator
            .tick(now)
            .is_some_and(|sample| !sample.finished)
    }

    pub fn is_tracking(&self) -> bool {
        self.state.is_tracking()
    }

    /// Pointer-down. Grabbing the thumb keeps the value; pressing elsewhere on
    /// the ring jumps the knob to the pointer.
    pub fn begin_tracking(&mut self, layout: &Layout, point: Point) -> PointerAction {
        let fraction = self.state.fraction();
        let Some(hit) = layout.hit_test(point, fraction, self.thumb_radius) else {
            return PointerAction::rejected();
        };

        self.animator.cancel();
        self.state.begin_tracking();

        match hit {
            Hit::Thumb => PointerAction::accepted(true, None),
            Hit::Track => {
                let notify = self.track_to(layout, point);
                PointerAction::accepted(true, notify)
            }
        }
    }

    pub fn continue_tracking(&mut self, layout: &Layout, point: Point) -> PointerAction {
        if !self.state.is_tracking() {
            return PointerAction::rejected();
        }
        let notify = self.track_to(layout, point);
        PointerAction::accepted(true, notify)
    }

    pub fn end_tracking(&mut self) -> PointerAction {
        if !self.state.is_tracking() {
            return PointerAction::rejected();
        }
        let notify = self.state.end_tracking();
        PointerAction::accepted(true, notify)
    }

    pub fn cancel_tracking(&mut self) -> PointerAction {
        if !self.state.is_tracking() {
            return PointerAction::rejected();
        }
        let notify = self.state.cancel_tracking();
        PointerAction::accepted(true, notify)
    }

    fn track_to(&mut self, layout: &Layout, point: Point) -> Option<ValueChanged> {
        let fraction = layout.fraction_at(point)?;
        let value = self.state.range().value_at(fraction);
        self.state.track(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::Listeners;
    use crate::state::ChangeSource;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    const SIZE: f64 = 200.0;

    fn layout(slider: &Slider) -> Layout {
        slider.layout(SIZE, SIZE)
    }

    /// Point on the ring for a fraction of the sweep.
    fn ring_point(slider: &Slider, fraction: f64) -> Point {
        layout(slider).thumb_center(fraction)
    }

    fn recorder(listeners: &Listeners<f64>) -> Rc<RefCell<Vec<f64>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        listeners.connect(move |v| sink.borrow_mut().push(*v));
        seen
    }

    fn deliver(listeners: &Listeners<f64>, action: PointerAction) {
        if let Some(change) = action.notify {
            listeners.emit(&change.value);
        }
    }

    fn drag(slider: &mut Slider, listeners: &Listeners<f64>, fractions: &[f64]) {
        let l = layout(slider);
        let action = slider.begin_tracking(&l, l.thumb_center(0.0));
        assert!(action.accepted);
        deliver(listeners, action);
        for &f in fractions {
            let action = slider.continue_tracking(&l, l.thumb_center(f));
            deliver(listeners, action);
        }
        let action = slider.end_tracking();
        deliver(listeners, action);
    }

    #[test]
    fn test_three_moves_continuous() {
        let mut slider = Slider::default();
        let listeners = Listeners::new();
        let seen = recorder(&listeners);

        drag(&mut slider, &listeners, &[0.1, 0.2, 0.3]);

        assert_eq!(seen.borrow().len(), 3);
        assert!((slider.value() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_three_moves_non_continuous() {
        let mut slider = Slider::default();
        slider.set_continuous(false);
        let listeners = Listeners::new();
        let seen = recorder(&listeners);

        drag(&mut slider, &listeners, &[0.1, 0.2, 0.3]);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!((seen[0] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_drag_maps_angle_onto_range() {
        let mut slider = Slider::default();
        slider.set_maximum(360.0);
        let l = layout(&slider);

        slider.begin_tracking(&l, ring_point(&slider, 0.0));
        slider.continue_tracking(&l, Point::new(SIZE, SIZE / 2.0));
        assert!((slider.value() - 90.0).abs() < 1e-9);

        slider.continue_tracking(&l, Point::new(SIZE / 2.0, SIZE));
        assert!((slider.value() - 180.0).abs() < 1e-9);
        slider.end_tracking();
    }

    #[test]
    fn test_press_on_track_jumps() {
        let mut slider = Slider::default();
        let l = layout(&slider);
        let action = slider.begin_tracking(&l, ring_point(&slider, 0.5));
        assert!(action.accepted);
        assert_eq!(action.notify.map(|c| c.source), Some(ChangeSource::Drag));
        assert!((slider.value() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_press_outside_ring_is_rejected() {
        let mut slider = Slider::default();
        let l = layout(&slider);
        let action = slider.begin_tracking(&l, l.center);
        assert!(!action.accepted);
        assert!(!slider.is_tracking());
        assert!(!slider.continue_tracking(&l, ring_point(&slider, 0.5)).accepted);
        assert_eq!(slider.value(), 0.0);
    }

    #[test]
    fn test_animated_set_updates_value_immediately() {
        let mut slider = Slider::default();
        let now = Instant::now();

        let change = slider.set_value_animated(1.0, true, now);

        assert_eq!(change.map(|c| c.value), Some(1.0));
        assert_eq!(slider.value(), 1.0);
        assert!(slider.is_animating());
        assert_eq!(slider.display_value(now), 0.0);

        let half = now + slider.animation().duration() / 2;
        let mid = slider.display_value(half);
        assert!(mid > 0.0 && mid < 1.0);

        assert!(!slider.tick(now + Duration::from_secs(5)));
        assert!(!slider.is_animating());
        assert_eq!(slider.display_value(now), 1.0);
    }

    #[test]
    fn test_new_set_supersedes_running_transition() {
        let mut slider = Slider::default();
        let now = Instant::now();
        slider.set_value_animated(1.0, true, now);
        let first = slider.animation_generation();

        let later = now + slider.animation().duration() / 2;
        let shown = slider.display_value(later);
        slider.set_value_animated(0.0, true, later);

        assert_ne!(slider.animation_generation(), first);
        // restarts from where the knob was drawn, not from the old target
        assert!((slider.display_value(later) - shown).abs() < 1e-9);

        slider.set_value(0.4);
        assert!(!slider.is_animating());
        assert_eq!(slider.display_value(later), 0.4);
    }

    #[test]
    fn test_range_clamp_cancels_animation() {
        let mut slider = Slider::default();
        let now = Instant::now();
        slider.set_value_animated(0.9, true, now);
        assert!(slider.set_maximum(0.5).is_some());
        assert!(!slider.is_animating());
        assert_eq!(slider.display_value(now), 0.5);
    }

    #[test]
    fn test_nan_animated_set_is_ignored() {
        let mut slider = Slider::default();
        assert_eq!(slider.set_value_animated(f64::NAN, true, Instant::now()), None);
        assert!(!slider.is_animating());
    }

    #[test]
    fn test_half_turn_over_widest_range() {
        let mut slider = Slider::default();
        slider.set_range(ValueRange::new(f64::MIN, f64::MAX));
        let l = layout(&slider);

        slider.begin_tracking(&l, ring_point(&slider, 0.0));
        slider.continue_tracking(&l, Point::new(SIZE / 2.0, SIZE));
        assert_eq!(slider.value(), 0.0);
        slider.end_tracking();
    }
}
