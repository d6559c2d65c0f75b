pub mod appearance;
pub mod view;

pub use appearance::Appearance;

use crate::gui::theme::ThemeColors;
use dial::{
    AnimationConfig, ListenerId, Listeners, Metrics, Point, PointerAction, Slider, ValueChanged,
    ValueRange,
};
use gdk_pixbuf::Pixbuf;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

pub const DEFAULT_SIZE: i32 = 240;

struct Inner {
    area: gtk::DrawingArea,
    slider: RefCell<Slider>,
    appearance: RefCell<Appearance>,
    listeners: Listeners<RadialSlider>,
    ticking: RefCell<Option<gtk::TickCallbackId>>,
}

/// Circular slider widget: drag the knob around the ring to pick a value.
///
/// The handle is cheap to clone and all clones drive the same widget. Like
/// every GTK object it must stay on the UI thread.
///
/// The handle owns the slider state; the widget's draw, gesture and frame
/// callbacks only hold weak references to it. Keep at least one handle alive
/// for as long as [`RadialSlider::widget`] is shown, otherwise the widget
/// stays on screen but stops drawing the control and ignores input.
///
/// Value semantics come from [`dial::Slider`]: values are clamped into
/// `[minimum, maximum]`, moving a bound drags the value with it, and
/// observers registered with [`RadialSlider::connect_value_changed`] are
/// called after every change (once per drag when not continuous).
#[derive(Clone)]
pub struct RadialSlider {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for RadialSlider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadialSlider")
            .field("slider", &self.inner.slider.borrow())
            .finish_non_exhaustive()
    }
}

impl Default for RadialSlider {
    fn default() -> Self {
        Self::new()
    }
}

impl RadialSlider {
    pub fn new() -> Self {
        let area = gtk::DrawingArea::builder()
            .content_width(DEFAULT_SIZE)
            .content_height(DEFAULT_SIZE)
            .hexpand(true)
            .vexpand(true)
            .build();
        area.add_css_class("radial-slider");

        let slider = Self {
            inner: Rc::new(Inner {
                area,
                slider: RefCell::new(Slider::default()),
                appearance: RefCell::new(Appearance::default()),
                listeners: Listeners::new(),
                ticking: RefCell::new(None),
            }),
        };
        slider.setup_drawing();
        slider.setup_gestures();
        slider
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.inner.area
    }

    fn setup_drawing(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner
            .area
            .set_draw_func(move |area, cr, width, height| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let appearance = inner.appearance.borrow();
                let colors =
                    ThemeColors::from_context(&area.style_context()).with_overrides(&appearance);
                let slider = inner.slider.borrow();
                let layout = slider.layout(width as f64, height as f64);
                let fraction = slider.display_fraction(Instant::now());

                if let Err(e) = view::draw(
                    cr,
                    &layout,
                    fraction,
                    slider.thumb_radius(),
                    &appearance,
                    &colors,
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });
    }

    fn setup_gestures(&self) {
        let drag = gtk::GestureDrag::new();

        let weak = Rc::downgrade(&self.inner);
        drag.connect_drag_begin(move |gesture, x, y| {
            let Some(slider) = Self::upgrade(&weak) else {
                return;
            };
            let state = if slider.pointer_down(Point::new(x, y)) {
                gtk::EventSequenceState::Claimed
            } else {
                gtk::EventSequenceState::Denied
            };
            gesture.set_state(state);
        });

        let weak = Rc::downgrade(&self.inner);
        drag.connect_drag_update(move |gesture, dx, dy| {
            if let Some(slider) = Self::upgrade(&weak)
                && let Some((x, y)) = gesture.start_point()
            {
                slider.pointer_move(Point::new(x + dx, y + dy));
            }
        });

        let weak = Rc::downgrade(&self.inner);
        drag.connect_drag_end(move |_, _, _| {
            if let Some(slider) = Self::upgrade(&weak) {
                slider.pointer_up();
            }
        });

        let weak = Rc::downgrade(&self.inner);
        drag.connect_cancel(move |_, _| {
            if let Some(slider) = Self::upgrade(&weak) {
                slider.pointer_cancel();
            }
        });

        self.inner.area.add_controller(drag);
    }

    fn layout_for(&self, slider: &Slider) -> dial::Layout {
        slider.layout(
            self.inner.area.width() as f64,
            self.inner.area.height() as f64,
        )
    }

    /// Returns whether the press landed on the ring and started a drag.
    fn pointer_down(&self, point: Point) -> bool {
        let action = {
            let mut slider = self.inner.slider.borrow_mut();
            let layout = self.layout_for(&slider);
            slider.begin_tracking(&layout, point)
        };
        self.dispatch(action);
        action.accepted
    }

    fn pointer_move(&self, point: Point) {
        let action = {
            let mut slider = self.inner.slider.borrow_mut();
            let layout = self.layout_for(&slider);
            slider.continue_tracking(&layout, point)
        };
        self.dispatch(action);
    }

    fn pointer_up(&self) {
        let action = self.inner.slider.borrow_mut().end_tracking();
        self.dispatch(action);
    }

    fn pointer_cancel(&self) {
        let action = self.inner.slider.borrow_mut().cancel_tracking();
        self.dispatch(action);
    }

    fn dispatch(&self, action: PointerAction) {
        if action.should_redraw {
            self.inner.area.queue_draw();
        }
        self.notify(action.notify);
    }

    // Called with no RefCell borrowed so listeners may re-enter the slider.
    fn notify(&self, change: Option<ValueChanged>) {
        if let Some(change) = change {
            log::trace!(
                "Value changed {} -> {} ({:?})",
                change.previous,
                change.value,
                change.source
            );
            self.inner.area.queue_draw();
            self.inner.listeners.emit(self);
        }
    }

    /// Keeps a frame-clock callback alive while a transition runs. The callback
    /// removes itself once the transition finishes or has been cancelled.
    fn ensure_ticking(&self) {
        if self.inner.ticking.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let id = self.inner.area.add_tick_callback(move |area, _| {
            let Some(inner) = weak.upgrade() else {
                return glib::ControlFlow::Break;
            };
            let running = inner.slider.borrow_mut().tick(Instant::now());
            area.queue_draw();
            if running {
                glib::ControlFlow::Continue
            } else {
                inner.ticking.borrow_mut().take();
                glib::ControlFlow::Break
            }
        });
        *self.inner.ticking.borrow_mut() = Some(id);
    }

    pub fn connect_value_changed<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&RadialSlider) + 'static,
    {
        self.inner.listeners.connect(callback)
    }

    pub fn disconnect(&self, id: ListenerId) -> bool {
        self.inner.listeners.disconnect(id)
    }

    pub fn value(&self) -> f64 {
        self.inner.slider.borrow().value()
    }

    pub fn minimum(&self) -> f64 {
        self.inner.slider.borrow().minimum()
    }

    pub fn maximum(&self) -> f64 {
        self.inner.slider.borrow().maximum()
    }

    pub fn is_continuous(&self) -> bool {
        self.inner.slider.borrow().is_continuous()
    }

    pub fn is_tracking(&self) -> bool {
        self.inner.slider.borrow().is_tracking()
    }

    pub fn set_continuous(&self, continuous: bool) {
        self.inner.slider.borrow_mut().set_continuous(continuous);
    }

    pub fn set_value(&self, value: f64) {
        let change = self.inner.slider.borrow_mut().set_value(value);
        self.inner.area.queue_draw();
        self.notify(change);
    }

    /// The value and the notification update at once; with `animated` the knob
    /// glides to its new position. A later call supersedes a running glide.
    pub fn set_value_animated(&self, value: f64, animated: bool) {
        let (change, animating) = {
            let mut slider = self.inner.slider.borrow_mut();
            let change = slider.set_value_animated(value, animated, Instant::now());
            (change, slider.is_animating())
        };
        if animating {
            self.ensure_ticking();
        }
        self.inner.area.queue_draw();
        self.notify(change);
    }

    pub fn set_minimum(&self, minimum: f64) {
        let change = self.inner.slider.borrow_mut().set_minimum(minimum);
        self.inner.area.queue_draw();
        self.notify(change);
    }

    pub fn set_maximum(&self, maximum: f64) {
        let change = self.inner.slider.borrow_mut().set_maximum(maximum);
        self.inner.area.queue_draw();
        self.notify(change);
    }

    pub fn set_range(&self, minimum: f64, maximum: f64) {
        let change = self
            .inner
            .slider
            .borrow_mut()
            .set_range(ValueRange::new(minimum, maximum));
        self.inner.area.queue_draw();
        self.notify(change);
    }

    pub fn metrics(&self) -> Metrics {
        *self.inner.slider.borrow().metrics()
    }

    pub fn set_metrics(&self, metrics: Metrics) {
        self.update_metrics(|m| *m = metrics);
    }

    pub fn set_thickness(&self, thickness: f64) {
        self.update_metrics(|m| m.thickness = thickness);
    }

    pub fn set_padding(&self, padding: f64) {
        self.update_metrics(|m| m.padding = padding);
    }

    pub fn set_thumb_padding(&self, padding: f64) {
        self.update_metrics(|m| m.thumb_padding = padding);
    }

    pub fn set_zero_indicator_padding(&self, padding: f64) {
        self.update_metrics(|m| m.zero_indicator_padding = padding);
    }

    fn update_metrics(&self, f: impl FnOnce(&mut Metrics)) {
        {
            let mut slider = self.inner.slider.borrow_mut();
            let mut metrics = *slider.metrics();
            f(&mut metrics);
            slider.set_metrics(metrics);
        }
        self.refresh_thumb_radius();
    }

    pub fn set_animation(&self, animation: AnimationConfig) {
        self.inner.slider.borrow_mut().set_animation(animation);
    }

    pub fn set_appearance(&self, appearance: Appearance) {
        *self.inner.appearance.borrow_mut() = appearance;
        self.refresh_thumb_radius();
    }

    pub fn set_background_image(&self, image: Option<Pixbuf>) {
        self.update_appearance(|a| a.background_image = image);
    }

    pub fn set_circle_background_image(&self, image: Option<Pixbuf>) {
        self.update_appearance(|a| a.circle_background_image = image);
    }

    pub fn set_thumb_image(&self, image: Option<Pixbuf>) {
        self.update_appearance(|a| a.thumb_image = image);
    }

    pub fn set_zero_indicator_image(&self, image: Option<Pixbuf>) {
        self.update_appearance(|a| a.zero_indicator_image = image);
    }

    pub fn set_thumb_tint_color(&self, color: Option<Srgba<f64>>) {
        self.update_appearance(|a| a.thumb_tint_color = color);
    }

    pub fn set_circle_background_color(&self, color: Option<Srgba<f64>>) {
        self.update_appearance(|a| a.circle_background_color = color);
    }

    pub fn set_circle_active_color(&self, color: Option<Srgba<f64>>) {
        self.update_appearance(|a| a.circle_active_color = color);
    }

    fn update_appearance(&self, f: impl FnOnce(&mut Appearance)) {
        f(&mut self.inner.appearance.borrow_mut());
        self.refresh_thumb_radius();
    }

    fn refresh_thumb_radius(&self) {
        {
            let appearance = self.inner.appearance.borrow();
            let mut slider = self.inner.slider.borrow_mut();
            let radius = appearance.thumb_radius(slider.metrics());
            slider.set_thumb_radius(radius);
        }
        self.inner.area.queue_draw();
    }
}
