use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::slider::{Appearance, RadialSlider};
use crate::gui::theme;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::path::PathBuf;

pub struct AppModel {
    pub slider: RadialSlider,
    pub value: f64,
    pub config_path: PathBuf,
}

#[derive(Debug)]
pub enum AppMsg {
    SetValue { value: f64, animated: bool },
    SetMinimum(f64),
    SetMaximum(f64),
    SetContinuous(bool),
    ValueChanged(f64),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::SetValue { value, animated } => AppMsg::SetValue { value, animated },
            AppEvent::SetMinimum(v) => AppMsg::SetMinimum(v),
            AppEvent::SetMaximum(v) => AppMsg::SetMaximum(v),
            AppEvent::SetContinuous(c) => AppMsg::SetContinuous(c),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

/// Pushes a loaded config into the slider. Runs again on every reload, so it
/// leaves the current value alone apart from clamping it into the new range.
pub fn apply_config(slider: &RadialSlider, config: &Config) {
    slider.set_metrics(config.style.metrics());
    slider.set_appearance(Appearance::from_config(&config.style));
    slider.set_animation(config.animation);
    slider.set_continuous(config.slider.continuous);

    let range = config.slider.range();
    slider.set_range(range.minimum(), range.maximum());
}

fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, PathBuf, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Radial"),
            set_default_size: (360, 420),

            #[name = "container"]
            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 12,
                set_margin_all: 24,

                #[name = "label"]
                gtk::Label {
                    add_css_class: "radial-value",
                    #[watch]
                    set_label: &format_value(model.value),
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, config_path, rx) = init;

        theme::load_css();

        let slider = RadialSlider::new();
        apply_config(&slider, &config);
        if let Some(value) = config.slider.value {
            slider.set_value(value);
        }

        let model = AppModel {
            value: slider.value(),
            slider,
            config_path,
        };

        let widgets = view_output!();
        widgets.container.prepend(model.slider.widget());

        {
            let sender = sender.clone();
            model.slider.connect_value_changed(move |slider| {
                sender.input(AppMsg::ValueChanged(slider.value()));
            });
        }

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::SetValue { value, animated } => {
                self.slider.set_value_animated(value, animated);
            }
            AppMsg::SetMinimum(v) => self.slider.set_minimum(v),
            AppMsg::SetMaximum(v) => self.slider.set_maximum(v),
            AppMsg::SetContinuous(c) => {
                self.slider.set_continuous(c);
                log::info!("Continuous updates {}", if c { "on" } else { "off" });
            }
            AppMsg::ValueChanged(v) => {
                self.value = v;
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(new_config) => {
                    apply_config(&self.slider, &new_config);
                    self.value = self.slider.value();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
