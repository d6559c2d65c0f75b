use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::time::{Duration, Instant};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const DEFAULT_DURATION_MS: u64 = 250;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[strum(to_string = "linear")]
    Linear,
    #[strum(to_string = "ease-in", serialize = "easein")]
    EaseIn,
    #[strum(to_string = "ease-out", serialize = "easeout")]
    EaseOut,
    #[default]
    #[strum(to_string = "ease-in-out", serialize = "easeinout")]
    EaseInOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` onto the eased curve (cubic).
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::default(),
        }
    }
}

impl AnimationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub finished: bool,
}

/// Interpolates the displayed value from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: f64,
    pub to: f64,
    pub started: Instant,
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    pub fn new(from: f64, to: f64, started: Instant, config: &AnimationConfig) -> Self {
        Self {
            from,
            to,
            started,
            duration: config.duration(),
            easing: config.easing,
        }
    }

    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn sample(&self, now: Instant) -> Sample {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return Sample {
                value: self.to,
                finished: true,
            };
        }
        Sample {
            value: self.from + (self.to - self.from) * self.easing.apply(progress),
            finished: false,
        }
    }
}

/// Holds at most one running transition. Starting a new one supersedes the
/// old one; the generation counter lets a frame driver notice that the
/// transition it was scheduled for is gone.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    current: Option<Transition>,
    generation: u64,
}

impl Animator {
    pub fn start(&mut self, transition: Transition) -> u64 {
        if self.current.is_some() {
            log::debug!("Superseding in-flight transition {}", self.generation);
        }
        self.generation += 1;
        self.current = Some(transition);
        self.generation
    }

    /// Returns `true` if a transition was actually dropped.
    pub fn cancel(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current(&self) -> Option<&Transition> {
        self.current.as_ref()
    }

    pub fn sample(&self, now: Instant) -> Option<Sample> {
        self.current.as_ref().map(|t| t.sample(now))
    }

    /// Samples the running transition and forgets it once it has finished.
    pub fn tick(&mut self, now: Instant) -> Option<Sample> {
        let sample = self.sample(now)?;
        if sample.finished {
            self.current = None;
        }
        Some(sample)
    }
}
