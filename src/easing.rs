//! Easing curves for preset interpolation
//!
//! Every curve maps normalized progress `t` in `[0, 1]` to eased progress.
//! Curves are looked up by their snake_case name (`ease_in_out_cubic`, ...),
//! and unknown names resolve to [`Easing::Linear`].

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const BACK_C1: f64 = 1.70158;
const BACK_C2: f64 = BACK_C1 * 1.525;
const BACK_C3: f64 = BACK_C1 + 1.0;
const ELASTIC_C4: f64 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f64 = (2.0 * PI) / 4.5;
const BOUNCE_N1: f64 = 7.5625;
const BOUNCE_D1: f64 = 2.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl Easing {
    /// Map raw progress to eased progress. `t` is clamped to `[0, 1]`.
    #[must_use]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::Linear => t,

            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }

            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let t = 2.0 * t - 2.0;
                    0.5 * t * t * t + 1.0
                }
            }

            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => {
                let t = t - 1.0;
                1.0 - t * t * t * t
            }
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let t = t - 1.0;
                    1.0 - 8.0 * t * t * t * t
                }
            }

            Easing::EaseInQuint => t * t * t * t * t,
            Easing::EaseOutQuint => {
                let t = t - 1.0;
                1.0 + t * t * t * t * t
            }
            Easing::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t * t * t * t * t
                } else {
                    let t = t - 1.0;
                    1.0 + 16.0 * t * t * t * t * t
                }
            }

            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => 0.5 * (1.0 - (PI * t).cos()),

            Easing::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2.0_f64.powf(10.0 * (t - 1.0))
                }
            }
            Easing::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f64.powf(-10.0 * t)
                }
            }
            Easing::EaseInOutExpo => {
                if t == 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    0.5 * 2.0_f64.powf(20.0 * t - 10.0)
                } else {
                    1.0 - 0.5 * 2.0_f64.powf(-20.0 * t + 10.0)
                }
            }

            Easing::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            Easing::EaseOutCirc => {
                let t = t - 1.0;
                (1.0 - t * t).sqrt()
            }
            Easing::EaseInOutCirc => {
                if t < 0.5 {
                    0.5 * (1.0 - (1.0 - 4.0 * t * t).sqrt())
                } else {
                    let t = 2.0 * t - 2.0;
                    0.5 * ((1.0 - t * t).sqrt() + 1.0)
                }
            }

            Easing::EaseInBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Easing::EaseOutBack => {
                let t = t - 1.0;
                1.0 + BACK_C3 * t * t * t + BACK_C1 * t * t
            }
            Easing::EaseInOutBack => {
                if t < 0.5 {
                    let t2 = 2.0 * t;
                    0.5 * t2 * t2 * ((BACK_C2 + 1.0) * t2 - BACK_C2)
                } else {
                    let t = 2.0 * t - 2.0;
                    0.5 * (t * t * ((BACK_C2 + 1.0) * t + BACK_C2) + 2.0)
                }
            }

            Easing::EaseInElastic => {
                if t == 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    -(2.0_f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
                }
            }
            Easing::EaseOutElastic => {
                if t == 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    2.0_f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
            Easing::EaseInOutElastic => {
                if t == 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    -0.5 * 2.0_f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()
                } else {
                    0.5 * 2.0_f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()
                        + 1.0
                }
            }

            Easing::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            Easing::EaseOutBounce => bounce_out(t),
            Easing::EaseInOutBounce => {
                if t < 0.5 {
                    0.5 * (1.0 - bounce_out(1.0 - 2.0 * t))
                } else {
                    0.5 * bounce_out(2.0 * t - 1.0) + 0.5
                }
            }
        }
    }

    /// Interpolate between `start` and `end` with this curve.
    #[must_use]
    #[inline]
    pub fn interpolate(&self, start: f64, end: f64, t: f64) -> f64 {
        start + (end - start) * self.apply(t)
    }

    /// Look up a curve by its snake_case key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let key = name.trim();
        Self::all().iter().copied().find(|e| e.name() == key)
    }

    /// Look up a curve by name, falling back to linear for unknown names.
    #[must_use]
    pub fn from_name_or_linear(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    #[must_use]
    pub fn all() -> &'static [Easing] {
        use Easing::*;
        &[
            Linear,
            EaseInQuad,
            EaseOutQuad,
            EaseInOutQuad,
            EaseInCubic,
            EaseOutCubic,
            EaseInOutCubic,
            EaseInQuart,
            EaseOutQuart,
            EaseInOutQuart,
            EaseInQuint,
            EaseOutQuint,
            EaseInOutQuint,
            EaseInSine,
            EaseOutSine,
            EaseInOutSine,
            EaseInExpo,
            EaseOutExpo,
            EaseInOutExpo,
            EaseInCirc,
            EaseOutCirc,
            EaseInOutCirc,
            EaseInBack,
            EaseOutBack,
            EaseInOutBack,
            EaseInElastic,
            EaseOutElastic,
            EaseInOutElastic,
            EaseInBounce,
            EaseOutBounce,
            EaseInOutBounce,
        ]
    }

    /// Menu key, as offered by the host's lerp method menu.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "ease_in_quad",
            Easing::EaseOutQuad => "ease_out_quad",
            Easing::EaseInOutQuad => "ease_in_out_quad",
            Easing::EaseInCubic => "ease_in_cubic",
            Easing::EaseOutCubic => "ease_out_cubic",
            Easing::EaseInOutCubic => "ease_in_out_cubic",
            Easing::EaseInQuart => "ease_in_quart",
            Easing::EaseOutQuart => "ease_out_quart",
            Easing::EaseInOutQuart => "ease_in_out_quart",
            Easing::EaseInQuint => "ease_in_quint",
            Easing::EaseOutQuint => "ease_out_quint",
            Easing::EaseInOutQuint => "ease_in_out_quint",
            Easing::EaseInSine => "ease_in_sine",
            Easing::EaseOutSine => "ease_out_sine",
            Easing::EaseInOutSine => "ease_in_out_sine",
            Easing::EaseInExpo => "ease_in_expo",
            Easing::EaseOutExpo => "ease_out_expo",
            Easing::EaseInOutExpo => "ease_in_out_expo",
            Easing::EaseInCirc => "ease_in_circ",
            Easing::EaseOutCirc => "ease_out_circ",
            Easing::EaseInOutCirc => "ease_in_out_circ",
            Easing::EaseInBack => "ease_in_back",
            Easing::EaseOutBack => "ease_out_back",
            Easing::EaseInOutBack => "ease_in_out_back",
            Easing::EaseInElastic => "ease_in_elastic",
            Easing::EaseOutElastic => "ease_out_elastic",
            Easing::EaseInOutElastic => "ease_in_out_elastic",
            Easing::EaseInBounce => "ease_in_bounce",
            Easing::EaseOutBounce => "ease_out_bounce",
            Easing::EaseInOutBounce => "ease_in_out_bounce",
        }
    }

    /// Human readable label for menus.
    #[must_use]
    pub fn label(&self) -> String {
        if *self == Easing::Linear {
            return "Linear".to_string();
        }
        let family = self.name().rsplit('_').next().unwrap_or_default();
        let mut family_label = family.to_string();
        if let Some(first) = family_label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        let mode = if self.name().starts_with("ease_in_out_") {
            "In-Out"
        } else if self.name().starts_with("ease_in_") {
            "In"
        } else {
            "Out"
        };
        format!("{family_label} {mode}")
    }
}

impl std::fmt::Display for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ease `t` with the curve called `name`, linear when the name is unknown.
#[must_use]
pub fn ease(name: &str, t: f64) -> f64 {
    Easing::from_name_or_linear(name).apply(t)
}

#[inline]
fn bounce_out(t: f64) -> f64 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let t = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let t = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.984_375
    }
}
