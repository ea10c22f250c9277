//! Easing curves for blend transitions.
//!
//! Every curve maps normalised time `t` to a progress value. All curves
//! satisfy `apply(0) == 0` and `apply(1) == 1`; `Back`, `Elastic` and
//! `Spring` overshoot in between, which blend transitions deliberately
//! leave unclamped.
//!
//! Curves follow Robert Penner's easing equations.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

const BACK_OVERSHOOT: f32 = 1.70158;
const ELASTIC_PERIOD: f32 = 0.3;

/// Named easing curve.
///
/// # Example
///
/// ```rust
/// use crossfade::easing::Ease;
///
/// assert_eq!(Ease::Linear.apply(0.25), 0.25);
/// assert_eq!(Ease::EaseInQuad.apply(0.5), 0.25);
/// assert_eq!(Ease::EaseInOutQuad.lerp(10.0, 20.0, 1.0), 20.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ease {
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
    Linear,
    Spring,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
}

impl Ease {
    pub const ALL: [Ease; 32] = [
        Ease::EaseInQuad,
        Ease::EaseOutQuad,
        Ease::EaseInOutQuad,
        Ease::EaseInCubic,
        Ease::EaseOutCubic,
        Ease::EaseInOutCubic,
        Ease::EaseInQuart,
        Ease::EaseOutQuart,
        Ease::EaseInOutQuart,
        Ease::EaseInQuint,
        Ease::EaseOutQuint,
        Ease::EaseInOutQuint,
        Ease::EaseInSine,
        Ease::EaseOutSine,
        Ease::EaseInOutSine,
        Ease::EaseInExpo,
        Ease::EaseOutExpo,
        Ease::EaseInOutExpo,
        Ease::EaseInCirc,
        Ease::EaseOutCirc,
        Ease::EaseInOutCirc,
        Ease::Linear,
        Ease::Spring,
        Ease::EaseInBounce,
        Ease::EaseOutBounce,
        Ease::EaseInOutBounce,
        Ease::EaseInBack,
        Ease::EaseOutBack,
        Ease::EaseInOutBack,
        Ease::EaseInElastic,
        Ease::EaseOutElastic,
        Ease::EaseInOutElastic,
    ];

    /// The curve as a plain function pointer.
    pub fn function(self) -> fn(f32) -> f32 {
        match self {
            Ease::EaseInQuad => in_quad,
            Ease::EaseOutQuad => out_quad,
            Ease::EaseInOutQuad => in_out_quad,
            Ease::EaseInCubic => in_cubic,
            Ease::EaseOutCubic => out_cubic,
            Ease::EaseInOutCubic => in_out_cubic,
            Ease::EaseInQuart => in_quart,
            Ease::EaseOutQuart => out_quart,
            Ease::EaseInOutQuart => in_out_quart,
            Ease::EaseInQuint => in_quint,
            Ease::EaseOutQuint => out_quint,
            Ease::EaseInOutQuint => in_out_quint,
            Ease::EaseInSine => in_sine,
            Ease::EaseOutSine => out_sine,
            Ease::EaseInOutSine => in_out_sine,
            Ease::EaseInExpo => in_expo,
            Ease::EaseOutExpo => out_expo,
            Ease::EaseInOutExpo => in_out_expo,
            Ease::EaseInCirc => in_circ,
            Ease::EaseOutCirc => out_circ,
            Ease::EaseInOutCirc => in_out_circ,
            Ease::Linear => linear,
            Ease::Spring => spring,
            Ease::EaseInBounce => in_bounce,
            Ease::EaseOutBounce => out_bounce,
            Ease::EaseInOutBounce => in_out_bounce,
            Ease::EaseInBack => in_back,
            Ease::EaseOutBack => out_back,
            Ease::EaseInOutBack => in_out_back,
            Ease::EaseInElastic => in_elastic,
            Ease::EaseOutElastic => out_elastic,
            Ease::EaseInOutElastic => in_out_elastic,
        }
    }

    /// Progress at normalised time `t`.
    pub fn apply(self, t: f32) -> f32 {
        (self.function())(t)
    }

    /// Interpolate between `start` and `end` along the curve.
    pub fn lerp(self, start: f32, end: f32, t: f32) -> f32 {
        start + (end - start) * self.apply(t)
    }
}

pub fn linear(t: f32) -> f32 {
    t
}

pub fn spring(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    ((t * PI * (0.2 + 2.5 * t * t * t)).sin() * (1.0 - t).powf(2.2) + t) * (1.0 + 1.2 * (1.0 - t))
}

pub fn in_quad(t: f32) -> f32 {
    t * t
}

pub fn out_quad(t: f32) -> f32 {
    -t * (t - 2.0)
}

pub fn in_out_quad(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        return 0.5 * t * t;
    }
    let t = t - 1.0;
    -0.5 * (t * (t - 2.0) - 1.0)
}

pub fn in_cubic(t: f32) -> f32 {
    t * t * t
}

pub fn out_cubic(t: f32) -> f32 {
    let t = t - 1.0;
    t * t * t + 1.0
}

pub fn in_out_cubic(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        return 0.5 * t * t * t;
    }
    let t = t - 2.0;
    0.5 * (t * t * t + 2.0)
}

pub fn in_quart(t: f32) -> f32 {
    t * t * t * t
}

pub fn out_quart(t: f32) -> f32 {
    let t = t - 1.0;
    -(t * t * t * t - 1.0)
}

pub fn in_out_quart(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        return 0.5 * t * t * t * t;
    }
    let t = t - 2.0;
    -0.5 * (t * t * t * t - 2.0)
}

pub fn in_quint(t: f32) -> f32 {
    t * t * t * t * t
}

pub fn out_quint(t: f32) -> f32 {
    let t = t - 1.0;
    t * t * t * t * t + 1.0
}

pub fn in_out_quint(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        return 0.5 * t * t * t * t * t;
    }
    let t = t - 2.0;
    0.5 * (t * t * t * t * t + 2.0)
}

pub fn in_sine(t: f32) -> f32 {
    1.0 - (t * PI * 0.5).cos()
}

pub fn out_sine(t: f32) -> f32 {
    (t * PI * 0.5).sin()
}

pub fn in_out_sine(t: f32) -> f32 {
    -0.5 * ((PI * t).cos() - 1.0)
}

pub fn in_expo(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    2f32.powf(10.0 * (t - 1.0))
}

pub fn out_expo(t: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    1.0 - 2f32.powf(-10.0 * t)
}

pub fn in_out_expo(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let t = t * 2.0;
    if t < 1.0 {
        return 0.5 * 2f32.powf(10.0 * (t - 1.0));
    }
    0.5 * (2.0 - 2f32.powf(-10.0 * (t - 1.0)))
}

pub fn in_circ(t: f32) -> f32 {
    1.0 - (1.0 - t * t).max(0.0).sqrt()
}

pub fn out_circ(t: f32) -> f32 {
    let t = t - 1.0;
    (1.0 - t * t).max(0.0).sqrt()
}

pub fn in_out_circ(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        return -0.5 * ((1.0 - t * t).max(0.0).sqrt() - 1.0);
    }
    let t = t - 2.0;
    0.5 * ((1.0 - t * t).max(0.0).sqrt() + 1.0)
}

pub fn out_bounce(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

pub fn in_bounce(t: f32) -> f32 {
    1.0 - out_bounce(1.0 - t)
}

pub fn in_out_bounce(t: f32) -> f32 {
    if t < 0.5 {
        return in_bounce(t * 2.0) * 0.5;
    }
    out_bounce(t * 2.0 - 1.0) * 0.5 + 0.5
}

pub fn in_back(t: f32) -> f32 {
    t * t * ((BACK_OVERSHOOT + 1.0) * t - BACK_OVERSHOOT)
}

pub fn out_back(t: f32) -> f32 {
    let t = t - 1.0;
    t * t * ((BACK_OVERSHOOT + 1.0) * t + BACK_OVERSHOOT) + 1.0
}

pub fn in_out_back(t: f32) -> f32 {
    let s = BACK_OVERSHOOT * 1.525;
    let t = t * 2.0;
    if t < 1.0 {
        return 0.5 * (t * t * ((s + 1.0) * t - s));
    }
    let t = t - 2.0;
    0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
}

pub fn in_elastic(t: f32) -> f32 {
    if t.abs() < f32::EPSILON {
        return 0.0;
    }
    if (t - 1.0).abs() < f32::EPSILON {
        return 1.0;
    }
    let s = ELASTIC_PERIOD * 0.25;
    let t = t - 1.0;
    -(2f32.powf(10.0 * t) * ((t - s) * (2.0 * PI) / ELASTIC_PERIOD).sin())
}

pub fn out_elastic(t: f32) -> f32 {
    if t.abs() < f32::EPSILON {
        return 0.0;
    }
    if (t - 1.0).abs() < f32::EPSILON {
        return 1.0;
    }
    let s = ELASTIC_PERIOD * 0.25;
    2f32.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / ELASTIC_PERIOD).sin() + 1.0
}

pub fn in_out_elastic(t: f32) -> f32 {
    if t.abs() < f32::EPSILON {
        return 0.0;
    }
    if (t - 1.0).abs() < f32::EPSILON {
        return 1.0;
    }
    let period = ELASTIC_PERIOD * 1.5;
    let s = period * 0.25;
    let t = t * 2.0 - 1.0;
    if t < 0.0 {
        return -0.5 * (2f32.powf(10.0 * t) * ((t - s) * (2.0 * PI) / period).sin());
    }
    2f32.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / period).sin() * 0.5 + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn every_curve_starts_at_zero_and_ends_at_one() {
        for ease in Ease::ALL {
            assert!(ease.apply(0.0).abs() < EPSILON, "{ease:?} at 0 = {}", ease.apply(0.0));
            assert!(
                (ease.apply(1.0) - 1.0).abs() < EPSILON,
                "{ease:?} at 1 = {}",
                ease.apply(1.0)
            );
        }
    }

    #[test]
    fn symmetric_curves_pass_through_midpoint() {
        for ease in [
            Ease::Linear,
            Ease::EaseInOutQuad,
            Ease::EaseInOutCubic,
            Ease::EaseInOutQuart,
            Ease::EaseInOutQuint,
            Ease::EaseInOutSine,
            Ease::EaseInOutExpo,
            Ease::EaseInOutCirc,
        ] {
            assert!((ease.apply(0.5) - 0.5).abs() < EPSILON, "{ease:?}");
        }
    }

    #[test]
    fn back_curves_overshoot() {
        assert!(Ease::EaseInBack.apply(0.2) < 0.0);
        assert!(Ease::EaseOutBack.apply(0.8) > 1.0);
    }

    #[test]
    fn polynomial_curves_are_monotonic() {
        for ease in [
            Ease::Linear,
            Ease::EaseInQuad,
            Ease::EaseOutQuad,
            Ease::EaseInOutCubic,
            Ease::EaseOutQuint,
            Ease::EaseInOutSine,
        ] {
            let mut previous = ease.apply(0.0);
            for step in 1..=100 {
                let value = ease.apply(step as f32 / 100.0);
                assert!(value + 1e-6 >= previous, "{ease:?} decreased at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn lerp_scales_between_endpoints() {
        assert_eq!(Ease::Linear.lerp(2.0, 4.0, 0.5), 3.0);
        assert_eq!(Ease::EaseInQuad.lerp(0.0, 10.0, 0.5), 2.5);
        assert_eq!(Ease::EaseOutQuad.lerp(-1.0, 1.0, 0.0), -1.0);
    }

    #[test]
    fn ease_serializes_by_name() {
        let json = serde_json::to_string(&Ease::EaseOutBounce).unwrap();
        assert_eq!(json, "\"EaseOutBounce\"");
        let back: Ease = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Ease::EaseOutBounce);
    }
}
