/*
Published Parameters
====================

A published parameter is the host-facing view of one control: a value range,
a warp that maps it to a normalized [0, 1] proportion, and a zero threshold.

Warps
-----

  Linear        p = (v - lo) / (hi - lo)
  Exp           p = ln(v / lo) / ln(hi / lo)
  ExpBipolar    the Exp curve mirrored around p = 0.5, so negative values
                live in [0, 0.5) and positive ones in (0.5, 1]

Exponential warps cannot reach zero, so `set_range` with lo = 0 moves lo up to
the step interval. The zero threshold then snaps anything at or below it back
to a true 0.0, which is how a log-scaled "glide" knob still has an off
position.

A negative threshold (the default) disables snapping.
*/

use crate::error::EngineError;

const DISABLED_ZERO_THRESHOLD: f32 = -131_072.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Warp {
    #[default]
    Linear,
    Exp,
    ExpBipolar,
}

#[derive(Debug, Clone)]
pub struct PublishedParam {
    name: String,
    alias: Option<String>,
    index: usize,
    lo: f32,
    hi: f32,
    interval: f32,
    warp: Warp,
    zero_threshold: f32,
    value: f32,
    default: f32,
    group: Option<usize>,
}

impl PublishedParam {
    /// A linear [0, 1] parameter with snapping disabled.
    pub fn new(name: &str, index: usize) -> Self {
        Self {
            name: name.to_owned(),
            alias: None,
            index,
            lo: 0.0,
            hi: 1.0,
            interval: 0.01,
            warp: Warp::Linear,
            zero_threshold: DISABLED_ZERO_THRESHOLD,
            value: 0.0,
            default: 0.0,
            group: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_owned());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn range(&self) -> (f32, f32) {
        (self.lo, self.hi)
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn warp(&self) -> Warp {
        self.warp
    }

    pub fn zero_threshold(&self) -> f32 {
        self.zero_threshold
    }

    pub fn group(&self) -> Option<usize> {
        self.group
    }

    pub fn set_group(&mut self, group: Option<usize>) {
        self.group = group;
    }

    pub fn set_range(
        &mut self,
        lo: f32,
        hi: f32,
        interval: f32,
        warp: Warp,
        zero_threshold: f32,
    ) -> Result<(), EngineError> {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(EngineError::InvalidRange { lo, hi });
        }

        let mut lo = lo;
        let mut zero_threshold = zero_threshold;
        if warp != Warp::Linear && lo == 0.0 {
            lo = interval;
            if zero_threshold == 0.0 {
                zero_threshold = interval;
            }
        }
        if warp != Warp::Linear && !(lo > 0.0 && lo < hi) {
            return Err(EngineError::InvalidRange { lo, hi });
        }

        self.lo = lo;
        self.hi = hi;
        self.interval = interval;
        self.warp = warp;
        self.zero_threshold = zero_threshold;
        Ok(())
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Clamp into range, snap to zero under the threshold, store.
    ///
    /// Non-finite input is rejected and leaves the value untouched.
    pub fn set_value(&mut self, value: f32) -> Result<f32, EngineError> {
        if !value.is_finite() {
            tracing::warn!(param = %self.name, value, "rejected non-finite parameter value");
            return Err(EngineError::InvalidParamValue {
                name: self.name.clone(),
                value,
            });
        }
        self.value = self.snap_to_zero(self.clamp(value));
        Ok(self.value)
    }

    pub fn default_value(&self) -> f32 {
        self.default
    }

    pub fn set_default(&mut self, value: f32) {
        self.default = value;
    }

    pub fn reset_to_default(&mut self) -> f32 {
        self.value = self.snap_to_zero(self.clamp(self.default));
        self.value
    }

    fn clamp(&self, value: f32) -> f32 {
        match self.warp {
            Warp::ExpBipolar if value == 0.0 => 0.0,
            Warp::ExpBipolar => value.abs().clamp(self.lo, self.hi).copysign(value),
            _ => value.clamp(self.lo, self.hi),
        }
    }

    fn snap_to_zero(&self, value: f32) -> f32 {
        if value.abs() <= self.zero_threshold {
            0.0
        } else {
            value
        }
    }

    /// Normalized position of the current value.
    pub fn value_as_linear_proportion(&self) -> f32 {
        let (lo, hi) = (self.lo, self.hi);
        match self.warp {
            Warp::Linear => (self.value - lo) / (hi - lo),
            Warp::Exp => {
                let v = self.value.clamp(lo, hi).max(self.zero_threshold);
                (v / lo).ln() / (hi / lo).ln()
            }
            Warp::ExpBipolar => {
                let magnitude = self.value.abs().clamp(lo, hi).max(self.zero_threshold);
                let p = (magnitude / lo).ln() / (hi / lo).ln();
                if self.value > 0.0 {
                    0.5 + p * 0.5
                } else {
                    0.5 - p * 0.5
                }
            }
        }
    }

    /// Set from a normalized position; the exact inverse of
    /// `value_as_linear_proportion` for in-range values.
    pub fn set_value_as_linear_proportion(&mut self, p: f32) -> Result<f32, EngineError> {
        if !p.is_finite() {
            tracing::warn!(param = %self.name, p, "rejected non-finite proportion");
            return Err(EngineError::InvalidParamValue {
                name: self.name.clone(),
                value: p,
            });
        }
        let p = p.clamp(0.0, 1.0);
        let (lo, hi) = (self.lo, self.hi);

        let value = match self.warp {
            Warp::Linear => lo + p * (hi - lo),
            Warp::Exp => lo * (hi / lo).powf(p),
            Warp::ExpBipolar => {
                let positive = p > 0.5;
                let bipolar = if positive { (p - 0.5) * 2.0 } else { (0.5 - p) * 2.0 };
                let magnitude = lo * (hi / lo).powf(bipolar);
                if positive {
                    magnitude
                } else {
                    -magnitude
                }
            }
        };
        self.value = self.snap_to_zero(value);
        Ok(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp_param(lo: f32, hi: f32) -> PublishedParam {
        let mut param = PublishedParam::new("cutoff", 0);
        param.set_range(lo, hi, 0.01, Warp::Exp, 0.0).unwrap();
        param
    }

    #[test]
    fn values_clamp_to_range() {
        let mut param = PublishedParam::new("level", 0);
        param.set_range(-1.0, 1.0, 0.01, Warp::Linear, -1.0).unwrap();
        assert_eq!(param.set_value(3.0).unwrap(), 1.0);
        assert_eq!(param.set_value(-7.0).unwrap(), -1.0);
        assert_eq!(param.set_value(0.25).unwrap(), 0.25);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut param = PublishedParam::new("x", 0);
        assert_eq!(
            param.set_range(2.0, 1.0, 0.1, Warp::Linear, 0.0),
            Err(EngineError::InvalidRange { lo: 2.0, hi: 1.0 })
        );
        assert!(param.set_range(-1.0, 1.0, 0.1, Warp::Exp, 0.0).is_err());
        // the old range survives
        assert_eq!(param.range(), (0.0, 1.0));
    }

    #[test]
    fn exponential_warp_moves_zero_lo_to_interval() {
        let mut param = PublishedParam::new("glide", 0);
        param.set_range(0.0, 2.0, 0.001, Warp::Exp, 0.0).unwrap();
        assert_eq!(param.range(), (0.001, 2.0));
        assert_eq!(param.zero_threshold(), 0.001);

        // the bottom of the range reads as off
        assert_eq!(param.set_value(0.0).unwrap(), 0.0);
        assert_eq!(param.set_value_as_linear_proportion(0.0).unwrap(), 0.0);
        assert_eq!(param.value_as_linear_proportion(), 0.0);
    }

    #[test]
    fn exponential_proportion_round_trips() {
        let mut param = exp_param(20.0, 20_000.0);
        let mut v = 20.0f32;
        while v <= 20_000.0 {
            param.set_value(v).unwrap();
            let p = param.value_as_linear_proportion();
            let back = param.set_value_as_linear_proportion(p).unwrap();
            assert!(
                ((back - v) / v).abs() < 1e-4,
                "{v} -> {p} -> {back}"
            );
            v *= 1.37;
        }
    }

    #[test]
    fn exponential_midpoint_is_geometric_mean() {
        let mut param = exp_param(20.0, 20_000.0);
        let mid = param.set_value_as_linear_proportion(0.5).unwrap();
        assert!((mid - 632.455_5).abs() < 0.1, "mid {mid}");
    }

    #[test]
    fn linear_proportion_round_trips() {
        let mut param = PublishedParam::new("pan", 0);
        param.set_range(-1.0, 1.0, 0.01, Warp::Linear, -1.0).unwrap();
        param.set_value(-0.4).unwrap();
        assert!((param.value_as_linear_proportion() - 0.3).abs() < 1e-6);
        assert!((param.set_value_as_linear_proportion(0.3).unwrap() + 0.4).abs() < 1e-6);
    }

    #[test]
    fn bipolar_folds_around_half() {
        let mut param = PublishedParam::new("bend", 0);
        param.set_range(0.0, 8.0, 0.01, Warp::ExpBipolar, 0.0).unwrap();

        param.set_value(0.0).unwrap();
        assert_eq!(param.value_as_linear_proportion(), 0.5);
        assert_eq!(param.set_value_as_linear_proportion(0.5).unwrap(), 0.0);

        for v in [-8.0, -2.5, -0.1, 0.1, 2.5, 8.0] {
            param.set_value(v).unwrap();
            let p = param.value_as_linear_proportion();
            assert_eq!(p > 0.5, v > 0.0);
            let back = param.set_value_as_linear_proportion(p).unwrap();
            assert!(((back - v) / v).abs() < 1e-4, "{v} -> {p} -> {back}");
        }
    }

    #[test]
    fn bipolar_clamp_keeps_sign() {
        let mut param = PublishedParam::new("bend", 0);
        param.set_range(0.5, 4.0, 0.5, Warp::ExpBipolar, -1.0).unwrap();
        assert_eq!(param.set_value(-10.0).unwrap(), -4.0);
        assert_eq!(param.set_value(0.1).unwrap(), 0.5);
        assert_eq!(param.set_value(-0.1).unwrap(), -0.5);
    }

    #[test]
    fn nan_is_rejected_and_value_kept() {
        let mut param = exp_param(20.0, 20_000.0);
        param.set_value(440.0).unwrap();
        assert!(matches!(
            param.set_value(f32::NAN),
            Err(EngineError::InvalidParamValue { .. })
        ));
        assert!(param.set_value_as_linear_proportion(f32::NAN).is_err());
        assert_eq!(param.value(), 440.0);
    }

    #[test]
    fn zero_threshold_snaps_small_values() {
        let mut param = PublishedParam::new("drift", 0);
        param.set_range(-1.0, 1.0, 0.01, Warp::Linear, 0.05).unwrap();
        assert_eq!(param.set_value(0.04).unwrap(), 0.0);
        assert_eq!(param.set_value(-0.05).unwrap(), 0.0);
        assert_eq!(param.set_value(0.06).unwrap(), 0.06);
    }

    #[test]
    fn default_is_applied_through_range() {
        let mut param = exp_param(20.0, 20_000.0);
        param.set_default(50_000.0);
        assert_eq!(param.reset_to_default(), 20_000.0);
    }
}
