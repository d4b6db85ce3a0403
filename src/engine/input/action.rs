// Actions: scalar reads out of a device

use super::device::{Code, PushRef};
use super::{ControlError, Result};
use crate::core::math::clamp_axis;
use std::fmt;
use std::rc::Rc;

/// A scalar read out of a device
///
/// Axis contributions lie in `[-1.0, 1.0]` with `0.0` as neutral. Fire
/// contributions count as active while strictly positive. Values are read
/// fresh on every call.
pub trait Action {
    fn action(&self) -> f64;
}

/// Any closure returning a scalar is an action (scripted input, tests)
impl<F: Fn() -> f64> Action for F {
    fn action(&self) -> f64 {
        self()
    }
}

pub type ActionRef = Rc<dyn Action>;

/// Two codes of a push device folded into one axis
///
/// The positive code wins when both are held.
pub struct DigitalAxisAction {
    positive: Code,
    negative: Code,
    push: PushRef,
}

impl DigitalAxisAction {
    /// Create an axis action; both directions on the same code is refused
    pub fn new(positive: Code, negative: Code, push: PushRef) -> Result<Self> {
        if positive == negative {
            return Err(ControlError::AmbiguousAxis(positive));
        }
        Ok(Self {
            positive,
            negative,
            push,
        })
    }

    pub fn positive(&self) -> Code {
        self.positive
    }

    pub fn negative(&self) -> Code {
        self.negative
    }
}

impl Action for DigitalAxisAction {
    fn action(&self) -> f64 {
        if self.push.is_pushed(self.positive) {
            1.0
        } else if self.push.is_pushed(self.negative) {
            -1.0
        } else {
            0.0
        }
    }
}

impl fmt::Debug for DigitalAxisAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigitalAxisAction")
            .field("positive", &self.positive)
            .field("negative", &self.negative)
            .field("device", &self.push.name())
            .finish()
    }
}

/// One code of a push device: `1.0` while held, `0.0` otherwise
pub struct ButtonAction {
    code: Code,
    push: PushRef,
}

impl ButtonAction {
    pub fn new(code: Code, push: PushRef) -> Self {
        Self { code, push }
    }

    pub fn code(&self) -> Code {
        self.code
    }
}

impl Action for ButtonAction {
    fn action(&self) -> f64 {
        if self.push.is_pushed(self.code) {
            1.0
        } else {
            0.0
        }
    }
}

impl fmt::Debug for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonAction")
            .field("code", &self.code)
            .field("device", &self.push.name())
            .finish()
    }
}

/// A continuous source (stick, trigger) clamped to `[-1.0, 1.0]`
pub struct AnalogAction<F> {
    source: F,
}

impl<F: Fn() -> f64> AnalogAction<F> {
    pub fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F: Fn() -> f64> Action for AnalogAction<F> {
    fn action(&self) -> f64 {
        clamp_axis((self.source)())
    }
}

impl<F> fmt::Debug for AnalogAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalogAction").finish_non_exhaustive()
    }
}
