//! The target expressions every strategy has to implement.

use serde::Serialize;

/// Number of `f64` arrays touched by one evaluation: two inputs, one output.
pub const WORKING_SET_ARRAYS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    /// `sqrt(x * x + y * y)`
    Algebraic,
    /// `atan2(y, x)`
    Transcendental,
}

impl Expression {
    pub const ALL: [Expression; 2] = [Expression::Algebraic, Expression::Transcendental];

    /// Evaluate one element. Strategies must produce bit-identical results,
    /// so the operation order here is the contract (no fused multiply-add).
    #[inline(always)]
    pub fn apply(self, x: f64, y: f64) -> f64 {
        match self {
            Expression::Algebraic => (x * x + y * y).sqrt(),
            Expression::Transcendental => y.atan2(x),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Expression::Algebraic => "algebraic",
            Expression::Transcendental => "transcendental",
        }
    }

    /// Report label, padded so the timing columns line up.
    pub fn label(self) -> &'static str {
        match self {
            Expression::Algebraic => "an algebraic expression:    ",
            Expression::Transcendental => "a transcendental expression:",
        }
    }
}
