use serde::{Deserialize, Serialize};

use crate::utils::error::CurveError;

/// How a price between two grid points is mapped to a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Closest tick, halfway prices go to the higher one.
    #[default]
    Nearest,
    /// Highest tick whose price is `<=` the input.
    Floor,
    /// Lowest tick whose price is `>=` the input.
    Ceil,
}

/// Outcome of a tolerance checked decode. `precision_loss` is a flag, the
/// tick is still usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickDecode {
    pub tick: i32,
    pub price: f64,
    pub encoded_price: f64,
    pub relative_error: f64,
    pub precision_loss: bool,
}

impl TickDecode {
    /// Turns a flagged decode into an error for callers that cannot accept
    /// an approximate tick.
    pub fn strict(self) -> Result<i32, CurveError> {
        if self.precision_loss {
            return Err(CurveError::PrecisionLoss {
                tick: self.tick,
                expected: self.price,
                actual: self.encoded_price,
            });
        }
        Ok(self.tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickRange {
    pub lower: i32,
    pub upper: i32,
}

impl TickRange {
    pub fn new(lower: i32, upper: i32) -> Result<Self, CurveError> {
        if lower >= upper {
            return Err(CurveError::InvalidInput(format!(
                "lower tick {} must be below upper tick {}",
                lower, upper
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn width(&self) -> i64 {
        self.upper as i64 - self.lower as i64
    }

    pub fn contains(&self, tick: i32) -> bool {
        self.lower <= tick && tick <= self.upper
    }
}
