use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CurveError {
    InvalidInput(String),
    OutOfRange {
        value: String,
        min: String,
        max: String,
    },
    PrecisionLoss {
        tick: i32,
        expected: f64,
        actual: f64,
    },
    InvalidConfig(String),
}

impl CurveError {
    pub fn out_of_range<V: fmt::Display, B: fmt::Display>(value: V, min: B, max: B) -> Self {
        CurveError::OutOfRange {
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CurveError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CurveError::OutOfRange { value, min, max } => {
                write!(f, "Out of range: {} is outside [{}, {}]", value, min, max)
            }
            CurveError::PrecisionLoss {
                tick,
                expected,
                actual,
            } => write!(
                f,
                "Precision loss: tick {} encodes to {}, but the decoded price was {}",
                tick, actual, expected
            ),
            CurveError::InvalidConfig(msg) => write!(f, "Invalid curve config: {}", msg),
        }
    }
}

impl Error for CurveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CurveError::out_of_range(400_000_000, -108_000_000, 342_000_000).to_string(),
            "Out of range: 400000000 is outside [-108000000, 342000000]"
        );
        assert_eq!(
            CurveError::InvalidInput("price must be positive".to_string()).to_string(),
            "Invalid input: price must be positive"
        );
        assert_eq!(
            CurveError::PrecisionLoss {
                tick: 100,
                expected: 1.00009,
                actual: 1.0001,
            }
            .to_string(),
            "Precision loss: tick 100 encodes to 1.0001, but the decoded price was 1.00009"
        );
    }
}
