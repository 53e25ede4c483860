use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use dotenv::dotenv;
use serde::{Deserialize, Serialize};

use crate::curve::tick_curve::TickCurve;
use crate::utils::error::CurveError;
use crate::utils::segmentation::{DECADE_WIDTH, MAX_TICK, MIN_TICK};

pub const DEFAULT_PRECISION_TOLERANCE: f64 = 1e-9;

/// What to do with a tick or price outside the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    #[default]
    Reject,
    Clamp,
}

impl FromStr for OutOfRangePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(OutOfRangePolicy::Reject),
            "clamp" => Ok(OutOfRangePolicy::Clamp),
            _ => Err(anyhow!("Invalid out of range policy: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    pub decade_width: i32,
    pub min_tick: i32,
    pub max_tick: i32,
    pub out_of_range: OutOfRangePolicy,
    pub precision_tolerance: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            decade_width: DECADE_WIDTH,
            min_tick: MIN_TICK,
            max_tick: MAX_TICK,
            out_of_range: OutOfRangePolicy::Reject,
            precision_tolerance: DEFAULT_PRECISION_TOLERANCE,
        }
    }
}

impl CurveConfig {
    /// Reads `TICK_*` variables, falling back to the defaults for any that
    /// are unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            decade_width: env_or("TICK_DECADE_WIDTH", defaults.decade_width)?,
            min_tick: env_or("TICK_MIN", defaults.min_tick)?,
            max_tick: env_or("TICK_MAX", defaults.max_tick)?,
            out_of_range: env_or("TICK_OUT_OF_RANGE", defaults.out_of_range)?,
            precision_tolerance: env_or(
                "TICK_PRECISION_TOLERANCE",
                defaults.precision_tolerance,
            )?,
        };

        log::info!(
            "Loaded tick curve config: decade_width={}, ticks=[{}, {}], out_of_range={:?}",
            config.decade_width,
            config.min_tick,
            config.max_tick,
            config.out_of_range
        );
        Ok(config)
    }

    /// Same as [`CurveConfig::from_env`], after loading a `.env` file if one
    /// is present.
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_env()
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).context("Failed to parse tick curve config JSON")?;
        log::info!("Loaded tick curve config from JSON: {:?}", config);
        Ok(config)
    }

    pub fn curve(&self) -> Result<TickCurve, CurveError> {
        TickCurve::new(self.clone())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Into<anyhow::Error>,
{
    match env::var(key) {
        Ok(raw) => {
            let parsed: Result<T> = raw.trim().parse::<T>().map_err(Into::into);
            parsed.with_context(|| format!("Failed to parse {}", key))
        }
        Err(_) => {
            log::debug!("{} not set, using {}", key, default);
            Ok(default)
        }
    }
}

impl Display for OutOfRangePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OutOfRangePolicy::Reject => write!(f, "reject"),
            OutOfRangePolicy::Clamp => write!(f, "clamp"),
        }
    }
}
