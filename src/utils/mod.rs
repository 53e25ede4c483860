pub mod core_math;
pub mod error;
pub mod price_calcs;
pub mod segmentation;
