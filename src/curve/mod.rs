pub mod tick_curve;
pub mod tick_spacing;

#[cfg(test)]
mod round_trip;
