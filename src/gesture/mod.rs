pub mod classifier;
pub mod landmarks;

pub use classifier::classify_frame;
pub use landmarks::Landmark;
