//! Detection: per-guard sensing feeding one shared suspicion meter

pub mod meter;
pub mod sensor;

pub use meter::{DetectionAccumulator, FullDetection};
pub use sensor::{angle_between, RangeBand, SensorModel, SightBlock, Sighting};
