pub mod detector;
pub mod registry;
pub mod regions;

pub use detector::{Detector, DetectorHandle};
pub use registry::{RegionRegistry, RegistryError, WatchRegion};
pub use regions::{RegionEvent, RegionWatcher};

#[cfg(test)]
mod tests;
