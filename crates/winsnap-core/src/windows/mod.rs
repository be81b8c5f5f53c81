pub mod fingerprint;
pub mod registry;

pub use fingerprint::{Fingerprint, MatchKey};
pub use registry::{TrackedWindow, WindowRegistry};
