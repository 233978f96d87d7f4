//! Infrastructure layer - account decoding and snapshot files

pub mod blockchain;
pub mod snapshot;
