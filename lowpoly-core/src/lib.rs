//! Core data structures for the lowpoly mesh pipeline
//!
//! This crate provides the flat-array mesh buffer representation shared by
//! the merge, decimation, and normalization stages, along with the bounding
//! extent measurement type and the pipeline error taxonomy.

pub mod buffer;
pub mod error;
pub mod extent;
pub mod point;

pub use buffer::*;
pub use error::*;
pub use extent::*;
pub use point::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, UnitQuaternion, Vector2, Vector3};

/// Common result type for lowpoly operations
pub type Result<T> = std::result::Result<T, Error>;
