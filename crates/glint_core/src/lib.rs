//! Glint Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Materials**: `Material` with its `Pattern`, resolved per hit into a
//!   flat `MaterialParams`
//! - **Lights**: point, directional, spot and rectangular area lights
//! - **Meshes**: shared vertex/normal arrays referenced by mesh triangles
//!
//! The ray tracing core lives in `glint_renderer`; nothing in here knows
//! about rays or intersections.

pub mod color;
pub mod light;
pub mod material;
pub mod mesh;
pub mod pattern;

// Re-export commonly used types
pub use color::{gray, rgb, Color, BLACK, WHITE};
pub use light::{Light, RectLight};
pub use material::{Material, MaterialParams};
pub use mesh::Mesh;
pub use pattern::{Pattern, PatternKind};
