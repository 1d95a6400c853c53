//! Glint Renderer - CPU Whitted-style ray tracing.
//!
//! The pieces, leaf first:
//!
//! - Primitive intersection (`sphere`, `plane`, `cube`, `cylinder`, `cone`,
//!   `triangle`), all in object space
//! - `IntersectionList`, the reusable hit buffer every query writes into
//! - CSG and BVH-accelerated groups, both owned by the `World` arena
//! - `Raytracer`, recursive shading with shadows, reflection and refraction
//! - `render`, which spreads pixels over a worker pool and fills a `Canvas`

mod bucket;
mod bvh;
mod camera;
mod canvas;
mod cone;
mod csg;
mod cube;
mod cylinder;
mod error;
mod hit;
mod intersection;
mod lighting;
mod plane;
mod raytracer;
mod renderer;
mod sampler;
mod shape;
mod sphere;
mod triangle;
mod world;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{Bvh, BvhNode};
pub use camera::{view_transform, Camera};
pub use canvas::Canvas;
pub use cone::Cone;
pub use csg::{Csg, CsgOp};
pub use cylinder::Cylinder;
pub use error::{RenderError, Result};
pub use hit::HitInfo;
pub use intersection::{Intersection, IntersectionData, IntersectionList};
pub use lighting::{blinn_phong, oren_nayar, spot_factor, Illuminate};
pub use raytracer::{schlick, Raytracer, TraceStats};
pub use renderer::{render, render_pixel, RenderOptions, Scheduler};
pub use sampler::{concentric_sample_disk, StratifiedSampler};
pub use shape::{Group, MeshId, Node, NodeId, ShapeKind};
pub use triangle::{MeshTriangle, Triangle, TriangleHit};
pub use world::World;

/// Re-export the math and scene types most callers need alongside the renderer
pub use glint_core::{Color, Light, Material, Mesh, Pattern};
pub use glint_math::{Aabb, DMat4, DVec3, Ray, Transform, EPSILON};
