//! Constructive solid geometry.
//!
//! Both operands are intersected into the shared list, tagged with their
//! side, sorted, and then filtered by walking the entries in `t` order
//! while tracking whether the ray is inside each operand.

use glint_math::Ray;

use crate::{IntersectionList, NodeId, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsgOp {
    Union,
    Difference,
    Intersection,
}

impl CsgOp {
    /// Whether an intersection survives, given which operand produced it
    /// and whether the ray was inside each operand just before it.
    pub fn keeps(self, left_hit: bool, in_left: bool, in_right: bool) -> bool {
        match self {
            CsgOp::Union => (left_hit && !in_right) || (!left_hit && !in_left),
            CsgOp::Difference => (left_hit && !in_right) || (!left_hit && in_left),
            CsgOp::Intersection => (left_hit && in_right) || (!left_hit && in_left),
        }
    }
}

/// A boolean combination of two subtrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Csg {
    pub op: CsgOp,
    pub left: NodeId,
    pub right: NodeId,
}

impl World {
    /// Intersect `ray`, already in the CSG node's space, against both
    /// operands and drop the entries that are not on the combined surface.
    pub(crate) fn intersect_csg(&self, csg: &Csg, ray: &Ray, xs: &mut IntersectionList) {
        let start = xs.len();

        self.intersect_node(csg.left, ray, xs);
        for i in start..xs.len() {
            xs.data_at(i).left_hit = true;
        }

        let right_start = xs.len();
        self.intersect_node(csg.right, ray, xs);
        for i in right_start..xs.len() {
            xs.data_at(i).left_hit = false;
        }

        xs.sort_from(start);

        let mut in_left = false;
        let mut in_right = false;

        xs.retain_from(start, |_, data| {
            let left_hit = data.is_some_and(|d| d.left_hit);
            let keep = csg.op.keeps(left_hit, in_left, in_right);

            if left_hit {
                in_left = !in_left;
            } else {
                in_right = !in_right;
            }
            keep
        });

        // Removals may have taken out the tracked hit
        xs.update_hit();
    }
}
