//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Built once per group with a binned surface area heuristic, then
//! flattened depth-first into an array: an interior node's first child is
//! the next slot and it stores the index of its second child, so traversal
//! walks plain indices with a small fixed stack.

use glint_math::{Aabb, DVec3, Ray};

/// Number of SAH buckets along the split axis.
const BUCKET_COUNT: usize = 12;

/// Ranges larger than this are always split when a split exists.
const MAX_OBJECTS_PER_LEAF: usize = 16;

/// Cost of a box test relative to one object intersection.
const TRAVERSAL_COST: f64 = 0.125;

/// Traversal stack capacity; construction never goes deeper than this.
const STACK_SIZE: usize = 64;

/// A flattened BVH node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    pub bounds: Aabb,
    /// First object if `count > 0`, otherwise the index of the second child
    pub offset: usize,
    /// Number of objects in a leaf, 0 for interior nodes
    pub count: usize,
    /// Split axis of an interior node
    pub axis: usize,
}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        self.count > 0
    }
}

/// Per-object build input.
#[derive(Debug, Clone, Copy)]
struct ObjectInfo {
    index: usize,
    bounds: Aabb,
    centroid: DVec3,
}

/// Tree produced by the recursive build, before flattening.
enum BuildNode {
    Leaf {
        bounds: Aabb,
        first: usize,
        count: usize,
    },
    Interior {
        bounds: Aabb,
        axis: usize,
        children: Box<[BuildNode; 2]>,
    },
}

impl BuildNode {
    fn bounds(&self) -> Aabb {
        match self {
            BuildNode::Leaf { bounds, .. } | BuildNode::Interior { bounds, .. } => *bounds,
        }
    }
}

#[derive(Clone, Copy)]
struct Bucket {
    count: usize,
    bounds: Aabb,
}

/// Flattened BVH over a group's children.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
}

impl Bvh {
    /// Build a BVH over objects with the given bounds.
    ///
    /// Returns the hierarchy and the order objects must be stored in: leaf
    /// ranges index into that reordered sequence, `order[i]` being the
    /// original index of the object at position `i`.
    pub fn build(bounds: &[Aabb]) -> (Bvh, Vec<usize>) {
        if bounds.is_empty() {
            return (Bvh::default(), Vec::new());
        }

        let mut info: Vec<ObjectInfo> = bounds
            .iter()
            .enumerate()
            .map(|(index, b)| ObjectInfo {
                index,
                bounds: *b,
                centroid: b.centroid(),
            })
            .collect();

        let mut order = Vec::with_capacity(bounds.len());
        let mut total_nodes = 0;
        let root = build_recursive(&mut info, 0, &mut order, &mut total_nodes);

        let mut nodes = Vec::with_capacity(total_nodes);
        flatten(&root, &mut nodes);

        (Bvh { nodes }, order)
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn bounds(&self) -> Aabb {
        self.nodes.first().map_or(Aabb::EMPTY, |n| n.bounds)
    }

    /// Call `visit` with the index of every object in a leaf whose box the
    /// ray hits. The ray must be in the same space as the object bounds.
    pub fn traverse(&self, ray: &Ray, mut visit: impl FnMut(usize)) {
        if self.nodes.is_empty() {
            return;
        }

        let inv_dir = ray.inv_direction();
        let mut stack = [0usize; STACK_SIZE];
        let mut sp = 0;
        let mut current = 0;

        loop {
            let node = &self.nodes[current];

            if node.bounds.hit_inv(ray.origin, inv_dir) {
                if node.is_leaf() {
                    for i in node.offset..node.offset + node.count {
                        visit(i);
                    }
                } else {
                    // Descend into the near child first, keep the other
                    let (near, far) = if inv_dir[node.axis] < 0.0 {
                        (node.offset, current + 1)
                    } else {
                        (current + 1, node.offset)
                    };
                    stack[sp] = far;
                    sp += 1;
                    current = near;
                    continue;
                }
            }

            if sp == 0 {
                break;
            }
            sp -= 1;
            current = stack[sp];
        }
    }
}

/// Bucket of `centroid` along `axis` within `centroid_bounds`.
fn bucket_index(centroid_bounds: &Aabb, centroid: DVec3, axis: usize) -> usize {
    let offset = centroid_bounds.offset(centroid)[axis];
    let b = (BUCKET_COUNT as f64 * offset) as usize;
    b.min(BUCKET_COUNT - 1)
}

/// Two-pointer in-place partition. Returns the number of leading entries
/// for which `below` holds.
fn partition(info: &mut [ObjectInfo], below: impl Fn(&ObjectInfo) -> bool) -> usize {
    let mut lo = 0;
    let mut hi = info.len();

    while lo < hi {
        if below(&info[lo]) {
            lo += 1;
        } else {
            hi -= 1;
            info.swap(lo, hi);
        }
    }

    lo
}

fn make_leaf(info: &[ObjectInfo], bounds: Aabb, order: &mut Vec<usize>) -> BuildNode {
    let first = order.len();
    order.extend(info.iter().map(|o| o.index));
    BuildNode::Leaf {
        bounds,
        first,
        count: info.len(),
    }
}

fn build_recursive(
    info: &mut [ObjectInfo],
    depth: usize,
    order: &mut Vec<usize>,
    total_nodes: &mut usize,
) -> BuildNode {
    *total_nodes += 1;

    let bounds = info
        .iter()
        .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounds));
    let count = info.len();

    if count == 1 || depth + 1 >= STACK_SIZE {
        return make_leaf(info, bounds, order);
    }

    let centroid_bounds = info.iter().fold(Aabb::EMPTY, |acc, o| acc.include_point(o.centroid));
    let axis = centroid_bounds.longest_axis();
    let extent = centroid_bounds.axis_interval(axis);

    // All centroids coincide, nothing to split on
    if extent.size() <= 0.0 {
        return make_leaf(info, bounds, order);
    }

    let mid = if count == 2 {
        1
    } else {
        let mut buckets = [Bucket {
            count: 0,
            bounds: Aabb::EMPTY,
        }; BUCKET_COUNT];

        for o in info.iter() {
            let b = &mut buckets[bucket_index(&centroid_bounds, o.centroid, axis)];
            b.count += 1;
            b.bounds = Aabb::surrounding(&b.bounds, &o.bounds);
        }

        // Cost of splitting after bucket i
        let total_area = bounds.surface_area();
        let mut min_cost = f64::INFINITY;
        let mut min_bucket = 0;

        for i in 0..BUCKET_COUNT - 1 {
            let (left, right) = buckets.split_at(i + 1);
            let sum = |side: &[Bucket]| {
                side.iter().fold((0usize, Aabb::EMPTY), |(n, b), bucket| {
                    (n + bucket.count, Aabb::surrounding(&b, &bucket.bounds))
                })
            };
            let (n0, b0) = sum(left);
            let (n1, b1) = sum(right);

            let cost = TRAVERSAL_COST
                + (n0 as f64 * b0.surface_area() + n1 as f64 * b1.surface_area()) / total_area;

            // NaN costs (unbounded shapes) never win
            if cost < min_cost {
                min_cost = cost;
                min_bucket = i;
            }
        }

        let leaf_cost = count as f64;
        if count > MAX_OBJECTS_PER_LEAF || min_cost < leaf_cost {
            partition(info, |o| bucket_index(&centroid_bounds, o.centroid, axis) <= min_bucket)
        } else {
            return make_leaf(info, bounds, order);
        }
    };

    if mid == 0 || mid == count {
        return make_leaf(info, bounds, order);
    }

    let (left, right) = info.split_at_mut(mid);
    let left = build_recursive(left, depth + 1, order, total_nodes);
    let right = build_recursive(right, depth + 1, order, total_nodes);

    BuildNode::Interior {
        bounds: Aabb::surrounding(&left.bounds(), &right.bounds()),
        axis,
        children: Box::new([left, right]),
    }
}

/// Depth-first flatten; returns the slot of `node`.
fn flatten(node: &BuildNode, nodes: &mut Vec<BvhNode>) -> usize {
    let slot = nodes.len();

    match node {
        BuildNode::Leaf {
            bounds,
            first,
            count,
        } => {
            nodes.push(BvhNode {
                bounds: *bounds,
                offset: *first,
                count: *count,
                axis: 0,
            });
        }
        BuildNode::Interior {
            bounds,
            axis,
            children,
        } => {
            nodes.push(BvhNode {
                bounds: *bounds,
                offset: 0,
                count: 0,
                axis: *axis,
            });
            flatten(&children[0], nodes);
            let second = flatten(&children[1], nodes);
            nodes[slot].offset = second;
        }
    }

    slot
}
