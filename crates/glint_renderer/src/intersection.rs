//! Reusable intersection buffer.
//!
//! Every ray query appends into an `IntersectionList` owned by the caller.
//! Per-hit auxiliary data (barycentric coordinates, CSG side) lives in a
//! side array that is cleared but never freed between rays.

use crate::NodeId;

/// A single ray parameter and the primitive that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub t: f64,
    pub node: NodeId,
    /// Index into the list's auxiliary data, if this hit has any
    pub data: Option<usize>,
}

/// Auxiliary per-hit data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntersectionData {
    /// Set by CSG: true if the hit came from the left operand
    pub left_hit: bool,
    /// Barycentric coordinates for triangles
    pub u: f64,
    pub v: f64,
}

/// An unordered list of intersections plus the nearest non-negative one.
#[derive(Debug, Default)]
pub struct IntersectionList {
    items: Vec<Intersection>,
    data: Vec<IntersectionData>,
    hit: Option<Intersection>,
    /// When set, only shapes that cast shadows report intersections.
    pub shadows: bool,
}

impl IntersectionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all entries, keeping the allocations.
    pub fn reset(&mut self) {
        self.items.clear();
        self.data.clear();
        self.hit = None;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, i: usize) -> Intersection {
        self.items[i]
    }

    pub fn as_slice(&self) -> &[Intersection] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intersection> {
        self.items.iter()
    }

    /// The nearest intersection with `t >= 0`, if any.
    pub fn hit(&self) -> Option<Intersection> {
        self.hit
    }

    fn push(&mut self, i: Intersection) {
        if i.t >= 0.0 && self.hit.map_or(true, |h| h.t > i.t) {
            self.hit = Some(i);
        }
        self.items.push(i);
    }

    pub fn add(&mut self, t: f64, node: NodeId) {
        self.push(Intersection { t, node, data: None });
    }

    /// Add an intersection with a fresh auxiliary record and return it for
    /// filling in.
    pub fn add_with_data(&mut self, t: f64, node: NodeId) -> &mut IntersectionData {
        let index = self.data.len();
        self.data.push(IntersectionData::default());
        self.push(Intersection {
            t,
            node,
            data: Some(index),
        });
        &mut self.data[index]
    }

    /// Auxiliary data of entry `i`, allocated on first access.
    pub fn data_at(&mut self, i: usize) -> &mut IntersectionData {
        let index = match self.items[i].data {
            Some(index) => index,
            None => {
                let index = self.data.len();
                self.data.push(IntersectionData::default());
                self.items[i].data = Some(index);
                index
            }
        };
        &mut self.data[index]
    }

    /// Auxiliary data of an intersection taken from this list.
    pub fn data_of(&self, i: &Intersection) -> Option<&IntersectionData> {
        i.data.map(|index| &self.data[index])
    }

    /// Remove entry `i`. The tracked hit is left untouched; call
    /// [`update_hit`](Self::update_hit) once all removals are done.
    pub fn remove(&mut self, i: usize) {
        self.items.remove(i);
    }

    /// Keep only the entries from `start` on for which `keep` returns true,
    /// visiting them in order and compacting in a single pass. Entries before
    /// `start` are untouched. Like [`remove`](Self::remove), this leaves the
    /// tracked hit stale.
    pub fn retain_from(
        &mut self,
        start: usize,
        mut keep: impl FnMut(&Intersection, Option<&IntersectionData>) -> bool,
    ) {
        let data = &self.data;
        let mut write = start;

        for read in start..self.items.len() {
            let item = self.items[read];
            if keep(&item, item.data.map(|d| &data[d])) {
                self.items[write] = item;
                write += 1;
            }
        }

        self.items.truncate(write);
    }

    /// Recompute the tracked hit from the current entries.
    pub fn update_hit(&mut self) {
        self.hit = None;
        for &i in &self.items {
            if i.t >= 0.0 && self.hit.map_or(true, |h| h.t > i.t) {
                self.hit = Some(i);
            }
        }
    }

    pub fn sort(&mut self) {
        self.sort_from(0);
    }

    /// Sort the entries from `start` to the end by `t`.
    pub fn sort_from(&mut self, start: usize) {
        self.items[start..].sort_by(|a, b| a.t.total_cmp(&b.t));
    }
}
