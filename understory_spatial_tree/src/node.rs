// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes, the arena that owns them, and the subdivision algorithm.

use alloc::vec::Vec;

use crate::bounds::BoundingBox;
use crate::datum::{DatumId, Extent};

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle consisting of a slot index and a generation counter.
/// Nodes are never freed individually; every handle becomes stale when the tree is
/// [cleared](crate::Tree::clear), and a slot reused afterwards carries a higher generation, so
/// stale handles never alias a live node.
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A leaf (no children, holds data) or an interior node (exactly `2^D` children, no data).
#[derive(Clone, Debug)]
pub(crate) struct Node<const D: usize> {
    generation: u32,
    pub(crate) bounds: BoundingBox<D>,
    pub(crate) depth: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) data: Vec<DatumId>,
    pub(crate) children: Vec<NodeId>,
}

impl<const D: usize> Node<D> {
    fn new(generation: u32, bounds: BoundingBox<D>, depth: u32, parent: Option<NodeId>) -> Self {
        Self {
            generation,
            bounds,
            depth,
            parent,
            data: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Record `id` here if its extent overlaps this node. Only meaningful at a leaf.
    pub(crate) fn insert(&mut self, id: DatumId, extent: &Extent<D>) -> bool {
        if !extent.is_partially_contained_in(&self.bounds) {
            return false;
        }
        self.data.push(id);
        true
    }

    /// Remove the first occurrence of `id`.
    pub(crate) fn remove(&mut self, id: DatumId) -> bool {
        match self.data.iter().position(|d| *d == id) {
            Some(i) => {
                let _ = self.data.remove(i);
                true
            }
            None => false,
        }
    }

    /// Child slot for `point`: bit `k` is set when the point lies above the centroid on axis `k`.
    ///
    /// Points exactly on a split plane resolve to the lower child.
    pub(crate) fn child_slot(&self, point: &[f64; D]) -> Option<usize> {
        if !self.bounds.contains_point(point) {
            return None;
        }
        let centroid = self.bounds.centroid();
        Some(
            (0..D)
                .filter(|&axis| point[axis] > centroid[axis])
                .fold(0, |slot, axis| slot | (1 << axis)),
        )
    }
}

/// Arena owning every node of one tree.
#[derive(Clone, Debug, Default)]
pub(crate) struct NodeArena<const D: usize> {
    nodes: Vec<Node<D>>,
    generations: Vec<u32>, // last generation per slot (persists across clears)
}

impl<const D: usize> NodeArena<D> {
    pub(crate) fn alloc(
        &mut self,
        bounds: BoundingBox<D>,
        depth: u32,
        parent: Option<NodeId>,
    ) -> NodeId {
        let idx = self.nodes.len();
        let generation = match self.generations.get_mut(idx) {
            Some(g) => {
                *g = g.saturating_add(1);
                *g
            }
            None => {
                self.generations.push(1);
                1
            }
        };
        self.nodes.push(Node::new(generation, bounds, depth, parent));
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        NodeId::new(idx as u32, generation)
    }

    /// Drop every node. Generations survive so that old handles stay stale.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<D>> {
        self.nodes
            .get(id.idx())
            .filter(|n| n.generation == id.1)
    }

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node<D> {
        self.get(id).expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<D> {
        self.nodes
            .get_mut(id.idx())
            .filter(|n| n.generation == id.1)
            .expect("dangling NodeId")
    }

    /// Child of an interior node covering `point`; `None` for leaves or points outside.
    pub(crate) fn find_child(&self, id: NodeId, point: &[f64; D]) -> Option<NodeId> {
        let node = self.get(id)?;
        if node.is_leaf() {
            return None;
        }
        node.child_slot(point).map(|slot| node.children[slot])
    }

    /// Deepest node on the path from the root to `id` that a fresh descent for `point` passes
    /// through.
    ///
    /// Descent follows [`Node::child_slot`], so this is where the route to `point` leaves the
    /// path to `id`; it is `id` itself when `id` is exactly the leaf `point` routes to. Returns
    /// `None` if `id` is stale or the root does not contain `point`.
    pub(crate) fn branch_point(&self, id: NodeId, point: &[f64; D]) -> Option<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            path.push(node);
            current = self.get(node)?.parent;
        }
        let mut branch = path.pop()?;
        if !self.node(branch).bounds.contains_point(point) {
            return None;
        }
        while let Some(next) = path.pop() {
            if self.find_child(branch, point) != Some(next) {
                break;
            }
            branch = next;
        }
        Some(branch)
    }

    /// Turn leaf `id` into an interior node with `2^D` children, re-homing its data.
    ///
    /// Cells are split one axis at a time. After the pass over axis `k` the upper halves are
    /// appended behind the existing cells, so bit `k` of a child's slot means "upper half on
    /// axis `k`", matching [`Node::child_slot`]. Points move up only when strictly above the
    /// split plane. Areas are copied into every half their shape overlaps.
    ///
    /// `extent_of` resolves a resident id to its extent; ids it cannot resolve are dropped.
    /// Returns `false` if the node was already interior.
    pub(crate) fn subdivide<F>(&mut self, id: NodeId, extent_of: F) -> bool
    where
        F: Fn(DatumId) -> Option<Extent<D>>,
    {
        let (bounds, depth, data) = {
            let node = self.node_mut(id);
            if !node.is_leaf() {
                return false;
            }
            (node.bounds, node.depth, core::mem::take(&mut node.data))
        };
        let split = *bounds.centroid();

        let mut cells: Vec<(BoundingBox<D>, Vec<DatumId>)> = Vec::with_capacity(1 << D);
        cells.push((bounds, data));
        for axis in 0..D {
            let produced = cells.len();
            for slot in 0..produced {
                let (lower, upper) = cells[slot].0.subdivide_along_axis(axis);
                let resident = core::mem::take(&mut cells[slot].1);
                let mut kept = Vec::with_capacity(resident.len());
                let mut moved = Vec::new();
                for datum in resident {
                    match extent_of(datum) {
                        Some(Extent::Point(p)) => {
                            if p[axis] > split[axis] {
                                moved.push(datum);
                            } else {
                                kept.push(datum);
                            }
                        }
                        Some(Extent::Area(shape)) => {
                            if shape.intersects(&upper) {
                                moved.push(datum);
                            }
                            if shape.intersects(&lower) {
                                kept.push(datum);
                            }
                        }
                        None => {}
                    }
                }
                cells[slot] = (lower, kept);
                cells.push((upper, moved));
            }
        }

        let mut children = Vec::with_capacity(cells.len());
        for (cell, data) in cells {
            let child = self.alloc(cell, depth + 1, Some(id));
            self.node_mut(child).data = data;
            children.push(child);
        }
        self.node_mut(id).children = children;
        true
    }

    /// Append every datum held by leaves under `id` (area data may repeat).
    pub(crate) fn children_data(&self, id: NodeId, out: &mut Vec<DatumId>) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.is_leaf() {
            out.extend_from_slice(&node.data);
        } else {
            for child in &node.children {
                self.children_data(*child, out);
            }
        }
    }
}
