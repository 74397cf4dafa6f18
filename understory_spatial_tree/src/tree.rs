// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: insertion, relocation, removal, and queries.

use alloc::collections::{BTreeMap, BTreeSet, BinaryHeap};
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::{Ordering, Reverse};

use crate::bounds::BoundingBox;
use crate::config::TreeConfig;
use crate::datum::{Datum, DatumId, Extent, IdGenerator};
use crate::error::TreeError;
use crate::node::{NodeArena, NodeId};
use crate::shape::Shape;

/// Index record for a stored datum.
///
/// `node` is the leaf holding a point datum. Area data may live in many leaves and record `None`.
#[derive(Clone, Debug)]
struct Entry<const D: usize, P> {
    datum: Datum<D, P>,
    node: Option<NodeId>,
}

/// Spatial partitioning tree over `D`-dimensional axis-aligned boxes.
///
/// Every interior node has exactly `2^D` children: a quadtree for `D = 2`, an octree for
/// `D = 3`. All data live at leaves. The tree owns every [`Datum`] handed to it and drops it
/// exactly once, on removal or [`clear`](Self::clear).
///
/// Query results are [`NodeId`] and [`DatumId`] handles rather than borrows, so they can be
/// held across mutation; node handles go stale on [`clear`](Self::clear).
pub struct Tree<const D: usize, P = ()> {
    config: TreeConfig,
    root_bounds: BoundingBox<D>,
    root: NodeId,
    nodes: NodeArena<D>,
    index: BTreeMap<DatumId, Entry<D, P>>,
    ids: IdGenerator,
}

/// A tree over the plane.
pub type QuadTree<P = ()> = Tree<2, P>;

/// A tree over space.
pub type OctTree<P = ()> = Tree<3, P>;

impl<const D: usize, P> core::fmt::Debug for Tree<D, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("config", &self.config)
            .field("root_bounds", &self.root_bounds)
            .field("nodes", &self.nodes.len())
            .field("data", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl<const D: usize, P> Tree<D, P> {
    /// Create an empty tree over `bounds` with the given depth limit and the default capacity.
    ///
    /// # Errors
    ///
    /// See [`TreeConfig::validate`].
    pub fn new(bounds: BoundingBox<D>, max_depth: u32) -> Result<Self, TreeError> {
        Self::with_config(bounds, TreeConfig::new(max_depth))
    }

    /// Create an empty tree over `bounds`.
    ///
    /// # Errors
    ///
    /// See [`TreeConfig::validate`].
    pub fn with_config(bounds: BoundingBox<D>, config: TreeConfig) -> Result<Self, TreeError> {
        config.validate::<D>()?;
        let mut nodes = NodeArena::default();
        let root = nodes.alloc(bounds, 0, None);
        Ok(Self {
            config,
            root_bounds: bounds,
            root,
            nodes,
            index: BTreeMap::new(),
            ids: IdGenerator::new(),
        })
    }

    /// Mint an id unique within this tree's generator.
    pub fn mint_id(&mut self) -> DatumId {
        self.ids.mint()
    }

    /// Insert or relocate a point datum. Returns the leaf now holding it.
    ///
    /// If the id is already stored, the stored datum is replaced by `datum` and moved to its new
    /// location. The walk climbs only as far as the deepest ancestor the new location routes
    /// through and descends from there, so short moves stay cheap. The point ends up in the same
    /// leaf a fresh insert would pick, even when it lands on a split plane.
    ///
    /// # Errors
    ///
    /// - [`TreeError::ExpectedPoint`] if `datum` is area data.
    /// - [`TreeError::OutsideRoot`] if the location is outside the root box. The tree is left
    ///   unchanged, including any previously stored datum with the same id.
    /// - [`TreeError::NotRelocatable`] if the id is stored as area data.
    pub fn insert(&mut self, datum: Datum<D, P>) -> Result<NodeId, TreeError> {
        let id = datum.id();
        let Extent::Point(location) = *datum.extent() else {
            return Err(TreeError::ExpectedPoint(id));
        };
        if !self.root_bounds.contains_point(&location) {
            return Err(TreeError::OutsideRoot);
        }

        let start = match self.index.get(&id).map(|e| (e.datum.is_point(), e.node)) {
            None => self.root,
            Some((false, _)) => return Err(TreeError::NotRelocatable(id)),
            Some((true, None)) => self.root,
            Some((true, Some(current))) => {
                let branch = self
                    .nodes
                    .branch_point(current, &location)
                    .unwrap_or(self.root);
                if branch == current {
                    tracing::trace!(%id, node = ?current, "relocated within leaf");
                    if let Some(entry) = self.index.get_mut(&id) {
                        entry.datum = datum;
                    }
                    return Ok(current);
                }
                let _ = self.nodes.node_mut(current).remove(id);
                tracing::trace!(%id, from = ?current, via = ?branch, "relocating");
                branch
            }
        };

        let leaf = self
            .descend_point(start, &location)
            .ok_or(TreeError::OutsideRoot)?;
        let inserted = self.nodes.node_mut(leaf).insert(id, datum.extent());
        debug_assert!(inserted, "descent must end at a leaf containing the point");
        let _ = self.index.insert(
            id,
            Entry {
                datum,
                node: Some(leaf),
            },
        );
        tracing::trace!(%id, node = ?leaf, "inserted point");
        Ok(leaf)
    }

    /// Insert an area datum into every leaf its shape overlaps.
    ///
    /// Returns `Ok(false)` and drops `datum` if its id is already stored; the first datum wins.
    ///
    /// # Errors
    ///
    /// - [`TreeError::ExpectedArea`] if `datum` is a point.
    /// - [`TreeError::OutsideRoot`] if the shape does not overlap the root box.
    pub fn insert_area(&mut self, datum: Datum<D, P>) -> Result<bool, TreeError> {
        let id = datum.id();
        let Extent::Area(shape) = *datum.extent() else {
            return Err(TreeError::ExpectedArea(id));
        };
        if !shape.intersects(&self.root_bounds) {
            return Err(TreeError::OutsideRoot);
        }
        if self.index.contains_key(&id) {
            tracing::warn!(%id, "duplicate id for area data; keeping the stored datum");
            return Ok(false);
        }
        let placed = self.insert_area_at(self.root, id, &shape);
        if placed {
            let _ = self.index.insert(id, Entry { datum, node: None });
            tracing::trace!(%id, "inserted area");
        }
        Ok(placed)
    }

    /// Remove a point datum, returning it.
    ///
    /// Returns `None` for unknown ids and for area data, whose residency is not tracked per leaf;
    /// use [`remove_area`](Self::remove_area) for those.
    pub fn remove(&mut self, id: DatumId) -> Option<Datum<D, P>> {
        let node = self.index.get(&id)?.node?;
        if !self.nodes.node_mut(node).remove(id) {
            return None;
        }
        tracing::trace!(%id, ?node, "removed point");
        self.index.remove(&id).map(|e| e.datum)
    }

    /// Remove an area datum from every leaf it occupies, returning it.
    ///
    /// Returns `None` for unknown ids and for point data.
    pub fn remove_area(&mut self, id: DatumId) -> Option<Datum<D, P>> {
        let shape = *self.index.get(&id)?.datum.shape()?;
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            let node = self.nodes.node_mut(current);
            if !shape.intersects(&node.bounds) {
                continue;
            }
            if node.is_leaf() {
                let _ = node.remove(id);
            } else {
                stack.extend(node.children.iter().copied());
            }
        }
        tracing::trace!(%id, "removed area");
        self.index.remove(&id).map(|e| e.datum)
    }

    /// Leaves with data whose boxes intersect `query`.
    pub fn search(&self, query: &BoundingBox<D>) -> Vec<NodeId> {
        self.collect_leaves(|bounds| bounds.intersects(query))
    }

    /// Leaves with data whose boxes are touched by the segment `p0 → p1`.
    pub fn search_segment(&self, p0: &[f64; D], p1: &[f64; D]) -> Vec<NodeId> {
        self.collect_leaves(|bounds| bounds.intersects_segment(p0, p1))
    }

    /// Ids of data whose extent overlaps `query`, each reported once, in id order.
    pub fn data_in(&self, query: &BoundingBox<D>) -> Vec<DatumId> {
        let mut found = BTreeSet::new();
        for leaf in self.search(query) {
            for id in &self.nodes.node(leaf).data {
                if let Some(entry) = self.index.get(id)
                    && entry.datum.is_partially_contained_in(query)
                {
                    let _ = found.insert(*id);
                }
            }
        }
        found.into_iter().collect()
    }

    /// Ids of data within `range` of `point`, each reported once, in id order.
    ///
    /// Distances are measured to the point itself or to the closest point of an area shape.
    /// Returns nothing if `range` is negative or not finite.
    pub fn within_distance(&self, point: &[f64; D], range: f64) -> Vec<DatumId> {
        let mut least = *point;
        let mut greatest = *point;
        for axis in 0..D {
            least[axis] -= range;
            greatest[axis] += range;
        }
        let Ok(query) = BoundingBox::new(least, greatest) else {
            return Vec::new();
        };
        let range_squared = range * range;
        self.data_in(&query)
            .into_iter()
            .filter(|id| {
                self.index
                    .get(id)
                    .is_some_and(|e| e.datum.extent().distance_squared_from(point) <= range_squared)
            })
            .collect()
    }

    /// Closest datum to `point` and its squared distance.
    ///
    /// Nodes are visited best-first by the distance of their boxes; the search stops once the
    /// nearest unvisited box is farther than the best datum found.
    pub fn nearest(&self, point: &[f64; D]) -> Option<(DatumId, f64)> {
        let mut best: Option<(DatumId, f64)> = None;
        let mut queue = BinaryHeap::new();
        queue.push(Reverse(Candidate {
            distance_squared: self.root_bounds.distance_squared_from(point),
            node: self.root,
        }));
        while let Some(Reverse(candidate)) = queue.pop() {
            if let Some((_, d)) = best
                && d < candidate.distance_squared
            {
                break;
            }
            let node = self.nodes.node(candidate.node);
            if node.is_leaf() {
                for id in &node.data {
                    let Some(entry) = self.index.get(id) else {
                        continue;
                    };
                    let d = entry.datum.extent().distance_squared_from(point);
                    if best.is_none_or(|(_, b)| d < b) {
                        best = Some((*id, d));
                    }
                }
            } else {
                for child in &node.children {
                    let d = self.nodes.node(*child).bounds.distance_squared_from(point);
                    if best.is_none_or(|(_, b)| d <= b) {
                        queue.push(Reverse(Candidate {
                            distance_squared: d,
                            node: *child,
                        }));
                    }
                }
            }
        }
        best
    }

    /// Subdivide every leaf `levels` more times, regardless of occupancy.
    ///
    /// Leaves already at `max_depth` are left alone.
    pub fn subdivide(&mut self, levels: u32) {
        for _ in 0..levels {
            let leaves: Vec<NodeId> = self
                .leaves()
                .into_iter()
                .filter(|leaf| self.nodes.node(*leaf).depth < self.config.max_depth)
                .collect();
            if leaves.is_empty() {
                break;
            }
            for leaf in leaves {
                self.split(leaf);
            }
        }
    }

    /// Drop every node and datum, leaving a single empty root over the original bounds.
    ///
    /// Node handles obtained before the call become stale. The id generator keeps counting.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.root = self.nodes.alloc(self.root_bounds, 0, None);
    }

    /// Number of live nodes, leaves and interior.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored data.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when no data are stored.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Bounds of the root node.
    pub fn root_bounds(&self) -> &BoundingBox<D> {
        &self.root_bounds
    }

    /// Limits this tree was built with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Whether `id` is stored.
    pub fn contains(&self, id: DatumId) -> bool {
        self.index.contains_key(&id)
    }

    /// Stored datum for `id`.
    pub fn get(&self, id: DatumId) -> Option<&Datum<D, P>> {
        self.index.get(&id).map(|e| &e.datum)
    }

    /// Payload of the stored datum for `id`, mutably.
    pub fn payload_mut(&mut self, id: DatumId) -> Option<&mut P> {
        self.index.get_mut(&id).map(|e| e.datum.payload_mut())
    }

    /// Leaf holding a point datum; `None` for unknown ids and area data.
    pub fn node_of(&self, id: DatumId) -> Option<NodeId> {
        self.index.get(&id)?.node
    }

    /// Iterate stored data in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Datum<D, P>> + '_ {
        self.index.values().map(|e| &e.datum)
    }

    /// Returns true if `node` refers to a live node of this tree.
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some()
    }

    /// Bounds of a live node.
    pub fn bounds(&self, node: NodeId) -> Option<&BoundingBox<D>> {
        self.nodes.get(node).map(|n| &n.bounds)
    }

    /// Depth of a live node; the root is at depth 0.
    pub fn depth(&self, node: NodeId) -> Option<u32> {
        self.nodes.get(node).map(|n| n.depth)
    }

    /// Parent of a live node.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }

    /// Children of a live interior node; empty for leaves and stale handles.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    /// Whether `node` is a live leaf.
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.is_leaf())
    }

    /// Ids held directly by a live node; empty for interior nodes and stale handles.
    pub fn data(&self, node: NodeId) -> &[DatumId] {
        self.nodes.get(node).map(|n| n.data.as_slice()).unwrap_or_default()
    }

    /// Child of an interior node covering `point`; `None` for leaves or points outside it.
    pub fn find_child(&self, node: NodeId, point: &[f64; D]) -> Option<NodeId> {
        self.nodes.find_child(node, point)
    }

    /// All ids held by leaves under `node`. Area data appear once per leaf they occupy.
    pub fn children_data(&self, node: NodeId) -> Vec<DatumId> {
        let mut out = Vec::new();
        self.nodes.children_data(node, &mut out);
        out
    }

    /// Every leaf of the tree, in child order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.collect_nodes(|_| true, false)
    }

    // --- internals ---

    fn should_split(&self, node: NodeId) -> bool {
        let n = self.nodes.node(node);
        n.is_leaf()
            && n.data.len() >= self.config.max_data_per_leaf
            && n.depth < self.config.max_depth
    }

    /// Subdivide a leaf and re-point the index at the children now holding its point data.
    fn split(&mut self, node: NodeId) {
        let index = &self.index;
        if !self
            .nodes
            .subdivide(node, |id| index.get(&id).map(|e| *e.datum.extent()))
        {
            return;
        }
        for child in &self.nodes.node(node).children {
            for id in &self.nodes.node(*child).data {
                if let Some(entry) = self.index.get_mut(id)
                    && entry.datum.is_point()
                {
                    entry.node = Some(*child);
                }
            }
        }
        tracing::debug!(
            ?node,
            depth = self.nodes.node(node).depth,
            nodes = self.nodes.len(),
            "subdivided leaf"
        );
    }

    /// Walk from `start` to the leaf that should receive `location`, splitting full leaves.
    fn descend_point(&mut self, start: NodeId, location: &[f64; D]) -> Option<NodeId> {
        let mut current = start;
        loop {
            if self.should_split(current) {
                self.split(current);
            }
            if self.nodes.node(current).is_leaf() {
                return Some(current);
            }
            current = self.nodes.find_child(current, location)?;
        }
    }

    fn insert_area_at(&mut self, node: NodeId, id: DatumId, shape: &Shape<D>) -> bool {
        if !shape.intersects(&self.nodes.node(node).bounds) {
            return false;
        }
        if self.should_split(node) {
            self.split(node);
        }
        if self.nodes.node(node).is_leaf() {
            return self
                .nodes
                .node_mut(node)
                .insert(id, &Extent::Area(*shape));
        }
        let mut placed = false;
        for slot in 0..self.nodes.node(node).children.len() {
            let child = self.nodes.node(node).children[slot];
            placed |= self.insert_area_at(child, id, shape);
        }
        placed
    }

    fn collect_leaves(&self, keep: impl Fn(&BoundingBox<D>) -> bool) -> Vec<NodeId> {
        self.collect_nodes(keep, true)
    }

    /// Depth-first walk pruning subtrees whose bounds fail `keep`; returns surviving leaves.
    fn collect_nodes(
        &self,
        keep: impl Fn(&BoundingBox<D>) -> bool,
        occupied: bool,
    ) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            let node = self.nodes.node(current);
            if !keep(&node.bounds) {
                continue;
            }
            if node.is_leaf() {
                if !(occupied && node.data.is_empty()) {
                    out.push(current);
                }
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }
}

/// Node queued by [`Tree::nearest`], ordered by distance only.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    distance_squared: f64,
    node: NodeId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_squared.total_cmp(&other.distance_squared)
    }
}
