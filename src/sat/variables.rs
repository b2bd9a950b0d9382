//! Dense-indexed variable arenas for the chain model
//!
//! Every fix, arc, and placement gets a dense integer id at model-build
//! time, and the solver variables live in flat vectors keyed by those
//! ids. Lookups that the builders and the decoder need repeatedly
//! (placements by cell, placements by fix and role, arcs by endpoint)
//! are indexed once here instead of being recomputed.

use crate::puzzle::{Cell, NodeId, Region, Role};
use crate::sat::model::BoolVar;
use std::collections::BTreeMap;

/// Dense index of an arc variable.
pub type ArcId = usize;

/// Dense index of a placement variable.
pub type PlacementId = usize;

/// An arc between two fix nodes and its "used" variable.
#[derive(Debug, Clone, Copy)]
pub struct ArcVar {
    pub head: NodeId,
    pub tail: NodeId,
    pub var: BoolVar,
}

/// A `(cell, fix, role)` placement and its variable.
#[derive(Debug, Clone, Copy)]
pub struct PlacementVar {
    pub cell: Cell,
    pub node: NodeId,
    pub role: Role,
    pub var: BoolVar,
}

/// All variables of one chain model, in registration order.
#[derive(Debug)]
pub struct VariableArena {
    fix_activity: Vec<BoolVar>,
    self_loops: Vec<Option<BoolVar>>,
    arcs: Vec<ArcVar>,
    arcs_out: Vec<Vec<ArcId>>,
    placements: Vec<PlacementVar>,
    by_cell: BTreeMap<Cell, Vec<PlacementId>>,
    by_node_role: Vec<[Vec<PlacementId>; 2]>,
}

impl VariableArena {
    /// Allocate the per-fix slots for `node_count` fixes over the cells
    /// of `region`.
    pub fn new(node_count: usize, region: &Region) -> Self {
        let mut by_cell = BTreeMap::new();
        for cell in region.cells() {
            by_cell.insert(cell, Vec::new());
        }
        Self {
            fix_activity: Vec::with_capacity(node_count),
            self_loops: vec![None; node_count],
            arcs: Vec::new(),
            arcs_out: vec![Vec::new(); node_count],
            placements: Vec::new(),
            by_cell,
            by_node_role: vec![[Vec::new(), Vec::new()]; node_count],
        }
    }

    pub fn push_activity(&mut self, var: BoolVar) {
        self.fix_activity.push(var);
    }

    pub fn activity(&self, node: NodeId) -> BoolVar {
        self.fix_activity[node]
    }

    pub fn node_count(&self) -> usize {
        self.fix_activity.len()
    }

    pub fn set_self_loop(&mut self, node: NodeId, var: BoolVar) {
        self.self_loops[node] = Some(var);
    }

    pub fn self_loop(&self, node: NodeId) -> Option<BoolVar> {
        self.self_loops[node]
    }

    pub fn add_arc(&mut self, head: NodeId, tail: NodeId, var: BoolVar) -> ArcId {
        let id = self.arcs.len();
        self.arcs.push(ArcVar { head, tail, var });
        self.arcs_out[head].push(id);
        id
    }

    pub fn arcs(&self) -> &[ArcVar] {
        &self.arcs
    }

    pub fn arcs_from(&self, node: NodeId) -> impl Iterator<Item = &ArcVar> + '_ {
        self.arcs_out[node].iter().map(|&id| &self.arcs[id])
    }

    pub fn add_placement(
        &mut self,
        cell: Cell,
        node: NodeId,
        role: Role,
        var: BoolVar,
    ) -> PlacementId {
        let id = self.placements.len();
        self.placements.push(PlacementVar {
            cell,
            node,
            role,
            var,
        });
        self.by_cell
            .get_mut(&cell)
            .expect("placement registered outside the region")
            .push(id);
        self.by_node_role[node][role_slot(role)].push(id);
        id
    }

    pub fn placements(&self) -> &[PlacementVar] {
        &self.placements
    }

    pub fn placements_at(&self, cell: Cell) -> impl Iterator<Item = &PlacementVar> + '_ {
        self.by_cell
            .get(&cell)
            .into_iter()
            .flatten()
            .map(|&id| &self.placements[id])
    }

    pub fn placements_of(
        &self,
        node: NodeId,
        role: Role,
    ) -> impl Iterator<Item = &PlacementVar> + '_ {
        self.by_node_role[node][role_slot(role)]
            .iter()
            .map(|&id| &self.placements[id])
    }

    /// The placement variable for `(cell, node, role)` if one was
    /// admitted by clue pruning.
    pub fn placement_var(&self, cell: Cell, node: NodeId, role: Role) -> Option<BoolVar> {
        self.by_node_role[node][role_slot(role)]
            .iter()
            .map(|&id| &self.placements[id])
            .find(|p| p.cell == cell)
            .map(|p| p.var)
    }

    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn self_loop_count(&self) -> usize {
        self.self_loops.iter().filter(|l| l.is_some()).count()
    }
}

fn role_slot(role: Role) -> usize {
    match role {
        Role::Head => 0,
        Role::Tail => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Region;
    use crate::sat::model::Model;

    #[test]
    fn test_arena_indexing() {
        let region = Region::rect(2, 1);
        let mut model = Model::new();
        let mut arena = VariableArena::new(2, &region);

        for _ in 0..2 {
            let var = model.new_var();
            arena.push_activity(var);
        }
        let arc_var = model.new_var();
        arena.add_arc(0, 1, arc_var);

        let cell = Cell::new(0, 0);
        let place_var = model.new_var();
        arena.add_placement(cell, 1, Role::Head, place_var);

        assert_eq!(arena.node_count(), 2);
        assert_eq!(arena.arc_count(), 1);
        assert_eq!(arena.arcs_from(0).count(), 1);
        assert_eq!(arena.arcs_from(1).count(), 0);
        assert_eq!(arena.placements_at(cell).count(), 1);
        assert_eq!(arena.placements_at(Cell::new(1, 0)).count(), 0);
        assert_eq!(arena.placements_of(1, Role::Head).count(), 1);
        assert_eq!(arena.placements_of(1, Role::Tail).count(), 0);
        assert_eq!(arena.placement_var(cell, 1, Role::Head), Some(place_var));
        assert_eq!(arena.placement_var(cell, 0, Role::Head), None);
    }

    #[test]
    fn test_self_loops() {
        let region = Region::rect(1, 1);
        let mut model = Model::new();
        let mut arena = VariableArena::new(2, &region);
        arena.push_activity(model.new_var());
        arena.push_activity(model.new_var());

        assert_eq!(arena.self_loop_count(), 0);
        arena.set_self_loop(1, model.new_var());
        assert_eq!(arena.self_loop_count(), 1);
        assert!(arena.self_loop(0).is_none());
        assert!(arena.self_loop(1).is_some());
    }
}
