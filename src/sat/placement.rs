//! Spatial placement constraints: exact cover of the region

use crate::puzzle::{FixLibrary, Region, Role};
use crate::sat::model::Model;
use crate::sat::variables::VariableArena;

/// Builds the "every cell holds exactly one half-tile" side of the model.
///
/// A cell with a clue label only ever receives placement variables whose
/// role value equals that label; pruning the variable set keeps the
/// semantics and shrinks the search space, so no extra clause is needed
/// for clue compliance.
pub struct PlacementBuilder<'a> {
    library: &'a FixLibrary,
    region: &'a Region,
}

impl<'a> PlacementBuilder<'a> {
    pub fn new(library: &'a FixLibrary, region: &'a Region) -> Self {
        Self { library, region }
    }

    pub fn build(&self, model: &mut Model, arena: &mut VariableArena) {
        self.create_placement_variables(model, arena);
        self.constrain_cells(model, arena);
        self.constrain_fix_occupancy(model, arena);
        self.constrain_partner_adjacency(model, arena);
    }

    fn create_placement_variables(&self, model: &mut Model, arena: &mut VariableArena) {
        for (cell, clue) in self.region.entries() {
            for (node, fix) in self.library.fixes().iter().enumerate() {
                for role in [Role::Head, Role::Tail] {
                    let value = role.value_of(fix);
                    if clue.is_none() || clue == Some(value) {
                        let var = model.new_var();
                        arena.add_placement(cell, node, role, var);
                    }
                }
            }
        }
    }

    fn constrain_cells(&self, model: &mut Model, arena: &VariableArena) {
        // exact cover: one half-tile per cell, no gaps, no overlaps
        for cell in self.region.cells() {
            let lits: Vec<_> = arena
                .placements_at(cell)
                .map(|p| p.var.positive())
                .collect();
            model.add_exactly_one(&lits);
        }
    }

    fn constrain_fix_occupancy(&self, model: &mut Model, arena: &VariableArena) {
        // an active fix rests each of its ends on exactly one cell; an
        // inactive fix rests nowhere
        for node in 0..self.library.node_count() {
            let activity = arena.activity(node);
            for role in [Role::Head, Role::Tail] {
                let lits: Vec<_> = arena
                    .placements_of(node, role)
                    .map(|p| p.var.positive())
                    .collect();
                model.add_at_most_one(&lits);
                for &lit in &lits {
                    model.add_implication(lit, activity.positive());
                }
                model.add_or_enforced(&lits, &[activity.positive()]);
            }
        }
    }

    fn constrain_partner_adjacency(&self, model: &mut Model, arena: &VariableArena) {
        // the two halves of a tile touch: a head here needs its own tail
        // on one of the orthogonal neighbors
        for placement in arena.placements() {
            if placement.role != Role::Head {
                continue;
            }
            let candidates: Vec<_> = self
                .region
                .neighbors(placement.cell)
                .into_iter()
                .filter_map(|cell| arena.placement_var(cell, placement.node, Role::Tail))
                .map(|var| var.positive())
                .collect();
            model.add_or_enforced(&candidates, &[placement.var.positive()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{Cell, FixLibrary, PieceSet};

    fn build(region: &Region) -> (FixLibrary, Model, VariableArena) {
        let set = PieceSet::complete(1);
        let library = FixLibrary::new(&set);
        let mut model = Model::new();
        let mut arena = VariableArena::new(library.node_count(), region);
        // activity variables normally come from the circuit builder
        for _ in 0..library.node_count() {
            let var = model.new_var();
            arena.push_activity(var);
        }
        PlacementBuilder::new(&library, region).build(&mut model, &mut arena);
        (library, model, arena)
    }

    #[test]
    fn test_open_cells_admit_every_half() {
        let region = Region::rect(2, 1);
        let (library, _, arena) = build(&region);
        // 2 cells x 4 fixes x 2 roles
        assert_eq!(
            arena.placement_count(),
            2 * library.node_count() * 2
        );
    }

    #[test]
    fn test_clue_prunes_incompatible_placements() {
        let mut region = Region::rect(2, 1);
        region.insert(Cell::new(0, 0), Some(1));
        let (library, _, arena) = build(&region);

        // halves carrying a 1: the tail of [0:1], the head of [1:0],
        // and both ends of [1:1]
        let at_clue: Vec<_> = arena.placements_at(Cell::new(0, 0)).collect();
        assert_eq!(at_clue.len(), 4);
        for p in at_clue {
            assert_eq!(p.role.value_of(library.fix(p.node)), 1);
        }
    }

    #[test]
    fn test_head_without_adjacent_tail_slot_is_forbidden() {
        // a single cell cannot host both halves of any tile
        let region = Region::rect(1, 1);
        let (_, model, arena) = build(&region);
        // every head placement gets a unit clause forbidding it
        let heads = arena
            .placements()
            .iter()
            .filter(|p| p.role == Role::Head)
            .count();
        assert!(heads > 0);
        let unit_negations = model
            .clauses()
            .iter()
            .filter(|c| c.literals.len() == 1 && c.literals[0] < 0)
            .count();
        assert!(unit_negations >= heads);
    }
}
