//! Glue between the circuit ordering and the spatial placements
//!
//! The arc variables and the placement variables are independent by
//! construction; without this coupling the engine could pick a valid
//! tour and a valid cover that describe two different tilings. The
//! coupling is stated directly as the invariant it protects: a chain
//! step is the physical adjacency of the head tile's trailing half and
//! the tail tile's leading half.

use crate::puzzle::{Region, Role};
use crate::sat::model::Model;
use crate::sat::variables::VariableArena;

pub struct GlueBuilder<'a> {
    region: &'a Region,
}

impl<'a> GlueBuilder<'a> {
    pub fn new(region: &'a Region) -> Self {
        Self { region }
    }

    /// For every arc `(h, t)` and every cell that may hold `h`'s tail
    /// half: if the arc is used and the tail half rests there, then
    /// `t`'s head half rests on one of the orthogonal neighbors.
    ///
    /// The per-fix occupancy constraints make the tail cell unique when
    /// the fix is active, so enforcing the disjunction under each
    /// candidate tail cell pins the head of the next tile to the actual
    /// border of the previous one.
    pub fn build(&self, model: &mut Model, arena: &VariableArena) {
        for arc in arena.arcs() {
            for placement in arena.placements_of(arc.head, Role::Tail) {
                let candidates: Vec<_> = self
                    .region
                    .neighbors(placement.cell)
                    .into_iter()
                    .filter_map(|adjacent| {
                        arena.placement_var(adjacent, arc.tail, Role::Head)
                    })
                    .map(|var| var.positive())
                    .collect();
                model.add_or_enforced(
                    &candidates,
                    &[arc.var.positive(), placement.var.positive()],
                );
            }
        }
    }
}
