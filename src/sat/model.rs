//! Boolean constraint model consumed by the external SAT engine
//!
//! Builders register variables and constraints against one exclusively
//! owned `Model`; the solver adapter lowers it to clauses and submits the
//! whole thing in a single call. Most constraints are emitted as clauses
//! immediately; the circuit constraint is kept structured and lowered
//! last, because its encoding needs fresh auxiliary variables.

use itertools::Itertools;

/// A literal in DIMACS convention: positive for the variable, negative
/// for its negation. Variables are numbered from 1.
pub type Lit = i32;

/// Handle to a boolean variable of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoolVar(i32);

impl BoolVar {
    /// Literal asserting this variable has the given polarity.
    pub fn lit(self, value: bool) -> Lit {
        if value {
            self.0
        } else {
            -self.0
        }
    }

    pub fn positive(self) -> Lit {
        self.0
    }

    pub fn negative(self) -> Lit {
        -self.0
    }

    /// Zero-based index into a flat assignment vector.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

/// A disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<Lit>,
}

impl Clause {
    pub fn new(literals: Vec<Lit>) -> Self {
        Self { literals }
    }

    pub fn unit(literal: Lit) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    /// An empty clause is unsatisfiable by itself.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// One directed arc of a circuit constraint. A `head == tail` entry is a
/// self-loop: choosing it excludes the node from the tour.
#[derive(Debug, Clone, Copy)]
pub struct CircuitArc {
    pub head: usize,
    pub tail: usize,
    pub var: BoolVar,
}

#[derive(Debug, Clone)]
struct CircuitSpec {
    node_count: usize,
    arcs: Vec<CircuitArc>,
}

/// The variable and constraint store for one puzzle instance.
#[derive(Debug)]
pub struct Model {
    next_var: i32,
    clauses: Vec<Clause>,
    circuits: Vec<CircuitSpec>,
}

impl Model {
    pub fn new() -> Self {
        Self {
            next_var: 1,
            clauses: Vec::new(),
            circuits: Vec::new(),
        }
    }

    pub fn new_var(&mut self) -> BoolVar {
        let var = BoolVar(self.next_var);
        self.next_var += 1;
        var
    }

    pub fn var_count(&self) -> usize {
        (self.next_var - 1) as usize
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn add_clause(&mut self, literals: Vec<Lit>) {
        self.clauses.push(Clause::new(literals));
    }

    pub fn add_unit(&mut self, literal: Lit) {
        self.clauses.push(Clause::unit(literal));
    }

    /// `premise => conclusion`.
    pub fn add_implication(&mut self, premise: Lit, conclusion: Lit) {
        self.add_clause(vec![-premise, conclusion]);
    }

    /// `a <=> !b`; ties a self-loop to the inactivity of its fix.
    pub fn add_iff_negation(&mut self, a: BoolVar, b: BoolVar) {
        self.add_clause(vec![a.positive(), b.positive()]);
        self.add_clause(vec![a.negative(), b.negative()]);
    }

    /// At least one of `literals` holds.
    pub fn add_or(&mut self, literals: Vec<Lit>) {
        self.add_clause(literals);
    }

    /// If every literal in `enforce` holds, at least one of `literals`
    /// does. With an empty candidate list this forbids the enforcement
    /// conjunction outright.
    pub fn add_or_enforced(&mut self, literals: &[Lit], enforce: &[Lit]) {
        let mut clause: Vec<Lit> = enforce.iter().map(|&l| -l).collect();
        clause.extend_from_slice(literals);
        self.add_clause(clause);
    }

    /// No two of `literals` hold, pairwise.
    pub fn add_at_most_one(&mut self, literals: &[Lit]) {
        for (a, b) in literals.iter().copied().tuple_combinations() {
            self.add_clause(vec![-a, -b]);
        }
    }

    /// Exactly one of `literals` holds. An empty list makes the model
    /// unsatisfiable, which is the correct reading of "exactly one of
    /// nothing".
    pub fn add_exactly_one(&mut self, literals: &[Lit]) {
        self.add_at_most_one(literals);
        self.add_clause(literals.to_vec());
    }

    /// Exactly `k` of `literals` hold, by a sequential counter.
    ///
    /// Register `reg[i][j]` reads "at least j+1 of the first i+1
    /// literals hold"; the recurrence is encoded in both directions so
    /// the top register is exact, then pinned to `k`.
    pub fn add_sum_eq(&mut self, literals: &[Lit], k: usize) {
        let n = literals.len();
        if k > n {
            self.add_clause(Vec::new());
            return;
        }
        if k == 0 {
            for &lit in literals {
                self.add_unit(-lit);
            }
            return;
        }

        // levels 0..m-1; level j stands for a count of at least j+1
        let m = usize::min(n, k + 1);
        let mut reg: Vec<Vec<BoolVar>> = Vec::with_capacity(n);
        for i in 0..n {
            let depth = usize::min(i + 1, m);
            reg.push((0..depth).map(|_| self.new_var()).collect());
        }

        for i in 0..n {
            let x = literals[i];
            for j in 0..reg[i].len() {
                let r = reg[i][j];
                let carry = if i > 0 && j < reg[i - 1].len() {
                    Some(reg[i - 1][j])
                } else {
                    None
                };
                // previous level, one count lower; true by convention at j == 0
                let lower = if j == 0 {
                    None
                } else {
                    Some(reg[i - 1][j - 1])
                };

                // carry => r
                if let Some(c) = carry {
                    self.add_implication(c.positive(), r.positive());
                }
                // x & lower => r
                match lower {
                    Some(l) => self.add_clause(vec![-x, l.negative(), r.positive()]),
                    None => self.add_clause(vec![-x, r.positive()]),
                }
                // r => carry | x
                let mut back = vec![r.negative()];
                if let Some(c) = carry {
                    back.push(c.positive());
                }
                back.push(x);
                self.add_clause(back);
                // r => carry | lower
                if let Some(l) = lower {
                    let mut back = vec![r.negative()];
                    if let Some(c) = carry {
                        back.push(c.positive());
                    }
                    back.push(l.positive());
                    self.add_clause(back);
                }
            }
        }

        // pin the final count to exactly k
        self.add_unit(reg[n - 1][k - 1].positive());
        if m == k + 1 {
            self.add_unit(reg[n - 1][k].negative());
        }
    }

    /// Require the selected arcs to form exactly one closed tour over
    /// `node_count` nodes, where a selected self-loop excludes its node
    /// from the tour. Lowered to clauses when the model is finalized.
    pub fn add_circuit(&mut self, node_count: usize, arcs: Vec<CircuitArc>) {
        self.circuits.push(CircuitSpec { node_count, arcs });
    }

    /// Expand deferred constraints into clauses. Called once by the
    /// solver adapter; afterwards `clauses()` is the complete model.
    pub fn lower(&mut self) {
        let circuits = std::mem::take(&mut self.circuits);
        for spec in circuits {
            self.lower_circuit(&spec);
        }
    }

    /// Circuit-to-CNF lowering.
    ///
    /// Degree constraints force exactly one selected outgoing and
    /// incoming edge per node (a self-loop counts as both for its own
    /// node). Single-tour enforcement assigns each in-tour node a
    /// one-hot position: position 0 is pinned to the lowest-indexed
    /// in-tour node, each position holds at most one node, and a
    /// selected arc advances the position by one unless it closes the
    /// tour back at position 0. A second disjoint cycle would need its
    /// positions to increase forever, so none can exist.
    fn lower_circuit(&mut self, spec: &CircuitSpec) {
        let n = spec.node_count;
        if n == 0 {
            return;
        }

        let mut outgoing: Vec<Vec<Lit>> = vec![Vec::new(); n];
        let mut incoming: Vec<Vec<Lit>> = vec![Vec::new(); n];
        let mut loops: Vec<Option<BoolVar>> = vec![None; n];
        for arc in &spec.arcs {
            debug_assert!(arc.head < n && arc.tail < n);
            if arc.head == arc.tail {
                loops[arc.head] = Some(arc.var);
            }
            outgoing[arc.head].push(arc.var.positive());
            incoming[arc.tail].push(arc.var.positive());
        }

        for v in 0..n {
            self.add_exactly_one(&outgoing[v]);
            self.add_exactly_one(&incoming[v]);
        }

        let positions: Vec<Vec<BoolVar>> = (0..n)
            .map(|_| (0..n).map(|_| self.new_var()).collect())
            .collect();

        for v in 0..n {
            let lits: Vec<Lit> = positions[v].iter().map(|p| p.positive()).collect();
            self.add_at_most_one(&lits);
            match loops[v] {
                // a node without a self-loop is always in the tour
                None => self.add_clause(lits),
                Some(lp) => {
                    let mut clause = lits;
                    clause.push(lp.positive());
                    self.add_clause(clause);
                    for p in &positions[v] {
                        self.add_implication(p.positive(), lp.negative());
                    }
                }
            }
        }

        for k in 0..n {
            let lits: Vec<Lit> = (0..n).map(|v| positions[v][k].positive()).collect();
            self.add_at_most_one(&lits);
        }

        // position 0 is exactly the lowest-indexed node still in the tour
        let mut prior_loops: Vec<BoolVar> = Vec::new();
        let mut start_settled = false;
        for v in 0..n {
            if start_settled {
                self.add_unit(positions[v][0].negative());
                continue;
            }
            for lp in &prior_loops {
                self.add_implication(positions[v][0].positive(), lp.positive());
            }
            let mut clause: Vec<Lit> = prior_loops.iter().map(|lp| lp.negative()).collect();
            match loops[v] {
                None => {
                    clause.push(positions[v][0].positive());
                    self.add_clause(clause);
                    start_settled = true;
                }
                Some(lp) => {
                    clause.push(lp.positive());
                    clause.push(positions[v][0].positive());
                    self.add_clause(clause);
                    prior_loops.push(lp);
                }
            }
        }

        // a used arc advances the position by one, or closes the tour
        // back at the start
        for arc in &spec.arcs {
            if arc.head == arc.tail {
                continue;
            }
            for k in 0..n {
                let mut clause = vec![arc.var.negative(), positions[arc.head][k].negative()];
                if k + 1 < n {
                    clause.push(positions[arc.tail][k + 1].positive());
                }
                clause.push(positions[arc.tail][0].positive());
                self.add_clause(clause);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Brute-force the satisfying assignments of a lowered model,
    /// projected onto the first `project` variables.
    fn solutions(mut model: Model, project: usize) -> Vec<Vec<bool>> {
        model.lower();
        let n = model.var_count();
        assert!(n <= 20, "brute force only works for tiny models");
        let mut seen = std::collections::BTreeSet::new();
        'outer: for bits in 0..(1u32 << n) {
            let assign: Vec<bool> = (0..n).map(|i| bits & (1 << i) != 0).collect();
            for clause in model.clauses() {
                let ok = clause.literals.iter().any(|&lit| {
                    let value = assign[(lit.unsigned_abs() - 1) as usize];
                    if lit > 0 {
                        value
                    } else {
                        !value
                    }
                });
                if !ok {
                    continue 'outer;
                }
            }
            seen.insert(assign[..project].to_vec());
        }
        seen.into_iter().collect()
    }

    #[test]
    fn test_exactly_one() {
        let mut model = Model::new();
        let vars: Vec<BoolVar> = (0..3).map(|_| model.new_var()).collect();
        let lits: Vec<Lit> = vars.iter().map(|v| v.positive()).collect();
        model.add_exactly_one(&lits);
        let sols = solutions(model, 3);
        assert_eq!(sols.len(), 3);
        assert!(sols.iter().all(|s| s.iter().filter(|&&b| b).count() == 1));
    }

    #[test]
    fn test_exactly_one_of_nothing_is_unsat() {
        let mut model = Model::new();
        model.new_var();
        model.add_exactly_one(&[]);
        assert!(solutions(model, 1).is_empty());
    }

    #[test]
    fn test_sum_eq() {
        let mut model = Model::new();
        let vars: Vec<BoolVar> = (0..4).map(|_| model.new_var()).collect();
        let lits: Vec<Lit> = vars.iter().map(|v| v.positive()).collect();
        model.add_sum_eq(&lits, 2);
        let sols = solutions(model, 4);
        assert_eq!(sols.len(), 6);
        assert!(sols.iter().all(|s| s.iter().filter(|&&b| b).count() == 2));
    }

    #[test]
    fn test_sum_eq_zero_and_overflow() {
        let mut model = Model::new();
        let vars: Vec<BoolVar> = (0..2).map(|_| model.new_var()).collect();
        let lits: Vec<Lit> = vars.iter().map(|v| v.positive()).collect();
        model.add_sum_eq(&lits, 0);
        let sols = solutions(model, 2);
        assert_eq!(sols, vec![vec![false, false]]);

        let mut model = Model::new();
        let vars: Vec<BoolVar> = (0..2).map(|_| model.new_var()).collect();
        let lits: Vec<Lit> = vars.iter().map(|v| v.positive()).collect();
        model.add_sum_eq(&lits, 3);
        assert!(solutions(model, 2).is_empty());
    }

    #[test]
    fn test_implication_and_negation_tie() {
        let mut model = Model::new();
        let a = model.new_var();
        let b = model.new_var();
        model.add_iff_negation(a, b);
        let sols = solutions(model, 2);
        assert_eq!(sols, vec![vec![false, true], vec![true, false]]);
    }

    #[test]
    fn test_circuit_mandatory_triangle() {
        // all six arcs between three mandatory nodes: the tours are the
        // two directions of the triangle
        let mut model = Model::new();
        let mut arcs = Vec::new();
        for head in 0..3usize {
            for tail in 0..3usize {
                if head != tail {
                    arcs.push(CircuitArc {
                        head,
                        tail,
                        var: model.new_var(),
                    });
                }
            }
        }
        model.add_circuit(3, arcs);
        let sols = solutions(model, 6);
        assert_eq!(sols.len(), 2);
        for sol in &sols {
            assert_eq!(sol.iter().filter(|&&b| b).count(), 3);
        }
    }

    #[test]
    fn test_circuit_with_optional_node() {
        // node 2 carries a self-loop: either the 0<->1 two-cycle with 2
        // excluded, or one of the two triangles through 2
        let mut model = Model::new();
        let mut arcs = Vec::new();
        for (head, tail) in [(0usize, 1usize), (1, 0), (0, 2), (2, 0), (1, 2), (2, 1)] {
            arcs.push(CircuitArc {
                head,
                tail,
                var: model.new_var(),
            });
        }
        arcs.push(CircuitArc {
            head: 2,
            tail: 2,
            var: model.new_var(),
        });
        model.add_circuit(3, arcs);
        let sols = solutions(model, 7);
        assert_eq!(sols.len(), 3);
        // the loop is chosen exactly when only two arcs are used
        for sol in &sols {
            let used = sol[..6].iter().filter(|&&b| b).count();
            assert_eq!(sol[6], used == 2);
        }
    }

    #[test]
    fn test_circuit_rejects_disjoint_two_cycles() {
        // two 2-cycles with no connecting arcs cannot form one tour
        let mut model = Model::new();
        let mut arcs = Vec::new();
        for (head, tail) in [(0usize, 1usize), (1, 0), (2usize, 3usize), (3, 2)] {
            arcs.push(CircuitArc {
                head,
                tail,
                var: model.new_var(),
            });
        }
        model.add_circuit(4, arcs);
        assert!(solutions(model, 4).is_empty());
    }

    #[test]
    fn test_node_without_arcs_is_unsat() {
        let mut model = Model::new();
        let var = model.new_var();
        model.add_circuit(
            2,
            vec![CircuitArc {
                head: 0,
                tail: 0,
                var,
            }],
        );
        assert!(solutions(model, 1).is_empty());
    }
}
