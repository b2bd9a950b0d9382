//! External SAT engine integration using CaDiCaL
//!
//! The core never looks inside the engine: it hands over a finished
//! model plus a time budget and gets back a four-way status and, on
//! success, a total assignment.

use crate::sat::model::{BoolVar, Model};
use cadical::{Solver, Timeout};
use std::time::{Duration, Instant};

/// Per-solve configuration, passed explicitly into the call.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Wall-clock cap for the engine. On expiry without a conclusive
    /// answer the solve reports [`SolveStatus::Timeout`] and any
    /// partial assignment is discarded.
    pub time_budget: Duration,
    /// Parallelism hint. CaDiCaL searches single-threaded and ignores
    /// it; the hint is carried for engines that can use one.
    pub worker_hint: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(300),
            worker_hint: 1,
        }
    }
}

/// Engine verdict on a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven best assignment of an optimizing model. Feasibility
    /// models never report this.
    Optimal,
    /// A satisfying assignment was found.
    Feasible,
    /// Proven unsatisfiable.
    Infeasible,
    /// Budget exhausted without a proof either way.
    Timeout,
}

impl SolveStatus {
    pub fn is_success(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// A total assignment of every model variable, flat-indexed.
#[derive(Debug, Clone)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    pub fn value(&self, var: BoolVar) -> bool {
        self.values.get(var.index()).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Statistics about one engine call.
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub solve_time: Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}

/// Everything a solve call produces.
#[derive(Debug)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub assignment: Option<Assignment>,
    pub statistics: SolverStatistics,
}

/// Adapter owning the engine configuration for one pipeline.
pub struct SatSolver {
    options: SolverOptions,
}

impl SatSolver {
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Lower the model and run the engine once. Consumes the model:
    /// nothing re-enters it after the call.
    pub fn solve(&self, mut model: Model) -> SolveOutcome {
        let start = Instant::now();

        model.lower();
        let variable_count = model.var_count();
        let clause_count = model.clause_count();

        // an empty clause is already a proof of infeasibility; the
        // engine would reject it rather than report it
        if model.clauses().iter().any(|clause| clause.is_empty()) {
            return SolveOutcome {
                status: SolveStatus::Infeasible,
                assignment: None,
                statistics: SolverStatistics {
                    variable_count,
                    clause_count,
                    solve_time: start.elapsed(),
                },
            };
        }

        let mut engine: Solver = Solver::new();
        engine.set_callbacks(Some(Timeout::new(
            self.options.time_budget.as_secs_f32(),
        )));
        for clause in model.clauses() {
            engine.add_clause(clause.literals.iter().copied());
        }

        let verdict = engine.solve();
        let solve_time = start.elapsed();
        let statistics = SolverStatistics {
            variable_count,
            clause_count,
            solve_time,
        };

        let (status, assignment) = match verdict {
            Some(true) => {
                let values = (1..=variable_count as i32)
                    .map(|var| engine.value(var).unwrap_or(false))
                    .collect();
                (SolveStatus::Feasible, Some(Assignment::new(values)))
            }
            Some(false) => (SolveStatus::Infeasible, None),
            None => (SolveStatus::Timeout, None),
        };

        SolveOutcome {
            status,
            assignment,
            statistics,
        }
    }
}
