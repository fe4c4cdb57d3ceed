//! SAT solver boundary and the CaDiCaL backend

use super::encoder::Formula;
use anyhow::Result;
use cadical::Solver;
use log::debug;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Anything that can decide a CNF formula
///
/// Backends are called once per formula and keep no state between calls.
pub trait SatBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, formula: &Formula) -> Result<SolveOutcome>;
}

/// Verdict of a backend
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Satisfiable(SolverSolution),
    Unsatisfiable,
}

impl SolveOutcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SolveOutcome::Satisfiable(_))
    }
}

/// A satisfying assignment
#[derive(Debug, Clone)]
pub struct SolverSolution {
    pub assignment: HashMap<i32, bool>,
    pub solve_time: Duration,
}

impl SolverSolution {
    /// Value of `variable`; variables the backend left out are false
    pub fn value(&self, variable: i32) -> bool {
        self.assignment.get(&variable).copied().unwrap_or(false)
    }

    /// Variables assigned true, in ascending order
    pub fn true_variables(&self) -> Vec<i32> {
        let mut vars: Vec<i32> = self
            .assignment
            .iter()
            .filter(|&(_, &value)| value)
            .map(|(&var, _)| var)
            .collect();
        vars.sort_unstable();
        vars
    }
}

/// SAT backend running CaDiCaL in-process
#[derive(Debug, Default, Clone, Copy)]
pub struct CadicalBackend;

impl CadicalBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SatBackend for CadicalBackend {
    fn name(&self) -> &'static str {
        "cadical"
    }

    fn solve(&self, formula: &Formula) -> Result<SolveOutcome> {
        // The empty clause cannot be handed to the solver, and it already decides the formula.
        if formula.clauses().iter().any(|clause| clause.is_empty()) {
            return Ok(SolveOutcome::Unsatisfiable);
        }

        let start_time = Instant::now();
        let mut solver: Solver = Solver::new();
        for clause in formula.clauses() {
            solver.add_clause(clause.literals.iter().copied());
        }

        let result = solver.solve();
        let solve_time = start_time.elapsed();
        debug!("{} finished in {:.3}s with {:?}", self.name(), solve_time.as_secs_f64(), result);

        match result {
            Some(true) => {
                let assignment = (1..=formula.variable_count() as i32)
                    .map(|var| (var, solver.value(var).unwrap_or(false)))
                    .collect();
                Ok(SolveOutcome::Satisfiable(SolverSolution {
                    assignment,
                    solve_time,
                }))
            }
            Some(false) => Ok(SolveOutcome::Unsatisfiable),
            None => anyhow::bail!("{} returned no verdict", self.name()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::constraints::Clause;

    fn formula(variables: usize, clauses: Vec<Clause>) -> Formula {
        Formula::assemble(variables, [("test", clauses)])
    }

    #[test]
    fn test_simple_satisfiable() {
        // (x1 v x2) and (-x1 v x2)
        let f = formula(2, vec![Clause::new(vec![1, 2]), Clause::new(vec![-1, 2])]);

        match CadicalBackend::new().solve(&f).unwrap() {
            SolveOutcome::Satisfiable(solution) => {
                assert!(solution.value(2));
                assert_eq!(solution.assignment.len(), 2);
                assert!(f.is_satisfied_by(&solution.assignment));
            }
            SolveOutcome::Unsatisfiable => panic!("expected a model"),
        }
    }

    #[test]
    fn test_unsatisfiable() {
        let f = formula(1, vec![Clause::unit(1), Clause::unit(-1)]);
        assert!(!CadicalBackend::new().solve(&f).unwrap().is_satisfiable());
    }

    #[test]
    fn test_empty_clause_is_unsatisfiable() {
        let f = formula(1, vec![Clause::unit(1), Clause::new(vec![])]);
        assert!(!CadicalBackend::new().solve(&f).unwrap().is_satisfiable());
    }

    #[test]
    fn test_unused_variables_are_reported() {
        let f = formula(3, vec![Clause::unit(2)]);
        match CadicalBackend::new().solve(&f).unwrap() {
            SolveOutcome::Satisfiable(solution) => {
                assert_eq!(solution.assignment.len(), 3);
                assert!(solution.true_variables().contains(&2));
            }
            SolveOutcome::Unsatisfiable => panic!("expected a model"),
        }
    }

    #[test]
    fn test_missing_variables_read_as_false() {
        let solution = SolverSolution {
            assignment: HashMap::from([(1, true), (3, false)]),
            solve_time: Duration::ZERO,
        };
        assert!(solution.value(1));
        assert!(!solution.value(2));
        assert_eq!(solution.true_variables(), vec![1]);
    }
}
