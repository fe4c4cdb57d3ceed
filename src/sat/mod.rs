//! SAT encoding components for tetromino tiling

pub mod variables;
pub mod constraints;
pub mod encoder;
pub mod solver;
pub mod dimacs;

pub use variables::{DecisionVariable, VariableSpace, ROLES};
pub use constraints::{exactly_one, Clause, ConstraintGenerator};
pub use encoder::{Formula, TilingEncoder};
pub use solver::{CadicalBackend, SatBackend, SolveOutcome, SolverSolution};
