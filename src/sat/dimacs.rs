//! DIMACS CNF export and model import
//!
//! Lets the formula be decided by any external solver: write the CNF with
//! [`write_dimacs`], run the solver, then read its answer back with
//! [`parse_model`]. Both the SAT-competition output (`s SATISFIABLE` / `v`
//! lines) and the MiniSat result file (`SAT` followed by literals) are read.

use super::encoder::Formula;
use super::solver::{SolveOutcome, SolverSolution};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DimacsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed solver output: {0}")]
    Format(String),
}

/// Write `formula` in DIMACS CNF, preceded by `comments` as `c` lines
pub fn write_dimacs<W: Write>(formula: &Formula, comments: &[String], writer: W) -> Result<(), DimacsError> {
    let mut writer = std::io::BufWriter::new(writer);

    for comment in comments {
        writeln!(writer, "c {}", comment)?;
    }
    writeln!(writer, "p cnf {} {}", formula.variable_count(), formula.clause_count())?;

    for clause in formula.clauses() {
        for literal in &clause.literals {
            write!(writer, "{} ", literal)?;
        }
        writeln!(writer, "0")?;
    }

    writer.flush()?;
    Ok(())
}

/// Read an external solver's answer
pub fn parse_model<R: Read>(reader: R) -> Result<SolveOutcome, DimacsError> {
    let reader = BufReader::new(reader);

    let mut verdict = None;
    let mut assignment = HashMap::new();

    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace().peekable();

        match tokens.peek() {
            Some(&"c") | None => continue,
            Some(&"s") => {
                let _ = tokens.next();
                verdict = Some(parse_verdict(&tokens.collect::<Vec<_>>().join(" "))?);
            }
            Some(&"SAT") | Some(&"SATISFIABLE") => verdict = Some(true),
            Some(&"UNSAT") | Some(&"UNSATISFIABLE") => verdict = Some(false),
            Some(&"v") => {
                let _ = tokens.next();
                read_literals(tokens, &mut assignment)?;
            }
            Some(_) => read_literals(tokens, &mut assignment)?,
        }
    }

    match verdict {
        Some(true) => Ok(SolveOutcome::Satisfiable(SolverSolution {
            assignment,
            solve_time: Duration::ZERO,
        })),
        Some(false) => Ok(SolveOutcome::Unsatisfiable),
        None => Err(DimacsError::Format("missing SAT/UNSAT verdict".into())),
    }
}

fn parse_verdict(text: &str) -> Result<bool, DimacsError> {
    match text {
        "SATISFIABLE" => Ok(true),
        "UNSATISFIABLE" => Ok(false),
        other => Err(DimacsError::Format(format!("unsupported verdict '{}'", other))),
    }
}

fn read_literals<'a, I>(tokens: I, assignment: &mut HashMap<i32, bool>) -> Result<(), DimacsError>
where
    I: Iterator<Item = &'a str>,
{
    for token in tokens {
        let literal: i32 = token
            .parse()
            .map_err(|_| DimacsError::Format(format!("invalid literal '{}'", token)))?;
        if literal == 0 {
            break;
        }
        assignment.insert(literal.abs(), literal > 0);
    }
    Ok(())
}
