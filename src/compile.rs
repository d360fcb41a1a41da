use lts::{IdAlloc, Lts, Set};
use thiserror::Error;

use crate::ast::SourceSpan;
use crate::interp::{self, InterpError};
use crate::parser::{self, ParseError};

/// One named definition expanded to an LTS.
#[derive(Debug)]
pub struct Automaton {
    pub name: String,
    pub lts: Lts,
}

/// The operations performed during a compile and their source positions,
/// kept as parallel arrays so the caller can annotate the source inline.
#[derive(Debug, Default)]
pub struct Operations {
    pub operations: Vec<String>,
    pub positions: Vec<SourceSpan>,
}

#[derive(Debug)]
pub struct Compiled {
    pub automata: Vec<Automaton>,
    pub operations: Operations,
}

/// Interpreter failure with its resolved source location.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct InterpreterError {
    pub message: String,
    pub location: SourceSpan,
}

impl InterpreterError {
    fn resolve(source: &str, error: InterpError) -> InterpreterError {
        InterpreterError {
            location: SourceSpan::resolve(source, error.span()),
            message: error.to_string(),
        }
    }
}

/// The two failure kinds are distinguished structurally, not by message
/// text: callers prefix "Syntax error " or "Error: " as they see fit.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] ParseError),
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
}

/// Drives parser → interpreter → operations. Owns the identifier allocator,
/// which is reset at the start of every compile so identifiers are fresh
/// across the operations of one compile.
pub struct Compiler {
    live_building: bool,
    fair_abstraction: bool,
    alloc: IdAlloc,
}

impl Compiler {
    pub fn new(live_building: bool, fair_abstraction: bool) -> Compiler {
        Compiler { live_building, fair_abstraction, alloc: IdAlloc::new() }
    }

    pub fn compile(&mut self, source: &str) -> Result<Compiled, CompileError> {
        self.alloc = IdAlloc::new();

        let models = parser::parse(source)?;

        let mut automata = Vec::new();
        let mut operations = Operations::default();

        for model in &models {
            // Each model is its own namespace.
            let defs = interp::interpret(&mut self.alloc, model)
                .map_err(|error| InterpreterError::resolve(source, error))?;

            for def in &model.definitions {
                operations.operations.push(def.name.clone());
                operations.positions.push(SourceSpan::resolve(source, &def.span));
            }

            for (name, mut lts) in defs {
                if self.live_building {
                    // Presentational cleanup only; the semantics of the
                    // returned LTSs do not depend on it.
                    lts.remove_duplicate_edges();
                }
                automata.push(Automaton { name, lts });
            }
        }

        Ok(Compiled { automata, operations })
    }

    /// Weak abstraction, with the fairness variant selected at construction.
    pub fn abstraction(&mut self, lts: &Lts) -> Lts {
        ops::abstraction(&mut self.alloc, lts, self.fair_abstraction)
    }

    /// Strong-bisimulation quotient.
    pub fn simplify(&self, lts: &Lts) -> Lts {
        bisim::minimize(lts)
    }

    /// Relabels the given actions to τ.
    pub fn hide(&self, lts: &Lts, actions: &Set<String>) -> Lts {
        ops::hide(lts, actions)
    }

    /// Parallel composition of two compiled automata.
    pub fn parallel(&mut self, left: &Lts, right: &Lts) -> Lts {
        ops::parallel(&mut self.alloc, left, right)
    }
}

pub fn compile(
    source: &str,
    live_building: bool,
    fair_abstraction: bool,
) -> Result<Compiled, CompileError> {
    Compiler::new(live_building, fair_abstraction).compile(source)
}
