pub mod compiler;
pub mod corrector;
pub mod evaluator;
pub mod free;
pub mod parser;
pub mod prelude;
pub mod report;
pub mod stepper;
pub mod term;

use crate::{
    free::{FreeVarSet, FreeVariables},
    prelude::*,
    term::Term,
};

/// A well-formed top-level term and its free variables.
#[derive(PartialEq, Eq, Clone, derive_more::Display, Debug)]
#[display(fmt = "{term}\n  free: {free}")]
pub struct Analysis {
    pub term: Term,
    pub free: FreeVarSet,
}

/// Compiles every top-level form of `text` independently.
pub fn analyze(text: &str) -> Vec<Result<Analysis>> {
    parser::parse_all(text)
        .iter()
        .map(|form| -> Result<Analysis> {
            let term = compiler::compile_term(form)?;
            let free = term.free_variables();
            Ok(Analysis { term, free })
        })
        .collect()
}
