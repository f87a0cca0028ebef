use tracing::{debug, trace};

use crate::{
    compiler::compile_term,
    evaluator::{compress, expand, reduce, reducible},
    parser::parse_all,
    prelude::*,
    term::{pretty, Lambda},
};

/// Shown in place of a term that still has a redex.
pub const PENDING: &str = "...";

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Tick {
    /// The source changed; every form was parsed and compiled afresh.
    Reloaded,
    /// The source was unchanged; this many terms took one step.
    Stepped(usize),
}

/// Reduces every top-level term of a source one step per tick, so a
/// divergent term costs one step per tick and nothing more.
#[derive(Debug)]
pub struct Stepper {
    source: Option<String>,
    batch: Vec<Result<Lambda>>,
    placeholder: String,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new(PENDING)
    }
}

impl Stepper {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            source: None,
            batch: vec![],
            placeholder: placeholder.into(),
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn batch(&self) -> &[Result<Lambda>] {
        &self.batch
    }

    /// Number of terms not yet in normal form.
    pub fn pending(&self) -> usize {
        self.batch.iter().flatten().filter(|t| reducible(t)).count()
    }

    pub fn tick(&mut self, source: &str) -> Tick {
        if self.source.as_deref() == Some(source) {
            let mut stepped = 0;
            for (i, term) in self.batch.iter_mut().enumerate() {
                if let Ok(term) = term {
                    if let Some(next) = reduce(term) {
                        trace!(index = i, %next, "reduced");
                        *term = next;
                        stepped += 1;
                    }
                }
            }
            debug!(stepped, "tick");
            Tick::Stepped(stepped)
        } else {
            self.batch = parse_all(source)
                .iter()
                .map(|form| compile_term(form).map(|term| expand(&term)))
                .collect();
            self.source = Some(source.to_string());
            debug!(terms = self.batch.len(), "reloaded source");
            Tick::Reloaded
        }
    }

    /// One entry per top-level form: its display line, or its error.
    pub fn outputs(&self) -> impl Iterator<Item = Result<String, &Error>> + '_ {
        self.batch.iter().map(|term| match term {
            Ok(term) if reducible(term) => Ok(self.placeholder.clone()),
            Ok(term) => Ok(pretty(&compress(term))),
            Err(e) => Err(e),
        })
    }

    pub fn render(&self) -> String {
        self.outputs()
            .map(|line| line.unwrap_or_else(|e| e.to_string()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
