use std::rc::Rc;

use thiserror::Error;

pub type Identifier = Rc<String>;

/// The binder glyph. It is reserved and never names a variable.
pub const LAMBDA: &str = "λ";
/// ASCII stand-in for [`LAMBDA`] accepted from the keyboard.
pub const SHORTHAND: char = '\\';

const MIN_STACK_RED_ZONE: usize = 32 * 1024;
const STACK_GROWTH_SIZE: usize = 1024 * 1024;

/// Runs `f` on a fresh stack segment when the current one is nearly used up.
/// Every recursive walk over forms and terms goes through here, so nesting
/// depth is bounded by memory rather than by the thread's stack.
pub fn grow<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, f)
}

/// Half-open range of char offsets into the source.
pub type Span = std::ops::Range<usize>;

#[derive(derive_more::AsRef, PartialEq, Eq, Clone, derive_more::Display, Debug)]
#[display(bound = "T: std::fmt::Display")]
#[display(fmt = "{value}")]
pub struct Spanned<T> {
    pub span: Span,
    #[as_ref]
    pub value: T,
}
impl<T> Spanned<T> {
    pub fn value(&self) -> &T {
        &self.value
    }
    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Error, Debug)]
pub enum AbstractionFault {
    #[error("an abstraction needs a lambda, at least one parameter and a body")]
    TooFewTerms,
    #[error("parameters must be atoms")]
    NonAtomParameter,
    #[error("`λ` cannot be a parameter")]
    LambdaParameter,
}

#[derive(PartialEq, Eq, Clone, Copy, Error, Debug)]
pub enum ErrorKind {
    #[error("unmatched parenthesis")]
    UnmatchedParenthesis,
    #[error("`λ` is reserved and cannot be used as a variable")]
    ReservedNameMisuse,
    #[error("malformed abstraction: {0}")]
    MalformedAbstraction(AbstractionFault),
    #[error("an application needs at least two terms")]
    MalformedApplication,
    #[error("empty list")]
    EmptyList,
}

#[derive(PartialEq, Eq, Clone, Error, Debug)]
#[error("{kind} at {}..{}", .span.start, .span.end)]
pub struct Error {
    pub kind: ErrorKind,
    pub span: Span,
}
impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
