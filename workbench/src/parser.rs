use chumsky::prelude::*;

use crate::prelude::*;

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Form {
    Atom(Identifier),
    List(Vec<Spanned<Form>>),
    /// A list whose `(` is never closed. Its span runs to the end of the input.
    Unterminated(Vec<Spanned<Form>>),
}

impl Drop for Form {
    fn drop(&mut self) {
        if let Form::List(children) | Form::Unterminated(children) = self {
            let children = std::mem::take(children);
            grow(|| drop(children));
        }
    }
}

impl std::fmt::Display for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        grow(|| match self {
            Form::Atom(name) => f.write_str(name),
            Form::List(children) | Form::Unterminated(children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_fmt(format_args!("{child}"))?;
                }
                if matches!(self, Form::List(_)) {
                    f.write_str(")")?;
                }
                Ok(())
            }
        })
    }
}

#[derive(PartialEq, Eq, Clone, derive_more::Display, Debug)]
pub enum Token {
    #[display(fmt = "(")]
    Open,
    #[display(fmt = ")")]
    Close,
    #[display(fmt = "{_0}")]
    Atom(Identifier),
}

pub type ParseError = chumsky::error::Simple<char, Span>;

pub trait SimpleParser<O>: Parser<char, O, Error = ParseError> + Clone {
    #[allow(clippy::type_complexity)]
    fn spanned(self) -> chumsky::combinator::MapWithSpan<Self, fn(O, Span) -> Spanned<O>, O>
    where
        Self: Sized,
    {
        self.map_with_span(|value, span| Spanned { span, value })
    }
}
impl<O, T> SimpleParser<O> for T where T: Parser<char, O, Error = ParseError> + Clone {}

/// Every char is whitespace, a parenthesis or part of an atom, so this
/// consumes the whole input.
pub fn lexer() -> impl SimpleParser<Vec<Spanned<Token>>> {
    let atom = filter(|c: &char| !c.is_whitespace() && *c != '(' && *c != ')')
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(|name| Token::Atom(Identifier::new(name)))
        .labelled("atom");
    let token = choice((just('(').to(Token::Open), just(')').to(Token::Close), atom));
    token.spanned().padded().repeated()
}

/// Lists still waiting for their `)`, innermost last, with the offset of
/// their `(`.
type OpenLists = Vec<(usize, Vec<Spanned<Form>>)>;

fn attach(open: &mut OpenLists, forest: &mut Vec<Spanned<Form>>, form: Spanned<Form>) {
    match open.last_mut() {
        Some((_, children)) => children.push(form),
        None => forest.push(form),
    }
}

/// Parses every top-level form of `text`. Malformed input still yields the
/// forms that could be read; grammar is checked later by the compiler.
/// A `)` with no list open ends the forest.
pub fn parse_all(text: &str) -> Vec<Spanned<Form>> {
    let tokens = lexer().parse(text).unwrap_or_default();
    let mut open = OpenLists::new();
    let mut forest = vec![];
    for Spanned { span, value } in tokens {
        let form = match value {
            Token::Open => {
                open.push((span.start, vec![]));
                continue;
            }
            Token::Close => match open.pop() {
                Some((start, children)) => Spanned {
                    span: start..span.end,
                    value: Form::List(children),
                },
                None => break,
            },
            Token::Atom(name) => Spanned {
                span,
                value: Form::Atom(name),
            },
        };
        attach(&mut open, &mut forest, form);
    }
    let end = text.chars().count();
    while let Some((start, children)) = open.pop() {
        let form = Spanned {
            span: start..end,
            value: Form::Unterminated(children),
        };
        attach(&mut open, &mut forest, form);
    }
    forest
}
