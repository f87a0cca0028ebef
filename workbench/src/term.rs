use crate::prelude::*;

/// A lambda term as written: abstractions may bind several parameters and
/// applications may take several arguments.
#[derive(PartialEq, Eq, Debug)]
pub enum Term {
    /// `x`
    Variable(Identifier),
    /// `(λ x y body)`
    Abstraction(Vec<Identifier>, Box<Self>),
    /// `(f a b)`
    Application(Box<Self>, Vec<Self>),
}

/// The curried core the reducer works on: one parameter, one argument.
#[derive(PartialEq, Eq, Debug)]
pub enum Lambda {
    /// `x`
    Var(Identifier),
    /// `(λ x body)`
    Abs(Identifier, Box<Self>),
    /// `(f a)`
    Apply(Box<Self>, Box<Self>),
}

// Clone and Drop are written out so that deeply nested terms are walked on a
// growable stack instead of through the derived recursion.

impl Clone for Term {
    fn clone(&self) -> Self {
        grow(|| match self {
            Term::Variable(name) => Term::Variable(name.clone()),
            Term::Abstraction(params, body) => Term::Abstraction(params.clone(), body.clone()),
            Term::Application(func, args) => Term::Application(func.clone(), args.clone()),
        })
    }
}

impl Clone for Lambda {
    fn clone(&self) -> Self {
        grow(|| match self {
            Lambda::Var(name) => Lambda::Var(name.clone()),
            Lambda::Abs(param, body) => Lambda::Abs(param.clone(), body.clone()),
            Lambda::Apply(lhs, rhs) => Lambda::Apply(lhs.clone(), rhs.clone()),
        })
    }
}

/// Moves a compound child out of its box, leaving a variable behind.
fn detach_term(slot: &mut Term) -> Option<Term> {
    (!matches!(slot, Term::Variable(_)))
        .then(|| std::mem::replace(slot, Term::Variable(Identifier::default())))
}

fn detach_lambda(slot: &mut Lambda) -> Option<Lambda> {
    (!matches!(slot, Lambda::Var(_)))
        .then(|| std::mem::replace(slot, Lambda::Var(Identifier::default())))
}

impl Drop for Term {
    fn drop(&mut self) {
        grow(|| match self {
            Term::Variable(_) => {}
            Term::Abstraction(_, body) => drop(detach_term(body)),
            Term::Application(func, args) => {
                drop(detach_term(func));
                drop(std::mem::take(args));
            }
        })
    }
}

impl Drop for Lambda {
    fn drop(&mut self) {
        grow(|| match self {
            Lambda::Var(_) => {}
            Lambda::Abs(_, body) => drop(detach_lambda(body)),
            Lambda::Apply(lhs, rhs) => {
                drop(detach_lambda(lhs));
                drop(detach_lambda(rhs));
            }
        })
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        grow(|| match self {
            Term::Variable(name) => f.write_str(name),
            Term::Abstraction(params, body) => {
                f.write_str("(")?;
                f.write_str(LAMBDA)?;
                for param in params {
                    f.write_str(" ")?;
                    f.write_str(param)?;
                }
                f.write_fmt(format_args!(" {body})"))
            }
            Term::Application(func, args) => {
                f.write_fmt(format_args!("({func}"))?;
                for arg in args {
                    f.write_fmt(format_args!(" {arg}"))?;
                }
                f.write_str(")")
            }
        })
    }
}

impl std::fmt::Display for Lambda {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        grow(|| match self {
            Lambda::Var(name) => f.write_str(name),
            Lambda::Abs(param, body) => f.write_fmt(format_args!("({LAMBDA} {param} {body})")),
            Lambda::Apply(lhs, rhs) => f.write_fmt(format_args!("({lhs} {rhs})")),
        })
    }
}

/// Renders a term the way it is printed to the user.
pub fn pretty(term: &Term) -> String {
    term.to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::new(s.to_string())
    }

    #[test]
    fn test_pretty() {
        let k = Term::Abstraction(vec![id("x"), id("y")], Term::Variable(id("x")).into());
        assert_eq!(pretty(&k), "(λ x y x)");
        let app = Term::Application(
            k.into(),
            vec![Term::Variable(id("a")), Term::Variable(id("b"))],
        );
        assert_eq!(pretty(&app), "((λ x y x) a b)");
    }

    #[test]
    fn test_lambda_display() {
        let omega_half = Lambda::Abs(
            id("x"),
            Lambda::Apply(Lambda::Var(id("x")).into(), Lambda::Var(id("x")).into()).into(),
        );
        assert_eq!(omega_half.to_string(), "(λ x (x x))");
    }

    #[test]
    fn test_deep_clone_and_drop() {
        let mut term = Lambda::Var(id("x"));
        for _ in 0..5000 {
            term = Lambda::Apply(Lambda::Var(id("f")).into(), term.into());
        }
        let copy = term.clone();
        drop(term);
        let shown = copy.to_string();
        assert!(shown.starts_with("(f (f "));
        assert_eq!(shown.len(), "(f ".len() * 5000 + "x".len() + ")".len() * 5000);
    }
}
