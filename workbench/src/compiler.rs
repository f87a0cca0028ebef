//! Checks forms against the lambda-calculus grammar:
//!
//! ```text
//! term := name | (λ name name* term) | (term term term*)
//! ```
//!
//! The first error found depth-first, left to right, is the result of the
//! whole form.

use crate::{parser::Form, prelude::*, term::Term};

fn is_lambda(form: &Spanned<Form>) -> bool {
    matches!(form.value(), Form::Atom(name) if name.as_str() == LAMBDA)
}

fn fail<T>(kind: ErrorKind, span: Span) -> Result<T> {
    Err(Error::new(kind, span))
}

fn compile_abstraction(span: Span, children: &[Spanned<Form>]) -> Result<Term> {
    use AbstractionFault::*;
    let (body, params) = match children {
        [_, params @ .., body] if !params.is_empty() => (body, params),
        _ => return fail(ErrorKind::MalformedAbstraction(TooFewTerms), span),
    };
    if let Some(param) = params.iter().find(|p| !matches!(p.value(), Form::Atom(_))) {
        return fail(ErrorKind::MalformedAbstraction(NonAtomParameter), param.span());
    }
    if let Some(param) = params.iter().find(|p| is_lambda(p)) {
        return fail(ErrorKind::MalformedAbstraction(LambdaParameter), param.span());
    }
    let params = params
        .iter()
        .filter_map(|p| match p.value() {
            Form::Atom(name) => Some(name.clone()),
            _ => None,
        })
        .collect();
    let body = compile_term(body)?;
    Ok(Term::Abstraction(params, body.into()))
}

pub fn compile_term(form: &Spanned<Form>) -> Result<Term> {
    grow(|| match form.value() {
        Form::Atom(_) if is_lambda(form) => fail(ErrorKind::ReservedNameMisuse, form.span()),
        Form::Atom(name) => Ok(Term::Variable(name.clone())),
        Form::Unterminated(_) => fail(ErrorKind::UnmatchedParenthesis, form.span()),
        Form::List(children) => match children.as_slice() {
            [] => fail(ErrorKind::EmptyList, form.span()),
            [head, ..] if is_lambda(head) => compile_abstraction(form.span(), children),
            [_] => fail(ErrorKind::MalformedApplication, form.span()),
            [func, args @ ..] => {
                let func = compile_term(func)?;
                let args = args.iter().map(compile_term).collect::<Result<_>>()?;
                Ok(Term::Application(func.into(), args))
            }
        },
    })
}
