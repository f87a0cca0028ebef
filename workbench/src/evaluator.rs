use tracing::trace;

use crate::{
    free::{FreeVarSet, FreeVariables},
    prelude::*,
    term::{Lambda, Term},
};

/// Curries every abstraction and application.
pub fn expand(term: &Term) -> Lambda {
    grow(|| match term {
        Term::Variable(name) => Lambda::Var(name.clone()),
        Term::Abstraction(params, body) => params
            .iter()
            .rev()
            .fold(expand(body), |body, param| {
                Lambda::Abs(param.clone(), body.into())
            }),
        Term::Application(func, args) => args.iter().fold(expand(func), |func, arg| {
            Lambda::Apply(func.into(), expand(arg).into())
        }),
    })
}

/// Merges nested abstractions and left-nested applications back into the
/// written form.
pub fn compress(term: &Lambda) -> Term {
    grow(|| match term {
        Lambda::Var(name) => Term::Variable(name.clone()),
        Lambda::Abs(param, body) => {
            let mut body = compress(body);
            if let Term::Abstraction(params, _) = &mut body {
                params.insert(0, param.clone());
                body
            } else {
                Term::Abstraction(vec![param.clone()], body.into())
            }
        }
        Lambda::Apply(lhs, rhs) => {
            let mut func = compress(lhs);
            if let Term::Application(_, args) = &mut func {
                args.push(compress(rhs));
                func
            } else {
                Term::Application(func.into(), vec![compress(rhs)])
            }
        }
    })
}

/// `name` itself, or the first of `name1`, `name2`, ... not in `avoid`.
pub fn make_fresh(name: &Identifier, avoid: &FreeVarSet) -> Identifier {
    if !avoid.contains(name) {
        return name.clone();
    }
    let mut suffix = 1usize;
    loop {
        let candidate = Identifier::new(format!("{name}{suffix}"));
        if !avoid.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Renames the parameter of an abstraction. Other terms bind nothing and are
/// returned as they are.
pub fn alpha(abstraction: &Lambda, name: Identifier) -> Lambda {
    match abstraction {
        Lambda::Abs(param, body) => {
            let body = substitute(body, param, &Lambda::Var(name.clone()));
            Lambda::Abs(name, body.into())
        }
        _ => abstraction.clone(),
    }
}

/// Replaces the free occurrences of `from` in `term` by `to`, renaming
/// binders that would capture a free variable of `to`.
pub fn substitute(term: &Lambda, from: &str, to: &Lambda) -> Lambda {
    grow(|| match term {
        Lambda::Var(name) if name.as_str() == from => to.clone(),
        Lambda::Var(_) => term.clone(),
        Lambda::Abs(param, _) if param.as_str() == from => term.clone(),
        Lambda::Abs(param, body) => {
            let free = to.free_variables();
            if free.contains(param) {
                let mut avoid = free.union(&body.free_variables());
                avoid.insert(Identifier::new(from.to_string()));
                let fresh = make_fresh(param, &avoid);
                trace!(%param, %fresh, "alpha conversion");
                substitute(&alpha(term, fresh), from, to)
            } else {
                Lambda::Abs(param.clone(), substitute(body, from, to).into())
            }
        }
        Lambda::Apply(lhs, rhs) => Lambda::Apply(
            substitute(lhs, from, to).into(),
            substitute(rhs, from, to).into(),
        ),
    })
}

/// Contracts a redex. `None` unless the function position is an abstraction.
pub fn beta(application: &Lambda) -> Option<Lambda> {
    if let Lambda::Apply(lhs, arg) = application {
        if let Lambda::Abs(param, body) = lhs.as_ref() {
            return Some(substitute(body, param, arg));
        }
    }
    None
}

pub fn reducible(term: &Lambda) -> bool {
    grow(|| match term {
        Lambda::Var(_) => false,
        Lambda::Abs(_, body) => reducible(body),
        Lambda::Apply(lhs, rhs) => {
            matches!(lhs.as_ref(), Lambda::Abs(_, _)) || reducible(lhs) || reducible(rhs)
        }
    })
}

/// One normal-order step: the leftmost-outermost redex is contracted.
/// `None` if the term is already in normal form.
pub fn reduce(term: &Lambda) -> Option<Lambda> {
    grow(|| match term {
        Lambda::Var(_) => None,
        Lambda::Abs(param, body) => {
            reduce(body).map(|body| Lambda::Abs(param.clone(), body.into()))
        }
        Lambda::Apply(lhs, rhs) => {
            if let Some(contracted) = beta(term) {
                return Some(contracted);
            }
            if let Some(lhs) = reduce(lhs) {
                return Some(Lambda::Apply(lhs.into(), rhs.clone()));
            }
            reduce(rhs).map(|rhs| Lambda::Apply(lhs.clone(), rhs.into()))
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{compiler::compile_term, parser::parse_all, term::pretty};

    macro_rules! var {
        ($x:expr) => {
            Lambda::Var(Identifier::new($x.to_string()))
        };
    }
    macro_rules! lambda {
        ($x:expr, $body:expr) => {
            Lambda::Abs(Identifier::new($x.to_string()), $body.into())
        };
    }
    macro_rules! apply {
        ($lhs:expr, $rhs:expr) => {
            Lambda::Apply($lhs.into(), $rhs.into())
        };
    }

    fn term(input: &str) -> Term {
        compile_term(&parse_all(input)[0]).unwrap()
    }

    fn show(term: &Lambda) -> String {
        pretty(&compress(term))
    }

    fn normalize(input: &str, budget: usize) -> String {
        let mut term = expand(&term(input));
        for _ in 0..budget {
            match reduce(&term) {
                Some(next) => term = next,
                None => return show(&term),
            }
        }
        panic!("{input} did not normalize within {budget} steps");
    }

    #[test]
    fn test_expand() {
        let expanded = expand(&term("(λ x y (f x y))"));
        assert_eq!(
            expanded,
            lambda!("x", lambda!("y", apply!(apply!(var!("f"), var!("x")), var!("y"))))
        );
        assert_eq!(expanded.to_string(), "(λ x (λ y ((f x) y)))");
        assert_eq!(show(&expanded), "(λ x y (f x y))");
    }

    #[test]
    fn test_compress_is_canonical() {
        for input in [
            "x",
            "(λ x (λ y x))",
            "(λ x y x)",
            "((f a) b c)",
            "(f (g a b) (λ x (λ y (x y z))))",
            "((λ x x) ((λ y y) z))",
        ] {
            let t = term(input);
            let once = compress(&expand(&t));
            let twice = compress(&expand(&once));
            assert_eq!(pretty(&once), pretty(&twice));
            assert_eq!(expand(&once), expand(&t));
        }
        assert_eq!(pretty(&compress(&expand(&term("(λ x (λ y x))")))), "(λ x y x)");
        assert_eq!(pretty(&compress(&expand(&term("((f a) b c)")))), "(f a b c)");
    }

    #[test]
    fn test_make_fresh() {
        let avoid = ["x", "x1", "y"]
            .iter()
            .map(|n| Identifier::new(n.to_string()))
            .collect::<FreeVarSet>();
        assert_eq!(make_fresh(&Identifier::new("z".into()), &avoid).as_str(), "z");
        assert_eq!(make_fresh(&Identifier::new("x".into()), &avoid).as_str(), "x2");
        assert_eq!(make_fresh(&Identifier::new("y".into()), &avoid).as_str(), "y1");
    }

    #[test]
    fn test_alpha() {
        let renamed = alpha(&lambda!("x", apply!(var!("x"), var!("y"))), "z".to_string().into());
        assert_eq!(renamed, lambda!("z", apply!(var!("z"), var!("y"))));
        assert_eq!(alpha(&var!("x"), "z".to_string().into()), var!("x"));
    }

    #[test]
    fn test_substitute_avoids_capture() {
        let base = lambda!("y", apply!(var!("y"), var!("x")));
        let result = substitute(&base, "x", &var!("y"));
        assert_ne!(result, lambda!("y", apply!(var!("y"), var!("y"))));
        assert_eq!(result, lambda!("y1", apply!(var!("y1"), var!("y"))));

        let shadowed = lambda!("x", var!("x"));
        assert_eq!(substitute(&shadowed, "x", &var!("z")), shadowed);

        // the fresh name must not capture a free `y1` of the body either
        let base = lambda!("y", apply!(apply!(var!("y1"), var!("x")), var!("y")));
        assert_eq!(
            substitute(&base, "x", &var!("y")),
            lambda!("y2", apply!(apply!(var!("y1"), var!("y")), var!("y2")))
        );
    }

    #[test]
    fn test_beta() {
        assert_eq!(beta(&apply!(lambda!("x", var!("x")), var!("y"))), Some(var!("y")));
        assert_eq!(beta(&apply!(var!("f"), var!("y"))), None);
        assert_eq!(beta(&var!("y")), None);
    }

    #[test]
    fn test_reducible() {
        assert!(!reducible(&var!("x")));
        assert!(!reducible(&apply!(var!("f"), lambda!("x", var!("x")))));
        assert!(reducible(&lambda!("x", apply!(lambda!("y", var!("y")), var!("x")))));
        assert!(reducible(&apply!(var!("f"), apply!(lambda!("y", var!("y")), var!("z")))));
    }

    #[test]
    fn test_normal_order() {
        // the argument diverges but is discarded before it is ever reduced
        assert_eq!(
            normalize("((λ x y y) ((λ x (x x)) (λ x (x x))) z)", 10),
            "z"
        );
        assert_eq!(normalize("(f ((λ x x) a) ((λ x x) b))", 10), "(f a b)");
        let mut t = expand(&term("(f ((λ x x) a) ((λ x x) b))"));
        t = reduce(&t).unwrap();
        assert_eq!(show(&t), "(f a ((λ x x) b))");
    }

    #[test]
    fn test_church_arithmetic() {
        assert_eq!(
            normalize(
                "((λ m n f x (m f (n f x))) (λ f x (f (f x))) (λ f x (f (f (f x)))))",
                100
            ),
            "(λ f x (f (f (f (f (f x))))))"
        );
    }

    #[test]
    fn test_reduction_renames_bound_variables() {
        assert_eq!(normalize("((λ x y (x y)) y)", 10), "(λ y1 (y y1))");
        assert_eq!(normalize("(λ y ((λ x (λ y x)) y))", 10), "(λ y y1 y)");
    }

    #[test]
    fn test_deep_terms() {
        let depth = 5000;
        let nested = format!("{}x{}", "(f ".repeat(depth), ")".repeat(depth));
        let expanded = expand(&term(&nested));
        assert!(!reducible(&expanded));
        assert_eq!(show(&expanded), nested);

        let redex = expand(&term(&format!("((λ y y) {nested})")));
        assert!(reducible(&redex));
        let reduced = reduce(&redex).unwrap();
        assert!(reduce(&reduced).is_none());
        assert_eq!(show(&reduced), nested);
        assert_eq!(show(&substitute(&reduced, "x", &var!("z"))).len(), nested.len());
    }

    #[test]
    fn test_omega_keeps_its_shape() {
        let omega = expand(&term("((λ x (x x)) (λ x (x x)))"));
        let mut t = omega.clone();
        for _ in 0..100 {
            assert!(reducible(&t));
            t = reduce(&t).unwrap();
            assert_eq!(t, omega);
        }
    }

    #[test]
    fn test_pretty_is_injective_on_normal_forms() {
        let normal = [
            "x",
            "(λ x x)",
            "(λ x y x)",
            "(λ x (λ x x))",
            "(λ x y y)",
            "(f a b)",
            "(f (a b))",
            "((λ x x) y)",
        ]
        .iter()
        .filter_map(|input| compile_term(&parse_all(input)[0]).ok())
        .map(|t| expand(&t))
        .filter(|t| !reducible(t))
        .collect::<Vec<_>>();
        for (i, a) in normal.iter().enumerate() {
            for b in &normal[i + 1..] {
                assert_eq!(a == b, show(a) == show(b), "{a} vs {b}");
            }
        }
    }
}
