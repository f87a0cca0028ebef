use std::cmp::Ordering;

use crate::{
    prelude::*,
    term::{Lambda, Term},
};

/// A set of names kept as a strictly increasing vector.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct FreeVarSet(Vec<Identifier>);

impl FreeVarSet {
    pub fn singleton(name: Identifier) -> Self {
        Self(vec![name])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.0.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn insert(&mut self, name: Identifier) {
        if let Err(i) = self.0.binary_search(&name) {
            self.0.insert(i, name);
        }
    }

    /// Merges two sorted sets in one pass.
    pub fn union(&self, other: &Self) -> Self {
        let mut lhs = self.0.iter().peekable();
        let mut rhs = other.0.iter().peekable();
        let mut ret = Vec::with_capacity(self.len() + other.len());
        loop {
            let next = match (lhs.peek(), rhs.peek()) {
                (Some(l), Some(r)) => match l.cmp(r) {
                    Ordering::Less => lhs.next(),
                    Ordering::Greater => rhs.next(),
                    Ordering::Equal => {
                        rhs.next();
                        lhs.next()
                    }
                },
                (Some(_), None) => lhs.next(),
                (None, Some(_)) => rhs.next(),
                (None, None) => break,
            };
            ret.extend(next.cloned());
        }
        Self(ret)
    }

    /// Names of `self` absent from `other`, each looked up by binary search.
    pub fn difference(&self, other: &Self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|n| !other.contains(n))
                .cloned()
                .collect(),
        )
    }
}

impl FromIterator<Identifier> for FreeVarSet {
    fn from_iter<T: IntoIterator<Item = Identifier>>(iter: T) -> Self {
        let mut names = iter.into_iter().collect::<Vec<_>>();
        names.sort();
        names.dedup();
        Self(names)
    }
}

impl std::fmt::Display for FreeVarSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        f.write_str("]")
    }
}

pub trait FreeVariables {
    fn free_variables(&self) -> FreeVarSet;
}

impl FreeVariables for Term {
    fn free_variables(&self) -> FreeVarSet {
        grow(|| match self {
            Term::Variable(name) => FreeVarSet::singleton(name.clone()),
            Term::Abstraction(params, body) => body
                .free_variables()
                .difference(&params.iter().cloned().collect()),
            Term::Application(func, args) => args
                .iter()
                .fold(func.free_variables(), |free, arg| {
                    free.union(&arg.free_variables())
                }),
        })
    }
}

impl FreeVariables for Lambda {
    fn free_variables(&self) -> FreeVarSet {
        grow(|| match self {
            Lambda::Var(name) => FreeVarSet::singleton(name.clone()),
            Lambda::Abs(param, body) => body
                .free_variables()
                .difference(&FreeVarSet::singleton(param.clone())),
            Lambda::Apply(lhs, rhs) => lhs.free_variables().union(&rhs.free_variables()),
        })
    }
}
