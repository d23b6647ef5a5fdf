//! Formula representation for propositional logic

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

/// A binary connective.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    And,
    Or,
    Implies,
}

impl Operator {
    /// The canonical rendering token, as used in sequent output.
    pub fn token(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Implies => "IMPLIES",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A propositional formula.
///
/// Values are immutable once built; equality is deep structural equality.
/// The truth constants are their own variants, so `\true` never compares
/// equal to an atomic that happens to be named "TRUE".
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Sentence {
    /// A leaf proposition identified by name
    Atomic(String),
    /// The constant truth
    True,
    /// The constant falsity
    False,
    /// Negation of a formula
    Negation(Box<Sentence>),
    /// Two formulas joined by a binary connective
    Binary {
        left: Box<Sentence>,
        right: Box<Sentence>,
        op: Operator,
    },
}

/// Evaluation failure: a variable was missing from the assignment.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UnassignedVariable(pub String);

impl fmt::Display for UnassignedVariable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "variable {} not found in the assignment", self.0)
    }
}

impl Sentence {
    /// Create an atomic sentence with the given name.
    pub fn atom(name: &str) -> Sentence {
        Sentence::Atomic(name.to_string())
    }

    /// Wrap this sentence in a negation.
    pub fn negated(self) -> Sentence {
        Sentence::Negation(Box::new(self))
    }

    /// Join two sentences with a binary connective.
    pub fn binary(left: Sentence, op: Operator, right: Sentence) -> Sentence {
        Sentence::Binary {
            left: Box::new(left),
            right: Box::new(right),
            op,
        }
    }

    /// Compute the truth value under the given assignment.
    ///
    /// Implication is material: `IMPLIES(a, b)` is `!a || b`.
    pub fn evaluate(
        &self,
        assignment: &HashMap<String, bool>,
    ) -> Result<bool, UnassignedVariable> {
        match self {
            Sentence::Atomic(name) => assignment
                .get(name)
                .cloned()
                .ok_or_else(|| UnassignedVariable(name.clone())),
            Sentence::True => Ok(true),
            Sentence::False => Ok(false),
            Sentence::Negation(inner) => Ok(!inner.evaluate(assignment)?),
            Sentence::Binary { left, right, op } => {
                let l = left.evaluate(assignment)?;
                let r = right.evaluate(assignment)?;
                Ok(match op {
                    Operator::And => l && r,
                    Operator::Or => l || r,
                    Operator::Implies => !l || r,
                })
            }
        }
    }

    /// Collect the names of all atomics, excluding the truth constants.
    pub fn atomics(&self) -> HashSet<String> {
        let mut names = HashSet::new();
        self.collect_atomics(&mut names);
        names
    }

    fn collect_atomics(&self, names: &mut HashSet<String>) {
        match self {
            Sentence::Atomic(name) => {
                names.insert(name.clone());
            }
            Sentence::True | Sentence::False => (),
            Sentence::Negation(inner) => inner.collect_atomics(names),
            Sentence::Binary { left, right, .. } => {
                left.collect_atomics(names);
                right.collect_atomics(names);
            }
        }
    }
}

impl fmt::Display for Sentence {
    /// Fully parenthesized rendering with `AND`/`OR`/`IMPLIES`/`NOT` tokens.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sentence::Atomic(name) => write!(f, "{}", name),
            Sentence::True => write!(f, "TRUE"),
            Sentence::False => write!(f, "FALSE"),
            Sentence::Negation(inner) => write!(f, "(NOT {})", inner),
            Sentence::Binary { left, right, op } => write!(f, "({} {} {})", left, op, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(pairs: &[(&str, bool)]) -> HashMap<String, bool> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn evaluate_follows_the_truth_tables() {
        let a = Sentence::atom("A");
        let b = Sentence::atom("B");
        for &(l, r) in &[(false, false), (false, true), (true, false), (true, true)] {
            let env = assignment(&[("A", l), ("B", r)]);
            let and = Sentence::binary(a.clone(), Operator::And, b.clone());
            let or = Sentence::binary(a.clone(), Operator::Or, b.clone());
            let implies = Sentence::binary(a.clone(), Operator::Implies, b.clone());
            assert_eq!(and.evaluate(&env), Ok(l && r));
            assert_eq!(or.evaluate(&env), Ok(l || r));
            assert_eq!(implies.evaluate(&env), Ok(!l || r));
            assert_eq!(a.clone().negated().evaluate(&env), Ok(!l));
        }
    }

    #[test]
    fn constants_ignore_the_assignment() {
        let env = assignment(&[]);
        assert_eq!(Sentence::True.evaluate(&env), Ok(true));
        assert_eq!(Sentence::False.evaluate(&env), Ok(false));
    }

    #[test]
    fn missing_variable_is_reported() {
        let env = assignment(&[("A", true)]);
        let formula = Sentence::binary(Sentence::atom("A"), Operator::And, Sentence::atom("B"));
        assert_eq!(
            formula.evaluate(&env),
            Err(UnassignedVariable("B".to_string()))
        );
    }

    #[test]
    fn constants_are_not_name_based() {
        // An atomic that happens to be called TRUE is not the constant.
        assert_ne!(Sentence::atom("TRUE"), Sentence::True);
        assert_ne!(Sentence::atom("FALSE"), Sentence::False);
        assert_eq!(Sentence::True, Sentence::True);
    }

    #[test]
    fn equality_is_structural_and_ordered() {
        let ab = Sentence::binary(Sentence::atom("A"), Operator::And, Sentence::atom("B"));
        let ba = Sentence::binary(Sentence::atom("B"), Operator::And, Sentence::atom("A"));
        assert_eq!(
            ab,
            Sentence::binary(Sentence::atom("A"), Operator::And, Sentence::atom("B"))
        );
        assert_ne!(ab, ba);
        assert_ne!(
            ab,
            Sentence::binary(Sentence::atom("A"), Operator::Or, Sentence::atom("B"))
        );
    }

    #[test]
    fn atomics_exclude_the_constants() {
        let formula = Sentence::binary(
            Sentence::binary(Sentence::atom("A"), Operator::Or, Sentence::True),
            Operator::Implies,
            Sentence::atom("B").negated(),
        );
        let names = formula.atomics();
        assert_eq!(names.len(), 2);
        assert!(names.contains("A"));
        assert!(names.contains("B"));
    }

    #[test]
    fn rendering_is_fully_parenthesized() {
        let formula = Sentence::binary(
            Sentence::atom("A"),
            Operator::Implies,
            Sentence::binary(Sentence::atom("B"), Operator::Or, Sentence::False).negated(),
        );
        assert_eq!(formula.to_string(), "(A IMPLIES (NOT (B OR FALSE)))");
    }
}
