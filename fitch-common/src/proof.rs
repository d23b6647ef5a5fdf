//! Sequent record and the flat rule checker

use crate::{
    context::Gamma,
    sentence::{Operator, Sentence},
};
use static_assertions::const_assert;
use std::{fmt, mem::size_of};

/// The inference rules of the calculus.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Rule {
    Axiom,
    AndIntro,
    AndElim,
    OrIntro,
    OrElim,
    ImpliesIntro,
    ImpliesElim,
    NotIntro,
    NotElim,
    TrueIntro,
    FalseElim,
    Expand,
    Contradiction,
}

impl Rule {
    /// Look up a rule by its two-letter derivation code.
    ///
    /// Unknown codes are rejected here, so the checker itself only ever
    /// sees members of the closed enumeration.
    pub fn from_code(code: &str) -> Option<Rule> {
        match code {
            "AX" => Some(Rule::Axiom),
            "AI" => Some(Rule::AndIntro),
            "AE" => Some(Rule::AndElim),
            "OI" => Some(Rule::OrIntro),
            "OE" => Some(Rule::OrElim),
            "II" => Some(Rule::ImpliesIntro),
            "IE" => Some(Rule::ImpliesElim),
            "NI" => Some(Rule::NotIntro),
            "NE" => Some(Rule::NotElim),
            "TI" => Some(Rule::TrueIntro),
            "FE" => Some(Rule::FalseElim),
            "EX" => Some(Rule::Expand),
            "IP" => Some(Rule::Contradiction),
            _ => None,
        }
    }

    /// The two-letter code used in derivation text.
    pub fn code(self) -> &'static str {
        match self {
            Rule::Axiom => "AX",
            Rule::AndIntro => "AI",
            Rule::AndElim => "AE",
            Rule::OrIntro => "OI",
            Rule::OrElim => "OE",
            Rule::ImpliesIntro => "II",
            Rule::ImpliesElim => "IE",
            Rule::NotIntro => "NI",
            Rule::NotElim => "NE",
            Rule::TrueIntro => "TI",
            Rule::FalseElim => "FE",
            Rule::Expand => "EX",
            Rule::Contradiction => "IP",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// State the sizes of data types.
#[allow(dead_code)]
fn assert_primitive_sizes() {
    const_assert!(size_of::<Rule>() == 1);
}

/// A validated claim "gamma proves conclusion via rule".
///
/// Created only by successful validation and never mutated afterwards.
#[derive(Debug, PartialEq, Clone)]
pub struct Sequent {
    pub gamma: Gamma,
    pub conclusion: Sentence,
    pub rule: Rule,
}

impl Sequent {
    pub fn new(gamma: Gamma, conclusion: Sentence, rule: Rule) -> Sequent {
        Sequent {
            gamma,
            conclusion,
            rule,
        }
    }
}

impl fmt::Display for Sequent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} proves {} :{}", self.gamma, self.conclusion, self.rule)
    }
}

/// An append-only record of validated sequents.
///
/// The only mutation is [add_sequent](struct.Proof.html#method.add_sequent),
/// which appends exactly when validation succeeds. All rule checks are
/// existential scans over the record, so duplicate entries are harmless.
#[derive(Debug, Default)]
pub struct Proof {
    sequents: Vec<Sequent>,
}

impl Proof {
    /// Create an empty record.
    pub fn new() -> Proof {
        Proof::default()
    }

    /// The number of recorded sequents.
    pub fn len(&self) -> usize {
        self.sequents.len()
    }

    /// Return true if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.sequents.is_empty()
    }

    /// The recorded sequents, in insertion order.
    pub fn sequents(&self) -> &[Sequent] {
        &self.sequents
    }

    /// The fundamental query: has `conclusion` been proved under a context
    /// equal (as a set) to `gamma`?
    pub fn proof_exists(&self, gamma: &Gamma, conclusion: &Sentence) -> bool {
        self.sequents
            .iter()
            .any(|sequent| sequent.gamma == *gamma && sequent.conclusion == *conclusion)
    }

    /// Validate a candidate and append it on success.
    ///
    /// Returns false when the rule's side condition fails; a false result
    /// leaves the record untouched.
    pub fn add_sequent(&mut self, sequent: Sequent) -> bool {
        if self.check_sequent(&sequent) {
            self.sequents.push(sequent);
            true
        } else {
            false
        }
    }

    /// Rule-dispatched validation of a candidate against the record.
    ///
    /// Total over well-typed candidates: a conclusion of the wrong shape
    /// for the rule is a plain failure, never a panic. Where several prior
    /// sequents could serve as a witness, any one of them suffices.
    fn check_sequent(&self, candidate: &Sequent) -> bool {
        let gamma = &candidate.gamma;
        match candidate.rule {
            Rule::Axiom => gamma.contains(&candidate.conclusion),

            Rule::AndIntro => match &candidate.conclusion {
                Sentence::Binary {
                    left,
                    right,
                    op: Operator::And,
                } => self.proof_exists(gamma, left) && self.proof_exists(gamma, right),
                _ => false,
            },

            Rule::AndElim => self.sequents.iter().any(|sequent| {
                match &sequent.conclusion {
                    Sentence::Binary {
                        left,
                        right,
                        op: Operator::And,
                    } => {
                        sequent.gamma == *gamma
                            && (**left == candidate.conclusion
                                || **right == candidate.conclusion)
                    }
                    _ => false,
                }
            }),

            Rule::OrIntro => match &candidate.conclusion {
                Sentence::Binary {
                    left,
                    right,
                    op: Operator::Or,
                } => self.proof_exists(gamma, left) || self.proof_exists(gamma, right),
                _ => false,
            },

            // Search over every recorded disjunction under this context,
            // not just the first.
            Rule::OrElim => self
                .sequents
                .iter()
                .filter(|sequent| sequent.gamma == *gamma)
                .filter_map(|sequent| match &sequent.conclusion {
                    Sentence::Binary {
                        left,
                        right,
                        op: Operator::Or,
                    } => Some((left, right)),
                    _ => None,
                })
                .any(|(left, right)| {
                    self.proof_exists(&(gamma + (**left).clone()), &candidate.conclusion)
                        && self.proof_exists(&(gamma + (**right).clone()), &candidate.conclusion)
                }),

            Rule::ImpliesIntro => match &candidate.conclusion {
                Sentence::Binary {
                    left,
                    right,
                    op: Operator::Implies,
                } => self.proof_exists(&(gamma + (**left).clone()), right),
                _ => false,
            },

            Rule::ImpliesElim => self.sequents.iter().any(|sequent| {
                match &sequent.conclusion {
                    Sentence::Binary {
                        left,
                        right,
                        op: Operator::Implies,
                    } => {
                        sequent.gamma == *gamma
                            && **right == candidate.conclusion
                            && self.proof_exists(gamma, left)
                    }
                    _ => false,
                }
            }),

            Rule::NotIntro => match &candidate.conclusion {
                Sentence::Negation(inner) => {
                    self.proof_exists(&(gamma + (**inner).clone()), &Sentence::False)
                }
                _ => false,
            },

            Rule::NotElim => {
                candidate.conclusion == Sentence::False
                    && self.sequents.iter().any(|sequent| {
                        sequent.gamma == *gamma
                            && self.proof_exists(gamma, &sequent.conclusion.clone().negated())
                    })
            }

            Rule::TrueIntro => candidate.conclusion == Sentence::True,

            Rule::FalseElim => self.proof_exists(gamma, &Sentence::False),

            Rule::Expand => self.sequents.iter().any(|sequent| {
                sequent.gamma.is_subset_of(gamma) && sequent.conclusion == candidate.conclusion
            }),

            Rule::Contradiction => self.proof_exists(
                &(gamma + candidate.conclusion.clone().negated()),
                &Sentence::False,
            ),
        }
    }
}
