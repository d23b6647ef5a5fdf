//! Fitch-style scoped derivations mapped onto the flat sequent checker
//!
//! A Fitch derivation nests assumption scopes; the checker itself is flat.
//! Every scope forwards its operations to the single sequent record owned
//! by the root, under the concatenation of all local contexts on the path
//! from the root to the scope. Nesting is bookkeeping for the author, not
//! a second proof mechanism.

use crate::{
    context::Gamma,
    proof::{Proof, Rule, Sequent},
    sentence::Sentence,
};
use std::fmt;

/// Index of a scope inside a [FitchProof](struct.FitchProof.html).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ScopeId(usize);

/// Error for requesting the sequent-style record from an inner scope.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct NotRootScope;

impl fmt::Display for NotRootScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "inner scopes do not have their own sequent-style proof")
    }
}

/// One assumption scope.
///
/// Scopes never own their subproofs or the sequent record; the arena in
/// [FitchProof](struct.FitchProof.html) owns every scope and the root's
/// record, which keeps ownership acyclic and makes "only the root may
/// append" structural.
#[derive(Debug)]
struct Scope {
    /// The enclosing scope, `None` for the root
    parent: Option<ScopeId>,
    /// Sentences assumed directly in this scope
    local: Gamma,
    /// Set once the local assumptions have been recorded; the local
    /// context is frozen from then on
    loaded: bool,
    /// The full path context, memoized at load time
    ambient: Option<Gamma>,
}

/// A tree of assumption scopes over a single sequent record.
#[derive(Debug)]
pub struct FitchProof {
    scopes: Vec<Scope>,
    store: Proof,
}

impl Default for FitchProof {
    fn default() -> FitchProof {
        FitchProof::new()
    }
}

impl FitchProof {
    /// Create a derivation with one open root scope.
    pub fn new() -> FitchProof {
        FitchProof {
            scopes: vec![Scope {
                parent: None,
                local: Gamma::new(),
                loaded: false,
                ambient: None,
            }],
            store: Proof::new(),
        }
    }

    /// The root scope.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Open a new subproof under the given scope.
    pub fn add_subproof(&mut self, parent: ScopeId) -> ScopeId {
        requires!(parent.0 < self.scopes.len());
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(parent),
            local: Gamma::new(),
            loaded: false,
            ambient: None,
        });
        id
    }

    /// Assume a sentence in the given scope.
    ///
    /// Fails (returns false) once the scope has been loaded: after the
    /// first conclusion, the hypothesis set is frozen.
    pub fn add_assumption(&mut self, scope: ScopeId, sentence: Sentence) -> bool {
        let scope = &mut self.scopes[scope.0];
        if scope.loaded {
            return false;
        }
        scope.local.push(sentence);
        true
    }

    /// The hypotheses in force at this scope: the concatenation of every
    /// local context on the path from the root down to it.
    pub fn context(&self, scope: ScopeId) -> Gamma {
        let entry = &self.scopes[scope.0];
        if let Some(gamma) = &entry.ambient {
            return gamma.clone();
        }
        match entry.parent {
            None => entry.local.clone(),
            Some(parent) => &self.context(parent) + &entry.local,
        }
    }

    /// Draw a conclusion in the given scope.
    ///
    /// The first conclusion loads the scope's assumptions (and those of
    /// all its ancestors) into the record; the candidate itself is then
    /// checked against the flat record under the full path context.
    /// Returns false when the rule's side condition fails.
    pub fn add_conclusion(&mut self, scope: ScopeId, sentence: Sentence, rule: Rule) -> bool {
        if !self.scopes[scope.0].loaded {
            self.load_assumptions(scope, &Gamma::new());
        }
        invariant!(self.scopes[scope.0].loaded);
        let gamma = self.context(scope);
        self.store.add_sequent(Sequent::new(gamma, sentence, rule))
    }

    /// Record the assumptions along the path to the root as axioms.
    ///
    /// Each level is recorded under the path context extended by
    /// `additional` (what the descendants assumed) and under the path
    /// context alone, so that later lookups match the exact context any
    /// descendant derived its facts under. Every visited scope is frozen.
    fn load_assumptions(&mut self, scope: ScopeId, additional: &Gamma) {
        let local = self.scopes[scope.0].local.clone();
        let extended = &local + additional;
        match self.scopes[scope.0].parent {
            None => {
                for sentence in &local {
                    self.store
                        .add_sequent(Sequent::new(local.clone(), sentence.clone(), Rule::Axiom));
                }
                for sentence in &extended {
                    self.store.add_sequent(Sequent::new(
                        extended.clone(),
                        sentence.clone(),
                        Rule::Axiom,
                    ));
                }
            }
            Some(parent) => {
                self.load_assumptions(parent, &extended);
                self.load_assumptions(parent, &local);
            }
        }
        let ambient = self.context(scope);
        let entry = &mut self.scopes[scope.0];
        entry.loaded = true;
        entry.ambient = Some(ambient);
    }

    /// Export the flat sequent record. Only the root owns one.
    pub fn sequent_style(&self, scope: ScopeId) -> Result<&Proof, NotRootScope> {
        if self.scopes[scope.0].parent.is_some() {
            return Err(NotRootScope);
        }
        Ok(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_sentence;

    fn s(text: &str) -> Sentence {
        parse_sentence(text).expect("test formula must parse")
    }

    #[test]
    fn implies_elim_at_the_root() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s("A")));
        assert!(fitch.add_assumption(root, s(r"A \implies C")));
        assert!(fitch.add_conclusion(root, s("C"), Rule::ImpliesElim));
    }

    #[test]
    fn and_intro_at_the_root() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s("B")));
        assert!(fitch.add_assumption(root, s(r"A \implies C")));
        assert!(fitch.add_conclusion(root, s(r"B \and (A \implies C)"), Rule::AndIntro));
    }

    #[test]
    fn or_elim_across_two_subproofs() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s(r"A \or B")));
        assert!(fitch.add_assumption(root, s(r"A \implies C")));
        assert!(fitch.add_assumption(root, s(r"B \implies C")));

        let first = fitch.add_subproof(root);
        assert!(fitch.add_assumption(first, s("A")));
        assert!(fitch.add_conclusion(first, s("C"), Rule::ImpliesElim));

        let second = fitch.add_subproof(root);
        assert!(fitch.add_assumption(second, s("B")));
        assert!(fitch.add_conclusion(second, s("C"), Rule::ImpliesElim));

        assert!(fitch.add_conclusion(root, s("C"), Rule::OrElim));
    }

    #[test]
    fn implies_intro_discharges_a_subproof() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s("R")));

        let inner = fitch.add_subproof(root);
        assert!(fitch.add_assumption(inner, s("L")));
        assert!(fitch.add_conclusion(inner, s(r"L \and R"), Rule::AndIntro));

        assert!(fitch.add_conclusion(root, s(r"L \implies (L \and R)"), Rule::ImpliesIntro));
    }

    #[test]
    fn discharge_fails_under_the_wrong_rule() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s("R")));

        let inner = fitch.add_subproof(root);
        assert!(fitch.add_assumption(inner, s("L")));
        assert!(fitch.add_conclusion(inner, s(r"L \and R"), Rule::AndIntro));

        assert!(!fitch.add_conclusion(
            root,
            s(r"L \implies (L \and R)"),
            Rule::ImpliesElim
        ));
    }

    #[test]
    fn excluded_middle_by_contradiction() {
        // Starting from nothing: assume not (A or not A), derive falsity
        // inside the nested scopes, and close with IP at the top.
        let mut fitch = FitchProof::new();
        let root = fitch.root();

        let outer = fitch.add_subproof(root);
        assert!(fitch.add_assumption(outer, s(r"\not (A \or (\not A))")));

        let inner = fitch.add_subproof(outer);
        assert!(fitch.add_assumption(inner, s("A")));
        assert!(fitch.add_conclusion(inner, s(r"A \or (\not A)"), Rule::OrIntro));
        assert!(fitch.add_conclusion(inner, s(r"\false"), Rule::NotElim));

        assert!(fitch.add_conclusion(outer, s(r"\not A"), Rule::NotIntro));
        assert!(fitch.add_conclusion(outer, s(r"A \or (\not A)"), Rule::OrIntro));
        assert!(fitch.add_conclusion(outer, s(r"\false"), Rule::NotElim));

        assert!(fitch.add_conclusion(root, s(r"A \or (\not A)"), Rule::Contradiction));
    }

    #[test]
    fn expand_cites_an_outer_fact_inside_a_subproof() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s("P")));

        let inner = fitch.add_subproof(root);
        assert!(fitch.add_assumption(inner, s("Q")));
        assert!(fitch.add_conclusion(inner, s("P"), Rule::Expand));
    }

    #[test]
    fn expand_fails_without_a_subset_witness() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s("P")));
        let inner = fitch.add_subproof(root);
        assert!(fitch.add_assumption(inner, s("Q")));
        assert!(!fitch.add_conclusion(inner, s("B"), Rule::Expand));
    }

    #[test]
    fn assumptions_freeze_after_the_first_conclusion() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s("A")));
        assert!(fitch.add_conclusion(root, s("A"), Rule::Axiom));
        assert!(!fitch.add_assumption(root, s("B")));
    }

    #[test]
    fn loading_a_subproof_freezes_its_ancestors() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s("A")));
        let inner = fitch.add_subproof(root);
        assert!(fitch.add_assumption(inner, s("B")));
        assert!(fitch.add_conclusion(inner, s("B"), Rule::Axiom));
        assert!(!fitch.add_assumption(root, s("C")));
    }

    #[test]
    fn context_concatenates_along_the_path() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s("A")));
        let middle = fitch.add_subproof(root);
        assert!(fitch.add_assumption(middle, s("B")));
        let leaf = fitch.add_subproof(middle);
        assert!(fitch.add_assumption(leaf, s("C")));
        assert_eq!(fitch.context(leaf).to_string(), "[A, B, C]");
    }

    #[test]
    fn only_the_root_exports_sequent_style() {
        let mut fitch = FitchProof::new();
        let root = fitch.root();
        assert!(fitch.add_assumption(root, s("A")));
        assert!(fitch.add_conclusion(root, s("A"), Rule::Axiom));
        let inner = fitch.add_subproof(root);
        assert_eq!(fitch.sequent_style(inner).err(), Some(NotRootScope));
        let record = fitch.sequent_style(root).expect("root owns the record");
        assert!(record.proof_exists(&fitch.context(root), &s("A")));
    }
}
