//! Enumeration of licensed inference candidates
//!
//! Enabled actions are the engine's initial actions (those of the starting
//! universe), its tactic actions, and every action named like a synthetic
//! axiom (`axiom<i>`). Applying each enabled action yields zero or more
//! candidate facts. Order follows the engine; acceptance built from the
//! result is set-based.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::csd::domain::Domain;

/// Names given to axioms incorporated during replay.
static SYNTHETIC_AXIOM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^axiom[0-9]+$").unwrap());

/// Name of the synthetic axiom for the verified block at `index`.
pub fn axiom_name(index: usize) -> String {
    format!("axiom{}", index)
}

#[derive(Debug, Clone, Default)]
pub struct ChoiceEnumerator {
    initial: HashSet<String>,
}

impl ChoiceEnumerator {
    /// Capture the initial and tactic actions of the starting universe.
    pub fn new<D: Domain>(domain: &D, start: &D::Universe) -> Self {
        let mut initial: HashSet<String> = domain.derivation_actions(start).into_iter().collect();
        initial.extend(domain.tactic_actions());
        Self { initial }
    }

    pub fn is_enabled(&self, action: &str) -> bool {
        self.initial.contains(action) || SYNTHETIC_AXIOM.is_match(action)
    }

    /// Every candidate fact licensed in `universe`.
    pub fn enumerate<D: Domain>(&self, domain: &D, universe: &D::Universe) -> Vec<D::Choice> {
        let mut choices = Vec::new();
        for action in domain.derivation_actions(universe) {
            if !self.is_enabled(&action) {
                continue;
            }
            let produced = domain.apply(&action, universe);
            trace!(action = %action, count = produced.len(), "applied action");
            choices.extend(produced);
        }
        choices
    }
}
