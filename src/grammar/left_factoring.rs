use indexmap::IndexSet;

use super::{
    symbol::{NonTerminal, Production},
    Grammar, GrammarError, REWRITE_LIMIT,
};

/// Longest common leading run over all pairs. The first pair reaching the
/// maximum wins.
pub fn longest_common_prefix(productions: &IndexSet<Production>) -> Production {
    let mut best: Option<(&Production, usize)> = None;
    for (i, a) in productions.iter().enumerate() {
        for b in productions.iter().skip(i + 1) {
            let len = a.common_prefix_len(b);
            if len > best.map_or(0, |(_, l)| l) {
                best = Some((a, len));
            }
        }
    }
    match best {
        Some((p, len)) => Production(p.0[..len].to_vec()),
        None => Production::epsilon(),
    }
}

impl Grammar {
    /// Pulls common prefixes of `nt`'s productions into fresh non-terminals
    /// until no two productions share a leading symbol.
    pub fn left_factor(&mut self, nt: NonTerminal) -> Result<(), GrammarError> {
        self.left_factor_within(nt, REWRITE_LIMIT)
    }

    pub(crate) fn left_factor_within(
        &mut self,
        nt: NonTerminal,
        limit: usize,
    ) -> Result<(), GrammarError> {
        for _ in 0..limit {
            let productions = match self.productions.get(&nt) {
                Some(ps) => ps.clone(),
                None => return Ok(()),
            };
            let prefix = longest_common_prefix(&productions);
            if prefix.is_epsilon() {
                return Ok(());
            }

            let prime = self.fresh_non_terminal(nt);
            let factored = prefix.then(prime);
            let mut updated = IndexSet::new();
            let mut remainders = IndexSet::new();
            for production in productions {
                if production.0.starts_with(&prefix.0) {
                    remainders.insert(Production(production.0[prefix.0.len()..].to_vec()));
                    updated.insert(factored.clone());
                } else {
                    updated.insert(production);
                }
            }
            self.set_productions(nt, updated);
            self.set_productions(prime, remainders);
        }
        Err(GrammarError::RewriteLimitExceeded(nt))
    }
}
