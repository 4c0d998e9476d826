use indexmap::IndexSet;

use super::{
    symbol::{NonTerminal, Production},
    Grammar, GrammarError, REWRITE_LIMIT,
};

/// One node of the substitution tree grown from a single production.
struct Expansion {
    production: Production,
    children: Vec<usize>,
}

impl Grammar {
    /// Removes left recursion and factors common prefixes, one non-terminal
    /// at a time in Order. Non-terminals created on the way are visited too.
    pub fn rewrite(&mut self) -> Result<(), GrammarError> {
        self.rewrite_within(REWRITE_LIMIT)
    }

    /// `rewrite` giving up once Order, the production count or the work on a
    /// single non-terminal exceeds `limit`.
    pub fn rewrite_within(&mut self, limit: usize) -> Result<(), GrammarError> {
        let mut i = 0;
        while i < self.order.len() {
            let nt = self.order[i];
            if self.order.len() > limit || self.production_count() > limit {
                return Err(GrammarError::RewriteLimitExceeded(nt));
            }
            self.eliminate_left_recursion_within(nt, limit)?;
            self.left_factor_within(nt, limit)?;
            i += 1;
        }
        Ok(())
    }

    /// Substitutes earlier non-terminals where that exposes `nt` on the left,
    /// then removes the direct recursion if any.
    pub fn eliminate_left_recursion(&mut self, nt: NonTerminal) -> Result<(), GrammarError> {
        self.eliminate_left_recursion_within(nt, REWRITE_LIMIT)
    }

    pub(crate) fn eliminate_left_recursion_within(
        &mut self,
        nt: NonTerminal,
        limit: usize,
    ) -> Result<(), GrammarError> {
        self.expand_earlier_non_terminals(nt, limit)?;
        if self.is_directly_left_recursive(nt) {
            self.remove_direct_left_recursion(nt);
        }
        Ok(())
    }

    pub fn is_directly_left_recursive(&self, nt: NonTerminal) -> bool {
        self.productions(nt)
            .map_or(false, |ps| ps.iter().any(|p| p.starts_with_non_terminal(nt)))
    }

    fn expand_earlier_non_terminals(
        &mut self,
        nt: NonTerminal,
        limit: usize,
    ) -> Result<(), GrammarError> {
        let index = match self.order_index(nt) {
            Some(i) => i,
            None => return Ok(()),
        };
        let old = self.productions.get(&nt).cloned().unwrap_or_default();
        let mut budget = limit;
        let mut expanded = IndexSet::new();
        for production in &old {
            expanded.extend(self.expand_production(nt, index, production, &mut budget)?);
        }
        self.set_productions(nt, expanded);
        Ok(())
    }

    /// Grows the substitution tree of `production` breadth first and folds
    /// back every branch that never puts `nt` in leading position. Every
    /// node spends one unit of `budget`.
    fn expand_production(
        &self,
        nt: NonTerminal,
        index: usize,
        production: &Production,
        budget: &mut usize,
    ) -> Result<Vec<Production>, GrammarError> {
        let mut nodes = vec![Expansion {
            production: production.clone(),
            children: Vec::new(),
        }];
        let mut next = 0;
        while next < nodes.len() {
            let head = nodes[next]
                .production
                .first_symbol()
                .and_then(|s| s.non_terminal());
            if let Some(head) = head.filter(|&h| self.is_expandable_into(h, nt, index)) {
                let derived: Vec<Production> = self.productions[&head]
                    .iter()
                    .map(|body| nodes[next].production.substitute_head(body))
                    .collect();
                if derived.len() > *budget {
                    return Err(GrammarError::RewriteLimitExceeded(nt));
                }
                *budget -= derived.len();
                for production in derived {
                    let child = nodes.len();
                    nodes[next].children.push(child);
                    nodes.push(Expansion {
                        production,
                        children: Vec::new(),
                    });
                }
            }
            next += 1;
        }
        Ok(fold(nt, &nodes, 0))
    }

    /// `head` is defined, precedes `nt` in Order and is not one of the
    /// non-terminals `nt` was split off from.
    fn is_expandable_into(&self, head: NonTerminal, nt: NonTerminal, index: usize) -> bool {
        self.order_index(head).map_or(false, |i| i < index)
            && self.productions.get(&head).map_or(false, |ps| !ps.is_empty())
            && !self.is_derived_from(nt, head)
    }

    /// `A -> A a | b` becomes `A -> b A'`, `A' -> a A' | ε`.
    fn remove_direct_left_recursion(&mut self, nt: NonTerminal) {
        let old = self.productions.get(&nt).cloned().unwrap_or_default();
        let prime = self.fresh_non_terminal(nt);

        let (recursive, base): (Vec<Production>, Vec<Production>) = old
            .into_iter()
            .partition(|p| p.starts_with_non_terminal(nt));

        let mut primed: IndexSet<Production> = recursive
            .into_iter()
            .map(|p| Production(p.0[1..].to_vec()))
            // A -> A derives nothing new
            .filter(|alpha| !alpha.is_epsilon())
            .map(|alpha| alpha.then(prime))
            .collect();
        primed.insert(Production::epsilon());

        let mut rest: IndexSet<Production> = base.iter().map(|beta| beta.then(prime)).collect();
        if rest.is_empty() {
            rest.insert(Production::epsilon().then(prime));
        }

        self.set_productions(nt, rest);
        self.set_productions(prime, primed);
    }
}

fn fold(nt: NonTerminal, nodes: &[Expansion], at: usize) -> Vec<Production> {
    let node = &nodes[at];
    if node.children.is_empty() {
        return vec![node.production.clone()];
    }
    let mut expanded = Vec::new();
    let mut unchanged = true;
    for &child in &node.children {
        let child_production = &nodes[child].production;
        let part = fold(nt, nodes, child);
        unchanged &= !child_production.starts_with_non_terminal(nt)
            && part.len() == 1
            && &part[0] == child_production;
        expanded.extend(part);
    }
    if unchanged {
        vec![node.production.clone()]
    } else {
        expanded
    }
}
