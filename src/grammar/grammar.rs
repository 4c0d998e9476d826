use indexmap::{IndexMap, IndexSet};

use super::{
    ll1_parsing_table::TableConflict,
    symbol::{NonTerminal, Production, Symbol},
};

pub type Productions = IndexSet<Production>;
pub type TerminalSet = IndexSet<char>;
pub type LL1Table = IndexMap<NonTerminal, IndexMap<char, Production>>;

#[derive(Debug, Clone, Default)]
pub struct Grammar {
    pub(crate) productions: IndexMap<NonTerminal, Productions>,
    pub(crate) order: Vec<NonTerminal>,
    pub(crate) non_terminals: IndexSet<NonTerminal>,
    pub(crate) terminals: TerminalSet,
    pub(crate) first: IndexMap<NonTerminal, TerminalSet>,
    pub(crate) follow: IndexMap<NonTerminal, TerminalSet>,
    pub(crate) table: LL1Table,
    pub(crate) conflicts: Vec<TableConflict>,
    /// Fresh non-terminal -> the one it was split off from.
    pub(crate) parents: IndexMap<NonTerminal, NonTerminal>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every production and every derived structure.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn start_symbol(&self) -> Option<NonTerminal> {
        self.order.first().copied()
    }

    pub fn order(&self) -> &[NonTerminal] {
        &self.order
    }

    pub fn non_terminals(&self) -> &IndexSet<NonTerminal> {
        &self.non_terminals
    }

    pub fn terminals(&self) -> &TerminalSet {
        &self.terminals
    }

    pub fn productions(&self, nt: NonTerminal) -> Option<&Productions> {
        self.productions.get(&nt)
    }

    /// Non-terminals paired with their productions, in Order.
    pub fn production_iter(&self) -> impl Iterator<Item = (NonTerminal, &Productions)> {
        self.order
            .iter()
            .filter_map(|nt| self.productions.get(nt).map(|p| (*nt, p)))
    }

    pub fn first(&self) -> &IndexMap<NonTerminal, TerminalSet> {
        &self.first
    }

    pub fn follow(&self) -> &IndexMap<NonTerminal, TerminalSet> {
        &self.follow
    }

    pub fn table(&self) -> &LL1Table {
        &self.table
    }

    pub fn table_entry(&self, nt: NonTerminal, terminal: char) -> Option<&Production> {
        self.table.get(&nt).and_then(|row| row.get(&terminal))
    }

    /// Cells overwritten while building the table.
    pub fn table_conflicts(&self) -> &[TableConflict] {
        &self.conflicts
    }

    /// Non-terminals used in some body but never given a production.
    pub fn undefined_non_terminals(&self) -> Vec<NonTerminal> {
        self.non_terminals
            .iter()
            .filter(|nt| !self.productions.contains_key(*nt))
            .copied()
            .collect()
    }

    pub fn production_count(&self) -> usize {
        self.productions.values().map(|ps| ps.len()).sum()
    }

    /// Whether `nt` was created, directly or through other fresh
    /// non-terminals, while rewriting `ancestor`.
    pub fn is_derived_from(&self, nt: NonTerminal, ancestor: NonTerminal) -> bool {
        let mut current = nt;
        while let Some(&parent) = self.parents.get(&current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    pub(crate) fn order_index(&self, nt: NonTerminal) -> Option<usize> {
        self.order.iter().position(|&o| o == nt)
    }

    pub(crate) fn add_non_terminal(&mut self, nt: NonTerminal) {
        if self.productions.contains_key(&nt) {
            return;
        }
        self.productions.insert(nt, IndexSet::new());
        self.non_terminals.insert(nt);
        self.order.push(nt);
    }

    pub(crate) fn add_production(&mut self, left: NonTerminal, right: Production) {
        self.classify(&right);
        self.productions.entry(left).or_default().insert(right);
    }

    pub(crate) fn classify(&mut self, production: &Production) {
        for symbol in production.symbols() {
            match symbol {
                Symbol::NonTerminal(nt) => {
                    self.non_terminals.insert(*nt);
                }
                Symbol::Terminal(c) => {
                    self.terminals.insert(*c);
                }
            }
        }
    }

    pub(crate) fn set_productions(&mut self, nt: NonTerminal, productions: Productions) {
        for p in &productions {
            self.classify(p);
        }
        self.productions.insert(nt, productions);
    }

    /// Creates `base'` (more primes if taken) and places it right after `base` in Order.
    pub(crate) fn fresh_non_terminal(&mut self, base: NonTerminal) -> NonTerminal {
        let mut nt = base.primed();
        while self.non_terminals.contains(&nt) {
            nt = nt.primed();
        }
        self.non_terminals.insert(nt);
        self.parents.insert(nt, base);
        let at = self.order_index(base).map_or(self.order.len(), |i| i + 1);
        self.order.insert(at, nt);
        self.productions.insert(nt, IndexSet::new());
        nt
    }
}
