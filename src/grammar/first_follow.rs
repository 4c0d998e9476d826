use super::{
    grammar::TerminalSet,
    symbol::{NonTerminal, Symbol},
    Grammar, END_MARK, EPSILON,
};

fn extend_counting(target: &mut TerminalSet, source: impl IntoIterator<Item = char>) -> bool {
    let before = target.len();
    target.extend(source);
    target.len() != before
}

impl Grammar {
    pub fn calculate_first_follow(&mut self) {
        self.calculate_first();
        self.calculate_follow();
    }

    /// FIRST of a single symbol against the current FIRST map.
    pub fn first_of_symbol(&self, symbol: Symbol) -> TerminalSet {
        match symbol {
            Symbol::Terminal(c) => std::iter::once(c).collect(),
            Symbol::NonTerminal(nt) => self.first.get(&nt).cloned().unwrap_or_default(),
        }
    }

    /// FIRST of a symbol string; contains ε iff every symbol is nullable.
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> TerminalSet {
        let mut first = TerminalSet::new();
        for symbol in symbols {
            let f = self.first_of_symbol(*symbol);
            let nullable = f.contains(&EPSILON);
            first.extend(f.into_iter().filter(|&c| c != EPSILON));
            if !nullable {
                return first;
            }
        }
        first.insert(EPSILON);
        first
    }

    pub fn is_nullable(&self, nt: NonTerminal) -> bool {
        self.first.get(&nt).map_or(false, |f| f.contains(&EPSILON))
    }

    /// Monotone fixed point; every set only grows, so mutual recursion converges.
    fn calculate_first(&mut self) {
        self.first = self
            .non_terminals
            .iter()
            .map(|nt| (*nt, TerminalSet::new()))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for nt in self.order.clone() {
                let first: TerminalSet = self.productions[&nt]
                    .iter()
                    .flat_map(|p| self.first_of_sequence(p.symbols()))
                    .collect();
                changed |= extend_counting(self.first.entry(nt).or_default(), first);
            }
        }
    }

    fn calculate_follow(&mut self) {
        self.follow = self
            .non_terminals
            .iter()
            .map(|nt| (*nt, TerminalSet::new()))
            .collect();
        let start = match self.start_symbol() {
            Some(s) => s,
            None => return,
        };
        self.follow[&start].insert(END_MARK);

        let mut changed = true;
        while changed {
            let mut additions: Vec<(NonTerminal, TerminalSet)> = Vec::new();
            for (left, productions) in self.production_iter() {
                for production in productions {
                    let symbols = production.symbols();
                    for (i, symbol) in symbols.iter().enumerate() {
                        let nt = match symbol.non_terminal() {
                            Some(nt) => nt,
                            None => continue,
                        };
                        let rest = self.first_of_sequence(&symbols[i + 1..]);
                        let mut addition: TerminalSet =
                            rest.iter().copied().filter(|&c| c != EPSILON).collect();
                        if rest.contains(&EPSILON) {
                            addition.extend(self.follow[&left].iter().copied());
                        }
                        additions.push((nt, addition));
                    }
                }
            }

            changed = false;
            for (nt, addition) in additions {
                changed |= extend_counting(self.follow.entry(nt).or_default(), addition);
            }
        }
    }
}
