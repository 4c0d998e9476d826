use crowbook_text_processing::escape::tex as escape_tex;
use indexmap::IndexMap;
use serde::Serialize;

use super::{
    symbol::{NonTerminal, Production},
    Grammar, END_MARK, EPSILON,
};

/// A table cell that was written twice with different productions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableConflict {
    pub non_terminal: NonTerminal,
    pub terminal: char,
    pub replaced: Production,
    pub winner: Production,
}

impl Grammar {
    /// Fills the predictive table from FIRST and FOLLOW. A cell written twice
    /// keeps the last production; the overwrite is recorded in `table_conflicts`.
    pub fn generate_ll1_table(&mut self) {
        let mut table: IndexMap<NonTerminal, IndexMap<char, Production>> = IndexMap::new();
        let mut conflicts = Vec::new();

        for (left, productions) in self.production_iter() {
            let row = table.entry(left).or_default();
            for production in productions {
                let first = self.first_of_sequence(production.symbols());
                let mut lookaheads: Vec<char> =
                    first.iter().copied().filter(|&c| c != EPSILON).collect();
                if first.contains(&EPSILON) {
                    if let Some(follow) = self.follow.get(&left) {
                        lookaheads.extend(follow.iter().copied());
                    }
                }

                for terminal in lookaheads {
                    if let Some(replaced) = row.insert(terminal, production.clone()) {
                        if &replaced != production {
                            conflicts.push(TableConflict {
                                non_terminal: left,
                                terminal,
                                replaced,
                                winner: production.clone(),
                            });
                        }
                    }
                }
            }
        }

        self.table = table;
        self.conflicts = conflicts;
    }

    /// Table columns: every terminal followed by the end marker.
    pub fn table_columns(&self) -> Vec<char> {
        self.terminals
            .iter()
            .copied()
            .chain(std::iter::once(END_MARK))
            .collect()
    }

    pub fn to_ll1_parsing_table(&self) -> LL1ParsingTable {
        let terminals = self.table_columns();
        let rows = self
            .order
            .iter()
            .map(|nt| {
                let row = self.table.get(nt);
                (
                    *nt,
                    terminals
                        .iter()
                        .map(|t| row.and_then(|r| r.get(t)).cloned())
                        .collect(),
                )
            })
            .collect();
        LL1ParsingTable { terminals, rows }
    }
}

#[derive(Serialize)]
pub struct LL1ParsingTable {
    terminals: Vec<char>,
    rows: Vec<(NonTerminal, Vec<Option<Production>>)>,
}

impl LL1ParsingTable {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(row.iter().map(|cell| match cell {
                Some(production) => format!("{} -> {}", left, production),
                None => String::new(),
            }));
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| {
                output
                    .iter()
                    .map(|line| line[j].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|t| format!("\\text{{{}}}", escape_tex(t.to_string()))),
        );
        let header = header.join(" & ");

        let output = self
            .rows
            .iter()
            .map(|(left, row)| {
                let left = escape_tex(left.to_string()).to_string();
                std::iter::once(left.clone())
                    .chain(row.iter().map(|cell| match cell {
                        Some(production) => format!(
                            "{} \\rightarrow {}",
                            left,
                            escape_tex(production.to_string()).replace(EPSILON, "\\epsilon")
                        ),
                        None => String::new(),
                    }))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}
