use std::fmt;

use serde::{Serialize, Serializer};

use super::{
    symbol::{NonTerminal, Production, Symbol},
    Grammar, END_MARK, REWRITE_LIMIT,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceAction {
    /// A terminal on the stack matched the next input symbol.
    Match,
    Apply(NonTerminal, Production),
    Error,
}

impl fmt::Display for TraceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceAction::Match => Ok(()),
            TraceAction::Apply(left, production) => write!(f, "{} -> {}", left, production),
            TraceAction::Error => write!(f, "Error"),
        }
    }
}

impl Serialize for TraceAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRow {
    /// Bottom to top.
    pub stack: String,
    /// Remaining input including the end marker.
    pub input: String,
    pub action: TraceAction,
}

impl TraceRow {
    fn new(stack: &[Symbol], input: &[char], action: TraceAction) -> Self {
        Self {
            stack: stack.iter().map(|s| s.to_string()).collect(),
            input: input.iter().collect(),
            action,
        }
    }

    pub fn to_plaintext(&self) -> String {
        format!("{}\t{}\t{}", self.stack, self.input, self.action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseTrace {
    pub rows: Vec<TraceRow>,
    pub accepted: bool,
}

impl ParseTrace {
    pub fn to_plaintext(&self) -> String {
        std::iter::once("Stack\tInput\tOutput".to_string())
            .chain(self.rows.iter().map(|row| row.to_plaintext()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Grammar {
    /// Runs the table-driven predictive parse of `input` (without end marker).
    ///
    /// A missing table entry, a terminal mismatch or a run of expansions
    /// that never reaches a terminal ends the run with an `Error` row; the
    /// string is accepted only if stack and input empty together.
    pub fn recognize(&self, input: &str) -> ParseTrace {
        let input: Vec<char> = input.chars().chain(std::iter::once(END_MARK)).collect();
        let mut stack: Vec<Symbol> = vec![Symbol::Terminal(END_MARK)];
        stack.extend(self.start_symbol().map(Symbol::NonTerminal));

        let mut rows = Vec::new();
        let mut pos = 0;
        let mut expansions = 0;
        while let Some(&top) = stack.last() {
            let remaining = &input[pos..];
            let head = remaining.first().copied();
            match top {
                Symbol::NonTerminal(nt) => {
                    expansions += 1;
                    // left recursion hidden behind nullable symbols survives rewriting
                    let entry = head
                        .and_then(|h| self.table_entry(nt, h))
                        .filter(|_| expansions <= REWRITE_LIMIT);
                    match entry {
                        Some(production) => {
                            rows.push(TraceRow::new(
                                &stack,
                                remaining,
                                TraceAction::Apply(nt, production.clone()),
                            ));
                            stack.pop();
                            stack.extend(production.symbols().iter().rev().copied());
                        }
                        None => {
                            rows.push(TraceRow::new(&stack, remaining, TraceAction::Error));
                            return ParseTrace {
                                rows,
                                accepted: false,
                            };
                        }
                    }
                }
                Symbol::Terminal(t) => {
                    if head != Some(t) {
                        rows.push(TraceRow::new(&stack, remaining, TraceAction::Error));
                        return ParseTrace {
                            rows,
                            accepted: false,
                        };
                    }
                    rows.push(TraceRow::new(&stack, remaining, TraceAction::Match));
                    stack.pop();
                    pos += 1;
                    expansions = 0;
                }
            }
        }

        // the end marker was matched early against a literal `$` in the input
        let accepted = pos == input.len();
        if !accepted {
            rows.push(TraceRow::new(&stack, &input[pos..], TraceAction::Error));
        }
        ParseTrace { rows, accepted }
    }
}
