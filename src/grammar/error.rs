use std::fmt::Display;

use super::symbol::NonTerminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    InvalidProduction { line: usize, content: String },
    MalformedNonTerminal(String),
    ReservedSymbol { line: usize, symbol: char },
    RewriteLimitExceeded(NonTerminal),
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::InvalidProduction { line, content } => {
                write!(f, "Line {}: invalid production \"{}\"", line, content)
            }
            GrammarError::MalformedNonTerminal(name) => {
                write!(f, "\"{}\" is not a valid non-terminal", name)
            }
            GrammarError::ReservedSymbol { line, symbol } => {
                write!(f, "Line {}: \"{}\" is reserved", line, symbol)
            }
            GrammarError::RewriteLimitExceeded(nt) => {
                write!(f, "rewriting {} did not converge", nt)
            }
        }
    }
}

impl std::error::Error for GrammarError {}
