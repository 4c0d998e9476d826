pub mod eliminate_left_recursion;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod left_factoring;
pub mod ll1_parsing_table;
pub mod parse;
pub mod pretty_print;
pub mod recognizer;
pub mod symbol;

#[cfg(test)]
mod tests;

pub use error::GrammarError;
pub use grammar::Grammar;
pub use symbol::{NonTerminal, Production, Symbol};

pub const EPSILON: char = 'ε';
pub const END_MARK: char = '$';
/// Characters accepted as the empty-production marker in grammar text.
pub const EPSILON_MARKERS: [char; 2] = ['&', EPSILON];

/// Upper bound on productions generated while rewriting a single non-terminal.
pub const REWRITE_LIMIT: usize = 10_000;
