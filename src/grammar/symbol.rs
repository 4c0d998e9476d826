use std::fmt;

use serde::{Serialize, Serializer};

use super::{EPSILON, EPSILON_MARKERS};

/// An uppercase letter followed by zero or more prime marks, e.g. `E` or `E''`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminal {
    pub letter: char,
    pub primes: usize,
}

impl NonTerminal {
    pub fn new(letter: char, primes: usize) -> Self {
        Self { letter, primes }
    }

    /// Parses a whole string matching `[A-Z]'*`.
    pub fn parse(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let letter = chars.next().filter(|c| c.is_ascii_uppercase())?;
        let mut primes = 0;
        for c in chars {
            if c != '\'' {
                return None;
            }
            primes += 1;
        }
        Some(Self::new(letter, primes))
    }

    pub fn primed(&self) -> Self {
        Self::new(self.letter, self.primes + 1)
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, "'".repeat(self.primes))
    }
}

impl Serialize for NonTerminal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    NonTerminal(NonTerminal),
    Terminal(char),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<NonTerminal> {
        match self {
            Symbol::NonTerminal(nt) => Some(*nt),
            Symbol::Terminal(_) => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::NonTerminal(nt) => write!(f, "{}", nt),
            Symbol::Terminal(c) => write!(f, "{}", c),
        }
    }
}

/// Right-hand side of a production. The empty body is the ε production.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Production(pub Vec<Symbol>);

impl Production {
    pub fn epsilon() -> Self {
        Self(Vec::new())
    }

    /// Splits a body into symbols with the `[A-Z]'*|.` rule, dropping ε markers.
    pub fn tokenize(body: &str) -> Self {
        let mut symbols = Vec::new();
        let mut chars = body.chars().peekable();
        while let Some(c) = chars.next() {
            if EPSILON_MARKERS.contains(&c) {
                continue;
            }
            if c.is_ascii_uppercase() {
                let mut primes = 0;
                while chars.next_if_eq(&'\'').is_some() {
                    primes += 1;
                }
                symbols.push(Symbol::NonTerminal(NonTerminal::new(c, primes)));
            } else {
                symbols.push(Symbol::Terminal(c));
            }
        }
        Self(symbols)
    }

    pub fn is_epsilon(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn first_symbol(&self) -> Option<Symbol> {
        self.0.first().copied()
    }

    pub fn starts_with_non_terminal(&self, nt: NonTerminal) -> bool {
        self.first_symbol() == Some(Symbol::NonTerminal(nt))
    }

    /// `self` with its first symbol replaced by `prefix`.
    pub fn substitute_head(&self, prefix: &Production) -> Production {
        Production(
            prefix
                .0
                .iter()
                .chain(self.0.iter().skip(1))
                .copied()
                .collect(),
        )
    }

    pub fn then(&self, nt: NonTerminal) -> Production {
        let mut symbols = self.0.clone();
        symbols.push(Symbol::NonTerminal(nt));
        Production(symbols)
    }

    pub fn common_prefix_len(&self, other: &Production) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_epsilon() {
            return write!(f, "{}", EPSILON);
        }
        for s in &self.0 {
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}

impl Serialize for Production {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
