use super::{
    symbol::{NonTerminal, Production},
    Grammar, GrammarError, END_MARK,
};

/// Checks every line against `[A-Z]'*->body` before anything is built.
///
/// Lines are trimmed and blank lines dropped. The body is a run of single
/// character symbols without whitespace; it may be empty or consist of ε
/// markers only. Returns the surviving lines.
pub fn validate(grammar: &str) -> Result<Vec<&str>, GrammarError> {
    let mut lines = Vec::new();
    for (i, line) in grammar.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let invalid = || GrammarError::InvalidProduction {
            line: i + 1,
            content: line.to_string(),
        };
        let (left, right) = line.split_once("->").ok_or_else(invalid)?;
        if NonTerminal::parse(left).is_none() {
            return Err(invalid());
        }
        if right.chars().any(|c| c.is_whitespace()) {
            return Err(invalid());
        }
        if right.contains(END_MARK) {
            return Err(GrammarError::ReservedSymbol {
                line: i + 1,
                symbol: END_MARK,
            });
        }
        lines.push(line);
    }
    Ok(lines)
}

impl Grammar {
    /// Validates `grammar` as a whole, then loads it without rewriting.
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let lines = validate(grammar)?;
        let mut g = Self::new();
        for line in lines {
            g.add_line(line)?;
        }
        Ok(g)
    }

    /// Parses, rewrites into LL(1) shape and computes FIRST, FOLLOW and the table.
    pub fn build(grammar: &str) -> Result<Self, GrammarError> {
        let mut g = Self::parse(grammar)?;
        g.rewrite()?;
        g.calculate_first_follow();
        g.generate_ll1_table();
        Ok(g)
    }

    /// Replaces the current contents with `grammar`. On failure the instance is left empty.
    pub fn load(&mut self, grammar: &str) -> Result<(), GrammarError> {
        self.reset();
        *self = Self::build(grammar)?;
        Ok(())
    }

    /// Adds one `LHS->RHS` line. The body is stored with ε markers removed.
    pub fn add_line(&mut self, line: &str) -> Result<(), GrammarError> {
        let (left, right) = line.split_once("->").unwrap_or((line, ""));
        let left = NonTerminal::parse(left)
            .ok_or_else(|| GrammarError::MalformedNonTerminal(left.to_string()))?;
        self.add_non_terminal(left);
        self.add_production(left, Production::tokenize(right));
        Ok(())
    }
}
