use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    symbol::{NonTerminal, Production},
    Grammar, EPSILON,
};

fn tex(s: &str) -> String {
    escape::tex(s).replace(EPSILON, "\\epsilon")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput {
    pub left: NonTerminal,
    pub rights: Vec<Production>,
}

impl ProductionOutput {
    pub fn to_plaintext(&self, left_width: usize) -> String {
        let left = self.left.to_string();
        self.rights
            .iter()
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", left, right, width = left_width)
                } else {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        if self.rights.is_empty() {
            return String::new();
        }
        let right = self
            .rights
            .iter()
            .map(|right| tex(&right.to_string()))
            .collect::<Vec<_>>()
            .join(" \\mid ");
        format!("{} & \\rightarrow & {}", tex(&self.left.to_string()), right)
    }
}

#[derive(Serialize)]
pub struct ProductionOutputVec {
    productions: Vec<ProductionOutput>,
}

impl ProductionOutputVec {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.to_string().len())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex()))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let productions = self
            .production_iter()
            .map(|(left, rights)| ProductionOutput {
                left,
                rights: rights.iter().cloned().collect(),
            })
            .collect();
        ProductionOutputVec { productions }
    }
}

#[derive(Serialize)]
struct NonTerminalOutput {
    name: NonTerminal,
    nullable: bool,
    first: Vec<char>,
    follow: Vec<char>,
}

impl NonTerminalOutput {
    fn to_plaintext(&self) -> String {
        fn f(a: &[char]) -> String {
            format!(
                "{{{}}}",
                a.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
            )
        }
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[char]) -> String {
            a.iter()
                .map(|&c| match c {
                    EPSILON => r"$\epsilon$".to_string(),
                    c => escape::tex(c.to_string()).into_owned(),
                })
                .collect::<Vec<_>>()
                .join(r"\ ")
        }

        format!(
            "{} & {} & {} & {}",
            tex(&self.name.to_string()),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct NonTerminalOutputVec {
    data: Vec<NonTerminalOutput>,
}

impl NonTerminalOutputVec {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_latex(&self) -> String {
        let rows: Vec<String> = self.data.iter().map(|e| e.to_latex()).collect();
        format!(
            "\\begin{{tabular}}{{c|c|c|c}}\nSymbol & Nullable & First & Follow\\\\\\hline\n{}\\\\\n\\end{{tabular}}",
            rows.join("\\\\\n ")
        )
    }
}

impl Grammar {
    pub fn to_non_terminal_output_vec(&self) -> NonTerminalOutputVec {
        let data = self
            .order
            .iter()
            .map(|nt| {
                let mut first: Vec<char> = self
                    .first
                    .get(nt)
                    .map(|s| s.iter().copied().filter(|&c| c != EPSILON).collect())
                    .unwrap_or_default();
                let mut follow: Vec<char> = self
                    .follow
                    .get(nt)
                    .map(|s| s.iter().copied().collect())
                    .unwrap_or_default();
                first.sort();
                follow.sort();

                let nullable = self.is_nullable(*nt);
                if nullable {
                    first.push(EPSILON);
                }
                NonTerminalOutput {
                    name: *nt,
                    nullable,
                    first,
                    follow,
                }
            })
            .collect();
        NonTerminalOutputVec { data }
    }
}
