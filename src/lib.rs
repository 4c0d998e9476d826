extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{Grammar, GrammarError};

fn error_to_json(e: GrammarError) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    match crate::Grammar::build(grammar) {
        Ok(g) => g.to_non_terminal_output_vec().to_json(),
        Err(e) => error_to_json(e),
    }
}

#[wasm_bindgen]
pub fn grammar_to_json(grammar: &str) -> String {
    match crate::Grammar::build(grammar) {
        Ok(g) => serde_json::json!({
            "productions": g.to_production_output_vec(),
            "first_follow": g.to_non_terminal_output_vec(),
            "table": g.to_ll1_parsing_table(),
            "conflicts": g.table_conflicts(),
        })
        .to_string(),
        Err(e) => error_to_json(e),
    }
}

#[wasm_bindgen]
pub fn recognize_to_json(grammar: &str, input: &str) -> String {
    match crate::Grammar::build(grammar) {
        Ok(g) => g.recognize(input).to_json(),
        Err(e) => error_to_json(e),
    }
}
