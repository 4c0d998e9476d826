use super::{
    left_factoring::longest_common_prefix, parse::validate, recognizer::TraceAction, Grammar,
    GrammarError, NonTerminal, Production, END_MARK, EPSILON,
};

fn nt(name: &str) -> NonTerminal {
    NonTerminal::parse(name).unwrap()
}

fn p(body: &str) -> Production {
    Production::tokenize(body)
}

fn bodies(g: &Grammar, name: &str) -> Vec<String> {
    let mut v: Vec<String> = g
        .productions(nt(name))
        .unwrap()
        .iter()
        .map(|p| p.to_string())
        .collect();
    v.sort();
    v
}

fn sorted(set: Option<&indexmap::IndexSet<char>>) -> Vec<char> {
    let mut v: Vec<char> = set.unwrap().iter().copied().collect();
    v.sort();
    v
}

/// Checks the shape every rewritten grammar must have.
fn assert_ll1_shape(g: &Grammar) {
    for (left, productions) in g.production_iter() {
        assert!(!productions.is_empty(), "{} has no productions", left);
        assert!(
            !productions.iter().any(|p| p.starts_with_non_terminal(left)),
            "{} is still left recursive",
            left
        );
        assert!(
            longest_common_prefix(productions).is_epsilon(),
            "{} still has a common prefix",
            left
        );
    }

    let start = g.start_symbol().unwrap();
    assert!(g.follow()[&start].contains(&END_MARK));

    for (left, row) in g.table() {
        for (terminal, production) in row {
            let first = g.first_of_sequence(production.symbols());
            let by_first = *terminal != EPSILON && first.contains(terminal);
            let by_follow = first.contains(&EPSILON) && g.follow()[left].contains(terminal);
            assert!(by_first || by_follow, "({}, {}) -> {}", left, terminal, production);
        }
    }
}

const LIST: &str = "S->(L)\nS->a\nL->L,S\nL->S";
const EXPR: &str = "E->E+T\nE->T\nT->id";

#[test]
fn list_grammar_removes_left_recursion() {
    let g = Grammar::build(LIST).unwrap();
    assert_eq!(g.order(), &[nt("S"), nt("L"), nt("L'")]);
    assert_eq!(bodies(&g, "S"), vec!["(L)", "a"]);
    assert_eq!(bodies(&g, "L"), vec!["SL'"]);
    assert_eq!(bodies(&g, "L'"), vec![",SL'", "ε"]);
    assert_ll1_shape(&g);
}

#[test]
fn list_grammar_accepts_balanced_list() {
    let g = Grammar::build(LIST).unwrap();
    let trace = g.recognize("(a,a)");
    assert!(trace.accepted);
    assert!(trace.rows.iter().all(|r| r.action != TraceAction::Error));
    let last = trace.rows.last().unwrap();
    assert_eq!(last.stack, "$");
    assert_eq!(last.input, "$");
}

#[test]
fn list_grammar_rejects_missing_paren() {
    let g = Grammar::build(LIST).unwrap();
    let trace = g.recognize("(a,a");
    assert!(!trace.accepted);
    let last = trace.rows.last().unwrap();
    assert_eq!(last.action, TraceAction::Error);
    assert_eq!(last.input, "$");
    assert!(last.stack.contains(')'));
}

#[test]
fn expression_grammar() {
    let g = Grammar::build(EXPR).unwrap();
    assert_eq!(bodies(&g, "E"), vec!["TE'"]);
    assert_eq!(bodies(&g, "E'"), vec!["+TE'", "ε"]);
    assert_eq!(sorted(g.first().get(&nt("E"))), vec!['i']);
    assert_eq!(sorted(g.first().get(&nt("E'"))), vec!['+', EPSILON]);
    assert_eq!(sorted(g.follow().get(&nt("E"))), vec!['$']);
    assert_eq!(sorted(g.follow().get(&nt("E'"))), vec!['$']);
    assert_eq!(sorted(g.follow().get(&nt("T"))), vec!['$', '+']);
    assert!(g.table_conflicts().is_empty());
    assert_ll1_shape(&g);
}

#[test]
fn expression_grammar_recognition() {
    let g = Grammar::build(EXPR).unwrap();
    assert!(g.recognize("id+id+id").accepted);
    assert!(g.recognize("id").accepted);

    let trace = g.recognize("+id");
    assert!(!trace.accepted);
    assert_eq!(trace.rows.len(), 1);
    assert_eq!(trace.rows[0].action, TraceAction::Error);
    assert!(g.table_entry(nt("E"), '+').is_none());
}

#[test]
fn trace_plaintext_format() {
    let g = Grammar::build(EXPR).unwrap();
    let text = g.recognize("id").to_plaintext();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Stack\tInput\tOutput");
    assert_eq!(lines[1], "$E\tid$\tE -> TE'");
    assert_eq!(lines[2], "$E'T\tid$\tT -> id");
    assert_eq!(lines[3], "$E'di\tid$\t");
    assert_eq!(lines.last().unwrap(), &"$\t$\t");
}

#[test]
fn left_factoring_single_level() {
    let g = Grammar::build("A->ab\nA->ac").unwrap();
    assert_eq!(bodies(&g, "A"), vec!["aA'"]);
    assert_eq!(bodies(&g, "A'"), vec!["b", "c"]);
    assert!(g.table_entry(nt("A"), 'a').is_some());
    assert!(g.table_entry(nt("A'"), 'b').is_some());
    assert!(g.table_entry(nt("A'"), 'c').is_some());
    assert!(g.table_entry(nt("A"), 'b').is_none());
    assert!(g.table_entry(nt("A"), 'c').is_none());
    assert!(g.recognize("ac").accepted);
    assert!(!g.recognize("a").accepted);
}

#[test]
fn left_factoring_longest_prefix_first() {
    let g = Grammar::build("A->abc\nA->abd\nA->ae").unwrap();
    assert_eq!(g.order(), &[nt("A"), nt("A''"), nt("A'")]);
    assert_eq!(bodies(&g, "A"), vec!["aA''"]);
    assert_eq!(bodies(&g, "A''"), vec!["bA'", "e"]);
    assert_eq!(bodies(&g, "A'"), vec!["c", "d"]);
    assert_ll1_shape(&g);
    assert!(g.recognize("abd").accepted);
    assert!(g.recognize("ae").accepted);
}

#[test]
fn left_factoring_empty_remainder() {
    let g = Grammar::build("A->a\nA->ab").unwrap();
    assert_eq!(bodies(&g, "A'"), vec!["b", "ε"]);
    assert!(g.recognize("a").accepted);
    assert!(g.recognize("ab").accepted);
    assert!(!g.recognize("abb").accepted);
}

#[test]
fn recursion_tail_is_factored() {
    let g = Grammar::build("A->Aab\nA->Aac\nA->d").unwrap();
    assert_eq!(bodies(&g, "A"), vec!["dA'"]);
    assert_ll1_shape(&g);
    assert!(g.recognize("dabac").accepted);
}

#[test]
fn indirect_left_recursion() {
    let g = Grammar::build("S->Aa\nS->b\nA->Ac\nA->Sd\nA->e").unwrap();
    assert_eq!(bodies(&g, "S"), vec!["Aa", "b"]);
    assert_eq!(bodies(&g, "A"), vec!["bdA'", "eA'"]);
    assert_eq!(bodies(&g, "A'"), vec!["adA'", "cA'", "ε"]);
    assert_ll1_shape(&g);

    // still not LL(1): S -> b and S -> Aa both start with b
    assert_eq!(g.table_conflicts().len(), 2);
    assert_eq!(g.table_entry(nt("S"), 'b'), Some(&p("b")));
    assert!(g.recognize("eca").accepted);
    assert!(!g.recognize("bda").accepted);
}

#[test]
fn unneeded_substitution_is_folded_back() {
    let g = Grammar::build("S->a\nS->Bb\nA->Sc\nB->d").unwrap();
    assert_eq!(bodies(&g, "A"), vec!["Sc"]);
    assert_eq!(bodies(&g, "S"), vec!["Bb", "a"]);
}

#[test]
fn hidden_recursion_through_epsilon() {
    let g = Grammar::build("A->CB\nC->&\nB->CA\nB->b").unwrap();
    assert!(!g.is_directly_left_recursive(nt("B")));
    assert_ll1_shape(&g);
}

#[test]
fn wholly_recursive_non_terminal_keeps_a_production() {
    let g = Grammar::build("S->Aa\nA->Ab").unwrap();
    assert_eq!(bodies(&g, "A"), vec!["A'"]);
    assert_eq!(bodies(&g, "A'"), vec!["bA'", "ε"]);
}

#[test]
fn self_loop_is_dropped() {
    let g = Grammar::build("A->A\nA->a").unwrap();
    assert_eq!(bodies(&g, "A"), vec!["aA'"]);
    assert_eq!(bodies(&g, "A'"), vec!["ε"]);
}

#[test]
fn fresh_names_skip_taken_ones() {
    let g = Grammar::build("A->Ab\nA->A'\nA'->c").unwrap();
    assert!(g.order().contains(&nt("A''")));
    assert_eq!(bodies(&g, "A"), vec!["A'A''"]);
}

#[test]
fn mutual_recursion_first_sets_are_complete() {
    let g = Grammar::build("S->AB\nA->aS\nA->&\nB->b").unwrap();
    assert_eq!(sorted(g.first().get(&nt("A"))), vec!['a', EPSILON]);
    assert_eq!(sorted(g.first().get(&nt("S"))), vec!['a', 'b']);
    assert_eq!(sorted(g.follow().get(&nt("A"))), vec!['b']);
    assert_eq!(sorted(g.follow().get(&nt("S"))), vec!['$', 'b']);
    assert!(g.recognize("abb").accepted);
}

#[test]
fn follow_skips_nullable_symbols() {
    let g = Grammar::build("S->XYz\nX->x\nY->y\nY->&").unwrap();
    assert_eq!(sorted(g.follow().get(&nt("X"))), vec!['y', 'z']);
    assert!(g.recognize("xz").accepted);
    assert!(g.recognize("xyz").accepted);
}

#[test]
fn table_scans_through_nullable_prefix() {
    let g = Grammar::build("S->Ab\nA->a\nA->&").unwrap();
    assert_eq!(g.table_entry(nt("S"), 'b'), Some(&p("Ab")));
    assert_eq!(g.table_entry(nt("A"), 'b'), Some(&Production::epsilon()));
    assert!(g.recognize("b").accepted);
}

#[test]
fn conflicting_cells_keep_last_write() {
    let g = Grammar::build("S->iEtSR\nS->a\nR->eS\nR->&\nE->b").unwrap();
    let conflicts = g.table_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].non_terminal, nt("R"));
    assert_eq!(conflicts[0].terminal, 'e');
    assert_eq!(conflicts[0].replaced, p("eS"));
    assert_eq!(g.table_entry(nt("R"), 'e'), Some(&Production::epsilon()));
}

#[test]
fn undefined_non_terminals_are_reported() {
    let g = Grammar::build("S->aB").unwrap();
    assert_eq!(g.undefined_non_terminals(), vec![nt("B")]);
    assert!(!g.recognize("a").accepted);
}

#[test]
fn recognition_is_idempotent() {
    let g = Grammar::build(LIST).unwrap();
    for input in ["(a,a)", "(a,a", "a", "", "((a),a)"] {
        assert_eq!(g.recognize(input), g.recognize(input));
    }
}

#[test]
fn literal_end_marker_in_input_rejects() {
    let g = Grammar::build("S->a").unwrap();
    let trace = g.recognize("a$a");
    assert!(!trace.accepted);
    assert_eq!(trace.rows.last().unwrap().action, TraceAction::Error);
}

#[test]
fn malformed_left_side_is_rejected_before_building() {
    assert!(validate("a->b").is_err());
    let mut g = Grammar::new();
    assert!(g.load("a->b").is_err());
    assert!(g.is_empty());
    assert!(g.terminals().is_empty());
}

#[test]
fn reload_does_not_leak_previous_grammar() {
    let mut g = Grammar::build(EXPR).unwrap();
    g.load("A->ab\nA->ac").unwrap();
    assert_eq!(g.order(), &[nt("A"), nt("A'")]);
    assert!(!g.terminals().contains(&'+'));
    assert!(g.first().get(&nt("E")).is_none());
    assert!(g.table().get(&nt("E")).is_none());
}

#[test]
fn outputs_follow_order() {
    let g = Grammar::build(EXPR).unwrap();
    let prod = g.to_production_output_vec().to_plaintext();
    assert!(prod.starts_with(" E -> TE'"));
    let table = g.to_ll1_parsing_table().to_plaintext();
    let rows: Vec<&str> = table.lines().collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[1].trim_start().starts_with("E |"));
    let nff = g.to_non_terminal_output_vec().to_plaintext();
    assert_eq!(nff.lines().next().unwrap(), "E | false | {i} | {$}");
}

#[test]
fn latex_escapes_epsilon() {
    let g = Grammar::build(EXPR).unwrap();
    assert!(g.to_production_output_vec().to_latex().contains("\\epsilon"));
    assert!(g.to_ll1_parsing_table().to_latex().contains("\\epsilon"));
}

#[test]
fn doubled_self_recursion_terminates() {
    let g = Grammar::build("A->AA").unwrap();
    assert_eq!(g.order(), &[nt("A"), nt("A'")]);
    assert_eq!(bodies(&g, "A"), vec!["A'"]);
    assert_eq!(bodies(&g, "A'"), vec!["AA'", "ε"]);
    assert!(g.is_derived_from(nt("A'"), nt("A")));
    assert!(!g.is_directly_left_recursive(nt("A'")));
}

#[test]
fn nullable_doubled_recursion_terminates() {
    let g = Grammar::build("S->SS\nS->").unwrap();
    assert_eq!(bodies(&g, "S"), vec!["S'"]);
    assert_eq!(bodies(&g, "S'"), vec!["SS'", "ε"]);
    assert!(g.recognize("").accepted);
}

#[test]
fn ambiguous_nullable_grammar_terminates() {
    match Grammar::build("S->BAA\nS->\nS->BB\nA->SA\nA->S\nB->\nB->A") {
        Ok(g) => {
            for (left, _) in g.production_iter() {
                assert!(!g.is_directly_left_recursive(left));
            }
        }
        Err(GrammarError::RewriteLimitExceeded(_)) => {}
        Err(e) => panic!("unexpected error: {}", e),
    }
}

#[test]
fn rewrite_stops_at_production_limit() {
    let mut g = Grammar::parse(EXPR).unwrap();
    assert_eq!(
        g.rewrite_within(2),
        Err(GrammarError::RewriteLimitExceeded(nt("E")))
    );
}

#[test]
fn substitution_stops_at_budget() {
    let mut g = Grammar::parse("S->Aa\nS->b\nA->Ac\nA->Sd\nA->e").unwrap();
    assert_eq!(
        g.eliminate_left_recursion_within(nt("A"), 1),
        Err(GrammarError::RewriteLimitExceeded(nt("A")))
    );
}

#[test]
fn factoring_stops_at_round_limit() {
    let mut g = Grammar::parse("A->abc\nA->abd\nA->ae").unwrap();
    assert_eq!(
        g.left_factor_within(nt("A"), 1),
        Err(GrammarError::RewriteLimitExceeded(nt("A")))
    );
    assert!(g.left_factor_within(nt("A"), 2).is_ok());
}

#[test]
fn hidden_recursion_in_table_is_rejected() {
    let g = Grammar::build("A->a\nA->CAx\nC->&").unwrap();
    assert_eq!(g.table_entry(nt("A"), 'a'), Some(&p("CAx")));
    let trace = g.recognize("a");
    assert!(!trace.accepted);
    assert_eq!(trace.rows.last().unwrap().action, TraceAction::Error);
}

#[test]
fn first_follow_latex_marks_epsilon_once() {
    let g = Grammar::build(EXPR).unwrap();
    let latex = g.to_non_terminal_output_vec().to_latex();
    assert!(latex.contains("+\\ $\\epsilon$"));
    assert!(!latex.contains("$$"));
}
