use std::{fs, io::Read, process};

use ll1_helper::Grammar;

fn print_help() {
    println!("Usage: ll1-helper outputs [options] [grammar file]");
    println!("outputs:");
    println!("  prod: Productions after left recursion removal and left factoring");
    println!("  ff: First and follow sets");
    println!("  ll1: LL(1) parsing table");
    println!("  trace: Table-driven parse of every -i input");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -i <string>: Input to recognize (repeatable)");
}

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

fn to_json<T: serde::Serialize>(t: &T) -> String {
    serde_json::to_string(t).unwrap_or_else(|e| fail(e))
}

fn check_inputs(outputs: &[&str], inputs: &[&str]) -> Result<(), &'static str> {
    if outputs.contains(&"trace") && inputs.is_empty() {
        return Err("trace needs at least one -i <string>");
    }
    Ok(())
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut outputs: Vec<&str> = Vec::new();
    let mut inputs: Vec<&str> = Vec::new();
    let mut i: usize = 0;
    while i < args.len() && ["prod", "ff", "ll1", "trace"].contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    let mut output_format = OutputFormat::Plain;
    while i < args.len() && ["-h", "--help", "-l", "-j", "-i"].contains(&args[i].as_str()) {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-l" => output_format = OutputFormat::LaTeX,
            "-j" => output_format = OutputFormat::JSON,
            _ => {
                i += 1;
                match args.get(i) {
                    Some(input) => inputs.push(input.as_str()),
                    None => fail("-i needs an argument"),
                }
            }
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        return;
    }
    if let Err(e) = check_inputs(&outputs, &inputs) {
        fail(e);
    }

    let input: String = if i == args.len() {
        let mut s = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut s) {
            fail(e);
        }
        s
    } else {
        fs::read_to_string(args[i].as_str()).unwrap_or_else(|e| fail(e))
    };

    let g = Grammar::build(&input).unwrap_or_else(|e| fail(e));
    for nt in g.undefined_non_terminals() {
        eprintln!("warning: {} is used but never defined", nt);
    }

    for output in outputs {
        match output {
            "prod" => {
                let t = g.to_production_output_vec();
                println!(
                    "{}",
                    match output_format {
                        OutputFormat::Plain => t.to_plaintext(),
                        OutputFormat::LaTeX => t.to_latex(),
                        OutputFormat::JSON => to_json(&t),
                    }
                );
            }
            "ff" => {
                let t = g.to_non_terminal_output_vec();
                println!(
                    "{}",
                    match output_format {
                        OutputFormat::Plain => t.to_plaintext(),
                        OutputFormat::LaTeX => t.to_latex(),
                        OutputFormat::JSON => to_json(&t),
                    }
                );
            }
            "ll1" => {
                for c in g.table_conflicts() {
                    eprintln!(
                        "warning: M[{}, {}] = {} -> {} overwrote {} -> {}",
                        c.non_terminal,
                        c.terminal,
                        c.non_terminal,
                        c.winner,
                        c.non_terminal,
                        c.replaced
                    );
                }
                let t = g.to_ll1_parsing_table();
                println!(
                    "{}",
                    match output_format {
                        OutputFormat::Plain => t.to_plaintext(),
                        OutputFormat::LaTeX => t.to_latex(),
                        OutputFormat::JSON => to_json(&t),
                    }
                );
            }
            _ => {
                for input in &inputs {
                    let t = g.recognize(input);
                    match output_format {
                        OutputFormat::JSON => println!("{}", to_json(&t)),
                        _ => println!(
                            "{}\n{}",
                            t.to_plaintext(),
                            if t.accepted { "accepted" } else { "rejected" }
                        ),
                    }
                }
            }
        }
    }
}
