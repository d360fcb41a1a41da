use std::fs;

use anyhow::{Context, Result};
use fspc::{compile, CompileError};
use lts::aut::to_aut;

fn main() -> Result<()> {
    let path = std::env::args().nth(1).context("No source file provided")?;
    let out_prefix = std::env::args().nth(2);

    let source =
        fs::read_to_string(&path).with_context(|| format!("Failed to read source file {path}"))?;

    let now = std::time::Instant::now();
    let compiled = match compile(&source, true, true) {
        Ok(compiled) => compiled,
        Err(CompileError::Syntax(e)) => {
            eprintln!("Syntax error {e} at {}", e.location);
            std::process::exit(1);
        }
        Err(CompileError::Interpreter(e)) => {
            eprintln!("Error: {e} at {}", e.location);
            std::process::exit(1);
        }
    };
    println!("Compile took {:?}", now.elapsed());

    for automaton in &compiled.automata {
        let alphabet: Vec<String> =
            automaton.lts.alphabet().iter().map(|label| label.to_string()).collect();
        println!(
            "{}: {} nodes, {} edges, alphabet {{{}}}",
            automaton.name,
            automaton.lts.node_count(),
            automaton.lts.edge_count(),
            alphabet.join(", "),
        );

        if let Some(prefix) = &out_prefix {
            let out = format!("{prefix}{}.aut", automaton.name);
            fs::write(&out, to_aut(&automaton.lts))
                .with_context(|| format!("Failed to write {out}"))?;
        }
    }

    Ok(())
}
