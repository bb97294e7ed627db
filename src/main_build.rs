// Copyright (C) 2020-2026 Andy Kurnia.

use wordgraph::{build, error, lexicon, logging};

fn usage() -> error::Returns<()> {
    Err("usage: buildlex [--strict] [--accept-any] <lexicon-file> <output-dawg-file>\n  \
         writes gzip when the output ends in .gz"
        .into())
}

pub fn main() -> error::Returns<()> {
    logging::init();
    let mut strict = false;
    let mut config = lexicon::LexiconConfig::default();
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--strict" => strict = true,
            "--accept-any" => config.invalid_char_policy = lexicon::InvalidCharPolicy::Accept,
            "--help" | "-h" => return usage(),
            _ if arg.starts_with("--") => {
                wordgraph::return_error!(format!("unknown option {:?}", arg));
            }
            _ => paths.push(arg),
        }
    }
    let [input_path, output_path] = &paths[..] else {
        return usage();
    };

    let t0 = std::time::Instant::now();
    let lexicon = lexicon::read_file(input_path, &config)?;
    if strict && !lexicon.report.rejected.is_empty() {
        for rejected in &lexicon.report.rejected {
            eprintln!("{}:{}: {:?}: {}", input_path, rejected.line, rejected.text, rejected.reason);
        }
        wordgraph::return_error!(format!(
            "{} words rejected in strict mode",
            lexicon.report.rejected.len()
        ));
    }
    let (bytes, stats) = build::build(build::BuildFormat::for_path(output_path), &lexicon.words)?;
    if let Err(e) = std::fs::write(output_path, &bytes) {
        wordgraph::return_error!(format!("cannot write {}: {}", output_path, e));
    }
    println!(
        "{} words ({} duplicates, {} rejected), {} trie nodes, {} live, {} bytes",
        stats.words,
        lexicon.report.duplicates,
        lexicon.report.rejected.len(),
        stats.trie_nodes,
        stats.live_nodes,
        stats.bytes
    );
    println!("time taken: {:?}", t0.elapsed());
    Ok(())
}
