// Copyright (C) 2020-2026 Andy Kurnia.

use wordgraph::{dictionary, error, explorer, logging};

pub fn main() -> error::Returns<()> {
    logging::init();
    let args = std::env::args().collect::<Vec<_>>();
    if args.len() < 3 {
        let mut help = Vec::new();
        explorer::write_help(&mut help)?;
        wordgraph::return_error!(format!(
            "usage: lex <dawg-file> <command> [args...]\n{}",
            String::from_utf8_lossy(&help)
        ));
    }
    let dictionary = dictionary::Dictionary::load(&args[1])?;
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    explorer::run_command(&dictionary, &args[2..], &mut out)?;
    std::io::Write::flush(&mut out)?;
    Ok(())
}
