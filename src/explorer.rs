// Copyright (C) 2020-2026 Andy Kurnia.

use super::{dictionary, error, graph::WordGraph};
use std::io::Write;

// name, args, description
pub static COMMANDS: &[(&str, &str, &str)] = &[
    ("word", "<word>...", "is each word in the dictionary"),
    ("sequence", "<letters>...", "does each occur inside some word"),
    ("anagrams", "<letters> [blank]", "words spelled from the letters, _ or ? is a blank"),
    ("arrangements", "<letters> [blank]", "sequences spelled from the letters"),
    ("list", "[prefix]", "every word, or every word with the prefix"),
    ("stats", "", "word and node counts"),
];

pub fn write_help(out: &mut dyn Write) -> std::io::Result<()> {
    for (name, args, description) in COMMANDS {
        writeln!(out, "  {:<13}{:<20}{}", name, args, description)?;
    }
    Ok(())
}

// The interactive shell's help, its own commands after the dictionary ones.
pub fn write_shell_help(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "commands:")?;
    write_help(out)?;
    for (name, args, description) in [
        ("source", "<file>", "run each line of a file"),
        ("help", "", "this"),
        ("exit", "", "leave"),
    ] {
        writeln!(out, "  {:<13}{:<20}{}", name, args, description)?;
    }
    Ok(())
}

fn write_found(
    out: &mut dyn Write,
    found: &std::collections::BTreeMap<String, String>,
) -> std::io::Result<()> {
    for (word, blanked) in found {
        if word == blanked {
            writeln!(out, "{}", word)?;
        } else {
            writeln!(out, "{} {}", word, blanked)?;
        }
    }
    writeln!(out, "{} found", found.len())
}

// the optional trailing argument of anagrams/arrangements.
fn parse_allow_blank(arg: Option<&String>) -> error::Returns<bool> {
    match arg.map(|s| s.as_str()) {
        None | Some("blank") | Some("true") | Some("1") => Ok(true),
        Some("noblank") | Some("false") | Some("0") => Ok(false),
        Some(other) => {
            return_error!(format!("expected blank or noblank, found {:?}", other));
        }
    }
}

// Runs one explorer command. args[0] is the command name.
pub fn run_command<S: AsRef<str>>(
    dictionary: &dictionary::Dictionary,
    args: &[S],
    out: &mut dyn Write,
) -> error::Returns<()> {
    let args = args.iter().map(|s| s.as_ref().to_string()).collect::<Vec<_>>();
    let Some(command) = args.first() else {
        return Ok(());
    };
    let rest = &args[1..];
    match command.as_str() {
        "word" => {
            if rest.is_empty() {
                return_error!("word needs at least one word".into());
            }
            for word in rest {
                let upper = word.to_uppercase();
                let verdict = if dictionary.has_word(&upper) { "yes" } else { "no" };
                writeln!(out, "{} {}", upper, verdict)?;
            }
        }
        "sequence" => {
            if rest.is_empty() {
                return_error!("sequence needs at least one argument".into());
            }
            for letters in rest {
                let upper = letters.to_uppercase();
                let verdict = if dictionary.has_sequence(&upper) { "yes" } else { "no" };
                writeln!(out, "{} {}", upper, verdict)?;
            }
        }
        "anagrams" | "arrangements" => {
            let Some(letters) = rest.first() else {
                return_error!(format!("{} needs letters", command));
            };
            let allow_blank = parse_allow_blank(rest.get(1))?;
            let found = if command == "anagrams" {
                dictionary.find_anagrams(letters, allow_blank)
            } else {
                dictionary.find_arrangements(letters, allow_blank)
            };
            write_found(out, &found)?;
        }
        "list" => {
            let prefix = rest.first().map(|s| s.to_uppercase()).unwrap_or_default();
            let mut count = 0usize;
            let mut write_result = Ok(());
            dictionary.each_word(|word| {
                if write_result.is_ok() && word.starts_with(prefix.as_str()) {
                    count += 1;
                    write_result = writeln!(out, "{}", word);
                }
            });
            write_result?;
            writeln!(out, "{} words", count)?;
        }
        "stats" => {
            writeln!(out, "words: {}", dictionary.word_count())?;
            writeln!(out, "records: {}", dictionary.nodes().len())?;
        }
        _ => {
            return_error!(format!("unknown command {:?}, try help", command));
        }
    }
    Ok(())
}
