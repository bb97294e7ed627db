// Copyright (C) 2020-2026 Andy Kurnia.

// https://github.com/kkawakam/rustyline/blob/master/examples/example.rs

use super::explorer;
use rustyline::completion::{Completer, FilenameCompleter, Pair};

pub static SHELL_COMMANDS: &[&str] = &["exit", "help", "source"];

#[derive(
    rustyline_derive::Helper, rustyline_derive::Hinter, rustyline_derive::Validator,
)]
pub struct MyHelper {
    filename_completer: FilenameCompleter,
    #[rustyline(Hinter)]
    hinter: rustyline::hint::HistoryHinter,
}

impl MyHelper {
    fn command_names() -> impl Iterator<Item = &'static str> {
        explorer::COMMANDS
            .iter()
            .map(|&(name, _, _)| name)
            .chain(SHELL_COMMANDS.iter().copied())
    }
}

impl Completer for MyHelper {
    type Candidate = Pair;

    // command names for the first word, file names after that.
    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        if before.trim_start().contains(char::is_whitespace) {
            return self.filename_completer.complete(line, pos, ctx);
        }
        let start = before.len() - before.trim_start().len();
        let typed = &before[start..];
        let mut candidates = Self::command_names()
            .filter(|name| name.starts_with(typed))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{} ", name),
            })
            .collect::<Vec<_>>();
        candidates.sort_by(|a, b| a.display.cmp(&b.display));
        Ok((start, candidates))
    }
}

impl rustyline::highlight::Highlighter for MyHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> std::borrow::Cow<'h, str> {
        std::borrow::Cow::Owned("\x1b[1m".to_owned() + hint + "\x1b[m")
    }
}

pub type MyEditor = rustyline::Editor<MyHelper, rustyline::history::DefaultHistory>;

pub fn new_rl_editor() -> rustyline::Result<MyEditor> {
    let mut rl = MyEditor::new()?;
    rl.set_helper(Some(MyHelper {
        filename_completer: FilenameCompleter::new(),
        hinter: rustyline::hint::HistoryHinter::new(),
    }));
    Ok(rl)
}
