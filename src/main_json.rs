// Copyright (C) 2020-2026 Andy Kurnia.

use std::sync::Arc;
use wordgraph::{dictionary, display, error, game_config, logging, search};

// language: en/english or pl/polish, selects alphabet and board.
// dictionary: path to a dawg file (raw or gzip).
// rack: letters, ? or _ for a blank.
// board: one string per row. uppercase is a tile, lowercase a blank, and
//   any of . * _ or space is an empty square. omit for an empty board.
// time_budget_ms: stop searching after this long, keeping the best so far.
#[derive(serde::Deserialize)]
struct Question {
    #[serde(default = "default_language")]
    language: String,
    dictionary: String,
    rack: String,
    #[serde(default)]
    board: Option<Vec<String>>,
    #[serde(default)]
    time_budget_ms: Option<u64>,
}

fn default_language() -> String {
    "en".into()
}

#[derive(serde::Serialize)]
#[serde(rename_all = "lowercase")]
enum Answer<'a> {
    Candidate(&'a search::Move),
    Best(Option<&'a search::Move>),
}

fn read_question() -> error::Returns<Question> {
    let data = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    Ok(serde_json::from_str::<Question>(&data)?)
}

#[tokio::main]
async fn main() -> error::Returns<()> {
    logging::init();
    let question = read_question()?;
    let game_config = Arc::new(game_config::make_game_config(&question.language)?);
    let dictionary = Arc::new(dictionary::Dictionary::load(&question.dictionary)?);
    let alphabet = game_config.alphabet();
    let dim = game_config.board_layout().dim();
    let rack = alphabet.parse_rack(&question.rack)?;
    if rack.len() > game_config.rack_size() as usize {
        wordgraph::return_error!(format!(
            "rack has {} tiles, at most {} allowed",
            rack.len(),
            game_config.rack_size()
        ));
    }
    let board_tiles = match &question.board {
        Some(rows) => display::parse_board_rows(alphabet, dim, rows)?,
        None => vec![0u8; dim.area()],
    };
    let request = search::SearchRequest::new(
        Arc::clone(&dictionary),
        Arc::clone(&game_config),
        &board_tiles,
        &rack,
    );

    let mut print_error = None;
    let best = search::find_best_play(
        request,
        question.time_budget_ms.map(std::time::Duration::from_millis),
        |candidate| {
            if print_error.is_none() {
                match serde_json::to_string(&Answer::Candidate(candidate)) {
                    Ok(s) => println!("{}", s),
                    Err(e) => print_error = Some(e),
                }
            }
        },
    )
    .await?;
    if let Some(e) = print_error {
        return Err(e.into());
    }
    println!("{}", serde_json::to_string(&Answer::Best(best.as_ref()))?);
    Ok(())
}
