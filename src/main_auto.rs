// Copyright (C) 2020-2026 Andy Kurnia.

use rand::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wordgraph::{
    dictionary, display, error, game_config, game_state, logging, movegen, play_scorer, search,
};

struct GameResult {
    game_id: usize,
    seed: u64,
    scores: Box<[i16]>,
    num_moves: usize,
    num_mismatches: usize,
}

// One robot game. Every chosen play is rescored and revalidated from scratch.
fn play_game(
    game_config: &game_config::GameConfig,
    dictionary: &dictionary::Dictionary,
    rng: &mut dyn RngCore,
    verbose: bool,
) -> error::Returns<(Box<[i16]>, usize, usize)> {
    let mut game_state = game_state::GameState::new(game_config);
    game_state.reset_and_draw_tiles(rng);
    game_state.turn = rng.random_range(0..game_config.num_players());
    let alphabet = game_config.alphabet();
    let mut num_moves = 0;
    let mut num_mismatches = 0;
    while !game_state.is_over() {
        num_moves += 1;
        let board_snapshot = movegen::BoardSnapshot {
            board_tiles: &game_state.board_tiles,
            game_config,
            dictionary,
        };
        let rack = game_state.current_player().rack.clone();
        let outcome = movegen::find_best_play(
            &board_snapshot,
            &rack,
            &movegen::SearchLimits::default(),
            |_| {},
        )?;
        let Some(play) = outcome.best else {
            if verbose {
                println!(
                    "p{} {} (pass)",
                    game_state.turn + 1,
                    alphabet.fmt_rack(&rack)
                );
            }
            game_state.pass();
            game_state.next_turn();
            continue;
        };
        let recounted_score = play_scorer::compute_score(&board_snapshot, &play);
        if let Err(e) = play_scorer::validate_play(&board_snapshot, &play) {
            num_mismatches += 1;
            tracing::error!(?play, "invalid play: {}", e);
        } else if recounted_score != play.score() {
            num_mismatches += 1;
            tracing::error!(?play, recounted_score, "score mismatch");
        }
        if verbose {
            println!(
                "p{} {} {}",
                game_state.turn + 1,
                alphabet.fmt_rack(&rack),
                search::Move::from_play(&board_snapshot, &play)
            );
        }
        game_state.play(&play)?;
        game_state.next_turn();
    }
    game_state.finalize_scores();
    if verbose {
        display::print_board(alphabet, game_config.board_layout(), &game_state.board_tiles);
    }
    let scores = game_state.players.iter().map(|player| player.score).collect();
    Ok((scores, num_moves, num_mismatches))
}

pub fn main() -> error::Returns<()> {
    logging::init();
    let args = std::env::args().collect::<Vec<_>>();
    if args.len() < 2 || args.len() > 4 {
        wordgraph::return_error!("usage: auto <dawg-file> [games] [language]".into());
    }
    let num_games = match args.get(2) {
        Some(s) => s.parse::<usize>()?,
        None => 1,
    };
    let game_config = Arc::new(game_config::make_game_config(
        args.get(3).map_or("en", |s| s.as_str()),
    )?);
    let dictionary = Arc::new(dictionary::Dictionary::load(&args[1])?);
    let base_seed = rand::rng().random::<u64>();
    let verbose = num_games == 1;

    let num_threads = std::cmp::min(num_cpus::get(), num_games.max(1));
    let num_started_games = Arc::new(AtomicUsize::new(0));
    let mut threads = vec![];
    let (tx, rx) = std::sync::mpsc::channel();
    let t0 = std::time::Instant::now();
    for _ in 0..num_threads {
        let tx = tx.clone();
        let game_config = Arc::clone(&game_config);
        let dictionary = Arc::clone(&dictionary);
        let num_started_games = Arc::clone(&num_started_games);
        threads.push(std::thread::spawn(move || {
            loop {
                let game_id = num_started_games.fetch_add(1, Ordering::Relaxed);
                if game_id >= num_games {
                    break;
                }
                let seed = base_seed.wrapping_add(game_id as u64);
                let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(seed);
                match play_game(&game_config, &dictionary, &mut rng, verbose) {
                    Ok((scores, num_moves, num_mismatches)) => {
                        if tx
                            .send(GameResult {
                                game_id,
                                seed,
                                scores,
                                num_moves,
                                num_mismatches,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(game_id, seed, "game failed: {}", e);
                    }
                }
            }
        }));
    }
    drop(tx);

    let mut num_finished = 0;
    let mut total_mismatches = 0;
    let mut total_scores = vec![0i64; game_config.num_players() as usize];
    for result in rx {
        num_finished += 1;
        total_mismatches += result.num_mismatches;
        for (total, &score) in total_scores.iter_mut().zip(result.scores.iter()) {
            *total += score as i64;
        }
        println!(
            "game {} (seed {}): {:?} in {} moves",
            result.game_id + 1,
            result.seed,
            result.scores,
            result.num_moves
        );
    }
    for thread in threads {
        if thread.join().is_err() {
            wordgraph::return_error!("a robot thread panicked".into());
        }
    }
    tracing::info!(
        games = num_finished,
        threads = num_threads,
        mismatches = total_mismatches,
        elapsed = ?t0.elapsed(),
        "done"
    );
    if num_finished > 0 {
        for (i, total) in (1..).zip(total_scores.iter()) {
            println!("p{} average {:.1}", i, *total as f64 / num_finished as f64);
        }
    }
    if total_mismatches > 0 {
        wordgraph::return_error!(format!("{} plays failed the recount", total_mismatches));
    }
    Ok(())
}
