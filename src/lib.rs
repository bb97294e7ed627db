// Copyright (C) 2020-2026 Andy Kurnia.

#[macro_use]
pub mod error;

pub mod alphabet;
pub mod bag;
pub mod board_layout;
pub mod build;
pub mod codec;
pub mod dictionary;
pub mod display;
pub mod explorer;
pub mod fash;
pub mod game_config;
pub mod game_state;
pub mod graph;
pub mod lexicon;
pub mod logging;
pub mod matrix;
pub mod movegen;
pub mod play_scorer;
pub mod reduce;
pub mod rlhelper;
pub mod search;
pub mod trie;
