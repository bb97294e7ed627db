// Copyright (C) 2020-2026 Andy Kurnia.

use rand::prelude::*;
use std::sync::Arc;
use wordgraph::{
    build, codec, dictionary, display, error, game_config, graph::WordGraph, lexicon, movegen,
    play_scorer, search, trie,
};

fn dictionary_of(words: &[&str]) -> dictionary::Dictionary {
    let (bytes, _) = build::build(build::BuildFormat::Raw, words).unwrap();
    dictionary::Dictionary::from_bytes(&bytes).unwrap()
}

fn random_words(seed: u64, count: usize) -> Vec<String> {
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(seed);
    let mut words = (0..count)
        .map(|_| {
            let len = rng.random_range(1..=8);
            (0..len)
                .map(|_| (b'A' + rng.random_range(0..6u8)) as char)
                .collect::<String>()
        })
        .collect::<Vec<_>>();
    words.sort();
    words.dedup();
    words
}

#[test]
fn round_trip_accepts_exactly_the_input() {
    let words = random_words(1, 400);
    let (bytes, stats) = build::build(build::BuildFormat::Gzip, &words).unwrap();
    assert!(stats.live_nodes <= stats.trie_nodes);
    let d = dictionary::Dictionary::from_bytes(&bytes).unwrap();
    assert_eq!(d.words().collect::<Vec<_>>(), words);
    assert_eq!(d.word_count(), words.len() as u64);
    for probe in random_words(3, 400) {
        assert_eq!(d.has_word(&probe), words.binary_search(&probe).is_ok(), "{}", probe);
    }
    assert!(!d.has_word(""));
}

#[test]
fn reduction_preserves_membership_and_sequences() {
    let words = random_words(4, 300);
    let plain = trie::Trie::build(&words);
    let mut reduced = plain.clone();
    let reduce_stats = reduced.reduce();
    assert!(reduce_stats.live_nodes < plain.num_nodes());
    let decoded = dictionary::Dictionary::from_bytes(&codec::encode(&reduced).unwrap()).unwrap();
    for probe in random_words(5, 300) {
        assert_eq!(plain.has_word(&probe), reduced.has_word(&probe), "{}", probe);
        assert_eq!(plain.has_sequence(&probe), reduced.has_sequence(&probe), "{}", probe);
        assert_eq!(plain.has_sequence(&probe), decoded.has_sequence(&probe), "{}", probe);
    }
}

#[test]
fn shared_suffixes_compress() {
    let (_, stats) = build::build(build::BuildFormat::Raw, &["CATS", "HATS"]).unwrap();
    assert_eq!(stats.trie_nodes, 8);
    assert!(stats.live_nodes < 8);
}

#[test]
fn anagrams_and_blanks() {
    let d = dictionary_of(&["DOG", "GO", "GOD", "OD"]);
    let found = d.find_anagrams("DOG", false);
    assert_eq!(found.keys().collect::<Vec<_>>(), ["DOG", "GO", "GOD", "OD"]);
    assert!(found.iter().all(|(k, v)| k == v));

    let d = dictionary_of(&["DOG"]);
    let found = d.find_anagrams("D_G", true);
    assert_eq!(found.len(), 1);
    assert_eq!(found["DOG"], "D_G");
    assert!(d.find_anagrams("D_G", false).is_empty());
}

#[test]
fn decode_then_encode_is_identity() {
    let words = random_words(6, 200);
    let (bytes, _) = build::build(build::BuildFormat::Raw, &words).unwrap();
    let d = dictionary::Dictionary::from_bytes(&bytes).unwrap();
    assert_eq!(codec::encode(&d).unwrap(), bytes);
}

#[test]
fn decoder_errors() {
    let kind = |bytes: &[u8]| {
        dictionary::Dictionary::from_bytes(bytes)
            .err()
            .map(|e| e.kind())
    };
    assert_eq!(kind(&[]), Some(error::ErrorKind::Truncated));
    let (bytes, _) = build::build(build::BuildFormat::Raw, &["CAT", "DOG"]).unwrap();
    assert_eq!(kind(&bytes[..bytes.len() - 3]), Some(error::ErrorKind::Truncated));

    // A's child points past the end.
    let mut bad = 2u32.to_be_bytes().to_vec();
    for (codepoint, flags) in [(0u32, (1u32 << 2) | 2), ('A' as u32, (9 << 2) | 3)] {
        bad.extend_from_slice(&codepoint.to_be_bytes());
        bad.extend_from_slice(&flags.to_be_bytes());
    }
    assert_eq!(kind(&bad), Some(error::ErrorKind::Invalid));

    // A's child list is the root list.
    let mut cyclic = 2u32.to_be_bytes().to_vec();
    for (codepoint, flags) in [(0u32, (1u32 << 2) | 2), ('A' as u32, (1 << 2) | 3)] {
        cyclic.extend_from_slice(&codepoint.to_be_bytes());
        cyclic.extend_from_slice(&flags.to_be_bytes());
    }
    assert_eq!(kind(&cyclic), Some(error::ErrorKind::Invalid));

    let missing = dictionary::Dictionary::load("/nonexistent/words.dawg").err().map(|e| e.kind());
    assert_eq!(missing, Some(error::ErrorKind::NotFound));
}

#[test]
fn best_move_uses_a_blank_for_the_missing_letter() {
    let game_config = game_config::make_english_game_config();
    let d = dictionary_of(&["DOULEIA"]);
    let board_tiles = vec![0u8; game_config.board_layout().dim().area()];
    let rack = game_config.alphabet().parse_rack("AEIOU??").unwrap();
    let board_snapshot = movegen::BoardSnapshot {
        board_tiles: &board_tiles,
        game_config: &game_config,
        dictionary: &d,
    };
    let outcome = movegen::find_best_play(
        &board_snapshot,
        &rack,
        &movegen::SearchLimits::default(),
        |_| {},
    )
    .unwrap();
    let best = outcome.best.unwrap();
    let m = search::Move::from_play(&board_snapshot, &best);
    assert_eq!(m.words, ["DOULEIA"]);
    assert!(m.placements.iter().any(|p| p.letter == 'D' && p.is_blank));
    assert!(m.placements.iter().any(|p| (p.row, p.col) == (7, 7)));
    assert!(m.score >= 50);
}

#[test]
fn cross_checks_only_form_words() {
    let game_config = game_config::make_english_game_config();
    let d = dictionary_of(&["AA", "AR", "ARC", "CAR", "CRAG", "CRAGS", "RAG", "TA"]);
    let mut rows = vec![".".repeat(15); 15];
    rows[7] = "......CRAG.....".into();
    let board_tiles =
        display::parse_board_rows(game_config.alphabet(), game_config.board_layout().dim(), &rows)
            .unwrap();
    let rack = game_config.alphabet().parse_rack("ACR").unwrap();
    let board_snapshot = movegen::BoardSnapshot {
        board_tiles: &board_tiles,
        game_config: &game_config,
        dictionary: &d,
    };
    let plays = movegen::gen_all_plays(&board_snapshot, &rack).unwrap();
    assert!(!plays.is_empty());
    for play in &plays {
        play_scorer::validate_play(&board_snapshot, play).unwrap();
        play_scorer::check_rack(play, &rack, game_config.alphabet().len()).unwrap();
        assert_eq!(play_scorer::compute_score(&board_snapshot, play), play.score());
        for word in play_scorer::words_formed(&board_snapshot, play) {
            assert!(d.has_word(&word), "{}", word);
        }
    }
}

#[test]
fn boundaries_are_not_errors() {
    let game_config = game_config::make_english_game_config();
    let d = dictionary_of(&["AA"]);
    let dim = game_config.board_layout().dim();
    let empty = vec![0u8; dim.area()];
    let full = vec![1u8; dim.area()];
    let rack = game_config.alphabet().parse_rack("AA").unwrap();
    for (board_tiles, rack) in [(&empty, &[][..]), (&full, &rack[..])] {
        let board_snapshot = movegen::BoardSnapshot {
            board_tiles,
            game_config: &game_config,
            dictionary: &d,
        };
        let outcome = movegen::find_best_play(
            &board_snapshot,
            rack,
            &movegen::SearchLimits::default(),
            |_| panic!("no candidate expected"),
        )
        .unwrap();
        assert!(outcome.best.is_none());
        assert_eq!(outcome.num_candidates, 0);
    }
}

#[tokio::test]
async fn async_search_respects_a_tiny_budget() {
    let game_config = Arc::new(game_config::make_english_game_config());
    let words = random_words(7, 2000);
    let (bytes, _) = build::build(build::BuildFormat::Raw, &words).unwrap();
    let d = Arc::new(dictionary::Dictionary::from_bytes(&bytes).unwrap());
    let board_tiles = vec![0u8; game_config.board_layout().dim().area()];
    let rack = game_config.alphabet().parse_rack("ABCDEF?").unwrap();
    let request = search::SearchRequest::new(d, Arc::clone(&game_config), &board_tiles, &rack);
    let mut last = None;
    let best = search::find_best_play(request, Some(std::time::Duration::ZERO), |m| {
        last = Some(m.clone())
    })
    .await
    .unwrap();
    // whatever arrived before cancellation, the result is the last candidate.
    assert_eq!(best, last);
}

#[test]
fn lexicon_to_dictionary() {
    let text = "cat  a small animal\n\nDog\nd0g\nCAT\nüber\n";
    let lexicon = lexicon::read_words(text, &lexicon::LexiconConfig::default());
    assert_eq!(lexicon.words, ["CAT", "DOG", "ÜBER"]);
    assert_eq!(lexicon.report.rejected.len(), 1);
    assert_eq!(lexicon.report.rejected[0].text, "d0g");
    assert_eq!(lexicon.report.duplicates, 1);
    let (bytes, _) = build::build(build::BuildFormat::Raw, &lexicon.words).unwrap();
    let d = dictionary::Dictionary::from_bytes(&bytes).unwrap();
    assert!(d.has_word("ÜBER"));
    assert!(d.has_sequence("BE"));
    assert!(!d.has_word("D0G"));

    let accepting = lexicon::LexiconConfig {
        invalid_char_policy: lexicon::InvalidCharPolicy::Accept,
    };
    assert!(lexicon::read_words(text, &accepting).words.contains(&"D0G".to_string()));
}
