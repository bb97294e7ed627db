// Copyright (C) 2020-2026 Andy Kurnia.

use super::{error, graph::WordGraph, matrix, movegen};

// Recounts a play from scratch, independent of the generator.
// Assume the play is placed on empty squares.
pub fn compute_score(board_snapshot: &movegen::BoardSnapshot<'_>, play: &movegen::Play) -> i16 {
    let game_config = board_snapshot.game_config;
    let movegen::Play::Place {
        down,
        lane,
        idx,
        word,
        ..
    } = play;
    let alphabet = game_config.alphabet();
    let board_layout = game_config.board_layout();
    let premiums = board_layout.premiums();
    let dim = board_layout.dim();
    let strider = dim.lane(*down, *lane);
    let mut recounted_score = 0;
    let mut num_played = 0;

    {
        let mut word_multiplier = 1;
        let mut word_score = 0i16;
        for (i, &tile) in (*idx..).zip(word.iter()) {
            let strider_at_i = strider.at(i);
            let letter_multiplier;
            let premium = premiums[strider_at_i];
            let placed_tile = if tile != 0 {
                num_played += 1;
                word_multiplier *= premium.word_multiplier;
                letter_multiplier = premium.letter_multiplier;
                tile
            } else {
                letter_multiplier = 1;
                board_snapshot.board_tiles[strider_at_i]
            };
            word_score += alphabet.score(placed_tile) as i16 * letter_multiplier as i16;
        }
        recounted_score += word_score * word_multiplier as i16;
    }

    for (i, &tile) in (*idx..).zip(word.iter()) {
        if tile == 0 {
            continue;
        }
        let Some((start, end)) = perpendicular_span(board_snapshot, *down, *lane, i) else {
            continue;
        };
        let perpendicular_strider = dim.lane(!*down, i);
        let mut word_multiplier = 1;
        let mut word_score = 0i16;
        for j in start..end {
            let at = perpendicular_strider.at(j);
            let premium = premiums[at];
            if j == *lane {
                word_multiplier *= premium.word_multiplier;
                word_score += alphabet.score(tile) as i16 * premium.letter_multiplier as i16;
            } else {
                word_score += alphabet.score(board_snapshot.board_tiles[at]) as i16;
            }
        }
        recounted_score += word_score * word_multiplier as i16;
    }

    recounted_score + game_config.num_played_bonus(num_played)
}

// [start, end) of the perpendicular word through (lane, i), if it has more
// than the one square.
fn perpendicular_span(
    board_snapshot: &movegen::BoardSnapshot<'_>,
    down: bool,
    lane: i8,
    i: i8,
) -> Option<(i8, i8)> {
    let perpendicular_strider = board_snapshot
        .game_config
        .board_layout()
        .dim()
        .lane(!down, i);
    let has_tile = |j: i8| board_snapshot.board_tiles[perpendicular_strider.at(j)] != 0;
    let mut start = lane;
    while start > 0 && has_tile(start - 1) {
        start -= 1;
    }
    let mut end = lane + 1;
    while end < perpendicular_strider.len() && has_tile(end) {
        end += 1;
    }
    if end - start >= 2 {
        Some((start, end))
    } else {
        None
    }
}

fn spell(
    board_snapshot: &movegen::BoardSnapshot<'_>,
    strider: matrix::Strider,
    start: i8,
    end: i8,
    placed: impl Fn(i8) -> Option<u8>,
) -> String {
    let alphabet = board_snapshot.game_config.alphabet();
    (start..end)
        .filter_map(|j| {
            alphabet.letter(placed(j).unwrap_or(board_snapshot.board_tiles[strider.at(j)]))
        })
        .collect()
}

// The main word first, then each perpendicular word in placement order.
pub fn words_formed(board_snapshot: &movegen::BoardSnapshot<'_>, play: &movegen::Play) -> Vec<String> {
    let movegen::Play::Place {
        down,
        lane,
        idx,
        word,
        ..
    } = play;
    let dim = board_snapshot.game_config.board_layout().dim();
    let strider = dim.lane(*down, *lane);
    let placed_at = |j: i8| {
        let k = j - *idx;
        if k >= 0 && (k as usize) < word.len() && word[k as usize] != 0 {
            Some(word[k as usize])
        } else {
            None
        }
    };
    let mut ret = vec![spell(
        board_snapshot,
        strider,
        *idx,
        *idx + word.len() as i8,
        placed_at,
    )];
    for (i, &tile) in (*idx..).zip(word.iter()) {
        if tile == 0 {
            continue;
        }
        if let Some((start, end)) = perpendicular_span(board_snapshot, *down, *lane, i) {
            ret.push(spell(
                board_snapshot,
                dim.lane(!*down, i),
                start,
                end,
                |j| if j == *lane { Some(tile) } else { None },
            ));
        }
    }
    ret
}

// Geometry and words. The rack is checked separately.
pub fn validate_play(
    board_snapshot: &movegen::BoardSnapshot<'_>,
    play: &movegen::Play,
) -> error::Returns<()> {
    let movegen::Play::Place {
        down,
        lane,
        idx,
        word,
        ..
    } = play;
    let board_layout = board_snapshot.game_config.board_layout();
    let dim = board_layout.dim();
    let alphabet = board_snapshot.game_config.alphabet();
    if *lane < 0 || *lane >= dim.lanes(*down) {
        return_error!(format!("lane {} is off the board", lane));
    }
    let strider = dim.lane(*down, *lane);
    if *idx < 0 || (*idx as usize) + word.len() > strider.len() as usize {
        return_error!(format!("word at {} does not fit", idx));
    }
    if word.iter().all(|&t| t == 0) {
        return_error!("no tiles placed".into());
    }
    let has_tile = |j: i8| {
        j >= 0 && j < strider.len() && board_snapshot.board_tiles[strider.at(j)] != 0
    };
    if has_tile(*idx - 1) || has_tile(*idx + word.len() as i8) {
        return_error!("word does not span its whole run of tiles".into());
    }
    let mut connected = false;
    for (i, &tile) in (*idx..).zip(word.iter()) {
        let b = board_snapshot.board_tiles[strider.at(i)];
        if tile == 0 {
            if b == 0 {
                return_error!(format!("gap at {}", i));
            }
            connected = true;
            continue;
        }
        if b != 0 {
            return_error!(format!("square {} is occupied", i));
        }
        if alphabet.letter(tile).is_none() {
            return_error!(format!("invalid tile {}", tile));
        }
        let (row, col) = dim.row_col(*down, *lane, i);
        if row == board_layout.star_row() && col == board_layout.star_col() {
            connected |= board_snapshot.is_empty_board();
        }
        connected |= perpendicular_span(board_snapshot, *down, *lane, i).is_some();
    }
    if !connected {
        return_error!("play is not connected".into());
    }
    let mut num_words = 0;
    for formed in words_formed(board_snapshot, play) {
        if formed.chars().count() < 2 {
            if word.len() < 2 {
                continue;
            }
            return_error!(format!("{:?} is too short", formed));
        }
        if !board_snapshot.dictionary.has_word(&formed) {
            return_error!(format!("{:?} is not a word", formed));
        }
        num_words += 1;
    }
    if num_words == 0 {
        return_error!("play forms no word of two or more letters".into());
    }
    Ok(())
}

// The rack holds every tile the play places. Blanks are tile 0 on the rack.
pub fn check_rack(play: &movegen::Play, rack: &[u8], alphabet_len: u8) -> error::Returns<()> {
    let movegen::Play::Place { word, .. } = play;
    let mut rack_tally = vec![0usize; alphabet_len as usize];
    for &tile in rack {
        rack_tally[tile as usize] += 1;
    }
    for &tile in word.iter() {
        if tile == 0 {
            continue;
        }
        let rack_tile = if tile & 0x80 != 0 { 0 } else { tile };
        if rack_tally[rack_tile as usize] == 0 {
            return_error!(format!("rack does not have tile {}", rack_tile));
        }
        rack_tally[rack_tile as usize] -= 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build, dictionary, game_config};

    #[test]
    fn scores_and_words() {
        let game_config = game_config::make_english_game_config();
        let (bytes, _) =
            build::build(build::BuildFormat::Raw, &["AX", "CAT", "CATS", "TU", "XU"]).unwrap();
        let dictionary = dictionary::Dictionary::from_bytes(&bytes).unwrap();
        let alphabet = game_config.alphabet();
        let dim = game_config.board_layout().dim();
        let mut board_tiles = vec![0u8; dim.area()];
        for (i, c) in (6i8..).zip("CAT".chars()) {
            board_tiles[dim.at_row_col(7, i)] = alphabet.tile_of(c).unwrap();
        }
        let board_snapshot = movegen::BoardSnapshot {
            board_tiles: &board_tiles,
            game_config: &game_config,
            dictionary: &dictionary,
        };
        let s = alphabet.tile_of('S').unwrap();
        // CATS across, S on a plain square.
        let cats = movegen::Play::Place {
            down: false,
            lane: 7,
            idx: 6,
            word: [0, 0, 0, s].into(),
            score: 6,
        };
        validate_play(&board_snapshot, &cats).unwrap();
        assert_eq!(compute_score(&board_snapshot, &cats), 6);
        assert_eq!(words_formed(&board_snapshot, &cats), vec!["CATS"]);

        // XU on row 8 makes AX and TU down.
        let x = alphabet.tile_of('X').unwrap();
        let u = alphabet.tile_of('U').unwrap();
        let xu = movegen::Play::Place {
            down: false,
            lane: 8,
            idx: 7,
            word: [x, u].into(),
            score: 0,
        };
        validate_play(&board_snapshot, &xu).unwrap();
        assert_eq!(words_formed(&board_snapshot, &xu), vec!["XU", "AX", "TU"]);
        // XU 8+1*2, AX 1+8, TU 1+1*2
        assert_eq!(compute_score(&board_snapshot, &xu), 22);
        check_rack(&xu, &alphabet.parse_rack("UX").unwrap(), alphabet.len()).unwrap();
        check_rack(&xu, &alphabet.parse_rack("U?").unwrap(), alphabet.len()).unwrap_err();
        let blank_x = movegen::Play::Place {
            down: false,
            lane: 8,
            idx: 7,
            word: [x | 0x80, u].into(),
            score: 0,
        };
        check_rack(&blank_x, &alphabet.parse_rack("U?").unwrap(), alphabet.len()).unwrap();
        // blank X scores nothing anywhere.
        assert_eq!(compute_score(&board_snapshot, &blank_x), 2 + 1 + 3);
    }

    #[test]
    fn invalid_plays() {
        let game_config = game_config::make_english_game_config();
        let (bytes, _) = build::build(build::BuildFormat::Raw, &["CAT", "AT"]).unwrap();
        let dictionary = dictionary::Dictionary::from_bytes(&bytes).unwrap();
        let alphabet = game_config.alphabet();
        let dim = game_config.board_layout().dim();
        let empty = vec![0u8; dim.area()];
        let board_snapshot = movegen::BoardSnapshot {
            board_tiles: &empty,
            game_config: &game_config,
            dictionary: &dictionary,
        };
        let at = |idx: i8, lane: i8| movegen::Play::Place {
            down: false,
            lane,
            idx,
            word: [alphabet.tile_of('A').unwrap(), alphabet.tile_of('T').unwrap()].into(),
            score: 0,
        };
        validate_play(&board_snapshot, &at(6, 7)).unwrap();
        // misses the star
        assert!(validate_play(&board_snapshot, &at(0, 0)).is_err());
        // off the edge
        assert!(validate_play(&board_snapshot, &at(14, 7)).is_err());
        let ta = movegen::Play::Place {
            down: true,
            lane: 7,
            idx: 7,
            word: [alphabet.tile_of('T').unwrap(), alphabet.tile_of('A').unwrap()].into(),
            score: 0,
        };
        assert!(validate_play(&board_snapshot, &ta).is_err());
    }

    #[test]
    fn lone_tile_on_the_star_is_not_a_word() {
        let game_config = game_config::make_english_game_config();
        let (bytes, _) = build::build(build::BuildFormat::Raw, &["A", "AT"]).unwrap();
        let dictionary = dictionary::Dictionary::from_bytes(&bytes).unwrap();
        let alphabet = game_config.alphabet();
        let dim = game_config.board_layout().dim();
        let empty = vec![0u8; dim.area()];
        let board_snapshot = movegen::BoardSnapshot {
            board_tiles: &empty,
            game_config: &game_config,
            dictionary: &dictionary,
        };
        for down in [false, true] {
            let lone = movegen::Play::Place {
                down,
                lane: 7,
                idx: 7,
                word: [alphabet.tile_of('A').unwrap()].into(),
                score: 0,
            };
            assert!(validate_play(&board_snapshot, &lone).is_err());
        }
    }
}
