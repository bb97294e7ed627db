// Copyright (C) 2020-2026 Andy Kurnia.

use super::{dictionary, error::SearchError, game_config, matrix};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// bits == 0: no perpendicular tiles, anything goes.
// otherwise bit 0 is set and bit t allows tile t.
#[derive(Clone, Copy)]
struct CrossSet {
    bits: u64,
    score: i16,
}

const NO_CROSS_SET: CrossSet = CrossSet { bits: 0, score: 0 };

struct WorkingBuffer {
    rack_tally: Box<[u8]>,                       // alphabet.len(), [0] is the blank
    word_buffer: Box<[u8]>,                      // max(r, c)
    left_part: Vec<u8>,                          // tiles before the anchor
    cross_set_for_across_plays: Box<[CrossSet]>, // r*c
    cross_set_for_down_plays: Box<[CrossSet]>,   // c*r
}

impl WorkingBuffer {
    fn new(game_config: &game_config::GameConfig) -> Self {
        let dim = game_config.board_layout().dim();
        Self {
            rack_tally: vec![0u8; game_config.alphabet().len() as usize].into_boxed_slice(),
            word_buffer: vec![0u8; std::cmp::max(dim.rows, dim.cols) as usize].into_boxed_slice(),
            left_part: Vec::with_capacity(game_config.rack_size() as usize),
            cross_set_for_across_plays: vec![NO_CROSS_SET; dim.area()].into_boxed_slice(),
            cross_set_for_down_plays: vec![NO_CROSS_SET; dim.area()].into_boxed_slice(),
        }
    }
}

pub struct BoardSnapshot<'a> {
    pub board_tiles: &'a [u8],
    pub game_config: &'a game_config::GameConfig,
    pub dictionary: &'a dictionary::Dictionary,
}

impl BoardSnapshot<'_> {
    pub fn validate(&self, rack: &[u8]) -> Result<(), SearchError> {
        let dim = self.game_config.board_layout().dim();
        let alphabet = self.game_config.alphabet();
        if self.board_tiles.len() != dim.area() {
            return Err(SearchError::InvalidBoard(format!(
                "expected {} squares, found {}",
                dim.area(),
                self.board_tiles.len()
            )));
        }
        if let Some(idx) = self
            .board_tiles
            .iter()
            .position(|&b| b != 0 && alphabet.letter(b).is_none())
        {
            return Err(SearchError::InvalidBoard(format!(
                "invalid tile {} at row {} col {}",
                self.board_tiles[idx],
                idx / dim.cols as usize,
                idx % dim.cols as usize
            )));
        }
        if let Some(&tile) = rack.iter().find(|&&t| t >= alphabet.len()) {
            return Err(SearchError::InvalidRack(format!("invalid tile {}", tile)));
        }
        // no lane can take more tiles than it has squares.
        let longest_lane = std::cmp::max(dim.rows, dim.cols) as usize;
        if rack.len() > longest_lane {
            return Err(SearchError::InvalidRack(format!(
                "{} tiles, at most {} fit in a lane",
                rack.len(),
                longest_lane
            )));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn is_empty_board(&self) -> bool {
        self.board_tiles.iter().all(|&b| b == 0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    pub deadline: Option<std::time::Instant>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    #[inline(always)]
    pub fn should_stop(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|cancel| cancel.load(Ordering::Relaxed))
            || self
                .deadline
                .is_some_and(|deadline| std::time::Instant::now() >= deadline)
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Play {
    // word[i] is 0 where the square already has a tile.
    Place {
        down: bool,
        lane: i8,
        idx: i8,
        word: Box<[u8]>,
        score: i16,
    },
}

impl Play {
    #[inline(always)]
    pub fn score(&self) -> i16 {
        match self {
            Play::Place { score, .. } => *score,
        }
    }

    pub fn num_played(&self) -> usize {
        match self {
            Play::Place { word, .. } => word.iter().filter(|&&t| t != 0).count(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SearchOutcome {
    pub best: Option<Play>,
    pub num_candidates: usize,
    pub num_anchors: usize,
    pub cancelled: bool,
}

// A word spelled from node p onwards ends exactly after rest.
fn completes_word(dictionary: &dictionary::Dictionary, mut p: u32, rest: &[char]) -> bool {
    for &c in rest {
        p = dictionary.seek(dictionary.nodes()[p as usize].arc_index(), c);
        if p == 0 {
            return false;
        }
    }
    dictionary.nodes()[p as usize].accepts()
}

// strider runs perpendicular to the plays whose cross-sets are being computed.
fn gen_cross_set(
    board_snapshot: &BoardSnapshot<'_>,
    strider: matrix::Strider,
    cross_sets: &mut [CrossSet],
    output_strider: matrix::Strider,
) {
    let alphabet = board_snapshot.game_config.alphabet();
    let dictionary = board_snapshot.dictionary;
    let nodes = dictionary.nodes();
    let tile_at = |i: i8| board_snapshot.board_tiles[strider.at(i)];
    let letter_at = |i: i8| alphabet.letter(tile_at(i)).unwrap_or('\0');
    let len = strider.len();
    let mut suffix = Vec::new();
    for j in 0..len {
        cross_sets[output_strider.at(j)] = NO_CROSS_SET;
        if tile_at(j) != 0 {
            continue;
        }
        let mut start = j;
        while start > 0 && tile_at(start - 1) != 0 {
            start -= 1;
        }
        let mut end = j + 1;
        while end < len && tile_at(end) != 0 {
            end += 1;
        }
        if start == j && end == j + 1 {
            continue;
        }
        let score = (start..j)
            .chain(j + 1..end)
            .map(|i| alphabet.score(tile_at(i)) as i16)
            .sum();
        let mut bits = 1u64;
        // p spells the tiles before j.
        let mut p = 0;
        for i in start..j {
            p = dictionary.seek(nodes[p as usize].arc_index(), letter_at(i));
            if p == 0 {
                break;
            }
        }
        if p != 0 || start == j {
            suffix.clear();
            suffix.extend((j + 1..end).map(letter_at));
            let mut q = nodes[p as usize].arc_index();
            while q != 0 {
                if let Some(tile) = alphabet.tile_of(nodes[q as usize].letter()) {
                    if completes_word(dictionary, q, &suffix) {
                        bits |= 1 << tile;
                    }
                }
                q = if nodes[q as usize].is_end() { 0 } else { q + 1 };
            }
        }
        cross_sets[output_strider.at(j)] = CrossSet { bits, score };
    }
}

// word_buffer must have at least strider.len() length.
// Returns (anchors visited, cancelled).
#[allow(clippy::too_many_arguments)]
fn gen_place_moves<CallbackType: FnMut(i8, &[u8], i16)>(
    board_snapshot: &BoardSnapshot<'_>,
    cross_set_slice: &[CrossSet],
    rack_tally: &mut [u8],
    left_part: &mut Vec<u8>,
    strider: matrix::Strider,
    word_buffer: &mut [u8],
    single_tile_plays: bool,
    star: Option<i8>,
    limits: &SearchLimits,
    callback: CallbackType,
) -> (usize, bool) {
    let len = strider.len();
    word_buffer
        .iter_mut()
        .take(len as usize)
        .for_each(|m| *m = 0);

    struct Env<'a, CallbackType: FnMut(i8, &[u8], i16)> {
        board_snapshot: &'a BoardSnapshot<'a>,
        cross_set_slice: &'a [CrossSet],
        rack_tally: &'a mut [u8],
        left_part: &'a mut Vec<u8>,
        strider: matrix::Strider,
        callback: CallbackType,
        word_buffer: &'a mut [u8],
        anchor: i8,
        num_played: i8,
        idx_left: i8,
    }

    fn record<CallbackType: FnMut(i8, &[u8], i16)>(
        env: &mut Env<'_, CallbackType>,
        idx_right: i8,
        main_score: i16,
        perpendicular_score: i16,
        word_multiplier: i8,
    ) {
        let score = main_score * (word_multiplier as i16)
            + perpendicular_score
            + env
                .board_snapshot
                .game_config
                .num_played_bonus(env.num_played);
        (env.callback)(
            env.idx_left,
            &env.word_buffer[(env.idx_left as usize)..(idx_right as usize)],
            score,
        );
    }

    fn extend_right<CallbackType: FnMut(i8, &[u8], i16)>(
        env: &mut Env<'_, CallbackType>,
        mut idx: i8,
        mut p: u32,
        mut main_score: i16,
        perpendicular_score: i16,
        word_multiplier: i8,
        mut is_unique: bool,
    ) {
        let alphabet = env.board_snapshot.game_config.alphabet();
        let dictionary = env.board_snapshot.dictionary;
        let nodes = dictionary.nodes();
        let len = env.strider.len();
        // tail-recurse through the current sequence of tiles
        while idx < len {
            let b = env.board_snapshot.board_tiles[env.strider.at(idx)];
            if b == 0 {
                break;
            }
            let Some(c) = alphabet.letter(b) else {
                return;
            };
            p = dictionary.seek(nodes[p as usize].arc_index(), c);
            if p == 0 {
                return;
            }
            main_score += alphabet.score(b) as i16;
            env.word_buffer[idx as usize] = 0;
            idx += 1;
        }
        if idx > env.anchor
            && (env.num_played + is_unique as i8) >= 2
            && idx - env.idx_left >= 2
            && nodes[p as usize].accepts()
        {
            record(env, idx, main_score, perpendicular_score, word_multiplier);
        }
        if idx >= len {
            return;
        }
        let mut q = nodes[p as usize].arc_index();
        if q == 0 {
            return;
        }
        let this_premium =
            env.board_snapshot.game_config.board_layout().premiums()[env.strider.at(idx)];
        let this_cross_set = env.cross_set_slice[idx as usize];
        if this_cross_set.bits == 1 {
            return;
        }
        let new_word_multiplier = word_multiplier * this_premium.word_multiplier;
        let this_cross_bits = if this_cross_set.bits != 0 {
            this_cross_set.bits
        } else {
            is_unique = true;
            !1
        };
        loop {
            let node = nodes[q as usize];
            if let Some(tile) = alphabet.tile_of(node.letter()) {
                if this_cross_bits & (1 << tile) != 0 {
                    for (rack_tile, placed_tile) in [(tile, tile), (0, tile | 0x80)] {
                        if env.rack_tally[rack_tile as usize] == 0 {
                            continue;
                        }
                        env.rack_tally[rack_tile as usize] -= 1;
                        env.num_played += 1;
                        // a blank scores what the alphabet says tile 0 scores
                        let tile_value = (alphabet.score(placed_tile) as i16)
                            * (this_premium.letter_multiplier as i16);
                        env.word_buffer[idx as usize] = placed_tile;
                        extend_right(
                            env,
                            idx + 1,
                            q,
                            main_score + tile_value,
                            if this_cross_set.bits != 0 {
                                perpendicular_score
                                    + (this_cross_set.score + tile_value)
                                        * (this_premium.word_multiplier as i16)
                            } else {
                                perpendicular_score
                            },
                            new_word_multiplier,
                            is_unique,
                        );
                        env.num_played -= 1;
                        env.rack_tally[rack_tile as usize] += 1;
                    }
                }
            }
            if node.is_end() {
                break;
            }
            q += 1;
        }
    }

    // left part squares have no perpendicular tiles, so their scores only
    // depend on where the part ends up.
    fn play_left<CallbackType: FnMut(i8, &[u8], i16)>(
        env: &mut Env<'_, CallbackType>,
        p: u32,
        limit: i8,
        single_tile_plays: bool,
    ) {
        let alphabet = env.board_snapshot.game_config.alphabet();
        let premiums = env.board_snapshot.game_config.board_layout().premiums();
        let left_len = env.left_part.len() as i8;
        env.idx_left = env.anchor - left_len;
        let mut main_score = 0i16;
        let mut word_multiplier = 1i8;
        for i in 0..left_len {
            let idx = env.idx_left + i;
            let tile = env.left_part[i as usize];
            let premium = premiums[env.strider.at(idx)];
            main_score += (alphabet.score(tile) as i16) * (premium.letter_multiplier as i16);
            word_multiplier *= premium.word_multiplier;
            env.word_buffer[idx as usize] = tile;
        }
        extend_right(
            env,
            env.anchor,
            p,
            main_score,
            0,
            word_multiplier,
            single_tile_plays || left_len > 0,
        );
        if limit <= 0 {
            return;
        }
        let nodes = env.board_snapshot.dictionary.nodes();
        let mut q = nodes[p as usize].arc_index();
        if q == 0 {
            return;
        }
        loop {
            let node = nodes[q as usize];
            if let Some(tile) = alphabet.tile_of(node.letter()) {
                for (rack_tile, placed_tile) in [(tile, tile), (0, tile | 0x80)] {
                    if env.rack_tally[rack_tile as usize] == 0 {
                        continue;
                    }
                    env.rack_tally[rack_tile as usize] -= 1;
                    env.num_played += 1;
                    env.left_part.push(placed_tile);
                    play_left(env, q, limit - 1, single_tile_plays);
                    env.left_part.pop();
                    env.num_played -= 1;
                    env.rack_tally[rack_tile as usize] += 1;
                }
            }
            if node.is_end() {
                break;
            }
            q += 1;
        }
    }

    left_part.clear();
    let mut env = Env {
        board_snapshot,
        cross_set_slice,
        rack_tally,
        left_part,
        strider,
        callback,
        word_buffer,
        anchor: 0,
        num_played: 0,
        idx_left: 0,
    };

    let board_tiles = board_snapshot.board_tiles;
    let alphabet = board_snapshot.game_config.alphabet();
    let dictionary = board_snapshot.dictionary;
    let nodes = dictionary.nodes();
    let has_tile = |i: i8| i >= 0 && i < len && board_tiles[strider.at(i)] != 0;
    let is_anchor = |i: i8| {
        board_tiles[strider.at(i)] == 0
            && (star == Some(i)
                || cross_set_slice[i as usize].bits != 0
                || has_tile(i - 1)
                || has_tile(i + 1))
    };

    let mut num_anchors = 0;
    // empty non-anchor squares immediately before the current square.
    let mut free_run = 0i8;
    for anchor in 0..len {
        if !is_anchor(anchor) {
            free_run = if has_tile(anchor) { 0 } else { free_run + 1 };
            continue;
        }
        if limits.should_stop() {
            return (num_anchors, true);
        }
        num_anchors += 1;
        if cross_set_slice[anchor as usize].bits == 1 {
            // nothing fits here
            free_run = 0;
            continue;
        }
        env.anchor = anchor;
        if has_tile(anchor - 1) {
            // the left part is already on the board.
            let mut start = anchor;
            while has_tile(start - 1) {
                start -= 1;
            }
            let mut p = 0;
            let mut main_score = 0i16;
            for i in start..anchor {
                let b = board_tiles[strider.at(i)];
                p = match alphabet.letter(b) {
                    Some(c) => dictionary.seek(nodes[p as usize].arc_index(), c),
                    None => 0,
                };
                if p == 0 {
                    break;
                }
                main_score += alphabet.score(b) as i16;
                env.word_buffer[i as usize] = 0;
            }
            if p != 0 {
                env.idx_left = start;
                extend_right(&mut env, anchor, p, main_score, 0, 1, single_tile_plays);
            }
        } else {
            play_left(&mut env, 0, free_run, single_tile_plays);
        }
        free_run = 0;
    }
    (num_anchors, false)
}

// Calls back with (down, lane, idx, word, score) for every legal placement.
pub fn gen_place_plays<CallbackType: FnMut(bool, i8, i8, &[u8], i16)>(
    board_snapshot: &BoardSnapshot<'_>,
    rack: &[u8],
    limits: &SearchLimits,
    mut callback: CallbackType,
) -> Result<(usize, bool), SearchError> {
    board_snapshot.validate(rack)?;
    if rack.is_empty() {
        return Ok((0, false));
    }
    let game_config = board_snapshot.game_config;
    let board_layout = game_config.board_layout();
    let dim = board_layout.dim();
    let transposed_dim = matrix::Dim {
        rows: dim.cols,
        cols: dim.rows,
    };
    let mut working_buffer = WorkingBuffer::new(game_config);
    for &tile in rack {
        working_buffer.rack_tally[tile as usize] += 1;
    }
    for col in 0..dim.cols {
        gen_cross_set(
            board_snapshot,
            dim.down(col),
            &mut working_buffer.cross_set_for_across_plays,
            dim.down(col),
        );
    }
    for row in 0..dim.rows {
        gen_cross_set(
            board_snapshot,
            dim.across(row),
            &mut working_buffer.cross_set_for_down_plays,
            transposed_dim.down(row),
        );
    }
    let is_empty_board = board_snapshot.is_empty_board();

    let mut num_anchors = 0;
    for down in [false, true] {
        let cross_sets = if down {
            &working_buffer.cross_set_for_down_plays
        } else {
            &working_buffer.cross_set_for_across_plays
        };
        let lane_len = dim.lane(down, 0).len() as usize;
        for lane in 0..dim.lanes(down) {
            let star = if !is_empty_board {
                None
            } else if down && lane == board_layout.star_col() {
                Some(board_layout.star_row())
            } else if !down && lane == board_layout.star_row() {
                Some(board_layout.star_col())
            } else {
                continue;
            };
            let (lane_anchors, cancelled) = gen_place_moves(
                board_snapshot,
                &cross_sets[(lane as usize) * lane_len..(lane as usize + 1) * lane_len],
                &mut working_buffer.rack_tally,
                &mut working_buffer.left_part,
                dim.lane(down, lane),
                &mut working_buffer.word_buffer,
                !down,
                star,
                limits,
                |idx, word, score| callback(down, lane, idx, word, score),
            );
            num_anchors += lane_anchors;
            if cancelled {
                return Ok((num_anchors, true));
            }
        }
    }
    Ok((num_anchors, false))
}

pub fn gen_all_plays(
    board_snapshot: &BoardSnapshot<'_>,
    rack: &[u8],
) -> Result<Vec<Play>, SearchError> {
    let mut plays = Vec::new();
    gen_place_plays(
        board_snapshot,
        rack,
        &SearchLimits::default(),
        |down, lane, idx, word, score| {
            plays.push(Play::Place {
                down,
                lane,
                idx,
                word: word.into(),
                score,
            })
        },
    )?;
    Ok(plays)
}

// on_candidate sees each play that beats every earlier one, so the last one
// seen is the best. Ties keep the earlier play.
pub fn find_best_play<F: FnMut(&Play)>(
    board_snapshot: &BoardSnapshot<'_>,
    rack: &[u8],
    limits: &SearchLimits,
    mut on_candidate: F,
) -> Result<SearchOutcome, SearchError> {
    let mut best: Option<Play> = None;
    let mut num_candidates = 0;
    let (num_anchors, cancelled) = gen_place_plays(
        board_snapshot,
        rack,
        limits,
        |down, lane, idx, word, score| {
            if best.as_ref().is_some_and(|play| score <= play.score()) {
                return;
            }
            let play = Play::Place {
                down,
                lane,
                idx,
                word: word.into(),
                score,
            };
            num_candidates += 1;
            on_candidate(&play);
            best = Some(play);
        },
    )?;
    tracing::debug!(
        num_anchors,
        num_candidates,
        cancelled,
        best_score = best.as_ref().map(|play| play.score()),
        "search finished"
    );
    Ok(SearchOutcome {
        best,
        num_candidates,
        num_anchors,
        cancelled,
    })
}
