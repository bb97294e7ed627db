// Copyright (C) 2020-2026 Andy Kurnia.

use super::{alphabet, board_layout, error, matrix};
use std::fmt::Write;

#[inline(always)]
pub fn empty_label(board_layout: &board_layout::BoardLayout, row: i8, col: i8) -> char {
    if row == board_layout.star_row() && col == board_layout.star_col() {
        return '*';
    }
    let premium = board_layout.premiums()[board_layout.dim().at_row_col(row, col)];
    match (premium.word_multiplier, premium.letter_multiplier) {
        (3, _) => '=',
        (2, _) => '-',
        (_, 3) => '"',
        (_, 2) => '\'',
        _ => ' ',
    }
}

#[inline(always)]
pub fn board_label(
    alphabet: &alphabet::Alphabet,
    board_layout: &board_layout::BoardLayout,
    board_tiles: &[u8],
    row: i8,
    col: i8,
) -> char {
    alphabet
        .board_char(board_tiles[board_layout.dim().at_row_col(row, col)])
        .unwrap_or_else(|| empty_label(board_layout, row, col))
}

// across is row then column letter (8H), down is column letter then row (H8).
pub fn fmt_coord(down: bool, row: i8, col: i8) -> String {
    let col_label = ((col as u8) + b'A') as char;
    if down {
        format!("{}{}", col_label, row + 1)
    } else {
        format!("{}{}", row + 1, col_label)
    }
}

fn fmt_column_labels(s: &mut String, dim: matrix::Dim) {
    s.push_str("  ");
    for c in 0..dim.cols {
        s.push(' ');
        s.push(((c as u8) + b'a') as char);
    }
    s.push('\n');
}

fn fmt_rule(s: &mut String, dim: matrix::Dim) {
    s.push_str("  +");
    for _ in 1..dim.cols {
        s.push_str("--");
    }
    s.push_str("-+\n");
}

pub fn fmt_board(
    alphabet: &alphabet::Alphabet,
    board_layout: &board_layout::BoardLayout,
    board_tiles: &[u8],
) -> String {
    let dim = board_layout.dim();
    let mut s = String::new();
    fmt_column_labels(&mut s, dim);
    fmt_rule(&mut s, dim);
    for r in 0..dim.rows {
        let _ = write!(s, "{:2}|", r + 1);
        for c in 0..dim.cols {
            if c > 0 {
                s.push(' ');
            }
            s.push(board_label(alphabet, board_layout, board_tiles, r, c));
        }
        let _ = writeln!(s, "|{}", r + 1);
    }
    fmt_rule(&mut s, dim);
    fmt_column_labels(&mut s, dim);
    s
}

pub fn print_board(
    alphabet: &alphabet::Alphabet,
    board_layout: &board_layout::BoardLayout,
    board_tiles: &[u8],
) {
    print!("{}", fmt_board(alphabet, board_layout, board_tiles));
}

// One string per row. Uppercase is a tile, lowercase a blank, and any of
// . * _ or space is an empty square.
pub fn parse_board_rows<S: AsRef<str>>(
    alphabet: &alphabet::Alphabet,
    dim: matrix::Dim,
    rows: &[S],
) -> error::Returns<Vec<u8>> {
    if rows.len() != dim.rows as usize {
        return_error!(format!("expected {} rows, found {}", dim.rows, rows.len()));
    }
    let mut board_tiles = Vec::with_capacity(dim.area());
    for (r, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let before = board_tiles.len();
        for c in row.chars() {
            board_tiles.push(alphabet.parse_board_char(c)?);
        }
        if board_tiles.len() - before != dim.cols as usize {
            return_error!(format!(
                "row {} has {} squares, expected {}",
                r + 1,
                board_tiles.len() - before,
                dim.cols
            ));
        }
    }
    Ok(board_tiles)
}
