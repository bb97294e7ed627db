// Copyright (C) 2020-2026 Andy Kurnia.

use super::{alphabet, board_layout, error};

pub struct StaticGameConfig {
    alphabet: alphabet::Alphabet,
    board_layout: board_layout::BoardLayout,
    rack_size: i8,
    num_players: u8,
    bingo_bonus: i16,
}

pub enum GameConfig {
    Static(StaticGameConfig),
}

impl GameConfig {
    #[inline(always)]
    pub fn alphabet(&self) -> &alphabet::Alphabet {
        match self {
            GameConfig::Static(x) => &x.alphabet,
        }
    }

    #[inline(always)]
    pub fn board_layout(&self) -> &board_layout::BoardLayout {
        match self {
            GameConfig::Static(x) => &x.board_layout,
        }
    }

    #[inline(always)]
    pub fn rack_size(&self) -> i8 {
        match self {
            GameConfig::Static(x) => x.rack_size,
        }
    }

    #[inline(always)]
    pub fn num_players(&self) -> u8 {
        match self {
            GameConfig::Static(x) => x.num_players,
        }
    }

    #[inline(always)]
    pub fn num_played_bonus(&self, num_played: i8) -> i16 {
        match self {
            GameConfig::Static(x) => {
                // branchless
                x.bingo_bonus & -((num_played >= x.rack_size) as i16)
            }
        }
    }
}

fn make_static_game_config(
    alphabet: alphabet::Alphabet,
    board_layout: board_layout::BoardLayout,
) -> GameConfig {
    GameConfig::Static(StaticGameConfig {
        alphabet,
        board_layout,
        rack_size: 7,
        num_players: 2,
        bingo_bonus: 50,
    })
}

pub fn make_english_game_config() -> GameConfig {
    make_static_game_config(
        alphabet::make_english_alphabet(),
        board_layout::make_common_board_layout(),
    )
}

pub fn make_polish_game_config() -> GameConfig {
    make_static_game_config(
        alphabet::make_polish_alphabet(),
        board_layout::make_common_board_layout(),
    )
}

// a small premium-free board, for tests and toy boards.
pub fn make_plain_game_config(rows: i8, cols: i8) -> GameConfig {
    make_static_game_config(
        alphabet::make_english_alphabet(),
        board_layout::make_plain_board_layout(rows, cols),
    )
}

pub fn make_game_config(language: &str) -> error::Returns<GameConfig> {
    match language.to_ascii_lowercase().as_str() {
        "en" | "english" => Ok(make_english_game_config()),
        "pl" | "polish" => Ok(make_polish_game_config()),
        _ => {
            return_error!(format!("unknown language {:?}", language));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bingo_bonus() {
        let game_config = make_english_game_config();
        assert_eq!(game_config.rack_size(), 7);
        assert_eq!(game_config.num_played_bonus(6), 0);
        assert_eq!(game_config.num_played_bonus(7), 50);
    }

    #[test]
    fn languages() {
        assert_eq!(make_game_config("EN").unwrap().alphabet().name(), "english");
        assert_eq!(make_game_config("polish").unwrap().alphabet().name(), "polish");
        assert!(make_game_config("klingon").is_err());
    }

    #[test]
    fn shareable() {
        fn is_send_sync<T: Send + Sync>() {}
        is_send_sync::<GameConfig>();
    }
}
