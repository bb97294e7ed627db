// Copyright (C) 2020-2026 Andy Kurnia.

use super::matrix;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Premium {
    pub word_multiplier: i8,
    pub letter_multiplier: i8,
}

static TWS: Premium = Premium {
    word_multiplier: 3,
    letter_multiplier: 1,
};
static DWS: Premium = Premium {
    word_multiplier: 2,
    letter_multiplier: 1,
};
static TLS: Premium = Premium {
    word_multiplier: 1,
    letter_multiplier: 3,
};
static DLS: Premium = Premium {
    word_multiplier: 1,
    letter_multiplier: 2,
};
static FVS: Premium = Premium {
    word_multiplier: 1,
    letter_multiplier: 1,
};

// = triple word, - double word, " triple letter, ' double letter.
static COMMON_PREMIUMS: &[&str] = &[
    "=  '   =   '  =",
    " -   \"   \"   - ",
    "  -   ' '   -  ",
    "'  -   '   -  '",
    "    -     -    ",
    " \"   \"   \"   \" ",
    "  '   ' '   '  ",
    "=  '   -   '  =",
    "  '   ' '   '  ",
    " \"   \"   \"   \" ",
    "    -     -    ",
    "'  -   '   -  '",
    "  -   ' '   -  ",
    " -   \"   \"   - ",
    "=  '   =   '  =",
];

pub struct BoardLayout {
    premiums: Box<[Premium]>,
    dim: matrix::Dim,
    star_row: i8,
    star_col: i8,
}

impl BoardLayout {
    fn from_rows(rows: &[&str]) -> Self {
        let dim = matrix::Dim {
            rows: rows.len() as i8,
            cols: rows.first().map_or(0, |row| row.chars().count()) as i8,
        };
        let premiums = rows
            .iter()
            .flat_map(|row| {
                assert_eq!(row.chars().count(), dim.cols as usize);
                row.chars().map(|c| match c {
                    '=' => TWS,
                    '-' => DWS,
                    '"' => TLS,
                    '\'' => DLS,
                    _ => FVS,
                })
            })
            .collect::<Box<_>>();
        Self {
            premiums,
            dim,
            star_row: dim.rows / 2,
            star_col: dim.cols / 2,
        }
    }

    #[inline(always)]
    pub fn dim(&self) -> matrix::Dim {
        self.dim
    }

    #[inline(always)]
    pub fn star_row(&self) -> i8 {
        self.star_row
    }

    #[inline(always)]
    pub fn star_col(&self) -> i8 {
        self.star_col
    }

    #[inline(always)]
    pub fn premiums(&self) -> &[Premium] {
        &self.premiums
    }
}

pub fn make_common_board_layout() -> BoardLayout {
    BoardLayout::from_rows(COMMON_PREMIUMS)
}

// no premium squares, star in the middle.
pub fn make_plain_board_layout(rows: i8, cols: i8) -> BoardLayout {
    let row = " ".repeat(cols as usize);
    BoardLayout::from_rows(&vec![row.as_str(); rows as usize])
}
