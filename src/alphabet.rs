// Copyright (C) 2020-2026 Andy Kurnia.

use super::{error, fash};

// Tile 0 is the blank. Board tiles set 0x80 for a blank standing for a letter.
// Indexes stay below 64 so a cross-set fits in a u64.

pub struct Tile {
    letter: char,
    freq: u8,
    score: i8,
}

const fn t(letter: char, freq: u8, score: i8) -> Tile {
    Tile {
        letter,
        freq,
        score,
    }
}

static ENGLISH_TILES: &[Tile] = &[
    t('?', 2, 0),
    t('A', 9, 1),
    t('B', 2, 3),
    t('C', 2, 3),
    t('D', 4, 2),
    t('E', 12, 1),
    t('F', 2, 4),
    t('G', 3, 2),
    t('H', 2, 4),
    t('I', 9, 1),
    t('J', 1, 8),
    t('K', 1, 5),
    t('L', 4, 1),
    t('M', 2, 3),
    t('N', 6, 1),
    t('O', 8, 1),
    t('P', 2, 3),
    t('Q', 1, 10),
    t('R', 6, 1),
    t('S', 4, 1),
    t('T', 6, 1),
    t('U', 4, 1),
    t('V', 2, 4),
    t('W', 2, 4),
    t('X', 1, 8),
    t('Y', 2, 4),
    t('Z', 1, 10),
];

static POLISH_TILES: &[Tile] = &[
    t('?', 2, 0),
    t('A', 9, 1),
    t('Ą', 1, 5),
    t('B', 2, 3),
    t('C', 3, 2),
    t('Ć', 1, 6),
    t('D', 3, 2),
    t('E', 7, 1),
    t('Ę', 1, 5),
    t('F', 1, 5),
    t('G', 2, 3),
    t('H', 2, 3),
    t('I', 8, 1),
    t('J', 2, 3),
    t('K', 3, 2),
    t('L', 3, 2),
    t('Ł', 2, 3),
    t('M', 3, 2),
    t('N', 5, 1),
    t('Ń', 1, 7),
    t('O', 6, 1),
    t('Ó', 1, 5),
    t('P', 3, 2),
    t('R', 4, 1),
    t('S', 4, 1),
    t('Ś', 1, 5),
    t('T', 3, 2),
    t('U', 2, 3),
    t('W', 4, 1),
    t('Y', 4, 2),
    t('Z', 5, 1),
    t('Ź', 1, 9),
    t('Ż', 1, 5),
];

#[inline(always)]
pub fn is_blank_glyph(c: char) -> bool {
    matches!(c, '?' | '_' | ' ')
}

pub struct Alphabet {
    name: &'static str,
    tiles: &'static [Tile],
    ascii: [u8; 128],
    others: fash::MyHashMap<char, u8>,
}

impl Alphabet {
    fn new(name: &'static str, tiles: &'static [Tile]) -> Self {
        assert!(tiles.len() <= 64, "{} has too many tiles", name);
        let mut ascii = [0u8; 128];
        let mut others = fash::MyHashMap::default();
        for (idx, tile) in tiles.iter().enumerate().skip(1) {
            if (tile.letter as u32) < 128 {
                ascii[tile.letter as usize] = idx as u8;
            } else {
                others.insert(tile.letter, idx as u8);
            }
        }
        Self {
            name,
            tiles,
            ascii,
            others,
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn len(&self) -> u8 {
        self.tiles.len() as u8
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.tiles.len() <= 1
    }

    // the letter a board or rack tile stands for, ignoring the blank bit.
    #[inline(always)]
    pub fn letter(&self, tile: u8) -> Option<char> {
        let c = tile & 0x7f;
        if c == 0 || c >= self.len() {
            None
        } else {
            Some(self.tiles[c as usize].letter)
        }
    }

    #[inline(always)]
    pub fn tile_of(&self, letter: char) -> Option<u8> {
        let idx = if (letter as u32) < 128 {
            self.ascii[letter as usize]
        } else {
            self.others.get(&letter).copied().unwrap_or(0)
        };
        if idx == 0 { None } else { Some(idx) }
    }

    // blanks on the board (0x80 set) score as tile 0.
    #[inline(always)]
    pub fn score(&self, tile: u8) -> i8 {
        self.tiles[(tile & !((tile as i8) >> 7) as u8) as usize].score
    }

    #[inline(always)]
    pub fn freq(&self, tile: u8) -> u8 {
        self.tiles[tile as usize].freq
    }

    pub fn num_tiles(&self) -> u16 {
        self.tiles.iter().map(|tile| tile.freq as u16).sum()
    }

    // uppercase for a real tile, lowercase for a blank.
    pub fn board_char(&self, tile: u8) -> Option<char> {
        let c = self.letter(tile)?;
        if tile & 0x80 == 0 {
            Some(c)
        } else {
            c.to_lowercase().next()
        }
    }

    pub fn rack_char(&self, tile: u8) -> Option<char> {
        if tile == 0 {
            Some(self.tiles[0].letter)
        } else {
            self.letter(tile)
        }
    }

    pub fn parse_rack(&self, s: &str) -> error::Returns<Vec<u8>> {
        let mut rack = Vec::with_capacity(s.len());
        for c in s.chars() {
            if is_blank_glyph(c) {
                rack.push(0);
            } else if let Some(tile) = c.to_uppercase().next().and_then(|u| self.tile_of(u)) {
                rack.push(tile);
            } else {
                return_error!(format!(
                    "invalid tile {:?} in rack {:?} for {}",
                    c, s, self.name
                ));
            }
        }
        Ok(rack)
    }

    // '.' or '*' or '_' or ' ' is an empty square, lowercase is a blank.
    pub fn parse_board_char(&self, c: char) -> error::Returns<u8> {
        if matches!(c, '.' | '*' | '_' | ' ') {
            return Ok(0);
        }
        if let Some(tile) = self.tile_of(c) {
            return Ok(tile);
        }
        if let Some(tile) = c.to_uppercase().next().and_then(|u| self.tile_of(u)) {
            return Ok(tile | 0x80);
        }
        return_error!(format!("invalid board tile {:?} for {}", c, self.name));
    }

    pub fn fmt_rack(&self, rack: &[u8]) -> String {
        rack.iter().filter_map(|&tile| self.rack_char(tile)).collect()
    }
}

pub fn make_english_alphabet() -> Alphabet {
    Alphabet::new("english", ENGLISH_TILES)
}

pub fn make_polish_alphabet() -> Alphabet {
    Alphabet::new("polish", POLISH_TILES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_distribution() {
        let alphabet = make_english_alphabet();
        assert_eq!(alphabet.len(), 27);
        assert_eq!(alphabet.num_tiles(), 100);
        assert_eq!(alphabet.tile_of('A'), Some(1));
        assert_eq!(alphabet.tile_of('Z'), Some(26));
        assert_eq!(alphabet.tile_of('a'), None);
        assert_eq!(alphabet.letter(26), Some('Z'));
        assert_eq!(alphabet.score(17), 10);
        assert_eq!(alphabet.score(17 | 0x80), 0);
    }

    #[test]
    fn polish_distribution() {
        let alphabet = make_polish_alphabet();
        assert_eq!(alphabet.num_tiles(), 100);
        let tile = alphabet.tile_of('Ź').unwrap();
        assert_eq!(alphabet.score(tile), 9);
        assert_eq!(alphabet.board_char(tile | 0x80), Some('ź'));
        assert_eq!(alphabet.parse_board_char('ż').unwrap(), alphabet.tile_of('Ż').unwrap() | 0x80);
    }

    #[test]
    fn racks() {
        let alphabet = make_english_alphabet();
        let rack = alphabet.parse_rack("aeiou??").unwrap();
        assert_eq!(rack, vec![1, 5, 9, 15, 21, 0, 0]);
        assert_eq!(alphabet.fmt_rack(&rack), "AEIOU??");
        assert!(alphabet.parse_rack("A1").is_err());
        assert_eq!(alphabet.parse_board_char('.').unwrap(), 0);
        assert_eq!(alphabet.parse_board_char('q').unwrap(), 17 | 0x80);
        assert!(alphabet.parse_board_char('#').is_err());
    }
}
