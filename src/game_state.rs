// Copyright (C) 2020-2026 Andy Kurnia.

use super::{bag, error, game_config, movegen, play_scorer};
use rand::prelude::*;

fn use_tiles<II: IntoIterator<Item = u8>>(
    rack: &mut Vec<u8>,
    tiles_iter: II,
) -> error::Returns<()> {
    for tile in tiles_iter {
        let pos = rack.iter().rposition(|&t| t == tile).ok_or("bad tile")?;
        rack.swap_remove(pos);
    }
    Ok(())
}

#[derive(Clone)]
pub struct GamePlayer {
    pub score: i16,
    pub rack: Vec<u8>,
}

#[derive(Clone)]
pub struct GameState<'a> {
    pub game_config: &'a game_config::GameConfig,
    pub players: Box<[GamePlayer]>,
    pub board_tiles: Box<[u8]>,
    pub bag: bag::Bag,
    pub turn: u8,
    pub zero_turns: u16,
}

impl<'a> GameState<'a> {
    pub fn new(game_config: &'a game_config::GameConfig) -> Self {
        let rack_size = game_config.rack_size() as usize;
        Self {
            game_config,
            players: (0..game_config.num_players())
                .map(|_| GamePlayer {
                    score: 0,
                    rack: Vec::with_capacity(rack_size),
                })
                .collect(),
            board_tiles: vec![0u8; game_config.board_layout().dim().area()].into_boxed_slice(),
            bag: bag::Bag::new(game_config.alphabet()),
            turn: 0,
            zero_turns: 0,
        }
    }

    // shuffle and deal.
    pub fn reset_and_draw_tiles(&mut self, rng: &mut dyn RngCore) {
        *self = Self::new(self.game_config);
        self.bag.shuffle(rng);
        let rack_size = self.game_config.rack_size() as usize;
        for player in self.players.iter_mut() {
            self.bag.replenish(&mut player.rack, rack_size);
        }
    }

    pub fn current_player(&self) -> &GamePlayer {
        &self.players[self.turn as usize]
    }

    // The rack must hold the tiles. Word validity is the caller's concern.
    pub fn play(&mut self, play: &movegen::Play) -> error::Returns<()> {
        let movegen::Play::Place {
            down,
            lane,
            idx,
            word,
            score,
        } = play;
        let current_player = &mut self.players[self.turn as usize];
        play_scorer::check_rack(
            play,
            &current_player.rack,
            self.game_config.alphabet().len(),
        )?;
        let strider = self.game_config.board_layout().dim().lane(*down, *lane);

        // place the tiles
        for (i, &tile) in (*idx..).zip(word.iter()) {
            if tile != 0 {
                self.board_tiles[strider.at(i)] = tile;
            }
        }

        current_player.score += score;
        use_tiles(
            &mut current_player.rack,
            word.iter().filter_map(|&tile| {
                if tile != 0 {
                    Some(tile & !((tile as i8) >> 7) as u8)
                } else {
                    None
                }
            }),
        )?;
        self.bag.replenish(
            &mut current_player.rack,
            self.game_config.rack_size() as usize,
        );
        if *score == 0 {
            self.zero_turns += 1;
        } else {
            self.zero_turns = 0;
        }
        Ok(())
    }

    pub fn pass(&mut self) {
        self.zero_turns += 1;
    }

    pub fn next_turn(&mut self) {
        let num_players = self.players.len() as u8;
        self.turn += 1;
        self.turn -= num_players & -((self.turn >= num_players) as i8) as u8;
    }

    // someone went out, or every player scored nothing twice in a row.
    pub fn is_over(&self) -> bool {
        (self.bag.is_empty() && self.players.iter().any(|player| player.rack.is_empty()))
            || self.zero_turns >= 2 * self.players.len() as u16
    }

    // unplayed tiles count against their holder, and the player who went
    // out gains them.
    pub fn finalize_scores(&mut self) {
        let alphabet = self.game_config.alphabet();
        let penalties = self
            .players
            .iter()
            .map(|player| {
                player
                    .rack
                    .iter()
                    .map(|&tile| alphabet.score(tile) as i16)
                    .sum::<i16>()
            })
            .collect::<Vec<_>>();
        let total = penalties.iter().sum::<i16>();
        for (player, &penalty) in self.players.iter_mut().zip(penalties.iter()) {
            if player.rack.is_empty() && self.bag.is_empty() {
                player.score += total;
            } else {
                player.score -= penalty;
            }
        }
    }
}
