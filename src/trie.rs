// Copyright (C) 2020-2026 Andy Kurnia.

use super::{error, graph, reduce};

#[derive(Clone, Debug, Default)]
pub struct TrieNode {
    pub letter: char,
    pub is_end_of_word: bool,
    pub child: u32,
    pub next: u32,
    // longest suffix below this node.
    pub max_child_depth: u32,
    pub number_of_children: u32,
    pub is_pruned: bool,
    pub is_first_child: bool,
}

// Index 0 is the root sentinel. Its child is the first top-level node.
#[derive(Clone)]
pub struct Trie {
    pub(crate) nodes: Vec<TrieNode>,
    // nodes of the previously inserted word, root first.
    path: Vec<u32>,
    previous: Vec<char>,
    num_words: usize,
    num_duplicates: usize,
    num_rejected: usize,
    pub(crate) reduced: Option<reduce::ReduceStats>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            path: Vec::new(),
            previous: Vec::new(),
            num_words: 0,
            num_duplicates: 0,
            num_rejected: 0,
            reduced: None,
        }
    }

    // Sorted deduplicated input is fastest, but any order works.
    pub fn build<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for word in words {
            if let Err(e) = trie.insert(word.as_ref()) {
                tracing::warn!("{}", e);
            }
        }
        tracing::debug!(
            words = trie.num_words,
            duplicates = trie.num_duplicates,
            rejected = trie.num_rejected,
            nodes = trie.num_nodes(),
            "built trie"
        );
        trie
    }

    // Ok(false) for a duplicate or an empty word.
    pub fn insert(&mut self, word: &str) -> Result<bool, error::TrieError> {
        if self.reduced.is_some() {
            self.num_rejected += 1;
            return Err(error::TrieError::AlreadyReduced {
                word: word.to_string(),
            });
        }
        if word.contains('\0') {
            self.num_rejected += 1;
            return Err(error::TrieError::ReservedCharacter {
                word: word.to_string(),
            });
        }
        let chars = word.chars().collect::<Vec<_>>();
        if chars.is_empty() {
            return Ok(false);
        }
        let common = chars
            .iter()
            .zip(self.previous.iter())
            .take_while(|(a, b)| a == b)
            .count()
            .min(self.path.len());
        // the previous word's node at the diverging depth, a sibling to start scanning from.
        let hint = self.path.get(common).copied().unwrap_or(0);
        self.path.truncate(common);
        for (depth, &c) in chars.iter().enumerate().skip(common) {
            let parent = if depth == 0 { 0 } else { self.path[depth - 1] };
            let start = if depth == common && hint != 0 && self.nodes[hint as usize].letter < c {
                hint
            } else {
                0
            };
            let p = self.find_or_insert(parent, start, c);
            self.path.push(p);
        }
        let len = chars.len() as u32;
        for (depth, &p) in self.path.iter().enumerate() {
            let node = &mut self.nodes[p as usize];
            node.max_child_depth = node.max_child_depth.max(len - 1 - depth as u32);
        }
        self.nodes[0].max_child_depth = self.nodes[0].max_child_depth.max(len);
        self.previous = chars;
        let last = &mut self.nodes[self.path[self.path.len() - 1] as usize];
        if last.is_end_of_word {
            self.num_duplicates += 1;
            Ok(false)
        } else {
            last.is_end_of_word = true;
            self.num_words += 1;
            Ok(true)
        }
    }

    // start is 0 or a child of parent whose letter is less than c.
    fn find_or_insert(&mut self, parent: u32, start: u32, c: char) -> u32 {
        let mut prev = 0;
        let mut p = if start != 0 {
            start
        } else {
            self.nodes[parent as usize].child
        };
        while p != 0 {
            let node = &self.nodes[p as usize];
            if node.letter == c {
                return p;
            }
            if node.letter > c {
                break;
            }
            prev = p;
            p = node.next;
        }
        let new_idx = self.nodes.len() as u32;
        self.nodes.push(TrieNode {
            letter: c,
            next: p,
            is_first_child: prev == 0,
            ..Default::default()
        });
        if prev == 0 {
            if p != 0 {
                self.nodes[p as usize].is_first_child = false;
            }
            self.nodes[parent as usize].child = new_idx;
        } else {
            self.nodes[prev as usize].next = new_idx;
        }
        self.nodes[parent as usize].number_of_children += 1;
        new_idx
    }

    pub fn reduce(&mut self) -> reduce::ReduceStats {
        reduce::reduce(self)
    }

    #[inline(always)]
    pub fn nodes(&self) -> &[TrieNode] {
        &self.nodes
    }

    // excludes the sentinel.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len() - 1
    }

    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.num_words
    }

    #[inline(always)]
    pub fn num_duplicates(&self) -> usize {
        self.num_duplicates
    }

    #[inline(always)]
    pub fn num_rejected(&self) -> usize {
        self.num_rejected
    }

    #[inline(always)]
    pub fn is_reduced(&self) -> bool {
        self.reduced.is_some()
    }
}

impl graph::WordGraph for Trie {
    #[inline(always)]
    fn letter(&self, p: u32) -> char {
        self.nodes[p as usize].letter
    }

    #[inline(always)]
    fn is_end_of_word(&self, p: u32) -> bool {
        self.nodes[p as usize].is_end_of_word
    }

    #[inline(always)]
    fn child(&self, p: u32) -> u32 {
        self.nodes[p as usize].child
    }

    #[inline(always)]
    fn next(&self, p: u32) -> u32 {
        self.nodes[p as usize].next
    }

    #[inline(always)]
    fn node_capacity(&self) -> usize {
        self.nodes.len()
    }
}
