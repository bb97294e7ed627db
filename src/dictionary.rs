// Copyright (C) 2020-2026 Andy Kurnia.

use super::{alphabet, codec, error::DictionaryError, fash, graph};
use std::collections::BTreeMap;

// Read-only word graph over decoded records. Record 0 is the sentinel.
// post(n) is the contiguous list at n's child. pre(n) is every node whose
// child list contains n, held in a compressed side table.
pub struct Dictionary {
    nodes: Box<[codec::LetterNode]>,
    pre_starts: Box<[u32]>,
    pre_nodes: Box<[u32]>,
    sequence_roots: fash::MyHashMap<char, Box<[u32]>>,
    word_count: u64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Open,
    Done,
}

impl Dictionary {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DictionaryError> {
        Self::from_nodes(codec::decode(bytes)?)
    }

    pub fn load(path: &str) -> Result<Self, DictionaryError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DictionaryError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let dictionary = Self::from_bytes(&bytes)?;
        tracing::info!(
            path,
            words = dictionary.word_count(),
            records = dictionary.nodes.len(),
            "loaded dictionary"
        );
        Ok(dictionary)
    }

    // The first source that loads, or the last error.
    pub fn load_first<S: AsRef<str>>(paths: &[S]) -> Result<Self, DictionaryError> {
        let mut last_error = DictionaryError::NotFound("no dictionary sources".into());
        for path in paths {
            match Self::load(path.as_ref()) {
                Ok(dictionary) => return Ok(dictionary),
                Err(e) => {
                    tracing::warn!(path = path.as_ref(), kind = ?e.kind(), "{}", e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    // One traversal from the root: pre edges, sequence roots, word counts, and
    // rejection of cycles.
    fn from_nodes(nodes: Box<[codec::LetterNode]>) -> Result<Self, DictionaryError> {
        let n = nodes.len();
        let mut visit = vec![Visit::New; n];
        let mut counts = vec![0u64; n];
        let mut edges = Vec::<(u32, u32)>::new();
        let mut roots = BTreeMap::<char, Vec<u32>>::new();
        // (node, next child record to look at or 0)
        let mut stack = vec![(0u32, nodes[0].arc_index())];
        visit[0] = Visit::Open;
        while let Some(top) = stack.last_mut() {
            let (p, cursor) = *top;
            if cursor == 0 {
                stack.pop();
                visit[p as usize] = Visit::Done;
                let mut count = nodes[p as usize].accepts() as u64;
                let mut c = nodes[p as usize].arc_index();
                while c != 0 {
                    count += counts[c as usize];
                    c = if nodes[c as usize].is_end() { 0 } else { c + 1 };
                }
                counts[p as usize] = count;
                continue;
            }
            top.1 = if nodes[cursor as usize].is_end() {
                0
            } else {
                cursor + 1
            };
            if p != 0 {
                edges.push((cursor, p));
            }
            match visit[cursor as usize] {
                Visit::Open => {
                    return Err(DictionaryError::Corrupt(format!(
                        "cycle through record {}",
                        cursor
                    )));
                }
                Visit::Done => {}
                Visit::New => {
                    visit[cursor as usize] = Visit::Open;
                    roots
                        .entry(nodes[cursor as usize].letter())
                        .or_default()
                        .push(cursor);
                    stack.push((cursor, nodes[cursor as usize].arc_index()));
                }
            }
        }

        edges.sort_unstable();
        edges.dedup();
        let mut pre_starts = vec![0u32; n + 1];
        for &(c, _) in &edges {
            pre_starts[c as usize + 1] += 1;
        }
        for i in 0..n {
            pre_starts[i + 1] += pre_starts[i];
        }
        let pre_nodes = edges.iter().map(|&(_, p)| p).collect::<Box<_>>();
        let sequence_roots = roots
            .into_iter()
            .map(|(letter, mut v)| {
                v.sort_unstable();
                (letter, v.into_boxed_slice())
            })
            .collect();
        let word_count = counts[0];
        tracing::debug!(
            records = n,
            pre_edges = pre_nodes.len(),
            words = word_count,
            "indexed dictionary"
        );
        Ok(Self {
            nodes,
            pre_starts: pre_starts.into_boxed_slice(),
            pre_nodes,
            sequence_roots,
            word_count,
        })
    }

    #[inline(always)]
    pub fn nodes(&self) -> &[codec::LetterNode] {
        &self.nodes
    }

    #[inline(always)]
    pub fn word_count(&self) -> u64 {
        self.word_count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    // the child of the list at head with this letter, or 0.
    #[inline(always)]
    pub fn seek(&self, head: u32, letter: char) -> u32 {
        let mut p = head;
        if p == 0 {
            return 0;
        }
        loop {
            let node = &self.nodes[p as usize];
            if node.letter() == letter {
                return p;
            }
            if node.is_end() || node.letter() > letter {
                return 0;
            }
            p += 1;
        }
    }

    #[inline(always)]
    pub fn root(&self) -> Node<'_> {
        self.node(0)
    }

    #[inline(always)]
    pub fn node(&self, index: u32) -> Node<'_> {
        Node {
            dictionary: self,
            index,
        }
    }

    // The node spelled by prefix. The root for an empty prefix.
    pub fn match_prefix(&self, prefix: &str) -> Option<Node<'_>> {
        graph::WordGraph::match_prefix(self, prefix).map(|p| self.node(p))
    }

    pub fn sequence_roots(&self, letter: char) -> &[u32] {
        self.sequence_roots.get(&letter).map_or(&[][..], |v| &v[..])
    }

    pub fn words(&self) -> Words<'_> {
        let head = self.nodes[0].arc_index();
        Words {
            dictionary: self,
            stack: if head == 0 {
                Vec::new()
            } else {
                vec![(head, Step::Enter)]
            },
            word: String::new(),
        }
    }

    pub fn each_word<F: FnMut(&str)>(&self, mut visitor: F) {
        for word in self.words() {
            visitor(&word);
        }
    }

    // Every word spelled by a sub-multiset of letters, mapped to its spelling
    // with blank-supplied letters shown as '_'.
    pub fn find_anagrams(&self, letters: &str, allow_blank: bool) -> BTreeMap<String, String> {
        let mut pool = Pool::new(letters, allow_blank);
        let mut found = BTreeMap::new();
        self.anagram_list(self.nodes[0].arc_index(), &mut pool, true, &mut found);
        found
    }

    // Every sequence spelled by a sub-multiset of letters, in the same form.
    pub fn find_arrangements(&self, letters: &str, allow_blank: bool) -> BTreeMap<String, String> {
        let mut pool = Pool::new(letters, allow_blank);
        let mut found = BTreeMap::new();
        for (&letter, roots) in &self.sequence_roots {
            let Some(undo) = pool.take(letter) else {
                continue;
            };
            for &r in roots.iter() {
                found
                    .entry(pool.word.clone())
                    .or_insert_with(|| pool.blanked.clone());
                self.anagram_list(self.nodes[r as usize].arc_index(), &mut pool, false, &mut found);
            }
            pool.give_back(undo);
        }
        found
    }

    fn anagram_list(
        &self,
        head: u32,
        pool: &mut Pool,
        whole_words: bool,
        found: &mut BTreeMap<String, String>,
    ) {
        if head == 0 || pool.is_exhausted() {
            return;
        }
        let mut p = head;
        loop {
            let node = self.nodes[p as usize];
            if let Some(undo) = pool.take(node.letter()) {
                if !whole_words || node.accepts() {
                    found
                        .entry(pool.word.clone())
                        .or_insert_with(|| pool.blanked.clone());
                }
                self.anagram_list(node.arc_index(), pool, whole_words, found);
                pool.give_back(undo);
            }
            if node.is_end() {
                break;
            }
            p += 1;
        }
    }
}

// Letters still available, kept sorted, plus a count of blanks.
struct Pool {
    letters: Vec<char>,
    blanks: usize,
    word: String,
    blanked: String,
}

enum Undo {
    Letter(usize, char),
    Blank,
}

impl Pool {
    fn new(letters: &str, allow_blank: bool) -> Self {
        let mut pool = Self {
            letters: Vec::new(),
            blanks: 0,
            word: String::new(),
            blanked: String::new(),
        };
        for c in letters.chars() {
            if alphabet::is_blank_glyph(c) {
                pool.blanks += allow_blank as usize;
            } else {
                pool.letters.extend(c.to_uppercase());
            }
        }
        pool.letters.sort_unstable();
        pool
    }

    #[inline(always)]
    fn is_exhausted(&self) -> bool {
        self.letters.is_empty() && self.blanks == 0
    }

    // An exact letter when there is one, else a blank.
    fn take(&mut self, letter: char) -> Option<Undo> {
        let undo = if let Ok(idx) = self.letters.binary_search(&letter) {
            self.letters.remove(idx);
            self.blanked.push(letter);
            Undo::Letter(idx, letter)
        } else if self.blanks > 0 {
            self.blanks -= 1;
            self.blanked.push('_');
            Undo::Blank
        } else {
            return None;
        };
        self.word.push(letter);
        Some(undo)
    }

    fn give_back(&mut self, undo: Undo) {
        self.word.pop();
        self.blanked.pop();
        match undo {
            Undo::Letter(idx, letter) => self.letters.insert(idx, letter),
            Undo::Blank => self.blanks += 1,
        }
    }
}

#[derive(Clone, Copy)]
pub struct Node<'a> {
    dictionary: &'a Dictionary,
    index: u32,
}

impl<'a> Node<'a> {
    #[inline(always)]
    pub fn index(&self) -> u32 {
        self.index
    }

    // '\0' for the root.
    #[inline(always)]
    pub fn letter(&self) -> char {
        self.dictionary.nodes[self.index as usize].letter()
    }

    #[inline(always)]
    pub fn is_end_of_word(&self) -> bool {
        self.dictionary.nodes[self.index as usize].accepts()
    }

    pub fn children(&self) -> Children<'a> {
        Children {
            dictionary: self.dictionary,
            p: self.dictionary.nodes[self.index as usize].arc_index(),
        }
    }

    pub fn child(&self, letter: char) -> Option<Node<'a>> {
        let p = self
            .dictionary
            .seek(self.dictionary.nodes[self.index as usize].arc_index(), letter);
        if p == 0 {
            None
        } else {
            Some(self.dictionary.node(p))
        }
    }

    #[inline(always)]
    pub fn post(&self) -> Children<'a> {
        self.children()
    }

    pub fn pre(self) -> impl Iterator<Item = Node<'a>> {
        let dictionary = self.dictionary;
        let i = self.index as usize;
        let range = dictionary.pre_starts[i] as usize..dictionary.pre_starts[i + 1] as usize;
        dictionary.pre_nodes[range]
            .iter()
            .map(move |&p| dictionary.node(p))
    }

    pub fn post_letters(&self) -> Vec<char> {
        self.children().map(|n| n.letter()).collect()
    }

    pub fn pre_letters(&self) -> Vec<char> {
        let mut v = self.pre().map(|n| n.letter()).collect::<Vec<_>>();
        v.sort_unstable();
        v.dedup();
        v
    }
}

pub struct Children<'a> {
    dictionary: &'a Dictionary,
    p: u32,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.p == 0 {
            return None;
        }
        let p = self.p;
        self.p = if self.dictionary.nodes[p as usize].is_end() {
            0
        } else {
            p + 1
        };
        Some(self.dictionary.node(p))
    }
}

#[derive(Clone, Copy)]
enum Step {
    Enter,
    Descend,
    Advance,
}

// Depth-first in letter order, so words come out sorted.
pub struct Words<'a> {
    dictionary: &'a Dictionary,
    stack: Vec<(u32, Step)>,
    word: String,
}

impl Iterator for Words<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            let (p, step) = self.stack[depth];
            let node = self.dictionary.nodes[p as usize];
            match step {
                Step::Enter => {
                    self.stack[depth].1 = Step::Descend;
                    self.word.push(node.letter());
                    if node.accepts() {
                        return Some(self.word.clone());
                    }
                }
                Step::Descend => {
                    self.stack[depth].1 = Step::Advance;
                    if node.arc_index() != 0 {
                        self.stack.push((node.arc_index(), Step::Enter));
                    }
                }
                Step::Advance => {
                    self.word.pop();
                    if node.is_end() {
                        self.stack.pop();
                    } else {
                        self.stack[depth] = (p + 1, Step::Enter);
                    }
                }
            }
        }
    }
}

impl graph::WordGraph for Dictionary {
    #[inline(always)]
    fn letter(&self, p: u32) -> char {
        self.nodes[p as usize].letter()
    }

    #[inline(always)]
    fn is_end_of_word(&self, p: u32) -> bool {
        self.nodes[p as usize].accepts()
    }

    #[inline(always)]
    fn child(&self, p: u32) -> u32 {
        self.nodes[p as usize].arc_index()
    }

    #[inline(always)]
    fn next(&self, p: u32) -> u32 {
        if self.nodes[p as usize].is_end() {
            0
        } else {
            p + 1
        }
    }

    #[inline(always)]
    fn node_capacity(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    fn seek(&self, head: u32, letter: char) -> u32 {
        Dictionary::seek(self, head, letter)
    }

    fn has_sequence(&self, seq: &str) -> bool {
        let mut chars = seq.chars();
        let Some(first) = chars.next() else {
            return !self.is_empty();
        };
        let rest = chars.collect::<Vec<_>>();
        self.sequence_roots(first)
            .iter()
            .any(|&r| self.follows(r, &rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, trie};
    use graph::WordGraph;

    fn make_dictionary(words: &[&str]) -> Dictionary {
        let mut t = trie::Trie::build(words);
        t.reduce();
        Dictionary::from_bytes(&codec::encode(&t).unwrap()).unwrap()
    }

    fn keys(m: &BTreeMap<String, String>) -> Vec<&str> {
        m.keys().map(|k| k.as_str()).collect()
    }

    #[test]
    fn lookups() {
        let d = make_dictionary(&["CAT", "CATS", "DOG", "DOGS", "GOD"]);
        assert_eq!(d.word_count(), 5);
        assert!(d.has_word("CATS"));
        assert!(!d.has_word("CA"));
        assert!(!d.has_word(""));
        assert!(d.has_sequence("ATS"));
        assert!(d.has_sequence("OD"));
        assert!(d.has_sequence(""));
        assert!(!d.has_sequence("SC"));
        let ca = d.match_prefix("CA").unwrap();
        assert_eq!(ca.letter(), 'A');
        assert!(!ca.is_end_of_word());
        assert_eq!(ca.post_letters(), vec!['T']);
        assert_eq!(d.match_prefix("").unwrap().index(), 0);
        assert!(d.match_prefix("CAB").is_none());
        assert_eq!(d.root().post_letters(), vec!['C', 'D', 'G']);
    }

    #[test]
    fn pre_links() {
        let d = make_dictionary(&["CATS", "HATS"]);
        let a = d.match_prefix("CA").unwrap();
        assert_eq!(a.index(), d.match_prefix("HA").unwrap().index());
        assert_eq!(a.pre_letters(), vec!['C', 'H']);
        let c = d.match_prefix("C").unwrap();
        assert_eq!(c.pre().count(), 0);
        let s = d.match_prefix("CATS").unwrap();
        assert_eq!(s.pre_letters(), vec!['T']);
        assert!(s.children().next().is_none());
        assert_eq!(a.child('T').map(|n| n.letter()), Some('T'));
        assert!(a.child('X').is_none());
    }

    #[test]
    fn words_in_order() {
        let mut list = vec!["ZA", "A", "AB", "ABC", "B", "ZZZ", "ZAS"];
        let d = make_dictionary(&list);
        list.sort_unstable();
        assert_eq!(d.words().collect::<Vec<_>>(), list);
        // restartable
        assert_eq!(d.words().count(), 7);
        let mut n = 0;
        d.each_word(|_| n += 1);
        assert_eq!(n, 7);
        assert_eq!(make_dictionary(&[]).words().count(), 0);
    }

    #[test]
    fn anagrams() {
        let d = make_dictionary(&["DOG", "GOD", "GO", "OD", "DOGS", "GOOD"]);
        let found = d.find_anagrams("DOG", false);
        assert_eq!(keys(&found), vec!["DOG", "GO", "GOD", "OD"]);
        assert_eq!(found["GOD"], "GOD");
        assert!(d.find_anagrams("", true).is_empty());
        assert!(d.find_anagrams("D?G", false).is_empty());
    }

    #[test]
    fn anagrams_with_blanks() {
        let d = make_dictionary(&["DOG"]);
        let found = d.find_anagrams("D_G", true);
        assert_eq!(found.len(), 1);
        assert_eq!(found["DOG"], "D_G");
        let d = make_dictionary(&["GOOD", "GOD"]);
        let found = d.find_anagrams("dog?", true);
        assert_eq!(found["GOOD"], "GO_D");
        assert_eq!(found["GOD"], "GOD");
        let found = d.find_anagrams("??", true);
        assert!(found.is_empty());
    }

    #[test]
    fn arrangements() {
        let d = make_dictionary(&["CAT"]);
        let found = d.find_arrangements("TAC", false);
        assert_eq!(keys(&found), vec!["A", "AT", "C", "CA", "CAT", "T"]);
        let found = d.find_arrangements("T??", true);
        assert_eq!(found["CAT"], "__T");
        assert_eq!(found["AT"], "_T");
        assert_eq!(found["T"], "T");
        assert_eq!(found.len(), 6);
    }

    #[test]
    fn cycles_are_rejected() {
        // A's child list is the root list.
        let mut bytes = 2u32.to_be_bytes().to_vec();
        for (codepoint, flags) in [(0u32, (1 << 2) | 2), ('A' as u32, (1 << 2) | 3)] {
            bytes.extend_from_slice(&codepoint.to_be_bytes());
            bytes.extend_from_slice(&(flags as u32).to_be_bytes());
        }
        let e = Dictionary::from_bytes(&bytes).err().unwrap();
        assert!(matches!(e, DictionaryError::Corrupt(_)));
        assert_eq!(e.kind(), ErrorKind::Invalid);
    }

    #[test]
    fn reencoding_is_identical() {
        let mut t = trie::Trie::build(["AB", "ABS", "B", "BS", "CAB", "CABS", "XB"]);
        t.reduce();
        let bytes = codec::encode(&t).unwrap();
        let d = Dictionary::from_bytes(&bytes).unwrap();
        assert_eq!(codec::encode(&d).unwrap(), bytes);
    }

    #[test]
    fn loading_files() {
        let e = Dictionary::load("/nonexistent/path/to.dawg").err().unwrap();
        assert_eq!(e.kind(), ErrorKind::NotFound);
        let dir = std::env::temp_dir();
        let good = dir.join(format!("wordgraph-dictionary-{}.dawg.gz", std::process::id()));
        let t = trie::Trie::build(["QI"]);
        std::fs::write(&good, codec::gzip(&codec::encode(&t).unwrap()).unwrap()).unwrap();
        let good = good.to_string_lossy().into_owned();
        let d = Dictionary::load_first(&["/nonexistent/a.dawg", good.as_str()]).unwrap();
        assert!(d.has_word("QI"));
        std::fs::remove_file(&good).unwrap();
        let e = Dictionary::load_first(&["/nonexistent/a.dawg"]).err().unwrap();
        assert_eq!(e.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn shareable() {
        fn is_send_sync<T: Send + Sync>() {}
        is_send_sync::<Dictionary>();
    }
}
