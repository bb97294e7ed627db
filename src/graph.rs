// Copyright (C) 2020-2026 Andy Kurnia.

// Node 0 is the sentinel in every implementation; child(0) is the root list.
// A 0 child or next means absent. Sibling lists are sorted by letter.
pub trait WordGraph {
    fn letter(&self, p: u32) -> char;
    fn is_end_of_word(&self, p: u32) -> bool;
    fn child(&self, p: u32) -> u32;
    fn next(&self, p: u32) -> u32;
    // exclusive upper bound of node indexes.
    fn node_capacity(&self) -> usize;

    #[inline(always)]
    fn root_head(&self) -> u32 {
        self.child(0)
    }

    // the node with this letter in the list starting at head, or 0.
    fn seek(&self, head: u32, letter: char) -> u32 {
        let mut p = head;
        while p != 0 {
            let here = self.letter(p);
            if here == letter {
                return p;
            }
            if here > letter {
                break;
            }
            p = self.next(p);
        }
        0
    }

    // the node reached by spelling prefix from the root. 0 for the empty prefix.
    fn match_prefix(&self, prefix: &str) -> Option<u32> {
        let mut p = 0;
        for c in prefix.chars() {
            p = self.seek(self.child(p), c);
            if p == 0 {
                return None;
            }
        }
        Some(p)
    }

    fn has_word(&self, word: &str) -> bool {
        match self.match_prefix(word) {
            Some(p) => p != 0 && self.is_end_of_word(p),
            None => false,
        }
    }

    // true if seq is a contiguous substring of some word.
    fn has_sequence(&self, seq: &str) -> bool {
        let mut chars = seq.chars();
        let Some(first) = chars.next() else {
            return self.root_head() != 0;
        };
        let rest = chars.collect::<Vec<_>>();
        let mut visited = vec![false; self.node_capacity()];
        let mut stack = vec![self.root_head()];
        while let Some(mut p) = stack.pop() {
            while p != 0 {
                if !visited[p as usize] {
                    visited[p as usize] = true;
                    if self.letter(p) == first && self.follows(p, &rest) {
                        return true;
                    }
                    stack.push(self.child(p));
                }
                p = self.next(p);
            }
        }
        false
    }

    // true if rest can be spelled starting below p.
    fn follows(&self, mut p: u32, rest: &[char]) -> bool {
        for &c in rest {
            p = self.seek(self.child(p), c);
            if p == 0 {
                return false;
            }
        }
        true
    }
}
