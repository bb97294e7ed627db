// Copyright (C) 2020-2026 Andy Kurnia.

use super::{fash, trie};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReduceStats {
    pub nodes_pruned: usize,
    // excludes the sentinel.
    pub live_nodes: usize,
}

// (letter, is_end_of_word, canonical child, canonical next)
type NodeKey = (char, bool, u32, u32);

fn same_subtrie(nodes: &[trie::TrieNode], a: u32, b: u32) -> bool {
    if a == b {
        return true;
    }
    if a == 0 || b == 0 {
        return false;
    }
    let (x, y) = (&nodes[a as usize], &nodes[b as usize]);
    x.letter == y.letter
        && x.is_end_of_word == y.is_end_of_word
        && x.number_of_children == y.number_of_children
        && (x.child == 0) == (y.child == 0)
        && (x.next == 0) == (y.next == 0)
        && same_subtrie(nodes, x.child, y.child)
        && same_subtrie(nodes, x.next, y.next)
}

// Merges identical subtries in place. Pruned nodes stay in the arena but are
// no longer reachable from the root.
pub fn reduce(t: &mut trie::Trie) -> ReduceStats {
    if let Some(stats) = t.reduced {
        return stats;
    }
    let nodes = &mut t.nodes;
    let mut canon = (0..nodes.len() as u32).collect::<Vec<_>>();
    let mut buckets =
        vec![fash::MyHashMap::<NodeKey, u32>::default(); nodes[0].max_child_depth as usize + 1];
    let mut nodes_pruned = 0;

    // post-order: the child subtrie and the rest of the sibling list come first.
    let mut stack = Vec::new();
    if nodes[0].child != 0 {
        stack.push((nodes[0].child, false));
    }
    while let Some((p, expanded)) = stack.pop() {
        let pu = p as usize;
        if !expanded {
            stack.push((p, true));
            if nodes[pu].next != 0 {
                stack.push((nodes[pu].next, false));
            }
            if nodes[pu].child != 0 {
                stack.push((nodes[pu].child, false));
            }
            continue;
        }
        let child = canon[nodes[pu].child as usize];
        let next = canon[nodes[pu].next as usize];
        nodes[pu].child = child;
        nodes[pu].next = next;
        let key = (nodes[pu].letter, nodes[pu].is_end_of_word, child, next);
        let bucket = &mut buckets[nodes[pu].max_child_depth as usize];
        if let Some(&c) = bucket.get(&key) {
            if same_subtrie(nodes, c, p) {
                assert!(
                    !nodes[c as usize].is_pruned,
                    "node {} merged into pruned node {}",
                    p,
                    c
                );
                nodes[pu].is_pruned = true;
                canon[pu] = c;
                nodes_pruned += 1;
                continue;
            }
        }
        bucket.insert(key, p);
    }
    nodes[0].child = canon[nodes[0].child as usize];

    let stats = ReduceStats {
        nodes_pruned,
        live_nodes: nodes.len() - 1 - nodes_pruned,
    };
    tracing::debug!(
        nodes_pruned = stats.nodes_pruned,
        live_nodes = stats.live_nodes,
        "reduced trie"
    );
    t.reduced = Some(stats);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WordGraph;
    use rand::{Rng, SeedableRng};

    #[test]
    fn cats_hats() {
        let mut t = trie::Trie::build(["CATS", "HATS"]);
        assert_eq!(t.num_nodes(), 8);
        let stats = t.reduce();
        // C H, then one shared A T S.
        assert_eq!(stats.live_nodes, 5);
        assert_eq!(stats.nodes_pruned, 3);
        assert_eq!(t.reduce(), stats);
        let c = t.match_prefix("C").unwrap();
        let h = t.match_prefix("H").unwrap();
        assert_eq!(t.child(c), t.child(h));
        assert!(t.has_word("CATS"));
        assert!(t.has_word("HATS"));
        assert!(!t.has_word("CAT"));
    }

    #[test]
    fn shared_suffix_lists() {
        let words = ["BAT", "BATS", "CAT", "CATS", "MAT", "RAT", "RATS"];
        let mut t = trie::Trie::build(words);
        let before = t.num_nodes();
        let stats = t.reduce();
        assert!(stats.live_nodes < before);
        for w in words {
            assert!(t.has_word(w), "{}", w);
        }
        // MAT has no S, so its T differs from the others.
        let b = t.match_prefix("BA").unwrap();
        let m = t.match_prefix("MA").unwrap();
        let r = t.match_prefix("RA").unwrap();
        assert_eq!(t.child(b), t.child(r));
        assert_ne!(t.child(b), t.child(m));
        assert!(!t.has_word("MATS"));
    }

    #[test]
    fn membership_is_unchanged() {
        let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(0x5eed);
        let mut words = Vec::new();
        for _ in 0..400 {
            let len = rng.random_range(1..7);
            let w = (0..len)
                .map(|_| (b'A' + rng.random_range(0..5)) as char)
                .collect::<String>();
            words.push(w);
        }
        let mut probes = words.clone();
        for w in &words {
            probes.push(format!("{}A", w));
            probes.push(w[1..].to_string());
        }
        let mut t = trie::Trie::build(&words);
        let before = probes
            .iter()
            .map(|w| (t.has_word(w), t.has_sequence(w)))
            .collect::<Vec<_>>();
        let stats = t.reduce();
        assert!(stats.live_nodes <= t.num_nodes());
        let after = probes
            .iter()
            .map(|w| (t.has_word(w), t.has_sequence(w)))
            .collect::<Vec<_>>();
        assert_eq!(before, after);
        for w in &words {
            assert!(t.has_word(w));
        }
        let nodes = t.nodes();
        assert!(nodes.iter().skip(1).filter(|n| !n.is_pruned).all(|n| {
            !nodes[n.child as usize].is_pruned && !nodes[n.next as usize].is_pruned
        }));
    }
}
