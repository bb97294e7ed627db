// Copyright (C) 2020-2026 Andy Kurnia.

use super::{codec, error, trie};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildFormat {
    Raw,
    Gzip,
}

impl BuildFormat {
    // gzip when the file name ends in .gz
    pub fn for_path(path: &str) -> Self {
        if path.ends_with(".gz") {
            BuildFormat::Gzip
        } else {
            BuildFormat::Raw
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BuildStats {
    pub words: usize,
    pub duplicates: usize,
    pub rejected: usize,
    pub trie_nodes: usize,
    pub live_nodes: usize,
    pub bytes: usize,
}

// words -> trie -> dawg -> bytes.
pub fn build<S: AsRef<str>>(
    build_format: BuildFormat,
    words: &[S],
) -> error::Returns<(Vec<u8>, BuildStats)> {
    let mut t = trie::Trie::build(words);
    let trie_nodes = t.num_nodes();
    let reduce_stats = t.reduce();
    let mut bytes = codec::encode(&t)?;
    if build_format == BuildFormat::Gzip {
        bytes = codec::gzip(&bytes)?;
    }
    let stats = BuildStats {
        words: t.num_words(),
        duplicates: t.num_duplicates(),
        rejected: t.num_rejected(),
        trie_nodes,
        live_nodes: reduce_stats.live_nodes,
        bytes: bytes.len(),
    };
    tracing::info!(
        words = stats.words,
        trie_nodes = stats.trie_nodes,
        live_nodes = stats.live_nodes,
        bytes = stats.bytes,
        ?build_format,
        "built dawg"
    );
    Ok((bytes, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dictionary, graph::WordGraph};

    #[test]
    fn formats() {
        assert_eq!(BuildFormat::for_path("csw.dawg.gz"), BuildFormat::Gzip);
        assert_eq!(BuildFormat::for_path("csw.dawg"), BuildFormat::Raw);
        let words = ["AA", "AB", "BA", "BB"];
        let (raw, raw_stats) = build(BuildFormat::Raw, &words).unwrap();
        let (zipped, _) = build(BuildFormat::Gzip, &words).unwrap();
        assert!(codec::is_gzip(&zipped));
        assert_eq!(raw_stats.bytes, raw.len());
        assert_eq!(raw_stats.trie_nodes, 6);
        assert_eq!(raw_stats.live_nodes, 4);
        for bytes in [raw, zipped] {
            let d = dictionary::Dictionary::from_bytes(&bytes).unwrap();
            assert_eq!(d.words().collect::<Vec<_>>(), words);
            assert!(!d.has_word("B"));
        }
    }
}
