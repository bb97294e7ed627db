// Copyright (C) 2020-2026 Andy Kurnia.

use super::{error::DictionaryError, graph};
use std::io::{Read, Write};

// Big-endian u32 count, then count records of (codepoint, flags).
// flags = child << 2 | END_OF_LIST | END_OF_WORD.
// Record 0 is the sentinel, its child is the root list.

pub const END_OF_WORD: u32 = 0x1;
pub const END_OF_LIST: u32 = 0x2;
pub const CHILD_SHIFT: u32 = 2;
pub const MAX_RECORDS: usize = 1 << 30;
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LetterNode {
    letter: char,
    bits: u32,
}

impl LetterNode {
    #[inline(always)]
    pub fn letter(&self) -> char {
        self.letter
    }

    #[inline(always)]
    pub fn accepts(&self) -> bool {
        self.bits & END_OF_WORD != 0
    }

    #[inline(always)]
    pub fn is_end(&self) -> bool {
        self.bits & END_OF_LIST != 0
    }

    #[inline(always)]
    pub fn arc_index(&self) -> u32 {
        self.bits >> CHILD_SHIFT
    }
}

#[inline(always)]
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

pub fn gzip(bytes: &[u8]) -> Result<Vec<u8>, DictionaryError> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::best());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, DictionaryError> {
    let mut ret = Vec::new();
    flate2::read::GzDecoder::new(bytes)
        .read_to_end(&mut ret)
        .map_err(|e| DictionaryError::Corrupt(format!("bad gzip stream: {}", e)))?;
    Ok(ret)
}

pub fn encode<G: graph::WordGraph + ?Sized>(graph: &G) -> Result<Vec<u8>, DictionaryError> {
    // pass 1: assign records, breadth-first over lists.
    let mut pos = vec![0u32; graph.node_capacity()];
    let mut records = vec![0u32];
    let mut queue = std::collections::VecDeque::new();
    let root = graph.root_head();
    if root != 0 {
        queue.push_back(root);
    }
    while let Some(head) = queue.pop_front() {
        if pos[head as usize] != 0 {
            continue;
        }
        let mut p = head;
        while p != 0 {
            if pos[p as usize] == 0 {
                pos[p as usize] = records.len() as u32;
            }
            records.push(p);
            let child = graph.child(p);
            if child != 0 && pos[child as usize] == 0 {
                queue.push_back(child);
            }
            p = graph.next(p);
        }
        if records.len() > MAX_RECORDS {
            return Err(DictionaryError::TooLarge(records.len()));
        }
    }

    // pass 2: emit.
    let mut ret = Vec::with_capacity(4 + records.len() * 8);
    ret.extend_from_slice(&(records.len() as u32).to_be_bytes());
    ret.extend_from_slice(&0u32.to_be_bytes());
    ret.extend_from_slice(&((pos[root as usize] << CHILD_SHIFT) | END_OF_LIST).to_be_bytes());
    for &p in &records[1..] {
        let child = graph.child(p);
        let mut flags = pos[child as usize] << CHILD_SHIFT;
        if graph.next(p) == 0 {
            flags |= END_OF_LIST;
        }
        if graph.is_end_of_word(p) {
            flags |= END_OF_WORD;
        }
        ret.extend_from_slice(&(graph.letter(p) as u32).to_be_bytes());
        ret.extend_from_slice(&flags.to_be_bytes());
    }
    tracing::debug!(records = records.len(), bytes = ret.len(), "encoded");
    Ok(ret)
}

#[inline(always)]
fn be_u32(bytes: &[u8], idx: usize) -> u32 {
    u32::from_be_bytes([bytes[idx], bytes[idx + 1], bytes[idx + 2], bytes[idx + 3]])
}

// Structural checks only. Cycles are found by the dictionary's load traversal.
pub fn decode(bytes: &[u8]) -> Result<Box<[LetterNode]>, DictionaryError> {
    if is_gzip(bytes) {
        return decode_raw(&gunzip(bytes)?);
    }
    decode_raw(bytes)
}

fn decode_raw(bytes: &[u8]) -> Result<Box<[LetterNode]>, DictionaryError> {
    if bytes.is_empty() {
        return Err(DictionaryError::Empty);
    }
    if bytes.len() < 4 {
        return Err(DictionaryError::Truncated {
            expected: 4,
            actual: bytes.len(),
        });
    }
    let count = be_u32(bytes, 0) as usize;
    let expected = count.saturating_mul(8).saturating_add(4);
    if bytes.len() < expected {
        return Err(DictionaryError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(DictionaryError::Corrupt(format!(
            "{} trailing bytes",
            bytes.len() - expected
        )));
    }
    if count == 0 {
        return Err(DictionaryError::Corrupt("no sentinel record".into()));
    }
    let mut nodes = Vec::<LetterNode>::with_capacity(count);
    for i in 0..count {
        let codepoint = be_u32(bytes, 4 + 8 * i);
        let bits = be_u32(bytes, 8 + 8 * i);
        let Some(letter) = char::from_u32(codepoint) else {
            return Err(DictionaryError::Corrupt(format!(
                "record {} has invalid code point {:#x}",
                i, codepoint
            )));
        };
        let node = LetterNode { letter, bits };
        if node.arc_index() as usize >= count {
            return Err(DictionaryError::Corrupt(format!(
                "record {} has child {} out of {} records",
                i,
                node.arc_index(),
                count
            )));
        }
        if i == 0 {
            if codepoint != 0 || !node.is_end() || node.accepts() {
                return Err(DictionaryError::Corrupt("malformed sentinel record".into()));
            }
        } else if codepoint == 0 {
            return Err(DictionaryError::Corrupt(format!(
                "record {} uses the reserved code point 0",
                i
            )));
        }
        if let Some(prev) = nodes.last() {
            if i > 1 && !prev.is_end() && prev.letter >= letter {
                return Err(DictionaryError::Corrupt(format!(
                    "record {} is not in letter order",
                    i
                )));
            }
        }
        nodes.push(node);
    }
    if !nodes[count - 1].is_end() {
        return Err(DictionaryError::Corrupt(
            "last record does not end its list".into(),
        ));
    }
    Ok(nodes.into_boxed_slice())
}
