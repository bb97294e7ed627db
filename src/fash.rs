// Copyright (C) 2020-2026 Andy Kurnia.

// Fast insecure non-cryptographic hash, for keys that are small tuples of
// node indexes (the reducer's buckets) and letters.

#[derive(Default)]
pub struct MyHasher(u64);

impl std::hash::Hasher for MyHasher {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (std::num::Wrapping(self.0) * std::num::Wrapping(3467)).0 ^ (!b as u64);
        }
    }

    #[inline(always)]
    fn write_u32(&mut self, i: u32) {
        self.0 = (std::num::Wrapping(self.0) * std::num::Wrapping(0x100000001b3)).0 ^ (i as u64);
    }

    #[inline(always)]
    fn write_u8(&mut self, i: u8) {
        self.write_u32(i as u32);
    }
}

pub type MyHasherDefault = std::hash::BuildHasherDefault<MyHasher>;
pub type MyHashMap<K, V> = std::collections::HashMap<K, V, MyHasherDefault>;
pub type MyHashSet<T> = std::collections::HashSet<T, MyHasherDefault>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_small_keys() {
        let mut m = MyHashMap::<(u32, u32), u32>::default();
        for a in 0..50u32 {
            for b in 0..50u32 {
                m.insert((a, b), a * 100 + b);
            }
        }
        assert_eq!(m.len(), 2500);
        assert_eq!(m[&(7, 42)], 742);
        let s = ['A', 'B', 'A'].into_iter().collect::<MyHashSet<char>>();
        assert_eq!(s.len(), 2);
    }
}
