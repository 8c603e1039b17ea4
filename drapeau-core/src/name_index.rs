//! Subcommand name index.
//!
//! A fixed number of buckets, each owning a singly linked chain of entries.
//! Names are hashed with 32-bit FNV-1a; lookups compare names exactly so
//! colliding names stay apart.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a over the UTF-8 bytes of `name`.
pub fn fnv1a(name: &str) -> u32 {
    name.bytes()
        .fold(FNV_OFFSET_BASIS, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME))
}

/// Bucket for `name` in a table of `buckets` buckets.
pub fn bucket_of(name: &str, buckets: usize) -> usize {
    let hash = fnv1a(name);
    // keeps the low 10 bits
    let folded = hash ^ ((hash >> 10) << 10);
    folded as usize % buckets.max(1)
}

#[derive(Debug)]
struct Entry {
    name: String,
    slot: usize,
    next: Option<Box<Entry>>,
}

#[derive(Debug)]
pub struct NameIndex {
    buckets: Vec<Option<Box<Entry>>>,
    len: usize,
}

impl NameIndex {
    pub fn new(bucket_count: usize) -> Self {
        let mut buckets = Vec::with_capacity(bucket_count.max(1));
        buckets.resize_with(bucket_count.max(1), || None);
        Self { buckets, len: 0 }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `name` at the tail of its chain and hand out the next slot.
    ///
    /// Returns `None` when the name is already present.
    pub fn insert(&mut self, name: &str) -> Option<usize> {
        if self.find(name).is_some() {
            return None;
        }

        let bucket = bucket_of(name, self.buckets.len());
        let slot = self.len;

        let mut cursor = &mut self.buckets[bucket];
        while let Some(entry) = cursor {
            cursor = &mut entry.next;
        }
        *cursor = Some(Box::new(Entry {
            name: name.to_owned(),
            slot,
            next: None,
        }));

        self.len += 1;
        Some(slot)
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        let bucket = bucket_of(name, self.buckets.len());
        let mut cursor = self.buckets[bucket].as_deref();
        while let Some(entry) = cursor {
            if entry.name == name {
                return Some(entry.slot);
            }
            cursor = entry.next.as_deref();
        }
        None
    }

    /// Number of entries chained in `name`'s bucket.
    pub fn chain_len(&self, name: &str) -> usize {
        let bucket = bucket_of(name, self.buckets.len());
        let mut count = 0;
        let mut cursor = self.buckets[bucket].as_deref();
        while let Some(entry) = cursor {
            count += 1;
            cursor = entry.next.as_deref();
        }
        count
    }

    /// Unchain every bucket.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            let mut next = bucket.take();
            while let Some(mut entry) = next {
                next = entry.next.take();
            }
        }
        self.len = 0;
    }
}

impl Drop for NameIndex {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(""), 0x811c_9dc5);
        assert_eq!(fnv1a("a"), 0xe40c_292c);
        assert_eq!(fnv1a("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_bucket_is_low_ten_bits() {
        for name in ["build", "run", "init", "watch"] {
            assert_eq!(bucket_of(name, 1024), (fnv1a(name) & 0x3ff) as usize);
        }
    }

    #[test]
    fn test_insert_then_find() {
        let mut index = NameIndex::new(1024);
        assert_eq!(index.insert("build"), Some(0));
        assert_eq!(index.insert("run"), Some(1));
        assert_eq!(index.find("build"), Some(0));
        assert_eq!(index.find("run"), Some(1));
        assert_eq!(index.find("init"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut index = NameIndex::new(16);
        assert_eq!(index.insert("build"), Some(0));
        assert_eq!(index.insert("build"), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_collisions_chain_in_one_bucket() {
        let mut index = NameIndex::new(1);
        for (slot, name) in ["a", "b", "c", "d"].iter().enumerate() {
            assert_eq!(index.insert(name), Some(slot));
        }
        assert_eq!(index.chain_len("a"), 4);
        assert_eq!(index.find("c"), Some(2));
        assert_eq!(index.find("e"), None);
    }

    #[test]
    fn test_clear_unchains_everything() {
        let mut index = NameIndex::new(2);
        index.insert("build");
        index.insert("run");
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.find("build"), None);
        assert_eq!(index.chain_len("run"), 0);
    }
}
