// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use super::BloomFilterBuilder;
use crate::error::Error;
use crate::hash::MurmurHash3X86_32;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (added items always return `true`)
/// - False positive rate bounded by the target probability while at most
///   [`expected_items()`](Self::expected_items) items have been added
/// - Constant space usage
///
/// Construct with [`BloomFilter::new`] or [`BloomFilterBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    /// Expected number of items (n)
    pub(super) expected_items: u64,
    /// Target false positive probability (p)
    pub(super) target_fpp: f64,
    /// Total number of bits in the filter (m)
    pub(super) num_bits: u64,
    /// Number of hash functions to use (k)
    pub(super) num_hashes: u32,
    /// Count of `add` calls
    pub(super) num_items: u64,
    /// Count of bits set to 1 (for statistics)
    pub(super) num_bits_set: u64,
    /// Bit array packed into u64 words
    /// Length = ceil(num_bits / 64); bits past num_bits stay zero
    pub(super) bit_array: Box<[u64]>,
}

impl BloomFilter {
    /// Creates a filter sized for `expected_items` items at false positive probability `fpp`.
    ///
    /// Equivalent to `BloomFilterBuilder::with_accuracy(expected_items, fpp).build()`.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidParameter`](crate::error::ErrorKind::InvalidParameter) error if
    /// `expected_items` is 0 or `fpp` is not strictly between 0.0 and 1.0.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let filter = BloomFilter::new(1000, 0.01).unwrap();
    /// assert_eq!(filter.array_size(), 9586);
    /// assert_eq!(filter.num_hash_funcs(), 7);
    ///
    /// assert!(BloomFilter::new(0, 0.01).is_err());
    /// assert!(BloomFilter::new(1000, 1.0).is_err());
    /// ```
    pub fn new(expected_items: u64, fpp: f64) -> Result<Self, Error> {
        BloomFilterBuilder::with_accuracy(expected_items, fpp).build()
    }

    /// Adds an element to the filter.
    ///
    /// Strings are hashed as their UTF-8 bytes. The insertion count grows on every call, even
    /// when the element is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(100, 0.01).unwrap();
    ///
    /// filter.add("apple");
    /// filter.add(b"raw bytes");
    /// filter.add("apple");
    ///
    /// assert!(filter.contains("apple"));
    /// assert_eq!(filter.size(), 3);
    /// ```
    pub fn add(&mut self, element: impl AsRef<[u8]>) {
        let element = element.as_ref();
        for seed in 0..self.num_hashes {
            let bit_index = self.compute_bit_index(element, seed);
            self.set_bit(bit_index);
        }
        self.num_items = self.num_items.saturating_add(1);
    }

    /// Tests whether an element is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Element was **possibly** added (or false positive)
    /// - `false`: Element was **definitely not** added
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(100, 0.01).unwrap();
    /// filter.add("apple");
    ///
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn contains(&self, element: impl AsRef<[u8]>) -> bool {
        let element = element.as_ref();
        for seed in 0..self.num_hashes {
            let bit_index = self.compute_bit_index(element, seed);
            if !self.get_bit(bit_index) {
                return false;
            }
        }
        true
    }

    /// Returns the expected number of items the filter was sized for (n).
    pub fn expected_items(&self) -> u64 {
        self.expected_items
    }

    /// Returns the target false positive probability (p).
    pub fn target_fpp(&self) -> f64 {
        self.target_fpp
    }

    /// Returns the number of bits in the filter (m).
    pub fn array_size(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash functions used per operation (k).
    pub fn num_hash_funcs(&self) -> u32 {
        self.num_hashes
    }

    /// Returns how many times [`add()`](Self::add) has been called.
    pub fn size(&self) -> u64 {
        self.num_items
    }

    /// Returns whether the filter is empty (no bit set).
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the ratio of insertions to the expected number of items.
    ///
    /// Above 1.0 the false positive probability exceeds the target.
    pub fn load_factor(&self) -> f64 {
        self.num_items as f64 / self.expected_items as f64
    }

    /// Returns whether more items have been added than the filter was sized for.
    ///
    /// The filter keeps working past this point, only with a degraded false positive rate.
    pub fn is_saturated(&self) -> bool {
        self.num_items > self.expected_items
    }

    /// Returns the fraction of bits set.
    pub fn fill_ratio(&self) -> f64 {
        self.num_bits_set as f64 / self.num_bits as f64
    }

    /// Estimates the current false positive probability.
    ///
    /// Uses the approximation `fill_ratio^k`, which assumes uniformly distributed bits.
    pub fn estimated_fpp(&self) -> f64 {
        self.fill_ratio().powi(self.num_hashes as i32)
    }

    /// Computes the bit probed by the hash function selected by `seed`.
    ///
    /// The 32-bit hash is read as signed and reduced with a Euclidean modulo, so the result
    /// always lies in `[0, num_bits)`.
    fn compute_bit_index(&self, element: &[u8], seed: u32) -> u64 {
        let hash = MurmurHash3X86_32::hash(element, seed) as i32;
        i64::from(hash).rem_euclid(self.num_bits as i64) as u64
    }

    /// Gets the value of a single bit.
    fn get_bit(&self, bit_index: u64) -> bool {
        let word_index = (bit_index >> 6) as usize; // Equivalent to bit_index / 64
        let mask = 1u64 << (bit_index & 63);
        (self.bit_array[word_index] & mask) != 0
    }

    /// Sets a single bit and updates the count if it wasn't already set.
    fn set_bit(&mut self, bit_index: u64) {
        let word_index = (bit_index >> 6) as usize;
        let mask = 1u64 << (bit_index & 63);

        if (self.bit_array[word_index] & mask) == 0 {
            self.bit_array[word_index] |= mask;
            self.num_bits_set += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BloomFilter;
    use crate::bloom::MAX_NUM_BITS;

    fn set_bits(filter: &BloomFilter) -> Vec<u64> {
        (0..filter.array_size())
            .filter(|&i| filter.get_bit(i))
            .collect()
    }

    #[test]
    fn test_add_and_contains() {
        let mut filter = BloomFilter::new(100, 0.01).unwrap();

        assert!(!filter.contains("apple"));
        filter.add("apple");
        assert!(filter.contains("apple"));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_empty_filter_contains_nothing() {
        let filter = BloomFilter::new(1000, 0.01).unwrap();
        for i in 0..1000 {
            assert!(!filter.contains(format!("item-{i}")));
        }
        assert!(!filter.contains(""));
        assert_eq!(filter.bits_used(), 0);
    }

    #[test]
    fn test_probe_indices() {
        let filter = BloomFilter::new(1000, 0.01).unwrap();
        let indices: Vec<u64> = (0..filter.num_hash_funcs())
            .map(|seed| filter.compute_bit_index(b"foo", seed))
            .collect();
        assert_eq!(indices, vec![4722, 7846, 2486, 3506, 3958, 4885, 6415]);
    }

    #[test]
    fn test_add_sets_exactly_probed_bits() {
        let mut filter = BloomFilter::new(1000, 0.01).unwrap();
        filter.add("foo");
        assert_eq!(set_bits(&filter), vec![2486, 3506, 3958, 4722, 4885, 6415, 7846]);
        assert_eq!(filter.bits_used(), 7);
    }

    #[test]
    fn test_str_and_bytes_agree() {
        let mut filter = BloomFilter::new(100, 0.01).unwrap();
        filter.add("héllo");
        assert!(filter.contains("héllo".as_bytes()));
        assert!(filter.contains(String::from("héllo")));
        assert!(filter.contains(vec![0x68, 0xc3, 0xa9, 0x6c, 0x6c, 0x6f]));
    }

    #[test]
    fn test_size_counts_every_add() {
        let mut filter = BloomFilter::new(100, 0.01).unwrap();
        filter.add("dup");
        let bits_after_first = filter.bits_used();
        filter.add("dup");
        filter.add("dup");

        assert_eq!(filter.size(), 3);
        assert_eq!(filter.bits_used(), bits_after_first);
    }

    #[test]
    fn test_bits_are_monotonic() {
        let mut filter = BloomFilter::new(50, 0.05).unwrap();
        let mut previous = set_bits(&filter);
        for i in 0..200 {
            filter.add(format!("value-{i}"));
            let current = set_bits(&filter);
            assert!(previous.iter().all(|bit| current.contains(bit)));
            assert_eq!(current.len() as u64, filter.bits_used());
            previous = current;
        }
    }

    #[test]
    fn test_unused_tail_bits_stay_clear() {
        let mut filter = BloomFilter::new(1000, 0.01).unwrap();
        for i in 0..5000 {
            filter.add(i.to_string());
        }
        let last = filter.bit_array[filter.bit_array.len() - 1];
        let valid_bits = filter.array_size() % 64;
        assert_eq!(last >> valid_bits, 0);
    }

    #[test]
    fn test_statistics() {
        let mut filter = BloomFilter::new(10, 0.01).unwrap();
        assert_eq!(filter.expected_items(), 10);
        assert_eq!(filter.target_fpp(), 0.01);
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.fill_ratio(), 0.0);
        assert_eq!(filter.estimated_fpp(), 0.0);

        for i in 0..10 {
            filter.add([i as u8]);
        }
        assert_eq!(filter.load_factor(), 1.0);
        assert!(!filter.is_saturated());
        assert!(filter.fill_ratio() > 0.0);
        assert!(filter.estimated_fpp() > 0.0);

        filter.add("one more");
        assert!(filter.is_saturated());
        assert!(filter.load_factor() > 1.0);
    }

    #[test]
    fn test_single_bit_filter() {
        let mut filter = BloomFilter::new(10, 0.999999).unwrap();
        assert_eq!(filter.array_size(), 1);
        assert_eq!(filter.num_hash_funcs(), 1);

        filter.add("anything");
        assert!(filter.contains("anything"));
        assert!(filter.contains("everything else"));
    }

    #[test]
    fn test_probes_cover_largest_array() {
        // Index computation never touches the words, so skip the 256 MiB allocation.
        let filter = BloomFilter {
            expected_items: 224_000_000,
            target_fpp: 0.01,
            num_bits: MAX_NUM_BITS,
            num_hashes: 7,
            num_items: 0,
            num_bits_set: 0,
            bit_array: Box::new([]),
        };

        const NUM_BUCKETS: u64 = 16;
        let bucket_width = MAX_NUM_BITS / NUM_BUCKETS;
        let mut buckets = [0u64; NUM_BUCKETS as usize];
        for i in 0..20_000_u32 {
            for seed in 0..filter.num_hash_funcs() {
                let bit_index = filter.compute_bit_index(&i.to_le_bytes(), seed);
                assert!(bit_index < MAX_NUM_BITS);
                buckets[(bit_index / bucket_width) as usize] += 1;
            }
        }

        // 140k probes over 16 buckets: ~8750 each
        for (bucket, &count) in buckets.iter().enumerate() {
            assert!((7_000..10_500).contains(&count), "bucket {bucket}: {count}");
        }
    }
}
