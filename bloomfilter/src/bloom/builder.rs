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

use std::collections::TryReserveError;
use std::f64::consts::LN_2;

use super::BloomFilter;
use crate::error::Error;

/// Smallest bit array a filter is built with.
pub const MIN_NUM_BITS: u64 = 1;
/// Largest bit array a filter can be built with.
///
/// Probes come from a signed 32-bit hash, which reaches every position of arrays up to 2^31 bits
/// and leaves gaps in anything larger.
pub const MAX_NUM_BITS: u64 = 1 << 31;

/// Builder for creating [`BloomFilter`] instances.
///
/// The filter is sized from the expected number of items and the target false positive
/// probability. Parameters are validated by [`build()`](Self::build), which is the only
/// fallible step.
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    expected_items: u64,
    target_fpp: f64,
}

impl BloomFilterBuilder {
    /// Creates a builder for a target accuracy.
    ///
    /// # Arguments
    ///
    /// - `expected_items`: Expected number of items to insert (`n`)
    /// - `fpp`: Target false positive probability (`p`), e.g. 0.01 for 1%
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_accuracy(10_000, 0.01).build().unwrap();
    /// assert_eq!(filter.expected_items(), 10_000);
    /// ```
    pub fn with_accuracy(expected_items: u64, fpp: f64) -> Self {
        BloomFilterBuilder {
            expected_items,
            target_fpp: fpp,
        }
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidParameter`](crate::error::ErrorKind::InvalidParameter) error if:
    /// - `expected_items` is 0
    /// - `fpp` is not strictly between 0.0 and 1.0 (NaN included)
    /// - the resulting bit array would exceed [`MAX_NUM_BITS`]
    pub fn build(self) -> Result<BloomFilter, Error> {
        let n = self.expected_items;
        let p = self.target_fpp;

        if n == 0 {
            return Err(Error::invalid_expected_items(n));
        }
        if p.is_nan() || p <= 0.0 || p >= 1.0 {
            return Err(Error::invalid_fpp(p));
        }

        let raw_bits = Self::raw_num_bits(n, p);
        if raw_bits > MAX_NUM_BITS as f64 {
            return Err(Error::too_many_bits(raw_bits, MAX_NUM_BITS).with_context("n", n));
        }
        // raw_bits >= 1 for every accepted (n, p)
        let num_bits = raw_bits as u64;
        let num_hashes = Self::suggest_num_hashes(n, num_bits);

        log::debug!(
            "sized bloom filter: n={n}, p={p}, num_bits={num_bits}, num_hashes={num_hashes}"
        );

        let bit_array = allocate_words(num_bits.div_ceil(64) as usize)
            .map_err(|_| Error::allocation_failed(num_bits).with_context("n", n))?;
        Ok(BloomFilter {
            expected_items: n,
            target_fpp: p,
            num_bits,
            num_hashes,
            num_items: 0,
            num_bits_set: 0,
            bit_array,
        })
    }

    /// Suggests the number of bits given expected items and target FPP.
    ///
    /// Formula: `m = ceil(-n * ln(p) / (ln(2)^2))`
    /// where n = expected_items, p = fpp
    ///
    /// The result is clamped to [`MIN_NUM_BITS`]..=[`MAX_NUM_BITS`]; [`build()`](Self::build)
    /// rejects parameters that would need more than the maximum instead.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let bits = BloomFilterBuilder::suggest_num_bits(1000, 0.01);
    /// assert_eq!(bits, 9586); // ~9585.06 rounded up
    /// ```
    pub fn suggest_num_bits(expected_items: u64, fpp: f64) -> u64 {
        let bits = Self::raw_num_bits(expected_items, fpp);
        // `as` saturates, and maps NaN to 0
        (bits as u64).clamp(MIN_NUM_BITS, MAX_NUM_BITS)
    }

    /// Suggests the number of hash functions given expected items and bit count.
    ///
    /// Formula: `k = ceil((m / n) * ln(2))`
    /// where m = num_bits, n = expected_items
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let hashes = BloomFilterBuilder::suggest_num_hashes(1000, 9586);
    /// assert_eq!(hashes, 7); // 9.586 * ln(2) ≈ 6.64
    /// ```
    pub fn suggest_num_hashes(expected_items: u64, num_bits: u64) -> u32 {
        let m = num_bits as f64;
        let n = expected_items as f64;

        // Ceil to avoid selecting too few hashes.
        let k = (m / n * LN_2).ceil();
        (k as u32).max(1)
    }

    fn raw_num_bits(expected_items: u64, fpp: f64) -> f64 {
        let n = expected_items as f64;
        (-(n * fpp.ln()) / (LN_2 * LN_2)).ceil()
    }
}

/// Allocates `num_words` zeroed words, reporting allocation failure instead of aborting.
fn allocate_words(num_words: usize) -> Result<Box<[u64]>, TryReserveError> {
    let mut words = Vec::new();
    words.try_reserve_exact(num_words)?;
    words.resize(num_words, 0u64);
    Ok(words.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_suggest_num_bits_rounds_up() {
        let expected = (-(1000.0 * 0.01f64.ln()) / (LN_2 * LN_2)).ceil() as u64;
        assert_eq!(BloomFilterBuilder::suggest_num_bits(1000, 0.01), expected);
        assert_eq!(expected, 9586);

        assert_eq!(BloomFilterBuilder::suggest_num_bits(1, 0.5), 2);
        assert_eq!(BloomFilterBuilder::suggest_num_bits(100, 0.001), 1438);
        // Tiny arrays still hold at least one bit.
        assert_eq!(BloomFilterBuilder::suggest_num_bits(10, 0.999999), 1);
    }

    #[test]
    fn test_suggest_num_hashes_rounds_up() {
        let expected = (9586.0 / 1000.0 * LN_2).ceil() as u32;
        assert_eq!(BloomFilterBuilder::suggest_num_hashes(1000, 9586), expected);
        assert_eq!(expected, 7);

        assert_eq!(BloomFilterBuilder::suggest_num_hashes(100, 1438), 10);
        assert_eq!(BloomFilterBuilder::suggest_num_hashes(10, 1), 1);
    }

    #[test]
    fn test_build_sizes_filter() {
        let filter = BloomFilterBuilder::with_accuracy(1000, 0.01).build().unwrap();
        assert_eq!(filter.array_size(), 9586);
        assert_eq!(filter.num_hash_funcs(), 7);
        assert_eq!(filter.bit_array.len(), 150);
        assert_eq!(filter.size(), 0);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_build_rejects_invalid_parameters() {
        for (n, p) in [
            (0, 0.01),
            (1000, 0.0),
            (1000, 1.0),
            (1000, -0.1),
            (1000, 1.5),
            (1000, f64::NAN),
        ] {
            let err = BloomFilterBuilder::with_accuracy(n, p).build().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter, "n={n}, p={p}");
        }
    }

    #[test]
    fn test_build_rejects_oversized_array() {
        let err = BloomFilterBuilder::with_accuracy(u64::MAX, 1e-300)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!(err.context_value("num_bits").is_some());
    }

    #[test]
    fn test_build_rejects_arrays_beyond_hash_range() {
        // ~9.59e9 bits, past what a 32-bit probe can address evenly
        assert_eq!(
            BloomFilterBuilder::suggest_num_bits(1_000_000_000, 0.01),
            MAX_NUM_BITS
        );
        let err = BloomFilterBuilder::with_accuracy(1_000_000_000, 0.01)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.context_value("n"), Some("1000000000"));

        // Just under the limit is still accepted by the sizing formula.
        let n = 200_000_000;
        assert!(BloomFilterBuilder::raw_num_bits(n, 0.01) <= MAX_NUM_BITS as f64);
        assert!(BloomFilterBuilder::raw_num_bits(n * 2, 0.01) > MAX_NUM_BITS as f64);
    }

    #[test]
    fn test_allocate_words_zeroed() {
        let words = allocate_words(150).unwrap();
        assert_eq!(words.len(), 150);
        assert!(words.iter().all(|&w| w == 0));
        assert!(allocate_words(usize::MAX).is_err());
    }
}
