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

//! Bloom filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter answers "definitely not in set" with certainty, or "possibly in set" with a
//! false positive probability bounded by the target it was sized for.
//!
//! # Properties
//!
//! - **No false negatives**: If an element was added, `contains()` always returns `true`
//! - **Possible false positives**: `contains()` may return `true` for elements never added
//! - **Fixed size**: The filter never resizes; adding more than the expected number of items
//!   silently raises the false positive rate above the target
//! - **Insert only**: Elements cannot be removed or enumerated
//!
//! # Usage
//!
//! ```rust
//! use bloomfilter::bloom::BloomFilter;
//!
//! // Create a filter sized for 1000 items with 1% false positive rate
//! let mut filter = BloomFilter::new(1000, 0.01).unwrap();
//!
//! // Add elements (anything that is `AsRef<[u8]>`)
//! filter.add("apple");
//! filter.add("banana");
//! filter.add(42_u64.to_le_bytes());
//!
//! // Check membership
//! assert!(filter.contains("apple")); // true - definitely added
//! assert!(filter.contains(42_u64.to_le_bytes()));
//!
//! // Get statistics
//! println!("Array size: {} bits", filter.array_size());
//! println!("Hash functions: {}", filter.num_hash_funcs());
//! println!("Est. FPP: {:.4}%", filter.estimated_fpp() * 100.0);
//! ```
//!
//! # Sizing
//!
//! For `n` expected items and target false positive probability `p`:
//!
//! - bits: `m = ceil(-n * ln(p) / ln(2)^2)`
//! - hash functions: `k = ceil(m / n * ln(2))`
//!
//! Both are computed once in double precision and rounded up, never truncated.
//!
//! # Implementation Details
//!
//! - The `i`-th of the `k` hash functions is MurmurHash3 x86 32-bit with seed `i`
//! - The hash is read as a signed 32-bit integer and reduced modulo `m` (Euclidean)
//! - Bits packed in `u64` words
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"

mod builder;
mod sketch;

pub use self::builder::BloomFilterBuilder;
pub use self::builder::MAX_NUM_BITS;
pub use self::builder::MIN_NUM_BITS;
pub use self::sketch::BloomFilter;
