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

use bloomfilter::bloom::BloomFilter;

fn main() {
    env_logger::init();

    // Size for 1000 items at a 1% false positive rate
    let mut filter = BloomFilter::new(1000, 0.01).expect("valid parameters");

    println!(
        "Created Bloom filter with {} bits and {} hash functions",
        filter.array_size(),
        filter.num_hash_funcs()
    );

    for word in ["foo", "bar", "dog", "apple"] {
        filter.add(word);
    }
    println!("Added {} elements", filter.size());

    for word in ["tiger", "dog", "sheep", "bar"] {
        println!("contains({word:?}) = {}", filter.contains(word));
    }

    println!("\nBits used: {}", filter.bits_used());
    println!("Estimated FPP: {:.6}%", filter.estimated_fpp() * 100.0);
}
