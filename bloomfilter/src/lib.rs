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

//! # Bloom Filter
//!
//! A space-efficient probabilistic set sized from an expected item count and a target false
//! positive probability. See [`bloom`] for details.
//!
//! Operations are synchronous and allocation-free after construction. [`bloom::BloomFilter::add`]
//! takes `&mut self` and [`bloom::BloomFilter::contains`] takes `&self`, so reads never overlap a
//! write; wrap the filter in a lock to share it mutably across threads.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bloom;
pub mod error;

mod hash;
