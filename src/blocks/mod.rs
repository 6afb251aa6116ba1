// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block ranges and interval sampling.
//!
//! This module provides:
//! - [`BlockRange`]: a validated inclusive `[start, end]` pair, used both as
//!   the sampling input and as the cache validity key
//! - [`BlockSampler`]: fixed-step sampling of a range that always includes the
//!   end block

pub mod range;
pub mod sampler;

// Re-export public API
pub use range::BlockRange;
pub use sampler::BlockSampler;
