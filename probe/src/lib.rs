//! # cpuid-probe
//!
//! Startup-time detection of x86 instruction-set extensions through
//! `CPUID`, driven by a static table of feature locations.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   names / flags   ┌──────────────┐
//! │    caller    │ ────────────────► │    Query     │
//! └──────────────┘ ◄──────────────── └──────┬───────┘
//!                      bitmask              │ descriptor lookup
//!                                    ┌──────▼───────┐
//!                                    │ Feature Table│
//!                                    └──────┬───────┘
//!                                           │ (leaf, sub_leaf, reg, bit)
//!                                    ┌──────▼───────┐
//!                                    │  QueryCache  │  one entry, per call
//!                                    └──────┬───────┘
//!                                           │ max-leaf probe + fetch
//!                                    ┌──────▼───────┐
//!                                    │ CpuIdReader  │  native / injected
//!                                    └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use cpuid_probe::{query_by_flags, query_by_names, FeatureFlags};
//!
//! let found = query_by_flags(FeatureFlags::AVX2 | FeatureFlags::AESNI);
//! if found.contains(FeatureFlags::AVX2) {
//!     // take the AVX2 path
//! }
//!
//! let names = ["sse4.2", "popcnt", "not-a-feature"];
//! let bits = query_by_names(&names).unwrap();
//! assert_eq!(bits & 0b100, 0);
//! ```
//!
//! ## Degraded answers
//!
//! Lookups never fail on the hardware side: an unknown name, a leaf above
//! the processor's maximum, or a leaf that answers with all-zero registers
//! all read as "feature absent". The only reported error is passing more
//! than [`MAX_NAMES`] names to one query.
//!
//! ## Cargo features
//!
//! - `trace-cpuid`: log every `CPUID` execution at `trace` level.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod invoker;
pub mod leaf;
pub mod query;
pub mod table;

#[cfg(test)]
mod fake;

pub use cache::QueryCache;
pub use error::{Error, Result};
pub use invoker::{CpuIdReader, NativeCpuId};
pub use leaf::{CpuIdResult, Register};
pub use query::{Query, MAX_NAMES};
pub use table::{descriptor, features, name_of, FeatureDescriptor, FeatureFlags, FeatureId};

/// Which of the `requested` features the running processor supports
pub fn query_by_flags(requested: FeatureFlags) -> FeatureFlags {
    Query::native().by_flags(requested)
}

/// Presence of each named feature on the running processor, bit `n` for
/// `names[n]`
pub fn query_by_names<S: AsRef<str>>(names: &[S]) -> Result<u32> {
    Query::native().by_names(names)
}

/// True when the running processor supports the named feature.
///
/// Unknown names read as unsupported.
pub fn is_supported(name: &str) -> bool {
    descriptor(name).is_some_and(|desc| Query::native().has(desc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_on_host() {
        assert_eq!(query_by_flags(FeatureFlags::empty()), FeatureFlags::empty());
    }

    #[test]
    fn test_host_result_subset_of_request() {
        for bits in 0..=FeatureFlags::all().bits() {
            let requested = FeatureFlags::from_bits_truncate(bits);
            let found = query_by_flags(requested);
            assert_eq!(found.bits() & !requested.bits(), 0);
        }
    }

    #[test]
    fn test_host_idempotent() {
        let first = query_by_flags(FeatureFlags::all());
        let second = query_by_flags(FeatureFlags::all());
        assert_eq!(first, second);
    }

    #[test]
    fn test_host_names_agree_with_flags() {
        let names: Vec<&str> = FeatureId::ALL.iter().map(|id| id.name()).collect();
        let by_names = query_by_names(&names).unwrap();
        let by_flags = query_by_flags(FeatureFlags::all());
        assert_eq!(by_names, by_flags.bits());
    }

    #[test]
    fn test_host_bogus_name() {
        let bits = query_by_names(&["sse", "bogus-name", "avx2"]).unwrap();
        assert_eq!(bits & (1 << 1), 0);
        assert!(!is_supported("bogus-name"));
    }

    #[cfg(all(target_arch = "x86_64", not(target_env = "sgx")))]
    #[test]
    fn test_host_baseline() {
        // x86_64 guarantees SSE and SSE2.
        assert!(query_by_flags(FeatureFlags::SSE).contains(FeatureFlags::SSE));
        assert_eq!(query_by_names(&["sse", "sse2"]).unwrap(), 0b11);
        assert!(is_supported("lm"));
    }

    #[cfg(all(target_arch = "x86_64", not(target_env = "sgx")))]
    #[test]
    fn test_host_agrees_with_std_detection() {
        // Only features std does not additionally gate on OS (XCR0) support.
        assert_eq!(is_supported("aes"), std::arch::is_x86_feature_detected!("aes"));
        assert_eq!(is_supported("sse4.2"), std::arch::is_x86_feature_detected!("sse4.2"));
        assert_eq!(is_supported("popcnt"), std::arch::is_x86_feature_detected!("popcnt"));
    }
}
