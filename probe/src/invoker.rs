//! # CPUID Invocation
//!
//! [`CpuIdReader`] is the seam between the query engine and the hardware.
//! [`NativeCpuId`] executes the real instruction; any
//! `FnMut(leaf, sub_leaf) -> CpuIdResult` closure can stand in for it
//! (emulators, recorded dumps, tests).
//!
//! ```rust
//! use cpuid_probe::{CpuIdResult, FeatureFlags, Query};
//!
//! // A CPU that reports nothing at all.
//! let mut query = Query::new(|_leaf: u32, _sub_leaf: u32| CpuIdResult::ZERO);
//! assert!(query.by_flags(FeatureFlags::all()).is_empty());
//! ```

use crate::leaf::CpuIdResult;

// =============================================================================
// READER TRAIT
// =============================================================================

/// Source of `CPUID` results
pub trait CpuIdReader {
    /// Execute `CPUID` with `EAX = leaf` and `ECX = sub_leaf`
    fn cpuid(&mut self, leaf: u32, sub_leaf: u32) -> CpuIdResult;
}

impl<F> CpuIdReader for F
where
    F: FnMut(u32, u32) -> CpuIdResult,
{
    #[inline]
    fn cpuid(&mut self, leaf: u32, sub_leaf: u32) -> CpuIdResult {
        self(leaf, sub_leaf)
    }
}

// =============================================================================
// NATIVE INSTRUCTION
// =============================================================================

/// Executes `CPUID` on the running processor.
///
/// On targets without the instruction (including SGX enclaves, where it
/// faults) every call returns all-zero
/// registers, which the query engine treats as "leaf unsupported".
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCpuId;

impl NativeCpuId {
    /// Create a native reader
    pub const fn new() -> Self {
        Self
    }
}

impl CpuIdReader for NativeCpuId {
    #[inline]
    fn cpuid(&mut self, leaf: u32, sub_leaf: u32) -> CpuIdResult {
        let res = cpuid_count(leaf, sub_leaf);

        #[cfg(feature = "trace-cpuid")]
        log::trace!(
            "cpuid({:#010x}, {:#x}) = {:#010x} {:#010x} {:#010x} {:#010x}",
            leaf,
            sub_leaf,
            res.eax,
            res.ebx,
            res.ecx,
            res.edx
        );

        res
    }
}

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "x86_64", not(target_env = "sgx")))] {
        #[inline(always)]
        #[allow(unused_unsafe)]
        fn cpuid_count(leaf: u32, sub_leaf: u32) -> CpuIdResult {
            // SAFETY: CPUID is architectural on every x86_64 processor.
            let r = unsafe { core::arch::x86_64::__cpuid_count(leaf, sub_leaf) };
            CpuIdResult::new(r.eax, r.ebx, r.ecx, r.edx)
        }
    } else if #[cfg(target_arch = "x86")] {
        #[inline(always)]
        #[allow(unused_unsafe)]
        fn cpuid_count(leaf: u32, sub_leaf: u32) -> CpuIdResult {
            // SAFETY: every i586+ target rustc supports implements CPUID.
            let r = unsafe { core::arch::x86::__cpuid_count(leaf, sub_leaf) };
            CpuIdResult::new(r.eax, r.ebx, r.ecx, r.edx)
        }
    } else {
        #[inline(always)]
        fn cpuid_count(_leaf: u32, _sub_leaf: u32) -> CpuIdResult {
            CpuIdResult::ZERO
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_reader() {
        let mut seen = (0, 0);
        let mut reader = |leaf: u32, sub_leaf: u32| {
            seen = (leaf, sub_leaf);
            CpuIdResult::new(leaf, sub_leaf, 0, 0)
        };
        let res = reader.cpuid(7, 1);
        assert_eq!(res, CpuIdResult::new(7, 1, 0, 0));
        assert_eq!(seen, (7, 1));
    }

    #[cfg(all(target_arch = "x86_64", not(target_env = "sgx")))]
    #[test]
    fn test_native_basic_range() {
        // Leaf 0 always reports at least leaf 1 and a vendor string.
        let res = NativeCpuId::new().cpuid(0, 0);
        assert!(res.eax >= 1);
        assert!(!res.is_zero());
    }

    #[cfg(all(target_arch = "x86_64", not(target_env = "sgx")))]
    #[test]
    fn test_native_sse2_baseline() {
        // SSE2 (leaf 1, EDX bit 26) is part of the x86_64 baseline.
        let res = NativeCpuId::new().cpuid(1, 0);
        assert_ne!(res.edx & (1 << 26), 0);
    }
}
