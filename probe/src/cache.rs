//! # One-Entry Query Cache
//!
//! Holds the registers of the most recently executed leaf/sub-leaf pair so
//! that consecutive feature lookups on the same leaf issue `CPUID` once.
//! The cache lives on the stack of a single query and is never shared.
//!
//! ## Validity heuristic
//!
//! An execution that returns zero in all four registers is treated as an
//! unsupported leaf. This is an approximation: nothing in the architecture
//! forbids a supported leaf from legitimately reporting all zeros for a
//! given sub-leaf. Such a leaf simply reads as "no features present".
//!
//! ## Register reader
//!
//! ```text
//! read_register(leaf, sub_leaf, reg)
//!     │
//!     ├── cached (leaf, sub_leaf)? ───────────────► cached reg
//!     │
//!     ├── exec(range_base(leaf), 0)   invalid? ───► 0
//!     ├── leaf > EAX (max leaf)?  ────────────────► 0
//!     └── exec(leaf, sub_leaf)        invalid? ───► 0
//!                                     valid ──────► reg
//! ```

use crate::invoker::CpuIdReader;
use crate::leaf::{range_base, CpuIdResult, Register, LEAF_INVALID};

/// Registers of the last executed leaf/sub-leaf pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCache {
    leaf: u32,
    sub_leaf: u32,
    regs: CpuIdResult,
}

impl QueryCache {
    /// Empty cache; the first lookup always executes `CPUID`
    pub const fn new() -> Self {
        Self {
            leaf: LEAF_INVALID,
            sub_leaf: LEAF_INVALID,
            regs: CpuIdResult::ZERO,
        }
    }

    /// Leaf/sub-leaf the cached registers belong to, if any
    pub fn current(&self) -> Option<(u32, u32)> {
        if self.leaf == LEAF_INVALID && self.sub_leaf == LEAF_INVALID {
            None
        } else {
            Some((self.leaf, self.sub_leaf))
        }
    }

    /// True when the cached registers belong to `(leaf, sub_leaf)`
    #[inline]
    pub fn holds(&self, leaf: u32, sub_leaf: u32) -> bool {
        self.leaf == leaf && self.sub_leaf == sub_leaf
    }

    /// Last captured registers (meaningful only after a valid `exec`)
    #[inline]
    pub fn registers(&self) -> &CpuIdResult {
        &self.regs
    }

    /// Execute `CPUID` for `(leaf, sub_leaf)` and capture the result.
    ///
    /// Returns `false` when the result is all-zero; the cache is then keyed
    /// to the invalid sentinel so the next lookup misses whatever it asks
    /// for.
    pub fn exec<R>(&mut self, reader: &mut R, leaf: u32, sub_leaf: u32) -> bool
    where
        R: CpuIdReader + ?Sized,
    {
        self.regs = reader.cpuid(leaf, sub_leaf);

        if self.regs.is_zero() {
            log::debug!("cpuid: leaf {:#010x}.{} returned all zero, treating as invalid", leaf, sub_leaf);
            self.leaf = LEAF_INVALID;
            self.sub_leaf = LEAF_INVALID;
            false
        } else {
            self.leaf = leaf;
            self.sub_leaf = sub_leaf;
            true
        }
    }

    /// Read one register of `(leaf, sub_leaf)`, bounded by the maximum leaf
    /// the processor reports for that leaf's range.
    ///
    /// Returns 0 when the leaf is beyond the maximum or either execution is
    /// invalid.
    pub fn read_register<R>(&mut self, reader: &mut R, leaf: u32, sub_leaf: u32, reg: Register) -> u32
    where
        R: CpuIdReader + ?Sized,
    {
        if self.holds(leaf, sub_leaf) {
            return self.regs.get(reg);
        }

        let base = range_base(leaf);
        if !self.exec(reader, base, 0) {
            return 0;
        }

        let max_leaf = self.regs.eax;
        if leaf > max_leaf {
            log::debug!("cpuid: leaf {:#010x} above maximum {:#010x}", leaf, max_leaf);
            return 0;
        }

        if self.exec(reader, leaf, sub_leaf) {
            self.regs.get(reg)
        } else {
            0
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
