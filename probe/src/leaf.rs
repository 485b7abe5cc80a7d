//! # CPUID Leaves and Result Registers
//!
//! `CPUID` is selected by a leaf in `EAX` and a sub-leaf in `ECX`, and
//! answers in the four general-purpose registers `EAX`, `EBX`, `ECX`,
//! `EDX`.
//!
//! ## Leaf ranges
//!
//! ```text
//! 0x0000_0000 ..= max_basic      basic range     (max from leaf 0x0000_0000)
//! 0x8000_0000 ..= max_extended   extended range  (max from leaf 0x8000_0000)
//! ```
//!
//! Each range reports its own highest supported leaf in `EAX` of its
//! base leaf. Bit 31 of a leaf selects the range.

use core::fmt;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Base of the basic leaf range
pub const LEAF_BASIC: u32 = 0x0000_0000;

/// Base of the extended leaf range
pub const LEAF_EXTENDED: u32 = 0x8000_0000;

/// Sub-leaf value for leaves that do not use `ECX`
pub const SUB_LEAF_UNSPEC: u32 = 0;

/// Leaf/sub-leaf sentinel that never matches a real query
pub const LEAF_INVALID: u32 = u32::MAX;

/// Processor info and feature bits
pub const LEAF_FEATURES: u32 = LEAF_BASIC | 0x01;

/// Structured extended feature flags (sub-leaf 0)
pub const LEAF_STRUCTURED_EXT: u32 = LEAF_BASIC | 0x07;

/// Extended processor info and feature bits
pub const LEAF_EXT_FEATURES: u32 = LEAF_EXTENDED | 0x01;

/// Base leaf of the range `leaf` belongs to.
///
/// Querying the base leaf returns the highest supported leaf of that range
/// in `EAX`.
#[inline]
pub const fn range_base(leaf: u32) -> u32 {
    leaf & LEAF_EXTENDED
}

// =============================================================================
// RESULT REGISTERS
// =============================================================================

/// One of the four `CPUID` output registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    /// EAX
    Eax = 0,
    /// EBX
    Ebx = 1,
    /// ECX
    Ecx = 2,
    /// EDX
    Edx = 3,
}

impl Register {
    /// All registers in output order
    pub const ALL: [Register; 4] = [Self::Eax, Self::Ebx, Self::Ecx, Self::Edx];

    /// Register mnemonic
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eax => "eax",
            Self::Ebx => "ebx",
            Self::Ecx => "ecx",
            Self::Edx => "edx",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output of a single `CPUID` execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuIdResult {
    /// EAX output
    pub eax: u32,
    /// EBX output
    pub ebx: u32,
    /// ECX output
    pub ecx: u32,
    /// EDX output
    pub edx: u32,
}

impl CpuIdResult {
    /// All-zero result
    pub const ZERO: Self = Self {
        eax: 0,
        ebx: 0,
        ecx: 0,
        edx: 0,
    };

    /// Create a result from the four register values
    pub const fn new(eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        Self { eax, ebx, ecx, edx }
    }

    /// Value of one output register
    #[inline]
    pub const fn get(&self, reg: Register) -> u32 {
        match reg {
            Register::Eax => self.eax,
            Register::Ebx => self.ebx,
            Register::Ecx => self.ecx,
            Register::Edx => self.edx,
        }
    }

    /// True when all four registers are zero
    #[inline]
    pub const fn is_zero(&self) -> bool {
        (self.eax | self.ebx | self.ecx | self.edx) == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_base() {
        assert_eq!(range_base(0x0000_0001), LEAF_BASIC);
        assert_eq!(range_base(0x0000_0007), LEAF_BASIC);
        assert_eq!(range_base(0x8000_0001), LEAF_EXTENDED);
        assert_eq!(range_base(0x8000_0000), LEAF_EXTENDED);
    }

    #[test]
    fn test_register_select() {
        let res = CpuIdResult::new(1, 2, 3, 4);
        let values: [u32; 4] = Register::ALL.map(|r| res.get(r));
        assert_eq!(values, [1, 2, 3, 4]);
    }

    #[test]
    fn test_is_zero() {
        assert!(CpuIdResult::ZERO.is_zero());
        assert!(!CpuIdResult::new(0, 0, 0, 1).is_zero());
        assert!(!CpuIdResult::new(0x8000_0000, 0, 0, 0).is_zero());
    }

    #[test]
    fn test_sentinel_is_not_a_range_base() {
        assert_ne!(LEAF_INVALID, LEAF_BASIC);
        assert_ne!(LEAF_INVALID, LEAF_EXTENDED);
    }
}
