//! Scripted processor for unit tests.
//!
//! Behaves like real hardware where it matters to the query engine: the
//! range base leaves report the maximum supported leaf, leaves above the
//! maximum return garbage instead of zeros, and unconfigured in-range
//! leaves return all zeros. Every execution is recorded.

use crate::invoker::CpuIdReader;
use crate::leaf::{range_base, CpuIdResult, Register, LEAF_EXTENDED};

/// "Genu" - EBX of leaf 0 on an Intel part
const VENDOR_EBX: u32 = 0x756e_6547;

/// Returned for leaves above the reported maximum
pub(crate) const GARBAGE: CpuIdResult = CpuIdResult::new(0xdead_beef, 0xffff_ffff, 0xffff_ffff, 0xffff_ffff);

#[derive(Debug, Default)]
pub(crate) struct FakeCpu {
    basic_max: u32,
    ext_max: u32,
    leaves: Vec<(u32, u32, CpuIdResult)>,
    pub(crate) calls: Vec<(u32, u32)>,
}

impl FakeCpu {
    /// `ext_max == 0` models a processor without the extended range
    pub(crate) fn new(basic_max: u32, ext_max: u32) -> Self {
        Self {
            basic_max,
            ext_max,
            ..Self::default()
        }
    }

    pub(crate) fn with_leaf(mut self, leaf: u32, sub_leaf: u32, res: CpuIdResult) -> Self {
        self.leaves.retain(|&(l, s, _)| (l, s) != (leaf, sub_leaf));
        self.leaves.push((leaf, sub_leaf, res));
        self
    }

    pub(crate) fn with_bit(self, leaf: u32, sub_leaf: u32, reg: Register, bit: u8) -> Self {
        let mut res = self.lookup(leaf, sub_leaf);
        let mask = 1u32 << bit;
        match reg {
            Register::Eax => res.eax |= mask,
            Register::Ebx => res.ebx |= mask,
            Register::Ecx => res.ecx |= mask,
            Register::Edx => res.edx |= mask,
        }
        self.with_leaf(leaf, sub_leaf, res)
    }

    /// Executions of non-base leaves
    pub(crate) fn fetches(&self) -> usize {
        self.calls.iter().filter(|&&(leaf, _)| range_base(leaf) != leaf).count()
    }

    /// Executions of range base leaves
    pub(crate) fn probes(&self) -> usize {
        self.calls.len() - self.fetches()
    }

    fn lookup(&self, leaf: u32, sub_leaf: u32) -> CpuIdResult {
        self.leaves
            .iter()
            .find(|&&(l, s, _)| (l, s) == (leaf, sub_leaf))
            .map(|&(_, _, res)| res)
            .unwrap_or(CpuIdResult::ZERO)
    }
}

impl CpuIdReader for FakeCpu {
    fn cpuid(&mut self, leaf: u32, sub_leaf: u32) -> CpuIdResult {
        self.calls.push((leaf, sub_leaf));

        let base = range_base(leaf);
        let max = if base == LEAF_EXTENDED {
            self.ext_max
        } else {
            self.basic_max
        };

        if leaf == base {
            return if max == 0 {
                CpuIdResult::ZERO
            } else {
                CpuIdResult::new(max, VENDOR_EBX, 0, 0)
            };
        }
        if max == 0 || leaf > max {
            return GARBAGE;
        }
        self.lookup(leaf, sub_leaf)
    }
}
