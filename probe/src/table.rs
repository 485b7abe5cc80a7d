//! # Feature Table
//!
//! Static catalogue of the instruction-set extensions the probe knows about,
//! each located by leaf, sub-leaf, result register and bit.
//!
//! A subset of entries also carries a fixed [`FeatureId`]. Those are the
//! features callers can request as a [`FeatureFlags`] bitmask; everything
//! else is reachable by name only.
//!
//! Entries are grouped by leaf and register so that a full-table scan walks
//! each leaf once and the one-entry query cache hits on every bit after the
//! first.

use core::fmt;

use crate::leaf::{Register, LEAF_EXT_FEATURES, LEAF_FEATURES, LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC};

// =============================================================================
// FIXED IDENTIFIERS
// =============================================================================

/// Features addressable by a fixed identifier bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FeatureId {
    /// AES-NI (`aes`)
    AesNi     = 0,
    /// Carry-less multiplication (`pclmulqdq`)
    Pclmulqdq = 1,
    /// SSE (`sse`)
    Sse       = 2,
    /// AVX (`avx`)
    Avx       = 3,
    /// AVX2 (`avx2`)
    Avx2      = 4,
    /// AVX-512 Foundation (`avx512f`)
    Avx512F   = 5,
    /// SHA extensions (`sha`)
    ShaNi     = 6,
}

impl FeatureId {
    /// Number of fixed identifiers
    pub const COUNT: usize = 7;

    /// All identifiers in identifier order
    pub const ALL: [FeatureId; Self::COUNT] = [
        Self::AesNi,
        Self::Pclmulqdq,
        Self::Sse,
        Self::Avx,
        Self::Avx2,
        Self::Avx512F,
        Self::ShaNi,
    ];

    /// Identifier for a raw index, `None` when out of range
    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::AesNi),
            1 => Some(Self::Pclmulqdq),
            2 => Some(Self::Sse),
            3 => Some(Self::Avx),
            4 => Some(Self::Avx2),
            5 => Some(Self::Avx512F),
            6 => Some(Self::ShaNi),
            _ => None,
        }
    }

    /// Raw index, also the bit position in [`FeatureFlags`]
    #[inline]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Table name of the feature
    pub const fn name(self) -> &'static str {
        match self {
            Self::AesNi => "aes",
            Self::Pclmulqdq => "pclmulqdq",
            Self::Sse => "sse",
            Self::Avx => "avx",
            Self::Avx2 => "avx2",
            Self::Avx512F => "avx512f",
            Self::ShaNi => "sha",
        }
    }

    /// The identifier's bit as a flag set
    #[inline]
    pub const fn flag(self) -> FeatureFlags {
        FeatureFlags::from_bits_retain(1 << self.index())
    }

    /// Table entry carrying this identifier
    pub fn descriptor(self) -> Option<&'static FeatureDescriptor> {
        FEATURES.iter().find(|desc| desc.id == Some(self))
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// Set of fixed-identifier features, bit `i` is [`FeatureId`] `i`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FeatureFlags: u32 {
        /// AES-NI
        const AESNI = 1 << FeatureId::AesNi as u32;
        /// PCLMULQDQ
        const PCLMULQDQ = 1 << FeatureId::Pclmulqdq as u32;
        /// SSE
        const SSE = 1 << FeatureId::Sse as u32;
        /// AVX
        const AVX = 1 << FeatureId::Avx as u32;
        /// AVX2
        const AVX2 = 1 << FeatureId::Avx2 as u32;
        /// AVX-512F
        const AVX512F = 1 << FeatureId::Avx512F as u32;
        /// SHA-NI
        const SHANI = 1 << FeatureId::ShaNi as u32;
    }
}

impl FeatureFlags {
    /// Identifiers contained in this set, in identifier order
    pub fn ids(self) -> impl Iterator<Item = FeatureId> {
        FeatureId::ALL.into_iter().filter(move |id| self.contains(id.flag()))
    }
}

impl From<FeatureId> for FeatureFlags {
    fn from(id: FeatureId) -> Self {
        id.flag()
    }
}

static_assertions::const_assert!(FeatureId::COUNT <= u32::BITS as usize);
static_assertions::const_assert_eq!(FeatureFlags::all().bits().count_ones() as usize, FeatureId::COUNT);

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// Location of one feature bit in the `CPUID` output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureDescriptor {
    /// Short identifier, unique within the table
    pub name: &'static str,
    /// Leaf to execute (bit 31 selects the extended range)
    pub leaf: u32,
    /// Sub-leaf, 0 when unused
    pub sub_leaf: u32,
    /// Register holding the bit
    pub register: Register,
    /// Bit position within the register (0..=31)
    pub bit: u8,
    /// Fixed identifier, for the features that have one
    pub id: Option<FeatureId>,
}

impl FeatureDescriptor {
    /// Descriptor without a fixed identifier
    pub const fn new(name: &'static str, leaf: u32, sub_leaf: u32, register: Register, bit: u8) -> Self {
        Self {
            name,
            leaf,
            sub_leaf,
            register,
            bit,
            id: None,
        }
    }

    /// Attach a fixed identifier
    pub const fn with_id(mut self, id: FeatureId) -> Self {
        self.id = Some(id);
        self
    }

    /// Mask selecting the feature bit in its register.
    ///
    /// A `bit` outside `0..=31` selects nothing, so the feature reads as
    /// absent.
    #[inline]
    pub const fn mask(&self) -> u32 {
        match 1u32.checked_shl(self.bit as u32) {
            Some(mask) => mask,
            None => 0,
        }
    }

    /// True when `value` (the register's content) has the feature bit set
    #[inline]
    pub const fn is_set_in(&self, value: u32) -> bool {
        value & self.mask() != 0
    }
}

impl fmt::Display for FeatureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (leaf {:#010x}.{}, {}[{}])",
            self.name, self.leaf, self.sub_leaf, self.register, self.bit
        )
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// Every known feature, grouped by leaf and register
pub static FEATURES: &[FeatureDescriptor] = &[
    // Leaf 0x01, EDX
    FeatureDescriptor::new("fpu", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 0),
    FeatureDescriptor::new("vme", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 1),
    FeatureDescriptor::new("de", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 2),
    FeatureDescriptor::new("pse", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 3),
    FeatureDescriptor::new("tsc", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 4),
    FeatureDescriptor::new("msr", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 5),
    FeatureDescriptor::new("pae", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 6),
    FeatureDescriptor::new("mce", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 7),
    FeatureDescriptor::new("cx8", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 8),
    FeatureDescriptor::new("apic", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 9),
    FeatureDescriptor::new("sep", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 11),
    FeatureDescriptor::new("mtrr", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 12),
    FeatureDescriptor::new("pge", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 13),
    FeatureDescriptor::new("mca", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 14),
    FeatureDescriptor::new("cmov", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 15),
    FeatureDescriptor::new("pat", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 16),
    FeatureDescriptor::new("pse-36", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 17),
    FeatureDescriptor::new("psn", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 18),
    FeatureDescriptor::new("clfsh", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 19),
    FeatureDescriptor::new("ds", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 21),
    FeatureDescriptor::new("acpi", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 22),
    FeatureDescriptor::new("mmx", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 23),
    FeatureDescriptor::new("fxsr", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 24),
    FeatureDescriptor::new("sse", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 25).with_id(FeatureId::Sse),
    FeatureDescriptor::new("sse2", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 26),
    FeatureDescriptor::new("ss", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 27),
    FeatureDescriptor::new("htt", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 28),
    FeatureDescriptor::new("tm", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 29),
    FeatureDescriptor::new("ia64", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 30),
    FeatureDescriptor::new("pbe", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 31),

    // Leaf 0x01, ECX
    FeatureDescriptor::new("sse3", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 0),
    FeatureDescriptor::new("pclmulqdq", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 1).with_id(FeatureId::Pclmulqdq),
    FeatureDescriptor::new("dtes64", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 2),
    FeatureDescriptor::new("monitor", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 3),
    FeatureDescriptor::new("ds-cpl", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 4),
    FeatureDescriptor::new("vmx", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 5),
    FeatureDescriptor::new("smx", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 6),
    FeatureDescriptor::new("est", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 7),
    FeatureDescriptor::new("tm2", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 8),
    FeatureDescriptor::new("ssse3", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 9),
    FeatureDescriptor::new("cnxt-id", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 10),
    FeatureDescriptor::new("sdbg", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 11),
    FeatureDescriptor::new("fma", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 12),
    FeatureDescriptor::new("cx16", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 13),
    FeatureDescriptor::new("xtpr", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 14),
    FeatureDescriptor::new("pdcm", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 15),
    FeatureDescriptor::new("pcid", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 17),
    FeatureDescriptor::new("dca", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 18),
    FeatureDescriptor::new("sse4.1", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 19),
    FeatureDescriptor::new("sse4.2", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 20),
    FeatureDescriptor::new("x2apic", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 21),
    FeatureDescriptor::new("movbe", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 22),
    FeatureDescriptor::new("popcnt", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 23),
    FeatureDescriptor::new("tsc-deadline", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 24),
    FeatureDescriptor::new("aes", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 25).with_id(FeatureId::AesNi),
    FeatureDescriptor::new("xsave", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 26),
    FeatureDescriptor::new("osxsave", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 27),
    FeatureDescriptor::new("avx", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 28).with_id(FeatureId::Avx),
    FeatureDescriptor::new("f16c", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 29),
    FeatureDescriptor::new("rdrnd", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 30),
    FeatureDescriptor::new("hypervisor", LEAF_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 31),

    // Leaf 0x07.0, EBX
    FeatureDescriptor::new("fsgsbase", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 0),
    FeatureDescriptor::new("sgx", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 2),
    FeatureDescriptor::new("bmi1", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 3),
    FeatureDescriptor::new("hle", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 4),
    FeatureDescriptor::new("avx2", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 5).with_id(FeatureId::Avx2),
    FeatureDescriptor::new("smep", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 7),
    FeatureDescriptor::new("bmi2", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 8),
    FeatureDescriptor::new("erms", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 9),
    FeatureDescriptor::new("invpcid", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 10),
    FeatureDescriptor::new("rtm", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 11),
    FeatureDescriptor::new("pqm", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 12),
    FeatureDescriptor::new("mpx", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 14),
    FeatureDescriptor::new("pq", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 15),
    FeatureDescriptor::new("avx512f", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 16).with_id(FeatureId::Avx512F),
    FeatureDescriptor::new("avx512dq", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 17),
    FeatureDescriptor::new("rdseed", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 18),
    FeatureDescriptor::new("adx", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 19),
    FeatureDescriptor::new("smap", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 20),
    FeatureDescriptor::new("avx512ifma", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 21),
    FeatureDescriptor::new("pcommit", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 22),
    FeatureDescriptor::new("clflushopt", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 23),
    FeatureDescriptor::new("clwb", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 24),
    FeatureDescriptor::new("intel_pt", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 25),
    FeatureDescriptor::new("avx512pf", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 26),
    FeatureDescriptor::new("avx512er", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 27),
    FeatureDescriptor::new("avx512cd", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 28),
    FeatureDescriptor::new("sha", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 29).with_id(FeatureId::ShaNi),
    FeatureDescriptor::new("avx512bw", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 30),
    FeatureDescriptor::new("avx512vl", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ebx, 31),

    // Leaf 0x07.0, ECX
    FeatureDescriptor::new("prefetchwt1", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 0),
    FeatureDescriptor::new("avx512vbmi", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 1),
    FeatureDescriptor::new("umip", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 2),
    FeatureDescriptor::new("pku", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 3),
    FeatureDescriptor::new("ospke", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 4),
    FeatureDescriptor::new("avx512vbmi2", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 6),
    FeatureDescriptor::new("gfni", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 8),
    FeatureDescriptor::new("vaes", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 9),
    FeatureDescriptor::new("vpclmulqdq", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 10),
    FeatureDescriptor::new("avx512vnni", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 11),
    FeatureDescriptor::new("avx512bitalg", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 12),
    FeatureDescriptor::new("avx512vpopcntdq", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 14),
    FeatureDescriptor::new("rdpid", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 22),
    FeatureDescriptor::new("sgx_lc", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Ecx, 30),

    // Leaf 0x07.0, EDX
    FeatureDescriptor::new("avx512_4vnniw", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Edx, 2),
    FeatureDescriptor::new("avx512_4fmaps", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Edx, 3),
    FeatureDescriptor::new("avx512_vp2intersect", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Edx, 8),
    FeatureDescriptor::new("serialize", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Edx, 14),
    FeatureDescriptor::new("avx512_fp16", LEAF_STRUCTURED_EXT, SUB_LEAF_UNSPEC, Register::Edx, 23),

    // Leaf 0x07.1, EAX
    FeatureDescriptor::new("avx_vnni", LEAF_STRUCTURED_EXT, 1, Register::Eax, 4),
    FeatureDescriptor::new("avx512_bf16", LEAF_STRUCTURED_EXT, 1, Register::Eax, 5),

    // Leaf 0x8000_0001, ECX
    FeatureDescriptor::new("lahf_lm", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 0),
    FeatureDescriptor::new("abm", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 5),
    FeatureDescriptor::new("sse4a", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 6),
    FeatureDescriptor::new("prefetchw", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 8),
    FeatureDescriptor::new("xop", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 11),
    FeatureDescriptor::new("fma4", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 16),
    FeatureDescriptor::new("tbm", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Ecx, 21),

    // Leaf 0x8000_0001, EDX
    FeatureDescriptor::new("syscall", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 11),
    FeatureDescriptor::new("nx", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 20),
    FeatureDescriptor::new("pdpe1gb", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 26),
    FeatureDescriptor::new("rdtscp", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 27),
    FeatureDescriptor::new("lm", LEAF_EXT_FEATURES, SUB_LEAF_UNSPEC, Register::Edx, 29),
];

/// The whole catalogue in table order
#[inline]
pub fn features() -> &'static [FeatureDescriptor] {
    FEATURES
}

/// Entry with exactly this name (case-sensitive)
pub fn descriptor(name: &str) -> Option<&'static FeatureDescriptor> {
    FEATURES.iter().find(|desc| desc.name == name)
}

/// Name of a fixed identifier, `None` when out of range
pub fn name_of(id: u32) -> Option<&'static str> {
    FeatureId::from_index(id).map(FeatureId::name)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::{range_base, LEAF_BASIC, LEAF_EXTENDED};

    #[test]
    fn test_names_unique() {
        for (i, a) in FEATURES.iter().enumerate() {
            for b in &FEATURES[i + 1..] {
                assert_ne!(a.name, b.name, "duplicate feature name");
            }
        }
    }

    #[test]
    fn test_bits_in_range() {
        for desc in FEATURES {
            assert!(desc.bit < 32, "{}", desc);
            assert!(!desc.name.is_empty());
            assert_ne!(range_base(desc.leaf), desc.leaf, "{} sits on a range base leaf", desc);
        }
    }

    #[test]
    fn test_locations_unique() {
        for (i, a) in FEATURES.iter().enumerate() {
            for b in &FEATURES[i + 1..] {
                let same = a.leaf == b.leaf && a.sub_leaf == b.sub_leaf && a.register == b.register && a.bit == b.bit;
                assert!(!same, "{} and {} share a bit", a, b);
            }
        }
    }

    #[test]
    fn test_every_id_in_table_once() {
        for id in FeatureId::ALL {
            let count = FEATURES.iter().filter(|desc| desc.id == Some(id)).count();
            assert_eq!(count, 1, "{:?}", id);

            let desc = id.descriptor().unwrap();
            assert_eq!(desc.name, id.name());
        }
    }

    #[test]
    fn test_leaves_grouped() {
        // Each (leaf, sub_leaf) appears in one contiguous run.
        let mut seen: Vec<(u32, u32)> = Vec::new();
        for desc in FEATURES {
            let key = (desc.leaf, desc.sub_leaf);
            if seen.last() != Some(&key) {
                assert!(!seen.contains(&key), "leaf {:#x}.{} split", key.0, key.1);
                seen.push(key);
            }
        }
        assert!(seen.iter().any(|&(leaf, _)| range_base(leaf) == LEAF_BASIC));
        assert!(seen.iter().any(|&(leaf, _)| range_base(leaf) == LEAF_EXTENDED));
    }

    #[test]
    fn test_name_of() {
        for i in 0..FeatureId::COUNT as u32 {
            let name = name_of(i).unwrap();
            assert!(!name.is_empty());
            assert_eq!(name_of(i), Some(name));
        }
        assert_eq!(name_of(FeatureId::COUNT as u32), None);
        assert_eq!(name_of(u32::MAX), None);
        assert_eq!(name_of(4), Some("avx2"));
    }

    #[test]
    fn test_from_index_round_trip() {
        for id in FeatureId::ALL {
            assert_eq!(FeatureId::from_index(id.index()), Some(id));
        }
        assert_eq!(FeatureId::from_index(7), None);
    }

    #[test]
    fn test_flags_match_ids() {
        assert_eq!(FeatureId::Avx2.flag(), FeatureFlags::AVX2);
        assert_eq!(FeatureFlags::from(FeatureId::ShaNi), FeatureFlags::SHANI);
        assert_eq!(FeatureFlags::all().bits(), 0x7f);

        let set = FeatureFlags::SSE | FeatureFlags::AVX512F;
        let ids: Vec<FeatureId> = set.ids().collect();
        assert_eq!(ids, vec![FeatureId::Sse, FeatureId::Avx512F]);
    }

    #[test]
    fn test_descriptor_lookup() {
        let avx2 = descriptor("avx2").unwrap();
        assert_eq!(avx2.leaf, LEAF_STRUCTURED_EXT);
        assert_eq!(avx2.register, Register::Ebx);
        assert_eq!(avx2.mask(), 1 << 5);
        assert!(avx2.is_set_in(0x20));
        assert!(!avx2.is_set_in(0x10));

        assert!(descriptor("AVX2").is_none());
        assert!(descriptor("bogus-name").is_none());
        assert_eq!(features().len(), FEATURES.len());
    }

    #[test]
    fn test_mask_out_of_range_bit() {
        let top = FeatureDescriptor::new("top", LEAF_FEATURES, 0, Register::Edx, 31);
        assert_eq!(top.mask(), 0x8000_0000);

        for bit in [32, 33, 63, u8::MAX] {
            let desc = FeatureDescriptor::new("wide", LEAF_FEATURES, 0, Register::Edx, bit);
            assert_eq!(desc.mask(), 0);
            assert!(!desc.is_set_in(u32::MAX));
        }
    }
}
