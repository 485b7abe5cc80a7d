//! # Query Engine
//!
//! Resolves requested features against the [feature table](crate::table)
//! and tests their bits through a per-call [`QueryCache`].
//!
//! Two request shapes are supported:
//!
//! - [`Query::by_flags`]: a [`FeatureFlags`] set of fixed-identifier
//!   features, answered with the subset that is present.
//! - [`Query::by_names`]: an ordered list of up to [`MAX_NAMES`] names,
//!   answered with a mask whose bit `n` is set when name `n` is present.
//!
//! Each call starts from an empty cache, so results never depend on an
//! earlier call. Within a call, consecutive lookups on the same
//! leaf/sub-leaf execute `CPUID` once.

use crate::cache::QueryCache;
use crate::error::{Error, Result};
use crate::invoker::{CpuIdReader, NativeCpuId};
use crate::table::{FeatureDescriptor, FeatureFlags, FEATURES};

/// Maximum number of names in one [`Query::by_names`] call
pub const MAX_NAMES: usize = u32::BITS as usize;

static_assertions::const_assert_eq!(MAX_NAMES, 32);

/// Feature query bound to a `CPUID` source
#[derive(Debug, Clone, Default)]
pub struct Query<R = NativeCpuId> {
    reader: R,
}

impl Query<NativeCpuId> {
    /// Query the running processor
    pub const fn native() -> Self {
        Self { reader: NativeCpuId }
    }
}

impl<R: CpuIdReader> Query<R> {
    /// Query through `reader`
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    /// The underlying reader
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Consume the query and return the reader
    pub fn into_reader(self) -> R {
        self.reader
    }

    /// Which of the `requested` features are present.
    ///
    /// Features not in `requested` are never looked up. The result is always
    /// a subset of `requested`.
    pub fn by_flags(&mut self, requested: FeatureFlags) -> FeatureFlags {
        let mut cache = QueryCache::new();
        let mut found = FeatureFlags::empty();

        if requested.is_empty() {
            return found;
        }

        for desc in FEATURES {
            let Some(id) = desc.id else { continue };
            if !requested.contains(id.flag()) {
                continue;
            }
            if self.test(&mut cache, desc) {
                found |= id.flag();
            }
        }

        log::debug!("cpuid: requested {:?}, present {:?}", requested, found);
        found
    }

    /// Presence of each named feature, bit `n` for `names[n]`.
    ///
    /// Names are matched exactly against the table. Unknown names leave
    /// their bit clear. More than [`MAX_NAMES`] names is an error.
    pub fn by_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<u32> {
        if names.len() > MAX_NAMES {
            log::warn!("cpuid: {} names requested, limit is {}", names.len(), MAX_NAMES);
            return Err(Error::TooManyNames {
                given: names.len(),
                max: MAX_NAMES,
            });
        }

        let mut cache = QueryCache::new();
        let mut bits = 0u32;

        for (n, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let mut known = false;

            for desc in FEATURES.iter().filter(|desc| desc.name == name) {
                known = true;
                if self.test(&mut cache, desc) {
                    bits |= 1 << n;
                }
            }

            if !known {
                log::debug!("cpuid: unknown feature name {:?}", name);
            }
        }

        Ok(bits)
    }

    /// Presence of a single table entry
    pub fn has(&mut self, desc: &FeatureDescriptor) -> bool {
        let mut cache = QueryCache::new();
        self.test(&mut cache, desc)
    }

    fn test(&mut self, cache: &mut QueryCache, desc: &FeatureDescriptor) -> bool {
        let value = cache.read_register(&mut self.reader, desc.leaf, desc.sub_leaf, desc.register);
        desc.is_set_in(value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
