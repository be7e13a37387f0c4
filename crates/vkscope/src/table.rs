//! Resolution of one catalog into a table of nullable function pointers.

use std::ffi::CStr;
use std::fmt;

use ash::vk;
use tracing::{debug, trace};

use crate::command::{ApiVersion, Command};
use crate::error::{Error, Result};

/// Resolved entry points for one scope, indexed by catalog slot.
///
/// Built once by [`EntryPointTable::resolve`] and never modified afterwards.
pub struct EntryPointTable<C: Command> {
    slots: Box<[vk::PFN_vkVoidFunction]>,
    origins: Box<[Option<C>]>,
}

impl<C: Command> EntryPointTable<C> {
    /// Look up every catalog entry through `load`, then fill alias gaps.
    ///
    /// All lookups happen before the alias pass, so the outcome does not
    /// depend on the order in which the loader answers. Never fails: an
    /// entry point the loader does not know stays null.
    pub fn resolve<F>(mut load: F) -> Self
    where
        F: FnMut(&CStr) -> vk::PFN_vkVoidFunction,
    {
        let mut slots: Box<[vk::PFN_vkVoidFunction]> = vec![None; C::ALL.len()].into_boxed_slice();
        let mut origins: Box<[Option<C>]> = vec![None; C::ALL.len()].into_boxed_slice();

        for &cmd in C::ALL {
            let pfn = load(cmd.c_name());
            if pfn.is_some() {
                origins[cmd.index()] = Some(cmd);
            } else {
                trace!(scope = %C::SCOPE, "{} not provided", cmd.name());
            }
            slots[cmd.index()] = pfn;
        }

        let mut fallbacks = 0usize;
        for group in C::ALIASES {
            // The group is ordered by precedence, so the first provided member wins.
            let Some(&source) = group.iter().find(|cmd| slots[cmd.index()].is_some()) else {
                continue;
            };
            for &member in group.iter() {
                if slots[member.index()].is_none() {
                    slots[member.index()] = slots[source.index()];
                    origins[member.index()] = Some(source);
                    fallbacks += 1;
                    debug!(
                        scope = %C::SCOPE,
                        "{} resolved through alias {}",
                        member.name(),
                        source.name()
                    );
                }
            }
        }

        let table = Self { slots, origins };
        debug!(
            scope = %C::SCOPE,
            resolved = table.resolved_count(),
            total = C::ALL.len(),
            fallbacks,
            "entry point table built"
        );
        table
    }

    /// Raw pointer stored for `cmd`, after alias filling.
    pub fn get(&self, cmd: C) -> vk::PFN_vkVoidFunction {
        self.slots[cmd.index()]
    }

    pub fn supports(&self, cmd: C) -> bool {
        self.slots[cmd.index()].is_some()
    }

    /// The catalog member whose lookup supplied `cmd`'s pointer.
    pub fn origin(&self, cmd: C) -> Option<C> {
        self.origins[cmd.index()]
    }

    /// True when `cmd` was filled from another member of its alias group.
    pub fn is_fallback(&self, cmd: C) -> bool {
        matches!(self.origin(cmd), Some(source) if source != cmd)
    }

    pub fn resolved_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = C> + '_ {
        C::ALL.iter().copied().filter(|cmd| !self.supports(*cmd))
    }

    /// Entry points a scope with this version and extension set should
    /// provide but whose slot stayed null.
    pub fn missing_for<S: AsRef<str>>(&self, api_version: ApiVersion, extensions: &[S]) -> Vec<C> {
        self.unresolved()
            .filter(|cmd| cmd.requirement().is_satisfied_by(api_version, extensions))
            .collect()
    }

    /// Reinterpret the slot for `cmd` as its typed function pointer.
    ///
    /// # Safety
    ///
    /// `F` must be the non-optional function pointer type matching `cmd`'s
    /// native signature.
    pub(crate) unsafe fn typed<F: Copy>(&self, cmd: C) -> Result<F> {
        match self.slots[cmd.index()] {
            Some(pfn) => {
                debug_assert_eq!(
                    std::mem::size_of::<F>(),
                    std::mem::size_of::<unsafe extern "system" fn()>()
                );
                // SAFETY: the caller guarantees F is the function pointer type of cmd.
                Ok(unsafe { std::mem::transmute_copy::<unsafe extern "system" fn(), F>(&pfn) })
            }
            None => Err(Error::Unsupported { name: cmd.name() }),
        }
    }
}

impl<C: Command> fmt::Debug for EntryPointTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPointTable")
            .field("scope", &C::SCOPE)
            .field("resolved", &self.resolved_count())
            .field("total", &C::ALL.len())
            .finish()
    }
}
