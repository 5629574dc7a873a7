use logline_core::NvHandle;
use logline_helpers::IndexMap;
use parking_lot::Mutex;

/// Interns field names into dense integer handles.
///
/// Handles `1..=num_static` are reserved at construction time for the
/// caller's built-in field names; everything above that is allocated on
/// demand up to `max_handles`. The registry is process-wide and safe to
/// share across threads: all mutation goes through a single mutex, which is
/// acceptable because handle allocation only happens during warm-up, never
/// on the hot path.
pub struct NvRegistry {
    inner: Mutex<Inner>,
    num_static: u32,
    max_handles: u32,
}

struct Inner {
    /// `names[handle - 1]` is the name the handle was first registered
    /// under. Index 0 corresponds to handle 1.
    names: Vec<Box<str>>,
    /// Canonical name and every alias, all pointing at the owning handle.
    by_name: IndexMap<Box<str>, NvHandle>,
    next_dynamic: u32,
}

impl NvRegistry {
    /// Builds a registry with `static_names` reserved as handles `1..=N`,
    /// refusing to allocate past `max_handles` (static slots included).
    pub fn new(static_names: &[&str], max_handles: u32) -> Self {
        let num_static = static_names.len() as u32;
        let mut names = Vec::with_capacity(static_names.len());
        let mut by_name = IndexMap::default();

        for (idx, name) in static_names.iter().enumerate() {
            let handle = NvHandle::new(idx as u32 + 1);
            names.push((*name).into());
            by_name.insert((*name).into(), handle);
        }

        NvRegistry {
            inner: Mutex::new(Inner {
                names,
                by_name,
                next_dynamic: num_static + 1,
            }),
            num_static,
            max_handles,
        }
    }

    pub fn num_static(&self) -> u32 {
        self.num_static
    }

    pub fn max_handles(&self) -> u32 {
        self.max_handles
    }

    /// Returns the existing handle for `name` (canonical or alias), or
    /// allocates the next dynamic handle. Returns `NvHandle::NONE` when the
    /// configured ceiling has been reached.
    pub fn alloc_handle(&self, name: &str) -> NvHandle {
        let mut inner = self.inner.lock();
        if let Some(handle) = inner.by_name.get(name) {
            return *handle;
        }

        if inner.next_dynamic > self.max_handles {
            log::error!("NVRegistry: handle ceiling ({}) reached, cannot allocate '{name}'", self.max_handles);
            return NvHandle::NONE;
        }

        let handle = NvHandle::new(inner.next_dynamic);
        inner.next_dynamic += 1;
        inner.names.push(name.into());
        inner.by_name.insert(name.into(), handle);
        handle
    }

    /// Looks up a handle without allocating; returns `None` if `name` is
    /// unknown under any alias.
    pub fn find_handle(&self, name: &str) -> Option<NvHandle> {
        let inner = self.inner.lock();
        inner.by_name.get(name).copied()
    }

    /// Makes `name` resolve to `handle`. A repeat of the same pair is a
    /// no-op; registering a name that is already the canonical name (or an
    /// alias) of a *different* handle is rejected.
    pub fn add_alias(&self, handle: NvHandle, name: &str) -> bool {
        let mut inner = self.inner.lock();
        match inner.by_name.get(name) {
            Some(existing) if *existing == handle => true,
            Some(_) => false,
            None => {
                inner.by_name.insert(name.into(), handle);
                true
            }
        }
    }

    /// The name the handle was first registered under, not an alias.
    pub fn get_name(&self, handle: NvHandle) -> Option<Box<str>> {
        if handle.is_none() {
            return None;
        }
        let inner = self.inner.lock();
        inner.names.get(handle.as_u32() as usize - 1).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_registry_basic() {
        let registry = NvRegistry::new(&["BUILTIN1", "BUILTIN2", "BUILTIN3"], 10);

        assert_eq!(registry.alloc_handle("BUILTIN1").as_u32(), 1);
        assert_eq!(registry.alloc_handle("BUILTIN2").as_u32(), 2);
        assert_eq!(registry.alloc_handle("BUILTIN3").as_u32(), 3);

        let dyn4 = registry.alloc_handle("DYN00004");
        assert_eq!(dyn4.as_u32(), 4);
        assert_eq!(registry.alloc_handle("DYN00004"), dyn4);

        assert!(registry.add_alias(dyn4, "ALIAS00004"));
        assert_eq!(registry.alloc_handle("ALIAS00004"), dyn4);

        // handles 5..=10 fill the remaining ceiling (max_handles=10).
        for n in 5..=10u32 {
            let h = registry.alloc_handle(&format!("filler{n}"));
            assert_eq!(h.as_u32(), n);
        }

        assert_eq!(registry.alloc_handle("too-many-values"), NvHandle::NONE);
    }

    #[test]
    fn handle_stability_invariant() {
        let registry = NvRegistry::new(&["A"], 5);
        let h1 = registry.alloc_handle("B");
        let h2 = registry.alloc_handle("B");
        assert_eq!(h1, h2);
    }

    #[test]
    fn alias_collision_with_canonical_name_is_rejected() {
        let registry = NvRegistry::new(&["A", "B"], 5);
        let a = registry.find_handle("A").unwrap();
        assert!(!registry.add_alias(a, "B"));
    }

    #[test]
    fn get_name_returns_original_registration() {
        let registry = NvRegistry::new(&["HOST"], 5);
        let h = registry.find_handle("HOST").unwrap();
        registry.add_alias(h, "HOSTNAME_ALIAS");
        assert_eq!(registry.get_name(h).as_deref(), Some("HOST"));
    }
}
