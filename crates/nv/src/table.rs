use std::sync::Arc;

use logline_core::{NvHandle, ValueType};

use crate::errors::NvError;

/// Hard cap on the size of a single `NVTable` payload arena (≈1 GiB).
pub const NV_TABLE_MAX_BYTES: usize = 1 << 30;

/// Nominal cost charged against the arena budget for each dynamic slot's
/// `{handle, offset}` bookkeeping entry, mirroring the size of the on-disk
/// `dyn_entry` struct in the persisted layout (§6). Static slots are free:
/// their offset array is sized once at construction, exactly like the
/// header's `static_offsets[num_static]`.
const DYN_ENTRY_COST: usize = 8;

fn align4(offset: usize) -> usize {
    (offset + 3) & !3
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Unset,
    Direct {
        offset: u32,
        len: u32,
        alloc_len: u32,
        ty: ValueType,
    },
    Indirect {
        referenced: NvHandle,
        slice_offset: u32,
        slice_len: u32,
        ty: ValueType,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct NvTableData {
    pub(crate) size: usize,
    pub(crate) used: usize,
    pub(crate) num_static: u32,
    pub(crate) static_slots: Vec<Slot>,
    /// Dynamic slots, kept sorted by handle for binary lookup, mirroring
    /// the packed `{handle, offset}` pairs in the persisted layout.
    pub(crate) dynamic: Vec<(NvHandle, Slot)>,
    pub(crate) payload: Vec<u8>,
    pub(crate) borrowed: bool,
}

impl NvTableData {
    fn new(num_static: u32, initial_dyn_capacity: usize, payload_bytes: usize) -> Self {
        NvTableData {
            size: payload_bytes,
            used: 0,
            num_static,
            static_slots: vec![Slot::Unset; num_static as usize],
            dynamic: Vec::with_capacity(initial_dyn_capacity),
            payload: vec![0u8; payload_bytes],
            borrowed: false,
        }
    }

    fn slot(&self, handle: NvHandle) -> Slot {
        if handle.is_none() {
            return Slot::Unset;
        }
        if handle.is_static(self.num_static) {
            self.static_slots[handle.as_u32() as usize - 1]
        } else {
            match self.dynamic.binary_search_by_key(&handle, |(h, _)| *h) {
                Ok(idx) => self.dynamic[idx].1,
                Err(_) => Slot::Unset,
            }
        }
    }

    fn has_any_slot(&self, handle: NvHandle) -> bool {
        !matches!(self.slot(handle), Slot::Unset)
    }

    /// Structural setter only; callers are responsible for any arena-space
    /// bookkeeping before calling this.
    fn set_slot(&mut self, handle: NvHandle, slot: Slot) {
        if handle.is_static(self.num_static) {
            self.static_slots[handle.as_u32() as usize - 1] = slot;
            return;
        }
        match self.dynamic.binary_search_by_key(&handle, |(h, _)| *h) {
            Ok(idx) => self.dynamic[idx].1 = slot,
            Err(idx) => self.dynamic.insert(idx, (handle, slot)),
        }
    }

    fn remove_slot(&mut self, handle: NvHandle) {
        if handle.is_static(self.num_static) {
            self.static_slots[handle.as_u32() as usize - 1] = Slot::Unset;
        } else if let Ok(idx) = self.dynamic.binary_search_by_key(&handle, |(h, _)| *h) {
            self.dynamic.remove(idx);
        }
    }

    fn write_direct(&mut self, handle: NvHandle, value: &[u8], ty: ValueType) -> bool {
        let new_len = value.len() as u32;
        if let Slot::Direct { offset, alloc_len, .. } = self.slot(handle) {
            if alloc_len >= new_len {
                let start = offset as usize;
                self.payload[start..start + value.len()].copy_from_slice(value);
                self.set_slot(handle, Slot::Direct { offset, len: new_len, alloc_len, ty });
                return true;
            }
        }

        let is_new_dynamic = !handle.is_static(self.num_static) && !self.has_any_slot(handle);
        let dyn_cost = if is_new_dynamic { DYN_ENTRY_COST } else { 0 };
        let aligned = align4(self.used + dyn_cost);
        let end = aligned + value.len();
        if end > self.size {
            return false;
        }
        self.payload[aligned..end].copy_from_slice(value);
        self.used = end;
        self.set_slot(
            handle,
            Slot::Direct { offset: aligned as u32, len: new_len, alloc_len: new_len, ty },
        );
        true
    }

    fn write_indirect(
        &mut self,
        handle: NvHandle,
        referenced: NvHandle,
        slice_offset: u32,
        slice_len: u32,
        ty: ValueType,
    ) -> bool {
        let is_new_dynamic = !handle.is_static(self.num_static) && !self.has_any_slot(handle);
        if is_new_dynamic {
            if self.used + DYN_ENTRY_COST > self.size {
                return false;
            }
            self.used += DYN_ENTRY_COST;
        }
        self.set_slot(handle, Slot::Indirect { referenced, slice_offset, slice_len, ty });
        true
    }

    fn value_bytes(&self, offset: u32, len: u32) -> &[u8] {
        let start = offset as usize;
        &self.payload[start..start + len as usize]
    }

    /// Resolves `handle` to owned bytes and its type tag, following the
    /// indirect chain. Bounded by the total slot count so a pathological
    /// (and, per the data model, impossible) cycle cannot loop forever.
    fn resolve(&self, handle: NvHandle) -> (Vec<u8>, ValueType) {
        match self.slot(handle) {
            Slot::Unset => (Vec::new(), ValueType::String),
            Slot::Direct { offset, len, ty, .. } => (self.value_bytes(offset, len).to_vec(), ty),
            Slot::Indirect { referenced, slice_offset, slice_len, ty } => {
                if referenced.is_none() || matches!(self.slot(referenced), Slot::Unset) {
                    return (Vec::new(), ty);
                }
                let (base, _) = self.resolve(referenced);
                let start = (slice_offset as usize).min(base.len());
                let end = (slice_offset as usize + slice_len as usize).min(base.len());
                (base[start..end].to_vec(), ty)
            }
        }
    }

    fn referrers_of(&self, target: NvHandle) -> Vec<NvHandle> {
        let mut out = Vec::new();
        for idx in 0..self.num_static as usize {
            if let Slot::Indirect { referenced, .. } = self.static_slots[idx] {
                if referenced == target {
                    out.push(NvHandle::new(idx as u32 + 1));
                }
            }
        }
        for (handle, slot) in &self.dynamic {
            if let Slot::Indirect { referenced, .. } = slot {
                if *referenced == target {
                    out.push(*handle);
                }
            }
        }
        out
    }

    fn grow_to(&mut self, new_size: usize) {
        if new_size > self.payload.len() {
            self.payload.resize(new_size, 0);
        }
        self.size = new_size;
    }
}

/// A compact, ref-counted, clone-on-write binary name-value container.
///
/// Sharing is expressed through `Arc`: cloning an `NvTable` (the `ref`
/// operation) bumps the reference count cheaply. Mutating operations call
/// [`Arc::make_mut`], which transparently clones the backing store the
/// moment it is observed to be shared — the same idiom the parser tree uses
/// for its `Matchable` nodes (`Arc::get_mut` / `Arc::make_mut`), generalized
/// here to a byte arena instead of a segment tree.
#[derive(Debug, Clone)]
pub struct NvTable(pub(crate) Arc<NvTableData>);

impl NvTable {
    pub fn new(num_static: u32, initial_dyn_capacity: usize, payload_bytes: usize) -> Self {
        NvTable(Arc::new(NvTableData::new(num_static, initial_dyn_capacity, payload_bytes)))
    }

    pub fn size(&self) -> usize {
        self.0.size
    }

    pub fn used(&self) -> usize {
        self.0.used
    }

    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Increments the reference count and returns a shared handle to the
    /// same underlying table.
    pub fn new_ref(&self) -> NvTable {
        self.clone()
    }

    pub fn get(&self, handle: NvHandle) -> (Vec<u8>, ValueType) {
        self.0.resolve(handle)
    }

    pub fn get_if_set(&self, handle: NvHandle) -> Option<(Vec<u8>, ValueType)> {
        if matches!(self.0.slot(handle), Slot::Unset) {
            None
        } else {
            Some(self.0.resolve(handle))
        }
    }

    pub fn set_direct(&mut self, handle: NvHandle, _name: &str, value: &[u8], ty: ValueType) -> bool {
        let data = Arc::make_mut(&mut self.0);
        data.write_direct(handle, value, ty)
    }

    pub fn set_indirect(
        &mut self,
        handle: NvHandle,
        _name: &str,
        referenced_handle: NvHandle,
        slice_offset: u32,
        slice_length: u32,
        ty: ValueType,
    ) -> bool {
        let data = Arc::make_mut(&mut self.0);
        data.write_indirect(handle, referenced_handle, slice_offset, slice_length, ty)
    }

    /// Clears `handle`. Any other slot that holds an indirect reference to
    /// it is first materialized into a direct copy of the bytes it was
    /// observing, so its value is unaffected by the unset (cycle-breaking,
    /// confirmed against `test_nvtable_unset_copies_indirect_references`).
    pub fn unset(&mut self, handle: NvHandle) {
        let data = Arc::make_mut(&mut self.0);
        for referrer in data.referrers_of(handle) {
            let (bytes, ty) = data.resolve(referrer);
            data.write_direct(referrer, &bytes, ty);
        }
        data.remove_slot(handle);
    }

    /// Grows the arena if `used + additional_bytes` would not fit, doubling
    /// (at minimum) and capping at [`NV_TABLE_MAX_BYTES`]. If the table is
    /// shared (`ref_count() > 1`), `*table` is replaced with an independent,
    /// larger clone and the original is left byte-identical. Returns
    /// `false` only when the table is already at the size ceiling.
    pub fn realloc_if_needed(table: &mut NvTable, additional_bytes: usize) -> bool {
        let used = table.0.used;
        let size = table.0.size;
        if used + additional_bytes <= size {
            return true;
        }
        let new_size = size.saturating_mul(2).max(used + additional_bytes).min(NV_TABLE_MAX_BYTES);
        if new_size <= size {
            return false;
        }
        if Arc::strong_count(&table.0) > 1 {
            *table = table.clone_with_extra(new_size - size);
        } else {
            let data = Arc::get_mut(&mut table.0).expect("strong_count checked above");
            data.grow_to(new_size);
        }
        true
    }

    /// Produces an independent table of size `self.size() + extra_payload`
    /// (capped at [`NV_TABLE_MAX_BYTES`]), preserving every direct and
    /// indirect slot. The original is untouched.
    pub fn clone_with_extra(&self, extra_payload: usize) -> NvTable {
        let mut cloned = (*self.0).clone();
        let new_size = (cloned.size + extra_payload).min(NV_TABLE_MAX_BYTES);
        cloned.grow_to(new_size.max(cloned.size));
        NvTable(Arc::new(cloned))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        crate::disk::encode(&self.0)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<NvTable, NvError> {
        crate::disk::decode(bytes).map(|data| NvTable(Arc::new(data)))
    }
}
