//! Persisted `NVTable` binary layout.
//!
//! ```text
//! magic      u32  "NVT1"
//! size       u32  arena capacity in bytes
//! used       u32  arena bytes in use
//! num_static u32
//! num_dyn    u32
//! flags      u8   see `Flags`
//! static_slots[num_static]   slot record
//! dyn_entries[num_dyn]       u32 handle + slot record
//! payload    [u8; used]
//! ```
//!
//! A slot record is a one-byte tag followed by its fields:
//!
//! ```text
//! 0  Unset     (no fields)
//! 1  Direct    offset:u32 len:u32 alloc_len:u32 ty:u8
//! 2  Indirect  referenced:u32 slice_offset:u32 slice_len:u32 ty:u8
//! ```
//!
//! This is not the on-wire format of any existing deployment; it exists so
//! an `NvTable` can be written to and read back from a byte slice, and it is
//! designed to round-trip every value this crate can represent, including
//! indirect slots, which the original description of the format omits.

use logline_core::{NvHandle, ValueType};

use crate::errors::NvError;
use crate::table::{NvTableData, Slot, NV_TABLE_MAX_BYTES};

const MAGIC: u32 = 0x4E56_5431; // "NVT1"

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Flags: u8 {
        const BORROWED = 0b0000_0001;
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], NvError> {
        if self.pos + n > self.bytes.len() {
            return Err(NvError::Truncated { needed: self.pos + n, available: self.bytes.len() });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, NvError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, NvError> {
        let bytes: [u8; 4] = self.take(4)?.try_into().expect("take(4) returns 4 bytes");
        Ok(u32::from_le_bytes(bytes))
    }

    fn slot(&mut self) -> Result<Slot, NvError> {
        match self.u8()? {
            0 => Ok(Slot::Unset),
            1 => {
                let offset = self.u32()?;
                let len = self.u32()?;
                let alloc_len = self.u32()?;
                let ty = self.value_type()?;
                if offset % 4 != 0 {
                    return Err(NvError::Misaligned { offset });
                }
                Ok(Slot::Direct { offset, len, alloc_len, ty })
            }
            2 => {
                let referenced = self.u32()?;
                let slice_offset = self.u32()?;
                let slice_len = self.u32()?;
                let ty = self.value_type()?;
                Ok(Slot::Indirect { referenced: NvHandle::new(referenced), slice_offset, slice_len, ty })
            }
            other => Err(NvError::InvalidTag(other)),
        }
    }

    fn value_type(&mut self) -> Result<ValueType, NvError> {
        let tag = self.u8()?;
        ValueType::from_tag(tag).ok_or(NvError::InvalidTag(tag))
    }
}

fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn write_slot(out: &mut Vec<u8>, slot: &Slot) {
    match *slot {
        Slot::Unset => out.push(0),
        Slot::Direct { offset, len, alloc_len, ty } => {
            out.push(1);
            write_u32(out, offset);
            write_u32(out, len);
            write_u32(out, alloc_len);
            out.push(ty.as_tag());
        }
        Slot::Indirect { referenced, slice_offset, slice_len, ty } => {
            out.push(2);
            write_u32(out, referenced.as_u32());
            write_u32(out, slice_offset);
            write_u32(out, slice_len);
            out.push(ty.as_tag());
        }
    }
}

pub(crate) fn encode(data: &NvTableData) -> Vec<u8> {
    let mut out = Vec::with_capacity(64 + data.used);
    write_u32(&mut out, MAGIC);
    write_u32(&mut out, data.size as u32);
    write_u32(&mut out, data.used as u32);
    write_u32(&mut out, data.num_static);
    write_u32(&mut out, data.dynamic.len() as u32);

    let mut flags = Flags::empty();
    flags.set(Flags::BORROWED, data.borrowed);
    out.push(flags.bits());

    for slot in &data.static_slots {
        write_slot(&mut out, slot);
    }
    for (handle, slot) in &data.dynamic {
        write_u32(&mut out, handle.as_u32());
        write_slot(&mut out, slot);
    }

    out.extend_from_slice(&data.payload[..data.used]);
    out
}

pub(crate) fn decode(bytes: &[u8]) -> Result<NvTableData, NvError> {
    let mut r = Reader::new(bytes);

    let magic = r.u32()?;
    if magic != MAGIC {
        return Err(NvError::BadMagic(magic));
    }
    let size = r.u32()? as usize;
    if size > NV_TABLE_MAX_BYTES {
        return Err(NvError::SizeTooLarge { declared: size });
    }
    let used = r.u32()? as usize;
    if used > size {
        return Err(NvError::Truncated { needed: used, available: size });
    }
    let num_static = r.u32()?;
    let num_dyn = r.u32()?;
    let flags = Flags::from_bits_truncate(r.u8()?);

    let mut static_slots = Vec::with_capacity(num_static as usize);
    for _ in 0..num_static {
        static_slots.push(r.slot()?);
    }

    let mut dynamic = Vec::with_capacity(num_dyn as usize);
    for _ in 0..num_dyn {
        let handle = NvHandle::new(r.u32()?);
        dynamic.push((handle, r.slot()?));
    }
    dynamic.sort_by_key(|(h, _)| *h);

    // An indirect slot's `referenced` handle is allowed to name a slot that
    // was never allocated — `set_indirect` (table.rs) permits this and
    // `resolve` already treats an unknown handle as unset, yielding an empty
    // value. Decoding must accept the same state rather than rejecting it.

    let payload_bytes = r.take(used)?;
    let mut payload = vec![0u8; size];
    payload[..used].copy_from_slice(payload_bytes);

    Ok(NvTableData {
        size,
        used,
        num_static,
        static_slots,
        dynamic,
        payload,
        borrowed: flags.contains(Flags::BORROWED),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::NvTable;

    #[test]
    fn round_trips_direct_and_indirect_slots() {
        let mut tab = NvTable::new(2, 2, 256);
        tab.set_direct(NvHandle::new(1), "a", b"hello world", ValueType::String);
        tab.set_indirect(NvHandle::new(3), "b", NvHandle::new(1), 0, 5, ValueType::String);

        let bytes = tab.to_bytes();
        let decoded = NvTable::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.get(NvHandle::new(1)).0, b"hello world");
        assert_eq!(decoded.get(NvHandle::new(3)).0, b"hello");
        assert_eq!(decoded.size(), tab.size());
        assert_eq!(decoded.used(), tab.used());
    }

    #[test]
    fn rejects_bad_magic() {
        let junk = vec![0u8; 32];
        assert!(NvTable::from_bytes(&junk).is_err());
    }

    #[test]
    fn rejects_truncated_image() {
        let tab = NvTable::new(1, 1, 64);
        let mut bytes = tab.to_bytes();
        bytes.truncate(bytes.len() - 1);
        assert!(NvTable::from_bytes(&bytes).is_err());
    }

    #[test]
    fn indirect_slot_referencing_unknown_handle_decodes_as_empty() {
        let mut tab = NvTable::new(2, 2, 256);
        tab.set_direct(NvHandle::new(1), "a", b"hello", ValueType::String);
        tab.set_indirect(NvHandle::new(2), "b", NvHandle::new(1), 0, 3, ValueType::String);
        let mut bytes = tab.to_bytes();

        // Corrupt the referenced handle on the second static slot (handle 2)
        // to point at a handle that was never allocated. Slot 2's record is
        // the last 14 bytes before the payload: tag(1) referenced(4) ...,
        // so `referenced` starts 13 bytes before the payload.
        let dangling = (999u32).to_le_bytes();
        let indirect_referenced_offset = bytes.len() - tab.used() - 13;
        bytes[indirect_referenced_offset..indirect_referenced_offset + 4].copy_from_slice(&dangling);

        // Matches `set_indirect`'s own contract (table.rs): referencing a
        // slot that does not exist is legal, not an error, and resolves to
        // an empty value rather than failing the whole decode.
        let decoded = NvTable::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.get(NvHandle::new(2)).0, Vec::<u8>::new());
        assert_eq!(decoded.get(NvHandle::new(1)).0, b"hello");
    }
}
