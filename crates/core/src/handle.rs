/// A small integer naming a field in an `NVTable`. Handle `0` means *none*.
///
/// Handles `1..num_static` are reserved at registry creation; everything above
/// that is a dynamically allocated field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NvHandle(u32);

impl NvHandle {
    pub const NONE: NvHandle = NvHandle(0);

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        NvHandle(raw)
    }

    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_static(self, num_static: u32) -> bool {
        self.0 != 0 && self.0 <= num_static
    }
}

impl From<u32> for NvHandle {
    fn from(raw: u32) -> Self {
        NvHandle(raw)
    }
}

impl From<NvHandle> for u32 {
    fn from(handle: NvHandle) -> Self {
        handle.0
    }
}

impl std::fmt::Display for NvHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_handle_is_zero() {
        assert!(NvHandle::NONE.is_none());
        assert_eq!(NvHandle::NONE.as_u32(), 0);
    }

    #[test]
    fn static_range_check() {
        let h = NvHandle::new(3);
        assert!(h.is_static(5));
        assert!(!h.is_static(2));
        assert!(!NvHandle::NONE.is_static(5));
    }
}
