use strum_macros::{Display, EnumString};

/// The type tag that travels alongside every value stored in an `NVTable`
/// and every result produced by template evaluation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ValueType {
    #[default]
    String,
    Null,
    Bytes,
    Protobuf,
    Int32,
    Int64,
    Double,
    Boolean,
    Datetime,
    List,
    Json,
    None,
}

impl ValueType {
    pub fn is_none(self) -> bool {
        matches!(self, ValueType::None)
    }

    /// Stable numeric tag used by binary encodings (disk images, wire
    /// formats). Order must not change once persisted images exist.
    pub const fn as_tag(self) -> u8 {
        match self {
            ValueType::String => 0,
            ValueType::Null => 1,
            ValueType::Bytes => 2,
            ValueType::Protobuf => 3,
            ValueType::Int32 => 4,
            ValueType::Int64 => 5,
            ValueType::Double => 6,
            ValueType::Boolean => 7,
            ValueType::Datetime => 8,
            ValueType::List => 9,
            ValueType::Json => 10,
            ValueType::None => 11,
        }
    }

    pub const fn from_tag(tag: u8) -> Option<ValueType> {
        Some(match tag {
            0 => ValueType::String,
            1 => ValueType::Null,
            2 => ValueType::Bytes,
            3 => ValueType::Protobuf,
            4 => ValueType::Int32,
            5 => ValueType::Int64,
            6 => ValueType::Double,
            7 => ValueType::Boolean,
            8 => ValueType::Datetime,
            9 => ValueType::List,
            10 => ValueType::Json,
            11 => ValueType::None,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_strum() {
        for ty in [
            ValueType::String,
            ValueType::Null,
            ValueType::Bytes,
            ValueType::Protobuf,
            ValueType::Int32,
            ValueType::Int64,
            ValueType::Double,
            ValueType::Boolean,
            ValueType::Datetime,
            ValueType::List,
            ValueType::Json,
            ValueType::None,
        ] {
            let s = ty.to_string();
            let parsed: ValueType = s.parse().unwrap();
            assert_eq!(parsed, ty);
        }
    }

    #[test]
    fn default_is_string() {
        assert_eq!(ValueType::default(), ValueType::String);
    }

    #[test]
    fn tag_round_trips() {
        for ty in [ValueType::String, ValueType::Json, ValueType::None, ValueType::Int64] {
            assert_eq!(ValueType::from_tag(ty.as_tag()), Some(ty));
        }
        assert_eq!(ValueType::from_tag(255), None);
    }
}
