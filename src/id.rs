use std::{cmp, fmt, ops, str, time};

/// Base32 character set, in ascending code-point order and without the vowels
/// a, i, o, and u.
///
/// Assigning symbols in code-point order is what makes the encoded form sort
/// the same way as the raw bytes.
const ENCODING: &[u8; 32] = b"0123456789bcdefghjklmnpqrstvwxyz";

/// Sentinel marking bytes that are not part of [`ENCODING`].
const INVALID: u8 = 0xff;

/// Base32 decoding map; doubles as the alphabet membership check.
const DEC: [u8; 256] = {
    let mut map = [INVALID; 256];
    let mut i = 0;
    while i < ENCODING.len() {
        map[ENCODING[i] as usize] = i as u8;
        i += 1;
    }
    map
};

/// Represents a K-sortable unique identifier.
///
/// A `Kid` is 10 bytes as binary and 16 bytes as a base32-encoded string:
///
/// - bytes 0-5: Unix time in milliseconds, big-endian
/// - bytes 6-7: sequence, big-endian
/// - bytes 8-9: random value, big-endian
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Kid([u8; 10]);

impl Kid {
    /// Nil Kid (`0000000000000000`), the designated absence sentinel.
    pub const NIL: Self = Self([0x00; 10]);

    /// Max Kid (`zzzzzzzzzzzzzzzz`)
    pub const MAX: Self = Self([0xff; 10]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 10] {
        &self.0
    }

    /// Creates a Kid byte array from field values.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` does not fit in 48 bits.
    pub const fn from_parts(timestamp: u64, sequence: u16, random: u16) -> Self {
        if timestamp >= 1 << 48 {
            panic!("`timestamp` must be a 48-bit integer");
        }

        Self([
            (timestamp >> 40) as u8,
            (timestamp >> 32) as u8,
            (timestamp >> 24) as u8,
            (timestamp >> 16) as u8,
            (timestamp >> 8) as u8,
            timestamp as u8,
            (sequence >> 8) as u8,
            sequence as u8,
            (random >> 8) as u8,
            random as u8,
        ])
    }

    /// Returns the timestamp component as milliseconds since the Unix epoch.
    pub const fn timestamp(&self) -> u64 {
        let b = &self.0;
        (b[0] as u64) << 40
            | (b[1] as u64) << 32
            | (b[2] as u64) << 24
            | (b[3] as u64) << 16
            | (b[4] as u64) << 8
            | b[5] as u64
    }

    /// Returns the timestamp as a [`time::SystemTime`] with millisecond
    /// resolution.
    pub fn time(&self) -> time::SystemTime {
        time::UNIX_EPOCH + time::Duration::from_millis(self.timestamp())
    }

    /// Returns the sequence component.
    pub const fn sequence(&self) -> u16 {
        u16::from_be_bytes([self.0[6], self.0[7]])
    }

    /// Returns the two-byte random component.
    pub const fn random(&self) -> u16 {
        u16::from_be_bytes([self.0[8], self.0[9]])
    }

    /// Returns true if `self` is the nil (all-zero) sentinel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kid::Kid;
    ///
    /// assert!(Kid::NIL.is_nil());
    /// assert!(!kid::kid().is_nil());
    /// ```
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Compares the creation order of two Kids, consulting only the first 8
    /// bytes (timestamp and sequence). The trailing random bytes carry no
    /// ordering semantics and are ignored.
    ///
    /// Note that the derived [`Ord`] implementation, unlike this method,
    /// compares all 10 bytes.
    pub fn compare(&self, other: &Self) -> cmp::Ordering {
        self.0[..8].cmp(&other.0[..8])
    }

    /// Returns the base32 string representation stored in a stack-allocated
    /// structure that can be dereferenced as `str` and
    /// [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kid::Kid;
    ///
    /// let x = "06bqer9xnr09hyq5".parse::<Kid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "06bqer9xnr09hyq5");
    /// assert_eq!(format!("{}", y), "06bqer9xnr09hyq5");
    /// # Ok::<(), kid::InvalidId>(())
    /// ```
    pub fn encode(&self) -> impl ops::Deref<Target = str> + fmt::Display {
        let id = &self.0;
        let mut dst = [0u8; 16];

        // Base32 by unrolled shift/mask rather than a generic codec: a 10-byte
        // input packs into exactly 16 five-bit groups, so no padding ever
        // appears and the fixed grouping below is its own inverse in decode().
        dst[15] = ENCODING[(id[9] & 0x1f) as usize];
        dst[14] = ENCODING[((id[9] >> 5) | (id[8] << 3) & 0x1f) as usize];
        dst[13] = ENCODING[((id[8] >> 2) & 0x1f) as usize];
        dst[12] = ENCODING[((id[8] >> 7) | (id[7] << 1) & 0x1f) as usize];
        dst[11] = ENCODING[((id[7] >> 4) & 0x1f | (id[6] << 4) & 0x1f) as usize];
        dst[10] = ENCODING[((id[6] >> 1) & 0x1f) as usize];
        dst[9] = ENCODING[((id[6] >> 6) & 0x1f | (id[5] << 2) & 0x1f) as usize];
        dst[8] = ENCODING[(id[5] >> 3) as usize];
        dst[7] = ENCODING[(id[4] & 0x1f) as usize];
        dst[6] = ENCODING[((id[4] >> 5) | (id[3] << 3) & 0x1f) as usize];
        dst[5] = ENCODING[((id[3] >> 2) & 0x1f) as usize];
        dst[4] = ENCODING[((id[3] >> 7) | (id[2] << 1) & 0x1f) as usize];
        dst[3] = ENCODING[((id[2] >> 4) & 0x1f | (id[1] << 4) & 0x1f) as usize];
        dst[2] = ENCODING[((id[1] >> 1) & 0x1f) as usize];
        dst[1] = ENCODING[((id[1] >> 6) & 0x1f | (id[0] << 2) & 0x1f) as usize];
        dst[0] = ENCODING[(id[0] >> 3) as usize];

        debug_assert!(dst.is_ascii());
        KidStr(dst)
    }

    /// Reverses the bit-unrolled base32 encoding.
    ///
    /// `src` must already be checked for length and alphabet membership so
    /// that every table lookup lands inside [`ENCODING`].
    fn decode(src: &[u8; 16]) -> Result<Self, InvalidId> {
        let mut id = [0u8; 10];

        id[9] = DEC[src[14] as usize] << 5 | DEC[src[15] as usize];
        // 80 bits pack into 16 characters without slack, so re-encoding the
        // last byte should always reproduce the last input character; treat a
        // mismatch as malformed input anyway.
        if ENCODING[(id[9] & 0x1f) as usize] != src[15] {
            return Err(InvalidId {});
        }
        id[8] = DEC[src[12] as usize] << 7 | DEC[src[13] as usize] << 2 | DEC[src[14] as usize] >> 3;
        id[7] = DEC[src[11] as usize] << 4 | DEC[src[12] as usize] >> 1;
        id[6] = DEC[src[9] as usize] << 6 | DEC[src[10] as usize] << 1 | DEC[src[11] as usize] >> 4;
        id[5] = DEC[src[8] as usize] << 3 | DEC[src[9] as usize] >> 2;
        id[4] = DEC[src[6] as usize] << 5 | DEC[src[7] as usize];
        id[3] = DEC[src[4] as usize] << 7 | DEC[src[5] as usize] << 2 | DEC[src[6] as usize] >> 3;
        id[2] = DEC[src[3] as usize] << 4 | DEC[src[4] as usize] >> 1;
        id[1] = DEC[src[1] as usize] << 6 | DEC[src[2] as usize] << 1 | DEC[src[3] as usize] >> 4;
        id[0] = DEC[src[0] as usize] << 3 | DEC[src[1] as usize] >> 2;

        Ok(Self(id))
    }
}

/// Sorts a slice of Kids in place by creation order.
///
/// The sort is stable and uses [`Kid::compare`], i.e. only the timestamp and
/// sequence components participate.
pub fn sort(ids: &mut [Kid]) {
    ids.sort_by(Kid::compare);
}

impl fmt::Display for Kid {
    /// Returns the 16-character base32 string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Kid {
    type Err = InvalidId;

    /// Creates an object from the 16-character base32 string representation.
    ///
    /// Decoding is case-sensitive; only the lowercase canonical form is
    /// accepted.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let text: &[u8; 16] = src.as_bytes().try_into().map_err(|_| InvalidId {})?;
        if text.iter().any(|&c| DEC[c as usize] == INVALID) {
            return Err(InvalidId {});
        }
        Self::decode(text)
    }
}

impl From<Kid> for [u8; 10] {
    fn from(src: Kid) -> Self {
        src.0
    }
}

impl From<[u8; 10]> for Kid {
    fn from(src: [u8; 10]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Kid {
    type Error = InvalidId;

    /// Copies a 10-byte slice into a Kid. Only the length is validated.
    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 10]>::try_from(src).map(Self).map_err(|_| InvalidId {})
    }
}

impl AsRef<[u8]> for Kid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Kid> for String {
    fn from(src: Kid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Kid {
    type Error = InvalidId;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Concrete return type of [`Kid::encode()`] containing the stack-allocated
/// 16-character base32 representation.
struct KidStr([u8; 16]);

impl ops::Deref for KidStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        debug_assert!(self.0.is_ascii());
        unsafe { str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for KidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

/// Error for an invalid identifier: a string representation of the wrong
/// length or character set, or a byte slice of the wrong length.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct InvalidId {}

impl fmt::Display for InvalidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid id")
    }
}

impl std::error::Error for InvalidId {}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Kid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Kid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                if self.is_nil() {
                    // nil doubles as "no id"; map it to null in JSON and kin
                    serializer.serialize_unit()
                } else {
                    serializer.serialize_str(&self.encode())
                }
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Kid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                // deserialize_any, not deserialize_str: self-describing
                // formats only route null through visit_unit from here
                deserializer.deserialize_any(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Kid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a kid representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::try_from(value).map_err(de::Error::custom)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Kid::NIL)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Kid::NIL)
        }
    }

}
