//! [`MacAddr`], the 6-byte hardware address.

use std::fmt;
use std::str::FromStr;

use crate::MacParseError;

/// A 48-bit hardware (MAC) address.
///
/// Displays as lowercase colon-separated hex, e.g. `00:1b:44:11:3a:b7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl TryFrom<&[u8]> for MacAddr {
    type Error = MacParseError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let octets: [u8; 6] = bytes
            .try_into()
            .map_err(|_| MacParseError::ByteLength(bytes.len()))?;
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Accepts `:` or `-` separated octets, either case.
impl FromStr for MacAddr {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sep = if s.contains('-') { '-' } else { ':' };
        let parts: Vec<&str> = s.split(sep).collect();
        if parts.len() != 6 {
            return Err(MacParseError::OctetCount(parts.len()));
        }
        let mut octets = [0u8; 6];
        for (slot, part) in octets.iter_mut().zip(&parts) {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(MacParseError::InvalidOctet((*part).to_owned()));
            }
            *slot = u8::from_str_radix(part, 16)
                .map_err(|_| MacParseError::InvalidOctet((*part).to_owned()))?;
        }
        Ok(Self(octets))
    }
}
