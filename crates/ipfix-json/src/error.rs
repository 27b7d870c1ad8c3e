use thiserror::Error;

/// Failure while encoding a message to JSON.
///
/// Bytes written before the failing field are left in the writer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("unsupported value type {kind} for element {id}")]
    UnsupportedValueType { id: u16, kind: String },
}

/// Failure while parsing a MAC address from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MacParseError {
    #[error("expected 6 octets, found {0}")]
    OctetCount(usize),

    #[error("invalid octet: {0:?}")]
    InvalidOctet(String),

    #[error("expected 6 bytes, found {0}")]
    ByteLength(usize),
}
