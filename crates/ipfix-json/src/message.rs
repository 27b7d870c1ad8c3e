//! Decoded IPFIX message model.
//!
//! Messages are built by the wire decoder and handed to the encoder as
//! read-only input.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::{EncodeError, JsonEncoder, MacAddr};

/// IPFIX message header (RFC 7011 §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    pub version: u16,
    pub length: u16,
    /// Seconds since the UNIX epoch.
    pub export_time: u32,
    pub sequence_no: u32,
    pub domain_id: u32,
}

/// A single decoded information element.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    /// Information element identifier. Not unique across data sets.
    pub id: u16,
    pub value: FieldValue,
}

impl DecodedField {
    pub fn new(id: u16, value: impl Into<FieldValue>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}

/// Fields of one data record, in wire order.
pub type DataSet = Vec<DecodedField>;

/// A decoded export message together with the exporter that sent it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    pub agent_id: String,
    pub header: MessageHeader,
    pub data_sets: Vec<DataSet>,
}

impl Message {
    /// Encodes the message with default [`crate::EncoderOptions`].
    pub fn to_json(&self) -> Result<Vec<u8>, EncodeError> {
        JsonEncoder::new().encode(self)
    }
}

/// Value of a decoded field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Ip(IpAddr),
    Mac(MacAddr),
    Bytes(Vec<u8>),
    /// A value whose type the encoder cannot represent, tagged with the
    /// decoder's name for it. Encoding it fails.
    Unsupported(String),
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    FieldValue::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => Str,
    &str => Str,
    IpAddr => Ip,
    Ipv4Addr => Ip,
    Ipv6Addr => Ip,
    MacAddr => Mac,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
}
