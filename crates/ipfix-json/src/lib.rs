//! Canonical JSON encoding of decoded IPFIX export messages.
//!
//! A [`Message`] produced by an upstream wire decoder is written as
//!
//! ```text
//! {"AgentID":"..","Header":{..},"DataSets":[[{"ID":..,"Value":..}]]}
//! ```
//!
//! by [`JsonEncoder`], directly into an [`ipfix_buffers::Writer`].
//!
//! ```
//! use std::net::Ipv4Addr;
//! use ipfix_json::{DecodedField, Message, MessageHeader};
//!
//! let msg = Message {
//!     agent_id: "agent-1".into(),
//!     header: MessageHeader {
//!         version: 10,
//!         length: 48,
//!         export_time: 1_600_000_000,
//!         sequence_no: 1,
//!         domain_id: 256,
//!     },
//!     data_sets: vec![vec![DecodedField::new(8, Ipv4Addr::new(10, 0, 0, 1))]],
//! };
//! let json = msg.to_json().unwrap();
//! assert_eq!(
//!     std::str::from_utf8(&json).unwrap(),
//!     r#"{"AgentID":"agent-1","Header":{"Version":10,"Length":48,"ExportTime":1600000000,"SequenceNo":1,"DomainID":256},"DataSets":[[{"ID":8,"Value":"10.0.0.1"}]]}"#
//! );
//! ```

mod encoder;
mod error;
mod mac;
mod message;
mod options;

pub use encoder::JsonEncoder;
pub use error::{EncodeError, MacParseError};
pub use mac::MacAddr;
pub use message::{DataSet, DecodedField, FieldValue, Message, MessageHeader};
pub use options::{EncoderOptions, StringEscaping};
