//! ipfix-buffers - growable output buffer for the IPFIX JSON encoder.

mod writer;

pub use writer::Writer;
