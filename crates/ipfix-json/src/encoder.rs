//! `JsonEncoder`: writes decoded IPFIX messages as JSON into a [`Writer`].
//!
//! The output shape is fixed:
//!
//! ```text
//! {"AgentID":"..","Header":{"Version":..,"Length":..,"ExportTime":..,"SequenceNo":..,"DomainID":..},"DataSets":[[{"ID":..,"Value":..},..],..]}
//! ```
//!
//! Every section is appended with linear writes; nothing is built up as an
//! intermediate tree. Floats use upper-case scientific notation with the
//! shortest digits that round-trip at the value's own precision and a signed
//! exponent of at least two digits (`1.5E+00`, `1E-07`).

use std::fmt::UpperExp;

use ipfix_buffers::Writer;
use tracing::{debug, trace};

use crate::message::{DataSet, DecodedField, FieldValue, Message, MessageHeader};
use crate::{EncodeError, EncoderOptions, StringEscaping};

pub struct JsonEncoder {
    pub writer: Writer,
    options: EncoderOptions,
    /// Flush position and window range of output left by the last failed
    /// `encode`.
    partial: Option<(usize, usize, usize)>,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::with_options(EncoderOptions::default())
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        let writer = Writer::with_alloc_size(options.buffer_size);
        Self::with_writer(writer, options)
    }

    /// Uses a caller-supplied writer, appending after whatever it holds.
    pub fn with_writer(writer: Writer, options: EncoderOptions) -> Self {
        Self {
            writer,
            options,
            partial: None,
        }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    pub fn into_writer(self) -> Writer {
        self.writer
    }

    /// Encodes one message and returns its bytes.
    ///
    /// The message is written after whatever the writer already holds and
    /// handed back; the writer's earlier bytes are left as they were. On
    /// error the partial output stays in the writer until the next call
    /// removes it, unless the writer was flushed in between.
    pub fn encode(&mut self, msg: &Message) -> Result<Vec<u8>, EncodeError> {
        if let Some((x0, start, end)) = self.partial.take() {
            // Left alone if the caller has flushed since.
            if self.writer.x0 == x0 && end <= self.writer.len() {
                self.writer.remove(start, end);
            }
        }
        let start = self.writer.len();
        if let Err(err) = self.write_message(msg) {
            self.partial = Some((self.writer.x0, start, self.writer.len()));
            return Err(err);
        }
        let out = self.writer.as_slice()[start..].to_vec();
        self.writer.truncate(start);
        trace!(agent_id = %msg.agent_id, bytes = out.len(), "encoded ipfix message");
        Ok(out)
    }

    /// Appends one message without touching the flush position.
    pub fn write_message(&mut self, msg: &Message) -> Result<(), EncodeError> {
        self.writer.u8(b'{');
        self.write_agent(&msg.agent_id);
        self.write_header(&msg.header);
        self.write_data_sets(&msg.data_sets)?;
        self.writer.u8(b'}');
        Ok(())
    }

    /// Writes `"AgentID":"..",`.
    pub fn write_agent(&mut self, agent_id: &str) {
        self.writer.buf(b"\"AgentID\":");
        self.write_str(agent_id);
        self.writer.u8(b',');
    }

    /// Writes the header object followed by a comma.
    pub fn write_header(&mut self, header: &MessageHeader) {
        self.writer.buf(b"\"Header\":{\"Version\":");
        self.write_u_integer(u64::from(header.version));
        self.writer.buf(b",\"Length\":");
        self.write_u_integer(u64::from(header.length));
        self.writer.buf(b",\"ExportTime\":");
        self.write_u_integer(u64::from(header.export_time));
        self.writer.buf(b",\"SequenceNo\":");
        self.write_u_integer(u64::from(header.sequence_no));
        self.writer.buf(b",\"DomainID\":");
        self.write_u_integer(u64::from(header.domain_id));
        self.writer.buf(b"},");
    }

    /// Writes `"DataSets":[[..],..]`, stopping at the first unsupported value.
    pub fn write_data_sets(&mut self, data_sets: &[DataSet]) -> Result<(), EncodeError> {
        self.writer.buf(b"\"DataSets\":[");
        let last = data_sets.len().saturating_sub(1);
        for (i, set) in data_sets.iter().enumerate() {
            self.write_data_set(set)?;
            if i < last {
                self.writer.u8(b',');
            }
        }
        self.writer.u8(b']');
        Ok(())
    }

    pub fn write_data_set(&mut self, fields: &[DecodedField]) -> Result<(), EncodeError> {
        self.writer.u8(b'[');
        let last = fields.len().saturating_sub(1);
        for (i, field) in fields.iter().enumerate() {
            self.writer.buf(b"{\"ID\":");
            self.write_u_integer(u64::from(field.id));
            self.writer.buf(b",\"Value\":");
            self.write_value(field.id, &field.value)?;
            self.writer.u8(b'}');
            if i < last {
                self.writer.u8(b',');
            }
        }
        self.writer.u8(b']');
        Ok(())
    }

    /// Writes a single field value. `id` is only used for error reporting.
    pub fn write_value(&mut self, id: u16, value: &FieldValue) -> Result<(), EncodeError> {
        match value {
            FieldValue::U8(v) => self.write_u_integer(u64::from(*v)),
            FieldValue::U16(v) => self.write_u_integer(u64::from(*v)),
            FieldValue::U32(v) => self.write_u_integer(u64::from(*v)),
            FieldValue::U64(v) => self.write_u_integer(*v),
            FieldValue::I8(v) => self.write_integer(i64::from(*v)),
            FieldValue::I16(v) => self.write_integer(i64::from(*v)),
            FieldValue::I32(v) => self.write_integer(i64::from(*v)),
            FieldValue::I64(v) => self.write_integer(*v),
            FieldValue::F32(v) => self.write_f32(*v),
            FieldValue::F64(v) => self.write_f64(*v),
            FieldValue::Str(s) => self.write_str(s),
            // IPv4-mapped IPv6 keeps its `::ffff:a.b.c.d` form rather than
            // collapsing to dotted-quad.
            FieldValue::Ip(ip) => self.write_plain_str(&ip.to_string()),
            FieldValue::Mac(mac) => self.write_plain_str(&mac.to_string()),
            FieldValue::Bytes(b) => self.write_hex(b),
            FieldValue::Unsupported(kind) => {
                debug!(id, kind = %kind, "rejecting field value of unsupported type");
                return Err(EncodeError::UnsupportedValueType {
                    id,
                    kind: kind.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn write_null(&mut self) {
        self.writer.buf(b"null");
    }

    pub fn write_integer(&mut self, int: i64) {
        self.writer.ascii(&int.to_string());
    }

    pub fn write_u_integer(&mut self, uint: u64) {
        self.writer.ascii(&uint.to_string());
    }

    /// Non-finite values have no JSON literal and are written as `null`.
    pub fn write_f32(&mut self, float: f32) {
        if float.is_finite() {
            self.writer.ascii(&format_sci(float));
        } else {
            self.write_null();
        }
    }

    pub fn write_f64(&mut self, float: f64) {
        if float.is_finite() {
            self.writer.ascii(&format_sci(float));
        } else {
            self.write_null();
        }
    }

    /// Writes a JSON string according to [`EncoderOptions::strings`].
    pub fn write_str(&mut self, s: &str) {
        match self.options.strings {
            StringEscaping::Raw => self.write_plain_str(s),
            StringEscaping::Json => self.write_escaped_str(s),
        }
    }

    /// Writes `"0x"` followed by two hex digits per byte, quoted.
    pub fn write_hex(&mut self, bytes: &[u8]) {
        self.writer.ensure_capacity(bytes.len() * 2 + 4);
        self.writer.buf(b"\"0x");
        self.writer.hex(bytes);
        self.writer.u8(b'"');
    }

    // Quotes `s` without inspecting it.
    fn write_plain_str(&mut self, s: &str) {
        self.writer.ensure_capacity(s.len() + 2);
        self.writer.u8(b'"');
        self.writer.utf8(s);
        self.writer.u8(b'"');
    }

    fn write_escaped_str(&mut self, s: &str) {
        let needs_escape = s.bytes().any(|b| b < 0x20 || b == b'"' || b == b'\\');
        if !needs_escape {
            self.write_plain_str(s);
            return;
        }
        // Serializing a `str` cannot fail.
        let json_str = serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string());
        self.writer.buf(json_str.as_bytes());
    }
}

/// Formats a finite float as `<mantissa>E<sign><exponent>`, zero-padding the
/// exponent to two digits.
fn format_sci<T: UpperExp>(value: T) -> String {
    let s = format!("{value:E}");
    let parts = s
        .split_once('E')
        .and_then(|(mantissa, exp)| Some((mantissa.to_owned(), exp.parse::<i32>().ok()?)));
    match parts {
        Some((mantissa, exp)) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}E{sign}{:02}", exp.unsigned_abs())
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_json(value: FieldValue) -> String {
        let mut enc = JsonEncoder::new();
        enc.write_value(1, &value).unwrap();
        String::from_utf8(enc.writer.flush()).unwrap()
    }

    #[test]
    fn sci_f64_shortest_digits() {
        assert_eq!(format_sci(1.5f64), "1.5E+00");
        assert_eq!(format_sci(0.0f64), "0E+00");
        assert_eq!(format_sci(100.0f64), "1E+02");
        assert_eq!(format_sci(1600000000.0f64), "1.6E+09");
        assert_eq!(format_sci(1.0e-7f64), "1E-07");
        assert_eq!(format_sci(-2.5e-300f64), "-2.5E-300");
        assert_eq!(format_sci(123456.789f64), "1.23456789E+05");
    }

    #[test]
    fn sci_f32_uses_single_precision_digits() {
        assert_eq!(format_sci(0.1f32), "1E-01");
        assert_eq!(format_sci(3.14f32), "3.14E+00");
        // Widened to f64 the same value needs many more digits.
        assert_ne!(format_sci(f64::from(0.1f32)), "1E-01");
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(value_json(FieldValue::F64(f64::NAN)), "null");
        assert_eq!(value_json(FieldValue::F32(f32::INFINITY)), "null");
        assert_eq!(value_json(FieldValue::F64(f64::NEG_INFINITY)), "null");
    }

    #[test]
    fn integers_use_full_range() {
        assert_eq!(value_json(FieldValue::U8(255)), "255");
        assert_eq!(value_json(FieldValue::U64(u64::MAX)), "18446744073709551615");
        assert_eq!(value_json(FieldValue::I8(-128)), "-128");
        assert_eq!(value_json(FieldValue::I64(i64::MIN)), "-9223372036854775808");
    }

    #[test]
    fn bytes_are_zero_padded_hex() {
        assert_eq!(value_json(FieldValue::Bytes(vec![0x0a, 0xff])), "\"0x0aff\"");
        assert_eq!(value_json(FieldValue::Bytes(vec![0x00, 0x01])), "\"0x0001\"");
        assert_eq!(value_json(FieldValue::Bytes(vec![])), "\"0x\"");
    }

    #[test]
    fn escaped_and_raw_strings() {
        assert_eq!(value_json(FieldValue::Str("eth0".into())), "\"eth0\"");
        assert_eq!(
            value_json(FieldValue::Str("a\"b\\c\n".into())),
            r#""a\"b\\c\n""#
        );

        let mut enc = JsonEncoder::with_options(EncoderOptions {
            strings: StringEscaping::Raw,
            ..EncoderOptions::default()
        });
        enc.write_value(1, &FieldValue::Str("a\"b".into())).unwrap();
        assert_eq!(enc.writer.flush(), b"\"a\"b\"");
    }

    #[test]
    fn non_ascii_strings_pass_through() {
        assert_eq!(value_json(FieldValue::Str("héllo €".into())), "\"héllo €\"");
    }

    #[test]
    fn unsupported_value_reports_id_and_kind() {
        let mut enc = JsonEncoder::new();
        let err = enc
            .write_value(42, &FieldValue::Unsupported("bool".into()))
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::UnsupportedValueType {
                id: 42,
                kind: "bool".into()
            }
        );
        assert!(enc.writer.is_empty());
    }

    #[test]
    fn header_fields_in_fixed_order() {
        let mut enc = JsonEncoder::new();
        enc.write_header(&MessageHeader {
            version: 10,
            length: 48,
            export_time: u32::MAX,
            sequence_no: 7,
            domain_id: 0,
        });
        assert_eq!(
            enc.writer.flush(),
            br#""Header":{"Version":10,"Length":48,"ExportTime":4294967295,"SequenceNo":7,"DomainID":0},"#
                .to_vec()
        );
    }

    #[test]
    fn caller_writer_is_appended_to() {
        let mut writer = Writer::new();
        writer.ascii("prefix ");
        let mut enc = JsonEncoder::with_writer(writer, EncoderOptions::default());
        enc.write_message(&Message::default()).unwrap();
        let writer = enc.into_writer();
        assert_eq!(
            writer.as_slice(),
            br#"prefix {"AgentID":"","Header":{"Version":0,"Length":0,"ExportTime":0,"SequenceNo":0,"DomainID":0},"DataSets":[]}"#
        );
    }
}
