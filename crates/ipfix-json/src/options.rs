use serde::Deserialize;

/// How string values and the agent id are embedded in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringEscaping {
    /// Escape quotes, backslashes and control characters.
    #[default]
    Json,
    /// Copy bytes verbatim between the quotes. Input containing `"`, `\` or
    /// control characters produces invalid JSON.
    Raw,
}

/// Encoder settings, deserializable from a host application's config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderOptions {
    pub strings: StringEscaping,
    /// Writer allocation size in bytes.
    pub buffer_size: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            strings: StringEscaping::Json,
            buffer_size: 4 * 1024,
        }
    }
}
