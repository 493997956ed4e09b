use crate::output::CanonOutput;

/// Converts query text into a legacy charset before it is percent-encoded.
///
/// Implementations append the converted bytes. Characters the charset cannot
/// represent are written as `%26%23NNN%3B`, an escaped HTML numeric character
/// reference, so they survive the escaping that follows.
pub trait CharsetConverter {
    fn convert(&self, input: &str, output: &mut CanonOutput);
}

/// A [`CharsetConverter`] backed by an `encoding_rs` encoding.
#[cfg(feature = "encoding")]
#[derive(Debug, Clone, Copy)]
pub struct EncodingConverter {
    encoding: &'static encoding_rs::Encoding,
}

#[cfg(feature = "encoding")]
impl EncodingConverter {
    /// Encoders never produce UTF-16, so UTF-16 and `replacement` encode as
    /// UTF-8.
    pub fn new(encoding: &'static encoding_rs::Encoding) -> Self {
        Self {
            encoding: encoding.output_encoding(),
        }
    }

    /// Look up an encoding by its WHATWG label, e.g. `b"shift_jis"`.
    pub fn for_label(label: &[u8]) -> Option<Self> {
        encoding_rs::Encoding::for_label(label).map(Self::new)
    }

    pub fn encoding(&self) -> &'static encoding_rs::Encoding {
        self.encoding
    }
}

#[cfg(feature = "encoding")]
impl CharsetConverter for EncodingConverter {
    fn convert(&self, input: &str, output: &mut CanonOutput) {
        use encoding_rs::EncoderResult;

        let mut encoder = self.encoding.new_encoder();
        let mut buffer = [0u8; 256];
        let mut rest = input;
        loop {
            let (result, read, written) =
                encoder.encode_from_utf8_without_replacement(rest, &mut buffer, true);
            output.append(&buffer[..written]);
            rest = &rest[read..];
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => {}
                EncoderResult::Unmappable(ch) => {
                    output.push_str("%26%23");
                    output.append_decimal(u32::from(ch));
                    output.push_str("%3B");
                }
            }
        }
    }
}
