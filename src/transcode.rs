//! Streaming charset decoder: frames of legacy-encoded bytes in, UTF-8
//! bytes out. Only engaged for uploads that declare a non-UTF-8 charset.

use bytes::{Buf, BytesMut};
use std::io;
use tokio_util::codec::Decoder;

pub struct CharsetDecoder {
    inner: encoding_rs::Decoder,
    scratch: Vec<u8>,
}

impl CharsetDecoder {
    pub fn new(encoding: &'static encoding_rs::Encoding) -> Self {
        Self {
            inner: encoding.new_decoder(),
            scratch: Vec::new(),
        }
    }

    fn run(&mut self, src: &mut BytesMut, last: bool) -> Option<BytesMut> {
        if src.is_empty() {
            return None;
        }

        let needed = if last {
            self.inner.max_utf8_buffer_length(src.len())
        } else {
            self.inner
                .max_utf8_buffer_length_without_replacement(src.len())
        }
        .unwrap_or(src.len() * 2);
        self.scratch.resize(needed, 0);

        let (_, read, written, _) = self.inner.decode_to_utf8(src, &mut self.scratch, last);
        if last {
            src.clear();
        } else {
            if read == 0 && written == 0 {
                // Not enough input for a full code point yet.
                return None;
            }
            src.advance(read);
        }

        (written > 0 || !last).then(|| BytesMut::from(&self.scratch[..written]))
    }
}

impl Decoder for CharsetDecoder {
    type Item = BytesMut;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(self.run(src, false))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(self.run(src, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_latin1_to_utf8() {
        let mut dec = CharsetDecoder::new(encoding_rs::WINDOWS_1252);
        // "Müller" in Windows-1252.
        let mut src = BytesMut::from(&b"M\xFCller"[..]);
        let out = dec.decode_eof(&mut src).unwrap().unwrap();
        assert_eq!(std::str::from_utf8(&out).unwrap(), "Müller");
        assert!(src.is_empty());
    }

    #[test]
    fn empty_input_yields_no_frame() {
        let mut dec = CharsetDecoder::new(encoding_rs::WINDOWS_1252);
        let mut src = BytesMut::new();
        assert!(dec.decode(&mut src).unwrap().is_none());
        assert!(dec.decode_eof(&mut src).unwrap().is_none());
    }
}
