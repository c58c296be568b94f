//! Interleaved byte/codepoint input.
//!
//! Terminal streams mix raw control bytes with UTF-8 text, so the reader
//! pulls one byte at a time and speculatively starts an incremental decode
//! on any valid lead byte. A completed sequence yields a single decoded
//! scalar; a failed or truncated attempt replays every collected byte
//! individually through the raw path, so nothing is ever dropped. Every byte
//! read is appended to the caller's accumulator before it is yielded in any
//! form, which lets the parser hand byte-exact input spans to its actor.

use std::io::{ErrorKind, Read};

use nix::errno::Errno;
use utf8parse::Receiver;

use crate::parser::Error;

/// One unit of input pulled from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Input {
    /// A byte outside any successful UTF-8 decode.
    Raw(u8),
    /// A scalar value decoded from a multi-byte UTF-8 sequence.
    Decoded(char),
}

/// Result of feeding one byte to the incremental decoder.
#[derive(Debug, Default, Clone, Copy)]
enum Step {
    #[default]
    Pending,
    Complete(char),
    Invalid,
}

#[derive(Default)]
struct Sink {
    step: Step,
}

impl Receiver for Sink {
    fn codepoint(&mut self, c: char) {
        self.step = Step::Complete(c);
    }

    fn invalid_sequence(&mut self) {
        self.step = Step::Invalid;
    }
}

#[derive(Default)]
struct Utf8Decoder {
    inner: utf8parse::Parser,
}

impl Utf8Decoder {
    fn advance(&mut self, byte: u8) -> Step {
        let mut sink = Sink::default();
        self.inner.advance(&mut sink, byte);
        sink.step
    }
}

pub(crate) struct Reader<R> {
    source: R,
    /// Bytes of an abandoned decode attempt, replayed before new reads.
    replay: Vec<u8>,
}

impl<R: Read> Reader<R> {
    pub(crate) fn new(source: R) -> Self {
        Self {
            source,
            replay: Vec::new(),
        }
    }

    /// Pull the next tagged input value, or `None` at end of stream.
    pub(crate) fn next(
        &mut self,
        raw: &mut Vec<u8>,
    ) -> Result<Option<Input>, Error> {
        if !self.replay.is_empty() {
            return Ok(Some(Input::Raw(self.replay.remove(0))));
        }

        let Some(byte) = self.read_byte(raw)? else {
            return Ok(None);
        };

        if !(0xc2..=0xf4).contains(&byte) {
            return Ok(Some(Input::Raw(byte)));
        }

        self.decode(byte, raw)
    }

    /// Speculatively decode a UTF-8 sequence starting at `lead`.
    fn decode(
        &mut self,
        lead: u8,
        raw: &mut Vec<u8>,
    ) -> Result<Option<Input>, Error> {
        let mut decoder = Utf8Decoder::default();
        let mut pending = vec![lead];
        let mut step = decoder.advance(lead);

        loop {
            match step {
                Step::Complete(c) => return Ok(Some(Input::Decoded(c))),
                Step::Invalid => break,
                Step::Pending => {}
            }
            let Some(byte) = self.read_byte(raw)? else {
                // Stream ended inside the sequence.
                break;
            };
            pending.push(byte);
            step = decoder.advance(byte);
        }

        // Abandoned attempt: the first collected byte is yielded now, the
        // rest are queued for the following calls.
        self.replay.extend(pending.drain(1..));
        Ok(Some(Input::Raw(pending[0])))
    }

    fn read_byte(&mut self, raw: &mut Vec<u8>) -> Result<Option<u8>, Error> {
        let mut buf = [0u8; 1];
        loop {
            match self.source.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    raw.push(buf[0]);
                    return Ok(Some(buf[0]));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                // A hung-up pty reports EIO on read; that is end of stream,
                // not a failure.
                Err(err) if err.raw_os_error() == Some(Errno::EIO as i32) => {
                    return Ok(None);
                }
                Err(err) => return Err(Error::Read(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn drain(bytes: &[u8]) -> (Vec<Input>, Vec<u8>) {
        let mut reader = Reader::new(bytes);
        let mut raw = Vec::new();
        let mut inputs = Vec::new();
        while let Some(input) = reader.next(&mut raw).unwrap() {
            inputs.push(input);
        }
        (inputs, raw)
    }

    #[test]
    fn ascii_and_controls_stay_raw() {
        let (inputs, raw) = drain(b"a\x1b[");
        assert_eq!(
            inputs,
            [Input::Raw(b'a'), Input::Raw(0x1b), Input::Raw(b'[')]
        );
        assert_eq!(raw, b"a\x1b[");
    }

    #[test]
    fn decodes_multibyte_sequences() {
        let (inputs, raw) = drain("é\u{1f44b}".as_bytes());
        assert_eq!(
            inputs,
            [Input::Decoded('é'), Input::Decoded('\u{1f44b}')]
        );
        assert_eq!(raw, "é\u{1f44b}".as_bytes());
    }

    #[test]
    fn invalid_continuation_replays_all_bytes() {
        // 0xC3 starts a two-byte sequence but '(' is not a continuation.
        let (inputs, raw) = drain(b"\xc3\x28x");
        assert_eq!(
            inputs,
            [Input::Raw(0xc3), Input::Raw(0x28), Input::Raw(b'x')]
        );
        assert_eq!(raw, b"\xc3\x28x");
    }

    #[test]
    fn overlong_sequence_replays_all_bytes() {
        // 0xE0 0x80 is an overlong encoding; both bytes come back raw.
        let (inputs, raw) = drain(b"\xe0\x80");
        assert_eq!(inputs, [Input::Raw(0xe0), Input::Raw(0x80)]);
        assert_eq!(raw, b"\xe0\x80");
    }

    #[test]
    fn truncated_sequence_at_eof_replays_bytes() {
        let (inputs, raw) = drain(b"a\xf0\x9f");
        assert_eq!(
            inputs,
            [Input::Raw(b'a'), Input::Raw(0xf0), Input::Raw(0x9f)]
        );
        assert_eq!(raw, b"a\xf0\x9f");
    }

    #[test]
    fn stray_continuation_bytes_stay_raw() {
        // 0x80..=0xC1 are never valid lead bytes.
        let (inputs, _) = drain(b"\x80\xc1");
        assert_eq!(inputs, [Input::Raw(0x80), Input::Raw(0xc1)]);
    }

    struct Hangup<'a> {
        bytes: &'a [u8],
    }

    impl Read for Hangup<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.bytes.is_empty() {
                return Err(io::Error::from_raw_os_error(Errno::EIO as i32));
            }
            self.bytes.read(buf)
        }
    }

    #[test]
    fn eio_counts_as_end_of_stream() {
        let mut reader = Reader::new(Hangup { bytes: b"ok" });
        let mut raw = Vec::new();
        assert_eq!(reader.next(&mut raw).unwrap(), Some(Input::Raw(b'o')));
        assert_eq!(reader.next(&mut raw).unwrap(), Some(Input::Raw(b'k')));
        assert_eq!(reader.next(&mut raw).unwrap(), None);
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device unplugged"))
        }
    }

    #[test]
    fn other_io_errors_are_fatal() {
        let mut reader = Reader::new(Broken);
        let mut raw = Vec::new();
        assert!(matches!(reader.next(&mut raw), Err(Error::Read(_))));
    }

    struct Interrupting<'a> {
        bytes: &'a [u8],
        interrupted: bool,
    }

    impl Read for Interrupting<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            self.bytes.read(buf)
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let mut reader = Reader::new(Interrupting {
            bytes: b"x",
            interrupted: false,
        });
        let mut raw = Vec::new();
        assert_eq!(reader.next(&mut raw).unwrap(), Some(Input::Raw(b'x')));
    }
}
