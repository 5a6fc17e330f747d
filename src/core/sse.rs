use std::str::Utf8Error;

use memchr::memchr;

/// Splits a server-sent-events byte stream into complete lines.
///
/// Network chunks can end anywhere, including inside a multi-byte character,
/// so bytes are buffered until a newline arrives.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buffer: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns every line it completed, trimmed. A line
    /// that is not valid UTF-8 comes back as an error in its place.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<String, Utf8Error>> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            lines.push(decode_line(&self.buffer[..newline_pos]));
            self.buffer.drain(..=newline_pos);
        }
        lines
    }

    /// Returns the unterminated tail, if any, once the byte stream closes.
    pub fn finish(&mut self) -> Option<Result<String, Utf8Error>> {
        if self.buffer.is_empty() {
            return None;
        }
        let tail = decode_line(&self.buffer);
        self.buffer.clear();
        match tail {
            Ok(line) if line.is_empty() => None,
            other => Some(other),
        }
    }
}

fn decode_line(bytes: &[u8]) -> Result<String, Utf8Error> {
    std::str::from_utf8(bytes).map(|line| line.trim().to_string())
}

pub fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_split_across_chunks_are_reassembled() {
        let mut buffer = SseLineBuffer::new();
        assert!(buffer.push(b"data: {\"a\"").is_empty());
        assert_eq!(
            buffer.push(b":1}\r\n\r\ndata: x"),
            vec![Ok("data: {\"a\":1}".to_string()), Ok(String::new())]
        );
        assert_eq!(buffer.finish(), Some(Ok("data: x".to_string())));
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn multibyte_characters_split_between_chunks_survive() {
        let mut buffer = SseLineBuffer::new();
        let line = "data: مرحبا\n".as_bytes();
        let (head, tail) = line.split_at(7);
        assert!(buffer.push(head).is_empty());
        assert_eq!(buffer.push(tail), vec![Ok("data: مرحبا".to_string())]);
    }

    #[test]
    fn invalid_utf8_line_is_reported_in_place() {
        let mut buffer = SseLineBuffer::new();
        let lines = buffer.push(b"data: a\ndata: \xff\xfe\ndata: b\n");

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], Ok("data: a".to_string()));
        assert!(lines[1].is_err());
        assert_eq!(lines[2], Ok("data: b".to_string()));

        buffer.push(b"data: \xc3");
        assert!(matches!(buffer.finish(), Some(Err(_))));
    }

    #[test]
    fn data_prefix_accepts_both_spacing_variants() {
        assert_eq!(extract_data_payload("data: {}"), Some("{}"));
        assert_eq!(extract_data_payload("data:{}"), Some("{}"));
        assert_eq!(extract_data_payload(": keep-alive"), None);
        assert_eq!(extract_data_payload("event: message"), None);
    }
}
