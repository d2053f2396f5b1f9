use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::str::Chars;

use log::debug;

/// Opening tag prepended to every emitted fragment
const ROW_OPEN: &str = "<tr>";

/// Literal closing sequence that terminates a fragment
const ROW_CLOSE: &str = "</tr>";

/// Single-character read capability the tokenizer scans with
///
/// `Ok(None)` means end of input.
pub trait CharSource {
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl CharSource for Chars<'_> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

/// Decodes UTF-8 one character at a time from any buffered reader
///
/// A multi-byte sequence cut off by end of input is treated as end of input,
/// matching how the tokenizer handles truncated exports. Invalid bytes in the
/// middle of the stream are an `InvalidData` error.
pub struct Utf8Chars<R> {
    reader: R,
}

impl<R: BufRead> Utf8Chars<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let Some(&byte) = buf.first() else {
                return Ok(None);
            };
            self.reader.consume(1);
            return Ok(Some(byte));
        }
    }
}

impl<R: BufRead> CharSource for Utf8Chars<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let Some(first) = self.next_byte()? else {
            return Ok(None);
        };

        let width = utf8_width(first);
        if width == 1 {
            return Ok(Some(char::from(first)));
        }
        if width == 0 {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("invalid UTF-8 leading byte 0x{:02x}", first),
            ));
        }

        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.next_byte()? {
                Some(byte) => *slot = byte,
                None => {
                    debug!("Input ends inside a UTF-8 sequence; treating as end of stream");
                    return Ok(None);
                }
            }
        }

        let decoded = std::str::from_utf8(&buf[..width])
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
        Ok(decoded.chars().next())
    }
}

fn utf8_width(leading: u8) -> usize {
    match leading {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

/// Streams `<tr>...</tr>` fragments out of an arbitrarily large markup document
///
/// Every other tag is skipped. The scan never builds a tree and never buffers
/// more than the row currently being read.
///
/// The closing `</tr>` is matched with a restarting five-step scan: when a
/// candidate match fails, the mismatching character is kept as row content
/// and matching starts over at the *next* character. A `<` that breaks a
/// partial match therefore cannot itself begin a match, so input such as
/// `</t</tr>` is not closed at that point.
///
/// End of input while looking for `<`, for `>`, or partway through a row ends
/// the stream; the partial row is dropped.
pub struct RowTokenizer<S> {
    source: S,
    finished: bool,
}

impl<R: Read> RowTokenizer<Utf8Chars<BufReader<R>>> {
    /// Tokenize a UTF-8 byte stream (file, socket, ...)
    pub fn from_reader(reader: R) -> Self {
        Self::new(Utf8Chars::new(BufReader::new(reader)))
    }
}

impl<'a> RowTokenizer<Chars<'a>> {
    /// Tokenize an in-memory document
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.chars())
    }
}

impl<S: CharSource> RowTokenizer<S> {
    pub fn new(source: S) -> Self {
        Self { source, finished: false }
    }

    /// Next row fragment, or `Ok(None)` once the stream is exhausted
    pub fn next_fragment(&mut self) -> io::Result<Option<String>> {
        if self.finished {
            return Ok(None);
        }

        let fragment = self.scan();
        if !matches!(fragment, Ok(Some(_))) {
            self.finished = true;
        }
        fragment
    }

    fn scan(&mut self) -> io::Result<Option<String>> {
        loop {
            loop {
                match self.source.next_char()? {
                    None => return Ok(None),
                    Some('<') => break,
                    Some(_) => {}
                }
            }

            let mut tag = String::new();
            loop {
                match self.source.next_char()? {
                    None => return Ok(None),
                    Some('>') => break,
                    Some(ch) => tag.push(ch),
                }
            }

            if is_row_tag(&tag) {
                return self.read_row_body();
            }
        }
    }

    fn read_row_body(&mut self) -> io::Result<Option<String>> {
        let mut body = String::from(ROW_OPEN);
        let close_len = ROW_CLOSE.chars().count();

        loop {
            let mut matched = 0;
            for expected in ROW_CLOSE.chars() {
                let Some(ch) = self.source.next_char()? else {
                    debug!("Input ends inside a <tr> row; dropping {} buffered bytes", body.len());
                    return Ok(None);
                };
                body.push(ch);
                if ch != expected {
                    break;
                }
                matched += 1;
            }

            if matched == close_len {
                return Ok(Some(body));
            }
        }
    }
}

impl<S: CharSource> Iterator for RowTokenizer<S> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_fragment().transpose()
    }
}

/// A tag opens a row when its first whitespace-delimited token is exactly `tr`
fn is_row_tag(tag: &str) -> bool {
    tag.split(|c: char| c.is_ascii_whitespace()).next() == Some("tr")
}
