//! Derivation file reader

/// An iterator that assembles a byte source into lines of text.
///
/// The byte source is boxed so that transparently decompressed files and
/// stdin can be read through the same type. Leading whitespace is preserved
/// because indentation is significant in Fitch-style derivations.
pub struct Input<'a> {
    /// The source of the input data
    source: Box<dyn Iterator<Item = u8> + 'a>,
    /// Buffer for the line currently being assembled
    buffer: Vec<u8>,
}

impl<'a> Input<'a> {
    /// Create a new `Input` from some source
    pub fn new(source: Box<dyn Iterator<Item = u8> + 'a>) -> Self {
        Input {
            source,
            buffer: Vec::new(),
        }
    }
}

impl Iterator for Input<'_> {
    type Item = String;
    fn next(&mut self) -> Option<String> {
        loop {
            match self.source.next() {
                Some(b'\n') => {
                    let line = String::from_utf8_lossy(&self.buffer).into_owned();
                    self.buffer.clear();
                    return Some(line);
                }
                // Swallowed so that CRLF files check like LF files.
                Some(b'\r') => (),
                Some(byte) => self.buffer.push(byte),
                None => {
                    if self.buffer.is_empty() {
                        return None;
                    }
                    let line = String::from_utf8_lossy(&self.buffer).into_owned();
                    self.buffer.clear();
                    return Some(line);
                }
            }
        }
    }
}
