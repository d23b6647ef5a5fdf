//! Formula parser and derivation file access

use crate::{
    input::Input,
    sentence::{Operator, Sentence},
};
use std::{
    fmt,
    fs::File,
    io::{BufReader, BufWriter, Read, StdinLock},
};

/// A malformed formula or derivation line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SyntaxError {
    message: String,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Split formula text into tokens: parentheses are tokens of their own,
/// everything else is delimited by whitespace.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for character in text.chars() {
        match character {
            '(' | ')' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(character.to_string());
            }
            character if character.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            character => current.push(character),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Check that every closing parenthesis has a matching opener before it.
fn balanced_parentheses(tokens: &[String]) -> bool {
    let mut depth: i64 = 0;
    for token in tokens {
        match token.as_str() {
            "(" => depth += 1,
            ")" => depth -= 1,
            _ => (),
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

/// An element of the reduction stack: either raw text or an already
/// reduced subformula.
enum Entry {
    Token(String),
    Parsed(Sentence),
}

/// Interpret a single stack entry as a formula.
fn parse_single(entry: Entry) -> Result<Sentence, SyntaxError> {
    match entry {
        Entry::Parsed(sentence) => Ok(sentence),
        Entry::Token(token) => parse_atomic(&token),
    }
}

/// Interpret a token as an atomic formula or truth constant.
///
/// A backslash is only special at the start of a token, so `A\B` is a
/// plain atomic name.
fn parse_atomic(token: &str) -> Result<Sentence, SyntaxError> {
    if token == r"\true" {
        Ok(Sentence::True)
    } else if token == r"\false" {
        Ok(Sentence::False)
    } else if token.starts_with('\\') {
        Err(SyntaxError::new(
            "atomic symbols cannot begin with a backslash",
        ))
    } else {
        Ok(Sentence::atom(token))
    }
}

/// Map an operator token to its connective.
fn operator_token(entry: &Entry) -> Result<Operator, SyntaxError> {
    let token = match entry {
        Entry::Token(token) => token.as_str(),
        Entry::Parsed(_) => {
            return Err(SyntaxError::new(
                "expected an operator between two operands",
            ))
        }
    };
    match token {
        r"\and" => Ok(Operator::And),
        r"\or" => Ok(Operator::Or),
        r"\implies" => Ok(Operator::Implies),
        _ => Err(SyntaxError::new(format!("operator {} not defined", token))),
    }
}

/// Parse formula text into a [Sentence](../sentence/enum.Sentence.html).
///
/// The grammar is fully parenthesized: every compound subexpression must
/// be wrapped explicitly, there is no operator precedence. An implicit
/// pair of parentheses is added around the whole input.
pub fn parse_sentence(text: &str) -> Result<Sentence, SyntaxError> {
    let mut tokens = vec![String::from("(")];
    tokens.extend(tokenize(text));
    tokens.push(String::from(")"));
    if !balanced_parentheses(&tokens) {
        return Err(SyntaxError::new(
            "formula must have balanced parentheses",
        ));
    }

    let mut stack: Vec<Entry> = Vec::new();
    for token in tokens {
        if token != ")" {
            stack.push(Entry::Token(token));
            continue;
        }
        // Pop back to the matching opener and reduce the window.
        let mut window = Vec::new();
        loop {
            let entry = match stack.pop() {
                Some(entry) => entry,
                None => return Err(SyntaxError::new("unmatched closing parenthesis")),
            };
            let done = matches!(&entry, Entry::Token(token) if token == "(");
            window.push(entry);
            if done {
                break;
            }
        }
        window.reverse();
        match window.len() {
            // "()": contributes nothing
            2 => (),
            3 => {
                let mut drain = window.into_iter();
                drain.next();
                let operand = drain.next().expect("window length checked");
                if let Entry::Token(token) = &operand {
                    if token.starts_with('\\') && token != r"\true" && token != r"\false" {
                        return Err(SyntaxError::new(
                            "operators must be accompanied by their operands",
                        ));
                    }
                }
                stack.push(Entry::Parsed(parse_single(operand)?));
            }
            4 => {
                let mut drain = window.into_iter();
                drain.next();
                let operator = drain.next().expect("window length checked");
                let operand = drain.next().expect("window length checked");
                match operator {
                    Entry::Token(token) if token == r"\not" => {
                        stack.push(Entry::Parsed(parse_single(operand)?.negated()));
                    }
                    _ => return Err(SyntaxError::new("expression is ill-formed")),
                }
            }
            5 => {
                let mut drain = window.into_iter();
                drain.next();
                let left = drain.next().expect("window length checked");
                let operator = drain.next().expect("window length checked");
                let right = drain.next().expect("window length checked");
                let op = operator_token(&operator)?;
                stack.push(Entry::Parsed(Sentence::binary(
                    parse_single(left)?,
                    op,
                    parse_single(right)?,
                )));
            }
            _ => {
                return Err(SyntaxError::new(
                    "all inner expressions require explicit surrounding parentheses",
                ))
            }
        }
    }

    let mut drain = stack.into_iter();
    match (drain.next(), drain.next()) {
        (Some(Entry::Parsed(sentence)), None) => Ok(sentence),
        (None, _) => Err(SyntaxError::new("formula is empty")),
        _ => Err(SyntaxError::new("formula does not reduce to one sentence")),
    }
}

/// Open a file for reading.
/// # Panics
/// Panics on error.
pub fn open_file(filename: &str) -> File {
    File::open(filename).unwrap_or_else(|err| die!("cannot open file: {}", err))
}

/// Open a file for writing.
/// # Panics
/// Panics on error.
pub fn open_file_for_writing(filename: &str) -> BufWriter<File> {
    BufWriter::new(
        File::create(filename).unwrap_or_else(|err| die!("cannot open file for writing: {}", err)),
    )
}

/// File extension of Zstandard archives.
const ZSTD: &str = ".zst";
/// File extension of Gzip archives.
const GZIP: &str = ".gz";
/// File extension of Bzip2 archives.
const BZIP2: &str = ".bz2";
/// File extension of XZ archives.
const XZ: &str = ".xz";
/// File extension of LZ4 archives.
const LZ4: &str = ".lz4";

/// Strip the compression format off a filename.
///
/// If the filename ends with a known archive extension,
/// return the filename without extension and the extension.
/// Otherwise return the unmodified filename and the empty string.
fn compression_format_by_extension(filename: &str) -> (&str, &str) {
    let mut basename = filename;
    let mut compression_format = "";
    for extension in &[ZSTD, GZIP, BZIP2, LZ4, XZ] {
        if filename.ends_with(extension) {
            compression_format = extension;
            basename = &filename[0..filename.len() - extension.len()];
            break;
        }
    }
    (basename, compression_format)
}

/// Return an [Input](../input/struct.Input.html) that yields the lines of a
/// possibly compressed file.
///
/// If the filename is "-", the lines are read from stdin instead.
pub fn read_compressed_file_or_stdin<'a>(filename: &'a str, stdin: StdinLock<'a>) -> Input<'a> {
    match filename {
        "-" => Input::new(Box::new(stdin.bytes().map(panic_on_error))),
        filename => read_compressed_file(filename),
    }
}

/// Return an [Input](../input/struct.Input.html) that yields the lines of a
/// possibly compressed file.
pub fn read_compressed_file(filename: &str) -> Input {
    let file = open_file(filename);
    Input::new(read_from_compressed_file(file, filename))
}

/// Return an iterator over the bytes of a possibly compressed file.
///
/// If the file is compressed it is transparently uncompressed.
fn read_from_compressed_file(file: File, filename: &str) -> Box<dyn Iterator<Item = u8>> {
    let (_basename, compression_format) = compression_format_by_extension(filename);
    if compression_format == "" {
        return Box::new(BufReader::new(file).bytes().map(panic_on_error));
    }
    match compression_format {
        ZSTD => {
            let de = zstd::stream::read::Decoder::new(file)
                .unwrap_or_else(|err| die!("failed to decompress ZST archive: {}", err));
            Box::new(de.bytes().map(panic_on_error))
        }
        GZIP => {
            let de = flate2::read::GzDecoder::new(file);
            Box::new(de.bytes().map(panic_on_error))
        }
        BZIP2 => {
            let de = bzip2::read::BzDecoder::new(file);
            Box::new(de.bytes().map(panic_on_error))
        }
        XZ => {
            let de = xz2::read::XzDecoder::new(file);
            Box::new(de.bytes().map(panic_on_error))
        }
        LZ4 => {
            let de = lz4::Decoder::new(file)
                .unwrap_or_else(|err| die!("failed to decode LZ4 archive: {}", err));
            Box::new(de.bytes().map(panic_on_error))
        }
        _ => unreachable!(),
    }
}

/// Unwraps a result, panicking on error.
pub fn panic_on_error<T>(result: std::io::Result<T>) -> T {
    result.unwrap_or_else(|error| die!("{}", error))
}
