//! CoNLL token record reader
//!
//! One token per line, tab separated, a blank line after each sentence. Only four of the ten
//! CoNLL columns matter here:
//!
//! ```text
//! 1	Dogs	_	_	_	_	2	nsubj
//! ^ position                    ^ head ^ relation
//!   ^ surface form
//! ```
//!
//! The columns in between are placeholders and are never looked at, and anything after the
//! relation is ignored. Token records are read strictly: a line that doesn't parse stops the
//! whole run, because a wrong position or head would silently corrupt every context in the
//! sentence.
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Lines};
use std::path::{Path, PathBuf};
use std::str;

use nom::bytes::complete::take_till;
use nom::character::complete::{char, digit1};
use nom::combinator::map_res;
use nom::multi::count;
use nom::sequence::{terminated, tuple};
use nom::IResult;

use crate::counts::Counts;
use crate::errors::*;

/// One line of a CoNLL file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// 1-based index within the sentence
    pub position: usize,
    pub surface_form: String,
    /// Position of the governing token, 0 for the sentence root
    pub head: usize,
    pub relation: String,
}

impl Token {
    pub fn new(position: usize, surface_form: &str, head: usize, relation: &str) -> Self {
        Token {
            position,
            surface_form: surface_form.to_owned(),
            head,
            relation: relation.to_owned(),
        }
    }

    /// Surface form as it is used for counting and for pairs
    pub fn word(&self) -> String {
        self.surface_form.to_lowercase()
    }
}

/// The tokens between two blank lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// 1-based index of the sentence within its file
    pub number: usize,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Look up a token by its 1-based position
    pub fn at(&self, position: usize) -> Option<&Token> {
        if position == 0 { None } else { self.tokens.get(position - 1) }
    }

    pub fn iter(&self) -> ::std::slice::Iter<Token> {
        self.tokens.iter()
    }
}

fn field(input: &str) -> IResult<&str, &str> {
    take_till(|c| c == '\t')(input)
}

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

/// position TAB form TAB _ TAB _ TAB _ TAB _ TAB head TAB relation [TAB ...]
fn token_record(input: &str) -> IResult<&str, Token> {
    let (rest, (position, surface_form, _, head, relation)) = tuple((
        terminated(index, char('\t')),
        terminated(field, char('\t')),
        count(terminated(field, char('\t')), 4),
        terminated(index, char('\t')),
        field,
    ))(input)?;
    Ok((rest, Token::new(position, surface_form, head, relation.trim())))
}

/// Parse a single token line, numbering errors with `line_number`
pub fn parse_token(line: &str, line_number: usize) -> Result<Token> {
    match token_record(line) {
        Ok((_rest, token)) => {
            if token.position == 0 {
                Err(Error::MalformedRecord {
                    line: line_number,
                    reason: "token positions start at 1".to_string(),
                })
            } else if token.surface_form.is_empty() || token.relation.is_empty() {
                Err(Error::MalformedRecord {
                    line: line_number,
                    reason: format!("empty form or relation in {:?}", line),
                })
            } else {
                Ok(token)
            }
        }
        Err(_) => Err(Error::MalformedRecord {
            line: line_number,
            reason: format!(
                "expected `position<TAB>form<TAB>_<TAB>_<TAB>_<TAB>_<TAB>head<TAB>relation`, \
                found {:?} ({} fields)",
                line,
                line.split('\t').count()
            ),
        }),
    }
}

/// Stream sentences out of anything line oriented
///
/// After the first error the reader is exhausted.
pub struct SentenceReader<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
    sentences: usize,
    done: bool,
}

impl<R: BufRead> SentenceReader<R> {
    pub fn new(reader: R) -> Self {
        SentenceReader {
            lines: reader.lines(),
            line_number: 0,
            sentences: 0,
            done: false,
        }
    }

    fn flush(&mut self, tokens: Vec<Token>) -> Option<Result<Sentence>> {
        self.sentences += 1;
        if self.sentences % 100_000 == 0 {
            debug!("Read {} sentences ({} lines)", self.sentences, self.line_number);
        }
        Some(Ok(Sentence { number: self.sentences, tokens }))
    }
}

impl<R: BufRead> Iterator for SentenceReader<R> {
    type Item = Result<Sentence>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut tokens = vec![];
        loop {
            match self.lines.next() {
                None => {
                    self.done = true;
                    return if tokens.is_empty() { None } else { self.flush(tokens) };
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
                Some(Ok(line)) => {
                    self.line_number += 1;
                    if line.trim().is_empty() {
                        // Consecutive blank lines don't make empty sentences
                        if !tokens.is_empty() {
                            return self.flush(tokens);
                        }
                    } else {
                        match parse_token(line.trim_end_matches('\r'), self.line_number) {
                            Ok(token) => tokens.push(token),
                            Err(err) => {
                                self.done = true;
                                return Some(Err(err));
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Read every sentence out of an in-memory document
pub fn parse_str(content: &str) -> Result<Vec<Sentence>> {
    SentenceReader::new(Cursor::new(content)).collect()
}

/// A CoNLL file on disk, which can be read as many times as needed
#[derive(Debug, Clone)]
pub struct ConllFile {
    path: PathBuf,
}

impl ConllFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConllFile { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh pass over the file
    pub fn sentences(&self) -> Result<SentenceReader<BufReader<File>>> {
        let file = open_existing(&self.path, "parsed CoNLL input")?;
        Ok(SentenceReader::new(BufReader::new(file)))
    }
}

/// Count the lowercased surface form of every token in the corpus
pub fn word_frequencies<I>(sentences: I) -> Result<Counts>
    where I: IntoIterator<Item = Result<Sentence>> {
    let mut frequencies = Counts::new();
    for sentence in sentences {
        for token in sentence?.iter() {
            frequencies.add(&token.word());
        }
    }
    Ok(frequencies)
}
