//! Dependency contexts
//!
//! Every token that hangs off another word (not the root, not punctuation) becomes a
//! `(word, headword-relation)` pair. Which words are frequent enough is a property of the whole
//! corpus, so extraction is two separate passes: `word_frequencies` over everything first, then
//! `extract_contexts` sentence by sentence.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::conll::{word_frequencies, ConllFile, Sentence};
use crate::counts::Counts;
use crate::errors::*;

/// Relation label of punctuation, compared case-insensitively
pub const PUNCT: &str = "punct";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextPair {
    pub word: String,
    pub context: String,
}

impl ContextPair {
    /// The pair file line, without the newline
    pub fn line(&self) -> String {
        format!("{}\t{}", self.word, self.context)
    }
}

/// Pairs for one sentence
///
/// Unlike tree building, a head outside the sentence is an error here: looking it up anyway
/// would put the wrong head word into the context.
pub fn extract_contexts(sentence: &Sentence, word_frequency: &Counts, min_word_freq: u64)
    -> Result<Vec<ContextPair>> {
    let mut pairs = vec![];
    for token in sentence.iter() {
        if token.relation.trim().to_lowercase() == PUNCT || token.head == 0 {
            continue;
        }
        let head = sentence.at(token.head).ok_or_else(|| Error::OutOfRangeHead {
            sentence: sentence.number,
            position: token.position,
            head: token.head,
            len: sentence.len(),
        })?;
        let word = token.word();
        if word_frequency.get(&word) >= min_word_freq {
            pairs.push(ContextPair {
                context: format!("{}-{}", head.word(), token.relation),
                word,
            });
        }
    }
    Ok(pairs)
}

/// Totals from one extraction run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractStats {
    pub sentences: usize,
    pub pairs: usize,
}

/// Run both passes over a CoNLL file and write one `word<TAB>context` line per pair
pub fn extract_file<P: AsRef<Path>>(conll: &ConllFile, output: P, min_word_freq: u64)
    -> Result<ExtractStats> {
    info!("Counting word frequencies...");
    let frequencies = word_frequencies(conll.sentences()?)?;
    info!("Counted {} distinct words", frequencies.len());

    info!("Extracting dependencies...");
    let mut out = BufWriter::new(File::create(output.as_ref())?);
    let written = write_contexts(conll, &frequencies, min_word_freq, &mut out)
        .and_then(|stats| out.flush().map(|_| stats).map_err(Error::from));
    let stats = match written {
        Ok(stats) => stats,
        Err(err) => {
            // A half written pair file would look like a finished one
            drop(out);
            if let Err(rm) = fs::remove_file(output.as_ref()) {
                warn!("Could not remove partial output {}: {}", output.as_ref().display(), rm);
            }
            return Err(err);
        }
    };
    info!("Dependencies extracted and saved to '{}' ({} pairs from {} sentences)",
        output.as_ref().display(), stats.pairs, stats.sentences);
    Ok(stats)
}

/// Second pass only, for callers that already have the frequencies
pub fn write_contexts<W: Write>(conll: &ConllFile, frequencies: &Counts, min_word_freq: u64,
    out: &mut W) -> Result<ExtractStats> {
    let mut stats = ExtractStats::default();
    for sentence in conll.sentences()? {
        let sentence = sentence?;
        for pair in extract_contexts(&sentence, frequencies, min_word_freq)? {
            writeln!(out, "{}", pair.line())?;
            stats.pairs += 1;
        }
        stats.sentences += 1;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conll::{parse_str, Token};

    fn dogs() -> Sentence {
        Sentence {
            number: 1,
            tokens: vec![
                Token::new(1, "Dogs", 2, "nsubj"),
                Token::new(2, "bark", 0, "root"),
                Token::new(3, "loudly", 2, "advmod"),
            ],
        }
    }

    fn frequencies_of(sentences: &[Sentence]) -> Counts {
        let mut counts = Counts::new();
        for sentence in sentences {
            for token in sentence.iter() {
                counts.add(&token.word());
            }
        }
        counts
    }

    #[test]
    fn dogs_bark_loudly() {
        let sentence = dogs();
        let pairs = extract_contexts(&sentence, &frequencies_of(&[sentence.clone()]), 0).unwrap();
        let lines: Vec<String> = pairs.iter().map(ContextPair::line).collect();
        assert_eq!(lines, vec!["dogs\tbark-nsubj", "loudly\tbark-advmod"]);
    }

    #[test]
    fn punctuation_is_skipped_in_any_case() {
        let sentence = Sentence {
            number: 1,
            tokens: vec![
                Token::new(1, "Go", 0, "root"),
                Token::new(2, "!", 1, "PUNCT"),
                Token::new(3, ".", 1, "punct"),
                Token::new(4, "now", 1, "advmod"),
            ],
        };
        let pairs = extract_contexts(&sentence, &frequencies_of(&[sentence.clone()]), 0).unwrap();
        assert_eq!(pairs, vec![ContextPair { word: "now".into(), context: "go-advmod".into() }]);
    }

    #[test]
    fn relation_keeps_its_case() {
        let sentence = parse_str("1\tX\t_\t_\t_\t_\t0\tROOT\n2\tY\t_\t_\t_\t_\t1\tNSUBJ\n").unwrap();
        let pairs = extract_contexts(&sentence[0], &Counts::new(), 0).unwrap();
        assert_eq!(pairs[0].line(), "y\tx-NSUBJ");
    }

    #[test]
    fn rare_words_are_dropped_but_still_serve_as_heads() {
        let sentence = dogs();
        let mut frequencies = frequencies_of(&[sentence.clone()]);
        frequencies.add("dogs");
        let pairs = extract_contexts(&sentence, &frequencies, 2).unwrap();
        assert_eq!(pairs, vec![ContextPair { word: "dogs".into(), context: "bark-nsubj".into() }]);
    }

    #[test]
    fn head_outside_the_sentence_is_an_error() {
        let sentence = Sentence {
            number: 4,
            tokens: vec![Token::new(1, "a", 0, "root"), Token::new(2, "b", 3, "dep")],
        };
        match extract_contexts(&sentence, &Counts::new(), 0) {
            Err(Error::OutOfRangeHead { sentence, position, head, len }) => {
                assert_eq!((sentence, position, head, len), (4, 2, 3, 2));
            }
            other => panic!("expected an out of range head, got {:?}", other),
        }
    }

    #[test]
    fn one_pair_per_eligible_token() {
        let sentences = parse_str(
            "1\tAustralian\t_\t_\t_\t_\t2\tamod\n\
             2\tscientist\t_\t_\t_\t_\t3\tnsubj\n\
             3\tdiscovers\t_\t_\t_\t_\t0\tROOT\n\
             4\tstar\t_\t_\t_\t_\t3\tdobj\n\
             5\twith\t_\t_\t_\t_\t3\tprep\n\
             6\ttelescope\t_\t_\t_\t_\t5\tpobj\n\
             7\t.\t_\t_\t_\t_\t3\tpunct\n",
        ).unwrap();
        let frequencies = frequencies_of(&sentences);
        let pairs = extract_contexts(&sentences[0], &frequencies, 1).unwrap();
        let eligible = sentences[0].iter()
            .filter(|t| t.head > 0 && t.relation.to_lowercase() != PUNCT)
            .count();
        assert_eq!(pairs.len(), eligible);
        assert_eq!(pairs[0].line(), "australian\tscientist-amod");
        assert_eq!(pairs[4].line(), "telescope\twith-pobj");
    }
}
