//! Word and context vocabularies from a pair file
//!
//! Pair lines are read leniently: anything that isn't exactly `word<TAB>context` is logged and
//! skipped, since the pair file may come from elsewhere and one bad line shouldn't cost the run.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::counts::Counts;
use crate::errors::*;

/// Terms that survived the threshold, with their counts, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vocabulary {
    pub entries: Vec<(String, u64)>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, term: &str) -> Option<u64> {
        self.entries.iter().find(|&&(ref t, _)| t == term).map(|&(_, count)| count)
    }

    /// Write `term<TAB>count` lines
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        for &(ref term, count) in &self.entries {
            writeln!(out, "{}\t{}", term, count)?;
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Read a vocabulary file back; unlike pair files, a bad line here is an error
    pub fn load<P: AsRef<Path>>(path: P, what: &'static str) -> Result<Vocabulary> {
        let reader = BufReader::new(open_existing(path, what)?);
        let mut entries = vec![];
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut parts = line.trim_end().split('\t');
            let parsed = match (parts.next(), parts.next(), parts.next()) {
                (Some(term), Some(count), None) => count.parse::<u64>().ok().map(|c| (term, c)),
                _ => None,
            };
            match parsed {
                Some((term, count)) => entries.push((term.to_owned(), count)),
                None => {
                    return Err(Error::MalformedRecord {
                        line: i + 1,
                        reason: format!("expected `term<TAB>count`, found {:?}", line),
                    })
                }
            }
        }
        Ok(Vocabulary { entries })
    }
}

/// Raw counts of both halves of every pair
#[derive(Debug, Clone, Default)]
pub struct PairCounts {
    pub words: Counts,
    pub contexts: Counts,
    /// Lines that were not a pair
    pub skipped: usize,
}

impl PairCounts {
    pub fn new() -> Self {
        PairCounts::default()
    }

    /// Count one line of a pair file, skipping (and logging) it if it isn't a pair
    pub fn add_line(&mut self, line: &str, line_number: usize) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() == 2 {
            self.words.add(parts[0]);
            self.contexts.add(parts[1]);
        } else {
            warn!("Skipping malformed line {}: {}", line_number, line);
            self.skipped += 1;
        }
    }

    /// Keep the words and contexts seen at least `min_count` times
    pub fn filter(&self, min_count: u64) -> (Vocabulary, Vocabulary) {
        (
            Vocabulary { entries: self.words.retain_at_least(min_count) },
            Vocabulary { entries: self.contexts.retain_at_least(min_count) },
        )
    }
}

/// Count a stream of pair lines
pub fn count_pairs<R: BufRead>(reader: R) -> Result<PairCounts> {
    let mut counts = PairCounts::new();
    for (i, line) in reader.lines().enumerate() {
        counts.add_line(&line?, i + 1);
    }
    Ok(counts)
}

/// Word and context vocabularies of a stream of pair lines
pub fn build_vocabulary<R: BufRead>(reader: R, min_count: u64) -> Result<(Vocabulary, Vocabulary)> {
    Ok(count_pairs(reader)?.filter(min_count))
}

/// Read a pair file and save both vocabularies
pub fn build_vocab_files<P, Q, S>(pairs: P, word_vocab: Q, context_vocab: S, min_count: u64)
    -> Result<(Vocabulary, Vocabulary)>
    where P: AsRef<Path>, Q: AsRef<Path>, S: AsRef<Path> {
    info!("Counting words and contexts...");
    let reader = BufReader::new(open_existing(pairs, "word-context pair file")?);
    let counts = count_pairs(reader)?;
    if counts.skipped > 0 {
        warn!("Skipped {} malformed lines", counts.skipped);
    }
    let (words, contexts) = counts.filter(min_count);

    info!("Saving word vocabulary to '{}'...", word_vocab.as_ref().display());
    words.save(word_vocab)?;
    info!("Saving context vocabulary to '{}'...", context_vocab.as_ref().display());
    contexts.save(context_vocab)?;

    info!("Vocabularies built: {} of {} words and {} of {} contexts kept at min count {}",
        words.len(), counts.words.len(), contexts.len(), counts.contexts.len(), min_count);
    Ok((words, contexts))
}
