//! Word vectors as written by the trainer
//!
//! One term per line followed by its components, separated by spaces. word2vec style files start
//! with a `count dimensions` line, which is recognized and skipped.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::prelude::*;

use crate::counts::FarmMap;
use crate::errors::*;
use crate::numpy;

pub struct Embeddings {
    words: Vec<String>,
    vectors: Array2<f64>,
    index: FarmMap<String, usize>,
}

impl Embeddings {
    pub fn new(words: Vec<String>, vectors: Array2<f64>) -> Result<Embeddings> {
        if words.len() != vectors.nrows() {
            return Err(Error::Other(format!(
                "{} words but {} vectors", words.len(), vectors.nrows())));
        }
        let index = words.iter().enumerate().map(|(i, w)| (w.clone(), i)).collect();
        Ok(Embeddings { words, vectors, index })
    }

    pub fn read<R: BufRead>(reader: R) -> Result<Embeddings> {
        let mut words = vec![];
        let mut values = vec![];
        let mut dims = None;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let term = match fields.next() {
                Some(term) => term.to_owned(),
                None => continue,
            };
            let components = fields.map(str::parse::<f64>).collect::<::std::result::Result<Vec<f64>, _>>();
            if i == 0 && is_header(&term, &components) {
                continue;
            }
            let components = components.map_err(|err| Error::MalformedRecord {
                line: i + 1,
                reason: format!("bad vector component for {:?}: {}", term, err),
            })?;
            match dims {
                None => dims = Some(components.len()),
                Some(d) if d != components.len() => {
                    return Err(Error::MalformedRecord {
                        line: i + 1,
                        reason: format!("{} has {} dimensions, expected {}",
                            term, components.len(), d),
                    });
                }
                _ => {}
            }
            words.push(term);
            values.extend(components);
        }
        let vectors = Array2::from_shape_vec((words.len(), dims.unwrap_or(0)), values)?;
        info!("Loaded {} vectors of {} dimensions", vectors.nrows(), vectors.ncols());
        Embeddings::new(words, vectors)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Embeddings> {
        Embeddings::read(BufReader::new(open_existing(path, "word vector file")?))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn vectors(&self) -> &Array2<f64> {
        &self.vectors
    }

    pub fn vector(&self, word: &str) -> Option<ArrayView1<f64>> {
        self.index.get(word).map(|&i| self.vectors.row(i))
    }

    /// Scale every vector to unit length, so a dot product is the cosine similarity.
    /// Zero vectors stay zero.
    pub fn normalize(&mut self) {
        for mut row in self.vectors.outer_iter_mut() {
            let norm = row.dot(&row).sqrt();
            if norm != 0.0 { row.mapv_inplace(|x| x / norm); }
        }
    }

    /// The `k` words most similar to `word` by cosine, best first, leaving out `word` itself
    pub fn nearest(&self, word: &str, k: usize) -> Option<Vec<(&str, f64)>> {
        let &target = self.index.get(word)?;
        let query = self.vectors.row(target);
        let query_norm = query.dot(&query).sqrt();
        let mut scored: Vec<(usize, f64)> = self.vectors.outer_iter()
            .enumerate()
            .filter(|&(i, _)| i != target)
            .map(|(i, row)| {
                let denom = query_norm * row.dot(&row).sqrt();
                (i, if denom == 0.0 { 0.0 } else { query.dot(&row) / denom })
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(::std::cmp::Ordering::Equal));
        Some(scored.into_iter()
            .take(k)
            .map(|(i, score)| (self.words[i].as_str(), score))
            .collect())
    }

    /// Save the matrix as .npy and the words, one per line in row order, next to it
    pub fn save_numpy<P: AsRef<Path>, Q: AsRef<Path>>(&self, matrix: P, wordlist: Q) -> Result<()> {
        numpy::write_matrix(matrix, &self.vectors)?;
        let mut out = BufWriter::new(File::create(wordlist)?);
        for word in &self.words {
            writeln!(out, "{}", word)?;
        }
        out.flush()?;
        Ok(())
    }
}

fn is_header<E>(term: &str, components: &::std::result::Result<Vec<f64>, E>) -> bool {
    match *components {
        Ok(ref values) => values.len() == 1 && term.parse::<usize>().is_ok() && values[0].fract() == 0.0,
        Err(_) => false,
    }
}
