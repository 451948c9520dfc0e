//! Hand the pairs and vocabularies to `word2vecf`
//!
//! The trainer itself is an external program; this only assembles its command line, makes sure
//! its inputs are in place and turns a failed run into an error.
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::errors::*;

/// Trainer settings, with the defaults the scripts always used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Path of the word2vecf executable
    pub binary: PathBuf,
    /// Embedding dimensions
    pub size: usize,
    /// Negative samples per pair
    pub negative: usize,
    pub threads: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            binary: PathBuf::from("./word2vecf"),
            size: 200,
            negative: 15,
            threads: 4,
        }
    }
}

/// The files one training run reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingFiles {
    pub pairs: PathBuf,
    pub word_vocab: PathBuf,
    pub context_vocab: PathBuf,
    pub output: PathBuf,
}

impl TrainerConfig {
    /// `word2vecf -train .. -wvocab .. -cvocab .. -output .. -size .. -negative .. -threads ..`
    pub fn command(&self, files: &TrainingFiles) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("-train").arg(&files.pairs)
            .arg("-wvocab").arg(&files.word_vocab)
            .arg("-cvocab").arg(&files.context_vocab)
            .arg("-output").arg(&files.output)
            .arg("-size").arg(self.size.to_string())
            .arg("-negative").arg(self.negative.to_string())
            .arg("-threads").arg(self.threads.to_string());
        command
    }

    /// Run the trainer to completion
    pub fn train(&self, files: &TrainingFiles) -> Result<()> {
        require(&files.pairs, "training pair file")?;
        require(&files.word_vocab, "word vocabulary")?;
        require(&files.context_vocab, "context vocabulary")?;

        let mut command = self.command(files);
        info!("Running command to train word embeddings: {:?}", command);
        let status = command.status().map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::MissingFile("word2vecf executable", Some(err)),
            _ => Error::IOError(err),
        })?;
        if !status.success() {
            return Err(Error::Trainer(format!("{} exited with {}", self.binary.display(), status)));
        }
        info!("Training complete. Word embeddings saved to '{}'", files.output.display());
        Ok(())
    }
}

fn require(path: &Path, what: &'static str) -> Result<()> {
    open_existing(path, what).map(|_| ())
}
