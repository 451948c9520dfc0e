//! JSON description of pipeline runs
//!
//! ```json
//! { "jobs": [ { "input": "parsed.conll", "output_dir": "out", "min_count": 5,
//!               "trees": "dependency_trees.json", "trainer": { "size": 300 } } ] }
//! ```
//!
//! Everything but `input` and `output_dir` can be left out.
use std::collections::HashSet;
use std::env;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::trainer::TrainerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub jobs: Vec<JobConfig>,
}

/// One corpus and everything made from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Parsed CoNLL input
    pub input: PathBuf,
    /// Directory for every file this job writes
    pub output_dir: PathBuf,
    #[serde(default)]
    pub min_word_freq: u64,
    #[serde(default = "default_min_count")]
    pub min_count: u64,
    #[serde(default = "default_pairs")]
    pub pairs: String,
    #[serde(default = "default_word_vocab")]
    pub word_vocab: String,
    #[serde(default = "default_context_vocab")]
    pub context_vocab: String,
    /// Also export the dependency trees to this file
    #[serde(default)]
    pub trees: Option<String>,
    /// Also train embeddings
    #[serde(default)]
    pub trainer: Option<TrainerConfig>,
    #[serde(default = "default_embeddings")]
    pub embeddings: String,
}

fn default_min_count() -> u64 { 5 }
fn default_pairs() -> String { "dep.contexts".to_string() }
fn default_word_vocab() -> String { "wv".to_string() }
fn default_context_vocab() -> String { "cv".to_string() }
fn default_embeddings() -> String { "word_embeddings.txt".to_string() }

impl JobConfig {
    /// A job with every optional setting at its default
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output_dir: Q) -> Self {
        JobConfig {
            input: input.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            min_word_freq: 0,
            min_count: default_min_count(),
            pairs: default_pairs(),
            word_vocab: default_word_vocab(),
            context_vocab: default_context_vocab(),
            trees: None,
            trainer: None,
            embeddings: default_embeddings(),
        }
    }

    pub fn pairs_path(&self) -> PathBuf { self.output_dir.join(&self.pairs) }
    pub fn word_vocab_path(&self) -> PathBuf { self.output_dir.join(&self.word_vocab) }
    pub fn context_vocab_path(&self) -> PathBuf { self.output_dir.join(&self.context_vocab) }
    pub fn embeddings_path(&self) -> PathBuf { self.output_dir.join(&self.embeddings) }
    pub fn trees_path(&self) -> Option<PathBuf> {
        self.trees.as_ref().map(|name| self.output_dir.join(with_json_suffix(name)))
    }
}

/// Tree exports always end in `.json`
pub fn with_json_suffix(name: &str) -> String {
    if name.ends_with(".json") { name.to_string() } else { format!("{}.json", name) }
}

impl PipelineConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
        let file = open_existing(path, "pipeline configuration")?;
        let config: PipelineConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Jobs must exist and must not write into each other's directories
    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            return Err(Error::Config("no jobs configured".to_string()));
        }
        let mut dirs = HashSet::new();
        for job in &self.jobs {
            if job.input.as_os_str().is_empty() {
                return Err(Error::Config("a job has an empty input path".to_string()));
            }
            if !dirs.insert(normalized(&job.output_dir)?) {
                return Err(Error::Config(format!(
                    "more than one job writes to {}", job.output_dir.display())));
            }
        }
        Ok(())
    }
}

/// Absolute, with `.` and `..` resolved on paper, so `out`, `./out` and `x/../out` compare equal.
/// The directories usually don't exist yet, so this can't ask the filesystem.
fn normalized(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() { path.to_path_buf() } else { env::current_dir()?.join(path) };
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => { out.pop(); }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_missing_fields() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"jobs": [{"input": "parsed.conll", "output_dir": "out"}]}"#).unwrap();
        assert_eq!(config.jobs[0], JobConfig::new("parsed.conll", "out"));
        assert_eq!(config.jobs[0].pairs_path(), Path::new("out").join("dep.contexts"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn trainer_section_takes_partial_settings() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"jobs": [{"input": "a", "output_dir": "b", "trees": "trees",
                          "trainer": {"size": 300}}]}"#).unwrap();
        let trainer = config.jobs[0].trainer.clone().unwrap();
        assert_eq!(trainer.size, 300);
        assert_eq!(trainer.negative, 15);
        assert_eq!(config.jobs[0].trees_path(), Some(Path::new("b").join("trees.json")));
    }

    #[test]
    fn shared_output_dirs_are_rejected() {
        let config = PipelineConfig {
            jobs: vec![JobConfig::new("a.conll", "out"), JobConfig::new("b.conll", "out")],
        };
        match config.validate() {
            Err(Error::Config(_)) => {}
            other => panic!("expected a config error, got {:?}", other),
        }
        assert!(PipelineConfig { jobs: vec![] }.validate().is_err());
    }

    #[test]
    fn spellings_of_the_same_dir_are_rejected() {
        for other in &["./out", "out/", "x/../out", "./x/./../out"] {
            let config = PipelineConfig {
                jobs: vec![JobConfig::new("a.conll", "out"), JobConfig::new("b.conll", other)],
            };
            assert!(config.validate().is_err(), "{} should clash with out", other);
        }
        let config = PipelineConfig {
            jobs: vec![JobConfig::new("a.conll", "out"), JobConfig::new("b.conll", "x/out")],
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_suffix_is_added_once() {
        assert_eq!(with_json_suffix("trees"), "trees.json");
        assert_eq!(with_json_suffix("trees.json"), "trees.json");
    }
}
