//! Every stage for one corpus, and many corpora at once
//!
//! Jobs share nothing but the thread pool: each one reads its own input and writes only into its
//! own output directory, so they can run side by side while each stays sequential inside.
use std::fs;

use rayon::prelude::*;

use crate::config::{JobConfig, PipelineConfig};
use crate::conll::ConllFile;
use crate::contexts::{extract_file, ExtractStats};
use crate::errors::*;
use crate::trainer::TrainingFiles;
use crate::tree::export_trees;

/// What one job produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub extracted: ExtractStats,
    pub words: usize,
    pub contexts: usize,
    pub trees: Option<usize>,
    pub trained: bool,
}

/// extract, count, then optionally export trees and train
pub fn run_job(job: &JobConfig) -> Result<JobReport> {
    info!("Starting job for {}", job.input.display());
    fs::create_dir_all(&job.output_dir)?;
    let conll = ConllFile::new(&job.input);

    let extracted = extract_file(&conll, job.pairs_path(), job.min_word_freq)?;
    let (words, contexts) = crate::vocab::build_vocab_files(
        job.pairs_path(), job.word_vocab_path(), job.context_vocab_path(), job.min_count)?;

    let trees = match job.trees_path() {
        Some(path) => Some(export_trees(&conll, path)?),
        None => None,
    };

    let trained = match job.trainer {
        Some(ref trainer) => {
            trainer.train(&TrainingFiles {
                pairs: job.pairs_path(),
                word_vocab: job.word_vocab_path(),
                context_vocab: job.context_vocab_path(),
                output: job.embeddings_path(),
            })?;
            true
        }
        None => false,
    };

    Ok(JobReport {
        extracted,
        words: words.len(),
        contexts: contexts.len(),
        trees,
        trained,
    })
}

/// Run all jobs in parallel; any failed job fails the whole batch
pub fn run_all(config: &PipelineConfig) -> Result<Vec<JobReport>> {
    config.validate()?;
    let results: Vec<Result<JobReport>> = config.jobs.par_iter().map(run_job).collect();

    let mut reports = vec![];
    let mut first_error = None;
    for (job, result) in config.jobs.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => {
                error!("Job for {} failed: {}", job.input.display(), err);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}
