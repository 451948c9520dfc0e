//! Stage 3: train dependency-based embeddings with word2vecf
//!
//! Only runs the external trainer. The pair file and both vocabularies have to exist already.

// argument parsing
#[macro_use] extern crate clap;
// logging
extern crate env_logger;
// lastly, this library
extern crate depcontexts;

use clap::Arg;

use depcontexts::errors::*;
use depcontexts::trainer::{TrainerConfig, TrainingFiles};

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}
pub fn inner_main() -> Result<()> {
    env_logger::init();
    let defaults = TrainerConfig::default();
    let args = app_from_crate!()
        .arg_from_usage("<train> 'word-context pairs'")
        .arg_from_usage("<word-vocab> 'word vocabulary'")
        .arg_from_usage("<context-vocab> 'context vocabulary'")
        .arg(Arg::from_usage("[output] 'where word2vecf should write the embeddings'")
            .default_value("word_embeddings.txt"))
        .arg(Arg::from_usage("--word2vecf [PATH] 'the word2vecf executable'")
            .default_value("./word2vecf"))
        .arg(Arg::from_usage("--size [N] 'embedding size'").default_value("200"))
        .arg(Arg::from_usage("--negative [N] 'negative samples'").default_value("15"))
        .arg(Arg::from_usage("--threads [N] 'trainer threads'").default_value("4"))
        .get_matches();

    let config = TrainerConfig {
        binary: args.value_of("word2vecf").map(Into::into).unwrap_or(defaults.binary),
        size: value_t!(args, "size", usize).unwrap_or_else(|e| e.exit()),
        negative: value_t!(args, "negative", usize).unwrap_or_else(|e| e.exit()),
        threads: value_t!(args, "threads", usize).unwrap_or_else(|e| e.exit()),
    };
    let files = TrainingFiles {
        pairs: args.value_of("train").unwrap_or_default().into(),
        word_vocab: args.value_of("word-vocab").unwrap_or_default().into(),
        context_vocab: args.value_of("context-vocab").unwrap_or_default().into(),
        output: args.value_of("output").unwrap_or("word_embeddings.txt").into(),
    };
    config.train(&files)
}
