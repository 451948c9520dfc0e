//! Stage 1: dependency contexts
//!
//! Reads a parsed CoNLL file twice, once to count words and once to write a
//! `word<TAB>headword-relation` line for every token that depends on another word.

// argument parsing
#[macro_use] extern crate clap;
// logging
#[macro_use] extern crate log;
extern crate env_logger;
// lastly, this library
extern crate depcontexts;

use clap::Arg;

use depcontexts::conll::ConllFile;
use depcontexts::contexts::extract_file;
use depcontexts::errors::*;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}
pub fn inner_main() -> Result<()> {
    env_logger::init();
    let args = app_from_crate!()
        .arg(Arg::from_usage("[input] 'the parsed CoNLL file'")
            .default_value("parsed.conll"))
        .arg(Arg::from_usage("[output] 'where to write the word-context pairs'")
            .default_value("dep.contexts"))
        .arg(Arg::from_usage("-f, --min-word-freq [N] 'only emit words seen at least N times'")
            .default_value("0"))
        .get_matches();
    let min_word_freq = value_t!(args, "min-word-freq", u64).unwrap_or_else(|e| e.exit());
    let input = args.value_of("input").unwrap_or("parsed.conll");
    let output = args.value_of("output").unwrap_or("dep.contexts");

    let stats = extract_file(&ConllFile::new(input), output, min_word_freq)?;
    debug!("{:?}", stats);
    Ok(())
}
