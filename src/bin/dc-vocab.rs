//! Stage 2: vocabularies
//!
//! Counts both columns of a pair file and keeps the words and contexts that occur often enough,
//! one `term<TAB>count` per line.

// argument parsing
#[macro_use] extern crate clap;
// logging
extern crate env_logger;
// lastly, this library
extern crate depcontexts;

use clap::Arg;

use depcontexts::errors::*;
use depcontexts::vocab::build_vocab_files;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}
pub fn inner_main() -> Result<()> {
    env_logger::init();
    let args = app_from_crate!()
        .arg(Arg::from_usage("[pairs] 'word-context pairs, as written by dc-extract'")
            .default_value("dep.contexts"))
        .arg(Arg::from_usage("[word-vocab] 'where to write the word vocabulary'")
            .default_value("wv"))
        .arg(Arg::from_usage("[context-vocab] 'where to write the context vocabulary'")
            .default_value("cv"))
        .arg(Arg::from_usage("-m, --min-count [N] 'minimum frequency for words and contexts'")
            .default_value("5"))
        .get_matches();
    let min_count = value_t!(args, "min-count", u64).unwrap_or_else(|e| e.exit());

    build_vocab_files(
        args.value_of("pairs").unwrap_or("dep.contexts"),
        args.value_of("word-vocab").unwrap_or("wv"),
        args.value_of("context-vocab").unwrap_or("cv"),
        min_count,
    )?;
    Ok(())
}
