//! Look at trained vectors
//!
//! Loads word2vecf's text output, then optionally saves it as a numpy matrix plus a word list
//! (one word per line, row order) and prints the nearest neighbours of some words.

// argument parsing
#[macro_use] extern crate clap;
// logging
#[macro_use] extern crate log;
extern crate env_logger;
// lastly, this library
extern crate depcontexts;

use clap::Arg;

use depcontexts::errors::*;
use depcontexts::vectors::Embeddings;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}
pub fn inner_main() -> Result<()> {
    env_logger::init();
    let args = app_from_crate!()
        .arg_from_usage("<vectors> 'embeddings written by word2vecf'")
        .arg_from_usage("--numpy [FILE] 'save the matrix as a .npy file'")
        .arg_from_usage("--wordlist [FILE] 'save the words, one per line, in matrix row order'")
        .arg(Arg::from_usage("-n, --nearest [WORD]... 'print the words closest to these'")
            .number_of_values(1))
        .arg(Arg::from_usage("-k, --top [K] 'how many neighbours to print'").default_value("10"))
        .get_matches();
    let top = value_t!(args, "top", usize).unwrap_or_else(|e| e.exit());

    let mut embeddings = Embeddings::load(args.value_of("vectors").unwrap_or_default())?;

    match (args.value_of("numpy"), args.value_of("wordlist")) {
        (Some(matrix), Some(wordlist)) => {
            embeddings.save_numpy(matrix, wordlist)?;
            info!("Saved {} rows to {} and {}", embeddings.words().len(), matrix, wordlist);
        }
        (None, None) => {}
        _ => return Err(Error::Config("--numpy and --wordlist go together".into())),
    }

    embeddings.normalize();
    for word in args.values_of("nearest").into_iter().flatten() {
        match embeddings.nearest(word, top) {
            Some(neighbours) => {
                println!("{}", word);
                for (other, score) in neighbours {
                    println!("\t{}\t{:.4}", other, score);
                }
            }
            None => warn!("{} is not in the vocabulary", word),
        }
    }
    Ok(())
}
