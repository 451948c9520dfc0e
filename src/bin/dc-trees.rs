//! Dependency trees as JSON
//!
//! `export` writes one nested `{name, children}` document per sentence; `show` reads such a file
//! back and prints each tree as an outline.

// argument parsing
#[macro_use] extern crate clap;
// logging
extern crate env_logger;
// lastly, this library
extern crate depcontexts;

use clap::{Arg, SubCommand};

use depcontexts::config::with_json_suffix;
use depcontexts::conll::ConllFile;
use depcontexts::errors::*;
use depcontexts::tree::{export_trees, read_trees, render};

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}
pub fn inner_main() -> Result<()> {
    env_logger::init();
    let args = app_from_crate!()
        .subcommand(SubCommand::with_name("export")
            .about("build a tree for every sentence and save them as JSON")
            .arg(Arg::from_usage("[input] 'the parsed CoNLL file'")
                .default_value("parsed.conll"))
            .arg(Arg::from_usage("[output] 'JSON file to write (.json is added if missing)'")
                .default_value("dependency_trees.json")))
        .subcommand(SubCommand::with_name("show")
            .about("print the trees in an exported JSON file")
            .arg(Arg::from_usage("[trees] 'JSON file written by export'")
                .default_value("dependency_trees.json")))
        .get_matches();

    match args.subcommand() {
        ("export", Some(sub)) => {
            let output = with_json_suffix(sub.value_of("output").unwrap_or("dependency_trees.json"));
            let conll = ConllFile::new(sub.value_of("input").unwrap_or("parsed.conll"));
            let count = export_trees(&conll, &output)?;
            println!("{} dependency trees saved to '{}'.", count, output);
        }
        ("show", Some(sub)) => {
            let path = with_json_suffix(sub.value_of("trees").unwrap_or("dependency_trees.json"));
            let trees = read_trees(&path)?;
            println!("Loaded {} trees from '{}'", trees.len(), path);
            for (i, tree) in trees.iter().enumerate() {
                println!("\nSentence {} Tree:", i + 1);
                print!("{}", render(tree));
            }
        }
        _ => {
            return Err(Error::Config("expected a subcommand: export or show (see --help)".into()));
        }
    }
    Ok(())
}
