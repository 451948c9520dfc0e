//! Every stage, for every job in a JSON config
//!
//! Jobs run in parallel, each one extract -> vocabularies -> (trees) -> (word2vecf).

// argument parsing
#[macro_use] extern crate clap;
// logging
#[macro_use] extern crate log;
extern crate env_logger;
// lastly, this library
extern crate depcontexts;

use depcontexts::config::PipelineConfig;
use depcontexts::errors::*;
use depcontexts::pipeline::run_all;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}
pub fn inner_main() -> Result<()> {
    env_logger::init();
    let args = app_from_crate!()
        .arg_from_usage("<config> 'JSON file listing the jobs to run'")
        .get_matches();

    let config = PipelineConfig::from_json_file(args.value_of("config").unwrap_or_default())?;
    info!("Running {} jobs", config.jobs.len());
    let reports = run_all(&config)?;
    for (job, report) in config.jobs.iter().zip(reports) {
        println!("{}: {} pairs from {} sentences, {} words, {} contexts{}{}",
            job.input.display(),
            report.extracted.pairs,
            report.extracted.sentences,
            report.words,
            report.contexts,
            report.trees.map(|n| format!(", {} trees", n)).unwrap_or_default(),
            if report.trained { ", trained" } else { "" });
    }
    Ok(())
}
