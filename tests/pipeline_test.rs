use std::fs;
use std::path::Path;

use tempfile::TempDir;

use depcontexts::config::{JobConfig, PipelineConfig};
use depcontexts::conll::ConllFile;
use depcontexts::contexts::extract_file;
use depcontexts::errors::Error;
use depcontexts::pipeline::{run_all, run_job};
use depcontexts::tree::{read_trees, DependencyTree};
use depcontexts::vocab::{build_vocab_files, Vocabulary};

const CORPUS: &str = "\
1\tDogs\t_\tNOUN\t_\t_\t2\tnsubj
2\tbark\t_\tVERB\t_\t_\t0\tROOT
3\tloudly\t_\tADV\t_\t_\t2\tadvmod
4\t.\t_\tPUNCT\t_\t_\t2\tpunct

1\tThe\t_\tDET\t_\t_\t2\tdet
2\tdogs\t_\tNOUN\t_\t_\t3\tnsubj
3\tsleep\t_\tVERB\t_\t_\t0\tROOT

";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn extracts_pairs_in_corpus_order() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "parsed.conll", CORPUS);
    let output = dir.path().join("dep.contexts");
    let stats = extract_file(&ConllFile::new(&input), &output, 0).unwrap();
    assert_eq!(stats.sentences, 2);
    assert_eq!(stats.pairs, 4);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "dogs\tbark-nsubj\nloudly\tbark-advmod\nthe\tdogs-det\ndogs\tsleep-nsubj\n"
    );
}

#[test]
fn word_threshold_is_corpus_wide() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "parsed.conll", CORPUS);
    let output = dir.path().join("dep.contexts");
    // only "dogs" occurs twice, across two sentences
    extract_file(&ConllFile::new(&input), &output, 2).unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "dogs\tbark-nsubj\ndogs\tsleep-nsubj\n"
    );
}

#[test]
fn bad_head_fails_and_leaves_no_pair_file() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "parsed.conll",
        "1\ta\t_\t_\t_\t_\t0\troot\n\n1\tb\t_\t_\t_\t_\t0\troot\n2\tc\t_\t_\t_\t_\t5\tdep\n\n");
    let output = dir.path().join("dep.contexts");
    match extract_file(&ConllFile::new(&input), &output, 0) {
        Err(Error::OutOfRangeHead { sentence, head, .. }) => assert_eq!((sentence, head), (2, 5)),
        other => panic!("expected an out of range head, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    match extract_file(&ConllFile::new(dir.path().join("nope.conll")), dir.path().join("out"), 0) {
        Err(Error::MissingFile(..)) => {}
        other => panic!("expected a missing file, got {:?}", other),
    }
}

#[test]
fn vocabularies_are_idempotent() {
    let dir = TempDir::new().unwrap();
    let pairs = write(dir.path(), "dep.contexts",
        "dogs\tbark-nsubj\ndogs\tbark-nsubj\nbroken line\ncats\tbark-nsubj\ndogs\tbark-nsubj\n");
    let (wv, cv) = (dir.path().join("wv"), dir.path().join("cv"));

    build_vocab_files(&pairs, &wv, &cv, 2).unwrap();
    let first = (fs::read(&wv).unwrap(), fs::read(&cv).unwrap());
    build_vocab_files(&pairs, &wv, &cv, 2).unwrap();
    let second = (fs::read(&wv).unwrap(), fs::read(&cv).unwrap());

    assert_eq!(first, second);
    assert_eq!(String::from_utf8(first.0).unwrap(), "dogs\t3\n");
    assert_eq!(String::from_utf8(first.1).unwrap(), "bark-nsubj\t4\n");
    assert_eq!(Vocabulary::load(&cv, "context vocabulary").unwrap().get("bark-nsubj"), Some(4));
}

#[test]
fn job_writes_every_file() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "parsed.conll", CORPUS);
    let mut job = JobConfig::new(&input, dir.path().join("out"));
    job.min_count = 1;
    job.trees = Some("trees".to_string());

    let report = run_job(&job).unwrap();
    assert_eq!(report.extracted.pairs, 4);
    assert_eq!(report.words, 3);
    assert_eq!(report.contexts, 4);
    assert_eq!(report.trees, Some(2));
    assert!(!report.trained);

    let trees = read_trees(dir.path().join("out").join("trees.json")).unwrap();
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].name, "ROOT");
    assert_eq!(trees[0].children[0].name, "bark (ROOT)");
    let labels: Vec<&str> = trees[0].children[0].children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(labels, vec!["Dogs (nsubj)", "loudly (advmod)", ". (punct)"]);
    // importing and exporting again changes nothing
    assert_eq!(DependencyTree::import(&trees[1]).export(), trees[1]);
}

#[test]
fn batch_runs_jobs_independently_and_fails_on_any_failure() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.conll", CORPUS);
    let b = write(dir.path(), "b.conll", "1\tHi\t_\t_\t_\t_\t0\troot\n2\tthere\t_\t_\t_\t_\t1\tadvmod\n");
    let config = PipelineConfig {
        jobs: vec![JobConfig::new(&a, dir.path().join("a")), JobConfig::new(&b, dir.path().join("b"))],
    };
    let reports = run_all(&config).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].extracted.pairs, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("b").join("dep.contexts")).unwrap(),
        "there\thi-advmod\n"
    );

    let broken = PipelineConfig {
        jobs: vec![
            JobConfig::new(&a, dir.path().join("c")),
            JobConfig::new(dir.path().join("missing.conll"), dir.path().join("d")),
        ],
    };
    assert!(run_all(&broken).is_err());
    // the healthy job still ran to completion
    assert!(dir.path().join("c").join("wv").exists());
}
