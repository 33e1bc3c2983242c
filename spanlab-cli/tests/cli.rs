//! End-to-end runs of the spanlab binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn spanlab(args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("spanlab").unwrap();
    cmd.args(args).env_remove("RUST_LOG");
    cmd
}

fn corpus(dir: &Path) -> (String, String) {
    let docs = dir.join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("d1"), "Ada met Bob in Paris").unwrap();
    fs::write(docs.join("d2"), "nothing here").unwrap();
    let ops = dir.join("gold.ops");
    fs::write(
        &ops,
        "# gold\naddToType d1 0 3 PER\naddToType d1 8 3 PER\naddToType d1 15 5 LOC 0.5\ncloseAllTypes d1\naddToType ghost 0 1 PER\n",
    )
    .unwrap();
    (
        docs.to_string_lossy().into_owned(),
        ops.to_string_lossy().into_owned(),
    )
}

#[test]
fn labels_as_ops() {
    let dir = tempfile::tempdir().unwrap();
    let (docs, ops) = corpus(dir.path());
    spanlab(&["labels", "--docs", &docs, "--ops", &ops, "--quiet"])
        .assert()
        .success()
        .stdout(
            "addToType d1 15 5 LOC 0.5\ncloseType d1 LOC\naddToType d1 0 3 PER\naddToType d1 8 3 PER\ncloseType d1 PER\n",
        );
}

#[test]
fn labels_as_strings_with_offsets() {
    let dir = tempfile::tempdir().unwrap();
    let (docs, ops) = corpus(dir.path());
    spanlab(&[
        "labels", "--docs", &docs, "--ops", &ops, "--format", "strings", "--offsets", "-q",
    ])
    .assert()
    .success()
    .stdout("LOC:d1:15:20\tParis\nPER:d1:0:3\tAda\nPER:d1:8:11\tBob\n");
}

#[test]
fn labels_markup_one_document() {
    let dir = tempfile::tempdir().unwrap();
    let (docs, ops) = corpus(dir.path());
    let out_path = dir.path().join("d1.xml");
    spanlab(&[
        "labels",
        "--docs",
        &docs,
        "--ops",
        &ops,
        "--format",
        "markup",
        "--doc",
        "d1",
        "--output",
        &out_path.to_string_lossy(),
    ])
    .assert()
    .success()
    // summary goes to stderr
    .stderr(predicate::str::contains("1 skipped"));
    assert_eq!(
        fs::read_to_string(&out_path).unwrap(),
        "<root><PER>Ada</PER> met <PER>Bob</PER> in <LOC>Paris</LOC></root>\n"
    );
}

#[test]
fn labels_bad_policy_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (docs, ops) = corpus(dir.path());
    spanlab(&["labels", "--docs", &docs, "--ops", &ops, "--policy", "SOMETIMES"])
        .assert()
        .failure();
}

#[test]
fn labels_malformed_log_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (docs, _) = corpus(dir.path());
    let bad = dir.path().join("bad.ops");
    fs::write(&bad, "addToType d1 zero 3 PER\n").unwrap();
    spanlab(&["labels", "--docs", &docs, "--ops", &bad.to_string_lossy()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn train_reports_accuracy() {
    let dir = tempfile::tempdir().unwrap();
    let train = dir.path().join("train.txt");
    fs::write(&train, "-1 lower:1\n+1 cap:1\n-1 lower:1 stop\n+1 cap:1 title\n").unwrap();
    let train = train.to_string_lossy();
    spanlab(&[
        "train", "--train", &train, "--test", &train, "--degree", "0", "--mode", "averaged", "-q",
    ])
    .assert()
    .success()
    .stdout(
        predicate::str::contains("Kernel Voted Perceptron")
            .and(predicate::str::contains("train accuracy: 100.00%"))
            .and(predicate::str::contains("test accuracy:  100.00% (4 examples)")),
    );
}

#[test]
fn train_rejects_negative_degree() {
    let dir = tempfile::tempdir().unwrap();
    let train = dir.path().join("train.txt");
    fs::write(&train, "+1 a\n").unwrap();
    spanlab(&["train", "--train", &train.to_string_lossy(), "--degree", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("degree"));
}
