use std::path::Path;

use crate::builder::JoinerBuilder;
use crate::engine::Joiner;
use crate::error::{ErrorPolicy, JoinError, Stage};
use crate::extract::KeyRules;
use crate::io::{InMemorySink, InMemorySource};
use crate::result::{JoinResult, JoinType, RightMatch};

const LEFT: &str = "1,a\n2,b\n3,c\n4,d\n";

fn write_index(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("index.txt");
    std::fs::write(&path, contents).unwrap();
    path
}

fn joiner(index: &Path, join: JoinType) -> Joiner {
    JoinerBuilder::new(join)
        .with_index_file(index)
        .with_left_rules(KeyRules::column(",", 1))
        .build()
        .unwrap()
}

fn parse(sink: &InMemorySink) -> Vec<JoinResult> {
    sink.lines()
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn left_keys(results: &[JoinResult]) -> Vec<String> {
    let mut keys: Vec<String> = results
        .iter()
        .filter_map(|r| r.left.as_ref().map(|l| l.index.clone()))
        .collect();
    keys.sort();
    keys
}

fn run(joiner: &Joiner, input: &str) -> (Result<crate::JoinSummary, JoinError>, InMemorySink, InMemorySink) {
    let out = InMemorySink::new("out");
    let diag = InMemorySink::new("diag");
    let src = InMemorySource::from_string("in", input);
    let res = joiner.run_with(&src, &out, &diag);
    (res, out, diag)
}

#[test]
fn inner_join_emits_only_matches() {
    let dir = tempfile::tempdir().unwrap();
    let index = write_index(dir.path(), "a\nb\n");

    let (res, out, diag) = run(&joiner(&index, JoinType::Inner), LEFT);
    let summary = res.unwrap();

    let results = parse(&out);
    assert_eq!(left_keys(&results), ["a", "b"]);
    assert!(results.iter().all(|r| matches!(r.right, Some(RightMatch::IndexFileResult(_)))));
    assert!(diag.contents().is_empty());
    assert_eq!(summary.lines, 4);
    assert_eq!(summary.emitted, 2);
    assert_eq!(summary.suppressed, 2);
    assert_eq!(summary.errors, 0);
}

#[test]
fn left_join_emits_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let index = write_index(dir.path(), "a\nb\n");

    let (res, out, _) = run(&joiner(&index, JoinType::Left), LEFT);
    res.unwrap();

    let results = parse(&out);
    assert_eq!(left_keys(&results), ["a", "b", "c", "d"]);
    for r in &results {
        let key = &r.left.as_ref().unwrap().index;
        assert_eq!(r.right.is_none(), key == "c" || key == "d", "{r}");
    }
}

#[test]
fn disjoint_join_emits_only_misses() {
    let dir = tempfile::tempdir().unwrap();
    let index = write_index(dir.path(), "a\nb\n");

    let (res, out, _) = run(&joiner(&index, JoinType::RightIsNull), LEFT);
    res.unwrap();

    let results = parse(&out);
    assert_eq!(left_keys(&results), ["c", "d"]);
    assert!(results.iter().all(|r| r.right.is_none()));
}

#[test]
fn output_does_not_depend_on_chunking_or_concurrency() {
    let dir = tempfile::tempdir().unwrap();
    let index_rows: String = (0..50).map(|i| format!("k{i}\n")).collect();
    let index = write_index(dir.path(), &index_rows);
    let input: String = (0..300).map(|i| format!("{i},k{}\n", i % 80)).collect();

    let mut expected = None;
    for (chunk, workers, buffer) in [(1, 1, 1), (7, 3, 2), (64, 10, 5000), (5000, 4, 1)] {
        let joiner = JoinerBuilder::new(JoinType::Inner)
            .with_index_file(&index)
            .with_left_rules(KeyRules::column(",", 1))
            .with_chunk_size(chunk)
            .with_concurrency(workers)
            .with_buffer_size(buffer)
            .build()
            .unwrap();

        let (res, out, _) = run(&joiner, &input);
        let summary = res.unwrap();
        assert_eq!(summary.lines, 300);

        let mut lines = out.lines();
        lines.sort();
        match &expected {
            None => expected = Some(lines),
            Some(first) => assert_eq!(&lines, first, "chunk {chunk}, workers {workers}"),
        }
    }
    // keys k0..k49 match, k50..k79 do not
    let matched = (0..300).filter(|i| i % 80 < 50).count();
    assert_eq!(expected.map(|l| l.len()), Some(matched));
}

#[test]
fn fast_fail_aborts_with_the_failing_row() {
    let dir = tempfile::tempdir().unwrap();
    let index = write_index(dir.path(), "a\n");
    let joiner = JoinerBuilder::new(JoinType::Left)
        .with_index_file(&index)
        .with_left_rules(KeyRules::column(",", 1))
        .with_concurrency(1)
        .build()
        .unwrap();

    let (res, _, diag) = run(&joiner, "1,a\nbroken\n");
    match res {
        Err(JoinError::Aborted(err)) => {
            assert_eq!(err.stage, Stage::Extract);
            assert_eq!(err.row, "broken");
        }
        other => panic!("expected an aborted run, got {other:?}"),
    }
    assert!(diag.contents_string().contains("fatal error in processing"));
}

#[test]
fn continue_skips_failing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let index = write_index(dir.path(), "a\nb\n");
    let joiner = JoinerBuilder::new(JoinType::Left)
        .with_index_file(&index)
        .with_left_rules(KeyRules::column(",", 1))
        .with_mode(ErrorPolicy::Continue)
        .build()
        .unwrap();

    let (res, out, diag) = run(&joiner, "1,a\nbroken\n2,b\nalso-broken\n");
    let summary = res.unwrap();

    assert_eq!(left_keys(&parse(&out)), ["a", "b"]);
    assert_eq!(summary.errors, 2);
    assert_eq!(summary.emitted, 2);

    let diag = diag.lines();
    assert_eq!(diag.len(), 2);
    assert!(diag.iter().all(|l| l.starts_with("error: [Extract]")));
    assert!(diag.iter().any(|l| l.contains("broken")));
}

#[test]
fn verbose_reports_rows_that_did_not_join() {
    let dir = tempfile::tempdir().unwrap();
    let index = write_index(dir.path(), "a\nb\n");
    let joiner = JoinerBuilder::new(JoinType::Inner)
        .with_index_file(&index)
        .with_left_rules(KeyRules::column(",", 1))
        .with_verbose(true)
        .build()
        .unwrap();

    let (res, _, diag) = run(&joiner, LEFT);
    res.unwrap();

    let mut diag = diag.lines();
    diag.sort();
    assert_eq!(diag, ["no join: 3,c", "no join: 4,d"]);
}

#[test]
fn rows_with_empty_keys_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let index = write_index(dir.path(), "u1\n");
    let joiner = JoinerBuilder::new(JoinType::Left)
        .with_index_file(&index)
        .with_left_rules(KeyRules::whole_row().with_json_path("user").unwrap())
        .build()
        .unwrap();

    let (res, out, _) = run(&joiner, "{\"user\":\"u1\"}\n{\"other\":1}\n{\"user\":null}\n");
    let summary = res.unwrap();

    assert_eq!(left_keys(&parse(&out)), ["u1"]);
    assert_eq!(summary.suppressed, 2);
}

#[test]
fn join_row_builds_a_result() {
    let dir = tempfile::tempdir().unwrap();
    let index = write_index(dir.path(), "a\n");
    let joiner = joiner(&index, JoinType::Inner);

    let hit = joiner.join_row("1,a").unwrap();
    assert_eq!(hit.left.as_ref().map(|l| l.row.as_str()), Some("1,a"));
    assert!(hit.right.is_some());

    let err = joiner.join_row("nothing").unwrap_err();
    assert_eq!(err.stage, Stage::Extract);
    assert_eq!(joiner.index().and_then(|i| i.get("a")).map(|e| e.matches()), Some(1));
}

#[test]
fn run_accepts_plain_readers_and_writers() {
    let dir = tempfile::tempdir().unwrap();
    let index = write_index(dir.path(), "a\n");
    let joiner = joiner(&index, JoinType::Inner);

    let mut out = Vec::new();
    let summary = joiner
        .run(std::io::Cursor::new(b"1,a\n2,z".to_vec()), &mut out, std::io::sink())
        .unwrap();

    assert_eq!(summary.lines, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{\"Left\":{\"Index\":\"a\",\"Row\":\"1,a\"},\"Right\":{\"IndexFileResult\":{\"Index\":\"a\",\"Row\":\"a\"}}}\n"
    );
}
