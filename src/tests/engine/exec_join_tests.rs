use crate::builder::JoinerBuilder;
use crate::error::{ConfigError, JoinError};
use crate::extract::KeyRules;
use crate::io::{InMemorySink, InMemorySource};
use crate::result::{JoinResult, JoinType, RightMatch};

fn exec_join(join: JoinType, template: &str, input: &str) -> Vec<JoinResult> {
    let joiner = JoinerBuilder::new(join)
        .with_exec(template)
        .with_left_rules(KeyRules::column(",", 0))
        .with_concurrency(4)
        .build()
        .unwrap();

    let out = InMemorySink::new("out");
    joiner
        .run_with(
            &InMemorySource::from_string("in", input),
            &out,
            &InMemorySink::new("diag"),
        )
        .unwrap();

    let mut results: Vec<JoinResult> = out
        .lines()
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    results.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
    results
}

fn exit_code(r: &JoinResult) -> i32 {
    match &r.right {
        Some(RightMatch::ExecResult(out)) => out.exit_code,
        other => panic!("expected an exec result, got {other:?}"),
    }
}

#[test]
fn inner_exec_join_keeps_successful_runs() {
    let results = exec_join(JoinType::Inner, "test {} = a && echo found {}", "a,1\nb,2\n");
    assert_eq!(results.len(), 1);
    let Some(RightMatch::ExecResult(out)) = &results[0].right else {
        panic!("expected an exec result");
    };
    assert_eq!(out.stdout, "found a\n");
    assert_eq!(out.exit_code, 0);
}

#[test]
fn disjoint_exec_join_keeps_failed_runs() {
    let results = exec_join(JoinType::RightIsNull, "test {} = a", "a,1\nb,2\nc,3\n");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| exit_code(r) == 1));
}

#[test]
fn left_exec_join_keeps_everything() {
    let results = exec_join(JoinType::Left, "exit 0", "a\nb\n");
    assert_eq!(results.len(), 2);
}

#[test]
fn exec_and_index_are_mutually_exclusive() {
    let err = JoinerBuilder::new(JoinType::Inner)
        .with_exec("true")
        .with_index_file("/tmp/whatever")
        .build()
        .unwrap_err();
    assert!(matches!(err, JoinError::Config(ConfigError::BothResolvers)));
}
