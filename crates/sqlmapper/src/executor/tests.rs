use super::{ExecutorConfig, RecordedStatement, RecordingExecutor};
use crate::args;
use crate::error::MapperError;
use crate::model::RecordSchema;
use crate::rewrite::{Arg, Dialect, RewritePolicy};
use crate::template::{QueryTemplate, raw};
use crate::value::Value;
use std::sync::Arc;

fn model_a() -> Arc<RecordSchema> {
    RecordSchema::builder("A")
        .table("a")
        .field("b", "INTEGER")
        .field("c", "TEXT")
        .extra_ddl("PRIMARY KEY (b)")
        .build()
        .unwrap()
}

fn unnamed() -> Arc<RecordSchema> {
    RecordSchema::builder("U")
        .field("x", "INTEGER")
        .build()
        .unwrap()
}

fn sqls(exec: &RecordingExecutor) -> Vec<&str> {
    exec.statements().iter().map(|s| s.sql.as_str()).collect()
}

// ── Strict call/return variant ──

mod blocking {
    use super::*;
    use crate::executor::Executor;

    #[test]
    fn execute_rewrites_before_running() {
        let a = model_a();
        let mut exec = RecordingExecutor::default();
        let rec = a.from_ordered([Value::from(1), Value::from("a")]).unwrap();

        let rows: Vec<_> = exec.execute("INSERT INTO ?", &args![rec]).unwrap().collect();
        assert!(rows.is_empty());
        assert_eq!(
            exec.statements(),
            &[RecordedStatement {
                sql: "INSERT INTO a(b,c)VALUES(?,?)".into(),
                params: vec![Value::Int(1), Value::from("a")],
            }]
        );
    }

    #[test]
    fn execute_as_maps_rows_into_records() {
        let a = model_a();
        let mut exec = RecordingExecutor::default();
        exec.push_result(vec![
            vec![Value::Int(1), Value::from("a")],
            vec![Value::Int(5), Value::from("?")],
        ]);

        let records = exec
            .execute_as("SELECT * FROM a", &[], &a)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            records,
            vec![
                a.from_ordered([Value::from(1), Value::from("a")]).unwrap(),
                a.from_ordered([Value::from(5), Value::from("?")]).unwrap(),
            ]
        );
    }

    #[test]
    fn wide_rows_fail_record_mapping() {
        let mut exec = RecordingExecutor::default();
        exec.push_result(vec![vec![Value::Int(1), Value::Int(2)]]);
        let mut records = exec.execute_as("SELECT 1, 2", &[], &unnamed()).unwrap();
        assert!(matches!(
            records.next(),
            Some(Err(MapperError::TooManyOrderedFields { given: 2, actual: 1, .. }))
        ));
    }

    #[test]
    fn execute_many_preserves_order() {
        let a = model_a();
        let mut exec = RecordingExecutor::default();
        let lists = vec![
            args![a.from_ordered([Value::from(1), Value::from("a")]).unwrap()],
            args![a.from_named([("c", "b")]).unwrap()],
            args![a.from_named([("c", "c")]).unwrap()],
        ];

        let results = exec.execute_many("INSERT INTO ?", &lists).unwrap();
        assert_eq!(results.len(), 3);
        let params: Vec<Vec<Value>> = exec.statements().iter().map(|s| s.params.clone()).collect();
        assert_eq!(
            params,
            vec![
                vec![Value::Int(1), Value::from("a")],
                vec![Value::Null, Value::from("b")],
                vec![Value::Null, Value::from("c")],
            ]
        );
    }

    #[test]
    fn execute_many_stops_at_first_failure() {
        let a = model_a();
        let mut exec = RecordingExecutor::default();
        let lists = vec![
            args![a.from_named([("c", "ok")]).unwrap()],
            args![unnamed().from_ordered([1]).unwrap()],
            args![a.from_named([("c", "never")]).unwrap()],
        ];
        let err = exec.execute_many("INSERT INTO ?", &lists).unwrap_err();
        assert!(matches!(err, MapperError::TablenameNotSpecifiedOnInsertion(_)));
        assert_eq!(exec.statements().len(), 1);
    }

    #[test]
    fn create_tables_runs_ddl_then_commits() {
        let mut exec = RecordingExecutor::default();
        exec.create_tables([&model_a()]).unwrap();
        assert_eq!(
            sqls(&exec),
            ["CREATE TABLE IF NOT EXISTS a (b INTEGER,c TEXT,PRIMARY KEY (b))"]
        );
        assert_eq!(exec.commits(), 1);
        assert!(!exec.has_pending_writes());
    }

    #[test]
    fn create_tables_fails_before_running_anything() {
        let mut exec = RecordingExecutor::default();
        let err = exec.create_tables([model_a(), unnamed()]).unwrap_err();
        assert!(matches!(
            &err,
            MapperError::TablenameNotSpecifiedOnTableCreation(m) if m == "U"
        ));
        assert!(exec.statements().is_empty());
        assert_eq!(exec.commits(), 0);
    }

    #[test]
    fn commit_without_writes_is_a_noop() {
        let mut exec = RecordingExecutor::default();
        exec.commit().unwrap();
        assert_eq!(exec.commits(), 0);

        exec.execute("DELETE FROM a", &[]).unwrap();
        assert!(exec.has_pending_writes());
        exec.commit().unwrap();
        exec.commit().unwrap();
        assert_eq!(exec.commits(), 1);
    }

    #[test]
    fn failed_rewrite_leaves_executor_usable() {
        let mut exec = RecordingExecutor::default();
        assert!(exec.execute("SELECT ?, ?", &args![1]).is_err());
        assert!(exec.statements().is_empty());
        exec.execute("SELECT ?", &args![1]).unwrap();
        assert_eq!(exec.statements().len(), 1);
    }

    #[test]
    fn strict_config_applies_to_rewrites() {
        let mut exec =
            RecordingExecutor::with_config(Dialect::question(), ExecutorConfig::new().strict());
        let err = exec.execute("SELECT ?", &args![1, 2]).unwrap_err();
        assert!(matches!(err, MapperError::UnconsumedArguments { used: 1, given: 2 }));
    }

    #[test]
    fn strict_dialect_is_kept_without_a_policy_override() {
        let mut exec = RecordingExecutor::new(Dialect::question().strict());
        let err = exec.execute("SELECT ?", &args![1, 2]).unwrap_err();
        assert!(matches!(err, MapperError::UnconsumedArguments { used: 1, given: 2 }));
        assert!(exec.statements().is_empty());

        let mut relaxed = RecordingExecutor::with_config(
            Dialect::question().strict(),
            ExecutorConfig::new().policy(RewritePolicy::Permissive),
        );
        relaxed.execute("SELECT ?", &args![1, 2]).unwrap();
        assert_eq!(relaxed.statements()[0].params, [Value::Int(1)]);
    }

    #[test]
    fn custom_placeholder_dialect_is_used() {
        let dialect = Dialect::postgres().with_placeholder(r":\w+").unwrap();
        let mut exec = RecordingExecutor::with_config(dialect, ExecutorConfig::new());
        exec.execute("SELECT * FROM a WHERE b = :b AND c <> '?'", &args![7])
            .unwrap();
        assert_eq!(sqls(&exec), ["SELECT * FROM a WHERE b = $1 AND c <> '?'"]);
        assert_eq!(exec.statements()[0].params, [Value::Int(7)]);
    }

    #[test]
    fn execute_many_as_maps_each_call_in_order() {
        let a = model_a();
        let mut exec = RecordingExecutor::default();
        exec.push_result(vec![vec![Value::Int(1), Value::from("a")]])
            .push_result(Vec::new())
            .push_result(vec![vec![Value::Int(3)], vec![Value::Int(4), Value::from("d")]]);
        let lists = vec![args![1], args![2], args![3]];

        let results: Vec<Vec<_>> = exec
            .execute_many_as("SELECT * FROM a WHERE b >= ?", &lists, &a)
            .unwrap()
            .into_iter()
            .map(|records| records.collect::<Result<Vec<_>, _>>().unwrap())
            .collect();

        assert_eq!(
            results,
            vec![
                vec![a.from_ordered([Value::from(1), Value::from("a")]).unwrap()],
                vec![],
                vec![
                    a.from_named([("b", 3)]).unwrap(),
                    a.from_ordered([Value::from(4), Value::from("d")]).unwrap(),
                ],
            ]
        );
        assert_eq!(results[2][0].get("c"), Some(&Value::Null));
        assert_eq!(exec.statements().len(), 3);
    }
}

// ── Suspend-capable variant ──

mod nonblocking {
    use super::*;
    use crate::executor::AsyncExecutor;

    #[tokio::test]
    async fn execute_and_collect_records() {
        let a = model_a();
        let mut exec = RecordingExecutor::new(Dialect::postgres());
        exec.push_result(vec![vec![Value::Int(3), Value::from("c")]]);

        let records = exec
            .execute_as("SELECT * FROM a WHERE b = ?", &args![3], &a)
            .await
            .unwrap()
            .collect_records()
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("c"), Some(&Value::from("c")));
        assert_eq!(sqls(&exec), ["SELECT * FROM a WHERE b = $1"]);
    }

    #[tokio::test]
    async fn execute_many_runs_sequentially() {
        let a = model_a();
        let mut exec = RecordingExecutor::new(Dialect::postgres());
        exec.push_result(vec![vec![Value::Int(1)]]);
        let lists: Vec<Vec<Arg>> = (1..=3)
            .map(|i| args![a.from_ordered([Value::from(i), Value::from("x")]).unwrap()])
            .collect();

        let results = exec.execute_many("INSERT INTO ?", &lists).await.unwrap();
        let mut counts = Vec::new();
        for rows in results {
            counts.push(rows.collect_rows().await.unwrap().len());
        }
        assert_eq!(counts, [1, 0, 0]);
        let firsts: Vec<Value> = exec.statements().iter().map(|s| s.params[0].clone()).collect();
        assert_eq!(firsts, [Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[tokio::test]
    async fn create_tables_and_commit() {
        let mut exec = RecordingExecutor::default();
        exec.create_tables([&model_a()]).await.unwrap();
        assert_eq!(exec.commits(), 1);

        let err = exec.create_tables([&unnamed()]).await.unwrap_err();
        assert!(matches!(err, MapperError::TablenameNotSpecifiedOnTableCreation(_)));
        assert_eq!(exec.statements().len(), 1);
    }

    #[tokio::test]
    async fn execute_many_as_maps_each_call_in_order() {
        let a = model_a();
        let mut exec = RecordingExecutor::new(Dialect::postgres());
        exec.push_result(vec![vec![Value::Int(2), Value::from("b")]])
            .push_result(vec![vec![Value::Int(1)]]);
        let lists = vec![args![2], args![1]];

        let streams = exec
            .execute_many_as("SELECT * FROM a WHERE b = ?", &lists, &a)
            .await
            .unwrap();
        let mut results = Vec::new();
        for records in streams {
            results.push(records.collect_records().await.unwrap());
        }

        assert_eq!(
            results,
            vec![
                vec![a.from_ordered([Value::from(2), Value::from("b")]).unwrap()],
                vec![a.from_ordered([1]).unwrap()],
            ]
        );
        assert_eq!(results[1][0].get("c"), Some(&Value::Null));
        assert_eq!(
            sqls(&exec),
            ["SELECT * FROM a WHERE b = $1", "SELECT * FROM a WHERE b = $1"]
        );
    }
}

#[tokio::test]
async fn both_variants_produce_identical_statements() {
    let a = model_a();
    let template = insert_returning();
    let lists = vec![
        args![a.from_ordered([Value::from(1), Value::from("a")]).unwrap(), 10],
        args![a.from_named([("c", "b")]).unwrap(), 20],
    ];

    let mut blocking_exec = RecordingExecutor::new(Dialect::postgres());
    crate::executor::Executor::execute_many(&mut blocking_exec, template.clone(), &lists).unwrap();

    let mut async_exec = RecordingExecutor::new(Dialect::postgres());
    crate::executor::AsyncExecutor::execute_many(&mut async_exec, template, &lists)
        .await
        .unwrap();

    assert_eq!(blocking_exec.statements(), async_exec.statements());
    assert_eq!(
        blocking_exec.statements()[0].sql,
        "INSERT INTO a(b,c)VALUES($1,$2) /* '?' */ RETURNING $3"
    );
}

fn insert_returning() -> QueryTemplate {
    "INSERT INTO ? " + raw("/* '?' */") + " RETURNING ?"
}
