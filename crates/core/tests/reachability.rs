use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use systract_core::analysis::{CancellationToken, Reachability};
use systract_core::config::EngineConfig;
use systract_core::model::{FunctionDefinition, SymbolTable, SystemCall};
use systract_core::registry::SyscallRegistry;
use systract_core::services::{ExtractError, Extractor};

fn def(name: &str, calls: &[&str], ids: &[u16]) -> FunctionDefinition {
    let mut d = FunctionDefinition::new(name);
    d.call_targets = calls.iter().map(|c| c.to_string()).collect();
    d.syscall_ids = ids.iter().copied().collect();
    d
}

fn pool(threads: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new().num_threads(threads).build().expect("pool")
}

fn entries(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// `main.main` fans out to `width` workers, each calling every other worker and a shared
/// set of syscalls, so most call edges lead to already-visited functions.
fn dense_table(width: usize) -> SymbolTable {
    let workers: Vec<String> = (0..width).map(|i| format!("main.worker{i}")).collect();
    let refs: Vec<&str> = workers.iter().map(String::as_str).collect();
    let mut table = SymbolTable::new();
    table.insert(def("main.main", &refs, &[]));
    for (i, name) in workers.iter().enumerate() {
        let ids = [(i % 5) as u16, 60];
        table.insert(def(name, &refs, &ids));
    }
    table
}

#[test]
fn each_function_is_expanded_once_in_a_cycle() {
    let mut table = SymbolTable::new();
    table.insert(def("main.main", &["main.a"], &[]));
    table.insert(def("main.a", &["main.b", "main.main"], &[1]));
    table.insert(def("main.b", &["main.a", "main.b"], &[1, 3]));

    let walker = Reachability::new(&table, SyscallRegistry::x86_64(), CancellationToken::new());
    let mut seen = Vec::new();
    let stats = walker.walk(&pool(4), &entries(&["main.main"]), |call| seen.push(call.id));

    assert_eq!(stats.expanded, 3);
    assert_eq!(stats.visited, 3);
    assert_eq!(stats.delivered, 2);
    seen.sort();
    assert_eq!(seen, vec![1, 3]);
}

#[test]
fn unknown_callees_are_leaves() {
    let mut table = SymbolTable::new();
    table.insert(def("main.main", &["runtime.gopanic", "main.x"], &[]));
    table.insert(def("main.x", &[], &[0]));

    let walker = Reachability::new(&table, SyscallRegistry::x86_64(), CancellationToken::new());
    let mut seen = Vec::new();
    let stats = walker.walk(&pool(2), &entries(&["main.main"]), |call| seen.push(call));

    assert_eq!(seen, vec![SystemCall::new(0, "read")]);
    assert_eq!(stats.visited, 3);
    assert_eq!(stats.expanded, 2);
    assert!(walker.visited("runtime.gopanic"));
}

#[test]
fn function_reports_its_own_syscalls_before_callees() {
    let mut table = SymbolTable::new();
    table.insert(def("main.main", &["main.child"], &[3, 1]));
    table.insert(def("main.child", &[], &[0]));

    let walker = Reachability::new(&table, SyscallRegistry::x86_64(), CancellationToken::new());
    let mut seen = Vec::new();
    walker.walk(&pool(4), &entries(&["main.main"]), |call| seen.push(call.id));
    assert_eq!(seen, vec![3, 1, 0]);
}

#[test]
fn dense_graph_reports_each_id_exactly_once() {
    let table = dense_table(64);
    for threads in [1, 8] {
        let walker =
            Reachability::new(&table, SyscallRegistry::x86_64(), CancellationToken::new());
        let mut seen = Vec::new();
        let stats =
            walker.walk(&pool(threads), &entries(&["main.main"]), |call| seen.push(call.id));
        assert_eq!(stats.expanded, 65);
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 60], "threads={threads}");
    }
}

#[test]
fn consumer_is_never_reentered() {
    let table = dense_table(32);
    let walker = Reachability::new(&table, SyscallRegistry::x86_64(), CancellationToken::new());
    let busy = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&busy);
    let mut overlaps = 0;
    walker.walk(&pool(8), &entries(&["main.main"]), |_| {
        if flag.swap(true, Ordering::SeqCst) {
            overlaps += 1;
        }
        std::thread::yield_now();
        flag.store(false, Ordering::SeqCst);
    });
    assert_eq!(overlaps, 0);
}

#[test]
fn independent_runs_yield_the_same_set() {
    let table = dense_table(48);
    let run = || {
        let walker =
            Reachability::new(&table, SyscallRegistry::x86_64(), CancellationToken::new());
        let mut ids = Vec::new();
        walker.walk(&pool(6), &entries(&["main.main"]), |call| ids.push(call.id));
        ids.sort();
        ids
    };
    assert_eq!(run(), run());
}

#[test]
fn unregistered_id_is_reported_with_empty_name() {
    let mut table = SymbolTable::new();
    table.insert(def("main.main", &[], &[400]));

    let walker = Reachability::new(&table, SyscallRegistry::x86_64(), CancellationToken::new());
    let mut seen = Vec::new();
    walker.walk(&pool(1), &entries(&["main.main"]), |call| seen.push(call));
    assert_eq!(seen, vec![SystemCall::new(400, "")]);
}

#[test]
fn raised_token_stops_the_walk() {
    let table = dense_table(8);
    let token = CancellationToken::new();
    token.cancel();

    let extractor = Extractor::new(EngineConfig::default()).unwrap().with_cancellation(token);
    let err = extractor.extract_from_table(&table, |_| {}).unwrap_err();
    assert!(matches!(err, ExtractError::Cancelled { delivered: 0 }), "got {err:?}");
}

#[test]
fn cancelling_mid_walk_drains_and_fails() {
    let table = dense_table(64);
    let extractor = Extractor::new(EngineConfig { jobs: Some(2), ..Default::default() }).unwrap();
    let token = extractor.cancellation_token();

    let mut delivered = 0;
    let err = extractor
        .extract_from_table(&table, |_| {
            delivered += 1;
            token.cancel();
        })
        .unwrap_err();
    match err {
        ExtractError::Cancelled { delivered: n } => assert_eq!(n, delivered),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn extractor_rejects_table_without_entry_points() {
    let mut table = SymbolTable::new();
    table.insert(def("lib.Open", &[], &[2]));
    let extractor = Extractor::new(EngineConfig::default()).unwrap();

    let mut delivered = 0;
    let err = extractor.extract_from_table(&table, |_| delivered += 1).unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedBinaryKind(_)));
    assert_eq!(delivered, 0);
}

#[test]
fn configured_entry_points_override_defaults() {
    let mut table = SymbolTable::new();
    table.insert(def("_rt0_amd64_linux", &["runtime.rt0_go"], &[]));
    table.insert(def("runtime.rt0_go", &[], &[158]));

    let config =
        EngineConfig { entry_points: vec!["_rt0_amd64_linux".into()], ..Default::default() };
    let extractor = Extractor::new(config).unwrap();
    let mut seen = Vec::new();
    extractor.extract_from_table(&table, |call| seen.push(call)).expect("walk");
    assert_eq!(seen, vec![SystemCall::new(158, "arch_prctl")]);
}
