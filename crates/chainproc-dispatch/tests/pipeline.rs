//! End-to-end tests: JSON configuration → bag → chain execution.

use std::sync::Arc;

use chainproc_bag::ProcessorBag;
use chainproc_core::{keys, AttributeValue, ExecutionContext};
use chainproc_dispatch::{
    create_iterator, ChainApplicableChecker, ChainProcessor, MatchApplicableChecker,
    NotDisabledApplicableChecker,
};
use chainproc_test_utils::{CallLog, FnProcessor, MockResolver};

const CONFIG: &str = r#"{
    "actions": {
        "get": {
            "processing_groups": {
                "initialize": { "priority": 10 },
                "security_check": { "priority": 5 },
                "load_data": { "priority": 0 },
                "normalize_result": { "priority": -10 }
            }
        }
    },
    "processors": [
        { "id": "normalize", "action": "get", "group": "normalize_result" },
        { "id": "load_entity", "action": "get", "group": "load_data" },
        { "id": "rest_only", "action": "get", "group": "initialize", "requestType": "rest" },
        { "id": "check_access", "action": "get", "group": "security_check" },
        { "id": "load_legacy", "action": "get", "group": "load_data", "disabled": true },
        { "id": "not_rest", "action": "get", "group": "initialize", "requestType": "!rest" },
        { "id": "init_context", "action": "get", "group": "initialize", "priority": 10 },
        { "id": "cleanup", "action": "get" },

        { "id": "set_full", "action": "customize_loaded_data" },
        { "id": "set_ids", "action": "customize_loaded_data", "identifier_only": true },
        { "id": "set_list", "action": "customize_loaded_data", "collection": true },
        { "id": "set_any", "action": "customize_loaded_data", "identifier_only": null },

        { "id": "prepare", "action": "customize_form_data", "event": "pre_submit" },
        { "id": "map_fields", "action": "customize_form_data", "event": "submit|post_submit" },
        { "id": "audit", "action": "customize_form_data" }
    ]
}"#;

const ALL_IDS: &[&str] = &[
    "init_context",
    "rest_only",
    "not_rest",
    "check_access",
    "load_entity",
    "load_legacy",
    "normalize",
    "cleanup",
    "set_full",
    "set_ids",
    "set_list",
    "set_any",
    "prepare",
    "map_fields",
    "audit",
];

fn checker() -> ChainApplicableChecker {
    ChainApplicableChecker::new()
        .with_checker(NotDisabledApplicableChecker)
        .with_checker(MatchApplicableChecker::new())
}

fn setup() -> (Arc<ProcessorBag>, CallLog) {
    let bag = ProcessorBag::from_json(CONFIG).expect("config should build");
    (Arc::new(bag), CallLog::new())
}

#[test]
fn bag_orders_get_by_group_and_processor_priority() {
    let (bag, _) = setup();
    let order: Vec<&str> = bag
        .processors("get")
        .entries()
        .iter()
        .map(|e| e.id().as_str())
        .collect();
    assert_eq!(
        order,
        vec![
            "init_context",
            "rest_only",
            "not_rest",
            "check_access",
            "load_entity",
            "load_legacy",
            "normalize",
            "cleanup"
        ]
    );
}

#[test]
fn get_runs_groups_by_priority() {
    let (bag, log) = setup();
    let chain = ChainProcessor::new(bag, checker(), MockResolver::recording(ALL_IDS.iter().copied(), &log));

    let mut ctx = ExecutionContext::new("get");
    ctx.set("requestType", AttributeValue::List(vec!["rest".into(), "json_api".into()]));
    chain.process(&mut ctx).unwrap();

    assert_eq!(
        log.calls(),
        vec![
            "init_context",
            "rest_only",
            "check_access",
            "load_entity",
            "normalize",
            "cleanup"
        ]
    );
}

#[test]
fn skip_and_bounds_from_the_caller() {
    let (bag, log) = setup();
    let chain = ChainProcessor::new(bag, checker(), MockResolver::recording(ALL_IDS.iter().copied(), &log));

    let mut ctx = ExecutionContext::new("get");
    ctx.set("requestType", "soap");
    ctx.skip_group("security_check");
    ctx.set_last_group("load_data");
    chain.process(&mut ctx).unwrap();

    assert_eq!(
        log.calls(),
        vec!["init_context", "not_rest", "load_entity", "cleanup"]
    );
}

#[test]
fn processor_skips_a_later_group() {
    let (bag, log) = setup();
    let mut resolver = MockResolver::recording(ALL_IDS.iter().copied(), &log);
    resolver.insert(
        "check_access",
        FnProcessor::new("check_access", log.clone(), |ctx: &mut ExecutionContext| {
            ctx.skip_group("load_data");
        }),
    );
    let chain = ChainProcessor::new(bag, checker(), resolver);

    let mut ctx = ExecutionContext::new("get");
    ctx.set("requestType", "rest");
    chain.process(&mut ctx).unwrap();

    assert_eq!(
        log.calls(),
        vec!["init_context", "rest_only", "check_access", "normalize", "cleanup"]
    );
}

#[test]
fn loaded_data_items_match_on_identifier_only() {
    let (bag, log) = setup();
    let chain = ChainProcessor::new(bag, checker(), MockResolver::recording(ALL_IDS.iter().copied(), &log));

    let mut ctx = ExecutionContext::new("customize_loaded_data");
    ctx.set(keys::IDENTIFIER_ONLY, false);
    ctx.set_last_group("item");
    chain.process(&mut ctx).unwrap();
    assert_eq!(log.calls(), vec!["set_full", "set_any"]);

    log.clear();
    ctx.set(keys::IDENTIFIER_ONLY, true);
    chain.process(&mut ctx).unwrap();
    assert_eq!(log.calls(), vec!["set_ids", "set_any"]);

    log.clear();
    ctx.remove(keys::IDENTIFIER_ONLY);
    ctx.clear_last_group();
    ctx.set_first_group("collection");
    chain.process(&mut ctx).unwrap();
    assert_eq!(log.calls(), vec!["set_list"]);
}

#[test]
fn form_data_runs_per_event() {
    let (bag, log) = setup();
    let chain = ChainProcessor::new(
        bag,
        ChainApplicableChecker::new(),
        MockResolver::recording(ALL_IDS.iter().copied(), &log),
    );

    for (event, expected) in [
        ("pre_submit", vec!["prepare", "audit"]),
        ("submit", vec!["map_fields", "audit"]),
        ("post_submit", vec!["map_fields", "audit"]),
        ("pre_validate", vec!["audit"]),
        ("post_validate", vec!["audit"]),
    ] {
        log.clear();
        let mut ctx = ExecutionContext::new("customize_form_data");
        ctx.set_first_group(event);
        ctx.set_last_group(event);
        chain.process(&mut ctx).unwrap();
        assert_eq!(log.calls(), expected, "event {event}");
    }
}

#[test]
fn iterator_is_restartable_over_a_shared_bag() {
    let (bag, log) = setup();
    let resolver = MockResolver::recording(ALL_IDS.iter().copied(), &log);
    let checker = ChainApplicableChecker::new();
    let ctx = ExecutionContext::new("customize_form_data");

    let mut iter = create_iterator(&bag, &ctx, &checker, &resolver);
    let first: Vec<String> = iter
        .with_context(&ctx)
        .map(|r| r.map(|p| p.id().to_string()))
        .collect::<Result<_, _>>()
        .unwrap();
    iter.rewind();
    let second: Vec<String> = iter
        .with_context(&ctx)
        .map(|r| r.map(|p| p.id().to_string()))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![
            "prepare",
            "audit",
            "map_fields",
            "audit",
            "map_fields",
            "audit",
            "audit",
            "audit"
        ]
    );
}

#[test]
fn bag_serves_concurrent_runs() {
    let (bag, _) = setup();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let bag = Arc::clone(&bag);
            std::thread::spawn(move || {
                let log = CallLog::new();
                let chain = ChainProcessor::new(
                    bag,
                    checker(),
                    MockResolver::recording(ALL_IDS.iter().copied(), &log),
                );
                let mut ctx = ExecutionContext::new("get");
                ctx.set("requestType", if i % 2 == 0 { "rest" } else { "soap" });
                chain.process(&mut ctx).unwrap();
                log.calls().len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 6);
    }
}
