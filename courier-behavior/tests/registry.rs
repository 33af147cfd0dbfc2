use courier_behavior::*;
use courier_types::test_utils::EchoHandler;
use courier_types::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// A behavior that records its name and passes the request on.
struct NamedBehavior {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Behavior for NamedBehavior {
    fn handle<'a>(
        &'a self,
        ctx: &'a Context,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Response, BoxError>> {
        Box::pin(async move {
            self.log.lock().unwrap().push(self.name);
            next.run(ctx, request).await
        })
    }
}

fn named(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> NamedBehavior {
    NamedBehavior {
        name,
        log: Arc::clone(log),
    }
}

// --- Duplicate orders ---

#[tokio::test]
async fn duplicate_command_order_is_rejected_and_first_kept() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();

    registry
        .register_command_behavior(10, named("first", &log))
        .unwrap();
    let err = registry
        .register_command_behavior(10, named("second", &log))
        .unwrap_err();

    assert!(matches!(
        err,
        RegistrationError::DuplicateOrder {
            kind: RequestKind::Command,
            order: 10
        }
    ));
    assert_eq!(err.to_string(), "position 10 is taken by another command behavior");
    assert_eq!(registry.len(RequestKind::Command), 1);

    let handler = EchoHandler::new();
    registry
        .execute(&Context::new(), Request::command("c", json!(null)), &handler)
        .await
        .unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["first"]);
}

#[test]
fn duplicate_query_order_is_rejected() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();

    registry.register_query_behavior(0, named("a", &log)).unwrap();
    let err = registry
        .register_query_behavior(0, named("b", &log))
        .unwrap_err();

    assert!(matches!(
        err,
        RegistrationError::DuplicateOrder {
            kind: RequestKind::Query,
            order: 0
        }
    ));
}

#[test]
fn same_order_across_kinds_is_allowed() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();

    registry
        .register_command_behavior(7, named("cmd", &log))
        .unwrap();
    registry
        .register_query_behavior(7, named("query", &log))
        .unwrap();

    assert_eq!(registry.orders(RequestKind::Command), vec![7]);
    assert_eq!(registry.orders(RequestKind::Query), vec![7]);
}

#[test]
fn shared_behavior_can_serve_both_pipelines() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();
    let shared: Arc<dyn Behavior> = Arc::new(named("shared", &log));

    registry
        .register_arc(RequestKind::Command, 1, Arc::clone(&shared))
        .unwrap();
    registry
        .register_arc(RequestKind::Query, 1, shared)
        .unwrap();

    assert_eq!(registry.len(RequestKind::Command), 1);
    assert_eq!(registry.len(RequestKind::Query), 1);
}

// --- Sorting ---

#[test]
fn orders_are_descending_including_negative_and_zero() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();

    for order in [0, -5, 42, 3, -1] {
        registry
            .register(RequestKind::Command, order, named("x", &log))
            .unwrap();
    }

    assert_eq!(registry.orders(RequestKind::Command), vec![42, 3, 0, -1, -5]);
    assert_eq!(registry.sorted_behaviors(RequestKind::Command).len(), 5);
}

#[tokio::test]
async fn sorted_behaviors_run_highest_order_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();

    registry.register_query_behavior(-3, named("low", &log)).unwrap();
    registry.register_query_behavior(100, named("high", &log)).unwrap();
    registry.register_query_behavior(0, named("mid", &log)).unwrap();

    let handler = EchoHandler::new();
    registry
        .execute(&Context::new(), Request::query("q", json!(null)), &handler)
        .await
        .unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["high", "mid", "low"]);
}

#[tokio::test]
async fn enumeration_is_idempotent() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();
    registry.register_command_behavior(2, named("two", &log)).unwrap();
    registry.register_command_behavior(9, named("nine", &log)).unwrap();

    assert_eq!(
        registry.orders(RequestKind::Command),
        registry.orders(RequestKind::Command)
    );

    let handler = EchoHandler::new();
    for _ in 0..2 {
        registry
            .execute(&Context::new(), Request::command("c", json!(null)), &handler)
            .await
            .unwrap();
    }
    assert_eq!(*log.lock().unwrap(), vec!["nine", "two", "nine", "two"]);
}

// --- Kind routing ---

#[tokio::test]
async fn queries_skip_command_behaviors() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();
    registry
        .register_command_behavior(1, named("cmd-only", &log))
        .unwrap();

    let handler = EchoHandler::new();
    let response = registry
        .execute(&Context::new(), Request::query("q", json!(5)), &handler)
        .await
        .unwrap();

    assert_eq!(response, json!(5));
    assert!(log.lock().unwrap().is_empty());
}

// --- Concurrency ---

#[test]
fn concurrent_registration_keeps_orders_unique() {
    let registry = Arc::new(BehaviorRegistry::new());
    let log = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let log = Arc::clone(&log);
            std::thread::spawn(move || {
                (0..16)
                    .filter(|order| {
                        registry
                            .register_command_behavior(*order, named("t", &log))
                            .is_ok()
                    })
                    .count()
            })
        })
        .collect();

    let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(accepted, 16);
    assert_eq!(registry.len(RequestKind::Command), 16);
}
