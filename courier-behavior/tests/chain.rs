use courier_behavior::*;
use courier_types::test_utils::EchoHandler;
use courier_types::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
#[error("insufficient stock for {sku}")]
struct OutOfStock {
    sku: String,
}

type Log = Arc<Mutex<Vec<String>>>;

fn recording_handler(log: &Log) -> impl RequestHandler + use<> {
    let log = Arc::clone(log);
    handler_fn(move |_ctx, request| {
        let log = Arc::clone(&log);
        Box::pin(async move {
            log.lock().unwrap().push("T".to_string());
            let response: Result<Response, BoxError> = Ok(json!({ "handled": request.name }));
            response
        })
    })
}

fn tag(log: &Log, name: &'static str) -> impl Behavior + use<> {
    let log = Arc::clone(log);
    behavior_fn(move |ctx, request, next| {
        let log = Arc::clone(&log);
        Box::pin(async move {
            log.lock().unwrap().push(name.to_string());
            next.run(ctx, request).await
        })
    })
}

#[tokio::test]
async fn higher_order_runs_before_lower_before_handler() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();
    registry.register_command_behavior(5, tag(&log, "B2")).unwrap();
    registry.register_command_behavior(10, tag(&log, "B1")).unwrap();

    let handler = recording_handler(&log);
    registry
        .execute(&Context::new(), Request::command("pay", json!(null)), &handler)
        .await
        .unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["B1", "B2", "T"]);
}

#[tokio::test]
async fn outer_behavior_mutation_reaches_caller() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();
    registry
        .register_command_behavior(
            10,
            behavior_fn(|ctx, request, next| {
                Box::pin(async move {
                    let mut response = next.run(ctx, request).await?;
                    response["stamped_by"] = json!("B1");
                    Ok(response)
                })
            }),
        )
        .unwrap();
    registry.register_command_behavior(5, tag(&log, "B2")).unwrap();

    let handler = recording_handler(&log);
    let response = registry
        .execute(&Context::new(), Request::command("pay", json!(null)), &handler)
        .await
        .unwrap();

    assert_eq!(response, json!({ "handled": "pay", "stamped_by": "B1" }));
}

#[tokio::test]
async fn outer_behavior_can_replace_an_error() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();
    registry
        .register_query_behavior(
            10,
            behavior_fn(|ctx, request, next| {
                Box::pin(async move {
                    match next.run(ctx, request).await {
                        Err(e) if e.is::<OutOfStock>() => Ok(json!({ "available": false })),
                        other => other,
                    }
                })
            }),
        )
        .unwrap();
    registry
        .register_query_behavior(
            5,
            behavior_fn(|_ctx, _request, _next| {
                Box::pin(async {
                    let err: Result<Response, BoxError> = Err(Box::new(OutOfStock {
                        sku: "A-1".into(),
                    }));
                    err
                })
            }),
        )
        .unwrap();

    let handler = recording_handler(&log);
    let response = registry
        .execute(&Context::new(), Request::query("stock", json!(null)), &handler)
        .await
        .unwrap();

    assert_eq!(response, json!({ "available": false }));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failing_behavior_stops_the_rest_of_the_chain() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();
    registry.register_command_behavior(10, tag(&log, "outer")).unwrap();
    registry
        .register_command_behavior(
            5,
            behavior_fn(|_ctx, request, _next| {
                Box::pin(async move {
                    let err: Result<Response, BoxError> = Err(Box::new(OutOfStock {
                        sku: request.name,
                    }));
                    err
                })
            }),
        )
        .unwrap();
    registry.register_command_behavior(1, tag(&log, "inner")).unwrap();

    let handler = recording_handler(&log);
    let err = registry
        .execute(&Context::new(), Request::command("B-7", json!(null)), &handler)
        .await
        .unwrap_err();

    // The error arrives unwrapped.
    let out = err.downcast_ref::<OutOfStock>().unwrap();
    assert_eq!(out.sku, "B-7");
    assert_eq!(*log.lock().unwrap(), vec!["outer"]);
}

#[tokio::test]
async fn short_circuit_without_error_skips_handler() {
    let registry = BehaviorRegistry::new();
    registry
        .register_query_behavior(
            1,
            behavior_fn(|_ctx, _request, _next| {
                Box::pin(async {
                    let cached: Result<Response, BoxError> = Ok(json!("cached"));
                    cached
                })
            }),
        )
        .unwrap();

    let handler = EchoHandler::new();
    let response = registry
        .execute(&Context::new(), Request::query("q", json!("fresh")), &handler)
        .await
        .unwrap();

    assert_eq!(response, json!("cached"));
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn handler_error_passes_through_unchanged() {
    let registry = BehaviorRegistry::new();
    registry
        .register_command_behavior(1, TracingBehavior::new())
        .unwrap();

    let handler = handler_fn(|_ctx, _request| {
        Box::pin(async {
            let err: Result<Response, BoxError> = Err(Box::new(OutOfStock { sku: "Z".into() }));
            err
        })
    });

    let err = registry
        .execute(&Context::new(), Request::command("c", json!(null)), &handler)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "insufficient stock for Z");
    assert!(err.is::<OutOfStock>());
}

#[tokio::test]
async fn context_reaches_every_layer_unmodified() {
    let seen = Arc::new(AtomicUsize::new(0));
    let registry = BehaviorRegistry::new();

    for order in [1, 2] {
        let seen = Arc::clone(&seen);
        registry
            .register_command_behavior(
                order,
                behavior_fn(move |ctx, request, next| {
                    let seen = Arc::clone(&seen);
                    Box::pin(async move {
                        if ctx.correlation_id.as_deref() == Some("corr-9") {
                            seen.fetch_add(1, Ordering::SeqCst);
                        }
                        next.run(ctx, request).await
                    })
                }),
            )
            .unwrap();
    }

    let handler = EchoHandler::new();
    let ctx = Context::new().with_correlation_id("corr-9");
    registry
        .execute(&ctx, Request::command("c", json!(null)), &handler)
        .await
        .unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn frozen_pipeline_runs_repeatedly() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let registry = BehaviorRegistry::new();
    registry.register_query_behavior(3, tag(&log, "a")).unwrap();
    registry.register_query_behavior(1, tag(&log, "b")).unwrap();

    let pipeline = registry.pipeline(RequestKind::Query);
    let handler = EchoHandler::new();
    let ctx = Context::new();
    for _ in 0..3 {
        pipeline
            .execute(&ctx, Request::query("q", json!(1)), &handler)
            .await
            .unwrap();
    }

    assert_eq!(log.lock().unwrap().len(), 6);
    assert_eq!(handler.calls(), 3);
}
