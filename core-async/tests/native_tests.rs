//! Integration tests for the runtime shims the pipeline relies on.

use core_async::{runtime, sync, task, time};

#[tokio::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    let result = handle.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_unbounded_channel_preserves_order_across_tasks() {
    let (tx, mut rx) = sync::mpsc::unbounded_channel();

    let producer = task::spawn(async move {
        for i in 0..100 {
            tx.send(i).unwrap();
        }
    });
    producer.await.unwrap();

    let mut received = Vec::new();
    while let Some(value) = rx.recv().await {
        received.push(value);
    }

    assert_eq!(received, (0..100).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_weak_sender_does_not_keep_queue_open() {
    let (tx, mut rx) = sync::mpsc::unbounded_channel::<u8>();
    let weak = tx.downgrade();

    weak.upgrade().unwrap().send(1).unwrap();
    drop(tx);

    assert_eq!(rx.recv().await, Some(1));
    assert_eq!(rx.recv().await, None);
    assert!(weak.upgrade().is_none());
}

#[tokio::test]
async fn test_oneshot_channel() {
    let (tx, rx) = sync::oneshot::channel();

    task::spawn(async move {
        time::sleep(time::Duration::from_millis(10)).await;
        tx.send(42).unwrap();
    });

    let result = rx.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_timeout_success() {
    let result = time::timeout(time::Duration::from_millis(100), async {
        time::sleep(time::Duration::from_millis(10)).await;
        42
    })
    .await;

    assert_eq!(result.unwrap(), 42);
}

#[tokio::test]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(100)).await;
        42
    })
    .await;

    assert!(result.is_err());
}

#[test]
fn test_block_on_outside_runtime() {
    let value = runtime::block_on(async { 7 }).unwrap();
    assert_eq!(value, 7);
}
