use std::sync::{Arc, Mutex};
use std::time::Duration;

use frog::models::InjectedData;
use frog::root::{ConnectionMonitor, Root, RootView};
use serde_json::json;
use tokio::sync::watch;

#[tokio::test]
async fn blank_until_mounted() {
    let (_tx, connected) = watch::channel(true);
    let root = Root::new(connected);

    assert_eq!(root.view(), RootView::Blank);
}

#[tokio::test]
async fn api_payload_selects_embed_view() {
    let (_tx, connected) = watch::channel(true);
    let injected = Mutex::new(InjectedData {
        api: Some(json!({ "activityType": "ac-quiz" })),
        ..InjectedData::default()
    });
    let mut root = Root::new(connected);

    root.mount(&injected);

    assert_eq!(
        root.view(),
        RootView::Api {
            data: json!({ "activityType": "ac-quiz" }),
            disconnected: false,
        }
    );
    assert!(injected.lock().unwrap().api.is_none());
}

#[tokio::test]
async fn no_payload_selects_routed_app() {
    let (_tx, connected) = watch::channel(true);
    let mut root = Root::new(connected);

    root.mount(&Mutex::new(InjectedData::default()));

    assert_eq!(root.view(), RootView::App { disconnected: false });
}

#[tokio::test]
async fn poisoned_injected_data_is_still_read() {
    let (_tx, connected) = watch::channel(true);
    let injected = Arc::new(Mutex::new(InjectedData {
        api: Some(json!({ "activityType": "ac-quiz" })),
        ..InjectedData::default()
    }));
    let poisoner = injected.clone();
    let _ = std::thread::spawn(move || {
        let _guard = poisoner.lock().unwrap();
        panic!("poison the lock");
    })
    .join();
    assert!(injected.is_poisoned());

    let mut root = Root::new(connected);
    root.mount(&injected);

    assert!(matches!(root.view(), RootView::Api { .. }));
}

#[tokio::test]
async fn disconnection_shows_overlay() {
    let (tx, connected) = watch::channel(true);
    let mut root = Root::new(connected);
    root.mount(&Mutex::new(InjectedData::default()));

    tx.send(false).unwrap();

    assert_eq!(root.view(), RootView::App { disconnected: true });
}

#[tokio::test(start_paused = true)]
async fn monitor_ignores_status_during_grace_period() {
    let (status_tx, status) = watch::channel(false);
    let (mut connected, _task) = ConnectionMonitor::spawn(status, ConnectionMonitor::DEFAULT_GRACE);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(*connected.borrow());

    connected
        .wait_for(|c| !*c)
        .await
        .expect("monitor stopped");

    status_tx.send(true).unwrap();
    connected.wait_for(|c| *c).await.expect("monitor stopped");
}

#[tokio::test]
async fn monitor_stops_when_status_source_closes() {
    let (status_tx, status) = watch::channel(true);
    let (_connected, task) = ConnectionMonitor::spawn(status, Duration::ZERO);

    drop(status_tx);

    task.await.expect("monitor panicked");
}
