//! Driver broadcaster and rider poller against a live server on a loopback port

use std::time::Duration;

use campus_bus_app::api::{serve_with_listener, AppState};
use campus_bus_app::client::{BroadcastSession, Broadcaster, FleetClient, Poller, SampleFeed};
use campus_bus_app::config::Config;
use campus_bus_app::constants::default_seed;
use campus_bus_domain::model::{FleetSource, GeoSample, PositionReport};
use campus_bus_types::{BusStatus, TransportError};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    client: FleetClient,
    stop: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("addr");
        let state = AppState::new(Config::default(), default_seed(), None).expect("state");
        let (stop, stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            serve_with_listener(listener, state, async {
                let _ = stopped.await;
            })
            .await
            .expect("serve");
        });

        let client = FleetClient::new(&format!("http://{address}")).expect("client");
        Self {
            client,
            stop: Some(stop),
            handle,
        }
    }

    async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.handle.await.expect("server task");
    }
}

#[tokio::test]
async fn client_round_trip() {
    let server = TestServer::start().await;
    let client = &server.client;

    let health = client.health().await.expect("health");
    assert_eq!(health["status"], "online");

    let ack = client
        .report(&PositionReport::new("b2", "Mirpur - DSC", 23.82, 90.36, 30, BusStatus::Late))
        .await
        .expect("report");
    assert_eq!(ack.bus_id, "b2");

    let b2 = client.bus("b2").await.expect("bus");
    assert_eq!(b2.source, FleetSource::Live);
    assert_eq!(b2.occupancy, 30);

    let mirpur = client.locations(Some("Mirpur - DSC")).await.expect("locations");
    assert_eq!(mirpur.len(), 1);

    let routes = client.routes().await.expect("routes");
    assert_eq!(routes.len(), 5);

    let stats = client.stats().await.expect("stats");
    assert_eq!(stats.live_buses, 1);

    match client.bus("missing").await {
        Err(TransportError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected 404, got {other:?}"),
    }

    let err = client
        .report(&PositionReport::new("b2", "Mirpur - DSC", 123.0, 90.36, 30, BusStatus::Late))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Status { status: 400, .. }));

    server.shutdown().await;
}

#[tokio::test]
async fn broadcast_is_seen_by_poller() {
    let server = TestServer::start().await;

    let mut poller = Poller::new(server.client.clone(), None, Duration::from_millis(10));
    let initial = poller.poll_once().await.expect("poll");
    assert_eq!(initial.added.len(), 3);

    let session = BroadcastSession {
        bus_id: "b1".to_string(),
        route: "Uttara - DSC".to_string(),
        occupancy: 18,
        status: BusStatus::OnTime,
    };
    let feed = SampleFeed::from_samples(vec![GeoSample::at(23.90, 90.32), GeoSample::at(23.91, 90.33)])
        .expect("feed");
    let mut broadcaster =
        Broadcaster::new(server.client.clone(), session, feed, Duration::from_millis(10));
    let stats = broadcaster.run(Some(2), std::future::pending()).await;
    assert_eq!(stats.published, 2);

    let diff = poller.poll_once().await.expect("poll");
    assert_eq!(diff.updated.len(), 1);
    let b1 = &diff.updated[0];
    assert_eq!(b1.bus_id, "b1");
    assert_eq!(b1.source, FleetSource::Live);
    assert_eq!(b1.position.lat, 23.91);

    // ending the broadcast does not retract the last position
    let again = poller.poll_once().await.expect("poll");
    assert!(again.is_empty());
    assert_eq!(
        poller.current().iter().find(|e| e.bus_id == "b1").expect("b1").occupancy,
        18
    );

    server.shutdown().await;
}

#[tokio::test]
async fn broadcaster_survives_server_outage() {
    let client = FleetClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).expect("client");
    let session = BroadcastSession {
        bus_id: "b1".to_string(),
        route: "Uttara - DSC".to_string(),
        occupancy: 5,
        status: BusStatus::OnTime,
    };
    let mut broadcaster = Broadcaster::new(
        client,
        session,
        SampleFeed::fixed(GeoSample::at(23.9, 90.3)),
        Duration::from_millis(5),
    );
    let stats = broadcaster.run(Some(2), std::future::pending()).await;
    assert_eq!(stats.ticks, 2);
    assert_eq!(stats.failed, 2);
}
