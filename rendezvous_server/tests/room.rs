mod support;

use futures_util::StreamExt;
use rendezvous_server::AdmissionPolicy;
use std::time::Duration;
use support::{join, recv_json};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn third_client_is_turned_away() {
    let addr = support::spawn_server(AdmissionPolicy::room()).await;
    let (mut c1, _) = join(addr).await;
    let (mut c2, _) = join(addr).await;
    assert_eq!(recv_json(&mut c1).await["type"], "ready");
    assert_eq!(recv_json(&mut c2).await["type"], "ready");

    let mut c3 = support::connect(addr).await;
    let err = recv_json(&mut c3).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["message"], "Room is full");

    // Then the server closes it
    let next = timeout(Duration::from_secs(2), c3.next())
        .await
        .expect("timed out waiting for close");
    assert!(matches!(next, None | Some(Ok(Message::Close(_))) | Some(Err(_))));
}

#[tokio::test]
async fn newcomer_takes_the_free_slot() {
    let addr = support::spawn_server(AdmissionPolicy::room()).await;
    let (mut c1, _) = join(addr).await;
    let (mut c2, _) = join(addr).await;
    recv_json(&mut c1).await;
    recv_json(&mut c2).await;

    c2.close(None).await.expect("close");
    drop(c2);

    assert_eq!(recv_json(&mut c1).await["type"], "disconnected");

    let (mut c3, ack) = join(addr).await;
    assert_eq!(ack["totalClients"], 2);
    assert_eq!(recv_json(&mut c3).await["type"], "ready");
    assert_eq!(recv_json(&mut c1).await["type"], "ready");

    let offer = r#"{"type":"offer","sdp":"again"}"#;
    support::send(&mut c3, offer).await;
    assert_eq!(support::recv_text(&mut c1).await, offer);

    // And the room is full again
    let mut c4 = support::connect(addr).await;
    assert_eq!(recv_json(&mut c4).await["message"], "Room is full");
}
