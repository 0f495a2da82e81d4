//! Session tests against a scripted SMSC on the far end of an in-memory stream

use crate::client::{
    ClientBuilder, ClientConfig, KeepAliveConfig, SessionHandle, SessionState, SmppError,
    SmsMessage,
};
use crate::codec::Frame;
use crate::connection::{Connection, FrameReader, FrameWriter};
use crate::datatypes::*;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::DuplexStream;
use tokio::time::Instant;

/// The SMSC side of a test session
struct MockSmsc {
    reader: FrameReader,
    writer: FrameWriter,
}

impl MockSmsc {
    fn new(stream: DuplexStream) -> Self {
        let (reader, writer) = Connection::new(stream).into_split();
        Self { reader, writer }
    }

    /// Next PDU from the client, `None` once it closed the stream
    async fn recv(&mut self) -> Option<Frame> {
        self.reader
            .read_frame()
            .await
            .unwrap()
            .map(|bytes| Frame::decode(&bytes).unwrap())
    }

    async fn expect(&mut self) -> Frame {
        self.recv().await.expect("client closed the connection")
    }

    async fn send(&mut self, frame: Frame) {
        self.send_raw(&frame.encode().unwrap()).await;
    }

    async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_frame(bytes).await.unwrap();
    }

    async fn accept_bind(&mut self) {
        match self.expect().await {
            Frame::Bind(bind) => {
                assert_eq!(bind.system_id, "test");
                assert_eq!(bind.password, "secret");
                self.send(Frame::BindResp(BindResponse::new(
                    bind.bind_type,
                    bind.sequence_number,
                    "mock-smsc",
                )))
                .await;
            }
            other => panic!("expected bind, got {:?}", other.command_id()),
        }
    }

    async fn expect_submit(&mut self) -> SubmitSm {
        match self.expect().await {
            Frame::SubmitSm(submit) => *submit,
            other => panic!("expected submit_sm, got {:?}", other.command_id()),
        }
    }

    async fn accept_unbind(&mut self) {
        match self.expect().await {
            Frame::Unbind(unbind) => {
                self.send(Frame::UnbindResp(UnbindResponse::new(unbind.sequence_number)))
                    .await;
            }
            other => panic!("expected unbind, got {:?}", other.command_id()),
        }
    }
}

fn test_config() -> ClientConfig {
    ClientConfig::new("localhost", "test", "secret").keep_alive(KeepAliveConfig::disabled())
}

fn open(config: ClientConfig) -> (SessionHandle, MockSmsc) {
    let (client_io, smsc_io) = tokio::io::duplex(64 * 1024);
    let handle = ClientBuilder::new(config).open_stream(client_io).unwrap();
    (handle, MockSmsc::new(smsc_io))
}

async fn bound(config: ClientConfig) -> (SessionHandle, MockSmsc) {
    let (handle, mut smsc) = open(config);
    let (result, ()) = tokio::join!(handle.bind(), smsc.accept_bind());
    result.unwrap();
    (handle, smsc)
}

#[tokio::test]
async fn bind_transceiver_reaches_bound() {
    let (handle, mut smsc) = open(test_config());
    assert_eq!(handle.state(), SessionState::Unbound);

    let (result, bind) = tokio::join!(handle.bind(), async {
        let frame = smsc.expect().await;
        let Frame::Bind(bind) = &frame else {
            panic!("expected bind, got {:?}", frame.command_id());
        };
        smsc.send(Frame::BindResp(BindResponse::new(
            bind.bind_type,
            bind.sequence_number,
            "mock-smsc",
        )))
        .await;
        bind.clone()
    });

    result.unwrap();
    assert_eq!(bind.bind_type, BindType::Transceiver);
    assert_eq!(bind.interface_version, InterfaceVersion::SmppV34);
    assert_eq!(handle.state(), SessionState::Bound);
    assert_eq!(handle.bind_type(), Some(BindType::Transceiver));
}

#[tokio::test]
async fn submit_returns_message_id() {
    let (handle, mut smsc) = bound(test_config()).await;

    let send = handle.send_sms("TEST", "+491701234567", "Hello SMPP 0");
    let (result, ()) = tokio::join!(send, async {
        let submit = smsc.expect_submit().await;
        assert_eq!(submit.source_addr, "TEST");
        assert_eq!(submit.destination_addr, "+491701234567");
        assert_eq!(submit.source_addr_ton, TypeOfNumber::International);
        assert_eq!(submit.dest_addr_npi, NumericPlanIndicator::Isdn);
        assert_eq!(&submit.short_message[..], b"Hello SMPP 0");
        smsc.send(Frame::SubmitSmResp(SubmitSmResponse::new(
            submit.sequence_number,
            "abc123",
        )))
        .await;
    });

    assert_eq!(result.unwrap(), "abc123");
    assert_eq!(handle.pending_requests(), 0);
}

#[tokio::test]
async fn submit_rejection_carries_status() {
    let (handle, mut smsc) = bound(test_config()).await;

    let (result, ()) = tokio::join!(handle.send_sms("1234", "5678", "hello"), async {
        let submit = smsc.expect_submit().await;
        smsc.send(Frame::SubmitSmResp(SubmitSmResponse::error(
            submit.sequence_number,
            CommandStatus::SystemError,
        )))
        .await;
    });

    match result {
        Err(SmppError::SubmitRejected { status }) => assert_eq!(status.code(), 0x0000_0008),
        other => panic!("expected SubmitRejected, got {other:?}"),
    }
    assert_eq!(handle.state(), SessionState::Bound);
}

#[tokio::test(start_paused = true)]
async fn unanswered_submit_times_out_and_session_stays_usable() {
    let config = test_config().submit_timeout(Duration::from_millis(100));
    let (handle, mut smsc) = bound(config).await;

    let started = Instant::now();
    let (result, ignored) = tokio::join!(
        handle.send_sms("1234", "5678", "lost"),
        smsc.expect_submit()
    );

    assert!(matches!(result, Err(SmppError::RequestTimeout)));
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(handle.state(), SessionState::Bound);
    assert_eq!(handle.pending_requests(), 0);

    // A late answer to the abandoned request is dropped
    smsc.send(Frame::SubmitSmResp(SubmitSmResponse::new(
        ignored.sequence_number,
        "late",
    )))
    .await;

    let (result, ()) = tokio::join!(handle.send_sms("1234", "5678", "again"), async {
        let submit = smsc.expect_submit().await;
        assert_ne!(submit.sequence_number, ignored.sequence_number);
        smsc.send(Frame::SubmitSmResp(SubmitSmResponse::new(
            submit.sequence_number,
            "def456",
        )))
        .await;
    });
    assert_eq!(result.unwrap(), "def456");
}

#[tokio::test]
async fn peer_close_fails_every_pending_submit() {
    let (handle, mut smsc) = bound(test_config()).await;

    let first = tokio::spawn({
        let handle = handle.clone();
        async move { handle.send_sms("1234", "5678", "one").await }
    });
    let second = tokio::spawn({
        let handle = handle.clone();
        async move { handle.send_sms("1234", "5679", "two").await }
    });

    smsc.expect_submit().await;
    smsc.expect_submit().await;
    drop(smsc);

    assert!(matches!(first.await.unwrap(), Err(SmppError::ConnectionClosed)));
    assert!(matches!(second.await.unwrap(), Err(SmppError::ConnectionClosed)));

    handle.wait_closed().await;
    assert_eq!(handle.state(), SessionState::Closed);
    assert_eq!(handle.pending_requests(), 0);
}

#[tokio::test]
async fn concurrent_submits_match_out_of_order_responses() {
    let (handle, mut smsc) = bound(test_config()).await;

    let users: Vec<_> = (0..20)
        .map(|vu| {
            let handle = handle.clone();
            tokio::spawn(async move {
                let to = format!("4470000{vu:04}");
                let message_id = handle.send_sms("1234", &to, "load").await.unwrap();
                (to, message_id)
            })
        })
        .collect();

    // The default window lets ten requests out at a time
    for _ in 0..2 {
        let mut batch = Vec::new();
        for _ in 0..10 {
            batch.push(smsc.expect_submit().await);
        }
        for submit in batch.into_iter().rev() {
            smsc.send(Frame::SubmitSmResp(SubmitSmResponse::new(
                submit.sequence_number,
                &format!("id-{}", submit.destination_addr),
            )))
            .await;
        }
    }

    for user in users {
        let (to, message_id) = user.await.unwrap();
        assert_eq!(message_id, format!("id-{to}"));
    }
    assert_eq!(handle.pending_requests(), 0);
}

#[tokio::test]
async fn commands_are_gated_by_state() {
    let (handle, mut smsc) = open(test_config());

    match handle.send_sms("1234", "5678", "too early").await {
        Err(SmppError::InvalidState { state, command }) => {
            assert_eq!(state, SessionState::Unbound);
            assert_eq!(command, CommandId::SubmitSm);
        }
        other => panic!("expected InvalidState, got {other:?}"),
    }

    let (result, ()) = tokio::join!(handle.bind(), smsc.accept_bind());
    result.unwrap();

    assert!(matches!(
        handle.bind().await,
        Err(SmppError::InvalidState {
            state: SessionState::Bound,
            ..
        })
    ));
}

#[tokio::test]
async fn receiver_bind_cannot_submit() {
    let (handle, _smsc) = bound(test_config().bind(BindType::Receiver)).await;

    assert_eq!(handle.bind_type(), Some(BindType::Receiver));
    assert!(matches!(
        handle.send_sms("1234", "5678", "nope").await,
        Err(SmppError::InvalidState {
            command: CommandId::SubmitSm,
            ..
        })
    ));
}

#[tokio::test]
async fn invalid_input_is_rejected_before_sending() {
    let (handle, _smsc) = bound(test_config()).await;

    assert!(matches!(
        handle.send_sms("", "5678", "hello").await,
        Err(SmppError::InvalidData(_))
    ));
    assert!(matches!(
        handle.send_sms("1234", &"9".repeat(21), "hello").await,
        Err(SmppError::InvalidData(_))
    ));
    assert!(matches!(
        handle.send_sms("1234", "5678", &"x".repeat(255)).await,
        Err(SmppError::InvalidData(_))
    ));
    assert_eq!(handle.pending_requests(), 0);
}

#[tokio::test]
async fn rejected_bind_returns_to_unbound() {
    let (handle, mut smsc) = open(test_config());

    let (result, ()) = tokio::join!(handle.bind(), async {
        let bind = smsc.expect().await;
        smsc.send(Frame::BindResp(BindResponse::error(
            BindType::Transceiver,
            bind.sequence_number(),
            CommandStatus::InvalidPassword,
        )))
        .await;
    });

    assert!(matches!(
        result,
        Err(SmppError::BindRejected {
            status: CommandStatus::InvalidPassword
        })
    ));
    assert_eq!(handle.state(), SessionState::Unbound);

    // The caller may retry
    let (result, ()) = tokio::join!(handle.bind(), smsc.accept_bind());
    result.unwrap();
    assert_eq!(handle.state(), SessionState::Bound);
}

#[tokio::test]
async fn connect_stream_closes_on_bind_failure() {
    let (client_io, smsc_io) = tokio::io::duplex(4096);
    let mut smsc = MockSmsc::new(smsc_io);

    let (result, ()) = tokio::join!(
        ClientBuilder::new(test_config()).connect_stream(client_io),
        async {
            let bind = smsc.expect().await;
            smsc.send(Frame::GenericNack(GenericNack::error(
                bind.sequence_number(),
                CommandStatus::BindFailed,
            )))
            .await;
            assert!(smsc.recv().await.is_none());
        }
    );

    assert!(matches!(
        result,
        Err(SmppError::BindRejected {
            status: CommandStatus::BindFailed
        })
    ));
}

#[tokio::test]
async fn peer_enquire_link_is_answered() {
    let (handle, mut smsc) = bound(test_config()).await;

    smsc.send(Frame::EnquireLink(EnquireLink::new(42))).await;
    match smsc.expect().await {
        Frame::EnquireLinkResp(resp) => {
            assert_eq!(resp.sequence_number, 42);
            assert_eq!(resp.command_status, CommandStatus::Ok);
        }
        other => panic!("expected enquire_link_resp, got {:?}", other.command_id()),
    }
    assert_eq!(handle.state(), SessionState::Bound);
}

#[tokio::test]
async fn deliver_sm_goes_to_handler_and_is_acknowledged() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let config = test_config();
    let (client_io, smsc_io) = tokio::io::duplex(64 * 1024);
    let handle = ClientBuilder::new(config)
        .deliver_handler({
            let received = received.clone();
            move |pdu: &DeliverSm| {
                if pdu.short_message.is_empty() {
                    return CommandStatus::InvalidMsgLength;
                }
                received.lock().push(pdu.receipted_message_id());
                CommandStatus::Ok
            }
        })
        .open_stream(client_io)
        .unwrap();
    let mut smsc = MockSmsc::new(smsc_io);
    let (result, ()) = tokio::join!(handle.bind(), smsc.accept_bind());
    result.unwrap();

    let receipt = DeliverSm::new("5678", "1234", &b"id:abc123 sub:001 dlvrd:001 stat:DELIVRD"[..])
        .sequence_number(7)
        .esm_class(0x04)
        .tlvs(vec![Tlv::new(0x001E, &b"abc123\0"[..])]);
    smsc.send(Frame::DeliverSm(Box::new(receipt))).await;

    match smsc.expect().await {
        Frame::DeliverSmResp(resp) => {
            assert_eq!(resp.sequence_number, 7);
            assert_eq!(resp.command_status, CommandStatus::Ok);
        }
        other => panic!("expected deliver_sm_resp, got {:?}", other.command_id()),
    }

    let empty = DeliverSm::new("5678", "1234", &b""[..]).sequence_number(8);
    smsc.send(Frame::DeliverSm(Box::new(empty))).await;
    match smsc.expect().await {
        Frame::DeliverSmResp(resp) => {
            assert_eq!(resp.sequence_number, 8);
            assert_eq!(resp.command_status, CommandStatus::InvalidMsgLength);
        }
        other => panic!("expected deliver_sm_resp, got {:?}", other.command_id()),
    }

    assert_eq!(*received.lock(), vec![Some("abc123".to_string())]);
}

#[tokio::test]
async fn deliver_sm_without_handler_is_acknowledged() {
    let (_handle, mut smsc) = bound(test_config()).await;

    let mo = DeliverSm::new("5678", "1234", &b"reply"[..]).sequence_number(3);
    smsc.send(Frame::DeliverSm(Box::new(mo))).await;

    match smsc.expect().await {
        Frame::DeliverSmResp(resp) => {
            assert_eq!(resp.sequence_number, 3);
            assert_eq!(resp.command_status, CommandStatus::Ok);
        }
        other => panic!("expected deliver_sm_resp, got {:?}", other.command_id()),
    }
}

#[tokio::test]
async fn deliver_sm_with_unlisted_numbering_plan_is_acknowledged() {
    let seen = Arc::new(Mutex::new(None));
    let (client_io, smsc_io) = tokio::io::duplex(64 * 1024);
    let handle = ClientBuilder::new(test_config())
        .deliver_handler({
            let seen = seen.clone();
            move |pdu: &DeliverSm| {
                *seen.lock() = Some(pdu.source_addr_npi);
                CommandStatus::Ok
            }
        })
        .open_stream(client_io)
        .unwrap();
    let mut smsc = MockSmsc::new(smsc_io);
    let (result, ()) = tokio::join!(handle.bind(), smsc.accept_bind());
    result.unwrap();

    let mut mo = DeliverSm::new("5678", "1234", &b"reply"[..]).sequence_number(77);
    mo.source_addr_npi = NumericPlanIndicator::Other(0x05);
    smsc.send(Frame::DeliverSm(Box::new(mo))).await;

    match smsc.expect().await {
        Frame::DeliverSmResp(resp) => {
            assert_eq!(resp.sequence_number, 77);
            assert_eq!(resp.command_status, CommandStatus::Ok);
        }
        other => panic!("expected deliver_sm_resp, got {:?}", other.command_id()),
    }
    assert_eq!(*seen.lock(), Some(NumericPlanIndicator::Other(0x05)));
    assert_eq!(handle.state(), SessionState::Bound);
}

#[tokio::test]
async fn peer_unbind_closes_the_session() {
    let (handle, mut smsc) = bound(test_config()).await;

    smsc.send(Frame::Unbind(Unbind::new(9))).await;
    match smsc.expect().await {
        Frame::UnbindResp(resp) => assert_eq!(resp.sequence_number, 9),
        other => panic!("expected unbind_resp, got {:?}", other.command_id()),
    }
    assert!(smsc.recv().await.is_none());

    handle.wait_closed().await;
    assert_eq!(handle.state(), SessionState::Closed);
    assert!(matches!(
        handle.send_sms("1234", "5678", "after unbind").await,
        Err(SmppError::InvalidState {
            state: SessionState::Closed,
            ..
        })
    ));
}

#[tokio::test]
async fn unknown_request_gets_generic_nack() {
    let (handle, mut smsc) = bound(test_config()).await;

    #[rustfmt::skip]
    let unknown = [
        0x00, 0x00, 0x00, 0x10, // command_length
        0x00, 0x00, 0x00, 0x99, // command_id
        0x00, 0x00, 0x00, 0x00, // command_status
        0x00, 0x00, 0x00, 0x05, // sequence_number
    ];
    smsc.send_raw(&unknown).await;

    match smsc.expect().await {
        Frame::GenericNack(nack) => {
            assert_eq!(nack.sequence_number, 5);
            assert_eq!(nack.command_status, CommandStatus::InvalidCommandId);
        }
        other => panic!("expected generic_nack, got {:?}", other.command_id()),
    }
    assert_eq!(handle.state(), SessionState::Bound);
}

#[tokio::test]
async fn repeated_decode_failures_close_the_session() {
    let (handle, mut smsc) = bound(test_config().max_decode_failures(2)).await;

    // Unknown responses are dropped without a reply
    #[rustfmt::skip]
    let unknown_response = [
        0x00, 0x00, 0x00, 0x10,
        0x80, 0x00, 0x00, 0x99,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x05,
    ];
    smsc.send_raw(&unknown_response).await;
    smsc.send_raw(&unknown_response).await;

    handle.wait_closed().await;
    assert_eq!(handle.state(), SessionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn keep_alive_closes_unresponsive_session() {
    let config = test_config().keep_alive(
        KeepAliveConfig::new(Duration::from_secs(1))
            .with_timeout(Duration::from_millis(500))
            .with_max_failures(2),
    );
    let (handle, mut smsc) = bound(config).await;

    let ignored = tokio::spawn(async move {
        let mut enquire_links = 0;
        while let Some(frame) = smsc.recv().await {
            assert_eq!(frame.command_id(), CommandId::EnquireLink);
            enquire_links += 1;
        }
        enquire_links
    });

    handle.wait_closed().await;
    assert_eq!(ignored.await.unwrap(), 2);

    let status = handle.keep_alive_status();
    assert_eq!(status.total_pings, 2);
    assert_eq!(status.total_pongs, 0);
    assert_eq!(status.consecutive_failures, 2);
}

#[tokio::test(start_paused = true)]
async fn keep_alive_runs_while_peer_answers() {
    let config = test_config().keep_alive(KeepAliveConfig::new(Duration::from_secs(1)));
    let (handle, mut smsc) = bound(config).await;

    let responder = tokio::spawn(async move {
        while let Some(frame) = smsc.recv().await {
            match frame {
                Frame::EnquireLink(ping) => {
                    smsc.send(Frame::EnquireLinkResp(EnquireLinkResponse::new(
                        ping.sequence_number,
                    )))
                    .await
                }
                Frame::Unbind(unbind) => {
                    smsc.send(Frame::UnbindResp(UnbindResponse::new(unbind.sequence_number)))
                        .await
                }
                other => panic!("unexpected {:?}", other.command_id()),
            }
        }
    });

    tokio::time::sleep(Duration::from_millis(3500)).await;

    let status = handle.keep_alive_status();
    assert!(status.running);
    assert_eq!(status.total_pings, 3);
    assert_eq!(status.total_pongs, 3);
    assert_eq!(status.consecutive_failures, 0);
    assert_eq!(handle.state(), SessionState::Bound);

    handle.close().await;
    responder.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn keep_alive_is_not_held_back_by_a_full_window() {
    let config = test_config()
        .window_size(1)
        .submit_timeout(Duration::from_secs(60))
        .keep_alive(
            KeepAliveConfig::new(Duration::from_secs(1))
                .with_timeout(Duration::from_millis(500))
                .with_max_failures(2),
        );
    let (handle, mut smsc) = bound(config).await;

    let stuck = tokio::spawn({
        let handle = handle.clone();
        async move { handle.send_sms("1234", "5678", "never answered").await }
    });

    // Answers keep-alive and unbind, leaves the submit hanging
    let responder = tokio::spawn(async move {
        let mut submits = 0;
        while let Some(frame) = smsc.recv().await {
            match frame {
                Frame::SubmitSm(_) => submits += 1,
                Frame::EnquireLink(ping) => {
                    smsc.send(Frame::EnquireLinkResp(EnquireLinkResponse::new(
                        ping.sequence_number,
                    )))
                    .await
                }
                Frame::Unbind(unbind) => {
                    smsc.send(Frame::UnbindResp(UnbindResponse::new(unbind.sequence_number)))
                        .await
                }
                other => panic!("unexpected {:?}", other.command_id()),
            }
        }
        submits
    });

    tokio::time::sleep(Duration::from_millis(3500)).await;

    let status = handle.keep_alive_status();
    assert_eq!(status.total_pings, 3);
    assert_eq!(status.total_pongs, 3);
    assert_eq!(status.consecutive_failures, 0);
    assert_eq!(handle.state(), SessionState::Bound);
    assert_eq!(handle.pending_requests(), 1);

    // The unbind does not wait for the window either
    handle.close().await;
    assert!(matches!(stuck.await.unwrap(), Err(SmppError::ConnectionClosed)));
    assert_eq!(responder.await.unwrap(), 1);
}

#[tokio::test]
async fn manual_enquire_link_is_counted() {
    let (handle, mut smsc) = bound(test_config()).await;

    let (result, ()) = tokio::join!(handle.enquire_link(), async {
        let ping = smsc.expect().await;
        assert_eq!(ping.command_id(), CommandId::EnquireLink);
        smsc.send(Frame::EnquireLinkResp(EnquireLinkResponse::new(
            ping.sequence_number(),
        )))
        .await;
    });

    result.unwrap();
    let status = handle.keep_alive_status();
    assert_eq!(status.total_pings, 1);
    assert_eq!(status.total_pongs, 1);
    assert!(!status.running);
}

#[tokio::test]
async fn close_unbinds_once_and_is_idempotent() {
    let (handle, mut smsc) = bound(test_config()).await;

    let smsc_task = tokio::spawn(async move {
        smsc.accept_unbind().await;
        assert!(smsc.recv().await.is_none());
    });

    handle.close().await;
    handle.close().await;
    smsc_task.await.unwrap();

    assert_eq!(handle.state(), SessionState::Closed);
    assert!(matches!(
        handle.bind().await,
        Err(SmppError::InvalidState {
            state: SessionState::Closed,
            ..
        })
    ));
}

#[tokio::test]
async fn close_before_bind_skips_unbind() {
    let (handle, mut smsc) = open(test_config());

    handle.close().await;

    assert!(smsc.recv().await.is_none());
    assert_eq!(handle.state(), SessionState::Closed);
}

#[tokio::test]
async fn send_message_uses_message_options() {
    let (handle, mut smsc) = bound(test_config()).await;

    let message = SmsMessage::builder()
        .to("5678")
        .from("INFO")
        .text("options")
        .priority(PriorityFlag::Level2)
        .with_delivery_receipt()
        .source_numbering(TypeOfNumber::Alphanumeric, NumericPlanIndicator::Unknown)
        .build()
        .unwrap();

    let (result, ()) = tokio::join!(handle.send_message(&message), async {
        let submit = smsc.expect_submit().await;
        assert_eq!(submit.source_addr_ton, TypeOfNumber::Alphanumeric);
        assert_eq!(submit.source_addr_npi, NumericPlanIndicator::Unknown);
        assert_eq!(submit.priority_flag, PriorityFlag::Level2);
        assert_eq!(submit.registered_delivery, 1);
        smsc.send(Frame::SubmitSmResp(SubmitSmResponse::new(
            submit.sequence_number,
            "opt-1",
        )))
        .await;
    });

    assert_eq!(result.unwrap(), "opt-1");
}

#[tokio::test]
async fn script_options_drive_the_session() {
    let config: ClientConfig = serde_json::from_value(serde_json::json!({
        "host": "localhost",
        "system_id": "test",
        "password": "secret",
        "bind": "transmitter",
        "enquireIntervalMs": 0,
        "windowSize": 2,
    }))
    .unwrap();

    let (handle, _smsc) = bound(config).await;
    assert_eq!(handle.bind_type(), Some(BindType::Transmitter));
    assert!(!handle.keep_alive_status().running);
}
