//! End-to-end tests against the mock Aircall server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client over real
//! HTTP through the default ureq transport. Validates authentication, URL
//! building, status classification and response decoding together.

use std::net::SocketAddr;

use aircall::{
    AircallClient, ApiError, ContactInfo, ContactRequest, LinkCallRequest, Order, Paginate,
    Params, Search, TransferCallRequest, WebhookRequest,
};
use mock_server::{MOCK_ACCESS_TOKEN, MOCK_APP_ID, MOCK_APP_SECRET};

/// Each test gets its own server so mutations do not leak between tests.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn basic_client(addr: SocketAddr) -> AircallClient {
    AircallClient::new(MOCK_APP_ID, MOCK_APP_SECRET).with_base_url(&format!("http://{addr}"))
}

#[test]
fn ping_returns_raw_bytes_and_typed_pong() {
    let addr = start_server();
    let client = basic_client(addr);

    let raw = client.fetch("/ping", &Params::new()).unwrap();
    assert_eq!(raw, br#"{"ping":"pong"}"#);
    assert_eq!(client.ping().unwrap().ping, "pong");
}

#[test]
fn bearer_client_is_accepted() {
    let addr = start_server();
    let client =
        AircallClient::with_access_token(MOCK_ACCESS_TOKEN).with_base_url(&format!("http://{addr}"));

    assert_eq!(client.company().unwrap().company.name, "Acme Telephony");
}

#[test]
fn wrong_credentials_are_a_client_error() {
    let addr = start_server();
    let client = AircallClient::new(MOCK_APP_ID, "wrong").with_base_url(&format!("http://{addr}"));

    let err = client.ping().unwrap_err();
    assert!(matches!(err, ApiError::Client { status: 401, .. }));
    assert_eq!(err.to_string(), "client error: 401 Unauthorized");
}

#[test]
fn unknown_resource_is_not_found() {
    let addr = start_server();
    let client = basic_client(addr);

    let err = client.call(999).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("404"));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = basic_client(addr);

    let err = client.ping().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn users_and_numbers_paginate() {
    let addr = start_server();
    let client = basic_client(addr);

    let page = Paginate {
        page: Some(1),
        per_page: Some(1),
        ..Paginate::default()
    };
    let users = client.users(&page).unwrap();
    assert_eq!(users.meta.total, 2);
    assert_eq!(users.users.len(), 1);
    assert!(users.meta.next_page_link.is_some());

    let user = client.user(users.users[0].id).unwrap().user;
    assert!(!user.numbers.is_empty());

    let numbers = client.numbers(&Paginate::default()).unwrap();
    assert_eq!(numbers.meta.count, 2);
    let number = client.number(numbers.numbers[0].id).unwrap().number;
    assert!(!number.users.is_empty());
}

#[test]
fn call_operations() {
    let addr = start_server();
    let client = basic_client(addr);

    let filter = Paginate {
        order: Some(Order::Desc),
        from: Some(1_600_000_000),
        ..Paginate::default()
    };
    let calls = client.calls(&filter).unwrap();
    assert_eq!(calls.calls.len(), 3);
    let id = calls.calls[0].id;

    client.transfer_call(id, &TransferCallRequest { user_id: 2 }).unwrap();
    let call = client.call(id).unwrap().call;
    assert_eq!(call.assigned_to.map(|u| u.id), Some(2));

    client
        .link_call(
            id,
            &LinkCallRequest {
                link: "https://crm.example.com/tickets/1".to_string(),
            },
        )
        .unwrap();

    let err = client
        .transfer_call(id, &TransferCallRequest { user_id: 999 })
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
}

#[test]
fn contact_lifecycle() {
    let addr = start_server();
    let client = basic_client(addr);

    let before = client.contacts(&Paginate::default()).unwrap();
    assert_eq!(before.meta.total, 2);

    let request = ContactRequest {
        first_name: Some("Mary".to_string()),
        last_name: Some("Jackson".to_string()),
        phone_numbers: vec![ContactInfo {
            id: None,
            label: "Work".to_string(),
            value: "+1 555-0111".to_string(),
        }],
        emails: vec![ContactInfo {
            id: None,
            label: "Work".to_string(),
            value: "mary@example.com".to_string(),
        }],
        ..ContactRequest::default()
    };
    let created = client.create_contact(&request).unwrap().contact;
    assert_eq!(created.first_name.as_deref(), Some("Mary"));

    let fetched = client.contact(created.id).unwrap().contact;
    assert_eq!(fetched, created);

    let search = Search {
        phone_number: None,
        email: Some("mary@example.com".to_string()),
    };
    let found = client.search_contacts(&search, &Paginate::default()).unwrap();
    assert_eq!(found.contacts.len(), 1);
    assert_eq!(found.contacts[0].id, created.id);

    client.delete_contact(created.id).unwrap();
    let err = client.contact(created.id).unwrap_err();
    assert!(err.is_not_found());

    let err = client.delete_contact(created.id).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn webhook_lifecycle() {
    let addr = start_server();
    let client = basic_client(addr);

    let request = WebhookRequest {
        custom_name: Some("tickets".to_string()),
        url: Some("https://hooks.example.com/aircall".to_string()),
        events: Some(vec!["call.ended".to_string()]),
    };
    let created = client.create_webhook(&request).unwrap().webhook;
    assert!(created.active);
    assert_eq!(created.events, vec!["call.ended"]);

    let listed = client.webhooks(&Paginate::default()).unwrap();
    assert_eq!(listed.meta.total, 2);

    let rename = WebhookRequest {
        custom_name: Some("renamed".to_string()),
        ..WebhookRequest::default()
    };
    let updated = client.update_webhook(&created.webhook_id, &rename).unwrap().webhook;
    assert_eq!(updated.custom_name.as_deref(), Some("renamed"));
    assert_eq!(updated.url, created.url);

    assert_eq!(
        client.webhook(&created.webhook_id).unwrap().webhook,
        updated
    );

    client.delete_webhook(&created.webhook_id).unwrap();
    assert!(client.webhook(&created.webhook_id).unwrap_err().is_not_found());

    let err = client.create_webhook(&WebhookRequest::default()).unwrap_err();
    assert!(matches!(err, ApiError::Client { status: 422, .. }));
}

/// Answers one request with `200 OK` and `body`, then closes the connection.
fn serve_once(body: Vec<u8>) -> SocketAddr {
    use std::io::{BufRead, BufReader, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        loop {
            line.clear();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }
        let mut stream = reader.into_inner();
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
    });

    addr
}

#[test]
fn success_body_larger_than_ten_mebibytes_is_returned_whole() {
    let body: Vec<u8> = (0..11 * 1024 * 1024).map(|i| b'a' + (i % 26) as u8).collect();
    let addr = serve_once(body.clone());
    let client = basic_client(addr);

    let received = client.fetch("/calls", &Params::new()).unwrap();
    assert_eq!(received.len(), body.len());
    assert!(received == body);
}
