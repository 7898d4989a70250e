//! Request Decode Tests
//!
//! Backend-side parsing of request lines, used here as the echo harness for
//! the encoder.

use tableproc::protocol::{
    decode_request, encode_request, Request, Service, TableOperation, Timestamp,
};
use tableproc::{DecodeError, ProtocolConfig};

fn all_operations() -> Vec<TableOperation> {
    let mut operations = vec![TableOperation::Open, TableOperation::Update, TableOperation::Close];
    for service in Service::ALL {
        operations.push(TableOperation::Lookup {
            service,
            key: format!("key-for-{}@example.org", service),
        });
        operations.push(TableOperation::Fetch { service });
    }
    operations
}

#[test]
fn test_encoded_requests_parse_back() {
    let config = ProtocolConfig::default();

    for (i, operation) in all_operations().into_iter().enumerate() {
        let request = Request {
            request_id: 0x1000 + i as u64,
            timestamp: Timestamp::new(1_600_000_000 + i as i64, 123),
            table: format!("table{}", i),
            operation,
        };
        let line = encode_request(&config, &request).unwrap();
        let decoded = decode_request(&config, line.as_bytes()).unwrap();

        assert_eq!(decoded.protocol_version, "0.1");
        assert_eq!(decoded.request, request);
    }
}

#[test]
fn test_decode_request_fields() {
    let config = ProtocolConfig::default();
    let decoded = decode_request(
        &config,
        b"table|0.1|1700000000.000005|000000000000002a|lookup|aliases|alias|postmaster\n",
    )
    .unwrap();

    assert_eq!(decoded.request.request_id, 42);
    assert_eq!(decoded.request.timestamp, Timestamp::new(1_700_000_000, 5));
    assert_eq!(decoded.request.table, "aliases");
    assert_eq!(
        decoded.request.operation,
        TableOperation::Lookup {
            service: Service::Alias,
            key: "postmaster".to_string(),
        }
    );
}

#[test]
fn test_decode_request_rejects_bad_lines() {
    let config = ProtocolConfig::default();

    let cases: [(&[u8], fn(&DecodeError) -> bool); 8] = [
        (b"table|0.1|1.000000|01|open", |e| {
            matches!(e, DecodeError::MalformedFraming(_))
        }),
        (b"tabel|0.1|1.000000|01|open|t", |e| {
            matches!(e, DecodeError::MalformedFraming(_))
        }),
        (b"table|0.1|1.5|01|open|t", |e| {
            matches!(e, DecodeError::MalformedFraming(_))
        }),
        (b"table|0.1|1.000000|xyz|open|t", |e| {
            *e == DecodeError::InvalidRequestId
        }),
        (b"table|0.1|1.000000|01|delete|t", |e| {
            matches!(e, DecodeError::UnknownEvent(_))
        }),
        (b"table|0.1|1.000000|01|lookup|t|bogus|k", |e| {
            matches!(e, DecodeError::UnknownService(_))
        }),
        (b"table|0.1|1.000000|01|open|t|extra", |e| {
            matches!(e, DecodeError::MalformedFraming(_))
        }),
        (b"table|0.1|1.000000|01|fetch|t", |e| {
            matches!(e, DecodeError::MalformedFraming(_))
        }),
    ];

    for (line, check) in cases {
        let err = decode_request(&config, line).unwrap_err();
        assert!(check(&err), "{:?} -> {:?}", String::from_utf8_lossy(line), err);
    }
}

#[test]
fn test_timestamp_parse() {
    assert_eq!("12.000001".parse::<Timestamp>().unwrap(), Timestamp::new(12, 1));
    assert!("12".parse::<Timestamp>().is_err());
    assert!("12.1".parse::<Timestamp>().is_err());
    assert!("x.000001".parse::<Timestamp>().is_err());
}
