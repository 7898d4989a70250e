//! Table Tests
//!
//! Tests verify:
//! - Each operation writes exactly one request line
//! - Request ids are consumed from the shared generator
//! - Write failures surface as I/O errors
//! - Concurrent requests never share an id or interleave bytes

use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use tableproc::protocol::{decode_request, RequestIdGenerator, Service, TableOperation, Timestamp};
use tableproc::{PendingRequests, ProtocolConfig, Table, TableError};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_table(name: &str) -> Table<Vec<u8>> {
    Table::new(
        name,
        Vec::new(),
        Arc::new(RequestIdGenerator::new()),
        ProtocolConfig::default(),
    )
    .unwrap()
}

fn written_lines(table: Table<Vec<u8>>) -> Vec<String> {
    String::from_utf8(table.into_sink())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Sink whose writes always fail
struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "backend gone"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_operations_write_one_line_each() {
    let table = setup_table("aliases");

    assert_eq!(table.open().unwrap(), 1);
    assert_eq!(table.lookup(Service::Alias, "root").unwrap(), 2);
    assert_eq!(table.fetch(Service::Source).unwrap(), 3);
    assert_eq!(table.update().unwrap(), 4);
    assert_eq!(table.close().unwrap(), 5);

    let lines = written_lines(table);
    assert_eq!(lines.len(), 5);

    let config = ProtocolConfig::default();
    let decoded: Vec<_> = lines
        .iter()
        .map(|line| decode_request(&config, line.as_bytes()).unwrap().request)
        .collect();

    assert_eq!(decoded[0].operation, TableOperation::Open);
    assert_eq!(
        decoded[1].operation,
        TableOperation::Lookup {
            service: Service::Alias,
            key: "root".to_string()
        }
    );
    assert_eq!(
        decoded[2].operation,
        TableOperation::Fetch {
            service: Service::Source
        }
    );
    assert_eq!(decoded[3].operation, TableOperation::Update);
    assert_eq!(decoded[4].operation, TableOperation::Close);

    for (i, request) in decoded.iter().enumerate() {
        assert_eq!(request.request_id, i as u64 + 1);
        assert_eq!(request.table, "aliases");
    }
}

#[test]
fn test_request_at_uses_given_timestamp() {
    let table = setup_table("domains");
    table
        .request_at(Timestamp::new(1_234, 56), TableOperation::Open)
        .unwrap();

    let lines = written_lines(table);
    assert_eq!(lines[0], "table|0.1|1234.000056|0000000000000001|open|domains");
}

#[test]
fn test_tables_share_generator() {
    let ids = Arc::new(RequestIdGenerator::with_seed(100));
    let config = ProtocolConfig::default();
    let a = Table::new("a", Vec::new(), Arc::clone(&ids), config.clone()).unwrap();
    let b = Table::new("b", Vec::new(), Arc::clone(&ids), config).unwrap();

    assert_eq!(a.open().unwrap(), 100);
    assert_eq!(b.open().unwrap(), 101);
    assert_eq!(a.close().unwrap(), 102);
}

#[test]
fn test_invalid_table_name_rejected() {
    for name in ["", "a|b", "a\nb"] {
        let result = Table::new(
            name,
            Vec::new(),
            Arc::new(RequestIdGenerator::new()),
            ProtocolConfig::default(),
        );
        assert!(matches!(result, Err(TableError::InvalidField { .. })));
    }
}

#[test]
fn test_invalid_key_writes_nothing() {
    let table = setup_table("aliases");
    let result = table.lookup(Service::Alias, "evil|key");
    assert!(matches!(result, Err(TableError::InvalidField { .. })));
    assert!(table.into_sink().is_empty());
}

#[test]
fn test_write_failure_is_io_error() {
    let table = Table::new(
        "aliases",
        BrokenPipe,
        Arc::new(RequestIdGenerator::new()),
        ProtocolConfig::default(),
    )
    .unwrap();

    let result = table.open();
    assert!(matches!(result, Err(TableError::Io(ref e)) if e.kind() == io::ErrorKind::BrokenPipe));
}

#[test]
fn test_submit_failure_unregisters() {
    let table = Table::new(
        "aliases",
        BrokenPipe,
        Arc::new(RequestIdGenerator::new()),
        ProtocolConfig::default(),
    )
    .unwrap();
    let pending = PendingRequests::new();

    assert!(table.submit(&pending, TableOperation::Open).is_err());
    assert!(pending.is_empty());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_ids_unique() {
    let ids = Arc::new(RequestIdGenerator::new());
    let mut handles = vec![];

    for _ in 0..8 {
        let ids = Arc::clone(&ids);
        handles.push(thread::spawn(move || {
            (0..1000).map(|_| ids.next_id()).collect::<Vec<u64>>()
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "duplicate id {}", id);
        }
    }
    assert_eq!(seen.len(), 8000);
    assert!(!seen.contains(&0));
}

#[test]
fn test_concurrent_requests_do_not_interleave() {
    let table = Arc::new(setup_table("credentials"));
    let mut handles = vec![];

    for t in 0..8 {
        let table = Arc::clone(&table);
        handles.push(thread::spawn(move || {
            (0..100)
                .map(|i| {
                    table
                        .lookup(Service::Credentials, format!("user{}-{}", t, i))
                        .unwrap()
                })
                .collect::<Vec<u64>>()
        }));
    }

    let mut sent = HashSet::new();
    for handle in handles {
        sent.extend(handle.join().unwrap());
    }
    assert_eq!(sent.len(), 800);

    let table = Arc::try_unwrap(table).ok().unwrap();
    let lines = written_lines(table);
    assert_eq!(lines.len(), 800);

    let config = ProtocolConfig::default();
    let received: HashSet<u64> = lines
        .iter()
        .map(|line| decode_request(&config, line.as_bytes()).unwrap().request.request_id)
        .collect();
    assert_eq!(received, sent);
}

#[test]
fn test_generator_seed_zero_skips_zero() {
    let ids = RequestIdGenerator::with_seed(0);
    assert_eq!(ids.next_id(), 1);

    let ids = RequestIdGenerator::with_seed(u64::MAX);
    assert_eq!(ids.next_id(), u64::MAX);
    assert_eq!(ids.next_id(), 1);
}
