use broadcast_core::{LogEntry, LogSink, Outcome, Severity, LOG_CAPACITY};
use ethers::types::{Address, TxHash};

#[test]
fn test_log_never_exceeds_capacity() {
    let mut sink = LogSink::new();
    for i in 0..(LOG_CAPACITY + 500) {
        sink.append(LogEntry::new(i.to_string(), Severity::Info));
        assert!(sink.len() <= LOG_CAPACITY);
    }

    let entries = sink.entries();
    assert_eq!(entries.len(), LOG_CAPACITY);
    assert_eq!(entries[0].message, (LOG_CAPACITY + 499).to_string());
    assert_eq!(entries[LOG_CAPACITY - 1].message, "500");

    // retained set is exactly the most recent entries, newest first
    for (offset, entry) in entries.iter().enumerate() {
        assert_eq!(entry.message, (LOG_CAPACITY + 499 - offset).to_string());
    }
}

#[test]
fn test_success_counter_is_monotonic() {
    let mut sink = LogSink::new();
    let mut last = 0;

    for i in 0..50u64 {
        let outcome = if i % 3 == 0 {
            Outcome::Failure {
                address: Address::zero(),
                kind: broadcast_core::ErrorKind::Generic,
                detail: "nonce too low".into(),
            }
        } else {
            Outcome::Success {
                address: Address::zero(),
                transaction_id: TxHash::from_low_u64_be(i),
            }
        };
        sink.record(&outcome);
        if i % 10 == 0 {
            sink.clear();
        }

        assert!(sink.success_count() >= last);
        last = sink.success_count();
    }

    assert_eq!(sink.success_count() + sink.failed_count(), 50);
    assert_eq!(sink.failed_count(), 17);
}
