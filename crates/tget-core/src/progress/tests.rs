use super::*;
use std::time::Duration;

fn reporter() -> ProgressReporter {
    ProgressReporter::hidden(Theme::plain())
}

#[test]
fn stats_before_bar_are_ignored() {
    let mut r = reporter();
    r.update_progress(10);
    r.display_stats(10, 3, 100);
    r.complete_bar();
    assert!(!r.transfer_started());
    assert!(r.status().is_none());
    assert!(!r.bar_finished());
}

#[test]
fn new_bar_starts_at_zero() {
    let mut r = reporter();
    r.create_bar(1000, "Downloading");
    assert!(r.transfer_started());
    assert_eq!(r.position(), Some(0));
    assert_eq!(r.status(), Some(&TransferStatus::Starting));
    assert_eq!(r.throughput(), Some(0.0));
}

#[test]
fn no_peers_and_incomplete_is_waiting() {
    let mut r = reporter();
    r.create_bar(1000, "Downloading");
    r.display_stats(100, 0, 1000);
    assert_eq!(r.status(), Some(&TransferStatus::WaitingForPeers));
}

#[test]
fn live_stats_carry_peers_and_rate() {
    let t0 = Instant::now();
    let mut r = reporter();
    r.create_bar_at(10_000, "Downloading", t0);
    r.display_stats_at(2000, 4, 10_000, t0 + Duration::from_secs(1));
    match r.status() {
        Some(TransferStatus::Live {
            peers,
            bytes_per_sec,
        }) => {
            assert_eq!(*peers, 4);
            assert!((bytes_per_sec - 2000.0).abs() < 1e-6);
        }
        other => panic!("expected live stats, got {other:?}"),
    }
}

#[test]
fn complete_when_bytes_reach_total_even_without_peers() {
    let mut r = reporter();
    r.create_bar(1000, "Downloading");
    r.display_stats(1000, 0, 1000);
    assert_eq!(r.status(), Some(&TransferStatus::Completed));
}

#[test]
fn zero_total_renders_as_completed() {
    let mut r = reporter();
    r.create_bar(0, "Downloading");
    r.update_progress(0);
    r.display_stats(0, 0, 0);
    assert_eq!(r.status(), Some(&TransferStatus::Completed));
    r.complete_bar();
    assert!(r.bar_finished());
}

#[test]
fn update_progress_moves_the_bar() {
    let mut r = reporter();
    r.create_bar(1000, "Downloading");
    r.update_progress(250);
    assert_eq!(r.position(), Some(250));
    r.update_progress(900);
    assert_eq!(r.position(), Some(900));
}

#[test]
fn complete_bar_twice_is_safe() {
    let mut r = reporter();
    r.create_bar(1000, "Downloading");
    r.update_progress(1000);
    r.display_stats(1000, 2, 1000);
    r.complete_bar();
    assert!(r.bar_finished());
    r.complete_bar();
    assert!(r.bar_finished());
    assert_eq!(r.position(), Some(1000));
    // a finished bar no longer moves
    r.update_progress(10);
    assert_eq!(r.position(), Some(1000));
}

#[test]
fn abandon_then_complete_finishes_once() {
    let mut r = reporter();
    r.create_bar(1000, "Downloading");
    r.update_progress(400);
    r.abandon_bar();
    r.complete_bar();
    assert!(r.bar_finished());
    assert_eq!(r.position(), Some(400));
}

#[test]
fn metadata_loader_lifecycle() {
    let mut r = reporter();
    assert!(r.metadata_ticker().is_none());
    assert_eq!(r.metadata_ticks(), None);
    r.show_metadata_loader("Fetching metadata");
    assert!(r.metadata_active());

    let ticker = r.metadata_ticker().unwrap();
    ticker.tick();
    ticker.clone().tick();

    r.complete_metadata_loader();
    assert!(!r.metadata_active());
    assert_eq!(r.metadata_ticks(), Some(2));
    // completing again is harmless
    r.complete_metadata_loader();
    // ticking a finished spinner is harmless too
    ticker.tick();
    assert!(!r.transfer_started());
}

#[test]
fn status_lines_read_naturally() {
    assert_eq!(TransferStatus::Completed.to_string(), "Completed!");
    assert!(TransferStatus::WaitingForPeers
        .to_string()
        .contains("Waiting for peers"));
    let live = TransferStatus::Live {
        peers: 7,
        bytes_per_sec: 3.0 * 1024.0 * 1024.0,
    }
    .to_string();
    assert!(live.contains("Peers: 7"));
    assert!(live.contains("3.00 MiB/s"));
}
