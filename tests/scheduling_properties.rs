//! Property-based tests for Round Robin timeline and playback invariants.

use proptest::prelude::*;
use rr_schedule::config::Config;
use rr_schedule::models::{Process, ProcessId};
use rr_schedule::playback::PlaybackState;
use rr_schedule::scheduler::compute_timeline;
use rr_schedule::session::Session;

fn processes_from(bursts: &[u32]) -> Vec<Process> {
    bursts
        .iter()
        .enumerate()
        .map(|(i, &b)| Process::new(ProcessId(i as u64), format!("P{}", i + 1), b))
        .collect()
}

fn bursts_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=20, 1..=8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn durations_sum_to_total_burst(bursts in bursts_strategy(), quantum in 1u32..=10) {
        let timeline = compute_timeline(&processes_from(&bursts), quantum);
        let executed: u64 = timeline.segments().iter().map(|s| s.duration).sum();
        let required: u64 = bursts.iter().map(|&b| u64::from(b)).sum();
        prop_assert_eq!(executed, required);
    }

    #[test]
    fn dispatch_count_is_ceil_burst_over_quantum(bursts in bursts_strategy(), quantum in 1u32..=10) {
        let processes = processes_from(&bursts);
        let timeline = compute_timeline(&processes, quantum);
        for p in &processes {
            let expected = p.burst.div_ceil(quantum) as usize;
            prop_assert_eq!(timeline.dispatch_count(p.id), expected);
        }
    }

    #[test]
    fn segments_are_contiguous_and_end_at_total(bursts in bursts_strategy(), quantum in 1u32..=10) {
        let timeline = compute_timeline(&processes_from(&bursts), quantum);
        let mut clock = 0;
        for seg in timeline.segments() {
            prop_assert_eq!(seg.start, clock);
            prop_assert!(seg.duration >= 1 && seg.duration <= u64::from(quantum));
            clock = seg.end();
        }
        let last = timeline.segments().last().map(|s| s.end());
        prop_assert_eq!(last, Some(timeline.total_time()));
    }

    #[test]
    fn smaller_quantum_never_finishes_earlier(bursts in bursts_strategy(), quantum in 2u32..=10) {
        let processes = processes_from(&bursts);
        let coarse = compute_timeline(&processes, quantum);
        let fine = compute_timeline(&processes, quantum - 1);
        prop_assert!(fine.total_time() >= coarse.total_time());
    }

    #[test]
    fn large_quantum_degenerates_to_fifo(bursts in bursts_strategy(), extra in 0u32..=5) {
        let processes = processes_from(&bursts);
        let quantum = bursts.iter().copied().max().unwrap_or(1) + extra;
        let timeline = compute_timeline(&processes, quantum);

        let order: Vec<ProcessId> = timeline.segments().iter().map(|s| s.pid).collect();
        let expected: Vec<ProcessId> = processes.iter().map(|p| p.id).collect();
        prop_assert_eq!(order, expected);
    }

    #[test]
    fn waiting_bounded_by_turnaround(bursts in bursts_strategy(), quantum in 1u32..=10) {
        let timeline = compute_timeline(&processes_from(&bursts), quantum);
        let metrics = timeline.metrics().expect("non-empty input has metrics");
        prop_assert!(metrics.average_waiting >= 0.0);
        prop_assert!(metrics.average_waiting <= metrics.average_turnaround);
        for m in &metrics.processes {
            prop_assert_eq!(m.waiting + u64::from(m.burst), m.turnaround);
        }
    }

    #[test]
    fn computation_is_idempotent(bursts in bursts_strategy(), quantum in 1u32..=10) {
        let processes = processes_from(&bursts);
        let a = compute_timeline(&processes, quantum);
        let b = compute_timeline(&processes, quantum);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn playback_consumes_every_burst(bursts in prop::collection::vec(1u32..=6, 1..=4), quantum in 1u32..=4) {
        let mut session = Session::new(Config::default());
        for &b in &bursts {
            session.add_process("", f64::from(b)).unwrap();
        }
        session.set_quantum(f64::from(quantum));
        session.set_speed(4.0);

        session.play(0.0);
        let mut now = 0.0;
        let mut frames = 0;
        while session.status().playing && frames < 100_000 {
            now += 16.0;
            frames += 1;
            session.tick(now);
        }

        let len = session.timeline().len();
        let status = session.status();
        prop_assert_eq!(status.state, PlaybackState::Finished);
        prop_assert_eq!(status.current_index, len - 1);
        prop_assert!(session.processes().iter().all(|p| p.remaining == 0));
    }
}

#[test]
fn empty_process_list_has_no_metrics() {
    let timeline = compute_timeline(&[], 3);
    assert!(timeline.is_empty());
    assert_eq!(timeline.total_time(), 0);
    assert!(timeline.metrics().is_none());
}

#[test]
fn five_segment_playback_reaches_finished() {
    let mut session = Session::new(Config::default());
    for burst in [4.0, 6.0, 2.0] {
        session.add_process("", burst).unwrap();
    }
    session.set_quantum(3.0);
    assert_eq!(session.timeline().len(), 5);

    // One tick per 300ms time unit boundary is enough at speed 1,
    // since each tick lands exactly on a segment end.
    let ends = session.timeline().boundaries();
    session.play(0.0);
    let mut now = 0.0;
    for seg_end in ends.into_iter().skip(1) {
        now = seg_end as f64 * 300.0;
        session.tick(now);
    }

    let status = session.status();
    assert!(now >= 12.0 * 300.0);
    assert_eq!(status.state, PlaybackState::Finished);
    assert_eq!(status.current_index, 4);
    assert!(!status.playing);
    assert!(session.processes().iter().all(|p| p.remaining == 0));
}
