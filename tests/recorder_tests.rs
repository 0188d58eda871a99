// Tests for segment cutting and the gapless hand-off: sequence numbering,
// the retry-once recovery after a failed replacement start, and the final
// flush on stop.

mod common;

use std::sync::Arc;

use anyhow::Result;
use common::MockDevice;
use live_scribe::{AudioFormat, DeviceError, SegmentRecorder};

#[tokio::test]
async fn sequences_are_increasing_and_gap_free() -> Result<()> {
    let device = Arc::new(MockDevice::new());
    let mut recorder =
        SegmentRecorder::prepare_and_start(device.clone(), AudioFormat::default()).await?;

    let mut sequences = Vec::new();
    for _ in 0..3 {
        let segment = recorder.cut_segment().await?.expect("segment per cut");
        sequences.push(segment.sequence);
    }

    let tail = recorder.finish().await?.expect("trailing partial segment");
    sequences.push(tail.sequence);

    assert_eq!(sequences, vec![0, 1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn failed_replacement_start_is_retried_on_next_tick() -> Result<()> {
    let device = Arc::new(MockDevice::new());
    // Open 0 is the initial start; open 1 is the replacement after the
    // first cut
    device.fail_start_on(1);

    let mut recorder =
        SegmentRecorder::prepare_and_start(device.clone(), AudioFormat::default()).await?;

    // The cut itself still yields its segment even though the replacement
    // start failed
    let first = recorder.cut_segment().await?;
    assert_eq!(first.map(|s| s.sequence), Some(0));
    assert!(recorder.restart_pending());

    // Next tick: the retry reopens the handle; no audio was captured in
    // the meantime, so no segment is produced
    let second = recorder.cut_segment().await?;
    assert!(second.is_none());
    assert!(!recorder.restart_pending());

    // Back to normal from here on
    let third = recorder.cut_segment().await?;
    assert_eq!(third.map(|s| s.sequence), Some(1));

    Ok(())
}

#[tokio::test]
async fn second_consecutive_restart_failure_surfaces() -> Result<()> {
    let device = Arc::new(MockDevice::new());
    device.fail_start_on(1);
    device.fail_start_on(2);

    let mut recorder =
        SegmentRecorder::prepare_and_start(device.clone(), AudioFormat::default()).await?;

    assert!(recorder.cut_segment().await?.is_some());

    let result = recorder.cut_segment().await;
    assert!(matches!(result, Err(DeviceError::RestartFailed(_))));

    Ok(())
}

#[tokio::test]
async fn prepare_failure_aborts_startup() {
    let device = Arc::new(MockDevice::new());
    device.fail_prepare();

    let result = SegmentRecorder::prepare_and_start(device, AudioFormat::default()).await;
    assert!(matches!(result, Err(DeviceError::Busy)));
}

#[tokio::test]
async fn finish_without_open_handle_yields_nothing() -> Result<()> {
    let device = Arc::new(MockDevice::new());
    device.fail_start_on(1);

    let mut recorder =
        SegmentRecorder::prepare_and_start(device.clone(), AudioFormat::default()).await?;

    // Cut leaves the recorder with a dead handle
    assert!(recorder.cut_segment().await?.is_some());
    assert!(recorder.restart_pending());

    // Stop before the retry tick: nothing is recording, nothing to flush
    assert!(recorder.finish().await?.is_none());
    Ok(())
}
