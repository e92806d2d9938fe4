mod common;

use blocks_wasm::carousel::{LibraryState, PlayWhen, SlotState};
use blocks_wasm::models::{VariantTag, VideoKind};
use common::{image_slide, mounted, video_slide, RecordingHost};

const MANIFEST: &str = "https://cdn.example.com/reel/master.m3u8";

#[test]
fn test_active_progressive_video_loads_once() {
    let slides = vec![video_slide("/media/a.mp4"), video_slide("/media/b.mp4")];
    let mut controller = mounted(&slides, VariantTag::SingleSlide, RecordingHost::new());

    assert_eq!(controller.host().loads, vec![(0, "/media/a.mp4".to_string(), VideoKind::Progressive)]);
    assert_eq!(controller.host().plays, vec![(0, PlayWhen::DataLoaded)]);
    assert_eq!(controller.slot_state(0), Some(SlotState::Loaded));
    assert_eq!(controller.slot_state(1), Some(SlotState::Pending));

    // visibility after activation is a no-op
    controller.on_visible(0);
    controller.on_visible(0);
    assert_eq!(controller.host().loads_of(0), 1);
}

#[test]
fn test_visible_slide_loads_before_activation() {
    let slides = vec![image_slide("/a.png"), video_slide("/media/b.mp4")];
    let mut controller = mounted(&slides, VariantTag::Unset, RecordingHost::new());
    assert!(controller.host().observed.contains(&1));
    assert!(controller.host().loads.is_empty());

    controller.on_visible(1);
    assert_eq!(controller.host().loads_of(1), 1);
    assert!(!controller.host().observed.contains(&1));

    // activation reuses the loaded source and plays right away
    controller.next();
    assert_eq!(controller.host().loads_of(1), 1);
    assert_eq!(controller.host().plays.last(), Some(&(1, PlayWhen::Now)));
}

#[test]
fn test_native_adaptive_playback_skips_library() {
    let slides = vec![video_slide(MANIFEST)];
    let controller = mounted(&slides, VariantTag::SingleSlide, RecordingHost::new().with_native_streaming());
    assert_eq!(controller.host().loads, vec![(0, MANIFEST.to_string(), VideoKind::Adaptive)]);
    assert!(controller.host().library_requests.is_empty());
    assert_eq!(controller.library_state(), LibraryState::NotRequested);
}

#[test]
fn test_library_requested_once_and_session_attached() {
    let slides = vec![video_slide(MANIFEST), video_slide("https://cdn.example.com/other/master.m3u8")];
    let mut controller = mounted(&slides, VariantTag::SingleSlide, RecordingHost::new());

    assert_eq!(controller.slot_state(0), Some(SlotState::AwaitingLibrary));
    assert_eq!(controller.library_state(), LibraryState::Pending);
    assert_eq!(controller.host().library_requests.len(), 1);

    // a second slide activating while the library is pending does not fetch again
    controller.next();
    controller.prev();
    assert_eq!(controller.host().library_requests.len(), 1);

    controller.on_streaming_library(true);
    let session = controller.host().sessions[0];
    assert_eq!(session.0, 0);
    assert_eq!(controller.slot_state(0), Some(SlotState::Streaming(session.1)));
    assert_eq!(controller.host().plays.last(), Some(&(0, PlayWhen::DataLoaded)));
    // the inactive slide gave up its wait and stays unloaded
    assert_eq!(controller.slot_state(1), Some(SlotState::Pending));
}

#[test]
fn test_visible_adaptive_slide_prefetches_library_only() {
    let slides = vec![image_slide("/a.png"), video_slide(MANIFEST)];
    let mut controller = mounted(&slides, VariantTag::Unset, RecordingHost::new());
    controller.on_visible(1);
    assert_eq!(controller.host().library_requests.len(), 1);
    assert_eq!(controller.library_state(), LibraryState::Pending);
    assert!(controller.host().sessions.is_empty());
    assert_eq!(controller.slot_state(1), Some(SlotState::Pending));

    // the library arrives before activation: still no session for an inactive slide
    controller.on_streaming_library(true);
    assert!(controller.host().sessions.is_empty());

    // activation attaches right away without a second fetch
    controller.next();
    assert_eq!(controller.host().library_requests.len(), 1);
    let session = controller.host().sessions[0];
    assert_eq!(session.0, 1);
    assert_eq!(controller.slot_state(1), Some(SlotState::Streaming(session.1)));
    assert_eq!(controller.host().plays.last(), Some(&(1, PlayWhen::DataLoaded)));
}

#[test]
fn test_session_destroyed_on_deactivation_and_reattached() {
    let slides = vec![video_slide(MANIFEST), image_slide("/b.png")];
    let mut controller = mounted(&slides, VariantTag::SingleSlide, RecordingHost::new());
    controller.on_streaming_library(true);
    let first = controller.host().sessions[0].1;

    controller.next();
    assert_eq!(controller.host().destroyed_sessions, vec![first]);
    assert!(controller.host().live_sessions.is_empty());
    assert_eq!(controller.slot_state(0), Some(SlotState::Detached));

    controller.next();
    let second = controller.host().sessions[1].1;
    assert_ne!(first, second);
    assert_eq!(controller.host().live_sessions.len(), 1);
    assert_eq!(controller.slot_state(0), Some(SlotState::Streaming(second)));
}

#[test]
fn test_library_failure_leaves_slide_unavailable() {
    let slides = vec![video_slide(MANIFEST)];
    let mut controller = mounted(&slides, VariantTag::SingleSlide, RecordingHost::new());
    controller.on_streaming_library(false);
    assert_eq!(controller.slot_state(0), Some(SlotState::Unavailable));
    assert_eq!(controller.library_state(), LibraryState::Unavailable);
    assert!(controller.host().sessions.is_empty());
    assert!(controller.host().plays.is_empty());
}

#[test]
fn test_refused_session_is_unavailable() {
    let mut host = RecordingHost::new();
    host.refuse_sessions = true;
    let mut controller = mounted(&[video_slide(MANIFEST)], VariantTag::SingleSlide, host);
    controller.on_streaming_library(true);
    assert_eq!(controller.slot_state(0), Some(SlotState::Unavailable));
}

#[test]
fn test_destroy_releases_sessions() {
    let mut controller = mounted(&[video_slide(MANIFEST)], VariantTag::SingleSlide, RecordingHost::new());
    controller.on_streaming_library(true);
    controller.destroy();
    assert!(controller.host().live_sessions.is_empty());
    assert!(controller.host().released);
}

#[test]
fn test_progress_only_for_active_slide() {
    let slides = vec![video_slide("/a.mp4"), video_slide("/b.mp4")];
    let mut controller = mounted(&slides, VariantTag::SingleSlide, RecordingHost::new());

    controller.on_time_update(0, 2.5, 10.0);
    assert_eq!(controller.host().progress.get(&0), Some(&25.0));

    controller.on_time_update(1, 5.0, 10.0);
    assert_eq!(controller.host().progress.get(&1), Some(&0.0));

    // unknown duration leaves the bar alone
    controller.on_time_update(0, 3.0, f64::NAN);
    controller.on_time_update(0, 3.0, 0.0);
    assert_eq!(controller.host().progress.get(&0), Some(&25.0));
}

#[test]
fn test_unmute_is_reverted() {
    let mut controller = mounted(&[video_slide("/a.mp4")], VariantTag::SingleSlide, RecordingHost::new());
    controller.on_volume_change(0, true, 0.0);
    assert!(controller.host().mutes.is_empty());
    controller.on_volume_change(0, false, 0.0);
    controller.on_volume_change(0, true, 0.4);
    assert_eq!(controller.host().mutes, vec![0, 0]);
}

#[test]
fn test_rejected_playback_retried_once() {
    let mut controller = mounted(&[video_slide("/a.mp4"), video_slide("/b.mp4")], VariantTag::SingleSlide, RecordingHost::new());

    controller.on_play_rejected(0);
    assert_eq!(controller.host().retries, vec![(0, 100)]);
    controller.on_play_retry(0);
    assert_eq!(controller.host().plays.last(), Some(&(0, PlayWhen::Now)));

    controller.on_play_rejected(0);
    assert_eq!(controller.host().retries.len(), 1);

    // a fresh activation gets a fresh retry
    controller.next();
    controller.prev();
    controller.on_play_rejected(0);
    assert_eq!(controller.host().retries.len(), 2);
}
