mod common;

use common::controller;
use pmoradio::command::{ACCEPTED, NO_STATIONS, interpret};

#[test]
fn test_direct_volume_in_range() {
    let (mut playback, audio) = controller(3);
    for v in 0..=21u8 {
        let reply = interpret(&format!("volume={v}"), &mut playback);
        assert_eq!(playback.volume(), v);
        assert_eq!(reply, format!("Volume is now {v}"));
    }
    assert_eq!(audio.log().volume, 21);
}

#[test]
fn test_direct_volume_out_of_range_is_ignored() {
    let (mut playback, audio) = controller(3);
    interpret("volume=12", &mut playback);
    let calls = audio.log().volumes.len();

    for raw in ["volume=22", "volume=100", "volume=-40"] {
        assert_eq!(interpret(raw, &mut playback), "Volume is now 12");
        assert_eq!(playback.volume(), 12);
    }
    assert_eq!(audio.log().volumes.len(), calls);
}

#[test]
fn test_negative_value_uses_magnitude() {
    let (mut playback, _) = controller(3);
    interpret("volume=-5", &mut playback);
    assert_eq!(playback.volume(), 5);
}

#[test]
fn test_volume_15() {
    let (mut playback, _) = controller(3);
    let reply = interpret("volume=15", &mut playback);
    assert_eq!(playback.volume(), 15);
    assert!(reply.contains("15"));
}

#[test]
fn test_volume_up_and_down() {
    let (mut playback, _) = controller(3);
    interpret("volume=10", &mut playback);
    interpret("volume=up", &mut playback);
    assert_eq!(playback.volume(), 11);
    interpret("VOLUME=down", &mut playback);
    assert_eq!(playback.volume(), 10);
}

#[test]
fn test_volume_steps_stop_at_bounds() {
    let (mut playback, _) = controller(3);
    interpret("volume=21", &mut playback);
    assert_eq!(interpret("volume=up", &mut playback), "Volume is now 21");

    interpret("volume=0", &mut playback);
    assert_eq!(interpret("volume=down", &mut playback), "Volume is now 0");
}

#[test]
fn test_argument_without_value_reads_zero() {
    let (mut playback, _) = controller(3);
    interpret("volume", &mut playback);
    assert_eq!(playback.volume(), 0);
}

#[test]
fn test_prefix_match_is_preserved() {
    let (mut playback, _) = controller(3);
    assert_eq!(interpret("volumex=4", &mut playback), "Volume is now 4");
    assert_eq!(interpret("presets=2", &mut playback), "Preset set to 2. Station 2");
}

#[test]
fn test_preset_down_wraps() {
    let (mut playback, audio) = controller(5);
    assert_eq!(playback.current_station(), Some(1));

    let reply = interpret("preset=down", &mut playback);
    assert_eq!(playback.current_station(), Some(5));
    assert_eq!(reply, "Preset set to 5. Station 5");
    assert_eq!(audio.log().streams, vec!["http://s5"]);
}

#[test]
fn test_preset_up_wraps() {
    let (mut playback, _) = controller(2);
    interpret("preset=up", &mut playback);
    assert_eq!(playback.current_station(), Some(2));
    interpret("preset=up", &mut playback);
    assert_eq!(playback.current_station(), Some(1));
}

#[test]
fn test_preset_direct_index() {
    let (mut playback, audio) = controller(5);
    assert_eq!(interpret("preset=3", &mut playback), "Preset set to 3. Station 3");

    // hors bornes : pas de changement ni de re-tune
    assert_eq!(interpret("preset=0", &mut playback), "Preset set to 3. Station 3");
    assert_eq!(interpret("preset=6", &mut playback), "Preset set to 3. Station 3");
    // même station : pas de re-tune
    interpret("preset=3", &mut playback);
    assert_eq!(audio.log().streams, vec!["http://s3"]);
}

#[test]
fn test_preset_on_empty_catalog() {
    let (mut playback, audio) = controller(0);
    for raw in ["preset=up", "preset=down", "preset=1"] {
        assert_eq!(interpret(raw, &mut playback), NO_STATIONS);
    }
    assert_eq!(playback.current_station(), None);
    assert!(audio.log().streams.is_empty());
}

#[test]
fn test_unknown_argument_is_accepted_without_effect() {
    let (mut playback, audio) = controller(3);
    let before = playback.status();

    assert_eq!(interpret("foo=bar", &mut playback), ACCEPTED);
    assert_eq!(playback.status(), before);
    assert!(audio.log().volumes.is_empty());
    assert!(audio.log().streams.is_empty());
}

#[test]
fn test_comment_only_is_a_no_op() {
    let (mut playback, audio) = controller(3);
    let before = playback.status();

    for raw in ["   # just a comment", "", "   ", "=12", "#volume=3"] {
        assert_eq!(interpret(raw, &mut playback), ACCEPTED);
    }
    assert_eq!(playback.status(), before);
    assert!(audio.log().volumes.is_empty());
}

#[test]
fn test_trailing_comment_is_ignored() {
    let (mut playback, _) = controller(3);
    interpret("  volume = 9   # night mode", &mut playback);
    assert_eq!(playback.volume(), 9);
}
