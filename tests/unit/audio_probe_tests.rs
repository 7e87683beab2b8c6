/*!
 * Tests for audio media type inference and clock formatting
 */

use readalong::audio_probe::AudioProbe;

/// Test media type inference for supported extensions
#[test]
fn test_media_type_withKnownExtensions_shouldMapToMimeTypes() {
    assert_eq!(AudioProbe::media_type("book.mp3"), Some("audio/mpeg"));
    assert_eq!(AudioProbe::media_type("book.m4a"), Some("audio/mp4"));
    assert_eq!(AudioProbe::media_type("book.m4b"), Some("audio/mp4"));
    assert_eq!(AudioProbe::media_type("book.opus"), Some("audio/ogg"));
    assert_eq!(AudioProbe::media_type("book.flac"), Some("audio/flac"));
}

/// Test that inference is case-insensitive on the extension
#[test]
fn test_media_type_withUppercaseExtension_shouldStillMatch() {
    assert_eq!(AudioProbe::media_type("BOOK.MP3"), Some("audio/mpeg"));
}

/// Test rejection of unknown or missing extensions
#[test]
fn test_media_type_withUnknownExtension_shouldReturnNone() {
    assert_eq!(AudioProbe::media_type("book.txt"), None);
    assert_eq!(AudioProbe::media_type("book"), None);
}

/// Test unpadded clock formatting
#[test]
fn test_format_clock_withVariousDurations_shouldStayUnpadded() {
    assert_eq!(AudioProbe::format_clock(0), "0:0:0");
    assert_eq!(AudioProbe::format_clock(59), "0:0:59");
    assert_eq!(AudioProbe::format_clock(61), "0:1:1");
    assert_eq!(AudioProbe::format_clock(3725), "1:2:5");
    assert_eq!(AudioProbe::format_clock(36_000), "10:0:0");
}

/// Test that probing a missing file fails before running ffprobe
#[test]
fn test_duration_seconds_withMissingFile_shouldFail() {
    let err = AudioProbe::duration_seconds("/nonexistent/audio.m4a").unwrap_err();
    assert!(err.to_string().contains("not found"));
}
