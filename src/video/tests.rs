use std::time::Duration;

use super::{PlaybackPosition, VideoId, disable_autoplay_param, is_watch_page};
use crate::error::{AppError, AppResult};

const MARGIN: Duration = Duration::from_millis(500);

#[test]
fn video_id_comes_from_v_param() -> AppResult<()> {
    let id = VideoId::from_page_url("https://www.youtube.com/watch?v=abc123&t=42s");
    if id.as_ref().map(VideoId::as_str) != Some("abc123") {
        return Err(AppError::validation(format!("Unexpected id {:?}", id)));
    }
    if VideoId::from_page_url("https://www.youtube.com/watch?list=xyz").is_some() {
        return Err(AppError::validation("Expected no id without v param"));
    }
    if VideoId::from_page_url("https://www.youtube.com/watch?v=").is_some() {
        return Err(AppError::validation("Expected blank v param to be rejected"));
    }
    if VideoId::from_page_url("not a url").is_some() {
        return Err(AppError::validation("Expected unparsable address to yield none"));
    }
    Ok(())
}

#[test]
fn video_id_keeps_the_raw_value() -> AppResult<()> {
    let padded = VideoId::from_page_url("https://www.youtube.com/watch?v=%20abc%20");
    if padded.as_ref().map(VideoId::as_str) != Some(" abc ") {
        return Err(AppError::validation(format!("Unexpected id {:?}", padded)));
    }
    if VideoId::from_page_url("https://www.youtube.com/watch?v=%20%20").is_some() {
        return Err(AppError::validation("Expected whitespace-only v param to be rejected"));
    }
    if VideoId::new("\t").is_some() {
        return Err(AppError::validation("Expected blank id to be rejected"));
    }
    Ok(())
}

#[test]
fn watch_page_detection() -> AppResult<()> {
    let cases = [
        ("https://www.youtube.com/watch?v=abc", true),
        ("https://youtube.com/watch?v=abc", true),
        ("https://m.youtube.com/watch?v=abc", true),
        ("https://www.youtube.com/", false),
        ("https://www.youtube.com/shorts/abc", false),
        ("https://notyoutube.com/watch?v=abc", false),
        ("https://example.com/watch?v=abc", false),
        ("about:blank", false),
    ];
    for (location, expected) in cases {
        if is_watch_page(location) != expected {
            return Err(AppError::validation(format!(
                "is_watch_page({}) should be {}",
                location, expected
            )));
        }
    }
    Ok(())
}

#[test]
fn autoplay_param_is_rewritten_only_when_on() -> AppResult<()> {
    let rewritten = disable_autoplay_param("https://www.youtube.com/watch?v=abc&autoplay=1")
        .map_err(|err| AppError::validation(format!("parse failed: {}", err)))?;
    if rewritten.as_deref() != Some("https://www.youtube.com/watch?v=abc&autoplay=0") {
        return Err(AppError::validation(format!(
            "Unexpected rewrite {:?}",
            rewritten
        )));
    }
    let untouched = disable_autoplay_param("https://www.youtube.com/watch?v=abc&autoplay=0")
        .map_err(|err| AppError::validation(format!("parse failed: {}", err)))?;
    if untouched.is_some() {
        return Err(AppError::validation("autoplay=0 should be left alone"));
    }
    let absent = disable_autoplay_param("https://www.youtube.com/watch?v=abc")
        .map_err(|err| AppError::validation(format!("parse failed: {}", err)))?;
    if absent.is_some() {
        return Err(AppError::validation("Missing autoplay param should be left alone"));
    }
    Ok(())
}

#[test]
fn near_end_uses_margin_and_requires_started_playback() -> AppResult<()> {
    if !PlaybackPosition::from_host(99.6, 100.0).is_near_end(MARGIN) {
        return Err(AppError::validation("99.6 of 100 should be near the end"));
    }
    if PlaybackPosition::from_host(50.0, 100.0).is_near_end(MARGIN) {
        return Err(AppError::validation("50 of 100 should not be near the end"));
    }
    if PlaybackPosition::from_host(0.0, 0.3).is_near_end(MARGIN) {
        return Err(AppError::validation("Position 0 never counts as near the end"));
    }
    if PlaybackPosition::from_host(10.0, f64::NAN).is_near_end(MARGIN) {
        return Err(AppError::validation("Unknown duration never counts as near the end"));
    }
    if PlaybackPosition::from_host(10.0, f64::INFINITY).is_near_end(MARGIN) {
        return Err(AppError::validation("Live streams never count as near the end"));
    }
    if !PlaybackPosition::from_host(101.0, 100.0).is_near_end(MARGIN) {
        return Err(AppError::validation("Overshooting the end counts as near the end"));
    }
    Ok(())
}

#[test]
fn whole_seconds_floors() -> AppResult<()> {
    let position = PlaybackPosition::from_host(42.9, 100.0);
    if position.whole_seconds() != 42 {
        return Err(AppError::validation(format!(
            "Expected 42, got {}",
            position.whole_seconds()
        )));
    }
    if PlaybackPosition::from_host(-3.0, 100.0).whole_seconds() != 0 {
        return Err(AppError::validation("Negative host time should clamp to 0"));
    }
    Ok(())
}
