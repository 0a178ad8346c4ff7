//! Status badge URLs and badge text extraction.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Query parameter appended to badge URLs so caches never serve a stale image.
pub const CACHE_BUST_PARAM: &str = "date";

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Current time in milliseconds, bumped when needed so that every call in the
/// process returns a strictly larger value than the one before.
pub fn next_stamp() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut prev = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_STAMP.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => prev = actual,
        }
    }
}

/// The badge URL with a fresh cache-busting parameter.
pub fn refresh_url(badge_url: &str) -> String {
    busted_url(badge_url, next_stamp())
}

pub fn busted_url(badge_url: &str, stamp: i64) -> String {
    let sep = if badge_url.contains('?') { '&' } else { '?' };
    format!("{badge_url}{sep}{CACHE_BUST_PARAM}={stamp}")
}

/// Extract the status word from a pipeline badge SVG.
///
/// Badges render label and value as `<text>` elements (often twice, once for
/// the shadow). The value is the last non-empty one.
pub fn parse_status(svg: &str) -> Option<String> {
    let mut last = None;
    let mut rest = svg;
    while let Some(start) = rest.find("<text") {
        let after_tag = &rest[start..];
        let Some(open_end) = after_tag.find('>') else {
            break;
        };
        let body = &after_tag[open_end + 1..];
        let Some(close) = body.find("</text>") else {
            break;
        };
        let text = body[..close].trim();
        if !text.is_empty() {
            last = Some(text);
        }
        rest = &body[close..];
    }
    last.map(unescape)
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
