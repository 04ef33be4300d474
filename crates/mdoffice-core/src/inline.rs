//! Inline span extraction
//!
//! Finds links, images, inline code and emphasis in a block of text. The
//! text itself is never rewritten; every span is recorded with its byte
//! range so renderers can format runs without scanning the text again.

use std::ops::Range;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::token::{CodeSpan, EmphasisSpan, EmphasisStyle, ImageSpan, InlineSpans, LinkSpan};

fn image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Lazy source so a trailing `"title"` is split off; spaces stay in the path
        Regex::new(r#"!\[([^\]]*)\]\(([^)]+?)(?:\s+"([^"]*)")?\)"#).expect("image regex is valid")
    })
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link regex is valid"))
}

fn code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`]+)`").expect("code regex is valid"))
}

fn emphasis_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // No backreferences in `regex`, so each delimiter run is spelled out.
    // Alternation is leftmost-first: longer runs win at the same offset.
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"\*\*\*([^*_]+)\*\*\*|\*\*([^*_]+)\*\*|\*([^*_]+)\*",
            r"|___([^*_]+)___|__([^*_]+)__|_([^*_]+)_",
        ))
        .expect("emphasis regex is valid")
    })
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Collect all inline spans in `text`
pub fn extract(text: &str) -> InlineSpans {
    let code = extract_code(text);
    let in_code = |range: &Range<usize>| code.iter().any(|c| overlaps(&c.range, range));

    let images: Vec<ImageSpan> = image_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let range = caps.get(0)?.range();
            Some(ImageSpan {
                alt: caps[1].to_string(),
                src: caps[2].trim().to_string(),
                title: caps.get(3).map(|m| m.as_str().to_string()),
                range,
            })
        })
        .filter(|image| !in_code(&image.range))
        .collect();

    let links = link_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let range = caps.get(0)?.range();
            Some(LinkSpan {
                text: caps[1].to_string(),
                url: caps[2].trim().to_string(),
                range,
            })
        })
        // `[alt](src)` inside an image is not a link
        .filter(|link| !text[..link.range.start].ends_with('!'))
        .filter(|link| !in_code(&link.range))
        .collect();

    let emphasis = emphasis_re()
        .captures_iter(text)
        .filter_map(|caps| emphasis_span(text, &caps))
        .filter(|span| !in_code(&span.range))
        .collect();

    InlineSpans {
        links,
        images,
        emphasis,
        code,
    }
}

fn extract_code(text: &str) -> Vec<CodeSpan> {
    code_re()
        .captures_iter(text)
        .filter_map(|caps| {
            Some(CodeSpan {
                code: caps[1].to_string(),
                range: caps.get(0)?.range(),
            })
        })
        .collect()
}

fn emphasis_span(text: &str, caps: &Captures<'_>) -> Option<EmphasisSpan> {
    let whole = caps.get(0)?;
    let (group, inner) = (1..=6).find_map(|i| caps.get(i).map(|m| (i, m)))?;

    // groups 1-3 are `*` runs of 3, 2, 1; groups 4-6 the same for `_`
    let delimiter_len = 3 - (group - 1) % 3;
    let underscore = group > 3;

    // snake_case_words are not emphasis
    if underscore {
        let before = text[..whole.start()].chars().next_back();
        let after = text[whole.end()..].chars().next();
        if before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric) {
            return None;
        }
    }

    Some(EmphasisSpan {
        style: EmphasisStyle::from_delimiter_len(delimiter_len),
        text: inner.as_str().to_string(),
        range: whole.range(),
    })
}
