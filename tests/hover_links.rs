//! Integration tests for URL hover detection and ctrl+click opening

mod common;

use common::{RecordingOpener, StrictSurface};
use textdock::editor::hover::{HoverLinkDetector, HoverSpan, LinkModifier, Modifiers};

// ============================================================================
// Detection
// ============================================================================

#[test]
fn test_url_span_excludes_surrounding_words() {
    let mut surface = StrictSurface::new("see https://example.com/path here");
    let mut detector = HoverLinkDetector::new();

    let inside_scheme = surface.offset_of("https") + 2;
    detector.on_mouse_move(&mut surface, Some(inside_scheme));

    let (start, stop) = detector.link_span().expect("URL detected");
    let text: String = surface.chars[start..stop].iter().collect();
    assert_eq!(text, "https://example.com/path");
    assert_eq!(surface.painted, vec![(start, stop)]);
}

#[test]
fn test_url_found_inside_longer_word() {
    let mut surface = StrictSurface::new("(link:https://x.org/a)");
    let mut detector = HoverLinkDetector::new();

    detector.on_mouse_move(&mut surface, Some(3));

    let (start, stop) = detector.link_span().expect("URL detected");
    let text: String = surface.chars[start..stop].iter().collect();
    assert_eq!(text, "https://x.org/a");
}

#[test]
fn test_plain_word_remembered_without_indicator() {
    let mut surface = StrictSurface::new("plainword");
    let mut detector = HoverLinkDetector::new();

    detector.on_mouse_move(&mut surface, Some(4));
    assert_eq!(
        detector.active_span(),
        Some(HoverSpan {
            start: 0,
            stop: 9,
            linked: false
        })
    );
    assert!(surface.painted.is_empty());
    assert_eq!(detector.scan_count(), 1);

    for pos in 0..9 {
        detector.on_mouse_move(&mut surface, Some(pos));
    }
    assert_eq!(detector.scan_count(), 1, "moves within the word reuse the scan");
    assert!(surface.painted.is_empty());
    assert!(surface.cleared.is_empty());
}

#[test]
fn test_moving_within_link_keeps_indicator() {
    let mut surface = StrictSurface::new("go to http://a.io now");
    let mut detector = HoverLinkDetector::new();

    let start = surface.offset_of("http");
    for pos in start..start + "http://a.io".len() {
        detector.on_mouse_move(&mut surface, Some(pos));
    }
    assert_eq!(detector.scan_count(), 1);
    assert_eq!(surface.painted.len(), 1);
    assert!(surface.cleared.is_empty());
}

#[test]
fn test_leaving_link_clears_indicator() {
    let mut surface = StrictSurface::new("mailto:me@example.org and more");
    let mut detector = HoverLinkDetector::new();

    detector.on_mouse_move(&mut surface, Some(2));
    let span = detector.link_span().unwrap();

    let word = surface.offset_of("more");
    detector.on_mouse_move(&mut surface, Some(word));
    assert_eq!(surface.cleared, vec![span]);
    assert_eq!(detector.link_span(), None);
    assert_eq!(detector.active_span().map(|s| s.linked), Some(false));
}

#[test]
fn test_off_text_clears_without_new_scan() {
    let mut surface = StrictSurface::new("ftp://files.example.com");
    let mut detector = HoverLinkDetector::new();

    detector.on_mouse_move(&mut surface, Some(0));
    assert!(detector.link_span().is_some());

    detector.on_mouse_move(&mut surface, None);
    assert_eq!(detector.active_span(), None);
    assert_eq!(surface.cleared.len(), 1);
    assert_eq!(detector.scan_count(), 1);
}

#[test]
fn test_separator_under_cursor_has_no_span() {
    let mut surface = StrictSurface::new("a b");
    let mut detector = HoverLinkDetector::new();

    detector.on_mouse_move(&mut surface, Some(1));
    assert_eq!(detector.active_span(), None);
    assert_eq!(detector.scan_count(), 0);
}

#[test]
fn test_unsupported_scheme_is_not_a_link() {
    let mut surface = StrictSurface::new("file:///etc/hosts");
    let mut detector = HoverLinkDetector::new();

    detector.on_mouse_move(&mut surface, Some(5));
    assert_eq!(detector.link_span(), None);
    assert!(surface.painted.is_empty());
}

// ============================================================================
// Document boundaries
// ============================================================================

#[test]
fn test_first_and_last_offsets_stay_in_bounds() {
    let text = "https://edge.example.com";
    let mut surface = StrictSurface::new(text);
    let mut detector = HoverLinkDetector::new();

    detector.on_mouse_move(&mut surface, Some(0));
    assert_eq!(detector.link_span(), Some((0, text.len())));

    detector.on_mouse_move(&mut surface, None);
    detector.on_mouse_move(&mut surface, Some(text.len() - 1));
    assert_eq!(detector.link_span(), Some((0, text.len())));
}

#[test]
fn test_offset_past_end_and_empty_document() {
    let mut surface = StrictSurface::new("abc");
    let mut detector = HoverLinkDetector::new();
    detector.on_mouse_move(&mut surface, Some(3));
    detector.on_mouse_move(&mut surface, Some(100));
    assert_eq!(detector.active_span(), None);

    let mut empty = StrictSurface::new("");
    detector.on_mouse_move(&mut empty, Some(0));
    assert_eq!(detector.active_span(), None);
}

#[test]
fn test_single_character_document() {
    let mut surface = StrictSurface::new("x");
    let mut detector = HoverLinkDetector::new();
    detector.on_mouse_move(&mut surface, Some(0));
    assert_eq!(
        detector.active_span(),
        Some(HoverSpan {
            start: 0,
            stop: 1,
            linked: false
        })
    );
}

// ============================================================================
// Clicking
// ============================================================================

#[test]
fn test_ctrl_click_opens_matched_text_once() {
    let mut surface = StrictSurface::new("see https://example.com/path here");
    let mut detector = HoverLinkDetector::new();
    let mut opener = RecordingOpener::default();

    detector.on_mouse_move(&mut surface, Some(6));
    let opened = detector.on_click(&surface, Modifiers::CTRL, LinkModifier::Ctrl, &mut opener);

    assert!(opened);
    assert_eq!(opener.opened, vec!["https://example.com/path".to_string()]);
}

#[test]
fn test_click_without_modifier_does_nothing() {
    let mut surface = StrictSurface::new("https://example.com");
    let mut detector = HoverLinkDetector::new();
    let mut opener = RecordingOpener::default();

    detector.on_mouse_move(&mut surface, Some(0));
    assert!(!detector.on_click(&surface, Modifiers::NONE, LinkModifier::Ctrl, &mut opener));
    let alt = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };
    assert!(!detector.on_click(&surface, alt, LinkModifier::Ctrl, &mut opener));
    assert!(opener.opened.is_empty());

    assert!(detector.on_click(&surface, alt, LinkModifier::Alt, &mut opener));
    assert_eq!(opener.opened.len(), 1);
}

#[test]
fn test_click_without_active_link_does_nothing() {
    let mut surface = StrictSurface::new("no links here");
    let mut detector = HoverLinkDetector::new();
    let mut opener = RecordingOpener::default();

    assert!(!detector.on_click(&surface, Modifiers::CTRL, LinkModifier::Ctrl, &mut opener));

    detector.on_mouse_move(&mut surface, Some(0));
    assert!(!detector.on_click(&surface, Modifiers::CTRL, LinkModifier::Ctrl, &mut opener));
    assert!(opener.opened.is_empty());
}
