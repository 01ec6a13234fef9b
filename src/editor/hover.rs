//! URL detection under the mouse cursor
//!
//! On every mouse move the detector grows the run of URL-safe characters
//! around the hovered offset, searches that run for a URL, and paints a
//! hover indicator over exactly the match. Word bounds are remembered even
//! without a match so moving within the same word costs nothing.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::surface::{IndicatorStyle, TextSurface};

/// Scheme followed by one or more URL-safe characters
pub const URL_PATTERN: &str = r"(https?://|ftp://|mailto:)[A-Za-z0-9\-._~:/?#@!$&'*+,;=`]+";

fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern is valid"))
}

/// Characters that may appear inside a candidate URL
pub fn is_url_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '-' | '.'
                | '_'
                | '~'
                | ':'
                | '/'
                | '?'
                | '#'
                | '@'
                | '!'
                | '$'
                | '&'
                | '\''
                | '*'
                | '+'
                | ','
                | ';'
                | '='
                | '`'
        )
}

/// Modifier keys held during a mouse event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
}

/// The modifier required to follow a hovered link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkModifier {
    #[default]
    Ctrl,
    Alt,
    Meta,
}

impl LinkModifier {
    /// Exactly this modifier is held, nothing else
    pub fn matches(&self, modifiers: Modifiers) -> bool {
        let wanted = match self {
            LinkModifier::Ctrl => Modifiers::CTRL,
            LinkModifier::Alt => Modifiers {
                alt: true,
                ..Modifiers::NONE
            },
            LinkModifier::Meta => Modifiers {
                meta: true,
                ..Modifiers::NONE
            },
        };
        modifiers == wanted
    }
}

/// Opens a URL outside the editor
pub trait UrlOpener {
    fn open_url(&mut self, url: &str);
}

/// Opens URLs in the platform's default browser
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open_url(&mut self, url: &str) {
        tracing::info!("Opening {} in external browser", url);
        if let Err(e) = open::that(url) {
            tracing::warn!("Failed to open {}: {}", url, e);
        }
    }
}

/// Half-open span remembered from the last scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverSpan {
    pub start: usize,
    pub stop: usize,
    /// A URL matched and the hover indicator is painted over the span
    pub linked: bool,
}

impl HoverSpan {
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.stop
    }
}

#[derive(Debug, Default)]
pub struct HoverLinkDetector {
    active: Option<HoverSpan>,
    scans: u64,
}

impl HoverLinkDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_span(&self) -> Option<HoverSpan> {
        self.active
    }

    /// The highlighted URL span, if any
    pub fn link_span(&self) -> Option<(usize, usize)> {
        self.active
            .filter(|span| span.linked)
            .map(|span| (span.start, span.stop))
    }

    /// Number of word scans performed so far
    pub fn scan_count(&self) -> u64 {
        self.scans
    }

    /// Handle a mouse move resolved to `position` (`None` when off text)
    pub fn on_mouse_move(&mut self, surface: &mut impl TextSurface, position: Option<usize>) {
        if let (Some(span), Some(pos)) = (self.active, position) {
            if span.contains(pos) {
                return;
            }
        }

        self.clear(surface);

        let Some(pos) = position else {
            return;
        };
        let Some((word_start, word_end)) = expand_word(surface, pos) else {
            return;
        };
        self.scans += 1;

        let word = surface.text_range(word_start, word_end);
        match url_regex().find(&word) {
            Some(m) => {
                let start = word_start + word[..m.start()].chars().count();
                let stop = start + m.as_str().chars().count();
                surface.set_indicator_range(start, stop, IndicatorStyle::HoverLink);
                self.active = Some(HoverSpan {
                    start,
                    stop,
                    linked: true,
                });
                tracing::debug!(start, stop, url = m.as_str(), "Hover link");
            }
            None => {
                self.active = Some(HoverSpan {
                    start: word_start,
                    stop: word_end,
                    linked: false,
                });
            }
        }
    }

    /// Drop the active span and its indicator
    pub fn clear(&mut self, surface: &mut impl TextSurface) {
        if let Some(span) = self.active.take() {
            if span.linked {
                surface.clear_indicator_range(span.start, span.stop);
            }
        }
    }

    /// Handle a click; opens the highlighted URL when `required` is held
    ///
    /// Returns whether a URL was opened.
    pub fn on_click(
        &self,
        surface: &impl TextSurface,
        modifiers: Modifiers,
        required: LinkModifier,
        opener: &mut impl UrlOpener,
    ) -> bool {
        let Some((start, stop)) = self.link_span() else {
            return false;
        };
        if !required.matches(modifiers) {
            return false;
        }
        opener.open_url(&surface.text_range(start, stop));
        true
    }
}

/// Maximal run of URL-safe characters containing `pos`, as `[start, end)`
fn expand_word(surface: &impl TextSurface, pos: usize) -> Option<(usize, usize)> {
    let len = surface.len_chars();
    if pos >= len || !surface.char_at(pos).is_some_and(is_url_char) {
        return None;
    }

    let mut start = pos;
    while start > 0 && surface.char_at(start - 1).is_some_and(is_url_char) {
        start -= 1;
    }
    let mut end = pos + 1;
    while end < len && surface.char_at(end).is_some_and(is_url_char) {
        end += 1;
    }
    Some((start, end))
}

/// Every URL in `text`, as char-offset spans in order
pub fn find_links(text: &str) -> Vec<(usize, usize)> {
    let mut links = Vec::new();
    let mut word: Option<(usize, usize)> = None;
    let mut char_idx = 0;

    let mut flush = |word: &mut Option<(usize, usize)>, char_start: usize| {
        if let Some((byte_start, byte_end)) = word.take() {
            let candidate = &text[byte_start..byte_end];
            if let Some(m) = url_regex().find(candidate) {
                let start = char_start + candidate[..m.start()].chars().count();
                links.push((start, start + m.as_str().chars().count()));
            }
        }
    };

    let mut word_char_start = 0;
    for (byte_idx, ch) in text.char_indices() {
        if is_url_char(ch) {
            match word.as_mut() {
                Some((_, end)) => *end = byte_idx + ch.len_utf8(),
                None => {
                    word = Some((byte_idx, byte_idx + ch.len_utf8()));
                    word_char_start = char_idx;
                }
            }
        } else {
            flush(&mut word, word_char_start);
        }
        char_idx += 1;
    }
    flush(&mut word, word_char_start);
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_char_class() {
        for ch in "aZ09-._~:/?#@!$&'*+,;=`".chars() {
            assert!(is_url_char(ch), "{ch:?} should be URL-safe");
        }
        for ch in [' ', '\n', '"', '<', '>', '(', ')', 'é', '\t'] {
            assert!(!is_url_char(ch), "{ch:?} should not be URL-safe");
        }
    }

    #[test]
    fn test_link_modifier_requires_exact_modifier() {
        assert!(LinkModifier::Ctrl.matches(Modifiers::CTRL));
        assert!(!LinkModifier::Ctrl.matches(Modifiers::NONE));
        assert!(!LinkModifier::Ctrl.matches(Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::NONE
        }));
    }

    #[test]
    fn test_find_links() {
        let text = "docs: https://example.com/a, mail mailto:me@x.org and ftp://f.net.";
        let links = find_links(text);
        let found: Vec<&str> = links
            .iter()
            .map(|&(s, e)| &text[s..e])
            .collect();
        // Trailing punctuation inside the URL-safe class stays attached
        assert_eq!(
            found,
            vec!["https://example.com/a,", "mailto:me@x.org", "ftp://f.net."]
        );
    }

    #[test]
    fn test_find_links_char_offsets_after_multibyte() {
        let text = "héllo http://a.b";
        assert_eq!(find_links(text), vec![(6, 16)]);
    }

    #[test]
    fn test_url_inside_longer_word() {
        let links = find_links("see:https://x.io");
        assert_eq!(links, vec![(4, 16)]);
    }
}
