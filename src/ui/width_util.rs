use terminal_size::{Width, terminal_size};

use crate::ui::ascii::ESC;
type CharIter<'a> = std::iter::Peekable<std::str::Chars<'a>>;

const FALLBACK_WIDTH: usize = 80;

/// Measures text as the terminal shows it: escape sequences take no columns
/// and every `char` takes one.
#[derive(Debug, Default, Clone)]
pub struct WidthUtil;

impl WidthUtil {
    pub fn strip_ansi(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut chars = s.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == ESC && chars.peek() == Some(&'[') {
                Self::consume_csi(&mut chars);
                continue;
            }
            out.push(ch);
        }
        out
    }

    fn consume_csi(chars: &mut CharIter<'_>) {
        let _ = chars.next();
        for c in chars.by_ref() {
            if c.is_ascii_alphabetic() {
                break;
            }
        }
    }

    pub fn visible_width(&self, s: &str) -> usize {
        Self::strip_ansi(s).chars().count()
    }

    pub fn pad_visible(&self, s: &str, width: usize) -> String {
        let w = self.visible_width(s);
        if w >= width {
            return s.to_string();
        }
        let mut out = String::with_capacity(s.len() + (width - w));
        out.push_str(s);
        out.extend(std::iter::repeat_n(' ', width - w));
        out
    }

    /// Cut plain text to `max` columns, ending with `~` when shortened.
    pub fn truncate_visible(&self, s: &str, max: usize) -> String {
        let plain = Self::strip_ansi(s);
        if plain.chars().count() <= max {
            return plain;
        }
        if max == 0 {
            return String::new();
        }
        let mut out: String = plain.chars().take(max - 1).collect();
        out.push('~');
        out
    }

    pub fn terminal_width(&self) -> usize {
        match terminal_size() {
            Some((Width(w), _)) => w as usize,
            None => FALLBACK_WIDTH,
        }
    }

    /// Left padding that centers `content_width` columns in the terminal.
    pub fn center_pad(&self, content_width: usize) -> usize {
        self.terminal_width().saturating_sub(content_width) / 2
    }
}
