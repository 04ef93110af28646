//! Widget colors and the inline color markup carried by rendered strings.

use serde::{Deserialize, Serialize};

/// Named terminal colors available to widget configuration.
///
/// The core stays backend-agnostic; front-ends map these onto their own
/// style types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetColor {
    White,
    #[default]
    LightGray,
    DarkGray,
    Red,
    LightRed,
    Green,
    LightGreen,
    Yellow,
    Brown,
    Blue,
    LightBlue,
    Magenta,
    Pink,
    Cyan,
    LightCyan,
}

const COLOR_NAMES: &[(WidgetColor, &str)] = &[
    (WidgetColor::White, "white"),
    (WidgetColor::LightGray, "light_gray"),
    (WidgetColor::DarkGray, "dark_gray"),
    (WidgetColor::Red, "red"),
    (WidgetColor::LightRed, "light_red"),
    (WidgetColor::Green, "green"),
    (WidgetColor::LightGreen, "light_green"),
    (WidgetColor::Yellow, "yellow"),
    (WidgetColor::Brown, "brown"),
    (WidgetColor::Blue, "blue"),
    (WidgetColor::LightBlue, "light_blue"),
    (WidgetColor::Magenta, "magenta"),
    (WidgetColor::Pink, "pink"),
    (WidgetColor::Cyan, "cyan"),
    (WidgetColor::LightCyan, "light_cyan"),
];

impl WidgetColor {
    /// Configuration name of the color, matching its serde form.
    #[must_use]
    pub fn name(self) -> &'static str {
        COLOR_NAMES
            .iter()
            .find(|(color, _)| *color == self)
            .map(|(_, name)| *name)
            .unwrap_or("light_gray")
    }

    /// Parse a configuration name back into a color.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        COLOR_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(color, _)| *color)
    }
}

/// Inline color markup embedded in rendered widget strings.
///
/// A colored run is written `<color:NAME>text</color>`. Malformed or
/// unknown tags are passed through as literal text rather than rejected,
/// since rendered strings may interleave host-provided content.
pub mod markup {
    use super::WidgetColor;

    const OPEN_PREFIX: &str = "<color:";
    const CLOSE_TAG: &str = "</color>";

    /// Wrap `text` in a color tag.
    #[must_use]
    pub fn colorize(text: &str, color: WidgetColor) -> String {
        format!("{OPEN_PREFIX}{}>{text}{CLOSE_TAG}", color.name())
    }

    /// Iterate `(color, text)` runs of a marked-up string.
    pub fn segments(text: &str) -> Segments<'_> {
        Segments { rest: text }
    }

    /// Visible width of a marked-up string, in characters.
    #[must_use]
    pub fn display_width(text: &str) -> usize {
        segments(text).map(|(_, run)| run.chars().count()).sum()
    }

    /// Truncate to at most `width` visible characters, keeping tags balanced.
    #[must_use]
    pub fn truncate(text: &str, width: usize) -> String {
        let mut out = String::with_capacity(text.len());
        let mut remaining = width;
        for (color, run) in segments(text) {
            if remaining == 0 {
                break;
            }
            let taken: String = run.chars().take(remaining).collect();
            remaining -= taken.chars().count();
            match color {
                Some(color) => out.push_str(&colorize(&taken, color)),
                None => out.push_str(&taken),
            }
        }
        out
    }

    /// Pad with trailing spaces until the visible width reaches `width`.
    #[must_use]
    pub fn pad_to(text: &str, width: usize) -> String {
        let visible = display_width(text);
        let mut out = String::from(text);
        for _ in visible..width {
            out.push(' ');
        }
        out
    }

    /// Iterator over the colored and plain runs of a marked-up string.
    pub struct Segments<'a> {
        rest: &'a str,
    }

    impl<'a> Iterator for Segments<'a> {
        type Item = (Option<WidgetColor>, &'a str);

        fn next(&mut self) -> Option<Self::Item> {
            if self.rest.is_empty() {
                return None;
            }
            let Some(start) = self.rest.find(OPEN_PREFIX) else {
                let run = self.rest;
                self.rest = "";
                return Some((None, run));
            };
            if start > 0 {
                let (head, tail) = self.rest.split_at(start);
                self.rest = tail;
                return Some((None, head));
            }
            // The string starts with an opening tag candidate.
            let after = &self.rest[OPEN_PREFIX.len()..];
            if let Some(name_end) = after.find('>') {
                if let Some(color) = WidgetColor::from_name(&after[..name_end]) {
                    let body = &after[name_end + 1..];
                    if let Some(close) = body.find(CLOSE_TAG) {
                        self.rest = &body[close + CLOSE_TAG.len()..];
                        return Some((Some(color), &body[..close]));
                    }
                }
            }
            // Malformed tag: emit the '<' literally and move on.
            let (head, tail) = self.rest.split_at(1);
            self.rest = tail;
            Some((None, head))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::markup::{colorize, display_width, pad_to, segments, truncate};
    use super::WidgetColor;

    #[test]
    fn color_names_round_trip() {
        for (color, name) in super::COLOR_NAMES {
            assert_eq!(color.name(), *name);
            assert_eq!(WidgetColor::from_name(name), Some(*color));
        }
        assert_eq!(WidgetColor::from_name("ultraviolet"), None);
    }

    #[test]
    fn segments_split_colored_and_plain_runs() {
        let text = format!("HP: {}{}", colorize("42", WidgetColor::LightRed), "!");
        let runs: Vec<_> = segments(&text).collect();
        assert_eq!(
            runs,
            vec![
                (None, "HP: "),
                (Some(WidgetColor::LightRed), "42"),
                (None, "!"),
            ]
        );
    }

    #[test]
    fn display_width_ignores_tags() {
        let text = colorize("graph", WidgetColor::Green);
        assert_eq!(display_width(&text), 5);
        assert_eq!(display_width("plain"), 5);
    }

    #[test]
    fn truncate_keeps_tags_balanced() {
        let text = format!("ab{}", colorize("cdef", WidgetColor::Cyan));
        let cut = truncate(&text, 4);
        assert_eq!(display_width(&cut), 4);
        assert_eq!(cut, format!("ab{}", colorize("cd", WidgetColor::Cyan)));
        assert_eq!(truncate(&text, 0), "");
        assert_eq!(truncate(&text, 100), text);
    }

    #[test]
    fn pad_to_extends_visible_width() {
        let text = colorize("ok", WidgetColor::Green);
        let padded = pad_to(&text, 5);
        assert_eq!(display_width(&padded), 5);
        assert!(padded.ends_with("   "));
    }

    #[test]
    fn malformed_tags_fall_through_as_text() {
        let text = "<color:nope>x</color> <color:red unterminated";
        let flat: String = segments(text).map(|(_, run)| run).collect();
        assert_eq!(flat, text);
    }
}
