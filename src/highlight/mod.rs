//! Syntax highlighting for fenced code in the preview.
//!
//! Uses syntect with the bundled Sublime Text syntaxes and themes. The
//! terminal background (light or dark) picks the theme and tones down colors
//! that would be unreadable on a light background.

use std::sync::{Mutex, OnceLock};

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::markdown::{InlineColor, InlineSpan, InlineStyle};

const DARK_THEMES: &[&str] = &["Monokai Extended", "base16-ocean.dark", "Solarized (dark)"];
const LIGHT_THEMES: &[&str] = &["InspiredGitHub", "base16-ocean.light", "Solarized (light)"];

/// Forced terminal background, set from `--theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: Mutex<Option<HighlightBackground>> = Mutex::new(None);

/// Override background detection. `None` falls back to `COLORFGBG`.
pub fn set_background_mode(mode: Option<HighlightBackground>) {
    if let Ok(mut guard) = BACKGROUND_OVERRIDE.lock() {
        *guard = mode;
    }
}

/// The effective terminal background.
pub fn background_mode() -> HighlightBackground {
    if let Ok(guard) = BACKGROUND_OVERRIDE.lock()
        && let Some(mode) = *guard
    {
        return mode;
    }
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

pub fn is_light_background() -> bool {
    background_mode() == HighlightBackground::Light
}

/// Highlight `code` line by line.
///
/// Unknown or missing languages produce plain code spans.
pub fn highlight_code(language: Option<&str>, code: &str) -> Vec<Vec<InlineSpan>> {
    let plain = InlineStyle {
        code: true,
        ..InlineStyle::default()
    };
    let Some(syntax) = language.and_then(find_syntax) else {
        return code
            .lines()
            .map(|line| vec![InlineSpan::new(line.to_string(), plain)])
            .collect();
    };

    let mode = background_mode();
    let mut highlighter = HighlightLines::new(syntax, theme_for(mode));
    code.lines()
        .map(|line| {
            let Ok(ranges) = highlighter.highlight_line(line, syntax_set()) else {
                return vec![InlineSpan::new(line.to_string(), plain)];
            };
            ranges
                .into_iter()
                .map(|(style, text)| {
                    let fg = InlineColor {
                        r: style.foreground.r,
                        g: style.foreground.g,
                        b: style.foreground.b,
                    };
                    InlineSpan::new(
                        text.to_string(),
                        InlineStyle {
                            fg: Some(adjust_fg_for_background(fg, mode)),
                            ..plain
                        },
                    )
                })
                .collect()
        })
        .collect()
}

fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    let set = syntax_set();
    set.find_syntax_by_token(language)
        .or_else(|| set.find_syntax_by_name(language))
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_for(mode: HighlightBackground) -> &'static Theme {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    static FALLBACK: OnceLock<Theme> = OnceLock::new();
    let themes = THEME_SET.get_or_init(ThemeSet::load_defaults);
    let preferred = match mode {
        HighlightBackground::Dark => DARK_THEMES,
        HighlightBackground::Light => LIGHT_THEMES,
    };
    preferred
        .iter()
        .find_map(|name| themes.themes.get(*name))
        .or_else(|| themes.themes.values().next())
        .unwrap_or_else(|| FALLBACK.get_or_init(Theme::default))
}

fn background_from_colorfgbg(colorfgbg: Option<&str>) -> HighlightBackground {
    // COLORFGBG is "fg;bg" (sometimes "fg;default;bg"); the last field is the background.
    let bg = colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.parse::<u8>().ok());
    match bg {
        Some(bg) if bg >= 7 => HighlightBackground::Light,
        _ => HighlightBackground::Dark,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops
)]
fn adjust_fg_for_background(color: InlineColor, mode: HighlightBackground) -> InlineColor {
    if mode == HighlightBackground::Dark {
        return color;
    }
    let luma = 0.2126 * f32::from(color.r)
        + 0.7152 * f32::from(color.g)
        + 0.0722 * f32::from(color.b);
    if luma < 155.0 {
        return color;
    }
    let darken = |v: u8| (f32::from(v) * 0.42).round() as u8;
    InlineColor {
        r: darken(color.r),
        g: darken(color.g),
        b: darken(color.b),
    }
}
