//! Status text plumbing. The status producer writes the root window name; a
//! semicolon splits it into a primary and an extra half. Raw control bytes
//! tag block boundaries for click routing, and `^`-escapes carry colors.

use std::process::Command;

use x11::xlib;

use crate::config;
use crate::state::Gale;

/// One run of status text with optional color overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSegment {
    pub text: String,
    pub fg: Option<String>,
    pub bg: Option<String>,
}

/// Parse the `^`-escape language: `^c#rrggbb^` sets the foreground,
/// `^b#rrggbb^` the background, `^d^` resets both, `^^` is a literal caret.
/// Unknown or unterminated escapes are dropped.
pub fn parse_status(s: &str) -> Vec<StatusSegment> {
    let mut segments = Vec::new();
    let mut cur = StatusSegment::default();
    let mut chars = s.chars().peekable();

    let mut flush = |cur: &mut StatusSegment, fg: Option<String>, bg: Option<String>| {
        if !cur.text.is_empty() {
            segments.push(cur.clone());
        }
        *cur = StatusSegment { text: String::new(), fg, bg };
    };

    while let Some(ch) = chars.next() {
        if ch != '^' {
            cur.text.push(ch);
            continue;
        }
        if chars.peek() == Some(&'^') {
            chars.next();
            cur.text.push('^');
            continue;
        }
        let mut esc = String::new();
        for e in chars.by_ref() {
            if e == '^' {
                break;
            }
            esc.push(e);
        }
        match esc.chars().next() {
            Some('c') => {
                let fg = Some(esc[1..].to_string());
                let bg = cur.bg.clone();
                flush(&mut cur, fg, bg);
            }
            Some('b') => {
                let fg = cur.fg.clone();
                let bg = Some(esc[1..].to_string());
                flush(&mut cur, fg, bg);
            }
            Some('d') => flush(&mut cur, None, None),
            _ => {}
        }
    }
    if !cur.text.is_empty() {
        segments.push(cur);
    }
    segments
}

/// Visible text of a status string, escapes and control bytes removed.
pub fn visible_text(s: &str) -> String {
    parse_status(&strip_control(s))
        .into_iter()
        .map(|seg| seg.text)
        .collect()
}

fn strip_control(s: &str) -> String {
    s.chars().filter(|&c| c >= ' ').collect()
}

pub fn update_status(state: &mut Gale) {
    match state.xw.get_text_prop(state.root, xlib::XA_WM_NAME) {
        None => {
            state.stext = concat!("gale-", env!("CARGO_PKG_VERSION")).to_string();
            state.estext.clear();
            state.rawstext.clear();
            state.rawestext.clear();
        }
        Some(raw) => {
            match raw.split_once(config::STATUSSEP) {
                Some((primary, extra)) => {
                    state.rawstext = primary.to_string();
                    state.rawestext = extra.to_string();
                    state.estext = strip_control(extra);
                }
                None => {
                    state.rawstext = raw;
                    state.rawestext.clear();
                    state.estext.clear();
                }
            }
            state.stext = strip_control(&state.rawstext);
        }
    }
    crate::bar::draw_bars(state);
}

pub fn width_status(state: &mut Gale) -> i32 {
    let text = state.stext.clone();
    let segments = parse_status(&text);
    let mut w = 0;
    for seg in &segments {
        w += state.drw.text_width(&seg.text) as i32;
    }
    w + state.lrpad
}

pub fn draw_status(state: &mut Gale, x: i32, w: i32) {
    let bh = state.bh as u32;
    state.drw.rect(crate::drw::Scheme::Norm, x, 0, w as u32, bh, true, true);
    let text = state.stext.clone();
    let segments = parse_status(&text);
    let (def_fg, def_bg) = (state.palette.foreground.clone(), state.palette.background.clone());
    let mut cx = x + state.lrpad / 2;
    for seg in segments {
        let sw = state.drw.text_width(&seg.text) as i32;
        let fg = seg.fg.as_deref().unwrap_or(&def_fg);
        let bg = seg.bg.as_deref().unwrap_or(&def_bg);
        state.drw.text_colored(fg, bg, cx, 0, sw as u32, bh, &seg.text);
        cx += sw;
    }
}

/// Resolve which status block was clicked: blocks are delimited by raw
/// bytes below 0x20 whose value is the block's signal number.
pub fn click_status(state: &mut Gale, rel_x: i32) {
    state.statussig = 0;
    let raw = state.rawstext.clone();
    let mut x = 0;
    let mut block = String::new();
    for ch in raw.chars() {
        if ch >= ' ' {
            block.push(ch);
            continue;
        }
        let bw: i32 = parse_status(&block)
            .iter()
            .map(|seg| state.drw.text_width(&seg.text) as i32)
            .sum();
        x += bw;
        block.clear();
        if x >= rel_x {
            break;
        }
        state.statussig = ch as i32;
    }
}

/// Probe for the status producer's pid. Follows the historical convention:
/// 0 reports success, -1 only the pid-was-zero case.
fn get_statusbar_pid(state: &mut Gale) -> i32 {
    let pid = Command::new("pidof")
        .args(["-s", config::STATUSBAR])
        .output()
        .ok()
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .and_then(|s| s.trim().parse::<libc::pid_t>().ok())
        .unwrap_or(0);
    state.statusbar_pid = pid;
    if pid != 0 {
        0
    } else {
        -1
    }
}

/// Queue `SIGRTMIN + block` at the status producer, with the button number
/// as payload. Silently does nothing without a resolvable producer.
pub fn sig_statusbar(state: &mut Gale, button: i32) {
    if state.statussig == 0 {
        return;
    }
    if state.statusbar_pid == 0 && get_statusbar_pid(state) == -1 {
        return;
    }
    unsafe {
        let sv = libc::sigval {
            sival_ptr: button as usize as *mut libc::c_void,
        };
        libc::sigqueue(state.statusbar_pid, libc::SIGRTMIN() + state.statussig, sv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_segment() {
        let segs = parse_status("cpu 42%");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "cpu 42%");
        assert_eq!(segs[0].fg, None);
    }

    #[test]
    fn color_escapes_split_segments() {
        let segs = parse_status("a^c#ff0000^b^d^c");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].text, "a");
        assert_eq!(segs[1].text, "b");
        assert_eq!(segs[1].fg.as_deref(), Some("#ff0000"));
        assert_eq!(segs[2].text, "c");
        assert_eq!(segs[2].fg, None);
    }

    #[test]
    fn background_keeps_current_foreground() {
        let segs = parse_status("^c#111111^x^b#222222^y");
        assert_eq!(segs[1].fg.as_deref(), Some("#111111"));
        assert_eq!(segs[1].bg.as_deref(), Some("#222222"));
    }

    #[test]
    fn doubled_caret_is_literal() {
        let segs = parse_status("100^^ done");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "100^ done");
    }

    #[test]
    fn control_bytes_are_stripped_from_display_text() {
        let raw = "\u{1}vol 10%\u{2}bat 90%";
        assert_eq!(strip_control(raw), "vol 10%bat 90%");
    }

    #[test]
    fn visible_text_drops_escapes_and_control_bytes() {
        assert_eq!(visible_text("\u{1}a^c#ff0000^b^d^c"), "abc");
    }
}
