//! Bar composition. Each bar renders an ordered list of modules; a module
//! supplies its width, draws into its assigned slot and routes clicks. Slot
//! assignment runs left and right ranges toward each other so center and
//! trailing alignments can share one bar.

use crate::actions::Clk;
use crate::config;
use crate::drw::Scheme;
use crate::state::Gale;
use crate::systray;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BarAlign {
    Left,
    Center,
    Right,
    LeftLeft,
    LeftRight,
    LeftCenter,
    None,
    RightLeft,
    RightRight,
    RightCenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarMon {
    All,
    Index(i32),
    /// Only on the currently focused monitor.
    Active,
}

impl BarMon {
    pub fn includes(&self, mi: usize) -> bool {
        match self {
            BarMon::All | BarMon::Active => true,
            BarMon::Index(i) => *i == mi as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarModule {
    Tags,
    LtSymbol,
    WinTitle,
    Status2d,
    Systray,
}

pub struct BarRule {
    pub monitor: BarMon,
    pub bar: usize,
    pub align: BarAlign,
    pub module: BarModule,
    pub name: &'static str,
}

/// The left/right range bookkeeping behind slot assignment. Pure, so the
/// alignment rules can be exercised directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    pub lx: i32,
    pub lw: i32,
    pub rx: i32,
    pub rw: i32,
}

impl BarLayout {
    pub fn new(bar_width: i32) -> Self {
        BarLayout { lx: 0, lw: bar_width, rx: 0, rw: bar_width }
    }

    pub fn max_width(&self, align: BarAlign) -> i32 {
        if align < BarAlign::RightLeft {
            self.lw
        } else {
            self.rw
        }
    }

    /// Assign a slot of width `w` (already capped to `max_width`) and
    /// shrink the ranges accordingly. Returns the slot's x offset.
    pub fn place(&mut self, align: BarAlign, w: i32) -> i32 {
        /* if one side is exhausted continue on the other */
        if self.lw <= 0 {
            self.lw = self.rw;
            self.lx = self.rx;
        } else if self.rw <= 0 {
            self.rw = self.lw;
            self.rx = self.lx;
        }

        let x;
        match align {
            BarAlign::None | BarAlign::LeftLeft | BarAlign::Left => {
                x = self.lx;
                if self.lx == self.rx {
                    self.rx += w;
                    self.rw -= w;
                }
                self.lx += w;
                self.lw -= w;
            }
            BarAlign::LeftRight | BarAlign::Right => {
                x = self.lx + self.lw - w;
                if self.lx == self.rx {
                    self.rw -= w;
                }
                self.lw -= w;
            }
            BarAlign::LeftCenter | BarAlign::Center => {
                x = self.lx + self.lw / 2 - w / 2;
                if self.lx == self.rx {
                    self.rw = self.rx + self.rw - x - w;
                    self.rx = x + w;
                }
                self.lw = x - self.lx;
            }
            BarAlign::RightLeft => {
                x = self.rx;
                if self.lx == self.rx {
                    self.lx += w;
                    self.lw -= w;
                }
                self.rx += w;
                self.rw -= w;
            }
            BarAlign::RightRight => {
                x = self.rx + self.rw - w;
                if self.lx == self.rx {
                    self.lw -= w;
                }
                self.rw -= w;
            }
            BarAlign::RightCenter => {
                x = self.rx + self.rw / 2 - w / 2;
                if self.lx == self.rx {
                    self.lw = self.lx + self.lw - x + w;
                    self.lx = x + w;
                }
                self.rw = x - self.rx;
            }
        }
        x
    }
}

pub fn draw_bars(state: &mut Gale) {
    for mi in 0..state.mons.len() {
        draw_bar(state, mi);
    }
}

pub fn draw_bar(state: &mut Gale, mi: usize) {
    for bi in 0..state.mons[mi].bars.len() {
        draw_bar_win(state, mi, bi);
    }
}

pub fn draw_bar_win(state: &mut Gale, mi: usize, bi: usize) {
    let (win, bw, bidx) = {
        let bar = &state.mons[mi].bars[bi];
        (bar.win, bar.bw, bar.idx)
    };
    if win.0 == 0 {
        return;
    }
    let bh = state.bh as u32;
    state.drw.rect(Scheme::Norm, 0, 0, bw.max(0) as u32, bh, true, true);

    let mut layout = BarLayout::new(bw);
    for (r, br) in config::BARRULES.iter().enumerate() {
        if br.bar != bidx || !br.monitor.includes(mi) {
            continue;
        }
        if br.monitor == BarMon::Active && mi != state.selmon {
            continue;
        }
        let max = layout.max_width(br.align);
        let w = module_width(state, br.module, mi, max).min(max);
        let x = layout.place(br.align, w);
        {
            let bar = &mut state.mons[mi].bars[bi];
            bar.x[r] = x;
            bar.w[r] = w;
        }
        draw_module(state, br.module, mi, bi, x, w);
    }
    state.drw.map(win.0, 0, 0, bw.max(0) as u32, bh);
}

fn module_width(state: &mut Gale, module: BarModule, mi: usize, max_width: i32) -> i32 {
    match module {
        BarModule::Tags => width_tags(state, mi),
        BarModule::LtSymbol => {
            state.drw.text_width(&state.mons[mi].ltsymbol) as i32 + state.lrpad
        }
        BarModule::WinTitle => max_width,
        BarModule::Status2d => crate::status::width_status(state),
        BarModule::Systray => systray::width_systray(state),
    }
}

fn draw_module(state: &mut Gale, module: BarModule, mi: usize, bi: usize, x: i32, w: i32) {
    match module {
        BarModule::Tags => draw_tags(state, mi, x),
        BarModule::LtSymbol => {
            let symbol = state.mons[mi].ltsymbol.clone();
            let lrpad = state.lrpad;
            let bh = state.bh;
            state
                .drw
                .text(Scheme::Norm, x, 0, w as u32, bh as u32, lrpad as u32 / 2, &symbol, false);
        }
        BarModule::WinTitle => draw_wintitle(state, mi, x, w),
        BarModule::Status2d => crate::status::draw_status(state, x, w),
        BarModule::Systray => systray::draw_systray(state, mi, bi, x, w),
    }
}

/// Dispatch a click inside a module's slot. `None` means the click was
/// consumed and no button binding should fire.
pub fn click_module(
    state: &mut Gale,
    module: BarModule,
    mi: usize,
    rel_x: i32,
) -> Option<(Clk, Option<u32>)> {
    match module {
        BarModule::Tags => {
            let occ = occupied_tags(state);
            let shown = |i: usize| {
                occ & (1 << i) != 0
                    || state.mons[mi].tagset[state.mons[mi].seltags] & (1 << i) != 0
            };
            let mut x = state.lrpad / 2;
            for i in 0..config::TAGS.len() {
                if !shown(i) {
                    continue;
                }
                x += state.drw.text_width(config::TAGS[i]) as i32 + state.lrpad;
                if rel_x < x {
                    return Some((Clk::TagBar, Some(1 << i)));
                }
            }
            Some((Clk::TagBar, None))
        }
        BarModule::LtSymbol => Some((Clk::LtSymbol, None)),
        BarModule::WinTitle => Some((Clk::WinTitle, None)),
        BarModule::Status2d => {
            crate::status::click_status(state, rel_x);
            Some((Clk::StatusText, None))
        }
        BarModule::Systray => None,
    }
}

/// Union of the tags of all clients, ignoring the omnipresent sentinel.
pub fn occupied_tags(state: &Gale) -> u32 {
    let mut occ = 0;
    for c in state.clients.values() {
        occ |= if c.tags == 255 { 0 } else { c.tags };
    }
    occ
}

fn width_tags(state: &mut Gale, mi: usize) -> i32 {
    let occ = occupied_tags(state);
    let m = &state.mons[mi];
    let mut w = 0;
    for (i, tag) in config::TAGS.iter().enumerate() {
        if occ & (1 << i) == 0 && m.tagset[m.seltags] & (1 << i) == 0 {
            continue;
        }
        w += state.drw.text_width(tag) as i32 + state.lrpad;
    }
    w
}

/// Vacant tags are skipped; selected tags use the selected scheme; urgent
/// tags draw inverted.
fn draw_tags(state: &mut Gale, mi: usize, x0: i32) {
    let mut occ = 0;
    let mut urg = 0;
    for c in state.clients.values() {
        occ |= if c.tags == 255 { 0 } else { c.tags };
        if c.isurgent {
            urg |= c.tags;
        }
    }

    let tagset = state.mons[mi].tagset[state.mons[mi].seltags];
    let bh = state.bh;
    let lrpad = state.lrpad;
    let mut x = x0;
    for (i, tag) in config::TAGS.iter().enumerate() {
        if occ & (1 << i) == 0 && tagset & (1 << i) == 0 {
            continue;
        }
        let invert = urg & (1 << i) != 0;
        let w = state.drw.text_width(tag) as i32 + lrpad;
        let scheme = if tagset & (1 << i) != 0 { Scheme::Sel } else { Scheme::Norm };
        state
            .drw
            .text(scheme, x, 0, w as u32, bh as u32, lrpad as u32 / 2, tag, invert);
        x += w;
    }
}

fn draw_wintitle(state: &mut Gale, mi: usize, x: i32, w: i32) {
    let bh = state.bh;
    let lrpad = state.lrpad;
    let sel = state.mons[mi].sel;
    match sel {
        Some(id) => {
            let name = state.clients[&id].name.clone();
            let scheme = if mi == state.selmon { Scheme::Sel } else { Scheme::Norm };
            state
                .drw
                .text(scheme, x, 0, w as u32, bh as u32, lrpad as u32 / 2, &name, false);
            if state.clients[&id].isfloating {
                let boxs = state.drw.font_height() as i32 / 9;
                let boxw = state.drw.font_height() as i32 / 6 + 2;
                state
                    .drw
                    .rect(scheme, x + boxs, boxs, boxw as u32, boxw as u32, state.clients[&id].isfixed, false);
            }
        }
        None => {
            state.drw.rect(Scheme::Norm, x, 0, w as u32, bh as u32, true, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_then_right_do_not_collide() {
        let mut l = BarLayout::new(1000);
        let a = l.place(BarAlign::Left, 200);
        let b = l.place(BarAlign::Right, 300);
        assert_eq!(a, 0);
        assert_eq!(b, 700);
        assert_eq!(l.lx, 200);
        assert_eq!(l.lw, 500);
    }

    #[test]
    fn none_fills_like_left() {
        let mut l = BarLayout::new(1000);
        l.place(BarAlign::Left, 100);
        l.place(BarAlign::Right, 100);
        let x = l.place(BarAlign::None, l.max_width(BarAlign::None));
        assert_eq!(x, 100);
    }

    #[test]
    fn center_splits_the_remaining_range() {
        let mut l = BarLayout::new(1000);
        let x = l.place(BarAlign::Center, 200);
        assert_eq!(x, 400);
        // left range now ends at the centered module
        assert_eq!(l.lw, 400);
        // right range starts just after it
        assert_eq!(l.rx, 600);
        assert_eq!(l.rw, 400);
    }

    #[test]
    fn right_side_modules_stack_from_the_right() {
        let mut l = BarLayout::new(1000);
        let a = l.place(BarAlign::Right, 100);
        let b = l.place(BarAlign::Right, 150);
        assert_eq!(a, 900);
        assert_eq!(b, 750);
    }

    #[test]
    fn exhausted_left_range_continues_on_right() {
        let mut l = BarLayout::new(300);
        l.place(BarAlign::Left, 300);
        assert!(l.lw <= 0);
        let x = l.place(BarAlign::RightRight, 100);
        assert_eq!(x, 200);
    }

    #[test]
    fn mirror_of_the_configured_bar() {
        // tags LEFT, layout LEFT, status RIGHT, wintitle NONE
        let mut l = BarLayout::new(1920);
        let tags = l.place(BarAlign::Left, 300);
        let lts = l.place(BarAlign::Left, 40);
        let status = l.place(BarAlign::Right, 400);
        let title_w = l.max_width(BarAlign::None);
        let title = l.place(BarAlign::None, title_w);
        assert_eq!(tags, 0);
        assert_eq!(lts, 300);
        assert_eq!(status, 1520);
        assert_eq!(title, 340);
        assert_eq!(title_w, 1180);
    }
}
