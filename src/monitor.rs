use crate::client::ClientId;
use crate::config;
use crate::layouts::Layout;
use crate::xwrapper::Window;

/// One bar window owned by a monitor. Per-module slot assignments (`x`/`w`)
/// are filled in by the composer on every draw and reused for click routing.
#[derive(Debug, Clone)]
pub struct BarWin {
    pub win: Window,
    pub idx: usize,
    pub topbar: bool,
    pub bx: i32,
    pub by: i32,
    pub bw: i32,
    pub bh: i32,
    pub x: Vec<i32>,
    pub w: Vec<i32>,
}

impl BarWin {
    pub fn new(idx: usize, topbar: bool, nrules: usize) -> Self {
        BarWin {
            win: Window(0),
            idx,
            topbar,
            bx: 0,
            by: 0,
            bw: 0,
            bh: 0,
            x: vec![0; nrules],
            w: vec![0; nrules],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Monitor {
    pub ltsymbol: String,
    pub mfact: f32,
    pub nmaster: i32,
    pub num: i32,
    /* screen geometry */
    pub mx: i32,
    pub my: i32,
    pub mw: i32,
    pub mh: i32,
    /* window area, screen minus bars */
    pub wx: i32,
    pub wy: i32,
    pub ww: i32,
    pub wh: i32,
    pub gappih: i32,
    pub gappiv: i32,
    pub gappoh: i32,
    pub gappov: i32,
    pub seltags: usize,
    pub sellt: usize,
    pub tagset: [u32; 2],
    pub showbar: bool,
    pub sel: Option<ClientId>,
    pub bars: Vec<BarWin>,
    pub lt: [&'static Layout; 2],
}

impl Monitor {
    pub fn new(tagset: u32) -> Self {
        Monitor {
            ltsymbol: config::LAYOUTS[0].symbol.to_string(),
            mfact: config::MFACT,
            nmaster: config::NMASTER,
            num: 0,
            mx: 0,
            my: 0,
            mw: 0,
            mh: 0,
            wx: 0,
            wy: 0,
            ww: 0,
            wh: 0,
            gappih: config::GAPPIH,
            gappiv: config::GAPPIV,
            gappoh: config::GAPPOH,
            gappov: config::GAPPOV,
            seltags: 0,
            sellt: 0,
            tagset: [tagset, tagset],
            showbar: config::SHOWBAR,
            sel: None,
            bars: Vec::new(),
            lt: [&config::LAYOUTS[0], &config::LAYOUTS[2]],
        }
    }

    /// Overlap area between a rectangle and this monitor's window area.
    pub fn intersect_area(&self, x: i32, y: i32, w: i32, h: i32) -> i32 {
        std::cmp::max(0, std::cmp::min(x + w, self.wx + self.ww) - std::cmp::max(x, self.wx))
            * std::cmp::max(0, std::cmp::min(y + h, self.wy + self.wh) - std::cmp::max(y, self.wy))
    }

    /// Recompute the window area and the bar positions from the screen
    /// rectangle and the bar set. Hidden bars park just above the screen.
    pub fn update_bar_pos(&mut self, bh: i32) {
        self.wy = self.my;
        self.wh = self.mh;

        for bar in &mut self.bars {
            bar.bx = self.mx;
            bar.bw = self.mw;
            bar.bh = bh;
        }

        if !self.showbar {
            for bar in &mut self.bars {
                bar.by = -bh;
            }
            return;
        }

        let num_bars = self.bars.len() as i32;
        if self.bars.iter().any(|b| b.topbar) {
            self.wy = self.my + bh;
        }
        self.wh -= bh * num_bars;

        for bar in &mut self.bars {
            bar.by = if bar.topbar { self.wy - bh } else { self.wy + self.wh };
        }
    }

    pub fn layout(&self) -> &'static Layout {
        self.lt[self.sellt]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mon(mx: i32, my: i32, mw: i32, mh: i32) -> Monitor {
        let mut m = Monitor::new(1);
        m.mx = mx;
        m.my = my;
        m.mw = mw;
        m.mh = mh;
        m.wx = mx;
        m.wy = my;
        m.ww = mw;
        m.wh = mh;
        m
    }

    #[test]
    fn top_bar_shrinks_work_area_from_above() {
        let mut m = mon(0, 0, 1920, 1080);
        m.bars.push(BarWin::new(0, true, 4));
        m.update_bar_pos(24);
        assert_eq!(m.wy, 24);
        assert_eq!(m.wh, 1056);
        assert_eq!(m.bars[0].by, 0);
    }

    #[test]
    fn hidden_bar_gives_back_the_whole_screen() {
        let mut m = mon(0, 0, 1920, 1080);
        m.bars.push(BarWin::new(0, true, 4));
        m.showbar = false;
        m.update_bar_pos(24);
        assert_eq!((m.wy, m.wh), (0, 1080));
        assert_eq!(m.bars[0].by, -24);
    }

    #[test]
    fn two_bars_take_both_edges() {
        let mut m = mon(0, 100, 1920, 1080);
        m.bars.push(BarWin::new(0, true, 4));
        m.bars.push(BarWin::new(1, false, 4));
        m.update_bar_pos(20);
        assert_eq!(m.wy, 120);
        assert_eq!(m.wh, 1040);
        assert_eq!(m.bars[0].by, 100);
        assert_eq!(m.bars[1].by, 120 + 1040);
    }

    #[test]
    fn intersect_is_clamped_to_zero() {
        let m = mon(0, 0, 100, 100);
        assert_eq!(m.intersect_area(200, 200, 10, 10), 0);
        assert_eq!(m.intersect_area(90, 90, 20, 20), 100);
    }
}
