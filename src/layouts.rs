//! Layout arithmetic. Every layout is a pure function from (work area,
//! parameters, tile count) to one frame rectangle per tile, in client-list
//! order. Rectangles include the border; the resize path subtracts it.
//!
//! Shared conventions: widths and heights round down, remainder pixels go to
//! the last tile of the affected row or column, and a lone tile multiplies
//! all gaps by the smart-gap factor.

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Tile,
    Monocle,
    Deck,
    Spiral,
    Dwindle,
    BStack,
    BStackHoriz,
    Grid,
    NRowGrid,
    HorizGrid,
    GaplessGrid,
    CenteredMaster,
    CenteredFloatingMaster,
}

/// One row of the layout table: a short symbol and the arrange function.
/// `arrange == None` means floating behavior.
#[derive(Debug)]
pub struct Layout {
    pub symbol: &'static str,
    pub arrange: Option<LayoutKind>,
}

#[derive(Debug, Clone, Copy)]
pub struct ArrangeParams {
    pub wx: i32,
    pub wy: i32,
    pub ww: i32,
    pub wh: i32,
    pub mfact: f32,
    pub nmaster: i32,
    /* effective gaps, smart-gap factor already applied */
    pub oh: i32,
    pub ov: i32,
    pub ih: i32,
    pub iv: i32,
}

/// Gaps as used by the layouts: a single tile gets them scaled by the
/// configured smart-gap factor.
pub fn effective_gaps(
    (oh, ov, ih, iv): (i32, i32, i32, i32),
    ntiled: usize,
) -> (i32, i32, i32, i32) {
    let f = if ntiled == 1 { config::SMARTGAPS } else { 1 };
    (oh * f, ov * f, ih * f, iv * f)
}

pub fn arrange(kind: LayoutKind, p: &ArrangeParams, n: usize) -> Vec<Rect> {
    if n == 0 {
        return Vec::new();
    }
    match kind {
        LayoutKind::Tile => tile(p, n),
        LayoutKind::Monocle => monocle(p, n),
        LayoutKind::Deck => deck(p, n),
        LayoutKind::Spiral => fibonacci(p, n, true),
        LayoutKind::Dwindle => fibonacci(p, n, false),
        LayoutKind::BStack => bstack(p, n, false),
        LayoutKind::BStackHoriz => bstack(p, n, true),
        LayoutKind::Grid => grid(p, n),
        LayoutKind::NRowGrid => nrowgrid(p, n),
        LayoutKind::HorizGrid => horizgrid(p, n),
        LayoutKind::GaplessGrid => gaplessgrid(p, n),
        LayoutKind::CenteredMaster => centeredmaster(p, n),
        LayoutKind::CenteredFloatingMaster => centeredfloatingmaster(p, n),
    }
}

fn nm(p: &ArrangeParams, n: usize) -> usize {
    (p.nmaster.max(0) as usize).min(n)
}

fn tile(p: &ArrangeParams, n: usize) -> Vec<Rect> {
    let nmaster = p.nmaster.max(0) as usize;
    let mx = p.wx + p.ov;
    let mut mw = p.ww - 2 * p.ov;
    let mut sx = mx;
    let mut sw = mw;

    if nmaster > 0 && n > nmaster {
        sw = ((mw - p.iv) as f32 * (1.0 - p.mfact)) as i32;
        mw = mw - p.iv - sw;
        sx = mx + mw + p.iv;
    }

    let top = p.wy + p.oh;
    let total = p.wh - 2 * p.oh;
    let mut my = 0;
    let mut ty = 0;
    let mut rects = Vec::with_capacity(n);
    for i in 0..n {
        if i < nmaster {
            let rem = (nm(p, n) - i) as i32;
            let h = (total - my - p.ih * (rem - 1)) / rem;
            rects.push(Rect { x: mx, y: top + my, w: mw, h });
            my += h + p.ih;
        } else {
            let rem = (n - i) as i32;
            let h = (total - ty - p.ih * (rem - 1)) / rem;
            rects.push(Rect { x: sx, y: top + ty, w: sw, h });
            ty += h + p.ih;
        }
    }
    rects
}

fn monocle(p: &ArrangeParams, n: usize) -> Vec<Rect> {
    let r = Rect {
        x: p.wx + p.ov,
        y: p.wy + p.oh,
        w: p.ww - 2 * p.ov,
        h: p.wh - 2 * p.oh,
    };
    vec![r; n]
}

fn deck(p: &ArrangeParams, n: usize) -> Vec<Rect> {
    let nmaster = p.nmaster.max(0) as usize;
    let mx = p.wx + p.ov;
    let mut mw = p.ww - 2 * p.ov;
    let mut sx = mx;
    let mut sw = mw;

    if nmaster > 0 && n > nmaster {
        sw = ((mw - p.iv) as f32 * (1.0 - p.mfact)) as i32;
        mw = mw - p.iv - sw;
        sx = mx + mw + p.iv;
    }

    let top = p.wy + p.oh;
    let total = p.wh - 2 * p.oh;
    let mut my = 0;
    let mut rects = Vec::with_capacity(n);
    for i in 0..n {
        if i < nmaster {
            let rem = (nm(p, n) - i) as i32;
            let h = (total - my - p.ih * (rem - 1)) / rem;
            rects.push(Rect { x: mx, y: top + my, w: mw, h });
            my += h + p.ih;
        } else {
            /* the whole stack shares one slot, topmost visible */
            rects.push(Rect { x: sx, y: top, w: sw, h: total });
        }
    }
    rects
}

/// Recursive halving. Each step the remaining region is split on an
/// alternating axis; the first split is weighted by mfact. `spiral` rotates
/// which side the client takes, dwindle keeps the remainder bottom-right.
fn fibonacci(p: &ArrangeParams, n: usize, spiral: bool) -> Vec<Rect> {
    let mut rx = p.wx + p.ov;
    let mut ry = p.wy + p.oh;
    let mut rw = p.ww - 2 * p.ov;
    let mut rh = p.wh - 2 * p.oh;
    let mut rects = Vec::with_capacity(n);

    for i in 0..n {
        if i == n - 1 {
            rects.push(Rect { x: rx, y: ry, w: rw, h: rh });
            break;
        }
        if i % 2 == 0 {
            /* split into left | right */
            let cw = if i == 0 {
                ((rw - p.iv) as f32 * p.mfact) as i32
            } else {
                (rw - p.iv) / 2
            };
            let rest = rw - p.iv - cw;
            if spiral && i % 4 == 2 {
                rects.push(Rect { x: rx + rest + p.iv, y: ry, w: cw, h: rh });
                rw = rest;
            } else {
                rects.push(Rect { x: rx, y: ry, w: cw, h: rh });
                rx += cw + p.iv;
                rw = rest;
            }
        } else {
            /* split into top / bottom */
            let ch = (rh - p.ih) / 2;
            let rest = rh - p.ih - ch;
            if spiral && i % 4 == 3 {
                rects.push(Rect { x: rx, y: ry + rest + p.ih, w: rw, h: ch });
                rh = rest;
            } else {
                rects.push(Rect { x: rx, y: ry, w: rw, h: ch });
                ry += ch + p.ih;
                rh = rest;
            }
        }
    }
    rects
}

fn bstack(p: &ArrangeParams, n: usize, horiz_stack: bool) -> Vec<Rect> {
    let nmaster = p.nmaster.max(0) as usize;
    let my0 = p.wy + p.oh;
    let mut mh = p.wh - 2 * p.oh;
    let mut sy = my0;
    let mut sh = mh;

    if nmaster > 0 && n > nmaster {
        sh = ((mh - p.ih) as f32 * (1.0 - p.mfact)) as i32;
        mh = mh - p.ih - sh;
        sy = my0 + mh + p.ih;
    }

    let left = p.wx + p.ov;
    let total_w = p.ww - 2 * p.ov;
    let mut mx = 0;
    let mut tx = 0;
    let mut ty = 0;
    let mut rects = Vec::with_capacity(n);
    for i in 0..n {
        if i < nmaster {
            let rem = (nm(p, n) - i) as i32;
            let w = (total_w - mx - p.iv * (rem - 1)) / rem;
            rects.push(Rect { x: left + mx, y: my0, w, h: mh });
            mx += w + p.iv;
        } else if horiz_stack {
            let rem = (n - i) as i32;
            let h = (sh - ty - p.ih * (rem - 1)) / rem;
            rects.push(Rect { x: left, y: sy + ty, w: total_w, h });
            ty += h + p.ih;
        } else {
            let rem = (n - i) as i32;
            let w = (total_w - tx - p.iv * (rem - 1)) / rem;
            rects.push(Rect { x: left + tx, y: sy, w, h: sh });
            tx += w + p.iv;
        }
    }
    rects
}

fn grid_dims(n: usize) -> (usize, usize) {
    let cols = (1..=n).find(|c| c * c >= n).unwrap_or(1);
    let rows = (n + cols - 1) / cols;
    (cols, rows)
}

fn grid(p: &ArrangeParams, n: usize) -> Vec<Rect> {
    let (cols, rows) = grid_dims(n);
    let (cols, rows) = (cols as i32, rows as i32);
    let avail_w = p.ww - 2 * p.ov - p.iv * (cols - 1);
    let avail_h = p.wh - 2 * p.oh - p.ih * (rows - 1);
    let cw = avail_w / cols;
    let ch = avail_h / rows;
    let wrest = avail_w - cw * cols;
    let hrest = avail_h - ch * rows;

    let mut rects = Vec::with_capacity(n);
    for i in 0..n as i32 {
        let col = i % cols;
        let row = i / cols;
        rects.push(Rect {
            x: p.wx + p.ov + col * (cw + p.iv),
            y: p.wy + p.oh + row * (ch + p.ih),
            w: cw + if col == cols - 1 { wrest } else { 0 },
            h: ch + if row == rows - 1 { hrest } else { 0 },
        });
    }
    rects
}

/// nmaster+1 rows; clients are spread over the rows as evenly as possible,
/// earlier rows never holding fewer clients than later ones.
fn nrowgrid(p: &ArrangeParams, n: usize) -> Vec<Rect> {
    let mut rows = (p.nmaster.max(0) as usize) + 1;
    if config::FORCE_VSPLIT && n == 2 {
        rows = 1;
    }
    if n < rows {
        rows = n;
    }

    let avail_h = p.wh - 2 * p.oh - p.ih * (rows as i32 - 1);
    let ch = avail_h / rows as i32;
    let hrest = avail_h - ch * rows as i32;

    let mut rects = Vec::with_capacity(n);
    let mut used = 0usize;
    for ri in 0..rows {
        let cols = (n - used) / (rows - ri);
        let y = p.wy + p.oh + ri as i32 * (ch + p.ih);
        let h = ch + if ri == rows - 1 { hrest } else { 0 };
        let mut uw = 0;
        for ci in 0..cols {
            let rem = (cols - ci) as i32;
            let w = (p.ww - 2 * p.ov - uw - p.iv * (rem - 1)) / rem;
            rects.push(Rect { x: p.wx + p.ov + uw, y, w, h });
            uw += w + p.iv;
        }
        used += cols;
    }
    rects
}

fn horizgrid(p: &ArrangeParams, n: usize) -> Vec<Rect> {
    let (ntop, nbottom) = if n <= 2 { (n, 0) } else { (n / 2, n - n / 2) };

    let my0 = p.wy + p.oh;
    let mut mh = p.wh - 2 * p.oh;
    let mut sy = my0;
    let mut sh = 0;
    if nbottom > 0 {
        sh = (mh - p.ih) / 2;
        mh = mh - p.ih - sh;
        sy = my0 + mh + p.ih;
    }

    let mut rects = Vec::with_capacity(n);
    let mut row = |count: usize, y: i32, h: i32, rects: &mut Vec<Rect>| {
        let mut x = 0;
        for i in 0..count {
            let rem = (count - i) as i32;
            let w = (p.ww - 2 * p.ov - x - p.iv * (rem - 1)) / rem;
            rects.push(Rect { x: p.wx + p.ov + x, y, w, h });
            x += w + p.iv;
        }
    };
    row(ntop, my0, mh, &mut rects);
    if nbottom > 0 {
        row(nbottom, sy, sh, &mut rects);
    }
    rects
}

/// Column-major grid with no empty cells: trailing columns absorb the
/// leftover clients as an extra row.
fn gaplessgrid(p: &ArrangeParams, n: usize) -> Vec<Rect> {
    let mut cols = (1..=n).find(|c| c * c >= n).unwrap_or(1);
    if n == 5 {
        cols = 2;
    }
    let base_rows = n / cols;
    let extra = n % cols;

    let avail_w = p.ww - 2 * p.ov - p.iv * (cols as i32 - 1);
    let cw = avail_w / cols as i32;
    let wrest = avail_w - cw * cols as i32;

    let mut rects = Vec::with_capacity(n);
    for col in 0..cols {
        /* the last `extra` columns hold one more client */
        let rows = if col >= cols - extra { base_rows + 1 } else { base_rows };
        let avail_h = p.wh - 2 * p.oh - p.ih * (rows as i32 - 1);
        let ch = avail_h / rows as i32;
        let hrest = avail_h - ch * rows as i32;
        let x = p.wx + p.ov + col as i32 * (cw + p.iv);
        let w = cw + if col == cols - 1 { wrest } else { 0 };
        for row in 0..rows {
            rects.push(Rect {
                x,
                y: p.wy + p.oh + row as i32 * (ch + p.ih),
                w,
                h: ch + if row == rows - 1 { hrest } else { 0 },
            });
        }
    }
    rects
}

fn centeredmaster(p: &ArrangeParams, n: usize) -> Vec<Rect> {
    let nmaster = p.nmaster.max(0) as usize;
    let mut mx = p.wx + p.ov;
    let mut mw = p.ww - 2 * p.ov;
    let mut lw = 0;
    let mut rw = 0;
    let mut lx = p.wx + p.ov;
    let mut rx = p.wx + p.ov;

    if nmaster > 0 && n > nmaster {
        if n - nmaster > 1 {
            /* ||<-S->|<---M--->|<-S->|| */
            mw = ((p.ww - 2 * p.ov - 2 * p.iv) as f32 * p.mfact) as i32;
            let side = p.ww - 2 * p.ov - 2 * p.iv - mw;
            lw = side / 2;
            rw = side - lw;
            mx = p.wx + p.ov + lw + p.iv;
        } else {
            /* ||<---M--->|<-S->|| */
            mw = ((p.ww - 2 * p.ov - p.iv) as f32 * p.mfact) as i32;
            lw = 0;
            rw = p.ww - 2 * p.ov - p.iv - mw;
        }
        lx = p.wx + p.ov;
        rx = mx + mw + p.iv;
    }

    let nstack = n - nm(p, n);
    let nleft = nstack / 2;
    let nright = nstack - nleft;

    let top = p.wy + p.oh;
    let total = p.wh - 2 * p.oh;
    let (mut my, mut ly, mut ry) = (0, 0, 0);
    let (mut li, mut ri) = (0usize, 0usize);
    let mut rects = Vec::with_capacity(n);
    for i in 0..n {
        if i < nmaster {
            let rem = (nm(p, n) - i) as i32;
            let h = (total - my - p.ih * (rem - 1)) / rem;
            rects.push(Rect { x: mx, y: top + my, w: mw, h });
            my += h + p.ih;
        } else if (i - nmaster) % 2 == 1 && lw > 0 {
            let rem = (nleft - li) as i32;
            let h = (total - ly - p.ih * (rem - 1)) / rem;
            rects.push(Rect { x: lx, y: top + ly, w: lw, h });
            ly += h + p.ih;
            li += 1;
        } else {
            let rem = (nright - ri) as i32;
            let h = (total - ry - p.ih * (rem - 1)) / rem;
            rects.push(Rect { x: rx, y: top + ry, w: rw, h });
            ry += h + p.ih;
            ri += 1;
        }
    }
    rects
}

fn centeredfloatingmaster(p: &ArrangeParams, n: usize) -> Vec<Rect> {
    let nmaster = nm(p, n);
    let mut rects = Vec::with_capacity(n);

    if nmaster > 0 && n > nmaster {
        /* master box floats over the center, sized by orientation */
        let (mw, mh) = if p.ww > p.wh {
            (
                ((p.ww - 2 * p.ov) as f32 * p.mfact) as i32,
                ((p.wh - 2 * p.oh) as f32 * 0.9) as i32,
            )
        } else {
            (
                ((p.ww - 2 * p.ov) as f32 * 0.9) as i32,
                ((p.wh - 2 * p.oh) as f32 * p.mfact) as i32,
            )
        };
        let mx = p.wx + (p.ww - mw) / 2;
        let my = p.wy + (p.wh - mh) / 2;

        let mut off = 0;
        for i in 0..nmaster {
            let rem = (nmaster - i) as i32;
            let w = (mw - off - p.iv * (rem - 1)) / rem;
            rects.push(Rect { x: mx + off, y: my, w, h: mh });
            off += w + p.iv;
        }

        let nstack = n - nmaster;
        let mut sx = 0;
        let mut stack = Vec::with_capacity(nstack);
        for i in 0..nstack {
            let rem = (nstack - i) as i32;
            let w = (p.ww - 2 * p.ov - sx - p.iv * (rem - 1)) / rem;
            stack.push(Rect {
                x: p.wx + p.ov + sx,
                y: p.wy + p.oh,
                w,
                h: p.wh - 2 * p.oh,
            });
            sx += w + p.iv;
        }
        /* masters first in list order, tiled behind handled by restack */
        rects.extend(stack);
    } else {
        let mut sx = 0;
        for i in 0..n {
            let rem = (n - i) as i32;
            let w = (p.ww - 2 * p.ov - sx - p.iv * (rem - 1)) / rem;
            rects.push(Rect {
                x: p.wx + p.ov + sx,
                y: p.wy + p.oh,
                w,
                h: p.wh - 2 * p.oh,
            });
            sx += w + p.iv;
        }
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(ww: i32, wh: i32) -> ArrangeParams {
        ArrangeParams {
            wx: 0,
            wy: 0,
            ww,
            wh,
            mfact: 0.55,
            nmaster: 1,
            oh: 0,
            ov: 0,
            ih: 0,
            iv: 0,
        }
    }

    #[test]
    fn tile_master_and_stack_split_at_mfact() {
        let r = arrange(LayoutKind::Tile, &params(1920, 1080), 2);
        assert_eq!(r[0], Rect { x: 0, y: 0, w: 1056, h: 1080 });
        assert_eq!(r[1], Rect { x: 1056, y: 0, w: 864, h: 1080 });
    }

    #[test]
    fn tile_lone_client_takes_full_area() {
        let r = arrange(LayoutKind::Tile, &params(1920, 1080), 1);
        assert_eq!(r[0], Rect { x: 0, y: 0, w: 1920, h: 1080 });
    }

    #[test]
    fn tile_zero_nmaster_gives_stack_full_width() {
        let mut p = params(1000, 600);
        p.nmaster = 0;
        let r = arrange(LayoutKind::Tile, &p, 2);
        assert_eq!(r[0].w, 1000);
        assert_eq!(r[1].w, 1000);
        assert_eq!(r[0].h + r[1].h, 600);
    }

    #[test]
    fn tile_stack_remainder_goes_to_last() {
        let r = arrange(LayoutKind::Tile, &params(1920, 1000), 4);
        // three stack clients over 1000px: 333 + 333 + 334
        assert_eq!(r[1].h, 333);
        assert_eq!(r[2].h, 333);
        assert_eq!(r[3].h, 334);
        assert_eq!(r[3].y, r[2].y + r[2].h);
    }

    #[test]
    fn tile_respects_gaps() {
        let mut p = params(1920, 1080);
        p.oh = 10;
        p.ov = 30;
        p.ih = 20;
        p.iv = 20;
        let r = arrange(LayoutKind::Tile, &p, 3);
        assert_eq!(r[0].x, 30);
        assert_eq!(r[0].y, 10);
        // stack column starts after master + inner gap
        assert_eq!(r[1].x, r[0].x + r[0].w + 20);
        // inner gap between the two stack rows
        assert_eq!(r[2].y, r[1].y + r[1].h + 20);
        assert_eq!(r[2].y + r[2].h, 1080 - 10);
    }

    #[test]
    fn monocle_fills_work_area_minus_gaps() {
        let mut p = params(1920, 1080);
        p.oh = 5;
        p.ov = 7;
        let r = arrange(LayoutKind::Monocle, &p, 3);
        for rect in &r {
            assert_eq!(*rect, Rect { x: 7, y: 5, w: 1920 - 14, h: 1080 - 10 });
        }
    }

    #[test]
    fn smartgaps_factor_applies_to_a_lone_tile() {
        assert_eq!(effective_gaps((10, 30, 20, 20), 1), (30, 90, 60, 60));
        assert_eq!(effective_gaps((10, 30, 20, 20), 2), (10, 30, 20, 20));
    }

    #[test]
    fn deck_stack_slots_coincide() {
        let r = arrange(LayoutKind::Deck, &params(1920, 1080), 4);
        assert_eq!(r[1], r[2]);
        assert_eq!(r[2], r[3]);
        assert_eq!(r[1].x, 1056);
        assert_eq!(r[1].w, 864);
    }

    #[test]
    fn bstack_master_on_top() {
        let r = arrange(LayoutKind::BStack, &params(1000, 1000), 3);
        assert_eq!(r[0].y, 0);
        assert_eq!(r[0].w, 1000);
        assert_eq!(r[0].h, 550);
        assert_eq!(r[1].y, 550);
        assert_eq!(r[2].y, 550);
        assert_eq!(r[1].w + r[2].w, 1000);
    }

    #[test]
    fn bstackhoriz_stack_as_rows() {
        let r = arrange(LayoutKind::BStackHoriz, &params(1000, 1000), 3);
        assert_eq!(r[1].w, 1000);
        assert_eq!(r[2].w, 1000);
        assert_eq!(r[1].h + r[2].h, 450);
    }

    #[test]
    fn grid_dims_are_ceil_sqrt() {
        assert_eq!(grid_dims(1), (1, 1));
        assert_eq!(grid_dims(2), (2, 1));
        assert_eq!(grid_dims(4), (2, 2));
        assert_eq!(grid_dims(5), (3, 2));
        assert_eq!(grid_dims(9), (3, 3));
        assert_eq!(grid_dims(10), (4, 3));
    }

    #[test]
    fn grid_cells_cover_rows_left_to_right() {
        let r = arrange(LayoutKind::Grid, &params(900, 600), 5);
        // 3 columns, 2 rows; first row has three cells, second row two
        assert_eq!(r[0].y, r[1].y);
        assert_eq!(r[1].y, r[2].y);
        assert_eq!(r[3].y, r[4].y);
        assert!(r[3].y > r[0].y);
        assert_eq!(r[0].w + r[1].w + r[2].w, 900);
    }

    #[test]
    fn gaplessgrid_has_no_empty_cells() {
        let r = arrange(LayoutKind::GaplessGrid, &params(1000, 600), 5);
        assert_eq!(r.len(), 5);
        // n == 5 forces two columns: 2 then 3 clients
        assert_eq!(r.iter().filter(|c| c.x == 0).count(), 2);
        let area: i64 = r.iter().map(|c| c.w as i64 * c.h as i64).sum();
        assert_eq!(area, 1000 * 600);
    }

    #[test]
    fn nrowgrid_two_clients_split_vertically() {
        let r = arrange(LayoutKind::NRowGrid, &params(1000, 600), 2);
        assert_eq!(r[0].y, r[1].y);
        assert_eq!(r[0].w + r[1].w, 1000);
    }

    #[test]
    fn horizgrid_splits_into_two_rows_past_two() {
        let r = arrange(LayoutKind::HorizGrid, &params(1000, 600), 4);
        assert_eq!(r[0].y, r[1].y);
        assert_eq!(r[2].y, r[3].y);
        assert!(r[2].y > r[0].y);
    }

    #[test]
    fn centeredmaster_splits_stack_around_master() {
        let r = arrange(LayoutKind::CenteredMaster, &params(1200, 600), 3);
        let master = r[0];
        assert!(r[2].x < master.x, "first stack client goes left");
        assert!(r[1].x > master.x, "second stack client goes right");
        assert_eq!(master.w, (1200.0 * 0.55) as i32);
    }

    #[test]
    fn centeredfloatingmaster_master_overlaps_center() {
        let r = arrange(LayoutKind::CenteredFloatingMaster, &params(1200, 600), 3);
        let m = r[0];
        assert_eq!(m.x, (1200 - m.w) / 2);
        assert_eq!(m.w, (1200.0 * 0.55) as i32);
        // stack spans the full area behind
        assert_eq!(r[1].w + r[2].w, 1200);
    }

    #[test]
    fn fibonacci_regions_stay_inside_work_area() {
        for kind in [LayoutKind::Spiral, LayoutKind::Dwindle] {
            for n in 1..8 {
                let r = arrange(kind, &params(1920, 1080), n);
                assert_eq!(r.len(), n);
                for rect in &r {
                    assert!(rect.x >= 0 && rect.y >= 0);
                    assert!(rect.x + rect.w <= 1920);
                    assert!(rect.y + rect.h <= 1080);
                    assert!(rect.w >= 1 && rect.h >= 1);
                }
            }
        }
    }

    #[test]
    fn dwindle_remainder_drifts_bottom_right() {
        let r = arrange(LayoutKind::Dwindle, &params(1000, 1000), 4);
        assert_eq!(r[0].x, 0);
        assert!(r[1].x > r[0].x);
        assert!(r[2].y > r[1].y);
        assert!(r[3].x > r[2].x && r[3].y >= r[2].y);
    }

    #[test]
    fn layouts_never_overlap_tiles() {
        for kind in [
            LayoutKind::Tile,
            LayoutKind::Spiral,
            LayoutKind::Dwindle,
            LayoutKind::BStack,
            LayoutKind::BStackHoriz,
            LayoutKind::Grid,
            LayoutKind::NRowGrid,
            LayoutKind::HorizGrid,
            LayoutKind::GaplessGrid,
            LayoutKind::CenteredMaster,
        ] {
            let rects = arrange(kind, &params(1920, 1080), 5);
            for (i, a) in rects.iter().enumerate() {
                for b in rects.iter().skip(i + 1) {
                    let overlap = (a.x < b.x + b.w && b.x < a.x + a.w)
                        && (a.y < b.y + b.h && b.y < a.y + a.h);
                    assert!(!overlap, "{:?}: {:?} overlaps {:?}", kind, a, b);
                }
            }
        }
    }
}
