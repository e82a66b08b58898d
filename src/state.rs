//! The window-management state machine. One `Gale` value owns every piece
//! of mutable state and is threaded by mutable reference through all event
//! handlers and actions; there are no ambient statics.

use std::collections::HashMap;

use x11::xlib;

use crate::client::{Client, ClientId, ClientList};
use crate::config::{self, Palette};
use crate::drw::{Drw, Scheme, COL_BORDER};
use crate::error::GaleError;
use crate::floatpos;
use crate::layouts::{self, LayoutKind};
use crate::monitor::{BarWin, Monitor};
use crate::rules::{self, WindowIdent};
use crate::swallow;
use crate::systray::Systray;
use crate::xwrapper::{Atom, ButtonSpec, CursorId, KeySpec, Net, Window, XWrapper, WM};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Normal,
    Resize,
    Move,
}

pub struct Gale {
    /* drw precedes xw so its server resources are released before the
     * display connection goes away */
    pub drw: Drw,
    pub xw: XWrapper,
    pub root: Window,
    pub wmcheckwin: Window,
    pub sw: i32,
    pub sh: i32,
    pub bh: i32,
    pub lrpad: i32,
    pub numlockmask: u32,
    pub running: bool,
    pub cursors: [CursorId; 3],
    pub palette: Palette,
    pub mons: Vec<Monitor>,
    pub selmon: usize,
    pub clients: HashMap<ClientId, Client>,
    next_client: u64,
    pub list: ClientList,
    /* status text, primary and extra halves, raw variants keep the
     * control bytes that tag status blocks for click routing */
    pub stext: String,
    pub estext: String,
    pub rawstext: String,
    pub rawestext: String,
    pub systray: Option<Systray>,
    /// Signal number of the status block under the last status click.
    pub statussig: i32,
    pub statusbar_pid: libc::pid_t,
    /// Monitor the pointer was last seen on, for root motion tracking.
    pub motion_mon: Option<usize>,
}

impl Gale {
    pub fn new() -> Result<Gale, GaleError> {
        let xw = XWrapper::connect()?;
        xw.check_other_wm()?;

        let (sw, sh) = xw.screen_size();
        let root = xw.root();
        let mut drw = Drw::create(xw.dpy(), xw.screen, root.0, sw as u32, sh as u32);
        if !drw.fontset_create(&config::FONTS) {
            return Err(GaleError::NoFonts);
        }

        let mut state = Gale {
            root,
            wmcheckwin: Window(0),
            sw,
            sh,
            bh: 0,
            lrpad: 0,
            numlockmask: 0,
            running: true,
            cursors: [CursorId(0); 3],
            palette: Palette::default(),
            mons: Vec::new(),
            selmon: 0,
            clients: HashMap::new(),
            next_client: 1,
            list: ClientList::default(),
            stext: String::new(),
            estext: String::new(),
            rawstext: String::new(),
            rawestext: String::new(),
            systray: None,
            statussig: 0,
            statusbar_pid: 0,
            motion_mon: None,
            xw,
            drw,
        };
        state.xw.load_xrdb(&mut state.palette);
        state.setup();
        Ok(state)
    }

    fn setup(&mut self) {
        self.lrpad = self.drw.font_height() as i32 + config::HORIZPADBAR;
        self.bh = self.drw.font_height() as i32 + config::VERTPADBAR;
        self.update_geom();

        self.cursors[Cursor::Normal as usize] = self.xw.create_font_cursor(68); /* XC_left_ptr */
        self.cursors[Cursor::Resize as usize] = self.xw.create_font_cursor(120); /* XC_sizing */
        self.cursors[Cursor::Move as usize] = self.xw.create_font_cursor(52); /* XC_fleur */

        self.drw.create_schemes(&self.palette);

        self.update_bars();
        crate::status::update_status(self);

        /* supporting window for _NET_SUPPORTING_WM_CHECK */
        self.wmcheckwin = self.xw.create_simple_window(self.root);
        let check = self.xw.atoms.get(Atom::Net(Net::WMCheck));
        let name = self.xw.atoms.get(Atom::Net(Net::WMName));
        self.xw.replace_window_prop(self.wmcheckwin, check, self.wmcheckwin);
        self.xw.replace_utf8_prop(self.wmcheckwin, name, "gale");
        self.xw.replace_window_prop(self.root, check, self.wmcheckwin);

        let supported = self.xw.atoms.net_atoms().to_vec();
        self.xw
            .replace_atoms(self.root, self.xw.atoms.get(Atom::Net(Net::Supported)), &supported);
        self.set_num_desktops();
        self.set_current_desktop();
        self.set_desktop_names();
        self.set_viewport();
        self.xw
            .delete_property(self.root, self.xw.atoms.get(Atom::Net(Net::ClientList)));
        self.xw
            .delete_property(self.root, self.xw.atoms.get(Atom::Net(Net::ClientListStacking)));

        let event_mask = xlib::SubstructureRedirectMask
            | xlib::SubstructureNotifyMask
            | xlib::ButtonPressMask
            | xlib::PointerMotionMask
            | xlib::EnterWindowMask
            | xlib::LeaveWindowMask
            | xlib::StructureNotifyMask
            | xlib::PropertyChangeMask;
        self.xw
            .set_root_attributes(self.cursors[Cursor::Normal as usize], event_mask);

        self.grab_keys();
        self.focus(None);
    }

    /// The blocking event loop; everything happens from here.
    pub fn run(&mut self) {
        self.xw.sync(false);
        while self.running {
            match self.xw.next_event() {
                Some(mut ev) => crate::events::handle_event(self, &mut ev),
                None => break,
            }
        }
    }

    pub fn cleanup(&mut self) {
        crate::actions::view(self, !0);
        for m in &mut self.mons {
            m.lt = [&config::LAYOUTS[1], &config::LAYOUTS[1]];
        }
        while let Some(&id) = self.list.stack.first() {
            self.unmanage(id, false);
        }
        self.xw.ungrab_keys();
        for m in std::mem::take(&mut self.mons) {
            for bar in &m.bars {
                self.xw.unmap_window(bar.win);
                self.xw.destroy_window(bar.win);
            }
        }
        if let Some(tray) = self.systray.take() {
            if tray.win.0 != 0 {
                self.xw.unmap_window(tray.win);
                self.xw.destroy_window(tray.win);
            }
        }
        for cursor in self.cursors {
            self.xw.free_cursor(cursor);
        }
        self.xw.destroy_window(self.wmcheckwin);
        self.xw.sync(false);
        self.xw.set_input_focus(self.root);
        self.xw
            .delete_property(self.root, self.xw.atoms.get(Atom::Net(Net::ActiveWindow)));
    }

    /* ---- arena helpers ---- */

    pub fn alloc_client(&mut self, c: Client) -> ClientId {
        let id = ClientId(self.next_client);
        self.next_client += 1;
        self.clients.insert(id, c);
        id
    }

    pub fn win_to_client(&self, w: xlib::Window) -> Option<ClientId> {
        self.clients
            .iter()
            .find(|(_, c)| c.win.0 == w)
            .map(|(&id, _)| id)
    }

    /// The client whose hidden (swallowed) record owns this window.
    pub fn swallowing_parent(&self, w: xlib::Window) -> Option<ClientId> {
        self.clients
            .iter()
            .find(|(_, c)| c.swallowing.as_ref().map_or(false, |s| s.win.0 == w))
            .map(|(&id, _)| id)
    }

    pub fn win_to_mon(&self, w: xlib::Window) -> usize {
        if w == self.root.0 {
            if let Some((x, y)) = self.xw.root_pointer() {
                return self.rect_to_mon(x, y, 1, 1);
            }
        }
        for (i, m) in self.mons.iter().enumerate() {
            if m.bars.iter().any(|b| b.win.0 == w) {
                return i;
            }
        }
        if let Some(id) = self.win_to_client(w) {
            return self.clients[&id].mon;
        }
        self.selmon
    }

    pub fn rect_to_mon(&self, x: i32, y: i32, w: i32, h: i32) -> usize {
        let mut r = self.selmon;
        let mut area = 0;
        for (i, m) in self.mons.iter().enumerate() {
            let a = m.intersect_area(x, y, w, h);
            if a > area {
                area = a;
                r = i;
            }
        }
        r
    }

    /// Largest-overlap tiled client on the selected monitor.
    pub fn rect_to_client(&self, x: i32, y: i32, w: i32, h: i32) -> Option<ClientId> {
        let mut r = None;
        let mut area = 0;
        for id in self.tiled_clients(self.selmon) {
            let a = self.clients[&id].intersect_area(x, y, w, h);
            if a > area {
                area = a;
                r = Some(id);
            }
        }
        r
    }

    /// Visible, non-floating clients of a monitor in attach order.
    pub fn tiled_clients(&self, m: usize) -> Vec<ClientId> {
        let mon = &self.mons[m];
        self.list
            .order
            .iter()
            .filter(|id| {
                let c = &self.clients[id];
                !c.isfloating && c.is_visible_on(mon)
            })
            .copied()
            .collect()
    }

    pub fn visible_clients(&self, m: usize) -> Vec<ClientId> {
        let mon = &self.mons[m];
        self.list
            .order
            .iter()
            .filter(|id| self.clients[id].is_visible_on(mon))
            .copied()
            .collect()
    }

    /* ---- stack bookkeeping ---- */

    pub fn attach(&mut self, id: ClientId) {
        self.list.attach(id);
    }

    pub fn attach_stack(&mut self, id: ClientId) {
        self.list.attach_stack(id);
    }

    pub fn detach(&mut self, id: ClientId) {
        self.list.detach(id);
    }

    /// Remove from the focus stack; a monitor selecting this client falls
    /// back to its next visible stack entry.
    pub fn detach_stack(&mut self, id: ClientId) {
        self.list.detach_stack(id);
        let mon_idx = self.clients.get(&id).map(|c| c.mon);
        if let Some(mi) = mon_idx {
            if self.mons[mi].sel == Some(id) {
                let next = self
                    .list
                    .stack
                    .iter()
                    .find(|&&t| self.clients[&t].is_visible_on(&self.mons[mi]))
                    .copied();
                self.mons[mi].sel = next;
            }
        }
    }

    /* ---- focus ---- */

    pub fn focus(&mut self, c: Option<ClientId>) {
        let mut c = c.filter(|id| self.clients.contains_key(id));
        if let Some(id) = c {
            let cmon = self.clients[&id].mon;
            if cmon != self.selmon {
                self.selmon = cmon;
            }
        }
        let visible = c.map_or(false, |id| {
            self.clients[&id].is_visible_on(&self.mons[self.selmon])
        });
        if !visible {
            c = self
                .list
                .stack
                .iter()
                .find(|&&id| self.clients[&id].is_visible_on(&self.mons[self.selmon]))
                .copied();
        }
        let prev = self.mons[self.selmon].sel;
        if prev.is_some() && prev != c {
            self.unfocus(prev.unwrap(), false);
        }
        if let Some(id) = c {
            let cmon = self.clients[&id].mon;
            if cmon != self.selmon {
                self.selmon = cmon;
            }
            if self.clients[&id].isurgent {
                self.set_urgent(id, false);
            }
            self.detach_stack(id);
            self.attach_stack(id);
            self.grab_buttons(id, true);
            let win = self.clients[&id].win;
            self.xw
                .set_window_border(win, self.drw.scheme_pixel(Scheme::Sel, COL_BORDER));
            self.set_focus(id);
        } else {
            self.xw.set_input_focus(self.root);
            self.xw
                .delete_property(self.root, self.xw.atoms.get(Atom::Net(Net::ActiveWindow)));
        }
        self.mons[self.selmon].sel = c;
        crate::bar::draw_bars(self);
    }

    pub fn unfocus(&mut self, id: ClientId, setfocus: bool) {
        let Some(c) = self.clients.get(&id) else { return };
        let win = c.win;
        let urgent = c.isurgent;
        self.grab_buttons(id, false);
        let scheme = if urgent { Scheme::Urg } else { Scheme::Norm };
        self.xw
            .set_window_border(win, self.drw.scheme_pixel(scheme, COL_BORDER));
        if setfocus {
            self.xw.set_input_focus(self.root);
            self.xw
                .delete_property(self.root, self.xw.atoms.get(Atom::Net(Net::ActiveWindow)));
        }
    }

    pub fn set_focus(&mut self, id: ClientId) {
        let Some(c) = self.clients.get(&id) else { return };
        let win = c.win;
        if !c.neverfocus {
            self.xw.set_input_focus(win);
            self.xw.replace_window_prop(
                self.root,
                self.xw.atoms.get(Atom::Net(Net::ActiveWindow)),
                win,
            );
        }
        let take_focus = self.xw.atoms.get(Atom::Wm(WM::TakeFocus));
        self.xw.send_event(
            win,
            take_focus,
            xlib::NoEventMask,
            [take_focus as i64, xlib::CurrentTime as i64, 0, 0, 0],
        );
    }

    /// A tiled newcomer on the same monitor knocks the selection out of
    /// fullscreen before it is covered.
    pub fn lose_fullscreen(&mut self, sel: Option<ClientId>, next: ClientId) {
        let Some(sel) = sel else { return };
        let Some(selc) = self.clients.get(&sel) else { return };
        let Some(nextc) = self.clients.get(&next) else { return };
        if selc.isfullscreen
            && selc.is_visible_on(&self.mons[self.selmon])
            && selc.mon == nextc.mon
            && !nextc.isfloating
        {
            self.set_fullscreen(sel, false);
        }
    }

    pub fn set_urgent(&mut self, id: ClientId, urg: bool) {
        let Some(c) = self.clients.get_mut(&id) else { return };
        c.isurgent = urg;
        let win = c.win;
        if self.mons[self.selmon].sel != Some(id) {
            let scheme = if urg { Scheme::Urg } else { Scheme::Norm };
            self.xw
                .set_window_border(win, self.drw.scheme_pixel(scheme, COL_BORDER));
        }
        self.xw.set_urgency_hint(win, urg);
    }

    /* ---- geometry ---- */

    /// Clamp a proposed geometry to the monitor and apply ICCCM size
    /// hints. Mutates the proposal and reports whether it differs from the
    /// client's current geometry.
    pub fn apply_size_hints(
        &self,
        id: ClientId,
        x: &mut i32,
        y: &mut i32,
        w: &mut i32,
        h: &mut i32,
        interact: bool,
    ) -> bool {
        let c = &self.clients[&id];
        let m = &self.mons[c.mon];

        *w = (*w).max(1);
        *h = (*h).max(1);
        if interact {
            if *x > self.sw {
                *x = self.sw - c.width();
            }
            if *y > self.sh {
                *y = self.sh - c.height();
            }
            if *x + *w + 2 * c.bw < 0 {
                *x = 0;
            }
            if *y + *h + 2 * c.bw < 0 {
                *y = 0;
            }
        } else {
            if *x >= m.wx + m.ww {
                *x = m.wx + m.ww - c.width();
            }
            if *y >= m.wy + m.wh {
                *y = m.wy + m.wh - c.height();
            }
            if *x + *w + 2 * c.bw <= m.wx {
                *x = m.wx;
            }
            if *y + *h + 2 * c.bw <= m.wy {
                *y = m.wy;
            }
        }
        if *h < self.bh {
            *h = self.bh;
        }
        if *w < self.bh {
            *w = self.bh;
        }
        if !c.ignoresizehints
            && (config::RESIZEHINTS || c.isfloating || m.layout().arrange.is_none())
        {
            /* see last two sentences in ICCCM 4.1.2.3 */
            let baseismin = c.basew == c.minw && c.baseh == c.minh;
            if !baseismin {
                *w -= c.basew;
                *h -= c.baseh;
            }
            if c.mina > 0.0 && c.maxa > 0.0 {
                if c.maxa < *w as f32 / *h as f32 {
                    *w = (*h as f32 * c.maxa + 0.5) as i32;
                } else if c.mina < *h as f32 / *w as f32 {
                    *h = (*w as f32 * c.mina + 0.5) as i32;
                }
            }
            if baseismin {
                *w -= c.basew;
                *h -= c.baseh;
            }
            if c.incw > 0 {
                *w -= *w % c.incw;
            }
            if c.inch > 0 {
                *h -= *h % c.inch;
            }
            *w = (*w + c.basew).max(c.minw);
            *h = (*h + c.baseh).max(c.minh);
            if c.maxw > 0 {
                *w = (*w).min(c.maxw);
            }
            if c.maxh > 0 {
                *h = (*h).min(c.maxh);
            }
        }
        *x != c.x || *y != c.y || *w != c.w || *h != c.h
    }

    pub fn resize(&mut self, id: ClientId, mut x: i32, mut y: i32, mut w: i32, mut h: i32, interact: bool) {
        if !self.clients.contains_key(&id) {
            return;
        }
        if self.apply_size_hints(id, &mut x, &mut y, &mut w, &mut h, interact) {
            self.resize_client(id, x, y, w, h);
        }
    }

    pub fn resize_client(&mut self, id: ClientId, x: i32, y: i32, w: i32, h: i32) {
        let Some(c) = self.clients.get_mut(&id) else { return };
        c.oldx = c.x;
        c.x = x;
        c.oldy = c.y;
        c.y = y;
        c.oldw = c.w;
        c.w = w;
        c.oldh = c.h;
        c.h = h;
        if c.beingmoved {
            return;
        }
        let (win, bw, mon, fullscreen, floating) = (c.win, c.bw, c.mon, c.isfullscreen, c.isfloating);

        /* a lone tile or a monocle tile absorbs its border */
        let mut used_bw = bw;
        let (mut cw, mut ch) = (w, h);
        let layout = self.mons[mon].layout();
        if layout.arrange.is_some() && !fullscreen && !floating {
            let tiled = self.tiled_clients(mon);
            let lone = tiled.len() == 1 && tiled[0] == id;
            if lone || layout.arrange == Some(LayoutKind::Monocle) {
                cw += 2 * bw;
                ch += 2 * bw;
                used_bw = 0;
                let c = self.clients.get_mut(&id).unwrap();
                c.w = cw;
                c.h = ch;
            }
        }
        self.xw.configure_window(win, x, y, cw, ch, used_bw);
        self.send_configure(id);
        self.xw.sync(false);
    }

    pub fn send_configure(&self, id: ClientId) {
        let Some(c) = self.clients.get(&id) else { return };
        self.xw.send_configure(c.win, c.x, c.y, c.w, c.h, c.bw);
    }

    /* ---- arranging ---- */

    pub fn arrange(&mut self, m: Option<usize>) {
        self.show_hide();
        match m {
            Some(mi) => {
                self.arrange_mon(mi);
                self.restack(mi);
            }
            None => {
                for mi in 0..self.mons.len() {
                    self.arrange_mon(mi);
                }
            }
        }
    }

    pub fn arrange_mon(&mut self, mi: usize) {
        let layout = self.mons[mi].layout();
        self.mons[mi].ltsymbol = layout.symbol.to_string();
        let Some(kind) = layout.arrange else { return };

        let tiles = self.tiled_clients(mi);
        let n = tiles.len();

        match kind {
            LayoutKind::Monocle => {
                let vis = self.visible_clients(mi).len();
                if vis > 0 {
                    self.mons[mi].ltsymbol = format!("[{}]", vis);
                }
            }
            LayoutKind::Deck => {
                let nmaster = self.mons[mi].nmaster.max(0) as usize;
                if n > nmaster {
                    self.mons[mi].ltsymbol = format!("D[{}]", n - nmaster);
                }
            }
            _ => {}
        }

        if n == 0 {
            return;
        }
        let m = &self.mons[mi];
        let (oh, ov, ih, iv) =
            layouts::effective_gaps((m.gappoh, m.gappov, m.gappih, m.gappiv), n);
        let params = layouts::ArrangeParams {
            wx: m.wx,
            wy: m.wy,
            ww: m.ww,
            wh: m.wh,
            mfact: m.mfact,
            nmaster: m.nmaster,
            oh,
            ov,
            ih,
            iv,
        };
        let rects = layouts::arrange(kind, &params, n);
        for (id, r) in tiles.into_iter().zip(rects) {
            let bw = self.clients[&id].bw;
            self.resize(id, r.x, r.y, r.w - 2 * bw, r.h - 2 * bw, false);
        }
    }

    /// Show visible clients top-down, hide the rest bottom-up (off-screen
    /// move, no unmap, so no UnmapNotify churn).
    pub fn show_hide(&mut self) {
        let stack = self.list.stack.clone();
        for &id in &stack {
            let Some(c) = self.clients.get(&id) else { continue };
            let mi = c.mon;
            if !c.is_visible_on(&self.mons[mi]) {
                continue;
            }
            if c.tags & config::SPTAGMASK != 0 && c.isfloating {
                /* scratchpads re-center every time they surface */
                let m = &self.mons[mi];
                let (w, h) = (c.width(), c.height());
                let (x, y) = (m.wx + (m.ww / 2 - w / 2), m.wy + (m.wh / 2 - h / 2));
                let c = self.clients.get_mut(&id).unwrap();
                c.x = x;
                c.y = y;
            }
            let c = &self.clients[&id];
            self.xw.move_window(c.win, c.x, c.y);
            let m = &self.mons[c.mon];
            if (m.layout().arrange.is_none() || c.isfloating) && !c.isfullscreen {
                let (x, y, w, h) = (c.x, c.y, c.w, c.h);
                self.resize(id, x, y, w, h, false);
            }
        }
        for &id in stack.iter().rev() {
            let Some(c) = self.clients.get(&id) else { continue };
            if !c.is_visible_on(&self.mons[c.mon]) {
                self.xw.move_window(c.win, c.width() * -2, c.y);
            }
        }
    }

    pub fn restack(&mut self, mi: usize) {
        crate::bar::draw_bar(self, mi);
        let Some(sel) = self.mons[mi].sel else { return };
        let m = &self.mons[mi];
        if self.clients[&sel].isfloating || m.layout().arrange.is_none() {
            self.xw.raise_window(self.clients[&sel].win);
        }
        if m.layout().arrange.is_some() {
            if let Some(bar) = m.bars.first() {
                let tiled: Vec<Window> = self
                    .list
                    .stack
                    .iter()
                    .filter(|id| {
                        let c = &self.clients[id];
                        !c.isfloating && c.is_visible_on(&self.mons[mi])
                    })
                    .map(|id| self.clients[id].win)
                    .collect();
                self.xw.stack_below(bar.win, &tiled);
            }
        }
        self.xw.sync(false);
        self.xw.drain_events(xlib::EnterWindowMask);
        if mi == self.selmon {
            let visible = self.clients[&sel].is_visible_on(&self.mons[mi]);
            if visible {
                self.warp(Some(sel));
            }
        }
    }

    /// Warp the pointer to the client's center unless it is already inside
    /// the client or hovering a bar.
    pub fn warp(&self, c: Option<ClientId>) {
        let Some(id) = c else {
            let m = &self.mons[self.selmon];
            self.xw
                .warp_pointer(self.root, m.wx + m.ww / 2, m.wy + m.wh / 2);
            return;
        };
        let Some(c) = self.clients.get(&id) else { return };
        let Some((x, y)) = self.xw.root_pointer() else { return };

        if x > c.x - c.bw
            && y > c.y - c.bw
            && x < c.x + c.w + c.bw * 2
            && y < c.y + c.h + c.bw * 2
        {
            return;
        }
        for m in &self.mons {
            for bar in &m.bars {
                if x > bar.bx && x < bar.bx + bar.bw && y > bar.by && y < bar.by + bar.bh {
                    return;
                }
            }
        }
        self.xw.warp_pointer(c.win, c.w / 2, c.h / 2);
    }

    /* ---- client lifecycle ---- */

    pub fn manage(&mut self, w: Window, wa: &xlib::XWindowAttributes) {
        let mut c = Client::new(w, wa.x, wa.y, wa.width, wa.height, wa.border_width);
        c.pid = self.xw.get_net_wm_pid(w);
        c.mon = self.selmon;
        self.fetch_title(&mut c);
        c.bw = config::BORDERPX;

        let trans = self
            .xw
            .get_transient_for(w)
            .and_then(|t| self.win_to_client(t.0));
        let mut term = None;
        if let Some(t) = trans {
            c.mon = self.clients[&t].mon;
            c.tags = self.clients[&t].tags;
        } else {
            self.apply_rules(&mut c);
            term = self.term_for(&c);
        }

        log::info!(
            "managing 0x{:x} '{}' tags={:b} mon={} floating={}",
            w.0,
            c.name,
            c.tags,
            c.mon,
            c.isfloating
        );

        let m = &self.mons[c.mon];
        if c.x + c.w + 2 * c.bw > m.mx + m.mw {
            c.x = m.mx + m.mw - (c.w + 2 * c.bw);
        }
        if c.y + c.h + 2 * c.bw > m.my + m.mh {
            c.y = m.my + m.mh - (c.h + 2 * c.bw);
        }
        c.x = c.x.max(m.mx);
        /* only fix the y offset if the client center might cover a top bar */
        let covers_bar = m.bars.first().map_or(false, |b| b.by == m.my)
            && c.x + c.w / 2 >= m.wx
            && c.x + c.w / 2 < m.wx + m.ww;
        c.y = c.y.max(if covers_bar { self.bh } else { m.my });

        self.xw.set_border_width(w, c.bw);
        let scheme = if c.isurgent { Scheme::Urg } else { Scheme::Norm };
        self.xw
            .set_window_border(w, self.drw.scheme_pixel(scheme, COL_BORDER));

        let id = self.alloc_client(c);
        self.send_configure(id); /* propagates the border width */
        self.update_window_type(id);
        self.update_size_hints(id);
        self.update_wm_hints(id);
        self.update_motif_hints(id);
        self.xw.select_input(
            w,
            xlib::EnterWindowMask
                | xlib::FocusChangeMask
                | xlib::PropertyChangeMask
                | xlib::StructureNotifyMask,
        );
        self.grab_buttons(id, false);

        {
            let c = self.clients.get_mut(&id).unwrap();
            if !c.isfloating {
                c.isfloating = trans.is_some() || c.isfixed;
                c.oldstate = c.isfloating;
            }
            if c.isfloating {
                let win = c.win;
                self.xw.raise_window(win);
            }
        }
        self.attach(id);
        self.attach_stack(id);
        self.xw.append_window_prop(
            self.root,
            self.xw.atoms.get(Atom::Net(Net::ClientList)),
            w,
        );
        self.xw.append_window_prop(
            self.root,
            self.xw.atoms.get(Atom::Net(Net::ClientListStacking)),
            w,
        );
        /* some windows require being moved away before the first arrange */
        let c = &self.clients[&id];
        self.xw
            .move_resize_window(w, c.x + 2 * self.sw, c.y, c.w as u32, c.h as u32);
        self.xw.set_client_state(w, 1); /* NormalState */

        let cmon = self.clients[&id].mon;
        if cmon == self.selmon {
            let sel = self.mons[self.selmon].sel;
            self.lose_fullscreen(sel, id);
            if let Some(sel) = sel {
                self.unfocus(sel, false);
            }
        }
        self.mons[cmon].sel = Some(id);
        self.arrange(Some(cmon));
        self.xw.map_window(w);
        if let Some(term) = term {
            self.swallow(term, id);
        }
        self.focus(None);
    }

    pub fn unmanage(&mut self, id: ClientId, destroyed: bool) {
        let Some(c) = self.clients.get(&id) else { return };
        if c.swallowing.is_some() {
            self.unswallow(id);
            return;
        }
        let mon = c.mon;
        let win = c.win;
        let oldbw = c.oldbw;

        self.detach(id);
        self.detach_stack(id);
        if !destroyed {
            /* avoid races with a disappearing client */
            self.xw.grab_server();
            self.xw.set_dummy_error_handler();
            self.xw.set_border_width(win, oldbw);
            self.xw.ungrab_buttons(win);
            self.xw.set_client_state(win, 0); /* WithdrawnState */
            self.xw.sync(false);
            self.xw.set_default_error_handler();
            self.xw.ungrab_server();
        }
        self.clients.remove(&id);
        self.arrange(Some(mon));
        self.focus(None);
        self.update_client_list();
    }

    /* ---- swallowing ---- */

    pub fn term_for(&self, c: &Client) -> Option<ClientId> {
        if c.pid == 0 || c.isterminal {
            return None;
        }
        self.list.order.iter().copied().find(|id| {
            let t = &self.clients[id];
            t.isterminal
                && t.swallowing.is_none()
                && t.pid != 0
                && swallow::is_descendant(t.pid, c.pid) != 0
        })
    }

    pub fn swallow(&mut self, p: ClientId, c: ClientId) {
        {
            let child = &self.clients[&c];
            if child.noswallow || child.isterminal {
                return;
            }
            // shadowed by the return above; kept as the original behaves
            if child.noswallow && !config::SWALLOWFLOATING && child.isfloating {
                return;
            }
        }

        log::info!("terminal {:?} swallows {:?}", p, c);
        self.detach(c);
        self.detach_stack(c);

        let mut child = self.clients.remove(&c).unwrap();
        let pmon = self.clients[&p].mon;
        child.mon = pmon;

        self.xw.set_client_state(child.win, 0); /* WithdrawnState */
        let pwin = self.clients[&p].win;
        self.xw.unmap_window(pwin);

        /* the terminal wears the child's window; its own hides in the box */
        let cwin = child.win;
        child.win = pwin;
        {
            let parent = self.clients.get_mut(&p).unwrap();
            parent.win = cwin;
            parent.swallowing = Some(Box::new(child));
        }

        self.update_title(p);
        let pc = &self.clients[&p];
        let (win, x, y, w, h) = (pc.win, pc.x, pc.y, pc.w, pc.h);
        self.xw.move_resize_window(win, x, y, w as u32, h as u32);
        self.arrange(Some(pmon));
        self.send_configure(p);
        self.update_client_list();
    }

    pub fn unswallow(&mut self, id: ClientId) {
        let Some(c) = self.clients.get_mut(&id) else { return };
        let Some(hidden) = c.swallowing.take() else { return };
        c.win = hidden.win;
        drop(hidden);

        self.set_fullscreen(id, false);
        self.update_title(id);
        let c = &self.clients[&id];
        let (win, x, y, w, h, mon) = (c.win, c.x, c.y, c.w, c.h, c.mon);
        self.arrange(Some(mon));
        self.xw.map_window(win);
        self.xw.move_resize_window(win, x, y, w as u32, h as u32);
        self.xw.set_client_state(win, 1); /* NormalState */
        self.focus(None);
        self.arrange(Some(mon));
    }

    /* ---- rules ---- */

    pub fn apply_rules(&self, c: &mut Client) {
        c.isfloating = false;
        c.tags = 0;

        let (instance, class) = self.xw.get_class_hint(c.win);
        let wtype_atom = self
            .xw
            .get_atom_prop(c.win, self.xw.atoms.get(Atom::Net(Net::WMWindowType)));
        let ident = WindowIdent {
            class: if class.is_empty() { "broken".into() } else { class },
            instance: if instance.is_empty() { "broken".into() } else { instance },
            title: if c.name.is_empty() { "broken".into() } else { c.name.clone() },
            wtype: self.xw.get_atom_name(wtype_atom),
        };

        let result = rules::evaluate(&config::RULES, &ident);
        c.isterminal = result.isterminal;
        c.noswallow = result.noswallow;
        c.isfloating = result.isfloating;
        c.tags |= result.tags;
        if result.monitor >= 0 && (result.monitor as usize) < self.mons.len() {
            c.mon = result.monitor as usize;
        }
        if let Some(mi) = self
            .mons
            .iter()
            .position(|m| m.tagset[m.seltags] & c.tags != 0)
        {
            c.mon = mi;
        }
        if result.center {
            let m = &self.mons[c.mon];
            c.x = m.wx + (m.ww / 2 - c.width() / 2);
            c.y = m.wy + (m.wh / 2 - c.height() / 2);
        }
        if c.isfloating {
            if let Some(spec) = result.floatpos {
                self.set_floatpos(c, spec);
            }
        }

        if c.tags & config::TAGMASK != 0 {
            c.tags &= config::TAGMASK;
        } else if self.mons[c.mon].tagset[self.mons[c.mon].seltags] != 0 {
            c.tags = self.mons[c.mon].tagset[self.mons[c.mon].seltags] & !config::SPTAGMASK;
        } else {
            c.tags = 1;
        }
    }

    /// Apply a float-position spec to a client record. No-op under a tiling
    /// layout when the client is not floating, and on malformed specs.
    pub fn set_floatpos(&self, c: &mut Client, spec: &str) {
        let m = &self.mons[self.selmon];
        if m.layout().arrange.is_some() && !c.isfloating {
            return;
        }
        let Some(mut args) = floatpos::parse_floatpos(spec) else { return };
        if args.use_pointer {
            if let Some((px, py)) = self.xw.root_pointer() {
                args.x = px;
                args.y = py;
            }
        }
        let m = &self.mons[c.mon];
        c.ignoresizehints = true;
        let (x, w) = floatpos::getfloatpos(
            args.x,
            args.xch,
            args.w,
            args.wch,
            m.wx,
            m.ww,
            c.x,
            c.w,
            c.bw,
            config::FLOATPOSGRID_X,
        );
        let (y, h) = floatpos::getfloatpos(
            args.y,
            args.ych,
            args.h,
            args.hch,
            m.wy,
            m.wh,
            c.y,
            c.h,
            c.bw,
            config::FLOATPOSGRID_Y,
        );
        c.x = x;
        c.w = w;
        c.y = y;
        c.h = h;
    }

    /* ---- fullscreen ---- */

    pub fn set_fullscreen(&mut self, id: ClientId, fullscreen: bool) {
        let Some(c) = self.clients.get(&id) else { return };
        let win = c.win;
        let net_state = self.xw.atoms.get(Atom::Net(Net::WMState));
        let net_fs = self.xw.atoms.get(Atom::Net(Net::WMFullscreen));
        if fullscreen && !c.isfullscreen {
            self.xw.replace_atoms(win, net_state, &[net_fs]);
            let (mx, my, mw, mh) = {
                let m = &self.mons[c.mon];
                (m.mx, m.my, m.mw, m.mh)
            };
            {
                let c = self.clients.get_mut(&id).unwrap();
                c.isfullscreen = true;
                c.oldstate = c.isfloating;
                c.oldbw = c.bw;
                c.bw = 0;
                c.isfloating = true;
            }
            self.resize_client(id, mx, my, mw, mh);
            self.xw.raise_window(win);
        } else if !fullscreen && c.isfullscreen {
            self.xw.replace_atoms(win, net_state, &[]);
            let mon = {
                let c = self.clients.get_mut(&id).unwrap();
                c.isfullscreen = false;
                c.isfloating = c.oldstate;
                c.bw = c.oldbw;
                c.x = c.oldx;
                c.y = c.oldy;
                c.w = c.oldw;
                c.h = c.oldh;
                c.mon
            };
            let (x, y, w, h) = {
                let c = &self.clients[&id];
                (c.x, c.y, c.w, c.h)
            };
            self.resize_client(id, x, y, w, h);
            self.arrange(Some(mon));
        }
    }

    /* ---- multi-monitor ---- */

    pub fn dir_to_mon(&self, dir: i32) -> usize {
        let n = self.mons.len();
        if dir > 0 {
            (self.selmon + 1) % n
        } else {
            (self.selmon + n - 1) % n
        }
    }

    pub fn send_mon(&mut self, id: ClientId, target: usize) {
        if self.clients[&id].mon == target {
            return;
        }
        let had_focus = self.mons[self.selmon].sel == Some(id);
        self.unfocus(id, true);
        self.detach(id);
        self.detach_stack(id);
        let old_mon = self.clients[&id].mon;
        self.arrange(Some(old_mon));
        {
            let tags = {
                let m = &self.mons[target];
                if m.tagset[m.seltags] != 0 {
                    m.tagset[m.seltags]
                } else {
                    1
                }
            };
            let c = self.clients.get_mut(&id).unwrap();
            c.mon = target;
            c.tags = tags;
        }
        self.attach(id);
        self.attach_stack(id);
        self.arrange(Some(target));
        if had_focus {
            self.focus(Some(id));
            self.restack(target);
        } else {
            self.focus(None);
        }
    }

    /// Claim every client now visible on `m` for it, stripping tag bits
    /// displayed elsewhere. Monitors that lost clients are re-arranged.
    pub fn attach_clients(&mut self, m: usize) {
        let mut utags = 0;
        for (i, tm) in self.mons.iter().enumerate() {
            if i != m {
                utags |= tm.tagset[tm.seltags];
            }
        }
        let mut rmons = false;
        let dest_tags = self.mons[m].tagset[self.mons[m].seltags];
        for id in self.list.order.clone() {
            /* visibility is judged against the destination tagset before the
             * owner is rewritten, as the original does */
            let visible = self.clients[&id].is_visible_on(&self.mons[m]);
            if !visible {
                continue;
            }
            if self.clients[&id].tags & utags != 0 {
                let c = self.clients.get_mut(&id).unwrap();
                c.tags &= dest_tags;
                rmons = true;
            }
            self.unfocus(id, true);
            self.clients.get_mut(&id).unwrap().mon = m;
        }
        if rmons {
            for i in 0..self.mons.len() {
                if i != m {
                    self.arrange(Some(i));
                }
            }
        }
    }

    pub fn find_first_unused_tag(&self) -> u32 {
        let mut occupied = 0;
        for m in &self.mons {
            occupied |= m.tagset[m.seltags];
        }
        let mut i = 1u32;
        while i < occupied {
            if i & occupied == 0 {
                return i;
            }
            i <<= 1;
        }
        0
    }

    fn create_mon(&mut self) -> Option<Monitor> {
        if self.mons.len() + 1 > config::TAGS.len() {
            log::error!("failed to add monitor, number of tags exceeded");
            eprintln!("gale: failed to add monitor, number of tags exceeded");
            return None;
        }
        /* claim the first tag no other monitor displays */
        let mut tag_idx = None;
        for i in 0..config::TAGS.len() {
            if !self
                .mons
                .iter()
                .any(|m| m.tagset[m.seltags] & (1 << i) != 0)
            {
                tag_idx = Some(i);
                break;
            }
        }
        let i = match tag_idx {
            Some(i) => i,
            None => {
                /* no free tag: give every monitor its index as a tag */
                for (i, m) in self.mons.iter_mut().enumerate() {
                    m.seltags ^= 1;
                    let st = m.seltags;
                    m.tagset[st] = (1 << i) & config::TAGMASK;
                }
                self.mons.len()
            }
        };

        let mut m = Monitor::new((1 << i) & config::TAGMASK);
        let mi = self.mons.len();

        /* bar count for this monitor comes from the bar rules; two at most */
        let mut nbars: i32 = -1;
        for br in &config::BARRULES {
            if br.monitor.includes(mi) {
                nbars = nbars.max(br.bar as i32);
            }
        }
        let mut istopbar = config::TOPBAR;
        for idx in 0..(nbars + 1).clamp(0, 2) {
            m.bars
                .push(BarWin::new(idx as usize, istopbar, config::BARRULES.len()));
            istopbar = !istopbar;
        }

        for mr in &config::MONRULES {
            if mr.monitor == -1 || mr.monitor == mi as i32 {
                m.lt[0] = &config::LAYOUTS[mr.layout];
                m.lt[1] = &config::LAYOUTS[2 % config::LAYOUTS.len()];
                m.ltsymbol = config::LAYOUTS[mr.layout].symbol.to_string();
                if mr.mfact > -1.0 {
                    m.mfact = mr.mfact;
                }
                if mr.nmaster > -1 {
                    m.nmaster = mr.nmaster;
                }
                if mr.showbar > -1 {
                    m.showbar = mr.showbar != 0;
                }
                if mr.tagset != 0 {
                    let st = m.seltags;
                    m.tagset[st] = mr.tagset;
                }
                break;
            }
        }
        Some(m)
    }

    /// Re-derive the monitor list from the screen configuration. Returns
    /// whether anything changed.
    pub fn update_geom(&mut self) -> bool {
        let mut dirty = false;
        let screens = self.xw.xinerama_screens();
        if !screens.is_empty() {
            let n = self.mons.len();
            let nn = screens.len();
            if n <= nn {
                for _ in 0..nn - n {
                    match self.create_mon() {
                        Some(m) => {
                            self.mons.push(m);
                            let mi = self.mons.len() - 1;
                            self.attach_clients(mi);
                        }
                        None => break,
                    }
                }
                for (i, &(x, y, w, h)) in screens.iter().enumerate().take(self.mons.len()) {
                    let m = &mut self.mons[i];
                    if i >= n || x != m.mx || y != m.my || w != m.mw || h != m.mh {
                        dirty = true;
                        m.num = i as i32;
                        m.mx = x;
                        m.wx = x;
                        m.my = y;
                        m.wy = y;
                        m.mw = w;
                        m.ww = w;
                        m.mh = h;
                        m.wh = h;
                        let bh = self.bh;
                        m.update_bar_pos(bh);
                    }
                }
            } else {
                /* fewer screens than monitors: fold the extras away */
                for _ in nn..n {
                    let last = self.mons.len() - 1;
                    if self.selmon == last {
                        self.selmon = 0;
                    }
                    for c in self.clients.values_mut() {
                        dirty = true;
                        if c.mon == last {
                            c.mon = self.selmon;
                        }
                    }
                    let m = self.mons.pop().unwrap();
                    for bar in &m.bars {
                        self.xw.unmap_window(bar.win);
                        self.xw.destroy_window(bar.win);
                    }
                }
            }
        } else {
            /* default monitor setup */
            if self.mons.is_empty() {
                if let Some(m) = self.create_mon() {
                    self.mons.push(m);
                }
            }
            let (sw, sh) = (self.sw, self.sh);
            let m = &mut self.mons[0];
            if m.mw != sw || m.mh != sh {
                dirty = true;
                m.mw = sw;
                m.ww = sw;
                m.mh = sh;
                m.wh = sh;
                let bh = self.bh;
                m.update_bar_pos(bh);
            }
        }
        if dirty {
            log::info!("screen configuration changed, {} monitor(s)", self.mons.len());
            self.selmon = 0;
            self.selmon = self.win_to_mon(self.root.0);
        }
        dirty
    }

    pub fn update_bars(&mut self) {
        for mi in 0..self.mons.len() {
            for bi in 0..self.mons[mi].bars.len() {
                if self.mons[mi].bars[bi].win.0 != 0 {
                    continue;
                }
                let (bx, by, bw) = {
                    let b = &self.mons[mi].bars[bi];
                    (b.bx, b.by, b.bw)
                };
                let win = self.xw.create_shell_window(
                    bx,
                    by,
                    bw.max(1) as u32,
                    self.bh as u32,
                    0,
                    true,
                    xlib::ButtonPressMask | xlib::ExposureMask,
                );
                self.xw
                    .define_cursor(win, self.cursors[Cursor::Normal as usize]);
                self.xw.map_raised(win);
                self.xw.set_class_hint(win, "gale");
                self.mons[mi].bars[bi].win = win;
            }
        }
    }

    /* ---- property refreshers ---- */

    fn fetch_title(&self, c: &mut Client) {
        let net_name = self.xw.atoms.get(Atom::Net(Net::WMName));
        let name = self
            .xw
            .get_text_prop(c.win, net_name)
            .or_else(|| self.xw.get_text_prop(c.win, xlib::XA_WM_NAME));
        c.name = match name {
            Some(n) if !n.is_empty() => n,
            _ => "broken".to_string(), /* mark broken clients */
        };
    }

    pub fn update_title(&mut self, id: ClientId) {
        let Some(c) = self.clients.get(&id) else { return };
        let mut c2 = c.clone();
        self.fetch_title(&mut c2);
        self.clients.get_mut(&id).unwrap().name = c2.name;
    }

    pub fn update_window_type(&mut self, id: ClientId) {
        let Some(c) = self.clients.get(&id) else { return };
        let state = self
            .xw
            .get_atom_prop(c.win, self.xw.atoms.get(Atom::Net(Net::WMState)));
        if state == self.xw.atoms.get(Atom::Net(Net::WMFullscreen)) {
            self.set_fullscreen(id, true);
        }
    }

    pub fn update_size_hints(&mut self, id: ClientId) {
        let Some(c) = self.clients.get(&id) else { return };
        let size = self.xw.get_wm_normal_hints(c.win).unwrap_or_else(|| {
            /* hints are uninitialized; treat every field as unset */
            let mut s: xlib::XSizeHints = unsafe { std::mem::zeroed() };
            s.flags = xlib::PSize;
            s
        });
        let c = self.clients.get_mut(&id).unwrap();
        Self::apply_normal_hints(c, &size);
    }

    pub fn apply_normal_hints(c: &mut Client, size: &xlib::XSizeHints) {
        if size.flags & xlib::PBaseSize != 0 {
            c.basew = size.base_width;
            c.baseh = size.base_height;
        } else if size.flags & xlib::PMinSize != 0 {
            c.basew = size.min_width;
            c.baseh = size.min_height;
        } else {
            c.basew = 0;
            c.baseh = 0;
        }
        if size.flags & xlib::PResizeInc != 0 {
            c.incw = size.width_inc;
            c.inch = size.height_inc;
        } else {
            c.incw = 0;
            c.inch = 0;
        }
        if size.flags & xlib::PMaxSize != 0 {
            c.maxw = size.max_width;
            c.maxh = size.max_height;
        } else {
            c.maxw = 0;
            c.maxh = 0;
        }
        if size.flags & xlib::PMinSize != 0 {
            c.minw = size.min_width;
            c.minh = size.min_height;
        } else if size.flags & xlib::PBaseSize != 0 {
            c.minw = size.base_width;
            c.minh = size.base_height;
        } else {
            c.minw = 0;
            c.minh = 0;
        }
        if size.flags & xlib::PAspect != 0 {
            c.mina = size.min_aspect.y as f32 / size.min_aspect.x as f32;
            c.maxa = size.max_aspect.x as f32 / size.max_aspect.y as f32;
        } else {
            c.mina = 0.0;
            c.maxa = 0.0;
        }
        c.isfixed = c.maxw > 0 && c.maxh > 0 && c.maxw == c.minw && c.maxh == c.minh;
    }

    pub fn update_wm_hints(&mut self, id: ClientId) {
        let Some(c) = self.clients.get(&id) else { return };
        let win = c.win;
        let Some((urgent, input)) = self.xw.get_wm_hints(win) else { return };
        let is_sel = self.mons[self.selmon].sel == Some(id);
        let is_mon_sel = self.mons[c.mon].sel == Some(id);
        if is_sel && urgent {
            /* the focused client has no business being urgent */
            self.xw.clear_urgency_hint(win);
        } else {
            let c = self.clients.get_mut(&id).unwrap();
            c.isurgent = urgent;
            let scheme = if urgent {
                Scheme::Urg
            } else if is_mon_sel {
                Scheme::Sel
            } else {
                Scheme::Norm
            };
            self.xw
                .set_window_border(win, self.drw.scheme_pixel(scheme, COL_BORDER));
        }
        let c = self.clients.get_mut(&id).unwrap();
        c.neverfocus = match input {
            Some(input) => !input,
            None => false,
        };
    }

    pub fn update_motif_hints(&mut self, id: ClientId) {
        const MWM_HINTS_FLAGS_FIELD: usize = 0;
        const MWM_HINTS_DECORATIONS_FIELD: usize = 2;
        const MWM_HINTS_DECORATIONS: u64 = 1 << 1;
        const MWM_DECOR_ALL: u64 = 1 << 0;
        const MWM_DECOR_BORDER: u64 = 1 << 1;
        const MWM_DECOR_TITLE: u64 = 1 << 3;

        if !config::DECORHINTS {
            return;
        }
        let Some(c) = self.clients.get(&id) else { return };
        let Some(motif) = self.xw.get_motif_hints(c.win) else { return };
        if motif[MWM_HINTS_FLAGS_FIELD] & MWM_HINTS_DECORATIONS == 0 {
            return;
        }
        let (width, height) = (c.width(), c.height());
        let decorated = motif[MWM_HINTS_DECORATIONS_FIELD]
            & (MWM_DECOR_ALL | MWM_DECOR_BORDER | MWM_DECOR_TITLE)
            != 0;
        {
            let c = self.clients.get_mut(&id).unwrap();
            let bw = if decorated { config::BORDERPX } else { 0 };
            c.bw = bw;
            c.oldbw = bw;
        }
        let bw = self.clients[&id].bw;
        let (x, y) = (self.clients[&id].x, self.clients[&id].y);
        self.resize(id, x, y, width - 2 * bw, height - 2 * bw, false);
    }

    /* ---- EWMH root properties ---- */

    pub fn set_num_desktops(&self) {
        self.xw.replace_cardinals(
            self.root,
            self.xw.atoms.get(Atom::Net(Net::NumberOfDesktops)),
            &[config::TAGS.len() as i64],
        );
    }

    pub fn set_current_desktop(&self) {
        self.xw.replace_cardinals(
            self.root,
            self.xw.atoms.get(Atom::Net(Net::CurrentDesktop)),
            &[0],
        );
    }

    pub fn set_desktop_names(&self) {
        self.xw.set_desktop_names(&config::TAGS);
    }

    pub fn set_viewport(&self) {
        self.xw.replace_cardinals(
            self.root,
            self.xw.atoms.get(Atom::Net(Net::DesktopViewport)),
            &[0, 0],
        );
    }

    pub fn update_current_desktop(&self) {
        let raw = self.mons[self.selmon].tagset[self.mons[self.selmon].seltags] as i64;
        let mut i = 0;
        while raw >> (i + 1) != 0 {
            i += 1;
        }
        self.xw.replace_cardinals(
            self.root,
            self.xw.atoms.get(Atom::Net(Net::CurrentDesktop)),
            &[i],
        );
    }

    /// Republish both client lists: attach orders then stack orders,
    /// concatenated per owning monitor.
    pub fn update_client_list(&self) {
        let list = self.xw.atoms.get(Atom::Net(Net::ClientList));
        let stacking = self.xw.atoms.get(Atom::Net(Net::ClientListStacking));
        self.xw.delete_property(self.root, list);
        for mi in 0..self.mons.len() {
            for id in &self.list.order {
                let c = &self.clients[id];
                if c.mon == mi {
                    self.xw.append_window_prop(self.root, list, c.win);
                }
            }
        }
        self.xw.delete_property(self.root, stacking);
        for mi in 0..self.mons.len() {
            for id in &self.list.stack {
                let c = &self.clients[id];
                if c.mon == mi {
                    self.xw.append_window_prop(self.root, stacking, c.win);
                }
            }
        }
    }

    /* ---- input grabs ---- */

    pub fn grab_keys(&mut self) {
        self.numlockmask = self.xw.numlock_mask();
        let specs: Vec<KeySpec> = config::keys()
            .iter()
            .map(|k| KeySpec {
                mask: k.mask,
                keysym: k.keysym,
            })
            .collect();
        self.xw.grab_keys(self.numlockmask, &specs);
    }

    pub fn grab_buttons(&mut self, id: ClientId, focused: bool) {
        self.numlockmask = self.xw.numlock_mask();
        let Some(c) = self.clients.get(&id) else { return };
        let specs: Vec<ButtonSpec> = config::buttons()
            .iter()
            .filter(|b| b.click == crate::actions::Clk::ClientWin)
            .map(|b| ButtonSpec {
                mask: b.mask,
                button: b.button,
            })
            .collect();
        self.xw.grab_buttons(c.win, self.numlockmask, focused, &specs);
    }

    /* ---- stack positions ---- */

    /// Decode a focus/push argument into a position in the visible client
    /// order of the selected monitor, or -1.
    pub fn stack_pos(&self, arg: i32) -> i32 {
        let m = &self.mons[self.selmon];
        if self.list.order.is_empty() {
            return -1;
        }
        let is_visible = |id: &ClientId| self.clients[id].is_visible_on(m);

        let is_inc = |x: i32| x > 1000 && x < 3000;
        if arg == config::PREVSEL {
            let prev = self
                .list
                .stack
                .iter()
                .find(|&id| is_visible(id) && Some(*id) != m.sel);
            let Some(&prev) = prev else { return -1 };
            self.list
                .order
                .iter()
                .take_while(|&&id| id != prev)
                .filter(|id| is_visible(id))
                .count() as i32
        } else if is_inc(arg) {
            let Some(sel) = m.sel else { return -1 };
            let i = self
                .list
                .order
                .iter()
                .take_while(|&&id| id != sel)
                .filter(|id| is_visible(id))
                .count() as i32;
            let n = self.list.order.iter().filter(|id| is_visible(id)).count() as i32;
            if n == 0 {
                return -1;
            }
            (i + (arg - 2000)).rem_euclid(n)
        } else if arg < 0 {
            let n = self.list.order.iter().filter(|id| is_visible(id)).count() as i32;
            (n + arg).max(0)
        } else {
            arg
        }
    }

    /* ---- startup scan ---- */

    /// Adopt windows that already exist: regular windows first, then
    /// transients, so parents are managed before their dialogs.
    pub fn scan(&mut self) {
        let wins = self.xw.query_tree(self.root);
        for &win in &wins {
            let Some(wa) = self.xw.get_window_attributes(win) else { continue };
            if wa.override_redirect != 0 || self.xw.get_transient_for(win).is_some() {
                continue;
            }
            if wa.map_state == xlib::IsViewable || self.xw.get_wm_state(win) == 3 {
                /* 3 == IconicState */
                self.manage(win, &wa);
            }
        }
        for &win in &wins {
            let Some(wa) = self.xw.get_window_attributes(win) else { continue };
            if self.xw.get_transient_for(win).is_some()
                && (wa.map_state == xlib::IsViewable || self.xw.get_wm_state(win) == 3)
            {
                self.manage(win, &wa);
            }
        }
    }
}
