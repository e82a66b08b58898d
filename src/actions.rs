//! User actions, bound to keys and buttons in `config`. Each one is a
//! small transition on the world state followed by the repaint it needs.

use std::ffi::CString;
use std::os::raw::c_char;

use x11::xlib;

use crate::client::ClientId;
use crate::config;
use crate::state::{Cursor, Gale};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Spawn(&'static [&'static str]),
    ToggleBar,
    FocusStack(i32),
    PushStack(i32),
    IncNMaster(i32),
    SetMFact(f32),
    Zoom,
    View(u32),
    ToggleView(u32),
    Tag(u32),
    ToggleTag(u32),
    FocusOrView(u32),
    ToggleScratch(usize),
    KillClient,
    SetLayout(Option<usize>),
    ToggleFloating,
    ToggleFullscreen,
    FloatPos(&'static str),
    FocusMon(i32),
    TagMon(i32),
    Quit,
    Xrdb,
    SigStatus(i32),
    MoveOrPlace(i32),
    ResizeMouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clk {
    TagBar,
    LtSymbol,
    StatusText,
    WinTitle,
    ClientWin,
    RootWin,
}

pub struct KeyBinding {
    pub mask: u32,
    pub keysym: u32,
    pub action: Action,
}

pub struct ButtonBinding {
    pub click: Clk,
    pub mask: u32,
    pub button: u32,
    pub action: Action,
}

impl Action {
    pub fn execute(&self, state: &mut Gale) {
        match *self {
            Action::Spawn(argv) => spawn(state, argv),
            Action::ToggleBar => toggle_bar(state),
            Action::FocusStack(i) => focus_stack(state, i),
            Action::PushStack(i) => push_stack(state, i),
            Action::IncNMaster(i) => inc_nmaster(state, i),
            Action::SetMFact(f) => set_mfact(state, f),
            Action::Zoom => zoom(state),
            Action::View(ui) => view(state, ui),
            Action::ToggleView(ui) => toggle_view(state, ui),
            Action::Tag(ui) => tag(state, ui),
            Action::ToggleTag(ui) => toggle_tag(state, ui),
            Action::FocusOrView(ui) => focus_or_view(state, ui),
            Action::ToggleScratch(i) => toggle_scratch(state, i),
            Action::KillClient => kill_client(state),
            Action::SetLayout(l) => set_layout(state, l),
            Action::ToggleFloating => toggle_floating(state),
            Action::ToggleFullscreen => toggle_fullscreen(state),
            Action::FloatPos(spec) => float_pos(state, spec),
            Action::FocusMon(i) => focus_mon(state, i),
            Action::TagMon(i) => tag_mon(state, i),
            Action::Quit => state.running = false,
            Action::Xrdb => xrdb(state),
            Action::SigStatus(i) => crate::status::sig_statusbar(state, i),
            Action::MoveOrPlace(i) => move_or_place(state, i),
            Action::ResizeMouse => resize_mouse(state),
        }
    }
}

pub fn spawn(state: &Gale, argv: &[&str]) {
    unsafe {
        if libc::fork() == 0 {
            libc::close(state.xw.connection_fd());
            libc::setsid();
            let args: Vec<CString> = argv.iter().map(|a| CString::new(*a).unwrap()).collect();
            let mut ptrs: Vec<*const c_char> = args.iter().map(|a| a.as_ptr()).collect();
            ptrs.push(std::ptr::null());
            libc::execvp(ptrs[0], ptrs.as_ptr());
            eprintln!("gale: execvp {} failed", argv[0]);
            std::process::exit(0);
        }
    }
}

fn toggle_bar(state: &mut Gale) {
    let mi = state.selmon;
    let bh = state.bh;
    let m = &mut state.mons[mi];
    m.showbar = !m.showbar;
    m.update_bar_pos(bh);
    let bars: Vec<_> = m.bars.iter().map(|b| (b.win, b.bx, b.by, b.bw, b.bh)).collect();
    for (win, bx, by, bw, bh) in bars {
        state.xw.move_resize_window(win, bx, by, bw as u32, bh as u32);
    }
    state.arrange(Some(mi));
}

pub fn focus_stack(state: &mut Gale, arg: i32) {
    let i = state.stack_pos(arg);
    let Some(sel) = state.mons[state.selmon].sel else { return };
    if i < 0 {
        return;
    }
    if config::LOCKFULLSCREEN && state.clients[&sel].isfullscreen {
        return;
    }
    let m = state.selmon;
    let mut i = i;
    let mut prev = None;
    let mut found = None;
    for &id in &state.list.order {
        let visible = state.clients[&id].is_visible_on(&state.mons[m]);
        if i == 0 && visible {
            found = Some(id);
            break;
        }
        if visible {
            i -= 1;
        }
        prev = Some(id);
    }
    state.focus(found.or(prev));
    state.restack(m);
}

pub fn push_stack(state: &mut Gale, arg: i32) {
    let i = state.stack_pos(arg);
    let Some(sel) = state.mons[state.selmon].sel else { return };
    if i < 0 {
        return;
    }
    if i == 0 {
        state.detach(sel);
        state.attach(sel);
    } else {
        let m = state.selmon;
        let order = state.list.order.clone();
        let mut i = i;
        let mut prev = None;
        let mut stop = None;
        for &id in &order {
            if i == 0 {
                stop = Some(id);
                break;
            }
            if !state.clients[&id].is_visible_on(&state.mons[m]) {
                continue;
            }
            if id != sel {
                i -= 1;
            }
            prev = Some(id);
        }
        let target = match stop {
            Some(id) if state.clients[&id].is_visible_on(&state.mons[m]) => Some(id),
            _ => prev,
        };
        let Some(target) = target else { return };
        if target == sel {
            return;
        }
        state.detach(sel);
        let pos = state.list.order.iter().position(|&t| t == target).unwrap();
        state.list.order.insert(pos + 1, sel);
    }
    state.arrange(Some(state.selmon));
}

fn inc_nmaster(state: &mut Gale, i: i32) {
    let m = &mut state.mons[state.selmon];
    m.nmaster = (m.nmaster + i).max(0);
    state.arrange(Some(state.selmon));
}

/// arg > 1.0 sets mfact absolutely.
fn set_mfact(state: &mut Gale, f: f32) {
    let m = &mut state.mons[state.selmon];
    if m.layout().arrange.is_none() {
        return;
    }
    let f = if f < 1.0 { f + m.mfact } else { f - 1.0 };
    if !(0.05..=0.95).contains(&f) {
        return;
    }
    m.mfact = f;
    state.arrange(Some(state.selmon));
}

fn zoom(state: &mut Gale) {
    let mi = state.selmon;
    let Some(sel) = state.mons[mi].sel else { return };
    if state.mons[mi].layout().arrange.is_none() || state.clients[&sel].isfloating {
        return;
    }
    let tiled = state.tiled_clients(mi);
    let c = if tiled.first() == Some(&sel) {
        match tiled.get(1) {
            Some(&c) => c,
            None => return,
        }
    } else {
        sel
    };
    /* pop to master */
    state.detach(c);
    state.attach(c);
    state.focus(Some(c));
    let cmon = state.clients[&c].mon;
    state.arrange(Some(cmon));
}

pub fn view(state: &mut Gale, ui: u32) {
    let selmon = state.selmon;
    {
        let m = &state.mons[selmon];
        if ui != 0 && ui & config::TAGMASK == m.tagset[m.seltags] {
            return;
        }
    }
    let mut newtagset = state.mons[selmon].tagset[state.mons[selmon].seltags ^ 1];
    if ui & config::TAGMASK != 0 {
        newtagset = ui & config::TAGMASK;
    }
    /* swap tagsets when viewing a tag shown on another monitor */
    for mi in 0..state.mons.len() {
        let other_tags = state.mons[mi].tagset[state.mons[mi].seltags];
        if mi != selmon && newtagset & other_tags != 0 {
            /* never display all tags while several monitors are connected */
            if newtagset & state.mons[selmon].tagset[state.mons[selmon].seltags] != 0 {
                return;
            }
            state.mons[mi].sel = state.mons[selmon].sel;
            state.mons[mi].seltags ^= 1;
            let st = state.mons[mi].seltags;
            state.mons[mi].tagset[st] =
                state.mons[selmon].tagset[state.mons[selmon].seltags];
            state.attach_clients(mi);
            state.arrange(Some(mi));
            break;
        }
    }
    state.mons[selmon].seltags ^= 1;
    if ui & config::TAGMASK != 0 {
        let st = state.mons[selmon].seltags;
        state.mons[selmon].tagset[st] = ui & config::TAGMASK;
    }

    /* a view surfacing two fullscreen clients clears fullscreen on all */
    let mut stripped: Vec<ClientId> = Vec::new();
    for id in state.list.order.clone() {
        let c = &state.clients[&id];
        if !(c.isfullscreen && c.tags & newtagset != 0) {
            continue;
        }
        state.clients.get_mut(&id).unwrap().isfullscreen = false;
        stripped.push(id);
    }
    state.attach_clients(selmon);
    state.arrange(Some(selmon));
    if stripped.len() == 1 {
        let fs = stripped[0];
        state.clients.get_mut(&fs).unwrap().isfullscreen = true;
        let (mx, my, mw, mh) = {
            let m = &state.mons[state.clients[&fs].mon];
            (m.mx, m.my, m.mw, m.mh)
        };
        state.resize_client(fs, mx, my, mw, mh);
        let win = state.clients[&fs].win;
        state.xw.raise_window(win);
    }
    state.focus(None);
    state.update_current_desktop();
    let sel = state.mons[state.selmon].sel;
    state.warp(sel);
}

pub fn toggle_view(state: &mut Gale, ui: u32) {
    let selmon = state.selmon;
    let newtagset =
        state.mons[selmon].tagset[state.mons[selmon].seltags] ^ (ui & config::TAGMASK);

    /* never display the same tag on two monitors */
    for mi in 0..state.mons.len() {
        if mi == selmon {
            continue;
        }
        let st = state.mons[mi].seltags;
        if newtagset & state.mons[mi].tagset[st] != 0 {
            state.mons[mi].tagset[st] ^= ui & config::TAGMASK;
            if state.mons[mi].tagset[st] == 0 {
                let free = state.find_first_unused_tag();
                state.mons[mi].tagset[st] |= free;
            }
            state.mons[mi].sel = None;
            state.attach_clients(mi);
            state.arrange(Some(mi));
        }
    }
    let seltags = state.mons[selmon].seltags;
    state.mons[selmon].tagset[seltags] = newtagset;
    state.attach_clients(selmon);
    state.arrange(Some(selmon));
    state.focus(None);
    state.update_current_desktop();
}

pub fn tag(state: &mut Gale, ui: u32) {
    let selmon = state.selmon;
    let Some(sel) = state.mons[selmon].sel else { return };
    if ui & config::TAGMASK == 0 {
        return;
    }
    let newtags = ui & config::TAGMASK;
    for mi in 0..state.mons.len() {
        let st = state.mons[mi].seltags;
        /* move the client along when the tag shows on another monitor */
        if mi != selmon && state.mons[mi].tagset[st] & newtags != 0 {
            if newtags & state.mons[selmon].tagset[state.mons[selmon].seltags] != 0 {
                return;
            }
            {
                let c = state.clients.get_mut(&sel).unwrap();
                c.tags = newtags;
                c.mon = mi;
            }
            state.mons[mi].sel = Some(sel);
            state.arrange(Some(mi));
            break;
        }
    }
    state.clients.get_mut(&sel).unwrap().tags = newtags;
    state.focus(None);
    state.arrange(Some(selmon));
}

pub fn toggle_tag(state: &mut Gale, ui: u32) {
    let selmon = state.selmon;
    let Some(sel) = state.mons[selmon].sel else { return };
    let newtags = state.clients[&sel].tags ^ (ui & config::TAGMASK);
    if newtags == 0 {
        return;
    }
    /* refuse tags that are in use on other monitors */
    for (mi, m) in state.mons.iter().enumerate() {
        if mi != selmon && newtags & m.tagset[m.seltags] != 0 {
            return;
        }
    }
    state.clients.get_mut(&sel).unwrap().tags = newtags;
    state.focus(None);
    state.arrange(Some(selmon));
    state.update_current_desktop();
}

pub fn focus_or_view(state: &mut Gale, ui: u32) {
    for mi in 0..state.mons.len() {
        let m = &state.mons[mi];
        if m.tagset[m.seltags] & ui != 0 {
            if let Some(sel) = state.mons[state.selmon].sel {
                state.unfocus(sel, false);
            }
            state.selmon = mi;
            state.focus(None);
            let sel = state.mons[state.selmon].sel;
            state.warp(sel);
            return;
        }
    }
    view(state, ui);
}

pub fn toggle_scratch(state: &mut Gale, idx: usize) {
    let scratchtag = config::SPTAG(idx);
    let found = state
        .list
        .order
        .iter()
        .copied()
        .find(|id| state.clients[id].tags & scratchtag != 0);

    match found {
        Some(c) => {
            let selmon = state.selmon;
            let newtagset =
                state.mons[selmon].tagset[state.mons[selmon].seltags] ^ scratchtag;
            if newtagset != 0 {
                let st = state.mons[selmon].seltags;
                state.mons[selmon].tagset[st] = newtagset;
                state.focus(None);
                state.arrange(Some(selmon));
            }
            if state.clients[&c].is_visible_on(&state.mons[selmon]) {
                state.focus(Some(c));
                state.restack(selmon);
            }
        }
        None => {
            let selmon = state.selmon;
            let st = state.mons[selmon].seltags;
            state.mons[selmon].tagset[st] |= scratchtag;
            spawn(state, config::SCRATCHPADS[idx].cmd);
        }
    }
}

fn kill_client(state: &mut Gale) {
    let Some(sel) = state.mons[state.selmon].sel else { return };
    let win = state.clients[&sel].win;
    let delete = state.xw.atoms.get(crate::xwrapper::Atom::Wm(crate::xwrapper::WM::Delete));
    if !state.xw.send_event(
        win,
        delete,
        xlib::NoEventMask,
        [delete as i64, xlib::CurrentTime as i64, 0, 0, 0],
    ) {
        state.xw.kill_client_brutally(win);
    }
}

fn set_layout(state: &mut Gale, arg: Option<usize>) {
    let mi = state.selmon;
    {
        let m = &mut state.mons[mi];
        m.sellt ^= 1;
        if let Some(idx) = arg {
            let lt = &config::LAYOUTS[idx];
            if !std::ptr::eq(lt, m.lt[m.sellt ^ 1]) {
                m.lt[m.sellt] = lt;
            }
        }
        m.ltsymbol = m.layout().symbol.to_string();
    }
    if state.mons[mi].sel.is_some() {
        state.arrange(Some(mi));
    } else {
        crate::bar::draw_bar(state, mi);
    }
}

fn toggle_floating(state: &mut Gale) {
    let mi = state.selmon;
    let Some(sel) = state.mons[mi].sel else { return };
    if state.clients[&sel].isfullscreen {
        return;
    }
    let floating = {
        let c = state.clients.get_mut(&sel).unwrap();
        c.isfloating = !c.isfloating || c.isfixed;
        c.isfloating
    };
    if floating {
        let (x, y, w, h) = {
            let c = &state.clients[&sel];
            (c.x, c.y, c.w, c.h)
        };
        state.resize(sel, x, y, w, h, false);
    }
    state.arrange(Some(mi));
}

fn toggle_fullscreen(state: &mut Gale) {
    let Some(sel) = state.mons[state.selmon].sel else { return };
    let fs = state.clients[&sel].isfullscreen;
    state.set_fullscreen(sel, !fs);
}

fn float_pos(state: &mut Gale, spec: &str) {
    let Some(sel) = state.mons[state.selmon].sel else { return };
    {
        let m = &state.mons[state.selmon];
        if m.layout().arrange.is_some() && !state.clients[&sel].isfloating {
            return;
        }
    }
    let mut c = state.clients[&sel].clone();
    state.set_floatpos(&mut c, spec);
    let (x, y, w, h) = (c.x, c.y, c.w, c.h);
    *state.clients.get_mut(&sel).unwrap() = c;
    state.resize_client(sel, x, y, w, h);

    let (win, w, h) = {
        let c = &state.clients[&sel];
        (c.win, c.w, c.h)
    };
    state.xw.raise_window(win);
    state.xw.warp_pointer(win, w / 2, h / 2);
}

fn focus_mon(state: &mut Gale, dir: i32) {
    if state.mons.len() <= 1 {
        return;
    }
    let m = state.dir_to_mon(dir);
    if m == state.selmon {
        return;
    }
    if let Some(sel) = state.mons[state.selmon].sel {
        state.unfocus(sel, false);
    }
    state.selmon = m;
    state.focus(None);
    let sel = state.mons[state.selmon].sel;
    state.warp(sel);
}

fn tag_mon(state: &mut Gale, dir: i32) {
    let Some(sel) = state.mons[state.selmon].sel else { return };
    if state.mons.len() <= 1 {
        return;
    }
    let target = state.dir_to_mon(dir);
    if state.clients[&sel].isfullscreen {
        state.clients.get_mut(&sel).unwrap().isfullscreen = false;
        state.send_mon(sel, target);
        let (mx, my, mw, mh) = {
            let m = &state.mons[target];
            (m.mx, m.my, m.mw, m.mh)
        };
        let c = state.clients.get_mut(&sel).unwrap();
        c.isfullscreen = true;
        let win = c.win;
        state.resize_client(sel, mx, my, mw, mh);
        state.xw.raise_window(win);
    } else {
        state.send_mon(sel, target);
    }
}

fn xrdb(state: &mut Gale) {
    let mut palette = state.palette.clone();
    state.xw.load_xrdb(&mut palette);
    state.palette = palette;
    state.drw.create_schemes(&state.palette);
    state.focus(None);
    state.arrange(None);
}

/* ---- mouse handling ---- */

const MOUSEMASK: i64 =
    xlib::ButtonPressMask | xlib::ButtonReleaseMask | xlib::PointerMotionMask;
const DRAGMASK: i64 = MOUSEMASK | xlib::ExposureMask | xlib::SubstructureRedirectMask;

fn move_or_place(state: &mut Gale, mode: i32) {
    let floating_layout = state.mons[state.selmon].layout().arrange.is_none();
    let sel_floating = state.mons[state.selmon]
        .sel
        .map_or(false, |id| state.clients[&id].isfloating);
    if floating_layout || sel_floating {
        move_mouse(state);
    } else {
        place_mouse(state, mode);
    }
}

fn move_mouse(state: &mut Gale) {
    let Some(c) = state.mons[state.selmon].sel else { return };
    if state.clients[&c].isfullscreen {
        return; /* no moving fullscreen windows around */
    }
    state.restack(state.selmon);
    let (ocx, ocy) = (state.clients[&c].x, state.clients[&c].y);
    if !state.xw.grab_pointer(state.cursors[Cursor::Move as usize]) {
        return;
    }
    let Some((x, y)) = state.xw.root_pointer() else { return };

    let mut lasttime: xlib::Time = 0;
    loop {
        let mut ev = state.xw.mask_event(DRAGMASK);
        match ev.get_type() {
            xlib::ConfigureRequest | xlib::Expose | xlib::MapRequest => {
                crate::events::handle_event(state, &mut ev);
            }
            xlib::MotionNotify => {
                let mev = unsafe { ev.motion };
                if mev.time.wrapping_sub(lasttime) <= 1000 / 60 {
                    continue;
                }
                lasttime = mev.time;

                if !state.clients.contains_key(&c) {
                    break;
                }
                let m = &state.mons[state.selmon];
                let cl = &state.clients[&c];
                let mut nx = ocx + (mev.x - x);
                let mut ny = ocy + (mev.y - y);
                if (m.wx - nx).abs() < config::SNAP {
                    nx = m.wx;
                } else if ((m.wx + m.ww) - (nx + cl.width())).abs() < config::SNAP {
                    nx = m.wx + m.ww - cl.width();
                }
                if (m.wy - ny).abs() < config::SNAP {
                    ny = m.wy;
                } else if ((m.wy + m.wh) - (ny + cl.height())).abs() < config::SNAP {
                    ny = m.wy + m.wh - cl.height();
                }
                let tiled_drag = !cl.isfloating && m.layout().arrange.is_some();
                if tiled_drag
                    && ((nx - cl.x).abs() > config::SNAP || (ny - cl.y).abs() > config::SNAP)
                {
                    toggle_floating(state);
                }
                let m = &state.mons[state.selmon];
                if m.layout().arrange.is_none() || state.clients[&c].isfloating {
                    let (w, h) = (state.clients[&c].w, state.clients[&c].h);
                    state.resize(c, nx, ny, w, h, true);
                }
            }
            xlib::ButtonRelease => break,
            _ => {}
        }
    }
    state.xw.ungrab_pointer();
    if !state.clients.contains_key(&c) {
        return;
    }
    let (cx, cy, cw, ch) = {
        let cl = &state.clients[&c];
        (cl.x, cl.y, cl.w, cl.h)
    };
    let m = state.rect_to_mon(cx, cy, cw, ch);
    if m != state.selmon {
        state.send_mon(c, m);
        state.selmon = m;
        state.focus(None);
    }
}

fn place_mouse(state: &mut Gale, mode: i32) {
    let Some(c) = state.mons[state.selmon].sel else { return };
    if state.mons[state.selmon].layout().arrange.is_none() {
        return; /* only makes sense under a tiling layout */
    }
    if state.clients[&c].isfullscreen {
        return;
    }
    state.restack(state.selmon);
    if !state.xw.grab_pointer(state.cursors[Cursor::Move as usize]) {
        return;
    }

    {
        let cl = state.clients.get_mut(&c).unwrap();
        cl.isfloating = false;
        cl.beingmoved = true;
    }
    let (ocx, ocy, ocw, och) = {
        let cl = &state.clients[&c];
        (cl.x, cl.y, cl.w, cl.h)
    };
    if mode == 2 {
        /* warp the cursor to the window center first */
        let cl = &state.clients[&c];
        let (win, w, h) = (cl.win, cl.width(), cl.height());
        state.xw.warp_pointer(win, w / 2, h / 2);
    }
    let Some((x, y)) = state.xw.root_pointer() else { return };

    let mut nx = -9999;
    let mut ny = -9999;
    let mut freemove = false;
    let mut prev_r: Option<ClientId> = Some(c);
    let mut prev_attach_above: Option<bool> = None;
    let mut lasttime: xlib::Time = 0;
    let mut release_x = x;
    let mut release_y = y;

    loop {
        let mut ev = state.xw.mask_event(DRAGMASK);
        match ev.get_type() {
            xlib::ConfigureRequest | xlib::Expose | xlib::MapRequest => {
                crate::events::handle_event(state, &mut ev);
            }
            xlib::MotionNotify => {
                let mev = unsafe { ev.motion };
                release_x = mev.x;
                release_y = mev.y;
                if mev.time.wrapping_sub(lasttime) <= 1000 / 60 {
                    continue;
                }
                lasttime = mev.time;
                if !state.clients.contains_key(&c) {
                    break;
                }

                nx = ocx + (mev.x - x);
                ny = ocy + (mev.y - y);
                if !freemove
                    && ((nx - ocx).abs() > config::SNAP || (ny - ocy).abs() > config::SNAP)
                {
                    freemove = true;
                }
                if freemove {
                    let win = state.clients[&c].win;
                    state.xw.move_window(win, nx, ny);
                }
                let m = state.rect_to_mon(mev.x, mev.y, 1, 1);
                if m != state.selmon {
                    state.selmon = m;
                }

                let (px, py) = if mode == 1 {
                    /* tiled position relative to the window center */
                    (nx + ocw / 2, ny + och / 2)
                } else {
                    (mev.x, mev.y)
                };

                let r = state.rect_to_client(px, py, 1, 1);
                let Some(r) = r else { continue };
                if r == c {
                    continue;
                }

                let attach_above = {
                    let rc = &state.clients[&r];
                    if (rc.y + rc.h - py) as f32 / rc.h as f32
                        > (rc.x + rc.w - px) as f32 / rc.w as f32
                    {
                        (rc.y - py).abs() < rc.h / 2
                    } else {
                        (rc.x - px).abs() < rc.w / 2
                    }
                };

                if prev_r != Some(r) || prev_attach_above != Some(attach_above) {
                    state.detach_stack(c);
                    state.detach(c);
                    let rmon = state.clients[&r].mon;
                    if state.clients[&c].mon != rmon {
                        let old = state.clients[&c].mon;
                        state.arrange_mon(old);
                        let tags = state.mons[rmon].tagset[state.mons[rmon].seltags];
                        state.clients.get_mut(&c).unwrap().tags = tags;
                    }
                    state.clients.get_mut(&c).unwrap().mon = rmon;
                    state.mons[rmon].sel = Some(r);

                    let rpos = state.list.order.iter().position(|&t| t == r).unwrap();
                    if attach_above {
                        state.list.order.insert(rpos, c);
                    } else {
                        state.list.order.insert(rpos + 1, c);
                    }
                    state.attach_stack(c);
                    state.arrange_mon(rmon);
                    prev_r = Some(r);
                    prev_attach_above = Some(attach_above);
                }
            }
            xlib::ButtonRelease => {
                let bev = unsafe { ev.button };
                release_x = bev.x;
                release_y = bev.y;
                break;
            }
            _ => {}
        }
    }
    state.xw.ungrab_pointer();
    if !state.clients.contains_key(&c) {
        return;
    }

    let m = state.rect_to_mon(release_x, release_y, 1, 1);
    if m != state.clients[&c].mon {
        state.detach(c);
        state.detach_stack(c);
        let old = state.clients[&c].mon;
        state.arrange_mon(old);
        let tags = state.mons[m].tagset[state.mons[m].seltags];
        {
            let cl = state.clients.get_mut(&c).unwrap();
            cl.mon = m;
            cl.tags = tags;
        }
        state.attach(c);
        state.attach_stack(c);
        state.selmon = m;
    }

    state.focus(Some(c));
    state.clients.get_mut(&c).unwrap().beingmoved = false;

    if nx != -9999 {
        let (w, h) = (state.clients[&c].w, state.clients[&c].h);
        state.resize(c, nx, ny, w, h, false);
    }
    let cmon = state.clients[&c].mon;
    state.arrange_mon(cmon);
}

fn resize_mouse(state: &mut Gale) {
    let Some(c) = state.mons[state.selmon].sel else { return };
    if state.clients[&c].isfullscreen {
        return; /* no resizing fullscreen windows */
    }
    state.restack(state.selmon);
    let (ocx, ocy) = (state.clients[&c].x, state.clients[&c].y);
    if !state.xw.grab_pointer(state.cursors[Cursor::Resize as usize]) {
        return;
    }
    {
        let cl = &state.clients[&c];
        let (win, w, h, bw) = (cl.win, cl.w, cl.h, cl.bw);
        state.xw.warp_pointer(win, w + bw - 1, h + bw - 1);
    }

    let mut lasttime: xlib::Time = 0;
    loop {
        let mut ev = state.xw.mask_event(DRAGMASK);
        match ev.get_type() {
            xlib::ConfigureRequest | xlib::Expose | xlib::MapRequest => {
                crate::events::handle_event(state, &mut ev);
            }
            xlib::MotionNotify => {
                let mev = unsafe { ev.motion };
                if mev.time.wrapping_sub(lasttime) <= 1000 / 60 {
                    continue;
                }
                lasttime = mev.time;
                if !state.clients.contains_key(&c) {
                    break;
                }

                let cl = &state.clients[&c];
                let nw = (mev.x - ocx - 2 * cl.bw + 1).max(1);
                let nh = (mev.y - ocy - 2 * cl.bw + 1).max(1);
                let m = &state.mons[state.selmon];
                let cm = &state.mons[cl.mon];
                if cm.wx + nw >= m.wx
                    && cm.wx + nw <= m.wx + m.ww
                    && cm.wy + nh >= m.wy
                    && cm.wy + nh <= m.wy + m.wh
                {
                    let tiled_drag = !cl.isfloating && m.layout().arrange.is_some();
                    if tiled_drag
                        && ((nw - cl.w).abs() > config::SNAP
                            || (nh - cl.h).abs() > config::SNAP)
                    {
                        toggle_floating(state);
                    }
                }
                let m = &state.mons[state.selmon];
                if m.layout().arrange.is_none() || state.clients[&c].isfloating {
                    let (x, y) = (state.clients[&c].x, state.clients[&c].y);
                    state.resize(c, x, y, nw, nh, true);
                }
            }
            xlib::ButtonRelease => break,
            _ => {}
        }
    }
    if state.clients.contains_key(&c) {
        let cl = &state.clients[&c];
        let (win, w, h, bw) = (cl.win, cl.w, cl.h, cl.bw);
        state.xw.warp_pointer(win, w + bw - 1, h + bw - 1);
    }
    state.xw.ungrab_pointer();
    state.xw.drain_events(xlib::EnterWindowMask);
    if !state.clients.contains_key(&c) {
        return;
    }
    let (cx, cy, cw, ch) = {
        let cl = &state.clients[&c];
        (cl.x, cl.y, cl.w, cl.h)
    };
    let m = state.rect_to_mon(cx, cy, cw, ch);
    if m != state.selmon {
        state.send_mon(c, m);
        state.selmon = m;
        state.focus(None);
    }
}
