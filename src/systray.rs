//! System tray host. Owns the `_NET_SYSTEM_TRAY_S0` selection; icons dock
//! through tray opcode client messages and live in a dedicated
//! override-redirect window embedded in the bar. Each icon is tracked as a
//! client record whose `tags` field doubles as its mapped state.

use x11::xlib;

use crate::client::Client;
use crate::config;
use crate::drw::{Scheme, COL_BG};
use crate::state::Gale;
use crate::xwrapper::{
    Atom, Net, Window, XAtom, XEMBED_EMBEDDED_NOTIFY, XEMBED_EMBEDDED_VERSION, XEMBED_MAPPED,
    XEMBED_WINDOW_ACTIVATE, XEMBED_WINDOW_DEACTIVATE,
};

pub struct Systray {
    pub win: Window,
    pub icons: Vec<Client>,
    /// Monitor of the bar currently hosting the tray.
    pub mon: usize,
}

pub fn win_to_icon(state: &Gale, w: xlib::Window) -> Option<usize> {
    if !config::SHOWSYSTRAY || w == 0 {
        return None;
    }
    state
        .systray
        .as_ref()
        .and_then(|tray| tray.icons.iter().position(|i| i.win.0 == w))
}

pub fn draw_tray_bar(state: &mut Gale) {
    if let Some(tray) = &state.systray {
        let mi = tray.mon;
        if mi < state.mons.len() {
            crate::bar::draw_bar(state, mi);
        }
    }
}

pub fn width_systray(state: &mut Gale) -> i32 {
    if state.systray.is_none() {
        /* a nominal width so the draw pass runs and acquires the tray */
        return 1;
    }
    let mut w = 0;
    if config::SHOWSYSTRAY {
        let skip = state.xw.atoms.get(Atom::Net(Net::WMStateSkipTaskbar));
        let wins: Vec<(Window, i32)> = state
            .systray
            .as_ref()
            .unwrap()
            .icons
            .iter()
            .map(|i| (i.win, i.w))
            .collect();
        for (win, iw) in wins {
            if state.xw.get_atom_prop(win, skip) == 0 {
                w += iw + config::SYSTRAYSPACING;
            }
        }
    }
    if w > 0 {
        w + state.lrpad - config::SYSTRAYSPACING
    } else {
        0
    }
}

pub fn draw_systray(state: &mut Gale, mi: usize, bi: usize, x: i32, w: i32) {
    if !config::SHOWSYSTRAY {
        if let Some(tray) = &state.systray {
            /* park it off-screen while disabled */
            let by = state.mons[mi].bars[bi].by;
            state.xw.move_window(tray.win, -500, by);
        }
        return;
    }

    let (bx, by) = {
        let bar = &state.mons[mi].bars[bi];
        (bar.bx, bar.by)
    };
    let font_h = state.drw.font_height().max(1);

    if state.systray.is_none() && !acquire_tray(state, bx + x, by, w) {
        return;
    }

    let skip = state.xw.atoms.get(Atom::Net(Net::WMStateSkipTaskbar));
    let bg = state.drw.scheme_pixel(Scheme::Norm, COL_BG);
    let mut used = 0;
    let count = state.systray.as_ref().unwrap().icons.len();
    for idx in 0..count {
        let (win, iw, ih) = {
            let i = &state.systray.as_ref().unwrap().icons[idx];
            (i.win, i.w, i.h)
        };
        if state.xw.get_atom_prop(win, skip) != 0 {
            continue;
        }
        state.xw.set_window_background(win, bg);
        state.xw.map_raised(win);
        state.systray.as_mut().unwrap().icons[idx].x = used;
        state
            .xw
            .move_resize_window(win, used, 0, iw.max(1) as u32, ih.max(1) as u32);
        used += iw;
        if idx + 1 < count {
            used += config::SYSTRAYSPACING;
        }
    }
    {
        let tray = state.systray.as_mut().unwrap();
        tray.mon = mi;
        let tray_win = tray.win;
        let ty = if used > 0 { by } else { -by };
        state.xw.move_resize_window(
            tray_win,
            bx + x + state.lrpad / 2,
            ty + config::VERTPADBAR / 2,
            used.max(1) as u32,
            font_h,
        );
    }
}

fn acquire_tray(state: &mut Gale, x: i32, y: i32, w: i32) -> bool {
    let bg = state.drw.scheme_pixel(Scheme::Norm, COL_BG);
    let font_h = state.drw.font_height().max(1);
    let win = state.xw.create_shell_window(
        x + state.lrpad / 2,
        y + config::VERTPADBAR / 2,
        w.max(1) as u32,
        font_h,
        bg,
        false,
        xlib::ButtonPressMask | xlib::ExposureMask,
    );
    state.xw.select_input(win, xlib::SubstructureNotifyMask);
    state.xw.replace_cardinals(
        win,
        state.xw.atoms.get(Atom::Net(Net::SystemTrayOrientation)),
        &[0], /* _NET_SYSTEM_TRAY_ORIENTATION_HORZ */
    );
    state.xw.replace_atoms(
        win,
        state.xw.atoms.get(Atom::Net(Net::WMWindowType)),
        &[state.xw.atoms.get(Atom::Net(Net::WMWindowTypeDock))],
    );
    state.xw.map_raised(win);

    let selection = state.xw.atoms.get(Atom::Net(Net::SystemTray));
    state.xw.set_selection_owner(selection, win);
    if state.xw.get_selection_owner(selection) != win {
        log::error!("unable to obtain the system tray selection");
        eprintln!("gale: unable to obtain system tray.");
        state.xw.destroy_window(win);
        return false;
    }
    let manager = state.xw.atoms.get(Atom::X(XAtom::Manager));
    state.xw.send_event(
        state.root,
        manager,
        xlib::StructureNotifyMask,
        [
            xlib::CurrentTime as i64,
            selection as i64,
            win.0 as i64,
            0,
            0,
        ],
    );
    state.xw.sync(false);
    state.systray = Some(Systray {
        win,
        icons: Vec::new(),
        mon: state.selmon,
    });
    true
}

/// Dock request: wrap the icon window in a client record and embed it.
pub fn add_icon(state: &mut Gale, win: Window) {
    if win.0 == 0 || state.systray.is_none() {
        return;
    }
    let Some(wa) = state.xw.get_window_attributes(win) else { return };

    let mut icon = Client::new(win, 0, 0, wa.width, wa.height, wa.border_width);
    icon.mon = state.selmon;
    icon.bw = 0;
    icon.isfloating = true;
    icon.tags = 1; /* reused as the mapped flag */
    fetch_icon_size_hints(state, &mut icon);
    normalize_icon_geom(&mut icon, wa.width, wa.height, state.drw.font_height() as i32);

    state.xw.add_to_save_set(win);
    state.xw.select_input(
        win,
        xlib::StructureNotifyMask | xlib::PropertyChangeMask | xlib::ResizeRedirectMask,
    );
    state.xw.set_class_hint(win, "galesystray");
    let tray_win = state.systray.as_ref().unwrap().win;
    state.xw.reparent_window(win, tray_win);
    let bg = state.drw.scheme_pixel(Scheme::Norm, COL_BG);
    state.xw.set_window_background(win, bg);
    let xembed = state.xw.atoms.get(Atom::X(XAtom::Xembed));
    state.xw.send_event(
        win,
        xembed,
        xlib::StructureNotifyMask,
        [
            xlib::CurrentTime as i64,
            XEMBED_EMBEDDED_NOTIFY,
            0,
            tray_win.0 as i64,
            XEMBED_EMBEDDED_VERSION,
        ],
    );
    state.xw.sync(false);
    state.xw.set_client_state(win, 1); /* NormalState */

    state.systray.as_mut().unwrap().icons.insert(0, icon);
    draw_tray_bar(state);
}

pub fn remove_icon(state: &mut Gale, win: Window) {
    if !config::SHOWSYSTRAY {
        return;
    }
    if let Some(tray) = &mut state.systray {
        tray.icons.retain(|i| i.win != win);
    }
    draw_tray_bar(state);
}

pub fn update_icon_size_hints(state: &mut Gale, idx: usize) {
    let Some(tray) = &state.systray else { return };
    let win = tray.icons[idx].win;
    let hints = state.xw.get_wm_normal_hints(win);
    if let (Some(tray), Some(hints)) = (state.systray.as_mut(), hints) {
        Gale::apply_normal_hints(&mut tray.icons[idx], &hints);
    }
}

fn fetch_icon_size_hints(state: &Gale, icon: &mut Client) {
    if let Some(hints) = state.xw.get_wm_normal_hints(icon.win) {
        Gale::apply_normal_hints(icon, &hints);
    }
}

pub fn update_icon_geom(state: &mut Gale, idx: usize, w: i32, h: i32) {
    let font_h = state.drw.font_height() as i32;
    if let Some(tray) = &mut state.systray {
        normalize_icon_geom(&mut tray.icons[idx], w, h, font_h);
    }
}

/// Scale an icon to the bar font height, keeping its aspect ratio; clamp
/// pathologically wide icons.
fn normalize_icon_geom(icon: &mut Client, w: i32, h: i32, font_h: i32) {
    if font_h <= 0 {
        return;
    }
    icon.h = font_h;
    if w == h {
        icon.w = font_h;
    } else if h == font_h {
        icon.w = w;
    } else {
        icon.w = (font_h as f32 * (w as f32 / h.max(1) as f32)) as i32;
    }
    /* force icons into the tray dimensions if they do not want to */
    if icon.h > font_h {
        if icon.w == icon.h {
            icon.w = font_h;
        } else {
            icon.w = (font_h as f32 * (icon.w as f32 / icon.h as f32)) as i32;
        }
        icon.h = font_h;
    }
    if icon.w > 2 * font_h {
        icon.w = font_h;
    }
    icon.w = icon.w.max(1);
}

/// `_XEMBED_INFO` changes flip the icon's mapped state.
pub fn update_icon_state(state: &mut Gale, win: Window, atom: xlib::Atom) {
    if !config::SHOWSYSTRAY || state.systray.is_none() {
        return;
    }
    if atom != state.xw.atoms.get(Atom::X(XAtom::XembedInfo)) {
        return;
    }
    let Some(idx) = win_to_icon(state, win.0) else { return };
    let Some(flags) = state.xw.get_xembed_flags(win) else { return };
    let mapped = state.systray.as_ref().unwrap().icons[idx].tags != 0;

    let code;
    if flags as i64 & XEMBED_MAPPED != 0 && !mapped {
        state.systray.as_mut().unwrap().icons[idx].tags = 1;
        code = XEMBED_WINDOW_ACTIVATE;
        state.xw.map_raised(win);
        state.xw.set_client_state(win, 1); /* NormalState */
    } else if flags as i64 & XEMBED_MAPPED == 0 && mapped {
        state.systray.as_mut().unwrap().icons[idx].tags = 0;
        code = XEMBED_WINDOW_DEACTIVATE;
        state.xw.unmap_window(win);
        state.xw.set_client_state(win, 0); /* WithdrawnState */
    } else {
        return;
    }
    let xembed = state.xw.atoms.get(Atom::X(XAtom::Xembed));
    let tray_win = state.systray.as_ref().unwrap().win;
    state.xw.send_event(
        win,
        xembed,
        xlib::StructureNotifyMask,
        [
            xlib::CurrentTime as i64,
            code,
            0,
            tray_win.0 as i64,
            XEMBED_EMBEDDED_VERSION,
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xwrapper::Window;

    fn icon(w: i32, h: i32) -> Client {
        Client::new(Window(1), 0, 0, w, h, 0)
    }

    #[test]
    fn square_icons_match_the_font_height() {
        let mut i = icon(48, 48);
        normalize_icon_geom(&mut i, 48, 48, 16);
        assert_eq!((i.w, i.h), (16, 16));
    }

    #[test]
    fn aspect_ratio_is_preserved() {
        let mut i = icon(32, 16);
        normalize_icon_geom(&mut i, 32, 16, 16);
        assert_eq!((i.w, i.h), (32, 16));
        let mut i = icon(24, 48);
        normalize_icon_geom(&mut i, 24, 48, 16);
        assert_eq!((i.w, i.h), (8, 16));
    }

    #[test]
    fn overly_wide_icons_are_clamped() {
        let mut i = icon(400, 20);
        normalize_icon_geom(&mut i, 400, 20, 16);
        assert_eq!(i.w, 16);
        assert_eq!(i.h, 16);
    }
}
