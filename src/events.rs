//! X event dispatch. One synchronous handler per event type; unknown types
//! fall through. The same entry point serves the main loop and the nested
//! loops inside the mouse drags.

use x11::xlib;

use crate::actions::{self, Action, Clk};
use crate::config;
use crate::state::Gale;
use crate::systray;
use crate::xwrapper::{Atom, Net, Window, SYSTEM_TRAY_REQUEST_DOCK, XEMBED_EMBEDDED_VERSION, XEMBED_WINDOW_ACTIVATE};

pub fn handle_event(state: &mut Gale, ev: &mut xlib::XEvent) {
    match ev.get_type() {
        xlib::ButtonPress => button_press(state, unsafe { ev.button }),
        xlib::ClientMessage => client_message(state, unsafe { ev.client_message }),
        xlib::ConfigureRequest => configure_request(state, unsafe { ev.configure_request }),
        xlib::ConfigureNotify => configure_notify(state, unsafe { ev.configure }),
        xlib::DestroyNotify => destroy_notify(state, unsafe { ev.destroy_window }),
        xlib::EnterNotify => enter_notify(state, unsafe { ev.crossing }),
        xlib::Expose => expose(state, unsafe { ev.expose }),
        xlib::FocusIn => focus_in(state, unsafe { ev.focus_change }),
        xlib::KeyPress => key_press(state, unsafe { ev.key }),
        xlib::MappingNotify => mapping_notify(state, unsafe { ev.mapping }),
        xlib::MapRequest => map_request(state, unsafe { ev.map_request }),
        xlib::MotionNotify => motion_notify(state, unsafe { ev.motion }),
        xlib::PropertyNotify => property_notify(state, unsafe { ev.property }),
        xlib::ResizeRequest => resize_request(state, unsafe { ev.resize_request }),
        xlib::UnmapNotify => unmap_notify(state, unsafe { ev.unmap }),
        _ => {}
    }
}

fn button_press(state: &mut Gale, ev: xlib::XButtonEvent) {
    let mut click = Clk::RootWin;
    let mut click_arg: Option<u32> = None;

    /* focus the monitor under the press if needed */
    let m = state.win_to_mon(ev.window);
    if m != state.selmon {
        if let Some(sel) = state.mons[state.selmon].sel {
            state.unfocus(sel, true);
        }
        state.selmon = m;
        state.focus(None);
    }

    let selmon = state.selmon;
    let bar_hit = state.mons[selmon]
        .bars
        .iter()
        .find(|b| b.win.0 == ev.window)
        .map(|b| (b.idx, b.x.clone(), b.w.clone()));
    if let Some((bidx, xs, ws)) = bar_hit {
        for (r, br) in config::BARRULES.iter().enumerate() {
            if br.bar != bidx || !br.monitor.includes(selmon) {
                continue;
            }
            if xs[r] <= ev.x && ev.x <= xs[r] + ws[r] {
                match crate::bar::click_module(state, br.module, selmon, ev.x - xs[r]) {
                    Some((c, a)) => {
                        click = c;
                        click_arg = a;
                    }
                    None => return, /* the module consumed the click */
                }
                break;
            }
        }
    }

    if click == Clk::RootWin {
        if let Some(id) = state.win_to_client(ev.window) {
            state.focus(Some(id));
            state.restack(state.selmon);
            state.xw.allow_events(xlib::ReplayPointer);
            click = Clk::ClientWin;
        }
    }

    for b in config::buttons() {
        if b.click == click
            && b.button == ev.button
            && state.xw.clean_mask(state.numlockmask, b.mask)
                == state.xw.clean_mask(state.numlockmask, ev.state)
        {
            /* zero-tag bar bindings take the clicked tag */
            let action = match (click, b.action, click_arg) {
                (Clk::TagBar, Action::View(0), Some(ui)) => Action::View(ui),
                (Clk::TagBar, Action::ToggleView(0), Some(ui)) => Action::ToggleView(ui),
                (Clk::TagBar, Action::Tag(0), Some(ui)) => Action::Tag(ui),
                (Clk::TagBar, Action::ToggleTag(0), Some(ui)) => Action::ToggleTag(ui),
                _ => b.action,
            };
            action.execute(state);
        }
    }
}

fn client_message(state: &mut Gale, ev: xlib::XClientMessageEvent) {
    let tray_op = state.xw.atoms.get(Atom::Net(Net::SystemTrayOP));
    if config::SHOWSYSTRAY {
        if let Some(tray) = &state.systray {
            if ev.window == tray.win.0 && ev.message_type == tray_op {
                if ev.data.get_long(1) == SYSTEM_TRAY_REQUEST_DOCK {
                    systray::add_icon(state, Window(ev.data.get_long(2) as xlib::Window));
                }
                return;
            }
        }
    }

    let Some(id) = state.win_to_client(ev.window) else { return };
    let net_state = state.xw.atoms.get(Atom::Net(Net::WMState));
    let net_fs = state.xw.atoms.get(Atom::Net(Net::WMFullscreen));
    let net_active = state.xw.atoms.get(Atom::Net(Net::ActiveWindow));

    if ev.message_type == net_state {
        if ev.data.get_long(1) == net_fs as i64 || ev.data.get_long(2) == net_fs as i64 {
            let fullscreen = ev.data.get_long(0) == 1 /* _NET_WM_STATE_ADD */
                || (ev.data.get_long(0) == 2 /* _NET_WM_STATE_TOGGLE */
                    && !state.clients[&id].isfullscreen);
            state.set_fullscreen(id, fullscreen);
        }
    } else if ev.message_type == net_active {
        let tags = state.clients[&id].tags;
        if let Some(i) = (0..config::TAGS.len()).find(|i| tags & (1 << i) != 0) {
            actions::focus_or_view(state, 1 << i);
            state.focus(Some(id));
            state.restack(state.selmon);
        }
    }
}

fn configure_request(state: &mut Gale, ev: xlib::XConfigureRequestEvent) {
    if let Some(id) = state.win_to_client(ev.window) {
        let floating_layout = state.mons[state.selmon].layout().arrange.is_none();
        if ev.value_mask & xlib::CWBorderWidth as u64 != 0 {
            state.clients.get_mut(&id).unwrap().bw = ev.border_width;
        } else if state.clients[&id].isfloating || floating_layout {
            let mi = state.clients[&id].mon;
            let (mx, my, mw, mh) = {
                let m = &state.mons[mi];
                (m.mx, m.my, m.mw, m.mh)
            };
            {
                let c = state.clients.get_mut(&id).unwrap();
                if ev.value_mask & xlib::CWX as u64 != 0 {
                    c.oldx = c.x;
                    c.x = mx + ev.x;
                }
                if ev.value_mask & xlib::CWY as u64 != 0 {
                    c.oldy = c.y;
                    c.y = my + ev.y;
                }
                if ev.value_mask & xlib::CWWidth as u64 != 0 {
                    c.oldw = c.w;
                    c.w = ev.width;
                }
                if ev.value_mask & xlib::CWHeight as u64 != 0 {
                    c.oldh = c.h;
                    c.h = ev.height;
                }
                if c.x + c.w > mx + mw && c.isfloating {
                    c.x = mx + (mw / 2 - c.width() / 2); /* center on x */
                }
                if c.y + c.h > my + mh && c.isfloating {
                    c.y = my + (mh / 2 - c.height() / 2); /* center on y */
                }
            }
            if ev.value_mask & (xlib::CWX | xlib::CWY) as u64 != 0
                && ev.value_mask & (xlib::CWWidth | xlib::CWHeight) as u64 == 0
            {
                state.send_configure(id);
            }
            let c = &state.clients[&id];
            if c.is_visible_on(&state.mons[mi]) {
                let (win, x, y, w, h) = (c.win, c.x, c.y, c.w, c.h);
                state.xw.move_resize_window(win, x, y, w as u32, h as u32);
            }
        } else {
            state.send_configure(id);
        }
    } else {
        state.xw.configure_pass_through(&ev);
    }
    state.xw.sync(false);
}

fn configure_notify(state: &mut Gale, ev: xlib::XConfigureEvent) {
    if ev.window != state.root.0 {
        return;
    }
    let dirty = state.sw != ev.width || state.sh != ev.height;
    state.sw = ev.width;
    state.sh = ev.height;
    if state.update_geom() || dirty {
        state.drw.resize(state.sw as u32, state.bh as u32);
        state.update_bars();
        let fullscreen: Vec<_> = state
            .clients
            .iter()
            .filter(|(_, c)| c.isfullscreen)
            .map(|(&id, c)| (id, c.mon))
            .collect();
        for (id, mi) in fullscreen {
            let (mx, my, mw, mh) = {
                let m = &state.mons[mi];
                (m.mx, m.my, m.mw, m.mh)
            };
            state.resize_client(id, mx, my, mw, mh);
        }
        for mi in 0..state.mons.len() {
            let bars: Vec<_> = state.mons[mi]
                .bars
                .iter()
                .map(|b| (b.win, b.bx, b.by, b.bw, b.bh))
                .collect();
            for (win, bx, by, bw, bh) in bars {
                state.xw.move_resize_window(win, bx, by, bw as u32, bh as u32);
            }
        }
        state.focus(None);
        state.arrange(None);
    }
}

fn destroy_notify(state: &mut Gale, ev: xlib::XDestroyWindowEvent) {
    if let Some(id) = state.win_to_client(ev.window) {
        state.unmanage(id, true);
    } else if let Some(p) = state.swallowing_parent(ev.window) {
        /* the swallowed terminal died behind the scenes */
        let mon = state.clients[&p].mon;
        state.clients.get_mut(&p).unwrap().swallowing = None;
        state.arrange(Some(mon));
        state.focus(None);
    } else if config::SHOWSYSTRAY && systray::win_to_icon(state, ev.window).is_some() {
        systray::remove_icon(state, Window(ev.window));
        systray::draw_tray_bar(state);
    }
}

fn enter_notify(state: &mut Gale, ev: xlib::XCrossingEvent) {
    if (ev.mode != xlib::NotifyNormal || ev.detail == xlib::NotifyInferior)
        && ev.window != state.root.0
    {
        return;
    }
    let c = state.win_to_client(ev.window);
    let m = match c {
        Some(id) => state.clients[&id].mon,
        None => state.win_to_mon(ev.window),
    };
    if m != state.selmon {
        if let Some(sel) = state.mons[state.selmon].sel {
            state.unfocus(sel, true);
        }
        state.selmon = m;
    } else if c.is_none() || c == state.mons[state.selmon].sel {
        return;
    }
    state.focus(c);
}

fn expose(state: &mut Gale, ev: xlib::XExposeEvent) {
    if ev.count == 0 {
        let m = state.win_to_mon(ev.window);
        crate::bar::draw_bar(state, m);
    }
}

/// Some focus-stealing clients need to be put back in their place.
fn focus_in(state: &mut Gale, ev: xlib::XFocusChangeEvent) {
    let Some(sel) = state.mons[state.selmon].sel else { return };
    if ev.window != state.clients[&sel].win.0 && state.win_to_client(ev.window).is_some() {
        state.set_focus(sel);
    }
}

fn key_press(state: &mut Gale, ev: xlib::XKeyEvent) {
    let keysym = state.xw.keycode_to_keysym(ev.keycode);
    for key in config::keys() {
        if keysym == key.keysym
            && state.xw.clean_mask(state.numlockmask, key.mask)
                == state.xw.clean_mask(state.numlockmask, ev.state)
        {
            key.action.execute(state);
        }
    }
}

fn mapping_notify(state: &mut Gale, mut ev: xlib::XMappingEvent) {
    state.xw.refresh_keyboard_mapping(&mut ev);
    if ev.request == xlib::MappingKeyboard {
        state.grab_keys();
    }
}

fn map_request(state: &mut Gale, ev: xlib::XMapRequestEvent) {
    if config::SHOWSYSTRAY {
        if let Some(idx) = systray::win_to_icon(state, ev.window) {
            let (iwin, tray_win) = {
                let tray = state.systray.as_ref().unwrap();
                (tray.icons[idx].win, tray.win)
            };
            let xembed = state.xw.atoms.get(Atom::X(crate::xwrapper::XAtom::Xembed));
            state.xw.send_event(
                iwin,
                xembed,
                xlib::StructureNotifyMask,
                [
                    xlib::CurrentTime as i64,
                    XEMBED_WINDOW_ACTIVATE,
                    0,
                    tray_win.0 as i64,
                    XEMBED_EMBEDDED_VERSION,
                ],
            );
            systray::draw_tray_bar(state);
        }
    }
    let Some(wa) = state.xw.get_window_attributes(Window(ev.window)) else { return };
    if wa.override_redirect != 0 {
        return;
    }
    if state.win_to_client(ev.window).is_none() {
        state.manage(Window(ev.window), &wa);
    }
}

fn motion_notify(state: &mut Gale, ev: xlib::XMotionEvent) {
    if ev.window != state.root.0 {
        return;
    }
    let m = state.rect_to_mon(ev.x_root, ev.y_root, 1, 1);
    if state.motion_mon.is_some() && Some(m) != state.motion_mon {
        if let Some(sel) = state.mons[state.selmon].sel {
            state.unfocus(sel, true);
        }
        state.selmon = m;
        state.focus(None);
    }
    state.motion_mon = Some(m);
}

fn property_notify(state: &mut Gale, ev: xlib::XPropertyEvent) {
    if config::SHOWSYSTRAY {
        if let Some(idx) = systray::win_to_icon(state, ev.window) {
            if ev.atom == xlib::XA_WM_NORMAL_HINTS {
                systray::update_icon_size_hints(state, idx);
                let (w, h) = {
                    let i = &state.systray.as_ref().unwrap().icons[idx];
                    (i.w, i.h)
                };
                systray::update_icon_geom(state, idx, w, h);
            } else {
                systray::update_icon_state(state, Window(ev.window), ev.atom);
            }
            systray::draw_tray_bar(state);
        }
    }

    if ev.window == state.root.0 && ev.atom == xlib::XA_WM_NAME {
        crate::status::update_status(state);
    } else if ev.state == xlib::PropertyDelete {
        /* ignore */
    } else if let Some(id) = state.win_to_client(ev.window) {
        match ev.atom {
            xlib::XA_WM_TRANSIENT_FOR => {
                if !state.clients[&id].isfloating {
                    let win = state.clients[&id].win;
                    let trans = state
                        .xw
                        .get_transient_for(win)
                        .and_then(|t| state.win_to_client(t.0));
                    if trans.is_some() {
                        state.clients.get_mut(&id).unwrap().isfloating = true;
                        let mon = state.clients[&id].mon;
                        state.arrange(Some(mon));
                    }
                }
            }
            xlib::XA_WM_NORMAL_HINTS => state.update_size_hints(id),
            xlib::XA_WM_HINTS => {
                state.update_wm_hints(id);
                if state.clients[&id].isurgent {
                    crate::bar::draw_bars(state);
                }
            }
            _ => {}
        }
        let net_name = state.xw.atoms.get(Atom::Net(Net::WMName));
        if ev.atom == xlib::XA_WM_NAME || ev.atom == net_name {
            state.update_title(id);
            let mon = state.clients[&id].mon;
            if state.mons[mon].sel == Some(id) {
                crate::bar::draw_bar(state, mon);
            }
        }
        if ev.atom == state.xw.atoms.get(Atom::Motif) {
            state.update_motif_hints(id);
        }
    }
}

fn resize_request(state: &mut Gale, ev: xlib::XResizeRequestEvent) {
    if let Some(idx) = systray::win_to_icon(state, ev.window) {
        systray::update_icon_geom(state, idx, ev.width, ev.height);
        systray::draw_tray_bar(state);
    }
}

fn unmap_notify(state: &mut Gale, ev: xlib::XUnmapEvent) {
    if let Some(id) = state.win_to_client(ev.window) {
        if ev.send_event != 0 {
            state.xw.set_client_state(Window(ev.window), 0); /* WithdrawnState */
        } else {
            state.unmanage(id, false);
        }
    } else if config::SHOWSYSTRAY {
        if let Some(idx) = systray::win_to_icon(state, ev.window) {
            /* sometimes icons unmap their windows without destroying them;
             * map them back */
            let win = state.systray.as_ref().unwrap().icons[idx].win;
            state.xw.map_raised(win);
            systray::draw_tray_bar(state);
        }
    }
}
