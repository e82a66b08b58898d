//! Thin facade over Xlib. Everything `unsafe` about talking to the server
//! lives here (and in `drw`); the state machine above only sees safe calls.
//!
//! There is no way to check accesses to destroyed windows, so those error
//! classes are swallowed (especially on UnmapNotify). Other errors defer to
//! Xlib's default handler, which may call exit.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_long, c_uchar, c_uint, c_ulong};
use std::ptr::null_mut;
use std::sync::atomic::{AtomicBool, Ordering};

use x11::{keysym, xinerama, xlib};

use crate::config::Palette;
use crate::error::GaleError;

/* request codes from <X11/Xproto.h> */
pub const X_SET_INPUT_FOCUS: u8 = 42;
pub const X_POLY_TEXT8: u8 = 74;
pub const X_POLY_FILL_RECTANGLE: u8 = 69;
pub const X_POLY_SEGMENT: u8 = 66;
pub const X_CONFIGURE_WINDOW: u8 = 12;
pub const X_GRAB_BUTTON: u8 = 28;
pub const X_GRAB_KEY: u8 = 33;
pub const X_COPY_AREA: u8 = 62;

/* XEmbed protocol */
pub const XEMBED_EMBEDDED_NOTIFY: i64 = 0;
pub const XEMBED_WINDOW_ACTIVATE: i64 = 1;
pub const XEMBED_WINDOW_DEACTIVATE: i64 = 2;
pub const XEMBED_MAPPED: i64 = 1 << 0;
pub const XEMBED_EMBEDDED_VERSION: i64 = 0;

pub const SYSTEM_TRAY_REQUEST_DOCK: i64 = 0;

static OTHER_WM: AtomicBool = AtomicBool::new(false);
static mut XERROR_XLIB: Option<
    unsafe extern "C" fn(*mut xlib::Display, *mut xlib::XErrorEvent) -> c_int,
> = None;

unsafe extern "C" fn xerror_dummy(_dpy: *mut xlib::Display, _ee: *mut xlib::XErrorEvent) -> c_int {
    0
}

unsafe extern "C" fn xerror_start(_dpy: *mut xlib::Display, _ee: *mut xlib::XErrorEvent) -> c_int {
    OTHER_WM.store(true, Ordering::SeqCst);
    0
}

unsafe extern "C" fn xerror(dpy: *mut xlib::Display, ee: *mut xlib::XErrorEvent) -> c_int {
    let e = &*ee;
    if e.error_code == xlib::BadWindow
        || (e.request_code == X_SET_INPUT_FOCUS && e.error_code == xlib::BadMatch)
        || (e.request_code == X_POLY_TEXT8 && e.error_code == xlib::BadDrawable)
        || (e.request_code == X_POLY_FILL_RECTANGLE && e.error_code == xlib::BadDrawable)
        || (e.request_code == X_POLY_SEGMENT && e.error_code == xlib::BadDrawable)
        || (e.request_code == X_CONFIGURE_WINDOW && e.error_code == xlib::BadMatch)
        || (e.request_code == X_GRAB_BUTTON && e.error_code == xlib::BadAccess)
        || (e.request_code == X_GRAB_KEY && e.error_code == xlib::BadAccess)
        || (e.request_code == X_COPY_AREA && e.error_code == xlib::BadDrawable)
    {
        return 0;
    }
    eprintln!(
        "gale: fatal error: request code={}, error code={}",
        e.request_code, e.error_code
    );
    log::error!(
        "fatal X error: request code={}, error code={}",
        e.request_code,
        e.error_code
    );
    match XERROR_XLIB {
        Some(handler) => handler(dpy, ee),
        None => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Window(pub xlib::Window);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorId(pub xlib::Cursor);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Net {
    Supported,
    WMName,
    WMState,
    WMCheck,
    WMFullscreen,
    ActiveWindow,
    WMWindowType,
    WMWindowTypeDock,
    WMStateSkipTaskbar,
    SystemTray,
    SystemTrayOP,
    SystemTrayOrientation,
    SystemTrayOrientationHorz,
    SystemTrayVisual,
    DesktopNames,
    DesktopViewport,
    NumberOfDesktops,
    CurrentDesktop,
    ClientList,
    ClientListStacking,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WM {
    Protocols,
    Delete,
    State,
    TakeFocus,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAtom {
    Manager,
    Xembed,
    XembedInfo,
    Last,
}

pub enum Atom {
    Net(Net),
    Wm(WM),
    X(XAtom),
    Motif,
    Utf8,
}

pub struct Atoms {
    wmatom: [xlib::Atom; WM::Last as usize],
    netatom: [xlib::Atom; Net::Last as usize],
    xatom: [xlib::Atom; XAtom::Last as usize],
    motif: xlib::Atom,
    utf8: xlib::Atom,
}

impl Atoms {
    fn new(dpy: *mut xlib::Display) -> Self {
        let intern = |name: &str| -> xlib::Atom {
            let c = CString::new(name).expect("atom name contains NUL");
            unsafe { xlib::XInternAtom(dpy, c.as_ptr(), 0) }
        };

        let mut wmatom = [0; WM::Last as usize];
        wmatom[WM::Protocols as usize] = intern("WM_PROTOCOLS");
        wmatom[WM::Delete as usize] = intern("WM_DELETE_WINDOW");
        wmatom[WM::State as usize] = intern("WM_STATE");
        wmatom[WM::TakeFocus as usize] = intern("WM_TAKE_FOCUS");

        let mut netatom = [0; Net::Last as usize];
        netatom[Net::Supported as usize] = intern("_NET_SUPPORTED");
        netatom[Net::WMName as usize] = intern("_NET_WM_NAME");
        netatom[Net::WMState as usize] = intern("_NET_WM_STATE");
        netatom[Net::WMCheck as usize] = intern("_NET_SUPPORTING_WM_CHECK");
        netatom[Net::WMFullscreen as usize] = intern("_NET_WM_STATE_FULLSCREEN");
        netatom[Net::ActiveWindow as usize] = intern("_NET_ACTIVE_WINDOW");
        netatom[Net::WMWindowType as usize] = intern("_NET_WM_WINDOW_TYPE");
        netatom[Net::WMWindowTypeDock as usize] = intern("_NET_WM_WINDOW_TYPE_DOCK");
        netatom[Net::WMStateSkipTaskbar as usize] = intern("_NET_WM_STATE_SKIP_TASKBAR");
        netatom[Net::SystemTray as usize] = intern("_NET_SYSTEM_TRAY_S0");
        netatom[Net::SystemTrayOP as usize] = intern("_NET_SYSTEM_TRAY_OPCODE");
        netatom[Net::SystemTrayOrientation as usize] = intern("_NET_SYSTEM_TRAY_ORIENTATION");
        netatom[Net::SystemTrayOrientationHorz as usize] =
            intern("_NET_SYSTEM_TRAY_ORIENTATION_HORZ");
        netatom[Net::SystemTrayVisual as usize] = intern("_NET_SYSTEM_TRAY_VISUAL");
        netatom[Net::DesktopNames as usize] = intern("_NET_DESKTOP_NAMES");
        netatom[Net::DesktopViewport as usize] = intern("_NET_DESKTOP_VIEWPORT");
        netatom[Net::NumberOfDesktops as usize] = intern("_NET_NUMBER_OF_DESKTOPS");
        netatom[Net::CurrentDesktop as usize] = intern("_NET_CURRENT_DESKTOP");
        netatom[Net::ClientList as usize] = intern("_NET_CLIENT_LIST");
        netatom[Net::ClientListStacking as usize] = intern("_NET_CLIENT_LIST_STACKING");

        let mut xatom = [0; XAtom::Last as usize];
        xatom[XAtom::Manager as usize] = intern("MANAGER");
        xatom[XAtom::Xembed as usize] = intern("_XEMBED");
        xatom[XAtom::XembedInfo as usize] = intern("_XEMBED_INFO");

        Atoms {
            wmatom,
            netatom,
            xatom,
            motif: intern("_MOTIF_WM_HINTS"),
            utf8: intern("UTF8_STRING"),
        }
    }

    pub fn get(&self, atom: Atom) -> xlib::Atom {
        match atom {
            Atom::Net(a) => self.netatom[a as usize],
            Atom::Wm(a) => self.wmatom[a as usize],
            Atom::X(a) => self.xatom[a as usize],
            Atom::Motif => self.motif,
            Atom::Utf8 => self.utf8,
        }
    }

    pub fn net_atoms(&self) -> &[xlib::Atom] {
        &self.netatom
    }
}

pub struct KeySpec {
    pub mask: u32,
    pub keysym: u32,
}

pub struct ButtonSpec {
    pub mask: u32,
    pub button: u32,
}

pub struct XWrapper {
    dpy: *mut xlib::Display,
    pub screen: c_int,
    root: xlib::Window,
    pub atoms: Atoms,
}

impl XWrapper {
    pub fn connect() -> Result<Self, GaleError> {
        unsafe {
            let dpy = xlib::XOpenDisplay(null_mut());
            if dpy.is_null() {
                return Err(GaleError::DisplayOpen);
            }
            let screen = xlib::XDefaultScreen(dpy);
            let root = xlib::XRootWindow(dpy, screen);
            let atoms = Atoms::new(dpy);
            Ok(XWrapper { dpy, screen, root, atoms })
        }
    }

    /// Raw display pointer for the drawable, which shares the connection.
    pub(crate) fn dpy(&self) -> *mut xlib::Display {
        self.dpy
    }

    pub fn root(&self) -> Window {
        Window(self.root)
    }

    pub fn screen_size(&self) -> (i32, i32) {
        unsafe {
            (
                xlib::XDisplayWidth(self.dpy, self.screen),
                xlib::XDisplayHeight(self.dpy, self.screen),
            )
        }
    }

    pub fn connection_fd(&self) -> c_int {
        unsafe { xlib::XConnectionNumber(self.dpy) }
    }

    /* ---- error handling ---- */

    /// Selecting substructure redirect fails if another WM owns it.
    pub fn check_other_wm(&self) -> Result<(), GaleError> {
        unsafe {
            OTHER_WM.store(false, Ordering::SeqCst);
            XERROR_XLIB = xlib::XSetErrorHandler(Some(xerror_start));
            xlib::XSelectInput(self.dpy, self.root, xlib::SubstructureRedirectMask);
            xlib::XSync(self.dpy, 0);
            if OTHER_WM.load(Ordering::SeqCst) {
                return Err(GaleError::OtherWmRunning);
            }
            xlib::XSetErrorHandler(Some(xerror));
            xlib::XSync(self.dpy, 0);
        }
        Ok(())
    }

    pub fn set_default_error_handler(&self) {
        unsafe {
            xlib::XSetErrorHandler(Some(xerror));
        }
    }

    pub fn set_dummy_error_handler(&self) {
        unsafe {
            xlib::XSetErrorHandler(Some(xerror_dummy));
        }
    }

    /* ---- events ---- */

    pub fn sync(&self, discard: bool) {
        unsafe {
            xlib::XSync(self.dpy, discard as c_int);
        }
    }

    pub fn next_event(&self) -> Option<xlib::XEvent> {
        unsafe {
            let mut ev: xlib::XEvent = std::mem::zeroed();
            if xlib::XNextEvent(self.dpy, &mut ev) == 0 {
                Some(ev)
            } else {
                None
            }
        }
    }

    pub fn mask_event(&self, mask: c_long) -> xlib::XEvent {
        unsafe {
            let mut ev: xlib::XEvent = std::mem::zeroed();
            xlib::XMaskEvent(self.dpy, mask, &mut ev);
            ev
        }
    }

    /// Drain all queued events matching the mask.
    pub fn drain_events(&self, mask: c_long) {
        unsafe {
            let mut ev: xlib::XEvent = std::mem::zeroed();
            while xlib::XCheckMaskEvent(self.dpy, mask, &mut ev) != 0 {}
        }
    }

    pub fn allow_events(&self, mode: c_int) {
        unsafe {
            xlib::XAllowEvents(self.dpy, mode, xlib::CurrentTime);
        }
    }

    pub fn select_input(&self, win: Window, mask: c_long) {
        unsafe {
            xlib::XSelectInput(self.dpy, win.0, mask);
        }
    }

    pub fn set_root_attributes(&self, cursor: CursorId, event_mask: c_long) {
        unsafe {
            let mut wa: xlib::XSetWindowAttributes = std::mem::zeroed();
            wa.cursor = cursor.0;
            wa.event_mask = event_mask;
            xlib::XChangeWindowAttributes(
                self.dpy,
                self.root,
                xlib::CWEventMask | xlib::CWCursor,
                &mut wa,
            );
            xlib::XSelectInput(self.dpy, self.root, event_mask);
        }
    }

    /* ---- windows ---- */

    pub fn create_simple_window(&self, parent: Window) -> Window {
        unsafe { Window(xlib::XCreateSimpleWindow(self.dpy, parent.0, 0, 0, 1, 1, 0, 0, 0)) }
    }

    /// An override-redirect InputOutput window for bars and the tray host.
    pub fn create_shell_window(
        &self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        background: c_ulong,
        parent_relative: bool,
        event_mask: c_long,
    ) -> Window {
        unsafe {
            let mut wa: xlib::XSetWindowAttributes = std::mem::zeroed();
            wa.override_redirect = 1;
            let mut valuemask = xlib::CWOverrideRedirect | xlib::CWEventMask;
            if parent_relative {
                wa.background_pixmap = xlib::ParentRelative as xlib::Pixmap;
                valuemask |= xlib::CWBackPixmap;
            } else {
                wa.background_pixel = background;
                wa.border_pixel = 0;
                valuemask |= xlib::CWBackPixel | xlib::CWBorderPixel;
            }
            wa.event_mask = event_mask;
            Window(xlib::XCreateWindow(
                self.dpy,
                self.root,
                x,
                y,
                w,
                h,
                0,
                xlib::XDefaultDepth(self.dpy, self.screen),
                xlib::CopyFromParent as c_uint,
                xlib::XDefaultVisual(self.dpy, self.screen),
                valuemask,
                &mut wa,
            ))
        }
    }

    pub fn map_window(&self, win: Window) {
        unsafe {
            xlib::XMapWindow(self.dpy, win.0);
        }
    }

    pub fn map_raised(&self, win: Window) {
        unsafe {
            xlib::XMapRaised(self.dpy, win.0);
        }
    }

    pub fn unmap_window(&self, win: Window) {
        unsafe {
            xlib::XUnmapWindow(self.dpy, win.0);
        }
    }

    pub fn destroy_window(&self, win: Window) {
        unsafe {
            xlib::XDestroyWindow(self.dpy, win.0);
        }
    }

    pub fn raise_window(&self, win: Window) {
        unsafe {
            xlib::XRaiseWindow(self.dpy, win.0);
        }
    }

    pub fn move_window(&self, win: Window, x: i32, y: i32) {
        unsafe {
            xlib::XMoveWindow(self.dpy, win.0, x, y);
        }
    }

    pub fn move_resize_window(&self, win: Window, x: i32, y: i32, w: u32, h: u32) {
        unsafe {
            xlib::XMoveResizeWindow(self.dpy, win.0, x, y, w.max(1), h.max(1));
        }
    }

    pub fn configure_window(&self, win: Window, x: i32, y: i32, w: i32, h: i32, bw: i32) {
        unsafe {
            let mut wc: xlib::XWindowChanges = std::mem::zeroed();
            wc.x = x;
            wc.y = y;
            wc.width = w;
            wc.height = h;
            wc.border_width = bw;
            let mask = xlib::CWX | xlib::CWY | xlib::CWWidth | xlib::CWHeight | xlib::CWBorderWidth;
            xlib::XConfigureWindow(self.dpy, win.0, mask as c_uint, &mut wc);
        }
    }

    pub fn set_border_width(&self, win: Window, bw: i32) {
        unsafe {
            let mut wc: xlib::XWindowChanges = std::mem::zeroed();
            wc.border_width = bw;
            xlib::XConfigureWindow(self.dpy, win.0, xlib::CWBorderWidth as c_uint, &mut wc);
        }
    }

    /// Forward a configure request for a window we do not manage.
    pub fn configure_pass_through(&self, ev: &xlib::XConfigureRequestEvent) {
        unsafe {
            let mut wc: xlib::XWindowChanges = std::mem::zeroed();
            wc.x = ev.x;
            wc.y = ev.y;
            wc.width = ev.width;
            wc.height = ev.height;
            wc.border_width = ev.border_width;
            wc.sibling = ev.above;
            wc.stack_mode = ev.detail;
            xlib::XConfigureWindow(self.dpy, ev.window, ev.value_mask as c_uint, &mut wc);
        }
    }

    /// Stack tiled windows below the bar, preserving list order.
    pub fn stack_below(&self, sibling: Window, windows: &[Window]) {
        unsafe {
            let mut wc: xlib::XWindowChanges = std::mem::zeroed();
            wc.stack_mode = xlib::Below;
            wc.sibling = sibling.0;
            for win in windows {
                xlib::XConfigureWindow(
                    self.dpy,
                    win.0,
                    (xlib::CWSibling | xlib::CWStackMode) as c_uint,
                    &mut wc,
                );
                wc.sibling = win.0;
            }
        }
    }

    /// Synthetic ConfigureNotify telling a client its actual geometry.
    pub fn send_configure(&self, win: Window, x: i32, y: i32, w: i32, h: i32, bw: i32) {
        unsafe {
            let mut ce: xlib::XConfigureEvent = std::mem::zeroed();
            ce.type_ = xlib::ConfigureNotify;
            ce.display = self.dpy;
            ce.event = win.0;
            ce.window = win.0;
            ce.x = x;
            ce.y = y;
            ce.width = w;
            ce.height = h;
            ce.border_width = bw;
            ce.above = 0;
            ce.override_redirect = 0;
            let mut ev = xlib::XEvent { configure: ce };
            xlib::XSendEvent(self.dpy, win.0, 0, xlib::StructureNotifyMask, &mut ev);
        }
    }

    pub fn get_window_attributes(&self, win: Window) -> Option<xlib::XWindowAttributes> {
        unsafe {
            let mut wa: xlib::XWindowAttributes = std::mem::zeroed();
            if xlib::XGetWindowAttributes(self.dpy, win.0, &mut wa) != 0 {
                Some(wa)
            } else {
                None
            }
        }
    }

    pub fn query_tree(&self, win: Window) -> Vec<Window> {
        unsafe {
            let mut root_ret: xlib::Window = 0;
            let mut parent_ret: xlib::Window = 0;
            let mut children: *mut xlib::Window = null_mut();
            let mut n: c_uint = 0;
            if xlib::XQueryTree(self.dpy, win.0, &mut root_ret, &mut parent_ret, &mut children, &mut n)
                == 0
            {
                return Vec::new();
            }
            let wins = if n > 0 && !children.is_null() {
                std::slice::from_raw_parts(children, n as usize)
                    .iter()
                    .map(|&w| Window(w))
                    .collect()
            } else {
                Vec::new()
            };
            if !children.is_null() {
                xlib::XFree(children as *mut _);
            }
            wins
        }
    }

    pub fn reparent_window(&self, win: Window, parent: Window) {
        unsafe {
            xlib::XReparentWindow(self.dpy, win.0, parent.0, 0, 0);
        }
    }

    pub fn add_to_save_set(&self, win: Window) {
        unsafe {
            xlib::XAddToSaveSet(self.dpy, win.0);
        }
    }

    pub fn set_class_hint(&self, win: Window, name: &str) {
        unsafe {
            let cname = CString::new(name).unwrap();
            let mut ch = xlib::XClassHint {
                res_name: cname.as_ptr() as *mut c_char,
                res_class: cname.as_ptr() as *mut c_char,
            };
            xlib::XSetClassHint(self.dpy, win.0, &mut ch);
        }
    }

    pub fn set_window_border(&self, win: Window, pixel: c_ulong) {
        unsafe {
            xlib::XSetWindowBorder(self.dpy, win.0, pixel);
        }
    }

    pub fn set_window_background(&self, win: Window, pixel: c_ulong) {
        unsafe {
            let mut wa: xlib::XSetWindowAttributes = std::mem::zeroed();
            wa.background_pixel = pixel;
            xlib::XChangeWindowAttributes(self.dpy, win.0, xlib::CWBackPixel, &mut wa);
        }
    }

    /* ---- properties ---- */

    pub fn change_property_u32(
        &self,
        win: Window,
        prop: xlib::Atom,
        ty: xlib::Atom,
        mode: c_int,
        data: &[c_long],
    ) {
        unsafe {
            xlib::XChangeProperty(
                self.dpy,
                win.0,
                prop,
                ty,
                32,
                mode,
                data.as_ptr() as *const c_uchar,
                data.len() as c_int,
            );
        }
    }

    pub fn replace_cardinals(&self, win: Window, prop: xlib::Atom, data: &[c_long]) {
        self.change_property_u32(win, prop, xlib::XA_CARDINAL, xlib::PropModeReplace, data);
    }

    pub fn replace_window_prop(&self, win: Window, prop: xlib::Atom, value: Window) {
        self.change_property_u32(
            win,
            prop,
            xlib::XA_WINDOW,
            xlib::PropModeReplace,
            &[value.0 as c_long],
        );
    }

    pub fn append_window_prop(&self, win: Window, prop: xlib::Atom, value: Window) {
        self.change_property_u32(
            win,
            prop,
            xlib::XA_WINDOW,
            xlib::PropModeAppend,
            &[value.0 as c_long],
        );
    }

    pub fn replace_atoms(&self, win: Window, prop: xlib::Atom, atoms: &[xlib::Atom]) {
        unsafe {
            xlib::XChangeProperty(
                self.dpy,
                win.0,
                prop,
                xlib::XA_ATOM,
                32,
                xlib::PropModeReplace,
                atoms.as_ptr() as *const c_uchar,
                atoms.len() as c_int,
            );
        }
    }

    pub fn replace_utf8_prop(&self, win: Window, prop: xlib::Atom, value: &str) {
        unsafe {
            xlib::XChangeProperty(
                self.dpy,
                win.0,
                prop,
                self.atoms.get(Atom::Utf8),
                8,
                xlib::PropModeReplace,
                value.as_ptr(),
                value.len() as c_int,
            );
        }
    }

    pub fn delete_property(&self, win: Window, prop: xlib::Atom) {
        unsafe {
            xlib::XDeleteProperty(self.dpy, win.0, prop);
        }
    }

    /// Publish the tag names as `_NET_DESKTOP_NAMES`.
    pub fn set_desktop_names(&self, names: &[&str]) {
        unsafe {
            let cstrings: Vec<CString> =
                names.iter().map(|n| CString::new(*n).unwrap()).collect();
            let mut ptrs: Vec<*mut c_char> =
                cstrings.iter().map(|c| c.as_ptr() as *mut c_char).collect();
            let mut text: xlib::XTextProperty = std::mem::zeroed();
            if xlib::Xutf8TextListToTextProperty(
                self.dpy,
                ptrs.as_mut_ptr(),
                ptrs.len() as c_int,
                xlib::XUTF8StringStyle,
                &mut text,
            ) == 0
            {
                xlib::XSetTextProperty(
                    self.dpy,
                    self.root,
                    &mut text,
                    self.atoms.get(Atom::Net(Net::DesktopNames)),
                );
                xlib::XFree(text.value as *mut _);
            }
        }
    }

    /// Decode a text property, preferring the locale-aware list conversion.
    pub fn get_text_prop(&self, win: Window, atom: xlib::Atom) -> Option<String> {
        unsafe {
            let mut name: xlib::XTextProperty = std::mem::zeroed();
            if xlib::XGetTextProperty(self.dpy, win.0, &mut name, atom) == 0 || name.nitems == 0 {
                return None;
            }
            let text = if name.encoding == xlib::XA_STRING {
                let s = CStr::from_ptr(name.value as *const c_char)
                    .to_string_lossy()
                    .into_owned();
                Some(s)
            } else {
                let mut list: *mut *mut c_char = null_mut();
                let mut n: c_int = 0;
                let mut out = None;
                if xlib::Xutf8TextPropertyToTextList(self.dpy, &mut name, &mut list, &mut n)
                    >= xlib::Success as c_int
                    && n > 0
                    && !list.is_null()
                    && !(*list).is_null()
                {
                    out = Some(CStr::from_ptr(*list).to_string_lossy().into_owned());
                    xlib::XFreeStringList(list);
                }
                out
            };
            xlib::XFree(name.value as *mut _);
            text
        }
    }

    pub fn get_atom_prop(&self, win: Window, prop: xlib::Atom) -> xlib::Atom {
        unsafe {
            let mut da: xlib::Atom = 0;
            let mut di: c_int = 0;
            let mut nitems: c_ulong = 0;
            let mut bytes_after: c_ulong = 0;
            let mut p: *mut c_uchar = null_mut();
            let mut atom: xlib::Atom = 0;
            if xlib::XGetWindowProperty(
                self.dpy,
                win.0,
                prop,
                0,
                std::mem::size_of::<xlib::Atom>() as c_long,
                0,
                xlib::XA_ATOM,
                &mut da,
                &mut di,
                &mut nitems,
                &mut bytes_after,
                &mut p,
            ) == xlib::Success as c_int
                && !p.is_null()
            {
                if nitems > 0 {
                    atom = *(p as *const xlib::Atom);
                }
                xlib::XFree(p as *mut _);
            }
            atom
        }
    }

    /// `_XEMBED_INFO` is (version, flags); the flags word drives icon
    /// mapped state.
    pub fn get_xembed_flags(&self, win: Window) -> Option<c_ulong> {
        unsafe {
            let info = self.atoms.get(Atom::X(XAtom::XembedInfo));
            let mut da: xlib::Atom = 0;
            let mut di: c_int = 0;
            let mut nitems: c_ulong = 0;
            let mut bytes_after: c_ulong = 0;
            let mut p: *mut c_uchar = null_mut();
            let mut flags = None;
            if xlib::XGetWindowProperty(
                self.dpy,
                win.0,
                info,
                0,
                2,
                0,
                info,
                &mut da,
                &mut di,
                &mut nitems,
                &mut bytes_after,
                &mut p,
            ) == xlib::Success as c_int
                && !p.is_null()
            {
                if nitems == 2 {
                    flags = Some(*(p as *const c_ulong).add(1));
                }
                xlib::XFree(p as *mut _);
            }
            flags
        }
    }

    /// The raw `_MOTIF_WM_HINTS` words, if set.
    pub fn get_motif_hints(&self, win: Window) -> Option<[c_ulong; 5]> {
        unsafe {
            let motif = self.atoms.get(Atom::Motif);
            let mut da: xlib::Atom = 0;
            let mut di: c_int = 0;
            let mut nitems: c_ulong = 0;
            let mut bytes_after: c_ulong = 0;
            let mut p: *mut c_uchar = null_mut();
            let mut out = None;
            if xlib::XGetWindowProperty(
                self.dpy,
                win.0,
                motif,
                0,
                5,
                0,
                motif,
                &mut da,
                &mut di,
                &mut nitems,
                &mut bytes_after,
                &mut p,
            ) == xlib::Success as c_int
                && !p.is_null()
            {
                if nitems >= 5 {
                    let words = std::slice::from_raw_parts(p as *const c_ulong, 5);
                    out = Some([words[0], words[1], words[2], words[3], words[4]]);
                }
                xlib::XFree(p as *mut _);
            }
            out
        }
    }

    pub fn get_atom_name(&self, atom: xlib::Atom) -> Option<String> {
        if atom == 0 {
            return None;
        }
        unsafe {
            let p = xlib::XGetAtomName(self.dpy, atom);
            if p.is_null() {
                return None;
            }
            let s = CStr::from_ptr(p).to_string_lossy().into_owned();
            xlib::XFree(p as *mut _);
            Some(s)
        }
    }

    /// `WM_STATE` value, -1 if unset.
    pub fn get_wm_state(&self, win: Window) -> c_long {
        unsafe {
            let wm_state = self.atoms.get(Atom::Wm(WM::State));
            let mut real: xlib::Atom = 0;
            let mut format: c_int = 0;
            let mut n: c_ulong = 0;
            let mut extra: c_ulong = 0;
            let mut p: *mut c_uchar = null_mut();
            let mut result: c_long = -1;
            if xlib::XGetWindowProperty(
                self.dpy,
                win.0,
                wm_state,
                0,
                2,
                0,
                wm_state,
                &mut real,
                &mut format,
                &mut n,
                &mut extra,
                &mut p,
            ) != xlib::Success as c_int
            {
                return -1;
            }
            if !p.is_null() {
                if n != 0 {
                    result = *p as c_long;
                }
                xlib::XFree(p as *mut _);
            }
            result
        }
    }

    pub fn set_client_state(&self, win: Window, state: c_long) {
        let wm_state = self.atoms.get(Atom::Wm(WM::State));
        self.change_property_u32(win, wm_state, wm_state, xlib::PropModeReplace, &[state, 0]);
    }

    pub fn get_class_hint(&self, win: Window) -> (String, String) {
        unsafe {
            let mut ch = xlib::XClassHint {
                res_name: null_mut(),
                res_class: null_mut(),
            };
            let mut instance = String::new();
            let mut class = String::new();
            if xlib::XGetClassHint(self.dpy, win.0, &mut ch) != 0 {
                if !ch.res_name.is_null() {
                    instance = CStr::from_ptr(ch.res_name).to_string_lossy().into_owned();
                    xlib::XFree(ch.res_name as *mut _);
                }
                if !ch.res_class.is_null() {
                    class = CStr::from_ptr(ch.res_class).to_string_lossy().into_owned();
                    xlib::XFree(ch.res_class as *mut _);
                }
            }
            (instance, class)
        }
    }

    pub fn get_transient_for(&self, win: Window) -> Option<Window> {
        unsafe {
            let mut trans: xlib::Window = 0;
            if xlib::XGetTransientForHint(self.dpy, win.0, &mut trans) != 0 && trans != 0 {
                Some(Window(trans))
            } else {
                None
            }
        }
    }

    pub fn get_wm_normal_hints(&self, win: Window) -> Option<xlib::XSizeHints> {
        unsafe {
            let mut hints: xlib::XSizeHints = std::mem::zeroed();
            let mut supplied: c_long = 0;
            if xlib::XGetWMNormalHints(self.dpy, win.0, &mut hints, &mut supplied) != 0 {
                Some(hints)
            } else {
                None
            }
        }
    }

    pub fn get_wm_hints(&self, win: Window) -> Option<(bool, Option<bool>)> {
        unsafe {
            let wmh = xlib::XGetWMHints(self.dpy, win.0);
            if wmh.is_null() {
                return None;
            }
            let flags = (*wmh).flags;
            let urgent = flags & xlib::XUrgencyHint != 0;
            let input = if flags & xlib::InputHint != 0 {
                Some((*wmh).input != 0)
            } else {
                None
            };
            xlib::XFree(wmh as *mut _);
            Some((urgent, input))
        }
    }

    /// Clear the urgency bit in place (done when a client gains focus).
    pub fn clear_urgency_hint(&self, win: Window) {
        unsafe {
            let wmh = xlib::XGetWMHints(self.dpy, win.0);
            if wmh.is_null() {
                return;
            }
            (*wmh).flags &= !xlib::XUrgencyHint;
            xlib::XSetWMHints(self.dpy, win.0, wmh);
            xlib::XFree(wmh as *mut _);
        }
    }

    pub fn set_urgency_hint(&self, win: Window, urgent: bool) {
        unsafe {
            let wmh = xlib::XGetWMHints(self.dpy, win.0);
            if wmh.is_null() {
                return;
            }
            if urgent {
                (*wmh).flags |= xlib::XUrgencyHint;
            } else {
                (*wmh).flags &= !xlib::XUrgencyHint;
            }
            xlib::XSetWMHints(self.dpy, win.0, wmh);
            xlib::XFree(wmh as *mut _);
        }
    }

    /// `_NET_WM_PID`, the portable part of pid discovery.
    pub fn get_net_wm_pid(&self, win: Window) -> libc::pid_t {
        unsafe {
            let prop = {
                let c = CString::new("_NET_WM_PID").unwrap();
                xlib::XInternAtom(self.dpy, c.as_ptr(), 0)
            };
            let mut ty: xlib::Atom = 0;
            let mut format: c_int = 0;
            let mut len: c_ulong = 0;
            let mut bytes: c_ulong = 0;
            let mut p: *mut c_uchar = null_mut();
            let mut pid: libc::pid_t = 0;
            if xlib::XGetWindowProperty(
                self.dpy,
                win.0,
                prop,
                0,
                1,
                0,
                xlib::AnyPropertyType as xlib::Atom,
                &mut ty,
                &mut format,
                &mut len,
                &mut bytes,
                &mut p,
            ) == xlib::Success as c_int
                && !p.is_null()
            {
                if len > 0 {
                    pid = *(p as *const u32) as libc::pid_t;
                }
                xlib::XFree(p as *mut _);
            }
            pid
        }
    }

    /* ---- protocols ---- */

    /// Send a client message. For the two WM protocols the window's
    /// protocol list is consulted first; any other message type is sent
    /// unconditionally.
    pub fn send_event(
        &self,
        win: Window,
        proto: xlib::Atom,
        mask: c_long,
        d: [c_long; 5],
    ) -> bool {
        unsafe {
            let take_focus = self.atoms.get(Atom::Wm(WM::TakeFocus));
            let delete = self.atoms.get(Atom::Wm(WM::Delete));
            let mut exists = false;
            let mt;
            if proto == take_focus || proto == delete {
                mt = self.atoms.get(Atom::Wm(WM::Protocols));
                let mut protocols: *mut xlib::Atom = null_mut();
                let mut n: c_int = 0;
                if xlib::XGetWMProtocols(self.dpy, win.0, &mut protocols, &mut n) != 0 {
                    exists = std::slice::from_raw_parts(protocols, n as usize).contains(&proto);
                    xlib::XFree(protocols as *mut _);
                }
            } else {
                exists = true;
                mt = proto;
            }
            if exists {
                let mut ev: xlib::XEvent = std::mem::zeroed();
                ev.client_message.type_ = xlib::ClientMessage;
                ev.client_message.window = win.0;
                ev.client_message.message_type = mt;
                ev.client_message.format = 32;
                for (i, v) in d.iter().enumerate() {
                    ev.client_message.data.set_long(i, *v);
                }
                xlib::XSendEvent(self.dpy, win.0, 0, mask, &mut ev);
            }
            exists
        }
    }

    pub fn set_input_focus(&self, win: Window) {
        unsafe {
            xlib::XSetInputFocus(self.dpy, win.0, xlib::RevertToPointerRoot, xlib::CurrentTime);
        }
    }

    pub fn kill_client_brutally(&self, win: Window) {
        unsafe {
            xlib::XGrabServer(self.dpy);
            xlib::XSetErrorHandler(Some(xerror_dummy));
            xlib::XSetCloseDownMode(self.dpy, xlib::DestroyAll);
            xlib::XKillClient(self.dpy, win.0);
            xlib::XSync(self.dpy, 0);
            xlib::XSetErrorHandler(Some(xerror));
            xlib::XUngrabServer(self.dpy);
        }
    }

    pub fn grab_server(&self) {
        unsafe {
            xlib::XGrabServer(self.dpy);
        }
    }

    pub fn ungrab_server(&self) {
        unsafe {
            xlib::XUngrabServer(self.dpy);
        }
    }

    /* ---- selections ---- */

    pub fn set_selection_owner(&self, selection: xlib::Atom, owner: Window) {
        unsafe {
            xlib::XSetSelectionOwner(self.dpy, selection, owner.0, xlib::CurrentTime);
        }
    }

    pub fn get_selection_owner(&self, selection: xlib::Atom) -> Window {
        unsafe { Window(xlib::XGetSelectionOwner(self.dpy, selection)) }
    }

    /* ---- input ---- */

    pub fn numlock_mask(&self) -> u32 {
        unsafe {
            let mut mask = 0;
            let modmap = xlib::XGetModifierMapping(self.dpy);
            if modmap.is_null() {
                return 0;
            }
            let max = (*modmap).max_keypermod;
            for i in 0..8 {
                for j in 0..max {
                    let code = *(*modmap).modifiermap.offset((i * max + j) as isize);
                    if code != 0
                        && code
                            == xlib::XKeysymToKeycode(self.dpy, keysym::XK_Num_Lock as c_ulong)
                    {
                        mask = 1 << i;
                    }
                }
            }
            xlib::XFreeModifiermap(modmap);
            mask
        }
    }

    pub fn clean_mask(&self, numlockmask: u32, mask: u32) -> u32 {
        mask & !(numlockmask | xlib::LockMask)
            & (xlib::ShiftMask
                | xlib::ControlMask
                | xlib::Mod1Mask
                | xlib::Mod2Mask
                | xlib::Mod3Mask
                | xlib::Mod4Mask
                | xlib::Mod5Mask)
    }

    pub fn grab_keys(&self, numlockmask: u32, keys: &[KeySpec]) {
        unsafe {
            xlib::XUngrabKey(self.dpy, xlib::AnyKey, xlib::AnyModifier, self.root);
            let modifiers = [0, xlib::LockMask, numlockmask, numlockmask | xlib::LockMask];
            for key in keys {
                let code = xlib::XKeysymToKeycode(self.dpy, key.keysym as c_ulong);
                if code == 0 {
                    continue;
                }
                for m in modifiers {
                    xlib::XGrabKey(
                        self.dpy,
                        code as c_int,
                        key.mask | m,
                        self.root,
                        1,
                        xlib::GrabModeAsync,
                        xlib::GrabModeAsync,
                    );
                }
            }
        }
    }

    pub fn ungrab_keys(&self) {
        unsafe {
            xlib::XUngrabKey(self.dpy, xlib::AnyKey, xlib::AnyModifier, self.root);
        }
    }

    const BUTTONMASK: c_long = xlib::ButtonPressMask | xlib::ButtonReleaseMask;

    /// Focused clients get only the configured chords; unfocused clients
    /// additionally get a synchronous any-button grab so the first click can
    /// focus and then be replayed.
    pub fn grab_buttons(&self, win: Window, numlockmask: u32, focused: bool, specs: &[ButtonSpec]) {
        unsafe {
            xlib::XUngrabButton(self.dpy, xlib::AnyButton as c_uint, xlib::AnyModifier, win.0);
            if !focused {
                xlib::XGrabButton(
                    self.dpy,
                    xlib::AnyButton as c_uint,
                    xlib::AnyModifier,
                    win.0,
                    0,
                    Self::BUTTONMASK as c_uint,
                    xlib::GrabModeSync,
                    xlib::GrabModeSync,
                    0,
                    0,
                );
            }
            let modifiers = [0, xlib::LockMask, numlockmask, numlockmask | xlib::LockMask];
            for spec in specs {
                for m in modifiers {
                    xlib::XGrabButton(
                        self.dpy,
                        spec.button,
                        spec.mask | m,
                        win.0,
                        0,
                        Self::BUTTONMASK as c_uint,
                        xlib::GrabModeAsync,
                        xlib::GrabModeSync,
                        0,
                        0,
                    );
                }
            }
        }
    }

    pub fn ungrab_buttons(&self, win: Window) {
        unsafe {
            xlib::XUngrabButton(self.dpy, xlib::AnyButton as c_uint, xlib::AnyModifier, win.0);
        }
    }

    pub fn grab_pointer(&self, cursor: CursorId) -> bool {
        unsafe {
            xlib::XGrabPointer(
                self.dpy,
                self.root,
                0,
                (Self::BUTTONMASK | xlib::PointerMotionMask) as c_uint,
                xlib::GrabModeAsync,
                xlib::GrabModeAsync,
                0,
                cursor.0,
                xlib::CurrentTime,
            ) == xlib::GrabSuccess
        }
    }

    pub fn ungrab_pointer(&self) {
        unsafe {
            xlib::XUngrabPointer(self.dpy, xlib::CurrentTime);
        }
    }

    pub fn warp_pointer(&self, win: Window, x: i32, y: i32) {
        unsafe {
            xlib::XWarpPointer(self.dpy, 0, win.0, 0, 0, 0, 0, x, y);
        }
    }

    pub fn root_pointer(&self) -> Option<(i32, i32)> {
        unsafe {
            let mut dummy: xlib::Window = 0;
            let mut x = 0;
            let mut y = 0;
            let mut di = 0;
            let mut dui = 0;
            if xlib::XQueryPointer(
                self.dpy,
                self.root,
                &mut dummy,
                &mut dummy,
                &mut x,
                &mut y,
                &mut di,
                &mut di,
                &mut dui,
            ) != 0
            {
                Some((x, y))
            } else {
                None
            }
        }
    }

    pub fn keycode_to_keysym(&self, keycode: c_uint) -> u32 {
        unsafe { xlib::XKeycodeToKeysym(self.dpy, keycode as xlib::KeyCode, 0) as u32 }
    }

    pub fn refresh_keyboard_mapping(&self, ev: &mut xlib::XMappingEvent) {
        unsafe {
            xlib::XRefreshKeyboardMapping(ev);
        }
    }

    pub fn create_font_cursor(&self, shape: c_uint) -> CursorId {
        unsafe { CursorId(xlib::XCreateFontCursor(self.dpy, shape)) }
    }

    pub fn define_cursor(&self, win: Window, cursor: CursorId) {
        unsafe {
            xlib::XDefineCursor(self.dpy, win.0, cursor.0);
        }
    }

    pub fn free_cursor(&self, cursor: CursorId) {
        unsafe {
            xlib::XFreeCursor(self.dpy, cursor.0);
        }
    }

    /* ---- screens ---- */

    /// Unique Xinerama screen geometries, sorted top-to-bottom then
    /// left-to-right. Empty when the extension is inactive.
    pub fn xinerama_screens(&self) -> Vec<(i32, i32, i32, i32)> {
        unsafe {
            if xinerama::XineramaIsActive(self.dpy) == 0 {
                return Vec::new();
            }
            let mut n: c_int = 0;
            let info = xinerama::XineramaQueryScreens(self.dpy, &mut n);
            if info.is_null() {
                return Vec::new();
            }
            let screens = std::slice::from_raw_parts(info, n as usize);
            let mut unique: Vec<(i32, i32, i32, i32)> = Vec::new();
            for s in screens {
                let geom = (
                    s.x_org as i32,
                    s.y_org as i32,
                    s.width as i32,
                    s.height as i32,
                );
                if !unique.contains(&geom) {
                    unique.push(geom);
                }
            }
            xlib::XFree(info as *mut _);
            unique.sort_by_key(|&(x, y, _, _)| (y, x));
            unique
        }
    }

    /* ---- resources ---- */

    /// Merge `RESOURCE_MANAGER` color overrides into the palette. Only
    /// 7-character `#`-hex values are accepted.
    pub fn load_xrdb(&self, palette: &mut Palette) {
        unsafe {
            let resm = xlib::XResourceManagerString(self.dpy);
            if resm.is_null() {
                return;
            }
            let db = xlib::XrmGetStringDatabase(resm);
            if db.is_null() {
                return;
            }

            let mut load = |key: &str, slot: &mut String| {
                let ckey = CString::new(key).unwrap();
                let mut ty: *mut c_char = null_mut();
                let mut value: xlib::XrmValue = std::mem::zeroed();
                if xlib::XrmGetResource(db, ckey.as_ptr(), null_mut(), &mut ty, &mut value) != 0
                    && !value.addr.is_null()
                {
                    let s = CStr::from_ptr(value.addr as *const c_char).to_string_lossy();
                    if s.len() == 7
                        && s.starts_with('#')
                        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
                    {
                        *slot = s.into_owned();
                    }
                }
            };

            load("foreground", &mut palette.foreground);
            load("background", &mut palette.background);
            load("accent", &mut palette.accent);
            load("secondary", &mut palette.secondary);
            load("border", &mut palette.border);
            for i in 0..16 {
                let key = format!("color{}", i);
                let mut slot = palette.termcolors[i].clone();
                load(&key, &mut slot);
                palette.termcolors[i] = slot;
            }

            xlib::XrmDestroyDatabase(db);
        }
    }
}

impl Drop for XWrapper {
    fn drop(&mut self) {
        unsafe {
            xlib::XCloseDisplay(self.dpy);
        }
    }
}
