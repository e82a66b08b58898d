//! Offscreen drawing surface for the bars: a root-depth pixmap, an Xft font
//! set and the color schemes. Bars render here and blit.

use std::ffi::CString;
use std::os::raw::{c_int, c_uint, c_ulong};
use std::ptr::null_mut;

use x11::{xft, xlib};

use crate::config::Palette;
use crate::error::die;

pub type Clr = xft::XftColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Norm,
    Sel,
    Urg,
}

pub const COL_FG: usize = 0;
pub const COL_BG: usize = 1;
pub const COL_BORDER: usize = 2;

pub struct Fnt {
    dpy: *mut xlib::Display,
    pub h: c_uint,
    pub xfont: *mut xft::XftFont,
}

impl Drop for Fnt {
    fn drop(&mut self) {
        unsafe {
            if !self.xfont.is_null() {
                xft::XftFontClose(self.dpy, self.xfont);
            }
        }
    }
}

pub struct Drw {
    dpy: *mut xlib::Display,
    screen: c_int,
    root: xlib::Window,
    w: c_uint,
    h: c_uint,
    drawable: xlib::Drawable,
    gc: xlib::GC,
    xftdraw: *mut xft::XftDraw,
    pub fonts: Vec<Fnt>,
    schemes: Vec<[Clr; 3]>,
}

impl Drw {
    pub fn create(dpy: *mut xlib::Display, screen: c_int, root: xlib::Window, w: u32, h: u32) -> Self {
        unsafe {
            let drawable =
                xlib::XCreatePixmap(dpy, root, w, h, xlib::XDefaultDepth(dpy, screen) as c_uint);
            let gc = xlib::XCreateGC(dpy, root, 0, null_mut());
            xlib::XSetLineAttributes(dpy, gc, 1, xlib::LineSolid, xlib::CapButt, xlib::JoinMiter);
            let xftdraw = xft::XftDrawCreate(
                dpy,
                drawable,
                xlib::XDefaultVisual(dpy, screen),
                xlib::XDefaultColormap(dpy, screen),
            );
            if xftdraw.is_null() {
                die("cannot create drawing context");
            }
            Drw {
                dpy,
                screen,
                root,
                w,
                h,
                drawable,
                gc,
                xftdraw,
                fonts: Vec::new(),
                schemes: Vec::new(),
            }
        }
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        unsafe {
            if w == self.w && h == self.h {
                return;
            }
            self.w = w;
            self.h = h;
            xft::XftDrawDestroy(self.xftdraw);
            xlib::XFreePixmap(self.dpy, self.drawable);
            self.drawable = xlib::XCreatePixmap(
                self.dpy,
                self.root,
                w,
                h,
                xlib::XDefaultDepth(self.dpy, self.screen) as c_uint,
            );
            self.xftdraw = xft::XftDrawCreate(
                self.dpy,
                self.drawable,
                xlib::XDefaultVisual(self.dpy, self.screen),
                xlib::XDefaultColormap(self.dpy, self.screen),
            );
        }
    }

    pub fn fontset_create(&mut self, font_names: &[&str]) -> bool {
        // initializing fontconfig is cheap when already done
        let _fc = fontconfig::Fontconfig::new();
        for name in font_names {
            self.xfont_create(name);
        }
        !self.fonts.is_empty()
    }

    fn xfont_create(&mut self, name: &str) {
        unsafe {
            let cstr = match CString::new(name) {
                Ok(s) => s,
                Err(_) => {
                    eprintln!("error, invalid font name '{}': contains NUL", name);
                    return;
                }
            };
            let xfont = xft::XftFontOpenName(self.dpy, self.screen, cstr.as_ptr());
            if xfont.is_null() {
                eprintln!("error, cannot load font from name: '{}'", name);
                return;
            }
            let h = ((*xfont).ascent + (*xfont).descent) as c_uint;
            self.fonts.push(Fnt { dpy: self.dpy, h, xfont });
        }
    }

    pub fn font_height(&self) -> u32 {
        self.fonts.first().map_or(0, |f| f.h)
    }

    fn alloc_color(&self, name: &str) -> Clr {
        unsafe {
            let cstr = CString::new(name).expect("color name contains NUL");
            let mut clr: Clr = std::mem::zeroed();
            if xft::XftColorAllocName(
                self.dpy,
                xlib::XDefaultVisual(self.dpy, self.screen),
                xlib::XDefaultColormap(self.dpy, self.screen),
                cstr.as_ptr(),
                &mut clr,
            ) == 0
            {
                die(&format!("cannot allocate color '{}'", name));
            }
            clr
        }
    }

    /// (Re)build the schemes from the palette. Called at startup and again
    /// after an X-resource reload.
    pub fn create_schemes(&mut self, palette: &Palette) {
        unsafe {
            for scheme in self.schemes.drain(..) {
                for mut clr in scheme {
                    xft::XftColorFree(
                        self.dpy,
                        xlib::XDefaultVisual(self.dpy, self.screen),
                        xlib::XDefaultColormap(self.dpy, self.screen),
                        &mut clr,
                    );
                }
            }
        }
        for idx in 0..3 {
            let names = palette.scheme(idx);
            self.schemes.push([
                self.alloc_color(names[COL_FG]),
                self.alloc_color(names[COL_BG]),
                self.alloc_color(names[COL_BORDER]),
            ]);
        }
    }

    pub fn scheme_pixel(&self, scheme: Scheme, col: usize) -> c_ulong {
        self.schemes[scheme as usize][col].pixel
    }

    pub fn text_width(&self, text: &str) -> u32 {
        if self.fonts.is_empty() || text.is_empty() {
            return 0;
        }
        unsafe {
            let mut ext = std::mem::zeroed();
            xft::XftTextExtentsUtf8(
                self.dpy,
                self.fonts[0].xfont,
                text.as_ptr(),
                text.len() as c_int,
                &mut ext,
            );
            ext.xOff as u32
        }
    }

    pub fn rect(&mut self, scheme: Scheme, x: i32, y: i32, w: u32, h: u32, filled: bool, invert: bool) {
        if self.schemes.is_empty() {
            return;
        }
        unsafe {
            let col = if invert { COL_BG } else { COL_FG };
            xlib::XSetForeground(self.dpy, self.gc, self.schemes[scheme as usize][col].pixel);
            if filled {
                xlib::XFillRectangle(self.dpy, self.drawable, self.gc, x, y, w, h);
            } else {
                xlib::XDrawRectangle(
                    self.dpy,
                    self.drawable,
                    self.gc,
                    x,
                    y,
                    w.saturating_sub(1),
                    h.saturating_sub(1),
                );
            }
        }
    }

    /// Fill the background and draw vertically centered text. Returns the x
    /// coordinate just past the drawn area.
    pub fn text(
        &mut self,
        scheme: Scheme,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        lpad: u32,
        text: &str,
        invert: bool,
    ) -> i32 {
        if self.fonts.is_empty() {
            return x;
        }
        unsafe {
            let (fg, bg) = if invert { (COL_BG, COL_FG) } else { (COL_FG, COL_BG) };
            xlib::XSetForeground(self.dpy, self.gc, self.schemes[scheme as usize][bg].pixel);
            xlib::XFillRectangle(self.dpy, self.drawable, self.gc, x, y, w, h);
            if !text.is_empty() {
                let font = &self.fonts[0];
                let fh = ((*font.xfont).ascent + (*font.xfont).descent) as i32;
                let ty = y + (h as i32 - fh) / 2 + (*font.xfont).ascent;
                xft::XftDrawStringUtf8(
                    self.xftdraw,
                    &mut self.schemes[scheme as usize][fg],
                    font.xfont,
                    x + lpad as i32,
                    ty,
                    text.as_ptr(),
                    text.len() as c_int,
                );
            }
        }
        x + w as i32
    }

    /// Draw text with an explicitly allocated foreground/background, used by
    /// the status color-escape language.
    pub fn text_colored(&mut self, fg: &str, bg: &str, x: i32, y: i32, w: u32, h: u32, text: &str) {
        if self.fonts.is_empty() {
            return;
        }
        unsafe {
            let mut bgclr = self.alloc_color(bg);
            let mut fgclr = self.alloc_color(fg);
            xlib::XSetForeground(self.dpy, self.gc, bgclr.pixel);
            xlib::XFillRectangle(self.dpy, self.drawable, self.gc, x, y, w, h);
            if !text.is_empty() {
                let font = &self.fonts[0];
                let fh = ((*font.xfont).ascent + (*font.xfont).descent) as i32;
                let ty = y + (h as i32 - fh) / 2 + (*font.xfont).ascent;
                xft::XftDrawStringUtf8(
                    self.xftdraw,
                    &mut fgclr,
                    font.xfont,
                    x,
                    ty,
                    text.as_ptr(),
                    text.len() as c_int,
                );
            }
            let visual = xlib::XDefaultVisual(self.dpy, self.screen);
            let cmap = xlib::XDefaultColormap(self.dpy, self.screen);
            xft::XftColorFree(self.dpy, visual, cmap, &mut fgclr);
            xft::XftColorFree(self.dpy, visual, cmap, &mut bgclr);
        }
    }

    pub fn map(&self, win: xlib::Window, x: i32, y: i32, w: u32, h: u32) {
        unsafe {
            xlib::XCopyArea(self.dpy, self.drawable, win, self.gc, x, y, w, h, x, y);
            xlib::XSync(self.dpy, 0);
        }
    }
}

impl Drop for Drw {
    fn drop(&mut self) {
        unsafe {
            if !self.xftdraw.is_null() {
                xft::XftDrawDestroy(self.xftdraw);
            }
            xlib::XFreePixmap(self.dpy, self.drawable);
            xlib::XFreeGC(self.dpy, self.gc);
        }
    }
}
