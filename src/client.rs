use crate::monitor::Monitor;
use crate::xwrapper::Window;

/// Stable handle into the client arena. Handles are never reused within a
/// session, so a stale id simply fails the map lookup instead of aliasing a
/// newer client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

#[derive(Debug, Clone)]
pub struct Client {
    pub win: Window,
    pub pid: libc::pid_t,
    pub name: String,
    pub mina: f32,
    pub maxa: f32,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub oldx: i32,
    pub oldy: i32,
    pub oldw: i32,
    pub oldh: i32,
    pub basew: i32,
    pub baseh: i32,
    pub incw: i32,
    pub inch: i32,
    pub maxw: i32,
    pub maxh: i32,
    pub minw: i32,
    pub minh: i32,
    pub bw: i32,
    pub oldbw: i32,
    pub tags: u32,
    pub isfixed: bool,
    pub isfloating: bool,
    pub isurgent: bool,
    pub neverfocus: bool,
    /// Floating state saved while fullscreen.
    pub oldstate: bool,
    pub isfullscreen: bool,
    pub ignoresizehints: bool,
    pub beingmoved: bool,
    pub isterminal: bool,
    pub noswallow: bool,
    /// The displaced child client while this terminal is swallowed by it.
    /// The record lives only here; it is out of both shared lists.
    pub swallowing: Option<Box<Client>>,
    /// Owning monitor, an index into the monitor vector.
    pub mon: usize,
}

impl Client {
    pub fn new(win: Window, x: i32, y: i32, w: i32, h: i32, oldbw: i32) -> Self {
        Client {
            win,
            pid: 0,
            name: String::new(),
            mina: 0.0,
            maxa: 0.0,
            x,
            y,
            w,
            h,
            oldx: x,
            oldy: y,
            oldw: w,
            oldh: h,
            basew: 0,
            baseh: 0,
            incw: 0,
            inch: 0,
            maxw: 0,
            maxh: 0,
            minw: 0,
            minh: 0,
            bw: 0,
            oldbw,
            tags: 0,
            isfixed: false,
            isfloating: false,
            isurgent: false,
            neverfocus: false,
            oldstate: false,
            isfullscreen: false,
            ignoresizehints: false,
            beingmoved: false,
            isterminal: false,
            noswallow: false,
            swallowing: None,
            mon: 0,
        }
    }

    /// Full frame width, border included.
    pub fn width(&self) -> i32 {
        self.w + 2 * self.bw
    }

    /// Full frame height, border included.
    pub fn height(&self) -> i32 {
        self.h + 2 * self.bw
    }

    /// A client shows on whichever monitor currently displays one of its
    /// tags. Ownership (`mon`) is tracked separately; the tag partition
    /// invariant keeps the two consistent.
    pub fn is_visible_on(&self, m: &Monitor) -> bool {
        self.tags & m.tagset[m.seltags] != 0
    }

    /// Overlap area with an arbitrary rectangle, for pointer-based lookups.
    pub fn intersect_area(&self, x: i32, y: i32, w: i32, h: i32) -> i32 {
        std::cmp::max(0, std::cmp::min(x + w, self.x + self.w) - std::cmp::max(x, self.x))
            * std::cmp::max(0, std::cmp::min(y + h, self.y + self.h) - std::cmp::max(y, self.y))
    }
}

/// The shared client list. Every monitor iterates this one structure;
/// `order` is attach order (most recently attached first) and `stack` is
/// focus order (most recently focused first). Each managed client appears in
/// both exactly once.
#[derive(Debug, Default)]
pub struct ClientList {
    pub order: Vec<ClientId>,
    pub stack: Vec<ClientId>,
}

impl ClientList {
    pub fn attach(&mut self, id: ClientId) {
        self.order.insert(0, id);
    }

    pub fn attach_stack(&mut self, id: ClientId) {
        self.stack.insert(0, id);
    }

    pub fn detach(&mut self, id: ClientId) {
        self.order.retain(|&c| c != id);
    }

    pub fn detach_stack(&mut self, id: ClientId) {
        self.stack.retain(|&c| c != id);
    }
}
