use once_cell::sync::Lazy;
use std::path::PathBuf;
use x11::{keysym, xlib};

use crate::actions::{Action, ButtonBinding, Clk, KeyBinding};
use crate::bar::{BarAlign, BarModule, BarMon, BarRule};
use crate::layouts::{Layout, LayoutKind};
use crate::rules::Rule;

/* appearance */
pub const BORDERPX: i32 = 2;
pub const SNAP: i32 = 32;
pub const SHOWBAR: bool = true;
pub const TOPBAR: bool = true;
pub const STATUSSEP: char = ';';
pub const HORIZPADBAR: i32 = 2;
pub const VERTPADBAR: i32 = 10;
pub const SYSTRAYSPACING: i32 = 2;
pub const SHOWSYSTRAY: bool = true;

pub const GAPPIH: i32 = 20;
pub const GAPPIV: i32 = 20;
pub const GAPPOH: i32 = 10;
pub const GAPPOV: i32 = 30;
/// Gap multiplier applied when a monitor holds a single tile.
pub const SMARTGAPS: i32 = 3;

pub const FLOATPOSGRID_X: i32 = 5;
pub const FLOATPOSGRID_Y: i32 = 5;

pub const FONTS: [&str; 1] = ["monospace:size=10"];

pub const MFACT: f32 = 0.55;
pub const NMASTER: i32 = 1;
pub const RESIZEHINTS: bool = false;
pub const LOCKFULLSCREEN: bool = true;
pub const DECORHINTS: bool = true;
/// nrowgrid: two clients always split vertically.
pub const FORCE_VSPLIT: bool = true;

pub const STATUSBAR: &str = "dwmblocks";
pub const SWALLOWFLOATING: bool = false;

/* tagging */
pub const TAGS: [&str; 9] = ["一", "二", "三", "四", "五", "六", "七", "八", "九"];

pub struct Scratchpad {
    pub name: &'static str,
    pub cmd: &'static [&'static str],
}

pub const SCRATCHPADS: [Scratchpad; 1] = [Scratchpad {
    name: "kitty-sp",
    cmd: &["kitty", "--class", "kitty-sp"],
}];

pub const NUMTAGS: usize = TAGS.len() + SCRATCHPADS.len();
pub const TAGMASK: u32 = (1 << NUMTAGS) - 1;
#[allow(non_snake_case)]
pub const fn SPTAG(i: usize) -> u32 {
    (1 << TAGS.len()) << i
}
pub const SPTAGMASK: u32 = ((1 << SCRATCHPADS.len()) - 1) << TAGS.len();

// all tags must fit into the bit array next to the scratchpad bits
const _: () = assert!(TAGS.len() <= 31);

pub const RULES: [Rule; 9] = [
    /* xprop(1):
     *  WM_CLASS(STRING) = instance, class
     *  WM_NAME(STRING) = title
     */
    // not flagged isterminal: the scratchpad should never swallow
    Rule {
        instance: Some("kitty-sp"),
        tags: SPTAG(0),
        isfloating: true,
        matchonce: true,
        floatpos: Some("50% 50% 90% 80%"),
        ..Rule::DEFAULT
    },
    Rule {
        wtype: Some("_NET_WM_WINDOW_TYPE_DIALOG"),
        isfloating: true,
        ..Rule::DEFAULT
    },
    Rule {
        wtype: Some("_NET_WM_WINDOW_TYPE_UTILITY"),
        isfloating: true,
        ..Rule::DEFAULT
    },
    Rule {
        wtype: Some("_NET_WM_WINDOW_TYPE_TOOLBAR"),
        isfloating: true,
        ..Rule::DEFAULT
    },
    Rule {
        wtype: Some("_NET_WM_WINDOW_TYPE_SPLASH"),
        isfloating: true,
        ..Rule::DEFAULT
    },
    Rule {
        class: Some("feh"),
        tags: 0,
        ..Rule::DEFAULT
    },
    Rule {
        title: Some("Discord Updater"),
        tags: 1 << 4,
        isfloating: true,
        matchonce: true,
        floatpos: Some("50% 50%"),
        ..Rule::DEFAULT
    },
    Rule {
        class: Some("discord"),
        tags: 1 << 4,
        ..Rule::DEFAULT
    },
    Rule {
        class: Some("lutris"),
        isfloating: true,
        ..Rule::DEFAULT
    },
];

/* layout(s) */
pub static LAYOUTS: [Layout; 14] = [
    Layout { symbol: "[]=", arrange: Some(LayoutKind::Tile) }, /* first entry is default */
    Layout { symbol: "><>", arrange: None }, /* no layout function means floating behavior */
    Layout { symbol: "[M]", arrange: Some(LayoutKind::Monocle) },
    Layout { symbol: "D[]", arrange: Some(LayoutKind::Deck) },
    Layout { symbol: "[@]", arrange: Some(LayoutKind::Spiral) },
    Layout { symbol: "[\\]", arrange: Some(LayoutKind::Dwindle) },
    Layout { symbol: "TTT", arrange: Some(LayoutKind::BStack) },
    Layout { symbol: "===", arrange: Some(LayoutKind::BStackHoriz) },
    Layout { symbol: "HHH", arrange: Some(LayoutKind::Grid) },
    Layout { symbol: "###", arrange: Some(LayoutKind::NRowGrid) },
    Layout { symbol: "---", arrange: Some(LayoutKind::HorizGrid) },
    Layout { symbol: ":::", arrange: Some(LayoutKind::GaplessGrid) },
    Layout { symbol: "|M|", arrange: Some(LayoutKind::CenteredMaster) },
    Layout { symbol: ">M>", arrange: Some(LayoutKind::CenteredFloatingMaster) },
];

pub struct MonitorRule {
    pub monitor: i32,
    pub layout: usize,
    pub mfact: f32,
    pub nmaster: i32,
    pub showbar: i32,
    pub tagset: u32,
}

pub const MONRULES: [MonitorRule; 3] = [
    /* monitor layout  mfact  nmaster  showbar  tagset */
    MonitorRule { monitor: 1, layout: 2, mfact: -1.0, nmaster: -1, showbar: -1, tagset: 1 << 5 },
    MonitorRule { monitor: 2, layout: 0, mfact: -1.0, nmaster: -1, showbar: -1, tagset: 1 << 4 },
    MonitorRule { monitor: -1, layout: 0, mfact: -1.0, nmaster: -1, showbar: -1, tagset: 0 },
];

/* bar modules, composed per bar in table order */
pub const BARRULES: [BarRule; 5] = [
    BarRule { monitor: BarMon::All, bar: 0, align: BarAlign::Left, module: BarModule::Tags, name: "tags" },
    BarRule { monitor: BarMon::All, bar: 0, align: BarAlign::Left, module: BarModule::LtSymbol, name: "layout" },
    BarRule { monitor: BarMon::All, bar: 0, align: BarAlign::Right, module: BarModule::Status2d, name: "status2d" },
    BarRule { monitor: BarMon::Index(0), bar: 0, align: BarAlign::Right, module: BarModule::Systray, name: "systray" },
    BarRule { monitor: BarMon::All, bar: 0, align: BarAlign::None, module: BarModule::WinTitle, name: "wintitle" },
];

/* colors, overridable through the resource database */
#[derive(Debug, Clone)]
pub struct Palette {
    pub foreground: String,
    pub background: String,
    pub accent: String,
    pub secondary: String,
    pub border: String,
    pub termcolors: [String; 16],
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            foreground: "#222222".into(),
            background: "#444444".into(),
            accent: "#bbbbbb".into(),
            secondary: "#eeeeee".into(),
            border: "#eeeeee".into(),
            termcolors: [
                "#000000".into(),
                "#ff0000".into(),
                "#33ff00".into(),
                "#ff0099".into(),
                "#0066ff".into(),
                "#cc00ff".into(),
                "#00ffff".into(),
                "#d0d0d0".into(),
                "#808080".into(),
                "#ff0000".into(),
                "#33ff00".into(),
                "#ff0099".into(),
                "#0066ff".into(),
                "#cc00ff".into(),
                "#00ffff".into(),
                "#ffffff".into(),
            ],
        }
    }
}

impl Palette {
    /// fg, bg, border per scheme. The urgent scheme reuses the normal
    /// colors; urgency shows through tag inversion on the bar.
    pub fn scheme(&self, idx: usize) -> [&str; 3] {
        match idx {
            1 => [&self.background, &self.accent, &self.accent],
            _ => [&self.foreground, &self.background, &self.border],
        }
    }
}

pub static DATA_PATH: Lazy<PathBuf> = Lazy::new(|| {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("gale")
});

pub static LOG_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_PATH.join("gale.log"));

/* key definitions */
pub const MODKEY: u32 = xlib::Mod4Mask;
pub const ALTKEY: u32 = xlib::Mod1Mask;

/// Sentinel encoding for stack positions: `INC(k)` moves relative to the
/// current selection, `PREVSEL` jumps to the previously focused client.
pub const fn inc(k: i32) -> i32 {
    k + 2000
}
pub const PREVSEL: i32 = 3000;

pub const KILLCMD: &[&str] = &["/bin/sh", "-c", "xdotool getwindowfocus windowkill"];

pub fn keys() -> Vec<KeyBinding> {
    let mut keys = vec![
        KeyBinding { mask: MODKEY, keysym: keysym::XK_b, action: Action::ToggleBar },
        /* focus/push stack */
        KeyBinding { mask: MODKEY, keysym: keysym::XK_j, action: Action::FocusStack(inc(1)) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_k, action: Action::FocusStack(inc(-1)) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_Tab, action: Action::FocusStack(PREVSEL) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_a, action: Action::FocusStack(0) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_s, action: Action::FocusStack(1) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_d, action: Action::FocusStack(2) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_g, action: Action::FocusStack(-1) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_j, action: Action::PushStack(inc(1)) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_k, action: Action::PushStack(inc(-1)) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_Tab, action: Action::PushStack(PREVSEL) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_a, action: Action::PushStack(0) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_s, action: Action::PushStack(1) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_d, action: Action::PushStack(2) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_g, action: Action::PushStack(-1) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_i, action: Action::IncNMaster(1) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_u, action: Action::IncNMaster(-1) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_h, action: Action::SetMFact(-0.05) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_l, action: Action::SetMFact(0.05) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_Return, action: Action::Zoom },
        KeyBinding { mask: ALTKEY, keysym: keysym::XK_Tab, action: Action::View(0) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_c, action: Action::KillClient },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_c, action: Action::Spawn(KILLCMD) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_t, action: Action::SetLayout(Some(0)) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_f, action: Action::SetLayout(Some(1)) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_m, action: Action::SetLayout(Some(2)) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_semicolon, action: Action::SetLayout(Some(3)) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_space, action: Action::SetLayout(None) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_space, action: Action::ToggleFloating },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_f, action: Action::ToggleFullscreen },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_backslash, action: Action::ToggleScratch(0) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_0, action: Action::View(!0) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_0, action: Action::Tag(!0) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_comma, action: Action::FocusMon(-1) },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_period, action: Action::FocusMon(1) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_comma, action: Action::TagMon(-1) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_period, action: Action::TagMon(1) },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_q, action: Action::Quit },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_F5, action: Action::Xrdb },
        /* nudge or size floating clients from the keypad */
        KeyBinding { mask: MODKEY, keysym: keysym::XK_KP_Home, action: Action::FloatPos("-26a -26a") },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_KP_Up, action: Action::FloatPos("  0a -26a") },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_KP_Page_Up, action: Action::FloatPos(" 26a -26a") },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_KP_Left, action: Action::FloatPos("-26a   0a") },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_KP_Right, action: Action::FloatPos(" 26a   0a") },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_KP_End, action: Action::FloatPos("-26a  26a") },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_KP_Down, action: Action::FloatPos("  0a  26a") },
        KeyBinding { mask: MODKEY, keysym: keysym::XK_KP_Page_Down, action: Action::FloatPos(" 26a  26a") },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_KP_Home, action: Action::FloatPos("-26w -26h") },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_KP_Up, action: Action::FloatPos("  0w -26h") },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_KP_Page_Up, action: Action::FloatPos(" 26w -26h") },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_KP_Left, action: Action::FloatPos("-26w   0h") },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_KP_Begin, action: Action::FloatPos(" 50% 50% 90%  80%") },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_KP_Right, action: Action::FloatPos(" 26w   0h") },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_KP_End, action: Action::FloatPos("-26w  26h") },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_KP_Down, action: Action::FloatPos("  0w  26h") },
        KeyBinding { mask: MODKEY | xlib::ShiftMask, keysym: keysym::XK_KP_Page_Down, action: Action::FloatPos(" 26w  26h") },
    ];

    for i in 0..TAGS.len() as u32 {
        let key = keysym::XK_1 + i;
        keys.push(KeyBinding { mask: MODKEY, keysym: key, action: Action::View(1 << i) });
        keys.push(KeyBinding {
            mask: MODKEY | xlib::ControlMask,
            keysym: key,
            action: Action::ToggleView(1 << i),
        });
        keys.push(KeyBinding {
            mask: MODKEY | xlib::ShiftMask,
            keysym: key,
            action: Action::Tag(1 << i),
        });
        keys.push(KeyBinding {
            mask: MODKEY | xlib::ControlMask | xlib::ShiftMask,
            keysym: key,
            action: Action::ToggleTag(1 << i),
        });
        keys.push(KeyBinding {
            mask: MODKEY | ALTKEY,
            keysym: key,
            action: Action::FocusOrView(1 << i),
        });
    }

    keys
}

pub fn buttons() -> Vec<ButtonBinding> {
    vec![
        ButtonBinding { click: Clk::LtSymbol, mask: 0, button: 1, action: Action::SetLayout(None) },
        ButtonBinding { click: Clk::LtSymbol, mask: 0, button: 3, action: Action::SetLayout(Some(2)) },
        ButtonBinding { click: Clk::WinTitle, mask: 0, button: 2, action: Action::Zoom },
        ButtonBinding { click: Clk::StatusText, mask: 0, button: 1, action: Action::SigStatus(1) },
        ButtonBinding { click: Clk::StatusText, mask: 0, button: 2, action: Action::SigStatus(2) },
        ButtonBinding { click: Clk::StatusText, mask: 0, button: 3, action: Action::SigStatus(3) },
        ButtonBinding { click: Clk::StatusText, mask: 0, button: 4, action: Action::SigStatus(4) },
        ButtonBinding { click: Clk::StatusText, mask: 0, button: 5, action: Action::SigStatus(5) },
        /* placemouse mode 2: the pointer warps to the window center */
        ButtonBinding { click: Clk::ClientWin, mask: MODKEY, button: 1, action: Action::MoveOrPlace(2) },
        ButtonBinding { click: Clk::ClientWin, mask: MODKEY, button: 2, action: Action::ToggleFloating },
        ButtonBinding { click: Clk::ClientWin, mask: MODKEY, button: 3, action: Action::ResizeMouse },
        ButtonBinding { click: Clk::TagBar, mask: 0, button: 1, action: Action::View(0) },
        ButtonBinding { click: Clk::TagBar, mask: 0, button: 3, action: Action::ToggleView(0) },
        ButtonBinding { click: Clk::TagBar, mask: MODKEY, button: 1, action: Action::Tag(0) },
        ButtonBinding { click: Clk::TagBar, mask: MODKEY, button: 3, action: Action::ToggleTag(0) },
    ]
}
