use std::fmt;

/// Startup failure modes. Runtime X errors never travel through `Result`;
/// they go to the Xlib error handler installed in `xwrapper`.
#[derive(Debug)]
pub enum GaleError {
    DisplayOpen,
    OtherWmRunning,
    NoFonts,
}

impl fmt::Display for GaleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GaleError::DisplayOpen => write!(f, "cannot open display"),
            GaleError::OtherWmRunning => {
                write!(f, "another window manager is already running")
            }
            GaleError::NoFonts => write!(f, "no fonts could be loaded"),
        }
    }
}

impl std::error::Error for GaleError {}

/// Print a diagnostic and exit. Reserved for conditions the process cannot
/// continue from (startup conflicts, allocation-grade failures).
pub fn die(msg: &str) -> ! {
    eprintln!("gale: {}", msg);
    std::process::exit(1);
}
