use std::ffi::CString;
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::panic;

use simplelog::{CombinedLogger, Config, LevelFilter, WriteLogger};
use x11::xlib;

mod actions;
mod bar;
mod client;
mod config;
mod drw;
mod error;
mod events;
mod floatpos;
mod layouts;
mod monitor;
mod rules;
mod state;
mod status;
mod swallow;
mod systray;
mod xwrapper;

use config::{DATA_PATH, LOG_PATH};
use error::die;
use state::Gale;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reap children as they exit so spawned programs never zombify.
unsafe extern "C" fn sigchld(_: libc::c_int) {
    let handler = sigchld as unsafe extern "C" fn(libc::c_int);
    if libc::signal(libc::SIGCHLD, handler as libc::sighandler_t) == libc::SIG_ERR {
        die("can't install SIGCHLD handler");
    }
    while libc::waitpid(-1, std::ptr::null_mut(), libc::WNOHANG) > 0 {}
}

/// Panics under X tend to vanish with the session; append them to the log
/// file as well as stderr.
fn setup_panic_hook() {
    let log_path = LOG_PATH.clone();
    panic::set_hook(Box::new(move |info| {
        let msg = if let Some(s) = info.payload().downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown payload".to_string()
        };
        let location = info
            .location()
            .map(|l| format!(" at {}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| " at unknown location".to_string());
        let full = format!("PANIC: {}{}", msg, location);
        eprintln!("{}", full);
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] [ERROR] {}", timestamp, full);
            let _ = file.flush();
        }
    }));
}

fn setup_logger() {
    if let Err(e) = create_dir_all(&*DATA_PATH) {
        eprintln!("gale: failed to create log directory: {}", e);
    }
    match File::create(&*LOG_PATH) {
        Ok(file) => {
            let _ = CombinedLogger::init(vec![WriteLogger::new(
                LevelFilter::Info,
                Config::default(),
                file,
            )]);
        }
        Err(e) => eprintln!("gale: failed to create log file: {}", e),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() == 2 && args[1] == "-v" {
        die(&format!("gale-{}", VERSION));
    } else if args.len() != 1 {
        die("usage: gale [-v]");
    }

    setup_logger();
    setup_panic_hook();

    unsafe {
        let empty = CString::new("").unwrap();
        if libc::setlocale(libc::LC_CTYPE, empty.as_ptr()).is_null()
            || xlib::XSupportsLocale() == 0
        {
            eprintln!("warning: no locale support");
        }
        xlib::XrmInitialize();
        sigchld(0);
    }

    log::info!("starting gale-{}", VERSION);
    match Gale::new() {
        Ok(mut gale) => {
            gale.scan();
            gale.run();
            gale.cleanup();
        }
        Err(e) => die(&e.to_string()),
    }
}
