//! Process ancestry for terminal swallowing. A window's pid comes from its
//! `_NET_WM_PID` property; ancestry is walked through `/proc/<pid>/stat`.

use std::fs;

/// Parent pid of `p`, or 0 when it cannot be determined.
pub fn parent_process(p: libc::pid_t) -> libc::pid_t {
    if p <= 0 {
        return 0;
    }
    let stat = match fs::read_to_string(format!("/proc/{}/stat", p)) {
        Ok(s) => s,
        Err(_) => return 0,
    };
    // field 4, after the parenthesized (and possibly space-laden) comm
    let after_comm = match stat.rfind(')') {
        Some(i) => &stat[i + 1..],
        None => return 0,
    };
    after_comm
        .split_whitespace()
        .nth(1)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Walk `c` up to init; the result is `c`'s ancestor that equals `p`, or 0.
/// Callers treat any non-zero value as "is a descendant".
pub fn is_descendant(p: libc::pid_t, mut c: libc::pid_t) -> libc::pid_t {
    while p != c && c != 0 {
        c = parent_process(c);
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_process_chain_reaches_pid_one_or_zero() {
        let me = unsafe { libc::getpid() };
        // every process is its own descendant
        assert_eq!(is_descendant(me, me), me);
        // the parent chain terminates
        let mut p = me;
        for _ in 0..128 {
            let next = parent_process(p);
            if next == 0 || next == 1 {
                return;
            }
            p = next;
        }
        panic!("parent chain did not terminate");
    }

    #[test]
    fn unrelated_pid_is_not_a_descendant() {
        // pid 1 is never a descendant of this test process
        let me = unsafe { libc::getpid() };
        assert_eq!(is_descendant(me, 1), 0);
    }

    #[test]
    fn bogus_pids_yield_zero() {
        assert_eq!(parent_process(0), 0);
        assert_eq!(parent_process(-5), 0);
    }
}
