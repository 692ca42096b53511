//! Small shared helpers: terminal setup and local-time conversion.

use std::fs::File;
use std::io::Write;
use std::os::fd::AsRawFd;

use anyhow::Result;
use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use termios::os::linux::ECHOCTL;
use termios::{TCSANOW, Termios, tcsetattr};

/// RAII guard that tidies the controlling terminal for long-running output.
///
/// On construction it disables `ECHOCTL` (so ^C does not smear the log block)
/// and hides the cursor; on drop it restores the saved terminal attributes
/// and shows the cursor again. When there is no controlling terminal, for
/// example under a service manager, every step is a no-op.
pub struct TerminalGuard {
    tty: Option<(File, Termios)>,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        let tty = match File::options().read(true).write(true).open("/dev/tty") {
            Ok(tty) => tty,
            // Headless; nothing to manage
            Err(_) => return Ok(Self { tty: None }),
        };

        let fd = tty.as_raw_fd();
        let saved = Termios::from_fd(fd)?;

        let mut raw = saved;
        raw.c_lflag &= !ECHOCTL;
        tcsetattr(fd, TCSANOW, &raw)?;

        let mut tty = tty;
        let _ = tty.write_all(b"\x1b[?25l");
        let _ = tty.flush();

        Ok(Self {
            tty: Some((tty, saved)),
        })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Some((tty, saved)) = self.tty.as_mut() {
            let _ = tty.write_all(b"\x1b[?25h");
            let _ = tty.flush();
            let _ = tcsetattr(tty.as_raw_fd(), TCSANOW, saved);
        }
    }
}

/// Interpret a local wall-clock date and time as a UTC instant.
///
/// DST transitions make local wall-clock times ambiguous or nonexistent. An
/// ambiguous time resolves to its earlier occurrence; a nonexistent time
/// (spring-forward gap) is interpreted as if local time were UTC, which keeps
/// the result within the intended evening rather than failing.
pub fn utc_from_local(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}
