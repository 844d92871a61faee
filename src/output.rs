//! User-facing console lines.
//!
//! The move report ("Rename ...", "Move ...", "Remove empty directory ...")
//! goes to stdout unprefixed through [`print_user`] so it can be piped or
//! diffed between a simulated and a real run. Status messages carry a
//! colored prefix when the stream is a TTY.

use owo_colors::OwoColorize;

fn stdout_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn stderr_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

pub fn print_info(msg: &str) {
    if stdout_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {msg}");
    }
}

pub fn print_warn(msg: &str) {
    if stderr_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {msg}");
    }
}

pub fn print_error(msg: &str) {
    if stderr_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {msg}");
    }
}

pub fn print_success(msg: &str) {
    if stdout_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {msg}");
    }
}

/// A plain report line, no prefix.
pub fn print_user(msg: &str) {
    println!("{msg}");
}
