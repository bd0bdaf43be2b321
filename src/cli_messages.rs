//! Console output for the one-shot commands (`export`, `config`) and the
//! headless session.

const YELLOW: &str = "\x1b[1;33m";
const BRIGHT_RED: &str = "\x1b[1;91m";
const RED: &str = "\x1b[1;31m";
const GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

fn print_tagged(color: &str, tag: &str, title: &str, details: &str) {
    if details.is_empty() {
        println!("{color}[{tag}]{RESET} {title}");
    } else {
        println!("{color}[{tag}]{RESET} {title}\t {details}");
    }
}

pub fn print_info(title: &str, details: &str) {
    print_tagged(YELLOW, "INFO", title, details);
}

pub fn print_warn(title: &str, details: &str) {
    print_tagged(BRIGHT_RED, "WARN", title, details);
}

/// Errors go to stderr so scripted exports can tell them apart.
pub fn print_error(title: &str, details: Option<&str>) {
    eprintln!("{RED}[ERROR]{RESET} {title}");
    if let Some(details) = details {
        eprintln!("{RED}[ERROR]{RESET} Details: {details}");
    }
}

pub fn print_success(title: &str, details: &str) {
    print_tagged(GREEN, "SUCCESS", title, details);
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_warn($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, None)
    };
    ($title:expr, $details:expr) => {
        $crate::cli_messages::print_error($title, Some($details))
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}
