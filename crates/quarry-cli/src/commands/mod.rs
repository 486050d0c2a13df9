pub mod aggregate;
pub mod build;
pub mod dump;
pub mod emit;
pub mod input;

#[cfg(test)]
mod test_utils;

use std::fmt::Display;

/// Report `msg` and exit with status 1.
pub fn fail(msg: impl Display) -> ! {
    eprintln!("error: {}", msg);
    std::process::exit(1);
}
