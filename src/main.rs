//! items-api entry point
//!
//! All startup logic lives in `boot::run`. Startup failures are printed to
//! stderr and exit with status 1.

use items_api::boot;

fn main() {
    if let Err(e) = boot::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
