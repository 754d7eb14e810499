#![allow(non_snake_case)]

use DiffCon::cli::cli_main::run;

pub fn main() {
    //
    run();
}
