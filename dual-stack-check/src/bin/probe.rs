use dual_stack_check::{
    cmdline,
    probe::{self, Family, TIMEOUT},
};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let matches = cmdline::register_probe_args().get_matches();
    let port = *matches.get_one::<u16>("port").unwrap_or(&8080);

    let mut failed = false;
    for family in [Family::V4, Family::V6] {
        let (ok, line) = probe::check(family, port, TIMEOUT);
        println!("{}", line);
        failed |= !ok;
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
