use std::process::ExitCode;

fn main() -> ExitCode {
    lagobot_cli::run()
}
