use std::process;

mod cli;
mod logging;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let parsed = match cli::parse_args(&args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("error: {err}");
            cli::print_help();
            process::exit(2);
        }
    };
    if parsed.help {
        cli::print_help();
        return;
    }

    let _log_level_state = logging::setup_tracing(parsed.log_level);
    tracing::info!("edgesplit starting");

    if let Err(err) = cli::run(&parsed) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
