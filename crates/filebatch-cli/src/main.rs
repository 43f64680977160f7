use std::process;

fn main() {
    process::exit(filebatch_cli::run());
}
