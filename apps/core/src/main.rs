use clap::Parser;

fn main() {
    let cli = tcode_helper_core::runtime::Cli::parse();

    if let Err(error) = tcode_helper_core::runtime::run(cli) {
        tcode_helper_core::runtime::report_fatal(&error);
        std::process::exit(1);
    }
}
