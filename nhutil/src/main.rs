use clap::Parser;
use std::process::ExitCode;

use nhutil::{logging, App, Args, Failure};

#[tokio::main]
async fn main() -> ExitCode {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    println!("Nokia Health API util");

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => {
            // --help / --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let failure = Failure::Arguments(e.to_string());
            eprintln!("{}", failure);
            return failure.exit_code();
        }
    };

    let _log_guard = match logging::init_logging(args.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    match App::new(args).run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            tracing::error!(exit_code = failure.code(), "{}", failure);
            eprintln!("{}", failure);
            failure.exit_code()
        }
    }
}
