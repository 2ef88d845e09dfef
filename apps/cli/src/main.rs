//! # Pricewise
//!
//! ```text
//! pricewise compare "Rice 5kg:1400:5:kg" "Rice 2kg:650:2:kg"
//! pricewise --format json compare "Widget:1000:1:piece:10%" "Widget:1050:1:piece"
//! pricewise validate "Soap:2.50:3:pcs" "Soap:4:6:pcs"
//! pricewise units
//! ```

use clap::Parser;
use pricewise_cli::cli::Cli;
use std::process::ExitCode;
use std::time::Duration;

/// Grace period for blocking-pool work (a history read that outlived its
/// timeout) before the process exits anyway.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

fn main() -> ExitCode {
    let cli = Cli::parse();
    pricewise_cli::init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start async runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let outcome = runtime.block_on(pricewise_cli::run(cli));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    match outcome {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            if let Some(hint) = err.hint() {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(err.exit_code())
        }
    }
}
