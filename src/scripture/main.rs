//! The `scripture` binary. All behavior lives in `cli/`; this file only starts
//! the runtime, calls `cli::run()` and turns an error into exit code 1.

mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
