//! Quartermaster binary entry point.

use quartermaster::cli;
use quartermaster::ui::output;

#[tokio::main]
async fn main() {
    if let Err(err) = cli::run().await {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
