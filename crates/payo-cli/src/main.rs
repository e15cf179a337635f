// Payo CLI Entry Point

use payo_cli::{output, router::CommandRouter};

#[tokio::main]
async fn main() {
    // Route and execute command
    let result = CommandRouter::route().await;

    // Exit with appropriate code
    if let Err(e) = result {
        output::print_error(&e.user_message());
        tracing::debug!("{}", e.technical_details());
        std::process::exit(1);
    }
}
