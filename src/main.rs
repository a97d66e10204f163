use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use regex::RegexBuilder;

use intbrief::{Client, Reporter, DEFAULT_SOCKET};

#[derive(Parser)]
#[command(
    name = "intbrief",
    version,
    about = "Brief one-line-per-interface status report over the EOS command API"
)]
struct Cli {
    /// Case-insensitive regex matched against interface name and description
    pattern: Option<String>,

    /// Path of the command API unix socket
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SOCKET)]
    socket: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let pattern = cli.pattern.as_deref().unwrap_or(".*");
    let filter = match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(filter) => filter,
        Err(err) => {
            eprintln!("invalid pattern '{}': {}", pattern, err);
            exit(2);
        }
    };

    let client = Client::for_unix_socket(&cli.socket);
    let mut connection = match client.connect().await {
        Ok(connection) => connection,
        Err(err) => {
            log::error!("failed to connect to {}: {}", cli.socket.display(), err);
            exit(1);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = Reporter::new(&mut connection, filter).run(&mut out).await {
        log::error!("report failed: {}", err);
        exit(1);
    }
}
