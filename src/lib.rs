//! Library for async communication with the Arista EOS command API over
//! its local unix socket, plus the brief interface report built on top.
//!
//! ## Examples
//! ```no_run
//! use intbrief::*;
//!
//! // create the client
//! let client = Client::for_unix_socket(DEFAULT_SOCKET);
//!
//! // we can run raw commands
//! async fn show_version(client: &Client) -> Result<()> {
//!     let mut connection = client.connect().await?;
//!
//!     let result = connection
//!         .run_cmds(&["show version".to_owned()], ResponseFormat::Json)
//!         .await?;
//!     println!("{}", result[0]);
//!     Ok(())
//! }
//!
//! // or produce the whole report
//! async fn report(client: &Client) -> Result<()> {
//!     let mut connection = client.connect().await?;
//!
//!     let filter = regex::RegexBuilder::new("sflow")
//!         .case_insensitive(true)
//!         .build()
//!         .unwrap();
//!     let mut stdout = std::io::stdout();
//!     Reporter::new(&mut connection, filter).run(&mut stdout).await
//! }
//! ```
//!
//! ## Compatibility
//! Expects `management api http-commands` with `protocol unix-socket`
//! enabled on the switch.

mod client;
pub use client::*;

mod connection;
pub use connection::*;

mod error;
pub use error::*;

mod protocol;
pub use protocol::*;

mod models;
pub use models::*;

mod report;
pub use report::*;
