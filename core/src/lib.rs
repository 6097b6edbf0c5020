//! Synchronous client for the Rocket.Chat REST API.
//!
//! # Overview
//! Log in to a [`Server`] to get a [`Session`], list the public rooms, then
//! join, leave or post to a [`Room`]. Every call is one blocking HTTP
//! round-trip; nothing is cached, retried or refreshed.
//!
//! ```no_run
//! use rocketchat_core::Server;
//!
//! # fn example() -> rocketchat_core::Result<()> {
//! let server = Server::new("https://chat.example.com")?;
//! let session = server.login("user", "password")?;
//! if let Some(room) = session.find_room_by_name("general")? {
//!     room.join()?;
//!     room.post("hello")?;
//! }
//! session.logoff()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `Server` owns the base URL and TLS settings; `Session` borrows the
//!   server, `Room` borrows the session. All of them are immutable.
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), so the request/response mapping
//!   is testable without a network. [`transport::execute`] performs the
//!   round-trip in between.

pub mod error;
pub mod http;
pub mod room;
pub mod server;
pub mod session;
pub mod transport;
pub mod types;

pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use room::Room;
pub use server::Server;
pub use session::Session;
pub use transport::{TlsOptions, VerifyMode};
pub use types::{Message, RoomData, Token, Version};
