pub mod client;
pub mod http;
pub mod server;
pub mod sink;

pub use client::{CommandClient, SendOutcome};
pub use server::CommandServer;
pub use sink::{CommandSink, HttpSink};
