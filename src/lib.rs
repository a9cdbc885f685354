//! Interactive TFTP client building blocks.
//!
//! Implements the pieces an RFC 1350 client front end needs:
//!
//! - **Packet codec**: the five TFTP message kinds marshalled to and from
//!   raw datagram bytes.
//! - **Command shell**: a line-oriented command language parsed into typed
//!   commands and applied against a mutable session configuration, either
//!   inline or on worker tasks.
//! - **Transport**: UDP send and receive with a fixed, optional receive
//!   timeout.
//!
//! The block-by-block transfer engine that would drive the transport is
//! not wired up yet; `get` and `put` validate fully and report that.

pub mod client;
pub mod shell;
pub mod tftp;
