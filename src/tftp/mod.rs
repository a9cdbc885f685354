mod packet;
mod transport;

pub use packet::{DecodeError, ErrorCode, Packet};
pub use transport::{Receiver, Sender};

use std::fmt::Display;

/// Transfer mode carried in read and write requests. `Mail` is accepted
/// when decoding packets from the wire but is never selectable for a
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Netascii,
    Octet,
    Mail,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Netascii => "netascii",
            Mode::Octet => "octet",
            Mode::Mail => "mail",
        }
    }

    /// Matches a mode string from a request packet, case-insensitively
    /// per RFC 1350.
    pub fn from_wire(value: &str) -> Option<Mode> {
        if value.eq_ignore_ascii_case("netascii") {
            Some(Mode::Netascii)
        } else if value.eq_ignore_ascii_case("octet") {
            Some(Mode::Octet)
        } else if value.eq_ignore_ascii_case("mail") {
            Some(Mode::Mail)
        } else {
            None
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
