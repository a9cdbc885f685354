use std::fmt::Display;

use log::warn;

use crate::tftp::Mode;

/// Reason a buffer was rejected during decoding. A rejected buffer
/// produces no partial packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Truncated,
    UnknownOpcode(u16),
    MissingTerminator,
    UnknownMode(String),
    UnknownErrorCode(u16),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Truncated => write!(f, "packet too short"),
            DecodeError::UnknownOpcode(opcode) => write!(f, "unknown opcode {opcode}"),
            DecodeError::MissingTerminator => write!(f, "string field missing null terminator"),
            DecodeError::UnknownMode(mode) => write!(f, "unknown transfer mode '{mode}'"),
            DecodeError::UnknownErrorCode(code) => write!(f, "unknown error code {code}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Error codes defined by RFC 1350. Anything outside this set is rejected
/// on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotDefined,
    FileNotFound,
    AccessViolation,
    DiskFull,
    IllegalOperation,
    UnknownTransferId,
    FileAlreadyExists,
    NoSuchUser,
}

impl TryFrom<u16> for ErrorCode {
    type Error = DecodeError;

    fn try_from(value: u16) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(ErrorCode::NotDefined),
            1 => Ok(ErrorCode::FileNotFound),
            2 => Ok(ErrorCode::AccessViolation),
            3 => Ok(ErrorCode::DiskFull),
            4 => Ok(ErrorCode::IllegalOperation),
            5 => Ok(ErrorCode::UnknownTransferId),
            6 => Ok(ErrorCode::FileAlreadyExists),
            7 => Ok(ErrorCode::NoSuchUser),
            _ => Err(DecodeError::UnknownErrorCode(value)),
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(value: ErrorCode) -> Self {
        match value {
            ErrorCode::NotDefined => 0,
            ErrorCode::FileNotFound => 1,
            ErrorCode::AccessViolation => 2,
            ErrorCode::DiskFull => 3,
            ErrorCode::IllegalOperation => 4,
            ErrorCode::UnknownTransferId => 5,
            ErrorCode::FileAlreadyExists => 6,
            ErrorCode::NoSuchUser => 7,
        }
    }
}

/// The five RFC 1350 message kinds. All multi-byte integers are
/// big-endian on the wire; string fields are null terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Rrq { filename: String, mode: Mode },
    Wrq { filename: String, mode: Mode },
    Data { block: u16, data: Vec<u8> },
    Ack { block: u16 },
    Error { code: ErrorCode, message: String },
}

impl Packet {
    pub fn from_bytes(data: &[u8]) -> Result<Packet, DecodeError> {
        let (opcode, remainder) = read_u16(data)?;

        match opcode {
            1 => parse_request(remainder, "RRQ")
                .map(|(filename, mode)| Packet::Rrq { filename, mode }),
            2 => parse_request(remainder, "WRQ")
                .map(|(filename, mode)| Packet::Wrq { filename, mode }),
            3 => parse_data(remainder),
            4 => parse_ack(remainder),
            5 => parse_error(remainder),
            other => Err(DecodeError::UnknownOpcode(other)),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = Vec::new();
        match self {
            Packet::Rrq { filename, mode } => {
                write_u16(&mut bytes, 1);
                write_str(&mut bytes, filename);
                write_str(&mut bytes, mode.as_str());
            }
            Packet::Wrq { filename, mode } => {
                write_u16(&mut bytes, 2);
                write_str(&mut bytes, filename);
                write_str(&mut bytes, mode.as_str());
            }
            Packet::Data { block, data } => {
                write_u16(&mut bytes, 3);
                write_u16(&mut bytes, *block);
                bytes.extend_from_slice(data);
            }
            Packet::Ack { block } => {
                write_u16(&mut bytes, 4);
                write_u16(&mut bytes, *block);
            }
            Packet::Error { code, message } => {
                write_u16(&mut bytes, 5);
                write_u16(&mut bytes, (*code).into());
                write_str(&mut bytes, message);
            }
        };

        bytes
    }
}

fn parse_request(data: &[u8], kind: &str) -> Result<(String, Mode), DecodeError> {
    let (filename, remainder) = read_string(data)?;
    let (mode_str, remainder) = read_string(remainder)?;
    let Some(mode) = Mode::from_wire(&mode_str) else {
        return Err(DecodeError::UnknownMode(mode_str));
    };
    if !remainder.is_empty() {
        warn!("bytes remaining after parsing {kind} packet");
    }

    Ok((filename, mode))
}

fn parse_data(data: &[u8]) -> Result<Packet, DecodeError> {
    let (block, remainder) = read_u16(data)?;
    Ok(Packet::Data {
        block,
        data: remainder.into(),
    })
}

fn parse_ack(data: &[u8]) -> Result<Packet, DecodeError> {
    let (block, remainder) = read_u16(data)?;
    if !remainder.is_empty() {
        warn!("bytes remaining after parsing ACK packet");
    }

    Ok(Packet::Ack { block })
}

fn parse_error(data: &[u8]) -> Result<Packet, DecodeError> {
    let (code, remainder) = read_u16(data)?;
    let code = ErrorCode::try_from(code)?;
    let (message, remainder) = read_string(remainder)?;
    if !remainder.is_empty() {
        warn!("bytes remaining after parsing ERROR packet");
    }

    Ok(Packet::Error { code, message })
}

fn read_u16(data: &[u8]) -> Result<(u16, &[u8]), DecodeError> {
    if let Some((word, remainder)) = data.split_at_checked(size_of::<u16>()) {
        let value = u16::from_be_bytes(word.try_into().unwrap());
        Ok((value, remainder))
    } else {
        Err(DecodeError::Truncated)
    }
}

fn read_string(data: &[u8]) -> Result<(String, &[u8]), DecodeError> {
    if let Some(terminator) = data.iter().position(|&c| c == b'\0') {
        let text = String::from_utf8_lossy(&data[..terminator]).into_owned();
        Ok((text, &data[terminator + 1..]))
    } else {
        Err(DecodeError::MissingTerminator)
    }
}

fn write_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn write_str(buf: &mut Vec<u8>, value: &str) {
    buf.extend_from_slice(value.as_bytes());
    buf.push(b'\0');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16() {
        let bytes = [0x00, 0xFF, 0x00];
        let result = read_u16(&bytes[0..3]);
        assert_eq!(result.unwrap(), (255_u16, &bytes[2..3]));
    }

    #[test]
    fn test_read_u16_empty() {
        let result = read_u16(&[]);
        assert_eq!(result, Err(DecodeError::Truncated));
    }

    #[test]
    fn test_read_string() {
        let bytes = [b'A', b'B', b'\0', b'X'];
        let result = read_string(&bytes[0..4]);
        assert_eq!(result.unwrap(), ("AB".to_owned(), &bytes[3..4]));
    }

    #[test]
    fn test_read_string_no_terminator() {
        let result = read_string(&[b'A', b'B']);
        assert_eq!(result, Err(DecodeError::MissingTerminator));
    }

    #[test]
    fn test_roundtrip_rrq() {
        let packet = Packet::Rrq {
            filename: "notes.txt".to_owned(),
            mode: Mode::Netascii,
        };
        assert_eq!(Packet::from_bytes(&packet.to_bytes()).unwrap(), packet);
    }

    #[test]
    fn test_roundtrip_wrq() {
        let packet = Packet::Wrq {
            filename: "image.bin".to_owned(),
            mode: Mode::Octet,
        };
        assert_eq!(Packet::from_bytes(&packet.to_bytes()).unwrap(), packet);
    }

    #[test]
    fn test_roundtrip_data() {
        let packet = Packet::Data {
            block: 7,
            data: b"payload".to_vec(),
        };
        assert_eq!(Packet::from_bytes(&packet.to_bytes()).unwrap(), packet);
    }

    #[test]
    fn test_roundtrip_data_empty_payload() {
        let packet = Packet::Data {
            block: 9,
            data: Vec::new(),
        };
        assert_eq!(Packet::from_bytes(&packet.to_bytes()).unwrap(), packet);
    }

    #[test]
    fn test_roundtrip_ack() {
        let packet = Packet::Ack { block: 1 };
        assert_eq!(Packet::from_bytes(&packet.to_bytes()).unwrap(), packet);
    }

    #[test]
    fn test_roundtrip_error() {
        let packet = Packet::Error {
            code: ErrorCode::FileNotFound,
            message: "no such file".to_owned(),
        };
        assert_eq!(Packet::from_bytes(&packet.to_bytes()).unwrap(), packet);
    }

    #[test]
    fn test_roundtrip_error_empty_message() {
        let packet = Packet::Error {
            code: ErrorCode::NotDefined,
            message: String::new(),
        };
        assert_eq!(Packet::from_bytes(&packet.to_bytes()).unwrap(), packet);
    }

    #[test]
    fn test_parse_rrq_uppercase_mode_is_canonicalized() {
        let bytes = [0x00, 0x01, b'f', b'\0', b'O', b'C', b'T', b'E', b'T', b'\0'];
        let result = Packet::from_bytes(&bytes).unwrap();
        assert_eq!(
            result,
            Packet::Rrq {
                filename: "f".to_owned(),
                mode: Mode::Octet,
            }
        );
    }

    #[test]
    fn test_parse_rrq_mail_mode_accepted() {
        let bytes = [0x00, 0x01, b'f', b'\0', b'm', b'a', b'i', b'l', b'\0'];
        let result = Packet::from_bytes(&bytes).unwrap();
        assert_eq!(
            result,
            Packet::Rrq {
                filename: "f".to_owned(),
                mode: Mode::Mail,
            }
        );
    }

    #[test]
    fn test_parse_rejects_empty_buffer() {
        assert_eq!(Packet::from_bytes(&[]), Err(DecodeError::Truncated));
    }

    #[test]
    fn test_parse_rejects_truncated_opcode() {
        assert_eq!(Packet::from_bytes(&[0x00]), Err(DecodeError::Truncated));
    }

    #[test]
    fn test_parse_rejects_unknown_opcode() {
        let bytes = [0x00, 0x09, 0x00, 0x01];
        assert_eq!(Packet::from_bytes(&bytes), Err(DecodeError::UnknownOpcode(9)));
    }

    #[test]
    fn test_parse_rejects_unterminated_filename() {
        let bytes = [0x00, 0x01, b'f', b'o', b'o'];
        assert_eq!(Packet::from_bytes(&bytes), Err(DecodeError::MissingTerminator));
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        let bytes = [0x00, 0x01, b'f', b'\0', b'f', b'o', b'o', b'\0'];
        assert_eq!(
            Packet::from_bytes(&bytes),
            Err(DecodeError::UnknownMode("foo".to_owned()))
        );
    }

    #[test]
    fn test_parse_rejects_truncated_ack() {
        let bytes = [0x00, 0x04, 0x00];
        assert_eq!(Packet::from_bytes(&bytes), Err(DecodeError::Truncated));
    }

    #[test]
    fn test_parse_rejects_out_of_range_error_code() {
        let bytes = [0x00, 0x05, 0x00, 0x08, b'\0'];
        assert_eq!(
            Packet::from_bytes(&bytes),
            Err(DecodeError::UnknownErrorCode(8))
        );
    }

    #[test]
    fn test_parse_data_length_is_implicit() {
        let bytes = [0x00, 0x03, 0x00, 0x02, 0xAA, 0xBB, 0xCC];
        let result = Packet::from_bytes(&bytes).unwrap();
        assert_eq!(
            result,
            Packet::Data {
                block: 2,
                data: vec![0xAA, 0xBB, 0xCC],
            }
        );
    }
}
