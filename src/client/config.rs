use crate::client::parse::{self, ParseError, PortRange};
use crate::tftp::Mode;

/// Mutable client session settings. String inputs only enter through the
/// value parsers, so a stored field is always valid; a failed update
/// leaves the previous value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: Mode,
    pub ports: PortRange,
    pub literal: bool,
    pub hostname: String,
    pub timeout: u32,
    pub rexmt_timeout: u32,
}

impl SessionConfig {
    /// Builds a configuration from raw string inputs. Validation runs in
    /// a fixed order: mode, ports, timeout, rexmt timeout. The first
    /// failure is returned.
    pub fn create(
        mode: &str,
        port_range: &str,
        literal: bool,
        hostname: &str,
        timeout: &str,
        rexmt_timeout: &str,
    ) -> Result<Self, ParseError> {
        let mode = parse::parse_mode(mode)?;
        let ports = parse::parse_port_range(port_range)?;
        let timeout = parse::parse_time_value(timeout)?;
        let rexmt_timeout = parse::parse_time_value(rexmt_timeout)?;

        Ok(Self {
            mode,
            ports,
            literal,
            hostname: hostname.to_owned(),
            timeout,
            rexmt_timeout,
        })
    }

    pub fn set_mode(&mut self, text: &str) -> Result<(), ParseError> {
        self.mode = parse::parse_mode(text)?;
        Ok(())
    }

    pub fn set_port_range(&mut self, text: &str) -> Result<(), ParseError> {
        self.ports = parse::parse_port_range(text)?;
        Ok(())
    }

    pub fn set_timeout(&mut self, text: &str) -> Result<(), ParseError> {
        self.timeout = parse::parse_time_value(text)?;
        Ok(())
    }

    pub fn set_rexmt_timeout(&mut self, text: &str) -> Result<(), ParseError> {
        self.rexmt_timeout = parse::parse_time_value(text)?;
        Ok(())
    }

    /// Renders every setting for the `status` command. Pure read; calling
    /// it repeatedly without an intervening mutation yields the same text.
    pub fn status_report(&self) -> String {
        format!(
            "host: {}\nmode: {}\nliteral: {}\nports: {}\ntimeout: {} s\nrexmt timeout: {} s",
            self.hostname,
            self.mode,
            if self.literal { "on" } else { "off" },
            self.ports,
            self.timeout,
            self.rexmt_timeout,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SessionConfig {
        SessionConfig::create("ascii", "2048:65535", false, "localhost", "60", "10").unwrap()
    }

    #[test]
    fn test_create_valid() {
        let config = valid_config();
        assert_eq!(config.mode, Mode::Netascii);
        assert_eq!(config.ports, PortRange { start: 2048, end: 65535 });
        assert!(!config.literal);
        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.timeout, 60);
        assert_eq!(config.rexmt_timeout, 10);
    }

    #[test]
    fn test_create_reports_mode_error_first() {
        // Both the mode and the range are bad; mode is validated first.
        let result = SessionConfig::create("foo", "bad-range", false, "localhost", "60", "10");
        assert_eq!(result, Err(ParseError::UnknownMode));
    }

    #[test]
    fn test_create_reports_range_error_before_timeouts() {
        let result = SessionConfig::create("ascii", "2000", false, "localhost", "bad", "bad");
        assert_eq!(result, Err(ParseError::MissingRangeSeparator));
    }

    #[test]
    fn test_create_reports_timeout_error_before_rexmt() {
        let result = SessionConfig::create("ascii", "1:2", false, "localhost", "bad", "bad");
        assert_eq!(result, Err(ParseError::TimeoutOutOfRange));
    }

    #[test]
    fn test_create_reports_rexmt_error_last() {
        let result = SessionConfig::create("ascii", "1:2", false, "localhost", "60", "bad");
        assert_eq!(result, Err(ParseError::TimeoutOutOfRange));
    }

    #[test]
    fn test_create_rejects_out_of_order_range() {
        let result = SessionConfig::create("ascii", "65535:2000", false, "localhost", "60", "10");
        assert_eq!(result, Err(ParseError::PortOutOfOrder));
    }

    #[test]
    fn test_set_mode_accepts_all_aliases() {
        let mut config = valid_config();
        for alias in ["ascii", "netascii", "octet", "binary", "ASCII", "BINARY"] {
            assert!(config.set_mode(alias).is_ok());
        }
        assert_eq!(config.mode, Mode::Octet);
    }

    #[test]
    fn test_failed_set_leaves_field_unchanged() {
        let mut config = valid_config();

        assert_eq!(config.set_mode("foo"), Err(ParseError::UnknownMode));
        assert_eq!(config.mode, Mode::Netascii);

        assert_eq!(config.set_port_range("9:1"), Err(ParseError::PortOutOfOrder));
        assert_eq!(config.ports, PortRange { start: 2048, end: 65535 });

        assert_eq!(config.set_timeout("-1"), Err(ParseError::TimeoutOutOfRange));
        assert_eq!(config.timeout, 60);

        assert_eq!(config.set_rexmt_timeout("x"), Err(ParseError::TimeoutOutOfRange));
        assert_eq!(config.rexmt_timeout, 10);
    }

    #[test]
    fn test_status_report_is_idempotent() {
        let config = valid_config();
        let first = config.status_report();
        assert_eq!(first, config.status_report());
        assert!(first.contains("host: localhost"));
        assert!(first.contains("mode: netascii"));
        assert!(first.contains("ports: 2048:65535"));
    }
}
