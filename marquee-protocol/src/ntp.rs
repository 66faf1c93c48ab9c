//! SNTP client packets (RFC 4330)
//!
//! A request is 48 bytes with only the mode/version byte set; the reply's
//! transmit timestamp (bytes 40..44) carries seconds since 1900.

/// Size of an SNTP packet without extensions
pub const NTP_PACKET_SIZE: usize = 48;

/// UDP port of NTP servers
pub const NTP_PORT: u16 = 123;

/// Seconds between the NTP epoch (1900) and the unix epoch (1970)
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

/// LI = 0, VN = 3, Mode = 3 (client)
const CLIENT_REQUEST: u8 = 0x1B;

const MODE_SERVER: u8 = 4;

/// Errors from decoding an SNTP reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NtpError {
    /// Reply shorter than 48 bytes
    TooShort,
    /// Reply is not in server mode
    NotServerReply,
    /// Kiss-o'-death (stratum 0): the server asks us to back off
    KissOfDeath,
    /// Transmit timestamp precedes the unix epoch
    InvalidTimestamp,
}

/// Build a client request packet
pub fn request_packet() -> [u8; NTP_PACKET_SIZE] {
    let mut packet = [0u8; NTP_PACKET_SIZE];
    packet[0] = CLIENT_REQUEST;
    packet
}

/// Extract unix seconds from a server reply
pub fn parse_reply(reply: &[u8]) -> Result<u64, NtpError> {
    if reply.len() < NTP_PACKET_SIZE {
        return Err(NtpError::TooShort);
    }
    if reply[0] & 0x07 != MODE_SERVER {
        return Err(NtpError::NotServerReply);
    }
    if reply[1] == 0 {
        return Err(NtpError::KissOfDeath);
    }

    let seconds = u32::from_be_bytes([reply[40], reply[41], reply[42], reply[43]]) as u64;
    seconds
        .checked_sub(NTP_UNIX_OFFSET)
        .ok_or(NtpError::InvalidTimestamp)
}
