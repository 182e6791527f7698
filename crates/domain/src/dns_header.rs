//! Fixed 12-byte DNS message header (RFC 1035 §4.1.1).

use std::fmt;

pub const DNS_HEADER_LEN: usize = 12;

const QR_BIT: u16 = 0x8000;
const OPCODE_MASK: u16 = 0x7800;
const RD_BIT: u16 = 0x0100;
const RCODE_MASK: u16 = 0x000F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHeader {
    pub id: u16,
    pub flags: u16,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl DnsHeader {
    /// Reads the header from the start of `buf`; `None` if fewer than 12 bytes.
    pub fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < DNS_HEADER_LEN {
            return None;
        }
        let word = |i: usize| u16::from_be_bytes([buf[i], buf[i + 1]]);
        Some(Self {
            id: word(0),
            flags: word(2),
            question_count: word(4),
            answer_count: word(6),
            authority_count: word(8),
            additional_count: word(10),
        })
    }

    pub fn is_response(&self) -> bool {
        self.flags & QR_BIT != 0
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags & OPCODE_MASK) >> 11) as u8
    }

    pub fn recursion_desired(&self) -> bool {
        self.flags & RD_BIT != 0
    }

    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from((self.flags & RCODE_MASK) as u8)
    }
}

/// The RCODE values this proxy reports on; anything else is kept numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    Other(u8),
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoError => "NOERROR",
            Self::FormErr => "FORMERR",
            Self::ServFail => "SERVFAIL",
            Self::NXDomain => "NXDOMAIN",
            Self::NotImp => "NOTIMP",
            Self::Refused => "REFUSED",
            Self::Other(_) => "OTHER",
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            Self::NoError => 0,
            Self::FormErr => 1,
            Self::ServFail => 2,
            Self::NXDomain => 3,
            Self::NotImp => 4,
            Self::Refused => 5,
            Self::Other(code) => *code,
        }
    }
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::NoError,
            1 => Self::FormErr,
            2 => Self::ServFail,
            3 => Self::NXDomain,
            4 => Self::NotImp,
            5 => Self::Refused,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(code) => write!(f, "RCODE{}", code),
            known => f.write_str(known.as_str()),
        }
    }
}
