//! Structural validation of link identifiers.
//!
//! A link ID is the compact, reversible base62 rendering of an opaque byte
//! string (in practice a 128-bit UUID). Validation is pure: it never touches
//! the network, so it can run before any broker connection is attempted.

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Longest encoding of a 128-bit value.
pub const MAX_LEN: usize = 22;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkIdError {
    #[error("link ID not configured")]
    NotConfigured,
    #[error("malformed link ID: {0}")]
    Malformed(String),
}

pub fn validate(id: &str) -> Result<(), LinkIdError> {
    decode(id).map(|_| ())
}

pub fn decode(id: &str) -> Result<Vec<u8>, LinkIdError> {
    if id.is_empty() {
        return Err(LinkIdError::NotConfigured);
    }
    if id.len() > MAX_LEN {
        return Err(LinkIdError::Malformed(format!(
            "length {} exceeds {MAX_LEN}",
            id.len()
        )));
    }

    let zeros = id.bytes().take_while(|&b| b == b'0').count();
    let mut value: Vec<u8> = Vec::with_capacity(MAX_LEN);

    for (pos, c) in id.bytes().enumerate().skip(zeros) {
        let digit = digit_of(c).ok_or_else(|| {
            LinkIdError::Malformed(format!("unexpected character {:?} at {pos}", c as char))
        })?;

        let mut carry = digit as u32;
        for byte in value.iter_mut().rev() {
            let v = (*byte as u32) * 62 + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        while carry > 0 {
            value.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(value);
    Ok(out)
}

pub fn encode(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();
    let mut digits: Vec<u8> = Vec::new();
    let mut num: Vec<u8> = bytes[zeros..].to_vec();

    while !num.is_empty() {
        let mut rem = 0u32;
        let mut quotient = Vec::with_capacity(num.len());
        for &b in &num {
            let acc = (rem << 8) | b as u32;
            let q = acc / 62;
            rem = acc % 62;
            if !quotient.is_empty() || q > 0 {
                quotient.push(q as u8);
            }
        }
        digits.push(ALPHABET[rem as usize]);
        num = quotient;
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('0').take(zeros));
    out.extend(digits.iter().rev().map(|&d| d as char));
    out
}

fn digit_of(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'Z' => Some(c - b'A' + 10),
        b'a'..=b'z' => Some(c - b'a' + 36),
        _ => None,
    }
}
