use crate::enrollment::{Enrollment, decode_secret};
use crate::error::{Error, Result};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha1 = Hmac<Sha1>;

/// Code computed for one enrollment at one instant. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedResult {
    pub issuer: String,
    pub identifier: String,
    pub code: String,
    pub remaining: u64,
}

/// Current unix time in whole seconds.
pub fn now_unix() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::Clock)?
        .as_secs())
}

/// RFC 4226 HOTP value for `counter`, before reduction modulo `10^digits`.
///
/// Dynamic truncation: the low nibble of the last digest byte selects four
/// bytes, and only the top bit of the first of them is masked.
pub fn truncated_hmac(key: &[u8], counter: u64) -> Result<u32> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| Error::InvalidSecret)?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    Ok(u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]))
}

/// RFC 4226 HOTP code rendered as exactly `digits` zero-padded decimal characters.
pub fn hotp(key: &[u8], counter: u64, digits: u32) -> Result<String> {
    let modulus = 10u64.pow(digits);
    let code = u64::from(truncated_hmac(key, counter)?) % modulus;
    Ok(format!("{code:0width$}", width = digits as usize))
}

/// Compute the TOTP code and the seconds left in the current window.
///
/// `now` is supplied by the caller so results are reproducible. Parameters are
/// re-checked here because the store file may have been edited by hand.
pub fn generate(enrollment: &Enrollment, now: u64) -> Result<GeneratedResult> {
    enrollment.check_parameters()?;
    let key = decode_secret(&enrollment.secret)?;

    let period = enrollment.period;
    let code = hotp(&key, now / period, enrollment.digits)?;

    Ok(GeneratedResult {
        issuer: enrollment.issuer.clone(),
        identifier: enrollment.identifier.clone(),
        code,
        remaining: period - now % period,
    })
}
