use crate::error::{Error, Result};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use totp_rs::Secret;
use url::Url;
use zeroize::Zeroizing;

pub const DEFAULT_ALGORITHM: &str = "sha1";
pub const DEFAULT_DIGITS: u32 = 6;
pub const DEFAULT_PERIOD: u64 = 30;

/// Widest code whose modulus still leaves room above the 31-bit truncated value.
pub const MAX_DIGITS: u32 = 10;

/// One registered secret together with its display metadata and OTP parameters.
///
/// This is exactly the shape of one element of the store's JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub issuer: String,
    pub identifier: String,
    pub algorithm: String, // "sha1"
    pub digits: u32,
    pub period: u64,
    pub secret: String, // base32
}

impl Enrollment {
    /// Enrollment with the default algorithm, digits and period.
    pub fn new(
        issuer: impl Into<String>,
        identifier: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            identifier: identifier.into(),
            algorithm: DEFAULT_ALGORITHM.to_string(),
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
            secret: secret.into(),
        }
    }

    /// Check every parameter without touching the record.
    ///
    /// An enrollment that passes is safe to persist as-is: the secret decodes
    /// as base32 to a non-empty key and `digits`/`period` are usable.
    pub fn validate(&self) -> Result<()> {
        self.check_parameters()?;
        decode_secret(&self.secret)?;
        Ok(())
    }

    /// Canonical form: secret via [`normalize_secret`], algorithm lower-cased.
    pub fn normalized(mut self) -> Self {
        self.secret = normalize_secret(&self.secret);
        self.algorithm = self.algorithm.trim().to_lowercase();
        self
    }

    pub(crate) fn check_parameters(&self) -> Result<()> {
        if !self.algorithm.eq_ignore_ascii_case(DEFAULT_ALGORITHM) {
            return Err(Error::UnsupportedAlgorithm(self.algorithm.clone()));
        }
        if self.digits == 0 || self.digits > MAX_DIGITS {
            return Err(Error::InvalidDigits(self.digits));
        }
        if self.period == 0 {
            return Err(Error::InvalidPeriod(self.period));
        }
        Ok(())
    }

    /// Parse a `otpauth://totp/<issuer>:<account>?secret=...` provisioning URI.
    ///
    /// The `issuer` query parameter takes precedence over the label prefix.
    /// Missing `digits`, `period` and `algorithm` fall back to the defaults.
    pub fn from_otpauth_uri(uri: &str) -> Result<Self> {
        let url = Url::parse(uri.trim()).map_err(|e| Error::InvalidUri(e.to_string()))?;

        if url.scheme() != "otpauth" {
            return Err(Error::InvalidUri(format!(
                "unexpected scheme '{}'",
                url.scheme()
            )));
        }

        let kind = url.host_str().unwrap_or("").to_lowercase();
        if kind != "totp" {
            return Err(Error::InvalidUri(format!(
                "unsupported type '{kind}', only 'totp' is supported"
            )));
        }

        let label = percent_decode_str(url.path().trim_start_matches('/'))
            .decode_utf8_lossy()
            .into_owned();
        let (issuer, identifier) = match label.split_once(':') {
            Some((issuer, account)) => (issuer.trim(), account.trim()),
            None => ("", label.trim()),
        };

        let mut enrollment = Enrollment::new(issuer, identifier, String::new());
        let mut secret: Option<String> = None;

        for (k, v) in url.query_pairs() {
            match k.as_ref() {
                "secret" => secret = Some(v.into_owned()),
                "issuer" => enrollment.issuer = v.into_owned(),
                "algorithm" => enrollment.algorithm = v.into_owned(),
                "digits" => {
                    enrollment.digits = v
                        .parse()
                        .map_err(|_| Error::InvalidUri(format!("digits '{v}' is not a number")))?
                }
                "period" => {
                    enrollment.period = v
                        .parse()
                        .map_err(|_| Error::InvalidUri(format!("period '{v}' is not a number")))?
                }
                _ => {}
            }
        }

        enrollment.secret =
            secret.ok_or_else(|| Error::InvalidUri("missing 'secret' parameter".to_string()))?;
        let enrollment = enrollment.normalized();
        enrollment.validate()?;
        Ok(enrollment)
    }
}

/// Canonical form of a base32 secret: no whitespace, no padding, upper case.
pub fn normalize_secret(secret: &str) -> String {
    secret
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .trim_end_matches('=')
        .to_uppercase()
}

/// Decode a base32 secret into raw HMAC key bytes, wiped on drop.
///
/// Unpadded lengths of 1, 3 or 6 mod 8 cannot come out of an RFC 4648
/// encoder and are rejected.
pub fn decode_secret(secret: &str) -> Result<Zeroizing<Vec<u8>>> {
    let secret = normalize_secret(secret);
    if matches!(secret.len() % 8, 1 | 3 | 6) {
        return Err(Error::InvalidSecret);
    }
    let bytes = Secret::Encoded(secret)
        .to_bytes()
        .map_err(|_| Error::InvalidSecret)?;
    if bytes.is_empty() {
        return Err(Error::InvalidSecret);
    }
    Ok(Zeroizing::new(bytes))
}
