use rand::RngCore;

/// Bearer credential for the newsletter self-service endpoints.
///
/// 32 bytes from the OS random source, hex-encoded to 64 lowercase
/// characters. Issued once per subscriber and never rotated, so a
/// re-subscription hands back the original token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsubscribeToken(String);

impl UnsubscribeToken {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }
}

impl TryFrom<String> for UnsubscribeToken {
    type Error = InvalidUnsubscribeToken;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let is_of_right_size = value.len() == 64;
        let is_lowercase_hex = value
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
        if !is_of_right_size || !is_lowercase_hex {
            return Err(InvalidUnsubscribeToken());
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for UnsubscribeToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Unsubscribe token is invalid.")]
pub struct InvalidUnsubscribeToken();
