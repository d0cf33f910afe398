use crate::chain::Signer;
use crate::error::{Result, SdkError};
use ed25519_dalek::{Signer as _, SigningKey};
use log::debug;

const APTOS_PRIVATE_KEY_PREFIX: &str = "ed25519-priv-";

/// Ed25519 key held in process memory.
///
/// The account address is supplied alongside the key rather than derived from it,
/// since rotated accounts no longer match their original authentication key.
pub struct LocalSigner {
    key: SigningKey,
    address: String,
}

impl LocalSigner {
    pub fn new(key: SigningKey, address: impl Into<String>) -> Self {
        Self {
            key,
            address: address.into(),
        }
    }

    /// Accepts `0x`-prefixed, bare, or `ed25519-priv-0x` hex private keys.
    pub fn from_hex(private_key: &str, address: impl Into<String>) -> Result<Self> {
        let trimmed = private_key.trim();
        let trimmed = trimmed.strip_prefix(APTOS_PRIVATE_KEY_PREFIX).unwrap_or(trimmed);
        let bytes = hex::decode(strip_hex_prefix(trimmed))
            .map_err(|e| SdkError::Signing(format!("Private key is not valid hex: {}", e)))?;
        let seed: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            SdkError::Signing(format!("Private key must be 32 bytes, got {}", bytes.len()))
        })?;
        let signer = Self::new(SigningKey::from_bytes(&seed), address);
        debug!("Loaded local signer for {}", signer.address);
        Ok(signer)
    }
}

impl Signer for LocalSigner {
    fn address(&self) -> &str {
        &self.address
    }

    fn public_key(&self) -> String {
        format!("0x{}", hex::encode(self.key.verifying_key().to_bytes()))
    }

    fn sign(&self, message: &[u8]) -> Result<String> {
        let signature = self.key.sign(message);
        Ok(format!("0x{}", hex::encode(signature.to_bytes())))
    }
}

pub(crate) fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}
