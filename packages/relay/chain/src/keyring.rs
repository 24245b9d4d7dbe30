//! Relay account key loading.

use alloy_signer_local::{LocalSigner, PrivateKeySigner};
use anyhow::{Context, Result};

use crate::config::SignerConfig;

/// Load the relay account signer from its configuration.
///
/// # Errors
/// Returns an error if the hex key does not parse or the keystore cannot be
/// decrypted.
pub fn load_signer(config: &SignerConfig) -> Result<PrivateKeySigner> {
    match config {
        SignerConfig::Hex { private_key } => private_key
            .strip_prefix("0x")
            .unwrap_or(private_key)
            .parse()
            .context("invalid relay account private key"),
        SignerConfig::Keystore { path, password } => {
            LocalSigner::decrypt_keystore(path, password).context("failed to decrypt keystore")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_key_parses_with_and_without_prefix() {
        let bare = "01".repeat(32);
        let prefixed = format!("0x{bare}");

        let from_bare = load_signer(&SignerConfig::Hex {
            private_key: bare,
        })
        .unwrap();
        let from_prefixed = load_signer(&SignerConfig::Hex {
            private_key: prefixed,
        })
        .unwrap();

        assert_eq!(from_bare.address(), from_prefixed.address());
    }

    #[test]
    fn garbage_hex_key_is_rejected() {
        let result = load_signer(&SignerConfig::Hex {
            private_key: "not-a-key".to_string(),
        });
        assert!(result.is_err());
    }
}
