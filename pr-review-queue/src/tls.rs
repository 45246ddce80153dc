//! Process-wide TLS setup.
//!
//! octocrab and reqwest both sit on rustls. When more than one rustls
//! crypto backend ends up in the build, rustls refuses to pick one on its
//! own, so every client in this crate is built after [`install_crypto_provider`].

/// Installs `ring` as the process-level rustls crypto provider.
///
/// Idempotent. Installing fails only when a provider is already in place,
/// which is fine.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_is_available_after_install() {
        install_crypto_provider();
        install_crypto_provider();

        assert!(rustls::crypto::CryptoProvider::get_default().is_some());
    }
}
