pub mod config;
pub mod credentials;
pub mod engine;
pub mod factors;
pub mod input;
pub mod output;
pub mod records;
pub mod submit;

/// Install the rustls crypto provider (required for rustls 0.23+).
/// Safe to call more than once.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}
