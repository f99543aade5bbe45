//! Trust roots and TLS client configuration.

use rustls::pki_types::CertificateDer;
use rustls::{ClientConfig, RootCertStore};
use std::path::Path;
use std::sync::Arc;

use crate::errors::{SumUpError, SumUpResult};

/// Loads every certificate of a PEM bundle.
pub(crate) fn load_pem_certificates(path: &Path) -> SumUpResult<Vec<CertificateDer<'static>>> {
    let pem = std::fs::read(path).map_err(|e| {
        SumUpError::configuration(format!(
            "Failed to read CA bundle {}: {}",
            path.display(),
            e
        ))
    })?;

    let certs = rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            SumUpError::configuration(format!(
                "Invalid CA bundle {}: {}",
                path.display(),
                e
            ))
        })?;

    if certs.is_empty() {
        return Err(SumUpError::configuration(format!(
            "No certificates found in CA bundle {}",
            path.display()
        )));
    }

    Ok(certs)
}

/// Builds the rustls client configuration: Mozilla roots plus the optional
/// bundle.
pub(crate) fn client_config(ca_bundle_path: Option<&Path>) -> SumUpResult<Arc<ClientConfig>> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    if let Some(path) = ca_bundle_path {
        for cert in load_pem_certificates(path)? {
            roots.add(cert).map_err(|e| {
                SumUpError::configuration(format!(
                    "Invalid certificate in CA bundle {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| SumUpError::configuration(format!("TLS configuration error: {}", e)))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_ca_bundle() -> &'static Path {
        Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test-ca.pem"))
    }

    #[test]
    fn test_default_config_builds() {
        assert!(client_config(None).is_ok());
    }

    #[test]
    fn test_missing_bundle_is_configuration_error() {
        let err = load_pem_certificates(Path::new("/nonexistent/ca.pem")).unwrap_err();
        assert!(matches!(err, SumUpError::Configuration { .. }));
    }

    #[test]
    fn test_bundle_without_certificates_is_rejected() {
        let path = std::env::temp_dir().join(format!("sumup-empty-bundle-{}.pem", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "not a certificate").unwrap();
        drop(file);

        let err = load_pem_certificates(&path).unwrap_err();
        assert!(err.to_string().contains("No certificates found"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_valid_bundle_is_trusted() {
        let certs = load_pem_certificates(test_ca_bundle()).unwrap();
        assert_eq!(certs.len(), 1);

        assert!(client_config(Some(test_ca_bundle())).is_ok());
    }
}
