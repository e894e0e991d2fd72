//! Throwaway certificates for the TLS test server

use anyhow::{Context, Result};
use rcgen::{CertificateParams, DistinguishedName, DnType, Issuer, KeyPair, SanType};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};

/// A CA and a server certificate it signed.
#[derive(Debug)]
pub struct GeneratedIdentity {
    /// CA certificate clients should trust
    pub ca: CertificateDer<'static>,
    /// PEM form of `ca`
    pub ca_pem: String,
    /// Server certificate chain, leaf first
    pub chain: Vec<CertificateDer<'static>>,
    /// Server private key
    pub key: PrivateKeyDer<'static>,
    /// PEM form of the leaf certificate
    pub cert_pem: String,
    /// PEM form of `key`
    pub key_pem: String,
}

/// Generate a CA and a leaf valid for `localhost`, the loopback addresses
/// and the machine's hostname.
///
/// # Errors
///
/// Fails if key generation or signing fails.
pub fn generate_identity() -> Result<GeneratedIdentity> {
    let mut ca_params =
        CertificateParams::new(Vec::default()).context("Failed to create CA params")?;
    ca_params.is_ca = rcgen::IsCa::Ca(rcgen::BasicConstraints::Unconstrained);

    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, "httpcheck");
    dn.push(DnType::CommonName, "httpcheck test CA");
    ca_params.distinguished_name = dn;

    let ca_key = KeyPair::generate()?;
    let ca_cert = ca_params.clone().self_signed(&ca_key)?;
    let ca_pem = ca_cert.pem();
    let ca_der = CertificateDer::from(ca_cert.der().to_vec());
    let issuer = Issuer::<'static>::new(ca_params, ca_key);

    let mut params = CertificateParams::new(Vec::default())?;
    params.subject_alt_names = vec![
        SanType::DnsName("localhost".try_into()?),
        SanType::IpAddress(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)),
        SanType::IpAddress(std::net::IpAddr::V6(std::net::Ipv6Addr::LOCALHOST)),
    ];

    if let Ok(hostname) = hostname::get()
        && let Some(hostname_str) = hostname.to_str()
        && let Ok(name) = hostname_str.try_into()
    {
        params.subject_alt_names.push(SanType::DnsName(name));
    }

    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, "httpcheck");
    dn.push(DnType::CommonName, "httpcheck test server");
    params.distinguished_name = dn;

    let key_pair = KeyPair::generate()?;
    let cert = params.signed_by(&key_pair, &issuer)?;

    Ok(GeneratedIdentity {
        chain: vec![CertificateDer::from(cert.der().to_vec())],
        key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der())),
        cert_pem: cert.pem(),
        key_pem: key_pair.serialize_pem(),
        ca: ca_der,
        ca_pem,
    })
}

/// Load a certificate chain and private key from PEM data.
///
/// # Errors
///
/// Fails if either document is malformed or holds no usable item.
pub fn load_pem_identity(
    cert_pem: &[u8],
    key_pem: &[u8],
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)> {
    let chain = rustls_pemfile::certs(&mut std::io::BufReader::new(cert_pem))
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to parse certificate PEM")?;
    anyhow::ensure!(!chain.is_empty(), "No certificate in PEM data");

    let key = rustls_pemfile::private_key(&mut std::io::BufReader::new(key_pem))
        .context("Failed to parse private key PEM")?
        .ok_or_else(|| anyhow::anyhow!("No private key in PEM data"))?;

    Ok((chain, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_identity_round_trips_through_pem() {
        let identity = generate_identity().expect("generate");
        assert_eq!(identity.chain.len(), 1);

        let (chain, _key) =
            load_pem_identity(identity.cert_pem.as_bytes(), identity.key_pem.as_bytes())
                .expect("load");
        assert_eq!(chain, identity.chain);
    }

    #[test]
    fn missing_key_is_rejected() {
        let identity = generate_identity().expect("generate");
        let err = load_pem_identity(identity.cert_pem.as_bytes(), b"").expect_err("no key");
        assert!(err.to_string().contains("No private key"));
    }
}
