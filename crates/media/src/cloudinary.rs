//! Cloudinary upload client.
//!
//! Uses the signed REST upload endpoint directly via [`reqwest`] rather
//! than an SDK. Signing: sort the signed parameters by name, join them as
//! `k=v` pairs with `&`, append the API secret and hash. SHA-1 is the
//! provider's default; accounts switched to SHA-256 must say so per request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use senso_core::hashing::{sha1_hex, sha256_hex};

use crate::error::MediaError;
use crate::host::{ImageHost, UploadRequest, UploadedImage};

/// Default folder grouping catalog uploads.
pub const DEFAULT_FOLDER: &str = "senso-products";

/// Incoming transformation: cap at 1000x1000, automatic quality and format.
pub const UPLOAD_TRANSFORMATION: &str = "c_limit,h_1000,w_1000/q_auto/f_auto";

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// HTTP timeout for a single upload.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Digest used for request signatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    /// Case-insensitive; `None` for anything but `sha1` or `sha256`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sha1" => Some(Self::Sha1),
            "sha256" => Some(Self::Sha256),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    fn digest_hex(self, data: &[u8]) -> String {
        match self {
            Self::Sha1 => sha1_hex(data),
            Self::Sha256 => sha256_hex(data),
        }
    }
}

/// Credentials and placement for Cloudinary uploads.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    /// Overridable so tests and proxies can point elsewhere.
    pub api_base: String,
    pub signature_algorithm: SignatureAlgorithm,
}

impl CloudinaryConfig {
    /// Load from the environment.
    ///
    /// | Env Var                  | Required | Default                      |
    /// |--------------------------|----------|------------------------------|
    /// | `CLOUDINARY_CLOUD_NAME`  | yes      | --                           |
    /// | `CLOUDINARY_API_KEY`     | yes      | --                           |
    /// | `CLOUDINARY_API_SECRET`  | yes      | --                           |
    /// | `CLOUDINARY_FOLDER`      | no       | `senso-products`             |
    /// | `CLOUDINARY_API_BASE`    | no       | `https://api.cloudinary.com` |
    /// | `CLOUDINARY_SIGNATURE_ALGORITHM` | no | `sha1`                   |
    ///
    /// Returns `None` when any required credential is missing or empty, so
    /// the server can start without uploads configured. An unrecognised
    /// signature algorithm falls back to SHA-1 with a warning.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let signature_algorithm = match var("CLOUDINARY_SIGNATURE_ALGORITHM") {
            None => SignatureAlgorithm::default(),
            Some(raw) => SignatureAlgorithm::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    value = %raw,
                    "Unknown CLOUDINARY_SIGNATURE_ALGORITHM, using sha1",
                );
                SignatureAlgorithm::Sha1
            }),
        };

        Some(Self {
            cloud_name: var("CLOUDINARY_CLOUD_NAME")?,
            api_key: var("CLOUDINARY_API_KEY")?,
            api_secret: var("CLOUDINARY_API_SECRET")?,
            folder: var("CLOUDINARY_FOLDER").unwrap_or_else(|| DEFAULT_FOLDER.to_string()),
            api_base: var("CLOUDINARY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            signature_algorithm,
        })
    }

    /// `POST` target for image uploads.
    pub fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

/// Compute the request signature over `params`.
///
/// `params` need not be sorted; empty values are skipped, matching the
/// provider's own signing rules.
pub fn sign_params(
    params: &[(&str, String)],
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    algorithm.digest_hex(format!("{to_sign}{api_secret}").as_bytes())
}

/// Successful upload response (only the fields we keep).
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`ImageHost`] backed by Cloudinary.
pub struct CloudinaryHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    /// The parameters covered by the signature for an upload at `timestamp`.
    fn signed_params(&self, timestamp: i64) -> Vec<(&'static str, String)> {
        vec![
            ("folder", self.config.folder.clone()),
            ("timestamp", timestamp.to_string()),
            ("transformation", UPLOAD_TRANSFORMATION.to_string()),
        ]
    }

    /// Turn a non-2xx response into [`MediaError::Api`], preferring the
    /// provider's `error.message` over the raw body.
    async fn api_error(response: reqwest::Response) -> MediaError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|env| env.error.message)
            .unwrap_or(body);
        MediaError::Api { status, message }
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    fn name(&self) -> &'static str {
        "cloudinary"
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadedImage, MediaError> {
        let timestamp = chrono::Utc::now().timestamp();
        let params = self.signed_params(timestamp);
        let algorithm = self.config.signature_algorithm;
        let signature = sign_params(&params, &self.config.api_secret, algorithm);

        let file = Part::bytes(request.bytes)
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        if algorithm != SignatureAlgorithm::Sha1 {
            form = form.text("signature_algorithm", algorithm.as_str());
        }
        for (key, value) in params {
            form = form.text(key, value);
        }

        tracing::debug!(
            file_name = %request.file_name,
            folder = %self.config.folder,
            signature_algorithm = algorithm.as_str(),
            "Uploading image to Cloudinary",
        );

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        Ok(UploadedImage {
            url: body.secure_url,
            public_id: body.public_id,
            width: body.width,
            height: body.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: "abcd".to_string(),
            folder: DEFAULT_FOLDER.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        }
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    const CREDENTIALS: [(&str, &str); 3] = [
        ("CLOUDINARY_CLOUD_NAME", "demo"),
        ("CLOUDINARY_API_KEY", "1234"),
        ("CLOUDINARY_API_SECRET", "abcd"),
    ];

    #[test]
    fn upload_url_includes_cloud_name() {
        assert_eq!(
            test_config().upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );

        let mut config = test_config();
        config.api_base = "http://localhost:9000/".to_string();
        assert_eq!(
            config.upload_url(),
            "http://localhost:9000/v1_1/demo/image/upload"
        );
    }

    #[test]
    fn signature_is_order_independent() {
        let a = vec![
            ("timestamp", "1315060510".to_string()),
            ("folder", "senso-products".to_string()),
        ];
        let b = vec![
            ("folder", "senso-products".to_string()),
            ("timestamp", "1315060510".to_string()),
        ];
        let alg = SignatureAlgorithm::Sha1;
        assert_eq!(sign_params(&a, "secret", alg), sign_params(&b, "secret", alg));
    }

    const SAMPLE_TO_SIGN: &[u8] = b"eager=w_400,h_300,c_pad|w_260,h_200,c_crop\
        &public_id=sample_image&timestamp=1315060510abcd";

    fn sample_params() -> Vec<(&'static str, String)> {
        vec![
            ("timestamp", "1315060510".to_string()),
            ("public_id", "sample_image".to_string()),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop".to_string()),
        ]
    }

    #[test]
    fn sha1_signature_matches_manual_digest() {
        let signature = sign_params(&sample_params(), "abcd", SignatureAlgorithm::Sha1);
        assert_eq!(signature, sha1_hex(SAMPLE_TO_SIGN));
        assert_eq!(signature.len(), 40);
    }

    #[test]
    fn sha256_signature_matches_manual_digest() {
        let signature = sign_params(&sample_params(), "abcd", SignatureAlgorithm::Sha256);
        assert_eq!(signature, sha256_hex(SAMPLE_TO_SIGN));
        assert_eq!(signature.len(), 64);
    }

    #[test]
    fn signature_algorithm_defaults_to_sha1() {
        let config = CloudinaryConfig::from_lookup(lookup(&CREDENTIALS)).unwrap();
        assert_eq!(config.signature_algorithm, SignatureAlgorithm::Sha1);
        assert_eq!(config.folder, DEFAULT_FOLDER);
    }

    #[test]
    fn signature_algorithm_read_from_env() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("CLOUDINARY_SIGNATURE_ALGORITHM", "SHA256"));
        let config = CloudinaryConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.signature_algorithm, SignatureAlgorithm::Sha256);

        vars.pop();
        vars.push(("CLOUDINARY_SIGNATURE_ALGORITHM", "md5"));
        let config = CloudinaryConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.signature_algorithm, SignatureAlgorithm::Sha1);
    }

    #[test]
    fn missing_credentials_disable_uploads() {
        let vars = &CREDENTIALS[..2];
        assert!(CloudinaryConfig::from_lookup(lookup(vars)).is_none());
    }

    #[test]
    fn empty_values_not_signed() {
        let with_empty = vec![
            ("timestamp", "1".to_string()),
            ("folder", String::new()),
        ];
        let without = vec![("timestamp", "1".to_string())];
        let alg = SignatureAlgorithm::Sha1;
        assert_eq!(sign_params(&with_empty, "s", alg), sign_params(&without, "s", alg));
    }

    #[test]
    fn secret_changes_signature() {
        let params = vec![("timestamp", "1".to_string())];
        let alg = SignatureAlgorithm::Sha256;
        assert_ne!(sign_params(&params, "a", alg), sign_params(&params, "b", alg));
    }

    #[test]
    fn signed_params_cover_folder_timestamp_and_transformation() {
        let host = CloudinaryHost::new(test_config()).unwrap();
        let params = host.signed_params(42);
        let keys: Vec<&str> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["folder", "timestamp", "transformation"]);
        assert_eq!(params[1].1, "42");
        assert_eq!(params[2].1, UPLOAD_TRANSFORMATION);
    }

    #[test]
    fn provider_error_message_parsed() {
        let env: ErrorEnvelope =
            serde_json::from_str(r#"{"error":{"message":"Invalid Signature"}}"#).unwrap();
        assert_eq!(env.error.message, "Invalid Signature");
    }
}
