use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{ObjectStore, ObjectStoreError};

const STORAGE_HOST: &str = "https://storage.googleapis.com";
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const READ_WRITE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";

/// Tokens live for an hour; refresh ten minutes early.
const TOKEN_TTL: Duration = Duration::from_secs(50 * 60);

/// Google Cloud Storage photo backend.
///
/// Photos are expected to be publicly readable through bucket-level IAM, so
/// the address handed back by `put` is the plain public object URL.
pub struct GcsStore {
    bucket: String,
    client: Client,
    source: TokenSource,
    token: Mutex<Option<CachedToken>>,
}

/// Where access tokens come from.
enum TokenSource {
    ServiceAccount(ServiceAccountKey),
    /// Application default credentials on GCE/Cloud Run.
    Metadata,
}

struct CachedToken {
    value: String,
    fetched_at: Instant,
}

#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GcsStore {
    /// Build the store and fetch a first token so bad credentials fail at start-up.
    pub async fn new(
        bucket: &str,
        credentials_file: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let source = match credentials_file {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await?;
                TokenSource::ServiceAccount(serde_json::from_str(&raw)?)
            }
            None => TokenSource::Metadata,
        };

        let store = Self {
            bucket: bucket.to_string(),
            client: Client::builder().timeout(timeout).build()?,
            source,
            token: Mutex::new(None),
        };
        store.access_token().await?;
        Ok(store)
    }

    async fn access_token(&self) -> Result<String, ObjectStoreError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.fetched_at.elapsed() < TOKEN_TTL {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!(bucket = %self.bucket, "Fetching GCS access token");
        let value = self
            .fetch_token()
            .await
            .map_err(|e| ObjectStoreError::Backend(format!("GCS token refresh failed: {e}")))?;
        *cached = Some(CachedToken {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    async fn fetch_token(&self) -> Result<String, anyhow::Error> {
        let request = match &self.source {
            TokenSource::ServiceAccount(key) => {
                let assertion = jwt_assertion(key, chrono::Utc::now().timestamp())?;
                self.client.post(&key.token_uri).form(&[
                    ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                    ("assertion", assertion.as_str()),
                ])
            }
            TokenSource::Metadata => self
                .client
                .get(METADATA_TOKEN_URL)
                .header("Metadata-Flavor", "Google"),
        };

        let response: TokenResponse = request.send().await?.error_for_status()?.json().await?;
        Ok(response.access_token)
    }

    /// Send an authorized request, mapping transport failures and 404s.
    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response, ObjectStoreError> {
        let token = self.access_token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ObjectStoreError::Backend(format!("GCS {action} failed: {e}")))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ObjectStoreError::Backend(format!(
            "GCS {action} failed ({status}): {body}"
        )))
    }

    fn metadata_url(&self, key: &str) -> String {
        format!(
            "{STORAGE_HOST}/storage/v1/b/{}/o/{}",
            self.bucket,
            encode_object_name(key)
        )
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        let request = self
            .client
            .post(format!("{STORAGE_HOST}/upload/storage/v1/b/{}/o", self.bucket))
            .query(&[("uploadType", "media"), ("name", key)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data);

        let response = self.send(request, "upload").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ObjectStoreError::Backend(format!(
                "GCS bucket {} not found",
                self.bucket
            )));
        }

        Ok(format!("{STORAGE_HOST}/{}/{key}", self.bucket))
    }

    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        let request = self
            .client
            .get(self.metadata_url(key))
            .query(&[("alt", "media")]);

        let response = self.send(request, "download").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ObjectStoreError::NotFound(key.to_string()));
        }
        response
            .bytes()
            .await
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))
    }
}

/// Object names go into a single path segment, so `/` must be escaped.
fn encode_object_name(key: &str) -> String {
    key.replace('%', "%25").replace('/', "%2F")
}

/// Signed RS256 JWT exchanged for an access token.
fn jwt_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String, anyhow::Error> {
    let header = serde_json::json!({ "alg": "RS256", "typ": "JWT" });
    let claims = serde_json::json!({
        "iss": key.client_email,
        "scope": READ_WRITE_SCOPE,
        "aud": key.token_uri,
        "iat": issued_at,
        "exp": issued_at + 3600,
    });

    let unsigned = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
    );
    let signature = sign_rs256(unsigned.as_bytes(), &key.private_key)?;
    Ok(format!("{unsigned}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

fn sign_rs256(data: &[u8], private_key_pem: &str) -> Result<Vec<u8>, anyhow::Error> {
    let der_b64: String = private_key_pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    let der = STANDARD.decode(der_b64.trim())?;

    let key_pair = ring::signature::RsaKeyPair::from_pkcs8(&der)
        .map_err(|e| anyhow::anyhow!("Failed to parse RSA key: {e}"))?;

    let mut signature = vec![0u8; key_pair.public().modulus_len()];
    key_pair
        .sign(
            &ring::signature::RSA_PKCS1_SHA256,
            &ring::rand::SystemRandom::new(),
            data,
            &mut signature,
        )
        .map_err(|e| anyhow::anyhow!("Failed to sign: {e}"))?;

    Ok(signature)
}
