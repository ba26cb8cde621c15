//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the WebsiteStore trait from webotron-core.

use std::path::Path;

use async_trait::async_trait;
use aws_config::Region;
use aws_config::default_provider::region::DefaultRegionChain;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, ErrorDocument, IndexDocument,
};
use webotron_core::{
    BucketInfo, Error, ObjectInfo, Result, SessionConfig, WebsiteConfiguration, WebsiteStore,
};

/// Region used when neither the flags nor the profile name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    endpoint_url: Option<String>,
}

impl S3Client {
    /// Create a new S3 client from session settings
    ///
    /// Credentials and region come from the named profile in the shared AWS
    /// config files, or from the SDK default chain when no profile is set.
    /// An explicit region wins over both; [`DEFAULT_REGION`] is the last
    /// resort.
    pub async fn new(settings: &SessionConfig) -> Result<Self> {
        settings.validate()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        let mut profile_region = DefaultRegionChain::builder();
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
            profile_region = profile_region.profile_name(profile);
        }
        let region = RegionProviderChain::first_try(settings.region.clone().map(Region::new))
            .or_else(profile_region.build())
            .or_else(Region::new(DEFAULT_REGION));
        loader = loader.region(region);
        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(settings.force_path_style)
            .build();

        tracing::debug!(
            profile = settings.profile.as_deref().unwrap_or("default"),
            region = ?config.region(),
            endpoint = settings.endpoint_url.as_deref().unwrap_or("aws"),
            "Created S3 client"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            endpoint_url: settings.endpoint_url.clone(),
        })
    }

    /// Region buckets are created in
    pub fn region(&self) -> &str {
        self.inner
            .config()
            .region()
            .map(|r| r.as_ref())
            .unwrap_or(DEFAULT_REGION)
    }

    /// Custom endpoint, if the session targets an S3-compatible service
    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// Format AWS SDK error into a detailed error message
    fn format_sdk_error<E>(error: &SdkError<E>) -> String
    where
        E: ProvideErrorMetadata + std::fmt::Display,
    {
        match error {
            SdkError::ServiceError(service_err) => {
                let err = service_err.err();
                let mut msg = format!("Service error: {err}");
                if let Some(code) = err.code() {
                    msg.push_str(&format!(" (code: {code})"));
                }
                msg
            }
            SdkError::ConstructionFailure(err) => {
                format!("Request construction failed: {err:?}")
            }
            SdkError::TimeoutError(_) => "Request timeout".to_string(),
            SdkError::DispatchFailure(err) => {
                format!("Network dispatch error: {err:?}")
            }
            SdkError::ResponseError(err) => {
                format!("Response error: {err:?}")
            }
            _ => error.to_string(),
        }
    }

    /// Map an SDK error onto the webotron error taxonomy
    fn map_sdk_error<E>(error: &SdkError<E>, context: &str) -> Error
    where
        E: ProvideErrorMetadata + std::fmt::Display,
    {
        classify_error_code(error.code(), context, Self::format_sdk_error(error))
    }
}

/// Classify a provider error code; unrecognized codes become network errors
fn classify_error_code(code: Option<&str>, context: &str, detail: String) -> Error {
    match code {
        Some("BucketAlreadyOwnedByYou") => Error::BucketAlreadyOwned(context.to_string()),
        Some("BucketAlreadyExists") => {
            Error::Conflict(format!("{context}: bucket name is owned by another account"))
        }
        Some("NoSuchBucket" | "NoSuchKey" | "NotFound") => Error::NotFound(context.to_string()),
        Some(
            "AccessDenied"
            | "InvalidAccessKeyId"
            | "SignatureDoesNotMatch"
            | "ExpiredToken"
            | "InvalidToken",
        ) => Error::Auth(format!("{context}: {detail}")),
        _ => Error::Network(format!("{context}: {detail}")),
    }
}

/// Location constraint for `region`; us-east-1 must be sent without one
fn location_constraint(region: &str) -> Option<CreateBucketConfiguration> {
    if region == DEFAULT_REGION {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

fn sdk_website_configuration(
    website: &WebsiteConfiguration,
) -> Result<aws_sdk_s3::types::WebsiteConfiguration> {
    let index = IndexDocument::builder()
        .suffix(&website.index_document)
        .build()
        .map_err(|e| Error::General(format!("invalid index document: {e}")))?;
    let error = ErrorDocument::builder()
        .key(&website.error_document)
        .build()
        .map_err(|e| Error::General(format!("invalid error document: {e}")))?;

    Ok(aws_sdk_s3::types::WebsiteConfiguration::builder()
        .index_document(index)
        .error_document(error)
        .build())
}

#[async_trait]
impl WebsiteStore for S3Client {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| Self::map_sdk_error(&e, "list buckets"))?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| {
                let mut info = BucketInfo::new(b.name().unwrap_or_default());
                if let Some(creation_date) = b.creation_date() {
                    info.created = jiff::Timestamp::from_second(creation_date.secs()).ok();
                }
                info
            })
            .collect();

        Ok(buckets)
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        let mut items = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.inner.list_objects_v2().bucket(bucket);
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| Self::map_sdk_error(&e, bucket))?;

            for object in response.contents() {
                let key = object.key().unwrap_or_default().to_string();
                let size = object.size().unwrap_or(0);
                let mut info = ObjectInfo::file(&key, size);

                if let Some(modified) = object.last_modified() {
                    info.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
                }

                if let Some(etag) = object.e_tag() {
                    info.etag = Some(etag.trim_matches('"').to_string());
                }

                if let Some(sc) = object.storage_class() {
                    info.storage_class = Some(sc.as_str().to_string());
                }

                items.push(info);
            }

            match response.next_continuation_token() {
                Some(token) if response.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        tracing::debug!(bucket, objects = items.len(), "Listed objects");
        Ok(items)
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut request = self.inner.create_bucket().bucket(bucket);
        if let Some(configuration) = location_constraint(self.region()) {
            request = request.create_bucket_configuration(configuration);
        }

        request.send().await.map_err(|e| {
            if e.as_service_error()
                .is_some_and(|se| se.is_bucket_already_owned_by_you())
            {
                Error::BucketAlreadyOwned(bucket.to_string())
            } else {
                Self::map_sdk_error(&e, bucket)
            }
        })?;

        tracing::debug!(bucket, region = self.region(), "Bucket created");
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        self.inner
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|e| Self::map_sdk_error(&e, bucket))?;

        Ok(())
    }

    async fn put_bucket_website(
        &self,
        bucket: &str,
        website: &WebsiteConfiguration,
    ) -> Result<()> {
        let configuration = sdk_website_configuration(website)?;

        self.inner
            .put_bucket_website()
            .bucket(bucket)
            .website_configuration(configuration)
            .send()
            .await
            .map_err(|e| Self::map_sdk_error(&e, bucket))?;

        Ok(())
    }

    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| Error::General(format!("failed to read {}: {e}", path.display())))?;

        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| Self::map_sdk_error(&e, &format!("{bucket}/{key}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_constraint_skipped_for_us_east_1() {
        assert!(location_constraint("us-east-1").is_none());
    }

    #[test]
    fn test_location_constraint_for_other_regions() {
        let configuration = location_constraint("eu-west-1").unwrap();
        assert_eq!(
            configuration.location_constraint(),
            Some(&BucketLocationConstraint::EuWest1)
        );
    }

    #[test]
    fn test_sdk_website_configuration() {
        let configuration = sdk_website_configuration(&WebsiteConfiguration::default()).unwrap();
        assert_eq!(
            configuration.index_document().map(|d| d.suffix()),
            Some("index.html")
        );
        assert_eq!(
            configuration.error_document().map(|d| d.key()),
            Some("error.html")
        );
    }

    #[test]
    fn test_classify_owned_bucket() {
        let err = classify_error_code(Some("BucketAlreadyOwnedByYou"), "my-site", String::new());
        assert!(matches!(err, Error::BucketAlreadyOwned(b) if b == "my-site"));
    }

    #[test]
    fn test_classify_conflict_and_auth() {
        assert!(matches!(
            classify_error_code(Some("BucketAlreadyExists"), "taken", String::new()),
            Error::Conflict(_)
        ));
        assert!(matches!(
            classify_error_code(Some("AccessDenied"), "my-site", "denied".to_string()),
            Error::Auth(_)
        ));
        assert!(matches!(
            classify_error_code(Some("NoSuchBucket"), "gone", String::new()),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn test_classify_unknown_is_network() {
        let err = classify_error_code(None, "my-site", "dispatch failure".to_string());
        match err {
            Error::Network(msg) => assert!(msg.contains("dispatch failure")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_uses_explicit_region() {
        let settings = SessionConfig {
            region: Some("eu-central-1".to_string()),
            endpoint_url: Some("http://localhost:9000".to_string()),
            force_path_style: true,
            ..Default::default()
        };
        let client = S3Client::new(&settings).await.unwrap();
        assert_eq!(client.region(), "eu-central-1");
        assert_eq!(client.endpoint_url(), Some("http://localhost:9000"));
    }

    #[tokio::test]
    async fn test_client_rejects_bad_endpoint() {
        let settings = SessionConfig {
            endpoint_url: Some("::not a url::".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            S3Client::new(&settings).await,
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_client_always_has_a_region() {
        let client = S3Client::new(&SessionConfig::default()).await.unwrap();
        let sdk_region = client.inner.config().region().map(|r| r.to_string());
        assert!(sdk_region.is_some());
        assert_eq!(sdk_region.as_deref(), Some(client.region()));
    }
}
