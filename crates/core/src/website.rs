//! Website hosting documents
//!
//! The public-read bucket policy and the index/error document pair applied
//! to every bucket set up for hosting.

use serde::Serialize;

/// Suffix served for directory requests
pub const INDEX_DOCUMENT: &str = "index.html";

/// Key served when a request fails
pub const ERROR_DOCUMENT: &str = "error.html";

const POLICY_VERSION: &str = "2012-10-17";

/// Static website hosting settings for a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebsiteConfiguration {
    pub index_document: String,
    pub error_document: String,
}

impl Default for WebsiteConfiguration {
    fn default() -> Self {
        Self {
            index_document: INDEX_DOCUMENT.to_string(),
            error_document: ERROR_DOCUMENT.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PolicyDocument<'a> {
    version: &'a str,
    statement: Vec<PolicyStatement>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PolicyStatement {
    sid: &'static str,
    effect: &'static str,
    principal: &'static str,
    action: Vec<&'static str>,
    resource: Vec<String>,
}

/// Policy document granting anonymous `s3:GetObject` on every key in `bucket`
pub fn public_read_policy(bucket: &str) -> String {
    let document = PolicyDocument {
        version: POLICY_VERSION,
        statement: vec![PolicyStatement {
            sid: "PublicRead",
            effect: "Allow",
            principal: "*",
            action: vec!["s3:GetObject"],
            resource: vec![format!("arn:aws:s3:::{bucket}/*")],
        }],
    };

    // Plain strings and vectors cannot fail to serialize
    serde_json::to_string(&document).unwrap_or_default()
}

// Regions whose website endpoint uses `s3-website-<region>` rather than
// `s3-website.<region>`
const DASH_WEBSITE_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "eu-west-1",
    "sa-east-1",
    "us-gov-west-1",
];

/// Public website URL for a bucket hosted on AWS in `region`
pub fn website_endpoint(bucket: &str, region: &str) -> String {
    if DASH_WEBSITE_REGIONS.contains(&region) {
        format!("http://{bucket}.s3-website-{region}.amazonaws.com")
    } else {
        format!("http://{bucket}.s3-website.{region}.amazonaws.com")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_documents() {
        let website = WebsiteConfiguration::default();
        assert_eq!(website.index_document, "index.html");
        assert_eq!(website.error_document, "error.html");
    }

    #[test]
    fn test_public_read_policy() {
        let policy = public_read_policy("my-site");
        let json: serde_json::Value = serde_json::from_str(&policy).unwrap();

        assert_eq!(json["Version"], "2012-10-17");
        let statement = &json["Statement"][0];
        assert_eq!(statement["Sid"], "PublicRead");
        assert_eq!(statement["Effect"], "Allow");
        assert_eq!(statement["Principal"], "*");
        assert_eq!(statement["Action"], serde_json::json!(["s3:GetObject"]));
        assert_eq!(
            statement["Resource"],
            serde_json::json!(["arn:aws:s3:::my-site/*"])
        );
    }

    #[test]
    fn test_policy_only_varies_by_bucket() {
        let a = public_read_policy("alpha");
        let b = public_read_policy("beta");
        assert_eq!(a.replace("alpha", "beta"), b);
    }

    #[test]
    fn test_website_endpoint() {
        assert_eq!(
            website_endpoint("my-site", "us-east-1"),
            "http://my-site.s3-website-us-east-1.amazonaws.com"
        );
        assert_eq!(
            website_endpoint("my-site", "eu-central-1"),
            "http://my-site.s3-website.eu-central-1.amazonaws.com"
        );
    }
}
