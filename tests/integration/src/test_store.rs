//! `AwsBucketStore` integration tests.

#[cfg(test)]
mod tests {
    use s3migrate_core::ProfileName;
    use s3migrate_engine::{BucketStore, CreateBucketOutcome};
    use s3migrate_model::{IndexDocument, WebsiteConfig, WebsiteWriteRequest};

    use crate::{
        SOURCE_PROFILE, bucket_store, cleanup_bucket, create_test_bucket, s3_client,
        test_bucket_name,
    };

    fn source() -> ProfileName {
        ProfileName::from(SOURCE_PROFILE)
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_created_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "store-list").await;
        let store = bucket_store(&client);

        let names = store.list_buckets(&source()).await.expect("list_buckets");
        assert!(names.contains(&bucket), "should contain {bucket}");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_none_for_missing_policy() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "store-nopolicy").await;
        let store = bucket_store(&client);

        let policy = store
            .get_bucket_policy(&bucket, &source())
            .await
            .expect("get_bucket_policy");
        assert!(policy.is_none());

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_and_get_policy() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "store-policy").await;
        let store = bucket_store(&client);
        let policy = format!(
            r#"{{"Version":"2012-10-17","Statement":[{{"Sid":"AllowRead","Effect":"Allow","Principal":"*","Action":"s3:GetObject","Resource":"arn:aws:s3:::{bucket}/*"}}]}}"#
        );

        store
            .put_bucket_policy(&bucket, &source(), &policy)
            .await
            .expect("put_bucket_policy");
        let fetched = store
            .get_bucket_policy(&bucket, &source())
            .await
            .expect("get_bucket_policy")
            .expect("policy should exist");

        let expected: serde_json::Value = serde_json::from_str(&policy).unwrap();
        let actual: serde_json::Value = serde_json::from_str(&fetched).unwrap();
        assert_eq!(actual["Statement"], expected["Statement"]);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_owned_bucket_on_recreate() {
        let client = s3_client();
        let store = bucket_store(&client);
        let bucket = test_bucket_name("store-create");

        let first = store.create_bucket(&bucket, &source()).await.expect("create");
        assert_eq!(first, CreateBucketOutcome::Created);

        let second = store
            .create_bucket(&bucket, &source())
            .await
            .expect("recreate should be tolerated");
        assert_eq!(second, CreateBucketOutcome::AlreadyOwnedByCaller);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_and_get_website() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "store-website").await;
        let store = bucket_store(&client);

        let missing = store
            .get_bucket_website(&bucket, &source())
            .await
            .expect("get_bucket_website");
        assert!(missing.is_none());

        let website = WebsiteConfig {
            index_document: Some(IndexDocument {
                suffix: Some("index.html".to_owned()),
            }),
            ..WebsiteConfig::default()
        };
        store
            .put_bucket_website(
                &source(),
                &WebsiteWriteRequest {
                    bucket: bucket.clone(),
                    website_configuration: website.clone(),
                },
            )
            .await
            .expect("put_bucket_website");

        let fetched = store
            .get_bucket_website(&bucket, &source())
            .await
            .expect("get_bucket_website")
            .expect("website should exist");
        assert_eq!(fetched.index_document, website.index_document);
        assert!(fetched.redirect_all_requests_to.is_none());

        cleanup_bucket(&client, &bucket).await;
    }
}
