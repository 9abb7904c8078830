//! End-to-end migration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::types::{IndexDocument, WebsiteConfiguration};
    use s3migrate_engine::{
        CreateBucketOutcome, MigrationRequest, Migrator, PolicyWrite, WebsiteOutcome,
    };

    use crate::{
        DESTINATION_PROFILE, SOURCE_PROFILE, bucket_store, cleanup_bucket, create_test_bucket,
        migrate_config, read_policy, s3_client,
    };

    fn read_policy_json(bucket: &str) -> String {
        format!(
            r#"{{"Version":"2012-10-17","Statement":[{{"Sid":"AllowRead","Effect":"Allow","Principal":"*","Action":"s3:GetObject","Resource":"arn:aws:s3:::{bucket}/*"}}]}}"#
        )
    }

    fn request(bucket: &str) -> MigrationRequest {
        MigrationRequest::new(
            &migrate_config("-new"),
            bucket,
            SOURCE_PROFILE,
            DESTINATION_PROFILE,
        )
        .expect("valid request")
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_migrate_policy_and_delegate_source() {
        let client = s3_client();
        let source = create_test_bucket(&client, "mig-policy").await;
        client
            .put_bucket_policy()
            .bucket(&source)
            .policy(read_policy_json(&source))
            .send()
            .await
            .expect("put_bucket_policy");

        let migrator = Migrator::new(bucket_store(&client));
        let report = migrator.migrate(&request(&source)).await.expect("migrate");
        let destination = report.destination_bucket.clone();

        assert_eq!(destination, format!("{source}-new"));
        assert_eq!(report.bucket_creation, CreateBucketOutcome::Created);
        assert_eq!(report.destination_policy, PolicyWrite::Written);
        assert_eq!(report.source_policy, PolicyWrite::Written);
        assert_eq!(report.website, WebsiteOutcome::NotConfigured);

        let destination_policy = read_policy(&client, &destination).await;
        let statements = destination_policy["Statement"].as_array().unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0]["Resource"],
            format!("arn:aws:s3:::{destination}/*")
        );

        let source_policy = read_policy(&client, &source).await;
        let statements = source_policy["Statement"].as_array().unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1]["Sid"], "DelegateS3Access");
        assert_eq!(
            statements[1]["Principal"]["AWS"],
            "arn:aws:iam::000000000000:root"
        );

        cleanup_bucket(&client, &source).await;
        cleanup_bucket(&client, &destination).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_rerun_migration_without_duplicating_delegation() {
        let client = s3_client();
        let source = create_test_bucket(&client, "mig-rerun").await;
        client
            .put_bucket_policy()
            .bucket(&source)
            .policy(read_policy_json(&source))
            .send()
            .await
            .expect("put_bucket_policy");

        let migrator = Migrator::new(bucket_store(&client));
        let first = migrator.migrate(&request(&source)).await.expect("first run");
        let after_first = read_policy(&client, &source).await;

        let second = migrator.migrate(&request(&source)).await.expect("second run");
        let after_second = read_policy(&client, &source).await;

        assert_eq!(second.bucket_creation, CreateBucketOutcome::AlreadyOwnedByCaller);
        assert_eq!(after_first["Statement"], after_second["Statement"]);
        let delegations = after_second["Statement"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|s| s["Sid"] == "DelegateS3Access")
            .count();
        assert_eq!(delegations, 1);

        cleanup_bucket(&client, &source).await;
        cleanup_bucket(&client, &first.destination_bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_skip_policies_and_copy_website() {
        let client = s3_client();
        let source = create_test_bucket(&client, "mig-website").await;
        client
            .put_bucket_website()
            .bucket(&source)
            .website_configuration(
                WebsiteConfiguration::builder()
                    .index_document(IndexDocument::builder().suffix("index.html").build().unwrap())
                    .build(),
            )
            .send()
            .await
            .expect("put_bucket_website");

        let migrator = Migrator::new(bucket_store(&client));
        let report = migrator.migrate(&request(&source)).await.expect("migrate");

        assert_eq!(report.destination_policy, PolicyWrite::SkippedEmpty);
        assert_eq!(report.source_policy, PolicyWrite::SkippedEmpty);
        assert!(matches!(report.website, WebsiteOutcome::Written(_)));

        let website = client
            .get_bucket_website()
            .bucket(&report.destination_bucket)
            .send()
            .await
            .expect("get_bucket_website");
        assert_eq!(
            website.index_document().map(|d| d.suffix()),
            Some("index.html")
        );
        assert!(website.routing_rules().is_empty());

        let policy = client
            .get_bucket_policy()
            .bucket(&source)
            .send()
            .await;
        assert!(policy.is_err(), "source bucket should still have no policy");

        cleanup_bucket(&client, &source).await;
        cleanup_bucket(&client, &report.destination_bucket).await;
    }
}
