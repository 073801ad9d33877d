use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Loads SDK configuration from the ambient environment (credential chain,
/// profile, instance role).
pub async fn sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}
