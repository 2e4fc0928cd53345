use rds_snapshotter_models::errors::SnapshotError;

pub const KNOWN_REGIONS: &[&str] = &[
    // aws
    "af-south-1",
    "ap-east-1",
    "ap-east-2",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ap-southeast-5",
    "ap-southeast-6",
    "ap-southeast-7",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "il-central-1",
    "me-central-1",
    "me-south-1",
    "mx-central-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    // aws-us-gov
    "us-gov-east-1",
    "us-gov-west-1",
    // aws-cn
    "cn-north-1",
    "cn-northwest-1",
];

pub fn is_known_region(region: &str) -> bool {
    KNOWN_REGIONS.contains(&region)
}

/// Picks the region an invocation runs in. An empty request region falls back to
/// `default_region`; anything else must be a published region identifier.
pub fn resolve_region(requested: &str, default_region: &str) -> Result<String, SnapshotError> {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return Ok(default_region.to_string());
    }

    if is_known_region(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(SnapshotError::InvalidRegion(requested.to_string()))
    }
}
