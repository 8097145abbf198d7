// Convert the engine's /system/df response into usage rows.

use crate::models::UsageEntry;
use bollard::models::SystemDataUsageResponse;

/// Per-category totals as exact byte strings ("<n>B"). Absent or negative
/// totals count as zero.
pub(crate) fn breakdown(df: &SystemDataUsageResponse) -> Vec<UsageEntry> {
    let images = df.image_usage.as_ref().and_then(|u| u.total_size);
    let containers = df.container_usage.as_ref().and_then(|u| u.total_size);
    let volumes = df.volume_usage.as_ref().and_then(|u| u.total_size);
    let build_cache = df.build_cache_usage.as_ref().and_then(|u| u.total_size);

    [
        ("Images", images),
        ("Containers", containers),
        ("Local Volumes", volumes),
        ("Build Cache", build_cache),
    ]
    .into_iter()
    .map(|(category, total)| UsageEntry::new(category, format!("{}B", non_negative(total))))
    .collect()
}

fn non_negative(total: Option<i64>) -> u64 {
    total.and_then(|v| u64::try_from(v).ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{
        BuildCacheDiskUsage, ContainersDiskUsage, ImagesDiskUsage, VolumesDiskUsage,
    };

    #[test]
    fn breakdown_of_empty_response_is_all_zero() {
        let rows = breakdown(&SystemDataUsageResponse::default());
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.size == "0B"));
    }

    #[test]
    fn breakdown_reads_each_category_total() {
        let df = SystemDataUsageResponse {
            image_usage: Some(ImagesDiskUsage {
                total_size: Some(10 * 1024 * 1024 * 1024),
                ..Default::default()
            }),
            container_usage: Some(ContainersDiskUsage {
                total_size: Some(128),
                ..Default::default()
            }),
            volume_usage: Some(VolumesDiskUsage {
                total_size: Some(2048),
                ..Default::default()
            }),
            build_cache_usage: Some(BuildCacheDiskUsage {
                total_size: Some(1024),
                ..Default::default()
            }),
        };

        let rows = breakdown(&df);
        assert_eq!(rows[0], UsageEntry::new("Images", "10737418240B"));
        assert_eq!(rows[1], UsageEntry::new("Containers", "128B"));
        assert_eq!(rows[2], UsageEntry::new("Local Volumes", "2048B"));
        assert_eq!(rows[3], UsageEntry::new("Build Cache", "1024B"));
    }

    #[test]
    fn unknown_sizes_count_as_zero() {
        let df = SystemDataUsageResponse {
            image_usage: Some(ImagesDiskUsage {
                total_size: Some(-1),
                ..Default::default()
            }),
            volume_usage: Some(VolumesDiskUsage {
                total_size: None,
                ..Default::default()
            }),
            build_cache_usage: Some(BuildCacheDiskUsage {
                total_size: Some(512),
                ..Default::default()
            }),
            ..Default::default()
        };

        let rows = breakdown(&df);
        assert_eq!(rows[0].size, "0B");
        assert_eq!(rows[1].size, "0B");
        assert_eq!(rows[2].size, "0B");
        assert_eq!(rows[3].size, "512B");
    }
}
