//! Live inventory source: EC2 describe-instances plus a batched
//! describe-images pass that refines the login-user guess.

use std::collections::{HashMap, HashSet};

use aws_config::BehaviorVersion;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client;

use crate::error::{JumpError, Result};
use crate::record::{InstanceRecord, NOT_AVAILABLE};
use crate::users;

/// Name and description of one AMI, as returned by the batched lookup.
#[derive(Clone, Debug)]
pub struct ImageMeta {
    pub name: String,
    pub description: String,
}

/// Build an EC2 client for the given region, on top of the default
/// credential chain.
pub async fn client_for_region(region: &str) -> Client {
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}

/// Fetch all running instances in the client's region.
///
/// An error from the primary describe-instances call is fatal to this call
/// and surfaces as `Err`; an error from the image lookup is not, the
/// records keep their platform-based user guesses.
pub async fn fetch(client: &Client, region: &str) -> Result<Vec<InstanceRecord>> {
    let state_filter = Filter::builder()
        .name("instance-state-name")
        .values("running")
        .build();

    let response = client
        .describe_instances()
        .filters(state_filter)
        .send()
        .await
        .map_err(|e| JumpError::Api(DisplayErrorContext(&e).to_string()))?;

    let mut records = Vec::new();
    let mut image_ids: HashSet<String> = HashSet::new();

    for reservation in response.reservations() {
        for instance in reservation.instances() {
            let platform_details = instance
                .platform_details()
                .unwrap_or("Linux/UNIX")
                .to_string();

            let name = instance
                .tags()
                .iter()
                .find(|tag| tag.key() == Some("Name"))
                .and_then(|tag| tag.value())
                .unwrap_or(NOT_AVAILABLE)
                .to_string();

            let image_id = instance.image_id().unwrap_or_default().to_string();
            if !image_id.is_empty() {
                image_ids.insert(image_id.clone());
            }

            records.push(InstanceRecord {
                instance_id: instance.instance_id().unwrap_or_default().to_string(),
                name,
                private_ip: instance.private_ip_address().unwrap_or_default().to_string(),
                key_name: instance.key_name().unwrap_or(NOT_AVAILABLE).to_string(),
                target_user: users::platform_user(&platform_details).to_string(),
                platform_details,
                image_id: if image_id.is_empty() {
                    NOT_AVAILABLE.to_string()
                } else {
                    image_id
                },
                image_name: NOT_AVAILABLE.to_string(),
            });
        }
    }

    if !image_ids.is_empty() {
        tracing::info!(count = image_ids.len(), "describing unique AMIs");
        match describe_images(client, &image_ids).await {
            Ok(images) => apply_image_metadata(&mut records, &images),
            Err(e) => {
                // Non-fatal: keep the coarse platform-based guesses.
                tracing::warn!(%e, "could not describe AMIs to refine users");
            }
        }
    }

    tracing::info!(count = records.len(), region, "found running instances");
    Ok(records)
}

async fn describe_images(
    client: &Client,
    image_ids: &HashSet<String>,
) -> Result<HashMap<String, ImageMeta>> {
    let response = client
        .describe_images()
        .set_image_ids(Some(image_ids.iter().cloned().collect()))
        .send()
        .await
        .map_err(|e| JumpError::Api(DisplayErrorContext(&e).to_string()))?;

    let mut images = HashMap::new();
    for image in response.images() {
        if let Some(id) = image.image_id() {
            images.insert(
                id.to_string(),
                ImageMeta {
                    name: image.name().unwrap_or_default().to_string(),
                    description: image.description().unwrap_or_default().to_string(),
                },
            );
        }
    }
    Ok(images)
}

/// Refinement pass: store the resolved AMI name on each record and re-run
/// the user heuristic against the AMI metadata.
pub fn apply_image_metadata(
    records: &mut [InstanceRecord],
    images: &HashMap<String, ImageMeta>,
) {
    for record in records.iter_mut() {
        if let Some(meta) = images.get(&record.image_id) {
            if !meta.name.is_empty() {
                record.image_name = meta.name.clone();
            }
            record.target_user =
                users::refine_user(&record.target_user, &meta.name, &meta.description);
        }
    }
}
