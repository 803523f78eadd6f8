//! Builds the payloads of the volume calls from validated arguments and the
//! parsed options of each subcommand.

use crate::commands::volume::{CreateArgs, ListArgs, UpdateArgs};
use crate::model::{ExtendRequest, VolumeFilter, VolumeRequest};

pub fn create_request(size: i64, profile_id: &str, opts: &CreateArgs) -> VolumeRequest {
    VolumeRequest {
        name: opts.name.clone(),
        description: opts.description.clone(),
        size,
        availability_zone: opts.az.clone(),
        profile_id: profile_id.to_string(),
        pool_id: opts.pool.clone(),
        snapshot_id: opts.snapshot.clone(),
        snapshot_from_cloud: opts.snapshot_from_cloud,
    }
}

/// Only name and description are sent so that everything else is left
/// untouched server-side.
pub fn update_request(opts: &UpdateArgs) -> VolumeRequest {
    VolumeRequest {
        name: opts.name.clone(),
        description: opts.description.clone(),
        ..VolumeRequest::default()
    }
}

pub fn delete_request(profile_id: &str) -> VolumeRequest {
    VolumeRequest {
        profile_id: profile_id.to_string(),
        ..VolumeRequest::default()
    }
}

pub fn extend_request(new_size: i64) -> ExtendRequest {
    ExtendRequest { new_size }
}

pub fn list_filter(opts: &ListArgs) -> VolumeFilter {
    VolumeFilter {
        limit: opts.limit,
        offset: opts.offset,
        sort_key: opts.sort_key,
        sort_dir: opts.sort_dir,
        id: opts.id.clone(),
        name: opts.name.clone(),
        description: opts.description.clone(),
        tenant_id: opts.tenant_id.clone(),
        user_id: opts.user_id.clone(),
        status: opts.status.clone(),
        pool_id: opts.pool_id.clone(),
        availability_zone: opts.availability_zone.clone(),
        profile_id: opts.profile_id.clone(),
        group_id: opts.group_id.clone(),
    }
}
