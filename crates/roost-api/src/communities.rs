use anyhow::{Result, anyhow};
use chrono::Utc;
use rusqlite::Connection;
use tracing::info;

use roost_db::clusters;
use roost_db::models::NewCluster;
use roost_types::api::{Community, CommunityParent};
use roost_types::geo::Geometry;
use roost_types::models::ClusterRole;

const MAIN_PAGE_CONTENT: &str = "There is nothing here yet...";

/// Lowercase alphanumerics separated by single dashes. Letters outside ASCII
/// are kept, so "Köln" stays one word.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "community".to_string()
    } else {
        slug.to_string()
    }
}

/// Store a region. `parent_node_id` of `None` makes a root node.
pub fn create_node(conn: &Connection, geom: &Geometry, parent_node_id: Option<i64>) -> Result<i64> {
    let node_id = clusters::insert_node(conn, parent_node_id, &geom.to_json()?, Utc::now())?;
    info!(node_id, ?parent_node_id, "Created node");
    Ok(node_id)
}

/// Create a cluster on `node_id` with its main page, subscribing every id in
/// `admin_ids` as an admin. `is_community` marks it as the node's official
/// community.
pub fn create_cluster(
    conn: &Connection,
    node_id: i64,
    name: &str,
    description: &str,
    creator_user_id: i64,
    admin_ids: &[i64],
    is_community: bool,
) -> Result<i64> {
    let now = Utc::now();
    let cluster_id = clusters::insert_cluster(
        conn,
        &NewCluster {
            parent_node_id: node_id,
            name,
            slug: &slugify(name),
            description,
            is_official_cluster: is_community,
            created: now,
        },
    )?;

    let title = format!("Main page for the {} community", name);
    clusters::insert_page(conn, cluster_id, creator_user_id, &title, MAIN_PAGE_CONTENT, now)?;

    for &admin_id in admin_ids {
        clusters::upsert_cluster_subscription(conn, admin_id, cluster_id, ClusterRole::Admin)?;
    }

    info!(cluster_id, node_id, creator_user_id, admins = admin_ids.len(), "Created cluster");
    Ok(cluster_id)
}

/// The community on `node_id` as seen by `viewer_id`.
pub fn community_to_view(conn: &Connection, node_id: i64, viewer_id: i64) -> Result<Community> {
    let cluster = clusters::official_cluster_for_node(conn, node_id)?
        .ok_or_else(|| anyhow!("node {} has no official cluster", node_id))?;

    let parents = clusters::ancestor_clusters(conn, node_id)?
        .into_iter()
        .map(|(ancestor_id, c)| CommunityParent {
            community_id: ancestor_id,
            name: c.name,
            slug: c.slug,
        })
        .collect();

    let role = clusters::cluster_role(conn, viewer_id, cluster.id)?;
    let (member_count, admin_count) = clusters::cluster_counts(conn, cluster.id)?;

    Ok(Community {
        community_id: node_id,
        main_page_title: clusters::main_page_title(conn, cluster.id)?,
        name: cluster.name,
        slug: cluster.slug,
        description: cluster.description,
        created: cluster.created,
        parents,
        member: role.is_some(),
        admin: role == Some(ClusterRole::Admin),
        member_count,
        admin_count,
    })
}
