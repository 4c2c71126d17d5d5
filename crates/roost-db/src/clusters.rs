use crate::columns::{self, timestamp_to_sql};
use crate::models::{ClusterRow, NewCluster, NodeRow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use roost_types::models::ClusterRole;
use rusqlite::{Connection, OptionalExtension, Row};

const CLUSTER_COLUMNS: &str =
    "id, parent_node_id, name, slug, description, is_official_cluster, created";

fn cluster_from_row(row: &Row<'_>) -> rusqlite::Result<ClusterRow> {
    Ok(ClusterRow {
        id: row.get(0)?,
        parent_node_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        description: row.get(4)?,
        is_official_cluster: row.get(5)?,
        created: columns::timestamp(row, 6)?,
    })
}

// -- Nodes --

pub fn insert_node(
    conn: &Connection,
    parent_node_id: Option<i64>,
    geom: &str,
    created: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO nodes (parent_node_id, geom, created) VALUES (?1, ?2, ?3)",
        rusqlite::params![parent_node_id, geom, timestamp_to_sql(&created)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn node_by_id(conn: &Connection, id: i64) -> Result<Option<NodeRow>> {
    let row = conn
        .query_row(
            "SELECT id, parent_node_id, geom, created FROM nodes WHERE id = ?1",
            [id],
            |row| {
                Ok(NodeRow {
                    id: row.get(0)?,
                    parent_node_id: row.get(1)?,
                    geom: row.get(2)?,
                    created: columns::timestamp(row, 3)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

pub fn count_nodes(conn: &Connection) -> Result<u64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM nodes", [], |r| r.get(0))?)
}

// -- Clusters --

pub fn insert_cluster(conn: &Connection, cluster: &NewCluster<'_>) -> Result<i64> {
    conn.execute(
        "INSERT INTO clusters (parent_node_id, name, slug, description, is_official_cluster, created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            cluster.parent_node_id,
            cluster.name,
            cluster.slug,
            cluster.description,
            cluster.is_official_cluster,
            timestamp_to_sql(&cluster.created),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The community that represents a node.
pub fn official_cluster_for_node(conn: &Connection, node_id: i64) -> Result<Option<ClusterRow>> {
    let sql = format!(
        "SELECT {} FROM clusters WHERE parent_node_id = ?1 AND is_official_cluster = 1",
        CLUSTER_COLUMNS
    );
    Ok(conn.query_row(&sql, [node_id], cluster_from_row).optional()?)
}

pub fn count_clusters(conn: &Connection) -> Result<u64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM clusters", [], |r| r.get(0))?)
}

/// Official clusters of every ancestor of `node_id`, root first. The node
/// itself is not included.
pub fn ancestor_clusters(conn: &Connection, node_id: i64) -> Result<Vec<(i64, ClusterRow)>> {
    let mut stmt = conn.prepare(
        "WITH RECURSIVE ancestors(id, parent_node_id, depth) AS (
             SELECT id, parent_node_id, 0 FROM nodes WHERE id = ?1
             UNION ALL
             SELECT n.id, n.parent_node_id, a.depth + 1
             FROM nodes n JOIN ancestors a ON n.id = a.parent_node_id
         )
         SELECT a.id, c.id, c.parent_node_id, c.name, c.slug, c.description,
                c.is_official_cluster, c.created
         FROM ancestors a
         JOIN clusters c ON c.parent_node_id = a.id AND c.is_official_cluster = 1
         WHERE a.depth > 0
         ORDER BY a.depth DESC",
    )?;

    let rows = stmt
        .query_map([node_id], |row| {
            Ok((
                row.get(0)?,
                ClusterRow {
                    id: row.get(1)?,
                    parent_node_id: row.get(2)?,
                    name: row.get(3)?,
                    slug: row.get(4)?,
                    description: row.get(5)?,
                    is_official_cluster: row.get(6)?,
                    created: columns::timestamp(row, 7)?,
                },
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

// -- Subscriptions --

/// Subscribe a user, or change the role of an existing subscription.
pub fn upsert_cluster_subscription(
    conn: &Connection,
    user_id: i64,
    cluster_id: i64,
    role: ClusterRole,
) -> Result<()> {
    conn.execute(
        "INSERT INTO cluster_subscriptions (user_id, cluster_id, role) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, cluster_id) DO UPDATE SET role = excluded.role",
        rusqlite::params![user_id, cluster_id, role.as_str()],
    )?;
    Ok(())
}

pub fn cluster_role(conn: &Connection, user_id: i64, cluster_id: i64) -> Result<Option<ClusterRole>> {
    let role = conn
        .query_row(
            "SELECT role FROM cluster_subscriptions WHERE user_id = ?1 AND cluster_id = ?2",
            [user_id, cluster_id],
            |row| columns::text_enum(row, 0),
        )
        .optional()?;
    Ok(role)
}

/// `(members, admins)`. Admins are members too.
pub fn cluster_counts(conn: &Connection, cluster_id: i64) -> Result<(u64, u64)> {
    let counts = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(role = 'admin'), 0)
         FROM cluster_subscriptions WHERE cluster_id = ?1",
        [cluster_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(counts)
}

// -- Pages --

pub fn insert_page(
    conn: &Connection,
    owner_cluster_id: i64,
    creator_user_id: i64,
    title: &str,
    content: &str,
    created: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO pages (owner_cluster_id, creator_user_id, title, content, created)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            owner_cluster_id,
            creator_user_id,
            title,
            content,
            timestamp_to_sql(&created),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn main_page_title(conn: &Connection, cluster_id: i64) -> Result<Option<String>> {
    let title = conn
        .query_row(
            "SELECT title FROM pages WHERE owner_cluster_id = ?1 ORDER BY id LIMIT 1",
            [cluster_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(title)
}
