mod common;

use roost_api::AdminError;
use roost_db::clusters;
use roost_types::api::CreateCommunityRequest;

use common::{SQUARE, add_superuser, add_user, admin};

fn request(name: &str, geojson: &str, parent_node_id: i64, admin_ids: Vec<i64>) -> CreateCommunityRequest {
    CreateCommunityRequest {
        name: name.to_string(),
        description: format!("The {} community", name),
        geojson: geojson.to_string(),
        parent_node_id,
        admin_ids,
    }
}

fn counts(admin: &roost_api::Admin) -> (u64, u64) {
    admin
        .db()
        .with_conn(|conn| Ok((clusters::count_nodes(conn)?, clusters::count_clusters(conn)?)))
        .unwrap()
}

#[test]
fn root_community_has_no_parent() {
    let admin = admin();
    let creator = add_superuser(&admin, "root");
    let local = add_user(&admin, "local");

    let community = admin
        .create_community(creator, &request("Global", SQUARE, 0, vec![local]))
        .unwrap();

    assert_eq!(community.name, "Global");
    assert_eq!(community.slug, "global");
    assert!(community.parents.is_empty());
    assert_eq!(community.member_count, 1);
    assert_eq!(community.admin_count, 1);
    // The creator isn't subscribed unless listed as an admin.
    assert!(!community.member);
    assert!(!community.admin);
    assert_eq!(
        community.main_page_title.as_deref(),
        Some("Main page for the Global community")
    );

    let node = admin
        .db()
        .with_conn(|conn| clusters::node_by_id(conn, community.community_id))
        .unwrap()
        .unwrap();
    assert_eq!(node.parent_node_id, None);
}

#[test]
fn nonzero_parent_creates_child_node() {
    let admin = admin();
    let creator = add_superuser(&admin, "root");

    let world = admin
        .create_community(creator, &request("World", SQUARE, 0, vec![creator]))
        .unwrap();
    let country = admin
        .create_community(
            creator,
            &request("Finland", SQUARE, world.community_id, vec![creator]),
        )
        .unwrap();
    let city = admin
        .create_community(
            creator,
            &request("Helsinki", SQUARE, country.community_id, vec![creator]),
        )
        .unwrap();

    assert!(city.admin);
    assert!(city.member);
    let parent_names: Vec<_> = city.parents.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(parent_names, vec!["World", "Finland"]);
    assert_eq!(city.parents[1].community_id, country.community_id);

    let node = admin
        .db()
        .with_conn(|conn| clusters::node_by_id(conn, city.community_id))
        .unwrap()
        .unwrap();
    assert_eq!(node.parent_node_id, Some(country.community_id));
}

#[test]
fn polygon_is_rejected_without_writes() {
    let admin = admin();
    let creator = add_superuser(&admin, "root");

    let polygon = r#"{"type":"Polygon","coordinates":[[[0,0],[0,1],[1,1],[1,0],[0,0]]]}"#;
    let err = admin
        .create_community(creator, &request("Flat", polygon, 0, vec![]))
        .unwrap_err();

    assert!(matches!(err, AdminError::NoMultiPolygon));
    assert_eq!(counts(&admin), (0, 0));
}

#[test]
fn malformed_geojson_is_internal() {
    let admin = admin();
    let creator = add_superuser(&admin, "root");

    let err = admin
        .create_community(creator, &request("Broken", "{\"type\":", 0, vec![]))
        .unwrap_err();

    assert!(matches!(err, AdminError::Internal(_)));
    assert_eq!(counts(&admin), (0, 0));
}

#[test]
fn unknown_admin_rolls_back_node_and_cluster() {
    let admin = admin();
    let creator = add_superuser(&admin, "root");

    let err = admin
        .create_community(creator, &request("Ghost town", SQUARE, 0, vec![creator, 9999]))
        .unwrap_err();

    assert!(matches!(err, AdminError::Internal(_)));
    assert_eq!(counts(&admin), (0, 0));
}

#[test]
fn unknown_parent_is_rejected() {
    let admin = admin();
    let creator = add_superuser(&admin, "root");

    let err = admin
        .create_community(creator, &request("Orphan", SQUARE, 42, vec![]))
        .unwrap_err();

    assert!(matches!(err, AdminError::Internal(_)));
    assert_eq!(counts(&admin), (0, 0));
}
