mod common;

use chrono::NaiveDate;

use roost_db::chats;
use roost_db::columns::timestamp_to_sql;
use roost_db::models::{NewHostRequest, NewMessage};
use roost_types::api::UserRequest;
use roost_types::models::{GroupChatRole, HostRequestStatus, MessageType};

use common::{add_user, admin, at};

fn chats_of(admin: &roost_api::Admin, user: &str) -> String {
    admin
        .get_chats(&UserRequest {
            user: user.to_string(),
        })
        .unwrap()
        .response
}

fn text_message(conversation_id: i64, author_id: i64, hour: u32, text: &str) -> NewMessage<'_> {
    NewMessage {
        conversation_id,
        author_id,
        time: at(hour, 0),
        message_type: MessageType::Text,
        text: Some(text),
        host_request_status_target: None,
    }
}

#[test]
fn user_without_chats_gets_header_and_empty_sections() {
    let admin = admin();
    add_user(&admin, "alice");

    assert_eq!(
        chats_of(&admin, "alice"),
        "Chats for user Alice Person (alice, 1)\n\
         ************************************* Requests (0)\n\
         ************************************* Group chats (0)\n"
    );
}

#[test]
fn renders_host_requests_and_group_chats() {
    let admin = admin();
    let alice = add_user(&admin, "alice");
    let bob = add_user(&admin, "bob");

    admin
        .db()
        .with_conn(|conn| {
            let request = chats::insert_host_request(
                conn,
                &NewHostRequest {
                    surfer_user_id: alice,
                    host_user_id: bob,
                    status: HostRequestStatus::Pending,
                    from_date: NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
                    to_date: NaiveDate::from_ymd_opt(2021, 7, 4).unwrap(),
                    created: at(8, 0),
                },
            )?;
            chats::insert_message(conn, &text_message(request, alice, 10, "Hi Bob"))?;

            let chat = chats::insert_group_chat(conn, Some("Trip"), false, bob, at(9, 0))?;
            chats::insert_group_chat_subscription(conn, bob, chat, at(9, 0), None, GroupChatRole::Admin)?;
            chats::insert_group_chat_subscription(
                conn,
                alice,
                chat,
                at(9, 30),
                Some(at(11, 0)),
                GroupChatRole::Participant,
            )?;
            chats::insert_message(
                conn,
                &NewMessage {
                    conversation_id: chat,
                    author_id: bob,
                    time: at(9, 45),
                    message_type: MessageType::ChatCreated,
                    text: None,
                    host_request_status_target: None,
                },
            )?;
            Ok(())
        })
        .unwrap();

    let expected = [
        "Chats for user Alice Person (alice, 1)\n",
        "************************************* Requests (1)\n",
        "==============================\n",
        "Host request 1 from Alice Person (alice, 1) to Bob Person (bob, 2).\n",
        "Current state = pending\n",
        "\n",
        "Messages:\n",
        "Message 1 by Alice Person (alice, 1) at 2021-06-01 10:00:00+00:00\n",
        "Type=text, host_req_status_change=None\n",
        "\n",
        "Hi Bob",
        "\n\n-----\n",
        "\n\n\n\n",
        "\n\n\n\n",
        "************************************* Group chats (1)\n",
        "==============================\n",
        "Group chat 2. Created by Bob Person (bob, 2), is_dm=false\n",
        "Name: Trip\n",
        "Members:\n",
        "Bob Person (bob, 2) joined at 2021-06-01 09:00:00+00:00 (left at None), role=admin\n",
        "Alice Person (alice, 1) joined at 2021-06-01 09:30:00+00:00 (left at 2021-06-01 11:00:00+00:00), role=participant\n",
        "\n\nMessages:\n",
        "Message 2 by Bob Person (bob, 2) at 2021-06-01 09:45:00+00:00\n",
        "Type=chat_created, host_req_status_change=None\n",
        "\n",
        "None",
        "\n\n-----\n",
        "\n\n\n\n",
        "\n\n\n\n",
    ]
    .concat();

    assert_eq!(chats_of(&admin, "alice"), expected);

    // Bob sees the same conversations from the host side.
    let bob_export = chats_of(&admin, "bob");
    assert!(bob_export.starts_with("Chats for user Bob Person (bob, 2)\n"));
    assert!(bob_export.contains("Requests (1)"));
    assert!(bob_export.contains("Group chats (1)"));
}

#[test]
fn messages_are_ordered_by_id_not_insertion_or_time() {
    let admin = admin();
    let alice = add_user(&admin, "alice");
    let bob = add_user(&admin, "bob");

    admin
        .db()
        .with_conn(|conn| {
            let request = chats::insert_host_request(
                conn,
                &NewHostRequest {
                    surfer_user_id: alice,
                    host_user_id: bob,
                    status: HostRequestStatus::Accepted,
                    from_date: NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
                    to_date: NaiveDate::from_ymd_opt(2021, 7, 2).unwrap(),
                    created: at(8, 0),
                },
            )?;
            // Inserted out of id order, with times running backwards.
            for (id, hour) in [(30, 9), (10, 14), (20, 12)] {
                conn.execute(
                    "INSERT INTO messages (id, conversation_id, author_id, time, message_type, text)
                     VALUES (?1, ?2, ?3, ?4, 'text', ?5)",
                    rusqlite::params![id, request, alice, timestamp_to_sql(&at(hour, 0)), format!("m{}", id)],
                )?;
            }
            Ok(())
        })
        .unwrap();

    let export = chats_of(&admin, "alice");
    let first = export.find("Message 10 ").unwrap();
    let second = export.find("Message 20 ").unwrap();
    let third = export.find("Message 30 ").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn group_chats_follow_join_time() {
    let admin = admin();
    let alice = add_user(&admin, "alice");
    let bob = add_user(&admin, "bob");

    let (joined_late, joined_early) = admin
        .db()
        .with_conn(|conn| {
            let late = chats::insert_group_chat(conn, Some("Late"), false, bob, at(7, 0))?;
            let early = chats::insert_group_chat(conn, Some("Early"), true, bob, at(7, 0))?;
            chats::insert_group_chat_subscription(conn, alice, late, at(12, 0), None, GroupChatRole::Participant)?;
            chats::insert_group_chat_subscription(conn, alice, early, at(8, 0), None, GroupChatRole::Participant)?;
            chats::insert_message(conn, &text_message(late, bob, 13, "later"))?;
            Ok((late, early))
        })
        .unwrap();

    let export = chats_of(&admin, "alice");
    assert!(export.contains("Group chats (2)"));
    let early_pos = export.find(&format!("Group chat {}.", joined_early)).unwrap();
    let late_pos = export.find(&format!("Group chat {}.", joined_late)).unwrap();
    assert!(early_pos < late_pos);
    assert!(export.contains("is_dm=true\nName: Early\n"));
}

#[test]
fn rejoined_chat_is_listed_per_membership() {
    let admin = admin();
    let alice = add_user(&admin, "alice");

    admin
        .db()
        .with_conn(|conn| {
            let chat = chats::insert_group_chat(conn, None, false, alice, at(7, 0))?;
            chats::insert_group_chat_subscription(conn, alice, chat, at(7, 0), Some(at(8, 0)), GroupChatRole::Admin)?;
            chats::insert_group_chat_subscription(conn, alice, chat, at(9, 0), None, GroupChatRole::Participant)?;
            Ok(())
        })
        .unwrap();

    let export = chats_of(&admin, "alice");
    assert!(export.contains("Group chats (2)"));
    assert_eq!(export.matches("Name: None\n").count(), 2);
}

#[test]
fn message_without_text_prints_none_body() {
    let admin = admin();
    let alice = add_user(&admin, "alice");

    admin
        .db()
        .with_conn(|conn| {
            let chat = chats::insert_group_chat(conn, Some("Quiet"), false, alice, at(7, 0))?;
            chats::insert_group_chat_subscription(conn, alice, chat, at(7, 0), None, GroupChatRole::Admin)?;
            chats::insert_message(
                conn,
                &NewMessage {
                    conversation_id: chat,
                    author_id: alice,
                    time: at(7, 0),
                    message_type: MessageType::ChatCreated,
                    text: None,
                    host_request_status_target: None,
                },
            )?;
            Ok(())
        })
        .unwrap();

    let export = chats_of(&admin, "alice");
    assert!(export.contains("Type=chat_created, host_req_status_change=None\n\nNone\n\n-----\n"));
}
