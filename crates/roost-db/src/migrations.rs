use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id            INTEGER PRIMARY KEY,
                username      TEXT NOT NULL UNIQUE,
                email         TEXT NOT NULL UNIQUE,
                name          TEXT NOT NULL,
                gender        TEXT NOT NULL,
                birthdate     TEXT NOT NULL,
                is_banned     INTEGER NOT NULL DEFAULT 0,
                is_deleted    INTEGER NOT NULL DEFAULT 0,
                is_superuser  INTEGER NOT NULL DEFAULT 0,
                joined        TEXT NOT NULL
            );

            CREATE TABLE sessions (
                id          INTEGER PRIMARY KEY,
                token_hash  TEXT NOT NULL UNIQUE,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                created     TEXT NOT NULL,
                expiry      TEXT NOT NULL,
                long_lived  INTEGER NOT NULL,
                is_api_key  INTEGER NOT NULL
            );

            CREATE INDEX idx_sessions_user ON sessions(user_id);

            CREATE TABLE nodes (
                id              INTEGER PRIMARY KEY,
                parent_node_id  INTEGER REFERENCES nodes(id),
                geom            TEXT NOT NULL,
                created         TEXT NOT NULL
            );

            CREATE TABLE clusters (
                id                   INTEGER PRIMARY KEY,
                parent_node_id       INTEGER NOT NULL REFERENCES nodes(id),
                name                 TEXT NOT NULL,
                slug                 TEXT NOT NULL,
                description          TEXT NOT NULL,
                is_official_cluster  INTEGER NOT NULL,
                created              TEXT NOT NULL
            );

            -- At most one official community per node
            CREATE UNIQUE INDEX idx_clusters_official
                ON clusters(parent_node_id) WHERE is_official_cluster = 1;

            CREATE TABLE cluster_subscriptions (
                id          INTEGER PRIMARY KEY,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                cluster_id  INTEGER NOT NULL REFERENCES clusters(id),
                role        TEXT NOT NULL,
                UNIQUE(user_id, cluster_id)
            );

            CREATE TABLE pages (
                id                INTEGER PRIMARY KEY,
                owner_cluster_id  INTEGER NOT NULL REFERENCES clusters(id),
                creator_user_id   INTEGER NOT NULL REFERENCES users(id),
                title             TEXT NOT NULL,
                content           TEXT NOT NULL,
                created           TEXT NOT NULL
            );

            CREATE TABLE conversations (
                id       INTEGER PRIMARY KEY,
                created  TEXT NOT NULL
            );

            CREATE TABLE host_requests (
                conversation_id  INTEGER PRIMARY KEY REFERENCES conversations(id),
                surfer_user_id   INTEGER NOT NULL REFERENCES users(id),
                host_user_id     INTEGER NOT NULL REFERENCES users(id),
                status           TEXT NOT NULL,
                from_date        TEXT NOT NULL,
                to_date          TEXT NOT NULL
            );

            CREATE INDEX idx_host_requests_surfer ON host_requests(surfer_user_id);
            CREATE INDEX idx_host_requests_host ON host_requests(host_user_id);

            CREATE TABLE group_chats (
                conversation_id  INTEGER PRIMARY KEY REFERENCES conversations(id),
                title            TEXT,
                is_dm            INTEGER NOT NULL,
                creator_id       INTEGER NOT NULL REFERENCES users(id)
            );

            CREATE TABLE group_chat_subscriptions (
                id             INTEGER PRIMARY KEY,
                user_id        INTEGER NOT NULL REFERENCES users(id),
                group_chat_id  INTEGER NOT NULL REFERENCES group_chats(conversation_id),
                joined_at      TEXT NOT NULL,
                left_at        TEXT,
                role           TEXT NOT NULL
            );

            CREATE INDEX idx_group_chat_subscriptions_user
                ON group_chat_subscriptions(user_id, joined_at);
            CREATE INDEX idx_group_chat_subscriptions_chat
                ON group_chat_subscriptions(group_chat_id, joined_at);

            CREATE TABLE messages (
                id                          INTEGER PRIMARY KEY AUTOINCREMENT,
                conversation_id             INTEGER NOT NULL REFERENCES conversations(id),
                author_id                   INTEGER NOT NULL REFERENCES users(id),
                time                        TEXT NOT NULL,
                message_type                TEXT NOT NULL,
                text                        TEXT,
                host_request_status_target  TEXT
            );

            CREATE INDEX idx_messages_conversation ON messages(conversation_id, id);

            CREATE TABLE notifications (
                id         INTEGER PRIMARY KEY,
                user_id    INTEGER NOT NULL REFERENCES users(id),
                topic      TEXT NOT NULL,
                topic_key  TEXT NOT NULL,
                action     TEXT NOT NULL,
                icon       TEXT NOT NULL,
                title      TEXT NOT NULL,
                link       TEXT NOT NULL,
                created    TEXT NOT NULL
            );

            CREATE TABLE email_outbox (
                id         INTEGER PRIMARY KEY,
                recipient  TEXT NOT NULL,
                subject    TEXT NOT NULL,
                body       TEXT NOT NULL,
                created    TEXT NOT NULL
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
