use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a stored enum column holds a value this build doesn't know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Enums persisted as lowercase text columns.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

text_enum! {
    /// Lifecycle of a request for lodging between a surfer and a host.
    HostRequestStatus, "host request status" {
        Pending => "pending",
        Accepted => "accepted",
        Rejected => "rejected",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
    }
}

text_enum! {
    MessageType, "message type" {
        Text => "text",
        ChatCreated => "chat_created",
        ChatEdited => "chat_edited",
        UserInvited => "user_invited",
        UserLeft => "user_left",
        UserMadeAdmin => "user_made_admin",
        UserRemovedAdmin => "user_removed_admin",
        HostRequestStatusChanged => "host_request_status_changed",
    }
}

text_enum! {
    GroupChatRole, "group chat role" {
        Admin => "admin",
        Participant => "participant",
    }
}

text_enum! {
    ClusterRole, "cluster role" {
        Admin => "admin",
        Member => "member",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trips_through_from_str() {
        for status in [
            HostRequestStatus::Pending,
            HostRequestStatus::Accepted,
            HostRequestStatus::Rejected,
            HostRequestStatus::Confirmed,
            HostRequestStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<HostRequestStatus>(), Ok(status));
        }
        assert_eq!(
            "host_request_status_changed".parse::<MessageType>(),
            Ok(MessageType::HostRequestStatusChanged)
        );
    }

    #[test]
    fn unknown_text_is_rejected() {
        let err = "owner".parse::<GroupChatRole>().unwrap_err();
        assert_eq!(err.kind, "group chat role");
        assert_eq!(err.to_string(), "unknown group chat role value: \"owner\"");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&MessageType::UserMadeAdmin).unwrap();
        assert_eq!(json, "\"user_made_admin\"");
    }
}
