use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::identifiers::{PageLocator, UserId};

/// One remote ticket. Every field is carried through untouched; only the two
/// user references are interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket {
    pub fields: Map<String, Value>,
}

impl Ticket {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn requester_id(&self) -> Option<UserId> {
        self.user_reference("requester_id")
    }

    pub fn assignee_id(&self) -> Option<UserId> {
        self.user_reference("assignee_id")
    }

    fn user_reference(&self, key: &str) -> Option<UserId> {
        self.fields
            .get(key)
            .and_then(json_value_to_non_empty_string)
            .map(UserId::from)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User {
    pub fields: Map<String, Value>,
}

impl User {
    pub fn id(&self) -> Option<UserId> {
        self.fields
            .get("id")
            .and_then(json_value_to_non_empty_string)
            .map(UserId::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default, deserialize_with = "deserialize_optional_locator")]
    pub next: Option<PageLocator>,
    #[serde(default, deserialize_with = "deserialize_optional_locator")]
    pub prev: Option<PageLocator>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TicketPage {
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub links: PageLinks,
}

impl TicketPage {
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

/// Serializes as the ticket's own fields with `requester` and `assignee`
/// replaced by the fetched user records.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTicket {
    pub ticket: Ticket,
    pub requester: User,
    pub assignee: User,
}

impl Serialize for EnrichedTicket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.ticket.fields {
            if key != "requester" && key != "assignee" {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry("requester", &self.requester)?;
        map.serialize_entry("assignee", &self.assignee)?;
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::Forward => "next",
            Self::Backward => "prev",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "next" | "forward" => Some(Self::Forward),
            "prev" | "backward" => Some(Self::Backward),
            _ => None,
        }
    }

}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::from_key(raw).ok_or_else(|| {
            CoreError::Configuration(format!(
                "direction must be either 'prev' or 'next', got '{raw}'"
            ))
        })
    }
}

pub(crate) fn json_value_to_non_empty_string(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => {
            let normalized = raw.trim();
            if normalized.is_empty() {
                None
            } else {
                Some(normalized.to_owned())
            }
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn deserialize_optional_locator<'de, D>(deserializer: D) -> Result<Option<PageLocator>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .map(PageLocator::from))
}
