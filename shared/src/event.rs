//! User lifecycle events and their text wire encoding

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque user identifier
pub type User = i32;

/// Numeric tag leading every encoded event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EventType {
    UserRegistered = 0,
    UserRenamed = 1,
    UserDealWon = 2,
    UserConnected = 3,
    UserDisconnected = 4,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::UserRegistered,
        EventType::UserRenamed,
        EventType::UserDealWon,
        EventType::UserConnected,
        EventType::UserDisconnected,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for EventType {
    type Error = DecodeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(EventType::UserRegistered),
            1 => Ok(EventType::UserRenamed),
            2 => Ok(EventType::UserDealWon),
            3 => Ok(EventType::UserConnected),
            4 => Ok(EventType::UserDisconnected),
            other => Err(DecodeError::UnknownType(other)),
        }
    }
}

/// Reasons a line cannot be turned into an [`Event`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid number `{value}` in field `{field}`")]
    InvalidNumber { field: &'static str, value: String },
    #[error("unknown event type {0}")]
    UnknownType(i32),
}

/// A single business event about one user
///
/// `time` on deal events is a sender-supplied nanosecond timestamp, not the
/// receiver's clock. `amount` is signed so losses lower a user's total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    UserRegistered { user: User, name: String },
    UserRenamed { user: User, name: String },
    UserDealWon { user: User, time: i64, amount: i64 },
    UserConnected { user: User },
    UserDisconnected { user: User },
}

impl Event {
    pub fn user(&self) -> User {
        match self {
            Event::UserRegistered { user, .. }
            | Event::UserRenamed { user, .. }
            | Event::UserDealWon { user, .. }
            | Event::UserConnected { user }
            | Event::UserDisconnected { user } => *user,
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            Event::UserRegistered { .. } => EventType::UserRegistered,
            Event::UserRenamed { .. } => EventType::UserRenamed,
            Event::UserDealWon { .. } => EventType::UserDealWon,
            Event::UserConnected { .. } => EventType::UserConnected,
            Event::UserDisconnected { .. } => EventType::UserDisconnected,
        }
    }

    /// Decodes one event from a whitespace separated line.
    ///
    /// Tokens after the last field of the event kind are ignored, so a line
    /// truncated by the transport either fails here or decodes to a
    /// complete event.
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let mut tokens = line.split_whitespace();

        let code: i32 = parse_field(tokens.next(), "type")?;
        let event_type = EventType::try_from(code)?;
        let user: User = parse_field(tokens.next(), "user")?;

        let event = match event_type {
            EventType::UserRegistered => Event::UserRegistered {
                user,
                name: text_field(tokens.next(), "name")?,
            },
            EventType::UserRenamed => Event::UserRenamed {
                user,
                name: text_field(tokens.next(), "name")?,
            },
            EventType::UserDealWon => Event::UserDealWon {
                user,
                time: parse_field(tokens.next(), "time")?,
                amount: parse_field(tokens.next(), "amount")?,
            },
            EventType::UserConnected => Event::UserConnected { user },
            EventType::UserDisconnected => Event::UserDisconnected { user },
        };

        Ok(event)
    }
}

fn text_field(token: Option<&str>, field: &'static str) -> Result<String, DecodeError> {
    token
        .map(str::to_owned)
        .ok_or(DecodeError::MissingField(field))
}

fn parse_field<T: FromStr>(token: Option<&str>, field: &'static str) -> Result<T, DecodeError> {
    let token = token.ok_or(DecodeError::MissingField(field))?;
    token.parse().map_err(|_| DecodeError::InvalidNumber {
        field,
        value: token.to_owned(),
    })
}

impl FromStr for Event {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Event::decode(s)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.event_type().code(), self.user())?;
        match self {
            Event::UserRegistered { name, .. } | Event::UserRenamed { name, .. } => {
                write!(f, " {}", name)
            }
            Event::UserDealWon { time, amount, .. } => write!(f, " {} {}", time, amount),
            Event::UserConnected { .. } | Event::UserDisconnected { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_registered() {
        let event = Event::decode("0 17 alice").unwrap();
        assert_eq!(
            event,
            Event::UserRegistered {
                user: 17,
                name: "alice".to_string()
            }
        );
    }

    #[test]
    fn test_decode_deal_won_negative_amount() {
        let event: Event = "2 5 123456789 -250".parse().unwrap();
        match event {
            Event::UserDealWon { user, time, amount } => {
                assert_eq!(user, 5);
                assert_eq!(time, 123456789);
                assert_eq!(amount, -250);
            }
            _ => panic!("Wrong event type after decoding"),
        }
    }

    #[test]
    fn test_decode_connection_events() {
        assert_eq!(
            Event::decode("3 8").unwrap(),
            Event::UserConnected { user: 8 }
        );
        assert_eq!(
            Event::decode("4 8\n").unwrap(),
            Event::UserDisconnected { user: 8 }
        );
    }

    #[test]
    fn test_decode_unknown_type() {
        assert_eq!(Event::decode("7 1"), Err(DecodeError::UnknownType(7)));
        assert_eq!(Event::decode("-1 1"), Err(DecodeError::UnknownType(-1)));
    }

    #[test]
    fn test_decode_missing_fields() {
        assert_eq!(Event::decode(""), Err(DecodeError::MissingField("type")));
        assert_eq!(Event::decode("0"), Err(DecodeError::MissingField("user")));
        assert_eq!(Event::decode("1 3"), Err(DecodeError::MissingField("name")));
        assert_eq!(
            Event::decode("2 3 1000"),
            Err(DecodeError::MissingField("amount"))
        );
    }

    #[test]
    fn test_decode_invalid_numbers() {
        assert!(matches!(
            Event::decode("x 1"),
            Err(DecodeError::InvalidNumber { field: "type", .. })
        ));
        assert!(matches!(
            Event::decode("2 1 10 12ab"),
            Err(DecodeError::InvalidNumber { field: "amount", .. })
        ));
        assert!(matches!(
            Event::decode("3 99999999999"),
            Err(DecodeError::InvalidNumber { field: "user", .. })
        ));
    }

    #[test]
    fn test_encode_matches_wire_format() {
        let renamed = Event::UserRenamed {
            user: 2,
            name: "bob".to_string(),
        };
        assert_eq!(renamed.to_string(), "1 2 bob");

        let deal = Event::UserDealWon {
            user: 3,
            time: 60_000_000_000,
            amount: -7,
        };
        assert_eq!(deal.to_string(), "2 3 60000000000 -7");

        assert_eq!(Event::UserConnected { user: 4 }.to_string(), "3 4");
    }

    #[test]
    fn test_encoded_event_decodes_back() {
        let event = Event::UserDealWon {
            user: -3,
            time: i64::MAX,
            amount: i64::MIN,
        };
        assert_eq!(Event::decode(&event.to_string()).unwrap(), event);
    }

    #[test]
    fn test_event_type_codes() {
        for event_type in EventType::ALL {
            assert_eq!(EventType::try_from(event_type.code()), Ok(event_type));
        }
    }
}
