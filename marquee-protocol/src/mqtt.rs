//! MQTT topic names
//!
//! Each data topic is published by home automation under
//! `<prefix>/all/module/<key>`. The sign subscribes to every data topic
//! except `ntp`, which is only settable over HTTP.

use core::fmt::Write;

use heapless::String;

use crate::topics::Topic;

/// Longest topic name the sign builds
pub const MAX_TOPIC_NAME_LEN: usize = 80;

/// Path between the prefix and the key
const MODULE_PATH: &str = "/all/module/";

/// Topic name longer than [`MAX_TOPIC_NAME_LEN`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TopicTooLong;

/// Whether the sign subscribes to `topic`
pub fn is_subscribed(topic: Topic) -> bool {
    topic != Topic::Ntp
}

/// Every subscribed topic, in key order
pub fn subscriptions() -> impl Iterator<Item = Topic> {
    Topic::ALL.into_iter().filter(|&t| is_subscribed(t))
}

/// Full MQTT topic name for `topic`
pub fn topic_name(prefix: &str, topic: Topic) -> Result<String<MAX_TOPIC_NAME_LEN>, TopicTooLong> {
    let mut name = String::new();
    write!(name, "{}{}{}", prefix, MODULE_PATH, topic.key()).map_err(|_| TopicTooLong)?;
    Ok(name)
}

/// Data topic named by an incoming publish, if the sign subscribes to it
pub fn parse_topic_name(prefix: &str, name: &str) -> Option<Topic> {
    let key = name.strip_prefix(prefix)?.strip_prefix(MODULE_PATH)?;
    Topic::from_key(key).filter(|&t| is_subscribed(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names() {
        assert_eq!(
            topic_name("givemeasign", Topic::Weather).unwrap().as_str(),
            "givemeasign/all/module/weather"
        );
        let long = "p".repeat(MAX_TOPIC_NAME_LEN);
        assert_eq!(topic_name(&long, Topic::Aqi), Err(TopicTooLong));
    }

    #[test]
    fn test_ntp_is_http_only() {
        assert!(!is_subscribed(Topic::Ntp));
        assert_eq!(subscriptions().count(), Topic::ALL.len() - 1);
        assert_eq!(parse_topic_name("givemeasign", "givemeasign/all/module/ntp"), None);
    }

    #[test]
    fn test_parse_incoming_names() {
        assert_eq!(
            parse_topic_name("hall", "hall/all/module/greet"),
            Some(Topic::Greet)
        );
        assert_eq!(parse_topic_name("hall", "hall/all/module/bogus"), None);
        assert_eq!(parse_topic_name("hall", "lobby/all/module/greet"), None);
        assert_eq!(parse_topic_name("hall", "hall/greet"), None);
    }

    #[test]
    fn test_every_subscription_parses_back() {
        for topic in subscriptions() {
            let name = topic_name("givemeasign", topic).unwrap();
            assert_eq!(parse_topic_name("givemeasign", &name), Some(topic));
        }
    }
}
