//! MQTT subscriber
//!
//! Subscribes to every data topic under the configured prefix and hands
//! each valid JSON publish to the app task, like an HTTP push. The
//! connection is rebuilt after any error.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::{Duration, Timer};
use portable_atomic::Ordering;
use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;
use rust_mqtt::utils::rng_generator::CountingRng;

use marquee_core::config::NetworkConfig;
use marquee_core::data::{parse_document, IngestError, Value};
use marquee_protocol::mqtt::{parse_topic_name, subscriptions, topic_name};
use marquee_protocol::{Severity, Topic};

use crate::channels::{Inbound, INBOUND, MQTT_UP};
use crate::syslog;

/// Largest MQTT packet; a full topic document plus headers
const PACKET_SIZE: usize = 4096;

/// Socket buffer sizes
const SOCKET_BUFFER_SIZE: usize = 1024;

/// Broker keep-alive in seconds
const KEEP_ALIVE_S: u16 = 60;

/// Ping well inside the keep-alive window
const PING_INTERVAL: Duration = Duration::from_secs(KEEP_ALIVE_S as u64 / 2);

/// Wait before reconnecting
const RECONNECT_DELAY: Duration = Duration::from_secs(10);

/// User name and password, set at build time
const USERNAME: Option<&str> = option_env!("MQTT_USERNAME");
const PASSWORD: Option<&str> = option_env!("MQTT_PASSWORD");

/// Why a session ended
#[derive(Debug)]
enum SessionError {
    Dns,
    Connect,
    Mqtt(ReasonCode),
}

/// One thing that happened on an open session
enum Event {
    Publish(Option<Topic>, Result<Value, IngestError>),
    PingDue,
    Lost(ReasonCode),
}

/// MQTT task
#[embassy_executor::task]
pub async fn mqtt_task(stack: Stack<'static>, network: &'static NetworkConfig) -> ! {
    info!("MQTT task started, broker {}", network.mqtt_broker.as_str());

    let mut rx_buffer = [0u8; SOCKET_BUFFER_SIZE];
    let mut tx_buffer = [0u8; SOCKET_BUFFER_SIZE];
    let mut recv_packet = [0u8; PACKET_SIZE];
    let mut send_packet = [0u8; PACKET_SIZE];

    loop {
        stack.wait_config_up().await;

        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        let result = session(
            stack,
            network,
            &mut socket,
            &mut send_packet,
            &mut recv_packet,
        )
        .await;
        MQTT_UP.store(false, Ordering::Relaxed);
        socket.abort();

        if let Err(e) = result {
            warn!("MQTT session ended: {:?}", Debug2Format(&e));
            syslog::emit(Severity::Warning, format_args!("mqtt disconnected"));
        }
        Timer::after(RECONNECT_DELAY).await;
    }
}

async fn session(
    stack: Stack<'static>,
    network: &NetworkConfig,
    socket: &mut TcpSocket<'_>,
    send_packet: &mut [u8],
    recv_packet: &mut [u8],
) -> Result<(), SessionError> {
    let address = stack
        .dns_query(network.mqtt_broker.as_str(), DnsQueryType::A)
        .await
        .ok()
        .and_then(|addresses| addresses.first().copied())
        .ok_or(SessionError::Dns)?;
    socket
        .connect((address, network.mqtt_port))
        .await
        .map_err(|_| SessionError::Connect)?;

    let mut config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20_000));
    config.add_max_subscribe_qos(QualityOfService::QoS0);
    config.add_client_id(network.mqtt_client_id.as_str());
    config.max_packet_size = PACKET_SIZE as u32;
    config.keep_alive = KEEP_ALIVE_S;
    if let Some(username) = USERNAME {
        config.add_username(username);
    }
    if let Some(password) = PASSWORD {
        config.add_password(password);
    }

    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        send_packet,
        PACKET_SIZE,
        recv_packet,
        PACKET_SIZE,
        config,
    );
    client.connect_to_broker().await.map_err(SessionError::Mqtt)?;

    let prefix = network.mqtt_topic_prefix.as_str();
    for topic in subscriptions() {
        let Ok(name) = topic_name(prefix, topic) else {
            warn!("MQTT topic name too long for {}", topic);
            continue;
        };
        client
            .subscribe_to_topic(name.as_str())
            .await
            .map_err(SessionError::Mqtt)?;
    }
    info!("MQTT subscribed under {}/all/module", prefix);
    syslog::emit(Severity::Info, format_args!("mqtt connected"));
    MQTT_UP.store(true, Ordering::Relaxed);

    loop {
        let event = match select(client.receive_message(), Timer::after(PING_INTERVAL)).await {
            Either::First(Ok((name, payload))) => {
                Event::Publish(parse_topic_name(prefix, name), parse_document(payload))
            }
            Either::First(Err(code)) => Event::Lost(code),
            Either::Second(()) => Event::PingDue,
        };

        match event {
            Event::Publish(Some(topic), Ok(value)) => {
                INBOUND.send(Inbound::Store(topic, value)).await;
            }
            Event::Publish(Some(topic), Err(e)) => {
                warn!("MQTT {} rejected: {:?}", topic, e);
                syslog::emit(
                    Severity::Error,
                    format_args!("mqtt store_data({}) failed: {:?}", topic.key(), e),
                );
            }
            Event::Publish(None, _) => debug!("MQTT publish on unknown topic"),
            Event::PingDue => client.send_ping().await.map_err(SessionError::Mqtt)?,
            Event::Lost(code) => return Err(SessionError::Mqtt(code)),
        }
    }
}
