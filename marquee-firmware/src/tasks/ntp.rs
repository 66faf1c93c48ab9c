//! SNTP time sync
//!
//! Syncs once the network is up, then every refresh interval. Settings
//! pushed to the `ntp` topic replace the configured defaults.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Timer};

use marquee_core::data::NtpSettings;
use marquee_protocol::ntp::{parse_reply, request_packet};
use marquee_protocol::{Severity, NTP_PACKET_SIZE, NTP_PORT};

use crate::channels::{Inbound, INBOUND, NTP_SETTINGS};
use crate::syslog;

/// Wait before retrying a failed sync
const RETRY_DELAY: Duration = Duration::from_secs(60);

/// Time allowed for a server reply
const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a sync attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum SyncError {
    Dns,
    NoAddress,
    Socket,
    Timeout,
    Reply(marquee_protocol::NtpError),
}

/// NTP task
#[embassy_executor::task]
pub async fn ntp_task(stack: Stack<'static>, defaults: NtpSettings) -> ! {
    info!("NTP task started");
    let mut settings = defaults;
    stack.wait_config_up().await;

    loop {
        let wait = match fetch_time(stack, settings.server.as_str()).await {
            Ok(epoch) => {
                info!("NTP time {} from {}", epoch, settings.server.as_str());
                INBOUND.send(Inbound::SetTime(epoch)).await;
                match settings.refresh_interval_s {
                    0 => None,
                    secs => Some(Duration::from_secs(secs)),
                }
            }
            Err(e) => {
                warn!("NTP sync failed: {:?}", e);
                syslog::emit(Severity::Warning, format_args!("ntp sync failed: {:?}", e));
                Some(RETRY_DELAY)
            }
        };

        // A settings change always triggers an immediate sync
        settings = match wait {
            Some(delay) => match select(Timer::after(delay), NTP_SETTINGS.wait()).await {
                Either::First(()) => settings,
                Either::Second(new) => new,
            },
            None => NTP_SETTINGS.wait().await,
        };
    }
}

async fn fetch_time(stack: Stack<'static>, server: &str) -> Result<u64, SyncError> {
    let addresses = stack
        .dns_query(server, DnsQueryType::A)
        .await
        .map_err(|_| SyncError::Dns)?;
    let address = *addresses.first().ok_or(SyncError::NoAddress)?;

    let mut rx_meta = [PacketMetadata::EMPTY; 1];
    let mut rx_buffer = [0; 128];
    let mut tx_meta = [PacketMetadata::EMPTY; 1];
    let mut tx_buffer = [0; 128];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket.bind(0).map_err(|_| SyncError::Socket)?;

    socket
        .send_to(&request_packet(), (address, NTP_PORT))
        .await
        .map_err(|_| SyncError::Socket)?;

    let mut reply = [0u8; NTP_PACKET_SIZE];
    let (n, _from) = with_timeout(REPLY_TIMEOUT, socket.recv_from(&mut reply))
        .await
        .map_err(|_| SyncError::Timeout)?
        .map_err(|_| SyncError::Socket)?;

    parse_reply(&reply[..n]).map_err(SyncError::Reply)
}
