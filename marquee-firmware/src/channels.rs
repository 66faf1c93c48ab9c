//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Only the app task touches the data store; everything else talks to it
//! through these.

use alloc::vec::Vec;
use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::String;
use portable_atomic::{AtomicBool, AtomicU32};

use marquee_core::data::{NtpSettings, Value};
use marquee_display::Framebuffer;
use marquee_protocol::syslog::MAX_LINE_LEN;
use marquee_protocol::Topic;

/// Number of persisted topics
pub const TOPIC_COUNT: usize = Topic::ALL.len();

/// Syslog lines buffered while the network is down
const SYSLOG_CHANNEL_SIZE: usize = 8;

/// Channel capacity for inbound writes
const INBOUND_CHANNEL_SIZE: usize = 4;

/// Read-only documents the HTTP task can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Query {
    /// Whole data store snapshot
    Data,
    /// Device status
    Info,
}

/// Work submitted to the app task
pub enum Inbound {
    /// Store a validated document under a topic
    Store(Topic, Value),
    /// Set the platform clock to unix seconds
    SetTime(u64),
    /// Answer a query on `REPLY`
    Query(Query),
}

/// Writes and queries from the HTTP and NTP tasks
pub static INBOUND: Channel<CriticalSectionRawMutex, Inbound, INBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Serialized answer to the last `Inbound::Query`, or None on failure
pub static REPLY: Signal<CriticalSectionRawMutex, Option<Vec<u8>>> = Signal::new();

/// Encoded records waiting to be written to flash, by topic slot
pub static UNSAVED: Mutex<CriticalSectionRawMutex, RefCell<[Option<Vec<u8>>; TOPIC_COUNT]>> =
    Mutex::new(RefCell::new([const { None }; TOPIC_COUNT]));

/// Signal that `UNSAVED` holds new records
pub static SAVE_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// NTP settings changed through the `ntp` topic
pub static NTP_SETTINGS: Signal<CriticalSectionRawMutex, NtpSettings> = Signal::new();

/// DHCP lease address
pub static NET_ADDRESS: Signal<CriticalSectionRawMutex, [u8; 4]> = Signal::new();

/// Set once the WiFi link and DHCP lease are up
pub static NET_UP: AtomicBool = AtomicBool::new(false);

/// DHCP lease address as a big-endian u32, 0 before the first lease
pub static LEASE: AtomicU32 = AtomicU32::new(0);

/// Set while subscribed to the MQTT broker
pub static MQTT_UP: AtomicBool = AtomicBool::new(false);

/// Syslog lines waiting to be sent
pub static SYSLOG: Channel<CriticalSectionRawMutex, String<MAX_LINE_LEN>, SYSLOG_CHANNEL_SIZE> =
    Channel::new();

/// Frame shared between the app task (renders) and the display task (scans)
pub static FRAME: Mutex<CriticalSectionRawMutex, RefCell<Framebuffer>> =
    Mutex::new(RefCell::new(Framebuffer::new()));

/// Signal that `FRAME` holds a new frame
pub static FRAME_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();
