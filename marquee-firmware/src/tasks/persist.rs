//! Data store persistence
//!
//! Each topic's record lives under its own flash key, so one large
//! document never blocks the others from being saved. Writes are held
//! back briefly so bursts of pushes cost one flash write per topic.

use alloc::vec;
use defmt::*;
use embassy_time::{Duration, Timer};

use marquee_core::data::{DataStore, MAX_DOCUMENT_SIZE};
use marquee_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey, MAX_ITEM_SIZE};
use marquee_hal_rp2040::FlashStorageTrait;
use marquee_protocol::Topic;

use crate::channels::{SAVE_READY, TOPIC_COUNT, UNSAVED};

/// Quiet time after a change before writing
const WRITE_DELAY: Duration = Duration::from_secs(10);

/// Room for a record's bookkeeping around its document
const RECORD_OVERHEAD: usize = 64;

const _: () = core::assert!(MAX_DOCUMENT_SIZE + RECORD_OVERHEAD <= MAX_ITEM_SIZE);

/// Load every saved record
pub async fn restore(storage: &mut FlashStorage<'_>) -> DataStore {
    let mut store = DataStore::new();
    let mut buffer = vec![0u8; MAX_ITEM_SIZE];

    for topic in Topic::ALL {
        match storage.read(StorageKey::Record(topic.slot()), &mut buffer).await {
            Ok(len) => {
                if store.restore_record(topic.key(), &buffer[..len]).is_err() {
                    warn!("Dropped corrupt {} record", topic);
                }
            }
            Err(FlashError::NotFound) => {}
            Err(e) => warn!("{} record read failed: {:?}", topic, e),
        }
    }
    store
}

/// Persistence task
#[embassy_executor::task]
pub async fn persist_task(mut storage: FlashStorage<'static>) -> ! {
    info!("Persist task started");

    loop {
        SAVE_READY.wait().await;
        Timer::after(WRITE_DELAY).await;
        SAVE_READY.reset();

        let pending = UNSAVED.lock(|unsaved| {
            core::mem::replace(&mut *unsaved.borrow_mut(), [const { None }; TOPIC_COUNT])
        });

        for (topic, record) in Topic::ALL.iter().zip(pending) {
            let Some(record) = record else {
                continue;
            };
            match storage.write(StorageKey::Record(topic.slot()), &record).await {
                Ok(()) => debug!("Saved {} ({} bytes)", topic, record.len()),
                Err(FlashError::Full) => {
                    warn!("Storage full, {} record ({} bytes) not saved", topic, record.len())
                }
                Err(e) => warn!("{} record write failed: {:?}", topic, e),
            }
        }
    }
}
