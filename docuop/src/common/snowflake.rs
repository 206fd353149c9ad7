use log::{info, warn};
use rand::rngs::OsRng;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use parking_lot::Mutex;

const NODE_ID_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const EPOCH_MILLIS: u64 = 1288834974657;

/// Generates time-ordered 64-bit identifiers for documents inserted without `_id`.
pub(crate) struct SnowflakeIdGenerator {
    node_id: u64,
    sequence: AtomicU64,
    last_timestamp: AtomicU64,
    mutex: Mutex<()>,
}

impl SnowflakeIdGenerator {
    pub(crate) fn new() -> Self {
        let max_node_id = (1_u64 << NODE_ID_BITS) - 1;
        let mut node_id = OsRng.gen::<u64>() & max_node_id;
        if node_id == 0 {
            warn!("Random node id was zero, falling back to 1");
            node_id = 1;
        }
        info!("Initialized object id generator with node id: {}", node_id);

        SnowflakeIdGenerator {
            node_id,
            sequence: AtomicU64::new(0),
            last_timestamp: AtomicU64::new(0),
            mutex: Mutex::new(()),
        }
    }

    pub(crate) fn next_id(&self) -> u64 {
        let _guard = self.mutex.lock();

        let now = current_millis();
        let last = self.last_timestamp.load(Ordering::Relaxed);
        // clock moved backwards: keep issuing ids from the last seen millisecond
        let timestamp = now.max(last);

        let sequence = if timestamp == last {
            (self.sequence.fetch_add(1, Ordering::Relaxed) + 1) & ((1 << SEQUENCE_BITS) - 1)
        } else {
            self.sequence.store(0, Ordering::Relaxed);
            0
        };
        self.last_timestamp.store(timestamp, Ordering::Relaxed);

        ((timestamp.saturating_sub(EPOCH_MILLIS)) << (SEQUENCE_BITS + NODE_ID_BITS))
            | (self.node_id << SEQUENCE_BITS)
            | sequence
    }

    pub(crate) fn node_id(&self) -> u64 {
        self.node_id
    }
}

fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(EPOCH_MILLIS)
}
