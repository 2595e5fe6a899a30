// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fan-out of quality events to subscribers.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::sync::{Mutex, PoisonError};
use vitra_core::telemetry::QualityEvent;

/// Broadcasts [`QualityEvent`]s to any number of bounded subscriber channels.
///
/// A subscriber that falls behind loses events rather than stalling the frame
/// loop; a subscriber whose receiver was dropped is removed on the next publish.
#[derive(Debug)]
pub struct EventHub {
    subscribers: Mutex<Vec<Sender<QualityEvent>>>,
    buffer_size: usize,
}

impl EventHub {
    /// Creates a hub whose subscriber channels hold `buffer_size` events.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> Receiver<QualityEvent> {
        let (tx, rx) = crossbeam_channel::bounded(self.buffer_size);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Sends `event` to every live subscriber.
    pub fn publish(&self, event: QualityEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::trace!("Quality subscriber is full; dropping {:?}.", event);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// Number of live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(256)
    }
}
