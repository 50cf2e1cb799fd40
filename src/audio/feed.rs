use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use tracing::{debug, warn};

use super::spectrum::Spectrum;

/// Create a bounded spectrum channel.
///
/// The publisher never blocks: when `capacity` snapshots are already queued
/// the new one is dropped. A capacity of zero is raised to one.
pub fn spectrum_channel(capacity: usize, bins: usize) -> (SpectrumPublisher, SpectrumFeed) {
    let (tx, rx) = channel::bounded(capacity.max(1));
    (
        SpectrumPublisher { tx },
        SpectrumFeed {
            rx,
            latest: Spectrum::silence(bins),
            received: 0,
            disconnected: false,
        },
    )
}

/// Audio-side handle.
#[derive(Debug, Clone)]
pub struct SpectrumPublisher {
    tx: Sender<Spectrum>,
}

impl SpectrumPublisher {
    /// Queue a snapshot. Returns `false` when it was dropped.
    pub fn publish(&self, spectrum: Spectrum) -> bool {
        match self.tx.try_send(spectrum) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("Spectrum channel full, dropping snapshot");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("Spectrum feed disconnected");
                false
            }
        }
    }
}

/// Render-side handle: keeps the newest snapshot seen so far.
#[derive(Debug)]
pub struct SpectrumFeed {
    rx: Receiver<Spectrum>,
    latest: Spectrum,
    received: u64,
    disconnected: bool,
}

impl SpectrumFeed {
    /// Drain everything queued and return the newest snapshot, or the
    /// previous one when nothing new arrived.
    pub fn latest(&mut self) -> &Spectrum {
        loop {
            match self.rx.try_recv() {
                Ok(spectrum) => {
                    self.latest = spectrum;
                    self.received += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }
        &self.latest
    }

    /// Wait up to `timeout` for at least one new snapshot, then drain like
    /// [`latest`](Self::latest). Keeps the previous snapshot on timeout.
    pub fn wait_latest(&mut self, timeout: Duration) -> &Spectrum {
        if !self.disconnected {
            match self.rx.recv_timeout(timeout) {
                Ok(spectrum) => {
                    self.latest = spectrum;
                    self.received += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    debug!(?timeout, "No spectrum arrived, reusing previous snapshot");
                }
                Err(RecvTimeoutError::Disconnected) => self.disconnected = true,
            }
        }
        self.latest()
    }

    /// Snapshots taken off the channel so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// `true` once a drain found every publisher gone and the queue empty.
    pub fn is_finished(&self) -> bool {
        self.disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent() {
        let (_tx, mut feed) = spectrum_channel(4, 8);
        assert_eq!(feed.latest(), &Spectrum::silence(8));
        assert_eq!(feed.received(), 0);
    }

    #[test]
    fn keeps_newest_snapshot() {
        let (tx, mut feed) = spectrum_channel(4, 2);
        assert!(tx.publish(Spectrum::new(vec![1.0])));
        assert!(tx.publish(Spectrum::new(vec![2.0])));
        assert_eq!(feed.latest().magnitudes(), &[2.0]);
        assert_eq!(feed.received(), 2);
        // Nothing new: previous snapshot is reused
        assert_eq!(feed.latest().magnitudes(), &[2.0]);
    }

    #[test]
    fn full_channel_drops_without_blocking() {
        let (tx, mut feed) = spectrum_channel(1, 2);
        assert!(tx.publish(Spectrum::new(vec![1.0])));
        assert!(!tx.publish(Spectrum::new(vec![2.0])));
        assert_eq!(feed.latest().magnitudes(), &[1.0]);
    }

    #[test]
    fn publish_after_feed_dropped_fails() {
        let (tx, feed) = spectrum_channel(2, 2);
        drop(feed);
        assert!(!tx.publish(Spectrum::silence(2)));
    }

    #[test]
    fn finished_when_publisher_gone() {
        let (tx, mut feed) = spectrum_channel(2, 2);
        feed.latest();
        assert!(!feed.is_finished());
        tx.publish(Spectrum::new(vec![3.0]));
        drop(tx);
        // Queued snapshot is still delivered
        assert_eq!(feed.latest().magnitudes(), &[3.0]);
        assert!(feed.is_finished());
    }

    #[test]
    fn wait_latest_blocks_for_next_snapshot() {
        let (tx, mut feed) = spectrum_channel(1, 2);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            tx.publish(Spectrum::new(vec![4.0]))
        });
        assert_eq!(feed.wait_latest(Duration::from_secs(10)).magnitudes(), &[4.0]);
        assert!(handle.join().unwrap());
        assert_eq!(feed.received(), 1);
    }

    #[test]
    fn wait_latest_keeps_previous_on_timeout() {
        let (tx, mut feed) = spectrum_channel(1, 2);
        tx.publish(Spectrum::new(vec![1.0]));
        feed.latest();
        assert_eq!(feed.wait_latest(Duration::from_millis(5)).magnitudes(), &[1.0]);
        drop(tx);
        feed.wait_latest(Duration::from_millis(5));
        assert!(feed.is_finished());
    }

    #[test]
    fn publisher_works_across_threads() {
        let (tx, mut feed) = spectrum_channel(4, 2);
        let handle = std::thread::spawn(move || tx.publish(Spectrum::new(vec![0.5, 0.5])));
        assert!(handle.join().unwrap());
        assert_eq!(feed.latest().energy(), 0.5);
    }
}
