//! Receiver facade
//!
//! Owns the radio handle and the receive chain. A dedicated driver thread
//! pulls fixed-size sample blocks from the radio, pushes them through the
//! chain and delivers decoded payloads to the callback, once per tick. The
//! pause token is a one-slot channel: the driver holds it for the duration
//! of each iteration, so `pause` takes effect at the top of the next loop.

use crate::blocks::UnderlayStats;
use crate::chain::ReceiverChain;
use crate::radio::Radio;
use crate::Result;
use crossbeam_channel::{bounded, Receiver as ChannelReceiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{error, warn};
use ulofdm_core::params::NUM_RX_SAMPLES;
use ulofdm_core::Sample;

/// Invoked once per chain tick with the payloads completed that tick
/// (possibly none).
pub type PacketCallback = Box<dyn FnMut(Vec<Vec<u8>>) + Send>;

/// Streaming receiver: radio in, decoded payloads out.
pub struct Receiver {
    token_tx: Sender<()>,
    token_rx: ChannelReceiver<()>,
    running: Arc<AtomicBool>,
    driver: Option<JoinHandle<()>>,
    stats: Arc<UnderlayStats>,
}

impl Receiver {
    pub fn new<R>(radio: R, sc_map: u64, callback: PacketCallback) -> Result<Self>
    where
        R: Radio + 'static,
    {
        let chain = ReceiverChain::new(sc_map)?;
        let stats = chain.underlay_stats();

        // One token, initially available so the loop starts immediately.
        let (token_tx, token_rx) = bounded(1);
        let _ = token_tx.send(());

        let running = Arc::new(AtomicBool::new(true));
        let driver = std::thread::Builder::new().name("rx_driver".into()).spawn({
            let token_tx = token_tx.clone();
            let token_rx = token_rx.clone();
            let running = Arc::clone(&running);
            move || drive(radio, chain, callback, token_tx, token_rx, running)
        })?;

        Ok(Self {
            token_tx,
            token_rx,
            running,
            driver: Some(driver),
            stats,
        })
    }

    /// Block the driver loop at the top of its next iteration. Returns
    /// once the in-flight iteration (if any) has finished.
    pub fn pause(&self) {
        let _ = self.token_rx.recv();
    }

    /// Let a paused driver loop continue.
    pub fn resume(&self) {
        let _ = self.token_tx.try_send(());
    }

    /// Underlay diagnostics counters.
    pub fn underlay_stats(&self) -> Arc<UnderlayStats> {
        Arc::clone(&self.stats)
    }

    /// Ask the driver to exit and wait for it. The driver notices the
    /// request at the top of an iteration, so a read blocked on a silent
    /// radio holds this up until the radio produces or disconnects.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        // Wake the driver if it is parked on the pause token.
        let _ = self.token_tx.try_send(());
        if let Some(driver) = self.driver.take() {
            let _ = driver.join();
        }
    }
}

impl Drop for Receiver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn drive<R: Radio>(
    mut radio: R,
    mut chain: ReceiverChain,
    mut callback: PacketCallback,
    token_tx: Sender<()>,
    token_rx: ChannelReceiver<()>,
    running: Arc<AtomicBool>,
) {
    request_realtime_priority();
    let mut samples: Vec<Sample> = Vec::with_capacity(NUM_RX_SAMPLES);
    loop {
        // Acquire the pause token; disconnection means the facade is gone.
        if token_rx.recv().is_err() {
            break;
        }
        if !running.load(Ordering::Relaxed) {
            break;
        }

        if let Err(e) = radio.get_samples(NUM_RX_SAMPLES, &mut samples) {
            error!("Radio receive failed, stopping driver: {e}");
            break;
        }
        match chain.process_samples(std::mem::take(&mut samples)) {
            Ok(packets) => callback(packets),
            Err(e) => {
                error!("Receive chain failed, stopping driver: {e}");
                break;
            }
        }

        // Release the token; a waiting pause() call may take it instead.
        // A full slot means stop() already queued a wake-up token.
        let _ = token_tx.try_send(());
    }
}

/// Ask for round-robin realtime scheduling on the driver thread to bound
/// jitter against sample deadlines. Denial is expected for unprivileged
/// processes and only logged.
#[cfg(unix)]
fn request_realtime_priority() {
    unsafe {
        let policy = libc::SCHED_RR;
        let mut param: libc::sched_param = std::mem::zeroed();
        param.sched_priority = libc::sched_get_priority_max(policy);
        let rc = libc::pthread_setschedparam(libc::pthread_self(), policy, &param);
        if rc != 0 {
            warn!("Realtime scheduling unavailable (errno {rc})");
        }
    }
}

#[cfg(not(unix))]
fn request_realtime_priority() {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::ChannelRadio;
    use crossbeam_channel::unbounded;
    use std::sync::atomic::AtomicU64;
    use std::time::Duration;
    use ulofdm_core::params::DEFAULT_SC_MAP;

    fn counting_callback() -> (PacketCallback, Arc<AtomicU64>) {
        let ticks = Arc::new(AtomicU64::new(0));
        let handle = Arc::clone(&ticks);
        let callback: PacketCallback = Box::new(move |_packets| {
            handle.fetch_add(1, Ordering::Relaxed);
        });
        (callback, ticks)
    }

    fn feeder() -> (Sender<Vec<Sample>>, ChannelRadio) {
        let (tx, rx) = unbounded();
        (tx, ChannelRadio::new(rx))
    }

    #[test]
    fn callback_fires_once_per_tick() {
        let (tx, radio) = feeder();
        let (callback, ticks) = counting_callback();
        let receiver = Receiver::new(radio, DEFAULT_SC_MAP, callback).unwrap();

        for _ in 0..3 {
            tx.send(vec![Sample::default(); NUM_RX_SAMPLES]).unwrap();
        }
        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(ticks.load(Ordering::Relaxed), 3);
        // Disconnect the radio so the blocked sample read wakes up.
        drop(tx);
        receiver.stop();
    }

    #[test]
    fn pause_blocks_the_loop_and_resume_releases_it() {
        let (tx, radio) = feeder();
        let (callback, ticks) = counting_callback();
        let receiver = Receiver::new(radio, DEFAULT_SC_MAP, callback).unwrap();

        // Keep the radio fed so the driver is never starved mid-iteration.
        let feeder_thread = std::thread::spawn(move || {
            while tx.send(vec![Sample::default(); NUM_RX_SAMPLES]).is_ok() {
                std::thread::sleep(Duration::from_millis(5));
            }
        });

        std::thread::sleep(Duration::from_millis(100));
        receiver.pause();
        let at_pause = ticks.load(Ordering::Relaxed);
        assert!(at_pause > 0);

        // Samples keep arriving, but the paused loop must not touch them.
        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(ticks.load(Ordering::Relaxed), at_pause);

        receiver.resume();
        std::thread::sleep(Duration::from_millis(200));
        assert!(ticks.load(Ordering::Relaxed) > at_pause);

        // Stopping drops the radio, which disconnects the feeder.
        receiver.stop();
        feeder_thread.join().unwrap();
    }

    #[test]
    fn radio_loss_is_fatal_to_the_driver() {
        let (tx, radio) = feeder();
        let (callback, ticks) = counting_callback();
        let receiver = Receiver::new(radio, DEFAULT_SC_MAP, callback).unwrap();

        tx.send(vec![Sample::default(); NUM_RX_SAMPLES]).unwrap();
        drop(tx);
        std::thread::sleep(Duration::from_millis(200));
        // One tick happened, then the driver terminated; stop() just joins.
        assert_eq!(ticks.load(Ordering::Relaxed), 1);
        receiver.stop();
    }
}
