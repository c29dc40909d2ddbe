use pi_gpio_web::{
    error::Result,
    hardware::{read_channel, AdcLines, Channel, LedBank, LedColor, SimulatedConverter},
    panel::{
        messages::{hello_message, led_message},
        CommandDispatcher, Panel,
    },
    BroadcastHub, WebConfig,
};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

/// Line accesses per full conversion: 3 for the start condition, 3 per
/// command bit, 3 per result bit, 1 to end.
const ACCESSES_PER_CONVERSION: usize = 3 + 5 * 3 + 11 * 3 + 1;

/// Wraps the simulated converter and records which caller touched the bus
/// for every line access.
struct LoggedLines {
    inner: SimulatedConverter,
    log: Arc<StdMutex<Vec<u8>>>,
    tag: u8,
}

impl LoggedLines {
    fn record(&self) {
        self.log.lock().unwrap().push(self.tag);
    }
}

impl AdcLines for LoggedLines {
    fn set_clock(&mut self, high: bool) -> Result<()> {
        self.record();
        self.inner.set_clock(high)
    }
    fn set_data_in(&mut self, high: bool) -> Result<()> {
        self.record();
        self.inner.set_data_in(high)
    }
    fn read_data_out(&mut self) -> Result<bool> {
        self.record();
        self.inner.read_data_out()
    }
    fn set_chip_select(&mut self, high: bool) -> Result<()> {
        self.record();
        self.inner.set_chip_select(high)
    }
}

/// Two concurrent samplers never interleave line accesses on the shared bus.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn bus_access_is_exclusive_per_conversion() {
    let log = Arc::new(StdMutex::new(Vec::new()));
    let bus = Arc::new(Mutex::new(LoggedLines {
        inner: SimulatedConverter::with_values([7; 8]),
        log: log.clone(),
        tag: 0,
    }));

    const CONVERSIONS_PER_TASK: usize = 25;
    let mut handles = Vec::new();
    for tag in [1u8, 2u8] {
        let bus = bus.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..CONVERSIONS_PER_TASK {
                {
                    let mut lines = bus.lock().await;
                    lines.tag = tag;
                    let value = read_channel(&mut *lines, Channel::new(3).unwrap()).unwrap();
                    assert_eq!(value, 7);
                }
                tokio::task::yield_now().await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2 * CONVERSIONS_PER_TASK * ACCESSES_PER_CONVERSION);

    // Collapse the log into runs of the same tag; a run shorter than one
    // conversion means two callers interleaved mid-transaction.
    let mut run_len = 0usize;
    let mut current = log[0];
    for &tag in log.iter() {
        if tag == current {
            run_len += 1;
        } else {
            assert_eq!(
                run_len % ACCESSES_PER_CONVERSION,
                0,
                "interleaved access detected"
            );
            current = tag;
            run_len = 1;
        }
    }
    assert_eq!(run_len % ACCESSES_PER_CONVERSION, 0);
}

async fn register_mock(hub: &BroadcastHub) -> tokio::sync::mpsc::UnboundedReceiver<String> {
    let (_id, mut rx) = hub.register(hello_message("test"), Vec::new()).await;
    assert_eq!(rx.recv().await.unwrap(), "hello test");
    rx
}

/// One `redled clicked` command produces exactly one state broadcast to all
/// registered clients and exactly one LED mutation, for N in {0, 1, 5}.
#[tokio::test]
async fn fan_out_completeness() {
    for n in [0usize, 1, 5] {
        let panel = Panel::shared_memory();
        let hub = Arc::new(BroadcastHub::new());
        let dispatcher = CommandDispatcher::new(panel.clone(), hub.clone());

        let mut receivers = Vec::new();
        for _ in 0..n {
            receivers.push(register_mock(&hub).await);
        }

        dispatcher.handle("redled clicked").await.unwrap();

        {
            let panel = panel.lock().await;
            assert!(panel.led_is_on(LedColor::Red));
            assert!(!panel.led_is_on(LedColor::Green));
            assert!(!panel.led_is_on(LedColor::Blue));
        }
        for rx in &mut receivers {
            assert_eq!(rx.recv().await.unwrap(), "redled on");
            assert!(rx.try_recv().is_err(), "exactly one broadcast expected");
        }
    }
}

/// A client joining while red is lit receives the greeting and then three
/// snapshot lines matching the state, before any later broadcast.
#[tokio::test]
async fn new_connection_snapshot() {
    let panel = Arc::new(Mutex::new(Panel::new(LedBank::memory()).unwrap()));
    let hub = Arc::new(BroadcastHub::new());
    panel.lock().await.set_led(LedColor::Red, true).unwrap();

    let snapshot: Vec<String> = panel
        .lock()
        .await
        .led_levels()
        .into_iter()
        .map(|(color, on)| led_message(color, on))
        .collect();
    let (_id, mut rx) = hub
        .register(hello_message("127.0.0.1:2001"), snapshot)
        .await;
    hub.broadcast("adc0 42").await;

    assert_eq!(rx.recv().await.unwrap(), "hello 127.0.0.1:2001");
    assert_eq!(rx.recv().await.unwrap(), "redled on");
    assert_eq!(rx.recv().await.unwrap(), "greenled off");
    assert_eq!(rx.recv().await.unwrap(), "blueled off");
    assert_eq!(rx.recv().await.unwrap(), "adc0 42");
}

/// Unrecognized text is echoed verbatim to every client, the sender
/// included.
#[tokio::test]
async fn echo_includes_sender() {
    let panel = Panel::shared_memory();
    let hub = Arc::new(BroadcastHub::new());
    let dispatcher = CommandDispatcher::new(panel, hub.clone());

    let mut sender_rx = register_mock(&hub).await;
    let mut other_rx = register_mock(&hub).await;

    dispatcher.handle("foo bar").await.unwrap();

    assert_eq!(sender_rx.recv().await.unwrap(), "foo bar");
    assert_eq!(other_rx.recv().await.unwrap(), "foo bar");
}

/// Repeated rate commands respect the floor and ceiling.
#[tokio::test]
async fn rate_commands_clamp() {
    let panel = Panel::shared_memory();
    let hub = Arc::new(BroadcastHub::new());
    let dispatcher = CommandDispatcher::new(panel.clone(), hub);

    for _ in 0..100 {
        dispatcher.handle("flash rate up").await.unwrap();
    }
    for _ in 0..500 {
        dispatcher.handle("refresh rate down").await.unwrap();
    }

    let rates = panel.lock().await.rates();
    assert_eq!(
        rates.flash_interval_secs,
        pi_gpio_web::panel::state::MIN_INTERVAL_SECS
    );
    assert_eq!(
        rates.scan_interval_secs,
        pi_gpio_web::panel::state::MAX_INTERVAL_SECS
    );
}

/// WebConfig carries the original server's port by default.
#[test]
fn web_config_defaults_to_original_port() {
    let config = WebConfig::default();
    assert_eq!(config.port, 2001);
    assert_eq!(config.bind_address(), "0.0.0.0:2001");
}
