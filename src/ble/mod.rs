//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//! the device advertises as a HID keyboard, accepts one connection,
//! and pushes input reports to the host as GATT notifications.
//!
//! The tick loop never talks to the SoftDevice directly. It writes
//! [`HidReport`]s into a bounded channel through [`ReportSender`];
//! the BLE task drains the channel while a connection is up. The
//! channel is emptied when a connection is (re-)established, so reports
//! produced while disconnected are lost rather than replayed - a key
//! pressed with nobody listening should not type later.

pub mod bonder;
pub mod hid_service;

use defmt::{info, warn, Debug2Format};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use heapless::Vec;
use nrf_softdevice::ble::gatt_server;
use nrf_softdevice::ble::peripheral::{advertise_pairable, ConnectableAdvertisement};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

use crate::config;
use crate::dispatch::HidTransport;
use crate::hid::consumer::ConsumerReport;
use crate::hid::keyboard::KeyboardReport;
use crate::hid::HidReport;
use bonder::Bonder;
use hid_service::{handle_event, Server};

/// Report channel endpoint types.
pub type ReportReceiver =
    Receiver<'static, CriticalSectionRawMutex, HidReport, { config::REPORT_CHANNEL_DEPTH }>;
type ReportTx =
    Sender<'static, CriticalSectionRawMutex, HidReport, { config::REPORT_CHANNEL_DEPTH }>;

/// The dispatcher's view of the BLE link: converts transport calls into
/// reports and fires them into the channel. `try_send` keeps dispatch
/// non-blocking; a full channel drops the report on the floor.
pub struct ReportSender {
    tx: ReportTx,
}

impl ReportSender {
    pub fn new(tx: ReportTx) -> Self {
        Self { tx }
    }

    fn push(&self, report: HidReport) {
        let _ = self.tx.try_send(report);
    }
}

impl HidTransport for ReportSender {
    fn key_press(&mut self, code: u8) {
        self.push(HidReport::Keyboard(KeyboardReport::single_key(code)));
    }

    fn key_release(&mut self) {
        self.push(HidReport::Keyboard(KeyboardReport::empty()));
    }

    fn consumer_press(&mut self, usage: u16) {
        self.push(HidReport::Consumer(ConsumerReport::new(usage)));
    }

    fn consumer_release(&mut self) {
        self.push(HidReport::Consumer(ConsumerReport::empty()));
    }
}

/// Advertising payload: flags, HID + battery service UUIDs, keyboard
/// appearance, complete local name.
fn adv_payload() -> Vec<u8, 64> {
    let name = config::BLE_DEVICE_NAME.as_bytes();

    #[rustfmt::skip]
    let header = [
        0x02, 0x01, nrf_softdevice::raw::BLE_GAP_ADV_FLAGS_LE_ONLY_GENERAL_DISC_MODE as u8,
        0x05, 0x03, 0x12, 0x18, 0x0F, 0x18, // 16-bit services: HID, battery
        0x03, 0x19, 0xC1, 0x03,             // appearance: keyboard
        (name.len() + 1) as u8, 0x09,       // complete local name follows
    ];

    header.iter().chain(name.iter()).copied().collect()
}

/// Run the BLE peripheral: advertise, serve GATT, forward reports.
pub async fn run(sd: &'static Softdevice, server: &'static Server, reports: ReportReceiver) -> ! {
    let adv_data = adv_payload();

    #[rustfmt::skip]
    let scan_data = [
        0x05, 0x03, 0x12, 0x18, 0x0F, 0x18, // 16-bit services: HID, battery
    ];

    static BONDER: StaticCell<Bonder> = StaticCell::new();
    let bonder = BONDER.init(Bonder::default());

    loop {
        let advertisement = ConnectableAdvertisement::ScannableUndirected {
            adv_data: &adv_data,
            scan_data: &scan_data,
        };
        let adv_config = nrf_softdevice::ble::peripheral::Config {
            interval: config::BLE_ADV_INTERVAL,
            ..Default::default()
        };

        let connection = match advertise_pairable(sd, advertisement, &adv_config, bonder).await {
            Ok(connection) => {
                info!("connected to host");
                connection
            }
            Err(error) => {
                warn!("advertising error: {:?}", Debug2Format(&error));
                continue;
            }
        };

        // Discard reports generated while nobody was connected.
        while reports.try_receive().is_ok() {}

        let gatt_fut = gatt_server::run(&connection, server, handle_event);

        let forward_fut = async {
            loop {
                let report = reports.receive().await;
                // Fire and forget: a failed notify (notifications not
                // yet enabled, buffers full) drops the report.
                let result = match &report {
                    HidReport::Keyboard(r) => server.hid.keyboard_report_notify(&connection, r),
                    HidReport::Consumer(r) => server.hid.consumer_report_notify(&connection, r),
                };
                if result.is_err() {
                    warn!("dropped HID report (notify failed)");
                }
            }
        };

        match select(gatt_fut, forward_fut).await {
            Either::First(error) => {
                info!("disconnected: {:?}", Debug2Format(&error));
            }
            Either::Second(()) => {}
        }
    }
}
