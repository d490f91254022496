//! macropad - 4-button BLE macro controller firmware for nRF52840.
//!
//! Task layout:
//!
//! - `softdevice_task`: runs the SoftDevice event loop.
//! - `ble_task`: advertises, serves GATT, forwards HID reports.
//! - `tick_task`: the 5 ms input loop - sample GPIO, debounce, run the
//!   input engine, dispatch events into the report channel.
//!
//! Keymap and engine configuration are validated here, before any task
//! starts; a broken table halts the firmware instead of misbehaving at
//! dispatch time.

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

mod ble;
mod config;
mod dispatch;
mod engine;
mod error;
mod hid;
mod input;
mod keymap;

use defmt::{debug, info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Input, Pin, Pull};
use embassy_nrf::interrupt::Priority;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Ticker};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

use ble::{ReportReceiver, ReportSender};
use engine::{Engine, EngineParams};
use hid::HidReport;
use input::buttons::ButtonInputs;
use keymap::Keymap;

/// Reports from the tick loop to the BLE task.
static REPORT_CHANNEL: Channel<CriticalSectionRawMutex, HidReport, { config::REPORT_CHANNEL_DEPTH }> =
    Channel::new();

static SERVER: StaticCell<ble::hid_service::Server> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(
    sd: &'static Softdevice,
    server: &'static ble::hid_service::Server,
    reports: ReportReceiver,
) -> ! {
    ble::run(sd, server, reports).await
}

#[embassy_executor::task]
async fn tick_task(
    mut buttons: ButtonInputs<Input<'static>>,
    mut engine: Engine,
    keymap: Keymap,
) -> ! {
    let mut transport = ReportSender::new(REPORT_CHANNEL.sender());
    let mut ticker = Ticker::every(Duration::from_millis(config::TICK_MS));
    let mut last_profile = engine.active_profile();
    let mut chord_was_active = false;

    loop {
        ticker.next().await;

        let now_ms = Instant::now().as_millis();
        let samples = buttons.sample(now_ms);
        let events = engine.tick(&samples);

        if engine.chord_active() != chord_was_active {
            chord_was_active = engine.chord_active();
            debug!("profile chord active: {}", chord_was_active);
        }

        let profile = engine.active_profile();
        if profile != last_profile {
            info!("switched to profile {=usize}", profile);
            last_profile = profile;
        }

        for event in events {
            dispatch::dispatch(&mut transport, &keymap, profile, event);
        }
    }
}

/// SoftDevice configuration: external 32 kHz crystal, one peripheral
/// connection, GAP name from config.
fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(nrf_softdevice::raw::nrf_clock_lf_cfg_t {
            source: nrf_softdevice::raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: nrf_softdevice::raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }),
        conn_gap: Some(nrf_softdevice::raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(nrf_softdevice::raw::ble_gatt_conn_cfg_t { att_mtu: 128 }),
        gatts_attr_tab_size: Some(nrf_softdevice::raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: 4096,
        }),
        gap_role_count: Some(nrf_softdevice::raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: nrf_softdevice::raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(nrf_softdevice::raw::ble_gap_cfg_device_name_t {
            p_value: config::BLE_DEVICE_NAME.as_ptr() as _,
            current_len: config::BLE_DEVICE_NAME.len() as u16,
            max_len: config::BLE_DEVICE_NAME.len() as u16,
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: nrf_softdevice::raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                nrf_softdevice::raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // The SoftDevice reserves interrupt priorities 0, 1 and 4.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    nrf_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(nrf_config);

    info!("macropad starting");

    // Validate configuration before anything runs; both of these are
    // compile-time tables, so a failure here is a firmware bug.
    let keymap = unwrap!(Keymap::from_config(&config::KEYMAP));
    let engine = unwrap!(Engine::new(
        keymap.profile_count(),
        EngineParams {
            chord_buttons: config::CHORD_BUTTONS,
            chord_hold_ms: config::CHORD_HOLD_MS,
            repeat_delay_ms: config::REPEAT_DELAY_MS,
            repeat_interval_ms: config::REPEAT_INTERVAL_MS,
            tap_after_repeat: config::TAP_AFTER_REPEAT,
        },
    ));

    let pins: [AnyPin; config::NUM_BUTTONS] = [
        p.P0_31.degrade(),
        p.P0_29.degrade(),
        p.P0_02.degrade(),
        p.P1_15.degrade(),
    ];
    let buttons = ButtonInputs::new(pins.map(|pin| Input::new(pin, Pull::Up)));

    let sd = Softdevice::enable(&softdevice_config());
    let server = SERVER.init(unwrap!(ble::hid_service::Server::new(sd)));
    let sd: &'static Softdevice = sd;
    unwrap!(server.dis.set_identity(sd));
    unwrap!(server.bas.battery_level_set(&100));

    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(ble_task(sd, server, REPORT_CHANNEL.receiver())));
    unwrap!(spawner.spawn(tick_task(buttons, engine, keymap)));

    info!("macropad ready");
}
