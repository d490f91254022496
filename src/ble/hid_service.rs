//! GATT services for a HID-over-GATT (HOGP) keyboard peripheral.
//!
//! Three services:
//!
//! - **HID Service (0x1812)**: HID information, report map (keyboard +
//!   consumer descriptors), one input report per report type with its
//!   report-reference descriptor, and the HID control point.
//! - **Device Information (0x180A)**: strings + PnP ID, which HOGP
//!   hosts read during pairing.
//! - **Battery (0x180F)**: fixed level; present because most hosts
//!   expect it on a HID peripheral.

use defmt::debug;
use heapless::Vec;
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::gatt_server::{self, NotifyValueError, RegisterError, Service, SetValueError};
use nrf_softdevice::ble::{Connection, SecurityMode, Uuid};
use nrf_softdevice::Softdevice;

use crate::config;
use crate::hid::consumer::{ConsumerReport, CONSUMER_REPORT_DESCRIPTOR, CONSUMER_REPORT_SIZE};
use crate::hid::keyboard::{KeyboardReport, KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};

// 16-bit assigned numbers (services, characteristics, descriptors).
const HID_SERVICE: u16 = 0x1812;
const HID_INFORMATION: u16 = 0x2a4a;
const REPORT_MAP: u16 = 0x2a4b;
const HID_CONTROL_POINT: u16 = 0x2a4c;
const HID_REPORT: u16 = 0x2a4d;
const REPORT_REFERENCE: u16 = 0x2908;

const DIS_SERVICE: u16 = 0x180a;
const MODEL_NUMBER: u16 = 0x2a24;
const SERIAL_NUMBER: u16 = 0x2a25;
const MANUFACTURER_NAME: u16 = 0x2a29;
const PNP_ID: u16 = 0x2a50;

/// PnP ID characteristic value: vendor source (Bluetooth SIG), VID,
/// PID, product version - all little-endian.
const fn pnp_id(vid: u16, pid: u16, version: u16) -> [u8; 7] {
    [
        0x01,
        vid as u8,
        (vid >> 8) as u8,
        pid as u8,
        (pid >> 8) as u8,
        version as u8,
        (version >> 8) as u8,
    ]
}

/// The HID service proper.
pub struct HidService {
    keyboard_report_value_handle: u16,
    keyboard_report_cccd_handle: u16,
    consumer_report_value_handle: u16,
    consumer_report_cccd_handle: u16,
    hid_control_value_handle: u16,
}

impl HidService {
    pub fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        let mut sb = ServiceBuilder::new(sd, Uuid::new_16(HID_SERVICE))?;

        #[rustfmt::skip]
        let _hid_info = sb.add_characteristic(
            Uuid::new_16(HID_INFORMATION),
            Attribute::new(&[
                0x11, 0x01, // bcdHID 1.11
                0x00,       // country code
                0b01 |      // remote wake
                0b10,       // normally connectable
            ]).read_security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )?;

        // The report map concatenates both report descriptors; report
        // IDs are carried by the report-reference descriptors below.
        let report_map: Vec<u8, { KEYBOARD_REPORT_DESCRIPTOR.len() + CONSUMER_REPORT_DESCRIPTOR.len() }> =
            KEYBOARD_REPORT_DESCRIPTOR
                .iter()
                .chain(CONSUMER_REPORT_DESCRIPTOR.iter())
                .copied()
                .collect();

        let _report_map = sb.add_characteristic(
            Uuid::new_16(REPORT_MAP),
            Attribute::new(&report_map).read_security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )?;

        let mut keyboard_report = sb.add_characteristic(
            Uuid::new_16(HID_REPORT),
            Attribute::new(&[0u8; KEYBOARD_REPORT_SIZE]).security(SecurityMode::JustWorks),
            Metadata::with_security(Properties::new().read().notify(), SecurityMode::JustWorks),
        )?;
        keyboard_report.add_descriptor(
            Uuid::new_16(REPORT_REFERENCE),
            Attribute::new(&[
                0x00, // report ID
                0x01, // input report
            ])
            .security(SecurityMode::JustWorks),
        )?;
        let keyboard_report_handles = keyboard_report.build();

        let mut consumer_report = sb.add_characteristic(
            Uuid::new_16(HID_REPORT),
            Attribute::new(&[0u8; CONSUMER_REPORT_SIZE]).security(SecurityMode::JustWorks),
            Metadata::with_security(Properties::new().read().notify(), SecurityMode::JustWorks),
        )?;
        consumer_report.add_descriptor(
            Uuid::new_16(REPORT_REFERENCE),
            Attribute::new(&[
                0x01, // report ID
                0x01, // input report
            ])
            .security(SecurityMode::JustWorks),
        )?;
        let consumer_report_handles = consumer_report.build();

        let hid_control = sb.add_characteristic(
            Uuid::new_16(HID_CONTROL_POINT),
            Attribute::new(&[0u8]).write_security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().write_without_response()),
        )?;
        let hid_control_handles = hid_control.build();

        sb.build();

        Ok(Self {
            keyboard_report_value_handle: keyboard_report_handles.value_handle,
            keyboard_report_cccd_handle: keyboard_report_handles.cccd_handle,
            consumer_report_value_handle: consumer_report_handles.value_handle,
            consumer_report_cccd_handle: consumer_report_handles.cccd_handle,
            hid_control_value_handle: hid_control_handles.value_handle,
        })
    }

    /// Notify the host of a keyboard report. Failures (not connected,
    /// notifications off, buffers full) are the caller's to ignore.
    pub fn keyboard_report_notify(
        &self,
        conn: &Connection,
        report: &KeyboardReport,
    ) -> Result<(), NotifyValueError> {
        let mut buf = [0u8; KEYBOARD_REPORT_SIZE];
        report.serialize(&mut buf);
        gatt_server::notify_value(conn, self.keyboard_report_value_handle, &buf)
    }

    /// Notify the host of a consumer control report.
    pub fn consumer_report_notify(
        &self,
        conn: &Connection,
        report: &ConsumerReport,
    ) -> Result<(), NotifyValueError> {
        let mut buf = [0u8; CONSUMER_REPORT_SIZE];
        report.serialize(&mut buf);
        gatt_server::notify_value(conn, self.consumer_report_value_handle, &buf)
    }
}

pub enum HidServiceEvent {
    KeyboardReportCccdWrite { notifications: bool },
    ConsumerReportCccdWrite { notifications: bool },
    HidControlWrite(u8),
}

impl Service for HidService {
    type Event = HidServiceEvent;

    fn on_write(&self, handle: u16, data: &[u8]) -> Option<Self::Event> {
        if data.is_empty() {
            return None;
        }
        if handle == self.keyboard_report_cccd_handle {
            return Some(HidServiceEvent::KeyboardReportCccdWrite {
                notifications: data[0] & 0x01 != 0,
            });
        }
        if handle == self.consumer_report_cccd_handle {
            return Some(HidServiceEvent::ConsumerReportCccdWrite {
                notifications: data[0] & 0x01 != 0,
            });
        }
        if handle == self.hid_control_value_handle {
            return Some(HidServiceEvent::HidControlWrite(data[0]));
        }
        None
    }
}

/// Device Information Service: identity strings + PnP ID.
pub struct DeviceInformationService {
    model_number_value_handle: u16,
    serial_number_value_handle: u16,
    manufacturer_name_value_handle: u16,
}

pub enum DeviceInformationServiceEvent {}

impl DeviceInformationService {
    pub fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        let mut sb = ServiceBuilder::new(sd, Uuid::new_16(DIS_SERVICE))?;

        let model_number = sb
            .add_characteristic(
                Uuid::new_16(MODEL_NUMBER),
                Attribute::new("")
                    .variable_len(32)
                    .read_security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read()),
            )?
            .build();

        let serial_number = sb
            .add_characteristic(
                Uuid::new_16(SERIAL_NUMBER),
                Attribute::new("")
                    .variable_len(32)
                    .read_security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read()),
            )?
            .build();

        let manufacturer_name = sb
            .add_characteristic(
                Uuid::new_16(MANUFACTURER_NAME),
                Attribute::new("")
                    .variable_len(32)
                    .read_security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read()),
            )?
            .build();

        let _pnp = sb
            .add_characteristic(
                Uuid::new_16(PNP_ID),
                Attribute::new(&pnp_id(config::BLE_VID, config::BLE_PID, 0x0001))
                    .read_security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read()),
            )?
            .build();

        sb.build();

        Ok(Self {
            model_number_value_handle: model_number.value_handle,
            serial_number_value_handle: serial_number.value_handle,
            manufacturer_name_value_handle: manufacturer_name.value_handle,
        })
    }

    /// Fill in the identity strings from configuration.
    pub fn set_identity(&self, sd: &Softdevice) -> Result<(), SetValueError> {
        gatt_server::set_value(
            sd,
            self.model_number_value_handle,
            config::BLE_MODEL_NUMBER.as_bytes(),
        )?;
        gatt_server::set_value(
            sd,
            self.serial_number_value_handle,
            config::BLE_SERIAL_NUMBER.as_bytes(),
        )?;
        gatt_server::set_value(
            sd,
            self.manufacturer_name_value_handle,
            config::BLE_MANUFACTURER.as_bytes(),
        )?;
        Ok(())
    }
}

impl Service for DeviceInformationService {
    type Event = DeviceInformationServiceEvent;

    fn on_write(&self, _handle: u16, _data: &[u8]) -> Option<Self::Event> {
        None
    }
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify, security = "justworks")]
    battery_level: u8,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
    pub dis: DeviceInformationService,
    pub hid: HidService,
}

/// Log CCCD/control-point traffic; nothing requires a response.
pub fn handle_event(event: ServerEvent) {
    match event {
        ServerEvent::Bas(BatteryServiceEvent::BatteryLevelCccdWrite { notifications }) => {
            debug!("battery level notifications: {}", notifications);
        }
        ServerEvent::Dis(event) => match event {},
        ServerEvent::Hid(event) => match event {
            HidServiceEvent::KeyboardReportCccdWrite { notifications } => {
                debug!("keyboard report notifications: {}", notifications);
            }
            HidServiceEvent::ConsumerReportCccdWrite { notifications } => {
                debug!("consumer report notifications: {}", notifications);
            }
            HidServiceEvent::HidControlWrite(value) => {
                debug!("hid control point write: {=u8}", value);
            }
        },
    }
}
