//! BLE security handler.
//!
//! HID-over-GATT hosts expect to bond. We keep a single bond in RAM:
//! enough to survive reconnects within one power cycle. Nothing is
//! written to flash, so a power cycle means pairing again - consistent
//! with this device not persisting any state.

use core::cell::{Cell, RefCell};

use defmt::{debug, warn, Debug2Format};
use heapless::Vec;
use nrf_softdevice::ble::gatt_server::{get_sys_attrs, set_sys_attrs};
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{Connection, EncryptionInfo, IdentityKey, MasterId, SecurityMode};

#[derive(Clone, Copy)]
struct Peer {
    master_id: MasterId,
    key: EncryptionInfo,
    peer_id: IdentityKey,
}

/// One-slot RAM bond store.
pub struct Bonder {
    peer: Cell<Option<Peer>>,
    sys_attrs: RefCell<Vec<u8, 62>>,
}

impl Default for Bonder {
    fn default() -> Self {
        Bonder {
            peer: Cell::new(None),
            sys_attrs: Default::default(),
        }
    }
}

impl SecurityHandler for Bonder {
    fn io_capabilities(&self) -> IoCapabilities {
        // No display, no keypad: Just Works pairing.
        IoCapabilities::None
    }

    fn can_bond(&self, _conn: &Connection) -> bool {
        true
    }

    fn on_security_update(&self, _conn: &Connection, security_mode: SecurityMode) {
        debug!("security mode updated: {:?}", Debug2Format(&security_mode));
    }

    fn on_bonded(
        &self,
        _conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        peer_id: IdentityKey,
    ) {
        debug!("storing bond for master id {}", master_id);
        self.sys_attrs.borrow_mut().clear();
        self.peer.set(Some(Peer {
            master_id,
            key,
            peer_id,
        }));
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        debug!("requesting bond for master id {}", master_id);
        self.peer
            .get()
            .and_then(|peer| (master_id == peer.master_id).then_some(peer.key))
    }

    fn save_sys_attrs(&self, conn: &Connection) {
        if let Some(peer) = self.peer.get() {
            if peer.peer_id.is_match(conn.peer_address()) {
                let mut sys_attrs = self.sys_attrs.borrow_mut();
                let capacity = sys_attrs.capacity();
                if sys_attrs.resize(capacity, 0).is_ok() {
                    match get_sys_attrs(conn, &mut sys_attrs) {
                        Ok(len) => sys_attrs.truncate(len),
                        Err(err) => {
                            warn!("failed to read sys attrs: {:?}", Debug2Format(&err));
                            sys_attrs.clear();
                        }
                    }
                }
            }
        }
    }

    fn load_sys_attrs(&self, conn: &Connection) {
        let addr = conn.peer_address();
        let attrs = self.sys_attrs.borrow();

        let attrs = if self
            .peer
            .get()
            .map(|peer| peer.peer_id.is_match(addr))
            .unwrap_or(false)
        {
            (!attrs.is_empty()).then_some(attrs.as_slice())
        } else {
            None
        };

        if let Err(err) = set_sys_attrs(conn, attrs) {
            warn!("failed to set sys attrs: {:?}", Debug2Format(&err));
        }
    }
}
