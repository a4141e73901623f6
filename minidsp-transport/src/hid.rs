//! USB HID transport for direct connection

use hidapi::{HidApi, HidDevice};
use tracing::debug;

use crate::error::TransportError;
use crate::frame::READ_SIZE;
use crate::Transport;

/// HID transport for a board connected over USB
///
/// Each exchange is one feature-sized write followed by one blocking read.
/// The handle is exclusively owned; the boards support a single host
/// process at a time.
pub struct HidTransport {
    device: HidDevice,
}

impl HidTransport {
    /// Open the HID interface identified by `vid`/`pid`.
    ///
    /// Fails with [`TransportError::DeviceNotFound`] when no matching
    /// device is attached, and with the underlying HID error (including
    /// permission denial) when the device exists but cannot be opened.
    pub fn open(vid: u16, pid: u16) -> Result<Self, TransportError> {
        let api = HidApi::new()?;
        if !api
            .device_list()
            .any(|d| d.vendor_id() == vid && d.product_id() == pid)
        {
            return Err(TransportError::DeviceNotFound(format!(
                "{vid:04x}:{pid:04x}"
            )));
        }

        let device = api.open(vid, pid)?;
        debug!("opened HID device {:04x}:{:04x}", vid, pid);
        Ok(Self { device })
    }
}

impl Transport for HidTransport {
    fn exchange(&mut self, report: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.device.write(report)?;

        let mut buf = [0u8; READ_SIZE];
        let n = self.device.read(&mut buf)?;
        debug!("exchange: wrote {} bytes, read {}", report.len(), n);
        Ok(buf[..n].to_vec())
    }
}
