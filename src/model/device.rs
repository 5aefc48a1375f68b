use candle_core::Device;
use tracing::{debug, info, warn};

use super::error::ModelError;

type DeviceOpener = fn() -> candle_core::Result<Device>;

/// Picks the first compiled-in GPU backend that opens, otherwise the CPU.
pub fn select_device() -> Result<Device, ModelError> {
    let backends = gpu_backends();
    if backends.is_empty() {
        debug!("No GPU backend compiled, QA model runs on CPU");
        return Ok(Device::Cpu);
    }

    let mut failures = Vec::with_capacity(backends.len());
    for (name, open) in backends {
        match open() {
            Ok(device) => {
                info!(backend = name, "QA model runs on GPU");
                return Ok(device);
            }
            Err(e) => {
                warn!(backend = name, error = %e, "GPU backend unavailable");
                failures.push(format!("{name}: {e}"));
            }
        }
    }

    warn!(reason = %failures.join("; "), "Falling back to CPU device");
    Ok(Device::Cpu)
}

fn gpu_backends() -> Vec<(&'static str, DeviceOpener)> {
    #[allow(unused_mut)]
    let mut backends: Vec<(&'static str, DeviceOpener)> = Vec::new();

    #[cfg(feature = "metal")]
    backends.push(("metal", || Device::new_metal(0)));

    #[cfg(feature = "cuda")]
    backends.push(("cuda", || Device::new_cuda(0)));

    backends
}
