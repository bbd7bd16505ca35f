//! Device setup — discovery, projection and historization at startup.

use ladsim_domain::browse_names::{ABSORBANCE_READER_DEVICE_TYPE, DEVICE_SET};
use ladsim_domain::error::{LadsError, NotFoundError};
use ladsim_domain::view::{AbsorbanceReaderDevice, project};

use crate::ports::AddressSpaceHost;
use crate::services::discovery::{Discovered, find_instances_of_type};
use crate::services::historization::HistorizationConfigurator;

/// Discover every absorbance reader below `Objects/DeviceSet`, project it
/// into its typed view and enable history on its sensor slots.
///
/// A device that fails projection or historization is logged and left out;
/// the others are returned in discovery order.
///
/// # Errors
///
/// Returns [`LadsError::NotFound`] when the graph has no `DeviceSet`, and
/// [`LadsError::NoDevices`] when no reader survives setup.
#[tracing::instrument(skip(host, configurator))]
pub async fn setup_devices<H: AddressSpaceHost>(
    host: &H,
    configurator: &HistorizationConfigurator<H>,
) -> Result<Vec<AbsorbanceReaderDevice>, LadsError> {
    let candidates = host.browse(|space| -> Result<Vec<_>, LadsError> {
        let device_set = space
            .browse_path(space.objects_folder(), &[DEVICE_SET])
            .ok_or_else(|| NotFoundError {
                entity: "Folder",
                id: DEVICE_SET.to_string(),
            })?;
        let projected: Vec<_> =
            find_instances_of_type(space, device_set, ABSORBANCE_READER_DEVICE_TYPE)
                .into_iter()
                .filter_map(|found| match found {
                    Discovered::Matched { node, browse_name } => Some((
                        browse_name,
                        project::<AbsorbanceReaderDevice>(space, node),
                    )),
                    Discovered::Unmatched { .. } => None,
                })
                .collect();
        Ok(projected)
    })?;

    let mut devices = Vec::with_capacity(candidates.len());
    for (name, projected) in candidates {
        let device = match projected {
            Ok(device) => device,
            Err(err) => {
                tracing::warn!(
                    device = %name,
                    error = %err,
                    "device does not match its type, skipped"
                );
                continue;
            }
        };
        if let Err(err) = configurator.configure_device(&device).await {
            tracing::warn!(
                device = %name,
                error = %err,
                "history setup failed, device excluded"
            );
            continue;
        }
        tracing::info!(device = %name, "device ready for simulation");
        devices.push(device);
    }

    if devices.is_empty() {
        return Err(LadsError::NoDevices {
            type_name: ABSORBANCE_READER_DEVICE_TYPE.to_string(),
        });
    }
    Ok(devices)
}
