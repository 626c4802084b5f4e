use log::info;

use crate::asset::AssetSource;
use crate::error::{Error, Result};
use crate::port::IngestionPort;
use crate::runtime::CancelToken;
use crate::sample::Split;
use super::dispatcher::Dispatcher;
use super::report::LoadReport;

/// Both manifests of one participant.
#[derive(Debug)]
pub struct DeviceReport {
    pub device: usize,
    pub train: LoadReport,
    pub test: LoadReport,
}

impl DeviceReport {
    pub fn is_clean(&self) -> bool {
        self.train.is_clean() && self.test.is_clean()
    }
}

impl<A, P, const SIDE: usize> Dispatcher<A, P, SIDE>
where
    A: AssetSource + 'static,
    P: IngestionPort + 'static,
{
    /// Load the training then the test manifest of participant `device`
    /// (1-based), e.g. `data/partition_0_train.txt` for device 1.
    pub async fn load_device(&self, device: usize) -> Result<DeviceReport> {
        self.load_device_with(device, CancelToken::new()).await
    }

    /// [`Dispatcher::load_device`] under an external cancellation token.
    ///
    /// The test manifest is only started once every training unit finished.
    pub async fn load_device_with(&self, device: usize, cancel: CancelToken) -> Result<DeviceReport> {
        let partitions = self.config().partitions;
        if device == 0 || device > partitions {
            return Err(Error::InvalidDevice { device, partitions });
        }

        let data_root = &self.config().data_root;
        let train = self
            .spawn_load(&Split::Train.manifest_name(data_root, device), Split::Train, cancel.clone())
            .await?
            .finish()
            .await?;
        let test = self
            .spawn_load(&Split::Test.manifest_name(data_root, device), Split::Test, cancel)
            .await?
            .finish()
            .await?;

        info!(
            "device {}: {} training and {} test samples loaded",
            device,
            train.acknowledged.len(),
            test.acknowledged.len()
        );
        Ok(DeviceReport { device, train, test })
    }
}
