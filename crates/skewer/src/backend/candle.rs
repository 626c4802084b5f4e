use candle_core::{Device, Tensor};

use crate::constant::CHANNELS;
use crate::error::{Error, Result};
use super::PixelTensor;
use super::core_trait::check_len;

impl PixelTensor for Tensor {
    type Device = Device;

    fn from_pixels(pixels: &[f32], side: usize, device: &Device) -> Result<Self> {
        check_len(pixels, side)?;
        Tensor::from_slice(pixels, (side, side, CHANNELS), device).map_err(|e| Error::Tensor(e.to_string()))
    }

    fn dims(&self) -> Vec<usize> {
        self.shape().dims().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;

    #[test]
    fn test_sample_to_candle() {
        let pixels: Vec<f32> = (0..12).map(|v| v as f32 / 12.0).collect();
        let sample = Sample::new(pixels.clone(), "cat", true);

        let tensor: Tensor = sample.to_tensor(2, &Device::Cpu).unwrap();
        assert_eq!(PixelTensor::dims(&tensor), vec![2, 2, 3]);
        assert_eq!(tensor.flatten_all().unwrap().to_vec1::<f32>().unwrap(), pixels);
    }

    #[test]
    fn test_wrong_side() {
        let sample = Sample::new(vec![0.0; 12], "cat", true);
        assert!(sample.to_tensor::<Tensor>(3, &Device::Cpu).is_err());
    }
}
