//! Burn tensors are typed by rank, so samples always land in a float
//! `Tensor<B, 3>`.
use burn::prelude::{Backend as BurnBackend, Tensor};
use burn::tensor::TensorData;

use crate::constant::CHANNELS;
use crate::error::Result;
use super::PixelTensor;
use super::core_trait::check_len;

impl<B: BurnBackend> PixelTensor for Tensor<B, 3> {
    type Device = B::Device;

    fn from_pixels(pixels: &[f32], side: usize, device: &B::Device) -> Result<Self> {
        check_len(pixels, side)?;
        let data = TensorData::new(pixels.to_vec(), [side, side, CHANNELS]);
        Ok(Tensor::<B, 3>::from_data(data, device))
    }

    fn dims(&self) -> Vec<usize> {
        self.shape().dims.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use burn::backend::NdArray;

    type B = NdArray;

    #[test]
    fn test_sample_to_burn() {
        let device = Default::default();
        let pixels: Vec<f32> = (0..12).map(|v| v as f32 / 12.0).collect();
        let sample = Sample::new(pixels.clone(), "dog", false);

        let tensor: Tensor<B, 3> = sample.to_tensor(2, &device).unwrap();
        assert_eq!(PixelTensor::dims(&tensor), vec![2, 2, 3]);
        assert_eq!(tensor.into_data().to_vec::<f32>().unwrap(), pixels);
        assert_eq!(sample.pixels, pixels);
    }

    #[test]
    fn test_wrong_length() {
        let device = Default::default();
        let sample = Sample::new(vec![0.0; 5], "dog", false);
        assert!(sample.to_tensor::<Tensor<B, 3>>(2, &device).is_err());
    }
}
