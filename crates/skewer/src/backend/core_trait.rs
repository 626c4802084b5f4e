use crate::constant::CHANNELS;
use crate::error::{Error, Result};
use crate::sample::Sample;

/// A tensor type a [`Sample`] can be converted into.
pub trait PixelTensor: Sized {
    /// Where the tensor is allocated
    type Device;

    /// Build a `[side, side, 3]` tensor from interleaved RGB values.
    fn from_pixels(pixels: &[f32], side: usize, device: &Self::Device) -> Result<Self>;

    /// Return the shape of this tensor
    fn dims(&self) -> Vec<usize>;
}

/// Check `pixels` covers exactly a `side` x `side` RGB image.
pub(crate) fn check_len(pixels: &[f32], side: usize) -> Result<()> {
    let expected = Sample::len_for_side(side);
    if pixels.len() != expected {
        return Err(Error::Tensor(format!(
            "expected {} values for a {}x{}x{} image, got {}",
            expected,
            side,
            side,
            CHANNELS,
            pixels.len()
        )));
    }
    Ok(())
}

impl Sample {
    /// Convert the pixels into a backend tensor.
    pub fn to_tensor<T: PixelTensor>(&self, side: usize, device: &T::Device) -> Result<T> {
        T::from_pixels(&self.pixels, side, device)
    }
}
