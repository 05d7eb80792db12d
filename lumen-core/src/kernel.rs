//
// ──────────────────────────────────────────────────────────────
//   3×3 convolution kernels for the post-processing pass
//
//   Rows are top → bottom, columns left → right, matching the
//   sample offsets used by kernel.wgsl.
// ──────────────────────────────────────────────────────────────
//

/// Texel offset between kernel taps, in UV units.
pub const SAMPLE_OFFSET: f32 = 1.0 / 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelEffect
{
  Identity,
  Sharpen,
  Blur,
  EdgeDetect,
  Emboss,
}

impl KernelEffect
{
  pub const ALL: [KernelEffect; 5] = [
    KernelEffect::Identity,
    KernelEffect::Sharpen,
    KernelEffect::Blur,
    KernelEffect::EdgeDetect,
    KernelEffect::Emboss,
  ];

  #[rustfmt::skip]
  pub fn weights(self) -> [[f32; 3]; 3]
  {
    match self
    {
      KernelEffect::Identity => [
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0],
      ],
      KernelEffect::Sharpen => [
        [-1.0, -1.0, -1.0],
        [-1.0,  9.0, -1.0],
        [-1.0, -1.0, -1.0],
      ],
      KernelEffect::Blur => [
        [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
        [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
        [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
      ],
      KernelEffect::EdgeDetect => [
        [1.0,  1.0, 1.0],
        [1.0, -8.0, 1.0],
        [1.0,  1.0, 1.0],
      ],
      KernelEffect::Emboss => [
        [-2.0, -1.0, 0.0],
        [-1.0,  1.0, 1.0],
        [ 0.0,  1.0, 2.0],
      ],
    }
  }

  pub fn name(self) -> &'static str
  {
    match self
    {
      KernelEffect::Identity => "None",
      KernelEffect::Sharpen => "Sharpen",
      KernelEffect::Blur => "Blur",
      KernelEffect::EdgeDetect => "Edge detect",
      KernelEffect::Emboss => "Emboss",
    }
  }

  pub fn next(self) -> Self
  {
    let index = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
    Self::ALL[(index + 1) % Self::ALL.len()]
  }

  /// Number keys 1..=5 select an effect directly.
  pub fn from_digit(digit: u32) -> Option<Self>
  {
    let index = (digit as usize).checked_sub(1)?;
    Self::ALL.get(index).copied()
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  fn sum(kernel: KernelEffect) -> f32
  {
    kernel.weights().iter().flatten().sum()
  }

  #[test]
  fn brightness_preserving_kernels_sum_to_one()
  {
    for kernel in [KernelEffect::Identity, KernelEffect::Sharpen, KernelEffect::Blur, KernelEffect::Emboss]
    {
      assert!((sum(kernel) - 1.0).abs() < 1e-6, "{}", kernel.name());
    }
  }

  #[test]
  fn edge_detect_cancels_flat_regions()
  {
    assert!(sum(KernelEffect::EdgeDetect).abs() < 1e-6);
  }

  #[test]
  fn next_cycles_through_every_effect()
  {
    let mut kernel = KernelEffect::Identity;
    let mut seen = Vec::new();

    for _ in 0..KernelEffect::ALL.len()
    {
      seen.push(kernel);
      kernel = kernel.next();
    }

    assert_eq!(kernel, KernelEffect::Identity);
    assert_eq!(seen, KernelEffect::ALL.to_vec());
  }

  #[test]
  fn digits_select_effects()
  {
    assert_eq!(KernelEffect::from_digit(1), Some(KernelEffect::Identity));
    assert_eq!(KernelEffect::from_digit(4), Some(KernelEffect::EdgeDetect));
    assert_eq!(KernelEffect::from_digit(0), None);
    assert_eq!(KernelEffect::from_digit(6), None);
  }
}
