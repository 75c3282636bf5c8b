use crate::building_block::wire_label::WireLabel;
use rand::{CryptoRng, RngCore};

// A Wire consists of two unrelated WireLabels, one per bit value

#[derive(Debug, Clone)]
pub struct Wire {
  pub index: usize,
  labels: [WireLabel; 2],
}

impl Wire {
  pub fn new<R: RngCore + CryptoRng>(index: usize, rng: &mut R) -> Self {
    Wire {
      index,
      labels: [
        WireLabel::new(rng),
        WireLabel::new(rng),
      ],
    }
  }

  pub fn from_labels(index: usize, labels: [WireLabel; 2]) -> Self {
    Wire { index, labels }
  }

  pub fn get_label(&self, b: bool) -> &WireLabel {
    &self.labels[if b { 1 } else { 0 }]
  }

  // only the garbler, who holds both labels, can do this
  pub fn decode_label(&self, label: &WireLabel) -> Option<bool> {
    [false, true].into_iter().find(|&b| self.get_label(b) == label)
  }
}
