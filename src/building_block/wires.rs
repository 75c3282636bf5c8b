use crate::{
  building_block::{
    wire::Wire,
    wire_label::WireLabel,
  },
  error::{Error, Result},
};
use rand::{CryptoRng, RngCore};

// input wires are kept in creation order; their labels, bit 0 then bit 1,
// form the catalogue offered over OT
#[derive(Debug, Default)]
pub struct Wires {
  wires: Vec<Wire>,
  input_wires: Vec<usize>,
}

impl Wires {
  pub fn new() -> Self {
    Wires::default()
  }

  pub fn create<R: RngCore + CryptoRng>(&mut self, is_input: bool, rng: &mut R) -> usize {
    let index = self.wires.len();
    let wire = Wire::new(index, rng);
    self.push(wire, is_input)
  }

  pub fn create_with_labels(&mut self, is_input: bool, labels: [WireLabel; 2]) -> usize {
    let index = self.wires.len();
    let wire = Wire::from_labels(index, labels);
    self.push(wire, is_input)
  }

  fn push(&mut self, wire: Wire, is_input: bool) -> usize {
    let index = wire.index;
    self.wires.push(wire);

    if is_input {
      self.input_wires.push(index);
    }
    index
  }

  pub fn get(&self, index: usize) -> Result<&Wire> {
    self.wires.get(index).ok_or(Error::UnknownWire(index))
  }

  pub fn len(&self) -> usize {
    self.wires.len()
  }

  pub fn is_empty(&self) -> bool {
    self.wires.is_empty()
  }

  pub fn input_wires(&self) -> &[usize] {
    &self.input_wires
  }

  pub fn label_catalogue(&self) -> Vec<Vec<u8>> {
    self.input_wires.iter()
      .filter_map(|&index| self.wires.get(index))
      .flat_map(Self::labels_of)
      .collect()
  }

  // catalogue restricted to the given wires, in the given order
  pub fn catalogue_of(&self, wires: &[usize]) -> Result<Vec<Vec<u8>>> {
    let mut catalogue = Vec::with_capacity(2 * wires.len());
    for &index in wires {
      catalogue.extend(Self::labels_of(self.get(index)?));
    }
    Ok(catalogue)
  }

  fn labels_of(wire: &Wire) -> [Vec<u8>; 2] {
    [false, true].map(|b| wire.get_label(b).as_bytes().to_vec())
  }

  pub fn catalogue_index(&self, wire: usize, bit: bool) -> Option<usize> {
    catalogue_index(&self.input_wires, wire, bit)
  }
}

// position of (wire, bit) in a catalogue built from input_wires
pub fn catalogue_index(input_wires: &[usize], wire: usize, bit: bool) -> Option<usize> {
  input_wires.iter()
    .position(|&w| w == wire)
    .map(|pos| 2 * pos + bit as usize)
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::OsRng;

  #[test]
  fn test_create() {
    let mut wires = Wires::new();
    let x = wires.create(true, &mut OsRng);
    let w = wires.create(false, &mut OsRng);
    let y = wires.create(true, &mut OsRng);

    assert_eq!((x, w, y), (0, 1, 2));
    assert_eq!(wires.len(), 3);
    assert!(!wires.is_empty());
    assert_eq!(wires.input_wires(), &[0, 2]);
    assert_eq!(wires.get(w).unwrap().index, w);
  }

  #[test]
  fn test_get_unknown_wire() {
    let mut wires = Wires::new();
    assert!(wires.is_empty());
    assert!(matches!(wires.get(0), Err(Error::UnknownWire(0))));

    wires.create(true, &mut OsRng);
    assert!(matches!(wires.get(1), Err(Error::UnknownWire(1))));
  }

  #[test]
  fn test_label_catalogue() {
    let mut wires = Wires::new();
    let x = wires.create(true, &mut OsRng);
    let _w = wires.create(false, &mut OsRng);
    let y = wires.create(true, &mut OsRng);

    let catalogue = wires.label_catalogue();
    assert_eq!(catalogue.len(), 4);

    for wire in [x, y] {
      for bit in [false, true] {
        let index = wires.catalogue_index(wire, bit).unwrap();
        assert_eq!(catalogue[index], wires.get(wire).unwrap().get_label(bit).as_bytes());
      }
    }
    assert_eq!(wires.catalogue_index(y, true), Some(3));
  }

  #[test]
  fn test_catalogue_of_selected_wires() {
    let mut wires = Wires::new();
    let x = wires.create(true, &mut OsRng);
    let y = wires.create(true, &mut OsRng);

    let catalogue = wires.catalogue_of(&[y]).unwrap();
    assert_eq!(catalogue.len(), 2);
    for bit in [false, true] {
      let index = catalogue_index(&[y], y, bit).unwrap();
      assert_eq!(catalogue[index], wires.get(y).unwrap().get_label(bit).as_bytes());
      assert_ne!(catalogue[index], wires.get(x).unwrap().get_label(bit).as_bytes());
    }

    assert!(matches!(wires.catalogue_of(&[y, 5]), Err(Error::UnknownWire(5))));
  }

  #[test]
  fn test_catalogue_index_of_internal_wire() {
    let mut wires = Wires::new();
    let _x = wires.create(true, &mut OsRng);
    let w = wires.create(false, &mut OsRng);
    assert_eq!(wires.catalogue_index(w, false), None);
  }
}
