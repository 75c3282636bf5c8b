use rug::{ops::RemRounding, Complete, Integer};
use std::ops::{Add, Mul};

// Element of Z_order under addition
#[derive(Clone, Debug)]
pub struct Element {
  pub order: Integer,
  pub n: Integer,
}

impl PartialEq<Element> for Element {
  fn eq(&self, rhs: &Self) -> bool {
    self.order == rhs.order && self.n == rhs.n
  }
}

impl Eq for Element {}

impl Add<&Element> for Element {
  type Output = Self;

  fn add(self, rhs: &Self) -> Self {
    debug_assert_eq!(self.order, rhs.order, "Tried to add elements of different orders");
    let sum = (&self.n + &rhs.n).complete();
    Self::new(self.order, sum)
  }
}

impl Add<Element> for Element {
  type Output = Self;

  fn add(self, rhs: Self) -> Self {
    self + &rhs
  }
}

// Scalar multiplication. Negative scalars are allowed
impl Mul<&Integer> for &Element {
  type Output = Element;

  fn mul(self, rhs: &Integer) -> Element {
    let product = (&self.n * rhs).complete();
    Element::new(self.order.clone(), product)
  }
}

impl Element {
  pub fn new(order: Integer, n: Integer) -> Element {
    let n = n.rem_euc(&order);
    Element { order, n }
  }

  pub fn is_zero(&self) -> bool {
    self.n.is_zero()
  }
}

pub struct AdditiveGroup {
  order: Integer,
}

impl AdditiveGroup {
  pub fn new(order: &Integer) -> AdditiveGroup {
    AdditiveGroup {
      order: order.clone(),
    }
  }

  pub fn element(&self, n: &Integer) -> Element {
    Element::new(self.order.clone(), n.clone())
  }
}
